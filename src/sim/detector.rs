//! Rope pass and collision detection
//!
//! Watches the wrapped offset between the rope and the under-foot angle.
//! A sign change of that offset while airborne means the rope swept under
//! the feet; one confirmed pass per flight scores on landing. Flights are
//! delimited by the jumper's ground contacts as well as its sampled height,
//! so a bounce shorter than a frame still counts as a landing. Separately, the
//! rope near the feet while the jumper is low resets the score, rate-limited
//! by a cooldown.

use serde::{Deserialize, Serialize};

use super::jumper::JumperState;
use super::state::{GameEvent, ScoreState};
use crate::shortest_delta;
use crate::tuning::DetectorTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightPhase {
    Grounded,
    Airborne,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionState {
    /// Rope angle directly beneath the jumper
    pub under_angle: f32,
    /// Last frame's wrapped offset from `under_angle`
    pub previous_delta: f32,
    /// Last offset outside the noise band; crossings are judged against it
    pub reference_delta: f32,
    /// Rope already passed under during this flight
    pub pass_confirmed: bool,
    /// Seconds until another collision reset is allowed, never negative
    pub collision_cooldown: f32,
    pub phase: FlightPhase,
}

impl DetectionState {
    /// Start observing with the rope at `rope_angle`
    pub fn new(rope_angle: f32, tuning: &DetectorTuning) -> Self {
        let delta = shortest_delta(rope_angle, tuning.under_angle);
        Self {
            under_angle: tuning.under_angle,
            previous_delta: delta,
            reference_delta: delta,
            pass_confirmed: false,
            collision_cooldown: 0.0,
            phase: FlightPhase::Grounded,
        }
    }

    /// Run one frame of detection
    pub fn update(
        &mut self,
        jumper: &JumperState,
        rope_angle: f32,
        dt: f32,
        score: &mut ScoreState,
        tuning: &DetectorTuning,
        events: &mut Vec<GameEvent>,
    ) {
        let delta = shortest_delta(rope_angle, self.under_angle);
        if dt.is_finite() && dt > 0.0 {
            self.collision_cooldown = (self.collision_cooldown - dt).max(0.0);
        }

        // A contact inside the frame ends the flight even when the jumper has
        // already relaunched above the airborne threshold
        if self.phase == FlightPhase::Airborne && (!jumper.airborne || jumper.touched_down) {
            let scored = self.pass_confirmed;
            events.push(GameEvent::Landed { scored });
            if scored {
                score.increment();
                events.push(GameEvent::Scored { score: score.score() });
            }
            self.pass_confirmed = false;
            self.phase = FlightPhase::Grounded;
        }

        if self.phase == FlightPhase::Grounded && jumper.airborne {
            self.pass_confirmed = false;
            self.phase = FlightPhase::Airborne;
            events.push(GameEvent::TookOff);
        }

        let side = side_of(delta, tuning.pass_epsilon);
        if jumper.airborne && !self.pass_confirmed {
            let reference = side_of(self.reference_delta, tuning.pass_epsilon);
            if let (Some(now), Some(before)) = (side, reference) {
                if now != before && !near_wrap(self.reference_delta, delta, tuning.near_pi_window) {
                    self.pass_confirmed = true;
                    log::debug!("Rope passed under (delta {:.3} -> {:.3})", self.reference_delta, delta);
                    events.push(GameEvent::RopePassed);
                }
            }
        }

        if delta.abs() < tuning.collide_window
            && jumper.height <= tuning.foot_clearance
            && self.collision_cooldown <= 0.0
        {
            let lost = score.reset();
            self.collision_cooldown = tuning.collision_cooldown;
            events.push(GameEvent::Collision { lost });
        }

        self.previous_delta = delta;
        if side.is_some() {
            self.reference_delta = delta;
        }
    }
}

/// Which side of the under-foot angle an offset is on: `Some(true)` above
/// zero, `Some(false)` at or below, `None` inside the noise band
fn side_of(delta: f32, epsilon: f32) -> Option<bool> {
    if epsilon > 0.0 && delta.abs() <= epsilon {
        None
    } else {
        Some(delta > 0.0)
    }
}

/// Both offsets sit near ±π, so a sign change is the representation
/// wrapping rather than the rope sweeping under the feet
fn near_wrap(before: f32, now: f32, window: f32) -> bool {
    let edge = std::f32::consts::PI - window;
    before.abs() > edge && now.abs() > edge
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::JumpTuning;
    use glam::Vec3;
    use std::f32::consts::PI;

    struct Rig {
        jumper: JumperState,
        detection: DetectionState,
        score: ScoreState,
        tuning: DetectorTuning,
        events: Vec<GameEvent>,
    }

    impl Rig {
        fn new(rope_angle: f32, tuning: DetectorTuning) -> Self {
            Self {
                jumper: JumperState::new(Vec3::ZERO, &JumpTuning::default()),
                detection: DetectionState::new(rope_angle, &tuning),
                score: ScoreState::default(),
                tuning,
                events: Vec::new(),
            }
        }

        /// One frame with a hand-set jumper height
        fn frame(&mut self, height: f32, rope_angle: f32, dt: f32) {
            self.step(height, false, rope_angle, dt);
        }

        /// Frame in which the jumper touched the ground and relaunched above
        /// the airborne threshold before the frame ended
        fn bounce(&mut self, rope_angle: f32) {
            self.step(0.5, true, rope_angle, 0.016);
        }

        fn step(&mut self, height: f32, touched_down: bool, rope_angle: f32, dt: f32) {
            self.jumper.airborne_prev = self.jumper.airborne;
            self.jumper.touched_down = touched_down;
            self.jumper.height = height;
            self.jumper.airborne = height > 0.1;
            self.detection.update(
                &self.jumper,
                rope_angle,
                dt,
                &mut self.score,
                &self.tuning,
                &mut self.events,
            );
        }

        /// Take off, sweep the rope linearly from `from` to `to` in the air,
        /// then land with the rope at `to`
        fn flight(&mut self, from: f32, to: f32) {
            self.frame(0.0, from, 0.016);
            let steps = 30;
            for i in 0..=steps {
                let t = i as f32 / steps as f32;
                self.frame(1.0, from + (to - from) * t, 0.016);
            }
            self.frame(0.0, to, 0.016);
        }
    }

    #[test]
    fn test_single_sweep_scores_once() {
        let mut rig = Rig::new(PI - 0.6, DetectorTuning::default());
        rig.flight(PI - 0.6, PI + 0.6);
        assert_eq!(rig.score.score(), 1);
        assert!(!rig.detection.pass_confirmed);
        assert_eq!(rig.detection.phase, FlightPhase::Grounded);
        assert_eq!(
            rig.events.iter().filter(|e| matches!(e, GameEvent::RopePassed)).count(),
            1
        );
        assert!(rig.events.contains(&GameEvent::Landed { scored: true }));
        assert!(rig.events.contains(&GameEvent::Scored { score: 1 }));
    }

    #[test]
    fn test_reverse_sweep_also_scores() {
        let mut rig = Rig::new(PI + 0.6, DetectorTuning::default());
        rig.flight(PI + 0.6, PI - 0.6);
        assert_eq!(rig.score.score(), 1);
    }

    #[test]
    fn test_pass_confirmed_at_landing() {
        let mut rig = Rig::new(PI - 0.6, DetectorTuning::default());
        rig.frame(0.0, PI - 0.6, 0.016);
        rig.frame(1.0, PI - 0.3, 0.016);
        assert!(!rig.detection.pass_confirmed);
        rig.frame(1.0, PI + 0.3, 0.016);
        assert!(rig.detection.pass_confirmed);
        rig.frame(1.0, PI + 0.6, 0.016);
        assert!(rig.detection.pass_confirmed);
        rig.frame(0.0, PI + 0.6, 0.016);
        assert_eq!(rig.score.score(), 1);
    }

    #[test]
    fn test_contact_inside_frame_splits_flights() {
        let mut rig = Rig::new(PI - 0.6, DetectorTuning::default());
        rig.frame(0.0, PI - 0.6, 0.016);
        rig.frame(1.0, PI + 0.6, 0.016);
        assert!(rig.detection.pass_confirmed);

        // Never sampled below the threshold, but the contact still lands it
        rig.events.clear();
        rig.bounce(PI + 0.6);
        assert_eq!(
            rig.events,
            vec![
                GameEvent::Landed { scored: true },
                GameEvent::Scored { score: 1 },
                GameEvent::TookOff,
            ]
        );
        assert!(!rig.detection.pass_confirmed);
        assert_eq!(rig.detection.phase, FlightPhase::Airborne);

        // The second flight needs its own pass
        rig.frame(1.0, PI - 0.6, 0.016);
        assert!(rig.detection.pass_confirmed);
        rig.frame(0.0, PI - 0.6, 0.016);
        assert_eq!(rig.score.score(), 2);
    }

    #[test]
    fn test_no_crossing_no_score() {
        let mut rig = Rig::new(PI - 1.5, DetectorTuning::default());
        rig.flight(PI - 1.5, PI - 0.6);
        assert_eq!(rig.score.score(), 0);
        assert!(rig.events.contains(&GameEvent::Landed { scored: false }));
    }

    #[test]
    fn test_wrap_through_top_is_not_a_pass() {
        // Rope swings over the top (0 rad), where the offset flips from +π to -π
        let mut rig = Rig::new(-0.5, DetectorTuning::default());
        rig.flight(-0.5, 0.5);
        assert_eq!(rig.score.score(), 0);
        assert!(!rig.events.contains(&GameEvent::RopePassed));
    }

    #[test]
    fn test_jitter_inside_noise_band_is_ignored() {
        let mut rig = Rig::new(PI - 0.3, DetectorTuning::default());
        rig.frame(0.0, PI - 0.3, 0.016);
        // Hover around the under-foot angle without leaving the band
        for i in 0..20 {
            let wobble = if i % 2 == 0 { 0.02 } else { -0.02 };
            rig.frame(1.0, PI + wobble, 0.016);
        }
        assert!(!rig.detection.pass_confirmed);
        // Leaving on the far side is the real pass
        rig.frame(1.0, PI + 0.3, 0.016);
        assert!(rig.detection.pass_confirmed);
    }

    #[test]
    fn test_plain_sign_test_without_band() {
        let tuning = DetectorTuning {
            pass_epsilon: 0.0,
            ..Default::default()
        };
        let mut rig = Rig::new(PI - 0.01, tuning);
        rig.frame(0.0, PI - 0.01, 0.016);
        rig.frame(1.0, PI - 0.01, 0.016);
        rig.frame(1.0, PI + 0.01, 0.016);
        assert!(rig.detection.pass_confirmed);
    }

    #[test]
    fn test_pass_resets_on_next_takeoff() {
        let mut rig = Rig::new(PI - 0.6, DetectorTuning::default());
        rig.frame(0.0, PI - 0.6, 0.016);
        rig.frame(1.0, PI + 0.6, 0.016);
        assert!(rig.detection.pass_confirmed);
        rig.frame(0.0, PI + 0.6, 0.016);
        rig.frame(1.0, PI + 0.6, 0.016);
        assert!(!rig.detection.pass_confirmed);
        assert_eq!(rig.detection.phase, FlightPhase::Airborne);
    }

    #[test]
    fn test_collision_resets_score_once_per_cooldown() {
        let mut rig = Rig::new(0.0, DetectorTuning::default());
        rig.score.increment();
        rig.score.increment();
        rig.frame(0.0, PI, 0.016);
        assert_eq!(rig.score.score(), 0);
        assert!(rig.events.contains(&GameEvent::Collision { lost: 2 }));

        // Still colliding 0.1 s later, inside the cooldown
        rig.score.increment();
        rig.frame(0.0, PI, 0.1);
        assert_eq!(rig.score.score(), 1);
        let collisions = rig
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::Collision { .. }))
            .count();
        assert_eq!(collisions, 1);
        assert!(rig.detection.collision_cooldown > 0.0);

        // Once the cooldown runs out it fires again
        rig.frame(0.0, PI, 0.25);
        assert_eq!(rig.score.score(), 0);
    }

    #[test]
    fn test_cooldown_never_negative() {
        let mut rig = Rig::new(0.0, DetectorTuning::default());
        rig.frame(0.0, PI, 0.016);
        for _ in 0..10 {
            rig.frame(1.0, 0.0, 0.5);
            assert!(rig.detection.collision_cooldown >= 0.0);
        }
        assert_eq!(rig.detection.collision_cooldown, 0.0);
    }

    #[test]
    fn test_high_jumper_clears_rope() {
        let mut rig = Rig::new(0.0, DetectorTuning::default());
        rig.score.increment();
        rig.frame(1.0, PI, 0.016);
        assert_eq!(rig.score.score(), 1);
    }
}
