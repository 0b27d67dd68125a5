//! Skip Rope headless demo
//!
//! Builds a small scene, plays a scripted player that spins the control
//! panel in time with the jumper (plus seeded pointer jitter), and reports
//! the score. Useful for checking tuning files without a renderer.

use std::f32::consts::TAU;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use glam::{Quat, UVec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use skip_rope::input::InputEvent;
use skip_rope::scene::Scene;
use skip_rope::sim::{GameEvent, overlay_to_pixel};
use skip_rope::{Session, Tuning, wrap_angle};

#[derive(Parser, Debug)]
#[command(name = "skip-rope", about = "Headless skipping-rope simulation")]
struct Args {
    /// Frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Simulated frame rate
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Seed for pointer jitter
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Pointer jitter amplitude in pixels
    #[arg(long, default_value_t = 2.0)]
    jitter: f32,

    /// JSON tuning override
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Print the final render view as JSON
    #[arg(long)]
    json: bool,
}

const WINDOW: UVec2 = UVec2::new(1280, 720);

fn demo_scene() -> Scene {
    let mut scene = Scene::new();
    let eye = scene.add_transform("Camera", Vec3::new(9.0, 0.0, 3.0), Quat::IDENTITY);
    scene.add_camera(eye);
    scene.add_transform("Jumper", Vec3::ZERO, Quat::IDENTITY);
    scene.add_transform("Blob1", Vec3::new(0.0, -3.0, 1.5), Quat::IDENTITY);
    scene.add_transform("Blob2", Vec3::new(0.0, 3.0, 1.5), Quat::IDENTITY);
    scene.add_transform("Rope", Vec3::ZERO, Quat::IDENTITY);
    scene
}

fn run(args: &Args) -> skip_rope::Result<()> {
    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    let mut scene = demo_scene();
    let mut session = Session::new(&mut scene, tuning)?;
    session.resize(WINDOW);

    let mut rng = Pcg32::seed_from_u64(args.seed);
    let dt = 1.0 / args.fps.max(1.0);
    let jitter = args.jitter.abs();

    // Settle the panel layout before grabbing the handle
    session.update(&mut scene, dt);

    let mut phase = 0.0_f32;
    let mut pressed = false;
    let (mut scored, mut collisions) = (0u32, 0u32);

    for _ in 0..args.frames {
        // One rope turn per jump: overhead at contact, under the feet at the apex
        phase += dt / session.state().jumper.period;
        let rope_angle = wrap_angle(TAU * phase);
        let panel = &session.state().panel;
        let Some(mut position) = overlay_to_pixel(panel.point_at(-rope_angle, 0.8), WINDOW) else {
            continue;
        };
        if jitter > 0.0 {
            position.x += rng.random_range(-jitter..=jitter);
            position.y += rng.random_range(-jitter..=jitter);
        }

        let event = if pressed {
            InputEvent::PointerMove { position, window: WINDOW }
        } else {
            pressed = true;
            InputEvent::PointerDown { position, window: WINDOW }
        };
        session.handle_event(event);

        for event in session.update(&mut scene, dt) {
            match event {
                GameEvent::Scored { .. } => scored += 1,
                GameEvent::Collision { .. } => collisions += 1,
                GameEvent::Landed { scored } => {
                    // Resync the scripted swing to the new jump
                    phase = 0.0;
                    if !scored {
                        log::debug!("Landed without a pass");
                    }
                }
                _ => {}
            }
        }
    }

    let view = session.view();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!(
            "{} frames: score {} (best {}), {} clean jumps, {} collisions, period {:.3}s",
            args.frames, view.score, view.best_score, scored, collisions, view.jump_period
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    log::info!("Skip Rope (headless) starting...");

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
