//! Platform-agnostic input
//!
//! Hosts translate their raw window events into [`InputEvent`]s. Pointer
//! samples are buffered until the next update; directional keys are tracked
//! for the camera side of the host and never touch the simulation.

use glam::{UVec2, Vec2};

/// Directional keys (WASD on desktop)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// Pixel position plus the window size it was measured against
    PointerDown { position: Vec2, window: UVec2 },
    PointerMove { position: Vec2, window: UVec2 },
    PointerUp { position: Vec2, window: UVec2 },
}

impl InputEvent {
    pub fn is_pointer(&self) -> bool {
        !matches!(self, InputEvent::KeyDown(_) | InputEvent::KeyUp(_))
    }
}

/// Press state of one key within a frame
#[derive(Debug, Clone, Copy, Default)]
pub struct Button {
    /// Presses since the last update
    pub downs: u8,
    pub pressed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Buttons {
    pub left: Button,
    pub right: Button,
    pub up: Button,
    pub down: Button,
}

impl Buttons {
    fn button_mut(&mut self, key: Key) -> &mut Button {
        match key {
            Key::Left => &mut self.left,
            Key::Right => &mut self.right,
            Key::Up => &mut self.up,
            Key::Down => &mut self.down,
        }
    }

    pub fn press(&mut self, key: Key) {
        let button = self.button_mut(key);
        button.downs = button.downs.saturating_add(1);
        button.pressed = true;
    }

    pub fn release(&mut self, key: Key) {
        self.button_mut(key).pressed = false;
    }

    /// Held keys combined into a unit (or zero) move direction, x right, y forward
    pub fn move_axis(&self) -> Vec2 {
        let mut axis = Vec2::ZERO;
        if self.left.pressed && !self.right.pressed {
            axis.x = -1.0;
        }
        if !self.left.pressed && self.right.pressed {
            axis.x = 1.0;
        }
        if self.down.pressed && !self.up.pressed {
            axis.y = -1.0;
        }
        if !self.down.pressed && self.up.pressed {
            axis.y = 1.0;
        }
        // Diagonals are no faster than straight moves
        axis.normalize_or_zero()
    }

    /// Reset per-frame press counters
    pub fn clear_downs(&mut self) {
        self.left.downs = 0;
        self.right.downs = 0;
        self.up.downs = 0;
        self.down.downs = 0;
    }
}

/// Pointer events collected between two updates
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Hand over everything buffered so far, oldest first
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_axis() {
        let mut buttons = Buttons::default();
        assert_eq!(buttons.move_axis(), Vec2::ZERO);

        buttons.press(Key::Right);
        assert_eq!(buttons.move_axis(), Vec2::X);

        buttons.press(Key::Up);
        let diag = buttons.move_axis();
        assert!((diag.length() - 1.0).abs() < 1e-6);
        assert!(diag.x > 0.0 && diag.y > 0.0);

        // Opposing keys cancel
        buttons.press(Key::Left);
        assert_eq!(buttons.move_axis(), Vec2::Y);

        buttons.release(Key::Left);
        buttons.release(Key::Right);
        buttons.release(Key::Up);
        assert_eq!(buttons.move_axis(), Vec2::ZERO);
    }

    #[test]
    fn test_downs_count_until_cleared() {
        let mut buttons = Buttons::default();
        buttons.press(Key::Down);
        buttons.release(Key::Down);
        buttons.press(Key::Down);
        assert_eq!(buttons.down.downs, 2);
        assert!(buttons.down.pressed);
        buttons.clear_downs();
        assert_eq!(buttons.down.downs, 0);
        assert!(buttons.down.pressed);
    }

    #[test]
    fn test_queue_drains_in_order() {
        let mut queue = InputQueue::default();
        let window = UVec2::new(800, 600);
        queue.push(InputEvent::PointerDown { position: Vec2::new(1.0, 2.0), window });
        queue.push(InputEvent::PointerUp { position: Vec2::new(3.0, 4.0), window });
        assert_eq!(queue.len(), 2);

        let events = queue.drain();
        assert!(queue.is_empty());
        assert!(matches!(events[0], InputEvent::PointerDown { .. }));
        assert!(matches!(events[1], InputEvent::PointerUp { .. }));
        assert!(events.iter().all(InputEvent::is_pointer));
        assert!(!InputEvent::KeyDown(Key::Up).is_pointer());
    }
}
