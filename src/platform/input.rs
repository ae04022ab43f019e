//! Directional input sampling
//!
//! Hosts forward raw key names and touch coordinates; the sampler keeps held
//! state and answers with a [`TickInput`] whenever the simulation asks.

use std::collections::BTreeSet;

use glam::Vec2;

use crate::sim::TickInput;

/// Drag distance (px) before a touch counts as a direction
pub const TOUCH_DEAD_ZONE: f32 = 10.0;

/// Keys that steer or throttle the car
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DriveKey {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    W,
    A,
    S,
    D,
}

impl DriveKey {
    /// Match a DOM `KeyboardEvent.key` value, ignoring case
    pub fn from_key_name(name: &str) -> Option<Self> {
        let key = match name.to_ascii_lowercase().as_str() {
            "arrowup" => Self::ArrowUp,
            "arrowdown" => Self::ArrowDown,
            "arrowleft" => Self::ArrowLeft,
            "arrowright" => Self::ArrowRight,
            "w" => Self::W,
            "a" => Self::A,
            "s" => Self::S,
            "d" => Self::D,
            _ => return None,
        };
        Some(key)
    }

    fn apply(self, input: &mut TickInput) {
        match self {
            Self::ArrowUp | Self::W => input.up = true,
            Self::ArrowDown | Self::S => input.down = true,
            Self::ArrowLeft | Self::A => input.left = true,
            Self::ArrowRight | Self::D => input.right = true,
        }
    }
}

/// Held-key and touch-drag state for one player
#[derive(Debug, Clone, Default)]
pub struct InputSampler {
    held: BTreeSet<DriveKey>,
    touch_origin: Option<Vec2>,
    touch: TickInput,
}

impl InputSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. Returns true for driving keys so the host can
    /// suppress the browser default (page scrolling).
    pub fn key_down(&mut self, key: &str) -> bool {
        match DriveKey::from_key_name(key) {
            Some(k) => {
                self.held.insert(k);
                true
            }
            None => false,
        }
    }

    pub fn key_up(&mut self, key: &str) {
        if let Some(k) = DriveKey::from_key_name(key) {
            self.held.remove(&k);
        }
    }

    pub fn touch_start(&mut self, x: f32, y: f32) {
        self.touch_origin = Some(Vec2::new(x, y));
        self.touch = TickInput::default();
    }

    /// Recompute touch intent from the drag vector. Each axis only counts
    /// once it leaves the dead zone.
    pub fn touch_move(&mut self, x: f32, y: f32) {
        let Some(origin) = self.touch_origin else {
            return;
        };
        let delta = Vec2::new(x, y) - origin;

        self.touch = TickInput {
            up: delta.y < -TOUCH_DEAD_ZONE,
            down: delta.y > TOUCH_DEAD_ZONE,
            left: delta.x < -TOUCH_DEAD_ZONE,
            right: delta.x > TOUCH_DEAD_ZONE,
        };
    }

    /// Lifting the finger releases every direction, held keys included
    pub fn touch_end(&mut self) {
        self.touch_origin = None;
        self.touch = TickInput::default();
        self.held.clear();
    }

    /// Drop all held state (focus loss)
    pub fn clear(&mut self) {
        self.touch_end();
    }

    /// Current directional intent
    pub fn intent(&self) -> TickInput {
        let mut input = self.touch;
        for key in &self.held {
            key.apply(&mut input);
        }
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrows_and_wasd() {
        let mut input = InputSampler::new();
        assert!(input.key_down("ArrowUp"));
        assert!(input.key_down("a"));
        let intent = input.intent();
        assert!(intent.up && intent.left);
        assert!(!intent.down && !intent.right);

        input.key_up("ArrowUp");
        assert!(!input.intent().up);
        assert!(input.intent().left);
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let mut input = InputSampler::new();
        assert!(input.key_down("D"));
        assert!(input.intent().right);
        input.key_up("d");
        assert!(!input.intent().right);
    }

    #[test]
    fn test_other_keys_are_not_handled() {
        let mut input = InputSampler::new();
        assert!(!input.key_down(" "));
        assert!(!input.key_down("Escape"));
        assert!(!input.key_down("q"));
        assert_eq!(input.intent(), TickInput::default());
    }

    #[test]
    fn test_two_keys_same_direction() {
        let mut input = InputSampler::new();
        input.key_down("w");
        input.key_down("ArrowUp");
        input.key_up("w");
        assert!(input.intent().up);
    }

    #[test]
    fn test_touch_dead_zone() {
        let mut input = InputSampler::new();
        input.touch_start(100.0, 100.0);
        input.touch_move(108.0, 95.0);
        assert!(!input.intent().any());

        input.touch_move(130.0, 70.0);
        let intent = input.intent();
        assert!(intent.right && intent.up);
        assert!(!intent.left && !intent.down);

        // Dragging back re-evaluates both axes
        input.touch_move(85.0, 104.0);
        let intent = input.intent();
        assert!(intent.left);
        assert!(!intent.right && !intent.up && !intent.down);
    }

    #[test]
    fn test_move_without_start_is_ignored() {
        let mut input = InputSampler::new();
        input.touch_move(500.0, 500.0);
        assert!(!input.intent().any());
    }

    #[test]
    fn test_touch_end_clears_everything() {
        let mut input = InputSampler::new();
        input.key_down("ArrowLeft");
        input.touch_start(0.0, 0.0);
        input.touch_move(0.0, 50.0);
        assert!(input.intent().down);

        input.touch_end();
        assert_eq!(input.intent(), TickInput::default());
        input.touch_move(0.0, 80.0);
        assert!(!input.intent().any());
    }
}
