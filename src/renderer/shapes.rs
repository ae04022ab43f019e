//! Shape generation for 2D primitives

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::sim::Rect;

/// Horizontal spacing of skyline samples
const SKYLINE_STEP: f32 = 50.0;
/// Skyline wave amplitude
const SKYLINE_AMPLITUDE: f32 = 50.0;
/// Skyline baseline as a fraction of screen height
const SKYLINE_BASELINE: f32 = 0.3;

/// Number of motion streaks drawn at high speed
pub const STREAK_COUNT: usize = 10;

/// Rectangle offset from an entity center, in the entity's local frame
#[inline]
pub fn rect_at(center: Vec2, dx: f32, dy: f32, width: f32, height: f32) -> Rect {
    Rect::new(center.x + dx, center.y + dy, width, height)
}

/// Closed polygon for the parallax skyline: a sine wave across the top,
/// then down to the bottom corners
pub fn skyline(width: f32, height: f32, offset: f32) -> Vec<Vec2> {
    let baseline = height * SKYLINE_BASELINE;
    let samples = (width / SKYLINE_STEP).floor() as usize + 1;

    let mut points = Vec::with_capacity(samples + 3);
    points.push(Vec2::new(0.0, baseline));
    for i in 0..samples {
        let x = i as f32 * SKYLINE_STEP;
        let y = ((x + offset) * 0.01).sin() * SKYLINE_AMPLITUDE + baseline;
        points.push(Vec2::new(x, y));
    }
    points.push(Vec2::new(width, height));
    points.push(Vec2::new(0.0, height));
    points
}

/// Upward arrow used for boost pickups
pub fn boost_arrow(center: Vec2) -> [Vec2; 7] {
    [
        center + Vec2::new(0.0, -15.0),
        center + Vec2::new(-10.0, 5.0),
        center + Vec2::new(-3.0, 5.0),
        center + Vec2::new(-3.0, 15.0),
        center + Vec2::new(3.0, 15.0),
        center + Vec2::new(3.0, 5.0),
        center + Vec2::new(10.0, 5.0),
    ]
}

/// A motion streak: top point and length
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Streak {
    pub start: Vec2,
    pub length: f32,
}

/// Motion streak layout for one frame. Placement comes from `seed` so the
/// same snapshot always draws the same streaks.
pub fn speed_streaks(seed: u64, width: f32, height: f32, intensity: f32) -> Vec<Streak> {
    let mut rng = Pcg32::seed_from_u64(seed);
    (0..STREAK_COUNT)
        .map(|_| {
            let x = rng.random::<f32>() * width;
            let y = rng.random::<f32>() * height;
            let length = 20.0 + rng.random::<f32>() * 40.0 * intensity;
            Streak {
                start: Vec2::new(x, y),
                length,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skyline_closes_at_bottom() {
        let points = skyline(800.0, 600.0, 0.0);
        // Start point, 17 samples (0..=800 step 50), two bottom corners
        assert_eq!(points.len(), 20);
        assert_eq!(points[0], Vec2::new(0.0, 180.0));
        assert_eq!(points[points.len() - 2], Vec2::new(800.0, 600.0));
        assert_eq!(points[points.len() - 1], Vec2::new(0.0, 600.0));
        for p in &points[1..points.len() - 2] {
            assert!(p.y >= 130.0 - 1e-3 && p.y <= 230.0 + 1e-3);
        }
    }

    #[test]
    fn test_skyline_moves_with_offset() {
        assert_ne!(skyline(800.0, 600.0, 0.0), skyline(800.0, 600.0, 40.0));
    }

    #[test]
    fn test_streaks_are_stable_per_seed() {
        let a = speed_streaks(5, 800.0, 600.0, 1.0);
        let b = speed_streaks(5, 800.0, 600.0, 1.0);
        assert_eq!(a, b);
        assert_eq!(a.len(), STREAK_COUNT);
        for s in &a {
            assert!(s.start.x >= 0.0 && s.start.x < 800.0);
            assert!(s.length >= 20.0 && s.length <= 60.0);
        }
    }
}
