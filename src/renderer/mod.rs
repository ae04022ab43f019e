//! 2D frame rendering
//!
//! The renderer is a pure projection of a [`GameState`] onto a [`Surface`].
//! It never mutates the simulation. Backends implement `Surface`: the browser
//! canvas on wasm32, and [`RecordingSurface`] for headless runs and tests.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod color;
pub mod recording;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use color::Color;
pub use recording::{DrawCommand, RecordingSurface};

use glam::Vec2;

use crate::config::GameConfig;
use crate::sim::{Collectible, CollectibleKind, GameState, Obstacle, ObstacleKind, PlayerCar, Rect};
use shapes::{boost_arrow, rect_at, skyline, speed_streaks};

// Palette
const DAY_SKY: (Color, Color) = (Color::rgb(0x87, 0xCE, 0xEB), Color::rgb(0x98, 0xD8, 0xE8));
const NIGHT_SKY: (Color, Color) = (Color::rgb(0x0F, 0x17, 0x2A), Color::rgb(0x1E, 0x29, 0x3B));
const DAY_SKYLINE: Color = Color::rgb(0x4A, 0x55, 0x68);
const NIGHT_SKYLINE: Color = Color::rgb(0x1A, 0x20, 0x2C);
const ROAD: Color = Color::rgb(0x2C, 0x2C, 0x2C);
const LANE_MARKING: Color = Color::rgb(0xFF, 0xFF, 0x00);
const WINDOW: Color = Color::rgb(0x4A, 0x90, 0xE2);
const HEADLIGHT: Color = Color::rgb(0xFF, 0xFF, 0x00);
const TAILLIGHT: Color = Color::rgb(0xFF, 0x00, 0x00);

const ROAD_EDGE_WIDTH: f32 = 4.0;
const LANE_MARKING_WIDTH: f32 = 3.0;
const LANE_DASH: f32 = 20.0;

/// Dash pattern for stroked lines
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineDash {
    pub dash: f32,
    pub gap: f32,
    /// Pattern phase; negative values shift the pattern downward
    pub offset: f32,
}

/// A 2D raster target with canvas-style primitives
pub trait Surface {
    /// Clear the whole surface
    fn clear(&mut self, width: f32, height: f32);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    /// Fill a rectangle with a top-to-bottom gradient
    fn fill_vertical_gradient(&mut self, rect: Rect, top: Color, bottom: Color);
    /// Soft radial glow fading from `color` at the center to transparent
    fn fill_radial_glow(&mut self, center: Vec2, radius: f32, color: Color);
    fn fill_polygon(&mut self, points: &[Vec2], color: Color);
    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, color: Color);
    fn stroke_ellipse(&mut self, center: Vec2, radii: Vec2, width: f32, color: Color);
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color, dash: Option<LineDash>);
    /// Bold label with its baseline-left corner at `pos`
    fn fill_text(&mut self, text: &str, pos: Vec2, size: f32, color: Color);
}

/// Draws simulation snapshots. Holds only the (immutable) road geometry.
#[derive(Debug, Clone)]
pub struct Renderer {
    config: GameConfig,
}

impl Renderer {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Draw one full frame
    pub fn render<S: Surface + ?Sized>(&self, state: &GameState, surface: &mut S) {
        let (w, h) = (self.config.canvas_width, self.config.canvas_height);
        surface.clear(w, h);
        self.draw_background(state, surface);
        self.draw_road(state.road.offset, surface);

        for collectible in state.collectibles.iter().filter(|c| !c.collected) {
            draw_collectible(collectible, surface);
        }
        for obstacle in &state.obstacles {
            draw_obstacle(obstacle, surface);
        }
        draw_player(&state.player, surface);

        let player = &state.player;
        if player.max_speed > 0.0
            && player.velocity > player.max_speed * self.config.speed_lines_threshold
        {
            // Seeded from the distance so a given snapshot always looks the same
            let seed = state.stats.distance.to_bits();
            self.draw_speed_lines(seed, player.velocity / player.max_speed, surface);
        }
    }

    fn draw_background<S: Surface + ?Sized>(&self, state: &GameState, surface: &mut S) {
        let (w, h) = (self.config.canvas_width, self.config.canvas_height);
        let ((sky_top, sky_bottom), silhouette) = if state.day_mode {
            (DAY_SKY, DAY_SKYLINE)
        } else {
            (NIGHT_SKY, NIGHT_SKYLINE)
        };

        surface.fill_vertical_gradient(Rect::new(0.0, 0.0, w, h), sky_top, sky_bottom);
        surface.fill_polygon(&skyline(w, h, state.road.offset), silhouette);
    }

    fn draw_road<S: Surface + ?Sized>(&self, offset: f32, surface: &mut S) {
        let h = self.config.canvas_height;
        let left = self.config.road_left();
        let right = self.config.road_right();

        surface.fill_rect(Rect::new(left, 0.0, self.config.road_width, h), ROAD);

        for x in [left, right] {
            surface.stroke_line(
                Vec2::new(x, 0.0),
                Vec2::new(x, h),
                ROAD_EDGE_WIDTH,
                Color::WHITE,
                None,
            );
        }

        let dash = LineDash {
            dash: LANE_DASH,
            gap: LANE_DASH,
            offset: -offset,
        };
        let lane_width = self.config.lane_width();
        for i in 1..self.config.lane_count {
            let x = left + i as f32 * lane_width;
            surface.stroke_line(
                Vec2::new(x, 0.0),
                Vec2::new(x, h),
                LANE_MARKING_WIDTH,
                LANE_MARKING,
                Some(dash),
            );
        }
    }

    fn draw_speed_lines<S: Surface + ?Sized>(&self, seed: u64, intensity: f32, surface: &mut S) {
        let color = Color::WHITE.with_alpha(intensity * 0.3);
        let streaks = speed_streaks(
            seed,
            self.config.canvas_width,
            self.config.canvas_height,
            intensity,
        );
        for streak in streaks {
            surface.stroke_line(
                streak.start,
                streak.start + Vec2::new(0.0, streak.length),
                2.0,
                color,
                None,
            );
        }
    }
}

fn draw_player<S: Surface + ?Sized>(player: &PlayerCar, surface: &mut S) {
    let c = player.pos;
    let color = player.profile.color;

    surface.fill_ellipse(c + Vec2::new(0.0, 10.0), Vec2::new(25.0, 15.0), Color::BLACK.with_alpha(0.3));
    // Body and roof
    surface.fill_rect(rect_at(c, -20.0, -40.0, 40.0, 70.0), color);
    surface.fill_rect(rect_at(c, -15.0, -25.0, 30.0, 35.0), color.shade(-30));
    // Windshield and rear window
    surface.fill_rect(rect_at(c, -12.0, -22.0, 24.0, 15.0), WINDOW);
    surface.fill_rect(rect_at(c, -12.0, -5.0, 24.0, 10.0), WINDOW);
    // Lights
    surface.fill_rect(rect_at(c, -15.0, -40.0, 10.0, 5.0), HEADLIGHT);
    surface.fill_rect(rect_at(c, 5.0, -40.0, 10.0, 5.0), HEADLIGHT);
    surface.fill_rect(rect_at(c, -15.0, 30.0, 10.0, 5.0), TAILLIGHT);
    surface.fill_rect(rect_at(c, 5.0, 30.0, 10.0, 5.0), TAILLIGHT);
}

fn draw_obstacle<S: Surface + ?Sized>(obstacle: &Obstacle, surface: &mut S) {
    let c = obstacle.pos;
    match obstacle.kind {
        ObstacleKind::Car => {
            surface.fill_rect(rect_at(c, -20.0, -40.0, 40.0, 80.0), Color::rgb(0x66, 0x66, 0x66));
            surface.fill_rect(rect_at(c, -15.0, -25.0, 30.0, 35.0), Color::rgb(0x44, 0x44, 0x44));
            surface.fill_rect(rect_at(c, -12.0, -22.0, 24.0, 15.0), Color::rgb(0x22, 0x22, 0x22));
        }
        ObstacleKind::OilSlick => {
            let radii = obstacle.size / 2.0;
            surface.fill_ellipse(c, radii, Color::BLACK.with_alpha(0.8));
            surface.stroke_ellipse(c, radii, 2.0, Color::rgba(100, 100, 100, 0.5));
        }
        ObstacleKind::Wreck => {
            surface.fill_rect(rect_at(c, -20.0, -30.0, 40.0, 60.0), Color::rgb(0x8B, 0x45, 0x13));
            surface.fill_rect(rect_at(c, -15.0, -20.0, 30.0, 25.0), Color::rgb(0x65, 0x43, 0x21));
            let damage = Color::rgb(0xFF, 0x45, 0x00);
            surface.stroke_line(c + Vec2::new(-10.0, -10.0), c + Vec2::new(10.0, 10.0), 2.0, damage, None);
            surface.stroke_line(c + Vec2::new(10.0, -10.0), c + Vec2::new(-10.0, 10.0), 2.0, damage, None);
        }
    }
}

fn draw_collectible<S: Surface + ?Sized>(collectible: &Collectible, surface: &mut S) {
    let c = collectible.pos;
    let glow = match collectible.kind {
        CollectibleKind::Fuel => Color::rgb(0xFF, 0x00, 0x00),
        CollectibleKind::Boost => Color::rgb(0x00, 0xFF, 0x00),
        CollectibleKind::Coin => Color::rgb(0xFF, 0xD7, 0x00),
    };
    surface.fill_radial_glow(c, 25.0, glow.with_alpha(0.5));

    match collectible.kind {
        CollectibleKind::Fuel => {
            surface.fill_rect(rect_at(c, -10.0, -12.0, 20.0, 24.0), glow);
            surface.fill_text("F", c + Vec2::new(-5.0, 3.0), 10.0, Color::WHITE);
        }
        CollectibleKind::Boost => {
            surface.fill_polygon(&boost_arrow(c), glow);
        }
        CollectibleKind::Coin => {
            surface.fill_ellipse(c, Vec2::splat(12.0), glow);
            surface.fill_text("$", c + Vec2::new(-4.0, 4.0), 12.0, Color::rgb(0xFF, 0xA5, 0x00));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CarCatalog;

    fn scene(day_mode: bool) -> (GameConfig, GameState) {
        let config = GameConfig::default();
        let car = CarCatalog::default().get_or_default("shadow").clone();
        (config.clone(), GameState::new(&config, car, day_mode))
    }

    fn dashed_lines(surface: &RecordingSurface) -> Vec<&DrawCommand> {
        surface
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { dash: Some(_), .. }))
            .collect()
    }

    fn plain_lines(surface: &RecordingSurface) -> usize {
        surface
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { dash: None, .. }))
            .count()
    }

    #[test]
    fn test_frame_starts_with_clear_and_sky() {
        let (config, state) = scene(true);
        let mut surface = RecordingSurface::default();
        Renderer::new(&config).render(&state, &mut surface);

        assert_eq!(surface.commands[0], DrawCommand::Clear { width: 800.0, height: 600.0 });
        assert!(matches!(
            surface.commands[1],
            DrawCommand::Gradient { top, .. } if top == DAY_SKY.0
        ));
    }

    #[test]
    fn test_night_palette() {
        let (config, state) = scene(false);
        let mut surface = RecordingSurface::default();
        Renderer::new(&config).render(&state, &mut surface);
        assert!(matches!(
            surface.commands[1],
            DrawCommand::Gradient { top, bottom, .. } if top == NIGHT_SKY.0 && bottom == NIGHT_SKY.1
        ));
        assert!(matches!(
            &surface.commands[2],
            DrawCommand::Polygon { color, .. } if *color == NIGHT_SKYLINE
        ));
    }

    #[test]
    fn test_lane_dividers_follow_scroll() {
        let (config, mut state) = scene(true);
        state.road.offset = 37.0;
        let mut surface = RecordingSurface::default();
        Renderer::new(&config).render(&state, &mut surface);

        let dividers = dashed_lines(&surface);
        assert_eq!(dividers.len(), config.lane_count - 1);
        for d in dividers {
            assert!(matches!(
                d,
                DrawCommand::Line { dash: Some(LineDash { offset, .. }), .. } if *offset == -37.0
            ));
        }
        // Two road edges, no streaks at rest
        assert_eq!(plain_lines(&surface), 2);
    }

    #[test]
    fn test_speed_lines_only_when_fast() {
        let (config, mut state) = scene(true);
        let renderer = Renderer::new(&config);

        state.player.velocity = state.player.max_speed * 0.8;
        let mut surface = RecordingSurface::default();
        renderer.render(&state, &mut surface);
        assert_eq!(plain_lines(&surface), 2);

        state.player.velocity = state.player.max_speed;
        let mut surface = RecordingSurface::default();
        renderer.render(&state, &mut surface);
        assert_eq!(plain_lines(&surface), 2 + shapes::STREAK_COUNT);
    }

    #[test]
    fn test_collected_items_are_not_drawn() {
        let (config, mut state) = scene(true);
        let id = state.next_entity_id();
        state.collectibles.push(Collectible {
            id,
            kind: CollectibleKind::Coin,
            pos: Vec2::new(400.0, 100.0),
            size: Vec2::splat(30.0),
            lane: 1,
            collected: true,
        });
        let mut surface = RecordingSurface::default();
        Renderer::new(&config).render(&state, &mut surface);
        assert_eq!(surface.count(|c| matches!(c, DrawCommand::Glow { .. })), 0);

        state.collectibles[0].collected = false;
        let mut surface = RecordingSurface::default();
        Renderer::new(&config).render(&state, &mut surface);
        assert_eq!(surface.count(|c| matches!(c, DrawCommand::Glow { .. })), 1);
        assert_eq!(surface.count(|c| matches!(c, DrawCommand::Text { text, .. } if text == "$")), 1);
    }

    #[test]
    fn test_player_uses_profile_color() {
        let (config, state) = scene(true);
        let mut surface = RecordingSurface::default();
        Renderer::new(&config).render(&state, &mut surface);
        let body = Rect::new(380.0, 410.0, 40.0, 70.0);
        assert!(surface.commands.contains(&DrawCommand::Rect {
            rect: body,
            color: state.player.profile.color,
        }));
    }

    #[test]
    fn test_same_state_same_frame() {
        let (config, mut state) = scene(false);
        state.player.velocity = state.player.max_speed;
        state.stats.distance = 12.5;
        let renderer = Renderer::new(&config);
        let mut a = RecordingSurface::default();
        let mut b = RecordingSurface::default();
        renderer.render(&state, &mut a);
        renderer.render(&state, &mut b);
        assert_eq!(a, b);
    }
}
