//! Game configuration and car profiles
//!
//! Both are fixed for the lifetime of a session. Hosts can override any
//! subset of fields from JSON; missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::renderer::Color;

/// Longest single integration step a config may allow (ms)
pub const MAX_FRAME_MS_LIMIT: f32 = 1000.0;

/// Tunables for the road, the player car and the difficulty ramp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Viewport / road geometry ===
    /// Drawing surface size (pixels)
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Road span, centered horizontally
    pub road_width: f32,
    pub lane_count: usize,
    /// Player car center sits this far above the bottom edge
    pub player_bottom_offset: f32,

    // === Road speed / difficulty ===
    pub base_road_speed: f32,
    /// Road speed gained per level
    pub level_speed_increment: f32,
    /// Distance per level
    pub level_distance: f64,
    /// Scroll offset wraps at this period
    pub road_scroll_period: f32,

    // === Player handling ===
    /// Max speed contributed by each point of a car's top speed rating
    pub speed_per_rating: f32,
    pub deceleration: f32,
    /// Lateral pixels per ms per handling point
    pub steer_rate: f32,
    pub accel_scale: f32,
    pub brake_scale: f32,

    // === Per-ms scale factors ===
    pub scroll_scale: f32,
    pub distance_scale: f64,
    pub drift_scale: f32,

    // === Spawning ===
    /// Obstacle spawn probability per tick, multiplied by level
    pub obstacle_spawn_chance: f64,
    /// Collectible spawn probability per tick
    pub collectible_spawn_chance: f64,
    pub initial_obstacles: u32,
    pub initial_collectibles: u32,
    /// Entities are dropped once this far below the bottom edge
    pub despawn_margin: f32,

    // === Session ===
    pub starting_lives: u8,
    /// Upper bound on one integration step (ms)
    pub max_frame_ms: f32,
    /// After a crash, obstacles reaching below this distance above the
    /// player's top edge are cleared
    pub crash_clear_buffer: f32,

    // === Presentation ===
    /// Fraction of max speed above which motion streaks are drawn
    pub speed_lines_threshold: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 600.0,
            road_width: 400.0,
            lane_count: 3,
            player_bottom_offset: 150.0,

            base_road_speed: 5.0,
            level_speed_increment: 0.5,
            level_distance: 100.0,
            road_scroll_period: 100.0,

            speed_per_rating: 1.5,
            deceleration: 0.1,
            steer_rate: 0.05,
            accel_scale: 0.01,
            brake_scale: 0.02,

            scroll_scale: 0.1,
            distance_scale: 0.001,
            drift_scale: 0.05,

            obstacle_spawn_chance: 0.01,
            collectible_spawn_chance: 0.005,
            initial_obstacles: 3,
            initial_collectibles: 2,
            despawn_margin: 100.0,

            starting_lives: crate::consts::MAX_LIVES,
            max_frame_ms: 100.0,
            crash_clear_buffer: 50.0,

            speed_lines_threshold: 0.8,
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) config from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Default config sized to a drawing surface
    pub fn for_canvas(width: f32, height: f32) -> Self {
        Self {
            canvas_width: width,
            canvas_height: height,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        let invalid = |msg: &str| Err(SimError::InvalidConfig(msg.to_string()));

        if self.lane_count == 0 {
            return invalid("lane_count must be at least 1");
        }
        if !(self.road_width > 0.0) || !(self.canvas_width > 0.0) || !(self.canvas_height > 0.0) {
            return invalid("road and canvas dimensions must be positive");
        }
        if self.road_width / (self.lane_count as f32) < crate::consts::CAR_WIDTH {
            return invalid("lanes are narrower than a car");
        }
        if !(self.level_distance > 0.0) || !(self.road_scroll_period > 0.0) {
            return invalid("level_distance and road_scroll_period must be positive");
        }
        if !(0.0..=1.0).contains(&self.obstacle_spawn_chance)
            || !(0.0..=1.0).contains(&self.collectible_spawn_chance)
        {
            return invalid("spawn chances must be within [0, 1]");
        }
        if self.starting_lives == 0 || self.starting_lives > crate::consts::MAX_LIVES {
            return invalid("starting_lives must be within [1, 3]");
        }
        if !(self.max_frame_ms > 0.0 && self.max_frame_ms <= MAX_FRAME_MS_LIMIT) {
            return invalid("max_frame_ms must be within (0, 1000]");
        }

        let rates = [
            ("base_road_speed", self.base_road_speed),
            ("level_speed_increment", self.level_speed_increment),
            ("speed_per_rating", self.speed_per_rating),
            ("deceleration", self.deceleration),
            ("steer_rate", self.steer_rate),
            ("accel_scale", self.accel_scale),
            ("brake_scale", self.brake_scale),
            ("scroll_scale", self.scroll_scale),
            ("distance_scale", self.distance_scale as f32),
            ("drift_scale", self.drift_scale),
            ("despawn_margin", self.despawn_margin),
            ("crash_clear_buffer", self.crash_clear_buffer),
            ("player_bottom_offset", self.player_bottom_offset),
            ("speed_lines_threshold", self.speed_lines_threshold),
        ];
        if let Some((name, _)) = rates.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "{name} must be finite and non-negative"
            )));
        }
        Ok(())
    }

    /// Left edge of the road
    pub fn road_left(&self) -> f32 {
        self.canvas_width / 2.0 - self.road_width / 2.0
    }

    /// Right edge of the road
    pub fn road_right(&self) -> f32 {
        self.road_left() + self.road_width
    }

    pub fn road_center(&self) -> f32 {
        self.canvas_width / 2.0
    }

    pub fn lane_width(&self) -> f32 {
        self.road_width / self.lane_count as f32
    }

    /// X coordinate of a lane's centerline
    pub fn lane_center(&self, lane: usize) -> f32 {
        let lane_width = self.lane_width();
        self.road_left() + lane as f32 * lane_width + lane_width / 2.0
    }

    /// Fixed vertical position of the player car
    pub fn player_y(&self) -> f32 {
        self.canvas_height - self.player_bottom_offset
    }

    /// Level reached at a given cumulative distance
    pub fn level_for_distance(&self, distance: f64) -> u32 {
        // `as` saturates, so absurd distances pin to the top level
        ((distance.max(0.0) / self.level_distance).floor() as u32).saturating_add(1)
    }
}

/// A selectable car
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarProfile {
    pub id: String,
    pub name: String,
    /// Ratings on a 1-10 scale
    pub speed: u8,
    pub handling: u8,
    pub acceleration: u8,
    pub color: Color,
}

impl CarProfile {
    fn new(id: &str, name: &str, speed: u8, handling: u8, acceleration: u8, color: Color) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            speed,
            handling,
            acceleration,
            color,
        }
    }

    /// Top speed for this car under the given config
    pub fn max_speed(&self, config: &GameConfig) -> f32 {
        self.speed as f32 * config.speed_per_rating
    }
}

/// Immutable table of car profiles, passed to the session at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CarProfile>", into = "Vec<CarProfile>")]
pub struct CarCatalog {
    cars: Vec<CarProfile>,
}

impl Default for CarCatalog {
    fn default() -> Self {
        Self {
            cars: vec![
                CarProfile::new("speedster", "Speedster", 9, 6, 7, Color::rgb(0xFF, 0x00, 0x00)),
                CarProfile::new("cruiser", "Cruiser", 7, 8, 6, Color::rgb(0x00, 0x66, 0xCC)),
                CarProfile::new("thunder", "Thunder", 8, 7, 9, Color::rgb(0xFF, 0xD7, 0x00)),
                CarProfile::new("shadow", "Shadow", 8, 9, 7, Color::rgb(0x2C, 0x2C, 0x2C)),
                CarProfile::new("neon", "Neon", 10, 5, 8, Color::rgb(0xFF, 0x00, 0xFF)),
                CarProfile::new("classic", "Classic", 6, 10, 6, Color::rgb(0x00, 0x80, 0x00)),
            ],
        }
    }
}

impl CarCatalog {
    /// A catalog must hold at least one car
    pub fn new(cars: Vec<CarProfile>) -> Result<Self, SimError> {
        if cars.is_empty() {
            return Err(SimError::InvalidConfig("car catalog is empty".to_string()));
        }
        Ok(Self { cars })
    }

    /// Parse a catalog from a JSON array of profiles
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn cars(&self) -> &[CarProfile] {
        &self.cars
    }

    pub fn find(&self, id: &str) -> Result<&CarProfile, SimError> {
        self.cars
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| SimError::UnknownCar(id.to_string()))
    }

    /// Look up a car, falling back to the first entry for unknown ids
    pub fn get_or_default(&self, id: &str) -> &CarProfile {
        match self.find(id) {
            Ok(car) => car,
            Err(e) => {
                log::warn!("{e}, using {}", self.cars[0].id);
                &self.cars[0]
            }
        }
    }
}

impl TryFrom<Vec<CarProfile>> for CarCatalog {
    type Error = SimError;

    fn try_from(cars: Vec<CarProfile>) -> Result<Self, Self::Error> {
        Self::new(cars)
    }
}

impl From<CarCatalog> for Vec<CarProfile> {
    fn from(catalog: CarCatalog) -> Self {
        catalog.cars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_overrides() {
        let config = GameConfig::from_json(r#"{ "lane_count": 4, "obstacle_spawn_chance": 0.0 }"#)
            .unwrap();
        assert_eq!(config.lane_count, 4);
        assert_eq!(config.obstacle_spawn_chance, 0.0);
        assert_eq!(config.road_width, 400.0);
    }

    #[test]
    fn test_rejects_zero_lanes() {
        let err = GameConfig::from_json(r#"{ "lane_count": 0 }"#).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            GameConfig::from_json("{ lanes"),
            Err(SimError::Json(_))
        ));
    }

    #[test]
    fn test_frame_cap_is_bounded() {
        assert!(GameConfig::from_json(r#"{ "max_frame_ms": 1000.0 }"#).is_ok());
        for json in [
            r#"{ "max_frame_ms": 1e14 }"#,
            r#"{ "max_frame_ms": 0.0 }"#,
            r#"{ "max_frame_ms": -16.0 }"#,
        ] {
            assert!(
                matches!(GameConfig::from_json(json), Err(SimError::InvalidConfig(_))),
                "{json}"
            );
        }
    }

    #[test]
    fn test_rejects_negative_rates() {
        let fields = [
            "base_road_speed",
            "level_speed_increment",
            "speed_per_rating",
            "deceleration",
            "steer_rate",
            "accel_scale",
            "brake_scale",
            "scroll_scale",
            "distance_scale",
            "drift_scale",
            "despawn_margin",
            "crash_clear_buffer",
            "player_bottom_offset",
            "speed_lines_threshold",
        ];
        for field in fields {
            let json = format!(r#"{{ "{field}": -0.001 }}"#);
            match GameConfig::from_json(&json) {
                Err(SimError::InvalidConfig(msg)) => assert!(msg.contains(field), "{msg}"),
                other => panic!("{field} accepted: {other:?}"),
            }
        }
    }

    #[test]
    fn test_rejects_non_finite_rates() {
        let config = GameConfig {
            distance_scale: f64::INFINITY,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));

        let config = GameConfig {
            steer_rate: f32::NAN,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_level_saturates_for_huge_distance() {
        let config = GameConfig::default();
        assert_eq!(config.level_for_distance(1e300), u32::MAX);
        assert_eq!(config.level_for_distance(f64::INFINITY), u32::MAX);
        assert_eq!(config.level_for_distance(-50.0), 1);
    }

    #[test]
    fn test_lane_centers() {
        let config = GameConfig::default();
        // Road spans 200..600 with three 133.3px lanes
        assert!((config.lane_center(0) - 266.666).abs() < 0.01);
        assert!((config.lane_center(1) - 400.0).abs() < 0.01);
        assert!((config.lane_center(2) - 533.333).abs() < 0.01);
    }

    #[test]
    fn test_level_for_distance() {
        let config = GameConfig::default();
        assert_eq!(config.level_for_distance(0.0), 1);
        assert_eq!(config.level_for_distance(99.9), 1);
        assert_eq!(config.level_for_distance(100.0), 2);
        assert_eq!(config.level_for_distance(105.0), 2);
        assert_eq!(config.level_for_distance(350.0), 4);
    }

    #[test]
    fn test_catalog_lookup_and_fallback() {
        let catalog = CarCatalog::default();
        assert_eq!(catalog.cars().len(), 6);
        assert_eq!(catalog.find("neon").unwrap().speed, 10);
        assert!(matches!(catalog.find("hovercraft"), Err(SimError::UnknownCar(_))));
        assert_eq!(catalog.get_or_default("hovercraft").id, "speedster");
    }

    #[test]
    fn test_empty_catalog_never_deserializes() {
        // Plain serde goes through the same check as from_json
        assert!(serde_json::from_str::<CarCatalog>("[]").is_err());

        let json = serde_json::to_string(&CarCatalog::default()).unwrap();
        let catalog: CarCatalog = serde_json::from_str(&json).unwrap();
        assert_eq!(catalog, CarCatalog::default());
        assert_eq!(catalog.get_or_default("unknown").id, "speedster");
    }

    #[test]
    fn test_catalog_from_json() {
        let catalog = CarCatalog::from_json(
            r##"[{ "id": "van", "name": "Van", "speed": 4, "handling": 3,
                   "acceleration": 2, "color": "#112233" }]"##,
        )
        .unwrap();
        let van = catalog.find("van").unwrap();
        assert_eq!(van.color, Color::rgb(0x11, 0x22, 0x33));
        assert_eq!(van.max_speed(&GameConfig::default()), 6.0);

        assert!(CarCatalog::from_json("[]").is_err());
        assert!(matches!(CarCatalog::new(Vec::new()), Err(SimError::InvalidConfig(_))));
        assert!(matches!(
            CarCatalog::from_json(
                r#"[{ "id": "x", "name": "X", "speed": 1, "handling": 1,
                      "acceleration": 1, "color": "red" }]"#
            ),
            Err(SimError::Json(_))
        ));
    }
}
