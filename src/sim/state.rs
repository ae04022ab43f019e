//! Game state and core simulation types
//!
//! `GameState` is the authoritative state of one session. Only the tick
//! mutates it; renderers and observers see it read-only.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::config::{CarProfile, GameConfig};
use crate::consts::*;
use crate::error::SimError;

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ticks are integrated
    Running,
    /// Ticks are ignored until resumed
    Paused,
    /// Out of lives (absorbing)
    Terminated,
}

/// The player's car
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerCar {
    /// Center of the car; y stays fixed near the bottom of the screen
    pub pos: Vec2,
    /// Forward speed
    pub velocity: f32,
    /// Top speed derived from the profile's speed rating
    pub max_speed: f32,
    /// Chosen profile (ratings and color)
    pub profile: CarProfile,
}

impl PlayerCar {
    pub fn new(profile: CarProfile, config: &GameConfig) -> Self {
        Self {
            pos: Vec2::new(config.road_center(), config.player_y()),
            velocity: 0.0,
            max_speed: profile.max_speed(config),
            profile,
        }
    }

    /// Collision box
    pub fn hitbox(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::new(CAR_WIDTH, CAR_HEIGHT))
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Slower traffic, drifts along the road
    Car,
    OilSlick,
    Wreck,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] = [ObstacleKind::Car, ObstacleKind::OilSlick, ObstacleKind::Wreck];

    pub fn size(&self) -> Vec2 {
        match self {
            ObstacleKind::OilSlick => Vec2::new(OIL_SLICK_WIDTH, OIL_SLICK_HEIGHT),
            ObstacleKind::Car | ObstacleKind::Wreck => Vec2::new(OBSTACLE_WIDTH, OBSTACLE_HEIGHT),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Center position
    pub pos: Vec2,
    pub size: Vec2,
    /// Extra downward speed (traffic cars only, may be negative)
    pub drift: f32,
    pub lane: usize,
}

impl Obstacle {
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }

    pub fn validate(&self, lane_count: usize) -> Result<(), SimError> {
        validate_entity(self.size, self.lane, lane_count)
    }
}

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    Fuel,
    Boost,
    Coin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub kind: CollectibleKind,
    /// Center position
    pub pos: Vec2,
    pub size: Vec2,
    pub lane: usize,
    pub collected: bool,
}

impl Collectible {
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }

    pub fn validate(&self, lane_count: usize) -> Result<(), SimError> {
        validate_entity(self.size, self.lane, lane_count)
    }
}

fn validate_entity(size: Vec2, lane: usize, lane_count: usize) -> Result<(), SimError> {
    if !size.is_finite() || size.x < 0.0 || size.y < 0.0 {
        return Err(SimError::InvalidDimensions {
            width: size.x,
            height: size.y,
        });
    }
    if lane >= lane_count {
        return Err(SimError::InvalidLane { lane, lane_count });
    }
    Ok(())
}

/// Road scroll state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadState {
    /// Pattern phase, wraps at the configured period
    pub offset: f32,
    /// Base scroll speed, ramps with level
    pub speed: f32,
}

/// Per-session counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub score: u64,
    pub lives: u8,
    pub level: u32,
    pub distance: f64,
    pub fuel_collected: u32,
    pub boosts_used: u32,
    pub coins_collected: u32,
    pub crashes: u32,
    /// Distance since the last crash
    pub no_crash_distance: f64,
    pub longest_no_crash_distance: f64,
}

impl SessionStats {
    pub fn new(lives: u8) -> Self {
        Self {
            score: 0,
            lives: lives.min(MAX_LIVES),
            level: 1,
            distance: 0.0,
            fuel_collected: 0,
            boosts_used: 0,
            coins_collected: 0,
            crashes: 0,
            no_crash_distance: 0.0,
            longest_no_crash_distance: 0.0,
        }
    }

    /// Score as a pure function of distance and pickups
    pub fn compute_score(&self) -> u64 {
        (self.distance.max(0.0) * POINTS_PER_DISTANCE).floor() as u64
            + self.fuel_collected as u64 * FUEL_POINTS
            + self.boosts_used as u64 * BOOST_POINTS
            + self.coins_collected as u64 * COIN_POINTS
    }
}

/// Complete state of one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub player: PlayerCar,
    pub road: RoadState,
    /// Active obstacles (spawn order)
    pub obstacles: Vec<Obstacle>,
    /// Active collectibles (spawn order)
    pub collectibles: Vec<Collectible>,
    pub stats: SessionStats,
    /// Day (true) or night palette for the renderer
    pub day_mode: bool,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Fresh session with an empty road
    pub fn new(config: &GameConfig, car: CarProfile, day_mode: bool) -> Self {
        Self {
            phase: GamePhase::Running,
            player: PlayerCar::new(car, config),
            road: RoadState {
                offset: 0.0,
                speed: config.base_road_speed,
            },
            obstacles: Vec::new(),
            collectibles: Vec::new(),
            stats: SessionStats::new(config.starting_lives),
            day_mode,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn is_terminated(&self) -> bool {
        self.phase == GamePhase::Terminated
    }

    /// Add an obstacle if it is well-formed
    pub fn push_obstacle(&mut self, obstacle: Obstacle, lane_count: usize) -> Result<(), SimError> {
        obstacle.validate(lane_count)?;
        self.obstacles.push(obstacle);
        Ok(())
    }

    /// Add a collectible if it is well-formed
    pub fn push_collectible(
        &mut self,
        collectible: Collectible,
        lane_count: usize,
    ) -> Result<(), SimError> {
        collectible.validate(lane_count)?;
        self.collectibles.push(collectible);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CarCatalog;

    fn state() -> GameState {
        let config = GameConfig::default();
        let car = CarCatalog::default().get_or_default("cruiser").clone();
        GameState::new(&config, car, true)
    }

    #[test]
    fn test_new_state() {
        let state = state();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.stats.lives, 3);
        assert_eq!(state.stats.level, 1);
        assert_eq!(state.player.pos, Vec2::new(400.0, 450.0));
        assert_eq!(state.player.max_speed, 10.5);
        assert_eq!(state.road.speed, 5.0);
    }

    #[test]
    fn test_score_formula() {
        let mut stats = SessionStats::new(3);
        stats.distance = 12.34;
        stats.fuel_collected = 2;
        stats.boosts_used = 1;
        stats.coins_collected = 3;
        assert_eq!(stats.compute_score(), 123 + 100 + 100 + 300);
    }

    #[test]
    fn test_push_rejects_bad_entities() {
        let mut state = state();
        let mut obstacle = Obstacle {
            id: state.next_entity_id(),
            kind: ObstacleKind::Wreck,
            pos: Vec2::new(400.0, -100.0),
            size: ObstacleKind::Wreck.size(),
            drift: 0.0,
            lane: 3,
        };
        assert!(matches!(
            state.push_obstacle(obstacle.clone(), 3),
            Err(SimError::InvalidLane { lane: 3, .. })
        ));

        obstacle.lane = 1;
        obstacle.size = Vec2::new(-1.0, 10.0);
        assert!(matches!(
            state.push_obstacle(obstacle.clone(), 3),
            Err(SimError::InvalidDimensions { .. })
        ));
        assert!(state.obstacles.is_empty());

        obstacle.size = ObstacleKind::Wreck.size();
        assert!(state.push_obstacle(obstacle, 3).is_ok());
        assert_eq!(state.obstacles.len(), 1);
    }
}
