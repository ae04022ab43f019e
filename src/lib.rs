//! Road Rush - An endless lane-driving arcade game
//!
//! Core modules:
//! - `sim`: Simulation (player kinematics, spawning, collisions, game state)
//! - `session`: Owns a running game and drives the tick/render cycle
//! - `renderer`: Canvas-style 2D drawing of a simulation snapshot
//! - `platform`: Input sampling and frame timing
//! - `config`: Tunables and the car profile table

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod config;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod sim;

pub use config::{CarCatalog, CarProfile, GameConfig};
pub use error::SimError;
pub use session::GameSession;

/// Game geometry and scoring constants
pub mod consts {
    /// Player car footprint (pixels)
    pub const CAR_WIDTH: f32 = 40.0;
    pub const CAR_HEIGHT: f32 = 80.0;

    /// Traffic car and wreck footprint
    pub const OBSTACLE_WIDTH: f32 = 40.0;
    pub const OBSTACLE_HEIGHT: f32 = 80.0;
    /// Oil slicks are wider and flatter
    pub const OIL_SLICK_WIDTH: f32 = 60.0;
    pub const OIL_SLICK_HEIGHT: f32 = 40.0;

    /// Collectibles are square
    pub const COLLECTIBLE_SIZE: f32 = 30.0;

    /// Spawn heights (above the visible top edge)
    pub const OBSTACLE_SPAWN_Y: f32 = -100.0;
    pub const COLLECTIBLE_SPAWN_Y: f32 = -50.0;

    /// Bound on a traffic car's extra vertical speed (negative drifts up the screen)
    pub const MAX_TRAFFIC_DRIFT: f32 = 1.0;

    /// Score components
    pub const POINTS_PER_DISTANCE: f64 = 10.0;
    pub const FUEL_POINTS: u64 = 50;
    pub const BOOST_POINTS: u64 = 100;
    pub const COIN_POINTS: u64 = 100;

    /// Lives at the start of a session (also the upper bound)
    pub const MAX_LIVES: u8 = 3;
}
