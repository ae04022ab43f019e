//! Simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic for a
//! given RNG and input sequence:
//! - Injected RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod events;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Circle, Rect, circles_overlap, point_in_rect, rects_overlap};
pub use events::{GameEvent, GameObserver, Sound, StatsDelta};
pub use spawn::{populate_initial, spawn_collectible, spawn_obstacle};
pub use state::{
    Collectible, CollectibleKind, GamePhase, GameState, Obstacle, ObstacleKind, PlayerCar,
    RoadState, SessionStats,
};
pub use tick::{TickInput, clamp_elapsed, tick};
