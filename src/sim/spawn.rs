//! Procedural obstacle and collectible spawning
//!
//! Spawners only build entities. They draw from the RNG they are handed and
//! know nothing about scoring or the rest of the state.

use glam::Vec2;
use rand::Rng;

use super::state::{Collectible, CollectibleKind, GameState, Obstacle, ObstacleKind};
use crate::config::GameConfig;
use crate::consts::*;

/// Collectible kinds with their spawn weights (sum to 1)
pub const COLLECTIBLE_WEIGHTS: [(CollectibleKind, f32); 3] = [
    (CollectibleKind::Fuel, 0.5),
    (CollectibleKind::Boost, 0.2),
    (CollectibleKind::Coin, 0.3),
];

/// Build an obstacle in a random lane just above the screen
pub fn spawn_obstacle<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R, id: u32) -> Obstacle {
    let lane = rng.random_range(0..config.lane_count);
    let kind = ObstacleKind::ALL[rng.random_range(0..ObstacleKind::ALL.len())];
    let drift = match kind {
        ObstacleKind::Car => rng.random_range(-MAX_TRAFFIC_DRIFT..MAX_TRAFFIC_DRIFT),
        _ => 0.0,
    };

    Obstacle {
        id,
        kind,
        pos: Vec2::new(config.lane_center(lane), OBSTACLE_SPAWN_Y),
        size: kind.size(),
        drift,
        lane,
    }
}

/// Build a collectible in a random lane just above the screen
pub fn spawn_collectible<R: Rng + ?Sized>(
    config: &GameConfig,
    rng: &mut R,
    id: u32,
) -> Collectible {
    let lane = rng.random_range(0..config.lane_count);
    let kind = collectible_kind_for_roll(rng.random::<f32>());

    Collectible {
        id,
        kind,
        pos: Vec2::new(config.lane_center(lane), COLLECTIBLE_SPAWN_Y),
        size: Vec2::splat(COLLECTIBLE_SIZE),
        lane,
        collected: false,
    }
}

/// Cumulative-weight selection for a roll in `[0, 1)`
pub fn collectible_kind_for_roll(roll: f32) -> CollectibleKind {
    let mut sum = 0.0;
    for (kind, weight) in COLLECTIBLE_WEIGHTS {
        sum += weight;
        if roll < sum {
            return kind;
        }
    }
    // Rounding can leave the sum a hair under 1.0
    COLLECTIBLE_WEIGHTS[COLLECTIBLE_WEIGHTS.len() - 1].0
}

/// Seed a fresh road with the configured opening entities
pub fn populate_initial<R: Rng + ?Sized>(state: &mut GameState, config: &GameConfig, rng: &mut R) {
    for _ in 0..config.initial_obstacles {
        let id = state.next_entity_id();
        let obstacle = spawn_obstacle(config, rng, id);
        if let Err(e) = state.push_obstacle(obstacle, config.lane_count) {
            log::warn!("Discarding initial obstacle: {e}");
        }
    }
    for _ in 0..config.initial_collectibles {
        let id = state.next_entity_id();
        let collectible = spawn_collectible(config, rng, id);
        if let Err(e) = state.push_collectible(collectible, config.lane_count) {
            log::warn!("Discarding initial collectible: {e}");
        }
    }
    log::debug!(
        "Road populated: {} obstacles, {} collectibles",
        state.obstacles.len(),
        state.collectibles.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CarCatalog;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_weighted_kind_boundaries() {
        assert_eq!(collectible_kind_for_roll(0.0), CollectibleKind::Fuel);
        assert_eq!(collectible_kind_for_roll(0.49), CollectibleKind::Fuel);
        assert_eq!(collectible_kind_for_roll(0.5), CollectibleKind::Boost);
        assert_eq!(collectible_kind_for_roll(0.69), CollectibleKind::Boost);
        assert_eq!(collectible_kind_for_roll(0.7), CollectibleKind::Coin);
        assert_eq!(collectible_kind_for_roll(0.999), CollectibleKind::Coin);
        assert_eq!(collectible_kind_for_roll(1.0), CollectibleKind::Coin);
    }

    #[test]
    fn test_obstacle_footprints() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(7);
        for id in 0..200 {
            let o = spawn_obstacle(&config, &mut rng, id);
            assert_eq!(o.pos.x, config.lane_center(o.lane));
            assert_eq!(o.pos.y, OBSTACLE_SPAWN_Y);
            match o.kind {
                ObstacleKind::OilSlick => {
                    assert_eq!(o.size, Vec2::new(60.0, 40.0));
                    assert_eq!(o.drift, 0.0);
                }
                ObstacleKind::Wreck => {
                    assert_eq!(o.size, Vec2::new(40.0, 80.0));
                    assert_eq!(o.drift, 0.0);
                }
                ObstacleKind::Car => {
                    assert_eq!(o.size, Vec2::new(40.0, 80.0));
                    assert!((-1.0..1.0).contains(&o.drift));
                }
            }
        }
    }

    #[test]
    fn test_spawns_are_deterministic_per_seed() {
        let config = GameConfig::default();
        let mut a = Pcg32::seed_from_u64(99);
        let mut b = Pcg32::seed_from_u64(99);
        for id in 0..20 {
            assert_eq!(
                spawn_obstacle(&config, &mut a, id),
                spawn_obstacle(&config, &mut b, id)
            );
            assert_eq!(
                spawn_collectible(&config, &mut a, id),
                spawn_collectible(&config, &mut b, id)
            );
        }
    }

    #[test]
    fn test_every_kind_eventually_spawns() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let kinds: Vec<_> = (0..300)
            .map(|id| spawn_collectible(&config, &mut rng, id).kind)
            .collect();
        assert!(kinds.contains(&CollectibleKind::Fuel));
        assert!(kinds.contains(&CollectibleKind::Boost));
        assert!(kinds.contains(&CollectibleKind::Coin));
    }

    #[test]
    fn test_populate_initial() {
        let config = GameConfig::default();
        let car = CarCatalog::default().get_or_default("classic").clone();
        let mut state = GameState::new(&config, car, false);
        let mut rng = Pcg32::seed_from_u64(1);
        populate_initial(&mut state, &config, &mut rng);
        assert_eq!(state.obstacles.len(), 3);
        assert_eq!(state.collectibles.len(), 2);

        // IDs are unique
        let mut ids: Vec<u32> = state
            .obstacles
            .iter()
            .map(|o| o.id)
            .chain(state.collectibles.iter().map(|c| c.id))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    proptest! {
        #[test]
        fn prop_spawned_entities_are_valid(seed in any::<u64>(), lanes in 1usize..8) {
            let config = GameConfig {
                lane_count: lanes,
                road_width: 60.0 * lanes as f32,
                ..GameConfig::default()
            };
            let mut rng = Pcg32::seed_from_u64(seed);
            for id in 0..16 {
                let o = spawn_obstacle(&config, &mut rng, id);
                prop_assert!(o.lane < lanes);
                prop_assert!(o.size.x >= 0.0 && o.size.y >= 0.0);
                prop_assert!(o.validate(lanes).is_ok());

                let c = spawn_collectible(&config, &mut rng, id);
                prop_assert!(c.lane < lanes);
                prop_assert!(c.validate(lanes).is_ok());
                prop_assert!(!c.collected);
            }
        }
    }
}
