//! Per-frame simulation step
//!
//! Advances the game state by one variable-length frame: player motion, road
//! scroll, scoring, difficulty, entity churn and collisions, in that order.

use rand::Rng;

use super::collision::rects_overlap;
use super::events::{GameObserver, Sound, StatsDelta};
use super::spawn::{spawn_collectible, spawn_obstacle};
use super::state::{CollectibleKind, GamePhase, GameState, ObstacleKind};
use crate::config::GameConfig;
use crate::consts::CAR_WIDTH;

/// Directional intent for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl TickInput {
    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

/// Clamp a host-reported frame time into a safe integration step
pub fn clamp_elapsed(elapsed_ms: f32, max_frame_ms: f32) -> f32 {
    if elapsed_ms.is_nan() {
        return 0.0;
    }
    elapsed_ms.clamp(0.0, max_frame_ms)
}

/// Advance the game state by one frame of `elapsed_ms` milliseconds
pub fn tick<R, O>(
    state: &mut GameState,
    config: &GameConfig,
    input: &TickInput,
    elapsed_ms: f32,
    rng: &mut R,
    observer: &mut O,
) where
    R: Rng + ?Sized,
    O: GameObserver + ?Sized,
{
    match state.phase {
        GamePhase::Running => {}
        GamePhase::Paused => return,
        GamePhase::Terminated => {
            log::trace!("tick after termination ignored");
            return;
        }
    }

    let dt = clamp_elapsed(elapsed_ms, config.max_frame_ms);

    steer(state, config, input, dt);
    throttle(state, config, input, dt);

    // Road scroll
    let scroll = (state.road.speed + state.player.velocity) * dt * config.scroll_scale;
    state.road.offset = (state.road.offset + scroll).rem_euclid(config.road_scroll_period);

    // Distance
    let travel = state.player.velocity.max(0.0) as f64 * dt as f64 * config.distance_scale;
    state.stats.distance += travel;
    state.stats.no_crash_distance += travel;
    state.stats.longest_no_crash_distance = state
        .stats
        .longest_no_crash_distance
        .max(state.stats.no_crash_distance);

    update_score(state, observer);
    update_level(state, config, observer);

    update_entities(state, config, scroll, dt);
    spawn_entities(state, config, rng);

    resolve_collisions(state, config, observer);
}

/// Lateral movement, clamped to the road inset by half a car width
fn steer(state: &mut GameState, config: &GameConfig, input: &TickInput, dt: f32) {
    let step = state.player.profile.handling as f32 * dt * config.steer_rate;
    let mut x = state.player.pos.x;
    if input.left {
        x -= step;
    }
    if input.right {
        x += step;
    }

    let min_x = config.road_left() + CAR_WIDTH / 2.0;
    let max_x = config.road_right() - CAR_WIDTH / 2.0;
    state.player.pos.x = x.clamp(min_x, max_x);
}

/// Forward speed: accelerate while up is held, otherwise slow down
fn throttle(state: &mut GameState, config: &GameConfig, input: &TickInput, dt: f32) {
    let player = &mut state.player;
    if input.up {
        player.velocity += player.profile.acceleration as f32 * dt * config.accel_scale;
    } else {
        player.velocity -= config.deceleration * dt * config.brake_scale;
    }
    player.velocity = player.velocity.clamp(0.0, player.max_speed);
}

fn update_score<O: GameObserver + ?Sized>(state: &mut GameState, observer: &mut O) {
    // Every term of the score only grows, so this never decreases
    state.stats.score = state.stats.score.max(state.stats.compute_score());
    observer.score_changed(state.stats.score);
}

fn update_level<O: GameObserver + ?Sized>(
    state: &mut GameState,
    config: &GameConfig,
    observer: &mut O,
) {
    let level = config.level_for_distance(state.stats.distance);
    if level <= state.stats.level {
        return;
    }

    let gained = level - state.stats.level;
    state.stats.level = level;
    state.road.speed += config.level_speed_increment * gained as f32;
    log::info!("Level {} (road speed {:.1})", level, state.road.speed);

    observer.level_changed(level);
    observer.play_sound(Sound::LevelUp);
}

/// Scroll entities down the screen and drop the ones that left it
fn update_entities(state: &mut GameState, config: &GameConfig, scroll: f32, dt: f32) {
    for obstacle in &mut state.obstacles {
        obstacle.pos.y += scroll;
        if obstacle.kind == ObstacleKind::Car {
            obstacle.pos.y += obstacle.drift * dt * config.drift_scale;
        }
    }
    for collectible in &mut state.collectibles {
        collectible.pos.y += scroll;
    }

    let bottom = config.canvas_height + config.despawn_margin;
    let lane_count = config.lane_count;
    state.obstacles.retain(|o| match o.validate(lane_count) {
        Ok(()) => o.pos.y < bottom,
        Err(e) => {
            log::warn!("Discarding obstacle {}: {e}", o.id);
            false
        }
    });
    state.collectibles.retain(|c| match c.validate(lane_count) {
        Ok(()) => !c.collected && c.pos.y < bottom,
        Err(e) => {
            log::warn!("Discarding collectible {}: {e}", c.id);
            false
        }
    });
}

fn spawn_entities<R: Rng + ?Sized>(state: &mut GameState, config: &GameConfig, rng: &mut R) {
    let obstacle_chance = (config.obstacle_spawn_chance * state.stats.level as f64).clamp(0.0, 1.0);
    if rng.random_bool(obstacle_chance) {
        let id = state.next_entity_id();
        let obstacle = spawn_obstacle(config, rng, id);
        log::debug!("Spawned {:?} in lane {}", obstacle.kind, obstacle.lane);
        if let Err(e) = state.push_obstacle(obstacle, config.lane_count) {
            log::warn!("Discarding spawned obstacle: {e}");
        }
    }

    let collectible_chance = config.collectible_spawn_chance.clamp(0.0, 1.0);
    if rng.random_bool(collectible_chance) {
        let id = state.next_entity_id();
        let collectible = spawn_collectible(config, rng, id);
        log::debug!("Spawned {:?} in lane {}", collectible.kind, collectible.lane);
        if let Err(e) = state.push_collectible(collectible, config.lane_count) {
            log::warn!("Discarding spawned collectible: {e}");
        }
    }
}

fn resolve_collisions<O: GameObserver + ?Sized>(
    state: &mut GameState,
    config: &GameConfig,
    observer: &mut O,
) {
    // At most one crash per tick: the first obstacle hit wins
    let hitbox = state.player.hitbox();
    if state
        .obstacles
        .iter()
        .any(|o| rects_overlap(&hitbox, &o.rect()))
    {
        crash(state, config, observer);
        if state.is_terminated() {
            return;
        }
    }

    // The car may have been recentred by a crash
    let hitbox = state.player.hitbox();
    let mut picked_up = false;
    for i in 0..state.collectibles.len() {
        let c = &state.collectibles[i];
        if c.collected || !rects_overlap(&hitbox, &c.rect()) {
            continue;
        }
        let kind = c.kind;
        state.collectibles[i].collected = true;
        collect(state, kind, observer);
        picked_up = true;
    }
    if picked_up {
        state.collectibles.retain(|c| !c.collected);
    }
}

fn crash<O: GameObserver + ?Sized>(state: &mut GameState, config: &GameConfig, observer: &mut O) {
    let stats = &mut state.stats;
    stats.lives = stats.lives.saturating_sub(1);
    stats.crashes += 1;
    let run = stats.no_crash_distance;
    stats.no_crash_distance = 0.0;
    log::info!("Crash after {:.1} clean distance, {} lives left", run, stats.lives);

    observer.lives_changed(stats.lives);
    observer.play_sound(Sound::Crash);

    state.player.pos.x = config.road_center();
    state.player.velocity = 0.0;

    // Clear anything close enough to hit the recentred car
    let clear_line = state.player.hitbox().y - config.crash_clear_buffer;
    state.obstacles.retain(|o| o.rect().bottom() <= clear_line);

    observer.stats_updated(&StatsDelta {
        crash_count: Some(1),
        no_crash_distance: Some(run),
        ..Default::default()
    });

    if state.stats.lives == 0 {
        terminate(state, observer);
    }
}

/// Enter the terminal phase. Runs once: later ticks return early.
fn terminate<O: GameObserver + ?Sized>(state: &mut GameState, observer: &mut O) {
    if state.is_terminated() {
        return;
    }
    state.phase = GamePhase::Terminated;
    log::info!(
        "Game over: score {}, level {}, distance {:.1}",
        state.stats.score,
        state.stats.level,
        state.stats.distance
    );

    observer.play_sound(Sound::GameOver);
    observer.stats_updated(&StatsDelta {
        distance: Some(state.stats.distance),
        highest_level: Some(state.stats.level),
        ..Default::default()
    });
    observer.game_over();
}

fn collect<O: GameObserver + ?Sized>(state: &mut GameState, kind: CollectibleKind, observer: &mut O) {
    log::debug!("Collected {:?}", kind);
    observer.play_sound(Sound::Collect);

    match kind {
        CollectibleKind::Fuel => state.stats.fuel_collected += 1,
        CollectibleKind::Boost => {
            state.stats.boosts_used += 1;
            state.player.velocity = state.player.max_speed;
            observer.play_sound(Sound::Boost);
        }
        CollectibleKind::Coin => state.stats.coins_collected += 1,
    }

    update_score(state, observer);
    observer.stats_updated(&StatsDelta {
        fuel_collected: Some(state.stats.fuel_collected),
        boosts_used: Some(state.stats.boosts_used),
        ..Default::default()
    });
}
