//! A running game session
//!
//! Owns the simulation state together with everything needed to drive it
//! (config, RNG, input sampler, renderer, observer). The host calls
//! [`GameSession::frame`] once per display refresh and stops requesting frames
//! once [`GameSession::wants_frames`] turns false.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::{CarProfile, GameConfig};
use crate::error::SimError;
use crate::platform::InputSampler;
use crate::renderer::{Renderer, Surface};
use crate::sim::{GameObserver, GamePhase, GameState, populate_initial, tick};

pub struct GameSession<O: GameObserver = (), R: Rng = Pcg32> {
    state: GameState,
    config: GameConfig,
    input: InputSampler,
    renderer: Renderer,
    rng: R,
    observer: O,
    stopped: bool,
}

impl<O: GameObserver> GameSession<O, Pcg32> {
    /// Start a session with a seeded PCG stream
    pub fn new(
        config: GameConfig,
        car: CarProfile,
        day_mode: bool,
        seed: u64,
        observer: O,
    ) -> Result<Self, SimError> {
        Self::with_rng(config, car, day_mode, Pcg32::seed_from_u64(seed), observer)
    }
}

impl<O: GameObserver, R: Rng> GameSession<O, R> {
    /// Start a session drawing randomness from `rng`
    pub fn with_rng(
        config: GameConfig,
        car: CarProfile,
        day_mode: bool,
        mut rng: R,
        observer: O,
    ) -> Result<Self, SimError> {
        config.validate()?;

        let mut state = GameState::new(&config, car, day_mode);
        populate_initial(&mut state, &config, &mut rng);

        log::info!(
            "Session started: car={} ({}), {} lanes, {} mode",
            state.player.profile.name,
            state.player.profile.id,
            config.lane_count,
            if day_mode { "day" } else { "night" }
        );

        Ok(Self {
            renderer: Renderer::new(&config),
            state,
            config,
            input: InputSampler::new(),
            rng,
            observer,
            stopped: false,
        })
    }

    /// Integrate one frame of `elapsed_ms` using the current input intent
    pub fn advance(&mut self, elapsed_ms: f32) {
        let input = self.input.intent();
        tick(
            &mut self.state,
            &self.config,
            &input,
            elapsed_ms,
            &mut self.rng,
            &mut self.observer,
        );
    }

    /// Pause or resume. Has no effect once the game is over.
    pub fn set_paused(&mut self, paused: bool) {
        let next = match (self.state.phase, paused) {
            (GamePhase::Running, true) => GamePhase::Paused,
            (GamePhase::Paused, false) => GamePhase::Running,
            _ => return,
        };
        self.state.phase = next;
        // Keys released while paused never report a key-up
        self.input.clear();
        log::info!("{}", if paused { "Paused" } else { "Resumed" });
    }

    pub fn toggle_pause(&mut self) {
        self.set_paused(!self.is_paused());
    }

    pub fn is_paused(&self) -> bool {
        self.state.phase == GamePhase::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_terminated()
    }

    /// Draw the current state
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        self.renderer.render(&self.state, surface);
    }

    /// Advance then draw. While paused nothing is drawn, so the last frame
    /// stays on screen.
    pub fn frame<S: Surface + ?Sized>(&mut self, elapsed_ms: f32, surface: &mut S) {
        if self.stopped || self.is_paused() {
            return;
        }
        self.advance(elapsed_ms);
        self.render(surface);
    }

    /// Host teardown: no more frames wanted
    pub fn stop(&mut self) {
        if !self.stopped {
            log::info!("Session stopped");
        }
        self.stopped = true;
    }

    /// Whether the host should keep scheduling frames
    pub fn wants_frames(&self) -> bool {
        !self.stopped && !self.state.is_terminated()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn input_mut(&mut self) -> &mut InputSampler {
        &mut self.input
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }
}
