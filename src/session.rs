//! One mounted game screen
//!
//! Owns everything that lives exactly as long as the game screen: the
//! simulation state, the keyboard table, the persistence handle and the
//! framebuffer the renderer draws into. The frame driver calls into it once
//! per display refresh.

use crate::consts::{LOGICAL_HEIGHT, LOGICAL_WIDTH};
use crate::persistence::{KeyValueStore, load_best, save_best};
use crate::platform::input::{InputMapper, KeyResponse, KeyboardState};
use crate::renderer::{Framebuffer, draw_frame};
use crate::sim::{Controls, GameState, PauseState, TickOutcome, tick};
use crate::tuning::Tuning;

pub struct GameSession<K: KeyValueStore> {
    state: GameState,
    keyboard: KeyboardState,
    mapper: InputMapper,
    store: K,
    tuning: Tuning,
    frame: Framebuffer,
}

impl<K: KeyValueStore> GameSession<K> {
    /// Start a fresh session, seeding the best distance from `store`
    pub fn mount(store: K, tuning: Tuning) -> Self {
        let best = load_best(&store);
        log::info!("Game screen mounted (best {:.0} m)", best);
        Self {
            state: GameState::new(best),
            keyboard: KeyboardState::new(),
            mapper: InputMapper::new(),
            store,
            tuning,
            frame: Framebuffer::new(LOGICAL_WIDTH, LOGICAL_HEIGHT),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    /// Hand the store back (the session is being discarded)
    pub fn into_store(self) -> K {
        self.store
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.frame
    }

    pub fn key_down(&mut self, key: &str) -> KeyResponse {
        self.keyboard.key_down(key)
    }

    pub fn key_up(&mut self, key: &str) -> KeyResponse {
        self.keyboard.key_up(key)
    }

    pub fn release_keys(&mut self) {
        self.keyboard.release_all();
    }

    /// Snapshot the keyboard into this frame's control signal
    pub fn sample_controls(&mut self) -> Controls {
        self.mapper.sample(&mut self.keyboard)
    }

    /// Run one simulation step and persist a new best if one was reached
    pub fn step(&mut self, controls: &Controls, dt: f32) -> TickOutcome {
        let outcome = tick(&mut self.state, controls, dt, &self.tuning);
        if let Some(best) = outcome.new_best {
            log::debug!("New best distance {:.1} m", best);
            save_best(&mut self.store, best);
        }
        outcome
    }

    /// Redraw the framebuffer from the current state
    pub fn render(&mut self, pause: PauseState) {
        draw_frame(&mut self.frame, &self.state, pause, &self.tuning);
    }
}
