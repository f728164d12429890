//! Game session: the lifecycle surface the host drives
//!
//! Menu → Playing → Defeated. The host calls [`Session::frame`] once per
//! display refresh with wall time; the session runs the frame step and the
//! spawner timer from it and records the high score when the run ends.

use glam::Vec2;

use crate::config::SimConfig;
use crate::consts::{FRAME_MS, MAX_FRAME_SCALE};
use crate::error::Result;
use crate::highscore::{HighScore, ScoreStore};
use crate::sim::{GameEvent, GamePhase, GameState, HudSnapshot, TickInput, fire, spawner, tick};

/// Result of one host frame
#[derive(Debug, Clone)]
pub struct FrameOutput {
    pub events: Vec<GameEvent>,
    pub hud: HudSnapshot,
}

/// A single run plus its high score storage
pub struct Session {
    state: GameState,
    high_score: HighScore,
    store: Box<dyn ScoreStore>,
    /// The end of the run has been handled
    finished: bool,
}

impl Session {
    /// Create a run in the menu, loading the stored high score.
    /// Fails if the config does not validate.
    pub fn new(config: SimConfig, seed: u64, store: Box<dyn ScoreStore>) -> Result<Self> {
        config.validate()?;
        let high_score = HighScore::load(&*store);
        Ok(Self {
            state: GameState::new(config, seed),
            high_score,
            store,
            finished: false,
        })
    }

    /// Resume from a saved or scripted state
    pub fn from_state(state: GameState, store: Box<dyn ScoreStore>) -> Result<Self> {
        state.config.validate()?;
        let high_score = HighScore::load(&*store);
        let finished = state.phase == GamePhase::Defeated;
        Ok(Self {
            state,
            high_score,
            store,
            finished,
        })
    }

    /// Leave the menu and begin spawning
    pub fn start(&mut self) -> bool {
        self.state.start()
    }

    /// Advance by `elapsed_ms` of wall time
    pub fn frame(&mut self, input: &TickInput, elapsed_ms: f32) -> FrameOutput {
        let elapsed_ms = elapsed_ms.clamp(0.0, FRAME_MS * MAX_FRAME_SCALE);
        let dt = elapsed_ms / FRAME_MS;

        let mut events = tick(&mut self.state, input, dt);
        events.extend(spawner::advance(&mut self.state, elapsed_ms));

        if self.state.phase == GamePhase::Defeated && !self.finished {
            self.finish();
        }

        let hud = HudSnapshot::capture(&self.state, &events, self.high_score.best);
        FrameOutput { events, hud }
    }

    /// Pointer-down handler: fire toward `target`
    pub fn pointer_down(&mut self, target: Vec2) -> Vec<GameEvent> {
        fire(&mut self.state, target)
    }

    fn finish(&mut self) {
        self.finished = true;
        let score = self.state.score;
        if self.high_score.record(score) {
            log::info!("New high score: {}", score);
            self.high_score.save(&mut *self.store);
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.best
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot::capture(&self.state, &[], self.high_score.best)
    }
}
