//! Session lifecycle
//!
//! A `GameSession` wraps one `GameState` and turns wall-clock frame
//! timestamps into ticks. It reports the final score to its owner exactly
//! once and then stops accepting frames.

use crate::sim::{GameState, TickInput, Viewport, tick};
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    NotStarted,
    Running,
    /// Terminal; start a new session to play again
    Ended,
}

/// Receives the end-of-run report
pub trait SessionOwner {
    fn on_session_end(&mut self, final_score: u32);
}

impl<F: FnMut(u32)> SessionOwner for F {
    fn on_session_end(&mut self, final_score: u32) {
        self(final_score)
    }
}

pub struct GameSession<O: SessionOwner> {
    owner: O,
    phase: SessionPhase,
    state: GameState,
    seed: u64,
    tuning: Tuning,
    last_timestamp: Option<f64>,
    idle_mode: bool,
    reported: bool,
}

impl<O: SessionOwner> GameSession<O> {
    pub fn new(owner: O, seed: u64, viewport: Viewport, tuning: Tuning) -> Self {
        Self {
            owner,
            phase: SessionPhase::NotStarted,
            state: GameState::new(seed, viewport, tuning.clone()),
            seed,
            tuning,
            last_timestamp: None,
            idle_mode: false,
            reported: false,
        }
    }

    /// Reset all session state and begin accepting frames
    pub fn start(&mut self) {
        if self.phase != SessionPhase::NotStarted {
            log::warn!("start() called in {:?}; ignored", self.phase);
            return;
        }
        let viewport = self.state.viewport;
        self.state = GameState::new(self.seed, viewport, self.tuning.clone());
        self.last_timestamp = None;
        self.reported = false;
        self.phase = SessionPhase::Running;
        log::info!("session started (seed {})", self.seed);
    }

    /// Run one frame at the host's timestamp. Returns true while another
    /// frame should be scheduled.
    pub fn frame(&mut self, timestamp_ms: f64) -> bool {
        if self.phase != SessionPhase::Running {
            return false;
        }

        // First frame has no previous timestamp: one nominal frame
        let elapsed = match self.last_timestamp {
            Some(prev) => timestamp_ms - prev,
            None => crate::consts::NOMINAL_FRAME_MS as f64,
        };
        self.last_timestamp = Some(timestamp_ms);
        let max_ms = (crate::consts::NOMINAL_FRAME_MS * crate::consts::MAX_FRAME_FACTOR) as f64;
        if elapsed > max_ms {
            log::warn!("frame stalled for {:.0}ms; clamped", elapsed);
        }
        let dt_ms = crate::frame_factor(elapsed) * crate::consts::NOMINAL_FRAME_MS;

        let input = TickInput {
            idle_mode: self.idle_mode,
            ..Default::default()
        };
        tick(&mut self.state, &input, dt_ms);

        if self.state.over {
            self.finish();
            return false;
        }
        true
    }

    fn finish(&mut self) {
        self.phase = SessionPhase::Ended;
        self.last_timestamp = None;
        if self.reported {
            return;
        }
        self.reported = true;
        let score = self
            .state
            .final_score
            .unwrap_or_else(|| self.state.floored_score());
        log::info!("session ended with {} points", score);
        self.owner.on_session_end(score);
    }

    pub fn jump_press(&mut self) -> bool {
        self.phase == SessionPhase::Running && crate::sim::jump_press(&mut self.state)
    }

    pub fn jump_release(&mut self) -> bool {
        self.phase == SessionPhase::Running && crate::sim::jump_release(&mut self.state)
    }

    /// Tolerates degenerate sizes; the state keeps the last valid viewport.
    pub fn resize(&mut self, width: f32, height: f32) {
        let viewport = Viewport::new(width, height);
        if !viewport.is_valid() {
            log::warn!("ignoring invalid viewport {}x{}", width, height);
            return;
        }
        self.state.resize(viewport);
    }

    /// Dispose of the session before its natural end. No report is made.
    pub fn teardown(&mut self) {
        if self.phase == SessionPhase::Running {
            log::debug!("session torn down at frame {}", self.state.frame);
        }
        self.last_timestamp = None;
        self.phase = SessionPhase::Ended;
    }

    pub fn set_idle_mode(&mut self, idle: bool) {
        self.idle_mode = idle;
    }

    pub fn idle_mode(&self) -> bool {
        self.idle_mode
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Scripted setups (tests, demos)
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn owner(&self) -> &O {
        &self.owner
    }

    pub fn owner_mut(&mut self) -> &mut O {
        &mut self.owner
    }
}
