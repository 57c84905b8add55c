use std::collections::VecDeque;
use std::time::Duration;

use crate::config::Validate;
use crate::snake::{Direction, EndReason, SnakeGameState, SnakeSettings, TickReport};
use crate::store::{ProgressStore, SavedProgress, StoreError};
use crate::{log, log_debug, log_warn, PlayerName, SessionRng};

/// Turns queued beyond this many are dropped until the next tick.
pub const MAX_QUEUED_TURNS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Running,
    Paused,
    Terminated(EndReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    Turn(Direction),
    TogglePause,
    Save,
    Quit,
}

/// Result of handing one command to the session.
#[derive(Debug)]
pub enum CommandOutcome {
    Accepted,
    Ignored,
    Saved(SavedProgress),
    SaveFailed(StoreError),
}

/// A single player's game: the simulation plus pause/save/quit handling.
pub struct SnakeSession {
    player: PlayerName,
    state: SnakeGameState,
    rng: SessionRng,
    phase: SessionPhase,
    queued_turns: VecDeque<Direction>,
    store: Box<dyn ProgressStore + Send>,
}

impl SnakeSession {
    /// Loads the player's saved level and score, if any. A failing store is
    /// logged and the game starts fresh.
    pub fn start(
        settings: SnakeSettings,
        player: PlayerName,
        mut store: Box<dyn ProgressStore + Send>,
        mut rng: SessionRng,
    ) -> Result<Self, String> {
        settings.validate()?;

        let saved = match store.load(&player) {
            Ok(saved) => saved,
            Err(e) => {
                log_warn!("Could not load progress for {}: {}", player, e);
                None
            }
        };

        let state = match saved {
            Some(progress) => {
                log!(
                    "Welcome back, {}! Loading level {} with score {}",
                    player,
                    progress.level,
                    progress.score
                );
                SnakeGameState::with_progress(settings, progress.level, progress.score, &mut rng)?
            }
            None => {
                log!("Starting a new game for {}", player);
                SnakeGameState::new(settings, &mut rng)?
            }
        };

        log!("Session seed: {}", rng.seed());
        Ok(Self {
            player,
            state,
            rng,
            phase: SessionPhase::Running,
            queued_turns: VecDeque::new(),
            store,
        })
    }

    pub fn handle_command(&mut self, command: SessionCommand) -> CommandOutcome {
        match (command, self.phase) {
            (SessionCommand::Quit, SessionPhase::Terminated(_)) => CommandOutcome::Ignored,
            (SessionCommand::Quit, _) => {
                log!("{} quit with score {}", self.player, self.state.score());
                self.phase = SessionPhase::Terminated(EndReason::Quit);
                self.queued_turns.clear();
                CommandOutcome::Accepted
            }
            (SessionCommand::TogglePause, SessionPhase::Running) => {
                self.phase = SessionPhase::Paused;
                CommandOutcome::Accepted
            }
            (SessionCommand::TogglePause, SessionPhase::Paused) => {
                self.phase = SessionPhase::Running;
                CommandOutcome::Accepted
            }
            (SessionCommand::Turn(direction), SessionPhase::Running) => {
                if self.queued_turns.len() >= MAX_QUEUED_TURNS {
                    log_debug!("Turn queue full, dropping {:?}", direction);
                    return CommandOutcome::Ignored;
                }
                self.queued_turns.push_back(direction);
                CommandOutcome::Accepted
            }
            (SessionCommand::Save, SessionPhase::Paused) => self.save(),
            _ => CommandOutcome::Ignored,
        }
    }

    fn save(&mut self) -> CommandOutcome {
        let progress = SavedProgress::new(self.state.level(), self.state.score());
        match self.store.save(&self.player, progress) {
            Ok(()) => CommandOutcome::Saved(progress),
            Err(e) => CommandOutcome::SaveFailed(e),
        }
    }

    /// Runs one simulation tick, consuming at most one queued turn.
    /// Returns `None` while paused or after the game ended.
    pub fn advance(&mut self) -> Option<TickReport> {
        if self.phase != SessionPhase::Running {
            return None;
        }

        let turn = self.queued_turns.pop_front();
        let report = self.state.tick(turn, &mut self.rng);
        if let Some(reason) = report.end_reason {
            self.phase = SessionPhase::Terminated(reason);
            self.queued_turns.clear();
        }
        Some(report)
    }

    pub fn tick_interval(&self) -> Duration {
        let speed = match self.phase {
            SessionPhase::Paused => self.state.settings().paused_speed,
            _ => self.state.speed(),
        };
        SnakeSettings::tick_interval(speed)
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self.phase, SessionPhase::Terminated(_))
    }

    pub fn state(&self) -> &SnakeGameState {
        &self.state
    }

    pub fn player(&self) -> &PlayerName {
        &self.player
    }

    /// Lets a caller-side controller (e.g. a bot) draw from the session RNG.
    pub fn state_and_rng(&mut self) -> (&SnakeGameState, &mut SessionRng) {
        (&self.state, &mut self.rng)
    }
}
