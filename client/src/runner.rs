use std::io;
use std::time::Duration;

use common::render::{Frame, Renderer};
use common::session::{CommandOutcome, SessionCommand, SessionPhase, SnakeSession};
use common::snake::{BotController, BotKind, EndReason};
use common::{log, log_error, log_warn};
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

fn tick_timer(period: Duration) -> Interval {
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

fn render(session: &SnakeSession, renderer: &mut impl Renderer) {
    renderer.render(&Frame::new(session.state(), session.phase()));
}

pub fn apply_command(session: &mut SnakeSession, command: SessionCommand) {
    match session.handle_command(command) {
        CommandOutcome::Saved(progress) => {
            log!("Game saved! Level: {}, Score: {}", progress.level, progress.score);
        }
        CommandOutcome::SaveFailed(e) => {
            log_error!("Save failed: {}", e);
        }
        CommandOutcome::Accepted | CommandOutcome::Ignored => {}
    }
}

/// Quits on a delivered Ctrl+C. Returns whether the signal is still worth
/// listening for.
fn handle_ctrl_c(session: &mut SnakeSession, signal: io::Result<()>) -> bool {
    match signal {
        Ok(()) => {
            log!("Ctrl+C received, quitting");
            apply_command(session, SessionCommand::Quit);
            true
        }
        Err(e) => {
            log_warn!("Could not listen for Ctrl+C: {}", e);
            false
        }
    }
}

/// Drives the session at its current speed until it terminates.
///
/// Commands are applied as they arrive; at most one queued turn is consumed
/// per tick. With a bot, the bot queues a turn right before each tick.
pub async fn run_snake_game(
    session: &mut SnakeSession,
    command_rx: &mut mpsc::UnboundedReceiver<SessionCommand>,
    renderer: &mut impl Renderer,
    bot: Option<BotKind>,
    quit_on_input_close: bool,
) -> EndReason {
    let mut period = session.tick_interval();
    let mut timer = tick_timer(period);
    let mut input_open = true;
    let mut ctrl_c_armed = true;

    render(session, renderer);

    loop {
        tokio::select! {
            _ = timer.tick() => {
                if let Some(kind) = bot
                    && session.phase() == SessionPhase::Running
                {
                    let (state, rng) = session.state_and_rng();
                    if let Some(direction) = BotController::calculate_move(kind, state, rng) {
                        session.handle_command(SessionCommand::Turn(direction));
                    }
                }

                if let Some(report) = session.advance()
                    && report.food_expired
                {
                    log!("Food expired and moved");
                }
                render(session, renderer);
            }
            command = command_rx.recv(), if input_open => {
                match command {
                    Some(command) => {
                        let before = session.phase();
                        apply_command(session, command);
                        if session.phase() != before {
                            render(session, renderer);
                        }
                    }
                    None => {
                        input_open = false;
                        if quit_on_input_close {
                            log!("Input closed, quitting");
                            apply_command(session, SessionCommand::Quit);
                        }
                    }
                }
            }
            signal = tokio::signal::ctrl_c(), if ctrl_c_armed => {
                ctrl_c_armed = handle_ctrl_c(session, signal);
            }
        }

        if let SessionPhase::Terminated(reason) = session.phase() {
            render(session, renderer);
            return reason;
        }

        let wanted = session.tick_interval();
        if wanted != period {
            period = wanted;
            timer = tick_timer(period);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::snake::SnakeSettings;
    use common::store::MemoryProgressStore;
    use common::{PlayerName, SessionRng};

    struct CountingRenderer {
        frames: usize,
        last_phase: Option<SessionPhase>,
    }

    impl Renderer for CountingRenderer {
        fn render(&mut self, frame: &Frame<'_>) {
            self.frames += 1;
            self.last_phase = Some(frame.phase);
        }
    }

    fn session() -> SnakeSession {
        let mut settings = SnakeSettings::classic();
        settings.base_speed = 100;
        SnakeSession::start(
            settings,
            PlayerName::parse("runner").unwrap(),
            Box::new(MemoryProgressStore::new()),
            SessionRng::new(17),
        )
        .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_unsteered_snake_hits_wall() {
        let mut session = session();
        let (_tx, mut rx) = mpsc::unbounded_channel();
        let mut renderer = CountingRenderer { frames: 0, last_phase: None };

        let reason = run_snake_game(&mut session, &mut rx, &mut renderer, None, false).await;

        assert!(matches!(reason, EndReason::Collision(_)));
        assert!(renderer.frames > 1);
        assert_eq!(renderer.last_phase, Some(SessionPhase::Terminated(reason)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_quit_command_ends_game() {
        let mut session = session();
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.send(SessionCommand::TogglePause).unwrap();
        tx.send(SessionCommand::Quit).unwrap();
        let mut renderer = CountingRenderer { frames: 0, last_phase: None };

        let reason = run_snake_game(&mut session, &mut rx, &mut renderer, None, false).await;

        assert_eq!(reason, EndReason::Quit);
        assert_eq!(session.state().ticks(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_input_quits_when_requested() {
        let mut session = session();
        let (tx, mut rx) = mpsc::unbounded_channel::<SessionCommand>();
        drop(tx);
        let mut renderer = CountingRenderer { frames: 0, last_phase: None };

        let reason = run_snake_game(&mut session, &mut rx, &mut renderer, None, true).await;

        assert_eq!(reason, EndReason::Quit);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bot_collects_food() {
        let mut session = session();
        let (_tx, mut rx) = mpsc::unbounded_channel();
        let mut renderer = CountingRenderer { frames: 0, last_phase: None };

        let _ = tokio::time::timeout(
            Duration::from_secs(5),
            run_snake_game(&mut session, &mut rx, &mut renderer, Some(BotKind::Greedy), false),
        )
        .await;

        assert!(session.state().ticks() > 0);
        assert!(session.state().score() > 0);
    }

    #[test]
    fn test_ctrl_c_listener_failure_does_not_quit() {
        let mut session = session();
        let failure = io::Error::other("no signal handler");

        assert!(!handle_ctrl_c(&mut session, Err(failure)));
        assert_eq!(session.phase(), SessionPhase::Running);

        assert!(handle_ctrl_c(&mut session, Ok(())));
        assert_eq!(session.phase(), SessionPhase::Terminated(EndReason::Quit));
    }
}
