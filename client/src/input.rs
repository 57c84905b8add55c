use std::io::BufRead;

use common::session::SessionCommand;
use common::snake::Direction;
use common::{log, log_debug};
use tokio::sync::mpsc;

pub const HELP: &str = "Commands: u/d/l/r (or up/down/left/right) turn, p pause, s save (while paused), q quit";

/// Maps one line of console input to a session command. Unknown input is `None`.
pub fn parse_command(line: &str) -> Option<SessionCommand> {
    let command = match line.trim().to_ascii_lowercase().as_str() {
        "u" | "up" | "w" => SessionCommand::Turn(Direction::Up),
        "d" | "down" => SessionCommand::Turn(Direction::Down),
        "l" | "left" | "a" => SessionCommand::Turn(Direction::Left),
        "r" | "right" => SessionCommand::Turn(Direction::Right),
        "p" | "pause" => SessionCommand::TogglePause,
        "s" | "save" => SessionCommand::Save,
        "q" | "quit" | "exit" => SessionCommand::Quit,
        _ => return None,
    };
    Some(command)
}

/// Forwards parsed console commands until stdin closes or the receiver is dropped.
///
/// Runs on a plain thread so a pending blocking read never holds up runtime shutdown.
pub fn spawn_stdin_reader(
    command_tx: mpsc::UnboundedSender<SessionCommand>,
) -> std::io::Result<std::thread::JoinHandle<()>> {
    std::thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        log!("Stopped reading input: {}", e);
                        break;
                    }
                };
                let Some(command) = parse_command(&line) else {
                    log_debug!("Ignoring unknown input {:?}", line.trim());
                    continue;
                };
                if command_tx.send(command).is_err() {
                    break;
                }
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_turns() {
        assert_eq!(parse_command("u"), Some(SessionCommand::Turn(Direction::Up)));
        assert_eq!(parse_command(" LEFT "), Some(SessionCommand::Turn(Direction::Left)));
        assert_eq!(parse_command("r"), Some(SessionCommand::Turn(Direction::Right)));
        assert_eq!(parse_command("down"), Some(SessionCommand::Turn(Direction::Down)));
    }

    #[test]
    fn test_parse_controls() {
        assert_eq!(parse_command("p"), Some(SessionCommand::TogglePause));
        assert_eq!(parse_command("save"), Some(SessionCommand::Save));
        assert_eq!(parse_command("q"), Some(SessionCommand::Quit));
    }

    #[test]
    fn test_unknown_input_ignored() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("jump"), None);
    }
}
