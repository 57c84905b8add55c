use std::fmt;
use std::sync::OnceLock;
use chrono::Local;

static LOGGER: OnceLock<Logger> = OnceLock::new();

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        };
        write!(f, "{}", tag)
    }
}

pub struct Logger {
    prefix: Option<String>,
    min_level: LogLevel,
}

impl Logger {
    fn new(prefix: Option<String>, min_level: LogLevel) -> Self {
        Self { prefix, min_level }
    }

    pub fn log(&self, level: LogLevel, message: &str) {
        if level < self.min_level {
            return;
        }
        let line = format_line(self.prefix.as_deref(), level, message);
        if level >= LogLevel::Warn {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

fn format_line(prefix: Option<&str>, level: LogLevel, message: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    match prefix {
        Some(prefix) => format!("[{}][{}][{}] {}", timestamp, prefix, level, message),
        None => format!("[{}][{}] {}", timestamp, level, message),
    }
}

/// Installs the process-wide logger. Later calls are ignored.
pub fn init_logger(prefix: Option<String>, min_level: LogLevel) {
    LOGGER.get_or_init(|| Logger::new(prefix, min_level));
}

pub fn log(level: LogLevel, message: &str) {
    if let Some(logger) = LOGGER.get() {
        logger.log(level, message);
    } else if level >= LogLevel::Info {
        eprintln!("{}", format_line(None, level, message));
    }
}

#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        $crate::logger::log($crate::logger::LogLevel::Info, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::logger::log($crate::logger::LogLevel::Debug, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::logger::log($crate::logger::LogLevel::Warn, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::logger::log($crate::logger::LogLevel::Error, &format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line_with_prefix() {
        let line = format_line(Some("Client"), LogLevel::Warn, "low on food");
        assert!(line.contains("[Client][WARN] low on food"));
    }

    #[test]
    fn test_format_line_without_prefix() {
        let line = format_line(None, LogLevel::Info, "started");
        assert!(line.ends_with("[INFO] started"));
    }

    #[test]
    fn test_levels_are_ordered() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Warn < LogLevel::Error);
    }
}
