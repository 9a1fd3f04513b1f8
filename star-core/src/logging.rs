//! Tagged, leveled logging, mirroring the colored `info:`/`warning:`/
//! `error:`/`verbose:` tags of the original archiver's log module, but
//! threaded through as an injected [`Logger`] rather than a process-wide
//! mutable verbose flag.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Verbose,
}

impl LogLevel {
    fn ansi_color(self) -> &'static str {
        match self {
            LogLevel::Info => "\x1b[34m",    // blue
            LogLevel::Warning => "\x1b[33m", // yellow
            LogLevel::Error => "\x1b[31m",   // red
            LogLevel::Verbose => "\x1b[32m", // green
        }
    }

    fn tag(self) -> &'static str {
        match self {
            LogLevel::Info => "info:",
            LogLevel::Warning => "warning:",
            LogLevel::Error => "error:",
            LogLevel::Verbose => "verbose:",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}\x1b[0m", self.ansi_color(), self.tag())
    }
}

/// A sink for operation-driver log messages. Implementations decide where
/// messages go and whether [`LogLevel::Verbose`] is suppressed.
pub trait Logger {
    fn log(&self, level: LogLevel, message: &str);

    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    fn warning(&self, message: &str) {
        self.log(LogLevel::Warning, message);
    }

    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    fn verbose(&self, message: &str) {
        self.log(LogLevel::Verbose, message);
    }
}

/// Prints tagged messages to stdout, suppressing [`LogLevel::Verbose`]
/// unless constructed with `verbose = true`.
pub struct ConsoleLogger {
    verbose: bool,
}

impl ConsoleLogger {
    pub fn new(verbose: bool) -> Self {
        ConsoleLogger { verbose }
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, level: LogLevel, message: &str) {
        if level == LogLevel::Verbose && !self.verbose {
            return;
        }
        println!("{} {}", level, message);
    }
}

/// Discards everything. Used by tests that don't care about log output.
pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _level: LogLevel, _message: &str) {}
}
