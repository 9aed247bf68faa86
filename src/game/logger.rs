//! Centralized game logger
//!
//! Verbosity-gated text output with an optional in-memory capture buffer so
//! tests can assert on what the engine reported.

use serde::{Deserialize, Serialize};

/// Verbosity level for game output
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum VerbosityLevel {
    /// Silent - no output during the game
    Silent = 0,
    /// Minimal - only the game outcome
    Minimal = 1,
    /// Normal - turns, steps and key actions (default)
    #[default]
    Normal = 2,
    /// Verbose - all actions and state changes
    Verbose = 3,
}

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputMode {
    /// Output only to stdout (default)
    #[default]
    Stdout,
    /// Capture only to the in-memory buffer (no stdout)
    Memory,
    /// Both stdout and the buffer
    Both,
}

/// A captured log entry
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct GameLogger {
    verbosity: VerbosityLevel,
    output_mode: OutputMode,
    buffer: Vec<LogEntry>,
}

impl GameLogger {
    pub fn new() -> Self {
        GameLogger::default()
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        GameLogger {
            verbosity,
            ..GameLogger::default()
        }
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    fn log(&mut self, level: VerbosityLevel, message: &str) {
        if level > self.verbosity {
            return;
        }
        match self.output_mode {
            OutputMode::Stdout => println!("{message}"),
            OutputMode::Memory => self.buffer.push(LogEntry {
                level,
                message: message.to_string(),
            }),
            OutputMode::Both => {
                println!("{message}");
                self.buffer.push(LogEntry {
                    level,
                    message: message.to_string(),
                });
            }
        }
    }

    pub fn minimal(&mut self, message: &str) {
        self.log(VerbosityLevel::Minimal, message);
    }

    pub fn normal(&mut self, message: &str) {
        self.log(VerbosityLevel::Normal, message);
    }

    pub fn verbose(&mut self, message: &str) {
        self.log(VerbosityLevel::Verbose, message);
    }

    /// Captured entries (Memory or Both output modes)
    pub fn entries(&self) -> &[LogEntry] {
        &self.buffer
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_gating() {
        let mut logger = GameLogger::with_verbosity(VerbosityLevel::Minimal);
        logger.set_output_mode(OutputMode::Memory);

        logger.minimal("outcome");
        logger.normal("turn 3");
        logger.verbose("detail");

        assert_eq!(logger.entries().len(), 1);
        assert_eq!(logger.entries()[0].message, "outcome");
    }

    #[test]
    fn test_capture_order() {
        let mut logger = GameLogger::with_verbosity(VerbosityLevel::Verbose);
        logger.set_output_mode(OutputMode::Memory);

        logger.normal("first");
        logger.verbose("second");

        let messages: Vec<_> = logger.entries().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }
}
