//! Response type for command execution results.

use std::time::Duration;

use crate::platform::AccessLevel;

/// Response from a command execution.
#[derive(Debug, Clone)]
pub struct Response {
    /// The command that was executed.
    pub command: String,

    /// Raw text the device printed after the command was sent.
    pub raw_result: String,

    /// Access level inferred from the response's trailing prompt.
    pub access_level: AccessLevel,

    /// Time taken to execute the command.
    pub elapsed: Duration,

    /// Pending completion markers that this response satisfied.
    pub completed: Vec<String>,
}

impl Response {
    /// Create a new response.
    pub fn new(
        command: impl Into<String>,
        raw_result: impl Into<String>,
        access_level: AccessLevel,
        elapsed: Duration,
    ) -> Self {
        Self {
            command: command.into(),
            raw_result: raw_result.into(),
            access_level,
            elapsed,
            completed: vec![],
        }
    }

    /// Record completion markers seen in this response.
    pub fn with_completed(mut self, completed: Vec<String>) -> Self {
        self.completed = completed;
        self
    }

    /// Get the result lines as an iterator.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.raw_result.lines()
    }

    /// Check if the result contains a substring.
    pub fn contains(&self, pattern: &str) -> bool {
        self.raw_result.contains(pattern)
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw_result)
    }
}
