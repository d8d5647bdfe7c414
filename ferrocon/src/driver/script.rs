//! Scripted provisioning runs.
//!
//! A run executes a command list in order, stops at the first command error,
//! waits for outstanding completions, then saves the configuration and logs
//! out. The transport is closed on every path.

use log::{info, warn};

use super::command::Command;
use super::response::Response;
use super::session::Session;
use crate::error::{CommandError, Error, Result};
use crate::transport::Transport;

/// Save the configuration, drop to user mode, log out.
pub fn closing_sequence() -> Vec<Command> {
    vec![
        Command::write_memory(),
        Command::exit_to_user(),
        Command::logout(),
    ]
}

/// Outcome of a scripted run.
#[derive(Debug, Default)]
pub struct ScriptReport {
    /// Responses of the commands that succeeded, in order.
    pub executed: Vec<Response>,

    /// The command error that stopped the run early, if any.
    pub failure: Option<CommandError>,

    /// Completion markers observed while draining.
    pub completed: Vec<String>,

    /// Responses of the closing commands.
    pub closing: Vec<Response>,
}

impl ScriptReport {
    /// Check if every scripted command succeeded.
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Runs a command list against a session.
#[derive(Debug, Clone)]
pub struct ScriptRunner {
    commands: Vec<Command>,
    closing: Vec<Command>,
}

impl ScriptRunner {
    /// Create a runner with the default closing sequence.
    pub fn new(commands: Vec<Command>) -> Self {
        Self {
            commands,
            closing: closing_sequence(),
        }
    }

    /// Replace the closing sequence.
    pub fn with_closing(mut self, closing: Vec<Command>) -> Self {
        self.closing = closing;
        self
    }

    /// Scripted commands.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Run the script and close the session.
    ///
    /// A command error stops the scripted list and is reported in
    /// [`ScriptReport::failure`]; draining and the closing sequence still run.
    /// Transport faults, drain timeouts and closing-command errors are
    /// returned as errors.
    pub async fn run<T: Transport>(&self, session: &mut Session<T>) -> Result<ScriptReport> {
        let outcome = self.run_steps(session).await;
        let closed = session.close().await;
        match (outcome, closed) {
            (Ok(report), closed) => closed.map(|()| report),
            (Err(e), Err(close_err)) => {
                warn!("Failed to close session after error: {}", close_err);
                Err(e)
            }
            (Err(e), Ok(())) => Err(e),
        }
    }

    async fn run_steps<T: Transport>(&self, session: &mut Session<T>) -> Result<ScriptReport> {
        let mut report = ScriptReport::default();

        for command in &self.commands {
            match session.execute(command).await {
                Ok(response) => {
                    info!("Command: {}\nResponse: {}", command.text(), response);
                    report.executed.push(response);
                }
                Err(Error::Command(e)) => {
                    warn!("Error executing command '{}': {}", command.text(), e);
                    report.failure = Some(e);
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        report.completed = session.drain_pending().await?;
        report.closing = session.execute_all(&self.closing).await?;

        Ok(report)
    }
}
