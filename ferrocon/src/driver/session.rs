//! Console session engine.
//!
//! A [`Session`] owns the transport for its whole lifetime. It logs in,
//! tracks the console's access level, runs commands one at a time and keeps
//! the set of completion markers still expected from the device.

use std::fmt;
use std::time::Instant;

use log::{debug, info, warn};

use super::builder::SessionConfig;
use super::command::Command;
use super::login::{Credentials, LoginSequencer};
use super::pending::PendingCompletions;
use super::response::Response;
use crate::channel::ConsoleChannel;
use crate::error::{DriverError, Error, LoginError, Result};
use crate::platform::AccessLevel;
use crate::transport::Transport;

/// A logged-in console session.
pub struct Session<T: Transport> {
    /// Line channel over the owned transport.
    channel: ConsoleChannel<T>,

    /// Access level from the latest classified response.
    access_level: AccessLevel,

    /// Completion markers not yet observed.
    pending: PendingCompletions,

    /// Session tunables.
    config: SessionConfig,

    /// Whether `close()` has run.
    closed: bool,
}

impl<T: Transport> Session<T> {
    /// Open a session: probe the console, log in if needed.
    ///
    /// Fails if the console is still logged out after the handshake. The
    /// transport is closed on failure.
    pub async fn open(transport: T, credentials: &Credentials, config: SessionConfig) -> Result<Self> {
        let mut channel = ConsoleChannel::new(transport, config.channel_config());

        match Self::handshake(&mut channel, credentials, &config).await {
            Ok(access_level) => {
                info!("Session open at {} level", access_level);
                Ok(Self {
                    channel,
                    access_level,
                    pending: PendingCompletions::new(),
                    config,
                    closed: false,
                })
            }
            Err(e) => {
                if let Err(close_err) = channel.close().await {
                    warn!("Failed to close transport after login error: {}", close_err);
                }
                Err(e)
            }
        }
    }

    async fn handshake(
        channel: &mut ConsoleChannel<T>,
        credentials: &Credentials,
        config: &SessionConfig,
    ) -> Result<AccessLevel> {
        let mut response = channel.exchange("").await?;
        let mut level = config.classifier.classify(&response);
        debug!("initial access level: {}", level);

        if level == AccessLevel::LoggedOut {
            let mut login = LoginSequencer::new(credentials, &config.login);
            response = login.run(channel, response).await?;
            level = config.classifier.classify(&response);
        }

        if level == AccessLevel::LoggedOut {
            return Err(LoginError::StillLoggedOut { response }.into());
        }
        Ok(level)
    }

    /// Send a command, read its response and validate it.
    ///
    /// On success the command's completion marker, if any, starts pending.
    /// Validation failures return [`CommandError`](crate::error::CommandError) and leave the access level
    /// and the pending set untouched, except for markers this response
    /// happened to complete.
    pub async fn execute(&mut self, command: &Command) -> Result<Response> {
        self.ensure_open()?;
        let start = Instant::now();

        self.channel.send(command.text()).await?;
        let raw = self.channel.poll().await?;
        let completed = self.observe(&raw);

        command.check(&raw)?;

        if let Some(marker) = command.completion_marker() {
            if raw.contains(marker) {
                debug!("'{}' completed immediately", command.text());
            } else if self.pending.register(marker) {
                info!("Waiting for completion of '{}': {:?}", command.text(), marker);
            }
        }

        let level = self.config.classifier.classify(&raw);
        self.update_level(level);

        info!("Command: {}", command.text());
        Ok(Response::new(command.text(), raw, level, start.elapsed()).with_completed(completed))
    }

    /// Run several commands in order, stopping at the first error.
    pub async fn execute_all(&mut self, commands: &[Command]) -> Result<Vec<Response>> {
        let mut responses = Vec::with_capacity(commands.len());
        for command in commands {
            responses.push(self.execute(command).await?);
        }
        Ok(responses)
    }

    /// Poll until every pending completion marker has been observed.
    ///
    /// Each round sleeps the drain interval and reads whatever arrived.
    /// Returns the markers in the order they were observed. With a drain
    /// timeout configured, gives up with [`Error::PendingTimeout`].
    pub async fn drain_pending(&mut self) -> Result<Vec<String>> {
        self.ensure_open()?;
        let start = tokio::time::Instant::now();
        let mut resolved = Vec::new();

        while !self.pending.is_empty() {
            if let Some(limit) = self.config.drain_timeout {
                let waited = start.elapsed();
                if waited >= limit {
                    warn!("Gave up waiting for {:?}", self.pending.to_vec());
                    return Err(Error::PendingTimeout {
                        markers: self.pending.to_vec(),
                        waited,
                    });
                }
            }

            info!(
                "Waiting for {} async command completion(s)...",
                self.pending.len()
            );
            let raw = self.channel.poll_with(self.config.drain_interval).await?;
            if !raw.is_empty() {
                info!("Response: {}", raw);
            }
            resolved.extend(self.observe(&raw));
        }

        Ok(resolved)
    }

    /// Send an empty line and re-derive the access level from the prompt.
    ///
    /// A logged-out result is returned but not stored.
    pub async fn probe(&mut self) -> Result<AccessLevel> {
        self.ensure_open()?;
        let raw = self.channel.exchange("").await?;
        self.observe(&raw);

        let level = self.config.classifier.classify(&raw);
        self.update_level(level);
        Ok(level)
    }

    /// Release the transport. Calling this more than once is a no-op.
    pub async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.channel.close().await?;
        info!("Session closed");
        Ok(())
    }

    /// Current access level.
    pub fn access_level(&self) -> AccessLevel {
        self.access_level
    }

    /// Completion markers still expected.
    pub fn pending(&self) -> &PendingCompletions {
        &self.pending
    }

    /// Check if the session is still open.
    pub fn is_open(&self) -> bool {
        !self.closed
    }

    /// Get a reference to the transport.
    pub fn transport(&self) -> &T {
        self.channel.transport()
    }

    /// Get the session config.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(DriverError::NotOpen.into());
        }
        Ok(())
    }

    fn observe(&mut self, raw: &str) -> Vec<String> {
        let completed = self.pending.observe(raw);
        for marker in &completed {
            info!("Async completion observed: {:?}", marker);
        }
        completed
    }

    fn update_level(&mut self, level: AccessLevel) {
        if level.is_logged_in() && level != self.access_level {
            debug!("access level: {} -> {}", self.access_level, level);
            self.access_level = level;
        }
    }
}

impl<T: Transport> fmt::Debug for Session<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_level", &self.access_level)
            .field("pending", &self.pending)
            .field("config", &self.config)
            .field("closed", &self.closed)
            .finish()
    }
}

impl<T: Transport> Drop for Session<T> {
    fn drop(&mut self) {
        if !self.closed {
            warn!("Session dropped without close()");
        }
    }
}
