//! Session configuration and builder.

use std::time::Duration;

use secrecy::SecretString;

use super::login::{Credentials, LoginPrompts};
use super::session::Session;
use crate::channel::ChannelConfig;
use crate::error::Result;
use crate::platform::PromptClassifier;
use crate::transport::{SerialConfig, SerialTransport, Transport};

/// Tunables for a console session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Pause between sending a line and reading the response.
    pub settle_delay: Duration,

    /// Terminator appended to each line.
    pub line_ending: String,

    /// Pause between reads while draining pending completions.
    pub drain_interval: Duration,

    /// Upper bound on the drain; `None` waits forever.
    pub drain_timeout: Option<Duration>,

    /// Login handshake texts and probe limit.
    pub login: LoginPrompts,

    /// Prompt classification rules.
    pub classifier: PromptClassifier,
}

impl SessionConfig {
    /// Channel settings derived from this config.
    pub fn channel_config(&self) -> ChannelConfig {
        ChannelConfig {
            settle_delay: self.settle_delay,
            line_ending: self.line_ending.clone(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_secs(1),
            line_ending: "\n".to_string(),
            drain_interval: Duration::from_secs(1),
            drain_timeout: None,
            login: LoginPrompts::default(),
            classifier: PromptClassifier::default(),
        }
    }
}

/// Builder for opening console sessions.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use ferrocon::{SerialConfig, SessionBuilder};
///
/// # async fn example() -> Result<(), ferrocon::Error> {
/// let mut session = SessionBuilder::new()
///     .username("admin")
///     .password("secret")
///     .drain_timeout(Duration::from_secs(120))
///     .open_serial(&SerialConfig::new("/dev/ttyUSB0"))
///     .await?;
///
/// session.close().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct SessionBuilder {
    username: String,
    password: Option<SecretString>,
    config: SessionConfig,
}

impl SessionBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the login name.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Set the password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(SecretString::from(password.into()));
        self
    }

    /// Set the settle delay before each read.
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.config.settle_delay = delay;
        self
    }

    /// Set the line terminator.
    pub fn line_ending(mut self, ending: impl Into<String>) -> Self {
        self.config.line_ending = ending.into();
        self
    }

    /// Set the pause between drain reads.
    pub fn drain_interval(mut self, interval: Duration) -> Self {
        self.config.drain_interval = interval;
        self
    }

    /// Bound the drain of pending completions.
    pub fn drain_timeout(mut self, timeout: Duration) -> Self {
        self.config.drain_timeout = Some(timeout);
        self
    }

    /// Override the login texts.
    pub fn login_prompts(mut self, prompts: LoginPrompts) -> Self {
        self.config.login = prompts;
        self
    }

    /// Override the prompt classifier.
    pub fn classifier(mut self, classifier: PromptClassifier) -> Self {
        self.config.classifier = classifier;
        self
    }

    /// Replace the whole session config.
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Open a session over an existing transport.
    pub async fn open<T: Transport>(self, transport: T) -> Result<Session<T>> {
        let password = self
            .password
            .unwrap_or_else(|| SecretString::from(String::new()));
        let credentials = Credentials::from_secret(self.username, password);
        Session::open(transport, &credentials, self.config).await
    }

    /// Open the serial port and a session over it.
    pub async fn open_serial(self, serial: &SerialConfig) -> Result<Session<SerialTransport>> {
        let transport = SerialTransport::open(serial)?;
        self.open(transport).await
    }
}
