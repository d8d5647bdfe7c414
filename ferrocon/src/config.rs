//! Provisioning configuration files.
//!
//! A provisioning run is described by one TOML document:
//!
//! ```toml
//! [serial]
//! port = "/dev/ttyUSB0"
//! baud_rate = 9600
//!
//! [credentials]
//! username = "admin"
//! password = "secret"
//!
//! [session]
//! drain_timeout_secs = 300
//!
//! [[commands]]
//! command = "configure terminal"
//!
//! [[commands]]
//! factory = "rsa_key"
//!
//! [[commands]]
//! command = "ip ssh"
//! validators = ["SSH enabled"]
//! error_validators = ["Invalid input"]
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::driver::{Command, Credentials, LoginPrompts, SessionConfig};
use crate::error::{ConfigError, DriverError, Result};
use crate::transport::SerialConfig;

/// A full provisioning run: link, credentials, tunables and commands.
#[derive(Debug, Deserialize)]
pub struct ProvisionConfig {
    /// Serial link settings.
    #[serde(default)]
    pub serial: SerialConfig,

    /// Console credentials.
    pub credentials: Credentials,

    /// Session tunables.
    #[serde(default)]
    pub session: SessionSettings,

    /// Commands to run, in order.
    #[serde(default)]
    commands: Vec<CommandEntry>,
}

impl ProvisionConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text).map_err(ConfigError::Parse)?)
    }

    /// Read and parse a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Resolve the command list, expanding factory entries.
    pub fn commands(&self) -> Result<Vec<Command>> {
        Ok(self
            .commands
            .iter()
            .map(CommandEntry::to_command)
            .collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Session config built from the `[session]` table.
    pub fn session_config(&self) -> Result<SessionConfig> {
        self.session.to_session_config()
    }
}

/// The `[session]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub settle_delay_ms: u64,
    pub line_ending: String,
    pub drain_interval_ms: u64,
    /// Unset means wait forever for pending completions.
    pub drain_timeout_secs: Option<u64>,
    pub login_attempts: usize,
    pub login_prompt: String,
    pub password_prompt: String,
    pub login_success: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        let login = LoginPrompts::default();
        Self {
            settle_delay_ms: 1000,
            line_ending: "\n".to_string(),
            drain_interval_ms: 1000,
            drain_timeout_secs: None,
            login_attempts: login.attempts,
            login_prompt: login.login_prompt,
            password_prompt: login.password_prompt,
            login_success: login.success_text,
        }
    }
}

impl SessionSettings {
    /// Convert to a [`SessionConfig`].
    ///
    /// A zero drain interval is rejected: draining would spin without
    /// pausing between reads.
    pub fn to_session_config(&self) -> Result<SessionConfig> {
        if self.drain_interval_ms == 0 {
            return Err(DriverError::InvalidConfig {
                message: "drain_interval_ms must be greater than zero".to_string(),
            }
            .into());
        }

        Ok(SessionConfig {
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            line_ending: self.line_ending.clone(),
            drain_interval: Duration::from_millis(self.drain_interval_ms),
            drain_timeout: self.drain_timeout_secs.map(Duration::from_secs),
            login: LoginPrompts {
                login_prompt: self.login_prompt.clone(),
                password_prompt: self.password_prompt.clone(),
                success_text: self.login_success.clone(),
                attempts: self.login_attempts,
            },
            ..SessionConfig::default()
        })
    }
}

/// One `[[commands]]` table: either a built-in command or a literal one.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum CommandEntry {
    Factory { factory: String },
    Literal(Command),
}

impl CommandEntry {
    fn to_command(&self) -> std::result::Result<Command, ConfigError> {
        match self {
            Self::Literal(command) => Ok(command.clone()),
            Self::Factory { factory } => match factory.as_str() {
                "rsa_key" => Ok(Command::rsa_key_pair()),
                "ssl_certificate" => Ok(Command::ssl_certificate()),
                "write_memory" => Ok(Command::write_memory()),
                other => Err(ConfigError::UnknownFactory {
                    name: other.to_string(),
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::Parity;

    const SAMPLE: &str = r#"
[serial]
port = "/dev/ttyUSB0"
parity = "even"

[credentials]
username = "admin"
password = "secret"

[session]
drain_timeout_secs = 120

[[commands]]
command = "configure terminal"

[[commands]]
factory = "rsa_key"

[[commands]]
command = "ip ssh"
validators = ["SSH enabled"]
error_validators = ["Invalid input"]
wait_for = "SSH server ready"
"#;

    #[test]
    fn test_parse_sample() {
        let config = ProvisionConfig::from_toml_str(SAMPLE).unwrap();

        assert_eq!(config.serial.port, "/dev/ttyUSB0");
        assert_eq!(config.serial.baud_rate, 9600);
        assert_eq!(config.serial.parity, Parity::Even);
        assert_eq!(config.credentials.username(), "admin");

        let session = config.session_config().unwrap();
        assert_eq!(session.drain_timeout, Some(Duration::from_secs(120)));
        assert_eq!(session.settle_delay, Duration::from_secs(1));
        assert_eq!(session.login.attempts, 5);
    }

    #[test]
    fn test_commands_expand_factories() {
        let config = ProvisionConfig::from_toml_str(SAMPLE).unwrap();
        let commands = config.commands().unwrap();

        assert_eq!(commands.len(), 3);
        assert_eq!(commands[0], Command::simple("configure terminal"));
        assert_eq!(commands[1], Command::rsa_key_pair());

        let ssh = &commands[2];
        assert_eq!(ssh.text(), "ip ssh");
        assert_eq!(ssh.success_markers(), ["SSH enabled"]);
        assert_eq!(ssh.error_markers(), ["Invalid input"]);
        assert_eq!(ssh.completion_marker(), Some("SSH server ready"));
    }

    #[test]
    fn test_unknown_factory() {
        let text = r#"
[credentials]
username = "admin"
password = "secret"

[[commands]]
factory = "format_flash"
"#;
        let config = ProvisionConfig::from_toml_str(text).unwrap();
        assert!(matches!(
            config.commands(),
            Err(crate::Error::Config(ConfigError::UnknownFactory { .. }))
        ));
    }

    #[test]
    fn test_missing_credentials_is_an_error() {
        assert!(ProvisionConfig::from_toml_str("[serial]\nport = \"COM3\"\n").is_err());
    }

    #[test]
    fn test_zero_drain_interval_rejected() {
        let text = r#"
[credentials]
username = "admin"
password = "secret"

[session]
drain_interval_ms = 0
"#;
        let config = ProvisionConfig::from_toml_str(text).unwrap();
        assert!(matches!(
            config.session_config(),
            Err(crate::Error::Driver(DriverError::InvalidConfig { .. }))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = ProvisionConfig::from_path("/nonexistent/ferrocon.toml").unwrap_err();
        assert!(matches!(err, crate::Error::Config(ConfigError::Read { .. })));
    }
}
