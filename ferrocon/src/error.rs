//! Error types for ferrocon.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Main error type for ferrocon operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Byte-stream transport errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Login handshake errors
    #[error("Login error: {0}")]
    Login(#[from] LoginError),

    /// A command was rejected by its markers
    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    /// Session lifecycle errors
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// Configuration loading errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Completion markers that never showed up within the drain budget
    #[error("Pending completions not observed after {waited:?}: {markers:?}")]
    PendingTimeout {
        markers: Vec<String>,
        waited: Duration,
    },
}

/// Transport layer errors (serial port, I/O).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to open the endpoint
    #[error("Failed to open {port}: {source}")]
    OpenFailed {
        port: String,
        #[source]
        source: serialport::Error,
    },

    /// Serial port driver error
    #[error("Serial error: {0}")]
    Serial(#[from] serialport::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Transport was already closed
    #[error("Transport closed")]
    Closed,
}

/// Login handshake errors.
#[derive(Error, Debug)]
pub enum LoginError {
    /// The login-name prompt never appeared
    #[error("Login prompt not found after {attempts} attempts")]
    PromptNotFound { attempts: usize },

    /// An intermediate prompt was missing from the device's reply
    #[error("Expected '{expected}' during login, got: {response:?}")]
    ProtocolMismatch { expected: String, response: String },

    /// The device did not confirm the credentials
    #[error("Authentication failed for user '{user}': {response:?}")]
    AuthenticationFailed { user: String, response: String },

    /// The console still shows no prompt after the handshake
    #[error("Console still logged out after login: {response:?}")]
    StillLoggedOut { response: String },
}

/// Command execution errors.
///
/// Both variants carry the command text and the full raw response.
#[derive(Error, Debug)]
pub enum CommandError {
    /// An error marker was found in the response
    #[error("Command '{command}' hit error marker '{marker}'\nResponse: {response}")]
    ErrorMarker {
        command: String,
        marker: String,
        response: String,
    },

    /// None of the success markers were found in the response
    #[error("Command '{command}' failed validation.\nResponse: {response}")]
    ValidationFailed { command: String, response: String },
}

impl CommandError {
    /// The command text that failed.
    pub fn command(&self) -> &str {
        match self {
            Self::ErrorMarker { command, .. } | Self::ValidationFailed { command, .. } => command,
        }
    }

    /// The raw response that caused the failure.
    pub fn response(&self) -> &str {
        match self {
            Self::ErrorMarker { response, .. } | Self::ValidationFailed { response, .. } => {
                response
            }
        }
    }
}

/// Session lifecycle errors.
#[derive(Error, Debug)]
pub enum DriverError {
    /// Session was closed
    #[error("Session not open")]
    NotOpen,

    /// Invalid session configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Configuration file errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Could not read the file
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    /// TOML syntax or schema error
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Unknown factory command name
    #[error("Unknown command factory '{name}'")]
    UnknownFactory { name: String },
}

/// Result type alias using ferrocon's Error.
pub type Result<T> = std::result::Result<T, Error>;
