//! Commands and response validation.
//!
//! A [`Command`] declares how its immediate response is judged:
//!
//! 1. any error marker present → [`Outcome::ErrorMatched`], even if a success
//!    marker is also present
//! 2. no success markers declared → [`Outcome::Success`]
//! 3. otherwise success iff at least one success marker is present
//!
//! A command may also declare a completion marker: text the device prints
//! later, once a long-running operation (key generation, certificate
//! creation) has finished.

use serde::Deserialize;

use crate::error::CommandError;

/// Outcome of validating a response against a command's markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The response satisfied the command.
    Success,

    /// None of the success markers were present.
    Failure,

    /// An error marker was present.
    ErrorMatched(String),
}

impl Outcome {
    /// Check if the outcome is a success.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// A console command and the markers used to judge it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Command {
    #[serde(alias = "command")]
    text: String,

    #[serde(default, alias = "validators", alias = "success")]
    success_markers: Vec<String>,

    #[serde(default, alias = "error_validators", alias = "errors")]
    error_markers: Vec<String>,

    #[serde(default, alias = "wait_for", alias = "completion")]
    completion_marker: Option<String>,
}

impl Command {
    /// Create a command with no markers.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success_markers: vec![],
            error_markers: vec![],
            completion_marker: None,
        }
    }

    /// Alias for [`Command::new`]: any non-error response is a success.
    pub fn simple(text: impl Into<String>) -> Self {
        Self::new(text)
    }

    /// Add a success marker.
    pub fn with_success(mut self, marker: impl Into<String>) -> Self {
        self.success_markers.push(marker.into());
        self
    }

    /// Add an error marker.
    pub fn with_error(mut self, marker: impl Into<String>) -> Self {
        self.error_markers.push(marker.into());
        self
    }

    /// Set the completion marker expected in a later response.
    pub fn with_completion(mut self, marker: impl Into<String>) -> Self {
        self.completion_marker = Some(marker.into());
        self
    }

    /// Generate the device's RSA key pair.
    ///
    /// Completes asynchronously, several seconds after the command returns.
    pub fn rsa_key_pair() -> Self {
        Self::new("crypto key generate rsa")
            .with_success("Creating RSA key pair, please wait")
            .with_success("Key already exists")
            .with_completion("RSA Key pair is successfully created")
    }

    /// Generate the device's self-signed SSL certificate.
    pub fn ssl_certificate() -> Self {
        Self::new("crypto-ssl certificate generate")
            .with_success("Creating certificate, please wait")
            .with_completion("ssl-certificate creation is successful")
    }

    /// Save the running configuration.
    pub fn write_memory() -> Self {
        Self::new("write memory").with_success("Configuration saved to NVRAM")
    }

    /// Leave privileged mode for user mode.
    pub fn exit_to_user() -> Self {
        Self::new("exit").with_success(">")
    }

    /// Log out of the console.
    pub fn logout() -> Self {
        Self::new("exit").with_success("Press Enter key to login")
    }

    /// The literal line sent to the device.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Success markers; empty means any non-error response succeeds.
    pub fn success_markers(&self) -> &[String] {
        &self.success_markers
    }

    /// Error markers, checked before success markers.
    pub fn error_markers(&self) -> &[String] {
        &self.error_markers
    }

    /// Marker expected in a later, unsolicited response.
    pub fn completion_marker(&self) -> Option<&str> {
        self.completion_marker.as_deref()
    }

    /// Judge a response against this command's markers.
    pub fn validate(&self, response: &str) -> Outcome {
        if let Some(marker) = self
            .error_markers
            .iter()
            .find(|marker| response.contains(marker.as_str()))
        {
            return Outcome::ErrorMatched(marker.clone());
        }

        if self.success_markers.is_empty()
            || self
                .success_markers
                .iter()
                .any(|marker| response.contains(marker.as_str()))
        {
            Outcome::Success
        } else {
            Outcome::Failure
        }
    }

    /// Validate and convert a non-success outcome into a [`CommandError`].
    pub fn check(&self, response: &str) -> Result<(), CommandError> {
        match self.validate(response) {
            Outcome::Success => Ok(()),
            Outcome::Failure => Err(CommandError::ValidationFailed {
                command: self.text.clone(),
                response: response.to_string(),
            }),
            Outcome::ErrorMatched(marker) => Err(CommandError::ErrorMarker {
                command: self.text.clone(),
                marker,
                response: response.to_string(),
            }),
        }
    }
}
