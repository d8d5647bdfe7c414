//! Console login handshake.
//!
//! ```text
//! SeekingPrompt ──login prompt──► AwaitingUsername ──password prompt──► AwaitingPassword
//!       │                               │                                      │
//!  no prompt after N probes       no password prompt                  no success text
//!       ▼                               ▼                                      ▼
//!    Failed                          Failed                                 Failed
//!
//! AwaitingPassword ──success text──► Authenticated
//! ```

use std::fmt;

use log::{debug, info};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

use crate::channel::ConsoleChannel;
use crate::error::{LoginError, Result};
use crate::transport::Transport;

/// Console username and password.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    username: String,

    #[serde(deserialize_with = "deserialize_secret")]
    password: SecretString,
}

impl Credentials {
    /// Create credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Create credentials from an already protected password.
    pub fn from_secret(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    /// The login name.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The password.
    pub fn password(&self) -> &SecretString {
        &self.password
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> std::result::Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

/// Texts the console prints during login.
#[derive(Debug, Clone)]
pub struct LoginPrompts {
    /// Prompt asking for the login name.
    pub login_prompt: String,

    /// Prompt asking for the password.
    pub password_prompt: String,

    /// Text confirming a successful login.
    pub success_text: String,

    /// Maximum empty-line probes while looking for the login prompt.
    pub attempts: usize,
}

impl Default for LoginPrompts {
    fn default() -> Self {
        Self {
            login_prompt: "Please Enter Login Name:".to_string(),
            password_prompt: "Please Enter Password:".to_string(),
            success_text: "User login successful".to_string(),
            attempts: 5,
        }
    }
}

/// Login handshake state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    SeekingPrompt,
    AwaitingUsername,
    AwaitingPassword,
    Authenticated,
    Failed,
}

impl fmt::Display for LoginState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SeekingPrompt => "seeking_prompt",
            Self::AwaitingUsername => "awaiting_username",
            Self::AwaitingPassword => "awaiting_password",
            Self::Authenticated => "authenticated",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Drives the login handshake over a console channel.
pub struct LoginSequencer<'a> {
    credentials: &'a Credentials,
    prompts: &'a LoginPrompts,
    state: LoginState,
    probes: usize,
}

impl<'a> LoginSequencer<'a> {
    /// Create a sequencer in the `SeekingPrompt` state.
    pub fn new(credentials: &'a Credentials, prompts: &'a LoginPrompts) -> Self {
        Self {
            credentials,
            prompts,
            state: LoginState::SeekingPrompt,
            probes: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> LoginState {
        self.state
    }

    /// Empty-line probes sent while seeking the login prompt.
    pub fn probes(&self) -> usize {
        self.probes
    }

    /// Run the handshake starting from the last response read.
    ///
    /// Returns the response to the password, which normally ends in the
    /// post-login prompt.
    pub async fn run<T: Transport>(
        &mut self,
        channel: &mut ConsoleChannel<T>,
        response: String,
    ) -> Result<String> {
        self.state = LoginState::SeekingPrompt;
        self.probes = 0;

        match self.drive(channel, response).await {
            Ok(response) => Ok(response),
            Err(e) => {
                self.transition(LoginState::Failed);
                Err(e)
            }
        }
    }

    async fn drive<T: Transport>(
        &mut self,
        channel: &mut ConsoleChannel<T>,
        mut response: String,
    ) -> Result<String> {
        loop {
            match self.state {
                LoginState::SeekingPrompt => {
                    if response.contains(&self.prompts.login_prompt) {
                        self.transition(LoginState::AwaitingUsername);
                        continue;
                    }
                    if self.probes >= self.prompts.attempts {
                        return Err(LoginError::PromptNotFound {
                            attempts: self.probes,
                        }
                        .into());
                    }
                    self.probes += 1;
                    response = channel.exchange("").await?;
                }

                LoginState::AwaitingUsername => {
                    response = channel.exchange(&self.credentials.username).await?;
                    if !response.contains(&self.prompts.password_prompt) {
                        return Err(LoginError::ProtocolMismatch {
                            expected: self.prompts.password_prompt.clone(),
                            response,
                        }
                        .into());
                    }
                    self.transition(LoginState::AwaitingPassword);
                }

                LoginState::AwaitingPassword => {
                    channel
                        .send_hidden(self.credentials.password.expose_secret())
                        .await?;
                    response = channel.poll().await?;
                    if !response.contains(&self.prompts.success_text) {
                        return Err(LoginError::AuthenticationFailed {
                            user: self.credentials.username.clone(),
                            response,
                        }
                        .into());
                    }
                    self.transition(LoginState::Authenticated);
                    info!("Logged in as '{}'", self.credentials.username);
                }

                LoginState::Authenticated | LoginState::Failed => return Ok(response),
            }
        }
    }

    fn transition(&mut self, next: LoginState) {
        debug!("login: {} -> {}", self.state, next);
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::channel::ChannelConfig;
    use crate::error::Error;
    use crate::transport::ScriptedTransport;

    fn channel(outputs: &[&str]) -> ConsoleChannel<ScriptedTransport> {
        let config = ChannelConfig {
            settle_delay: Duration::ZERO,
            ..Default::default()
        };
        ConsoleChannel::new(ScriptedTransport::new(outputs.iter().copied()), config)
    }

    #[tokio::test]
    async fn test_login_after_two_empty_probes() {
        // No prompt in the initial response, so the sequencer probes twice.
        let mut channel = channel(&[
            "",
            "Please Enter Login Name:",
            "Please Enter Password:",
            "User login successful",
        ]);
        let credentials = Credentials::new("admin", "secret");
        let prompts = LoginPrompts::default();
        let mut login = LoginSequencer::new(&credentials, &prompts);

        let response = login.run(&mut channel, String::new()).await.unwrap();

        assert_eq!(response, "User login successful");
        assert_eq!(login.state(), LoginState::Authenticated);
        assert_eq!(login.probes(), 2);
        assert_eq!(channel.transport().written(), ["", "", "admin", "secret"]);
    }

    #[tokio::test]
    async fn test_prompt_already_visible() {
        let mut channel = channel(&["Please Enter Password:", "User login successful\r\nswitch>"]);
        let credentials = Credentials::new("admin", "secret");
        let prompts = LoginPrompts::default();
        let mut login = LoginSequencer::new(&credentials, &prompts);

        let response = login
            .run(&mut channel, "Please Enter Login Name:".to_string())
            .await
            .unwrap();

        assert!(response.ends_with("switch>"));
        assert_eq!(login.probes(), 0);
    }

    #[tokio::test]
    async fn test_prompt_not_found() {
        let mut channel = channel(&[]);
        let credentials = Credentials::new("admin", "secret");
        let prompts = LoginPrompts::default();
        let mut login = LoginSequencer::new(&credentials, &prompts);

        let err = login.run(&mut channel, String::new()).await.unwrap_err();

        assert!(matches!(
            err,
            Error::Login(LoginError::PromptNotFound { attempts: 5 })
        ));
        assert_eq!(login.state(), LoginState::Failed);
        assert_eq!(channel.transport().written().len(), 5);
    }

    #[tokio::test]
    async fn test_missing_password_prompt() {
        let mut channel = channel(&["Login incorrect"]);
        let credentials = Credentials::new("admin", "secret");
        let prompts = LoginPrompts::default();
        let mut login = LoginSequencer::new(&credentials, &prompts);

        let err = login
            .run(&mut channel, "Please Enter Login Name:".to_string())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Login(LoginError::ProtocolMismatch { ref response, .. }) if response == "Login incorrect"
        ));
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let mut channel = channel(&["Please Enter Password:", "Invalid password"]);
        let credentials = Credentials::new("admin", "wrong");
        let prompts = LoginPrompts::default();
        let mut login = LoginSequencer::new(&credentials, &prompts);

        let err = login
            .run(&mut channel, "Please Enter Login Name:".to_string())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Login(LoginError::AuthenticationFailed { ref user, .. }) if user == "admin"
        ));
        assert_eq!(login.state(), LoginState::Failed);
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let credentials = Credentials::new("admin", "hunter2");
        assert!(!format!("{credentials:?}").contains("hunter2"));
    }
}
