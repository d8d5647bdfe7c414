//! # Ferrocon
//!
//! Async serial console automation for network appliance provisioning.
//!
//! Ferrocon drives the line-oriented console of a network appliance over a
//! byte stream (usually a serial link): it logs in, tracks the console's
//! access level from its prompt, runs commands while validating each response
//! against success and error markers, and waits for operations the device
//! finishes asynchronously (key and certificate generation).
//!
//! ## Features
//!
//! - Serial transport via `serialport`, scripted transport for tests
//! - Login handshake state machine with bounded prompt search
//! - Access level detection from prompt suffixes, extensible per vendor
//! - Marker-based command validation with error precedence
//! - Pending-completion tracking with a bounded drain
//! - TOML provisioning files
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ferrocon::{Command, SerialConfig, SessionBuilder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ferrocon::Error> {
//!     let mut session = SessionBuilder::new()
//!         .username("admin")
//!         .password("secret")
//!         .open_serial(&SerialConfig::new("/dev/ttyUSB0"))
//!         .await?;
//!
//!     session.execute(&Command::simple("enable")).await?;
//!     session.execute(&Command::rsa_key_pair()).await?;
//!     session.drain_pending().await?;
//!
//!     session.close().await?;
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod config;
pub mod driver;
pub mod error;
pub mod platform;
pub mod transport;

// Re-export main types for convenience
pub use config::ProvisionConfig;
pub use driver::{
    Command, Credentials, Outcome, PendingCompletions, Response, ScriptReport, ScriptRunner,
    Session, SessionBuilder, SessionConfig,
};
pub use error::Error;
pub use platform::{AccessLevel, PromptClassifier, classify};
pub use transport::{ScriptedTransport, SerialConfig, SerialTransport, Transport};
