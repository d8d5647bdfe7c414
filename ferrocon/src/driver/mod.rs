//! Session engine for appliance consoles.
//!
//! The driver layer logs into the console, runs commands, validates their
//! responses and tracks completions the device reports later.

mod builder;
mod command;
mod login;
mod pending;
mod response;
pub mod script;
mod session;

pub use builder::{SessionBuilder, SessionConfig};
pub use command::{Command, Outcome};
pub use login::{Credentials, LoginPrompts, LoginSequencer, LoginState};
pub use pending::PendingCompletions;
pub use response::Response;
pub use script::{ScriptReport, ScriptRunner, closing_sequence};
pub use session::Session;
