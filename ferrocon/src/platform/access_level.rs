//! Console access levels.

use std::fmt;

/// Privilege tier of the console, inferred from the prompt shape.
///
/// Levels are ordered: `LoggedOut < User < Privileged < Config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AccessLevel {
    /// No recognised prompt (login banner, password prompt, garbage).
    LoggedOut,

    /// User EXEC mode, `>` prompt.
    User,

    /// Privileged EXEC mode, `#` prompt.
    Privileged,

    /// Global configuration mode, `(config)#` prompt.
    Config,
}

impl AccessLevel {
    /// Short lowercase name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoggedOut => "logged_out",
            Self::User => "user",
            Self::Privileged => "privileged",
            Self::Config => "config",
        }
    }

    /// Whether this level represents an authenticated console.
    pub fn is_logged_in(&self) -> bool {
        *self != Self::LoggedOut
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
