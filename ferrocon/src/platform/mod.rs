//! Prompt classification for console access levels.
//!
//! This module maps the trailing characters of console output to the
//! appliance's access level.

mod access_level;
mod classifier;

pub use access_level::AccessLevel;
pub use classifier::{PromptClassifier, PromptRule, classify};
