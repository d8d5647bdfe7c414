//! Prompt-suffix classification of console responses.
//!
//! The console shows its access level only through the trailing characters
//! of its prompt:
//!
//! ```text
//! switch>              # user
//! switch#              # privileged
//! switch(config)#      # config
//! ```
//!
//! Rules are checked in order and the first match wins, so `(config)#` is
//! tested before the bare `#` rule.

use std::sync::LazyLock;

use regex::Regex;

use super::access_level::AccessLevel;

static DEFAULT: LazyLock<PromptClassifier> = LazyLock::new(PromptClassifier::new);

/// Classify a response with the built-in rules.
pub fn classify(response: &str) -> AccessLevel {
    DEFAULT.classify(response)
}

/// A single suffix rule mapping a prompt shape to an access level.
#[derive(Debug, Clone)]
pub struct PromptRule {
    /// Level reported when this rule matches.
    pub level: AccessLevel,

    /// Pattern matched against the full response, anchored with `$`.
    pub pattern: Regex,

    /// Strings that must NOT be in the response for this rule to match.
    pub not_contains: Vec<String>,
}

impl PromptRule {
    /// Create a rule from a pattern string.
    pub fn new(level: AccessLevel, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            level,
            pattern: Regex::new(pattern)?,
            not_contains: vec![],
        })
    }

    /// Add a not_contains string.
    pub fn with_not_contains(mut self, text: impl Into<String>) -> Self {
        self.not_contains.push(text.into());
        self
    }

    /// Check if this rule matches a response.
    pub fn matches(&self, response: &str) -> bool {
        if self.not_contains.iter().any(|nc| response.contains(nc)) {
            return false;
        }
        self.pattern.is_match(response)
    }
}

/// Ordered list of prompt rules.
///
/// Caller-supplied rules are consulted before the built-in ones, which makes
/// this the place to teach the engine about vendor prompt variants.
#[derive(Debug, Clone)]
pub struct PromptClassifier {
    rules: Vec<PromptRule>,
    custom: usize,
}

impl PromptClassifier {
    /// Create a classifier with the built-in rules.
    pub fn new() -> Self {
        let rules = vec![
            PromptRule::new(AccessLevel::Config, r"\(config\)#$").unwrap(),
            PromptRule::new(AccessLevel::Privileged, r"#$").unwrap(),
            PromptRule::new(AccessLevel::User, r">$").unwrap(),
        ];
        Self { rules, custom: 0 }
    }

    /// Add a rule ahead of the built-in ones.
    pub fn with_rule(self, level: AccessLevel, pattern: &str) -> Result<Self, regex::Error> {
        let rule = PromptRule::new(level, pattern)?;
        Ok(self.with_prompt_rule(rule))
    }

    /// Add a prebuilt rule ahead of the built-in ones.
    pub fn with_prompt_rule(mut self, rule: PromptRule) -> Self {
        self.rules.insert(self.custom, rule);
        self.custom += 1;
        self
    }

    /// Determine the access level from the latest raw response.
    pub fn classify(&self, response: &str) -> AccessLevel {
        self.rules
            .iter()
            .find(|rule| rule.matches(response))
            .map(|rule| rule.level)
            .unwrap_or(AccessLevel::LoggedOut)
    }

    /// All rules in evaluation order.
    pub fn rules(&self) -> &[PromptRule] {
        &self.rules
    }
}

impl Default for PromptClassifier {
    fn default() -> Self {
        Self::new()
    }
}
