//! Structured rule descriptions and their two renderings.

use crate::types::Severity;

use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};

/// Identity record of a rule, as consumed by reporters.
///
/// Field order is part of the contract: the JSON form always lists
/// `rule_id`, `short_description`, `description`, `severity`, `origin`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleDescription {
    /// Short unique identifier (e.g., "S0").
    pub rule_id: String,
    /// Kebab-case summary (e.g., "jinja-syntax-error").
    pub short_description: String,
    /// Human-readable description.
    pub description: String,
    /// Priority of the rule.
    pub severity: Severity,
    /// Where the rule comes from ("BUILT-IN" or "EXTERNAL").
    pub origin: String,
}

impl RuleDescription {
    /// Renders the description for a terminal, e.g.
    /// `S0 Jinja syntax should be correct (jinja-syntax-error)` with the id
    /// in red and the parenthesized short description in blue.
    #[must_use]
    pub fn to_colored(&self) -> String {
        let short = format!("({})", self.short_description);
        format!("{} {} {}", self.rule_id.red(), self.description, short.blue())
    }

    /// Renders the same layout as [`Self::to_colored`] without escape codes.
    #[must_use]
    pub fn to_plain(&self) -> String {
        format!(
            "{} {} ({})",
            self.rule_id, self.description, self.short_description
        )
    }

    /// Serializes the record to its canonical JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl std::fmt::Display for RuleDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.rule_id, self.description)
    }
}
