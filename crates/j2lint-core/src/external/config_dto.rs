//! TOML deserialization types (DTO layer).
//!
//! Every metadata field is optional here so that a missing attribute is
//! reported by the loader as a configuration error naming the attribute,
//! rather than as a generic parse failure.

use serde::{Deserialize, Serialize};

/// Raw TOML representation of an `[[external-rules]]` entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExternalRuleDto {
    /// Rule id (e.g., "C1").
    #[serde(default)]
    pub rule_id: Option<String>,
    /// Kebab-case summary.
    #[serde(default)]
    pub short_description: Option<String>,
    /// Human-readable description.
    #[serde(default)]
    pub description: Option<String>,
    /// Severity text, validated against {LOW, MEDIUM, HIGH}.
    #[serde(default)]
    pub severity: Option<String>,
    /// Regular expression to search for.
    pub pattern: String,
    /// Whether the pattern is matched per line or against the whole text.
    #[serde(default)]
    pub scope: MatchScope,
    /// Message override for findings.
    #[serde(default)]
    pub message: Option<String>,
}

/// Which strategy an external rule implements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchScope {
    /// Match each non-comment line separately.
    #[default]
    Line,
    /// Match the whole file text.
    Text,
}
