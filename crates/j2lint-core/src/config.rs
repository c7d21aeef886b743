//! Configuration types for j2lint.

use crate::external::config_dto::ExternalRuleDto;

use serde::{Deserialize, Serialize};

/// Extensions checked when no configuration overrides them.
pub const DEFAULT_EXTENSIONS: [&str; 3] = [".jinja", ".jinja2", ".j2"];

/// Top-level configuration for j2lint.
///
/// ```toml
/// extensions = [".j2"]
/// ignore = ["S3"]
/// warn = ["jinja-statements-indentation"]
///
/// [[external-rules]]
/// rule_id = "C1"
/// short_description = "no-todo"
/// description = "Templates should not contain TODO markers"
/// severity = "LOW"
/// pattern = "TODO"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// File extensions accepted by the file-type gate.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Rule ids or short descriptions to suppress.
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Rule ids or short descriptions to downgrade to warnings.
    #[serde(default)]
    pub warn: Vec<String>,

    /// Externally supplied pattern rules.
    #[serde(rename = "external-rules", default)]
    pub external_rules: Vec<ExternalRuleDto>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            ignore: Vec::new(),
            warn: Vec::new(),
            external_rules: Vec::new(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect()
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks if a rule is suppressed by id or short description.
    #[must_use]
    pub fn is_ignored(&self, rule_id: &str, short_description: &str) -> bool {
        names_rule(&self.ignore, rule_id, short_description)
    }

    /// Checks if a rule is downgraded by id or short description.
    #[must_use]
    pub fn is_warning(&self, rule_id: &str, short_description: &str) -> bool {
        names_rule(&self.warn, rule_id, short_description)
    }
}

/// Returns true if `list` names a rule by id or short description.
pub(crate) fn names_rule(list: &[String], rule_id: &str, short_description: &str) -> bool {
    list.iter()
        .any(|item| item == rule_id || item == short_description)
}

/// Configuration errors.
///
/// All of these are fatal: they surface before any file is scanned.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A mandatory rule attribute is absent or blank.
    #[error("Rule {rule} is missing required attribute {attribute}")]
    MissingAttribute {
        /// Rule id, or `<unnamed>` when the id itself is missing.
        rule: String,
        /// Name of the missing attribute.
        attribute: &'static str,
    },

    /// Severity outside {LOW, MEDIUM, HIGH}.
    #[error("Rule {rule}: {source}")]
    InvalidSeverity {
        /// Offending rule id.
        rule: String,
        /// Underlying parse error.
        source: crate::types::UnknownSeverity,
    },

    /// Two active rules share an id.
    #[error("Duplicate rule id {rule_id}")]
    DuplicateRuleId {
        /// The repeated id.
        rule_id: String,
    },

    /// An external rule's pattern does not compile.
    #[error("Rule {rule}: invalid pattern: {source}")]
    InvalidPattern {
        /// Offending rule id.
        rule: String,
        /// Underlying regex error.
        source: regex::Error,
    },

    /// Parse error in configuration text.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}
