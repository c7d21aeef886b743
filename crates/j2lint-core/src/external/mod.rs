//! Externally supplied rules driven by TOML configuration.
//!
//! ```text
//! TOML text
//!   ↓ serde (DTO layer)
//! ExternalRuleDto
//!   ↓ validate + compile
//! PatternRule (origin "EXTERNAL")
//! ```

pub mod config_dto;
pub mod pattern;

pub use config_dto::{ExternalRuleDto, MatchScope};
pub use pattern::PatternRule;

use crate::config::{Config, ConfigError};
use crate::rule::RuleBox;

/// Builds the pattern rules declared in `[[external-rules]]`.
///
/// # Errors
///
/// Returns the first configuration error encountered; no partial rule set
/// is ever returned.
pub fn load_rules(dtos: &[ExternalRuleDto]) -> Result<Vec<RuleBox>, ConfigError> {
    dtos.iter()
        .cloned()
        .map(|dto| PatternRule::from_dto(dto).map(|rule| Box::new(rule) as RuleBox))
        .collect()
}

/// Parses TOML content and builds its external rules.
///
/// Returns `Ok(vec![])` if no external rules are declared.
///
/// # Errors
///
/// Returns an error if TOML parsing or rule validation fails.
pub fn load_rules_from_toml(content: &str) -> Result<Vec<RuleBox>, ConfigError> {
    let config = Config::parse(content)?;
    load_rules(&config.external_rules)
}
