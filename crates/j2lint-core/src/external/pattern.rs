//! Regex-backed rules supplied through configuration.

use super::config_dto::{ExternalRuleDto, MatchScope};
use crate::config::ConfigError;
use crate::rule::{Check, CheckResult, Rule, RuleSettings};
use crate::types::{LinterError, Severity};

use regex::Regex;
use std::path::Path;

/// A rule that reports every occurrence of a regular expression.
///
/// With [`MatchScope::Line`] it only implements `check_line`; with
/// [`MatchScope::Text`] it only implements `check_text` and reports the line
/// where each match starts.
#[derive(Debug, Clone)]
pub struct PatternRule {
    rule_id: String,
    short_description: String,
    description: String,
    severity: Severity,
    pattern: Regex,
    scope: MatchScope,
    message: Option<String>,
    settings: RuleSettings,
}

impl PatternRule {
    /// Builds a rule from its TOML form.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingAttribute`] when a metadata field is
    /// absent or blank, [`ConfigError::InvalidSeverity`] when the severity is
    /// not LOW, MEDIUM or HIGH, and [`ConfigError::InvalidPattern`] when the
    /// pattern does not compile.
    pub fn from_dto(dto: ExternalRuleDto) -> Result<Self, ConfigError> {
        let rule_id = required(dto.rule_id, "<unnamed>", "rule_id")?;
        let description = required(dto.description, &rule_id, "description")?;
        let short_description = required(dto.short_description, &rule_id, "short_description")?;
        let severity = required(dto.severity, &rule_id, "severity")?
            .parse::<Severity>()
            .map_err(|source| ConfigError::InvalidSeverity {
                rule: rule_id.clone(),
                source,
            })?;
        let pattern = Regex::new(&dto.pattern).map_err(|source| ConfigError::InvalidPattern {
            rule: rule_id.clone(),
            source,
        })?;

        Ok(Self {
            rule_id,
            short_description,
            description,
            severity,
            pattern,
            scope: dto.scope,
            message: dto.message,
            settings: RuleSettings::external(),
        })
    }

    /// Replaces the rule settings.
    #[must_use]
    pub fn with_settings(mut self, settings: RuleSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Returns the match scope.
    #[must_use]
    pub fn scope(&self) -> MatchScope {
        self.scope
    }

    fn finding(&self, file: &Path, line: &str, line_no: usize) -> LinterError {
        let finding = LinterError::new(line_no, line, file, self);
        match &self.message {
            Some(message) => finding.with_message(message.clone()),
            None => finding,
        }
    }
}

fn required(
    value: Option<String>,
    rule: &str,
    attribute: &'static str,
) -> Result<String, ConfigError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingAttribute {
            rule: rule.to_string(),
            attribute,
        })
}

/// Returns the 1-based number and the text of the line containing `offset`.
fn line_at(text: &str, offset: usize) -> (usize, &str) {
    let start = text[..offset].rfind('\n').map_or(0, |i| i + 1);
    let end = text[offset..].find('\n').map_or(text.len(), |i| offset + i);
    let line_no = text[..start].matches('\n').count() + 1;
    (line_no, &text[start..end])
}

impl Rule for PatternRule {
    fn rule_id(&self) -> &str {
        &self.rule_id
    }

    fn short_description(&self) -> &str {
        &self.short_description
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn settings(&self) -> &RuleSettings {
        &self.settings
    }

    fn check_text(&self, file: &Path, text: &str) -> CheckResult {
        if self.scope != MatchScope::Text {
            return Ok(Check::NotApplicable);
        }

        let errors = self
            .pattern
            .find_iter(text)
            .map(|m| {
                let (line_no, line) = line_at(text, m.start());
                self.finding(file, line, line_no)
            })
            .collect();
        Ok(Check::Applicable(errors))
    }

    fn check_line(&self, file: &Path, line: &str, line_no: usize) -> CheckResult {
        if self.scope != MatchScope::Line {
            return Ok(Check::NotApplicable);
        }

        let mut errors = Vec::new();
        if self.pattern.is_match(line) {
            errors.push(self.finding(file, line, line_no));
        }
        Ok(Check::Applicable(errors))
    }
}
