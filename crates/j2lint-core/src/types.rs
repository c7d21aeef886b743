//! Core types for lint findings and results.

use crate::describe::RuleDescription;
use crate::rule::Rule;

use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Severity level attached to a rule.
///
/// The set is closed: there is no "unset" value, so a rule type that compiles
/// always carries one of the three priorities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Cosmetic or stylistic issue.
    Low,
    /// Issue that likely hides a mistake.
    Medium,
    /// Issue that breaks the template.
    High,
}

impl Severity {
    /// All accepted severities, lowest first.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Returns the canonical uppercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a severity outside {LOW, MEDIUM, HIGH}.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("severity must be in ['LOW', 'MEDIUM', 'HIGH'], {0} was provided")]
pub struct UnknownSeverity(pub String);

impl FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|severity| severity.as_str() == s)
            .ok_or_else(|| UnknownSeverity(s.to_string()))
    }
}

/// A single reported violation.
///
/// Findings are plain values: a rule creates them and hands them upward, it
/// never keeps them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinterError {
    /// Path of the file the finding belongs to.
    pub file: PathBuf,
    /// 1-based line number, `None` for whole-file findings.
    pub line_no: Option<usize>,
    /// Raw text of the offending line, or the whole text for whole-file findings.
    pub line: String,
    /// Description of the rule that produced this finding.
    pub rule: RuleDescription,
    /// Message override; the rule description is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LinterError {
    /// Creates a finding for a single line.
    #[must_use]
    pub fn new(
        line_no: usize,
        line: impl Into<String>,
        file: impl Into<PathBuf>,
        rule: &dyn Rule,
    ) -> Self {
        Self {
            file: file.into(),
            line_no: Some(line_no),
            line: line.into(),
            rule: rule.describe(),
            message: None,
        }
    }

    /// Creates a finding that applies to the file as a whole.
    #[must_use]
    pub fn whole_file(text: impl Into<String>, file: impl Into<PathBuf>, rule: &dyn Rule) -> Self {
        Self {
            file: file.into(),
            line_no: None,
            line: text.into(),
            rule: rule.describe(),
            message: None,
        }
    }

    /// Overrides the message reported for this finding.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Returns the message to report: the override, or the rule description.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or(&self.rule.description)
    }

    /// Returns the severity of the rule that produced this finding.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.rule.severity
    }
}

impl std::fmt::Display for LinterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.file.display())?;
        if let Some(line_no) = self.line_no {
            write!(f, ":{line_no}")?;
        }
        write!(
            f,
            " {} {} ({})",
            self.rule.rule_id,
            self.message(),
            self.rule.short_description
        )
    }
}

/// Converts a finding to a miette diagnostic for rich error display.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("[{rule_id}] {message}")]
pub struct FindingDiagnostic {
    rule_id: String,
    message: String,
    #[source_code]
    src: NamedSource<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
    #[help]
    help: Option<String>,
}

impl From<&LinterError> for FindingDiagnostic {
    fn from(finding: &LinterError) -> Self {
        let name = match finding.line_no {
            Some(line_no) => format!("{}:{line_no}", finding.file.display()),
            None => finding.file.display().to_string(),
        };
        Self {
            rule_id: finding.rule.rule_id.clone(),
            message: finding.message().to_string(),
            src: NamedSource::new(name, finding.line.clone()),
            span: SourceSpan::from((0, finding.line.len())),
            label_message: finding.rule.short_description.clone(),
            help: finding
                .message
                .is_some()
                .then(|| finding.rule.description.clone()),
        }
    }
}

/// Aggregated outcome of a lint run.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// Findings from rules that are not downgraded.
    pub errors: Vec<LinterError>,
    /// Findings from rules listed as warnings.
    pub warnings: Vec<LinterError>,
    /// Number of files accepted by the file-type gate.
    pub files_checked: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no errors were found. Warnings do not count.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Counts errors by rule severity as `(high, medium, low)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |severity| {
            self.errors
                .iter()
                .filter(|e| e.severity() == severity)
                .count()
        };
        (
            count(Severity::High),
            count(Severity::Medium),
            count(Severity::Low),
        )
    }

    /// Adds findings from another result.
    pub fn extend(&mut self, other: Self) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.files_checked += other.files_checked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{Check, CheckResult, Rule};
    use std::path::Path;

    struct SyntaxRule;

    impl Rule for SyntaxRule {
        fn rule_id(&self) -> &str {
            "S0"
        }
        fn short_description(&self) -> &str {
            "jinja-syntax-error"
        }
        fn description(&self) -> &str {
            "Jinja syntax should be correct"
        }
        fn severity(&self) -> Severity {
            Severity::High
        }
        fn check_text(&self, _file: &Path, _text: &str) -> CheckResult {
            Ok(Check::Applicable(Vec::new()))
        }
    }

    struct StyleRule;

    impl Rule for StyleRule {
        fn rule_id(&self) -> &str {
            "S1"
        }
        fn short_description(&self) -> &str {
            "single-space-decorator"
        }
        fn description(&self) -> &str {
            "A single space should be added between Jinja2 curly brackets and a variable name"
        }
        fn severity(&self) -> Severity {
            Severity::Low
        }
    }

    #[test]
    fn severity_parses_only_uppercase_members() {
        assert_eq!("LOW".parse::<Severity>(), Ok(Severity::Low));
        assert_eq!("MEDIUM".parse::<Severity>(), Ok(Severity::Medium));
        assert_eq!("HIGH".parse::<Severity>(), Ok(Severity::High));
        assert_eq!(
            "CRITICAL".parse::<Severity>(),
            Err(UnknownSeverity("CRITICAL".to_string()))
        );
        assert!("high".parse::<Severity>().is_err());
    }

    #[test]
    fn severity_serializes_uppercase() {
        let json = serde_json::to_string(&Severity::Medium).unwrap();
        assert_eq!(json, "\"MEDIUM\"");
    }

    #[test]
    fn message_defaults_to_rule_description() {
        let finding = LinterError::new(3, "{{x}}", "a.j2", &SyntaxRule);
        assert_eq!(finding.message(), "Jinja syntax should be correct");

        let finding = finding.with_message("unexpected end of template");
        assert_eq!(finding.message(), "unexpected end of template");
    }

    #[test]
    fn display_includes_line_number() {
        let finding = LinterError::new(3, "{{x}}", "templates/a.j2", &SyntaxRule);
        assert_eq!(
            finding.to_string(),
            "templates/a.j2:3 S0 Jinja syntax should be correct (jinja-syntax-error)"
        );
    }

    #[test]
    fn display_omits_line_number_for_whole_file() {
        let finding = LinterError::whole_file("{% if %}", "templates/a.j2", &SyntaxRule);
        assert!(finding.line_no.is_none());
        assert_eq!(
            finding.to_string(),
            "templates/a.j2 S0 Jinja syntax should be correct (jinja-syntax-error)"
        );
    }

    #[test]
    fn diagnostic_carries_rule_id_and_help_on_override() {
        let finding =
            LinterError::new(1, "{{x}}", "a.j2", &SyntaxRule).with_message("unexpected '}'");
        let diagnostic = FindingDiagnostic::from(&finding);
        assert_eq!(diagnostic.to_string(), "[S0] unexpected '}'");
        assert_eq!(
            diagnostic.help.as_deref(),
            Some("Jinja syntax should be correct")
        );
        assert_eq!(diagnostic.span.len(), 5);
    }

    #[test]
    fn count_by_severity_ignores_warnings() {
        let mut result = LintResult::new();
        result
            .errors
            .push(LinterError::new(1, "a", "a.j2", &SyntaxRule));
        result
            .errors
            .push(LinterError::new(2, "b", "a.j2", &StyleRule));
        result
            .warnings
            .push(LinterError::new(3, "c", "a.j2", &SyntaxRule));

        assert_eq!(result.count_by_severity(), (1, 0, 1));
        assert!(!result.is_clean());
    }

    #[test]
    fn extend_merges_counts() {
        let mut first = LintResult::new();
        first.files_checked = 2;
        let mut second = LintResult::new();
        second.files_checked = 1;
        second
            .warnings
            .push(LinterError::new(1, "a", "b.j2", &StyleRule));

        first.extend(second);
        assert_eq!(first.files_checked, 3);
        assert_eq!(first.warnings.len(), 1);
        assert!(first.is_clean());
    }
}
