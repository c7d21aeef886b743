//! Applies one rule to one file.
//!
//! The dispatcher tries the whole-text strategy first. When the rule answers
//! [`Check::NotApplicable`] it falls back to checking line by line. The two
//! strategies never both run for the same (file, rule) pair.

use crate::config::{Config, DEFAULT_EXTENSIONS};
use crate::context::SourceFile;
use crate::rule::{Check, Rule, RuleError};
use crate::types::LinterError;

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while applying a rule.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The rule failed on this file.
    #[error("Rule {rule_id} failed on {}: {source}", .path.display())]
    Rule {
        /// Id of the failing rule.
        rule_id: String,
        /// File being checked.
        path: PathBuf,
        /// Error raised by the rule.
        source: RuleError,
    },
}

/// Decides whether a file is one the linter can check.
pub trait FileGate: Send + Sync {
    /// Returns true if `path` should be checked.
    fn is_checkable(&self, path: &Path) -> bool;
}

impl<F> FileGate for F
where
    F: Fn(&Path) -> bool + Send + Sync,
{
    fn is_checkable(&self, path: &Path) -> bool {
        self(path)
    }
}

/// File gate based on file extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTypes {
    extensions: Vec<String>,
}

impl FileTypes {
    /// Creates a gate accepting the given extensions. A leading dot is optional.
    #[must_use]
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_string())
                .filter(|ext| !ext.is_empty())
                .collect(),
        }
    }

    /// Creates a gate from the `extensions` of a configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.extensions)
    }
}

impl Default for FileTypes {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS)
    }
}

impl FileGate for FileTypes {
    fn is_checkable(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|known| known == ext))
    }
}

/// Returns true for lines excluded from line checks.
///
/// A line whose first non-whitespace character is `#` is treated as a
/// template comment. This is an approximation: `#` also opens line
/// statements, and can start a line inside a string literal or a color code,
/// and those lines are skipped too.
#[must_use]
pub fn is_comment_line(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

/// Applies rules to files through a [`FileGate`].
pub struct Dispatcher {
    gate: Box<dyn FileGate>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(FileTypes::default())
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Creates a dispatcher using `gate` to select checkable files.
    #[must_use]
    pub fn new(gate: impl FileGate + 'static) -> Self {
        Self {
            gate: Box::new(gate),
        }
    }

    /// Returns true if the gate accepts `path`.
    #[must_use]
    pub fn is_checkable(&self, path: &Path) -> bool {
        self.gate.is_checkable(path)
    }

    /// Applies `rule` to `file` and returns its findings in the order produced.
    ///
    /// Files rejected by the gate yield no findings and neither strategy runs.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Rule`] if the rule fails. Failures are never
    /// swallowed.
    pub fn apply(
        &self,
        rule: &dyn Rule,
        file: SourceFile<'_>,
    ) -> Result<Vec<LinterError>, DispatchError> {
        if !self.is_checkable(file.path) {
            debug!(
                "Skipping file {}. Linter does not support linting this file type",
                file.path.display()
            );
            return Ok(Vec::new());
        }

        let failed = |source| DispatchError::Rule {
            rule_id: rule.rule_id().to_string(),
            path: file.path.to_path_buf(),
            source,
        };

        if let Check::Applicable(errors) = rule.check_text(file.path, file.text).map_err(failed)? {
            return Ok(errors);
        }

        debug!(
            "Rule {} checks lines of {}",
            rule.rule_id(),
            file.path.display()
        );

        let mut errors = Vec::new();
        for (index, line) in file.text.split('\n').enumerate() {
            if is_comment_line(line) {
                continue;
            }

            match rule
                .check_line(file.path, line, index + 1)
                .map_err(failed)?
            {
                Check::Applicable(found) => errors.extend(found),
                Check::NotApplicable => {
                    warn!(
                        "Rule {} implements neither check_text nor check_line",
                        rule.rule_id()
                    );
                    break;
                }
            }
        }

        Ok(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::CheckResult;
    use crate::types::Severity;
    use std::sync::Mutex;

    /// Line rule recording every call it receives.
    #[derive(Default)]
    struct RecordingLineRule {
        calls: Mutex<Vec<(usize, String)>>,
    }

    impl Rule for RecordingLineRule {
        fn rule_id(&self) -> &str {
            "T1"
        }
        fn short_description(&self) -> &str {
            "recording-line"
        }
        fn description(&self) -> &str {
            "Records line calls"
        }
        fn severity(&self) -> Severity {
            Severity::Low
        }
        fn check_line(&self, file: &Path, line: &str, line_no: usize) -> CheckResult {
            self.calls.lock().unwrap().push((line_no, line.to_string()));
            Ok(Check::Applicable(vec![LinterError::new(
                line_no, line, file, self,
            )]))
        }
    }

    /// Text rule that also counts line calls, which must never happen.
    #[derive(Default)]
    struct TextOnlyRule {
        line_calls: Mutex<usize>,
    }

    impl Rule for TextOnlyRule {
        fn rule_id(&self) -> &str {
            "T2"
        }
        fn short_description(&self) -> &str {
            "text-only"
        }
        fn description(&self) -> &str {
            "Checks whole text"
        }
        fn severity(&self) -> Severity {
            Severity::High
        }
        fn check_text(&self, file: &Path, text: &str) -> CheckResult {
            Ok(Check::Applicable(vec![LinterError::whole_file(
                text, file, self,
            )]))
        }
        fn check_line(&self, _file: &Path, _line: &str, _line_no: usize) -> CheckResult {
            *self.line_calls.lock().unwrap() += 1;
            Ok(Check::Applicable(Vec::new()))
        }
    }

    struct NoStrategyRule;

    impl Rule for NoStrategyRule {
        fn rule_id(&self) -> &str {
            "T3"
        }
        fn short_description(&self) -> &str {
            "no-strategy"
        }
        fn description(&self) -> &str {
            "Implements nothing"
        }
        fn severity(&self) -> Severity {
            Severity::Medium
        }
    }

    struct FailingRule;

    impl Rule for FailingRule {
        fn rule_id(&self) -> &str {
            "T4"
        }
        fn short_description(&self) -> &str {
            "failing"
        }
        fn description(&self) -> &str {
            "Always fails"
        }
        fn severity(&self) -> Severity {
            Severity::High
        }
        fn check_line(&self, _file: &Path, _line: &str, line_no: usize) -> CheckResult {
            if line_no == 2 {
                return Err(RuleError::Failed("boom".to_string()));
            }
            Ok(Check::Applicable(Vec::new()))
        }
    }

    fn file<'a>(path: &'a str, text: &'a str) -> SourceFile<'a> {
        SourceFile::new(Path::new(path), text)
    }

    #[test]
    fn test_skips_comment_lines() {
        let rule = RecordingLineRule::default();
        let errors = Dispatcher::default()
            .apply(&rule, file("a.j2", "a\n#b\nc"))
            .unwrap();

        let lines: Vec<_> = errors.iter().map(|e| e.line_no).collect();
        assert_eq!(lines, vec![Some(1), Some(3)]);
        assert_eq!(
            *rule.calls.lock().unwrap(),
            vec![(1, "a".to_string()), (3, "c".to_string())]
        );
    }

    #[test]
    fn test_indented_comment_is_skipped() {
        let rule = RecordingLineRule::default();
        let errors = Dispatcher::default()
            .apply(&rule, file("a.j2", "  \t# note\n{{ x }}"))
            .unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line_no, Some(2));
    }

    #[test]
    fn test_hash_after_text_is_checked() {
        let rule = RecordingLineRule::default();
        let errors = Dispatcher::default()
            .apply(&rule, file("a.j2", "color: #fff"))
            .unwrap();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_trailing_newline_yields_empty_last_line() {
        let rule = RecordingLineRule::default();
        let errors = Dispatcher::default()
            .apply(&rule, file("a.j2", "a\n"))
            .unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[1].line, "");
    }

    #[test]
    fn test_text_rule_never_enters_line_path() {
        let rule = TextOnlyRule::default();
        let errors = Dispatcher::default()
            .apply(&rule, file("a.j2", "# one\n{# two #}\nthree"))
            .unwrap();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line_no, None);
        assert_eq!(errors[0].line, "# one\n{# two #}\nthree");
        assert_eq!(*rule.line_calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_unrecognised_file_type_is_skipped() {
        let line_rule = RecordingLineRule::default();
        let text_rule = TextOnlyRule::default();
        let dispatcher = Dispatcher::default();

        assert!(dispatcher
            .apply(&line_rule, file("README.md", "a\nb"))
            .unwrap()
            .is_empty());
        assert!(dispatcher
            .apply(&text_rule, file("README.md", "a\nb"))
            .unwrap()
            .is_empty());
        assert!(line_rule.calls.lock().unwrap().is_empty());
        assert_eq!(*text_rule.line_calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_rule_without_strategy_yields_nothing() {
        let errors = Dispatcher::default()
            .apply(&NoStrategyRule, file("a.j2", "a\nb"))
            .unwrap();
        assert!(errors.is_empty());
    }

    #[test]
    fn test_rule_failure_propagates() {
        let err = Dispatcher::default()
            .apply(&FailingRule, file("a.j2", "a\nb\nc"))
            .unwrap_err();

        let DispatchError::Rule {
            rule_id,
            path,
            source,
        } = err;
        assert_eq!(rule_id, "T4");
        assert_eq!(path, PathBuf::from("a.j2"));
        assert_eq!(source.to_string(), "boom");
    }

    #[test]
    fn test_custom_gate() {
        let dispatcher = Dispatcher::new(|path: &Path| path.starts_with("templates"));
        let rule = RecordingLineRule::default();

        assert_eq!(
            dispatcher
                .apply(&rule, file("templates/x.txt", "a"))
                .unwrap()
                .len(),
            1
        );
        assert!(dispatcher
            .apply(&rule, file("other/x.j2", "a"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_file_types() {
        let gate = FileTypes::default();
        assert!(gate.is_checkable(Path::new("a.j2")));
        assert!(gate.is_checkable(Path::new("dir/b.jinja2")));
        assert!(gate.is_checkable(Path::new("c.jinja")));
        assert!(!gate.is_checkable(Path::new("d.yaml")));
        assert!(!gate.is_checkable(Path::new("j2")));

        let gate = FileTypes::new(["html", ".txt"]);
        assert!(gate.is_checkable(Path::new("index.html")));
        assert!(gate.is_checkable(Path::new("notes.txt")));
        assert!(!gate.is_checkable(Path::new("a.j2")));
    }

    #[test]
    fn test_is_comment_line() {
        assert!(is_comment_line("# comment"));
        assert!(is_comment_line("    #comment"));
        assert!(!is_comment_line("{# jinja comment #}"));
        assert!(!is_comment_line("value # trailing"));
        assert!(!is_comment_line(""));
    }
}
