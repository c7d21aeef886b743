//! Rule trait and registration-time validation.

use crate::config::ConfigError;
use crate::describe::RuleDescription;
use crate::types::{LinterError, Severity};

use std::borrow::Cow;
use std::path::Path;

/// Origin tag of rules shipped with the linter.
pub const BUILT_IN: &str = "BUILT-IN";

/// Origin tag of rules supplied through configuration.
pub const EXTERNAL: &str = "EXTERNAL";

/// Outcome of a checking strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    /// The strategy ran and produced these findings.
    Applicable(Vec<LinterError>),
    /// The rule does not implement this strategy.
    NotApplicable,
}

/// Result of a checking strategy. `Err` is a genuine failure of the rule.
pub type CheckResult = Result<Check, RuleError>;

/// A failure raised while a rule checks text or a line.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// The rule could not complete its check.
    #[error("{0}")]
    Failed(String),

    /// An underlying error from the rule implementation.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Per-instance settings of a rule.
///
/// Settings are read-only once the rule is built, so instances can be
/// shared across threads without locking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSettings {
    /// Whether the caller should suppress this rule.
    pub ignore: bool,
    /// Identifiers the caller should downgrade to warnings.
    pub warn: Vec<String>,
    /// Origin tag (see [`BUILT_IN`] and [`EXTERNAL`]).
    pub origin: Cow<'static, str>,
}

impl RuleSettings {
    /// Settings of a built-in rule that is neither ignored nor downgraded.
    #[must_use]
    pub const fn builtin() -> Self {
        Self {
            ignore: false,
            warn: Vec::new(),
            origin: Cow::Borrowed(BUILT_IN),
        }
    }

    /// Settings of an externally supplied rule.
    #[must_use]
    pub const fn external() -> Self {
        Self {
            ignore: false,
            warn: Vec::new(),
            origin: Cow::Borrowed(EXTERNAL),
        }
    }

    /// Sets whether the rule is ignored.
    #[must_use]
    pub fn ignore(mut self, ignore: bool) -> Self {
        self.ignore = ignore;
        self
    }

    /// Sets the warn list.
    #[must_use]
    pub fn warn<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.warn = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the origin tag.
    #[must_use]
    pub fn origin(mut self, origin: impl Into<Cow<'static, str>>) -> Self {
        self.origin = origin.into();
        self
    }
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self::builtin()
    }
}

static DEFAULT_SETTINGS: RuleSettings = RuleSettings::builtin();

/// A template lint rule.
///
/// A rule declares its identity and implements at least one of two
/// strategies: [`Rule::check_text`] over the whole file, or
/// [`Rule::check_line`] over a single line. The strategy it does not support
/// returns [`Check::NotApplicable`], which is the default.
///
/// # Example
///
/// ```
/// use j2lint_core::{Check, CheckResult, LinterError, Rule, Severity};
/// use std::path::Path;
///
/// struct NoTodo;
///
/// impl Rule for NoTodo {
///     fn rule_id(&self) -> &str { "C0" }
///     fn short_description(&self) -> &str { "no-todo" }
///     fn description(&self) -> &str { "Templates should not contain TODO markers" }
///     fn severity(&self) -> Severity { Severity::Low }
///
///     fn check_line(&self, file: &Path, line: &str, line_no: usize) -> CheckResult {
///         let mut errors = Vec::new();
///         if line.contains("TODO") {
///             errors.push(LinterError::new(line_no, line, file, self));
///         }
///         Ok(Check::Applicable(errors))
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the short unique identifier (e.g., "S0").
    fn rule_id(&self) -> &str;

    /// Returns the kebab-case summary (e.g., "jinja-syntax-error").
    fn short_description(&self) -> &str;

    /// Returns a human-readable description.
    fn description(&self) -> &str;

    /// Returns the severity of this rule.
    fn severity(&self) -> Severity;

    /// Returns the per-instance settings.
    fn settings(&self) -> &RuleSettings {
        &DEFAULT_SETTINGS
    }

    /// Checks the whole text of a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the rule fails while checking.
    fn check_text(&self, _file: &Path, _text: &str) -> CheckResult {
        Ok(Check::NotApplicable)
    }

    /// Checks a single line; `line_no` is 1-based.
    ///
    /// # Errors
    ///
    /// Returns an error if the rule fails while checking.
    fn check_line(&self, _file: &Path, _line: &str, _line_no: usize) -> CheckResult {
        Ok(Check::NotApplicable)
    }

    /// Returns the structured description consumed by reporters.
    fn describe(&self) -> RuleDescription {
        RuleDescription {
            rule_id: self.rule_id().to_string(),
            short_description: self.short_description().to_string(),
            description: self.description().to_string(),
            severity: self.severity(),
            origin: self.settings().origin.to_string(),
        }
    }
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

/// Validates a rule before it is registered.
///
/// Every rule must declare a non-blank `rule_id`, `description` and
/// `short_description`. Severity is checked by the type system for Rust
/// rules and by [`Severity::from_str`](std::str::FromStr) for external ones.
///
/// # Errors
///
/// Returns [`ConfigError::MissingAttribute`] naming the first absent attribute.
pub fn validate_rule(rule: &dyn Rule) -> Result<(), ConfigError> {
    let rule_id = rule.rule_id();
    let label = if rule_id.trim().is_empty() {
        "<unnamed>"
    } else {
        rule_id
    };

    let mandatory = [
        ("rule_id", rule_id),
        ("description", rule.description()),
        ("short_description", rule.short_description()),
    ];
    for (attribute, value) in mandatory {
        if value.trim().is_empty() {
            return Err(ConfigError::MissingAttribute {
                rule: label.to_string(),
                attribute,
            });
        }
    }

    Ok(())
}
