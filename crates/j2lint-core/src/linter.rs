//! Rule registration and the (file × rule) lint loop.

use crate::config::{names_rule, Config, ConfigError};
use crate::context::SourceFile;
use crate::describe::RuleDescription;
use crate::dispatch::{DispatchError, Dispatcher, FileGate, FileTypes};
use crate::external;
use crate::rule::{validate_rule, Rule, RuleBox};
use crate::types::LintResult;

use rayon::prelude::*;
use std::collections::HashSet;
use tracing::{debug, info};

/// A validated rule with its effective ignore/warn policy.
struct RegisteredRule {
    rule: RuleBox,
    ignore: bool,
    warn: bool,
}

/// Builder for configuring a [`Linter`].
#[derive(Default)]
pub struct LinterBuilder {
    rules: Vec<RuleBox>,
    config: Option<Config>,
    dispatcher: Option<Dispatcher>,
}

impl LinterBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule to the linter.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the linter.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds several boxed rules to the linter.
    #[must_use]
    pub fn rules<I>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = RuleBox>,
    {
        self.rules.extend(rules);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Replaces the extension-based file gate from the configuration.
    #[must_use]
    pub fn gate(mut self, gate: impl FileGate + 'static) -> Self {
        self.dispatcher = Some(Dispatcher::new(gate));
        self
    }

    /// Builds the linter.
    ///
    /// Rules from `[[external-rules]]` are registered after the rules added
    /// to the builder.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`]: a rule missing a mandatory
    /// attribute, an external rule with an invalid severity or pattern, or
    /// two rules sharing an id.
    pub fn build(self) -> Result<Linter, ConfigError> {
        let config = self.config.unwrap_or_default();

        let mut rules = self.rules;
        rules.extend(external::load_rules(&config.external_rules)?);

        let mut seen = HashSet::new();
        let mut registered = Vec::with_capacity(rules.len());
        for rule in rules {
            validate_rule(rule.as_ref())?;

            let rule_id = rule.rule_id();
            let short_description = rule.short_description();
            if !seen.insert(rule_id.to_string()) {
                return Err(ConfigError::DuplicateRuleId {
                    rule_id: rule_id.to_string(),
                });
            }

            let settings = rule.settings();
            let ignore = settings.ignore || config.is_ignored(rule_id, short_description);
            let warn = names_rule(&settings.warn, rule_id, short_description)
                || config.is_warning(rule_id, short_description);

            registered.push(RegisteredRule { rule, ignore, warn });
        }

        let dispatcher = self
            .dispatcher
            .unwrap_or_else(|| Dispatcher::new(FileTypes::from_config(&config)));

        Ok(Linter {
            rules: registered,
            dispatcher,
        })
    }
}

/// Runs every registered rule against every file.
///
/// Use [`Linter::builder()`] to construct an instance.
pub struct Linter {
    rules: Vec<RegisteredRule>,
    dispatcher: Dispatcher,
}

impl Linter {
    /// Creates a new builder for configuring a linter.
    #[must_use]
    pub fn builder() -> LinterBuilder {
        LinterBuilder::new()
    }

    /// Returns the number of registered rules, ignored ones included.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns the description of every registered rule in registration order.
    #[must_use]
    pub fn describe_rules(&self) -> Vec<RuleDescription> {
        self.rules.iter().map(|r| r.rule.describe()).collect()
    }

    /// Lints a single file with every rule that is not ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if a rule fails on this file.
    pub fn lint_file(&self, file: SourceFile<'_>) -> Result<LintResult, DispatchError> {
        let mut result = LintResult::new();
        if !self.dispatcher.is_checkable(file.path) {
            debug!("Skipping unsupported file: {}", file.path.display());
            return Ok(result);
        }

        debug!("Linting: {}", file.path.display());
        result.files_checked = 1;

        for entry in &self.rules {
            if entry.ignore {
                debug!("Skipping ignored rule: {}", entry.rule.rule_id());
                continue;
            }

            let findings = self.dispatcher.apply(entry.rule.as_ref(), file)?;
            if entry.warn {
                result.warnings.extend(findings);
            } else {
                result.errors.extend(findings);
            }
        }

        Ok(result)
    }

    /// Lints all files sequentially.
    ///
    /// Findings are ordered by file, then by rule registration order, then
    /// in the order each rule produced them.
    ///
    /// # Errors
    ///
    /// Returns the first rule failure.
    pub fn lint(&self, files: &[SourceFile<'_>]) -> Result<LintResult, DispatchError> {
        info!(
            "Linting {} files with {} rules",
            files.len(),
            self.rule_count()
        );

        let mut result = LintResult::new();
        for file in files {
            result.extend(self.lint_file(*file)?);
        }

        log_summary(&result);
        Ok(result)
    }

    /// Lints all files on the rayon thread pool, one task per file.
    ///
    /// Each task aggregates into its own result; the merged output has the
    /// same order as [`Linter::lint`].
    ///
    /// # Errors
    ///
    /// Returns a rule failure if any task fails.
    pub fn lint_parallel(&self, files: &[SourceFile<'_>]) -> Result<LintResult, DispatchError> {
        info!(
            "Linting {} files with {} rules in parallel",
            files.len(),
            self.rule_count()
        );

        let per_file = files
            .par_iter()
            .map(|file| self.lint_file(*file))
            .collect::<Result<Vec<_>, _>>()?;

        let mut result = LintResult::new();
        for file_result in per_file {
            result.extend(file_result);
        }

        log_summary(&result);
        Ok(result)
    }
}

fn log_summary(result: &LintResult) {
    info!(
        "Lint complete: {} errors, {} warnings in {} files",
        result.errors.len(),
        result.warnings.len(),
        result.files_checked
    );
}
