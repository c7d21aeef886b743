//! # j2lint-core
//!
//! Rule-checking engine for Jinja template linting.
//!
//! The engine works on raw text and individual lines, never on a syntax
//! tree. It includes:
//!
//! - [`Rule`] trait with two checking strategies, whole text and single line
//! - [`validate_rule`] for registration-time validation of rule metadata
//! - [`Dispatcher`] for applying one rule to one file
//! - [`Linter`] for running a validated rule set over many files
//! - [`LinterError`] for representing lint findings
//!
//! ## Example
//!
//! ```ignore
//! use j2lint_core::{Config, Linter, SourceFile};
//!
//! let linter = Linter::builder()
//!     .config(Config::parse(&config_text)?)
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = linter.lint(&[SourceFile::new(path, &text)])?;
//! for error in &result.errors {
//!     println!("{error}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod context;
mod describe;
mod dispatch;
mod linter;
mod rule;
mod types;

/// Rules supplied through configuration.
pub mod external;

pub use config::{Config, ConfigError, DEFAULT_EXTENSIONS};
pub use context::SourceFile;
pub use describe::RuleDescription;
pub use dispatch::{is_comment_line, DispatchError, Dispatcher, FileGate, FileTypes};
pub use linter::{Linter, LinterBuilder};
pub use rule::{
    validate_rule, Check, CheckResult, Rule, RuleBox, RuleError, RuleSettings, BUILT_IN, EXTERNAL,
};
pub use types::{FindingDiagnostic, LintResult, LinterError, Severity, UnknownSeverity};
