//! File records handed to the engine.

use std::path::Path;

/// A file to lint: its path and its full text.
///
/// The engine never reads from disk; callers supply both fields.
#[derive(Debug, Clone, Copy)]
pub struct SourceFile<'a> {
    /// Path used for file-type gating and embedded in findings.
    pub path: &'a Path,
    /// Full file contents.
    pub text: &'a str,
}

impl<'a> SourceFile<'a> {
    /// Creates a new file record.
    #[must_use]
    pub fn new(path: &'a Path, text: &'a str) -> Self {
        Self { path, text }
    }
}
