//! # Grammar Errors
//!
//! Diagnostics produced while a grammar is validated and while parser tables
//! are built from it.
//!
//! ## Overview
//!
//! - [`GrammarError`]: one immutable diagnostic with a [`GrammarErrorLevel`]
//! - [`GrammarErrorList`]: accumulates diagnostics for one validation pass,
//!   either continuing ([`GrammarErrorList::add`]) or aborting
//!   ([`GrammarErrorList::add_and_throw`])
//! - [`BuildError`]: why [`GrammarBuilder::build`](crate::grammar::GrammarBuilder::build)
//!   failed
//!
//! With the `diagnostics` feature, [`GrammarError`] and [`BuildError`]
//! implement `miette::Diagnostic`.
//!
//! ## Usage
//!
//! ```rust
//! use bnf_kit::error::{GrammarErrorLevel, GrammarErrorList};
//!
//! let mut errors = GrammarErrorList::new();
//! errors.add(GrammarErrorLevel::Warning, None, "unused terminal 'x'");
//! errors.add(GrammarErrorLevel::Conflict, None, "shift-reduce conflict on '+'");
//! assert_eq!(errors.max_level(), GrammarErrorLevel::Conflict);
//! ```

use std::fmt;
use thiserror::Error;

#[cfg(feature = "diagnostics")]
use miette::Diagnostic;

/// Severity of a [`GrammarError`], strictly ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum GrammarErrorLevel {
    #[default]
    None,
    Info,
    Warning,
    /// Shift-reduce or reduce-reduce ambiguity found while building tables
    Conflict,
    /// The grammar is unusable
    Error,
    /// A defect in the generator itself
    InternalError,
}

impl fmt::Display for GrammarErrorLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "None",
            Self::Info => "Info",
            Self::Warning => "Warning",
            Self::Conflict => "Conflict",
            Self::Error => "Error",
            Self::InternalError => "InternalError",
        };
        f.write_str(name)
    }
}

/// Opaque parser state label attached to a diagnostic for display
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct ParserStateRef(pub String);

impl fmt::Display for ParserStateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single grammar diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
#[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::diagnostic)))]
#[error("{level}: {message}")]
pub struct GrammarError {
    level: GrammarErrorLevel,
    state: Option<ParserStateRef>,
    message: String,
}

impl GrammarError {
    #[must_use]
    pub fn new(
        level: GrammarErrorLevel,
        state: Option<ParserStateRef>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            level,
            state,
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn level(&self) -> GrammarErrorLevel {
        self.level
    }

    #[must_use]
    pub const fn state(&self) -> Option<&ParserStateRef> {
        self.state.as_ref()
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Lifecycle of a [`GrammarErrorList`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorListState {
    #[default]
    Accumulating,
    /// An entry was raised with [`GrammarErrorList::add_and_throw`]
    Aborted,
}

/// Ordered diagnostics of one validation pass.
#[derive(Debug, Clone, Default)]
pub struct GrammarErrorList {
    errors: Vec<GrammarError>,
    state: ErrorListState,
}

impl GrammarErrorList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a diagnostic and keep going
    pub fn add(
        &mut self,
        level: GrammarErrorLevel,
        state: Option<ParserStateRef>,
        message: impl fmt::Display,
    ) {
        if self.state == ErrorListState::Aborted {
            tracing::debug!(%level, "diagnostic added after abort");
        }
        self.errors
            .push(GrammarError::new(level, state, message.to_string()));
    }

    /// Append a diagnostic and abort with it.
    ///
    /// Always returns `Err` carrying a copy of the appended entry; the list
    /// moves to [`ErrorListState::Aborted`].
    ///
    /// ```rust
    /// use bnf_kit::error::{GrammarErrorLevel, GrammarErrorList};
    ///
    /// let mut errors = GrammarErrorList::new();
    /// let err = errors
    ///     .add_and_throw::<()>(GrammarErrorLevel::Error, None, "root is not set")
    ///     .unwrap_err();
    /// assert_eq!(err.message(), "root is not set");
    /// ```
    pub fn add_and_throw<T>(
        &mut self,
        level: GrammarErrorLevel,
        state: Option<ParserStateRef>,
        message: impl fmt::Display,
    ) -> Result<T, GrammarError> {
        let error = GrammarError::new(level, state, message.to_string());
        self.errors.push(error.clone());
        self.state = ErrorListState::Aborted;
        Err(error)
    }

    /// Highest severity recorded, [`GrammarErrorLevel::None`] when empty
    #[must_use]
    pub fn max_level(&self) -> GrammarErrorLevel {
        self.errors
            .iter()
            .map(GrammarError::level)
            .max()
            .unwrap_or(GrammarErrorLevel::None)
    }

    #[must_use]
    pub const fn state(&self) -> ErrorListState {
        self.state
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GrammarError> {
        self.errors.iter()
    }

    /// Entries at `level` or above
    pub fn at_least(&self, level: GrammarErrorLevel) -> impl Iterator<Item = &GrammarError> {
        self.errors.iter().filter(move |e| e.level >= level)
    }
}

impl<'a> IntoIterator for &'a GrammarErrorList {
    type Item = &'a GrammarError;
    type IntoIter = std::slice::Iter<'a, GrammarError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl fmt::Display for GrammarErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

/// Failure of [`GrammarBuilder::build`](crate::grammar::GrammarBuilder::build)
#[derive(Debug, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum BuildError {
    /// Validation stopped at a fatal diagnostic
    #[error("grammar construction aborted: {0}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::aborted)))]
    Aborted(#[from] GrammarError),

    /// Validation finished with errors
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::invalid)))]
    #[error("grammar has {} error(s):\n{errors}", .errors.at_least(GrammarErrorLevel::Error).count())]
    Invalid { errors: GrammarErrorList },
}

impl BuildError {
    /// All diagnostics carried by the error
    #[must_use]
    pub fn errors(&self) -> Vec<&GrammarError> {
        match self {
            Self::Aborted(error) => vec![error],
            Self::Invalid { errors } => errors.iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "diagnostics")]
    #[test]
    fn test_diagnostic_codes() {
        let mut errors = GrammarErrorList::new();
        let error = errors
            .add_and_throw::<()>(GrammarErrorLevel::Error, None, "root is not set")
            .unwrap_err();
        assert_eq!(
            error.code().map(|c| c.to_string()),
            Some("grammar::diagnostic".to_string())
        );

        let aborted = BuildError::from(error);
        assert_eq!(
            aborted.code().map(|c| c.to_string()),
            Some("grammar::aborted".to_string())
        );
        let invalid = BuildError::Invalid { errors };
        assert_eq!(
            invalid.code().map(|c| c.to_string()),
            Some("grammar::invalid".to_string())
        );
    }

    #[test]
    fn test_levels_are_ordered() {
        assert!(GrammarErrorLevel::None < GrammarErrorLevel::Info);
        assert!(GrammarErrorLevel::Info < GrammarErrorLevel::Warning);
        assert!(GrammarErrorLevel::Warning < GrammarErrorLevel::Conflict);
        assert!(GrammarErrorLevel::Conflict < GrammarErrorLevel::Error);
        assert!(GrammarErrorLevel::Error < GrammarErrorLevel::InternalError);
    }

    #[test]
    fn test_max_level() {
        let mut errors = GrammarErrorList::new();
        assert_eq!(errors.max_level(), GrammarErrorLevel::None);

        errors.add(GrammarErrorLevel::Warning, None, "w");
        errors.add(GrammarErrorLevel::Conflict, None, "c");
        assert_eq!(errors.max_level(), GrammarErrorLevel::Conflict);
        assert_eq!(errors.state(), ErrorListState::Accumulating);
    }

    #[test]
    fn test_add_and_throw_carries_entry() {
        let mut errors = GrammarErrorList::new();
        errors.add(GrammarErrorLevel::Info, None, "first");

        let state = ParserStateRef("S12".to_string());
        let err = errors
            .add_and_throw::<()>(
                GrammarErrorLevel::Error,
                Some(state.clone()),
                format_args!("rule of {} is malformed", "Expr"),
            )
            .unwrap_err();

        assert_eq!(err.level(), GrammarErrorLevel::Error);
        assert_eq!(err.message(), "rule of Expr is malformed");
        assert_eq!(err.state(), Some(&state));
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.iter().last(), Some(&err));
        assert_eq!(errors.state(), ErrorListState::Aborted);
    }

    #[test]
    fn test_display() {
        let err = GrammarError::new(GrammarErrorLevel::Warning, None, "odd");
        assert_eq!(err.to_string(), "Warning: odd");
    }

    #[test]
    fn test_build_error_lists_entries() {
        let mut errors = GrammarErrorList::new();
        errors.add(GrammarErrorLevel::Error, None, "a");
        errors.add(GrammarErrorLevel::Warning, None, "b");
        let err = BuildError::Invalid { errors };
        assert_eq!(err.errors().len(), 2);
        assert!(err.to_string().starts_with("grammar has 1 error(s)"));
    }
}
