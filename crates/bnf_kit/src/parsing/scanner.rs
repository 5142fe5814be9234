//! Scanner interface consumed by token preview

use compact_str::CompactString;

use crate::term::TermId;

/// A token produced by the scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub term: TermId,
    pub text: CompactString,
    /// Byte offset of the token in the source
    pub position: usize,
}

impl Token {
    #[must_use]
    pub fn new(term: TermId, text: impl Into<CompactString>, position: usize) -> Self {
        Self {
            term,
            text: text.into(),
            position,
        }
    }
}

/// Token source with a non-committing preview mode.
///
/// After [`begin_preview`](Scanner::begin_preview), tokens returned by
/// [`next_token`](Scanner::next_token) are buffered lookahead;
/// [`end_preview`](Scanner::end_preview) with `discard = true` restores the
/// committed position so the same tokens are produced again.
///
/// At end of input the scanner keeps returning a token of the grammar's
/// end-of-file terminal.
pub trait Scanner {
    fn next_token(&mut self) -> Token;

    fn begin_preview(&mut self);

    fn end_preview(&mut self, discard: bool);
}

/// Preview mode held for the lifetime of the guard.
///
/// Dropping the guard leaves preview mode, discarding the lookahead, on every
/// path out of the scope.
pub struct PreviewScope<'s, S: Scanner + ?Sized> {
    scanner: &'s mut S,
}

impl<'s, S: Scanner + ?Sized> PreviewScope<'s, S> {
    pub fn new(scanner: &'s mut S) -> Self {
        scanner.begin_preview();
        Self { scanner }
    }

    pub fn next_token(&mut self) -> Token {
        self.scanner.next_token()
    }
}

impl<S: Scanner + ?Sized> Drop for PreviewScope<'_, S> {
    fn drop(&mut self) {
        self.scanner.end_preview(true);
    }
}
