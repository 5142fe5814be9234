//! Scanner over a fixed token list

use crate::grammar::Grammar;
use crate::parsing::{Scanner, Token};
use crate::term::TermId;

/// A [`Scanner`] that replays a fixed list of tokens and counts how often
/// preview mode is entered and left.
#[derive(Debug, Clone)]
pub struct ScriptedScanner {
    tokens: Vec<Token>,
    eof: TermId,
    position: usize,
    preview_position: Option<usize>,
    previews_entered: usize,
    previews_exited: usize,
}

impl ScriptedScanner {
    #[must_use]
    pub fn new(eof: TermId, tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            eof,
            position: 0,
            preview_position: None,
            previews_entered: 0,
            previews_exited: 0,
        }
    }

    /// Tokens for `terms`, with term names as text
    #[must_use]
    pub fn from_terms(grammar: &Grammar, terms: impl IntoIterator<Item = TermId>) -> Self {
        let tokens = terms
            .into_iter()
            .enumerate()
            .map(|(position, term)| Token::new(term, grammar.term(term).name(), position))
            .collect();
        Self::new(grammar.standard().eof, tokens)
    }

    /// Tokens for interned key terms.
    ///
    /// # Panics
    ///
    /// Panics if a text is not a key term of `grammar`.
    #[must_use]
    pub fn from_key_terms<'s>(grammar: &Grammar, texts: impl IntoIterator<Item = &'s str>) -> Self {
        let terms: Vec<TermId> = texts
            .into_iter()
            .map(|text| {
                grammar
                    .key_term(text)
                    .unwrap_or_else(|| panic!("'{text}' is not a key term"))
            })
            .collect();
        Self::from_terms(grammar, terms)
    }

    /// Committed position
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub const fn is_previewing(&self) -> bool {
        self.preview_position.is_some()
    }

    #[must_use]
    pub const fn previews_entered(&self) -> usize {
        self.previews_entered
    }

    #[must_use]
    pub const fn previews_exited(&self) -> usize {
        self.previews_exited
    }
}

impl Scanner for ScriptedScanner {
    fn next_token(&mut self) -> Token {
        let cursor = self.preview_position.as_mut().unwrap_or(&mut self.position);
        match self.tokens.get(*cursor) {
            Some(token) => {
                *cursor += 1;
                token.clone()
            }
            None => Token::new(self.eof, "", self.tokens.len()),
        }
    }

    fn begin_preview(&mut self) {
        self.preview_position = Some(self.position);
        self.previews_entered += 1;
    }

    fn end_preview(&mut self, discard: bool) {
        if let Some(preview) = self.preview_position.take()
            && !discard
        {
            self.position = preview;
        }
        self.previews_exited += 1;
    }
}
