//! # Key Term Interning
//!
//! Literal symbols and keywords (`"if"`, `"+"`, `"("`) are interned once per
//! grammar: the same text always maps to the same [`TermId`]. Text is stored
//! in a [`lasso`] interner and the term map is keyed by the interner's
//! [`Spur`].
//!
//! In case-insensitive grammars the text is lower-cased before both lookup
//! and storage, so the table compares keys the same way the grammar's
//! language comparer does.

use hashbrown::HashMap;
use lasso::{Rodeo, RodeoReader, Spur};
use std::borrow::Cow;

use crate::term::TermId;

/// Case-folding policy for key term text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseSensitivity {
    Sensitive,
    /// Text is compared and stored lower-cased
    Insensitive,
}

impl CaseSensitivity {
    #[must_use]
    pub const fn from_flag(case_sensitive: bool) -> Self {
        if case_sensitive {
            Self::Sensitive
        } else {
            Self::Insensitive
        }
    }

    /// Normalize `text` for storage and lookup
    #[must_use]
    pub fn normalize(self, text: &str) -> Cow<'_, str> {
        match self {
            Self::Sensitive => Cow::Borrowed(text),
            Self::Insensitive if text.chars().any(char::is_uppercase) => {
                Cow::Owned(text.to_lowercase())
            }
            Self::Insensitive => Cow::Borrowed(text),
        }
    }

    /// Compare two texts under this policy
    #[must_use]
    pub fn texts_equal(self, a: &str, b: &str) -> bool {
        self.normalize(a) == self.normalize(b)
    }
}

/// Interning table used while a grammar is being built.
#[derive(Debug)]
pub struct KeyTermTable {
    rodeo: Rodeo,
    terms: HashMap<Spur, TermId, ahash::RandomState>,
    case: CaseSensitivity,
}

impl KeyTermTable {
    #[must_use]
    pub fn new(case: CaseSensitivity) -> Self {
        Self {
            rodeo: Rodeo::new(),
            terms: HashMap::with_hasher(ahash::RandomState::new()),
            case,
        }
    }

    #[must_use]
    pub const fn case_sensitivity(&self) -> CaseSensitivity {
        self.case
    }

    #[must_use]
    pub fn get(&self, text: &str) -> Option<TermId> {
        let key = self.rodeo.get(self.case.normalize(text))?;
        self.terms.get(&key).copied()
    }

    /// Store `term` under `text` and return the normalized text
    pub fn insert(&mut self, text: &str, term: TermId) -> &str {
        let normalized = self.case.normalize(text);
        let key = self.rodeo.get_or_intern(normalized);
        self.terms.insert(key, term);
        self.rodeo.resolve(&key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Freeze into a read-only table for a built grammar
    #[must_use]
    pub fn freeze(self) -> FrozenKeyTermTable {
        FrozenKeyTermTable {
            reader: self.rodeo.into_reader(),
            terms: self.terms,
            case: self.case,
        }
    }
}

/// Read-only interning table of a built grammar.
#[derive(Debug)]
pub struct FrozenKeyTermTable {
    reader: RodeoReader,
    terms: HashMap<Spur, TermId, ahash::RandomState>,
    case: CaseSensitivity,
}

impl FrozenKeyTermTable {
    #[must_use]
    pub fn get(&self, text: &str) -> Option<TermId> {
        let key = self.reader.get(self.case.normalize(text))?;
        self.terms.get(&key).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// `(normalized text, term)` pairs in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&str, TermId)> {
        self.terms
            .iter()
            .map(|(key, term)| (self.reader.resolve(key), *term))
    }
}
