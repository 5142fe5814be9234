//! # Terms
//!
//! Every grammar symbol (terminal, key term, non-terminal) is a [`Term`]
//! stored in the arena of a [`GrammarBuilder`](crate::grammar::GrammarBuilder)
//! and addressed by a [`TermId`]. Identity is the id: two terms with the same
//! name are still distinct symbols unless they were interned through
//! [`GrammarBuilder::term`](crate::grammar::GrammarBuilder::term).

pub mod ast;
pub mod flags;

pub use ast::*;
pub use flags::TermFlags;

use compact_str::CompactString;
use std::fmt;

use crate::grammar::NonTerminalData;

/// Defines a `u32` index handle into one of the session arenas.
macro_rules! arena_id {
    ($(#[$meta:meta])* $vis:vis struct $name:ident;) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        $vis struct $name(u32);

        impl $name {
            /// Create an id from an arena index
            ///
            /// # Panics
            ///
            /// Panics if `index` does not fit in `u32`.
            #[must_use]
            pub fn new(index: usize) -> Self {
                Self(u32::try_from(index).expect(concat!(stringify!($name), " overflow")))
            }

            /// Index into the owning arena
            #[must_use]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

pub(crate) use arena_id;

arena_id! {
    /// Handle of a [`Term`] inside its grammar.
    pub struct TermId;
}

/// Operator associativity used when resolving shift/reduce conflicts by precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Associativity {
    #[default]
    Left,
    Right,
    Neutral,
}

/// Category of tokens a terminal produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TokenCategory {
    #[default]
    Content,
    /// Layout tokens: newline, indent, dedent, end of file
    Outline,
    Comment,
    Directive,
    Error,
}

/// What kind of symbol a term is.
#[derive(Debug, Clone)]
pub enum TermKind {
    /// A terminal recognized by a scanner-level rule
    Terminal { category: TokenCategory },
    /// An interned terminal for a fixed keyword or symbol
    KeyTerm {
        /// Normalized text (lower-cased in case-insensitive grammars)
        text: CompactString,
        /// Display name, filled in by the first call that supplies one
        display_name: Option<CompactString>,
    },
    NonTerminal(Box<NonTerminalData>),
}

/// A grammar symbol.
#[derive(Debug, Clone)]
pub struct Term {
    id: TermId,
    name: CompactString,
    error_alias: Option<CompactString>,
    flags: TermFlags,
    precedence: u32,
    associativity: Associativity,
    /// Matching brace for brace terms
    is_pair_for: Option<TermId>,
    kind: TermKind,
    ast: AstBinding,
}

impl Term {
    pub(crate) fn new(id: TermId, name: impl Into<CompactString>, kind: TermKind) -> Self {
        Self {
            id,
            name: name.into(),
            error_alias: None,
            flags: TermFlags::NONE,
            precedence: 0,
            associativity: Associativity::Left,
            is_pair_for: None,
            kind,
            ast: AstBinding::default(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> TermId {
        self.id
    }

    /// Name of the term; key terms report their display name when one was given
    #[must_use]
    pub fn name(&self) -> &str {
        match &self.kind {
            TermKind::KeyTerm {
                display_name: Some(display_name),
                ..
            } => display_name,
            _ => &self.name,
        }
    }

    /// Name shown in syntax error messages
    #[must_use]
    pub fn error_alias(&self) -> &str {
        self.error_alias.as_deref().unwrap_or_else(|| self.name())
    }

    pub fn set_error_alias(&mut self, alias: impl Into<CompactString>) {
        self.error_alias = Some(alias.into());
    }

    #[must_use]
    pub const fn flags(&self) -> TermFlags {
        self.flags
    }

    /// True if any of `flags` is set
    #[must_use]
    pub const fn flag_is_set(&self, flags: TermFlags) -> bool {
        self.flags.intersects(flags)
    }

    pub fn set_flag(&mut self, flags: TermFlags) {
        self.flags.insert(flags);
    }

    pub fn clear_flag(&mut self, flags: TermFlags) {
        self.flags.remove(flags);
    }

    /// Operator precedence; 0 means none
    #[must_use]
    pub const fn precedence(&self) -> u32 {
        self.precedence
    }

    pub fn set_precedence(&mut self, precedence: u32) {
        self.precedence = precedence;
    }

    #[must_use]
    pub const fn associativity(&self) -> Associativity {
        self.associativity
    }

    pub fn set_associativity(&mut self, associativity: Associativity) {
        self.associativity = associativity;
    }

    #[must_use]
    pub const fn is_pair_for(&self) -> Option<TermId> {
        self.is_pair_for
    }

    pub(crate) fn set_pair_for(&mut self, other: TermId) {
        self.is_pair_for = Some(other);
    }

    #[must_use]
    pub const fn kind(&self) -> &TermKind {
        &self.kind
    }

    #[must_use]
    pub const fn is_non_terminal(&self) -> bool {
        matches!(self.kind, TermKind::NonTerminal(_))
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !self.is_non_terminal()
    }

    /// Text of a key term
    #[must_use]
    pub fn key_text(&self) -> Option<&str> {
        match &self.kind {
            TermKind::KeyTerm { text, .. } => Some(text.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_non_terminal(&self) -> Option<&NonTerminalData> {
        match &self.kind {
            TermKind::NonTerminal(data) => Some(&**data),
            _ => None,
        }
    }

    pub fn as_non_terminal_mut(&mut self) -> Option<&mut NonTerminalData> {
        match &mut self.kind {
            TermKind::NonTerminal(data) => Some(&mut **data),
            _ => None,
        }
    }

    pub(crate) fn set_display_name(&mut self, name: &str) {
        if let TermKind::KeyTerm { display_name, .. } = &mut self.kind
            && display_name.is_none()
            && !name.is_empty()
        {
            *display_name = Some(name.into());
        }
    }

    #[must_use]
    pub const fn ast(&self) -> &AstBinding {
        &self.ast
    }

    /// AST construction settings
    pub fn ast_mut(&mut self) -> &mut AstBinding {
        &mut self.ast
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
