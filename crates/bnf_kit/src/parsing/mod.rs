//! # Parsing Interfaces
//!
//! The grammar core does not scan or parse; it only needs a narrow view of a
//! running parser:
//!
//! - a [`Scanner`] with a preview mode, used by
//!   [`TokenPreviewHint::matches`](crate::grammar::TokenPreviewHint::matches)
//! - a [`ParsingContext`] exposing the scanner, the current parser state, the
//!   open-brace stack and the grammar
//! - [`ParseTreeNode`], the parse tree handed to AST construction and caption
//!   rendering
//!
//! [`LanguageHooks`] lets a language customize syntax error messages and
//! conflict resolution.

mod hooks;
mod scanner;

pub use hooks::{DefaultHooks, LanguageHooks, ParserMessage};
pub use scanner::{PreviewScope, Scanner, Token};

use compact_str::CompactString;
use std::collections::BTreeSet;

use crate::error::{GrammarErrorLevel, ParserStateRef};
use crate::grammar::Grammar;
use crate::term::{AstNode, TermId};

/// Parser action chosen by conflict resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParserAction {
    Shift,
    Reduce,
}

/// A node of the concrete parse tree
#[derive(Debug)]
pub struct ParseTreeNode {
    pub term: TermId,
    /// Token for terminal nodes
    pub token: Option<Token>,
    pub children: Vec<ParseTreeNode>,
    pub is_error: bool,
    pub state: Option<ParserStateRef>,
    pub ast_node: Option<Box<dyn AstNode>>,
}

impl ParseTreeNode {
    #[must_use]
    pub const fn new(term: TermId) -> Self {
        Self {
            term,
            token: None,
            children: Vec::new(),
            is_error: false,
            state: None,
            ast_node: None,
        }
    }

    /// Terminal node for `token`
    #[must_use]
    pub fn from_token(token: Token) -> Self {
        let term = token.term;
        Self {
            token: Some(token),
            ..Self::new(term)
        }
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<ParseTreeNode>) -> Self {
        self.children = children;
        self
    }
}

/// State of one parse as seen by hints and error reporting.
pub struct ParsingContext<'a> {
    grammar: &'a Grammar,
    scanner: &'a mut dyn Scanner,
    pub current_state: Option<ParserStateRef>,
    /// Open braces, innermost last
    pub open_braces: Vec<Token>,
    /// Token the parser is currently looking at
    pub current_input: Option<Token>,
    /// Terminals the parser would accept in the current state
    pub expected_terms: Vec<TermId>,
    messages: Vec<ParserMessage>,
}

impl<'a> ParsingContext<'a> {
    pub fn new(grammar: &'a Grammar, scanner: &'a mut dyn Scanner) -> Self {
        Self {
            grammar,
            scanner,
            current_state: None,
            open_braces: Vec::new(),
            current_input: None,
            expected_terms: Vec::new(),
            messages: Vec::new(),
        }
    }

    #[must_use]
    pub const fn grammar(&self) -> &'a Grammar {
        self.grammar
    }

    pub fn scanner(&mut self) -> &mut dyn Scanner {
        self.scanner
    }

    /// Enter scanner preview mode until the returned guard is dropped
    pub fn preview(&mut self) -> PreviewScope<'_, dyn Scanner + 'a> {
        PreviewScope::new(self.scanner)
    }

    /// Display names of the expected terminals, reshaped by report groups
    #[must_use]
    pub fn expected_term_set(&self) -> BTreeSet<CompactString> {
        self.grammar.expected_term_names(&self.expected_terms)
    }

    pub fn add_parser_error(&mut self, message: impl Into<String>) {
        self.add_message(GrammarErrorLevel::Error, message);
    }

    pub fn add_message(&mut self, level: GrammarErrorLevel, message: impl Into<String>) {
        let position = self.current_input.as_ref().map(|t| t.position);
        self.messages.push(ParserMessage {
            level,
            position,
            state: self.current_state.clone(),
            message: message.into(),
        });
    }

    #[must_use]
    pub fn messages(&self) -> &[ParserMessage] {
        &self.messages
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level >= GrammarErrorLevel::Error)
    }
}

/// Arguments of conflict resolution at parse time
pub struct ConflictResolutionArgs<'c, 'a> {
    pub context: &'c mut ParsingContext<'a>,
    /// Action chosen by the resolver, if any
    pub result: Option<ParserAction>,
}

impl<'c, 'a> ConflictResolutionArgs<'c, 'a> {
    pub fn new(context: &'c mut ParsingContext<'a>) -> Self {
        Self {
            context,
            result: None,
        }
    }
}
