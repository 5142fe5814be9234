//! Non-terminal data and derived closure forms

use compact_str::CompactString;
use smallvec::SmallVec;

use crate::grammar::{BnfExpr, HintId};
use crate::term::TermId;

/// A concrete alternative of a non-terminal, produced by the table builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub lhs: TermId,
    pub rhs: SmallVec<[TermId; 4]>,
    /// Hints attached at positions of this production, as `(position, hint)`
    pub hints: SmallVec<[(usize, HintId); 1]>,
}

impl Production {
    #[must_use]
    pub fn new(lhs: TermId, rhs: impl IntoIterator<Item = TermId>) -> Self {
        Self {
            lhs,
            rhs: rhs.into_iter().collect(),
            hints: SmallVec::new(),
        }
    }
}

/// Kleene closure forms derived from a term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClosureKind {
    /// `x?`
    Optional,
    /// `x+`
    Plus,
    /// `x*`
    Star,
}

impl ClosureKind {
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Optional => "?",
            Self::Plus => "+",
            Self::Star => "*",
        }
    }
}

/// Whether a delimited list may end with a delimiter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TrailingDelimiter {
    /// `a, b` only
    #[default]
    Forbid,
    /// `a, b` and `a, b,`
    Allow,
}

/// Rule data of a non-terminal term.
#[derive(Debug, Clone, Default)]
pub struct NonTerminalData {
    rule: Option<BnfExpr>,
    error_rule: Option<BnfExpr>,
    node_caption_template: Option<CompactString>,
    productions: Vec<Production>,
}

impl NonTerminalData {
    #[must_use]
    pub const fn rule(&self) -> Option<&BnfExpr> {
        self.rule.as_ref()
    }

    pub(crate) fn set_rule(&mut self, rule: BnfExpr) {
        self.rule = Some(rule);
    }

    /// Rule used for dedicated error recovery
    #[must_use]
    pub const fn error_rule(&self) -> Option<&BnfExpr> {
        self.error_rule.as_ref()
    }

    pub(crate) fn set_error_rule(&mut self, rule: BnfExpr) {
        self.error_rule = Some(rule);
    }

    /// Tree-view caption template; `{0}`, `{1}`, ... refer to child captions
    #[must_use]
    pub fn node_caption_template(&self) -> Option<&str> {
        self.node_caption_template.as_deref()
    }

    pub(crate) fn set_node_caption_template(&mut self, template: CompactString) {
        self.node_caption_template = Some(template);
    }

    #[must_use]
    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub(crate) fn productions_mut(&mut self) -> &mut Vec<Production> {
        &mut self.productions
    }
}
