//! BNF expression algebra
//!
//! A [`BnfExpr`] is an alternation of sequences. Sequences hold terms, hints
//! placed at a rule position, and groups: nested multi-alternative expressions
//! that were used as a single sequence element.
//!
//! Composition rules:
//!
//! - `a.then(b)` extends the last alternative of `a` when `a` has exactly one
//!   alternative; otherwise `a` is first wrapped as a group, so `(a | b) + c`
//!   stays "`(a | b)` followed by `c`". A single-alternative right operand is
//!   spliced in element by element, which makes concatenation associative.
//! - `a.or(b)` always flattens: the alternatives of both operands are
//!   concatenated into one list.

use smallvec::{SmallVec, smallvec};

use crate::grammar::{GrammarHint, HintId};
use crate::term::{Term, TermId};

/// One element of a sequence
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Element {
    Term(TermId),
    /// Conflict-resolution hint attached at this position
    Hint(HintId),
    /// Nested alternation used as a single element
    Group(Box<BnfExpr>),
}

impl Element {
    #[must_use]
    pub const fn as_term(&self) -> Option<TermId> {
        match self {
            Self::Term(term) => Some(*term),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_hint(&self) -> Option<HintId> {
        match self {
            Self::Hint(hint) => Some(*hint),
            _ => None,
        }
    }
}

/// An ordered list of elements
pub type Sequence = SmallVec<[Element; 4]>;

/// Alternation of sequences. Never empty: there is always at least one
/// alternative.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BnfExpr {
    alternatives: SmallVec<[Sequence; 2]>,
}

impl BnfExpr {
    /// Single-alternative, single-element expression
    #[must_use]
    pub fn element(element: Element) -> Self {
        Self {
            alternatives: smallvec![smallvec![element]],
        }
    }

    #[must_use]
    pub fn term(term: TermId) -> Self {
        Self::element(Element::Term(term))
    }

    #[must_use]
    pub fn hint(hint: HintId) -> Self {
        Self::element(Element::Hint(hint))
    }

    #[must_use]
    pub fn alternatives(&self) -> &[Sequence] {
        &self.alternatives
    }

    #[must_use]
    pub fn alternative_count(&self) -> usize {
        self.alternatives.len()
    }

    /// Concatenate `rhs` after `self`
    #[must_use]
    pub fn then(self, rhs: impl Into<Self>) -> Self {
        let mut left = if self.alternatives.len() == 1 {
            self
        } else {
            Self::element(Element::Group(Box::new(self)))
        };
        let right = rhs.into();

        // left has exactly one alternative at this point
        let last = &mut left.alternatives[0];
        if right.alternatives.len() == 1 {
            let mut right = right;
            last.extend(right.alternatives.swap_remove(0));
        } else {
            last.push(Element::Group(Box::new(right)));
        }
        left
    }

    /// Alternate `self` with `rhs`, flattening both alternative lists
    #[must_use]
    pub fn or(mut self, rhs: impl Into<Self>) -> Self {
        self.alternatives.extend(rhs.into().alternatives);
        self
    }

    /// All term ids referenced by the expression, groups included, in order
    #[must_use]
    pub fn terms(&self) -> Vec<TermId> {
        let mut result = Vec::new();
        self.collect_terms(&mut result);
        result
    }

    fn collect_terms(&self, result: &mut Vec<TermId>) {
        for element in self.alternatives.iter().flatten() {
            match element {
                Element::Term(term) => result.push(*term),
                Element::Group(group) => group.collect_terms(result),
                Element::Hint(_) => {}
            }
        }
    }

    /// True if any element is a group
    #[must_use]
    pub fn has_groups(&self) -> bool {
        self.alternatives
            .iter()
            .flatten()
            .any(|e| matches!(e, Element::Group(_)))
    }

    /// Text form using term names, e.g. `a + b | c`
    #[must_use]
    pub fn render(&self, terms: &[Term], hints: &[GrammarHint]) -> String {
        let mut out = String::new();
        self.render_into(&mut out, terms, hints);
        out
    }

    fn render_into(&self, out: &mut String, terms: &[Term], hints: &[GrammarHint]) {
        for (i, sequence) in self.alternatives.iter().enumerate() {
            if i > 0 {
                out.push_str(" | ");
            }
            for (j, element) in sequence.iter().enumerate() {
                if j > 0 {
                    out.push_str(" + ");
                }
                match element {
                    Element::Term(term) => out.push_str(terms[term.index()].name()),
                    Element::Hint(hint) => out.push_str(&hints[hint.index()].description()),
                    Element::Group(group) => {
                        out.push('(');
                        group.render_into(out, terms, hints);
                        out.push(')');
                    }
                }
            }
        }
    }

    pub(crate) fn alternatives_mut(&mut self) -> &mut SmallVec<[Sequence; 2]> {
        &mut self.alternatives
    }
}

impl From<TermId> for BnfExpr {
    fn from(term: TermId) -> Self {
        Self::term(term)
    }
}

impl From<HintId> for BnfExpr {
    fn from(hint: HintId) -> Self {
        Self::hint(hint)
    }
}

impl From<Element> for BnfExpr {
    fn from(element: Element) -> Self {
        Self::element(element)
    }
}

impl From<&BnfExpr> for BnfExpr {
    fn from(expr: &BnfExpr) -> Self {
        expr.clone()
    }
}

/// Concatenate all `items`
///
/// # Panics
///
/// Panics if `items` is empty.
#[must_use]
pub fn seq<I>(items: I) -> BnfExpr
where
    I: IntoIterator,
    I::Item: Into<BnfExpr>,
{
    items
        .into_iter()
        .map(Into::into)
        .reduce(|acc, item| acc.then(item))
        .expect("seq requires at least one item")
}

/// Alternate all `items`
///
/// # Panics
///
/// Panics if `items` is empty.
#[must_use]
pub fn alt<I>(items: I) -> BnfExpr
where
    I: IntoIterator,
    I::Item: Into<BnfExpr>,
{
    items
        .into_iter()
        .map(Into::into)
        .reduce(|acc, item| acc.or(item))
        .expect("alt requires at least one item")
}
