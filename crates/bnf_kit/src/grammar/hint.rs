//! Conflict-resolution hints
//!
//! Hints are placed at a rule position (as [`Element::Hint`](crate::grammar::Element::Hint))
//! and consulted by the parser-table builder when it finds a shift/reduce or
//! reduce/reduce conflict at that position. Most hints are passive records;
//! [`TokenPreviewHint`] actively scans ahead in the token stream.

use compact_str::CompactString;
use hashbrown::HashSet;
use smallvec::SmallVec;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::grammar::GrammarBuilder;
use crate::parsing::{ConflictResolutionArgs, ParserAction};
use crate::term::{Associativity, TermId, arena_id};

arena_id! {
    /// Handle of a [`GrammarHint`] inside its grammar.
    pub struct HintId;
}

/// Trait for opaque hint payloads interpreted by a specific table builder
pub trait BackendHint: fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn description(&self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HintType {
    /// Resolve the conflict in favor of shift
    ResolveToShift,
    /// Resolve the conflict in favor of reduce
    ResolveToReduce,
    /// Resolve the conflict at parse time in host code
    ResolveInCode,
    /// Imply operator precedence at this position
    Precedence,
    Custom,
}

/// Data carried by a hint
#[derive(Debug, Clone, Default)]
pub enum HintPayload {
    #[default]
    None,
    TokenPreview(TokenPreviewHint),
    Custom(Arc<dyn BackendHint>),
}

/// A conflict-resolution instruction at a rule position.
#[derive(Debug, Clone)]
pub struct GrammarHint {
    pub hint_type: HintType,
    /// Implied precedence for [`HintType::Precedence`]
    pub precedence: u32,
    pub associativity: Associativity,
    pub payload: HintPayload,
}

impl GrammarHint {
    #[must_use]
    pub const fn new(hint_type: HintType) -> Self {
        Self {
            hint_type,
            precedence: 0,
            associativity: Associativity::Left,
            payload: HintPayload::None,
        }
    }

    #[must_use]
    pub const fn precedence(precedence: u32, associativity: Associativity) -> Self {
        Self {
            hint_type: HintType::Precedence,
            precedence,
            associativity,
            payload: HintPayload::None,
        }
    }

    #[must_use]
    pub fn custom(payload: impl BackendHint + 'static) -> Self {
        Self {
            payload: HintPayload::Custom(Arc::new(payload)),
            ..Self::new(HintType::Custom)
        }
    }

    #[must_use]
    pub fn as_token_preview(&self) -> Option<&TokenPreviewHint> {
        match &self.payload {
            HintPayload::TokenPreview(hint) => Some(hint),
            _ => None,
        }
    }

    /// Downcast a custom payload
    #[must_use]
    pub fn custom_payload<H: BackendHint + 'static>(&self) -> Option<&H> {
        match &self.payload {
            HintPayload::Custom(hint) => hint.as_any().downcast_ref::<H>(),
            _ => None,
        }
    }

    /// Short text used when printing rules
    #[must_use]
    pub fn description(&self) -> String {
        match (&self.hint_type, &self.payload) {
            (_, HintPayload::TokenPreview(preview)) => preview.description(),
            (_, HintPayload::Custom(custom)) => custom.description(),
            (HintType::ResolveToShift, _) => "PreferShiftHere()".to_string(),
            (HintType::ResolveToReduce, _) => "ReduceHere()".to_string(),
            (HintType::ResolveInCode, _) => "ResolveInCode()".to_string(),
            (HintType::Precedence, _) => format!(
                "ImplyPrecedence({}, {:?})",
                self.precedence, self.associativity
            ),
            (HintType::Custom, HintPayload::None) => "CustomHint()".to_string(),
        }
    }
}

impl From<TokenPreviewHint> for GrammarHint {
    fn from(hint: TokenPreviewHint) -> Self {
        Self {
            payload: HintPayload::TokenPreview(hint),
            ..Self::new(HintType::Custom)
        }
    }
}

/// How many unrelated tokens a preview may skip before giving up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PreviewBudget {
    #[default]
    Unbounded,
    Tokens(usize),
}

impl PreviewBudget {
    /// True once `skipped` unrelated tokens exceed the budget
    #[must_use]
    pub const fn is_exceeded(self, skipped: usize) -> bool {
        match self {
            Self::Unbounded => false,
            Self::Tokens(max) => skipped > max,
        }
    }
}

/// A symbol named by a token preview hint, before or after resolution
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PreviewSymbol {
    /// Literal text, interned as a key term when the grammar is built
    Text(CompactString),
    Term(TermId),
}

impl From<&str> for PreviewSymbol {
    fn from(text: &str) -> Self {
        Self::Text(text.into())
    }
}

impl From<TermId> for PreviewSymbol {
    fn from(term: TermId) -> Self {
        Self::Term(term)
    }
}

#[derive(Debug, Clone)]
struct ResolvedPreview {
    trigger: TermId,
    stops: HashSet<TermId, ahash::RandomState>,
}

/// Resolves a conflict by scanning ahead for a trigger token.
///
/// The scan stops without a match at a stop token, at end of input, or when
/// the preview budget is exhausted.
///
/// ```rust,no_run
/// use bnf_kit::grammar::TokenPreviewHint;
///
/// let hint = TokenPreviewHint::shift_if("else")
///     .comes_before(["endif"])
///     .max_preview(5);
/// ```
#[derive(Debug, Clone)]
pub struct TokenPreviewHint {
    action: ParserAction,
    trigger: PreviewSymbol,
    stop_symbols: SmallVec<[PreviewSymbol; 2]>,
    budget: PreviewBudget,
    resolved: Option<ResolvedPreview>,
}

impl TokenPreviewHint {
    #[must_use]
    pub fn new(action: ParserAction, trigger: impl Into<PreviewSymbol>) -> Self {
        Self {
            action,
            trigger: trigger.into(),
            stop_symbols: SmallVec::new(),
            budget: PreviewBudget::Unbounded,
            resolved: None,
        }
    }

    /// Shift if `trigger` shows up ahead
    #[must_use]
    pub fn shift_if(trigger: impl Into<PreviewSymbol>) -> Self {
        Self::new(ParserAction::Shift, trigger)
    }

    /// Reduce if `trigger` shows up ahead
    #[must_use]
    pub fn reduce_if(trigger: impl Into<PreviewSymbol>) -> Self {
        Self::new(ParserAction::Reduce, trigger)
    }

    /// Stop the scan without a match at any of `symbols`
    #[must_use]
    pub fn comes_before<I>(mut self, symbols: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<PreviewSymbol>,
    {
        self.stop_symbols.extend(symbols.into_iter().map(Into::into));
        self
    }

    /// Give up after skipping more than `tokens` unrelated tokens
    #[must_use]
    pub const fn max_preview(mut self, tokens: usize) -> Self {
        self.budget = PreviewBudget::Tokens(tokens);
        self
    }

    #[must_use]
    pub const fn unbounded(mut self) -> Self {
        self.budget = PreviewBudget::Unbounded;
        self
    }

    #[must_use]
    pub const fn action(&self) -> ParserAction {
        self.action
    }

    #[must_use]
    pub const fn budget(&self) -> PreviewBudget {
        self.budget
    }

    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.resolved.is_some()
    }

    /// Resolved trigger terminal
    #[must_use]
    pub fn trigger(&self) -> Option<TermId> {
        self.resolved.as_ref().map(|r| r.trigger)
    }

    #[must_use]
    pub fn is_stop_term(&self, term: TermId) -> bool {
        self.resolved
            .as_ref()
            .is_some_and(|r| r.stops.contains(&term))
    }

    /// Resolve trigger and stop symbols to terms, interning literal text
    pub fn init(&mut self, grammar: &mut GrammarBuilder) {
        let trigger = Self::resolve(grammar, &self.trigger);
        let stops = self
            .stop_symbols
            .iter()
            .map(|symbol| Self::resolve(grammar, symbol))
            .collect();
        self.resolved = Some(ResolvedPreview { trigger, stops });
    }

    fn resolve(grammar: &mut GrammarBuilder, symbol: &PreviewSymbol) -> TermId {
        match symbol {
            PreviewSymbol::Text(text) => grammar.term(text),
            PreviewSymbol::Term(term) => *term,
        }
    }

    /// Scan ahead for the trigger token.
    ///
    /// On a match the configured action is stored in `args.result`. The
    /// scanner's preview mode is entered once and left once on every path.
    pub fn matches(&self, args: &mut ConflictResolutionArgs<'_, '_>) -> bool {
        let Some(resolved) = &self.resolved else {
            tracing::warn!("token preview hint used before grammar initialization");
            return false;
        };
        let eof = args.context.grammar().standard().eof;

        let mut skipped = 0usize;
        let mut preview = args.context.preview();
        loop {
            let token = preview.next_token();
            if token.term == eof {
                return false;
            }
            if token.term == resolved.trigger {
                args.result = Some(self.action);
                return true;
            }
            if resolved.stops.contains(&token.term) {
                return false;
            }
            skipped += 1;
            if self.budget.is_exceeded(skipped) {
                tracing::trace!(skipped, "token preview budget exhausted");
                return false;
            }
        }
    }

    fn description(&self) -> String {
        let action = match self.action {
            ParserAction::Shift => "ShiftIf",
            ParserAction::Reduce => "ReduceIf",
        };
        let symbol = match &self.trigger {
            PreviewSymbol::Text(text) => text.to_string(),
            PreviewSymbol::Term(term) => format!("{term:?}"),
        };
        format!("{action}({symbol})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Dangling;

    impl BackendHint for Dangling {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn description(&self) -> String {
            "Dangling".to_string()
        }
    }

    #[test]
    fn test_budget() {
        assert!(!PreviewBudget::Unbounded.is_exceeded(usize::MAX));
        assert!(!PreviewBudget::Tokens(5).is_exceeded(5));
        assert!(PreviewBudget::Tokens(5).is_exceeded(6));
        assert!(PreviewBudget::Tokens(0).is_exceeded(1));
    }

    #[test]
    fn test_custom_payload_downcast() {
        let hint = GrammarHint::custom(Dangling);
        assert_eq!(hint.hint_type, HintType::Custom);
        assert!(hint.custom_payload::<Dangling>().is_some());
        assert_eq!(hint.description(), "Dangling");
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(
            GrammarHint::new(HintType::ResolveToShift).description(),
            "PreferShiftHere()"
        );
        let preview: GrammarHint = TokenPreviewHint::reduce_if(")").into();
        assert_eq!(preview.description(), "ReduceIf())");
    }

    #[test]
    fn test_init_resolves_text() {
        let mut builder = GrammarBuilder::new();
        let mut hint = TokenPreviewHint::shift_if("else").comes_before(["endif", "fi"]);
        assert!(!hint.is_initialized());

        hint.init(&mut builder);
        assert_eq!(hint.trigger(), Some(builder.term("else")));
        assert!(hint.is_stop_term(builder.term("endif")));
        assert!(hint.is_stop_term(builder.term("fi")));
        assert!(!hint.is_stop_term(builder.term("else")));
    }
}
