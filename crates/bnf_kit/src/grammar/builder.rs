use compact_str::CompactString;
use hashbrown::HashMap;

use crate::config::GrammarConfig;
use crate::error::{BuildError, GrammarErrorLevel, GrammarErrorList};
use crate::grammar::{
    BackendHint, BnfExpr, ClosureKind, Element, Grammar, GrammarHint, HintId, HintPayload,
    HintType, NonTerminalData, TermReportGroup, TokenPreviewHint, validate,
};
use crate::intern::{CaseSensitivity, KeyTermTable};
use crate::term::{Associativity, Term, TermFlags, TermId, TermKind, TokenCategory};

/// Terminals every grammar carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardTerms {
    /// End of input
    pub eof: TermId,
    /// Matches nothing; used for nullable alternatives
    pub empty: TermId,
    pub new_line: TermId,
    pub indent: TermId,
    pub dedent: TermId,
    /// End of statement, produced by layout-aware scanners
    pub eos: TermId,
    /// Carries a scanner error message as token text
    pub syntax_error: TermId,
    pub line_start: TermId,
}

/// Grammar construction session.
///
/// Every term of a grammar is created through its builder and addressed by a
/// [`TermId`]; literal text becomes a term only through
/// [`GrammarBuilder::term`]. [`GrammarBuilder::build`] ends the session,
/// validates the grammar and returns an immutable [`Grammar`].
///
/// # Example
///
/// ```rust
/// use bnf_kit::grammar::{GrammarBuilder, IntoExpr, seq};
/// use bnf_kit::term::Associativity;
///
/// let mut g = GrammarBuilder::new();
/// let number = g.terminal("number");
/// let expr = g.non_terminal("Expr");
/// let bin_op = g.non_terminal("BinOp");
///
/// let plus = g.term("+");
/// let star = g.term("*");
/// g.set_rule(bin_op, plus.into_expr().or(star));
/// g.set_rule(expr, seq([expr, bin_op, expr]).or(number));
/// g.register_operators(10, ["+"]);
/// g.register_operators_with(20, Associativity::Right, ["*"]);
/// g.mark_transient([bin_op]);
/// g.set_root(expr);
///
/// let grammar = g.build()?;
/// assert_eq!(grammar.term(star).precedence(), 20);
/// # Ok::<(), bnf_kit::error::BuildError>(())
/// ```
#[derive(Debug)]
pub struct GrammarBuilder {
    pub(super) config: GrammarConfig,
    pub(super) terms: Vec<Term>,
    pub(super) hints: Vec<GrammarHint>,
    pub(super) key_terms: KeyTermTable,
    pub(super) standard: StandardTerms,
    pub(super) root: Option<TermId>,
    pub(super) snippet_roots: Vec<TermId>,
    pub(super) non_grammar_terminals: Vec<TermId>,
    pub(super) fallback_terminals: Vec<TermId>,
    /// Derived `x?`, `x+` and `x*` forms, one per term and kind
    pub(super) closures: HashMap<(TermId, ClosureKind), TermId, ahash::RandomState>,
    pub(super) new_line_plus: Option<TermId>,
    pub(super) new_line_star: Option<TermId>,
    pub(super) report_groups: Vec<TermReportGroup>,
}

impl Default for GrammarBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GrammarBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(GrammarConfig::default())
    }

    #[must_use]
    pub fn with_config(config: GrammarConfig) -> Self {
        let mut terms = Vec::new();
        let mut standard_terminal = |name: &str, category, flags| {
            let id = TermId::new(terms.len());
            let mut term = Term::new(id, name, TermKind::Terminal { category });
            term.set_flag(flags);
            terms.push(term);
            id
        };
        let standard = StandardTerms {
            eof: standard_terminal("EOF", TokenCategory::Outline, TermFlags::NONE),
            empty: standard_terminal("EMPTY", TokenCategory::Content, TermFlags::IS_NULLABLE),
            new_line: standard_terminal("LF", TokenCategory::Outline, TermFlags::NONE),
            indent: standard_terminal("INDENT", TokenCategory::Outline, TermFlags::IS_NON_SCANNER),
            dedent: standard_terminal("DEDENT", TokenCategory::Outline, TermFlags::IS_NON_SCANNER),
            eos: standard_terminal("EOS", TokenCategory::Outline, TermFlags::IS_NON_SCANNER),
            syntax_error: standard_terminal(
                "SYNTAX_ERROR",
                TokenCategory::Error,
                TermFlags::IS_NON_SCANNER,
            ),
            line_start: standard_terminal("LINE_START", TokenCategory::Outline, TermFlags::NONE),
        };

        let case = CaseSensitivity::from_flag(config.case_sensitive);
        tracing::debug!(case_sensitive = config.case_sensitive, "grammar session started");

        Self {
            config,
            terms,
            hints: Vec::new(),
            key_terms: KeyTermTable::new(case),
            standard,
            root: None,
            snippet_roots: Vec::new(),
            non_grammar_terminals: Vec::new(),
            fallback_terminals: Vec::new(),
            closures: HashMap::with_hasher(ahash::RandomState::new()),
            new_line_plus: None,
            new_line_star: None,
            report_groups: Vec::new(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &GrammarConfig {
        &self.config
    }

    #[must_use]
    pub const fn case_sensitivity(&self) -> CaseSensitivity {
        self.key_terms.case_sensitivity()
    }

    #[must_use]
    pub const fn standard(&self) -> &StandardTerms {
        &self.standard
    }

    fn push_term(&mut self, name: impl Into<CompactString>, kind: TermKind) -> TermId {
        let id = TermId::new(self.terms.len());
        self.terms.push(Term::new(id, name, kind));
        id
    }

    /// New content terminal
    pub fn terminal(&mut self, name: impl Into<CompactString>) -> TermId {
        self.terminal_with(name, TokenCategory::Content, TermFlags::NONE)
    }

    pub fn terminal_with(
        &mut self,
        name: impl Into<CompactString>,
        category: TokenCategory,
        flags: TermFlags,
    ) -> TermId {
        let id = self.push_term(name, TermKind::Terminal { category });
        self.terms[id.index()].set_flag(flags);
        id
    }

    /// New non-terminal without a rule
    pub fn non_terminal(&mut self, name: impl Into<CompactString>) -> TermId {
        self.push_term(name, TermKind::NonTerminal(Box::default()))
    }

    /// New non-terminal with `rule`
    pub fn non_terminal_with_rule(
        &mut self,
        name: impl Into<CompactString>,
        rule: impl Into<BnfExpr>,
    ) -> TermId {
        let id = self.non_terminal(name);
        self.set_rule(id, rule);
        id
    }

    /// Interned key term for `text`.
    ///
    /// The same text always yields the same term; in case-insensitive
    /// grammars `"IF"` and `"if"` are the same term.
    pub fn term(&mut self, text: &str) -> TermId {
        self.intern(text, None)
    }

    /// Interned key term with a display name.
    ///
    /// The display name is only filled in if the term did not have one yet.
    pub fn term_named(&mut self, text: &str, name: &str) -> TermId {
        self.intern(text, Some(name))
    }

    fn intern(&mut self, text: &str, display_name: Option<&str>) -> TermId {
        if let Some(id) = self.key_terms.get(text) {
            if let Some(name) = display_name {
                self.terms[id.index()].set_display_name(name);
            }
            return id;
        }

        let id = TermId::new(self.terms.len());
        let normalized = CompactString::from(self.key_terms.insert(text, id));
        let is_word = normalized
            .chars()
            .next()
            .is_some_and(|c| c.is_alphabetic() || c == '_');
        let kind = TermKind::KeyTerm {
            text: normalized,
            display_name: display_name
                .filter(|name| !name.is_empty())
                .map(CompactString::from),
        };
        self.terms.push(Term::new(id, text, kind));
        if is_word {
            self.terms[id.index()].set_flag(TermFlags::IS_KEYWORD);
        }
        tracing::trace!(text, ?id, "interned key term");
        id
    }

    /// Key term for `text` if it was interned
    #[must_use]
    pub fn key_term(&self, text: &str) -> Option<TermId> {
        self.key_terms.get(text)
    }

    /// # Panics
    ///
    /// Panics if `id` was not created by this builder.
    #[must_use]
    pub fn get(&self, id: TermId) -> &Term {
        &self.terms[id.index()]
    }

    /// # Panics
    ///
    /// Panics if `id` was not created by this builder.
    pub fn term_mut(&mut self, id: TermId) -> &mut Term {
        &mut self.terms[id.index()]
    }

    #[must_use]
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    fn non_terminal_data(&mut self, id: TermId) -> &mut NonTerminalData {
        let term = &mut self.terms[id.index()];
        let name = term.name().to_string();
        match term.as_non_terminal_mut() {
            Some(data) => data,
            None => panic!("'{name}' is a terminal and cannot have a rule"),
        }
    }

    /// Set the rule of non-terminal `nt`, replacing any previous rule.
    ///
    /// # Panics
    ///
    /// Panics if `nt` is a terminal.
    pub fn set_rule(&mut self, nt: TermId, rule: impl Into<BnfExpr>) {
        self.non_terminal_data(nt).set_rule(rule.into());
    }

    /// Rule of `nt`, if it is a non-terminal with a rule
    #[must_use]
    pub fn rule(&self, nt: TermId) -> Option<&BnfExpr> {
        self.get(nt).as_non_terminal().and_then(NonTerminalData::rule)
    }

    /// # Panics
    ///
    /// Panics if `nt` is a terminal.
    pub fn set_error_rule(&mut self, nt: TermId, rule: impl Into<BnfExpr>) {
        self.non_terminal_data(nt).set_error_rule(rule.into());
    }

    /// Caption template for tree views; `{0}`, `{1}`, ... stand for child captions
    ///
    /// # Panics
    ///
    /// Panics if `nt` is a terminal.
    pub fn set_node_caption_template(&mut self, nt: TermId, template: impl Into<CompactString>) {
        self.non_terminal_data(nt)
            .set_node_caption_template(template.into());
    }

    pub fn set_root(&mut self, root: TermId) {
        self.root = Some(root);
    }

    #[must_use]
    pub const fn root(&self) -> Option<TermId> {
        self.root
    }

    /// Alternate entry point for parsing fragments
    pub fn add_snippet_root(&mut self, root: TermId) {
        if !self.snippet_roots.contains(&root) {
            self.snippet_roots.push(root);
        }
    }

    /// Terminal ignored by the parser, such as a comment
    pub fn add_non_grammar_terminal(&mut self, terminal: TermId) {
        self.terms[terminal.index()].set_flag(TermFlags::IS_NON_GRAMMAR);
        if !self.non_grammar_terminals.contains(&terminal) {
            self.non_grammar_terminals.push(terminal);
        }
    }

    /// Terminal tried when no terminal claims the current input character
    pub fn add_fallback_terminal(&mut self, terminal: TermId) {
        if !self.fallback_terminals.contains(&terminal) {
            self.fallback_terminals.push(terminal);
        }
    }

    /// Register `symbols` as left-associative operators
    pub fn register_operators<'s>(
        &mut self,
        precedence: u32,
        symbols: impl IntoIterator<Item = &'s str>,
    ) {
        self.register_operators_with(precedence, Associativity::Left, symbols);
    }

    pub fn register_operators_with<'s>(
        &mut self,
        precedence: u32,
        associativity: Associativity,
        symbols: impl IntoIterator<Item = &'s str>,
    ) {
        for symbol in symbols {
            let id = self.term(symbol);
            self.register_operator(id, precedence, associativity);
        }
    }

    pub fn register_operator_terms(
        &mut self,
        precedence: u32,
        associativity: Associativity,
        terms: impl IntoIterator<Item = TermId>,
    ) {
        for id in terms {
            self.register_operator(id, precedence, associativity);
        }
    }

    fn register_operator(&mut self, id: TermId, precedence: u32, associativity: Associativity) {
        let term = &mut self.terms[id.index()];
        term.set_flag(TermFlags::IS_OPERATOR);
        term.set_precedence(precedence);
        term.set_associativity(associativity);
    }

    /// Mark `open` and `close` as a brace pair linked to each other
    pub fn register_brace_pair(&mut self, open: &str, close: &str) -> (TermId, TermId) {
        let open = self.term(open);
        let close = self.term(close);

        let open_term = &mut self.terms[open.index()];
        open_term.set_flag(TermFlags::IS_OPEN_BRACE);
        open_term.set_pair_for(close);

        let close_term = &mut self.terms[close.index()];
        close_term.set_flag(TermFlags::IS_CLOSE_BRACE);
        close_term.set_pair_for(open);

        (open, close)
    }

    /// Mark `symbols` as punctuation; punctuation produces no AST node
    pub fn mark_punctuation<'s>(&mut self, symbols: impl IntoIterator<Item = &'s str>) {
        let ids: Vec<TermId> = symbols.into_iter().map(|s| self.term(s)).collect();
        self.mark_punctuation_terms(ids);
    }

    pub fn mark_punctuation_terms(&mut self, terms: impl IntoIterator<Item = TermId>) {
        self.set_flags(terms, TermFlags::IS_PUNCTUATION | TermFlags::NO_AST_NODE);
    }

    /// Mark non-terminals whose tree node is replaced by its child
    pub fn mark_transient(&mut self, non_terminals: impl IntoIterator<Item = TermId>) {
        self.set_flags(non_terminals, TermFlags::IS_TRANSIENT | TermFlags::NO_AST_NODE);
    }

    pub fn mark_reserved_words<'s>(&mut self, words: impl IntoIterator<Item = &'s str>) {
        let ids: Vec<TermId> = words.into_iter().map(|w| self.term(w)).collect();
        self.set_flags(ids, TermFlags::IS_RESERVED_WORD);
    }

    /// Mark member-access symbols such as `.`
    pub fn mark_member_select<'s>(&mut self, symbols: impl IntoIterator<Item = &'s str>) {
        let ids: Vec<TermId> = symbols.into_iter().map(|s| self.term(s)).collect();
        self.set_flags(ids, TermFlags::IS_MEMBER_SELECT);
    }

    /// Keep `symbols` out of expected-symbol lists in syntax errors
    pub fn mark_not_reported<'s>(&mut self, symbols: impl IntoIterator<Item = &'s str>) {
        let ids: Vec<TermId> = symbols.into_iter().map(|s| self.term(s)).collect();
        self.mark_not_reported_terms(ids);
    }

    pub fn mark_not_reported_terms(&mut self, terms: impl IntoIterator<Item = TermId>) {
        self.set_flags(terms, TermFlags::IS_NOT_REPORTED);
    }

    fn set_flags(&mut self, terms: impl IntoIterator<Item = TermId>, flags: TermFlags) {
        for id in terms {
            self.terms[id.index()].set_flag(flags);
        }
    }

    /// Store `hint` and return its handle for use in rules
    pub fn add_hint(&mut self, hint: impl Into<GrammarHint>) -> HintId {
        let id = HintId::new(self.hints.len());
        self.hints.push(hint.into());
        id
    }

    /// # Panics
    ///
    /// Panics if `id` was not created by this builder.
    #[must_use]
    pub fn hint(&self, id: HintId) -> &GrammarHint {
        &self.hints[id.index()]
    }

    pub fn prefer_shift_here(&mut self) -> HintId {
        self.add_hint(GrammarHint::new(HintType::ResolveToShift))
    }

    pub fn reduce_here(&mut self) -> HintId {
        self.add_hint(GrammarHint::new(HintType::ResolveToReduce))
    }

    /// Defer the conflict at this position to
    /// [`LanguageHooks::on_resolving_conflict`](crate::parsing::LanguageHooks::on_resolving_conflict)
    pub fn resolve_in_code(&mut self) -> HintId {
        self.add_hint(GrammarHint::new(HintType::ResolveInCode))
    }

    pub fn imply_precedence_here(&mut self, precedence: u32) -> HintId {
        self.imply_precedence_here_with(precedence, Associativity::Left)
    }

    pub fn imply_precedence_here_with(
        &mut self,
        precedence: u32,
        associativity: Associativity,
    ) -> HintId {
        self.add_hint(GrammarHint::precedence(precedence, associativity))
    }

    /// Shift if `trigger` appears ahead before any of `comes_before`
    pub fn shift_if<'s>(
        &mut self,
        trigger: &str,
        comes_before: impl IntoIterator<Item = &'s str>,
    ) -> HintId {
        self.preview_hint(TokenPreviewHint::shift_if(trigger).comes_before(comes_before))
    }

    /// Reduce if `trigger` appears ahead before any of `comes_before`
    pub fn reduce_if<'s>(
        &mut self,
        trigger: &str,
        comes_before: impl IntoIterator<Item = &'s str>,
    ) -> HintId {
        self.preview_hint(TokenPreviewHint::reduce_if(trigger).comes_before(comes_before))
    }

    pub fn preview_hint(&mut self, hint: TokenPreviewHint) -> HintId {
        self.add_hint(hint)
    }

    pub fn custom_hint(&mut self, payload: impl BackendHint + 'static) -> HintId {
        self.add_hint(GrammarHint::custom(payload))
    }

    /// Finish the session.
    ///
    /// Resolves preview hints, lifts grouped alternations into transient
    /// non-terminals, computes nullability and reachability, and validates
    /// the grammar. Non-fatal diagnostics are kept on [`Grammar::errors`].
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Aborted`] if no root is set, and
    /// [`BuildError::Invalid`] if validation finds error-level problems.
    pub fn build(mut self) -> Result<Grammar, BuildError> {
        let _span = tracing::debug_span!("build_grammar", terms = self.terms.len()).entered();

        let mut errors = GrammarErrorList::new();
        let root = validate::require_root(self.root, &mut errors)?;

        self.init_preview_hints();
        self.lift_groups();
        validate::compute_nullable(&mut self.terms);
        self.fill_operator_groups();

        let roots: Vec<TermId> = std::iter::once(root)
            .chain(self.snippet_roots.iter().copied())
            .collect();
        let reachable = validate::reachable_terms(&self.terms, &roots);
        validate::check_grammar(&self, &reachable, &mut errors);

        if errors.max_level() >= GrammarErrorLevel::Error {
            tracing::debug!(diagnostics = errors.len(), "grammar is invalid");
            return Err(BuildError::Invalid { errors });
        }

        tracing::debug!(
            terms = self.terms.len(),
            key_terms = self.key_terms.len(),
            hints = self.hints.len(),
            diagnostics = errors.len(),
            "grammar built"
        );

        Ok(Grammar {
            config: self.config,
            terms: self.terms,
            hints: self.hints,
            key_terms: self.key_terms.freeze(),
            standard: self.standard,
            root,
            snippet_roots: self.snippet_roots,
            non_grammar_terminals: self.non_grammar_terminals,
            fallback_terminals: self.fallback_terminals,
            closures: self.closures,
            new_line_plus: self.new_line_plus,
            new_line_star: self.new_line_star,
            report_groups: self.report_groups,
            reachable,
            errors,
        })
    }

    fn init_preview_hints(&mut self) {
        for index in 0..self.hints.len() {
            if let HintPayload::TokenPreview(preview) = &self.hints[index].payload
                && !preview.is_initialized()
            {
                let mut preview = preview.clone();
                preview.init(self);
                self.hints[index].payload = HintPayload::TokenPreview(preview);
            }
        }
    }

    /// Replace every group element by a transient non-terminal.
    ///
    /// Equal groups share one non-terminal.
    fn lift_groups(&mut self) {
        let mut lifted = HashMap::with_hasher(ahash::RandomState::new());
        // lifting appends terms; those have group-free rules already
        for index in 0..self.terms.len() {
            let Some(data) = self.terms[index].as_non_terminal() else {
                continue;
            };
            let rule = data.rule().filter(|r| r.has_groups()).cloned();
            let error_rule = data.error_rule().filter(|r| r.has_groups()).cloned();

            if let Some(rule) = rule {
                let rule = self.lift_expr(rule, &mut lifted);
                self.non_terminal_data(TermId::new(index)).set_rule(rule);
            }
            if let Some(rule) = error_rule {
                let rule = self.lift_expr(rule, &mut lifted);
                self.non_terminal_data(TermId::new(index))
                    .set_error_rule(rule);
            }
        }
    }

    fn lift_expr(
        &mut self,
        mut expr: BnfExpr,
        lifted: &mut HashMap<BnfExpr, TermId, ahash::RandomState>,
    ) -> BnfExpr {
        for sequence in expr.alternatives_mut() {
            for element in sequence.iter_mut() {
                if let Element::Group(group) = element {
                    let inner = self.lift_expr((**group).clone(), lifted);
                    *element = Element::Term(self.group_term(inner, lifted));
                }
            }
        }
        expr
    }

    fn group_term(
        &mut self,
        group: BnfExpr,
        lifted: &mut HashMap<BnfExpr, TermId, ahash::RandomState>,
    ) -> TermId {
        if let Some(&id) = lifted.get(&group) {
            return id;
        }
        let name = format!("({})", group.render(&self.terms, &self.hints));
        let id = self.non_terminal(name);
        self.terms[id.index()].set_flag(TermFlags::IS_TRANSIENT | TermFlags::NO_AST_NODE);
        self.set_rule(id, group.clone());
        tracing::trace!(?id, "lifted group into non-terminal");
        lifted.insert(group, id);
        id
    }
}

/// Conversion of a term handle into a single-element expression, for
/// starting fluent chains
pub trait IntoExpr {
    fn into_expr(self) -> BnfExpr;
}

impl IntoExpr for TermId {
    fn into_expr(self) -> BnfExpr {
        BnfExpr::term(self)
    }
}

impl IntoExpr for HintId {
    fn into_expr(self) -> BnfExpr {
        BnfExpr::hint(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LanguageFlags;
    use crate::grammar::seq;

    fn expr_grammar() -> (GrammarBuilder, TermId) {
        let mut g = GrammarBuilder::new();
        let number = g.terminal("number");
        let expr = g.non_terminal("Expr");
        let plus = g.term("+");
        g.set_rule(expr, seq([expr, plus, expr]).or(number));
        g.set_root(expr);
        (g, expr)
    }

    #[test]
    fn test_standard_terms() {
        let g = GrammarBuilder::new();
        let standard = *g.standard();
        assert_eq!(g.get(standard.eof).name(), "EOF");
        assert_eq!(g.get(standard.empty).name(), "EMPTY");
        assert_eq!(g.get(standard.new_line).name(), "LF");
        assert!(g.get(standard.indent).flag_is_set(TermFlags::IS_NON_SCANNER));
        assert!(g.get(standard.empty).flag_is_set(TermFlags::IS_NULLABLE));
    }

    #[test]
    fn test_term_interning_case_sensitive() {
        let mut g = GrammarBuilder::new();
        let a = g.term("IF");
        let b = g.term("IF");
        let c = g.term("if");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(g.get(a).flag_is_set(TermFlags::IS_KEYWORD));
    }

    #[test]
    fn test_term_interning_case_insensitive() {
        let mut g = GrammarBuilder::with_config(GrammarConfig::new().case_sensitive(false));
        let upper = g.term("IF");
        let lower = g.term("if");
        assert_eq!(upper, lower);
        assert_eq!(g.get(upper).key_text(), Some("if"));
        assert_eq!(g.key_term("If"), Some(upper));
    }

    #[test]
    fn test_term_named_fills_display_name_once() {
        let mut g = GrammarBuilder::new();
        let eq = g.term("==");
        let named = g.term_named("==", "equals");
        assert_eq!(eq, named);
        assert_eq!(g.get(eq).name(), "equals");
        g.term_named("==", "eq");
        assert_eq!(g.get(eq).name(), "equals");
    }

    #[test]
    fn test_register_operators_interns_and_updates() {
        let mut g = GrammarBuilder::new();
        g.register_operators(10, ["+", "-"]);
        g.register_operators_with(30, Associativity::Right, ["^", "+"]);

        let plus = g.key_term("+").unwrap();
        let minus = g.key_term("-").unwrap();
        let pow = g.key_term("^").unwrap();
        assert!(g.get(plus).flag_is_set(TermFlags::IS_OPERATOR));
        assert_eq!(g.get(plus).precedence(), 30);
        assert_eq!(g.get(plus).associativity(), Associativity::Right);
        assert_eq!(g.get(minus).precedence(), 10);
        assert_eq!(g.get(minus).associativity(), Associativity::Left);
        assert_eq!(g.get(pow).precedence(), 30);
    }

    #[test]
    fn test_brace_pair_links_both_ways() {
        let mut g = GrammarBuilder::new();
        let (open, close) = g.register_brace_pair("(", ")");
        assert!(g.get(open).flag_is_set(TermFlags::IS_OPEN_BRACE));
        assert!(g.get(close).flag_is_set(TermFlags::IS_CLOSE_BRACE));
        assert_eq!(g.get(open).is_pair_for(), Some(close));
        assert_eq!(g.get(close).is_pair_for(), Some(open));
    }

    #[test]
    fn test_mark_flags() {
        let mut g = GrammarBuilder::new();
        let block = g.non_terminal("Block");
        g.mark_punctuation([";", ","]);
        g.mark_transient([block]);
        g.mark_reserved_words(["while"]);
        g.mark_member_select(["."]);
        g.mark_not_reported(["#"]);

        let semi = g.key_term(";").unwrap();
        assert!(g.get(semi).flag_is_set(TermFlags::IS_PUNCTUATION));
        assert!(g.get(semi).flag_is_set(TermFlags::NO_AST_NODE));
        assert!(g.get(block).flag_is_set(TermFlags::IS_TRANSIENT));
        assert!(g.get(block).flag_is_set(TermFlags::NO_AST_NODE));
        let kw = g.key_term("while").unwrap();
        assert!(g.get(kw).flag_is_set(TermFlags::IS_RESERVED_WORD));
        let dot = g.key_term(".").unwrap();
        assert!(g.get(dot).flag_is_set(TermFlags::IS_MEMBER_SELECT));
        let hash = g.key_term("#").unwrap();
        assert!(g.get(hash).flag_is_set(TermFlags::IS_NOT_REPORTED));
    }

    #[test]
    #[should_panic(expected = "is a terminal")]
    fn test_set_rule_on_terminal_panics() {
        let mut g = GrammarBuilder::new();
        let number = g.terminal("number");
        g.set_rule(number, number);
    }

    #[test]
    #[should_panic(expected = "'number' is a terminal")]
    fn test_caption_template_on_terminal_panics() {
        let mut g = GrammarBuilder::new();
        let number = g.terminal("number");
        g.set_node_caption_template(number, "{0}");
    }

    #[test]
    fn test_set_rule_replaces_previous_rule() {
        let mut g = GrammarBuilder::new();
        let number = g.terminal("number");
        let name = g.terminal("name");
        let value = g.non_terminal("Value");
        g.set_rule(value, number);
        g.set_rule(value, name);
        g.set_error_rule(value, number);

        let data = g.get(value).as_non_terminal().unwrap();
        assert_eq!(data.rule(), Some(&BnfExpr::from(name)));
        assert_eq!(data.error_rule(), Some(&BnfExpr::from(number)));
    }

    #[test]
    fn test_build_without_root_aborts() {
        let g = GrammarBuilder::new();
        match g.build() {
            Err(BuildError::Aborted(err)) => {
                assert_eq!(err.level(), GrammarErrorLevel::Error);
            }
            other => panic!("expected abort, got {other:?}"),
        }
    }

    #[test]
    fn test_build_reports_missing_rules_together() {
        let mut g = GrammarBuilder::new();
        let root = g.non_terminal("Root");
        let a = g.non_terminal("A");
        let b = g.non_terminal("B");
        g.set_rule(root, seq([a, b]));
        g.set_root(root);

        let Err(BuildError::Invalid { errors }) = g.build() else {
            panic!("expected invalid grammar");
        };
        let messages: Vec<&str> = errors.iter().map(|e| e.message()).collect();
        assert_eq!(messages.len(), 2);
        assert!(messages.iter().any(|m| m.contains("A")));
        assert!(messages.iter().any(|m| m.contains("B")));
    }

    #[test]
    fn test_build_lifts_groups() {
        let mut g = GrammarBuilder::new();
        let a = g.term("a");
        let b = g.term("b");
        let c = g.term("c");
        let root = g.non_terminal("Root");
        g.set_rule(root, a.into_expr().or(b).then(c));
        g.set_root(root);

        let grammar = g.build().unwrap();
        let rule = grammar.rule(root).unwrap();
        assert!(!rule.has_groups());
        let lifted = rule.alternatives()[0][0].as_term().unwrap();
        let lifted_term = grammar.term(lifted);
        assert_eq!(lifted_term.name(), "(a | b)");
        assert!(lifted_term.flag_is_set(TermFlags::IS_TRANSIENT));
        assert!(grammar.is_reachable(lifted));
    }

    #[test]
    fn test_build_computes_nullable() {
        let mut g = GrammarBuilder::new();
        let a = g.term("a");
        let root = g.non_terminal("Root");
        let opt = g.optional(a);
        g.set_rule(root, seq([opt, opt]));
        g.set_root(root);

        let grammar = g.build().unwrap();
        assert!(grammar.term(opt).flag_is_set(TermFlags::IS_NULLABLE));
        assert!(grammar.term(root).flag_is_set(TermFlags::IS_NULLABLE));
        assert!(!grammar.term(a).flag_is_set(TermFlags::IS_NULLABLE));
    }

    #[test]
    fn test_create_ast_reports_unconfigured_non_terminals() {
        let config = GrammarConfig::new().language_flags(LanguageFlags::CREATE_AST);
        let mut g = GrammarBuilder::with_config(config);
        let number = g.terminal("number");
        let root = g.non_terminal("Root");
        g.set_rule(root, number);
        g.set_root(root);

        let grammar = g.build().unwrap();
        assert_eq!(grammar.errors().max_level(), GrammarErrorLevel::Info);
        assert!(grammar.errors().iter().any(|e| e.message().contains("Root")));
    }

    #[test]
    fn test_preview_hints_resolved_on_build() {
        let (mut g, expr) = expr_grammar();
        let hint = g.shift_if("else", ["endif"]);
        let number = g.terminal("n2");
        g.set_rule(expr, seq([hint.into_expr(), number.into_expr()]).or(number));

        let grammar = g.build().unwrap();
        let preview = grammar.hint(hint).as_token_preview().unwrap();
        assert!(preview.is_initialized());
        assert_eq!(preview.trigger(), grammar.key_term("else"));
        assert!(preview.is_stop_term(grammar.key_term("endif").unwrap()));
    }
}
