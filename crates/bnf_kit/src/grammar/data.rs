use hashbrown::HashMap;

use crate::config::{GrammarConfig, LanguageFlags};
use crate::error::GrammarErrorList;
use crate::grammar::{
    BnfExpr, ClosureKind, GrammarHint, HintId, NonTerminalData, Production, StandardTerms,
    TermReportGroup,
};
use crate::intern::FrozenKeyTermTable;
use crate::parsing::ParseTreeNode;
use crate::term::{Term, TermId};

/// A finalized grammar.
///
/// Produced by [`GrammarBuilder::build`](crate::grammar::GrammarBuilder::build).
/// Terms, rules and flags are read-only; the only mutation left is
/// [`Grammar::set_productions`], used by the parser-table builder.
///
/// `Grammar` is `Send + Sync` and can be shared across threads once built.
#[derive(Debug)]
pub struct Grammar {
    pub(super) config: GrammarConfig,
    pub(super) terms: Vec<Term>,
    pub(super) hints: Vec<GrammarHint>,
    pub(super) key_terms: FrozenKeyTermTable,
    pub(super) standard: StandardTerms,
    pub(super) root: TermId,
    pub(super) snippet_roots: Vec<TermId>,
    pub(super) non_grammar_terminals: Vec<TermId>,
    pub(super) fallback_terminals: Vec<TermId>,
    pub(super) closures: HashMap<(TermId, ClosureKind), TermId, ahash::RandomState>,
    pub(super) new_line_plus: Option<TermId>,
    pub(super) new_line_star: Option<TermId>,
    pub(super) report_groups: Vec<TermReportGroup>,
    pub(super) reachable: Vec<bool>,
    pub(super) errors: GrammarErrorList,
}

impl Grammar {
    #[must_use]
    pub const fn config(&self) -> &GrammarConfig {
        &self.config
    }

    #[must_use]
    pub const fn case_sensitive(&self) -> bool {
        self.config.case_sensitive
    }

    #[must_use]
    pub const fn language_flag_is_set(&self, flags: LanguageFlags) -> bool {
        self.config.flag_is_set(flags)
    }

    /// # Panics
    ///
    /// Panics if `id` does not belong to this grammar.
    #[must_use]
    pub fn term(&self, id: TermId) -> &Term {
        &self.terms[id.index()]
    }

    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        self.terms.iter()
    }

    pub fn non_terminals(&self) -> impl Iterator<Item = &Term> {
        self.terms.iter().filter(|t| t.is_non_terminal())
    }

    /// # Panics
    ///
    /// Panics if `id` does not belong to this grammar.
    #[must_use]
    pub fn hint(&self, id: HintId) -> &GrammarHint {
        &self.hints[id.index()]
    }

    #[must_use]
    pub fn hints(&self) -> &[GrammarHint] {
        &self.hints
    }

    /// Key term interned for `text`, compared under the grammar's case policy
    #[must_use]
    pub fn key_term(&self, text: &str) -> Option<TermId> {
        self.key_terms.get(text)
    }

    #[must_use]
    pub const fn key_terms(&self) -> &FrozenKeyTermTable {
        &self.key_terms
    }

    #[must_use]
    pub const fn standard(&self) -> &StandardTerms {
        &self.standard
    }

    #[must_use]
    pub const fn root(&self) -> TermId {
        self.root
    }

    #[must_use]
    pub fn snippet_roots(&self) -> &[TermId] {
        &self.snippet_roots
    }

    #[must_use]
    pub fn non_grammar_terminals(&self) -> &[TermId] {
        &self.non_grammar_terminals
    }

    #[must_use]
    pub fn fallback_terminals(&self) -> &[TermId] {
        &self.fallback_terminals
    }

    #[must_use]
    pub const fn new_line_plus(&self) -> Option<TermId> {
        self.new_line_plus
    }

    #[must_use]
    pub const fn new_line_star(&self) -> Option<TermId> {
        self.new_line_star
    }

    #[must_use]
    pub fn rule(&self, nt: TermId) -> Option<&BnfExpr> {
        self.term(nt).as_non_terminal().and_then(NonTerminalData::rule)
    }

    #[must_use]
    pub fn closure_of(&self, term: TermId, kind: ClosureKind) -> Option<TermId> {
        self.closures.get(&(term, kind)).copied()
    }

    /// True if `term` is reachable from the root or a snippet root
    #[must_use]
    pub fn is_reachable(&self, term: TermId) -> bool {
        self.reachable.get(term.index()).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn report_groups(&self) -> &[TermReportGroup] {
        &self.report_groups
    }

    /// Non-fatal diagnostics from validation
    #[must_use]
    pub const fn errors(&self) -> &GrammarErrorList {
        &self.errors
    }

    /// Productions of `nt`; empty until the table builder sets them
    #[must_use]
    pub fn productions(&self, nt: TermId) -> &[Production] {
        self.term(nt)
            .as_non_terminal()
            .map(NonTerminalData::productions)
            .unwrap_or(&[])
    }

    /// # Panics
    ///
    /// Panics if `nt` is a terminal.
    pub fn set_productions(&mut self, nt: TermId, productions: Vec<Production>) {
        let term = &mut self.terms[nt.index()];
        if term.is_terminal() {
            panic!("'{}' is a terminal and has no productions", term.name());
        }
        if let Some(data) = term.as_non_terminal_mut() {
            *data.productions_mut() = productions;
        }
    }

    /// Text form of `expr` with term names
    #[must_use]
    pub fn expr_text(&self, expr: &BnfExpr) -> String {
        expr.render(&self.terms, &self.hints)
    }

    /// Caption of a parse tree node for tree views.
    ///
    /// Error nodes are marked, token nodes show their text, and non-terminals
    /// with a caption template substitute `{0}`, `{1}`, ... with the captions
    /// of their children.
    #[must_use]
    pub fn parse_node_caption(&self, node: &ParseTreeNode) -> String {
        let term = self.term(node.term);
        if node.is_error {
            return format!("{} (Syntax error)", term.name());
        }
        if let Some(token) = &node.token {
            return token.text.to_string();
        }
        match term
            .as_non_terminal()
            .and_then(NonTerminalData::node_caption_template)
        {
            Some(template) if !template.is_empty() => self.fill_caption_template(template, node),
            _ => term.name().to_string(),
        }
    }

    fn fill_caption_template(&self, template: &str, node: &ParseTreeNode) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let placeholder = after.find('}').and_then(|close| {
                let index: usize = after[..close].parse().ok()?;
                Some((index, close))
            });
            match placeholder {
                Some((index, close)) if index < node.children.len() => {
                    out.push_str(&self.parse_node_caption(&node.children[index]));
                    rest = &after[close + 1..];
                }
                _ => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{GrammarBuilder, seq};
    use crate::parsing::Token;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_grammar_is_send_sync() {
        assert_send_sync::<Grammar>();
    }

    fn assignment() -> (Grammar, TermId, TermId, TermId) {
        let mut g = GrammarBuilder::new();
        let ident = g.terminal("identifier");
        let eq = g.term("=");
        let assign = g.non_terminal("Assign");
        g.set_rule(assign, seq([ident, eq, ident]));
        g.set_node_caption_template(assign, "{0} := {2}");
        g.set_root(assign);
        (g.build().unwrap(), assign, ident, eq)
    }

    fn leaf(term: TermId, text: &str) -> ParseTreeNode {
        ParseTreeNode::from_token(Token::new(term, text, 0))
    }

    #[test]
    fn test_caption_template() {
        let (grammar, assign, ident, eq) = assignment();
        let node = ParseTreeNode::new(assign).with_children(vec![
            leaf(ident, "x"),
            leaf(eq, "="),
            leaf(ident, "y"),
        ]);
        assert_eq!(grammar.parse_node_caption(&node), "x := y");
    }

    #[test]
    fn test_caption_template_out_of_range_kept() {
        let (grammar, assign, ident, _) = assignment();
        let node = ParseTreeNode::new(assign).with_children(vec![leaf(ident, "x")]);
        assert_eq!(grammar.parse_node_caption(&node), "x := {2}");
    }

    #[test]
    fn test_caption_error_and_plain() {
        let (grammar, assign, _, _) = assignment();
        let mut node = ParseTreeNode::new(assign);
        node.is_error = true;
        assert_eq!(grammar.parse_node_caption(&node), "Assign (Syntax error)");

        let root = grammar.root();
        assert_eq!(root, assign);
        let plain = ParseTreeNode::new(grammar.standard().eof);
        assert_eq!(grammar.parse_node_caption(&plain), "EOF");
    }

    #[test]
    fn test_set_productions() {
        let (mut grammar, assign, ident, eq) = assignment();
        assert!(grammar.productions(assign).is_empty());
        assert!(grammar.productions(ident).is_empty());

        grammar.set_productions(assign, vec![Production::new(assign, [ident, eq, ident])]);
        assert_eq!(grammar.productions(assign).len(), 1);
        assert_eq!(grammar.productions(assign)[0].rhs.as_slice(), &[ident, eq, ident]);
    }

    #[test]
    fn test_expr_text() {
        let (grammar, assign, _, _) = assignment();
        let rule = grammar.rule(assign).unwrap();
        assert_eq!(grammar.expr_text(rule), "identifier + = + identifier");
    }
}
