//! Term report groups
//!
//! Syntax errors list the terminals the parser expected. Report groups make
//! those lists readable: members of a group are shown once under the group's
//! alias (`operator` instead of `+ - * /`), and members of a do-not-report
//! group are left out.

use compact_str::CompactString;
use hashbrown::HashSet;
use std::collections::BTreeSet;

use crate::grammar::{Grammar, GrammarBuilder};
use crate::term::{TermFlags, TermId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermReportGroupType {
    /// Members are reported under the alias
    Normal,
    /// Members are not reported at all
    DoNotReport,
    /// Every registered operator, reported under the alias
    Operator,
}

/// An alias for a set of terminals in syntax error messages
#[derive(Debug, Clone)]
pub struct TermReportGroup {
    pub alias: CompactString,
    pub group_type: TermReportGroupType,
    pub terminals: HashSet<TermId, ahash::RandomState>,
}

impl TermReportGroup {
    #[must_use]
    pub fn new(
        alias: impl Into<CompactString>,
        group_type: TermReportGroupType,
        terminals: impl IntoIterator<Item = TermId>,
    ) -> Self {
        Self {
            alias: alias.into(),
            group_type,
            terminals: terminals.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn contains(&self, term: TermId) -> bool {
        self.terminals.contains(&term)
    }
}

impl GrammarBuilder {
    pub fn add_report_group(
        &mut self,
        alias: impl Into<CompactString>,
        group_type: TermReportGroupType,
        terminals: impl IntoIterator<Item = TermId>,
    ) {
        self.report_groups
            .push(TermReportGroup::new(alias, group_type, terminals));
    }

    /// Report `symbols` under `alias`, interning them as needed
    pub fn add_terms_report_group<'s>(
        &mut self,
        alias: impl Into<CompactString>,
        symbols: impl IntoIterator<Item = &'s str>,
    ) {
        let terms: Vec<TermId> = symbols.into_iter().map(|s| self.term(s)).collect();
        self.add_report_group(alias, TermReportGroupType::Normal, terms);
    }

    pub fn add_terms_report_group_terms(
        &mut self,
        alias: impl Into<CompactString>,
        terms: impl IntoIterator<Item = TermId>,
    ) {
        self.add_report_group(alias, TermReportGroupType::Normal, terms);
    }

    /// Leave `symbols` out of syntax error messages
    pub fn add_to_no_report_group<'s>(&mut self, symbols: impl IntoIterator<Item = &'s str>) {
        let terms: Vec<TermId> = symbols.into_iter().map(|s| self.term(s)).collect();
        self.add_to_no_report_group_terms(terms);
    }

    pub fn add_to_no_report_group_terms(&mut self, terms: impl IntoIterator<Item = TermId>) {
        self.add_report_group("", TermReportGroupType::DoNotReport, terms);
    }

    /// Report every operator under `alias`.
    ///
    /// Membership is filled when the grammar is built, so operators
    /// registered later are included.
    pub fn add_operator_report_group(&mut self, alias: impl Into<CompactString>) {
        self.add_report_group(alias, TermReportGroupType::Operator, std::iter::empty());
    }

    pub(super) fn fill_operator_groups(&mut self) {
        let operators: Vec<TermId> = self
            .terms
            .iter()
            .filter(|t| t.flag_is_set(TermFlags::IS_OPERATOR))
            .map(|t| t.id())
            .collect();
        for group in &mut self.report_groups {
            if group.group_type == TermReportGroupType::Operator {
                group.terminals.extend(operators.iter().copied());
            }
        }
    }
}

impl Grammar {
    /// Display names for a set of expected terminals.
    ///
    /// Terminals flagged [`TermFlags::IS_NOT_REPORTED`] or in any do-not-report
    /// group are dropped whatever the group order, grouped terminals are replaced by the group alias,
    /// and the rest are listed by their error alias.
    #[must_use]
    pub fn expected_term_names(&self, expected: &[TermId]) -> BTreeSet<CompactString> {
        let mut names = BTreeSet::new();
        for &term in expected {
            if self.term(term).flag_is_set(TermFlags::IS_NOT_REPORTED) {
                continue;
            }
            let excluded = self
                .report_groups
                .iter()
                .any(|g| g.group_type == TermReportGroupType::DoNotReport && g.contains(term));
            if excluded {
                continue;
            }
            let group = self
                .report_groups
                .iter()
                .find(|g| g.group_type != TermReportGroupType::DoNotReport && g.contains(term));
            match group {
                Some(group) => {
                    names.insert(group.alias.clone());
                }
                None => {
                    names.insert(CompactString::from(self.term(term).error_alias()));
                }
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::seq;

    fn build(g: GrammarBuilder, root: TermId) -> Grammar {
        let mut g = g;
        g.set_root(root);
        g.build().unwrap()
    }

    #[test]
    fn test_group_collapses_members() {
        let mut g = GrammarBuilder::new();
        let ident = g.terminal("identifier");
        let ops: Vec<TermId> = ["+", "-", "*", "/"].iter().map(|s| g.term(s)).collect();
        g.add_terms_report_group("operator", ["+", "-", "*", "/"]);
        let root = g.non_terminal("Root");
        g.set_rule(root, seq([ident, ops[0], ops[1], ops[2], ops[3]]));
        let grammar = build(g, root);

        let mut expected = ops.clone();
        expected.push(ident);
        let names = grammar.expected_term_names(&expected);
        let names: Vec<&str> = names.iter().map(CompactString::as_str).collect();
        assert_eq!(names, vec!["identifier", "operator"]);
    }

    #[test]
    fn test_no_report_group_and_flag() {
        let mut g = GrammarBuilder::new();
        let ident = g.terminal("identifier");
        let semi = g.term(";");
        let comment = g.term("#");
        g.add_to_no_report_group([";"]);
        g.mark_not_reported_terms([comment]);
        let root = g.non_terminal("Root");
        g.set_rule(root, seq([ident, semi, comment]));
        let grammar = build(g, root);

        let names = grammar.expected_term_names(&[ident, semi, comment]);
        assert_eq!(names.len(), 1);
        assert!(names.contains("identifier"));
    }

    #[test]
    fn test_operator_group_filled_at_build() {
        let mut g = GrammarBuilder::new();
        g.add_operator_report_group("binary operator");
        g.register_operators(10, ["+"]);
        g.register_operators(20, ["*"]);
        let plus = g.term("+");
        let star = g.term("*");
        let number = g.terminal("number");
        let root = g.non_terminal("Root");
        g.set_rule(root, seq([number, plus, number]).or(seq([number, star, number])));
        let grammar = build(g, root);

        let group = &grammar.report_groups()[0];
        assert!(group.contains(plus));
        assert!(group.contains(star));
        assert!(!group.contains(number));

        let names = grammar.expected_term_names(&[plus, star, number]);
        assert_eq!(names.len(), 2);
        assert!(names.contains("binary operator"));
    }

    #[test]
    fn test_error_alias_is_used() {
        let mut g = GrammarBuilder::new();
        let ident = g.terminal("identifier");
        g.term_mut(ident).set_error_alias("name");
        let root = g.non_terminal("Root");
        g.set_rule(root, ident);
        let grammar = build(g, root);

        let names = grammar.expected_term_names(&[ident]);
        assert!(names.contains("name"));
    }
}
