//! Tests for grammar construction: expression algebra, interning and closures

use bnf_kit::config::GrammarConfig;
use bnf_kit::grammar::{BnfExpr, ClosureKind, Element, GrammarBuilder, IntoExpr, alt, seq};
use bnf_kit::term::{TermFlags, TermId};

fn terminals(g: &mut GrammarBuilder, names: &[&str]) -> Vec<TermId> {
    names.iter().map(|name| g.terminal(*name)).collect()
}

#[test]
fn test_concatenation_is_associative() {
    let mut g = GrammarBuilder::new();
    let t = terminals(&mut g, &["a", "b", "c", "d"]);

    let left = t[0].into_expr().then(t[1]).then(t[2]);
    let right = t[0].into_expr().then(t[1].into_expr().then(t[2]));
    assert_eq!(left, right);
    assert_eq!(left.alternatives().len(), 1);
    assert_eq!(left.alternatives()[0].len(), 3);

    let grouped = t[2].into_expr().or(t[3]);
    let left = t[0].into_expr().then(grouped.clone()).then(t[1]);
    let right = t[0].into_expr().then(grouped.then(t[1]));
    assert_eq!(left, right);
}

#[test]
fn test_alternation_flattens() {
    let mut g = GrammarBuilder::new();
    let t = terminals(&mut g, &["a", "b", "c"]);

    let nested = t[0].into_expr().or(t[1].into_expr().or(t[2]));
    let chained = t[0].into_expr().or(t[1]).or(t[2]);
    assert_eq!(nested, chained);
    assert_eq!(nested, alt([t[0], t[1], t[2]]));
    assert_eq!(nested.alternative_count(), 3);
    for alternative in nested.alternatives() {
        assert_eq!(alternative.len(), 1);
    }
}

#[test]
fn test_alternation_then_term_keeps_group() {
    let mut g = GrammarBuilder::new();
    let t = terminals(&mut g, &["a", "b", "c"]);

    let expr = t[0].into_expr().or(t[1]).then(t[2]);
    assert_eq!(expr.alternative_count(), 1);
    let sequence = &expr.alternatives()[0];
    assert!(matches!(&sequence[0], Element::Group(group) if group.alternative_count() == 2));
    assert_eq!(sequence[1], Element::Term(t[2]));
}

#[test]
fn test_groups_are_lifted_at_build() {
    let mut g = GrammarBuilder::new();
    let t = terminals(&mut g, &["a", "b", "c"]);
    let root = g.non_terminal("Root");
    g.set_rule(root, seq([t[0].into_expr().or(t[1]), BnfExpr::from(t[2])]));
    g.set_root(root);

    let grammar = g.build().unwrap();
    let rule = grammar.rule(root).unwrap();
    assert!(!rule.has_groups());
    let lifted = rule.alternatives()[0][0].as_term().unwrap();
    let term = grammar.term(lifted);
    assert_eq!(term.name(), "(a | b)");
    assert!(term.flag_is_set(TermFlags::IS_TRANSIENT));
    assert!(grammar.is_reachable(lifted));
}

#[test]
fn test_closures_are_cached() {
    let mut g = GrammarBuilder::new();
    let stmt = g.non_terminal("Stmt");
    let star = g.zero_or_more(stmt);
    assert_eq!(g.zero_or_more(stmt), star);
    assert_eq!(g.closure_of(stmt, ClosureKind::Plus), None);
    let plus = g.one_or_more(stmt);
    assert_ne!(plus, star);

    let x = g.terminal("x");
    g.set_rule(stmt, x);
    let root = g.non_terminal_with_rule("Root", seq([star, plus]));
    g.set_root(root);
    let grammar = g.build().unwrap();
    assert_eq!(grammar.closure_of(stmt, ClosureKind::Star), Some(star));
    assert_eq!(grammar.closure_of(stmt, ClosureKind::Plus), Some(plus));
    assert!(grammar.term(star).flag_is_set(TermFlags::IS_NULLABLE));
    assert!(!grammar.term(plus).flag_is_set(TermFlags::IS_NULLABLE));
}

#[test]
fn test_key_terms_case_sensitive() {
    let mut g = GrammarBuilder::new();
    let lower = g.term("if");
    let upper = g.term("IF");
    assert_ne!(lower, upper);
    assert_eq!(g.term("if"), lower);
    assert_eq!(g.get(upper).name(), "IF");
}

#[test]
fn test_key_terms_case_insensitive() {
    let mut g = GrammarBuilder::with_config(GrammarConfig::new().case_sensitive(false));
    let lower = g.term("if");
    let upper = g.term("IF");
    assert_eq!(lower, upper);
    assert_eq!(g.key_term("If"), Some(lower));
    assert!(g.get(lower).flag_is_set(TermFlags::IS_KEYWORD));

    let root = g.non_terminal_with_rule("Root", lower);
    g.set_root(root);
    let grammar = g.build().unwrap();
    assert_eq!(grammar.key_term("iF"), Some(lower));
    assert!(!grammar.case_sensitive());
}

#[test]
fn test_symbols_are_not_keywords() {
    let mut g = GrammarBuilder::new();
    let plus = g.term("+");
    let ident = g.term("_private");
    assert!(!g.get(plus).flag_is_set(TermFlags::IS_KEYWORD));
    assert!(g.get(ident).flag_is_set(TermFlags::IS_KEYWORD));
}

#[test]
fn test_term_named_fills_display_name_once() {
    let mut g = GrammarBuilder::new();
    let id = g.term_named("(", "open paren");
    assert_eq!(g.term_named("(", "lparen"), id);
    assert_eq!(g.get(id).error_alias(), "open paren");
}
