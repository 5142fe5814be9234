//! Tests for syntax error reporting through report groups and hooks

use bnf_kit::grammar::{Grammar, GrammarBuilder, seq};
use bnf_kit::parsing::{DefaultHooks, LanguageHooks, ParsingContext, Token};
use bnf_kit::term::TermId;
use bnf_kit::testing::ScriptedScanner;

struct Calculator {
    grammar: Grammar,
    number: TermId,
    operators: Vec<TermId>,
    open: TermId,
}

fn calculator() -> Calculator {
    let mut g = GrammarBuilder::new();
    let number = g.terminal("number");
    let (open, close) = g.register_brace_pair("(", ")");
    g.register_operators(10, ["+", "-"]);
    g.register_operators(20, ["*", "/"]);
    g.add_operator_report_group("operator");
    g.mark_punctuation(["(", ")"]);

    let operators: Vec<TermId> = ["+", "-", "*", "/"].iter().map(|op| g.term(op)).collect();
    let bin_op = g.non_terminal("BinOp");
    g.set_rule(bin_op, bnf_kit::alt(operators.iter().copied()));
    g.mark_transient([bin_op]);

    let expr = g.non_terminal("Expr");
    g.set_rule(
        expr,
        seq([expr, bin_op, expr])
            .or(seq([open, expr, close]))
            .or(number),
    );
    g.set_root(expr);

    Calculator {
        grammar: g.build().unwrap(),
        number,
        operators,
        open,
    }
}

#[test]
fn test_operator_group_collapses_expected_list() {
    let calc = calculator();
    let mut expected = calc.operators.clone();
    expected.push(calc.number);

    let names = calc.grammar.expected_term_names(&expected);
    let names: Vec<&str> = names.iter().map(|n| n.as_str()).collect();
    assert_eq!(names, vec!["number", "operator"]);
}

#[test]
fn test_exclusion_wins_over_earlier_groups() {
    let mut g = GrammarBuilder::new();
    let ident = g.terminal("identifier");
    g.register_operators(10, ["+", "-"]);
    g.add_operator_report_group("operator");
    g.add_terms_report_group("sign", ["-"]);
    g.add_to_no_report_group(["-"]);

    let plus = g.term("+");
    let minus = g.term("-");
    let root = g.non_terminal("Root");
    g.set_rule(root, seq([ident, plus, ident]).or(seq([minus, ident])));
    g.set_root(root);
    let grammar = g.build().unwrap();

    let names = grammar.expected_term_names(&[minus, ident]);
    let names: Vec<&str> = names.iter().map(|n| n.as_str()).collect();
    assert_eq!(names, vec!["identifier"]);

    let names = grammar.expected_term_names(&[plus, minus]);
    let names: Vec<&str> = names.iter().map(|n| n.as_str()).collect();
    assert_eq!(names, vec!["operator"]);
}

#[test]
fn test_report_expected_terms() {
    let calc = calculator();
    let mut scanner = ScriptedScanner::new(calc.grammar.standard().eof, Vec::new());
    let mut context = ParsingContext::new(&calc.grammar, &mut scanner);
    context.current_input = Some(Token::new(calc.number, "1", 4));
    context.expected_terms = calc.operators.clone();

    DefaultHooks.report_parse_error(&mut context);
    let message = &context.messages()[0];
    assert_eq!(message.message, "Syntax error, expected: operator");
    assert_eq!(message.position, Some(4));
    assert!(context.has_errors());
}

#[test]
fn test_report_unclosed_brace() {
    let calc = calculator();
    let eof = calc.grammar.standard().eof;
    let mut scanner = ScriptedScanner::new(calc.grammar.standard().eof, Vec::new());
    let mut context = ParsingContext::new(&calc.grammar, &mut scanner);
    context.open_braces.push(Token::new(calc.open, "(", 0));
    context.current_input = Some(Token::new(eof, "", 2));

    DefaultHooks.report_parse_error(&mut context);
    assert_eq!(
        context.messages()[0].message,
        "No closing pair for opening symbol ("
    );
}

#[test]
fn test_report_scanner_error_and_end_of_file() {
    let calc = calculator();
    let syntax_error = calc.grammar.standard().syntax_error;
    let mut scanner = ScriptedScanner::new(calc.grammar.standard().eof, Vec::new());
    let mut context = ParsingContext::new(&calc.grammar, &mut scanner);

    context.current_input = Some(Token::new(syntax_error, "Invalid character: '$'", 3));
    DefaultHooks.report_parse_error(&mut context);

    context.current_input = None;
    DefaultHooks.report_parse_error(&mut context);

    let messages: Vec<&str> = context.messages().iter().map(|m| m.message.as_str()).collect();
    assert_eq!(
        messages,
        vec!["Invalid character: '$'", "Unexpected end of file."]
    );
}

#[test]
fn test_custom_error_message() {
    struct Terse;

    impl LanguageHooks for Terse {
        fn construct_parser_error_message(
            &self,
            _context: &ParsingContext<'_>,
            expected: &std::collections::BTreeSet<compact_str::CompactString>,
        ) -> String {
            format!("expected {} symbol(s)", expected.len())
        }
    }

    let calc = calculator();
    let mut scanner = ScriptedScanner::new(calc.grammar.standard().eof, Vec::new());
    let mut context = ParsingContext::new(&calc.grammar, &mut scanner);
    context.expected_terms = vec![calc.number, calc.open];
    Terse.report_parse_error(&mut context);
    assert_eq!(context.messages()[0].message, "expected 2 symbol(s)");
}
