//! Language customization points for parse-time behavior

use compact_str::CompactString;
use std::collections::BTreeSet;
use std::fmt;

use crate::error::{GrammarErrorLevel, ParserStateRef};
use crate::parsing::{ConflictResolutionArgs, ParseTreeNode, ParsingContext};
use crate::term::{AstContext, AstNode};

/// A message reported while parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserMessage {
    pub level: GrammarErrorLevel,
    /// Byte offset of the offending input, when known
    pub position: Option<usize>,
    pub state: Option<ParserStateRef>,
    pub message: String,
}

impl fmt::Display for ParserMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(position) => write!(f, "{} at {position}: {}", self.level, self.message),
            None => write!(f, "{}: {}", self.level, self.message),
        }
    }
}

/// Overridable behavior of a language at parse time.
///
/// Every method has a default; implement only what the language changes.
pub trait LanguageHooks {
    /// Message for input the parser cannot act on, given the expected names
    fn construct_parser_error_message(
        &self,
        context: &ParsingContext<'_>,
        expected: &BTreeSet<CompactString>,
    ) -> String {
        let _ = context;
        let names: Vec<&str> = expected.iter().map(CompactString::as_str).collect();
        format!("Syntax error, expected: {}", names.join(" "))
    }

    /// Record a syntax error for the current input in `context`
    fn report_parse_error(&self, context: &mut ParsingContext<'_>) {
        let standard = context.grammar().standard();
        let input = context.current_input.as_ref();
        let input_term = input.map(|t| t.term);

        let message = if input_term == Some(standard.syntax_error) {
            // scanner errors carry their message as token text
            input.map(|t| t.text.to_string()).unwrap_or_default()
        } else if input_term == Some(standard.indent) {
            "Unexpected indentation.".to_string()
        } else if input_term == Some(standard.eof)
            && let Some(brace) = context.open_braces.last()
        {
            format!("No closing pair for opening symbol {}", brace.text)
        } else {
            let expected = context.expected_term_set();
            if expected.is_empty() {
                "Unexpected end of file.".to_string()
            } else {
                self.construct_parser_error_message(context, &expected)
            }
        };
        context.add_parser_error(message);
    }

    /// Language-level AST creation; defaults to the term's own strategy
    fn create_ast_node(
        &self,
        context: &mut AstContext<'_>,
        tree_node: &ParseTreeNode,
    ) -> Option<Box<dyn AstNode>> {
        let grammar = context.grammar;
        grammar.term(tree_node.term).create_ast_node(context, tree_node)
    }

    /// Resolve a conflict marked with a resolve-in-code hint
    fn on_resolving_conflict(&self, args: &mut ConflictResolutionArgs<'_, '_>) {
        let _ = args;
    }
}

/// Hooks with every default behavior
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHooks;

impl LanguageHooks for DefaultHooks {}
