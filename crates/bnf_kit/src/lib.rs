//! # bnf_kit
//!
//! Grammar definition for table-driven parser generators.
//!
//! ## Overview
//!
//! bnf_kit is the layer a language author writes a grammar against. It does
//! not build parser tables or scan text itself; it provides:
//!
//! - **Terms**: terminals, interned key terms and non-terminals with flags,
//!   precedence and AST bindings
//! - **Rule algebra**: BNF expressions built from sequences and alternatives
//! - **List synthesis**: `x?`, `x+`, `x*` and delimited list rules
//! - **Hints**: conflict-resolution instructions, including token preview
//! - **Report groups**: readable expected-symbol lists for syntax errors
//! - **Diagnostics**: leveled grammar errors collected during validation
//!
//! ## Quick Start
//!
//! ```rust
//! use bnf_kit::{GrammarBuilder, TrailingDelimiter, seq};
//! use bnf_kit::testing::Recognizer;
//!
//! let mut g = GrammarBuilder::new();
//! let number = g.terminal("number");
//! let comma = g.term(",");
//! let (open, close) = g.register_brace_pair("[", "]");
//!
//! let items = g.non_terminal("Items");
//! g.make_star_rule(items, Some(comma), number, TrailingDelimiter::Allow);
//! let array = g.non_terminal_with_rule("Array", seq([open, items, close]));
//! g.set_root(array);
//!
//! let grammar = g.build()?;
//! let recognizer = Recognizer::new(&grammar);
//! assert!(recognizer.accepts(&[open, number, comma, number, comma, close]));
//! assert!(!recognizer.accepts(&[open, comma, close]));
//! # Ok::<(), bnf_kit::BuildError>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `serialize`: serde support for [`GrammarConfig`] and its parts
//! - `diagnostics`: [`miette`](https://docs.rs/miette) diagnostics for grammar errors

pub mod config;
pub mod error;
pub mod grammar;
pub mod intern;
pub mod parsing;
pub mod term;
pub mod testing;

// Re-export commonly used types
pub use config::{ConsoleInfo, GrammarConfig, LanguageFlags};
pub use error::{BuildError, GrammarError, GrammarErrorLevel, GrammarErrorList};
pub use grammar::{
    BnfExpr, ClosureKind, Element, Grammar, GrammarBuilder, GrammarHint, HintId, IntoExpr,
    TermReportGroupType, TokenPreviewHint, TrailingDelimiter, alt, seq,
};
pub use parsing::{ConflictResolutionArgs, ParserAction, ParsingContext, Scanner, Token};
pub use term::{Associativity, Term, TermFlags, TermId};
