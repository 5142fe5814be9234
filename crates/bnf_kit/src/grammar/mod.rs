//! # Grammar Module
//!
//! Grammar definition for table-driven parsers.
//!
//! ## Overview
//!
//! A grammar is written in a [`GrammarBuilder`] session:
//!
//! - **Terms**: terminals, interned key terms and non-terminals, all
//!   addressed by [`TermId`](crate::term::TermId)
//! - **Rules**: [`BnfExpr`] alternations of sequences composed with [`seq`],
//!   [`alt`], [`BnfExpr::then`] and [`BnfExpr::or`]
//! - **Lists**: optional/plus/star closures and delimited list rules
//! - **Hints**: conflict-resolution instructions placed at rule positions
//! - **Report groups**: readable expected-symbol lists in syntax errors
//!
//! [`GrammarBuilder::build`] validates the session and yields a [`Grammar`].
//!
//! ## Usage
//!
//! ```rust
//! use bnf_kit::grammar::{GrammarBuilder, TrailingDelimiter, seq};
//!
//! let mut g = GrammarBuilder::new();
//! let ident = g.terminal("identifier");
//! let comma = g.term(",");
//! let (open, close) = g.register_brace_pair("(", ")");
//! g.mark_punctuation(["(", ")", ","]);
//!
//! let args = g.non_terminal("Args");
//! g.make_star_rule(args, Some(comma), ident, TrailingDelimiter::Forbid);
//! let call = g.non_terminal_with_rule("Call", seq([ident, open, args, close]));
//! g.set_root(call);
//!
//! let grammar = g.build()?;
//! assert!(grammar.is_reachable(args));
//! # Ok::<(), bnf_kit::error::BuildError>(())
//! ```

pub mod builder;
pub mod data;
pub mod expr;
pub mod hint;
pub mod lists;
pub mod non_terminal;
pub mod report;
mod validate;

pub use builder::*;
pub use data::*;
pub use expr::*;
pub use hint::*;
pub use non_terminal::*;
pub use report::*;
