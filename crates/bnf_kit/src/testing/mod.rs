//! # Testing Utilities
//!
//! Tools for testing grammars without a parser-table builder:
//!
//! - [`Recognizer`]: an Earley recognizer that checks whether a token
//!   sequence derives from a grammar's root
//! - [`ScriptedScanner`]: a [`Scanner`](crate::parsing::Scanner) over a fixed
//!   token list that counts preview mode transitions

pub mod recognizer;
pub mod scanner;

pub use recognizer::*;
pub use scanner::*;
