//! Grammar configuration
//!
//! [`GrammarConfig`] is handed to
//! [`GrammarBuilder::with_config`](crate::grammar::GrammarBuilder::with_config)
//! and cannot be changed afterwards; in particular the case-sensitivity of a
//! grammar is fixed when its session starts.

use compact_str::CompactString;

use crate::term::flags::define_flags;

define_flags! {
    /// Language behavior switches consulted by the scanner, parser and runtime.
    pub struct LanguageFlags {
        /// Build AST nodes after parsing
        const CREATE_AST = 1 << 0;
        /// Scanner emits a newline before end of file if the source lacks one
        const NEWLINE_BEFORE_EOF = 1 << 1;
        const SUPPORTS_COMMAND_LINE = 1 << 2;
        const TAIL_RECURSIVE = 1 << 3;
        /// Scanner emits a line-start token at the beginning of each line
        const EMIT_LINE_START_TOKEN = 1 << 4;
    }
}

/// Console metadata for interactive hosts; carried, not interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct ConsoleInfo {
    pub title: CompactString,
    pub greeting: CompactString,
    pub prompt: CompactString,
    /// Prompt shown when more input is expected
    pub prompt_more_input: CompactString,
}

impl Default for ConsoleInfo {
    fn default() -> Self {
        Self {
            title: "Console".into(),
            greeting: CompactString::default(),
            prompt: ">".into(),
            prompt_more_input: ".".into(),
        }
    }
}

/// Grammar-wide settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct GrammarConfig {
    /// Key terms are compared exactly when true, lower-cased otherwise
    pub case_sensitive: bool,
    pub language_flags: LanguageFlags,
    pub whitespace_chars: CompactString,
    pub line_terminators: CompactString,
    /// Characters that unambiguously start a new token; used by scanner recovery
    pub delimiters: Option<CompactString>,
    /// Node kind used for terms that declare none
    pub default_node_kind: Option<CompactString>,
    pub grammar_comments: Option<String>,
    pub console: ConsoleInfo,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            language_flags: LanguageFlags::NONE,
            whitespace_chars: " \t\r\n\u{b}".into(),
            line_terminators: "\n\r\u{b}".into(),
            delimiters: None,
            default_node_kind: None,
            grammar_comments: None,
            console: ConsoleInfo::default(),
        }
    }
}

impl GrammarConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    #[must_use]
    pub fn language_flags(mut self, flags: LanguageFlags) -> Self {
        self.language_flags.insert(flags);
        self
    }

    #[must_use]
    pub fn default_node_kind(mut self, kind: impl Into<CompactString>) -> Self {
        self.default_node_kind = Some(kind.into());
        self
    }

    #[must_use]
    pub fn delimiters(mut self, delimiters: impl Into<CompactString>) -> Self {
        self.delimiters = Some(delimiters.into());
        self
    }

    #[must_use]
    pub fn grammar_comments(mut self, comments: impl Into<String>) -> Self {
        self.grammar_comments = Some(comments.into());
        self
    }

    #[must_use]
    pub fn console(mut self, console: ConsoleInfo) -> Self {
        self.console = console;
        self
    }

    #[must_use]
    pub const fn flag_is_set(&self, flags: LanguageFlags) -> bool {
        self.language_flags.intersects(flags)
    }
}
