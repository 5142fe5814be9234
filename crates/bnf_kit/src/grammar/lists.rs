//! List and closure rule synthesis
//!
//! Lists are left-recursive so an LR table builder can reduce each element as
//! soon as it is complete:
//!
//! ```text
//! plus:  list := member | list [delim] member
//! star:  list := EMPTY | list member                       (no delimiter)
//!        list := EMPTY | member+ [| member+ delim]         (delimited)
//! ```
//!
//! A delimited star list is built on top of a plus list. The obvious form
//! `EMPTY | member | list delim member` would accept a leading delimiter.

use crate::grammar::{BnfExpr, ClosureKind, GrammarBuilder, TrailingDelimiter, seq};
use crate::term::{TermFlags, TermId};

impl GrammarBuilder {
    /// `term?`, created on first request and cached
    pub fn optional(&mut self, term: TermId) -> TermId {
        self.closure(term, ClosureKind::Optional)
    }

    /// `term+`, created on first request and cached
    pub fn one_or_more(&mut self, term: TermId) -> TermId {
        self.closure(term, ClosureKind::Plus)
    }

    /// `term*`, created on first request and cached
    pub fn zero_or_more(&mut self, term: TermId) -> TermId {
        self.closure(term, ClosureKind::Star)
    }

    /// Cached closure form of `term`, if it was requested
    #[must_use]
    pub fn closure_of(&self, term: TermId, kind: ClosureKind) -> Option<TermId> {
        self.closures.get(&(term, kind)).copied()
    }

    fn closure(&mut self, term: TermId, kind: ClosureKind) -> TermId {
        if let Some(existing) = self.closure_of(term, kind) {
            return existing;
        }

        let name = format!("{}{}", self.get(term).name(), kind.suffix());
        let list = self.non_terminal(name);
        match kind {
            ClosureKind::Optional => {
                let empty = self.standard.empty;
                self.set_rule(list, BnfExpr::from(term).or(empty));
            }
            ClosureKind::Plus => {
                self.make_plus_rule(list, None, term);
            }
            ClosureKind::Star => {
                self.make_star_rule(list, None, term, TrailingDelimiter::Forbid);
            }
        }
        self.closures.insert((term, kind), list);
        tracing::trace!(?term, ?kind, ?list, "synthesized closure");
        list
    }

    /// Define `list` as one or more `member`s, separated by `delimiter` if given.
    ///
    /// `list` is flagged [`TermFlags::IS_LIST`]. Returns `list`.
    ///
    /// # Panics
    ///
    /// Panics if `list` is a terminal.
    pub fn make_plus_rule(
        &mut self,
        list: TermId,
        delimiter: Option<TermId>,
        member: TermId,
    ) -> TermId {
        let recursive = match delimiter {
            Some(delimiter) => seq([list, delimiter, member]),
            None => seq([list, member]),
        };
        self.set_rule(list, BnfExpr::from(member).or(recursive));
        self.term_mut(list).set_flag(TermFlags::IS_LIST);
        list
    }

    /// Plus list that may end with one trailing `delimiter`.
    ///
    /// With [`TrailingDelimiter::Allow`] and a delimiter, the elements are
    /// collected by an inner `member+` list and `list` becomes
    /// `member+ | member+ delimiter`, flagged [`TermFlags::IS_LIST_CONTAINER`].
    /// Otherwise this is [`make_plus_rule`](Self::make_plus_rule).
    pub fn make_plus_rule_with(
        &mut self,
        list: TermId,
        delimiter: Option<TermId>,
        member: TermId,
        trailing: TrailingDelimiter,
    ) -> TermId {
        let Some(delimiter) = delimiter.filter(|_| trailing == TrailingDelimiter::Allow) else {
            return self.make_plus_rule(list, delimiter, member);
        };

        let plus_list = self.inner_plus_list(delimiter, member);
        self.set_rule(
            list,
            BnfExpr::from(plus_list).or(seq([plus_list, delimiter])),
        );
        self.term_mut(list).set_flag(TermFlags::IS_LIST_CONTAINER);
        list
    }

    /// Define `list` as zero or more `member`s, separated by `delimiter` if given.
    ///
    /// Without a delimiter the rule is `EMPTY | list member` and `list` is
    /// flagged [`TermFlags::IS_LIST`]. With a delimiter, `list` wraps an inner
    /// `member+` list (flagged [`TermFlags::NO_AST_NODE`]) and is flagged
    /// [`TermFlags::IS_LIST_CONTAINER`]; `trailing` decides whether one
    /// delimiter may follow the last member.
    ///
    /// # Panics
    ///
    /// Panics if `list` is a terminal.
    pub fn make_star_rule(
        &mut self,
        list: TermId,
        delimiter: Option<TermId>,
        member: TermId,
        trailing: TrailingDelimiter,
    ) -> TermId {
        let empty = self.standard.empty;
        let Some(delimiter) = delimiter else {
            self.term_mut(list).set_flag(TermFlags::IS_LIST);
            self.set_rule(list, BnfExpr::from(empty).or(seq([list, member])));
            return list;
        };

        let plus_list = self.inner_plus_list(delimiter, member);
        let mut rule = BnfExpr::from(empty).or(plus_list);
        if trailing == TrailingDelimiter::Allow {
            rule = rule.or(seq([plus_list, delimiter]));
        }
        self.set_rule(list, rule);
        self.term_mut(list).set_flag(TermFlags::IS_LIST_CONTAINER);
        list
    }

    fn inner_plus_list(&mut self, delimiter: TermId, member: TermId) -> TermId {
        let name = format!("{}+", self.get(member).name());
        let plus_list = self.non_terminal(name);
        self.make_plus_rule(plus_list, Some(delimiter), member);
        self.term_mut(plus_list).set_flag(TermFlags::NO_AST_NODE);
        plus_list
    }

    /// `LF+`, punctuation
    pub fn new_line_plus(&mut self) -> TermId {
        if let Some(id) = self.new_line_plus {
            return id;
        }
        let new_line = self.standard.new_line;
        let id = self.non_terminal("LF+");
        self.make_plus_rule(id, None, new_line);
        self.mark_punctuation_terms([id]);
        self.new_line_plus = Some(id);
        id
    }

    /// `LF*`, punctuation
    pub fn new_line_star(&mut self) -> TermId {
        if let Some(id) = self.new_line_star {
            return id;
        }
        let new_line = self.standard.new_line;
        let id = self.non_terminal("LF*");
        self.make_star_rule(id, None, new_line, TrailingDelimiter::Forbid);
        self.mark_punctuation_terms([id]);
        self.new_line_star = Some(id);
        id
    }
}
