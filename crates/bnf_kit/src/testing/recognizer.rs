//! Earley recognizer over a finalized grammar
//!
//! Accepts or rejects a sequence of terminals against the grammar's rules.
//! Hints and the `EMPTY` terminal are skipped; nullable non-terminals are
//! predicted through with the flag computed at build time, so empty rules
//! need no special completion pass.

use hashbrown::HashSet;
use smallvec::SmallVec;

use crate::grammar::Grammar;
use crate::term::{TermFlags, TermId};

/// An Earley item: `lhs -> alternative[..dot] . alternative[dot..]`, started at `start`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct EarleyItem {
    lhs: TermId,
    alternative: usize,
    dot: usize,
    start: usize,
}

/// Membership test for token sequences.
pub struct Recognizer<'g> {
    grammar: &'g Grammar,
    /// Terminal sequences of each alternative, indexed by term
    alternatives: Vec<Vec<SmallVec<[TermId; 4]>>>,
}

impl<'g> Recognizer<'g> {
    #[must_use]
    pub fn new(grammar: &'g Grammar) -> Self {
        let empty = grammar.standard().empty;
        let alternatives = grammar
            .terms()
            .map(|term| {
                grammar
                    .rule(term.id())
                    .map(|rule| {
                        rule.alternatives()
                            .iter()
                            .map(|sequence| {
                                sequence
                                    .iter()
                                    .filter_map(|element| element.as_term())
                                    .filter(|&t| t != empty)
                                    .collect()
                            })
                            .collect()
                    })
                    .unwrap_or_default()
            })
            .collect();
        Self {
            grammar,
            alternatives,
        }
    }

    /// True if `input` derives from the grammar root
    #[must_use]
    pub fn accepts(&self, input: &[TermId]) -> bool {
        self.accepts_from(self.grammar.root(), input)
    }

    /// True if `input` derives from `start`
    #[must_use]
    pub fn accepts_from(&self, start: TermId, input: &[TermId]) -> bool {
        let mut chart: Vec<Vec<EarleyItem>> = vec![Vec::new(); input.len() + 1];
        let mut seen: Vec<HashSet<EarleyItem, ahash::RandomState>> =
            vec![HashSet::default(); input.len() + 1];

        for alternative in 0..self.alternatives[start.index()].len() {
            let item = EarleyItem {
                lhs: start,
                alternative,
                dot: 0,
                start: 0,
            };
            if seen[0].insert(item) {
                chart[0].push(item);
            }
        }

        for position in 0..=input.len() {
            let mut index = 0;
            while index < chart[position].len() {
                let item = chart[position][index];
                index += 1;

                match self.next_symbol(item) {
                    Some(symbol) if self.grammar.term(symbol).is_non_terminal() => {
                        // predict
                        for alternative in 0..self.alternatives[symbol.index()].len() {
                            let predicted = EarleyItem {
                                lhs: symbol,
                                alternative,
                                dot: 0,
                                start: position,
                            };
                            if seen[position].insert(predicted) {
                                chart[position].push(predicted);
                            }
                        }
                        if self.grammar.term(symbol).flag_is_set(TermFlags::IS_NULLABLE) {
                            let advanced = EarleyItem {
                                dot: item.dot + 1,
                                ..item
                            };
                            if seen[position].insert(advanced) {
                                chart[position].push(advanced);
                            }
                        }
                    }
                    Some(symbol) => {
                        // scan
                        if input.get(position) == Some(&symbol) {
                            let advanced = EarleyItem {
                                dot: item.dot + 1,
                                ..item
                            };
                            if seen[position + 1].insert(advanced) {
                                chart[position + 1].push(advanced);
                            }
                        }
                    }
                    None => {
                        // complete
                        let waiting: Vec<EarleyItem> = chart[item.start]
                            .iter()
                            .filter(|w| self.next_symbol(**w) == Some(item.lhs))
                            .copied()
                            .collect();
                        for waiting in waiting {
                            let advanced = EarleyItem {
                                dot: waiting.dot + 1,
                                ..waiting
                            };
                            if seen[position].insert(advanced) {
                                chart[position].push(advanced);
                            }
                        }
                    }
                }
            }
        }

        chart[input.len()].iter().any(|item| {
            item.lhs == start && item.start == 0 && self.next_symbol(*item).is_none()
        })
    }

    fn next_symbol(&self, item: EarleyItem) -> Option<TermId> {
        self.alternatives[item.lhs.index()][item.alternative]
            .get(item.dot)
            .copied()
    }
}
