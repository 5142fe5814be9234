use hashbrown::HashSet;

use crate::config::LanguageFlags;
use crate::error::{GrammarError, GrammarErrorLevel, GrammarErrorList};
use crate::grammar::{BnfExpr, Element, GrammarBuilder, NonTerminalData, TermReportGroupType};
use crate::term::{Term, TermFlags, TermId};

/// The root is required before anything else can be checked
pub(super) fn require_root(
    root: Option<TermId>,
    errors: &mut GrammarErrorList,
) -> Result<TermId, GrammarError> {
    match root {
        Some(root) => Ok(root),
        None => errors.add_and_throw(GrammarErrorLevel::Error, None, "Root non-terminal is not set"),
    }
}

/// Terms reachable from `roots` through rules and error rules
pub(super) fn reachable_terms(terms: &[Term], roots: &[TermId]) -> Vec<bool> {
    let mut reachable = vec![false; terms.len()];
    let mut stack = roots.to_vec();
    while let Some(id) = stack.pop() {
        if std::mem::replace(&mut reachable[id.index()], true) {
            continue;
        }
        if let Some(data) = terms[id.index()].as_non_terminal() {
            for expr in data.rule().into_iter().chain(data.error_rule()) {
                stack.extend(expr.terms());
            }
        }
    }
    reachable
}

/// Set [`TermFlags::IS_NULLABLE`] on every non-terminal that derives the
/// empty string
pub(super) fn compute_nullable(terms: &mut [Term]) {
    // Iterate until no changes (fixed point)
    let mut changed = true;
    while changed {
        changed = false;
        for index in 0..terms.len() {
            if terms[index].flag_is_set(TermFlags::IS_NULLABLE) {
                continue;
            }
            let nullable = terms[index]
                .as_non_terminal()
                .and_then(NonTerminalData::rule)
                .is_some_and(|rule| is_nullable(rule, terms));
            if nullable {
                terms[index].set_flag(TermFlags::IS_NULLABLE);
                changed = true;
            }
        }
    }
}

fn is_nullable(expr: &BnfExpr, terms: &[Term]) -> bool {
    expr.alternatives().iter().any(|sequence| {
        sequence.iter().all(|element| match element {
            Element::Term(term) => terms[term.index()].flag_is_set(TermFlags::IS_NULLABLE),
            Element::Hint(_) => true,
            Element::Group(group) => is_nullable(group, terms),
        })
    })
}

/// Accumulate diagnostics for a grammar whose groups are already lifted
pub(super) fn check_grammar(
    builder: &GrammarBuilder,
    reachable: &[bool],
    errors: &mut GrammarErrorList,
) {
    let create_ast = builder.config.flag_is_set(LanguageFlags::CREATE_AST)
        && builder.config.default_node_kind.is_none();
    let mut used_in_rules: HashSet<TermId, ahash::RandomState> = HashSet::default();

    for term in &builder.terms {
        let Some(data) = term.as_non_terminal() else {
            continue;
        };
        let is_reachable = reachable[term.id().index()];

        match data.rule() {
            None if is_reachable => errors.add(
                GrammarErrorLevel::Error,
                None,
                format_args!("Non-terminal '{}' has no rule", term.name()),
            ),
            None => {}
            Some(rule) => {
                check_lone_hints(term, rule, errors);
                used_in_rules.extend(rule.terms());
            }
        }

        if create_ast
            && is_reachable
            && !term.ast().is_configured()
            && !term.flag_is_set(TermFlags::NO_AST_NODE)
        {
            errors.add(
                GrammarErrorLevel::Info,
                None,
                format_args!("AST node type is not set for non-terminal '{}'", term.name()),
            );
        }
    }

    for &terminal in &builder.non_grammar_terminals {
        if used_in_rules.contains(&terminal) {
            errors.add(
                GrammarErrorLevel::Warning,
                None,
                format_args!(
                    "Non-grammar terminal '{}' is used in grammar rules",
                    builder.get(terminal).name()
                ),
            );
        }
    }

    for group in &builder.report_groups {
        if group.alias.is_empty() && group.group_type != TermReportGroupType::DoNotReport {
            errors.add(
                GrammarErrorLevel::Warning,
                None,
                "Report group has an empty alias; its terminals will be reported without a name",
            );
        }
    }
}

fn check_lone_hints(term: &Term, rule: &BnfExpr, errors: &mut GrammarErrorList) {
    for sequence in rule.alternatives() {
        if let [Element::Hint(_)] = sequence.as_slice() {
            errors.add(
                GrammarErrorLevel::Warning,
                None,
                format_args!(
                    "Rule of '{}' has an alternative containing only a hint",
                    term.name()
                ),
            );
        }
    }
}
