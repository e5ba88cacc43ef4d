//! Structural evaluation and positional tie-break over a candidate list.

use crate::{
    rules::{Evaluation, MemberCriterion, MemberView},
    Result,
};

/// Returns the indices of the selected candidates, in candidate order.
///
/// An inactive criterion selects the first candidate. Otherwise every active field of the
/// criterion is evaluated on every candidate and keeps its own running counter of hits.
/// `match_index` must hold for each field's counter against that field's last counter value,
/// `order_index` counts over all candidates, and a candidate is selected only if every field
/// hits and every positional rule holds for it. A criterion whose only settings are
/// positional counts every candidate as a hit.
///
/// # Errors
/// Propagates errors raised while comparing types.
pub(crate) fn select<C: MemberCriterion>(
    criterion: &C,
    candidates: &[&dyn MemberView],
    evaluation: &Evaluation<'_>,
) -> Result<Vec<usize>> {
    if !criterion.is_active() {
        return Ok(if candidates.is_empty() { Vec::new() } else { vec![0] });
    }

    let hits = candidates
        .iter()
        .map(|candidate| {
            let mut clauses = criterion.clauses(*candidate, evaluation)?;
            if clauses.is_empty() {
                clauses.push(true);
            }
            Ok(clauses)
        })
        .collect::<Result<Vec<Vec<bool>>>>()?;

    let width = hits.first().map_or(0, Vec::len);
    let mut totals = vec![0usize; width];
    for row in &hits {
        for (total, hit) in totals.iter_mut().zip(row) {
            *total += usize::from(*hit);
        }
    }

    let rules = criterion.rules();
    let last_candidate = candidates.len().saturating_sub(1);
    let mut counters = vec![0usize; width];
    let mut selected = Vec::new();
    for (index, row) in hits.iter().enumerate() {
        let mut holds = true;
        for ((hit, counter), total) in row.iter().zip(counters.iter_mut()).zip(&totals) {
            if !*hit {
                holds = false;
                continue;
            }
            if let Some(rule) = rules.match_index {
                holds &= rule.holds(*counter, total - 1);
            }
            *counter += 1;
        }
        if holds
            && rules
                .order_index
                .is_none_or(|rule| rule.holds(index, last_candidate))
        {
            selected.push(index);
        }
    }
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        host::MemberInfo,
        rules::{FunctionCriterion, PositionRule, TemplateRegistry},
        typesystem::{Strictness, TypeDescriptor},
    };

    fn members() -> Vec<MemberInfo> {
        ["f", "g", "f", "h", "i", "f"]
            .iter()
            .map(|name| MemberInfo::function("a.B", name, vec![], TypeDescriptor::class("void")))
            .collect()
    }

    fn run(criterion: &FunctionCriterion) -> Vec<usize> {
        let members = members();
        let views: Vec<&dyn MemberView> = members.iter().map(|m| m as &dyn MemberView).collect();
        let registry = TemplateRegistry::new();
        let evaluation = Evaluation {
            strictness: Strictness::default(),
            templates: &registry,
        };
        select(criterion, &views, &evaluation).unwrap()
    }

    #[test]
    fn without_positions_every_match_is_kept() {
        assert_eq!(run(&FunctionCriterion::new().with_name("f")), vec![0, 2, 5]);
        assert!(run(&FunctionCriterion::new().with_name("x")).is_empty());
    }

    #[test]
    fn inactive_selects_first() {
        assert_eq!(run(&FunctionCriterion::new()), vec![0]);
    }

    #[test]
    fn match_index_counts_matches() {
        let f = || FunctionCriterion::new().with_name("f");
        assert_eq!(run(&f().with_match_index(PositionRule::last())), vec![5]);
        assert_eq!(run(&f().with_match_index(PositionRule::first())), vec![0]);
        assert_eq!(run(&f().with_match_index(PositionRule::at(1))), vec![2]);
        assert_eq!(run(&f().with_match_index(PositionRule::at(-2))), vec![2]);
        assert!(run(&f().with_match_index(PositionRule::at(3))).is_empty());
        assert!(run(&f().with_match_index(PositionRule::at(-4))).is_empty());
        assert_eq!(
            run(&f().with_match_index(PositionRule {
                position: 0,
                strict: false
            })),
            vec![5]
        );
    }

    #[test]
    fn order_index_counts_candidates() {
        let f = || FunctionCriterion::new().with_name("f");
        assert_eq!(run(&f().with_order_index(PositionRule::at(2))), vec![2]);
        assert_eq!(run(&f().with_order_index(PositionRule::last())), vec![5]);
        assert!(run(&f().with_order_index(PositionRule::at(1))).is_empty());
        assert_eq!(run(&FunctionCriterion::new().with_order_index(PositionRule::at(3))), vec![3]);
    }

    #[test]
    fn match_index_counts_each_field_separately() {
        let members = vec![
            MemberInfo::function("a.B", "g", vec![TypeDescriptor::class("int")], TypeDescriptor::class("void")),
            MemberInfo::function("a.B", "f", vec![TypeDescriptor::class("int")], TypeDescriptor::class("void")),
            MemberInfo::function("a.B", "f", vec![TypeDescriptor::class("long")], TypeDescriptor::class("void")),
        ];
        let views: Vec<&dyn MemberView> = members.iter().map(|m| m as &dyn MemberView).collect();
        let registry = TemplateRegistry::new();
        let evaluation = Evaluation {
            strictness: Strictness::default(),
            templates: &registry,
        };
        let f_int = || {
            FunctionCriterion::new()
                .with_name("f")
                .with_param_types(vec![TypeDescriptor::class("int")])
        };

        // The int parameter already hit on g(int), so f(int) is its second hit
        let first = f_int().with_match_index(PositionRule::first());
        assert!(select(&first, &views, &evaluation).unwrap().is_empty());

        // f(int) is the last int hit but not the last f hit
        let last = f_int().with_match_index(PositionRule::last());
        assert!(select(&last, &views, &evaluation).unwrap().is_empty());

        let f_first = FunctionCriterion::new().with_name("f").with_match_index(PositionRule::first());
        assert_eq!(select(&f_first, &views, &evaluation).unwrap(), vec![1]);

        let second_int = f_int().with_match_index(PositionRule::at(1));
        assert!(select(&second_int, &views, &evaluation).unwrap().is_empty());
        let second_of_each = FunctionCriterion::new()
            .with_param_types(vec![TypeDescriptor::class("int")])
            .with_return_type(TypeDescriptor::class("void"))
            .with_match_index(PositionRule::at(1));
        assert_eq!(select(&second_of_each, &views, &evaluation).unwrap(), vec![1]);
    }

    #[test]
    fn positional_only_criterion_counts_every_candidate() {
        let criterion = FunctionCriterion::new().with_match_index(PositionRule::at(-2));
        assert_eq!(run(&criterion), vec![4]);
    }

    #[test]
    fn order_and_match_index_are_conjunctive() {
        let f = || FunctionCriterion::new().with_name("f");
        assert_eq!(
            run(&f().with_order_index(PositionRule::at(2)).with_match_index(PositionRule::at(1))),
            vec![2]
        );
        assert!(run(&f().with_order_index(PositionRule::at(2)).with_match_index(PositionRule::first())).is_empty());
    }
}
