use std::{
    cell::RefCell,
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
};

static NEXT_RULE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a criterion, drawn from a process-wide monotonic counter.
///
/// Clones of a criterion share its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(u64);

impl RuleId {
    /// Allocates a fresh id.
    #[must_use]
    pub fn next() -> Self {
        RuleId(NEXT_RULE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw counter value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Per-query store of the modifier predicates each criterion consulted.
///
/// The engine creates one for every query and threads it through evaluation. A later
/// evaluation of the same criterion overwrites the earlier record, so after a failed search
/// the registry holds what the predicate saw on the last candidate.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    records: RefCell<HashMap<RuleId, Vec<String>>>,
}

impl TemplateRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the records of one evaluation.
    pub fn record(&self, id: RuleId, records: Vec<String>) {
        self.records.borrow_mut().insert(id, records);
    }

    /// Renders the `modifiers:[...]` template line of a criterion.
    #[must_use]
    pub fn modifiers_template(&self, id: RuleId) -> String {
        match self.records.borrow().get(&id) {
            Some(records) if !records.is_empty() => format!("modifiers:[{}]", records.join(", ")),
            _ => "modifiers:[existed]".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic() {
        let first = RuleId::next();
        let second = RuleId::next();
        assert!(second > first);
    }

    #[test]
    fn later_records_overwrite() {
        let registry = TemplateRegistry::new();
        let id = RuleId::next();

        assert_eq!(registry.modifiers_template(id), "modifiers:[existed]");
        registry.record(id, vec!["<isPublic> (true)".to_string()]);
        registry.record(id, vec!["<isPublic> (false)".to_string(), "<isStatic> (true)".to_string()]);
        assert_eq!(
            registry.modifiers_template(id),
            "modifiers:[<isPublic> (false), <isStatic> (true)]"
        );
    }
}
