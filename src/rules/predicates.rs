use std::{fmt, ops::RangeInclusive, sync::Arc};

use crate::{
    host::{ModifierRules, ParameterInfo},
    typesystem::TypeDescriptor,
    Error, Result,
};

/// Predicate over a name, with helper checks through [`NameRules`]
pub type NamePredicate = Arc<dyn Fn(&NameRules<'_>) -> bool + Send + Sync>;
/// Predicate over a count
pub type CountPredicate = Arc<dyn Fn(usize) -> bool + Send + Sync>;
/// Predicate over a single type
pub type TypePredicate = Arc<dyn Fn(&TypeDescriptor) -> bool + Send + Sync>;
/// Predicate over a parameter list
pub type ParametersPredicate = Arc<dyn Fn(&[ParameterInfo]) -> bool + Send + Sync>;
/// Predicate over parameter names, `None` where a name was not retained
pub type NamesPredicate = Arc<dyn Fn(&[Option<String>]) -> bool + Send + Sync>;
/// Predicate over modifiers
pub type ModifierPredicate = Arc<dyn Fn(&ModifierRules) -> bool + Send + Sync>;

/// The name a [`NamePredicate`] is evaluated against, with the checks obfuscated names
/// are commonly filtered by.
#[derive(Debug, Clone, Copy)]
pub struct NameRules<'a> {
    name: &'a str,
}

impl<'a> NameRules<'a> {
    /// Wraps a name.
    #[must_use]
    pub fn new(name: &'a str) -> Self {
        NameRules { name }
    }

    /// The raw name.
    #[must_use]
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Compiler-generated names contain `$`.
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.name.contains('$')
    }

    /// Only symbols, no letters or digits (`_`, `$$`).
    #[must_use]
    pub fn is_only_symbols(&self) -> bool {
        !self.name.is_empty() && !self.name.chars().any(char::is_alphanumeric)
    }

    /// Only letters.
    #[must_use]
    pub fn is_only_letters(&self) -> bool {
        !self.name.is_empty() && self.name.chars().all(char::is_alphabetic)
    }

    /// Only digits.
    #[must_use]
    pub fn is_only_numbers(&self) -> bool {
        !self.name.is_empty() && self.name.chars().all(|c| c.is_ascii_digit())
    }

    /// Only letters and digits.
    #[must_use]
    pub fn is_only_letters_numbers(&self) -> bool {
        !self.name.is_empty() && self.name.chars().all(char::is_alphanumeric)
    }

    /// No uppercase letters.
    #[must_use]
    pub fn is_only_lowercase(&self) -> bool {
        self.name.chars().any(char::is_alphabetic) && !self.name.chars().any(char::is_uppercase)
    }

    /// No lowercase letters.
    #[must_use]
    pub fn is_only_uppercase(&self) -> bool {
        self.name.chars().any(char::is_alphabetic) && !self.name.chars().any(char::is_lowercase)
    }
}

/// A constraint on a count: exact, inclusive range, or predicate.
#[derive(Clone)]
pub enum CountRule {
    /// Exactly this many
    Exact(usize),
    /// Within this inclusive range
    Range(RangeInclusive<usize>),
    /// Accepted by this predicate
    Predicate(CountPredicate),
}

impl CountRule {
    /// Returns `true` if `count` satisfies the rule.
    #[must_use]
    pub fn matches(&self, count: usize) -> bool {
        match self {
            CountRule::Exact(expected) => count == *expected,
            CountRule::Range(range) => range.contains(&count),
            CountRule::Predicate(predicate) => predicate(count),
        }
    }

    /// Rejects empty ranges.
    ///
    /// # Errors
    /// Returns [`Error::InvalidRuleConfiguration`] for a range that contains nothing.
    pub fn validate(&self, what: &str) -> Result<()> {
        match self {
            CountRule::Range(range) if range.is_empty() => Err(Error::InvalidRuleConfiguration(
                format!("{what} range {}..={} is empty", range.start(), range.end()),
            )),
            _ => Ok(()),
        }
    }

    /// Largest count this rule admits, `None` for predicates.
    #[must_use]
    pub fn max(&self) -> Option<usize> {
        match self {
            CountRule::Exact(expected) => Some(*expected),
            CountRule::Range(range) => Some(*range.end()),
            CountRule::Predicate(_) => None,
        }
    }

    /// Renders the rule under a template label (`paramCount:[2]`).
    #[must_use]
    pub fn template(&self, label: &str) -> String {
        match self {
            CountRule::Exact(expected) => format!("{label}:[{expected}]"),
            CountRule::Range(range) => format!("{label}Range:[{}..{}]", range.start(), range.end()),
            CountRule::Predicate(_) => format!("{label}Conditions:[existed]"),
        }
    }

    pub(crate) fn has_closure(&self) -> bool {
        matches!(self, CountRule::Predicate(_))
    }
}

impl fmt::Debug for CountRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template("count"))
    }
}

impl From<usize> for CountRule {
    fn from(count: usize) -> Self {
        CountRule::Exact(count)
    }
}

impl From<RangeInclusive<usize>> for CountRule {
    fn from(range: RangeInclusive<usize>) -> Self {
        CountRule::Range(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_rules() {
        assert!(NameRules::new("a$b").is_synthetic());
        assert!(NameRules::new("__").is_only_symbols());
        assert!(NameRules::new("abc").is_only_letters());
        assert!(!NameRules::new("a1").is_only_letters());
        assert!(NameRules::new("a1").is_only_letters_numbers());
        assert!(NameRules::new("123").is_only_numbers());
        assert!(NameRules::new("a_b").is_only_lowercase());
        assert!(!NameRules::new("aB").is_only_lowercase());
        assert!(NameRules::new("AB").is_only_uppercase());
        assert!(!NameRules::new("").is_only_letters());
    }

    #[test]
    fn count_rules() {
        assert!(CountRule::Exact(2).matches(2));
        assert!(CountRule::Range(1..=3).matches(3));
        assert!(!CountRule::Range(1..=3).matches(4));
        assert!(CountRule::Predicate(Arc::new(|n| n % 2 == 0)).matches(4));
        #[allow(clippy::reversed_empty_ranges)]
        let empty = CountRule::Range(3..=1);
        assert!(matches!(
            empty.validate("paramCount"),
            Err(Error::InvalidRuleConfiguration(_))
        ));
    }

    #[test]
    fn count_templates() {
        assert_eq!(CountRule::Exact(2).template("paramCount"), "paramCount:[2]");
        assert_eq!(CountRule::Range(1..=3).template("paramCount"), "paramCountRange:[1..3]");
        assert_eq!(
            CountRule::Predicate(Arc::new(|_| true)).template("matchCount"),
            "matchCountConditions:[existed]"
        );
    }
}
