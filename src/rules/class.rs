//! Criteria for classes.

use std::{fmt, sync::Arc};

use crate::{
    host::{ClassInfo, ModifierRules},
    rules::{
        member::{ConstructorCriterion, FunctionCriterion, MemberCriterion, PropertyCriterion},
        predicates::{CountRule, ModifierPredicate, NamePredicate, NameRules},
        RuleId, TemplateRegistry,
    },
    Error, Result,
};

/// A package the candidate classes are drawn from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageScope {
    /// Dotted package name
    pub name: String,
    /// Only this package, not its subpackages
    pub absolute: bool,
}

impl PackageScope {
    /// Returns `true` if `class` lives in this scope.
    #[must_use]
    pub fn contains(&self, class: &ClassInfo) -> bool {
        let package = class.package();
        if self.absolute {
            return package == self.name;
        }
        package == self.name
            || package
                .strip_prefix(self.name.as_str())
                .is_some_and(|rest| rest.starts_with('.'))
    }
}

impl fmt::Display for PackageScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.absolute {
            write!(f, "{} (absolute)", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// An exact name requirement. Optional matchers form an any-of group: when present,
/// at least one of them must match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameMatch {
    /// The expected name
    pub name: String,
    /// Part of the any-of group instead of being required
    pub optional: bool,
}

impl NameMatch {
    /// A required name.
    #[must_use]
    pub fn required(name: &str) -> Self {
        NameMatch {
            name: name.to_string(),
            optional: false,
        }
    }

    /// An optional name.
    #[must_use]
    pub fn optional(name: &str) -> Self {
        NameMatch {
            name: name.to_string(),
            optional: true,
        }
    }
}

/// Any member of a class, filtered by modifiers only.
#[derive(Clone)]
pub struct CallableCriterion {
    /// Identity for template records
    pub id: RuleId,
    /// Predicate over the member's modifiers
    pub modifiers: Option<ModifierPredicate>,
}

impl Default for CallableCriterion {
    fn default() -> Self {
        CallableCriterion {
            id: RuleId::next(),
            modifiers: None,
        }
    }
}

impl CallableCriterion {
    /// Any member.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires modifiers accepted by `predicate`.
    #[must_use]
    pub fn with_modifiers(mut self, predicate: impl Fn(&ModifierRules) -> bool + Send + Sync + 'static) -> Self {
        self.modifiers = Some(Arc::new(predicate));
        self
    }
}

/// The member criterion a nested rule applies.
#[derive(Clone)]
pub enum NestedTarget {
    /// Members of every kind
    Callable(CallableCriterion),
    /// Properties
    Property(PropertyCriterion),
    /// Functions
    Function(FunctionCriterion),
    /// Constructors
    Constructor(ConstructorCriterion),
}

impl NestedTarget {
    /// Label used in templates.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            NestedTarget::Callable(_) => "callable",
            NestedTarget::Property(_) => "property",
            NestedTarget::Function(_) => "function",
            NestedTarget::Constructor(_) => "constructor",
        }
    }

    /// Returns `true` if the inner criterion has any field set.
    #[must_use]
    pub fn is_active(&self) -> bool {
        match self {
            NestedTarget::Callable(criterion) => criterion.modifiers.is_some(),
            NestedTarget::Property(criterion) => criterion.is_active(),
            NestedTarget::Function(criterion) => criterion.is_active(),
            NestedTarget::Constructor(criterion) => criterion.is_active(),
        }
    }

    fn templates(&self, registry: &TemplateRegistry) -> Vec<String> {
        match self {
            NestedTarget::Callable(criterion) => criterion
                .modifiers
                .as_ref()
                .map(|_| vec![registry.modifiers_template(criterion.id)])
                .unwrap_or_default(),
            NestedTarget::Property(criterion) => criterion.templates(registry),
            NestedTarget::Function(criterion) => criterion.templates(registry),
            NestedTarget::Constructor(criterion) => criterion.templates(registry),
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            NestedTarget::Callable(_) => Ok(()),
            NestedTarget::Property(criterion) => criterion.validate(),
            NestedTarget::Function(criterion) => criterion.validate(),
            NestedTarget::Constructor(criterion) => criterion.validate(),
        }
    }
}

/// A member rule a class must satisfy, with a constraint on how many members match it.
///
/// With an active target the class needs at least one matching member and, if `count`
/// is set, a number of matches accepted by it. With an inactive target `count` applies
/// to the total number of members of that kind.
#[derive(Clone)]
pub struct NestedRule {
    /// Which members are counted
    pub target: NestedTarget,
    /// Constraint on the number of counted members
    pub count: Option<CountRule>,
}

impl NestedRule {
    /// Returns `true` if `found` members satisfy this rule.
    #[must_use]
    pub fn count_holds(&self, found: usize) -> bool {
        let accepted = self.count.as_ref().is_none_or(|count| count.matches(found));
        if self.target.is_active() {
            accepted && found > 0
        } else {
            accepted
        }
    }

    fn template(&self, registry: &TemplateRegistry) -> String {
        let mut lines = self.target.templates(registry);
        if let Some(count) = &self.count {
            lines.push(count.template("matchCount"));
        }
        format!("{}Rules:[{}]", self.target.label(), lines.join(", "))
    }
}

/// Selects classes out of a candidate set.
#[derive(Clone)]
pub struct ClassCriterion {
    /// Identity for template records
    pub id: RuleId,
    /// Packages the candidates are restricted to; empty means all
    pub packages: Vec<PackageScope>,
    /// Binary name (`a.b.Outer$Inner`)
    pub full_name: Option<NameMatch>,
    /// Simple name (`Inner`)
    pub simple_name: Option<NameMatch>,
    /// Simple name, or the package-relative binary name of nameless classes (`Outer$1`)
    pub single_name: Option<NameMatch>,
    /// Predicate over the binary name
    pub full_name_predicate: Option<NamePredicate>,
    /// Predicate over the simple name
    pub simple_name_predicate: Option<NamePredicate>,
    /// Predicate over the single name
    pub single_name_predicate: Option<NamePredicate>,
    /// Predicate over the class modifiers
    pub modifiers: Option<ModifierPredicate>,
    /// The superclass must be one of these
    pub extends: Vec<String>,
    /// At least one interface must be one of these
    pub implements: Vec<String>,
    /// At least one annotation must be one of these
    pub annotations: Vec<String>,
    /// The enclosing class must be one of these
    pub enclosing: Vec<String>,
    /// Require an anonymous class
    pub is_anonymous: Option<bool>,
    /// Require a class without superclass
    pub no_super: Option<bool>,
    /// Require a class without interfaces
    pub no_interfaces: Option<bool>,
    /// Member rules the class must satisfy
    pub nested: Vec<NestedRule>,
}

impl Default for ClassCriterion {
    fn default() -> Self {
        ClassCriterion {
            id: RuleId::next(),
            packages: Vec::new(),
            full_name: None,
            simple_name: None,
            single_name: None,
            full_name_predicate: None,
            simple_name_predicate: None,
            single_name_predicate: None,
            modifiers: None,
            extends: Vec::new(),
            implements: Vec::new(),
            annotations: Vec::new(),
            enclosing: Vec::new(),
            is_anonymous: None,
            no_super: None,
            no_interfaces: None,
            nested: Vec::new(),
        }
    }
}

impl ClassCriterion {
    /// An inactive criterion.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts candidates to `package` and its subpackages, or only `package` if `absolute`.
    #[must_use]
    pub fn from_package(mut self, package: &str, absolute: bool) -> Self {
        self.packages.push(PackageScope {
            name: package.to_string(),
            absolute,
        });
        self
    }

    /// Matches the binary name.
    #[must_use]
    pub fn with_full_name(mut self, name: NameMatch) -> Self {
        self.full_name = Some(name);
        self
    }

    /// Matches the simple name.
    #[must_use]
    pub fn with_simple_name(mut self, name: NameMatch) -> Self {
        self.simple_name = Some(name);
        self
    }

    /// Matches the single name.
    #[must_use]
    pub fn with_single_name(mut self, name: NameMatch) -> Self {
        self.single_name = Some(name);
        self
    }

    /// Requires a binary name accepted by `predicate`.
    #[must_use]
    pub fn matching_full_name(mut self, predicate: impl Fn(&NameRules<'_>) -> bool + Send + Sync + 'static) -> Self {
        self.full_name_predicate = Some(Arc::new(predicate));
        self
    }

    /// Requires a simple name accepted by `predicate`.
    #[must_use]
    pub fn matching_simple_name(mut self, predicate: impl Fn(&NameRules<'_>) -> bool + Send + Sync + 'static) -> Self {
        self.simple_name_predicate = Some(Arc::new(predicate));
        self
    }

    /// Requires a single name accepted by `predicate`.
    #[must_use]
    pub fn matching_single_name(mut self, predicate: impl Fn(&NameRules<'_>) -> bool + Send + Sync + 'static) -> Self {
        self.single_name_predicate = Some(Arc::new(predicate));
        self
    }

    /// Requires class modifiers accepted by `predicate`.
    #[must_use]
    pub fn with_modifiers(mut self, predicate: impl Fn(&ModifierRules) -> bool + Send + Sync + 'static) -> Self {
        self.modifiers = Some(Arc::new(predicate));
        self
    }

    /// Requires one of these superclasses.
    #[must_use]
    pub fn extending(mut self, names: &[&str]) -> Self {
        self.extends.extend(names.iter().map(|name| (*name).to_string()));
        self
    }

    /// Requires one of these interfaces.
    #[must_use]
    pub fn implementing(mut self, names: &[&str]) -> Self {
        self.implements.extend(names.iter().map(|name| (*name).to_string()));
        self
    }

    /// Requires one of these annotations.
    #[must_use]
    pub fn annotated_with(mut self, names: &[&str]) -> Self {
        self.annotations.extend(names.iter().map(|name| (*name).to_string()));
        self
    }

    /// Requires one of these enclosing classes.
    #[must_use]
    pub fn enclosed_by(mut self, names: &[&str]) -> Self {
        self.enclosing.extend(names.iter().map(|name| (*name).to_string()));
        self
    }

    /// Requires an anonymous class.
    #[must_use]
    pub fn anonymous(mut self) -> Self {
        self.is_anonymous = Some(true);
        self
    }

    /// Requires a class without superclass.
    #[must_use]
    pub fn without_super(mut self) -> Self {
        self.no_super = Some(true);
        self
    }

    /// Requires a class without interfaces.
    #[must_use]
    pub fn without_interfaces(mut self) -> Self {
        self.no_interfaces = Some(true);
        self
    }

    /// Adds a nested member rule.
    #[must_use]
    pub fn with_member(mut self, target: NestedTarget, count: Option<CountRule>) -> Self {
        self.nested.push(NestedRule { target, count });
        self
    }

    /// Returns `true` if any field is set.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.packages.is_empty()
            || self.full_name.is_some()
            || self.simple_name.is_some()
            || self.single_name.is_some()
            || self.full_name_predicate.is_some()
            || self.simple_name_predicate.is_some()
            || self.single_name_predicate.is_some()
            || self.modifiers.is_some()
            || !self.extends.is_empty()
            || !self.implements.is_empty()
            || !self.annotations.is_empty()
            || !self.enclosing.is_empty()
            || self.is_anonymous.is_some()
            || self.no_super.is_some()
            || self.no_interfaces.is_some()
            || !self.nested.is_empty()
    }

    /// Rejects blank names and invalid nested rules.
    ///
    /// # Errors
    /// Returns [`Error::InvalidRuleConfiguration`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        for name in [&self.full_name, &self.simple_name, &self.single_name]
            .into_iter()
            .flatten()
        {
            if name.name.trim().is_empty() {
                return Err(Error::InvalidRuleConfiguration(
                    "class name is blank".to_string(),
                ));
            }
        }
        for rule in &self.nested {
            rule.target.validate()?;
            if let Some(count) = &rule.count {
                count.validate("matchCount")?;
            }
        }
        Ok(())
    }

    /// Returns `true` if `class` lies in one of the package scopes, or no scope is set.
    #[must_use]
    pub fn in_scope(&self, class: &ClassInfo) -> bool {
        self.packages.is_empty() || self.packages.iter().any(|scope| scope.contains(class))
    }

    /// Evaluates every class-level field except nested member rules.
    #[must_use]
    pub fn matches_class(&self, class: &ClassInfo, registry: &TemplateRegistry) -> bool {
        let mut optional_seen = false;
        let mut optional_hit = false;
        for (matcher, actual) in [
            (&self.full_name, class.name.as_str()),
            (&self.simple_name, class.simple_name.as_str()),
            (&self.single_name, class.single_name()),
        ] {
            let Some(matcher) = matcher else { continue };
            let hit = matcher.name == actual;
            if matcher.optional {
                optional_seen = true;
                optional_hit |= hit;
            } else if !hit {
                return false;
            }
        }
        if optional_seen && !optional_hit {
            return false;
        }

        for (predicate, actual) in [
            (&self.full_name_predicate, class.name.as_str()),
            (&self.simple_name_predicate, class.simple_name.as_str()),
            (&self.single_name_predicate, class.single_name()),
        ] {
            if predicate.as_ref().is_some_and(|predicate| !predicate(&NameRules::new(actual))) {
                return false;
            }
        }

        if let Some(predicate) = &self.modifiers {
            let view = ModifierRules::new(class.modifiers, class.traits, false);
            let result = predicate(&view);
            registry.record(self.id, view.into_records());
            if !result {
                return false;
            }
        }

        let named = |set: &[String], name: Option<&str>| {
            set.is_empty() || name.is_some_and(|name| set.iter().any(|entry| entry == name))
        };
        let any_named = |set: &[String], names: &[String]| {
            set.is_empty() || names.iter().any(|name| set.contains(name))
        };

        named(&self.extends, class.superclass.as_deref())
            && any_named(&self.implements, &class.interfaces)
            && any_named(&self.annotations, &class.annotations)
            && named(&self.enclosing, class.enclosing.as_deref())
            && self.is_anonymous.is_none_or(|wanted| class.is_anonymous() == wanted)
            && self.no_super.is_none_or(|wanted| class.superclass.is_none() == wanted)
            && self.no_interfaces.is_none_or(|wanted| class.interfaces.is_empty() == wanted)
    }

    /// Human-readable lines for every active field.
    #[must_use]
    pub fn templates(&self, registry: &TemplateRegistry) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.packages.is_empty() {
            let packages: Vec<String> = self.packages.iter().map(ToString::to_string).collect();
            lines.push(format!("fromPackages:[{}]", packages.join(", ")));
        }
        for (label, matcher) in [
            ("fullName", &self.full_name),
            ("simpleName", &self.simple_name),
            ("singleName", &self.single_name),
        ] {
            if let Some(matcher) = matcher {
                let suffix = if matcher.optional { " (optional)" } else { "" };
                lines.push(format!("{label}:[{}{suffix}]", matcher.name));
            }
        }
        for (label, predicate) in [
            ("fullNameConditions", &self.full_name_predicate),
            ("simpleNameConditions", &self.simple_name_predicate),
            ("singleNameConditions", &self.single_name_predicate),
        ] {
            if predicate.is_some() {
                lines.push(format!("{label}:[existed]"));
            }
        }
        if self.modifiers.is_some() {
            lines.push(registry.modifiers_template(self.id));
        }
        for (label, set) in [
            ("extendsClass", &self.extends),
            ("implementsClass", &self.implements),
            ("annotationClass", &self.annotations),
            ("enclosingClass", &self.enclosing),
        ] {
            if !set.is_empty() {
                lines.push(format!("{label}:[{}]", set.join(", ")));
            }
        }
        for (label, flag) in [
            ("isAnonymousClass", self.is_anonymous),
            ("isNoExtendsClass", self.no_super),
            ("isNoImplementsClass", self.no_interfaces),
        ] {
            if let Some(flag) = flag {
                lines.push(format!("{label}:[{flag}]"));
            }
        }
        lines.extend(self.nested.iter().map(|rule| rule.template(registry)));
        lines
    }
}

impl fmt::Debug for ClassCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.templates(&TemplateRegistry::new()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Modifiers;

    fn matches(criterion: &ClassCriterion, class: &ClassInfo) -> bool {
        criterion.matches_class(class, &TemplateRegistry::new())
    }

    #[test]
    fn package_scopes() {
        let class = ClassInfo::new("com.example.ui.View");
        assert!(PackageScope { name: "com.example".into(), absolute: false }.contains(&class));
        assert!(!PackageScope { name: "com.example".into(), absolute: true }.contains(&class));
        assert!(!PackageScope { name: "com.ex".into(), absolute: false }.contains(&class));
        assert!(PackageScope { name: "com.example.ui".into(), absolute: true }.contains(&class));
    }

    #[test]
    fn required_and_optional_names() {
        let class = ClassInfo::new("com.example.Outer$1");

        assert!(matches(
            &ClassCriterion::new().with_single_name(NameMatch::required("Outer$1")),
            &class
        ));
        assert!(matches(
            &ClassCriterion::new()
                .with_simple_name(NameMatch::optional("Nope"))
                .with_full_name(NameMatch::optional("com.example.Outer$1")),
            &class
        ));
        assert!(!matches(
            &ClassCriterion::new()
                .with_simple_name(NameMatch::optional("Nope"))
                .with_single_name(NameMatch::optional("Also")),
            &class
        ));
    }

    #[test]
    fn hierarchy_sets() {
        let class = ClassInfo::new("a.Impl")
            .extends("a.Base")
            .implements("a.Runnable")
            .annotated("a.Keep")
            .enclosed_by("a.Host");

        assert!(matches(
            &ClassCriterion::new()
                .extending(&["a.Other", "a.Base"])
                .implementing(&["a.Runnable"])
                .annotated_with(&["a.Keep"])
                .enclosed_by(&["a.Host"]),
            &class
        ));
        assert!(!matches(&ClassCriterion::new().without_super(), &class));
        assert!(!matches(&ClassCriterion::new().without_interfaces(), &class));
        assert!(!matches(&ClassCriterion::new().anonymous(), &class));
    }

    #[test]
    fn class_modifiers_are_recorded() {
        let class = ClassInfo::new("a.B").with_modifiers(Modifiers::PUBLIC | Modifiers::ABSTRACT);
        let criterion = ClassCriterion::new().with_modifiers(|m| m.is_abstract());
        let registry = TemplateRegistry::new();

        assert!(criterion.matches_class(&class, &registry));
        assert_eq!(criterion.templates(&registry), vec!["modifiers:[<isAbstract> (true)]".to_string()]);
    }

    #[test]
    fn nested_count_semantics() {
        let active = NestedRule {
            target: NestedTarget::Function(FunctionCriterion::new().with_name("run")),
            count: None,
        };
        assert!(!active.count_holds(0));
        assert!(active.count_holds(3));

        let inactive = NestedRule {
            target: NestedTarget::Constructor(ConstructorCriterion::new()),
            count: Some(CountRule::Exact(0)),
        };
        assert!(inactive.count_holds(0));
        assert!(!inactive.count_holds(1));
    }

    #[test]
    fn templates_and_activity() {
        assert!(!ClassCriterion::new().is_active());
        let criterion = ClassCriterion::new()
            .from_package("com.example", false)
            .with_simple_name(NameMatch::required("Foo"))
            .with_member(
                NestedTarget::Property(PropertyCriterion::new().with_name("x")),
                Some(CountRule::Exact(1)),
            );
        assert!(criterion.is_active());
        assert_eq!(
            criterion.templates(&TemplateRegistry::new()),
            vec![
                "fromPackages:[com.example]".to_string(),
                "simpleName:[Foo]".to_string(),
                "propertyRules:[name:[x], matchCount:[1]]".to_string(),
            ]
        );
    }

    #[test]
    fn blank_names_are_rejected() {
        assert!(matches!(
            ClassCriterion::new().with_full_name(NameMatch::required("")).validate(),
            Err(Error::InvalidRuleConfiguration(_))
        ));
    }
}
