//! Criteria for properties, functions and constructors.

use std::{fmt, sync::Arc};

use crate::{
    host::{MemberInfo, ModifierRules, ParameterInfo},
    rules::{
        predicates::{
            CountRule, ModifierPredicate, NamePredicate, NameRules, NamesPredicate,
            ParametersPredicate, TypePredicate,
        },
        PositionRule, RuleId, TemplateRegistry,
    },
    typesystem::{param_names_eq, param_types_eq, type_eq, Strictness, TypeDescriptor},
    Error, MemberKind, Result,
};

/// What a member criterion is evaluated against.
///
/// Implemented by [`MemberInfo`] for reflective lookups and by the engine's signature
/// candidates for metadata lookups.
pub trait MemberView {
    /// Declared name.
    fn name(&self) -> &str;
    /// Parameters, empty for properties.
    fn parameters(&self) -> &[ParameterInfo];
    /// Return type of functions, declared type of properties.
    fn return_type(&self) -> &TypeDescriptor;
    /// Modifier view, `None` if the candidate carries no modifier information.
    fn modifier_rules(&self) -> Option<ModifierRules>;
}

impl MemberView for MemberInfo {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> &[ParameterInfo] {
        &self.parameters
    }

    fn return_type(&self) -> &TypeDescriptor {
        &self.return_type
    }

    fn modifier_rules(&self) -> Option<ModifierRules> {
        Some(MemberInfo::modifier_rules(self))
    }
}

/// Settings shared by one evaluation pass.
pub struct Evaluation<'a> {
    /// Strictness applied to every type comparison
    pub strictness: Strictness,
    /// Where modifier predicates record what they consulted
    pub templates: &'a TemplateRegistry,
}

/// Common interface of the member criteria, used by the engine to run any of them.
pub trait MemberCriterion {
    /// The member kind this criterion selects.
    const KIND: MemberKind;

    /// Identity used for template records.
    fn id(&self) -> RuleId;

    /// Modifier, positional and fallback settings.
    fn rules(&self) -> &MemberRules;

    /// Returns `true` if any structural field or positional rule is set.
    fn is_active(&self) -> bool;

    /// Rejects contradictory or nonsensical settings.
    ///
    /// # Errors
    /// Returns [`Error::InvalidRuleConfiguration`] describing the first problem found.
    fn validate(&self) -> Result<()>;

    /// Evaluates each active structural field against one candidate on its own.
    ///
    /// Returns one entry per active field, in a fixed order that only depends on the
    /// criterion, so the engine can keep a separate positional counter for every field.
    /// Every field is evaluated even after one has failed.
    ///
    /// # Errors
    /// Propagates [`Error::InvalidRuleConfiguration`] raised while comparing types.
    fn clauses(&self, candidate: &dyn MemberView, evaluation: &Evaluation<'_>) -> Result<Vec<bool>>;

    /// Evaluates every structural field against one candidate, conjunctively.
    ///
    /// Positional rules are not part of this; the engine applies them afterwards.
    ///
    /// # Errors
    /// Propagates [`Error::InvalidRuleConfiguration`] raised while comparing types.
    fn matches(&self, candidate: &dyn MemberView, evaluation: &Evaluation<'_>) -> Result<bool> {
        Ok(self.clauses(candidate, evaluation)?.into_iter().all(|hit| hit))
    }

    /// Human-readable lines for every active field.
    fn templates(&self, registry: &TemplateRegistry) -> Vec<String>;

    /// Stable textual identity for caching, `None` if the criterion holds closures.
    fn fingerprint(&self) -> Option<String> {
        if self.has_closure() {
            return None;
        }
        let mut lines = self.templates(&TemplateRegistry::new());
        lines.push(format!("findInSuper:[{}]", self.rules().find_in_super));
        Some(lines.join("\n"))
    }

    /// Returns `true` if any field is a predicate closure.
    fn has_closure(&self) -> bool;
}

/// Modifier, positional and superclass-fallback settings shared by all member criteria.
#[derive(Clone, Default)]
pub struct MemberRules {
    /// Predicate over the candidate's modifiers
    pub modifiers: Option<ModifierPredicate>,
    /// Position among all candidates
    pub order_index: Option<PositionRule>,
    /// Position among the candidates satisfying every structural field
    pub match_index: Option<PositionRule>,
    /// Retry against the superclass when nothing matches
    pub find_in_super: bool,
}

impl MemberRules {
    fn is_active(&self) -> bool {
        self.modifiers.is_some() || self.order_index.is_some() || self.match_index.is_some()
    }

    fn push_clauses(&self, id: RuleId, candidate: &dyn MemberView, registry: &TemplateRegistry, hits: &mut Vec<bool>) {
        let Some(predicate) = &self.modifiers else {
            return;
        };
        hits.push(candidate.modifier_rules().is_some_and(|view| {
            let result = predicate(&view);
            registry.record(id, view.into_records());
            result
        }));
    }

    fn push_templates(&self, id: RuleId, registry: &TemplateRegistry, lines: &mut Vec<String>) {
        if self.modifiers.is_some() {
            lines.push(registry.modifiers_template(id));
        }
        if let Some(order) = &self.order_index {
            lines.push(format!("orderIndex:[{order}]"));
        }
        if let Some(matching) = &self.match_index {
            lines.push(format!("matchIndex:[{matching}]"));
        }
    }
}

/// Parameter-related fields shared by functions and constructors.
#[derive(Clone, Default)]
pub struct ParameterRules {
    /// Constraint on the number of parameters
    pub count: Option<CountRule>,
    /// Exact parameter types, compared positionally; may embed `Vague`
    pub types: Option<Vec<TypeDescriptor>>,
    /// Predicate over the parameter list
    pub types_predicate: Option<ParametersPredicate>,
    /// Parameter names, compared positionally; `""`, `"null"` and `"*"` match anything
    pub names: Option<Vec<String>>,
    /// Predicate over the parameter names
    pub names_predicate: Option<NamesPredicate>,
}

impl ParameterRules {
    fn is_active(&self) -> bool {
        self.count.is_some()
            || self.types.is_some()
            || self.types_predicate.is_some()
            || self.names.is_some()
            || self.names_predicate.is_some()
    }

    fn has_closure(&self) -> bool {
        self.count.as_ref().is_some_and(CountRule::has_closure)
            || self.types_predicate.is_some()
            || self.names_predicate.is_some()
    }

    fn validate(&self) -> Result<()> {
        if let Some(count) = &self.count {
            count.validate("paramCount")?;
        }
        let Some(types) = &self.types else {
            return Ok(());
        };

        if let Some(position) = types.iter().position(TypeDescriptor::is_unresolved) {
            return Err(Error::InvalidRuleConfiguration(format!(
                "paramTypes[{position}] is unresolved: {}",
                types[position]
            )));
        }
        if !types.is_empty() && types.iter().all(TypeDescriptor::is_vague) {
            return Err(Error::InvalidRuleConfiguration(
                "paramTypes consist solely of Vague".to_string(),
            ));
        }
        if let Some(max) = self.count.as_ref().and_then(CountRule::max) {
            if max < types.len() {
                return Err(Error::InvalidRuleConfiguration(format!(
                    "paramCount admits at most {max} parameters but {} paramTypes are given",
                    types.len()
                )));
            }
        }
        Ok(())
    }

    fn push_clauses(&self, parameters: &[ParameterInfo], strictness: &Strictness, hits: &mut Vec<bool>) -> Result<()> {
        if let Some(count) = &self.count {
            hits.push(count.matches(parameters.len()));
        }
        if let Some(types) = &self.types {
            let actual: Vec<TypeDescriptor> = parameters.iter().map(|p| p.ty.clone()).collect();
            hits.push(param_types_eq(types, &actual, strictness)?);
        }
        if let Some(predicate) = &self.types_predicate {
            hits.push(predicate(parameters));
        }
        if self.names.is_some() || self.names_predicate.is_some() {
            let actual: Vec<Option<String>> = parameters.iter().map(|p| p.name.clone()).collect();
            if let Some(names) = &self.names {
                hits.push(param_names_eq(names, &actual));
            }
            if let Some(predicate) = &self.names_predicate {
                hits.push(predicate(&actual));
            }
        }
        Ok(())
    }

    fn push_templates(&self, lines: &mut Vec<String>) {
        if let Some(count) = &self.count {
            lines.push(count.template("paramCount"));
        }
        if let Some(types) = &self.types {
            let rendered: Vec<String> = types.iter().map(ToString::to_string).collect();
            lines.push(format!("paramTypes:[({})]", rendered.join(", ")));
        }
        if self.types_predicate.is_some() {
            lines.push("paramTypesConditions:[existed]".to_string());
        }
        if let Some(names) = &self.names {
            lines.push(format!("paramNames:[({})]", names.join(", ")));
        }
        if self.names_predicate.is_some() {
            lines.push("paramNamesConditions:[existed]".to_string());
        }
    }
}

fn push_name_clauses(name: &Option<String>, predicate: &Option<NamePredicate>, actual: &str, hits: &mut Vec<bool>) {
    if let Some(expected) = name {
        hits.push(expected == actual);
    }
    if let Some(predicate) = predicate {
        hits.push(predicate(&NameRules::new(actual)));
    }
}

fn push_type_clauses(
    ty: &Option<TypeDescriptor>,
    predicate: &Option<TypePredicate>,
    actual: &TypeDescriptor,
    strictness: &Strictness,
    hits: &mut Vec<bool>,
) {
    if let Some(ty) = ty {
        hits.push(type_eq(ty, actual, strictness));
    }
    if let Some(predicate) = predicate {
        hits.push(predicate(actual));
    }
}

fn validate_name(name: &Option<String>) -> Result<()> {
    match name {
        Some(name) if name.trim().is_empty() => Err(Error::InvalidRuleConfiguration(
            "name is blank".to_string(),
        )),
        _ => Ok(()),
    }
}

fn validate_type(label: &str, ty: &Option<TypeDescriptor>) -> Result<()> {
    match ty {
        Some(ty) if ty.is_unresolved() => Err(Error::InvalidRuleConfiguration(format!(
            "{label} is unresolved: {ty}"
        ))),
        _ => Ok(()),
    }
}

fn push_name_templates(name: &Option<String>, predicate: &Option<NamePredicate>, lines: &mut Vec<String>) {
    if let Some(name) = name {
        lines.push(format!("name:[{name}]"));
    }
    if predicate.is_some() {
        lines.push("nameConditions:[existed]".to_string());
    }
}

macro_rules! member_rule_builders {
    () => {
        /// Requires modifiers accepted by `predicate`.
        #[must_use]
        pub fn with_modifiers(mut self, predicate: impl Fn(&ModifierRules) -> bool + Send + Sync + 'static) -> Self {
            self.rules.modifiers = Some(Arc::new(predicate));
            self
        }

        /// Selects by position among all candidates.
        #[must_use]
        pub fn with_order_index(mut self, rule: PositionRule) -> Self {
            self.rules.order_index = Some(rule);
            self
        }

        /// Selects by position among the structurally matching candidates.
        #[must_use]
        pub fn with_match_index(mut self, rule: PositionRule) -> Self {
            self.rules.match_index = Some(rule);
            self
        }

        /// Retries against the superclass chain when nothing matches.
        #[must_use]
        pub fn find_in_super(mut self) -> Self {
            self.rules.find_in_super = true;
            self
        }
    };
}

macro_rules! parameter_builders {
    () => {
        /// Constrains the parameter count.
        #[must_use]
        pub fn with_param_count(mut self, count: impl Into<CountRule>) -> Self {
            self.params.count = Some(count.into());
            self
        }

        /// Requires no parameters.
        #[must_use]
        pub fn empty_params(self) -> Self {
            self.with_param_count(0usize)
        }

        /// Requires these parameter types, positionally.
        #[must_use]
        pub fn with_param_types(mut self, types: Vec<TypeDescriptor>) -> Self {
            self.params.types = Some(types);
            self
        }

        /// Requires parameters accepted by `predicate`.
        #[must_use]
        pub fn matching_params(mut self, predicate: impl Fn(&[ParameterInfo]) -> bool + Send + Sync + 'static) -> Self {
            self.params.types_predicate = Some(Arc::new(predicate));
            self
        }

        /// Requires these parameter names, positionally.
        #[must_use]
        pub fn with_param_names(mut self, names: &[&str]) -> Self {
            self.params.names = Some(names.iter().map(|name| (*name).to_string()).collect());
            self
        }

        /// Requires parameter names accepted by `predicate`.
        #[must_use]
        pub fn matching_param_names(mut self, predicate: impl Fn(&[Option<String>]) -> bool + Send + Sync + 'static) -> Self {
            self.params.names_predicate = Some(Arc::new(predicate));
            self
        }
    };
}

/// Selects properties and fields.
#[derive(Clone)]
pub struct PropertyCriterion {
    /// Identity for template records
    pub id: RuleId,
    /// Exact name
    pub name: Option<String>,
    /// Predicate over the name
    pub name_predicate: Option<NamePredicate>,
    /// Declared type
    pub ty: Option<TypeDescriptor>,
    /// Predicate over the declared type
    pub type_predicate: Option<TypePredicate>,
    /// Modifier, positional and fallback settings
    pub rules: MemberRules,
}

impl Default for PropertyCriterion {
    fn default() -> Self {
        PropertyCriterion {
            id: RuleId::next(),
            name: None,
            name_predicate: None,
            ty: None,
            type_predicate: None,
            rules: MemberRules::default(),
        }
    }
}

impl PropertyCriterion {
    /// An inactive criterion.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires this exact name.
    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Requires a name accepted by `predicate`.
    #[must_use]
    pub fn matching_name(mut self, predicate: impl Fn(&NameRules<'_>) -> bool + Send + Sync + 'static) -> Self {
        self.name_predicate = Some(Arc::new(predicate));
        self
    }

    /// Requires this declared type.
    #[must_use]
    pub fn with_type(mut self, ty: TypeDescriptor) -> Self {
        self.ty = Some(ty);
        self
    }

    /// Requires a declared type accepted by `predicate`.
    #[must_use]
    pub fn matching_type(mut self, predicate: impl Fn(&TypeDescriptor) -> bool + Send + Sync + 'static) -> Self {
        self.type_predicate = Some(Arc::new(predicate));
        self
    }

    member_rule_builders!();
}

impl MemberCriterion for PropertyCriterion {
    const KIND: MemberKind = MemberKind::Property;

    fn id(&self) -> RuleId {
        self.id
    }

    fn rules(&self) -> &MemberRules {
        &self.rules
    }

    fn is_active(&self) -> bool {
        self.name.is_some()
            || self.name_predicate.is_some()
            || self.ty.is_some()
            || self.type_predicate.is_some()
            || self.rules.is_active()
    }

    fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        validate_type("type", &self.ty)
    }

    fn clauses(&self, candidate: &dyn MemberView, evaluation: &Evaluation<'_>) -> Result<Vec<bool>> {
        let mut hits = Vec::new();
        push_name_clauses(&self.name, &self.name_predicate, candidate.name(), &mut hits);
        push_type_clauses(&self.ty, &self.type_predicate, candidate.return_type(), &evaluation.strictness, &mut hits);
        self.rules.push_clauses(self.id, candidate, evaluation.templates, &mut hits);
        Ok(hits)
    }

    fn templates(&self, registry: &TemplateRegistry) -> Vec<String> {
        let mut lines = Vec::new();
        push_name_templates(&self.name, &self.name_predicate, &mut lines);
        if let Some(ty) = &self.ty {
            lines.push(format!("type:[{ty}]"));
        }
        if self.type_predicate.is_some() {
            lines.push("typeConditions:[existed]".to_string());
        }
        self.rules.push_templates(self.id, registry, &mut lines);
        lines
    }

    fn has_closure(&self) -> bool {
        self.name_predicate.is_some() || self.type_predicate.is_some() || self.rules.modifiers.is_some()
    }
}

/// Selects functions and methods.
#[derive(Clone)]
pub struct FunctionCriterion {
    /// Identity for template records
    pub id: RuleId,
    /// Exact name; `<get-x>`/`<set-x>` select property accessors
    pub name: Option<String>,
    /// Predicate over the name
    pub name_predicate: Option<NamePredicate>,
    /// Parameter count, types and names
    pub params: ParameterRules,
    /// Return type
    pub return_type: Option<TypeDescriptor>,
    /// Predicate over the return type
    pub return_type_predicate: Option<TypePredicate>,
    /// Modifier, positional and fallback settings
    pub rules: MemberRules,
}

impl Default for FunctionCriterion {
    fn default() -> Self {
        FunctionCriterion {
            id: RuleId::next(),
            name: None,
            name_predicate: None,
            params: ParameterRules::default(),
            return_type: None,
            return_type_predicate: None,
            rules: MemberRules::default(),
        }
    }
}

impl FunctionCriterion {
    /// An inactive criterion.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires this exact name.
    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Requires a name accepted by `predicate`.
    #[must_use]
    pub fn matching_name(mut self, predicate: impl Fn(&NameRules<'_>) -> bool + Send + Sync + 'static) -> Self {
        self.name_predicate = Some(Arc::new(predicate));
        self
    }

    /// Requires this return type.
    #[must_use]
    pub fn with_return_type(mut self, ty: TypeDescriptor) -> Self {
        self.return_type = Some(ty);
        self
    }

    /// Requires a return type accepted by `predicate`.
    #[must_use]
    pub fn matching_return_type(mut self, predicate: impl Fn(&TypeDescriptor) -> bool + Send + Sync + 'static) -> Self {
        self.return_type_predicate = Some(Arc::new(predicate));
        self
    }

    parameter_builders!();
    member_rule_builders!();

    /// The property name if this criterion names an accessor (`<get-x>`, `<set-x>`).
    #[must_use]
    pub fn accessor_target(&self) -> Option<(AccessorKind, &str)> {
        let name = self.name.as_deref()?;
        let inner = name.strip_prefix('<')?.strip_suffix('>')?;
        if let Some(property) = inner.strip_prefix("get-") {
            return Some((AccessorKind::Getter, property));
        }
        inner
            .strip_prefix("set-")
            .map(|property| (AccessorKind::Setter, property))
    }
}

/// Which accessor of a property a function name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    /// `<get-x>`
    Getter,
    /// `<set-x>`
    Setter,
}

impl MemberCriterion for FunctionCriterion {
    const KIND: MemberKind = MemberKind::Function;

    fn id(&self) -> RuleId {
        self.id
    }

    fn rules(&self) -> &MemberRules {
        &self.rules
    }

    fn is_active(&self) -> bool {
        self.name.is_some()
            || self.name_predicate.is_some()
            || self.params.is_active()
            || self.return_type.is_some()
            || self.return_type_predicate.is_some()
            || self.rules.is_active()
    }

    fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        self.params.validate()?;
        validate_type("returnType", &self.return_type)
    }

    fn clauses(&self, candidate: &dyn MemberView, evaluation: &Evaluation<'_>) -> Result<Vec<bool>> {
        let mut hits = Vec::new();
        push_name_clauses(&self.name, &self.name_predicate, candidate.name(), &mut hits);
        self.params.push_clauses(candidate.parameters(), &evaluation.strictness, &mut hits)?;
        push_type_clauses(
            &self.return_type,
            &self.return_type_predicate,
            candidate.return_type(),
            &evaluation.strictness,
            &mut hits,
        );
        self.rules.push_clauses(self.id, candidate, evaluation.templates, &mut hits);
        Ok(hits)
    }

    fn templates(&self, registry: &TemplateRegistry) -> Vec<String> {
        let mut lines = Vec::new();
        push_name_templates(&self.name, &self.name_predicate, &mut lines);
        self.params.push_templates(&mut lines);
        if let Some(ty) = &self.return_type {
            lines.push(format!("returnType:[{ty}]"));
        }
        if self.return_type_predicate.is_some() {
            lines.push("returnTypeConditions:[existed]".to_string());
        }
        self.rules.push_templates(self.id, registry, &mut lines);
        lines
    }

    fn has_closure(&self) -> bool {
        self.name_predicate.is_some()
            || self.params.has_closure()
            || self.return_type_predicate.is_some()
            || self.rules.modifiers.is_some()
    }
}

/// Selects constructors.
#[derive(Clone)]
pub struct ConstructorCriterion {
    /// Identity for template records
    pub id: RuleId,
    /// Parameter count, types and names
    pub params: ParameterRules,
    /// Modifier, positional and fallback settings
    pub rules: MemberRules,
}

impl Default for ConstructorCriterion {
    fn default() -> Self {
        ConstructorCriterion {
            id: RuleId::next(),
            params: ParameterRules::default(),
            rules: MemberRules::default(),
        }
    }
}

impl ConstructorCriterion {
    /// An inactive criterion.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    parameter_builders!();
    member_rule_builders!();
}

impl MemberCriterion for ConstructorCriterion {
    const KIND: MemberKind = MemberKind::Constructor;

    fn id(&self) -> RuleId {
        self.id
    }

    fn rules(&self) -> &MemberRules {
        &self.rules
    }

    fn is_active(&self) -> bool {
        self.params.is_active() || self.rules.is_active()
    }

    fn validate(&self) -> Result<()> {
        self.params.validate()
    }

    fn clauses(&self, candidate: &dyn MemberView, evaluation: &Evaluation<'_>) -> Result<Vec<bool>> {
        let mut hits = Vec::new();
        self.params.push_clauses(candidate.parameters(), &evaluation.strictness, &mut hits)?;
        self.rules.push_clauses(self.id, candidate, evaluation.templates, &mut hits);
        Ok(hits)
    }

    fn templates(&self, registry: &TemplateRegistry) -> Vec<String> {
        let mut lines = Vec::new();
        self.params.push_templates(&mut lines);
        self.rules.push_templates(self.id, registry, &mut lines);
        lines
    }

    fn has_closure(&self) -> bool {
        self.params.has_closure() || self.rules.modifiers.is_some()
    }
}

macro_rules! debug_via_templates {
    ($($criterion:ty),*) => {
        $(
            impl fmt::Debug for $criterion {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.debug_list().entries(self.templates(&TemplateRegistry::new())).finish()
                }
            }
        )*
    };
}

debug_via_templates!(PropertyCriterion, FunctionCriterion, ConstructorCriterion);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Modifiers;

    fn evaluate(criterion: &impl MemberCriterion, member: &MemberInfo) -> bool {
        let registry = TemplateRegistry::new();
        let evaluation = Evaluation {
            strictness: Strictness::default(),
            templates: &registry,
        };
        criterion.matches(member, &evaluation).unwrap()
    }

    fn put() -> MemberInfo {
        MemberInfo::function(
            "a.Map",
            "put",
            vec![TypeDescriptor::class("java.lang.String"), TypeDescriptor::class("int")],
            TypeDescriptor::class("void"),
        )
        .with_param_names(&["key", "value"])
    }

    #[test]
    fn inactive_until_a_field_is_set() {
        assert!(!FunctionCriterion::new().is_active());
        assert!(!FunctionCriterion::new().find_in_super().is_active());
        assert!(FunctionCriterion::new().with_name("f").is_active());
        assert!(ConstructorCriterion::new().empty_params().is_active());
        assert!(PropertyCriterion::new().with_match_index(PositionRule::first()).is_active());
    }

    #[test]
    fn function_fields_are_conjunctive() {
        let member = put();

        assert!(evaluate(&FunctionCriterion::new().with_name("put").with_param_count(2usize), &member));
        assert!(evaluate(
            &FunctionCriterion::new()
                .with_param_types(vec![TypeDescriptor::Vague, TypeDescriptor::class("int")])
                .with_return_type(TypeDescriptor::class("kotlin.Unit")),
            &member
        ));
        assert!(!evaluate(&FunctionCriterion::new().with_name("put").with_param_count(1usize), &member));
        assert!(evaluate(&FunctionCriterion::new().with_param_names(&["key", "*"]), &member));
        assert!(!evaluate(&FunctionCriterion::new().with_param_names(&["k", "*"]), &member));
        assert!(evaluate(
            &FunctionCriterion::new().matching_name(|name| name.is_only_lowercase()),
            &member
        ));
    }

    #[test]
    fn clauses_report_each_active_field() {
        let member = put();
        let registry = TemplateRegistry::new();
        let evaluation = Evaluation {
            strictness: Strictness::default(),
            templates: &registry,
        };
        let criterion = FunctionCriterion::new()
            .with_name("get")
            .with_param_count(2usize)
            .with_return_type(TypeDescriptor::class("int"));

        assert_eq!(criterion.clauses(&member, &evaluation).unwrap(), vec![false, true, false]);
        assert!(FunctionCriterion::new().clauses(&member, &evaluation).unwrap().is_empty());
    }

    #[test]
    fn modifier_records_land_in_templates() {
        let member = put().with_modifiers(Modifiers::PUBLIC | Modifiers::FINAL);
        let criterion = FunctionCriterion::new().with_modifiers(|m| m.is_public() && m.is_static());
        let registry = TemplateRegistry::new();
        let evaluation = Evaluation {
            strictness: Strictness::default(),
            templates: &registry,
        };

        assert!(!criterion.matches(&member, &evaluation).unwrap());
        assert_eq!(
            criterion.templates(&registry),
            vec!["modifiers:[<isPublic> (true), <isStatic> (false)]".to_string()]
        );
    }

    #[test]
    fn validation_rejects_nonsense() {
        let all_vague = FunctionCriterion::new().with_param_types(vec![TypeDescriptor::Vague; 2]);
        let too_few = FunctionCriterion::new()
            .with_param_count(1usize)
            .with_param_types(vec![TypeDescriptor::class("int"), TypeDescriptor::class("int")]);
        let unresolved = PropertyCriterion::new().with_type(TypeDescriptor::Unresolved("x.Y".to_string()));
        let blank = FunctionCriterion::new().with_name(" ");

        for result in [all_vague.validate(), too_few.validate(), unresolved.validate(), blank.validate()] {
            assert!(matches!(result, Err(Error::InvalidRuleConfiguration(_))));
        }
        assert!(FunctionCriterion::new().with_param_count(2usize).with_param_types(vec![TypeDescriptor::class("int")]).validate().is_ok());
    }

    #[test]
    fn templates_render_every_active_field() {
        let criterion = FunctionCriterion::new()
            .with_name("put")
            .with_param_count(2usize)
            .with_param_types(vec![TypeDescriptor::class("java.lang.String"), TypeDescriptor::Vague])
            .with_match_index(PositionRule::last());

        assert_eq!(
            criterion.templates(&TemplateRegistry::new()),
            vec![
                "name:[put]".to_string(),
                "paramCount:[2]".to_string(),
                "paramTypes:[(java.lang.String, Vague)]".to_string(),
                "matchIndex:[index: -1, strict: true]".to_string(),
            ]
        );
    }

    #[test]
    fn fingerprints_skip_closures() {
        let plain = FunctionCriterion::new().with_name("f");
        assert!(plain.fingerprint().is_some());
        assert_ne!(plain.fingerprint(), plain.clone().find_in_super().fingerprint());
        assert!(FunctionCriterion::new().matching_name(|_| true).fingerprint().is_none());
    }

    #[test]
    fn accessor_names() {
        let getter = FunctionCriterion::new().with_name("<get-count>");
        assert_eq!(getter.accessor_target(), Some((AccessorKind::Getter, "count")));
        let setter = FunctionCriterion::new().with_name("<set-count>");
        assert_eq!(setter.accessor_target(), Some((AccessorKind::Setter, "count")));
        assert_eq!(FunctionCriterion::new().with_name("count").accessor_target(), None);
    }

    #[test]
    fn property_type_comparison() {
        let member = MemberInfo::property("a.B", "items", TypeDescriptor::parameterized(
            "java.util.List",
            vec![crate::typesystem::TypeProjection::Star],
        ));
        assert!(evaluate(&PropertyCriterion::new().with_type(TypeDescriptor::class("java.util.List")), &member));
        assert!(!evaluate(&PropertyCriterion::new().with_name("item"), &member));
    }
}
