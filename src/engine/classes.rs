//! Class queries.

use tracing::trace;

use crate::{
    engine::{MatchEngine, Resolved},
    host::{ClassInfo, ClassRc, ModifierRules},
    rules::{
        CallableCriterion, ClassCriterion, Evaluation, MemberCriterion, NestedRule, NestedTarget,
        TemplateRegistry,
    },
    Error, MemberKind, Result,
};

impl MatchEngine {
    /// Finds the classes selected by `criterion` among every class the host enumerates.
    ///
    /// # Errors
    /// Returns [`Error::InvalidRuleConfiguration`] for an invalid criterion and
    /// [`Error::ClassNotFound`] if no class is selected.
    pub fn find_classes(&self, criterion: &ClassCriterion) -> Result<Resolved<ClassRc>> {
        let candidates = self.host.classes()?;
        self.find_classes_in(&candidates, criterion)
    }

    /// Finds the classes selected by `criterion` among `candidates`, in candidate order.
    ///
    /// An inactive criterion selects the first candidate.
    ///
    /// # Errors
    /// Returns [`Error::InvalidRuleConfiguration`] for an invalid criterion and
    /// [`Error::ClassNotFound`] if no class is selected.
    pub fn find_classes_in(
        &self,
        candidates: &[ClassRc],
        criterion: &ClassCriterion,
    ) -> Result<Resolved<ClassRc>> {
        criterion.validate()?;
        let registry = TemplateRegistry::new();

        let found = if criterion.is_active() {
            trace!(candidates = candidates.len(), "resolving classes");
            let mut found = Vec::new();
            for class in candidates {
                if criterion.in_scope(class)
                    && criterion.matches_class(class, &registry)
                    && self.nested_rules_hold(class, &criterion.nested, &registry)?
                {
                    found.push(class.clone());
                }
            }
            found
        } else {
            candidates.iter().take(1).cloned().collect()
        };

        Resolved::new(found).ok_or_else(|| Error::ClassNotFound {
            scope: if criterion.packages.is_empty() {
                format!("{} candidates", candidates.len())
            } else {
                let packages: Vec<String> =
                    criterion.packages.iter().map(ToString::to_string).collect();
                packages.join(", ")
            },
            templates: criterion.templates(&registry),
        })
    }

    fn nested_rules_hold(
        &self,
        class: &ClassInfo,
        rules: &[NestedRule],
        registry: &TemplateRegistry,
    ) -> Result<bool> {
        for rule in rules {
            let found = match &rule.target {
                NestedTarget::Callable(criterion) => self.count_callables(class, criterion, registry)?,
                NestedTarget::Property(criterion) => self.count_matching(class, criterion, registry)?,
                NestedTarget::Function(criterion) => self.count_matching(class, criterion, registry)?,
                NestedTarget::Constructor(criterion) => self.count_matching(class, criterion, registry)?,
            };
            if !rule.count_holds(found) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn count_callables(
        &self,
        class: &ClassInfo,
        criterion: &CallableCriterion,
        registry: &TemplateRegistry,
    ) -> Result<usize> {
        let mut found = 0;
        for kind in [MemberKind::Property, MemberKind::Function, MemberKind::Constructor] {
            for member in self.candidates(class, kind)? {
                let accepted = match &criterion.modifiers {
                    Some(predicate) => {
                        let view: ModifierRules = member.modifier_rules();
                        let accepted = predicate(&view);
                        registry.record(criterion.id, view.into_records());
                        accepted
                    }
                    None => true,
                };
                found += usize::from(accepted);
            }
        }
        Ok(found)
    }

    /// Members of `class` structurally matching `criterion`, before positional selection.
    /// An inactive criterion counts every member of its kind.
    fn count_matching<C: MemberCriterion>(
        &self,
        class: &ClassInfo,
        criterion: &C,
        registry: &TemplateRegistry,
    ) -> Result<usize> {
        let members = self.candidates(class, C::KIND)?;
        if !criterion.is_active() {
            return Ok(members.len());
        }

        let evaluation = Evaluation {
            strictness: self.config.strictness,
            templates: registry,
        };
        let mut found = 0;
        for member in &members {
            found += usize::from(criterion.matches(member.as_ref(), &evaluation)?);
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        rules::{CountRule, FunctionCriterion, NameMatch, PropertyCriterion},
        test::engine,
        typesystem::TypeDescriptor,
    };

    fn names(resolved: &Resolved<ClassRc>) -> Vec<&str> {
        resolved.iter().map(|class| class.name.as_str()).collect()
    }

    #[test]
    fn inactive_criterion_yields_first_candidate() {
        let engine = engine();
        let found = engine.find_classes(&ClassCriterion::new()).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn package_and_names() {
        let engine = engine();

        let derived = engine
            .find_classes(
                &ClassCriterion::new()
                    .from_package("com.example", true)
                    .extending(&["com.example.Base"]),
            )
            .unwrap();
        assert_eq!(names(&derived), vec!["com.example.Derived"]);

        let either = engine
            .find_classes(
                &ClassCriterion::new()
                    .with_simple_name(NameMatch::optional("Base"))
                    .with_single_name(NameMatch::optional("Derived")),
            )
            .unwrap();
        assert_eq!(names(&either), vec!["com.example.Base", "com.example.Derived"]);

        let anonymous = engine
            .find_classes(&ClassCriterion::new().anonymous().enclosed_by(&["com.example.Base"]))
            .unwrap();
        assert_eq!(names(&anonymous), vec!["com.example.Base$1"]);
    }

    #[test]
    fn nested_rules_count_matches() {
        let engine = engine();
        let three_fs = ClassCriterion::new().with_member(
            NestedTarget::Function(FunctionCriterion::new().with_name("f")),
            Some(CountRule::Exact(3)),
        );
        assert_eq!(names(&engine.find_classes(&three_fs).unwrap()), vec!["com.example.Base"]);

        let int_property = ClassCriterion::new().with_member(
            NestedTarget::Property(PropertyCriterion::new().with_type(TypeDescriptor::class("int"))),
            None,
        );
        assert_eq!(names(&engine.find_classes(&int_property).unwrap()), vec!["com.example.Base"]);

        let without_functions = ClassCriterion::new()
            .from_package("com.example", true)
            .with_member(NestedTarget::Function(FunctionCriterion::new()), Some(CountRule::Exact(0)));
        assert_eq!(names(&engine.find_classes(&without_functions).unwrap()), vec!["com.example.Base$1"]);
    }

    #[test]
    fn not_found_lists_the_scope_and_rules() {
        let engine = engine();
        let err = engine
            .find_classes(
                &ClassCriterion::new()
                    .from_package("org.other", false)
                    .without_interfaces(),
            )
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Can't find this class in [org.other]:\n -> fromPackages:[org.other]\n -> isNoImplementsClass:[true]"
        );
    }

    #[test]
    fn callable_rules_record_modifiers() {
        let engine = engine();
        let criterion = ClassCriterion::new().with_member(
            NestedTarget::Callable(CallableCriterion::new().with_modifiers(|m| m.is_native())),
            None,
        );
        let err = engine.find_classes(&criterion).unwrap_err();
        assert!(err.to_string().contains("callableRules:[modifiers:[<isNative> (false)]]"));
    }
}
