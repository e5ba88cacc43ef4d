//! Property, function and constructor queries.

use tracing::{debug, trace};

use crate::{
    cache::QueryKey,
    engine::{select::select, MatchEngine, Resolved},
    host::{ClassInfo, ClassRc, MemberRc, MemberSource},
    rules::{
        AccessorKind, ConstructorCriterion, Evaluation, FunctionCriterion, MemberCriterion,
        MemberView, PropertyCriterion, TemplateRegistry,
    },
    Error, MemberKind, Result,
};

impl MatchEngine {
    /// Finds the properties of `class` selected by `criterion`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidRuleConfiguration`] for an invalid criterion and
    /// [`Error::MemberNotFound`] if nothing is selected in `class` or, with `find_in_super`,
    /// any of its superclasses.
    pub fn find_properties(
        &self,
        class: &ClassRc,
        criterion: &PropertyCriterion,
    ) -> Result<Resolved<MemberRc>> {
        self.resolve(class, criterion, criterion, |class| {
            self.candidates(class, MemberKind::Property)
        })
    }

    /// Finds the functions of `class` selected by `criterion`.
    ///
    /// With [`MemberSource::Declared`], a name of the form `<get-x>` or `<set-x>` selects the
    /// getter or setter of the declared property `x`; the remaining fields are evaluated
    /// against that accessor.
    ///
    /// # Errors
    /// Returns [`Error::InvalidRuleConfiguration`] for an invalid criterion and
    /// [`Error::MemberNotFound`] if nothing is selected.
    pub fn find_functions(
        &self,
        class: &ClassRc,
        criterion: &FunctionCriterion,
    ) -> Result<Resolved<MemberRc>> {
        if self.config.member_source == MemberSource::Declared {
            if let Some((accessor, property)) = criterion.accessor_target() {
                let routed = FunctionCriterion {
                    name: None,
                    ..criterion.clone()
                };
                return self.resolve(class, criterion, &routed, |class| {
                    self.accessors(class, accessor, property)
                });
            }
        }
        self.resolve(class, criterion, criterion, |class| {
            self.candidates(class, MemberKind::Function)
        })
    }

    /// Finds the constructors of `class` selected by `criterion`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidRuleConfiguration`] for an invalid criterion and
    /// [`Error::MemberNotFound`] if nothing is selected.
    pub fn find_constructors(
        &self,
        class: &ClassRc,
        criterion: &ConstructorCriterion,
    ) -> Result<Resolved<MemberRc>> {
        self.resolve(class, criterion, criterion, |class| {
            self.candidates(class, MemberKind::Constructor)
        })
    }

    /// Candidate members of `kind`, in the order the configured source reports them.
    ///
    /// # Errors
    /// Propagates host failures.
    pub(crate) fn candidates(&self, class: &ClassInfo, kind: MemberKind) -> Result<Vec<MemberRc>> {
        let source = self.config.member_source;
        let mut members = match source {
            MemberSource::Declared => self.host.top_level_members(class, kind)?,
            MemberSource::Raw => Vec::new(),
        };
        members.extend(self.host.declared_members(class, kind, source)?);
        Ok(members)
    }

    fn accessors(
        &self,
        class: &ClassInfo,
        accessor: AccessorKind,
        property: &str,
    ) -> Result<Vec<MemberRc>> {
        Ok(self
            .candidates(class, MemberKind::Property)?
            .into_iter()
            .filter(|member| member.name == property)
            .filter_map(|member| match accessor {
                AccessorKind::Getter => member.getter.clone(),
                AccessorKind::Setter => member.setter.clone(),
            })
            .collect())
    }

    fn query_key<C: MemberCriterion>(&self, class: &ClassInfo, criterion: &C) -> Option<QueryKey> {
        if !self.config.cache_queries {
            return None;
        }
        let fingerprint = criterion.fingerprint()?;
        Some(QueryKey {
            class: class.name.clone(),
            context: self.loader.context(),
            host: self.host.host_id(),
            kind: C::KIND,
            fingerprint: format!(
                "{fingerprint}\nsource:[{}]\nstrictness:[{:?}]",
                self.config.member_source, self.config.strictness
            ),
        })
    }

    /// Runs `matching` over the candidates `enumerate` yields for `class` and its
    /// superclasses. `reported` is what keys the cache and renders the diagnostics.
    fn resolve<C: MemberCriterion>(
        &self,
        class: &ClassRc,
        reported: &C,
        matching: &C,
        enumerate: impl Fn(&ClassInfo) -> Result<Vec<MemberRc>>,
    ) -> Result<Resolved<MemberRc>> {
        reported.validate()?;
        matching.validate()?;

        let key = self.query_key(class, reported);
        if let Some(key) = &key {
            if let Some(hit) = self.cache().query(key).and_then(|hit| Resolved::new(hit.to_vec())) {
                debug!(class = %class.name, kind = %C::KIND, "query answered from cache");
                return Ok(hit);
            }
        }

        trace!(class = %class.name, kind = %C::KIND, "resolving members");
        let registry = TemplateRegistry::new();
        let evaluation = Evaluation {
            strictness: self.config.strictness,
            templates: &registry,
        };

        let found = self.walk_hierarchy(class, matching.rules().find_in_super, |current| {
            let members = enumerate(current)?;
            let views: Vec<&dyn MemberView> = members
                .iter()
                .map(|member| member.as_ref() as &dyn MemberView)
                .collect();
            let selected = select(matching, &views, &evaluation)?;
            Ok(Resolved::new(
                selected
                    .into_iter()
                    .map(|index| members[index].clone())
                    .collect(),
            ))
        })?;

        let Some(found) = found else {
            return Err(Error::MemberNotFound {
                kind: C::KIND,
                class: class.name.clone(),
                templates: reported.templates(&registry),
            });
        };
        if let Some(key) = key {
            self.cache().store_query(key, found.all().to_vec());
        }
        Ok(found)
    }
}
