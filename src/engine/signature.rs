//! Criteria evaluated against compiler metadata instead of reflection.
//!
//! Each `(name, descriptor)` pair becomes a candidate whose parameter and return types are
//! the raw classes named by the descriptor. No class is loaded while matching; loading only
//! happens when a returned support is asked for classes or members. Metadata carries no
//! modifiers, so a criterion with a modifier predicate never matches here.

use tracing::warn;

use crate::{
    engine::{select::select, MatchEngine, Resolved},
    host::{ClassRc, ModifierRules, ParameterInfo},
    rules::{
        Evaluation, FunctionCriterion, MemberCriterion, MemberView, PropertyCriterion,
        TemplateRegistry,
    },
    signatures::{
        DescriptorParser, DescriptorType, FunctionSignature, MetadataSource, PropertySignature,
        PropertySignatureData, SignatureData, SignatureScope,
    },
    typesystem::TypeDescriptor,
    Error, Result,
};

struct SignatureCandidate {
    name: String,
    parameters: Vec<ParameterInfo>,
    return_type: TypeDescriptor,
}

impl MemberView for SignatureCandidate {
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
        None
    }
}

fn raw_type(ty: &DescriptorType) -> TypeDescriptor {
    TypeDescriptor::ClassRef(ty.class_name())
}

fn function_candidate(data: &SignatureData) -> Option<SignatureCandidate> {
    match DescriptorParser::new(&data.descriptor).parse_method_descriptor() {
        Ok(method) => Some(SignatureCandidate {
            name: data.name.clone(),
            parameters: method
                .params
                .iter()
                .map(|param| ParameterInfo {
                    name: None,
                    ty: raw_type(param),
                })
                .collect(),
            return_type: raw_type(&method.return_type),
        }),
        Err(err) => {
            warn!(name = %data.name, descriptor = %data.descriptor, error = %err, "skipping malformed function signature");
            None
        }
    }
}

fn property_candidate(data: &PropertySignatureData) -> Option<SignatureCandidate> {
    let method = |signature: &Option<SignatureData>| {
        signature
            .as_ref()
            .and_then(|signature| DescriptorParser::new(&signature.descriptor).parse_method_descriptor().ok())
    };

    let ty = data
        .field
        .as_ref()
        .and_then(|field| DescriptorParser::new(&field.descriptor).parse_field_descriptor().ok())
        .or_else(|| method(&data.getter).map(|getter| getter.return_type))
        .or_else(|| method(&data.setter).and_then(|setter| setter.params.into_iter().next()));

    match ty {
        Some(ty) => Some(SignatureCandidate {
            name: data.name.clone(),
            parameters: Vec::new(),
            return_type: raw_type(&ty),
        }),
        None => {
            warn!(name = %data.name, "skipping property signature without a decodable type");
            None
        }
    }
}

impl MatchEngine {
    fn metadata(&self) -> Result<&dyn MetadataSource> {
        self.metadata
            .as_deref()
            .ok_or_else(|| Error::SignatureMissing("no compiler metadata source is configured".to_string()))
    }

    fn signature_scope(&self, class: &ClassRc) -> SignatureScope {
        SignatureScope::new(class.clone(), self.host.clone(), self.loader.clone())
    }

    /// Selects among `entries` of one class, keeping each entry next to its candidate view.
    fn select_entries<C: MemberCriterion, E: Clone>(
        criterion: &C,
        entries: Vec<(E, SignatureCandidate)>,
        evaluation: &Evaluation<'_>,
    ) -> Result<Vec<E>> {
        let views: Vec<&dyn MemberView> = entries
            .iter()
            .map(|(_, candidate)| candidate as &dyn MemberView)
            .collect();
        let selected = select(criterion, &views, evaluation)?;
        Ok(selected
            .into_iter()
            .map(|index| entries[index].0.clone())
            .collect())
    }

    /// Finds the function signatures of `class` selected by `criterion`.
    ///
    /// # Errors
    /// Returns [`Error::SignatureMissing`] without a metadata source,
    /// [`Error::InvalidRuleConfiguration`] for an invalid criterion and
    /// [`Error::MemberNotFound`] if nothing is selected.
    pub fn find_function_signatures(
        &self,
        class: &ClassRc,
        criterion: &FunctionCriterion,
    ) -> Result<Resolved<FunctionSignature>> {
        criterion.validate()?;
        let metadata = self.metadata()?;
        let registry = TemplateRegistry::new();
        let evaluation = Evaluation {
            strictness: self.config.strictness,
            templates: &registry,
        };

        let found = self.walk_hierarchy(class, criterion.rules.find_in_super, |current| {
            let entries = metadata
                .function_signatures(current)?
                .into_iter()
                .filter_map(|data| function_candidate(&data).map(|candidate| (data, candidate)))
                .collect();
            let scope = self.signature_scope(current);
            Ok(Resolved::new(
                Self::select_entries(criterion, entries, &evaluation)?
                    .into_iter()
                    .map(|data| FunctionSignature::new(scope.clone(), data))
                    .collect(),
            ))
        })?;

        found.ok_or_else(|| Error::MemberNotFound {
            kind: FunctionCriterion::KIND,
            class: class.name.clone(),
            templates: criterion.templates(&registry),
        })
    }

    /// Finds the property signatures of `class` selected by `criterion`.
    ///
    /// A property is matched by its source name and the type of its field, getter or
    /// setter, whichever is present first.
    ///
    /// # Errors
    /// Returns [`Error::SignatureMissing`] without a metadata source,
    /// [`Error::InvalidRuleConfiguration`] for an invalid criterion and
    /// [`Error::MemberNotFound`] if nothing is selected.
    pub fn find_property_signatures(
        &self,
        class: &ClassRc,
        criterion: &PropertyCriterion,
    ) -> Result<Resolved<PropertySignature>> {
        criterion.validate()?;
        let metadata = self.metadata()?;
        let registry = TemplateRegistry::new();
        let evaluation = Evaluation {
            strictness: self.config.strictness,
            templates: &registry,
        };

        let found = self.walk_hierarchy(class, criterion.rules.find_in_super, |current| {
            let entries = metadata
                .property_signatures(current)?
                .into_iter()
                .filter_map(|data| property_candidate(&data).map(|candidate| (data, candidate)))
                .collect();
            let scope = self.signature_scope(current);
            Ok(Resolved::new(
                Self::select_entries(criterion, entries, &evaluation)?
                    .into_iter()
                    .map(|data| PropertySignature::new(&scope, data))
                    .collect(),
            ))
        })?;

        found.ok_or_else(|| Error::MemberNotFound {
            kind: PropertyCriterion::KIND,
            class: class.name.clone(),
            templates: criterion.templates(&registry),
        })
    }
}
