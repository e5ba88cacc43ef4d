//! Lazily resolving views over compiler-emitted signatures.
//!
//! A support pairs a [`SignatureData`] with the class declaring it and the capabilities needed
//! to turn its descriptor into loaded classes and a runtime member handle. Every derived value
//! is available through a throwing accessor and an `_opt` variant that logs the failure and
//! returns `None` instead.

use std::sync::{Arc, OnceLock};

use tracing::{debug, warn};

use crate::{
    cache::{CachedLoader, SignatureKey},
    host::{ClassRc, HostReflection, MemberRc, MemberSource},
    signatures::{
        split_method_descriptor, DescriptorParser, DescriptorType, MethodDescriptor,
        PropertySignatureData, SignatureData,
    },
    typesystem::TypeDescriptor,
    Error, MemberKind, Result,
};

/// The declaring class of a signature together with the capabilities that resolve it.
#[derive(Clone)]
pub struct SignatureScope {
    declaring: ClassRc,
    host: Arc<dyn HostReflection>,
    loader: CachedLoader,
}

impl SignatureScope {
    /// Resolves signatures declared by `declaring`.
    #[must_use]
    pub fn new(declaring: ClassRc, host: Arc<dyn HostReflection>, loader: CachedLoader) -> Self {
        SignatureScope {
            declaring,
            host,
            loader,
        }
    }

    /// The declaring class.
    #[must_use]
    pub fn declaring(&self) -> &ClassRc {
        &self.declaring
    }

    fn load(&self, ty: &DescriptorType) -> Result<ClassRc> {
        self.loader
            .load(&ty.class_name())
            .map_err(|err| Error::UnresolvedDescriptorType {
                descriptor: ty.to_string(),
                reason: err.to_string(),
            })
    }

    fn resolve_member(
        &self,
        kind: MemberKind,
        data: &SignatureData,
        find: impl FnOnce() -> Result<Option<MemberRc>>,
    ) -> Result<MemberRc> {
        let key = SignatureKey {
            class: self.declaring.name.clone(),
            context: self.loader.context(),
            host: self.host.host_id(),
            name: data.name.clone(),
            descriptor: data.descriptor.clone(),
        };
        if let Some(member) = self.loader.cache().signature_member(&key) {
            return Ok(member);
        }

        match find()? {
            Some(member) => Ok(self.loader.cache().store_signature_member(key, member)),
            None => Err(Error::MemberNotFound {
                kind,
                class: self.declaring.name.clone(),
                templates: vec![
                    format!("name:[{}]", data.name),
                    format!("descriptor:[{}]", data.descriptor),
                ],
            }),
        }
    }
}

fn memoized<T: Clone>(cell: &OnceLock<T>, compute: impl FnOnce() -> Result<T>) -> Result<T> {
    if let Some(value) = cell.get() {
        return Ok(value.clone());
    }
    let value = compute()?;
    Ok(cell.get_or_init(move || value).clone())
}

fn optional<T>(what: &str, data: &SignatureData, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err @ Error::UnresolvedDescriptorType { .. }) => {
            warn!(name = %data.name, descriptor = %data.descriptor, error = %err, "{what} is unresolvable");
            None
        }
        Err(err) => {
            debug!(name = %data.name, descriptor = %data.descriptor, error = %err, "{what} is unavailable");
            None
        }
    }
}

/// A function signature: `(name, "(params)return")`.
pub struct FunctionSignature {
    scope: SignatureScope,
    data: SignatureData,
    param_classes: OnceLock<Vec<ClassRc>>,
    return_class: OnceLock<ClassRc>,
    member: OnceLock<MemberRc>,
}

impl FunctionSignature {
    /// Wraps `data`, declared by the scope's class.
    #[must_use]
    pub fn new(scope: SignatureScope, data: SignatureData) -> Self {
        FunctionSignature {
            scope,
            data,
            param_classes: OnceLock::new(),
            return_class: OnceLock::new(),
            member: OnceLock::new(),
        }
    }

    /// JVM name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.data.name
    }

    /// Raw method descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &str {
        &self.data.descriptor
    }

    /// The underlying signature pair.
    #[must_use]
    pub fn data(&self) -> &SignatureData {
        &self.data
    }

    /// The declaring class.
    #[must_use]
    pub fn declaring_class(&self) -> &ClassRc {
        &self.scope.declaring
    }

    /// Returns `true` for `<init>`.
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.data.name == "<init>"
    }

    /// Returns `true` if this looks like a real method signature: the name is not the
    /// declaring class name and the descriptor starts with `(`.
    #[must_use]
    pub fn has_signature(&self) -> bool {
        self.scope.declaring.name != self.data.name && self.data.descriptor.starts_with('(')
    }

    /// The decoded descriptor.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if the descriptor is syntactically broken.
    pub fn method_descriptor(&self) -> Result<MethodDescriptor> {
        DescriptorParser::new(&self.data.descriptor).parse_method_descriptor()
    }

    /// The descriptor of every parameter, in order (`["I", "Ljava/lang/String;"]`).
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if the descriptor is syntactically broken.
    pub fn param_descriptors(&self) -> Result<Vec<String>> {
        Ok(self
            .method_descriptor()?
            .params
            .iter()
            .map(ToString::to_string)
            .collect())
    }

    /// The raw return descriptor substring.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if the descriptor has no parameter list.
    pub fn return_descriptor(&self) -> Result<&str> {
        split_method_descriptor(&self.data.descriptor).map(|(_, ret)| ret)
    }

    /// Loads every parameter class.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] for broken descriptors and
    /// [`Error::UnresolvedDescriptorType`] for classes the context cannot load.
    pub fn param_classes(&self) -> Result<Vec<ClassRc>> {
        memoized(&self.param_classes, || {
            self.method_descriptor()?
                .params
                .iter()
                .map(|param| self.scope.load(param))
                .collect()
        })
    }

    /// [`FunctionSignature::param_classes`], `None` on failure.
    #[must_use]
    pub fn param_classes_opt(&self) -> Option<Vec<ClassRc>> {
        optional("parameter classes", &self.data, self.param_classes())
    }

    /// Loads the return class.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] for broken descriptors and
    /// [`Error::UnresolvedDescriptorType`] for classes the context cannot load.
    pub fn return_class(&self) -> Result<ClassRc> {
        memoized(&self.return_class, || {
            self.scope.load(&self.method_descriptor()?.return_type)
        })
    }

    /// [`FunctionSignature::return_class`], `None` on failure.
    #[must_use]
    pub fn return_class_opt(&self) -> Option<ClassRc> {
        optional("return class", &self.data, self.return_class())
    }

    /// The runtime member this signature denotes, looked up by name and erased parameter classes.
    ///
    /// # Errors
    /// Returns [`Error::MemberNotFound`] if the declaring class has no such member, or any
    /// error of [`FunctionSignature::param_classes`].
    pub fn member(&self) -> Result<MemberRc> {
        memoized(&self.member, || {
            let erased: Vec<String> = self
                .param_classes()?
                .iter()
                .map(|class| class.name.clone())
                .collect();
            let declaring = &self.scope.declaring;

            if self.is_constructor() {
                self.scope.resolve_member(MemberKind::Constructor, &self.data, || {
                    Ok(self
                        .scope
                        .host
                        .declared_members(declaring, MemberKind::Constructor, MemberSource::Raw)?
                        .into_iter()
                        .find(|member| member.erased_param_names() == erased))
                })
            } else {
                self.scope.resolve_member(MemberKind::Function, &self.data, || {
                    self.scope
                        .host
                        .find_function(declaring, &self.data.name, &erased)
                })
            }
        })
    }

    /// [`FunctionSignature::member`], `None` on failure.
    #[must_use]
    pub fn member_opt(&self) -> Option<MemberRc> {
        optional("member", &self.data, self.member())
    }

    /// Parameter types, generic if the member resolves, the loaded classes otherwise.
    ///
    /// # Errors
    /// Returns the error of [`FunctionSignature::param_classes`] if neither form is available.
    pub fn param_types(&self) -> Result<Vec<TypeDescriptor>> {
        if let Some(member) = self.member_opt() {
            return Ok(member.param_types());
        }
        Ok(self
            .param_classes()?
            .iter()
            .map(|class| class.descriptor())
            .collect())
    }

    /// [`FunctionSignature::param_types`], `None` on failure.
    #[must_use]
    pub fn param_types_opt(&self) -> Option<Vec<TypeDescriptor>> {
        optional("parameter types", &self.data, self.param_types())
    }

    /// Return type, generic if the member resolves, the loaded class otherwise.
    ///
    /// # Errors
    /// Returns the error of [`FunctionSignature::return_class`] if neither form is available.
    pub fn return_type(&self) -> Result<TypeDescriptor> {
        if let Some(member) = self.member_opt() {
            return Ok(member.return_type.clone());
        }
        Ok(self.return_class()?.descriptor())
    }

    /// [`FunctionSignature::return_type`], `None` on failure.
    #[must_use]
    pub fn return_type_opt(&self) -> Option<TypeDescriptor> {
        optional("return type", &self.data, self.return_type())
    }
}

/// A field signature: `(name, "Ljava/lang/String;")`.
pub struct FieldSignature {
    scope: SignatureScope,
    data: SignatureData,
    class: OnceLock<ClassRc>,
    member: OnceLock<MemberRc>,
}

impl FieldSignature {
    /// Wraps `data`, declared by the scope's class.
    #[must_use]
    pub fn new(scope: SignatureScope, data: SignatureData) -> Self {
        FieldSignature {
            scope,
            data,
            class: OnceLock::new(),
            member: OnceLock::new(),
        }
    }

    /// JVM name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.data.name
    }

    /// Raw field descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &str {
        &self.data.descriptor
    }

    /// Returns `true` if the descriptor is a syntactically valid field descriptor.
    #[must_use]
    pub fn has_signature(&self) -> bool {
        self.field_descriptor().is_ok()
    }

    /// The decoded descriptor.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if the descriptor is syntactically broken.
    pub fn field_descriptor(&self) -> Result<DescriptorType> {
        DescriptorParser::new(&self.data.descriptor).parse_field_descriptor()
    }

    /// Loads the field's class.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] for broken descriptors and
    /// [`Error::UnresolvedDescriptorType`] for classes the context cannot load.
    pub fn type_class(&self) -> Result<ClassRc> {
        memoized(&self.class, || self.scope.load(&self.field_descriptor()?))
    }

    /// [`FieldSignature::type_class`], `None` on failure.
    #[must_use]
    pub fn type_class_opt(&self) -> Option<ClassRc> {
        optional("field class", &self.data, self.type_class())
    }

    /// The runtime field this signature denotes.
    ///
    /// # Errors
    /// Returns [`Error::MemberNotFound`] if the declaring class has no such field.
    pub fn member(&self) -> Result<MemberRc> {
        memoized(&self.member, || {
            self.scope.resolve_member(MemberKind::Property, &self.data, || {
                self.scope
                    .host
                    .find_field(&self.scope.declaring, &self.data.name)
            })
        })
    }

    /// [`FieldSignature::member`], `None` on failure.
    #[must_use]
    pub fn member_opt(&self) -> Option<MemberRc> {
        optional("field", &self.data, self.member())
    }

    /// Field type, generic if the field resolves, the loaded class otherwise.
    ///
    /// # Errors
    /// Returns the error of [`FieldSignature::type_class`] if neither form is available.
    pub fn ty(&self) -> Result<TypeDescriptor> {
        if let Some(member) = self.member_opt() {
            return Ok(member.return_type.clone());
        }
        Ok(self.type_class()?.descriptor())
    }

    /// [`FieldSignature::ty`], `None` on failure.
    #[must_use]
    pub fn ty_opt(&self) -> Option<TypeDescriptor> {
        optional("field type", &self.data, self.ty())
    }
}

/// A property signature composed of up to five independently optional sub-signatures.
///
/// The effective member and type come from the backing field, else the getter, else the
/// first parameter of the setter.
pub struct PropertySignature {
    name: String,
    field: Option<FieldSignature>,
    getter: Option<FunctionSignature>,
    setter: Option<FunctionSignature>,
    delegate: Option<FunctionSignature>,
    synthetic: Option<FunctionSignature>,
}

impl PropertySignature {
    /// Splits `data` into its sub-signatures, all declared by the scope's class.
    #[must_use]
    pub fn new(scope: &SignatureScope, data: PropertySignatureData) -> Self {
        let function = |data: Option<SignatureData>| {
            data.map(|data| FunctionSignature::new(scope.clone(), data))
        };
        PropertySignature {
            name: data.name,
            field: data.field.map(|data| FieldSignature::new(scope.clone(), data)),
            getter: function(data.getter),
            setter: function(data.setter),
            delegate: function(data.delegate),
            synthetic: function(data.synthetic),
        }
    }

    /// Source name of the property.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Backing field.
    #[must_use]
    pub fn field(&self) -> Option<&FieldSignature> {
        self.field.as_ref()
    }

    /// Getter.
    #[must_use]
    pub fn getter(&self) -> Option<&FunctionSignature> {
        self.getter.as_ref()
    }

    /// Setter.
    #[must_use]
    pub fn setter(&self) -> Option<&FunctionSignature> {
        self.setter.as_ref()
    }

    /// Method returning the delegate instance.
    #[must_use]
    pub fn delegate(&self) -> Option<&FunctionSignature> {
        self.delegate.as_ref()
    }

    /// Synthetic annotations method.
    #[must_use]
    pub fn synthetic(&self) -> Option<&FunctionSignature> {
        self.synthetic.as_ref()
    }

    /// Returns `true` if at least one present sub-signature is valid.
    #[must_use]
    pub fn has_signature(&self) -> bool {
        self.field.as_ref().is_some_and(FieldSignature::has_signature)
            || [&self.getter, &self.setter, &self.delegate, &self.synthetic]
                .into_iter()
                .flatten()
                .any(FunctionSignature::has_signature)
    }

    /// The field, getter or setter member, in that order of preference.
    ///
    /// # Errors
    /// Returns [`Error::SignatureMissing`] if none of them resolves.
    pub fn member(&self) -> Result<MemberRc> {
        self.field
            .as_ref()
            .and_then(FieldSignature::member_opt)
            .or_else(|| self.getter.as_ref().and_then(FunctionSignature::member_opt))
            .or_else(|| self.setter.as_ref().and_then(FunctionSignature::member_opt))
            .ok_or_else(|| Error::SignatureMissing(format!("no member for property {}", self.name)))
    }

    /// [`PropertySignature::member`], `None` on failure.
    #[must_use]
    pub fn member_opt(&self) -> Option<MemberRc> {
        self.member().ok()
    }

    /// The field type, getter return type or setter parameter type, in that order.
    ///
    /// # Errors
    /// Returns [`Error::SignatureMissing`] if none of them is available.
    pub fn return_type(&self) -> Result<TypeDescriptor> {
        self.field
            .as_ref()
            .and_then(FieldSignature::ty_opt)
            .or_else(|| self.getter.as_ref().and_then(FunctionSignature::return_type_opt))
            .or_else(|| {
                self.setter
                    .as_ref()
                    .and_then(FunctionSignature::param_types_opt)
                    .and_then(|types| types.into_iter().next())
            })
            .ok_or_else(|| Error::SignatureMissing(format!("no type for property {}", self.name)))
    }

    /// [`PropertySignature::return_type`], `None` on failure.
    #[must_use]
    pub fn return_type_opt(&self) -> Option<TypeDescriptor> {
        self.return_type().ok()
    }

    /// The loaded class of the field, getter return or setter parameter, in that order.
    ///
    /// # Errors
    /// Returns [`Error::SignatureMissing`] if none of them loads.
    pub fn return_class(&self) -> Result<ClassRc> {
        self.field
            .as_ref()
            .and_then(FieldSignature::type_class_opt)
            .or_else(|| self.getter.as_ref().and_then(FunctionSignature::return_class_opt))
            .or_else(|| {
                self.setter
                    .as_ref()
                    .and_then(FunctionSignature::param_classes_opt)
                    .and_then(|classes| classes.into_iter().next())
            })
            .ok_or_else(|| Error::SignatureMissing(format!("no class for property {}", self.name)))
    }

    /// [`PropertySignature::return_class`], `None` on failure.
    #[must_use]
    pub fn return_class_opt(&self) -> Option<ClassRc> {
        self.return_class().ok()
    }
}
