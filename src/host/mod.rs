//! Capabilities the engine consumes from the host runtime.
//!
//! The engine never reflects on anything itself. It asks a [`HostReflection`] for the members
//! declared by a class and a [`ClassLoadingContext`] for types by name. Both are traits so any
//! runtime (a live VM bridge, a class-file reader, a test fixture) can back them.
//!
//! # Key Components
//!
//! - [`ClassInfo`] / [`MemberInfo`]: What the host reports about classes and members
//! - [`HostReflection`]: Member enumeration, raw or at the language-declared level
//! - [`ClassLoadingContext`]: Name to type resolution, distinguishing missing from malformed
//! - [`InMemoryHost`]: A thread-safe in-memory universe implementing every capability
//! - [`Modifiers`] / [`LanguageTraits`] / [`ModifierRules`]: Flags and the predicate view over them

mod memory;
mod modifiers;

use std::sync::Arc;

use strum::{Display, EnumString};

pub use memory::InMemoryHost;
pub use modifiers::{LanguageTraits, ModifierRules, Modifiers};

use crate::{
    typesystem::{normalize_class_name, PrimitiveKind, TypeDescriptor},
    LoadError, MemberKind, Result,
};

/// Reference to a class reported by the host
pub type ClassRc = Arc<ClassInfo>;
/// Reference to a member reported by the host
pub type MemberRc = Arc<MemberInfo>;
/// Identity of a classloading context, stable for the lifetime of the process
pub type ContextId = u64;

/// Where the candidate member list of a class comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum MemberSource {
    /// The runtime's raw member tables (fields, methods, constructors)
    #[default]
    Raw,
    /// The language-level declared members, with members of the enclosing top-level scope prepended
    Declared,
}

/// A class as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo {
    /// Binary name (`a.b.Outer$Inner`, `int`, `[I`)
    pub name: String,
    /// Simple name, empty for anonymous classes
    pub simple_name: String,
    /// JVM access flags
    pub modifiers: Modifiers,
    /// Language-level traits
    pub traits: LanguageTraits,
    /// Binary name of the superclass
    pub superclass: Option<String>,
    /// Binary names of directly implemented interfaces
    pub interfaces: Vec<String>,
    /// Fully qualified names of annotations present on the class
    pub annotations: Vec<String>,
    /// Binary name of the lexically enclosing class
    pub enclosing: Option<String>,
}

impl ClassInfo {
    /// A public class with no supertypes.
    ///
    /// The simple name is derived from the last `.`/`$` segment. A purely numeric last
    /// segment marks the class as anonymous.
    #[must_use]
    pub fn new(name: &str) -> Self {
        let last = name.rsplit(['.', '$']).next().unwrap_or(name);
        let anonymous = !last.is_empty() && last.chars().all(|c| c.is_ascii_digit());
        ClassInfo {
            name: name.to_string(),
            simple_name: if anonymous { String::new() } else { last.to_string() },
            modifiers: Modifiers::PUBLIC,
            traits: if anonymous {
                LanguageTraits::ANONYMOUS
            } else {
                LanguageTraits::empty()
            },
            superclass: None,
            interfaces: Vec::new(),
            annotations: Vec::new(),
            enclosing: None,
        }
    }

    /// Sets the superclass.
    #[must_use]
    pub fn extends(mut self, superclass: &str) -> Self {
        self.superclass = Some(superclass.to_string());
        self
    }

    /// Adds an implemented interface.
    #[must_use]
    pub fn implements(mut self, interface: &str) -> Self {
        self.interfaces.push(interface.to_string());
        self
    }

    /// Adds an annotation.
    #[must_use]
    pub fn annotated(mut self, annotation: &str) -> Self {
        self.annotations.push(annotation.to_string());
        self
    }

    /// Sets the enclosing class.
    #[must_use]
    pub fn enclosed_by(mut self, enclosing: &str) -> Self {
        self.enclosing = Some(enclosing.to_string());
        self
    }

    /// Replaces the access flags.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Adds language traits.
    #[must_use]
    pub fn with_traits(mut self, traits: LanguageTraits) -> Self {
        self.traits |= traits;
        self
    }

    /// Package part of the binary name, empty for the default package.
    #[must_use]
    pub fn package(&self) -> &str {
        self.name.rsplit_once('.').map_or("", |(package, _)| package)
    }

    /// Returns `true` for anonymous classes.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.traits.contains(LanguageTraits::ANONYMOUS)
    }

    /// The simple name, or for nameless classes the binary name relative to the package
    /// (`Outer$1`).
    #[must_use]
    pub fn single_name(&self) -> &str {
        if !self.simple_name.is_empty() {
            return &self.simple_name;
        }
        match self.name.rsplit_once('.') {
            Some((_, relative)) => relative,
            None => &self.name,
        }
    }

    /// The type descriptor naming this class.
    #[must_use]
    pub fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::ClassRef(self.name.clone())
    }

    pub(crate) fn primitive(kind: PrimitiveKind) -> Self {
        ClassInfo {
            name: kind.to_string(),
            simple_name: kind.to_string(),
            modifiers: Modifiers::PUBLIC | Modifiers::FINAL | Modifiers::ABSTRACT,
            traits: LanguageTraits::empty(),
            superclass: None,
            interfaces: Vec::new(),
            annotations: Vec::new(),
            enclosing: None,
        }
    }
}

/// A parameter of a function or constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterInfo {
    /// Source name if the host retained it
    pub name: Option<String>,
    /// Declared (generic) type
    pub ty: TypeDescriptor,
}

/// A member as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInfo {
    /// Member kind
    pub kind: MemberKind,
    /// Declared name; constructors use `<init>`, property accessors `<get-x>`/`<set-x>`
    pub name: String,
    /// Binary name of the declaring class
    pub declaring_class: String,
    /// JVM access flags
    pub modifiers: Modifiers,
    /// Language-level traits
    pub traits: LanguageTraits,
    /// Parameters, empty for properties
    pub parameters: Vec<ParameterInfo>,
    /// Return type of functions, the declared type of properties, `void` for constructors
    pub return_type: TypeDescriptor,
    /// Getter of a language-level property
    pub getter: Option<MemberRc>,
    /// Setter of a language-level property
    pub setter: Option<MemberRc>,
}

impl MemberInfo {
    /// A public function.
    #[must_use]
    pub fn function(
        declaring_class: &str,
        name: &str,
        parameters: Vec<TypeDescriptor>,
        return_type: TypeDescriptor,
    ) -> Self {
        MemberInfo {
            kind: MemberKind::Function,
            name: name.to_string(),
            declaring_class: declaring_class.to_string(),
            modifiers: Modifiers::PUBLIC,
            traits: LanguageTraits::empty(),
            parameters: parameters
                .into_iter()
                .map(|ty| ParameterInfo { name: None, ty })
                .collect(),
            return_type,
            getter: None,
            setter: None,
        }
    }

    /// A public property or field.
    #[must_use]
    pub fn property(declaring_class: &str, name: &str, ty: TypeDescriptor) -> Self {
        MemberInfo {
            kind: MemberKind::Property,
            ..MemberInfo::function(declaring_class, name, Vec::new(), ty)
        }
    }

    /// A public constructor.
    #[must_use]
    pub fn constructor(declaring_class: &str, parameters: Vec<TypeDescriptor>) -> Self {
        MemberInfo {
            kind: MemberKind::Constructor,
            ..MemberInfo::function(
                declaring_class,
                "<init>",
                parameters,
                TypeDescriptor::class("void"),
            )
        }
    }

    /// Replaces the access flags.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Adds language traits.
    #[must_use]
    pub fn with_traits(mut self, traits: LanguageTraits) -> Self {
        self.traits |= traits;
        self
    }

    /// Names the parameters positionally; missing trailing names stay unnamed.
    #[must_use]
    pub fn with_param_names(mut self, names: &[&str]) -> Self {
        for (parameter, name) in self.parameters.iter_mut().zip(names) {
            parameter.name = Some((*name).to_string());
        }
        self
    }

    /// Attaches accessors to a property.
    #[must_use]
    pub fn with_accessors(mut self, getter: Option<MemberInfo>, setter: Option<MemberInfo>) -> Self {
        self.getter = getter.map(Arc::new);
        self.setter = setter.map(Arc::new);
        self
    }

    /// Declared parameter types.
    #[must_use]
    pub fn param_types(&self) -> Vec<TypeDescriptor> {
        self.parameters.iter().map(|p| p.ty.clone()).collect()
    }

    /// Declared parameter names, `None` where the host did not retain them.
    #[must_use]
    pub fn param_names(&self) -> Vec<Option<String>> {
        self.parameters.iter().map(|p| p.name.clone()).collect()
    }

    /// Erased, normalized parameter class names, as used for exact method lookup.
    #[must_use]
    pub fn erased_param_names(&self) -> Vec<String> {
        self.parameters
            .iter()
            .map(|p| {
                let erased = p.ty.erasure().unwrap_or_default();
                normalize_class_name(erased).unwrap_or_else(|_| erased.to_string())
            })
            .collect()
    }

    /// The view modifier predicates are evaluated against.
    #[must_use]
    pub fn modifier_rules(&self) -> ModifierRules {
        ModifierRules::new(self.modifiers, self.traits, self.kind == MemberKind::Property)
    }
}

/// Member enumeration and structural queries over the host's classes.
pub trait HostReflection: Send + Sync {
    /// Identity used to key cached query results; must stay stable for the process lifetime
    /// and differ between hosts that enumerate different members.
    fn host_id(&self) -> ContextId;

    /// Members of `kind` declared directly by `class`, in declaration order.
    ///
    /// # Errors
    /// Returns [`crate::Error::HostError`] if the host cannot enumerate the class.
    fn declared_members(
        &self,
        class: &ClassInfo,
        kind: MemberKind,
        source: MemberSource,
    ) -> Result<Vec<MemberRc>>;

    /// Members of `kind` declared at the top-level scope enclosing `class` (file facade,
    /// companion), prepended to the candidates in [`MemberSource::Declared`] mode.
    ///
    /// # Errors
    /// Returns [`crate::Error::HostError`] if the host cannot enumerate the scope.
    fn top_level_members(&self, _class: &ClassInfo, _kind: MemberKind) -> Result<Vec<MemberRc>> {
        Ok(Vec::new())
    }

    /// Every class the host can enumerate, used when a class search gets no explicit candidates.
    ///
    /// # Errors
    /// Returns [`crate::Error::HostError`] if the host cannot enumerate its classes.
    fn classes(&self) -> Result<Vec<ClassRc>> {
        Ok(Vec::new())
    }

    /// The function of `class` with exactly this name and these erased parameter classes.
    ///
    /// # Errors
    /// Returns [`crate::Error::HostError`] if the host cannot enumerate the class.
    fn find_function(
        &self,
        class: &ClassInfo,
        name: &str,
        erased_params: &[String],
    ) -> Result<Option<MemberRc>> {
        Ok(self
            .declared_members(class, MemberKind::Function, MemberSource::Raw)?
            .into_iter()
            .find(|member| member.name == name && member.erased_param_names() == erased_params))
    }

    /// The field of `class` with this name.
    ///
    /// # Errors
    /// Returns [`crate::Error::HostError`] if the host cannot enumerate the class.
    fn find_field(&self, class: &ClassInfo, name: &str) -> Result<Option<MemberRc>> {
        Ok(self
            .declared_members(class, MemberKind::Property, MemberSource::Raw)?
            .into_iter()
            .find(|member| member.name == name))
    }
}

/// Turns qualified names into loaded types.
pub trait ClassLoadingContext: Send + Sync {
    /// Identity used to key caches; must stay stable for the process lifetime.
    fn id(&self) -> ContextId;

    /// Loads the class with this normalized binary name.
    ///
    /// # Errors
    /// [`LoadError::NotFound`] if no such class exists, [`LoadError::MalformedName`] if the
    /// name cannot denote a class.
    fn load_class(&self, name: &str) -> std::result::Result<ClassRc, LoadError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_names() {
        let inner = ClassInfo::new("com.example.Outer$Inner");
        assert_eq!(inner.simple_name, "Inner");
        assert_eq!(inner.package(), "com.example");
        assert_eq!(inner.single_name(), "Inner");
        assert!(!inner.is_anonymous());

        let anonymous = ClassInfo::new("com.example.Outer$1");
        assert!(anonymous.is_anonymous());
        assert_eq!(anonymous.simple_name, "");
        assert_eq!(anonymous.single_name(), "Outer$1");

        assert_eq!(ClassInfo::new("Main").package(), "");
    }

    #[test]
    fn member_constructors() {
        let ctor = MemberInfo::constructor("a.B", vec![TypeDescriptor::class("int")]);
        assert_eq!(ctor.kind, MemberKind::Constructor);
        assert_eq!(ctor.name, "<init>");
        assert_eq!(ctor.erased_param_names(), vec!["int".to_string()]);

        let named = MemberInfo::function(
            "a.B",
            "put",
            vec![TypeDescriptor::class("int"), TypeDescriptor::class("int")],
            TypeDescriptor::class("void"),
        )
        .with_param_names(&["key"]);
        assert_eq!(named.param_names(), vec![Some("key".to_string()), None]);
    }
}
