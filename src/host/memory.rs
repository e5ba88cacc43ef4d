//! A thread-safe, in-memory class universe.
//!
//! [`InMemoryHost`] implements [`HostReflection`], [`ClassLoadingContext`] and
//! [`MetadataSource`] over data registered at runtime. Classes are kept ordered by name in a
//! lock-free skip list, members and compiler metadata in concurrent maps keyed by the
//! declaring class, so a host can be populated and queried from several threads.
//!
//! # Examples
//!
//! ```rust
//! use memberscope::host::{ClassInfo, ClassLoadingContext, InMemoryHost, MemberInfo};
//! use memberscope::typesystem::TypeDescriptor;
//!
//! let host = InMemoryHost::new();
//! host.insert_class(ClassInfo::new("com.example.Foo"));
//! host.insert_member(MemberInfo::function(
//!     "com.example.Foo",
//!     "run",
//!     vec![],
//!     TypeDescriptor::class("void"),
//! ));
//!
//! assert!(host.load_class("com.example.Foo").is_ok());
//! ```

use std::sync::{
    atomic::{AtomicU64, AtomicUsize, Ordering},
    Arc,
};

use crossbeam_skiplist::SkipMap;
use dashmap::DashMap;

use crate::{
    host::{
        ClassInfo, ClassLoadingContext, ClassRc, ContextId, HostReflection, MemberInfo, MemberRc,
        MemberSource, Modifiers,
    },
    signatures::{MetadataSource, PropertySignatureData, SignatureData},
    typesystem::{normalize_class_name, PrimitiveKind, OBJECT_CLASS},
    LoadError, MemberKind, Result,
};

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Default)]
struct DeclaredMembers {
    raw: Vec<MemberRc>,
    declared: Vec<MemberRc>,
}

#[derive(Default)]
struct ClassMetadata {
    functions: Vec<SignatureData>,
    properties: Vec<PropertySignatureData>,
}

/// In-memory host universe.
pub struct InMemoryHost {
    id: ContextId,
    classes: SkipMap<String, ClassRc>,
    members: DashMap<String, DeclaredMembers>,
    top_level: DashMap<String, Vec<MemberRc>>,
    metadata: DashMap<String, ClassMetadata>,
    loads: AtomicUsize,
}

impl Default for InMemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryHost {
    /// An empty universe with a fresh context identity.
    #[must_use]
    pub fn new() -> Self {
        InMemoryHost {
            id: NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed),
            classes: SkipMap::new(),
            members: DashMap::new(),
            top_level: DashMap::new(),
            metadata: DashMap::new(),
            loads: AtomicUsize::new(0),
        }
    }

    /// Registers a class, replacing any previous class of the same name.
    pub fn insert_class(&self, class: ClassInfo) -> ClassRc {
        let class = Arc::new(class);
        self.classes.insert(class.name.clone(), class.clone());
        class
    }

    /// Registers a member visible both in the raw tables and as a declared member.
    pub fn insert_member(&self, member: MemberInfo) -> MemberRc {
        let member = Arc::new(member);
        let mut entry = self.members.entry(member.declaring_class.clone()).or_default();
        entry.raw.push(member.clone());
        entry.declared.push(member.clone());
        member
    }

    /// Registers a member only visible in the raw tables (synthetic accessors, bridges).
    pub fn insert_raw_member(&self, member: MemberInfo) -> MemberRc {
        let member = Arc::new(member);
        self.members
            .entry(member.declaring_class.clone())
            .or_default()
            .raw
            .push(member.clone());
        member
    }

    /// Registers a member only visible at the declared level (language properties).
    pub fn insert_declared_member(&self, member: MemberInfo) -> MemberRc {
        let member = Arc::new(member);
        self.members
            .entry(member.declaring_class.clone())
            .or_default()
            .declared
            .push(member.clone());
        member
    }

    /// Registers a member of the top-level scope enclosing `class`.
    pub fn insert_top_level_member(&self, class: &str, member: MemberInfo) -> MemberRc {
        let member = Arc::new(member);
        self.top_level
            .entry(class.to_string())
            .or_default()
            .push(member.clone());
        member
    }

    /// Registers compiler metadata for a function of `class`.
    pub fn insert_function_signature(&self, class: &str, signature: SignatureData) {
        self.metadata
            .entry(class.to_string())
            .or_default()
            .functions
            .push(signature);
    }

    /// Registers compiler metadata for a property of `class`.
    pub fn insert_property_signature(&self, class: &str, signature: PropertySignatureData) {
        self.metadata
            .entry(class.to_string())
            .or_default()
            .properties
            .push(signature);
    }

    /// Number of [`ClassLoadingContext::load_class`] calls served so far.
    #[must_use]
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Number of registered classes.
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    fn lookup(&self, name: &str) -> std::result::Result<ClassRc, LoadError> {
        if let Some(kind) = PrimitiveKind::from_keyword(name) {
            return Ok(Arc::new(ClassInfo::primitive(kind)));
        }

        if let Some(element) = name.strip_prefix('[') {
            let element_name = match element.strip_prefix('L') {
                Some(object) => object.trim_end_matches(';').to_string(),
                None if element.starts_with('[') => element.to_string(),
                None => element
                    .chars()
                    .next()
                    .and_then(PrimitiveKind::from_code)
                    .map(|kind| kind.to_string())
                    .ok_or(LoadError::MalformedName)?,
            };
            self.lookup(&element_name)?;

            let mut array = ClassInfo::new(name).extends(OBJECT_CLASS);
            array.simple_name = name.to_string();
            array.modifiers = Modifiers::PUBLIC | Modifiers::FINAL | Modifiers::ABSTRACT;
            return Ok(Arc::new(array));
        }

        self.classes
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or(LoadError::NotFound)
    }
}

impl ClassLoadingContext for InMemoryHost {
    fn id(&self) -> ContextId {
        self.id
    }

    fn load_class(&self, name: &str) -> std::result::Result<ClassRc, LoadError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let name = normalize_class_name(name)?;
        self.lookup(&name)
    }
}

impl HostReflection for InMemoryHost {
    fn host_id(&self) -> ContextId {
        self.id
    }

    fn declared_members(
        &self,
        class: &ClassInfo,
        kind: MemberKind,
        source: MemberSource,
    ) -> Result<Vec<MemberRc>> {
        let Some(entry) = self.members.get(&class.name) else {
            return Ok(Vec::new());
        };
        let members = match source {
            MemberSource::Raw => &entry.raw,
            MemberSource::Declared => &entry.declared,
        };
        Ok(members
            .iter()
            .filter(|member| member.kind == kind)
            .cloned()
            .collect())
    }

    fn top_level_members(&self, class: &ClassInfo, kind: MemberKind) -> Result<Vec<MemberRc>> {
        Ok(self
            .top_level
            .get(&class.name)
            .map(|members| {
                members
                    .iter()
                    .filter(|member| member.kind == kind)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn classes(&self) -> Result<Vec<ClassRc>> {
        Ok(self
            .classes
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }
}

impl MetadataSource for InMemoryHost {
    fn function_signatures(&self, class: &ClassInfo) -> Result<Vec<SignatureData>> {
        Ok(self
            .metadata
            .get(&class.name)
            .map(|metadata| metadata.functions.clone())
            .unwrap_or_default())
    }

    fn property_signatures(&self, class: &ClassInfo) -> Result<Vec<PropertySignatureData>> {
        Ok(self
            .metadata
            .get(&class.name)
            .map(|metadata| metadata.properties.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typesystem::TypeDescriptor;

    #[test]
    fn loads_registered_primitive_and_array_classes() {
        let host = InMemoryHost::new();
        host.insert_class(ClassInfo::new("com.example.Foo"));

        assert_eq!(host.load_class("com.example.Foo").unwrap().name, "com.example.Foo");
        assert_eq!(host.load_class("int").unwrap().name, "int");
        assert_eq!(host.load_class("int[][]").unwrap().name, "[[I");
        assert_eq!(
            host.load_class("com.example.Foo[]").unwrap().superclass.as_deref(),
            Some(OBJECT_CLASS)
        );
        assert_eq!(host.load_count(), 4);
    }

    #[test]
    fn distinguishes_missing_from_malformed() {
        let host = InMemoryHost::new();
        assert_eq!(host.load_class("com.example.Missing").unwrap_err(), LoadError::NotFound);
        assert_eq!(host.load_class("com.example.Missing[]").unwrap_err(), LoadError::NotFound);
        assert_eq!(host.load_class("int]").unwrap_err(), LoadError::MalformedName);
    }

    #[test]
    fn raw_and_declared_views() {
        let host = InMemoryHost::new();
        let class = host.insert_class(ClassInfo::new("a.B"));
        host.insert_member(MemberInfo::property("a.B", "count", TypeDescriptor::class("int")));
        host.insert_raw_member(MemberInfo::function(
            "a.B",
            "getCount",
            vec![],
            TypeDescriptor::class("int"),
        ));

        let raw = host.declared_members(&class, MemberKind::Function, MemberSource::Raw).unwrap();
        let declared = host
            .declared_members(&class, MemberKind::Function, MemberSource::Declared)
            .unwrap();
        assert_eq!(raw.len(), 1);
        assert!(declared.is_empty());
        assert_eq!(
            host.declared_members(&class, MemberKind::Property, MemberSource::Declared)
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn distinct_hosts_have_distinct_ids() {
        assert_ne!(InMemoryHost::new().id(), InMemoryHost::new().id());
    }
}
