//! Process-wide memoization of class lookups and query results.
//!
//! [`ResolutionCache`] maps `(name, context)` to the outcome of loading that class, and
//! `(class, context, host, kind, fingerprint)` to the members a query selected. Entries are created
//! once and never invalidated; this relies on a classloading context keeping its identity and
//! contents for the lifetime of the process.
//!
//! Class loading for a key runs at most once even under contention: the map only hands out a
//! shared once-cell per key, and the load runs inside the cell, outside any map lock.

use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use tracing::trace;

use crate::{
    host::{ClassLoadingContext, ClassRc, ContextId, MemberRc},
    typesystem::normalize_class_name,
    Error, LoadError, MemberKind, Result,
};

type LoadCell = Arc<OnceLock<std::result::Result<ClassRc, LoadError>>>;

/// Key of a cached member query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    /// Binary name of the class the query started at
    pub class: String,
    /// Context the class was loaded from
    pub context: ContextId,
    /// Host the candidates were enumerated from
    pub host: ContextId,
    /// Member kind the query selects
    pub kind: MemberKind,
    /// Stable rendering of the criterion
    pub fingerprint: String,
}

/// Key of a cached signature-to-member lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignatureKey {
    /// Binary name of the declaring class
    pub class: String,
    /// Context the class was loaded from
    pub context: ContextId,
    /// Host the member was looked up in
    pub host: ContextId,
    /// JVM name of the member
    pub name: String,
    /// Method or field descriptor
    pub descriptor: String,
}

/// Concurrent cache of class lookups and query results.
#[derive(Default)]
pub struct ResolutionCache {
    classes: DashMap<(String, ContextId), LoadCell>,
    queries: DashMap<QueryKey, Arc<Vec<MemberRc>>>,
    signatures: DashMap<SignatureKey, MemberRc>,
}

impl ResolutionCache {
    /// An empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The lazily created process-wide cache.
    #[must_use]
    pub fn global() -> Arc<ResolutionCache> {
        static GLOBAL: OnceLock<Arc<ResolutionCache>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(ResolutionCache::new())).clone()
    }

    /// Loads `name` through `loader`, at most once per `(name, context)` pair.
    ///
    /// Absence is cached as well: a name that failed to load keeps failing without
    /// consulting the loader again.
    ///
    /// # Errors
    /// Returns [`Error::ClassLoadFailed`] if the name is malformed or the class does not exist.
    pub fn load_class(&self, loader: &dyn ClassLoadingContext, name: &str) -> Result<ClassRc> {
        let normalized = normalize_class_name(name).map_err(|reason| Error::ClassLoadFailed {
            name: name.to_string(),
            reason,
        })?;

        let cell = self
            .classes
            .entry((normalized.clone(), loader.id()))
            .or_default()
            .clone();

        cell.get_or_init(|| {
            trace!(class = %normalized, context = loader.id(), "loading class");
            loader.load_class(&normalized)
        })
        .clone()
        .map_err(|reason| Error::ClassLoadFailed {
            name: name.to_string(),
            reason,
        })
    }

    /// Cached result of a member query.
    #[must_use]
    pub fn query(&self, key: &QueryKey) -> Option<Arc<Vec<MemberRc>>> {
        self.queries.get(key).map(|entry| entry.value().clone())
    }

    /// Stores the result of a member query; the first stored result wins.
    pub fn store_query(&self, key: QueryKey, members: Vec<MemberRc>) -> Arc<Vec<MemberRc>> {
        self.queries
            .entry(key)
            .or_insert_with(|| Arc::new(members))
            .value()
            .clone()
    }

    /// Member previously resolved for a signature.
    #[must_use]
    pub fn signature_member(&self, key: &SignatureKey) -> Option<MemberRc> {
        self.signatures.get(key).map(|entry| entry.value().clone())
    }

    /// Stores the member a signature resolved to; the first stored member wins.
    pub fn store_signature_member(&self, key: SignatureKey, member: MemberRc) -> MemberRc {
        self.signatures.entry(key).or_insert(member).value().clone()
    }

    /// Number of cached class lookups, including cached absences.
    #[must_use]
    pub fn class_entries(&self) -> usize {
        self.classes.len()
    }

    /// Number of cached query results.
    #[must_use]
    pub fn query_entries(&self) -> usize {
        self.queries.len()
    }
}

/// A classloading context paired with the cache its lookups go through.
#[derive(Clone)]
pub struct CachedLoader {
    loader: Arc<dyn ClassLoadingContext>,
    cache: Arc<ResolutionCache>,
}

impl CachedLoader {
    /// Pairs `loader` with `cache`.
    #[must_use]
    pub fn new(loader: Arc<dyn ClassLoadingContext>, cache: Arc<ResolutionCache>) -> Self {
        CachedLoader { loader, cache }
    }

    /// The same context paired with another cache.
    #[must_use]
    pub fn with_cache(&self, cache: Arc<ResolutionCache>) -> Self {
        CachedLoader {
            loader: self.loader.clone(),
            cache,
        }
    }

    /// Identity of the underlying context.
    #[must_use]
    pub fn context(&self) -> ContextId {
        self.loader.id()
    }

    /// The cache lookups go through.
    #[must_use]
    pub fn cache(&self) -> &Arc<ResolutionCache> {
        &self.cache
    }

    /// Loads a class through the cache.
    ///
    /// # Errors
    /// Returns [`Error::ClassLoadFailed`] if the name is malformed or the class does not exist.
    pub fn load(&self, name: &str) -> Result<ClassRc> {
        self.cache.load_class(self.loader.as_ref(), name)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::host::{ClassInfo, InMemoryHost};

    fn host() -> Arc<InMemoryHost> {
        let host = InMemoryHost::new();
        host.insert_class(ClassInfo::new("com.example.Foo"));
        Arc::new(host)
    }

    #[test]
    fn loads_once_per_name_and_context() {
        let host = host();
        let cache = ResolutionCache::new();

        let first = cache.load_class(host.as_ref(), "com.example.Foo").unwrap();
        let second = cache.load_class(host.as_ref(), "com/example/Foo").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(host.load_count(), 1);
        assert_eq!(cache.class_entries(), 1);
    }

    #[test]
    fn caches_absence() {
        let host = host();
        let cache = ResolutionCache::new();

        for _ in 0..3 {
            assert!(matches!(
                cache.load_class(host.as_ref(), "com.example.Missing"),
                Err(Error::ClassLoadFailed {
                    reason: LoadError::NotFound,
                    ..
                })
            ));
        }
        assert_eq!(host.load_count(), 1);
    }

    #[test]
    fn malformed_names_never_reach_the_loader() {
        let host = host();
        let cache = ResolutionCache::new();

        assert!(matches!(
            cache.load_class(host.as_ref(), "int]"),
            Err(Error::ClassLoadFailed {
                reason: LoadError::MalformedName,
                ..
            })
        ));
        assert_eq!(host.load_count(), 0);
    }

    #[test]
    fn contexts_are_kept_apart() {
        let cache = ResolutionCache::new();
        let left = host();
        let right = host();

        let a = cache.load_class(left.as_ref(), "com.example.Foo").unwrap();
        let b = cache.load_class(right.as_ref(), "com.example.Foo").unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(cache.class_entries(), 2);
    }

    #[test]
    fn concurrent_loads_run_once() {
        let host = host();
        let cache = Arc::new(ResolutionCache::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let host = host.clone();
                let cache = cache.clone();
                thread::spawn(move || cache.load_class(host.as_ref(), "com.example.Foo").unwrap())
            })
            .collect();
        let loaded: Vec<ClassRc> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert!(loaded.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
        assert_eq!(host.load_count(), 1);
    }

    #[test]
    fn first_stored_query_wins() {
        let cache = ResolutionCache::new();
        let key = QueryKey {
            class: "a.B".to_string(),
            context: 1,
            host: 1,
            kind: MemberKind::Function,
            fingerprint: "name:[f]".to_string(),
        };

        assert!(cache.query(&key).is_none());
        let stored = cache.store_query(key.clone(), Vec::new());
        let again = cache.store_query(key.clone(), Vec::new());
        assert!(Arc::ptr_eq(&stored, &again));
        assert_eq!(cache.query_entries(), 1);
    }
}
