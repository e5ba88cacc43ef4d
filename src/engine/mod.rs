//! The match engine: evaluates criteria against a host universe.
//!
//! [`MatchEngine`] pulls candidates from a [`HostReflection`], loads classes through a
//! [`ClassLoadingContext`] paired with a [`ResolutionCache`], and optionally reads compiler
//! metadata from a [`MetadataSource`]. It is immutable after construction and can be shared
//! between threads; every query builds its own [`TemplateRegistry`](crate::rules::TemplateRegistry).
//!
//! # Resolution Pipeline
//!
//! 1. **Validation**: the criterion is checked before any candidate is looked at
//! 2. **Cache**: criteria without closures are answered from the query cache when possible
//! 3. **Enumeration**: candidates come from the raw tables or the declared members, per
//!    [`EngineConfig::member_source`]
//! 4. **Selection**: structural evaluation, then `order_index` and `match_index`
//! 5. **Fallback**: with `find_in_super`, steps 3 and 4 repeat on each superclass
//! 6. **Diagnostics**: exhaustion raises a single not-found error listing every active rule
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use memberscope::engine::MatchEngine;
//! use memberscope::host::{ClassInfo, InMemoryHost, MemberInfo};
//! use memberscope::rules::{FunctionCriterion, PositionRule};
//! use memberscope::typesystem::TypeDescriptor;
//!
//! let host = Arc::new(InMemoryHost::new());
//! let class = host.insert_class(ClassInfo::new("com.example.Foo"));
//! for name in ["a", "b"] {
//!     host.insert_member(MemberInfo::function(
//!         "com.example.Foo",
//!         name,
//!         vec![TypeDescriptor::class("int")],
//!         TypeDescriptor::class("void"),
//!     ));
//! }
//!
//! let engine = MatchEngine::for_host(host);
//! let found = engine.find_functions(
//!     &class,
//!     &FunctionCriterion::new()
//!         .with_param_types(vec![TypeDescriptor::class("int")])
//!         .with_match_index(PositionRule::last()),
//! )?;
//! assert_eq!(found.primary().name, "b");
//! # Ok::<(), memberscope::Error>(())
//! ```

mod classes;
mod members;
mod remedy;
mod resolved;
mod select;
mod signature;

use std::sync::Arc;

use tracing::debug;

pub use remedy::RemedyPlan;
pub use resolved::Resolved;

use crate::{
    cache::{CachedLoader, ResolutionCache},
    config::EngineConfig,
    host::{ClassLoadingContext, ClassRc, HostReflection},
    signatures::MetadataSource,
    Error, Result,
};

/// Resolves classes, members and signatures described by criteria.
#[derive(Clone)]
pub struct MatchEngine {
    host: Arc<dyn HostReflection>,
    loader: CachedLoader,
    metadata: Option<Arc<dyn MetadataSource>>,
    config: EngineConfig,
}

impl MatchEngine {
    /// An engine over `host` and `loader`, using the process-wide cache and the default
    /// configuration. Signature queries need [`MatchEngine::with_metadata`].
    #[must_use]
    pub fn new(host: Arc<dyn HostReflection>, loader: Arc<dyn ClassLoadingContext>) -> Self {
        MatchEngine {
            host,
            loader: CachedLoader::new(loader, ResolutionCache::global()),
            metadata: None,
            config: EngineConfig::default(),
        }
    }

    /// An engine over a host that provides every capability itself.
    #[must_use]
    pub fn for_host<H>(host: Arc<H>) -> Self
    where
        H: HostReflection + ClassLoadingContext + MetadataSource + 'static,
    {
        Self::new(host.clone(), host.clone()).with_metadata(host)
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Uses `cache` instead of the process-wide cache.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<ResolutionCache>) -> Self {
        self.loader = self.loader.with_cache(cache);
        self
    }

    /// Enables signature queries against `metadata`.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Arc<dyn MetadataSource>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The cache class lookups and query results go through.
    #[must_use]
    pub fn cache(&self) -> &Arc<ResolutionCache> {
        self.loader.cache()
    }

    /// Loads a class by name through the cache.
    ///
    /// Accepts dotted or slashed binary names, primitive keywords, `[]` suffixes and
    /// `[`-prefixed descriptor names.
    ///
    /// # Errors
    /// Returns [`Error::ClassLoadFailed`] if the name is malformed or no such class exists.
    pub fn class_by_name(&self, name: &str) -> Result<ClassRc> {
        self.loader.load(name)
    }

    /// [`MatchEngine::class_by_name`], `None` on failure.
    #[must_use]
    pub fn class_by_name_opt(&self, name: &str) -> Option<ClassRc> {
        self.class_by_name(name).ok()
    }

    /// Returns `true` if a class of this name can be loaded.
    #[must_use]
    pub fn has_class(&self, name: &str) -> bool {
        self.class_by_name(name).is_ok()
    }

    /// Runs `attempt` on `start` and, if `find_in_super` is set, on each superclass until it
    /// yields a value.
    ///
    /// Returns `None` once the chain ends, either at a class without superclass or at a
    /// superclass the context cannot load.
    fn walk_hierarchy<T>(
        &self,
        start: &ClassRc,
        find_in_super: bool,
        mut attempt: impl FnMut(&ClassRc) -> Result<Option<T>>,
    ) -> Result<Option<T>> {
        let mut current = start.clone();
        let mut depth = 0;
        loop {
            if let Some(found) = attempt(&current)? {
                return Ok(Some(found));
            }
            if !find_in_super {
                return Ok(None);
            }
            let Some(superclass) = current.superclass.as_deref() else {
                return Ok(None);
            };
            if depth == self.config.max_super_depth {
                return Err(Error::RecursionLimit(self.config.max_super_depth));
            }
            depth += 1;

            let next = match self.class_by_name(superclass) {
                Ok(next) => next,
                Err(err) => {
                    debug!(class = %current.name, error = %err, "superclass is not loadable, ending search");
                    return Ok(None);
                }
            };
            debug!(class = %current.name, superclass = %next.name, depth, "searching superclass");
            current = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        host::{ClassInfo, InMemoryHost},
        test::universe,
    };

    #[test]
    fn class_lookups_go_through_the_cache() {
        let host = universe();
        let engine = MatchEngine::for_host(host.clone()).with_cache(Arc::new(ResolutionCache::new()));

        let first = engine.class_by_name("com.example.Base").unwrap();
        let second = engine.class_by_name("com/example/Base").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(host.load_count(), 1);

        assert!(engine.has_class("int[]"));
        assert!(!engine.has_class("com.example.Missing"));
        assert!(engine.class_by_name_opt("int]").is_none());
    }

    #[test]
    fn hierarchy_walk_is_bounded() {
        let host = Arc::new(InMemoryHost::new());
        let looping = host.insert_class(ClassInfo::new("a.Loop").extends("a.Loop"));
        let engine = MatchEngine::for_host(host)
            .with_cache(Arc::new(ResolutionCache::new()))
            .with_config(EngineConfig::default().with_max_super_depth(4));

        let mut visited = 0;
        let result = engine.walk_hierarchy(&looping, true, |_| -> Result<Option<()>> {
            visited += 1;
            Ok(None)
        });
        assert!(matches!(result, Err(Error::RecursionLimit(4))));
        assert_eq!(visited, 5);
    }

    #[test]
    fn hierarchy_walk_stops_without_superclass() {
        let host = universe();
        let engine = MatchEngine::for_host(host).with_cache(Arc::new(ResolutionCache::new()));
        let derived = engine.class_by_name("com.example.Derived").unwrap();

        let mut visited = Vec::new();
        let result = engine
            .walk_hierarchy(&derived, true, |class| -> Result<Option<()>> {
                visited.push(class.name.clone());
                Ok(None)
            })
            .unwrap();
        assert!(result.is_none());
        assert_eq!(visited, vec!["com.example.Derived", "com.example.Base"]);
    }
}
