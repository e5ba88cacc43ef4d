//! Configuration for the match engine.
//!
//! The member source is global per engine rather than per query, so the same criterion
//! always sees the same candidate list for a given engine.

use crate::{host::MemberSource, typesystem::Strictness};

/// Default bound on superclass recursion.
pub const DEFAULT_MAX_SUPER_DEPTH: usize = 64;

/// Configuration for the match engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Where candidate members come from (default: [`MemberSource::Raw`]).
    pub member_source: MemberSource,

    /// Strictness of every type comparison (default: variance checked, nullability and
    /// annotations ignored).
    pub strictness: Strictness,

    /// Memoize member query results in the resolution cache (default: true).
    ///
    /// Criteria carrying closures are never cached, whatever this says.
    pub cache_queries: bool,

    /// Maximum number of superclasses visited by a fallback search (default: 64).
    pub max_super_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            member_source: MemberSource::Raw,
            strictness: Strictness::default(),
            cache_queries: true,
            max_super_depth: DEFAULT_MAX_SUPER_DEPTH,
        }
    }
}

impl EngineConfig {
    /// Creates a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enumerates language-level declared members, with top-level scope members prepended.
    #[must_use]
    pub fn declared() -> Self {
        Self {
            member_source: MemberSource::Declared,
            ..Self::default()
        }
    }

    /// Enumerates the host's raw member tables.
    #[must_use]
    pub fn raw() -> Self {
        Self {
            member_source: MemberSource::Raw,
            ..Self::default()
        }
    }

    /// Enables every strictness clause.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            strictness: Strictness::strict(),
            ..Self::default()
        }
    }

    /// Disables the query-result cache. Class lookups are still cached.
    #[must_use]
    pub fn uncached() -> Self {
        Self {
            cache_queries: false,
            ..Self::default()
        }
    }

    /// Sets the member source.
    #[must_use]
    pub fn with_member_source(mut self, source: MemberSource) -> Self {
        self.member_source = source;
        self
    }

    /// Sets the strictness of type comparisons.
    #[must_use]
    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    /// Sets the superclass recursion bound.
    #[must_use]
    pub fn with_max_super_depth(mut self, depth: usize) -> Self {
        self.max_super_depth = depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_only_touch_their_field() {
        let default = EngineConfig::default();
        assert_eq!(default.member_source, MemberSource::Raw);
        assert!(default.cache_queries);
        assert_eq!(default.max_super_depth, DEFAULT_MAX_SUPER_DEPTH);

        assert_eq!(EngineConfig::declared().member_source, MemberSource::Declared);
        assert_eq!(EngineConfig::strict().strictness, Strictness::strict());
        assert!(!EngineConfig::uncached().cache_queries);
        assert_eq!(
            EngineConfig::uncached().with_max_super_depth(3),
            EngineConfig {
                cache_queries: false,
                max_super_depth: 3,
                ..EngineConfig::default()
            }
        );
    }
}
