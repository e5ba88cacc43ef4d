//! # memberscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the memberscope library. Import it to build criteria and run queries without
//! spelling out module paths.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all memberscope operations
pub use crate::Error;

/// The result type used throughout memberscope
pub use crate::Result;

/// Failure reasons of a classloading context, and member kinds
pub use crate::{LoadError, MemberKind};

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// The match engine, its results and configuration
pub use crate::{EngineConfig, MatchEngine, Resolved};

/// Alternative lookups tried in order
pub use crate::engine::RemedyPlan;

/// Process-wide resolution cache
pub use crate::cache::{CachedLoader, ResolutionCache};

// ================================================================================================
// Type System
// ================================================================================================

/// Type model
pub use crate::typesystem::{
    ArgumentPattern, GenericArguments, PrimitiveKind, TypeDescriptor, TypeProjection,
    TypeVariable, Variance,
};

/// Type equivalence
pub use crate::typesystem::{param_names_eq, param_types_eq, type_eq, Strictness};

// ================================================================================================
// Criteria
// ================================================================================================

/// Class and member criteria
pub use crate::rules::{
    CallableCriterion, ClassCriterion, ConstructorCriterion, FunctionCriterion, MemberCriterion,
    NameMatch, NestedTarget, PropertyCriterion,
};

/// Positional, count and name rules
pub use crate::rules::{CountRule, NameRules, PositionRule};

// ================================================================================================
// Host Capabilities
// ================================================================================================

/// Host traits and the values they report
pub use crate::host::{
    ClassInfo, ClassLoadingContext, ClassRc, HostReflection, InMemoryHost, LanguageTraits,
    MemberInfo, MemberRc, MemberSource, ModifierRules, Modifiers,
};

// ================================================================================================
// Signatures
// ================================================================================================

/// Descriptor decoding
pub use crate::signatures::{DescriptorParser, DescriptorType, MethodDescriptor};

/// Compiler metadata and signature supports
pub use crate::signatures::{
    FieldSignature, FunctionSignature, MetadataSource, PropertySignature,
    PropertySignatureData, SignatureData,
};
