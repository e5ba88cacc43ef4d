//! Type model and structural type equivalence.
//!
//! Members are matched by comparing the types a caller writes into a criterion against the
//! types the host reports. Both sides are expressed as [`TypeDescriptor`], a closed union
//! over every representation a type can take: raw class references, parameterized uses,
//! projections, type variables, explicit argument pattern lists, and the two sentinels
//! `Vague` (matches anything) and `Unresolved` (a type that failed to load).
//!
//! # Key Components
//!
//! - [`TypeDescriptor`]: The type model
//! - [`type_eq`]: Asymmetric structural equivalence under a [`Strictness`]
//! - [`param_types_eq`] / [`param_names_eq`]: Positional list comparisons used by criteria
//! - [`PrimitiveKind`]: JVM primitives and their descriptor codes
//!
//! # Examples
//!
//! ```rust
//! use memberscope::typesystem::{type_eq, Strictness, TypeDescriptor, TypeProjection};
//!
//! let raw = TypeDescriptor::class("java.util.List");
//! let strings = TypeDescriptor::parameterized(
//!     "java.util.List",
//!     vec![TypeProjection::invariant(TypeDescriptor::class("java.lang.String"))],
//! );
//!
//! // generics are erased when the pattern is a raw class
//! assert!(type_eq(&raw, &strings, &Strictness::default()));
//! assert!(type_eq(&TypeDescriptor::Vague, &strings, &Strictness::strict()));
//! ```

mod descriptor;
mod equivalence;
mod primitives;

pub use descriptor::{
    ArgumentPattern, Classifier, GenericArguments, ParameterizedType, TypeDescriptor,
    TypeProjection, TypeVariable, Variance,
};
pub use equivalence::{param_names_eq, param_types_eq, type_eq, Strictness};
pub use primitives::{
    class_names_eq, is_unit_like, normalize_class_name, PrimitiveKind, OBJECT_CLASS,
};
