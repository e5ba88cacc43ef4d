//! Declarative criteria describing the classes and members to look up.
//!
//! A criterion is a bag of optional fields. Unset fields are ignored, set fields are combined
//! conjunctively, and a criterion with no field set is inactive, which makes a query return
//! every candidate with the first as primary pick. Criteria are built per query and only read
//! by the engine, so their predicates only need to be `Send + Sync` to be reusable across
//! threads.
//!
//! # Key Components
//!
//! - [`ClassCriterion`]: Package scope, names, hierarchy sets, flags and nested member rules
//! - [`PropertyCriterion`] / [`FunctionCriterion`] / [`ConstructorCriterion`]: Member criteria
//! - [`PositionRule`]: `(position, strict)` tie-break between several matches
//! - [`CountRule`]: Exact, range or predicate constraint on a count
//! - [`TemplateRegistry`]: Per-query record of what modifier predicates consulted
//!
//! # Examples
//!
//! ```rust
//! use memberscope::rules::{FunctionCriterion, MemberCriterion, PositionRule};
//! use memberscope::typesystem::TypeDescriptor;
//!
//! let criterion = FunctionCriterion::new()
//!     .with_param_types(vec![TypeDescriptor::class("int"), TypeDescriptor::Vague])
//!     .with_return_type(TypeDescriptor::class("java.lang.String"))
//!     .with_match_index(PositionRule::last())
//!     .find_in_super();
//!
//! assert!(criterion.is_active());
//! assert!(criterion.validate().is_ok());
//! ```

mod class;
mod member;
mod position;
mod predicates;
mod template;

pub use class::{
    CallableCriterion, ClassCriterion, NameMatch, NestedRule, NestedTarget, PackageScope,
};
pub use member::{
    AccessorKind, ConstructorCriterion, Evaluation, FunctionCriterion, MemberCriterion,
    MemberRules, MemberView, ParameterRules, PropertyCriterion,
};
pub use position::PositionRule;
pub use predicates::{
    CountPredicate, CountRule, ModifierPredicate, NamePredicate, NameRules, NamesPredicate,
    ParametersPredicate, TypePredicate,
};
pub use template::{RuleId, TemplateRegistry};
