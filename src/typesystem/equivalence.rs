//! Structural type equivalence.
//!
//! [`type_eq`] is asymmetric: the `compare` side is the pattern written by the caller and
//! decides which rule applies, the `original` side is what the host reported for a member.
//! `Vague` on either side always matches, `Unresolved` on either side never does.

use crate::{
    typesystem::{
        primitives::class_names_eq, ArgumentPattern, Classifier, GenericArguments,
        ParameterizedType, TypeDescriptor, TypeProjection, TypeVariable,
    },
    Error, Result,
};

/// Optional clauses applied on top of the structural comparison.
///
/// A disabled clause is skipped entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Strictness {
    /// Compare declared variance of projections
    pub check_variance: bool,
    /// Require equal nullability of parameterized types
    pub check_nullability: bool,
    /// Require equal annotation sets of parameterized types
    pub check_annotations: bool,
}

impl Default for Strictness {
    fn default() -> Self {
        Strictness {
            check_variance: true,
            check_nullability: false,
            check_annotations: false,
        }
    }
}

impl Strictness {
    /// Every optional clause disabled.
    #[must_use]
    pub fn lenient() -> Self {
        Strictness {
            check_variance: false,
            check_nullability: false,
            check_annotations: false,
        }
    }

    /// Every optional clause enabled.
    #[must_use]
    pub fn strict() -> Self {
        Strictness {
            check_variance: true,
            check_nullability: true,
            check_annotations: true,
        }
    }
}

/// Decides whether `compare` denotes the same type as `original`.
#[must_use]
pub fn type_eq(compare: &TypeDescriptor, original: &TypeDescriptor, strictness: &Strictness) -> bool {
    if compare.is_vague() || original.is_vague() {
        return true;
    }
    if compare.is_unresolved() || original.is_unresolved() {
        return false;
    }
    if compare == original {
        return true;
    }

    match compare {
        TypeDescriptor::ClassRef(name) => match original {
            TypeDescriptor::ClassRef(other) => class_names_eq(name, other),
            TypeDescriptor::Parameterized(_)
            | TypeDescriptor::TypeVariable(_)
            | TypeDescriptor::Projection(TypeProjection::Typed { .. }) => original
                .erasure()
                .is_some_and(|erased| class_names_eq(name, erased)),
            _ => false,
        },
        TypeDescriptor::Projection(projection) => match original {
            TypeDescriptor::Projection(other) => projection_eq(projection, other, strictness),
            TypeDescriptor::Parameterized(ty) => ty
                .arguments
                .first()
                .is_some_and(|first| projection_eq(projection, first, strictness)),
            _ => false,
        },
        TypeDescriptor::Parameterized(ty) => match original {
            TypeDescriptor::Parameterized(other) => parameterized_eq(ty, other, strictness),
            TypeDescriptor::ClassRef(other) => {
                ty.arguments.is_empty() && class_names_eq(ty.classifier.erasure(), other)
            }
            TypeDescriptor::TypeVariable(variable) => match &ty.classifier {
                Classifier::Parameter(own) => ty.arguments.is_empty() && variable_eq(own, variable, strictness),
                Classifier::Class(_) => false,
            },
            _ => false,
        },
        TypeDescriptor::TypeVariable(variable) => match original {
            TypeDescriptor::TypeVariable(other) => variable_eq(variable, other, strictness),
            TypeDescriptor::Parameterized(ParameterizedType {
                classifier: Classifier::Parameter(other),
                ..
            }) => variable_eq(variable, other, strictness),
            TypeDescriptor::ClassRef(other) => class_names_eq(variable.erasure(), other),
            _ => false,
        },
        TypeDescriptor::ArgumentList(patterns) => match original {
            TypeDescriptor::Parameterized(ty) => {
                arguments_match(patterns, &ty.arguments, strictness)
            }
            TypeDescriptor::ArgumentList(other) => {
                patterns.len() == other.len()
                    && patterns
                        .iter()
                        .zip(other.iter())
                        .all(|(left, right)| pattern_eq(left, right, strictness))
            }
            _ => false,
        },
        TypeDescriptor::Vague | TypeDescriptor::Unresolved(_) => false,
    }
}

/// Positional equivalence of parameter type lists.
///
/// # Errors
/// Returns [`Error::InvalidRuleConfiguration`] if `compare` is non-empty, has the same length
/// as `original` and consists solely of `Vague`.
pub fn param_types_eq(
    compare: &[TypeDescriptor],
    original: &[TypeDescriptor],
    strictness: &Strictness,
) -> Result<bool> {
    if compare.is_empty() && original.is_empty() {
        return Ok(true);
    }
    if compare.len() != original.len() {
        return Ok(false);
    }
    if compare.iter().all(TypeDescriptor::is_vague) {
        return Err(Error::InvalidRuleConfiguration(
            "parameter types consist solely of Vague".to_string(),
        ));
    }

    Ok(compare
        .iter()
        .zip(original)
        .all(|(left, right)| type_eq(left, right, strictness)))
}

/// Positional equivalence of parameter names.
///
/// `""`, `"null"` and `"*"` in `compare` match any name, including a missing one.
/// Missing names in `original` only match those wildcards.
#[must_use]
pub fn param_names_eq(compare: &[String], original: &[Option<String>]) -> bool {
    compare.len() == original.len()
        && compare
            .iter()
            .zip(original)
            .all(|(wanted, actual)| match wanted.as_str() {
                "" | "null" | "*" => true,
                name => actual.as_deref() == Some(name),
            })
}

fn projection_eq(compare: &TypeProjection, original: &TypeProjection, strictness: &Strictness) -> bool {
    match (compare, original) {
        (TypeProjection::Star, TypeProjection::Star) => true,
        (
            TypeProjection::Typed { variance, inner },
            TypeProjection::Typed {
                variance: other_variance,
                inner: other_inner,
            },
        ) => {
            (!strictness.check_variance || variance == other_variance)
                && type_eq(inner, other_inner, strictness)
        }
        _ => false,
    }
}

fn parameterized_eq(
    compare: &ParameterizedType,
    original: &ParameterizedType,
    strictness: &Strictness,
) -> bool {
    let classifier = match (&compare.classifier, &original.classifier) {
        (Classifier::Class(left), Classifier::Class(right)) => class_names_eq(left, right),
        (Classifier::Parameter(left), Classifier::Parameter(right)) => {
            variable_eq(left, right, strictness)
        }
        _ => false,
    };

    classifier
        && compare.arguments.len() == original.arguments.len()
        && compare
            .arguments
            .iter()
            .zip(&original.arguments)
            .all(|(left, right)| projection_eq(left, right, strictness))
        && (!strictness.check_nullability || compare.nullable == original.nullable)
        && (!strictness.check_annotations || same_annotations(&compare.annotations, &original.annotations))
}

fn variable_eq(compare: &TypeVariable, original: &TypeVariable, strictness: &Strictness) -> bool {
    compare.name == original.name
        && compare.bounds.len() == original.bounds.len()
        && compare
            .bounds
            .iter()
            .zip(&original.bounds)
            .all(|(left, right)| type_eq(left, right, strictness))
}

fn arguments_match(
    patterns: &GenericArguments,
    arguments: &[TypeProjection],
    strictness: &Strictness,
) -> bool {
    patterns.len() == arguments.len()
        && patterns
            .iter()
            .zip(arguments)
            .all(|(pattern, argument)| match pattern {
                ArgumentPattern::Projection(projection) => {
                    projection_eq(projection, argument, strictness)
                }
                // A bare variance pattern exists only to pin variance, so it is always checked.
                ArgumentPattern::Variance(variance) => argument.variance() == Some(*variance),
            })
}

fn pattern_eq(compare: &ArgumentPattern, original: &ArgumentPattern, strictness: &Strictness) -> bool {
    match (compare, original) {
        (ArgumentPattern::Projection(left), ArgumentPattern::Projection(right)) => {
            projection_eq(left, right, strictness)
        }
        (ArgumentPattern::Variance(variance), ArgumentPattern::Projection(projection))
        | (ArgumentPattern::Projection(projection), ArgumentPattern::Variance(variance)) => {
            projection.variance() == Some(*variance)
        }
        (ArgumentPattern::Variance(left), ArgumentPattern::Variance(right)) => left == right,
    }
}

/// Annotation lists compare as multisets: order is irrelevant, repetitions are not.
fn same_annotations(left: &[String], right: &[String]) -> bool {
    let mut left = left.iter().collect::<Vec<_>>();
    let mut right = right.iter().collect::<Vec<_>>();
    left.sort_unstable();
    right.sort_unstable();
    left == right
}
