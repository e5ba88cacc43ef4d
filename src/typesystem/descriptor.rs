use std::fmt;

use strum::{Display, EnumString};

use crate::{
    typesystem::primitives::{normalize_class_name, OBJECT_CLASS},
    Error, Result,
};

/// Declared variance of a type argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum Variance {
    /// Contravariant (`in T`, `? super T`)
    #[strum(serialize = "in")]
    In,
    /// Covariant (`out T`, `? extends T`)
    #[strum(serialize = "out")]
    Out,
    /// Invariant (`T`)
    #[strum(serialize = "invariant")]
    Invariant,
}

/// A type argument: either the star projection or a type paired with a variance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeProjection {
    /// `*` / `?`
    Star,
    /// A concrete argument. The inner type may be [`TypeDescriptor::Vague`] to only pin variance.
    Typed {
        /// Declared variance of the argument
        variance: Variance,
        /// The argument type
        inner: Box<TypeDescriptor>,
    },
}

impl TypeProjection {
    /// An invariant projection of `inner`.
    #[must_use]
    pub fn invariant(inner: TypeDescriptor) -> Self {
        Self::with_variance(Variance::Invariant, inner)
    }

    /// A covariant (`out`) projection of `inner`.
    #[must_use]
    pub fn covariant(inner: TypeDescriptor) -> Self {
        Self::with_variance(Variance::Out, inner)
    }

    /// A contravariant (`in`) projection of `inner`.
    #[must_use]
    pub fn contravariant(inner: TypeDescriptor) -> Self {
        Self::with_variance(Variance::In, inner)
    }

    /// A projection with an explicit variance.
    #[must_use]
    pub fn with_variance(variance: Variance, inner: TypeDescriptor) -> Self {
        TypeProjection::Typed {
            variance,
            inner: Box::new(inner),
        }
    }

    /// The declared variance, `None` for the star projection.
    #[must_use]
    pub fn variance(&self) -> Option<Variance> {
        match self {
            TypeProjection::Star => None,
            TypeProjection::Typed { variance, .. } => Some(*variance),
        }
    }
}

/// A type variable declared on a class or function, e.g. `T : Comparable<T>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeVariable {
    /// Declared name (`T`)
    pub name: String,
    /// Upper bounds in declaration order, empty for an unbounded variable
    pub bounds: Vec<TypeDescriptor>,
}

impl TypeVariable {
    /// An unbounded type variable.
    #[must_use]
    pub fn new(name: &str) -> Self {
        TypeVariable {
            name: name.to_string(),
            bounds: Vec::new(),
        }
    }

    /// Adds an upper bound.
    #[must_use]
    pub fn bounded_by(mut self, bound: TypeDescriptor) -> Self {
        self.bounds.push(bound);
        self
    }

    /// Raw class this variable erases to: its first bound, or the root object type.
    #[must_use]
    pub fn erasure(&self) -> &str {
        self.bounds
            .first()
            .and_then(TypeDescriptor::erasure)
            .unwrap_or(OBJECT_CLASS)
    }
}

/// What a parameterized type is built on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Classifier {
    /// A class, by normalized name
    Class(String),
    /// A type variable used as a type (`T?`)
    Parameter(TypeVariable),
}

impl Classifier {
    /// Raw class name this classifier erases to.
    #[must_use]
    pub fn erasure(&self) -> &str {
        match self {
            Classifier::Class(name) => name,
            Classifier::Parameter(variable) => variable.erasure(),
        }
    }
}

/// A use of a class or type variable with its arguments, nullability and annotations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterizedType {
    /// The raw classifier
    pub classifier: Classifier,
    /// Type arguments in declaration order
    pub arguments: Vec<TypeProjection>,
    /// Whether the type is marked nullable
    pub nullable: bool,
    /// Fully qualified names of annotations on this type use
    pub annotations: Vec<String>,
}

/// One element of an explicit argument pattern list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArgumentPattern {
    /// Matches a projection by variance and inner type
    Projection(TypeProjection),
    /// Matches any argument declared with this variance
    Variance(Variance),
}

/// An ordered list of argument patterns, matched positionally against a type's arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct GenericArguments {
    patterns: Vec<ArgumentPattern>,
}

impl GenericArguments {
    /// Builds a pattern list.
    #[must_use]
    pub fn new(patterns: Vec<ArgumentPattern>) -> Self {
        GenericArguments { patterns }
    }

    /// Number of patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns `true` if there are no patterns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Returns `true` if `pattern` is part of this list.
    #[must_use]
    pub fn contains(&self, pattern: &ArgumentPattern) -> bool {
        self.patterns.contains(pattern)
    }

    /// Returns `true` if every element of `patterns` is part of this list.
    #[must_use]
    pub fn contains_all(&self, patterns: &[ArgumentPattern]) -> bool {
        patterns.iter().all(|pattern| self.contains(pattern))
    }

    /// Iterates the patterns in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ArgumentPattern> {
        self.patterns.iter()
    }
}

impl<'a> IntoIterator for &'a GenericArguments {
    type Item = &'a ArgumentPattern;
    type IntoIter = std::slice::Iter<'a, ArgumentPattern>;

    fn into_iter(self) -> Self::IntoIter {
        self.patterns.iter()
    }
}

/// Every representation a "type" can take when matching members.
///
/// `Vague` matches anything, `Unresolved` matches nothing and is rejected by rule
/// validation. Names inside `ClassRef` and `Classifier::Class` are expected in
/// normalized binary-name form, see [`TypeDescriptor::from_name`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    /// A raw class reference, no generic information
    ClassRef(String),
    /// A parameterized use of a class or type variable
    Parameterized(ParameterizedType),
    /// A single type argument with variance
    Projection(TypeProjection),
    /// A declared type variable
    TypeVariable(TypeVariable),
    /// An explicit argument pattern list, matched against a parameterized type's arguments
    ArgumentList(GenericArguments),
    /// Matches any type
    Vague,
    /// A type named by metadata that could not be loaded, carries the failing name
    Unresolved(String),
}

impl TypeDescriptor {
    /// Builds a class reference from a caller-supplied name.
    ///
    /// This is the single normalization point for textual type names: primitive keywords,
    /// slashed names, `[]` suffixes and `[`-prefixed array names are all accepted.
    ///
    /// # Errors
    /// Returns [`Error::InvalidRuleConfiguration`] if `name` is malformed.
    pub fn from_name(name: &str) -> Result<Self> {
        normalize_class_name(name)
            .map(TypeDescriptor::ClassRef)
            .map_err(|reason| {
                Error::InvalidRuleConfiguration(format!("type name [{name}] - {reason}"))
            })
    }

    /// A class reference for an already normalized name.
    #[must_use]
    pub fn class(name: &str) -> Self {
        TypeDescriptor::ClassRef(name.to_string())
    }

    /// A non-null parameterized class type.
    #[must_use]
    pub fn parameterized(class: &str, arguments: Vec<TypeProjection>) -> Self {
        TypeDescriptor::Parameterized(ParameterizedType {
            classifier: Classifier::Class(class.to_string()),
            arguments,
            nullable: false,
            annotations: Vec::new(),
        })
    }

    /// A type variable reference.
    #[must_use]
    pub fn variable(variable: TypeVariable) -> Self {
        TypeDescriptor::TypeVariable(variable)
    }

    /// Marks a parameterized type as nullable; other variants are returned unchanged.
    #[must_use]
    pub fn nullable(self) -> Self {
        match self {
            TypeDescriptor::Parameterized(mut ty) => {
                ty.nullable = true;
                TypeDescriptor::Parameterized(ty)
            }
            other => other,
        }
    }

    /// Attaches an annotation to a parameterized type; other variants are returned unchanged.
    #[must_use]
    pub fn annotated(self, annotation: &str) -> Self {
        match self {
            TypeDescriptor::Parameterized(mut ty) => {
                ty.annotations.push(annotation.to_string());
                TypeDescriptor::Parameterized(ty)
            }
            other => other,
        }
    }

    /// Returns `true` for the wildcard sentinel.
    #[must_use]
    pub fn is_vague(&self) -> bool {
        matches!(self, TypeDescriptor::Vague)
    }

    /// Returns `true` for a type that failed to load.
    #[must_use]
    pub fn is_unresolved(&self) -> bool {
        matches!(self, TypeDescriptor::Unresolved(_))
    }

    /// Raw class name this type erases to, if it has one.
    ///
    /// The star projection erases to the root object type. `Vague`, `Unresolved` and
    /// argument lists have no erasure.
    #[must_use]
    pub fn erasure(&self) -> Option<&str> {
        match self {
            TypeDescriptor::ClassRef(name) => Some(name),
            TypeDescriptor::Parameterized(ty) => Some(ty.classifier.erasure()),
            TypeDescriptor::TypeVariable(variable) => Some(variable.erasure()),
            TypeDescriptor::Projection(TypeProjection::Star) => Some(OBJECT_CLASS),
            TypeDescriptor::Projection(TypeProjection::Typed { inner, .. }) => inner.erasure(),
            TypeDescriptor::ArgumentList(_)
            | TypeDescriptor::Vague
            | TypeDescriptor::Unresolved(_) => None,
        }
    }
}

impl From<TypeProjection> for TypeDescriptor {
    fn from(projection: TypeProjection) -> Self {
        TypeDescriptor::Projection(projection)
    }
}

impl From<TypeVariable> for TypeDescriptor {
    fn from(variable: TypeVariable) -> Self {
        TypeDescriptor::TypeVariable(variable)
    }
}

impl fmt::Display for TypeProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeProjection::Star => write!(f, "*"),
            TypeProjection::Typed {
                variance: Variance::Invariant,
                inner,
            } => write!(f, "{inner}"),
            TypeProjection::Typed { variance, inner } => write!(f, "{variance} {inner}"),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::ClassRef(name) => write!(f, "{name}"),
            TypeDescriptor::Parameterized(ty) => {
                match &ty.classifier {
                    Classifier::Class(name) => write!(f, "{name}")?,
                    Classifier::Parameter(variable) => write!(f, "{}", variable.name)?,
                }
                if !ty.arguments.is_empty() {
                    let arguments: Vec<String> =
                        ty.arguments.iter().map(ToString::to_string).collect();
                    write!(f, "<{}>", arguments.join(", "))?;
                }
                if ty.nullable {
                    write!(f, "?")?;
                }
                Ok(())
            }
            TypeDescriptor::Projection(projection) => write!(f, "{projection}"),
            TypeDescriptor::TypeVariable(variable) => write!(f, "{}", variable.name),
            TypeDescriptor::ArgumentList(list) => {
                let patterns: Vec<String> = list
                    .iter()
                    .map(|pattern| match pattern {
                        ArgumentPattern::Projection(projection) => projection.to_string(),
                        ArgumentPattern::Variance(variance) => variance.to_string(),
                    })
                    .collect();
                write!(f, "[{}]", patterns.join(", "))
            }
            TypeDescriptor::Vague => write!(f, "Vague"),
            TypeDescriptor::Unresolved(name) => write!(f, "<unresolved {name}>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_normalizes() {
        assert_eq!(
            TypeDescriptor::from_name("java/lang/String[]").unwrap(),
            TypeDescriptor::class("[Ljava.lang.String;")
        );
        assert!(matches!(
            TypeDescriptor::from_name("int]"),
            Err(Error::InvalidRuleConfiguration(_))
        ));
    }

    #[test]
    fn erasure_of_variables_and_projections() {
        let unbounded = TypeVariable::new("T");
        assert_eq!(unbounded.erasure(), OBJECT_CLASS);

        let bounded = TypeVariable::new("T").bounded_by(TypeDescriptor::parameterized(
            "java.lang.Comparable",
            vec![TypeProjection::Star],
        ));
        assert_eq!(bounded.erasure(), "java.lang.Comparable");

        let projection: TypeDescriptor =
            TypeProjection::covariant(TypeDescriptor::class("java.lang.Number")).into();
        assert_eq!(projection.erasure(), Some("java.lang.Number"));
        assert_eq!(TypeDescriptor::Vague.erasure(), None);
    }

    #[test]
    fn display_forms() {
        let list = TypeDescriptor::parameterized(
            "java.util.Map",
            vec![
                TypeProjection::invariant(TypeDescriptor::class("java.lang.String")),
                TypeProjection::covariant(TypeDescriptor::class("java.lang.Number")),
            ],
        )
        .nullable();
        assert_eq!(
            list.to_string(),
            "java.util.Map<java.lang.String, out java.lang.Number>?"
        );
        assert_eq!(
            TypeDescriptor::parameterized("java.util.List", vec![TypeProjection::Star])
                .to_string(),
            "java.util.List<*>"
        );
    }

    #[test]
    fn argument_list_forwards_contains() {
        let pattern = ArgumentPattern::Variance(Variance::Out);
        let list = GenericArguments::new(vec![pattern.clone()]);
        assert!(list.contains(&pattern));
        assert!(!list.contains_all(&[pattern, ArgumentPattern::Variance(Variance::In)]));
        assert_eq!((&list).into_iter().count(), 1);
    }

    #[test]
    fn variance_parses() {
        assert_eq!("out".parse::<Variance>().unwrap(), Variance::Out);
        assert_eq!(Variance::In.to_string(), "in");
    }
}
