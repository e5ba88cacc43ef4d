//! JVM primitive kinds and qualified-name normalization.
//!
//! Names flowing through the engine use the runtime's binary-name form: primitives by
//! keyword (`int`), objects by dotted name (`java.lang.String`), arrays in descriptor
//! form with dots (`[I`, `[Ljava.lang.String;`). [`normalize_class_name`] turns the
//! spellings callers commonly use (`int[]`, `java/lang/String`) into that form.

use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::LoadError;

/// Name of the root object type, used as the erasure of unbounded type variables.
pub const OBJECT_CLASS: &str = "java.lang.Object";

/// The spellings of "no value" that compare equal to each other.
const UNIT_LIKE: [&str; 3] = ["void", "java.lang.Void", "kotlin.Unit"];

/// The primitive types of the JVM, including `void`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum PrimitiveKind {
    /// `Z`
    Boolean,
    /// `B`
    Byte,
    /// `C`
    Char,
    /// `S`
    Short,
    /// `I`
    Int,
    /// `J`
    Long,
    /// `F`
    Float,
    /// `D`
    Double,
    /// `V`, only valid as a return type
    Void,
}

impl PrimitiveKind {
    /// Single-letter descriptor code of this primitive.
    #[must_use]
    pub fn code(self) -> char {
        match self {
            PrimitiveKind::Boolean => 'Z',
            PrimitiveKind::Byte => 'B',
            PrimitiveKind::Char => 'C',
            PrimitiveKind::Short => 'S',
            PrimitiveKind::Int => 'I',
            PrimitiveKind::Long => 'J',
            PrimitiveKind::Float => 'F',
            PrimitiveKind::Double => 'D',
            PrimitiveKind::Void => 'V',
        }
    }

    /// Looks up a primitive by its descriptor code.
    #[must_use]
    pub fn from_code(code: char) -> Option<Self> {
        PrimitiveKind::iter().find(|kind| kind.code() == code)
    }

    /// Looks up a primitive by its source keyword (`int`, `boolean`, ...).
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        keyword.parse().ok()
    }

    /// Fully qualified name of the boxed wrapper class.
    #[must_use]
    pub fn wrapper(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "java.lang.Boolean",
            PrimitiveKind::Byte => "java.lang.Byte",
            PrimitiveKind::Char => "java.lang.Character",
            PrimitiveKind::Short => "java.lang.Short",
            PrimitiveKind::Int => "java.lang.Integer",
            PrimitiveKind::Long => "java.lang.Long",
            PrimitiveKind::Float => "java.lang.Float",
            PrimitiveKind::Double => "java.lang.Double",
            PrimitiveKind::Void => "java.lang.Void",
        }
    }
}

/// Returns `true` if `name` is one of the equivalent "no value" types.
#[must_use]
pub fn is_unit_like(name: &str) -> bool {
    UNIT_LIKE.contains(&name)
}

/// Compares two normalized class names, treating all unit-like names as equal.
#[must_use]
pub fn class_names_eq(left: &str, right: &str) -> bool {
    left == right || (is_unit_like(left) && is_unit_like(right))
}

/// Normalizes a caller-supplied class name to binary-name form.
///
/// Accepts primitive keywords, dotted or slashed names, any number of `[]` suffixes and
/// names already in `[`-prefixed descriptor form.
///
/// # Errors
/// Returns [`LoadError::MalformedName`] for empty names, dangling brackets, `void[]` and
/// `[`-prefixed names with a broken element part.
pub fn normalize_class_name(name: &str) -> Result<String, LoadError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LoadError::MalformedName);
    }

    if name.starts_with('[') {
        return normalize_array_descriptor(name);
    }

    let mut element = name;
    let mut dimensions = 0;
    while let Some(stripped) = element.strip_suffix("[]") {
        element = stripped.trim_end();
        dimensions += 1;
    }

    if element.is_empty() || element.contains(['[', ']', ';']) {
        return Err(LoadError::MalformedName);
    }

    let element = element.replace('/', ".");
    if dimensions == 0 {
        return Ok(element);
    }

    let mut normalized = "[".repeat(dimensions);
    match PrimitiveKind::from_keyword(&element) {
        Some(PrimitiveKind::Void) => return Err(LoadError::MalformedName),
        Some(kind) => normalized.push(kind.code()),
        None => {
            normalized.push('L');
            normalized.push_str(&element);
            normalized.push(';');
        }
    }
    Ok(normalized)
}

fn normalize_array_descriptor(name: &str) -> Result<String, LoadError> {
    let element = name.trim_start_matches('[');
    let mut chars = element.chars();
    let valid = match chars.next() {
        Some('L') => element.len() > 2 && element.ends_with(';') && !element[1..].contains('['),
        Some(code) => chars.next().is_none() && PrimitiveKind::from_code(code).is_some() && code != 'V',
        None => false,
    };

    if valid {
        Ok(name.replace('/', "."))
    } else {
        Err(LoadError::MalformedName)
    }
}
