use strum::{Display, EnumString};
use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The kind of member a query was looking for.
///
/// Used by [`Error::MemberNotFound`] and by the query-result cache to keep
/// results of different member kinds apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum MemberKind {
    /// A field or a language-level property
    Property,
    /// A method or a language-level function
    Function,
    /// A constructor
    Constructor,
}

/// Why a classloading context refused to produce a type.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum LoadError {
    /// The name is well-formed, but no such type exists in the context
    #[strum(to_string = "not found")]
    NotFound,
    /// The name cannot denote a type at all (empty, bad array syntax, ...)
    #[strum(to_string = "malformed name")]
    MalformedName,
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// # Error Categories
///
/// ## Lookup Errors
/// - [`Error::ClassNotFound`] - No class satisfied a class-level criterion
/// - [`Error::ClassLoadFailed`] - The classloading context could not load a named type
/// - [`Error::MemberNotFound`] - No member satisfied a member-level criterion
/// - [`Error::RemedyExhausted`] - Every alternative of a remedy plan failed
///
/// ## Caller Errors
/// - [`Error::InvalidRuleConfiguration`] - A criterion is contradictory or nonsensical
///
/// ## Signature Errors
/// - [`Error::Malformed`] - A descriptor string is syntactically broken
/// - [`Error::UnresolvedDescriptorType`] - A descriptor names a type that cannot be loaded
/// - [`Error::SignatureMissing`] - A signature support has no usable sub-signature
///
/// ## Host Errors
/// - [`Error::RecursionLimit`] - The superclass chain exceeded the configured depth
/// - [`Error::HostError`] - The host reflection capability reported a failure
///
/// # Examples
///
/// ```rust
/// use memberscope::{Error, MemberKind};
///
/// fn describe(err: &Error) -> &'static str {
///     match err {
///         Error::MemberNotFound { kind: MemberKind::Function, .. } => "no such function",
///         Error::InvalidRuleConfiguration(_) => "bad rules",
///         _ => "other",
///     }
/// }
/// # let _ = describe;
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// A descriptor string is damaged and could not be parsed.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// No class out of the searched candidates satisfied the class criterion.
    ///
    /// `templates` lists every active criterion, rendered for diagnostics.
    #[error("{}", render_not_found("class", .scope, .templates))]
    ClassNotFound {
        /// Description of the searched candidate set
        scope: String,
        /// Rendered criteria that were active during the search
        templates: Vec<String>,
    },

    /// The classloading context failed to produce the named type.
    #[error("Failed to load class [{name}] - {reason}")]
    ClassLoadFailed {
        /// The requested name, as passed by the caller
        name: String,
        /// Distinguishes missing types from malformed names
        reason: LoadError,
    },

    /// No member satisfied the member criterion after the superclass chain was exhausted.
    #[error("{}", render_not_found(.kind, .class, .templates))]
    MemberNotFound {
        /// Which member kind was searched
        kind: MemberKind,
        /// Name of the class the search started at
        class: String,
        /// Rendered criteria that were active during the search
        templates: Vec<String>,
    },

    /// A criterion is contradictory or nonsensical and was rejected before any scan.
    ///
    /// Examples are a parameter-type list made up only of wildcards, or a
    /// parameter count smaller than the number of explicit parameter types.
    #[error("Invalid rule configuration - {0}")]
    InvalidRuleConfiguration(String),

    /// A well-formed descriptor names a type the classloading context cannot resolve.
    #[error("Unresolved descriptor type [{descriptor}] - {reason}")]
    UnresolvedDescriptorType {
        /// The descriptor (or descriptor fragment) that failed
        descriptor: String,
        /// Why resolution failed
        reason: String,
    },

    /// A signature support was asked for a value none of its sub-signatures can provide.
    #[error("Signature is not present - {0}")]
    SignatureMissing(String),

    /// Every alternative of a remedy plan failed; all collected errors are kept in order.
    #[error("Remedy plan failed after {} attempts", .0.len())]
    RemedyExhausted(Vec<Error>),

    /// Reach the maximum recursion level allowed.
    ///
    /// Raised when the superclass chain is deeper than the configured limit,
    /// which also guards against cyclic hierarchies reported by a faulty host.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    /// The host reflection capability failed.
    #[error("{0}")]
    HostError(String),
}

impl Error {
    /// Returns `true` for the not-found family of errors.
    ///
    /// Remedy plans and non-throwing accessors use this to tell a failed
    /// lookup apart from a caller mistake.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::ClassNotFound { .. }
            | Error::MemberNotFound { .. }
            | Error::ClassLoadFailed { .. } => true,
            Error::RemedyExhausted(errors) => errors.iter().all(Error::is_not_found),
            _ => false,
        }
    }
}

fn render_not_found(kind: impl std::fmt::Display, scope: &str, templates: &[String]) -> String {
    let mut message = format!("Can't find this {kind} in [{scope}]:");
    if templates.is_empty() {
        message.push_str("\n -> <no rules>");
    }
    for template in templates {
        message.push_str("\n -> ");
        message.push_str(template);
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_not_found_lists_every_template() {
        let err = Error::MemberNotFound {
            kind: MemberKind::Function,
            class: "com.example.Foo".to_string(),
            templates: vec!["name:[bar]".to_string(), "paramCount:[2]".to_string()],
        };

        assert_eq!(
            err.to_string(),
            "Can't find this function in [com.example.Foo]:\n -> name:[bar]\n -> paramCount:[2]"
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn empty_templates_are_marked() {
        let err = Error::ClassNotFound {
            scope: "3 candidates".to_string(),
            templates: Vec::new(),
        };
        assert!(err.to_string().ends_with("-> <no rules>"));
    }

    #[test]
    fn remedy_errors_are_not_found_only_if_all_are() {
        let lookup = Error::ClassNotFound {
            scope: "x".to_string(),
            templates: Vec::new(),
        };
        let config = Error::InvalidRuleConfiguration("bad".to_string());

        assert!(Error::RemedyExhausted(vec![lookup]).is_not_found());
        assert!(!Error::RemedyExhausted(vec![config]).is_not_found());
    }

    #[test]
    fn malformed_macro_records_location() {
        let err = malformed_error!("unexpected '{}'", 'Q');
        match err {
            Error::Malformed { message, file, .. } => {
                assert_eq!(message, "unexpected 'Q'");
                assert!(file.ends_with("error.rs"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn member_kind_display() {
        assert_eq!(MemberKind::Constructor.to_string(), "constructor");
        assert_eq!(LoadError::MalformedName.to_string(), "malformed name");
    }
}
