use std::fmt;

use crate::{typesystem::PrimitiveKind, Error::RecursionLimit, Result};

/// Maximum number of array dimensions a descriptor may declare
const MAX_ARRAY_DIMENSIONS: usize = 255;

/// A single decoded field or return descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DescriptorType {
    /// `Z`, `B`, `C`, `S`, `I`, `J`, `F`, `D` or `V`
    Primitive(PrimitiveKind),
    /// `L<binary-name>;`, stored with dots (`java.lang.String`)
    Object(String),
    /// `[` followed by the element descriptor
    Array(Box<DescriptorType>),
}

impl DescriptorType {
    /// Binary class name this descriptor refers to (`int`, `java.lang.String`, `[I`).
    #[must_use]
    pub fn class_name(&self) -> String {
        match self {
            DescriptorType::Primitive(kind) => kind.to_string(),
            DescriptorType::Object(name) => name.clone(),
            DescriptorType::Array(_) => self.to_string().replace('/', "."),
        }
    }
}

impl fmt::Display for DescriptorType {
    /// Writes the bit-exact descriptor form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorType::Primitive(kind) => write!(f, "{}", kind.code()),
            DescriptorType::Object(name) => write!(f, "L{};", name.replace('.', "/")),
            DescriptorType::Array(element) => write!(f, "[{element}"),
        }
    }
}

/// A decoded method descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    /// Parameter types in order
    pub params: Vec<DescriptorType>,
    /// Return type, `Primitive(Void)` for `V`
    pub return_type: DescriptorType,
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for param in &self.params {
            write!(f, "{param}")?;
        }
        write!(f, "){}", self.return_type)
    }
}

/// Cursor-based parser for JVM field and method descriptors.
///
/// # Example
///
/// ```rust
/// use memberscope::signatures::{DescriptorParser, DescriptorType};
/// use memberscope::typesystem::PrimitiveKind;
///
/// let mut parser = DescriptorParser::new("(I[Ljava/lang/String;)V");
/// let method = parser.parse_method_descriptor()?;
/// assert_eq!(method.params[0], DescriptorType::Primitive(PrimitiveKind::Int));
/// assert_eq!(method.params[1].class_name(), "[Ljava.lang.String;");
/// # Ok::<(), memberscope::Error>(())
/// ```
///
/// A parser instance is meant for a single descriptor.
pub struct DescriptorParser<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> DescriptorParser<'a> {
    /// Create a new `DescriptorParser` over a descriptor string
    #[must_use]
    pub fn new(descriptor: &'a str) -> Self {
        DescriptorParser {
            data: descriptor.as_bytes(),
            position: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.data.get(self.position).copied()
    }

    fn next(&mut self) -> Result<u8> {
        let byte = self.peek().ok_or_else(|| {
            malformed_error!("unexpected end of descriptor at offset {}", self.position)
        })?;
        self.position += 1;
        Ok(byte)
    }

    fn ensure_consumed(&self) -> Result<()> {
        if self.position == self.data.len() {
            Ok(())
        } else {
            Err(malformed_error!(
                "trailing data after offset {} in descriptor",
                self.position
            ))
        }
    }

    fn parse_type(&mut self, allow_void: bool) -> Result<DescriptorType> {
        let mut dimensions = 0;
        while self.peek() == Some(b'[') {
            self.position += 1;
            dimensions += 1;
            if dimensions > MAX_ARRAY_DIMENSIONS {
                return Err(RecursionLimit(MAX_ARRAY_DIMENSIONS));
            }
        }

        let start = self.position;
        let element = match self.next()? {
            b'L' => {
                let end = self.data[self.position..]
                    .iter()
                    .position(|byte| *byte == b';')
                    .ok_or_else(|| malformed_error!("unterminated class name at offset {}", start))?;
                let raw = &self.data[self.position..self.position + end];
                self.position += end + 1;

                if raw.is_empty() || raw.iter().any(|byte| matches!(byte, b'[' | b'(' | b')' | b'.')) {
                    return Err(malformed_error!("invalid class name at offset {}", start));
                }
                let name = String::from_utf8_lossy(raw).replace('/', ".");
                DescriptorType::Object(name)
            }
            code => match PrimitiveKind::from_code(char::from(code)) {
                Some(PrimitiveKind::Void) if !allow_void || dimensions > 0 => {
                    return Err(malformed_error!("void is not allowed at offset {}", start));
                }
                Some(kind) => DescriptorType::Primitive(kind),
                None => {
                    return Err(malformed_error!(
                        "unknown descriptor code '{}' at offset {}",
                        char::from(code),
                        start
                    ));
                }
            },
        };

        Ok((0..dimensions).fold(element, |inner, _| DescriptorType::Array(Box::new(inner))))
    }

    /// Parse a complete method descriptor, `(params)return`
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the descriptor does not start with `(`, lacks the
    /// closing `)`, contains unknown codes or has trailing data.
    pub fn parse_method_descriptor(&mut self) -> Result<MethodDescriptor> {
        if self.next()? != b'(' {
            return Err(malformed_error!("method descriptor must start with '('"));
        }

        let mut params = Vec::new();
        loop {
            match self.peek() {
                Some(b')') => {
                    self.position += 1;
                    break;
                }
                Some(_) => params.push(self.parse_type(false)?),
                None => return Err(malformed_error!("method descriptor lacks the closing ')'")),
            }
        }

        let return_type = self.parse_type(true)?;
        self.ensure_consumed()?;
        Ok(MethodDescriptor {
            params,
            return_type,
        })
    }

    /// Parse a complete field descriptor
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for unknown codes, `V`, or trailing data.
    pub fn parse_field_descriptor(&mut self) -> Result<DescriptorType> {
        let field = self.parse_type(false)?;
        self.ensure_consumed()?;
        Ok(field)
    }
}

/// Splits a method descriptor into its raw parameter substring and return substring.
///
/// `"(I[J)V"` yields `("I[J", "V")`. No validation beyond the parentheses is done.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if the descriptor does not start with `(` or has no `)`.
pub fn split_method_descriptor(descriptor: &str) -> Result<(&str, &str)> {
    let inner = descriptor
        .strip_prefix('(')
        .ok_or_else(|| malformed_error!("method descriptor must start with '(' - {}", descriptor))?;
    inner
        .split_once(')')
        .ok_or_else(|| malformed_error!("method descriptor lacks the closing ')' - {}", descriptor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn parse_primitive_and_object_params() {
        let method = DescriptorParser::new("(IZLjava/lang/String;)Ljava/util/List;")
            .parse_method_descriptor()
            .unwrap();

        assert_eq!(
            method.params,
            vec![
                DescriptorType::Primitive(PrimitiveKind::Int),
                DescriptorType::Primitive(PrimitiveKind::Boolean),
                DescriptorType::Object("java.lang.String".to_string()),
            ]
        );
        assert_eq!(method.return_type.class_name(), "java.util.List");
    }

    #[test]
    fn parse_arrays() {
        let method = DescriptorParser::new("([[I[Lcom/example/Outer$Inner;)V")
            .parse_method_descriptor()
            .unwrap();

        assert_eq!(method.params[0].class_name(), "[[I");
        assert_eq!(method.params[1].class_name(), "[Lcom.example.Outer$Inner;");
        assert_eq!(method.return_type, DescriptorType::Primitive(PrimitiveKind::Void));
    }

    #[test]
    fn display_is_bit_exact() {
        for descriptor in ["()V", "(I)Ljava/lang/String;", "([[J[Ljava/lang/Object;D)[B"] {
            let method = DescriptorParser::new(descriptor).parse_method_descriptor().unwrap();
            assert_eq!(method.to_string(), descriptor);
        }
    }

    #[test]
    fn field_descriptors() {
        assert_eq!(
            DescriptorParser::new("[Ljava/lang/String;").parse_field_descriptor().unwrap().class_name(),
            "[Ljava.lang.String;"
        );
        assert!(DescriptorParser::new("V").parse_field_descriptor().is_err());
        assert!(DescriptorParser::new("II").parse_field_descriptor().is_err());
    }

    #[test]
    fn test_error_handling() {
        for broken in [
            "(I",
            "I)V",
            "(Q)V",
            "(Ljava/lang/String)V",
            "(L;)V",
            "(V)V",
            "()",
            "()VV",
            "()[V",
        ] {
            let result = DescriptorParser::new(broken).parse_method_descriptor();
            assert!(matches!(result, Err(Error::Malformed { .. })), "{broken}");
        }
    }

    #[test]
    fn array_dimension_limit() {
        let descriptor = format!("({}I)V", "[".repeat(MAX_ARRAY_DIMENSIONS + 1));
        assert!(matches!(
            DescriptorParser::new(&descriptor).parse_method_descriptor(),
            Err(Error::RecursionLimit(_))
        ));
    }

    #[test]
    fn split_descriptor() {
        assert_eq!(split_method_descriptor("(I[J)V").unwrap(), ("I[J", "V"));
        assert_eq!(split_method_descriptor("()Ljava/lang/String;").unwrap(), ("", "Ljava/lang/String;"));
        assert!(split_method_descriptor("(I").is_err());
        assert!(split_method_descriptor("I)V").is_err());
    }
}
