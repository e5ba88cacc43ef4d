//! JVM descriptor decoding and compiler-metadata signatures.
//!
//! Reflection alone cannot tell apart overloads that only differ in erased generics, or
//! members whose source names the compiler mangled. Compilers therefore emit
//! `(name, descriptor)` pairs that pin a member exactly. This module decodes those pairs and
//! resolves them to loaded classes and runtime members.
//!
//! # Key Components
//!
//! - [`DescriptorParser`]: Cursor-based parser for field and method descriptors
//! - [`encode_method_descriptor`]: The reverse direction, from type descriptors
//! - [`MetadataSource`]: Where the `(name, descriptor)` pairs come from
//! - [`FunctionSignature`] / [`FieldSignature`] / [`PropertySignature`]: Lazily resolving supports
//!
//! # Descriptor Format
//!
//! ```text
//! method     := '(' field* ')' (field | 'V')
//! field      := primitive | 'L' binary-name ';' | '[' field
//! primitive  := 'Z' | 'B' | 'C' | 'S' | 'I' | 'J' | 'F' | 'D'
//! ```
//!
//! Binary names use `/` as package separator on the wire and `.` everywhere else.

mod encoder;
mod metadata;
mod parser;
mod support;

pub use encoder::{descriptor_for_class_name, encode_method_descriptor, encode_type};
pub use metadata::{MetadataSource, PropertySignatureData, SignatureData};
pub use parser::{split_method_descriptor, DescriptorParser, DescriptorType, MethodDescriptor};
pub use support::{FieldSignature, FunctionSignature, PropertySignature, SignatureScope};
