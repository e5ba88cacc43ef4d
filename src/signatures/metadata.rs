use crate::{host::ClassInfo, Result};

/// A `(name, descriptor)` pair emitted by the compiler for a function or field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignatureData {
    /// JVM name of the function or field
    pub name: String,
    /// Method descriptor (`(I)V`) or field descriptor (`I`)
    pub descriptor: String,
}

impl SignatureData {
    /// Create a new signature pair
    #[must_use]
    pub fn new(name: &str, descriptor: &str) -> Self {
        SignatureData {
            name: name.to_string(),
            descriptor: descriptor.to_string(),
        }
    }
}

/// Compiler metadata of a property: up to five independently optional JVM signatures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PropertySignatureData {
    /// Source name of the property
    pub name: String,
    /// Backing field
    pub field: Option<SignatureData>,
    /// Getter method
    pub getter: Option<SignatureData>,
    /// Setter method
    pub setter: Option<SignatureData>,
    /// Method returning the delegate instance
    pub delegate: Option<SignatureData>,
    /// Synthetic method carrying annotations
    pub synthetic: Option<SignatureData>,
}

impl PropertySignatureData {
    /// A property with no sub-signatures yet.
    #[must_use]
    pub fn new(name: &str) -> Self {
        PropertySignatureData {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Sets the backing field signature.
    #[must_use]
    pub fn with_field(mut self, name: &str, descriptor: &str) -> Self {
        self.field = Some(SignatureData::new(name, descriptor));
        self
    }

    /// Sets the getter signature.
    #[must_use]
    pub fn with_getter(mut self, name: &str, descriptor: &str) -> Self {
        self.getter = Some(SignatureData::new(name, descriptor));
        self
    }

    /// Sets the setter signature.
    #[must_use]
    pub fn with_setter(mut self, name: &str, descriptor: &str) -> Self {
        self.setter = Some(SignatureData::new(name, descriptor));
        self
    }

    /// Sets the delegate method signature.
    #[must_use]
    pub fn with_delegate(mut self, name: &str, descriptor: &str) -> Self {
        self.delegate = Some(SignatureData::new(name, descriptor));
        self
    }

    /// Sets the synthetic method signature.
    #[must_use]
    pub fn with_synthetic(mut self, name: &str, descriptor: &str) -> Self {
        self.synthetic = Some(SignatureData::new(name, descriptor));
        self
    }
}

/// Source of compiler-emitted signature metadata.
///
/// The upstream format is opaque to the engine; implementations decode it into
/// [`SignatureData`] pairs.
pub trait MetadataSource: Send + Sync {
    /// Function signatures declared by `class`, in declaration order.
    ///
    /// # Errors
    /// Returns [`crate::Error::HostError`] if the metadata cannot be read.
    fn function_signatures(&self, class: &ClassInfo) -> Result<Vec<SignatureData>>;

    /// Property signatures declared by `class`, in declaration order.
    ///
    /// # Errors
    /// Returns [`crate::Error::HostError`] if the metadata cannot be read.
    fn property_signatures(&self, class: &ClassInfo) -> Result<Vec<PropertySignatureData>>;
}
