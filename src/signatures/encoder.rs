//! Encoding of type descriptors into JVM descriptor strings.

use crate::{
    signatures::{DescriptorParser, DescriptorType, MethodDescriptor},
    typesystem::{normalize_class_name, PrimitiveKind, TypeDescriptor},
    Result,
};

/// Maps a normalized binary class name to its descriptor form.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if `name` is not a valid class name.
pub fn descriptor_for_class_name(name: &str) -> Result<DescriptorType> {
    let normalized = normalize_class_name(name)
        .map_err(|reason| malformed_error!("cannot encode class name [{}] - {}", name, reason))?;

    if normalized.starts_with('[') {
        return DescriptorParser::new(&normalized.replace('.', "/")).parse_field_descriptor();
    }
    Ok(match PrimitiveKind::from_keyword(&normalized) {
        Some(kind) => DescriptorType::Primitive(kind),
        None if normalized == "kotlin.Unit" => DescriptorType::Primitive(PrimitiveKind::Void),
        None => DescriptorType::Object(normalized),
    })
}

/// Encodes a single type by its erasure.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] for `Vague`, `Unresolved` and argument lists, which
/// have no descriptor form.
pub fn encode_type(ty: &TypeDescriptor) -> Result<DescriptorType> {
    let erased = ty
        .erasure()
        .ok_or_else(|| malformed_error!("type {} has no descriptor form", ty))?;
    descriptor_for_class_name(erased)
}

/// Encodes a method descriptor from parameter and return types.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if any type has no descriptor form, or a parameter is void.
pub fn encode_method_descriptor(
    params: &[TypeDescriptor],
    return_type: &TypeDescriptor,
) -> Result<String> {
    let params = params
        .iter()
        .map(|param| match encode_type(param)? {
            DescriptorType::Primitive(PrimitiveKind::Void) => {
                Err(malformed_error!("parameter type {} is void", param))
            }
            encoded => Ok(encoded),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(MethodDescriptor {
        params,
        return_type: encode_type(return_type)?,
    }
    .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        signatures::DescriptorParser,
        typesystem::{TypeProjection, TypeVariable},
        Error,
    };

    #[test]
    fn encode_then_decode_method() {
        let descriptor = encode_method_descriptor(
            &[TypeDescriptor::class("int")],
            &TypeDescriptor::class("java.lang.String"),
        )
        .unwrap();
        assert_eq!(descriptor, "(I)Ljava/lang/String;");

        let decoded = DescriptorParser::new(&descriptor)
            .parse_method_descriptor()
            .unwrap();
        assert_eq!(decoded.params[0].class_name(), "int");
        assert_eq!(decoded.return_type.class_name(), "java.lang.String");
    }

    #[test]
    fn generics_encode_by_erasure() {
        let list = TypeDescriptor::parameterized(
            "java.util.List",
            vec![TypeProjection::invariant(TypeDescriptor::class("java.lang.String"))],
        );
        let variable: TypeDescriptor = TypeVariable::new("T").into();

        assert_eq!(
            encode_method_descriptor(&[list, variable], &TypeDescriptor::class("kotlin.Unit")).unwrap(),
            "(Ljava/util/List;Ljava/lang/Object;)V"
        );
    }

    #[test]
    fn arrays_and_rejections() {
        assert_eq!(encode_type(&TypeDescriptor::class("[[I")).unwrap().to_string(), "[[I");
        assert!(matches!(encode_type(&TypeDescriptor::Vague), Err(Error::Malformed { .. })));
        assert!(encode_method_descriptor(&[TypeDescriptor::class("void")], &TypeDescriptor::class("void")).is_err());
    }
}
