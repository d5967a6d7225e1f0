use crate::access_flags::{MethodAccessFlags, MethodParameterAccessFlags};
use crate::descriptors::MethodDescriptor;
use crate::model::{Annotation, Code, ElementValue, Type, TypeAnnotation, TypeParameter};
use crate::names::UnqualifiedName;

/// Method in model form
#[derive(Debug)]
pub struct Method {
    pub name: UnqualifiedName,
    pub access_flags: MethodAccessFlags,
    pub type_parameters: Vec<TypeParameter>,
    pub parameters: Vec<Parameter>,

    /// `None` is `void`
    pub return_type: Option<Type>,

    pub thrown_types: Vec<Type>,
    pub code: Option<Code>,
    pub deprecated: bool,
    pub annotations: Vec<Annotation>,
    pub type_annotations: Vec<TypeAnnotation>,

    /// Default value, when this method is an annotation interface element
    pub annotation_default: Option<ElementValue>,
}

#[derive(Debug)]
pub struct Parameter {
    /// `None` for parameters with no recorded name (synthetic, or compiled
    /// without `-parameters`)
    pub name: Option<UnqualifiedName>,

    pub access_flags: MethodParameterAccessFlags,
    pub parameter_type: Type,
    pub annotations: Vec<Annotation>,
}

impl Method {
    pub fn new(
        name: UnqualifiedName,
        access_flags: MethodAccessFlags,
        parameters: Vec<Parameter>,
        return_type: Option<Type>,
    ) -> Method {
        Method {
            name,
            access_flags,
            type_parameters: vec![],
            parameters,
            return_type,
            thrown_types: vec![],
            code: None,
            deprecated: false,
            annotations: vec![],
            type_annotations: vec![],
            annotation_default: None,
        }
    }

    /// Erased descriptor of the method
    pub fn descriptor(&self) -> MethodDescriptor {
        MethodDescriptor {
            parameters: self
                .parameters
                .iter()
                .map(|parameter| parameter.parameter_type.erased())
                .collect(),
            return_type: self.return_type.as_ref().map(Type::erased),
        }
    }

    /// True when the erased descriptor loses information a `Signature`
    /// attribute would preserve
    pub fn is_generic(&self) -> bool {
        !self.type_parameters.is_empty()
            || self
                .parameters
                .iter()
                .any(|parameter| parameter.parameter_type.is_generic())
            || self.return_type.as_ref().map_or(false, Type::is_generic)
            || self.thrown_types.iter().any(Type::is_generic)
    }

    pub fn is_static(&self) -> bool {
        self.access_flags.contains(MethodAccessFlags::STATIC)
    }
}

impl Parameter {
    pub fn named(name: UnqualifiedName, parameter_type: Type) -> Parameter {
        Parameter {
            name: Some(name),
            access_flags: MethodParameterAccessFlags::empty(),
            parameter_type,
            annotations: vec![],
        }
    }
}
