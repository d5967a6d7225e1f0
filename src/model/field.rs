use crate::access_flags::FieldAccessFlags;
use crate::model::{Annotation, ConstValue, Type, TypeAnnotation};
use crate::names::UnqualifiedName;

/// Field in model form
#[derive(Debug)]
pub struct Field {
    pub name: UnqualifiedName,
    pub access_flags: FieldAccessFlags,
    pub field_type: Type,

    /// Emitted as a `ConstantValue` attribute (only meaningful on `static
    /// final` fields)
    pub constant_value: Option<ConstValue>,

    pub deprecated: bool,
    pub annotations: Vec<Annotation>,
    pub type_annotations: Vec<TypeAnnotation>,
}

impl Field {
    pub fn new(name: UnqualifiedName, access_flags: FieldAccessFlags, field_type: Type) -> Field {
        Field {
            name,
            access_flags,
            field_type,
            constant_value: None,
            deprecated: false,
            annotations: vec![],
            type_annotations: vec![],
        }
    }
}
