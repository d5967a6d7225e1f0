use crate::access_flags::ClassAccessFlags;
use crate::model::{
    Annotation, ClassSymbol, ClassType, Field, Method, ModuleDescriptor, TypeAnnotation,
    TypeParameter,
};
use std::rc::Rc;

/// Fully resolved class, ready to be written out
///
/// This is the root of the writer's input: everything the class file needs is
/// reachable from here, except constants referenced only from opaque bytecode
/// (those were interned into the shared pool by the code generator).
#[derive(Debug)]
pub struct Class {
    pub symbol: Rc<ClassSymbol>,
    pub access_flags: ClassAccessFlags,

    /// `None` only for `java/lang/Object` and `module-info`
    pub super_class: Option<ClassType>,

    pub interfaces: Vec<ClassType>,
    pub type_parameters: Vec<TypeParameter>,
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
    pub source_file: Option<String>,
    pub deprecated: bool,
    pub annotations: Vec<Annotation>,
    pub type_annotations: Vec<TypeAnnotation>,

    /// Present only when writing `module-info`
    pub module: Option<ModuleDescriptor>,
}

impl Class {
    pub fn new(
        symbol: Rc<ClassSymbol>,
        access_flags: ClassAccessFlags,
        super_class: Option<ClassType>,
    ) -> Class {
        Class {
            symbol,
            access_flags,
            super_class,
            interfaces: vec![],
            type_parameters: vec![],
            fields: vec![],
            methods: vec![],
            source_file: None,
            deprecated: false,
            annotations: vec![],
            type_annotations: vec![],
            module: None,
        }
    }

    /// True when the erased supertypes lose information a `Signature`
    /// attribute would preserve
    pub fn is_generic(&self) -> bool {
        !self.type_parameters.is_empty()
            || self
                .super_class
                .as_ref()
                .map_or(false, ClassType::is_generic)
            || self.interfaces.iter().any(ClassType::is_generic)
    }
}
