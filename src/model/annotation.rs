use crate::class_file::{TargetInfo, TypePathStep};
use crate::model::{ClassSymbol, Type};
use std::rc::Rc;

/// Whether an annotation survives into the runtime
///
/// `Runtime` retention lands in the `RuntimeVisible*` attributes, `Class`
/// retention in the `RuntimeInvisible*` ones. Source-retained annotations
/// never reach the writer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Retention {
    Runtime,
    Class,
}

/// Annotation in model form, values still symbolic
#[derive(Debug, Clone)]
pub struct Annotation {
    pub annotation_type: Rc<ClassSymbol>,
    pub retention: Retention,
    pub values: Vec<(String, ElementValue)>,
}

/// Value of an annotation element
#[derive(Debug, Clone)]
pub enum ElementValue {
    Boolean(bool),
    Byte(i8),
    Char(u16),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    EnumConstant {
        enum_type: Rc<ClassSymbol>,
        constant: String,
    },
    /// Class literal (`Foo.class`)
    Class(Type),
    Annotation(Box<Annotation>),
    Array(Vec<ElementValue>),
}

/// Annotation on a type use rather than a declaration
///
/// `target` is `None` when position resolution failed upstream; the writer
/// gets one chance to repair it from the declaration context before the
/// annotation is dropped.
#[derive(Debug, Clone)]
pub struct TypeAnnotation {
    pub annotation: Annotation,
    pub target: Option<TargetInfo>,
    pub path: Vec<TypePathStep>,
}
