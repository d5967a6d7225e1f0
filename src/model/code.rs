use crate::model::{ClassType, Type, TypeAnnotation};
use crate::names::UnqualifiedName;

/// Body of a method
///
/// The bytecode itself is opaque: the code generator serialized it against
/// the same constant pool that is later handed to the writer, so every index
/// baked into `bytecode` stays valid.
#[derive(Debug)]
pub struct Code {
    pub max_stack: u16,
    pub max_locals: u16,
    pub bytecode: Vec<u8>,
    pub exception_table: Vec<ExceptionTableEntry>,

    /// Frames at branch targets, in increasing `pc` order
    pub frames: Vec<FrameSnapshot>,

    pub line_numbers: Vec<LineNumberEntry>,
    pub local_variables: Vec<LocalVariableEntry>,
    pub type_annotations: Vec<TypeAnnotation>,
}

#[derive(Debug)]
pub struct ExceptionTableEntry {
    pub start_pc: u16,
    pub end_pc: u16,
    pub handler_pc: u16,

    /// `None` for a catch-all handler
    pub catch_type: Option<ClassType>,
}

#[derive(Debug)]
pub struct LineNumberEntry {
    pub start_pc: u16,
    pub line_number: u16,
}

#[derive(Debug)]
pub struct LocalVariableEntry {
    pub name: UnqualifiedName,
    pub var_type: Type,
    pub start_pc: u16,
    pub length: u16,
    pub index: u16,
}

/// Verifier state at one bytecode offset, as computed by the code generator
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub pc: u16,
    pub locals: Vec<VerificationType>,
    pub stack: Vec<VerificationType>,
}

/// Verification type in model form (class references still symbolic)
#[derive(Debug, Clone)]
pub enum VerificationType {
    Top,
    Integer,
    Float,
    Long,
    Double,
    Null,
    UninitializedThis,
    Object(Type),
    Uninitialized(u16),
}
