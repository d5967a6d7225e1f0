use crate::access_flags::{InnerClassAccessFlags, MethodParameterAccessFlags};
use crate::class_file::{
    BootstrapMethod, ClassConstantIndex, ConstantIndex, NameAndTypeConstantIndex, Serialize,
    Utf8ConstantIndex,
};
use byteorder::WriteBytesExt;

/// Attributes (used in classes, fields, methods, and even on some attributes)
///
/// The payload is kept as opaque serialized bytes: the `attribute_length`
/// field is always exactly `info.len()`, so it can never disagree with the
/// payload that follows it.
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se16/html/jvms-4.html#jvms-4.7
#[derive(Debug)]
pub struct Attribute {
    pub name_index: Utf8ConstantIndex,
    pub info: Vec<u8>,
}

impl Serialize for Attribute {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.name_index.serialize(writer)?;

        // Attribute info length is 4 bytes
        (self.info.len() as u32).serialize(writer)?;
        writer.write_all(&self.info)?;

        Ok(())
    }
}

/// Attributes are all stored in the same way (see `Attribute`), but internally
/// they represent very different things. This trait is implemented by things
/// which can be turned into attributes.
pub trait AttributeLike: Serialize {
    /// Name of the attribute
    const NAME: &'static str;
}

/// [0]: https://docs.oracle.com/javase/specs/jvms/se16/html/jvms-4.html#jvms-4.7.2
pub struct ConstantValue(pub ConstantIndex);

impl Serialize for ConstantValue {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}

impl AttributeLike for ConstantValue {
    const NAME: &'static str = "ConstantValue";
}

/// [0]: https://docs.oracle.com/javase/specs/jvms/se16/html/jvms-4.html#jvms-4.7.3
pub struct Code {
    pub max_stack: u16,
    pub max_locals: u16,
    pub code_array: BytecodeArray,
    pub exception_table: Vec<ExceptionHandler>,
    pub attributes: Vec<Attribute>,
}

impl Serialize for Code {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.max_stack.serialize(writer)?;
        self.max_locals.serialize(writer)?;
        self.code_array.serialize(writer)?;
        self.exception_table.serialize(writer)?;
        self.attributes.serialize(writer)?;
        Ok(())
    }
}

impl AttributeLike for Code {
    const NAME: &'static str = "Code";
}

pub struct ExceptionHandler {
    /// Start of exception handler range (inclusive)
    pub start_pc: u16,

    /// End of exception handler range (exclusive)
    pub end_pc: u16,

    /// Start of the exception handler
    pub handler_pc: u16,

    /// Class of exception caught, or [`ClassConstantIndex::NONE`] for a
    /// catch-all handler (as used by `finally`)
    pub catch_type: ClassConstantIndex,
}

impl Serialize for ExceptionHandler {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.start_pc.serialize(writer)?;
        self.end_pc.serialize(writer)?;
        self.handler_pc.serialize(writer)?;
        self.catch_type.serialize(writer)?;
        Ok(())
    }
}

/// Encoded bytecode instructions (length prefix is 4 bytes, not 2)
pub struct BytecodeArray(pub Vec<u8>);

impl Serialize for BytecodeArray {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        let len = self.0.len() as u32;
        len.serialize(writer)?;
        writer.write_all(&self.0)?;
        Ok(())
    }
}

/// Checked exceptions a method may throw
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se16/html/jvms-4.html#jvms-4.7.5
pub struct Exceptions(pub Vec<ClassConstantIndex>);

impl AttributeLike for Exceptions {
    const NAME: &'static str = "Exceptions";
}

impl Serialize for Exceptions {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}

/// [0]: https://docs.oracle.com/javase/specs/jvms/se16/html/jvms-4.html#jvms-4.7.10
pub struct SourceFile(pub Utf8ConstantIndex);

impl AttributeLike for SourceFile {
    const NAME: &'static str = "SourceFile";
}

impl Serialize for SourceFile {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}

/// [0]: https://docs.oracle.com/javase/specs/jvms/se16/html/jvms-4.html#jvms-4.7.12
pub struct LineNumberTable(pub Vec<LineNumber>);

pub struct LineNumber {
    pub start_pc: u16,
    pub line_number: u16,
}

impl AttributeLike for LineNumberTable {
    const NAME: &'static str = "LineNumberTable";
}

impl Serialize for LineNumberTable {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}

impl Serialize for LineNumber {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.start_pc.serialize(writer)?;
        self.line_number.serialize(writer)?;
        Ok(())
    }
}

/// [0]: https://docs.oracle.com/javase/specs/jvms/se16/html/jvms-4.html#jvms-4.7.13
pub struct LocalVariableTable(pub Vec<LocalVariable>);

pub struct LocalVariable {
    pub start_pc: u16,
    pub length: u16,
    pub name: Utf8ConstantIndex,
    pub descriptor: Utf8ConstantIndex,
    pub index: u16,
}

impl AttributeLike for LocalVariableTable {
    const NAME: &'static str = "LocalVariableTable";
}

impl Serialize for LocalVariableTable {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}

impl Serialize for LocalVariable {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.start_pc.serialize(writer)?;
        self.length.serialize(writer)?;
        self.name.serialize(writer)?;
        self.descriptor.serialize(writer)?;
        self.index.serialize(writer)?;
        Ok(())
    }
}

/// Like `LocalVariableTable`, but recording generic signatures instead of
/// descriptors (and only for variables whose type is generic)
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se16/html/jvms-4.html#jvms-4.7.14
pub struct LocalVariableTypeTable(pub Vec<LocalVariable>);

impl AttributeLike for LocalVariableTypeTable {
    const NAME: &'static str = "LocalVariableTypeTable";
}

impl Serialize for LocalVariableTypeTable {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}

/// Zero-length marker attribute
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se16/html/jvms-4.html#jvms-4.7.15
pub struct Deprecated;

impl AttributeLike for Deprecated {
    const NAME: &'static str = "Deprecated";
}

impl Serialize for Deprecated {
    fn serialize<W: WriteBytesExt>(&self, _writer: &mut W) -> std::io::Result<()> {
        Ok(())
    }
}

/// Set on local and anonymous classes
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se16/html/jvms-4.html#jvms-4.7.7
pub struct EnclosingMethod {
    pub class: ClassConstantIndex,

    /// `None` when the class is not enclosed by any method or constructor
    /// (eg. an initializer or a field initializer expression)
    pub method: Option<NameAndTypeConstantIndex>,
}

impl AttributeLike for EnclosingMethod {
    const NAME: &'static str = "EnclosingMethod";
}

impl Serialize for EnclosingMethod {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.class.serialize(writer)?;
        match self.method {
            Some(method) => method.serialize(writer)?,
            None => 0u16.serialize(writer)?,
        }
        Ok(())
    }
}

/// [0]: https://docs.oracle.com/javase/specs/jvms/se16/html/jvms-4.html#jvms-4.7.24
pub struct MethodParameters(pub Vec<MethodParameter>);

pub struct MethodParameter {
    /// `None` for a parameter with no name (index 0 in the class file)
    pub name: Option<Utf8ConstantIndex>,
    pub access_flags: MethodParameterAccessFlags,
}

impl AttributeLike for MethodParameters {
    const NAME: &'static str = "MethodParameters";
}

impl Serialize for MethodParameters {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        // Unusually for the class file format, this count is a single byte
        (self.0.len() as u8).serialize(writer)?;
        for parameter in &self.0 {
            match parameter.name {
                Some(name) => name.serialize(writer)?,
                None => 0u16.serialize(writer)?,
            }
            parameter.access_flags.serialize(writer)?;
        }
        Ok(())
    }
}

/// Verification type as it appears inside stack map frames
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se16/html/jvms-4.html#jvms-4.7.4
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationTypeInfo {
    Top,
    Integer,
    Float,
    Double,
    Long,
    Null,
    UninitializedThis,
    Object(ClassConstantIndex),

    /// Object allocated by the `new` at the given bytecode offset, but not
    /// yet initialized
    Uninitialized(u16),
}

impl Serialize for VerificationTypeInfo {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        match self {
            VerificationTypeInfo::Top => 0u8.serialize(writer)?,
            VerificationTypeInfo::Integer => 1u8.serialize(writer)?,
            VerificationTypeInfo::Float => 2u8.serialize(writer)?,
            VerificationTypeInfo::Double => 3u8.serialize(writer)?,
            VerificationTypeInfo::Long => 4u8.serialize(writer)?,
            VerificationTypeInfo::Null => 5u8.serialize(writer)?,
            VerificationTypeInfo::UninitializedThis => 6u8.serialize(writer)?,
            VerificationTypeInfo::Object(cls) => {
                7u8.serialize(writer)?;
                cls.serialize(writer)?;
            }
            VerificationTypeInfo::Uninitialized(offset) => {
                8u8.serialize(writer)?;
                offset.serialize(writer)?;
            }
        }
        Ok(())
    }
}

/// [0]: https://docs.oracle.com/javase/specs/jvms/se16/html/jvms-4.html#jvms-4.7.4
#[derive(Debug, PartialEq, Eq)]
pub struct StackMapTable(pub Vec<StackMapFrame>);

impl AttributeLike for StackMapTable {
    const NAME: &'static str = "StackMapTable";
}

impl Serialize for StackMapTable {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum StackMapFrame {
    /// Frame has the same locals as the previous frame and number of stack items is zero
    /// Tags: 0-63 or 251
    SameLocalsNoStack { offset_delta: u16 },

    /// Frame has the same locals as the previous frame and number of stack items is one
    /// Tags: 64-127 or 247
    SameLocalsOneStack {
        offset_delta: u16,
        stack: VerificationTypeInfo,
    },

    /// Frame is like the previous frame, but without the last `chopped_k` locals
    ///
    /// Note: `chopped_k` must be in the range 1 to 3 inclusive
    /// Tags: 248-250
    ChopLocalsNoStack { offset_delta: u16, chopped_k: u8 },

    /// Frame is like the previous frame, but with extra locals
    /// Tags: 252-254
    AppendLocalsNoStack {
        offset_delta: u16,
        locals: Vec<VerificationTypeInfo>,
    },

    /// Frame has exactly the locals and stack specified
    /// Tag: 255
    Full {
        offset_delta: u16,
        locals: Vec<VerificationTypeInfo>,
        stack: Vec<VerificationTypeInfo>,
    },
}

impl Serialize for StackMapFrame {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        match self {
            // `same_frame` and `same_frame_extended`
            StackMapFrame::SameLocalsNoStack { offset_delta } => {
                if *offset_delta <= 63 {
                    (*offset_delta as u8).serialize(writer)?;
                } else {
                    251u8.serialize(writer)?;
                    offset_delta.serialize(writer)?;
                }
            }

            // `same_locals_1_stack_item_frame` and `same_locals_1_stack_item_frame_extended`
            StackMapFrame::SameLocalsOneStack {
                offset_delta,
                stack,
            } => {
                if *offset_delta <= 63 {
                    (*offset_delta as u8 + 64).serialize(writer)?;
                } else {
                    247u8.serialize(writer)?;
                    offset_delta.serialize(writer)?;
                }
                stack.serialize(writer)?;
            }

            // `chop_frame`
            StackMapFrame::ChopLocalsNoStack {
                offset_delta,
                chopped_k,
            } => {
                assert!(
                    0 < *chopped_k && *chopped_k < 4,
                    "ChopLocalsNoStack chops 1-3 locals"
                );
                (251 - chopped_k).serialize(writer)?;
                offset_delta.serialize(writer)?;
            }

            // `append_frame`
            StackMapFrame::AppendLocalsNoStack {
                offset_delta,
                locals,
            } => {
                let added_k = locals.len();
                assert!(
                    0 < added_k && added_k < 4,
                    "AppendLocalsNoStack adds 1-3 locals"
                );
                (251 + added_k as u8).serialize(writer)?;
                offset_delta.serialize(writer)?;
                for local in locals {
                    local.serialize(writer)?;
                }
            }

            // `full_frame`
            StackMapFrame::Full {
                offset_delta,
                locals,
                stack,
            } => {
                255u8.serialize(writer)?;
                offset_delta.serialize(writer)?;
                locals.serialize(writer)?;
                stack.serialize(writer)?;
            }
        };
        Ok(())
    }
}

/// Uncompressed predecessor of `StackMapTable`, used for class files older
/// than major version 50 (the CLDC verifier format)
#[derive(Debug, PartialEq, Eq)]
pub struct StackMap(pub Vec<RawFrame>);

/// One entry of the legacy `StackMap` attribute: an absolute bytecode offset
/// with the full locals and stack
#[derive(Debug, PartialEq, Eq)]
pub struct RawFrame {
    pub offset: u16,
    pub locals: Vec<VerificationTypeInfo>,
    pub stack: Vec<VerificationTypeInfo>,
}

impl AttributeLike for StackMap {
    const NAME: &'static str = "StackMap";
}

impl Serialize for StackMap {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}

impl Serialize for RawFrame {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.offset.serialize(writer)?;
        self.locals.serialize(writer)?;
        self.stack.serialize(writer)?;
        Ok(())
    }
}

/// [0]: https://docs.oracle.com/javase/specs/jvms/se16/html/jvms-4.html#jvms-4.7.23
#[derive(Debug)]
pub struct BootstrapMethods(pub Vec<BootstrapMethod>);

impl AttributeLike for BootstrapMethods {
    const NAME: &'static str = "BootstrapMethods";
}

impl Serialize for BootstrapMethods {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}

/// Every nested class referenced from a class must be included in the inner
/// classes attribute on the class.
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se16/html/jvms-4.html#jvms-4.7.6
#[derive(Debug)]
pub struct InnerClasses(pub Vec<InnerClass>);

impl AttributeLike for InnerClasses {
    const NAME: &'static str = "InnerClasses";
}

impl Serialize for InnerClasses {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}

#[derive(Debug)]
pub struct InnerClass {
    pub inner_class: ClassConstantIndex,

    /// [`ClassConstantIndex::NONE`] for local and anonymous classes
    pub outer_class: ClassConstantIndex,

    /// `None` for anonymous classes (index 0 in the class file)
    pub inner_name: Option<Utf8ConstantIndex>,

    pub access_flags: InnerClassAccessFlags,
}

impl Serialize for InnerClass {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.inner_class.serialize(writer)?;
        self.outer_class.serialize(writer)?;
        match self.inner_name {
            Some(name) => name.serialize(writer)?,
            None => 0u16.serialize(writer)?,
        }
        self.access_flags.serialize(writer)?;
        Ok(())
    }
}

/// [0]: https://docs.oracle.com/javase/specs/jvms/se16/html/jvms-4.html#jvms-4.7.9
#[derive(Debug)]
pub struct Signature {
    pub signature: Utf8ConstantIndex,
}

impl AttributeLike for Signature {
    const NAME: &'static str = "Signature";
}

impl Serialize for Signature {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.signature.serialize(writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn serialized<S: Serialize>(value: S) -> Vec<u8> {
        let mut buffer = vec![];
        value.serialize(&mut buffer).unwrap();
        buffer
    }

    #[test]
    fn attribute_length_matches_payload() {
        let attribute = Attribute {
            name_index: Utf8ConstantIndex(ConstantIndex(7)),
            info: vec![1, 2, 3, 4, 5],
        };
        assert_eq!(
            serialized(attribute),
            vec![0, 7, 0, 0, 0, 5, 1, 2, 3, 4, 5]
        );
    }

    #[test]
    fn empty_attribute_has_zero_length() {
        let mut info = vec![];
        Deprecated.serialize(&mut info).unwrap();
        let attribute = Attribute {
            name_index: Utf8ConstantIndex(ConstantIndex(3)),
            info,
        };
        assert_eq!(serialized(attribute), vec![0, 3, 0, 0, 0, 0]);
    }

    #[test]
    fn stack_map_frame_compact_and_extended_tags() {
        let same_small = StackMapFrame::SameLocalsNoStack { offset_delta: 5 };
        assert_eq!(serialized(same_small), vec![5]);

        let same_extended = StackMapFrame::SameLocalsNoStack { offset_delta: 64 };
        assert_eq!(serialized(same_extended), vec![251, 0, 64]);

        let one_stack = StackMapFrame::SameLocalsOneStack {
            offset_delta: 63,
            stack: VerificationTypeInfo::Integer,
        };
        assert_eq!(serialized(one_stack), vec![127, 1]);

        let one_stack_extended = StackMapFrame::SameLocalsOneStack {
            offset_delta: 64,
            stack: VerificationTypeInfo::Null,
        };
        assert_eq!(serialized(one_stack_extended), vec![247, 0, 64, 5]);

        let chop = StackMapFrame::ChopLocalsNoStack {
            offset_delta: 10,
            chopped_k: 2,
        };
        assert_eq!(serialized(chop), vec![249, 0, 10]);

        let append = StackMapFrame::AppendLocalsNoStack {
            offset_delta: 2,
            locals: vec![VerificationTypeInfo::Long, VerificationTypeInfo::Top],
        };
        assert_eq!(serialized(append), vec![253, 0, 2, 4, 0]);

        let full = StackMapFrame::Full {
            offset_delta: 1,
            locals: vec![VerificationTypeInfo::Object(ClassConstantIndex(
                ConstantIndex(2),
            ))],
            stack: vec![VerificationTypeInfo::Uninitialized(8)],
        };
        assert_eq!(serialized(full), vec![255, 0, 1, 0, 1, 7, 0, 2, 0, 1, 8, 0, 8]);
    }

    #[test]
    fn legacy_stack_map_is_uncompressed() {
        let frame = RawFrame {
            offset: 70,
            locals: vec![VerificationTypeInfo::Integer],
            stack: vec![],
        };
        assert_eq!(serialized(frame), vec![0, 70, 0, 1, 1, 0, 0]);
    }
}
