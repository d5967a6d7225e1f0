use crate::class_file::{AttributeLike, ConstantIndex, Serialize, Utf8ConstantIndex};
use byteorder::WriteBytesExt;

/// Annotation with its values, fully resolved to constant pool indices
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se16/html/jvms-4.html#jvms-4.7.16
#[derive(Debug)]
pub struct AnnotationInfo {
    /// Field descriptor of the annotation type
    pub type_descriptor: Utf8ConstantIndex,
    pub element_value_pairs: Vec<ElementValuePair>,
}

#[derive(Debug)]
pub struct ElementValuePair {
    pub element_name: Utf8ConstantIndex,
    pub value: ElementValueInfo,
}

impl Serialize for AnnotationInfo {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.type_descriptor.serialize(writer)?;
        self.element_value_pairs.serialize(writer)?;
        Ok(())
    }
}

impl Serialize for ElementValuePair {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.element_name.serialize(writer)?;
        self.value.serialize(writer)?;
        Ok(())
    }
}

/// Value of an annotation element
///
/// The primitive variants all point at a loadable constant of the matching
/// type (`Boolean` through `Int` point at `CONSTANT_Integer_info` entries).
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se16/html/jvms-4.html#jvms-4.7.16.1
#[derive(Debug)]
pub enum ElementValueInfo {
    Byte(ConstantIndex),
    Char(ConstantIndex),
    Double(ConstantIndex),
    Float(ConstantIndex),
    Int(ConstantIndex),
    Long(ConstantIndex),
    Short(ConstantIndex),
    Boolean(ConstantIndex),
    String(Utf8ConstantIndex),
    Enum {
        /// Field descriptor of the enum type
        type_name: Utf8ConstantIndex,
        const_name: Utf8ConstantIndex,
    },
    /// Return descriptor of the class literal
    Class(Utf8ConstantIndex),
    Annotation(AnnotationInfo),
    Array(Vec<ElementValueInfo>),
}

impl Serialize for ElementValueInfo {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        match self {
            ElementValueInfo::Byte(idx) => {
                b'B'.serialize(writer)?;
                idx.serialize(writer)?;
            }
            ElementValueInfo::Char(idx) => {
                b'C'.serialize(writer)?;
                idx.serialize(writer)?;
            }
            ElementValueInfo::Double(idx) => {
                b'D'.serialize(writer)?;
                idx.serialize(writer)?;
            }
            ElementValueInfo::Float(idx) => {
                b'F'.serialize(writer)?;
                idx.serialize(writer)?;
            }
            ElementValueInfo::Int(idx) => {
                b'I'.serialize(writer)?;
                idx.serialize(writer)?;
            }
            ElementValueInfo::Long(idx) => {
                b'J'.serialize(writer)?;
                idx.serialize(writer)?;
            }
            ElementValueInfo::Short(idx) => {
                b'S'.serialize(writer)?;
                idx.serialize(writer)?;
            }
            ElementValueInfo::Boolean(idx) => {
                b'Z'.serialize(writer)?;
                idx.serialize(writer)?;
            }
            ElementValueInfo::String(idx) => {
                b's'.serialize(writer)?;
                idx.serialize(writer)?;
            }
            ElementValueInfo::Enum {
                type_name,
                const_name,
            } => {
                b'e'.serialize(writer)?;
                type_name.serialize(writer)?;
                const_name.serialize(writer)?;
            }
            ElementValueInfo::Class(idx) => {
                b'c'.serialize(writer)?;
                idx.serialize(writer)?;
            }
            ElementValueInfo::Annotation(annotation) => {
                b'@'.serialize(writer)?;
                annotation.serialize(writer)?;
            }
            ElementValueInfo::Array(values) => {
                b'['.serialize(writer)?;
                values.serialize(writer)?;
            }
        }
        Ok(())
    }
}

/// What declaration or type use a type annotation is attached to
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se16/html/jvms-4.html#jvms-4.7.20.1
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetInfo {
    /// Type parameter of a class or interface (0x00)
    ClassTypeParameter(u8),

    /// Type parameter of a method or constructor (0x01)
    MethodTypeParameter(u8),

    /// Super class or implemented interface; 65535 means the super class (0x10)
    ClassExtends(u16),

    /// Bound of a class type parameter (0x11)
    ClassTypeParameterBound { parameter: u8, bound: u8 },

    /// Bound of a method type parameter (0x12)
    MethodTypeParameterBound { parameter: u8, bound: u8 },

    /// Type of a field declaration (0x13)
    Field,

    /// Return type (or newly constructed type for constructors) (0x14)
    MethodReturn,

    /// Receiver type of a method or constructor (0x15)
    MethodReceiver,

    /// Type of a formal parameter (0x16)
    MethodFormalParameter(u8),

    /// Type in a `throws` clause (0x17)
    Throws(u16),

    /// Type of a local variable declaration (0x40)
    LocalVariable(Vec<LocalVarTargetEntry>),

    /// Type of a resource in a try-with-resources (0x41)
    ResourceVariable(Vec<LocalVarTargetEntry>),

    /// Type of an exception parameter (0x42)
    ExceptionParameter(u16),

    /// Type in an `instanceof` expression (0x43)
    InstanceOf(u16),

    /// Type in a `new` expression (0x44)
    New(u16),

    /// Type in a `::new` method reference (0x45)
    ConstructorReference(u16),

    /// Type in a `::identifier` method reference (0x46)
    MethodReference(u16),

    /// Type in a cast expression (0x47)
    Cast { offset: u16, type_index: u8 },

    /// Type argument of a generic constructor invocation (0x48)
    ConstructorInvocationTypeArgument { offset: u16, type_index: u8 },

    /// Type argument of a generic method invocation (0x49)
    MethodInvocationTypeArgument { offset: u16, type_index: u8 },

    /// Type argument of a generic `::new` reference (0x4A)
    ConstructorReferenceTypeArgument { offset: u16, type_index: u8 },

    /// Type argument of a generic `::identifier` reference (0x4B)
    MethodReferenceTypeArgument { offset: u16, type_index: u8 },
}

/// One live range of an annotated local variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVarTargetEntry {
    pub start_pc: u16,
    pub length: u16,
    pub index: u16,
}

impl Serialize for LocalVarTargetEntry {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.start_pc.serialize(writer)?;
        self.length.serialize(writer)?;
        self.index.serialize(writer)?;
        Ok(())
    }
}

impl Serialize for TargetInfo {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        match self {
            TargetInfo::ClassTypeParameter(index) => {
                0x00u8.serialize(writer)?;
                index.serialize(writer)?;
            }
            TargetInfo::MethodTypeParameter(index) => {
                0x01u8.serialize(writer)?;
                index.serialize(writer)?;
            }
            TargetInfo::ClassExtends(supertype_index) => {
                0x10u8.serialize(writer)?;
                supertype_index.serialize(writer)?;
            }
            TargetInfo::ClassTypeParameterBound { parameter, bound } => {
                0x11u8.serialize(writer)?;
                parameter.serialize(writer)?;
                bound.serialize(writer)?;
            }
            TargetInfo::MethodTypeParameterBound { parameter, bound } => {
                0x12u8.serialize(writer)?;
                parameter.serialize(writer)?;
                bound.serialize(writer)?;
            }
            TargetInfo::Field => 0x13u8.serialize(writer)?,
            TargetInfo::MethodReturn => 0x14u8.serialize(writer)?,
            TargetInfo::MethodReceiver => 0x15u8.serialize(writer)?,
            TargetInfo::MethodFormalParameter(index) => {
                0x16u8.serialize(writer)?;
                index.serialize(writer)?;
            }
            TargetInfo::Throws(index) => {
                0x17u8.serialize(writer)?;
                index.serialize(writer)?;
            }
            TargetInfo::LocalVariable(table) => {
                0x40u8.serialize(writer)?;
                table.serialize(writer)?;
            }
            TargetInfo::ResourceVariable(table) => {
                0x41u8.serialize(writer)?;
                table.serialize(writer)?;
            }
            TargetInfo::ExceptionParameter(index) => {
                0x42u8.serialize(writer)?;
                index.serialize(writer)?;
            }
            TargetInfo::InstanceOf(offset) => {
                0x43u8.serialize(writer)?;
                offset.serialize(writer)?;
            }
            TargetInfo::New(offset) => {
                0x44u8.serialize(writer)?;
                offset.serialize(writer)?;
            }
            TargetInfo::ConstructorReference(offset) => {
                0x45u8.serialize(writer)?;
                offset.serialize(writer)?;
            }
            TargetInfo::MethodReference(offset) => {
                0x46u8.serialize(writer)?;
                offset.serialize(writer)?;
            }
            TargetInfo::Cast { offset, type_index } => {
                0x47u8.serialize(writer)?;
                offset.serialize(writer)?;
                type_index.serialize(writer)?;
            }
            TargetInfo::ConstructorInvocationTypeArgument { offset, type_index } => {
                0x48u8.serialize(writer)?;
                offset.serialize(writer)?;
                type_index.serialize(writer)?;
            }
            TargetInfo::MethodInvocationTypeArgument { offset, type_index } => {
                0x49u8.serialize(writer)?;
                offset.serialize(writer)?;
                type_index.serialize(writer)?;
            }
            TargetInfo::ConstructorReferenceTypeArgument { offset, type_index } => {
                0x4Au8.serialize(writer)?;
                offset.serialize(writer)?;
                type_index.serialize(writer)?;
            }
            TargetInfo::MethodReferenceTypeArgument { offset, type_index } => {
                0x4Bu8.serialize(writer)?;
                offset.serialize(writer)?;
                type_index.serialize(writer)?;
            }
        }
        Ok(())
    }
}

/// Step along the path from an annotated outer type to the annotated part
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se16/html/jvms-4.html#jvms-4.7.20.2
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TypePathStep {
    /// Deeper in an array type
    ArrayElement,

    /// Deeper in a nested type
    InnerType,

    /// Bound of a wildcard type argument
    WildcardBound,

    /// The i-th type argument of a parameterized type
    TypeArgument(u8),
}

impl Serialize for TypePathStep {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        match self {
            TypePathStep::ArrayElement => {
                0u8.serialize(writer)?;
                0u8.serialize(writer)?;
            }
            TypePathStep::InnerType => {
                1u8.serialize(writer)?;
                0u8.serialize(writer)?;
            }
            TypePathStep::WildcardBound => {
                2u8.serialize(writer)?;
                0u8.serialize(writer)?;
            }
            TypePathStep::TypeArgument(index) => {
                3u8.serialize(writer)?;
                index.serialize(writer)?;
            }
        }
        Ok(())
    }
}

/// Type annotation, fully resolved to constant pool indices
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se16/html/jvms-4.html#jvms-4.7.20
#[derive(Debug)]
pub struct TypeAnnotationInfo {
    pub target: TargetInfo,
    pub path: Vec<TypePathStep>,
    pub annotation: AnnotationInfo,
}

impl Serialize for TypeAnnotationInfo {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.target.serialize(writer)?;

        // The path length prefix is a single byte
        (self.path.len() as u8).serialize(writer)?;
        for step in &self.path {
            step.serialize(writer)?;
        }

        // `type_index` and `element_value_pairs`
        self.annotation.serialize(writer)?;
        Ok(())
    }
}

pub struct RuntimeVisibleAnnotations(pub Vec<AnnotationInfo>);

impl AttributeLike for RuntimeVisibleAnnotations {
    const NAME: &'static str = "RuntimeVisibleAnnotations";
}

impl Serialize for RuntimeVisibleAnnotations {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}

pub struct RuntimeInvisibleAnnotations(pub Vec<AnnotationInfo>);

impl AttributeLike for RuntimeInvisibleAnnotations {
    const NAME: &'static str = "RuntimeInvisibleAnnotations";
}

impl Serialize for RuntimeInvisibleAnnotations {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}

/// Outer vector is per parameter (single byte count), inner per annotation
pub struct RuntimeVisibleParameterAnnotations(pub Vec<Vec<AnnotationInfo>>);

impl AttributeLike for RuntimeVisibleParameterAnnotations {
    const NAME: &'static str = "RuntimeVisibleParameterAnnotations";
}

impl Serialize for RuntimeVisibleParameterAnnotations {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        serialize_parameter_annotations(&self.0, writer)
    }
}

pub struct RuntimeInvisibleParameterAnnotations(pub Vec<Vec<AnnotationInfo>>);

impl AttributeLike for RuntimeInvisibleParameterAnnotations {
    const NAME: &'static str = "RuntimeInvisibleParameterAnnotations";
}

impl Serialize for RuntimeInvisibleParameterAnnotations {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        serialize_parameter_annotations(&self.0, writer)
    }
}

fn serialize_parameter_annotations<W: WriteBytesExt>(
    parameters: &[Vec<AnnotationInfo>],
    writer: &mut W,
) -> std::io::Result<()> {
    (parameters.len() as u8).serialize(writer)?;
    for annotations in parameters {
        annotations.serialize(writer)?;
    }
    Ok(())
}

pub struct RuntimeVisibleTypeAnnotations(pub Vec<TypeAnnotationInfo>);

impl AttributeLike for RuntimeVisibleTypeAnnotations {
    const NAME: &'static str = "RuntimeVisibleTypeAnnotations";
}

impl Serialize for RuntimeVisibleTypeAnnotations {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}

pub struct RuntimeInvisibleTypeAnnotations(pub Vec<TypeAnnotationInfo>);

impl AttributeLike for RuntimeInvisibleTypeAnnotations {
    const NAME: &'static str = "RuntimeInvisibleTypeAnnotations";
}

impl Serialize for RuntimeInvisibleTypeAnnotations {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}

/// Default value of an annotation interface element
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se16/html/jvms-4.html#jvms-4.7.22
pub struct AnnotationDefault(pub ElementValueInfo);

impl AttributeLike for AnnotationDefault {
    const NAME: &'static str = "AnnotationDefault";
}

impl Serialize for AnnotationDefault {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}
