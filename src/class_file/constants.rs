use crate::class_file::{Attribute, AttributeLike, Serialize};
use crate::errors::{Error, PoolError};
use crate::util::{Offset, OffsetVec, Width};
use byteorder::WriteBytesExt;
use std::borrow::{Borrow, Cow};
use std::collections::HashMap;
use std::result::Result;

/// Maximum number of bytes in the encoded form of a `CONSTANT_Utf8_info`
pub const MAX_UTF8_LENGTH: usize = 65535;

/// Class file constant pool builder
///
/// The pool is append only and deduplicating: interning the same constant twice
/// returns the index handed out the first time. Only after the pool is fully
/// built up can it be consumed into a regular [`OffsetVec`] for serialization.
///
/// Entries referenced from several classes must not be shared; a pool belongs
/// to exactly one class file.
pub struct ConstantPool {
    constants: OffsetVec<Constant>,

    utf8s: HashMap<String, Utf8ConstantIndex>,
    classes: HashMap<Utf8ConstantIndex, ClassConstantIndex>,
    strings: HashMap<Utf8ConstantIndex, StringConstantIndex>,
    integers: HashMap<i32, ConstantIndex>,
    floats: HashMap<u32, ConstantIndex>,
    longs: HashMap<i64, ConstantIndex>,
    doubles: HashMap<u64, ConstantIndex>,
    name_and_types: HashMap<(Utf8ConstantIndex, Utf8ConstantIndex), NameAndTypeConstantIndex>,
    field_refs: HashMap<(ClassConstantIndex, NameAndTypeConstantIndex), FieldRefConstantIndex>,
    method_refs:
        HashMap<(ClassConstantIndex, NameAndTypeConstantIndex, bool), MethodRefConstantIndex>,
    method_handles: HashMap<(HandleKind, ConstantIndex), ConstantIndex>,
    method_types: HashMap<Utf8ConstantIndex, ConstantIndex>,
    invoke_dynamics: HashMap<(u16, NameAndTypeConstantIndex), InvokeDynamicConstantIndex>,
    modules: HashMap<Utf8ConstantIndex, ModuleConstantIndex>,
    packages: HashMap<Utf8ConstantIndex, PackageConstantIndex>,

    /// Entries of the `BootstrapMethods` attribute, deduplicated like constants
    bootstrap_methods: Vec<BootstrapMethod>,
    bootstrap_lookup: HashMap<BootstrapMethod, u16>,
}

/// One entry of the `BootstrapMethods` attribute
#[derive(Clone, Hash, Eq, PartialEq, Debug)]
pub struct BootstrapMethod {
    pub bootstrap_method: ConstantIndex,
    pub bootstrap_arguments: Vec<ConstantIndex>,
}

impl Serialize for BootstrapMethod {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.bootstrap_method.serialize(writer)?;
        self.bootstrap_arguments.serialize(writer)?;
        Ok(())
    }
}

impl ConstantPool {
    /// Make a fresh empty constant pool
    ///
    /// Index 0 is reserved, so the first constant lands at offset 1.
    pub fn new() -> ConstantPool {
        ConstantPool {
            constants: OffsetVec::new_starting_at(Offset(1)),
            utf8s: HashMap::new(),
            classes: HashMap::new(),
            strings: HashMap::new(),
            integers: HashMap::new(),
            floats: HashMap::new(),
            longs: HashMap::new(),
            doubles: HashMap::new(),
            name_and_types: HashMap::new(),
            field_refs: HashMap::new(),
            method_refs: HashMap::new(),
            method_handles: HashMap::new(),
            method_types: HashMap::new(),
            invoke_dynamics: HashMap::new(),
            modules: HashMap::new(),
            packages: HashMap::new(),
            bootstrap_methods: vec![],
            bootstrap_lookup: HashMap::new(),
        }
    }

    /// Number of entries in the pool
    pub fn len(&self) -> usize {
        self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }

    /// Value of the `constant_pool_count` field (one past the last valid offset)
    pub fn count(&self) -> u16 {
        self.constants.offset_len().0 as u16
    }

    /// Push a constant into the constant pool, provided there is space for it
    ///
    /// Note: the largest valid index is 65535, indexing starts at 1, and `long`
    /// and `double` constants take two spaces.
    fn push_constant(&mut self, constant: Constant) -> Result<ConstantIndex, PoolError> {
        let offset: usize = self.constants.offset_len().0;

        // Detect if this constant would overflow the pool
        if offset + constant.width() > u16::MAX as usize {
            return Err(PoolError::Overflow { constant, offset });
        }

        self.constants.push(constant);
        Ok(ConstantIndex(offset as u16))
    }

    /// Consume the pool and return the final vector of constants along with the
    /// accumulated bootstrap methods
    pub fn into_parts(self) -> (OffsetVec<Constant>, Vec<BootstrapMethod>) {
        (self.constants, self.bootstrap_methods)
    }

    /// Get or insert a utf8 constant from the constant pool
    pub fn get_utf8<'a, S: Into<Cow<'a, str>>>(
        &mut self,
        utf8: S,
    ) -> Result<Utf8ConstantIndex, PoolError> {
        let cow = utf8.into();

        if let Some(idx) = self.utf8s.get::<str>(cow.borrow()) {
            Ok(*idx)
        } else {
            let length = encode_modified_utf8(cow.borrow()).len();
            if length > MAX_UTF8_LENGTH {
                return Err(PoolError::StringTooLong {
                    string: cow.into_owned(),
                    length,
                });
            }
            let owned = cow.into_owned();
            let constant = Constant::Utf8(owned.clone());
            let idx = Utf8ConstantIndex(self.push_constant(constant)?);
            self.utf8s.insert(owned, idx);
            Ok(idx)
        }
    }

    /// Look up a utf8 constant without inserting it
    pub fn lookup_utf8(&self, utf8: &str) -> Option<Utf8ConstantIndex> {
        self.utf8s.get(utf8).copied()
    }

    /// Get or insert a class constant from the constant pool
    ///
    /// The name is in internal binary form (`java/lang/Object`); array classes
    /// use their descriptor as the name (`[I`, `[Ljava/lang/Object;`).
    pub fn get_class(&mut self, name: &str) -> Result<ClassConstantIndex, PoolError> {
        let name = self.get_utf8(name)?;
        if let Some(idx) = self.classes.get(&name) {
            Ok(*idx)
        } else {
            let idx = ClassConstantIndex(self.push_constant(Constant::Class(name))?);
            self.classes.insert(name, idx);
            Ok(idx)
        }
    }

    /// Get or insert a string constant from the constant pool
    pub fn get_string(&mut self, string: &str) -> Result<StringConstantIndex, PoolError> {
        let utf8 = self.get_utf8(string)?;
        if let Some(idx) = self.strings.get(&utf8) {
            Ok(*idx)
        } else {
            let idx = StringConstantIndex(self.push_constant(Constant::String(utf8))?);
            self.strings.insert(utf8, idx);
            Ok(idx)
        }
    }

    /// Get or insert an `int` constant from the constant pool
    pub fn get_integer(&mut self, integer: i32) -> Result<ConstantIndex, PoolError> {
        if let Some(idx) = self.integers.get(&integer) {
            Ok(*idx)
        } else {
            let idx = self.push_constant(Constant::Integer(integer))?;
            self.integers.insert(integer, idx);
            Ok(idx)
        }
    }

    /// Get or insert a `float` constant from the constant pool
    ///
    /// Deduplication is on the raw bits, so `NaN` payloads and `-0.0` survive.
    pub fn get_float(&mut self, float: f32) -> Result<ConstantIndex, PoolError> {
        let bits = float.to_bits();
        if let Some(idx) = self.floats.get(&bits) {
            Ok(*idx)
        } else {
            let idx = self.push_constant(Constant::Float(float))?;
            self.floats.insert(bits, idx);
            Ok(idx)
        }
    }

    /// Get or insert a `long` constant from the constant pool
    pub fn get_long(&mut self, long: i64) -> Result<ConstantIndex, PoolError> {
        if let Some(idx) = self.longs.get(&long) {
            Ok(*idx)
        } else {
            let idx = self.push_constant(Constant::Long(long))?;
            self.longs.insert(long, idx);
            Ok(idx)
        }
    }

    /// Get or insert a `double` constant from the constant pool
    pub fn get_double(&mut self, double: f64) -> Result<ConstantIndex, PoolError> {
        let bits = double.to_bits();
        if let Some(idx) = self.doubles.get(&bits) {
            Ok(*idx)
        } else {
            let idx = self.push_constant(Constant::Double(double))?;
            self.doubles.insert(bits, idx);
            Ok(idx)
        }
    }

    /// Get or insert a name & type constant from the constant pool
    pub fn get_name_and_type(
        &mut self,
        name: &str,
        descriptor: &str,
    ) -> Result<NameAndTypeConstantIndex, PoolError> {
        let name = self.get_utf8(name)?;
        let descriptor = self.get_utf8(descriptor)?;
        let name_and_type_key = (name, descriptor);
        if let Some(idx) = self.name_and_types.get(&name_and_type_key) {
            Ok(*idx)
        } else {
            let constant = Constant::NameAndType { name, descriptor };
            let idx = NameAndTypeConstantIndex(self.push_constant(constant)?);
            self.name_and_types.insert(name_and_type_key, idx);
            Ok(idx)
        }
    }

    /// Get or insert a field reference from the constant pool
    pub fn get_field_ref(
        &mut self,
        class: &str,
        name: &str,
        descriptor: &str,
    ) -> Result<FieldRefConstantIndex, PoolError> {
        let class = self.get_class(class)?;
        let name_and_type = self.get_name_and_type(name, descriptor)?;
        let field_key = (class, name_and_type);
        if let Some(idx) = self.field_refs.get(&field_key) {
            Ok(*idx)
        } else {
            let constant = Constant::FieldRef(class, name_and_type);
            let idx = FieldRefConstantIndex(self.push_constant(constant)?);
            self.field_refs.insert(field_key, idx);
            Ok(idx)
        }
    }

    /// Get or insert a method reference from the constant pool
    ///
    /// `is_interface` picks between `Methodref` and `InterfaceMethodref`; the
    /// two do not deduplicate against each other.
    pub fn get_method_ref(
        &mut self,
        class: &str,
        name: &str,
        descriptor: &str,
        is_interface: bool,
    ) -> Result<MethodRefConstantIndex, PoolError> {
        let class = self.get_class(class)?;
        let name_and_type = self.get_name_and_type(name, descriptor)?;
        let method_key = (class, name_and_type, is_interface);
        if let Some(idx) = self.method_refs.get(&method_key) {
            Ok(*idx)
        } else {
            let constant = Constant::MethodRef {
                class,
                name_and_type,
                is_interface,
            };
            let idx = MethodRefConstantIndex(self.push_constant(constant)?);
            self.method_refs.insert(method_key, idx);
            Ok(idx)
        }
    }

    /// Get or insert a method handle constant from the constant pool
    pub fn get_method_handle(
        &mut self,
        handle_kind: HandleKind,
        member: ConstantIndex,
    ) -> Result<ConstantIndex, PoolError> {
        let handle_key = (handle_kind, member);
        if let Some(idx) = self.method_handles.get(&handle_key) {
            Ok(*idx)
        } else {
            let constant = Constant::MethodHandle {
                handle_kind,
                member,
            };
            let idx = self.push_constant(constant)?;
            self.method_handles.insert(handle_key, idx);
            Ok(idx)
        }
    }

    /// Get or insert a method type constant from the constant pool
    pub fn get_method_type(&mut self, descriptor: &str) -> Result<ConstantIndex, PoolError> {
        let descriptor = self.get_utf8(descriptor)?;
        if let Some(idx) = self.method_types.get(&descriptor) {
            Ok(*idx)
        } else {
            let constant = Constant::MethodType { descriptor };
            let idx = self.push_constant(constant)?;
            self.method_types.insert(descriptor, idx);
            Ok(idx)
        }
    }

    /// Get or insert an invoke dynamic constant from the constant pool
    ///
    /// The bootstrap method and its static arguments must already be interned
    /// (see [`ConstantPool::get_bootstrap_method`]).
    pub fn get_invoke_dynamic(
        &mut self,
        bootstrap_method: u16,
        name: &str,
        descriptor: &str,
    ) -> Result<InvokeDynamicConstantIndex, PoolError> {
        let method_descriptor = self.get_name_and_type(name, descriptor)?;
        let indy_key = (bootstrap_method, method_descriptor);
        if let Some(idx) = self.invoke_dynamics.get(&indy_key) {
            Ok(*idx)
        } else {
            let constant = Constant::InvokeDynamic {
                bootstrap_method,
                method_descriptor,
            };
            let idx = InvokeDynamicConstantIndex(self.push_constant(constant)?);
            self.invoke_dynamics.insert(indy_key, idx);
            Ok(idx)
        }
    }

    /// Get or insert a module constant from the constant pool
    pub fn get_module(&mut self, name: &str) -> Result<ModuleConstantIndex, PoolError> {
        let name = self.get_utf8(name)?;
        if let Some(idx) = self.modules.get(&name) {
            Ok(*idx)
        } else {
            let idx = ModuleConstantIndex(self.push_constant(Constant::Module(name))?);
            self.modules.insert(name, idx);
            Ok(idx)
        }
    }

    /// Get or insert a package constant from the constant pool
    pub fn get_package(&mut self, name: &str) -> Result<PackageConstantIndex, PoolError> {
        let name = self.get_utf8(name)?;
        if let Some(idx) = self.packages.get(&name) {
            Ok(*idx)
        } else {
            let idx = PackageConstantIndex(self.push_constant(Constant::Package(name))?);
            self.packages.insert(name, idx);
            Ok(idx)
        }
    }

    /// Register a bootstrap method and return its index into the
    /// `BootstrapMethods` attribute
    pub fn get_bootstrap_method(
        &mut self,
        bootstrap_method: ConstantIndex,
        bootstrap_arguments: Vec<ConstantIndex>,
    ) -> u16 {
        let entry = BootstrapMethod {
            bootstrap_method,
            bootstrap_arguments,
        };
        if let Some(idx) = self.bootstrap_lookup.get(&entry) {
            *idx
        } else {
            let idx = self.bootstrap_methods.len() as u16;
            self.bootstrap_lookup.insert(entry.clone(), idx);
            self.bootstrap_methods.push(entry);
            idx
        }
    }

    /// Bootstrap methods accumulated so far
    pub fn bootstrap_methods(&self) -> &[BootstrapMethod] {
        &self.bootstrap_methods
    }

    /// Serialize an attribute body and intern its name, producing a complete
    /// [`Attribute`]
    pub fn get_attribute<A: AttributeLike>(&mut self, attribute: A) -> Result<Attribute, Error> {
        let name_index = self.get_utf8(A::NAME)?;
        let mut info = vec![];

        attribute.serialize(&mut info).map_err(Error::IoError)?;

        Ok(Attribute { name_index, info })
    }
}

impl Default for ConstantPool {
    fn default() -> ConstantPool {
        ConstantPool::new()
    }
}

/// Constants as in the constant pool
///
/// `CONSTANT_Dynamic` is not included since we never generate it.
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se16/html/jvms-4.html#jvms-4.4
#[derive(Debug, Clone)]
pub enum Constant {
    /// Class or an interface
    Class(Utf8ConstantIndex),

    /// Field
    FieldRef(ClassConstantIndex, NameAndTypeConstantIndex),

    /// Method (this combines `Methodref` and `InterfaceMethodref`)
    MethodRef {
        class: ClassConstantIndex,
        name_and_type: NameAndTypeConstantIndex,
        is_interface: bool,
    },

    /// Constant object of type `java.lang.String`
    String(Utf8ConstantIndex),

    /// Constant primitive of type `int`
    Integer(i32),

    /// Constant primitive of type `float`
    Float(f32),

    /// Constant primitive of type `long`
    Long(i64),

    /// Constant primitive of type `double`
    Double(f64),

    /// Name and a type (eg. for a field or a method)
    NameAndType {
        name: Utf8ConstantIndex,
        descriptor: Utf8ConstantIndex,
    },

    /// Constant UTF-8 encoded raw string value
    ///
    /// Despite the name, the encoding is not quite UTF-8 (the encoding of the
    /// null character `\u{0000}` and the encoding of supplementary characters
    /// is different).
    Utf8(String),

    /// Constant object of type `java.lang.invoke.MethodHandle`
    MethodHandle {
        handle_kind: HandleKind,

        /// Depending on the method kind, this points to different things:
        ///
        ///   - `FieldRef` for `GetField`, `GetStatic`, `PutField`, `PutStatic`
        ///   - `MethodRef` for the rest
        member: ConstantIndex,
    },

    /// Method type
    MethodType { descriptor: Utf8ConstantIndex },

    /// Dynamically-computed call site
    InvokeDynamic {
        /// Index into the `BootstrapMethods` attribute
        bootstrap_method: u16,
        method_descriptor: NameAndTypeConstantIndex,
    },

    /// Module (only valid in the class representing a module)
    Module(Utf8ConstantIndex),

    /// Package exported or opened by a module
    Package(Utf8ConstantIndex),
}

impl Serialize for Constant {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        match self {
            Constant::Utf8(string) => {
                1u8.serialize(writer)?;
                let buffer: Vec<u8> = encode_modified_utf8(string);
                (buffer.len() as u16).serialize(writer)?;
                writer.write_all(&buffer)?;
            }
            Constant::Integer(integer) => {
                3u8.serialize(writer)?;
                integer.serialize(writer)?;
            }
            Constant::Float(float) => {
                4u8.serialize(writer)?;
                float.serialize(writer)?;
            }
            Constant::Long(long) => {
                5u8.serialize(writer)?;
                long.serialize(writer)?;
            }
            Constant::Double(double) => {
                6u8.serialize(writer)?;
                double.serialize(writer)?;
            }
            Constant::Class(name) => {
                7u8.serialize(writer)?;
                name.serialize(writer)?;
            }
            Constant::String(utf8) => {
                8u8.serialize(writer)?;
                utf8.serialize(writer)?;
            }
            Constant::FieldRef(class, name_and_type) => {
                9u8.serialize(writer)?;
                class.serialize(writer)?;
                name_and_type.serialize(writer)?;
            }
            Constant::MethodRef {
                class,
                name_and_type,
                is_interface,
            } => {
                (if !is_interface { 10u8 } else { 11u8 }).serialize(writer)?;
                class.serialize(writer)?;
                name_and_type.serialize(writer)?;
            }
            Constant::NameAndType { name, descriptor } => {
                12u8.serialize(writer)?;
                name.serialize(writer)?;
                descriptor.serialize(writer)?;
            }
            Constant::MethodHandle {
                handle_kind,
                member,
            } => {
                15u8.serialize(writer)?;
                handle_kind.serialize(writer)?;
                member.serialize(writer)?;
            }
            Constant::MethodType { descriptor } => {
                16u8.serialize(writer)?;
                descriptor.serialize(writer)?;
            }
            Constant::InvokeDynamic {
                bootstrap_method,
                method_descriptor,
            } => {
                18u8.serialize(writer)?;
                bootstrap_method.serialize(writer)?;
                method_descriptor.serialize(writer)?;
            }
            Constant::Module(name) => {
                19u8.serialize(writer)?;
                name.serialize(writer)?;
            }
            Constant::Package(name) => {
                20u8.serialize(writer)?;
                name.serialize(writer)?;
            }
        };
        Ok(())
    }
}

/// Modified UTF-8 format used in class files.
///
/// See [this `DataInput` section for details][0]. Quoting from that section:
///
/// > The differences between this format and the standard UTF-8 format are the following:
/// >
/// >  * The null byte `\0` is encoded in 2-byte format rather than 1-byte, so that the encoded
/// >    strings never have embedded nulls.
/// >  * Only the 1-byte, 2-byte, and 3-byte formats are used.
/// >  * Supplementary characters are represented in the form of surrogate pairs.
///
/// [0]: https://docs.oracle.com/en/java/javase/17/docs/api/java.base/java/io/DataInput.html#modified-utf-8
pub fn encode_modified_utf8(string: &str) -> Vec<u8> {
    let mut buffer: Vec<u8> = vec![];
    for c in string.chars() {
        // Handle the exception for how `\u{0000}` is represented
        let len: usize = if c == '\u{0000}' { 2 } else { c.len_utf8() };
        let code: u32 = c as u32;

        match len {
            1 => buffer.push(code as u8),
            2 => {
                buffer.push((code >> 6 & 0x1F) as u8 | 0b1100_0000);
                buffer.push((code & 0x3F) as u8 | 0b1000_0000);
            }
            3 => {
                buffer.push((code >> 12 & 0x0F) as u8 | 0b1110_0000);
                buffer.push((code >> 6 & 0x3F) as u8 | 0b1000_0000);
                buffer.push((code & 0x3F) as u8 | 0b1000_0000);
            }

            // Supplementary characters: main divergence from unicode
            _ => {
                buffer.push(0b1110_1101);
                buffer.push(((code >> 16 & 0x0F) as u8).wrapping_sub(1) & 0x0F | 0b1010_0000);
                buffer.push((code >> 10 & 0x3F) as u8 | 0b1000_0000);

                buffer.push(0b1110_1101);
                buffer.push(((code >> 6 & 0x1F) as u8) | 0b1011_0000);
                buffer.push((code & 0x3F) as u8 | 0b1000_0000);
            }
        }
    }
    buffer
}

/// Almost all constants have width 1, except for `Constant::Long` and `Constant::Double`. Quoting
/// the spec:
///
/// > All 8-byte constants take up two entries in the constant_pool table of the class file. If a
/// > CONSTANT_Long_info or CONSTANT_Double_info structure is the item in the constant_pool table
/// > at index n, then the next usable item in the pool is located at index n+2. The constant_pool
/// > index n+1 must be valid but is considered unusable.
/// >
/// > In retrospect, making 8-byte constants take two constant pool entries was a poor choice.
impl Width for Constant {
    fn width(&self) -> usize {
        match self {
            Constant::Long(_) | Constant::Double(_) => 2,
            _ => 1,
        }
    }
}

#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub struct ConstantIndex(pub u16);

#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub struct Utf8ConstantIndex(pub ConstantIndex);

#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub struct StringConstantIndex(pub ConstantIndex);

#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub struct NameAndTypeConstantIndex(pub ConstantIndex);

#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub struct ClassConstantIndex(pub ConstantIndex);

#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub struct FieldRefConstantIndex(pub ConstantIndex);

#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub struct MethodRefConstantIndex(pub ConstantIndex);

#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub struct InvokeDynamicConstantIndex(pub ConstantIndex);

#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub struct ModuleConstantIndex(pub ConstantIndex);

#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub struct PackageConstantIndex(pub ConstantIndex);

impl ClassConstantIndex {
    /// Index 0, used where the format reads "no class" (the super class of
    /// `java/lang/Object`, a catch-all exception handler)
    pub const NONE: ClassConstantIndex = ClassConstantIndex(ConstantIndex(0));
}

impl From<Utf8ConstantIndex> for ConstantIndex {
    fn from(idx: Utf8ConstantIndex) -> ConstantIndex {
        idx.0
    }
}
impl From<StringConstantIndex> for ConstantIndex {
    fn from(idx: StringConstantIndex) -> ConstantIndex {
        idx.0
    }
}
impl From<NameAndTypeConstantIndex> for ConstantIndex {
    fn from(idx: NameAndTypeConstantIndex) -> ConstantIndex {
        idx.0
    }
}
impl From<ClassConstantIndex> for ConstantIndex {
    fn from(idx: ClassConstantIndex) -> ConstantIndex {
        idx.0
    }
}
impl From<FieldRefConstantIndex> for ConstantIndex {
    fn from(idx: FieldRefConstantIndex) -> ConstantIndex {
        idx.0
    }
}
impl From<MethodRefConstantIndex> for ConstantIndex {
    fn from(idx: MethodRefConstantIndex) -> ConstantIndex {
        idx.0
    }
}
impl From<InvokeDynamicConstantIndex> for ConstantIndex {
    fn from(idx: InvokeDynamicConstantIndex) -> ConstantIndex {
        idx.0
    }
}
impl From<ModuleConstantIndex> for ConstantIndex {
    fn from(idx: ModuleConstantIndex) -> ConstantIndex {
        idx.0
    }
}
impl From<PackageConstantIndex> for ConstantIndex {
    fn from(idx: PackageConstantIndex) -> ConstantIndex {
        idx.0
    }
}

impl Serialize for ConstantIndex {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}
impl Serialize for Utf8ConstantIndex {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}
impl Serialize for StringConstantIndex {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}
impl Serialize for NameAndTypeConstantIndex {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}
impl Serialize for ClassConstantIndex {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}
impl Serialize for FieldRefConstantIndex {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}
impl Serialize for MethodRefConstantIndex {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}
impl Serialize for InvokeDynamicConstantIndex {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}
impl Serialize for ModuleConstantIndex {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}
impl Serialize for PackageConstantIndex {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}

/// Type of method handle
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se16/html/jvms-5.html#jvms-5.4.3.5-220
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum HandleKind {
    GetField,
    GetStatic,
    PutField,
    PutStatic,
    InvokeVirtual,
    InvokeStatic,
    InvokeSpecial,
    NewInvokeSpecial,
    InvokeInterface,
}

impl Serialize for HandleKind {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        let byte: u8 = match self {
            HandleKind::GetField => 1,
            HandleKind::GetStatic => 2,
            HandleKind::PutField => 3,
            HandleKind::PutStatic => 4,
            HandleKind::InvokeVirtual => 5,
            HandleKind::InvokeStatic => 6,
            HandleKind::InvokeSpecial => 7,
            HandleKind::NewInvokeSpecial => 8,
            HandleKind::InvokeInterface => 9,
        };
        byte.serialize(writer)
    }
}

#[cfg(test)]
mod encode_modified_utf8_tests {
    use super::*;

    #[test]
    fn containing_null_byte() {
        assert_eq!(encode_modified_utf8("a\x00a"), vec![97, 192, 128, 97]);
    }

    #[test]
    fn simple_ascii() {
        assert_eq!(encode_modified_utf8("foo"), vec![102, 111, 111]);
        assert_eq!(
            encode_modified_utf8("hel10_World"),
            vec![104, 101, 108, 49, 48, 95, 87, 111, 114, 108, 100]
        );
    }

    #[test]
    fn two_and_three_byte_encodings() {
        assert_eq!(
            encode_modified_utf8("ĄǍǞǠǺȀȂȦȺӐӒ"),
            vec![
                196, 132, 199, 141, 199, 158, 199, 160, 199, 186, 200, 128, 200, 130, 200, 166,
                200, 186, 211, 144, 211, 146
            ]
        );
        assert_eq!(
            encode_modified_utf8("ऄअॲঅਅઅଅஅఅಅഅะະ༁ཨ"),
            vec![
                224, 164, 132, 224, 164, 133, 224, 165, 178, 224, 166, 133, 224, 168, 133, 224,
                170, 133, 224, 172, 133, 224, 174, 133, 224, 176, 133, 224, 178, 133, 224, 180,
                133, 224, 184, 176, 224, 186, 176, 224, 188, 129, 224, 189, 168
            ]
        );
    }

    #[test]
    fn supplementary_characters() {
        assert_eq!(
            encode_modified_utf8("\u{10000}\u{dffff}\u{10FFFF}"),
            vec![
                237, 160, 128, 237, 176, 128, 237, 172, 191, 237, 191, 191, 237, 175, 191, 237,
                191, 191
            ]
        );
    }
}

#[cfg(test)]
mod pool_tests {
    use super::*;

    #[test]
    fn interning_is_idempotent() {
        let mut pool = ConstantPool::new();
        let idx1 = pool.get_utf8("java/lang/Object").unwrap();
        let idx2 = pool.get_utf8("java/lang/Object").unwrap();
        assert_eq!(idx1, idx2);

        let cls1 = pool.get_class("java/lang/Object").unwrap();
        let cls2 = pool.get_class("java/lang/Object").unwrap();
        assert_eq!(cls1, cls2);

        let ref1 = pool.get_method_ref("java/lang/Object", "<init>", "()V", false).unwrap();
        let ref2 = pool.get_method_ref("java/lang/Object", "<init>", "()V", false).unwrap();
        assert_eq!(ref1, ref2);

        // 1 utf8 for the class name, 1 class, 2 utf8s + 1 name-and-type + 1 ref
        assert_eq!(pool.len(), 6);
    }

    #[test]
    fn interface_and_class_refs_are_distinct() {
        let mut pool = ConstantPool::new();
        let as_class = pool.get_method_ref("a/B", "f", "()V", false).unwrap();
        let as_interface = pool.get_method_ref("a/B", "f", "()V", true).unwrap();
        assert_ne!(as_class, as_interface);
    }

    #[test]
    fn eight_byte_constants_take_two_slots() {
        let mut pool = ConstantPool::new();
        let long_idx = pool.get_long(4).unwrap();
        let next_idx = pool.get_integer(5).unwrap();
        assert_eq!(long_idx, ConstantIndex(1));
        assert_eq!(next_idx, ConstantIndex(3));
        assert_eq!(pool.count(), 4);
    }

    #[test]
    fn float_deduplication_is_bitwise() {
        let mut pool = ConstantPool::new();
        let pos = pool.get_float(0.0).unwrap();
        let neg = pool.get_float(-0.0).unwrap();
        assert_ne!(pos, neg);

        let nan1 = pool.get_double(f64::NAN).unwrap();
        let nan2 = pool.get_double(f64::NAN).unwrap();
        assert_eq!(nan1, nan2);
    }

    #[test]
    fn pool_overflows_at_65535() {
        let mut pool = ConstantPool::new();
        for i in 0..32766 {
            pool.get_long(i).unwrap();
        }
        assert_eq!(pool.count(), 65533);
        pool.get_integer(1).unwrap();

        // Offset 65534: a wide constant no longer fits, a narrow one does
        match pool.get_long(99999) {
            Err(PoolError::Overflow { offset: 65534, .. }) => (),
            other => panic!("expected overflow, got {:?}", other),
        }
        pool.get_integer(2).unwrap();
        assert_eq!(pool.count(), 65535);
        match pool.get_integer(3) {
            Err(PoolError::Overflow { offset: 65535, .. }) => (),
            other => panic!("expected overflow, got {:?}", other),
        }
    }

    #[test]
    fn oversized_string_is_rejected() {
        let mut pool = ConstantPool::new();
        let big: String = "x".repeat(65536);
        match pool.get_utf8(&*big) {
            Err(PoolError::StringTooLong { length: 65536, .. }) => (),
            other => panic!("expected string overflow, got {:?}", other),
        }

        // Multi-byte characters count in encoded bytes, not chars
        let wide: String = "\u{0800}".repeat(21846);
        match pool.get_utf8(&*wide) {
            Err(PoolError::StringTooLong { length: 65538, .. }) => (),
            other => panic!("expected string overflow, got {:?}", other),
        }
    }

    #[test]
    fn call_site_constants_deduplicate() {
        let mut pool = ConstantPool::new();
        let ty1 = pool.get_method_type("()Ljava/lang/Object;").unwrap();
        let ty2 = pool.get_method_type("()Ljava/lang/Object;").unwrap();
        assert_eq!(ty1, ty2);
        assert_ne!(ty1, pool.get_method_type("()V").unwrap());

        let indy1 = pool.get_invoke_dynamic(0, "run", "()Ljava/lang/Runnable;").unwrap();
        let indy2 = pool.get_invoke_dynamic(0, "run", "()Ljava/lang/Runnable;").unwrap();
        assert_eq!(indy1, indy2);

        // A different bootstrap method or a different call descriptor is a
        // new call site
        let other_bsm = pool.get_invoke_dynamic(1, "run", "()Ljava/lang/Runnable;").unwrap();
        let other_name = pool.get_invoke_dynamic(0, "apply", "()Ljava/lang/Runnable;").unwrap();
        assert_ne!(indy1, other_bsm);
        assert_ne!(indy1, other_name);
    }

    #[test]
    fn bootstrap_methods_deduplicate() {
        let mut pool = ConstantPool::new();
        let mref = pool
            .get_method_ref("java/lang/invoke/LambdaMetafactory", "metafactory", "()V", false)
            .unwrap();
        let handle = pool
            .get_method_handle(HandleKind::InvokeStatic, mref.into())
            .unwrap();

        let bsm1 = pool.get_bootstrap_method(handle, vec![]);
        let bsm2 = pool.get_bootstrap_method(handle, vec![]);
        let bsm3 = pool.get_bootstrap_method(handle, vec![handle]);
        assert_eq!(bsm1, bsm2);
        assert_ne!(bsm1, bsm3);
        assert_eq!(pool.bootstrap_methods().len(), 2);
    }
}
