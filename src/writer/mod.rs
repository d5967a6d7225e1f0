//! Lowering from the symbolic model to serialized class files
//!
//! [`ClassFileWriter`] drives the whole translation: it walks a
//! [`Class`](crate::model::Class), interns every name and constant it touches
//! into a [`ConstantPool`], and assembles the attribute soup the class file
//! format wants. The submodules each own one tricky corner of that job
//! (signatures, stack maps, annotations, modules, the `InnerClasses` table).

mod annotations;
mod inner_classes;
mod module;
mod signature;
mod stack_map;

pub use annotations::{
    annotation_attributes, lower_annotation, lower_element_value,
    parameter_annotation_attributes, type_annotation_attributes, AnnotatedContext,
};
pub use inner_classes::InnerClassCollector;
pub use module::module_attribute;
pub use signature::SignatureEncoder;
pub use stack_map::{
    compressed_table, initial_locals, legacy_table, lower_verification_type,
    MAX_LOCAL_LENGTH_DIFF,
};

use crate::access_flags::{ClassAccessFlags, InnerClassAccessFlags};
use crate::class_file::{
    AnnotationDefault, Attribute, BootstrapMethods, BytecodeArray, ClassConstantIndex, ClassFile,
    ConstantPool, ConstantValue, Deprecated, EnclosingMethod, ExceptionHandler, Exceptions,
    FieldInfo, LineNumber, LineNumberTable, LocalVariable, LocalVariableTable,
    LocalVariableTypeTable, MethodInfo, MethodParameter, MethodParameters, Signature, SourceFile,
    Version,
};
use crate::descriptors::RenderDescriptor;
use crate::errors::Error;
use crate::model::{Class, Code, ConstValue, Field, Method, Nesting};
use crate::names::Name;

/// Which stack map flavour a class file version calls for
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StackMapFormat {
    /// The uncompressed CLDC-era `StackMap` attribute (major version < 50)
    Cldc,

    /// The compressed `StackMapTable` attribute (major version >= 50)
    Jsr202,
}

/// Knobs controlling what the writer emits beyond the bare class structure
#[derive(Debug, Clone)]
pub struct WriterOptions {
    pub version: Version,

    /// Emit `SourceFile` attributes (`-g:source` in javac terms)
    pub emit_source_file: bool,

    /// Emit `MethodParameters` attributes (`-parameters` in javac terms)
    pub emit_method_parameters: bool,
}

impl WriterOptions {
    /// Defaults for a target version: debug info on, parameter names off
    pub fn for_version(version: Version) -> WriterOptions {
        WriterOptions {
            version,
            emit_source_file: true,
            emit_method_parameters: false,
        }
    }

    pub fn stack_map_format(&self) -> StackMapFormat {
        if self.version.has_stack_map_table() {
            StackMapFormat::Jsr202
        } else {
            StackMapFormat::Cldc
        }
    }
}

/// Turns model classes into serialized-ready [`ClassFile`]s
///
/// The caller hands in the constant pool so that bytecode generated earlier
/// against the same pool keeps its indices valid.
pub struct ClassFileWriter {
    options: WriterOptions,
}

impl ClassFileWriter {
    pub fn new(options: WriterOptions) -> ClassFileWriter {
        ClassFileWriter { options }
    }

    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    /// Lower a class and consume the pool it was built against
    pub fn write_class_file(&self, class: &Class, mut pool: ConstantPool) -> Result<ClassFile, Error> {
        log::debug!("writing class file for {}", class.symbol.name.as_str());

        let mut inner_classes = InnerClassCollector::new();
        inner_classes.enter(&class.symbol);

        // Every class except interfaces and module-info carries ACC_SUPER
        let mut access_flags = class_level_flags(class);
        if !access_flags.contains(ClassAccessFlags::INTERFACE)
            && !access_flags.contains(ClassAccessFlags::MODULE)
        {
            access_flags |= ClassAccessFlags::SUPER;
        }

        let this_class = pool.get_class(class.symbol.name.as_str())?;
        let super_class = match &class.super_class {
            Some(super_class) => {
                inner_classes.enter_class_type(super_class);
                pool.get_class(super_class.symbol.name.as_str())?
            }
            None => ClassConstantIndex::NONE,
        };
        let mut interfaces = Vec::with_capacity(class.interfaces.len());
        for interface in &class.interfaces {
            inner_classes.enter_class_type(interface);
            interfaces.push(pool.get_class(interface.symbol.name.as_str())?);
        }

        let mut fields = Vec::with_capacity(class.fields.len());
        for field in &class.fields {
            fields.push(self.write_field(&mut pool, &mut inner_classes, field)?);
        }
        let mut methods = Vec::with_capacity(class.methods.len());
        for method in &class.methods {
            methods.push(self.write_method(&mut pool, &mut inner_classes, class, method)?);
        }

        let mut attributes = vec![];
        if class.is_generic() {
            let rendered =
                SignatureEncoder::new(&mut inner_classes).class_signature(class);
            let signature = pool.get_utf8(rendered)?;
            attributes.push(pool.get_attribute(Signature { signature })?);
        }
        if self.options.emit_source_file {
            if let Some(source_file) = &class.source_file {
                let name = pool.get_utf8(source_file.as_str())?;
                attributes.push(pool.get_attribute(SourceFile(name))?);
            }
        }
        if class.deprecated {
            attributes.push(pool.get_attribute(Deprecated)?);
        }
        attributes.extend(annotation_attributes(
            &mut pool,
            &mut inner_classes,
            &class.annotations,
        )?);
        if !class.type_annotations.is_empty() {
            self.require_type_annotations()?;
            attributes.extend(type_annotation_attributes(
                &mut pool,
                &mut inner_classes,
                AnnotatedContext::Class,
                &class.type_annotations,
            )?);
        }
        if let Some(enclosing_method) = self.enclosing_method(&mut pool, class)? {
            attributes.push(enclosing_method);
        }
        if let Some(module) = &class.module {
            if !self.options.version.has_modules() {
                return Err(Error::UnsupportedFeature {
                    feature: "Module attribute",
                    requires: Version::JAVA9,
                    actual: self.options.version,
                });
            }
            attributes.push(module_attribute(&mut pool, module)?);
        }
        if !inner_classes.is_empty() {
            let inner_classes = inner_classes.into_attribute(&mut pool)?;
            attributes.push(pool.get_attribute(inner_classes)?);
        }
        if !pool.bootstrap_methods().is_empty() {
            if !self.options.version.has_invokedynamic() {
                return Err(Error::UnsupportedFeature {
                    feature: "BootstrapMethods attribute",
                    requires: Version::JAVA7,
                    actual: self.options.version,
                });
            }
            let bootstrap_methods = BootstrapMethods(pool.bootstrap_methods().to_vec());
            attributes.push(pool.get_attribute(bootstrap_methods)?);
        }

        let (constants, _) = pool.into_parts();
        Ok(ClassFile {
            version: self.options.version,
            constants,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            attributes,
        })
    }

    fn write_field(
        &self,
        pool: &mut ConstantPool,
        inner_classes: &mut InnerClassCollector,
        field: &Field,
    ) -> Result<FieldInfo, Error> {
        inner_classes.enter_type(&field.field_type);
        let name_index = pool.get_utf8(field.name.as_str())?;
        let descriptor_index = pool.get_utf8(field.field_type.erased().render())?;

        let mut attributes = vec![];
        if let Some(constant_value) = &field.constant_value {
            let index = match constant_value {
                ConstValue::Int(value) => pool.get_integer(*value)?,
                ConstValue::Float(value) => pool.get_float(*value)?,
                ConstValue::Long(value) => pool.get_long(*value)?,
                ConstValue::Double(value) => pool.get_double(*value)?,
                ConstValue::String(value) => pool.get_string(value)?.0,
            };
            attributes.push(pool.get_attribute(ConstantValue(index))?);
        }
        if field.field_type.is_generic() {
            let rendered =
                SignatureEncoder::new(inner_classes).field_signature(&field.field_type);
            let signature = pool.get_utf8(rendered)?;
            attributes.push(pool.get_attribute(Signature { signature })?);
        }
        if field.deprecated {
            attributes.push(pool.get_attribute(Deprecated)?);
        }
        attributes.extend(annotation_attributes(pool, inner_classes, &field.annotations)?);
        if !field.type_annotations.is_empty() {
            self.require_type_annotations()?;
            attributes.extend(type_annotation_attributes(
                pool,
                inner_classes,
                AnnotatedContext::Field,
                &field.type_annotations,
            )?);
        }

        Ok(FieldInfo {
            access_flags: field.access_flags,
            name_index,
            descriptor_index,
            attributes,
        })
    }

    fn write_method(
        &self,
        pool: &mut ConstantPool,
        inner_classes: &mut InnerClassCollector,
        class: &Class,
        method: &Method,
    ) -> Result<MethodInfo, Error> {
        let descriptor = method.descriptor();
        let parameter_length = descriptor.parameter_length(!method.is_static());
        if parameter_length > 255 {
            return Err(Error::MethodParameterOverflow {
                method: format!(
                    "{}.{}",
                    class.symbol.name.as_str(),
                    method.name.as_str()
                ),
                parameter_length,
            });
        }

        for parameter in &method.parameters {
            inner_classes.enter_type(&parameter.parameter_type);
        }
        if let Some(return_type) = &method.return_type {
            inner_classes.enter_type(return_type);
        }
        for thrown in &method.thrown_types {
            inner_classes.enter_type(thrown);
        }

        let name_index = pool.get_utf8(method.name.as_str())?;
        let descriptor_index = pool.get_utf8(descriptor.render())?;

        let mut attributes = vec![];
        if let Some(code) = &method.code {
            attributes.push(self.write_code(pool, inner_classes, class, method, code)?);
        }
        if !method.thrown_types.is_empty() {
            let mut exceptions = Vec::with_capacity(method.thrown_types.len());
            for thrown in &method.thrown_types {
                let erased = thrown.erased();
                let class_name = match erased.as_class_name() {
                    Some(name) => name,
                    None => erased.render(),
                };
                exceptions.push(pool.get_class(&class_name)?);
            }
            attributes.push(pool.get_attribute(Exceptions(exceptions))?);
        }
        if method.is_generic() {
            let rendered = SignatureEncoder::new(inner_classes).method_signature(method);
            let signature = pool.get_utf8(rendered)?;
            attributes.push(pool.get_attribute(Signature { signature })?);
        }
        if method.deprecated {
            attributes.push(pool.get_attribute(Deprecated)?);
        }
        if self.options.emit_method_parameters && !method.parameters.is_empty() {
            if !self.options.version.has_method_parameters() {
                return Err(Error::UnsupportedFeature {
                    feature: "MethodParameters attribute",
                    requires: Version::JAVA8,
                    actual: self.options.version,
                });
            }
            let mut parameters = Vec::with_capacity(method.parameters.len());
            for parameter in &method.parameters {
                let name = match &parameter.name {
                    Some(name) => Some(pool.get_utf8(name.as_str())?),
                    None => None,
                };
                parameters.push(MethodParameter {
                    name,
                    access_flags: parameter.access_flags,
                });
            }
            attributes.push(pool.get_attribute(MethodParameters(parameters))?);
        }
        attributes.extend(annotation_attributes(pool, inner_classes, &method.annotations)?);
        attributes.extend(parameter_annotation_attributes(
            pool,
            inner_classes,
            &method.parameters,
        )?);
        if !method.type_annotations.is_empty() {
            self.require_type_annotations()?;
            attributes.extend(type_annotation_attributes(
                pool,
                inner_classes,
                AnnotatedContext::Method,
                &method.type_annotations,
            )?);
        }
        if let Some(default) = &method.annotation_default {
            let lowered = annotations::lower_element_value(pool, inner_classes, default)?;
            attributes.push(pool.get_attribute(AnnotationDefault(lowered))?);
        }

        Ok(MethodInfo {
            access_flags: method.access_flags,
            name_index,
            descriptor_index,
            attributes,
        })
    }

    fn write_code(
        &self,
        pool: &mut ConstantPool,
        inner_classes: &mut InnerClassCollector,
        class: &Class,
        method: &Method,
        code: &Code,
    ) -> Result<Attribute, Error> {
        let mut exception_table = Vec::with_capacity(code.exception_table.len());
        for entry in &code.exception_table {
            let catch_type = match &entry.catch_type {
                Some(catch_type) => {
                    inner_classes.enter_class_type(catch_type);
                    pool.get_class(catch_type.symbol.name.as_str())?
                }
                None => ClassConstantIndex::NONE,
            };
            exception_table.push(ExceptionHandler {
                start_pc: entry.start_pc,
                end_pc: entry.end_pc,
                handler_pc: entry.handler_pc,
                catch_type,
            });
        }

        let mut attributes = vec![];
        if !code.line_numbers.is_empty() {
            let line_numbers = code
                .line_numbers
                .iter()
                .map(|entry| LineNumber {
                    start_pc: entry.start_pc,
                    line_number: entry.line_number,
                })
                .collect();
            attributes.push(pool.get_attribute(LineNumberTable(line_numbers))?);
        }
        if !code.local_variables.is_empty() {
            let mut table = Vec::with_capacity(code.local_variables.len());
            for entry in &code.local_variables {
                inner_classes.enter_type(&entry.var_type);
                table.push(LocalVariable {
                    start_pc: entry.start_pc,
                    length: entry.length,
                    name: pool.get_utf8(entry.name.as_str())?,
                    descriptor: pool.get_utf8(entry.var_type.erased().render())?,
                    index: entry.index,
                });
            }
            attributes.push(pool.get_attribute(LocalVariableTable(table))?);

            // Variables with generic types additionally record signatures
            let mut type_table = vec![];
            for entry in &code.local_variables {
                if !entry.var_type.is_generic() {
                    continue;
                }
                let rendered =
                    SignatureEncoder::new(inner_classes).field_signature(&entry.var_type);
                type_table.push(LocalVariable {
                    start_pc: entry.start_pc,
                    length: entry.length,
                    name: pool.get_utf8(entry.name.as_str())?,
                    descriptor: pool.get_utf8(rendered)?,
                    index: entry.index,
                });
            }
            if !type_table.is_empty() {
                attributes.push(pool.get_attribute(LocalVariableTypeTable(type_table))?);
            }
        }
        if !code.frames.is_empty() {
            match self.options.stack_map_format() {
                StackMapFormat::Jsr202 => {
                    let initial = initial_locals(class, method);
                    let table =
                        compressed_table(pool, inner_classes, &initial, &code.frames)?;
                    attributes.push(pool.get_attribute(table)?);
                }
                StackMapFormat::Cldc => {
                    let table = legacy_table(pool, inner_classes, &code.frames)?;
                    attributes.push(pool.get_attribute(table)?);
                }
            }
        }
        if !code.type_annotations.is_empty() {
            self.require_type_annotations()?;
            attributes.extend(type_annotation_attributes(
                pool,
                inner_classes,
                AnnotatedContext::Code,
                &code.type_annotations,
            )?);
        }

        pool.get_attribute(crate::class_file::Code {
            max_stack: code.max_stack,
            max_locals: code.max_locals,
            code_array: BytecodeArray(code.bytecode.clone()),
            exception_table,
            attributes,
        })
    }

    /// `EnclosingMethod`, present on local and anonymous classes only
    fn enclosing_method(
        &self,
        pool: &mut ConstantPool,
        class: &Class,
    ) -> Result<Option<Attribute>, Error> {
        let (enclosing, enclosing_method) = match &class.symbol.nesting {
            Nesting::Local {
                enclosing,
                enclosing_method,
                ..
            }
            | Nesting::Anonymous {
                enclosing,
                enclosing_method,
            } => (enclosing, enclosing_method),
            Nesting::TopLevel | Nesting::Member { .. } => return Ok(None),
        };

        let enclosing_class = pool.get_class(enclosing.name.as_str())?;
        let method = match enclosing_method {
            Some(method) => Some(pool.get_name_and_type(
                method.name.as_str(),
                &method.descriptor.render(),
            )?),
            None => None,
        };
        Ok(Some(pool.get_attribute(EnclosingMethod {
            class: enclosing_class,
            method,
        })?))
    }

    fn require_type_annotations(&self) -> Result<(), Error> {
        if self.options.version.has_type_annotations() {
            Ok(())
        } else {
            Err(Error::UnsupportedFeature {
                feature: "type annotations",
                requires: Version::JAVA8,
                actual: self.options.version,
            })
        }
    }
}

/// Class-level flags for the `access_flags` slot
///
/// Nested classes keep their source modifiers in their `InnerClasses` entry;
/// at the class level protected widens to public and private narrows to
/// package-private.
fn class_level_flags(class: &Class) -> ClassAccessFlags {
    let mut flags = class.access_flags;
    if class.symbol.is_nested() {
        if class.symbol.flags.contains(InnerClassAccessFlags::PROTECTED) {
            flags |= ClassAccessFlags::PUBLIC;
        }
        if class.symbol.flags.contains(InnerClassAccessFlags::PRIVATE) {
            flags -= ClassAccessFlags::PUBLIC;
        }
    }
    flags
}
