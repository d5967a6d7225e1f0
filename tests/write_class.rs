//! End-to-end tests that lower model classes and pick apart the results

use classgen::class_file::{
    Attribute, ClassFile, Constant, ConstantPool, HandleKind, Serialize, Version,
};
use classgen::model::{
    Class, ClassSymbol, ClassType, Code, Field, FrameSnapshot, Method, Parameter, Type,
    TypeParameter, TypeVariable, VerificationType,
};
use classgen::writer::{ClassFileWriter, WriterOptions};
use classgen::{
    BaseType, BinaryName, ClassAccessFlags, FieldAccessFlags, InnerClassAccessFlags,
    MethodAccessFlags, Name, UnqualifiedName,
};
use pretty_assertions::assert_eq;
use std::rc::Rc;

fn symbol(name: &str) -> Rc<ClassSymbol> {
    ClassSymbol::top_level(
        BinaryName::from_string(String::from(name)).unwrap(),
        InnerClassAccessFlags::PUBLIC,
    )
}

fn name(value: &str) -> UnqualifiedName {
    UnqualifiedName::from_string(String::from(value)).unwrap()
}

fn object_type() -> ClassType {
    ClassType::raw(symbol("java/lang/Object"))
}

/// Offset of a utf8 constant in the written pool, if present
fn utf8_offset(class_file: &ClassFile, expected: &str) -> Option<u16> {
    class_file
        .constants
        .iter()
        .find_map(|(offset, _, constant)| match constant {
            Constant::Utf8(string) if string == expected => Some(offset.0 as u16),
            _ => None,
        })
}

fn attribute_named<'a>(
    class_file: &ClassFile,
    attributes: &'a [Attribute],
    name: &str,
) -> Option<&'a Attribute> {
    let name_offset = utf8_offset(class_file, name)?;
    attributes
        .iter()
        .find(|attribute| attribute.name_index.0 .0 == name_offset)
}

fn write(class: &Class) -> ClassFile {
    let writer = ClassFileWriter::new(WriterOptions::for_version(Version::JAVA11));
    writer
        .write_class_file(class, ConstantPool::new())
        .expect("class writes cleanly")
}

#[test]
fn magic_and_version_lead_the_file() {
    let class = Class::new(
        symbol("pkg/Empty"),
        ClassAccessFlags::PUBLIC,
        Some(object_type()),
    );
    let class_file = write(&class);

    let mut bytes = vec![];
    class_file.serialize(&mut bytes).unwrap();
    assert_eq!(&bytes[..4], &ClassFile::MAGIC);
    assert_eq!(&bytes[4..8], &[0, 0, 0, 55]);
}

#[test]
fn only_generic_methods_get_signatures() {
    let mut class = Class::new(
        symbol("pkg/Util"),
        ClassAccessFlags::PUBLIC,
        Some(object_type()),
    );

    let t = Type::Variable(TypeVariable {
        name: String::from("T"),
        bound: symbol("java/lang/Object"),
    });
    let mut identity = Method::new(
        name("identity"),
        MethodAccessFlags::PUBLIC | MethodAccessFlags::STATIC,
        vec![Parameter::named(name("x"), t.clone())],
        Some(t),
    );
    identity.type_parameters = vec![TypeParameter::unbounded("T")];
    class.methods.push(identity);

    class.methods.push(Method::new(
        name("add"),
        MethodAccessFlags::PUBLIC | MethodAccessFlags::STATIC,
        vec![
            Parameter::named(name("a"), Type::Base(BaseType::Int)),
            Parameter::named(name("b"), Type::Base(BaseType::Int)),
        ],
        Some(Type::Base(BaseType::Int)),
    ));

    let class_file = write(&class);

    let identity_info = &class_file.methods[0];
    let signature = attribute_named(&class_file, &identity_info.attributes, "Signature")
        .expect("generic method has a Signature attribute");
    let rendered = utf8_offset(&class_file, "<T:Ljava/lang/Object;>(TT;)TT;")
        .expect("signature string is interned");
    assert_eq!(signature.info, rendered.to_be_bytes().to_vec());

    let add_info = &class_file.methods[1];
    assert!(attribute_named(&class_file, &add_info.attributes, "Signature").is_none());
    assert!(utf8_offset(&class_file, "(II)I").is_some());
}

#[test]
fn code_attribute_carries_frames_and_line_numbers() {
    let mut class = Class::new(
        symbol("pkg/Looping"),
        ClassAccessFlags::PUBLIC,
        Some(object_type()),
    );

    let mut count_down = Method::new(
        name("countDown"),
        MethodAccessFlags::PUBLIC | MethodAccessFlags::STATIC,
        vec![Parameter::named(name("n"), Type::Base(BaseType::Int))],
        None,
    );
    count_down.code = Some(Code {
        max_stack: 1,
        max_locals: 1,
        // iload_0, ifle +5, iinc 0 -1, goto -7, return
        bytecode: vec![0x1a, 0x9e, 0x00, 0x08, 0x84, 0x00, 0xff, 0xa7, 0xff, 0xf9, 0xb1],
        exception_table: vec![],
        frames: vec![
            FrameSnapshot {
                pc: 0,
                locals: vec![VerificationType::Integer],
                stack: vec![],
            },
            FrameSnapshot {
                pc: 10,
                locals: vec![VerificationType::Integer],
                stack: vec![],
            },
        ],
        line_numbers: vec![],
        local_variables: vec![],
        type_annotations: vec![],
    });
    class.methods.push(count_down);

    let class_file = write(&class);
    let method_info = &class_file.methods[0];
    let code = attribute_named(&class_file, &method_info.attributes, "Code")
        .expect("method body becomes a Code attribute");

    // max_stack, max_locals, then the 4-byte code length
    assert_eq!(&code.info[..4], &[0, 1, 0, 1]);
    assert_eq!(&code.info[4..8], &[0, 0, 0, 11]);

    let table_name = utf8_offset(&class_file, "StackMapTable").unwrap();
    let start = 8 + 11 + 2 /* empty exception table */ + 2 /* attribute count */;
    assert_eq!(
        &code.info[start..start + 2],
        &table_name.to_be_bytes()
    );
    // Two frames compress to same_frame (tag 0) and same_frame (tag 9)
    assert_eq!(&code.info[start + 6..], &[0, 2, 0, 9]);
}

#[test]
fn nested_references_produce_ordered_inner_class_entries() {
    let top = symbol("pkg/Top");
    let outer = ClassSymbol::member(&top, name("Outer"), InnerClassAccessFlags::PUBLIC);
    let inner = ClassSymbol::member(
        &outer,
        name("Inner"),
        InnerClassAccessFlags::PUBLIC | InnerClassAccessFlags::STATIC,
    );

    // The class being written is itself a member class
    let mut class = Class::new(
        inner.clone(),
        ClassAccessFlags::PUBLIC,
        Some(object_type()),
    );
    class.fields.push(Field::new(
        name("sibling"),
        FieldAccessFlags::PRIVATE,
        Type::class(ClassSymbol::member(
            &top,
            name("Other"),
            InnerClassAccessFlags::PRIVATE,
        )),
    ));

    let class_file = write(&class);
    let attribute = attribute_named(&class_file, &class_file.attributes, "InnerClasses")
        .expect("nested references produce an InnerClasses attribute");

    // Decode entries: each is inner_class, outer_class, inner_name, flags
    let entry_count = u16::from_be_bytes([attribute.info[0], attribute.info[1]]);
    assert_eq!(entry_count, 3);

    let class_name_at = |index: u16| -> &str {
        let utf8_index = class_file
            .constants
            .iter()
            .find_map(|(offset, _, constant)| match constant {
                Constant::Class(utf8) if offset.0 as u16 == index => Some(utf8.0 .0),
                _ => None,
            })
            .expect("class constant exists");
        class_file
            .constants
            .iter()
            .find_map(|(offset, _, constant)| match constant {
                Constant::Utf8(string) if offset.0 as u16 == utf8_index => Some(string.as_str()),
                _ => None,
            })
            .expect("utf8 constant exists")
    };

    let recorded: Vec<&str> = (0..3)
        .map(|i| {
            let base = 2 + i * 8;
            let index = u16::from_be_bytes([attribute.info[base], attribute.info[base + 1]]);
            class_name_at(index)
        })
        .collect();

    // Enclosing classes come before the classes they enclose
    assert_eq!(
        recorded,
        vec!["pkg/Top$Outer", "pkg/Top$Outer$Inner", "pkg/Top$Other"]
    );
}

#[test]
fn constant_values_and_source_files_are_attached() {
    let mut class = Class::new(
        symbol("pkg/Constants"),
        ClassAccessFlags::PUBLIC | ClassAccessFlags::FINAL,
        Some(object_type()),
    );
    class.source_file = Some(String::from("Constants.java"));

    let mut answer = Field::new(
        name("ANSWER"),
        FieldAccessFlags::PUBLIC | FieldAccessFlags::STATIC | FieldAccessFlags::FINAL,
        Type::Base(BaseType::Int),
    );
    answer.constant_value = Some(classgen::model::ConstValue::Int(42));
    class.fields.push(answer);

    let mut greeting = Field::new(
        name("GREETING"),
        FieldAccessFlags::PUBLIC | FieldAccessFlags::STATIC | FieldAccessFlags::FINAL,
        Type::class(symbol("java/lang/String")),
    );
    greeting.constant_value = Some(classgen::model::ConstValue::String(String::from("hello")));
    class.fields.push(greeting);

    let class_file = write(&class);

    let source_file = attribute_named(&class_file, &class_file.attributes, "SourceFile")
        .expect("SourceFile attribute is present");
    let file_name = utf8_offset(&class_file, "Constants.java").unwrap();
    assert_eq!(source_file.info, file_name.to_be_bytes().to_vec());

    for field in &class_file.fields {
        let constant_value = attribute_named(&class_file, &field.attributes, "ConstantValue")
            .expect("static final field has a ConstantValue attribute");
        assert_eq!(constant_value.info.len(), 2);
    }

    // The string constant is a CONSTANT_String entry, not just the utf8
    let hello = utf8_offset(&class_file, "hello").unwrap();
    let has_string_constant = class_file
        .constants
        .iter()
        .any(|(_, _, constant)| matches!(constant, Constant::String(utf8) if utf8.0 .0 == hello));
    assert!(has_string_constant);
}

#[test]
fn preinterned_call_sites_yield_bootstrap_methods() {
    let mut pool = ConstantPool::new();
    let factory = pool
        .get_method_ref(
            "java/lang/invoke/LambdaMetafactory",
            "metafactory",
            "(Ljava/lang/invoke/MethodHandles$Lookup;Ljava/lang/String;Ljava/lang/invoke/MethodType;Ljava/lang/invoke/MethodType;Ljava/lang/invoke/MethodHandle;Ljava/lang/invoke/MethodType;)Ljava/lang/invoke/CallSite;",
            false,
        )
        .unwrap();
    let handle = pool
        .get_method_handle(HandleKind::InvokeStatic, factory.into())
        .unwrap();
    let bsm = pool.get_bootstrap_method(handle, vec![]);
    pool.get_invoke_dynamic(bsm, "run", "()Ljava/lang/Runnable;")
        .unwrap();

    let class = Class::new(
        symbol("pkg/Lambdas"),
        ClassAccessFlags::PUBLIC,
        Some(object_type()),
    );
    let writer = ClassFileWriter::new(WriterOptions::for_version(Version::JAVA11));
    let class_file = writer.write_class_file(&class, pool).unwrap();

    let attribute = attribute_named(&class_file, &class_file.attributes, "BootstrapMethods")
        .expect("pre-interned call site produces a BootstrapMethods attribute");

    // One entry: the metafactory handle with no static arguments
    let mut expected = vec![0, 1];
    expected.extend(handle.0.to_be_bytes());
    expected.extend([0, 0]);
    assert_eq!(attribute.info, expected);
}

#[test]
fn deprecated_marker_is_empty() {
    let mut class = Class::new(
        symbol("pkg/Old"),
        ClassAccessFlags::PUBLIC,
        Some(object_type()),
    );
    class.deprecated = true;

    let class_file = write(&class);
    let deprecated = attribute_named(&class_file, &class_file.attributes, "Deprecated")
        .expect("Deprecated attribute is present");
    assert!(deprecated.info.is_empty());
}
