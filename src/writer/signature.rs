use crate::descriptors::RenderDescriptor;
use crate::model::{Class, ClassSymbol, ClassType, Method, Type, TypeArg, TypeParameter};
use crate::names::Name;
use crate::writer::InnerClassCollector;

/// Renders generic signatures (JVMS 4.7.9.1)
///
/// Signatures are only worth emitting when erasure loses information; the
/// caller checks `is_generic` before asking for one. Every class type that
/// gets rendered is also entered into the inner-class collector, since its
/// name now appears in the constant pool.
pub struct SignatureEncoder<'a> {
    collector: &'a mut InnerClassCollector,
}

impl<'a> SignatureEncoder<'a> {
    pub fn new(collector: &'a mut InnerClassCollector) -> SignatureEncoder<'a> {
        SignatureEncoder { collector }
    }

    /// `ClassSignature`: type parameters, super class, super interfaces
    pub fn class_signature(&mut self, class: &Class) -> String {
        let mut out = String::new();
        self.type_parameters(&mut out, &class.type_parameters);
        match &class.super_class {
            Some(super_class) => self.class_type_signature(&mut out, super_class),
            None => out.push_str("Ljava/lang/Object;"),
        }
        for interface in &class.interfaces {
            self.class_type_signature(&mut out, interface);
        }
        out
    }

    /// `MethodSignature`: type parameters, parameters, return, throws
    ///
    /// The throws clause is only rendered when some thrown type is itself
    /// generic; otherwise the `Exceptions` attribute already says everything.
    pub fn method_signature(&mut self, method: &Method) -> String {
        let mut out = String::new();
        self.type_parameters(&mut out, &method.type_parameters);
        out.push('(');
        for parameter in &method.parameters {
            self.type_signature(&mut out, &parameter.parameter_type);
        }
        out.push(')');
        match &method.return_type {
            Some(return_type) => self.type_signature(&mut out, return_type),
            None => out.push('V'),
        }
        if method.thrown_types.iter().any(Type::is_generic) {
            for thrown in &method.thrown_types {
                out.push('^');
                self.type_signature(&mut out, thrown);
            }
        }
        out
    }

    /// `FieldSignature` (also used for local variable types)
    pub fn field_signature(&mut self, ty: &Type) -> String {
        let mut out = String::new();
        self.type_signature(&mut out, ty);
        out
    }

    fn type_parameters(&mut self, out: &mut String, parameters: &[TypeParameter]) {
        if parameters.is_empty() {
            return;
        }
        out.push('<');
        for parameter in parameters {
            out.push_str(&parameter.name);
            out.push(':');
            match &parameter.class_bound {
                Some(bound) => self.type_signature(out, bound),
                // An interface-only bound leaves the class bound empty; no
                // bound at all means java/lang/Object
                None if parameter.interface_bounds.is_empty() => {
                    out.push_str("Ljava/lang/Object;")
                }
                None => (),
            }
            for bound in &parameter.interface_bounds {
                out.push(':');
                self.type_signature(out, bound);
            }
        }
        out.push('>');
    }

    fn type_signature(&mut self, out: &mut String, ty: &Type) {
        match ty {
            Type::Base(base_type) => base_type.render_to(out),
            Type::Class(class_type) => self.class_type_signature(out, class_type),
            Type::Array(element) => {
                out.push('[');
                self.type_signature(out, element);
            }
            Type::Variable(variable) => {
                out.push('T');
                out.push_str(&variable.name);
                out.push(';');
            }
        }
    }

    fn class_type_signature(&mut self, out: &mut String, class_type: &ClassType) {
        out.push('L');
        self.class_type_body(out, class_type);
        out.push(';');
    }

    fn class_type_body(&mut self, out: &mut String, class_type: &ClassType) {
        self.collector.enter(&class_type.symbol);
        match &class_type.enclosing {
            Some(enclosing) => {
                self.class_type_body(out, enclosing);
                out.push('.');
                out.push_str(segment_name(&class_type.symbol));
            }
            None => out.push_str(class_type.symbol.name.as_str()),
        }
        if !class_type.type_args.is_empty() {
            out.push('<');
            for type_arg in &class_type.type_args {
                match type_arg {
                    TypeArg::Exact(ty) => self.type_signature(out, ty),
                    TypeArg::Extends(ty) => {
                        out.push('+');
                        self.type_signature(out, ty);
                    }
                    TypeArg::Super(ty) => {
                        out.push('-');
                        self.type_signature(out, ty);
                    }
                    TypeArg::Any => out.push('*'),
                }
            }
            out.push('>');
        }
    }
}

/// Name of a nested class as it appears after a `.` in a signature
fn segment_name(symbol: &ClassSymbol) -> &str {
    if let Some(simple_name) = symbol.simple_name() {
        return simple_name.as_str();
    }
    // Anonymous classes fall back to the tail of the flat name
    let flat = symbol.name.as_str();
    match flat.rfind(&['$', '/'][..]) {
        Some(split) => &flat[split + 1..],
        None => flat,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::access_flags::InnerClassAccessFlags;
    use crate::model::{Parameter, TypeVariable};
    use crate::names::{BinaryName, UnqualifiedName};
    use crate::access_flags::MethodAccessFlags;
    use std::rc::Rc;

    fn symbol(name: &str) -> Rc<ClassSymbol> {
        ClassSymbol::top_level(
            BinaryName::from_string(String::from(name)).unwrap(),
            InnerClassAccessFlags::PUBLIC,
        )
    }

    fn type_var(name: &str) -> Type {
        Type::Variable(TypeVariable {
            name: String::from(name),
            bound: symbol("java/lang/Object"),
        })
    }

    fn render_method(method: &Method) -> String {
        let mut collector = InnerClassCollector::new();
        SignatureEncoder::new(&mut collector).method_signature(method)
    }

    #[test]
    fn generic_identity_method() {
        let mut method = Method::new(
            UnqualifiedName::from_string(String::from("identity")).unwrap(),
            MethodAccessFlags::PUBLIC | MethodAccessFlags::STATIC,
            vec![Parameter::named(
                UnqualifiedName::from_string(String::from("x")).unwrap(),
                type_var("T"),
            )],
            Some(type_var("T")),
        );
        method.type_parameters = vec![TypeParameter::unbounded("T")];

        assert_eq!(render_method(&method), "<T:Ljava/lang/Object;>(TT;)TT;");
    }

    #[test]
    fn interface_bounds_leave_class_bound_empty() {
        let comparable = Type::Class(ClassType::parameterized(
            symbol("java/lang/Comparable"),
            vec![TypeArg::Exact(type_var("T"))],
        ));
        let mut method = Method::new(
            UnqualifiedName::from_string(String::from("max")).unwrap(),
            MethodAccessFlags::PUBLIC,
            vec![],
            Some(type_var("T")),
        );
        method.type_parameters = vec![TypeParameter {
            name: String::from("T"),
            class_bound: None,
            interface_bounds: vec![comparable],
        }];

        assert_eq!(
            render_method(&method),
            "<T::Ljava/lang/Comparable<TT;>;>()TT;"
        );
    }

    #[test]
    fn wildcard_arguments() {
        let list_of_extends = Type::Class(ClassType::parameterized(
            symbol("java/util/List"),
            vec![TypeArg::Extends(Type::class(symbol("java/lang/Number")))],
        ));
        let list_of_any = Type::Class(ClassType::parameterized(
            symbol("java/util/List"),
            vec![TypeArg::Any],
        ));

        let mut collector = InnerClassCollector::new();
        let mut encoder = SignatureEncoder::new(&mut collector);
        assert_eq!(
            encoder.field_signature(&list_of_extends),
            "Ljava/util/List<+Ljava/lang/Number;>;"
        );
        assert_eq!(encoder.field_signature(&list_of_any), "Ljava/util/List<*>;");
    }

    #[test]
    fn parameterized_enclosing_chain() {
        let outer = symbol("pkg/Outer");
        let inner = ClassSymbol::member(
            &outer,
            UnqualifiedName::from_string(String::from("Inner")).unwrap(),
            InnerClassAccessFlags::PUBLIC,
        );
        let ty = Type::Class(ClassType {
            symbol: inner.clone(),
            type_args: vec![],
            enclosing: Some(Box::new(ClassType::parameterized(
                outer,
                vec![TypeArg::Exact(Type::class(symbol("java/lang/String")))],
            ))),
        });

        let mut collector = InnerClassCollector::new();
        let mut encoder = SignatureEncoder::new(&mut collector);
        assert_eq!(
            encoder.field_signature(&ty),
            "Lpkg/Outer<Ljava/lang/String;>.Inner;"
        );

        // Rendering a nested class also queues it for the InnerClasses table
        assert_eq!(collector.entries().len(), 1);
        assert_eq!(collector.entries()[0].name.as_str(), "pkg/Outer$Inner");
    }

    #[test]
    fn throws_clause_only_when_generic() {
        let mut plain = Method::new(
            UnqualifiedName::from_string(String::from("run")).unwrap(),
            MethodAccessFlags::PUBLIC,
            vec![Parameter::named(
                UnqualifiedName::from_string(String::from("xs")).unwrap(),
                Type::Class(ClassType::parameterized(
                    symbol("java/util/List"),
                    vec![TypeArg::Exact(type_var("X"))],
                )),
            )],
            None,
        );
        plain.thrown_types = vec![Type::class(symbol("java/io/IOException"))];
        assert_eq!(render_method(&plain), "(Ljava/util/List<TX;>;)V");

        let mut generic_throw = Method::new(
            UnqualifiedName::from_string(String::from("raise")).unwrap(),
            MethodAccessFlags::PUBLIC,
            vec![],
            None,
        );
        generic_throw.type_parameters = vec![TypeParameter {
            name: String::from("X"),
            class_bound: Some(Type::class(symbol("java/lang/Throwable"))),
            interface_bounds: vec![],
        }];
        generic_throw.thrown_types = vec![type_var("X")];
        assert_eq!(
            render_method(&generic_throw),
            "<X:Ljava/lang/Throwable;>()V^TX;"
        );
    }
}
