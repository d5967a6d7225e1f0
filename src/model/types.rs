use crate::descriptors::{BaseType, FieldType};
use crate::model::ClassSymbol;
use std::rc::Rc;

/// A resolved source-level type, before erasure
///
/// This is the input to both descriptor rendering (which erases) and
/// signature rendering (which does not).
#[derive(Debug, Clone)]
pub enum Type {
    Base(BaseType),
    Class(ClassType),
    Array(Box<Type>),
    Variable(TypeVariable),
}

/// Possibly-parameterized reference to a class, with the chain of enclosing
/// instances when an inner class is viewed through a parameterized outer one
/// (`Outer<T>.Inner`)
#[derive(Debug, Clone)]
pub struct ClassType {
    pub symbol: Rc<ClassSymbol>,
    pub type_args: Vec<TypeArg>,
    pub enclosing: Option<Box<ClassType>>,
}

/// Use of a type variable; the bound is what the variable erases to
#[derive(Debug, Clone)]
pub struct TypeVariable {
    pub name: String,
    pub bound: Rc<ClassSymbol>,
}

/// Argument of a parameterized type
#[derive(Debug, Clone)]
pub enum TypeArg {
    Exact(Type),
    Extends(Type),
    Super(Type),

    /// Unbounded wildcard `?`
    Any,
}

/// Declaration of a type parameter (on a class or a method)
#[derive(Debug, Clone)]
pub struct TypeParameter {
    pub name: String,
    pub class_bound: Option<Type>,
    pub interface_bounds: Vec<Type>,
}

/// Compile-time constant, as used by `ConstantValue`
#[derive(Debug, Clone)]
pub enum ConstValue {
    /// Also covers `boolean`, `byte`, `char`, and `short`
    Int(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    String(String),
}

impl ClassType {
    /// Raw (non-parameterized) use of a class
    pub fn raw(symbol: Rc<ClassSymbol>) -> ClassType {
        ClassType {
            symbol,
            type_args: vec![],
            enclosing: None,
        }
    }

    pub fn parameterized(symbol: Rc<ClassSymbol>, type_args: Vec<TypeArg>) -> ClassType {
        ClassType {
            symbol,
            type_args,
            enclosing: None,
        }
    }

    /// True if the erasure of this type loses information
    pub fn is_generic(&self) -> bool {
        !self.type_args.is_empty()
            || self
                .enclosing
                .as_ref()
                .map_or(false, |enclosing| enclosing.is_generic())
    }
}

impl Type {
    pub fn class(symbol: Rc<ClassSymbol>) -> Type {
        Type::Class(ClassType::raw(symbol))
    }

    pub fn array(element: Type) -> Type {
        Type::Array(Box::new(element))
    }

    /// True if the descriptor of this type would lose information that the
    /// generic signature preserves
    pub fn is_generic(&self) -> bool {
        match self {
            Type::Base(_) => false,
            Type::Class(class_type) => class_type.is_generic(),
            Type::Array(element) => element.is_generic(),
            Type::Variable(_) => true,
        }
    }

    /// Erase to the descriptor-level type
    pub fn erased(&self) -> FieldType {
        match self {
            Type::Base(base_type) => FieldType::Base(*base_type),
            Type::Class(class_type) => FieldType::Object(class_type.symbol.name.clone()),
            Type::Array(element) => FieldType::Array(Box::new(element.erased())),
            Type::Variable(variable) => FieldType::Object(variable.bound.name.clone()),
        }
    }
}

impl TypeParameter {
    /// An unbounded parameter (`<T>`); its bound in the signature is still
    /// `java/lang/Object`, supplied by the encoder
    pub fn unbounded(name: impl Into<String>) -> TypeParameter {
        TypeParameter {
            name: name.into(),
            class_bound: None,
            interface_bounds: vec![],
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::access_flags::InnerClassAccessFlags;
    use crate::descriptors::RenderDescriptor;
    use crate::names::{BinaryName, Name};

    fn object() -> Rc<ClassSymbol> {
        ClassSymbol::top_level(BinaryName::OBJECT, InnerClassAccessFlags::PUBLIC)
    }

    fn list() -> Rc<ClassSymbol> {
        ClassSymbol::top_level(
            BinaryName::from_string(String::from("java/util/List")).unwrap(),
            InnerClassAccessFlags::PUBLIC | InnerClassAccessFlags::INTERFACE,
        )
    }

    #[test]
    fn erasure_drops_type_arguments() {
        let list_of_t = Type::Class(ClassType::parameterized(
            list(),
            vec![TypeArg::Exact(Type::Variable(TypeVariable {
                name: String::from("T"),
                bound: object(),
            }))],
        ));
        assert!(list_of_t.is_generic());
        assert_eq!(list_of_t.erased().render(), "Ljava/util/List;");
    }

    #[test]
    fn type_variables_erase_to_their_bound() {
        let t = Type::Variable(TypeVariable {
            name: String::from("T"),
            bound: list(),
        });
        assert_eq!(t.erased().render(), "Ljava/util/List;");
        assert_eq!(
            Type::array(t).erased().render(),
            "[Ljava/util/List;"
        );
    }

    #[test]
    fn raw_types_are_not_generic() {
        let raw = Type::class(list());
        assert!(!raw.is_generic());
    }
}
