use crate::access_flags::InnerClassAccessFlags;
use crate::descriptors::MethodDescriptor;
use crate::names::{BinaryName, Name, UnqualifiedName};
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Resolved class or interface symbol
///
/// Symbols are shared (`Rc`) because the enclosing-class chains of nested
/// classes converge: `Outer$A` and `Outer$B` both point at the same `Outer`.
/// Equality and hashing go by the flat binary name, which is unique within
/// one resolution.
#[derive(Debug)]
pub struct ClassSymbol {
    /// Flat binary name (`pkg/Outer$Inner`)
    pub name: BinaryName,

    /// Flags as they should appear in an `InnerClasses` entry
    pub flags: InnerClassAccessFlags,

    pub nesting: Nesting,
}

/// How a class sits inside its enclosing program structure
#[derive(Debug)]
pub enum Nesting {
    TopLevel,

    /// Member class or interface (`class Outer { class Inner {} }`)
    Member {
        enclosing: Rc<ClassSymbol>,
        simple_name: UnqualifiedName,
    },

    /// Class declared inside a method body
    Local {
        enclosing: Rc<ClassSymbol>,
        enclosing_method: Option<EnclosingMethodRef>,
        simple_name: UnqualifiedName,
    },

    /// Anonymous class (`new Runnable() { ... }`)
    Anonymous {
        enclosing: Rc<ClassSymbol>,
        enclosing_method: Option<EnclosingMethodRef>,
    },
}

/// Name and erased descriptor of the method immediately enclosing a local or
/// anonymous class; absent when the class sits in an initializer
#[derive(Debug, Clone)]
pub struct EnclosingMethodRef {
    pub name: UnqualifiedName,
    pub descriptor: MethodDescriptor,
}

impl ClassSymbol {
    pub fn top_level(name: BinaryName, flags: InnerClassAccessFlags) -> Rc<ClassSymbol> {
        Rc::new(ClassSymbol {
            name,
            flags,
            nesting: Nesting::TopLevel,
        })
    }

    /// Member class; the flat name is derived from the enclosing class
    pub fn member(
        enclosing: &Rc<ClassSymbol>,
        simple_name: UnqualifiedName,
        flags: InnerClassAccessFlags,
    ) -> Rc<ClassSymbol> {
        let name = BinaryName::from_string(format!(
            "{}${}",
            enclosing.name.as_str(),
            simple_name.as_str()
        ))
        .expect("member class name is valid");
        Rc::new(ClassSymbol {
            name,
            flags,
            nesting: Nesting::Member {
                enclosing: enclosing.clone(),
                simple_name,
            },
        })
    }

    pub fn is_nested(&self) -> bool {
        !matches!(self.nesting, Nesting::TopLevel)
    }

    /// Enclosing class, if any
    pub fn enclosing(&self) -> Option<&Rc<ClassSymbol>> {
        match &self.nesting {
            Nesting::TopLevel => None,
            Nesting::Member { enclosing, .. }
            | Nesting::Local { enclosing, .. }
            | Nesting::Anonymous { enclosing, .. } => Some(enclosing),
        }
    }

    /// Simple source name (`None` for anonymous classes)
    pub fn simple_name(&self) -> Option<&UnqualifiedName> {
        match &self.nesting {
            Nesting::TopLevel | Nesting::Anonymous { .. } => None,
            Nesting::Member { simple_name, .. } | Nesting::Local { simple_name, .. } => {
                Some(simple_name)
            }
        }
    }

    /// Member classes record their immediate enclosing class in the
    /// `InnerClasses` table; local and anonymous classes do not
    pub fn member_of(&self) -> Option<&Rc<ClassSymbol>> {
        match &self.nesting {
            Nesting::Member { enclosing, .. } => Some(enclosing),
            _ => None,
        }
    }

    pub fn is_interface(&self) -> bool {
        self.flags.contains(InnerClassAccessFlags::INTERFACE)
    }
}

impl PartialEq for ClassSymbol {
    fn eq(&self, other: &ClassSymbol) -> bool {
        self.name == other.name
    }
}

impl Eq for ClassSymbol {}

impl Hash for ClassSymbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn member_names_are_flattened() {
        let outer = ClassSymbol::top_level(
            BinaryName::from_string(String::from("pkg/Outer")).unwrap(),
            InnerClassAccessFlags::PUBLIC,
        );
        let inner = ClassSymbol::member(
            &outer,
            UnqualifiedName::from_string(String::from("Inner")).unwrap(),
            InnerClassAccessFlags::PUBLIC | InnerClassAccessFlags::STATIC,
        );
        assert_eq!(inner.name.as_str(), "pkg/Outer$Inner");
        assert_eq!(inner.enclosing().unwrap().name.as_str(), "pkg/Outer");
        assert!(inner.is_nested());
        assert!(!outer.is_nested());
    }
}
