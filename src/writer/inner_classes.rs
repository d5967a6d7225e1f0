use crate::class_file::{ClassConstantIndex, ConstantPool, InnerClass, InnerClasses};
use crate::errors::Error;
use crate::model::{ClassSymbol, ClassType, Type, TypeArg};
use crate::names::{BinaryName, Name};
use std::collections::HashSet;
use std::rc::Rc;

/// Accumulates the nested classes referenced while writing one class
///
/// Every nested class whose name ends up in the constant pool must get an
/// entry in the `InnerClasses` attribute. Entries are kept in first-entered
/// order, with enclosing classes entered before the classes they enclose, so
/// a reader processing the table front to back always sees an outer class
/// before anything nested in it.
pub struct InnerClassCollector {
    entries: Vec<Rc<ClassSymbol>>,
    seen: HashSet<BinaryName>,
}

impl InnerClassCollector {
    pub fn new() -> InnerClassCollector {
        InnerClassCollector {
            entries: vec![],
            seen: HashSet::new(),
        }
    }

    /// Record a class symbol (and, first, everything enclosing it)
    ///
    /// Top-level classes are never recorded.
    pub fn enter(&mut self, symbol: &Rc<ClassSymbol>) {
        if !symbol.is_nested() || self.seen.contains(&symbol.name) {
            return;
        }
        if let Some(enclosing) = symbol.enclosing() {
            self.enter(enclosing);
        }
        self.seen.insert(symbol.name.clone());
        self.entries.push(symbol.clone());
    }

    /// Record every class mentioned anywhere in a type
    pub fn enter_type(&mut self, ty: &Type) {
        match ty {
            Type::Base(_) => (),
            Type::Class(class_type) => self.enter_class_type(class_type),
            Type::Array(element) => self.enter_type(element),
            Type::Variable(variable) => self.enter(&variable.bound),
        }
    }

    pub fn enter_class_type(&mut self, class_type: &ClassType) {
        self.enter(&class_type.symbol);
        if let Some(enclosing) = &class_type.enclosing {
            self.enter_class_type(enclosing);
        }
        for type_arg in &class_type.type_args {
            match type_arg {
                TypeArg::Exact(ty) | TypeArg::Extends(ty) | TypeArg::Super(ty) => {
                    self.enter_type(ty)
                }
                TypeArg::Any => (),
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Rc<ClassSymbol>] {
        &self.entries
    }

    /// Turn the collected symbols into the attribute body
    pub fn into_attribute(self, pool: &mut ConstantPool) -> Result<InnerClasses, Error> {
        let mut entries = Vec::with_capacity(self.entries.len());
        for symbol in &self.entries {
            let inner_class = pool.get_class(symbol.name.as_str())?;
            let outer_class = match symbol.member_of() {
                Some(enclosing) => pool.get_class(enclosing.name.as_str())?,
                None => ClassConstantIndex::NONE,
            };
            let inner_name = match symbol.simple_name() {
                Some(simple_name) => Some(pool.get_utf8(simple_name.as_str())?),
                None => None,
            };
            entries.push(InnerClass {
                inner_class,
                outer_class,
                inner_name,
                access_flags: symbol.flags,
            });
        }
        Ok(InnerClasses(entries))
    }
}

impl Default for InnerClassCollector {
    fn default() -> InnerClassCollector {
        InnerClassCollector::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::access_flags::InnerClassAccessFlags;
    use crate::names::UnqualifiedName;

    fn name(value: &str) -> UnqualifiedName {
        UnqualifiedName::from_string(String::from(value)).unwrap()
    }

    #[test]
    fn enclosing_classes_come_first() {
        let top = ClassSymbol::top_level(
            BinaryName::from_string(String::from("pkg/Top")).unwrap(),
            InnerClassAccessFlags::PUBLIC,
        );
        let outer = ClassSymbol::member(&top, name("Outer"), InnerClassAccessFlags::PUBLIC);
        let middle = ClassSymbol::member(&outer, name("Middle"), InnerClassAccessFlags::PUBLIC);
        let inner = ClassSymbol::member(&middle, name("Inner"), InnerClassAccessFlags::PUBLIC);

        let mut collector = InnerClassCollector::new();
        collector.enter(&inner);

        let recorded: Vec<&str> = collector
            .entries()
            .iter()
            .map(|symbol| symbol.name.as_str())
            .collect();
        assert_eq!(
            recorded,
            vec!["pkg/Top$Outer", "pkg/Top$Outer$Middle", "pkg/Top$Outer$Middle$Inner"]
        );
    }

    #[test]
    fn top_level_classes_are_not_recorded() {
        let top = ClassSymbol::top_level(
            BinaryName::from_string(String::from("pkg/Top")).unwrap(),
            InnerClassAccessFlags::PUBLIC,
        );
        let mut collector = InnerClassCollector::new();
        collector.enter(&top);
        assert!(collector.is_empty());
    }

    #[test]
    fn entering_twice_records_once() {
        let top = ClassSymbol::top_level(
            BinaryName::from_string(String::from("pkg/Top")).unwrap(),
            InnerClassAccessFlags::PUBLIC,
        );
        let inner = ClassSymbol::member(&top, name("Inner"), InnerClassAccessFlags::PUBLIC);

        let mut collector = InnerClassCollector::new();
        collector.enter(&inner);
        collector.enter(&inner);
        assert_eq!(collector.entries().len(), 1);
    }
}
