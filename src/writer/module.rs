use crate::class_file::{Attribute, ConstantPool, Exports, Module, Opens, Provides, Requires};
use crate::errors::Error;
use crate::model::ModuleDescriptor;
use crate::names::Name;

/// Lower a module declaration into the `Module` attribute
///
/// Module names go into `CONSTANT_Module` entries in their dotted source form;
/// package names go into `CONSTANT_Package` entries in internal slashed form.
pub fn module_attribute(
    pool: &mut ConstantPool,
    descriptor: &ModuleDescriptor,
) -> Result<Attribute, Error> {
    let module_name = pool.get_module(&descriptor.name)?;
    let module_version = match &descriptor.version {
        Some(version) => Some(pool.get_utf8(version.as_str())?),
        None => None,
    };

    let mut requires = Vec::with_capacity(descriptor.requires.len());
    for directive in &descriptor.requires {
        requires.push(Requires {
            module: pool.get_module(&directive.module)?,
            flags: directive.flags,
            version: match &directive.version {
                Some(version) => Some(pool.get_utf8(version.as_str())?),
                None => None,
            },
        });
    }

    let mut exports = Vec::with_capacity(descriptor.exports.len());
    for directive in &descriptor.exports {
        let mut to = Vec::with_capacity(directive.to.len());
        for module in &directive.to {
            to.push(pool.get_module(module)?);
        }
        exports.push(Exports {
            package: pool.get_package(&directive.package)?,
            flags: directive.flags,
            to,
        });
    }

    let mut opens = Vec::with_capacity(descriptor.opens.len());
    for directive in &descriptor.opens {
        let mut to = Vec::with_capacity(directive.to.len());
        for module in &directive.to {
            to.push(pool.get_module(module)?);
        }
        opens.push(Opens {
            package: pool.get_package(&directive.package)?,
            flags: directive.flags,
            to,
        });
    }

    let mut uses = Vec::with_capacity(descriptor.uses.len());
    for service in &descriptor.uses {
        uses.push(pool.get_class(service.as_str())?);
    }

    let mut provides = Vec::with_capacity(descriptor.provides.len());
    for directive in &descriptor.provides {
        let mut with = Vec::with_capacity(directive.with.len());
        for implementation in &directive.with {
            with.push(pool.get_class(implementation.as_str())?);
        }
        provides.push(Provides {
            service: pool.get_class(directive.service.as_str())?,
            with,
        });
    }

    pool.get_attribute(Module {
        module_name,
        module_flags: descriptor.flags,
        module_version,
        requires,
        exports,
        opens,
        uses,
        provides,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::access_flags::{ExportsFlags, ModuleFlags, RequiresFlags};
    use crate::model::{ExportsDirective, ProvidesDirective, RequiresDirective};
    use crate::names::BinaryName;

    #[test]
    fn names_intern_in_their_wire_forms() {
        let mut pool = ConstantPool::new();
        let descriptor = ModuleDescriptor {
            name: String::from("com.example.app"),
            flags: ModuleFlags::empty(),
            version: Some(String::from("1.0")),
            requires: vec![RequiresDirective {
                module: String::from("java.base"),
                flags: RequiresFlags::MANDATED,
                version: None,
            }],
            exports: vec![ExportsDirective {
                package: String::from("com/example/app/api"),
                flags: ExportsFlags::empty(),
                to: vec![],
            }],
            opens: vec![],
            uses: vec![BinaryName::from_string(String::from(
                "com/example/app/spi/Plugin",
            ))
            .unwrap()],
            provides: vec![ProvidesDirective {
                service: BinaryName::from_string(String::from("com/example/app/spi/Plugin"))
                    .unwrap(),
                with: vec![BinaryName::from_string(String::from(
                    "com/example/app/impl/DefaultPlugin",
                ))
                .unwrap()],
            }],
        };

        let attribute = module_attribute(&mut pool, &descriptor).unwrap();
        assert_eq!(attribute.name_index, pool.get_utf8("Module").unwrap());

        // Dotted module names and slashed package names both land in the pool
        assert!(pool.lookup_utf8("com.example.app").is_some());
        assert!(pool.lookup_utf8("java.base").is_some());
        assert!(pool.lookup_utf8("com/example/app/api").is_some());
        assert!(pool.lookup_utf8("1.0").is_some());
    }
}
