use crate::access_flags::{ExportsFlags, ModuleFlags, RequiresFlags};
use crate::class_file::{
    AttributeLike, ClassConstantIndex, ModuleConstantIndex, PackageConstantIndex, Serialize,
    Utf8ConstantIndex,
};
use byteorder::WriteBytesExt;

/// The `Module` attribute, attached to the `module-info` class
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se16/html/jvms-4.html#jvms-4.7.25
pub struct Module {
    pub module_name: ModuleConstantIndex,
    pub module_flags: ModuleFlags,
    pub module_version: Option<Utf8ConstantIndex>,
    pub requires: Vec<Requires>,
    pub exports: Vec<Exports>,
    pub opens: Vec<Opens>,
    pub uses: Vec<ClassConstantIndex>,
    pub provides: Vec<Provides>,
}

impl AttributeLike for Module {
    const NAME: &'static str = "Module";
}

impl Serialize for Module {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.module_name.serialize(writer)?;
        self.module_flags.serialize(writer)?;
        match self.module_version {
            Some(version) => version.serialize(writer)?,
            None => 0u16.serialize(writer)?,
        }
        self.requires.serialize(writer)?;
        self.exports.serialize(writer)?;
        self.opens.serialize(writer)?;
        self.uses.serialize(writer)?;
        self.provides.serialize(writer)?;
        Ok(())
    }
}

/// A `requires` directive
pub struct Requires {
    pub module: ModuleConstantIndex,
    pub flags: RequiresFlags,
    pub version: Option<Utf8ConstantIndex>,
}

impl Serialize for Requires {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.module.serialize(writer)?;
        self.flags.serialize(writer)?;
        match self.version {
            Some(version) => version.serialize(writer)?,
            None => 0u16.serialize(writer)?,
        }
        Ok(())
    }
}

/// An `exports` directive; an empty `to` list means an unqualified export
pub struct Exports {
    pub package: PackageConstantIndex,
    pub flags: ExportsFlags,
    pub to: Vec<ModuleConstantIndex>,
}

impl Serialize for Exports {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.package.serialize(writer)?;
        self.flags.serialize(writer)?;
        self.to.serialize(writer)?;
        Ok(())
    }
}

/// An `opens` directive; same layout as `exports`
pub struct Opens {
    pub package: PackageConstantIndex,
    pub flags: ExportsFlags,
    pub to: Vec<ModuleConstantIndex>,
}

impl Serialize for Opens {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.package.serialize(writer)?;
        self.flags.serialize(writer)?;
        self.to.serialize(writer)?;
        Ok(())
    }
}

/// A `provides` directive
pub struct Provides {
    pub service: ClassConstantIndex,
    pub with: Vec<ClassConstantIndex>,
}

impl Serialize for Provides {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.service.serialize(writer)?;
        self.with.serialize(writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::class_file::ConstantIndex;

    #[test]
    fn module_attribute_layout() {
        let module = Module {
            module_name: ModuleConstantIndex(ConstantIndex(2)),
            module_flags: ModuleFlags::OPEN,
            module_version: None,
            requires: vec![Requires {
                module: ModuleConstantIndex(ConstantIndex(3)),
                flags: RequiresFlags::MANDATED,
                version: None,
            }],
            exports: vec![Exports {
                package: PackageConstantIndex(ConstantIndex(4)),
                flags: ExportsFlags::empty(),
                to: vec![ModuleConstantIndex(ConstantIndex(3))],
            }],
            opens: vec![],
            uses: vec![ClassConstantIndex(ConstantIndex(5))],
            provides: vec![],
        };

        let mut buffer = vec![];
        module.serialize(&mut buffer).unwrap();
        assert_eq!(
            buffer,
            vec![
                0, 2, // module name
                0x00, 0x20, // ACC_OPEN
                0, 0, // no version
                0, 1, 0, 3, 0x80, 0x00, 0, 0, // requires java.base mandated
                0, 1, 0, 4, 0, 0, 0, 1, 0, 3, // exports to one module
                0, 0, // opens
                0, 1, 0, 5, // uses
                0, 0, // provides
            ]
        );
    }
}
