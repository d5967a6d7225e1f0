use super::Serialize;
use byteorder::WriteBytesExt;
use std::io::Result;

/// Version of the class file, which is used to verify that the JVM has the
/// necessary features to interpret the class
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct Version {
    pub minor_version: u16,
    pub major_version: u16,
}

impl Version {
    /// JVM class file version corresponding to Java SE 5
    pub const JAVA5: Version = Version::major(49);

    /// JVM class file version corresponding to Java SE 6
    pub const JAVA6: Version = Version::major(50);

    /// JVM class file version corresponding to Java SE 7
    pub const JAVA7: Version = Version::major(51);

    /// JVM class file version corresponding to Java SE 8 (released March 2014)
    pub const JAVA8: Version = Version::major(52);

    /// JVM class file version corresponding to Java SE 9
    pub const JAVA9: Version = Version::major(53);

    /// JVM class file version corresponding to Java SE 11
    pub const JAVA11: Version = Version::major(55);

    /// JVM class file version corresponding to Java SE 17
    pub const JAVA17: Version = Version::major(61);

    const fn major(major_version: u16) -> Version {
        Version {
            minor_version: 0,
            major_version,
        }
    }

    /// Compressed `StackMapTable` frames (as opposed to the CLDC-era
    /// `StackMap` attribute)
    pub fn has_stack_map_table(&self) -> bool {
        self.major_version >= 50
    }

    /// `invokedynamic` call sites and the `BootstrapMethods` attribute
    pub fn has_invokedynamic(&self) -> bool {
        self.major_version >= 51
    }

    /// `MethodParameters` and the `RuntimeVisibleTypeAnnotations` family
    pub fn has_method_parameters(&self) -> bool {
        self.major_version >= 52
    }

    /// Type annotations on types in declarations and method bodies
    pub fn has_type_annotations(&self) -> bool {
        self.major_version >= 52
    }

    /// The `Module` attribute and `CONSTANT_Module`/`CONSTANT_Package` entries
    pub fn has_modules(&self) -> bool {
        self.major_version >= 53
    }
}

impl Serialize for Version {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        self.minor_version.serialize(writer)?;
        self.major_version.serialize(writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn feature_gates() {
        assert!(!Version::JAVA5.has_stack_map_table());
        assert!(Version::JAVA6.has_stack_map_table());
        assert!(!Version::JAVA6.has_invokedynamic());
        assert!(Version::JAVA7.has_invokedynamic());
        assert!(!Version::JAVA7.has_method_parameters());
        assert!(Version::JAVA8.has_method_parameters());
        assert!(!Version::JAVA8.has_modules());
        assert!(Version::JAVA9.has_modules());
    }
}
