use crate::access_flags::{ExportsFlags, ModuleFlags, RequiresFlags};
use crate::names::BinaryName;

/// Contents of a `module-info` declaration
#[derive(Debug)]
pub struct ModuleDescriptor {
    /// Dotted module name (`java.base`), stored as written in source
    pub name: String,

    pub flags: ModuleFlags,
    pub version: Option<String>,
    pub requires: Vec<RequiresDirective>,
    pub exports: Vec<ExportsDirective>,
    pub opens: Vec<ExportsDirective>,
    pub uses: Vec<BinaryName>,
    pub provides: Vec<ProvidesDirective>,
}

#[derive(Debug)]
pub struct RequiresDirective {
    pub module: String,
    pub flags: RequiresFlags,
    pub version: Option<String>,
}

/// Used for both `exports` and `opens`; an empty `to` list means unqualified
#[derive(Debug)]
pub struct ExportsDirective {
    /// Package name in internal form (`java/util`)
    pub package: String,

    pub flags: ExportsFlags,
    pub to: Vec<String>,
}

#[derive(Debug)]
pub struct ProvidesDirective {
    pub service: BinaryName,
    pub with: Vec<BinaryName>,
}
