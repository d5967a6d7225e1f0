//! Binary representation of the class file format
//!
//! Everything in this module is already resolved down to constant pool
//! indices; the [`crate::writer`] module is what lowers the symbolic model
//! into these structures.

mod annotation;
mod attribute;
mod class;
mod constants;
mod field;
mod method;
mod module;
mod serialize;
mod version;

pub use annotation::*;
pub use attribute::*;
pub use class::*;
pub use constants::*;
pub use field::*;
pub use method::*;
pub use module::*;
pub use serialize::*;
pub use version::*;
