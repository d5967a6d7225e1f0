//! Symbolic model of classes about to be written
//!
//! Types here still carry generics and shared class symbols; the writer
//! erases and interns them while emitting.

mod annotation;
mod class;
mod code;
mod field;
mod method;
mod module;
mod symbol;
mod types;

pub use annotation::*;
pub use class::*;
pub use code::*;
pub use field::*;
pub use method::*;
pub use module::*;
pub use symbol::*;
pub use types::*;
