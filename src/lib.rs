//! Generate JVM class files
//!
//! ### Simple example
//!
//! Consider the following simple Java class:
//!
//! ```java,ignore,no_run
//! public class Point {
//!     public final int x;
//!     public final int y;
//! }
//! ```
//!
//! Generating an analogous class file can be done as follows:
//!
//! ```
//! use classgen::class_file::{ClassFile, ConstantPool, Serialize, Version};
//! use classgen::model::{Class, ClassSymbol, ClassType, Field, Type};
//! use classgen::writer::{ClassFileWriter, WriterOptions};
//! use classgen::{BaseType, BinaryName, Name, UnqualifiedName};
//! use classgen::{ClassAccessFlags, FieldAccessFlags, InnerClassAccessFlags};
//!
//! # fn generate_class() -> Result<(), classgen::Error> {
//! // Declare the class and its fields
//! let object = ClassSymbol::top_level(BinaryName::OBJECT, InnerClassAccessFlags::PUBLIC);
//! let point = ClassSymbol::top_level(
//!     BinaryName::from_string(String::from("me/alec/Point")).unwrap(),
//!     InnerClassAccessFlags::PUBLIC,
//! );
//! let mut class = Class::new(
//!     point,
//!     ClassAccessFlags::PUBLIC,
//!     Some(ClassType::raw(object)),
//! );
//! for name in ["x", "y"] {
//!     class.fields.push(Field::new(
//!         UnqualifiedName::from_string(String::from(name)).unwrap(),
//!         FieldAccessFlags::PUBLIC | FieldAccessFlags::FINAL,
//!         Type::Base(BaseType::Int),
//!     ));
//! }
//! class.source_file = Some(String::from("Point.java"));
//!
//! // Lower the class through a fresh constant pool and serialize it
//! let writer = ClassFileWriter::new(WriterOptions::for_version(Version::JAVA11));
//! let class_file = writer.write_class_file(&class, ConstantPool::new())?;
//!
//! let mut bytes = vec![];
//! class_file.serialize(&mut bytes)?;
//! assert_eq!(&bytes[..4], &ClassFile::MAGIC);
//! # Ok(())
//! # }
//! # generate_class().unwrap();
//! ```

pub mod class_file;
pub mod model;
pub mod util;
pub mod writer;

mod access_flags;
mod descriptors;
mod errors;
mod names;

pub use access_flags::*;
pub use descriptors::*;
pub use errors::*;
pub use names::*;
