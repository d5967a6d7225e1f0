use crate::class_file::{Constant, Version};

/// Errors from constant pool interning
#[derive(Debug)]
pub enum PoolError {
    /// The pool ran out of 16-bit indices
    Overflow { constant: Constant, offset: usize },

    /// A string constant exceeds the maximum encoded length of a `CONSTANT_Utf8_info`
    StringTooLong { string: String, length: usize },
}

/// Errors from writing out a class
#[derive(Debug)]
pub enum Error {
    ConstantPoolOverflow {
        constant: Constant,
        offset: usize,
    },

    StringOverflow {
        string: String,
        length: usize,
    },

    IoError(std::io::Error),

    /// The class file version is too old for a feature the class model uses
    UnsupportedFeature {
        feature: &'static str,
        requires: Version,
        actual: Version,
    },

    /// A method takes up more than 255 parameter slots
    MethodParameterOverflow {
        method: String,
        parameter_length: usize,
    },
}

impl From<PoolError> for Error {
    fn from(err: PoolError) -> Error {
        match err {
            PoolError::Overflow { constant, offset } => {
                Error::ConstantPoolOverflow { constant, offset }
            }
            PoolError::StringTooLong { string, length } => Error::StringOverflow { string, length },
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::IoError(err)
    }
}
