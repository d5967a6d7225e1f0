mod offset_vec;

pub use offset_vec::{Offset, OffsetVec, OffsetVecIter, Width};
