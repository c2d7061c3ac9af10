//! Vectors and local coordinate frames

mod three_vector;
pub use three_vector::*;

mod frame;
pub use frame::*;
