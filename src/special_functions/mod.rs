//! Custom implementations of special functions not
//! provided by the standard lib.

mod bessel;
mod synchrotron;

pub use bessel::*;
pub use synchrotron::*;
