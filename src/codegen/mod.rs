//! Intermediate code
//!
//! - [`instruction`]: the three-address [`Instruction`] set and listing format
//! - [`generator`]: lowering of a checked statement tree into instructions

pub mod generator;
pub mod instruction;

pub use generator::{generate, Generator};
pub use instruction::{listing, Instruction};
