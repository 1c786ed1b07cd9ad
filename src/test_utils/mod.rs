//! Test utilities: in-memory store implementations, a deterministic id
//! provider, and fixture factories with override closures.

mod factories;
mod mocks;

pub use factories::*;
pub use mocks::*;
