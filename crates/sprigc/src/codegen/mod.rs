//! Code generation

mod js;

pub use js::emit;
