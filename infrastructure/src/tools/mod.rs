//! Builtin capability adapters

mod builtin;
mod registry;

pub use registry::ToolRegistry;
