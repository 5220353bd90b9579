//! Inference provider adapters

mod scripted;

pub use scripted::ScriptedProvider;
