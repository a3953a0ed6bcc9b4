//! Shared utilities.

pub mod script;

pub use script::ShellScript;
