//! Operator commands: text in, typed [`SimCommand`] out
//!
//! Dispatch happens in [`crate::simulation::Coordinator::handle_command`].

pub mod parser;

pub use parser::{parse, SimCommand};
