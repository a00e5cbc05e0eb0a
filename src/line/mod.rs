//! Command lines as handed over by the parser.

pub mod types;

pub use types::{CommandLine, CommandNode, ControlOp, Redirects, StdFd};
