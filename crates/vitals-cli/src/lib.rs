//! Library side of the `vitals` command-line tool.

pub mod logging;
pub mod settings;
pub mod workflow;
