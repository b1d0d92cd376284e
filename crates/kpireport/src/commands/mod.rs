//! Command handlers.
//!
//! Every handler receives the parsed flags and the loaded configuration
//! and owns its PRTG connection for the length of the command.

pub mod report;
pub mod sensors;
