//! Small helpers shared by the probes and the output pipeline

pub mod color;
pub mod command;
pub mod file;
pub mod parsing;
