//! Small helpers shared by the CLI commands

pub mod command;
pub mod fileutil;
pub mod strutil;
