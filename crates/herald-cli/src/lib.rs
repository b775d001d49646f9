//! Herald command-line interface

pub mod cli;
pub mod commands;
