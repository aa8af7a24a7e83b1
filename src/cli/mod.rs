//! Command-line interface module.

mod args;
pub mod config;
pub mod new;
pub mod prompt;
pub mod run;

pub use args::{Cli, Commands};
