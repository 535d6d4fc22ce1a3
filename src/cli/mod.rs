pub mod app;
pub mod commands;

pub use app::{Cli, USAGE};
pub use commands::{Command, dispatch};
