use super::commands::Command;
use crate::config::parse_override;
use crate::error::{Error, Result};
use clap::Parser;
use std::path::PathBuf;

pub const USAGE: &str = "USAGE: directory-cli [OPTIONS] <COMMAND>  (commands: listUsers)";

#[derive(Parser, Debug)]
#[command(name = "directory-cli", version)]
#[command(about = "List Azure AD / B2C directory users through Microsoft Graph")]
pub struct Cli {
    /// Command to run (listUsers)
    pub command: Option<String>,

    /// Settings file layered over the bundled defaults
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override a setting, e.g. -D tenant-id=contoso.onmicrosoft.com
    #[arg(short = 'D', long = "set", value_name = "KEY=VALUE", value_parser = parse_override)]
    pub overrides: Vec<(String, String)>,

    /// Write log output to this file (truncated on each run) instead of stdout
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// The command to run, validated before anything touches the network
    pub fn command(&self) -> Result<Command> {
        match self.command.as_deref() {
            Some(name) => name.parse(),
            None => Err(Error::Usage(USAGE.to_string())),
        }
    }
}
