pub mod users;

use crate::api::{
    ClientCredentials, Credential, DirectoryEntry, GraphDirectory, PageErrorPolicy,
    build_http_client,
};
use crate::config::{Config, keys};
use crate::error::{Error, Result};
use log::info;
use std::fmt;
use std::str::FromStr;

pub use users::list_users;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Log id and principal name of every directory user
    ListUsers,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::ListUsers => "listUsers",
        }
    }
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "listUsers" => Ok(Command::ListUsers),
            other => Err(Error::Usage(format!("Unknown command: {}", other))),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Run `command` against the configured identity provider and directory.
///
/// Every setting the command needs is resolved before the first request.
/// `report` receives each entry in the order the directory returned it.
pub fn dispatch(
    command: Command,
    config: &Config,
    report: impl FnMut(&DirectoryEntry),
) -> Result<()> {
    match command {
        Command::ListUsers => {
            let credential = Credential::from_config(config)?;
            let policy = PageErrorPolicy::from_config(config)?;

            let http_client = build_http_client(config.lookup(keys::PROXY))
                .map_err(|e| Error::transport("Failed to build HTTP client", e))?;
            let directory = GraphDirectory::from_config(config, http_client.clone())?;
            let tokens = ClientCredentials::with_custom_client(credential, http_client);

            let count = list_users(&tokens, &directory, policy, report)?;
            info!("Listed {} users", count);
            Ok(())
        }
    }
}
