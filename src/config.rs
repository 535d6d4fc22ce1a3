//! Layered settings for a single run.
//!
//! Values come from two layers. Overrides (`-D key=value` flags, then
//! `DIRECTORY_CLI_*` environment variables) always win over defaults (an
//! optional TOML file, then the TOML bundled into the binary). The result
//! is built once in `main` and only read afterwards.

use crate::error::{Error, Result};
use log::{debug, info};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "directory-cli";

const ENV_PREFIX: &str = "DIRECTORY_CLI_";

const BUNDLED_DEFAULTS: &str = include_str!("../resources/defaults.toml");

/// Setting names read by the rest of the crate.
pub mod keys {
    pub const TENANT_ID: &str = "tenant-id";
    pub const AUTHORITY: &str = "authority";
    pub const AUTHORITY_HOST: &str = "authority-host";
    pub const CLIENT_ID: &str = "client-id";
    pub const SECRET: &str = "secret";
    pub const SCOPE: &str = "scope";
    pub const GRAPH_BASE_URL: &str = "graph-base-url";
    pub const PAGE_ERROR_POLICY: &str = "page-error-policy";
    pub const PROXY: &str = "proxy";
}

#[derive(Clone, Default)]
pub struct Config {
    overrides: HashMap<String, String>,
    defaults: HashMap<String, String>,
}

impl Config {
    pub fn new(overrides: HashMap<String, String>, defaults: HashMap<String, String>) -> Self {
        Self { overrides, defaults }
    }

    /// Assemble the configuration for this process.
    ///
    /// `path` replaces the platform config file as the defaults file and must
    /// exist. `flags` are `-D` overrides in command-line order; later flags win.
    pub fn load(path: Option<&Path>, flags: &[(String, String)]) -> Result<Self> {
        let mut defaults = parse_settings(BUNDLED_DEFAULTS, "bundled defaults")?;

        match path {
            Some(path) => defaults.extend(read_settings_file(path)?),
            None => {
                if let Some(path) = user_config_path().filter(|p| p.exists()) {
                    defaults.extend(read_settings_file(&path)?);
                }
            }
        }

        let mut overrides = env_overrides(std::env::vars());
        overrides.extend(flags.iter().cloned());

        debug!(
            "Loaded configuration with {} overrides and {} defaults",
            overrides.len(),
            defaults.len()
        );
        Ok(Self::new(overrides, defaults))
    }

    /// Value for `key`, or `None` when no layer defines it.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.overrides
            .get(key)
            .or_else(|| self.defaults.get(key))
            .map(String::as_str)
    }

    /// Value for a mandatory `key`.
    pub fn resolve(&self, key: &str) -> Result<&str> {
        self.lookup(key).ok_or_else(|| {
            Error::configuration(format!(
                "Mandatory setting {} not set (use -D {}=..., {} or a config file)",
                qualified_key(key),
                key,
                env_var_name(key)
            ))
        })
    }

    /// Value for `key`, falling back to `default`. Never fails.
    pub fn resolve_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.lookup(key).unwrap_or(default)
    }
}

/// Fully-qualified name of a setting, as shown in messages.
pub fn qualified_key(key: &str) -> String {
    format!("{}.{}", APP_NAME, key)
}

/// Environment variable that overrides `key`.
pub fn env_var_name(key: &str) -> String {
    format!("{}{}", ENV_PREFIX, key.replace('-', "_").to_uppercase())
}

fn key_from_env_var(name: &str) -> Option<String> {
    let rest = name.strip_prefix(ENV_PREFIX)?;
    if rest.is_empty() {
        return None;
    }
    Some(rest.replace('_', "-").to_lowercase())
}

/// Pick the `DIRECTORY_CLI_*` entries out of an environment listing.
pub fn env_overrides<I>(vars: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    vars.into_iter()
        .filter_map(|(name, value)| key_from_env_var(&name).map(|key| (key, value)))
        .collect()
}

/// Parse a flat TOML table of scalar settings.
pub fn parse_settings(content: &str, origin: &str) -> Result<HashMap<String, String>> {
    let table: toml::Table = content
        .parse()
        .map_err(|e| Error::configuration(format!("Failed to parse {}: {}", origin, e)))?;

    let mut settings = HashMap::with_capacity(table.len());
    for (key, value) in table {
        let value = match value {
            toml::Value::String(s) => s,
            toml::Value::Integer(i) => i.to_string(),
            toml::Value::Float(f) => f.to_string(),
            toml::Value::Boolean(b) => b.to_string(),
            toml::Value::Datetime(d) => d.to_string(),
            toml::Value::Array(_) | toml::Value::Table(_) => {
                return Err(Error::configuration(format!(
                    "Setting {} in {} must be a single value",
                    qualified_key(&key),
                    origin
                )));
            }
        };
        settings.insert(key, value);
    }
    Ok(settings)
}

fn read_settings_file(path: &Path) -> Result<HashMap<String, String>> {
    info!("Reading settings from {:?}", path);
    let content = fs::read_to_string(path).map_err(|e| {
        Error::configuration(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    parse_settings(&content, &format!("config file {:?}", path))
}

/// Location of the per-user config file, whether or not it exists.
pub fn user_config_path() -> Option<PathBuf> {
    let config_dir = if cfg!(target_os = "linux") {
        dirs::config_dir()?.join(APP_NAME)
    } else {
        dirs::home_dir()?.join(format!(".{}", APP_NAME))
    };
    Some(config_dir.join("config.toml"))
}

/// Parse one `KEY=VALUE` override flag.
pub fn parse_override(raw: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{}'", raw));
    }
    Ok((key.to_string(), value.to_string()))
}
