//! Process configuration read from the environment.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `DATABASE_URL` | `sqlite::memory:` | Sea-ORM connection string |
//! | `BIND_ADDR` | `0.0.0.0:3000` | Listen address |
//! | `APP_DEBUG` | `false` | Add internal details to error bodies |
//! | `BOOKR_SERIALIZER` | `data` | Envelope strategy: `data`, `nested` or `array` |
//! | `BOOKR_SEED` | `false` | Insert the sample catalog on startup |

use std::net::SocketAddr;

use thiserror::Error;

use crate::transform::{SerializerKind, UnknownSerializer};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid BIND_ADDR `{value}`: {source}")]
    BindAddr {
        value: String,
        source: std::net::AddrParseError,
    },

    #[error("invalid boolean for {name}: `{value}`")]
    Flag { name: &'static str, value: String },

    #[error(transparent)]
    Serializer(#[from] UnknownSerializer),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub debug: bool,
    pub serializer: SerializerKind,
    pub seed: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            debug: false,
            serializer: SerializerKind::Data,
            seed: false,
        }
    }
}

impl Config {
    /// # Errors
    ///
    /// Fails when a variable is set to a value that cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable source.
    ///
    /// # Errors
    ///
    /// Fails when a variable is set to a value that cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let database_url = lookup("DATABASE_URL").unwrap_or(defaults.database_url);
        let bind_addr = match lookup("BIND_ADDR") {
            Some(value) => value
                .parse()
                .map_err(|source| ConfigError::BindAddr { value, source })?,
            None => defaults.bind_addr,
        };
        let debug = flag("APP_DEBUG", lookup("APP_DEBUG"), defaults.debug)?;
        let serializer = match lookup("BOOKR_SERIALIZER") {
            Some(value) => value.parse()?,
            None => defaults.serializer,
        };
        let seed = flag("BOOKR_SEED", lookup("BOOKR_SEED"), defaults.seed)?;

        Ok(Self {
            database_url,
            bind_addr,
            debug,
            serializer,
            seed,
        })
    }
}

fn flag(name: &'static str, value: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::Flag { name, value }),
    }
}
