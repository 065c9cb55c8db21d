use std::{net::SocketAddr, path::Path};

use chrono_tz::Tz;
use serde::Deserialize;
use tracing::info;

use crate::{
    error::{Error, Result},
    locale::Locale,
    timing::local_now::parse_timezone,
};

/// Where the hosted datastore lives and how often to mirror it.
#[derive(Clone, Debug, Deserialize)]
pub struct SyncConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`.
    pub base_url: String,
    /// Public (anon) key; the mirror only reads rows visible to consumers.
    pub api_key: String,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database_path: String,
    pub bind_address: String,
    /// IANA name of the zone venue hours are written in.
    pub timezone: String,
    pub locale: Locale,
    pub sync: Option<SyncConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: "kotekli.db".to_string(),
            bind_address: "127.0.0.1:7878".to_string(),
            timezone: "Europe/Istanbul".to_string(),
            locale: Locale::default(),
            sync: None,
        }
    }
}

fn default_interval_secs() -> u64 {
    600
}

impl Config {
    pub fn from_config(config: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(config)
            .map_err(|err| Error::Config(format!("Could not deserialize.\n{}", err)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the file at `path`, or falls back to defaults when it does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_config(&text)
    }

    pub fn timezone(&self) -> Result<Tz> {
        parse_timezone(&self.timezone)
    }

    pub fn bind_address(&self) -> Result<SocketAddr> {
        self.bind_address
            .parse()
            .map_err(|_| Error::Config(format!("Bad bind address '{}'", self.bind_address)))
    }

    fn validate(&self) -> Result<()> {
        self.timezone()?;
        self.bind_address()?;
        if let Some(sync) = &self.sync {
            if sync.interval_secs == 0 {
                return Err(Error::Config("sync.interval_secs must be positive".to_string()));
            }
            if !sync.base_url.starts_with("http") {
                return Err(Error::Config(format!("Bad sync.base_url '{}'", sync.base_url)));
            }
        }
        Ok(())
    }
}
