use log::info;
use std::{env, fmt::Display, str::FromStr};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

/// Server settings, read from `FARMWEB_*` environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Base URL of the posts API the blog pages proxy
    pub blog_url: String,
    /// Directory served under `/images`
    pub assets_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: 3000,
            blog_url: "https://jsonplaceholder.typicode.com".to_string(),
            assets_dir: "static/images".to_string(),
        }
    }
}

impl Config {
    /// Load the configuration from the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load the configuration from an arbitrary key lookup
    ///
    /// Unset keys fall back to [`Config::default`]; a value that does not
    /// parse is an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        Ok(Config {
            host: try_load(&lookup, "FARMWEB_HOST", defaults.host)?,
            port: try_load(&lookup, "FARMWEB_PORT", defaults.port)?,
            blog_url: try_load::<String, _>(&lookup, "FARMWEB_BLOG_URL", defaults.blog_url)?
                .trim_end_matches('/')
                .to_string(),
            assets_dir: try_load(&lookup, "FARMWEB_ASSETS_DIR", defaults.assets_dir)?,
        })
    }

    /// Address the server binds to
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn try_load<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key: key.to_string(),
            value: value.clone(),
            reason: e.to_string(),
        }),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
