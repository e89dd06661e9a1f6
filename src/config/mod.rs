#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::utils::error::{FirmhouseError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_BASE_URL: &str = "https://portal.firmhouse.com/graphql";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Which kind of project access token the client holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum AccessType {
    #[default]
    Storefront,
    Write,
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessType::Storefront => write!(f, "storefront"),
            AccessType::Write => write!(f, "write"),
        }
    }
}

impl FromStr for AccessType {
    type Err = FirmhouseError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "storefront" => Ok(AccessType::Storefront),
            "write" => Ok(AccessType::Write),
            other => Err(FirmhouseError::InvalidConfigValueError {
                field: "access_type".to_string(),
                value: other.to_string(),
                reason: "Expected 'storefront' or 'write'".to_string(),
            }),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub access_token: String,
    #[serde(default)]
    pub access_type: AccessType,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    pub user_agent: Option<String>,
}

// Keeps the token out of logs.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("access_token", &"<redacted>")
            .field("access_type", &self.access_type)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(access_token: impl Into<String>, access_type: AccessType) -> Self {
        Self {
            base_url: default_base_url(),
            access_token: access_token.into(),
            access_type,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Reads `FIRMHOUSE_API_TOKEN`, `FIRMHOUSE_BASE_URL`, `FIRMHOUSE_ACCESS_TYPE`
    /// and `FIRMHOUSE_TIMEOUT_SECONDS`.
    pub fn from_env() -> Result<Self> {
        let access_token =
            env::var("FIRMHOUSE_API_TOKEN").map_err(|_| FirmhouseError::MissingConfigError {
                field: "FIRMHOUSE_API_TOKEN".to_string(),
            })?;

        let access_type = match env::var("FIRMHOUSE_ACCESS_TYPE") {
            Ok(value) => value.parse()?,
            Err(_) => AccessType::default(),
        };

        let timeout_seconds = match env::var("FIRMHOUSE_TIMEOUT_SECONDS") {
            Ok(value) => value
                .parse()
                .map_err(|_| FirmhouseError::InvalidConfigValueError {
                    field: "FIRMHOUSE_TIMEOUT_SECONDS".to_string(),
                    value: value.clone(),
                    reason: "Expected a whole number of seconds".to_string(),
                })?,
            Err(_) => DEFAULT_TIMEOUT_SECONDS,
        };

        Ok(Self {
            base_url: env::var("FIRMHOUSE_BASE_URL").unwrap_or_else(|_| default_base_url()),
            access_token,
            access_type,
            timeout_seconds,
            user_agent: None,
        })
    }

    /// Loads the `[client]` table of a TOML file.
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config = toml_config::TomlConfig::from_file(path)?;
        config.validate()?;
        Ok(config.into_client_config())
    }

    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("firmhouse-sdk-rust/{}", env!("CARGO_PKG_VERSION")))
    }
}

impl Validate for ClientConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("base_url", &self.base_url)?;
        validation::validate_non_empty_string("access_token", &self.access_token)?;
        validation::validate_range("timeout_seconds", self.timeout_seconds, 1, 300)?;
        Ok(())
    }
}
