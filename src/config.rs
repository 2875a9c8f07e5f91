//! Collector configuration.
//!
//! Settings come from an optional TOML file, then environment variables
//! (after loading `.env`) override credentials and the NOAA contact.
//!
//! ```toml
//! [http]
//! timeout_secs = 30
//!
//! [eia]
//! base_url = "https://api.eia.gov/v2"
//!
//! [noaa]
//! contact_email = "ops@example.com"
//!
//! [openweather]
//! base_url = "https://api.openweathermap.org/data/2.5"
//! ```

use crate::model::ConfigError;
use crate::transport::BlockingTransport;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_EIA_BASE_URL: &str = "https://api.eia.gov/v2";
pub const DEFAULT_NOAA_BASE_URL: &str = "https://api.weather.gov";
pub const DEFAULT_OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_USER_AGENT_PRODUCT: &str = "energy-weather-collect/0.1";

pub const ENV_EIA_API_KEY: &str = "EIA_API_KEY";
pub const ENV_OPENWEATHER_API_KEY: &str = "OPENWEATHER_API_KEY";
pub const ENV_NOAA_CONTACT_EMAIL: &str = "NOAA_CONTACT_EMAIL";
pub const ENV_EMAIL: &str = "EMAIL";

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EiaSettings {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for EiaSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_EIA_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NoaaSettings {
    pub base_url: String,
    /// Contact address NWS asks clients to put in the User-Agent.
    pub contact_email: Option<String>,
    pub user_agent_product: String,
}

impl Default for NoaaSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_NOAA_BASE_URL.to_string(),
            contact_email: None,
            user_agent_product: DEFAULT_USER_AGENT_PRODUCT.to_string(),
        }
    }
}

impl NoaaSettings {
    pub fn user_agent(&self) -> String {
        match &self.contact_email {
            Some(email) => format!("{} ({})", self.user_agent_product, email),
            None => self.user_agent_product.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OpenWeatherSettings {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for OpenWeatherSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_OPENWEATHER_BASE_URL.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    pub http: HttpSettings,
    pub eia: EiaSettings,
    pub noaa: NoaaSettings,
    pub openweather: OpenWeatherSettings,
}

impl CollectorConfig {
    /// Load `.env`, parse `path` when given, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_with(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Overlay credentials from `lookup`. Empty values count as unset.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(ENV_EIA_API_KEY) {
            self.eia.api_key = Some(key);
        }
        if let Some(key) = non_empty(ENV_OPENWEATHER_API_KEY) {
            self.openweather.api_key = Some(key);
        }
        if let Some(email) = non_empty(ENV_NOAA_CONTACT_EMAIL).or_else(|| non_empty(ENV_EMAIL)) {
            self.noaa.contact_email = Some(email);
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }

    /// Build the production transport with the configured timeout.
    pub fn transport(&self) -> Result<BlockingTransport, ConfigError> {
        Ok(BlockingTransport::new(self.timeout())?)
    }
}

/// Returns the credential or the error naming the variable that should hold it.
pub(crate) fn require_credential(
    value: Option<&str>,
    name: &'static str,
) -> Result<String, ConfigError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .ok_or(ConfigError::MissingCredential(name))
}
