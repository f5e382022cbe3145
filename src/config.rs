//! Application configuration.
//!
//! Layered: built-in defaults → JSON file (~/.amenity-finder/config.json or an
//! explicit path) → environment variables → CLI flags. The resulting
//! [`AppConfig`] is passed explicitly to everything that needs it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::location::providers::DEFAULT_MAPBOX_URL;
use crate::location::Credential;
use crate::render::MapProvider;

pub const DEFAULT_RADIUS_KM: f64 = 1.0;
pub const DEFAULT_GEOCODE_DELAY_MS: u64 = 1000;
pub const DEFAULT_PLACES_DELAY_MS: u64 = 1500;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Which geocoding strategy the resolver uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolveMode {
    Live,
    Simulated,
}

impl fmt::Display for ResolveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live => write!(f, "live"),
            Self::Simulated => write!(f, "simulated"),
        }
    }
}

impl FromStr for ResolveMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "live" | "mapbox" => Ok(Self::Live),
            "simulated" | "sim" | "demo" => Ok(Self::Simulated),
            other => Err(format!("Unknown mode '{}'. Use 'live' or 'simulated'.", other)),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid value '{value}' for {var}: {reason}")]
    InvalidEnv {
        var: &'static str,
        value: String,
        reason: String,
    },
    #[error("Search radius must be a positive number of kilometers, got {0}")]
    InvalidRadius(f64),
}

/// On-disk shape. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    mode: Option<ResolveMode>,
    token: Option<String>,
    geocoder_url: Option<String>,
    radius_km: Option<f64>,
    map_provider: Option<MapProvider>,
    geocode_delay_ms: Option<u64>,
    places_delay_ms: Option<u64>,
    request_timeout_secs: Option<u64>,
    seed: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mode: ResolveMode,
    pub credential: Credential,
    pub geocoder_url: String,
    pub radius_km: f64,
    pub map_provider: MapProvider,
    pub geocode_delay_ms: u64,
    pub places_delay_ms: u64,
    pub request_timeout_secs: u64,
    /// Fixed RNG seed for reproducible output.
    pub seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mode: ResolveMode::Simulated,
            credential: Credential::none(),
            geocoder_url: DEFAULT_MAPBOX_URL.to_string(),
            radius_km: DEFAULT_RADIUS_KM,
            map_provider: MapProvider::MapLibre,
            geocode_delay_ms: DEFAULT_GEOCODE_DELAY_MS,
            places_delay_ms: DEFAULT_PLACES_DELAY_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            seed: None,
        }
    }
}

impl AppConfig {
    /// Defaults, then the config file, then the process environment.
    ///
    /// An explicit `path` must exist; the default path is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(path, &Self::default_path(), |var| std::env::var(var).ok())
    }

    fn load_from<F>(path: Option<&Path>, fallback: &Path, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        match path {
            Some(p) => config.merge_file(p)?,
            None if fallback.exists() => config.merge_file(fallback)?,
            None => {}
        }
        config.apply_env(lookup)?;
        Ok(config)
    }

    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".amenity-finder")
            .join("config.json")
    }

    fn merge_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ConfigFile = serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(mode) = file.mode {
            self.mode = mode;
        }
        if let Some(token) = file.token {
            self.credential = Credential::new(token);
        }
        if let Some(url) = file.geocoder_url {
            self.geocoder_url = url;
        }
        if let Some(r) = file.radius_km {
            self.radius_km = r;
        }
        if let Some(p) = file.map_provider {
            self.map_provider = p;
        }
        if let Some(ms) = file.geocode_delay_ms {
            self.geocode_delay_ms = ms;
        }
        if let Some(ms) = file.places_delay_ms {
            self.places_delay_ms = ms;
        }
        if let Some(s) = file.request_timeout_secs {
            self.request_timeout_secs = s;
        }
        if file.seed.is_some() {
            self.seed = file.seed;
        }
        Ok(())
    }

    /// Apply `AMENITY_*` overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("AMENITY_MODE") {
            self.mode = v.parse().map_err(|reason| ConfigError::InvalidEnv {
                var: "AMENITY_MODE",
                value: v.clone(),
                reason,
            })?;
        }

        if let Some(token) = lookup("AMENITY_TOKEN").or_else(|| lookup("MAPBOX_TOKEN")) {
            self.credential = Credential::new(token);
        }

        if let Some(url) = lookup("AMENITY_GEOCODER_URL") {
            self.geocoder_url = url;
        }

        if let Some(v) = lookup("AMENITY_RADIUS_KM") {
            self.radius_km = v.trim().parse().map_err(|e: std::num::ParseFloatError| {
                ConfigError::InvalidEnv {
                    var: "AMENITY_RADIUS_KM",
                    value: v.clone(),
                    reason: e.to_string(),
                }
            })?;
        }

        if let Some(v) = lookup("AMENITY_PROVIDER") {
            self.map_provider = v.parse().map_err(|reason| ConfigError::InvalidEnv {
                var: "AMENITY_PROVIDER",
                value: v.clone(),
                reason,
            })?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.radius_km.is_finite() || self.radius_km <= 0.0 {
            return Err(ConfigError::InvalidRadius(self.radius_km));
        }
        Ok(())
    }
}
