//! Configuration file types
//!
//! This module contains the YAML configuration structures: named profiles
//! holding service endpoints, client settings and default listing limits.
//! Command-line flags override whatever a profile sets.

use crate::error::{Error, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use url::Url;

/// Endpoint used when neither the profile nor the command line names one
pub const DEFAULT_ENDPOINT: &str = "http://localhost:4566";

/// Profile looked up when none is requested and no default is configured
pub const DEFAULT_PROFILE: &str = "default";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete configuration loaded from YAML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Profile used when `--profile` is not given
    #[serde(default)]
    pub default_profile: Option<String>,

    /// Named profiles
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl AppConfig {
    /// Load and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::load_from_str(&content)
    }

    /// Parse and validate configuration from a YAML string
    pub fn load_from_str(yaml: &str) -> Result<Self> {
        let config: AppConfig = serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Failed to parse config YAML: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Check every profile and the default profile reference
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.default_profile {
            if !self.profiles.contains_key(name) {
                return Err(Error::invalid_value(
                    "default_profile",
                    format!("profile '{name}' is not defined"),
                ));
            }
        }

        for (name, profile) in &self.profiles {
            profile.validate(name)?;
        }
        Ok(())
    }

    /// Resolve a profile by name.
    ///
    /// Without a name, the configured default profile is used, then a
    /// profile called `default`, then built-in defaults.
    pub fn profile(&self, name: Option<&str>) -> Result<Profile> {
        if let Some(name) = name {
            return self
                .profiles
                .get(name)
                .cloned()
                .ok_or_else(|| Error::config(format!("Profile '{name}' not found")));
        }

        let fallback = self.default_profile.as_deref().unwrap_or(DEFAULT_PROFILE);
        Ok(self.profiles.get(fallback).cloned().unwrap_or_default())
    }
}

// ============================================================================
// Profiles
// ============================================================================

/// Settings for one environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Log service endpoint
    #[serde(default)]
    pub logs_endpoint: Option<String>,

    /// Table service endpoint
    #[serde(default)]
    pub tables_endpoint: Option<String>,

    /// Bucket service endpoint
    #[serde(default)]
    pub buckets_endpoint: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Sources fetched at the same time during a search
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Default listing limits
    #[serde(default)]
    pub limits: Limits,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            logs_endpoint: None,
            tables_endpoint: None,
            buckets_endpoint: None,
            timeout_secs: default_timeout(),
            max_concurrency: default_max_concurrency(),
            limits: Limits::default(),
        }
    }
}

impl Profile {
    /// Log service endpoint, falling back to [`DEFAULT_ENDPOINT`]
    pub fn logs_endpoint(&self) -> &str {
        self.logs_endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    /// Table service endpoint, falling back to [`DEFAULT_ENDPOINT`]
    pub fn tables_endpoint(&self) -> &str {
        self.tables_endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    /// Bucket service endpoint, falling back to [`DEFAULT_ENDPOINT`]
    pub fn buckets_endpoint(&self) -> &str {
        self.buckets_endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    fn validate(&self, name: &str) -> Result<()> {
        for (field, endpoint) in [
            ("logs_endpoint", &self.logs_endpoint),
            ("tables_endpoint", &self.tables_endpoint),
            ("buckets_endpoint", &self.buckets_endpoint),
        ] {
            if let Some(endpoint) = endpoint {
                validate_endpoint(endpoint)
                    .map_err(|e| Error::invalid_value(format!("profiles.{name}.{field}"), e.to_string()))?;
            }
        }

        if self.timeout_secs == 0 {
            return Err(Error::invalid_value(
                format!("profiles.{name}.timeout_secs"),
                "must be greater than zero",
            ));
        }

        if self.max_concurrency == 0 {
            return Err(Error::invalid_value(
                format!("profiles.{name}.max_concurrency"),
                "must be at least 1",
            ));
        }

        Ok(())
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_max_concurrency() -> usize {
    5
}

/// Default limits per listing. Negative values mean unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Log groups per `logs list`
    #[serde(default = "default_listing_limit")]
    pub groups: i64,

    /// Events per `logs get` and per group in `logs search`
    #[serde(default = "default_events_limit")]
    pub events: i64,

    /// Groups matched by `logs search`
    #[serde(default = "default_listing_limit")]
    pub search_groups: i64,

    /// Tables per `ddb list`
    #[serde(default = "default_listing_limit")]
    pub tables: i64,

    /// Buckets per `s3 list`
    #[serde(default = "default_listing_limit")]
    pub buckets: i64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            groups: default_listing_limit(),
            events: default_events_limit(),
            search_groups: default_listing_limit(),
            tables: default_listing_limit(),
            buckets: default_listing_limit(),
        }
    }
}

fn default_listing_limit() -> i64 {
    50
}

fn default_events_limit() -> i64 {
    10_000
}

// ============================================================================
// Helpers
// ============================================================================

/// Map a signed limit to the pagination limit: negative means unbounded,
/// values past `u32::MAX` saturate.
pub fn normalize_limit(limit: i64) -> Option<u32> {
    if limit < 0 {
        None
    } else {
        Some(u32::try_from(limit).unwrap_or(u32::MAX))
    }
}

/// Check that an endpoint is an absolute http(s) URL
pub fn validate_endpoint(endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Error::invalid_value(
            "endpoint",
            format!("unsupported scheme '{other}'"),
        )),
    }
}
