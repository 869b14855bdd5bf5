use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use solar_roi_core::lead::{PolicyKind, DEFAULT_LEAD_SOURCE};

pub const CONFIG_FILE_NAME: &str = ".solar-roi.toml";
const MAX_TRAVERSAL_DEPTH: usize = 10;

fn default_lead_source() -> String {
    DEFAULT_LEAD_SOURCE.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolarRoiConfig {
    pub delivery: DeliveryConfig,
    pub validation: ValidationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Intake endpoint. Delivery is skipped when unset.
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default = "default_lead_source")]
    pub lead_source: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            lead_source: default_lead_source(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub policy: PolicyKind,
    /// Email provider allow-list for the strict policy; empty accepts all.
    pub email_domains: Vec<String>,
}

/// Parse configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<SolarRoiConfig, String> {
    toml::from_str::<SolarRoiConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))
}

/// Load configuration from an explicit path, or search for
/// `.solar-roi.toml` from the current directory upward.
///
/// A missing file yields defaults. An unreadable or malformed file is
/// logged and also yields defaults.
pub fn load_config(explicit: Option<&Path>) -> SolarRoiConfig {
    if let Some(path) = explicit {
        return try_load(path).unwrap_or_else(|| {
            tracing::warn!(path = %path.display(), "config not loaded; using defaults");
            SolarRoiConfig::default()
        });
    }

    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            tracing::warn!("Failed to get current directory: {}. Using default config.", e);
            return SolarRoiConfig::default();
        }
    };

    ancestors(current, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load(&path))
        .unwrap_or_else(|| {
            tracing::debug!("No {} found; using default config", CONFIG_FILE_NAME);
            SolarRoiConfig::default()
        })
}

fn try_load(path: &Path) -> Option<SolarRoiConfig> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to read config file {}: {}", path.display(), e);
            }
            return None;
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            tracing::debug!("Loaded config from {}", path.display());
            Some(config)
        }
        Err(e) => {
            tracing::warn!("{}. Using defaults.", e);
            None
        }
    }
}

fn ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}
