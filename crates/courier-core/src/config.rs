//! Configuration — `~/.courier/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CourierError, Result};
use crate::types::DeliveryPolicy;

/// Default per-segment character budget.
pub const DEFAULT_MAX_LENGTH: usize = 3800;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourierConfig {
    #[serde(default)]
    pub delivery: DeliveryConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook: Option<WebhookConfig>,
}

/// Segmentation and pacing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    #[serde(default = "default_delay_ms")]
    pub inter_segment_delay_ms: u64,
    #[serde(default = "default_true")]
    pub quote_first_only: bool,
}

fn default_max_length() -> usize { DEFAULT_MAX_LENGTH }
fn default_delay_ms() -> u64 { DeliveryPolicy::default().inter_segment_delay_ms }
fn default_true() -> bool { true }
fn default_timeout_secs() -> u64 { 30 }

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            max_length: default_max_length(),
            inter_segment_delay_ms: default_delay_ms(),
            quote_first_only: true,
        }
    }
}

impl DeliveryConfig {
    /// Pacing policy derived from this config.
    pub fn policy(&self) -> DeliveryPolicy {
        DeliveryPolicy {
            inter_segment_delay_ms: self.inter_segment_delay_ms,
            quote_first_only: self.quote_first_only,
        }
    }
}

/// Outbound webhook transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// URL every segment is POSTed to.
    pub outbound_url: String,
    /// Shared secret used to sign outbound payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl CourierConfig {
    /// `~/.courier`
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".courier")
    }

    /// `~/.courier/config.toml`
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Load from the default path, falling back to defaults when absent.
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from an explicit path. A leading `~` is expanded.
    pub fn load_from(path: &Path) -> Result<Self> {
        let path = expand_path(path);
        if !path.exists() {
            return Err(CourierError::ConfigNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(&path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let path = expand_path(path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.delivery.max_length == 0 {
            return Err(CourierError::config("delivery.max_length must be at least 1"));
        }
        if let Some(webhook) = &self.webhook {
            if webhook.outbound_url.trim().is_empty() {
                return Err(CourierError::config("webhook.outbound_url is empty"));
            }
        }
        Ok(())
    }
}

fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&raw).into_owned())
}
