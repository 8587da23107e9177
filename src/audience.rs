//! # Audience Sizes
//!
//! Configurable mapping from a source community (subreddit) to an estimated
//! audience size, used as a market-size proxy by the pain scorer and the
//! revenue estimator.
//!
//! - Loads from TOML or JSON config files.
//! - Env override: `AUDIENCE_CONFIG_PATH`, then `config/audience_sizes.toml`,
//!   then `config/audience_sizes.json`.
//! - Falls back to a built-in `default_seed()` when nothing is configured.

use serde::Deserialize;
use std::{collections::HashMap, fs, path::Path, path::PathBuf};

const ENV_PATH: &str = "AUDIENCE_CONFIG_PATH";

/// Subreddit → estimated audience size, with a default for unknown names.
#[derive(Debug, Clone, Deserialize)]
pub struct AudienceConfig {
    /// Fallback size when a community is not listed.
    #[serde(default = "default_default_size")]
    pub default_size: u64,
    #[serde(default)]
    pub sizes: HashMap<String, u64>,
}

fn default_default_size() -> u64 {
    100_000
}

impl Default for AudienceConfig {
    fn default() -> Self {
        Self::default_seed()
    }
}

impl AudienceConfig {
    /// Load from an explicit TOML or JSON file.
    /// Falls back to `default_seed()` on read or parse error.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        let Ok(content) = fs::read_to_string(path.as_ref()) else {
            return Self::default_seed();
        };
        let ext = path
            .as_ref()
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        if ext == "toml" {
            if let Ok(cfg) = toml::from_str::<AudienceConfig>(&content) {
                return cfg;
            }
        }
        if let Ok(cfg) = serde_json::from_str::<AudienceConfig>(&content) {
            return cfg;
        }
        // Not hinted as toml but might still be; last attempt before seed.
        toml::from_str::<AudienceConfig>(&content).unwrap_or_else(|_| Self::default_seed())
    }

    /// Load using env var + fallbacks:
    /// 1) $AUDIENCE_CONFIG_PATH
    /// 2) config/audience_sizes.toml
    /// 3) config/audience_sizes.json
    /// 4) built-in seed
    pub fn load_default() -> Self {
        if let Ok(p) = std::env::var(ENV_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from_file(&pb);
            }
        }
        let toml_p = PathBuf::from("config/audience_sizes.toml");
        if toml_p.exists() {
            return Self::load_from_file(&toml_p);
        }
        let json_p = PathBuf::from("config/audience_sizes.json");
        if json_p.exists() {
            return Self::load_from_file(&json_p);
        }
        Self::default_seed()
    }

    /// Size for a community; unknown names get `default_size`.
    pub fn size_for(&self, subreddit: &str) -> u64 {
        self.sizes.get(subreddit).copied().unwrap_or(self.default_size)
    }

    /// Built-in seed with the communities the radar watches by default.
    pub fn default_seed() -> Self {
        let mut sizes = HashMap::new();
        sizes.insert("SaaS".to_string(), 500_000);
        sizes.insert("startups".to_string(), 1_000_000);
        sizes.insert("ProductManagement".to_string(), 300_000);
        Self {
            default_size: 100_000,
            sizes,
        }
    }
}
