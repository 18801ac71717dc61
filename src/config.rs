//! Configuration for the noticeq binary.
//!
//! Loaded from --config, .noticeq.yml or ~/.config/noticeq/noticeq.yml

use eyre::{Context, Result};
use noticeq::PolicyConfig;
use noticeq::notice::NoticeKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Placement rules used by simulations.
    pub policy: PolicyConfig,
}

impl Config {
    /// Load configuration with fallback chain.
    ///
    /// Search order:
    /// 1. Explicit path if provided
    /// 2. .noticeq.yml in current directory
    /// 3. ~/.config/noticeq/noticeq.yml
    /// 4. Defaults
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let project_config = PathBuf::from(".noticeq.yml");
        if project_config.exists() {
            match Self::load_from_file(&project_config) {
                Ok(config) => {
                    log::info!("Loaded config from .noticeq.yml");
                    return Ok(config);
                }
                Err(e) => {
                    log::warn!("Failed to load .noticeq.yml: {}", e);
                }
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("noticeq").join("noticeq.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", user_config.display());
                        return Ok(config);
                    }
                    Err(e) => {
                        log::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        let kinds = self
            .policy
            .children
            .iter()
            .flat_map(|(parent, kids)| std::iter::once(parent).chain(kids))
            .chain(self.policy.requeue.kinds.keys());
        for kind in kinds {
            if kind.is_empty() || NoticeKind::new(kind.as_str()).is_reserved_empty() {
                eyre::bail!("policy: '{}' is not a usable notice kind", kind);
            }
        }
        for (parent, kids) in &self.policy.children {
            if kids.contains(parent) {
                eyre::bail!("policy.children.{} lists itself as a child", parent);
            }
        }
        Ok(())
    }
}
