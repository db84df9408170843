// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Compiler-level configuration via `pdpflow.yaml`.

use crate::core::{PdpError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Hardware capacity limits that shape the compiled graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Units per subgroup, the unit of hardware mapping.
    pub max_subgroup_units: u32,
    /// Fan-in bound of one reduction-tree node.
    pub max_sum_links: u32,
    /// Largest group accepted by a stage run.
    pub max_group_units: u32,
    /// Routing keys reserved per multicast partition.
    pub key_space_size: u32,
}

impl Limits {
    pub const DEFAULT_MAX_SUBGROUP_UNITS: u32 = 32;
    pub const DEFAULT_MAX_SUM_LINKS: u32 = 16;
    pub const DEFAULT_MAX_GROUP_UNITS: u32 = 128;
    pub const DEFAULT_KEY_SPACE_SIZE: u32 = 65536;

    pub fn validate(&self) -> Result<()> {
        if self.max_subgroup_units == 0 {
            return Err(PdpError::Configuration(
                "max_subgroup_units must be at least 1".into(),
            ));
        }
        if self.max_sum_links < 2 {
            return Err(PdpError::Configuration(format!(
                "max_sum_links must be at least 2, got {}",
                self.max_sum_links
            )));
        }
        if self.max_group_units == 0 {
            return Err(PdpError::Configuration(
                "max_group_units must be at least 1".into(),
            ));
        }
        if self.key_space_size == 0 {
            return Err(PdpError::Configuration(
                "key_space_size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_subgroup_units: Self::DEFAULT_MAX_SUBGROUP_UNITS,
            max_sum_links: Self::DEFAULT_MAX_SUM_LINKS,
            max_group_units: Self::DEFAULT_MAX_GROUP_UNITS,
            key_space_size: Self::DEFAULT_KEY_SPACE_SIZE,
        }
    }
}

/// What the output units record while a stage runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingOptions {
    pub rec_test_results: bool,
    pub rec_outputs: bool,
    pub rec_example_last_tick_only: bool,
}

impl Default for RecordingOptions {
    fn default() -> Self {
        Self {
            rec_test_results: true,
            rec_outputs: true,
            rec_example_last_tick_only: false,
        }
    }
}

/// Compiler configuration from `pdpflow.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerConfig {
    #[serde(default)]
    pub limits: Limits,

    #[serde(default)]
    pub recording: RecordingOptions,
}

impl CompilerConfig {
    /// Configuration file name.
    pub const FILE_NAME: &'static str = "pdpflow.yaml";

    /// Load configuration from a directory. Returns error if the file is
    /// missing, cannot be parsed, or carries invalid limits.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(Self::FILE_NAME);

        let content = std::fs::read_to_string(&config_path).map_err(|e| {
            PdpError::Configuration(format!("Failed to read {}: {}", config_path.display(), e))
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| {
            PdpError::Configuration(format!("Failed to parse {}: {}", config_path.display(), e))
        })?;
        config.limits.validate()?;

        tracing::info!("Loaded compiler config from {}", config_path.display());
        Ok(config)
    }

    /// Load configuration from a directory, returning defaults if the file
    /// is missing or unusable.
    pub fn load_or_default(dir: &Path) -> Self {
        let config_path = dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            tracing::debug!(
                "No {} found in {}, using defaults",
                Self::FILE_NAME,
                dir.display()
            );
            return Self::default();
        }

        match Self::load(dir) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CompilerConfig::default();
        assert_eq!(config.limits.max_subgroup_units, 32);
        assert_eq!(config.limits.max_sum_links, 16);
        assert_eq!(config.limits.max_group_units, 128);
        assert_eq!(config.limits.key_space_size, 65536);
        assert!(config.recording.rec_test_results);
        assert!(!config.recording.rec_example_last_tick_only);
        assert!(config.limits.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: CompilerConfig =
            serde_yaml::from_str("limits:\n  max_subgroup_units: 8\n").unwrap();
        assert_eq!(config.limits.max_subgroup_units, 8);
        assert_eq!(config.limits.max_sum_links, 16);
        assert!(config.recording.rec_outputs);
    }

    #[test]
    fn test_rejects_single_link_fan_in() {
        let limits = Limits {
            max_sum_links: 1,
            ..Default::default()
        };
        assert!(matches!(
            limits.validate(),
            Err(PdpError::Configuration(_))
        ));
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CompilerConfig::FILE_NAME),
            "limits:\n  max_sum_links: 4\nrecording:\n  rec_outputs: false\n",
        )
        .unwrap();

        let config = CompilerConfig::load(dir.path()).unwrap();
        assert_eq!(config.limits.max_sum_links, 4);
        assert!(!config.recording.rec_outputs);
    }

    #[test]
    fn test_load_or_default_on_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CompilerConfig::FILE_NAME),
            "limits:\n  max_sum_links: 1\n",
        )
        .unwrap();

        assert!(CompilerConfig::load(dir.path()).is_err());
        assert_eq!(
            CompilerConfig::load_or_default(dir.path()),
            CompilerConfig::default()
        );
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CompilerConfig::load(dir.path()).is_err());
        assert_eq!(
            CompilerConfig::load_or_default(dir.path()),
            CompilerConfig::default()
        );
    }
}
