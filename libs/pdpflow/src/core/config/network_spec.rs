// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Declarative network file format.
//!
//! Groups are referenced by label. Relative file paths resolve against the
//! directory holding the network file.
//!
//! # Example Network File
//!
//! ```yaml
//! params:
//!   net_type: continuous
//!   ticks_per_interval: 5
//!   learning_rate: 0.2
//! groups:
//!   - { label: in, units: 10, roles: [input] }
//!   - { label: out, units: 10, roles: [output] }
//! links:
//!   - { from: in, to: out }
//! examples_file: rand10x40.ex
//! weights_file: rand10x40.wts
//! stages:
//!   - train: { num_updates: 10 }
//!   - test: { output_file: rand10x40.out }
//! ```

use super::{CompilerConfig, RecordingOptions};
use crate::core::network::{Network, NetworkParams, NetworkSettings, StageOutcome};
use crate::core::placement::PlacementService;
use crate::core::topology::{
    GroupParams, GroupRoles, InputFunction, NetworkType, OutputFunction, UpdateFunction,
};
use crate::core::{PdpError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Network-wide settings in a network file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamsSpec {
    pub net_type: NetworkType,
    pub intervals: u32,
    pub ticks_per_interval: u32,
    pub update_function: UpdateFunction,
    #[serde(flatten)]
    pub params: NetworkParams,
}

impl Default for ParamsSpec {
    fn default() -> Self {
        let settings = NetworkSettings::default();
        Self {
            net_type: settings.net_type,
            intervals: settings.intervals,
            ticks_per_interval: settings.ticks_per_interval,
            update_function: settings.update_function,
            params: NetworkParams::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub label: String,
    pub units: u32,
    pub roles: GroupRoles,
    #[serde(default)]
    pub input_funcs: Option<Vec<InputFunction>>,
    #[serde(default)]
    pub output_funcs: Option<Vec<OutputFunction>>,
    #[serde(default)]
    pub params: Option<GroupParams>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSpec {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub label: Option<String>,
}

/// One train or test call, optionally followed by writing the recorded
/// outputs to a Lens output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageSpec {
    Train {
        #[serde(default)]
        update_function: Option<UpdateFunction>,
        #[serde(default)]
        num_updates: Option<u32>,
        #[serde(default)]
        output_file: Option<PathBuf>,
    },
    Test {
        #[serde(default)]
        num_examples: Option<u32>,
        #[serde(default = "default_reset")]
        reset_examples: bool,
        #[serde(default)]
        output_file: Option<PathBuf>,
    },
}

fn default_reset() -> bool {
    true
}

/// A whole network: topology, data files and the stages to run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    #[serde(default)]
    pub params: ParamsSpec,
    pub groups: Vec<GroupSpec>,
    #[serde(default)]
    pub links: Vec<LinkSpec>,
    #[serde(default)]
    pub examples_file: Option<PathBuf>,
    #[serde(default)]
    pub weights_file: Option<PathBuf>,
    /// Overrides the compiler config's recording defaults.
    #[serde(default)]
    pub recording: Option<RecordingOptions>,
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub stages: Vec<StageSpec>,
    #[serde(skip)]
    base_dir: PathBuf,
}

impl NetworkSpec {
    /// Load a network file; relative paths inside resolve against its
    /// directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PdpError::Configuration(format!(
                "Failed to read network file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let mut spec = Self::from_yaml_str(&content).map_err(|e| {
            PdpError::Configuration(format!("{} ({})", e, path.display()))
        })?;
        spec.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(spec)
    }

    /// Parse a network file; relative paths resolve against the working
    /// directory.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| PdpError::Configuration(format!("Failed to parse network file: {}", e)))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn settings(&self) -> NetworkSettings {
        let mut settings = NetworkSettings::new(
            self.params.net_type,
            self.params.intervals,
            self.params.ticks_per_interval,
        );
        settings.update_function = self.params.update_function;
        settings.apply(&self.params.params);
        settings
    }

    /// Build the network on `service`, reading the examples file if one is
    /// named. Weights are read by the first stage.
    pub fn build<P: PlacementService>(
        &self,
        config: &CompilerConfig,
        service: P,
    ) -> Result<Network<P>> {
        let mut net = Network::new(self.settings(), config, service)?;
        if let Some(recording) = self.recording {
            net.set_recording_options(recording);
        }

        for group in &self.groups {
            let id = net.add_group(
                group.units,
                group.roles,
                group.input_funcs.as_deref(),
                group.output_funcs.as_deref(),
                Some(&group.label),
            )?;
            if let Some(params) = group.params {
                net.set_group_params(id, params)?;
            }
        }

        for link in &self.links {
            let from = group_id(&net, &link.from)?;
            let to = group_id(&net, &link.to)?;
            net.add_link(from, to, link.label.as_deref())?;
        }

        if let Some(path) = &self.examples_file {
            net.set_examples_file(&self.resolve(path))?;
        }
        if let Some(path) = &self.weights_file {
            net.set_weights_file(&self.resolve(path));
        }

        tracing::info!(
            "Built network from spec: {} groups, {} links, {} stage(s) listed",
            self.groups.len(),
            self.links.len(),
            self.stages.len()
        );
        Ok(net)
    }

    /// Run every listed stage in order, stopping early only on service
    /// or file errors.
    pub fn run_stages<P: PlacementService>(&self, net: &mut Network<P>) -> Result<Vec<StageOutcome>> {
        let mut outcomes = Vec::with_capacity(self.stages.len());
        for stage in &self.stages {
            let (outcome, output_file) = match stage {
                StageSpec::Train {
                    update_function,
                    num_updates,
                    output_file,
                } => (net.train(*update_function, *num_updates)?, output_file),
                StageSpec::Test {
                    num_examples,
                    reset_examples,
                    output_file,
                } => (net.test(*num_examples, *reset_examples)?, output_file),
            };
            if let Some(path) = output_file {
                net.write_lens_output_file(&self.resolve(path))?;
            }
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }
}

fn group_id<P: PlacementService>(
    net: &Network<P>,
    label: &str,
) -> Result<crate::core::topology::GroupId> {
    net.topology()
        .group_by_label(label)
        .map(|g| g.id)
        .ok_or_else(|| PdpError::Topology(format!("link names unknown group '{}'", label)))
}
