// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

pub mod compile;
pub mod run;

use anyhow::{Context, Result};
use pdpflow::{CompilerConfig, NetworkSpec};
use std::path::Path;

/// Load the network file and the compiler config next to it (or in
/// `config_dir`).
pub fn load(network: &Path, config_dir: Option<&Path>) -> Result<(NetworkSpec, CompilerConfig)> {
    let spec = NetworkSpec::load(network)
        .with_context(|| format!("Failed to load network file {}", network.display()))?;
    let config = match config_dir {
        Some(dir) => CompilerConfig::load(dir)
            .with_context(|| format!("Failed to load config from {}", dir.display()))?,
        None => CompilerConfig::load_or_default(spec.base_dir()),
    };
    Ok((spec, config))
}
