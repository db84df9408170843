// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use anyhow::{Context, Result};
use pdpflow::LoopbackPlacement;
use std::path::Path;

/// Build the network, run every listed stage and print each outcome.
pub fn run(network: &Path, config_dir: Option<&Path>) -> Result<()> {
    let (spec, config) = super::load(network, config_dir)?;
    let mut net = spec
        .build(&config, LoopbackPlacement::new(config.limits.key_space_size))
        .context("Failed to build network")?;

    if spec.stages.is_empty() {
        tracing::warn!("{} lists no stages", network.display());
    }

    let outcomes = spec.run_stages(&mut net).context("Stage run failed")?;
    net.end().context("Failed to stop placement service")?;

    for outcome in &outcomes {
        println!("{}", serde_json::to_string(outcome)?);
    }

    let aborted = outcomes.iter().filter(|o| !o.is_completed()).count();
    if aborted > 0 {
        tracing::warn!("{} of {} stage(s) aborted", aborted, outcomes.len());
    }
    Ok(())
}
