// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use anyhow::{Context, Result};
use pdpflow::{GraphCompiler, LoopbackPlacement};
use std::path::Path;

/// Compile the network's topology and print its statistics.
pub fn run(network: &Path, config_dir: Option<&Path>, with_graph: bool) -> Result<()> {
    let (spec, config) = super::load(network, config_dir)?;
    let net = spec
        .build(&config, LoopbackPlacement::new(config.limits.key_space_size))
        .context("Failed to build network")?;

    let compiled = GraphCompiler::new(config.limits)
        .compile(net.topology())
        .context("Graph compilation failed")?;

    let mut out = serde_json::json!({
        "network": network.display().to_string(),
        "compile": compiled.result,
        "stats": compiled.graph.stats(),
        "checksum": compiled.graph.checksum().to_string(),
    });
    if with_graph {
        out["graph"] = compiled.graph.to_json();
    }

    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
