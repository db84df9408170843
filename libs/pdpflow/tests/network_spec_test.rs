// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! A declarative network file plus a compiler config directory, run the way
//! the command line runs them.

mod common;

use common::{write_examples, write_weights};
use pdpflow::{CompilerConfig, LoopbackPlacement, NetworkSpec, StageMode};

const NETWORK: &str = r#"
params:
  net_type: continuous
  ticks_per_interval: 4
  learning_rate: 0.1
groups:
  - { label: in, units: 6, roles: [input] }
  - { label: hidden, units: 9, roles: [hidden] }
  - { label: out, units: 6, roles: [output] }
links:
  - { from: in, to: hidden }
  - { from: hidden, to: out }
examples_file: data/set.ex
weights_file: data/net.wts
stages:
  - train: { num_updates: 4 }
  - test: { output_file: data/first.out }
  - test: { num_examples: 3, reset_examples: false }
"#;

#[test]
fn test_network_file_runs_all_stages() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("data")).unwrap();
    std::fs::write(
        dir.path().join(CompilerConfig::FILE_NAME),
        "limits:\n  max_subgroup_units: 4\n  max_sum_links: 3\n  key_space_size: 1024\n",
    )
    .unwrap();
    let path = dir.path().join("net.yaml");
    std::fs::write(&path, NETWORK).unwrap();
    write_examples(&dir.path().join("data"), "set.ex", 5, 6);

    let config = CompilerConfig::load(dir.path()).unwrap();
    let spec = NetworkSpec::load(&path).unwrap();
    let mut net = spec
        .build(&config, LoopbackPlacement::new(config.limits.key_space_size))
        .unwrap();
    write_weights(&dir.path().join("data"), "net.wts", net.topology());

    let outcomes = spec.run_stages(&mut net).unwrap();
    assert_eq!(outcomes.len(), 3);
    assert!(outcomes.iter().all(|o| o.is_completed()));

    let modes: Vec<StageMode> = outcomes.iter().map(|o| o.report().unwrap().mode).collect();
    assert_eq!(modes, vec![StageMode::Train, StageMode::Test, StageMode::Test]);
    let last = outcomes[2].report().unwrap().test_results.unwrap();
    assert_eq!(last.epochs_trained, 4);
    assert_eq!(last.examples_tested, 3);

    // bias 1, in 2, hidden 3, out 2 subgroups
    let compiled = net.compiled_graph().unwrap();
    assert_eq!(compiled.result.subgroups, 8);
    assert_eq!(compiled.result.weight_units, 64);
    assert_eq!(compiled.result.stop_chain_len, 2);
    assert_eq!(net.service().place_calls(), 1);

    // five examples of one event each, six output units
    let written = std::fs::read_to_string(dir.path().join("data/first.out")).unwrap();
    assert_eq!(written.lines().count(), 5 * (3 + 7 + 2 + 6));
    assert!(written.starts_with("0 0\n"));

    let routing = net.routing().unwrap();
    assert!(routing.iter().all(|(_, key)| key % 1024 == 0 && key > 0));

    net.end().unwrap();
    assert!(net.service().is_stopped());
}

#[test]
fn test_missing_weights_file_aborts_stages() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("net.yaml");
    std::fs::write(&path, NETWORK).unwrap();
    std::fs::create_dir(dir.path().join("data")).unwrap();
    write_examples(&dir.path().join("data"), "set.ex", 2, 6);

    let spec = NetworkSpec::load(&path).unwrap();
    let config = CompilerConfig::load_or_default(dir.path());
    let mut net = spec.build(&config, LoopbackPlacement::new(16)).unwrap();

    let outcomes = spec.run_stages(&mut net).unwrap();
    assert!(outcomes.iter().all(|o| !o.is_completed()));
    assert!(net.is_aborted());
    assert!(net.service().runs().is_empty());
    assert!(!dir.path().join("data/first.out").exists());
}
