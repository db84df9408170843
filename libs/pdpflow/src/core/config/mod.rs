// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

mod compiler_config;
mod network_spec;

pub use compiler_config::{CompilerConfig, Limits, RecordingOptions};
pub use network_spec::{GroupSpec, LinkSpec, NetworkSpec, ParamsSpec, StageSpec};
