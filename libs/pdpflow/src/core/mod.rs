// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

pub mod compiler;
pub mod config;
pub mod error;
pub mod example_set;
pub mod graph;
pub mod network;
pub mod partition;
pub mod payload;
pub mod placement;
pub mod scoreboard;
pub mod topology;
pub mod weights;

pub use compiler::*;
pub use config::{CompilerConfig, Limits, NetworkSpec, RecordingOptions};
pub use error::*;
pub use example_set::*;
pub use graph::*;
pub use network::*;
pub use partition::*;
pub use payload::*;
pub use placement::*;
pub use scoreboard::*;
pub use topology::*;
pub use weights::*;
