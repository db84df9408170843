// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

mod lens_output;
#[allow(clippy::module_inception)]
mod network;
mod settings;
mod stage;
mod state;

pub use lens_output::write_lens_output;
pub use network::Network;
pub use settings::{NetworkParams, NetworkSettings};
pub use stage::{AbortReason, StageDescriptor, StageMode, StageOutcome};
pub use state::ControllerState;
