// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use serde::Serialize;
use std::fmt;

/// Lifecycle of the stage controller.
///
/// # State Transitions
///
/// ```text
/// ┌──────┐
/// │ Idle │  topology edits allowed
/// └──┬───┘
///    │ first stage passes preflight
///    ▼
/// ┌───────────┐
/// │ Compiling │  partition, create, wire, audit, place, load
/// └─────┬─────┘
///       │
///       ▼
/// ┌────────────┐  train()/test()  ┌─────────────────┐
/// │ GraphBuilt │─────────────────►│ Running(stage)  │
/// └─────┬──────┘◄─────────────────┴─────────────────┘
///       │          stage report
///       │ end()
///       ▼
/// ┌───────┐
/// │ Ended │  every later stage aborts
/// └───────┘
///
/// Adding a group or link in GraphBuilt drops the graph and returns to Idle.
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "stage", rename_all = "snake_case")]
pub enum ControllerState {
    /// No graph built yet.
    #[default]
    Idle,

    /// Graph being built and handed to the placement service.
    Compiling,

    /// Graph placed and loaded, waiting for a stage.
    GraphBuilt,

    /// Stage with this id executing.
    Running(u32),

    /// `end()` called; the placement service is stopped.
    Ended,
}

impl ControllerState {
    /// Check if a placed graph is available for the next stage.
    pub fn has_graph(&self) -> bool {
        matches!(self, Self::GraphBuilt | Self::Running(_))
    }

    pub fn is_ended(&self) -> bool {
        matches!(self, Self::Ended)
    }
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Compiling => write!(f, "Compiling"),
            Self::GraphBuilt => write!(f, "GraphBuilt"),
            Self::Running(stage) => write!(f, "Running(stage {})", stage),
            Self::Ended => write!(f, "Ended"),
        }
    }
}
