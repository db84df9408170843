// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use crate::core::placement::StageReport;
use crate::core::topology::UpdateFunction;
use pdpflow_fixed::WireWriter;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageMode {
    Test,
    Train,
}

impl StageMode {
    pub fn code(self) -> u8 {
        match self {
            Self::Test => 0,
            Self::Train => 1,
        }
    }
}

impl fmt::Display for StageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Test => write!(f, "test"),
            Self::Train => write!(f, "train"),
        }
    }
}

/// Per-stage settings pushed to every unit before a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageDescriptor {
    pub stage_id: u32,
    pub mode: StageMode,
    pub update_function: UpdateFunction,
    /// Restart from the first example.
    pub reset: bool,
    pub num_examples: u32,
    pub num_epochs: u32,
}

impl StageDescriptor {
    pub const SIZE: usize = 16;

    /// `<I4B2I`: stage id, mode, update function, reset, pad, examples,
    /// epochs.
    pub fn encode(&self, w: &mut WireWriter) {
        w.u32(self.stage_id)
            .u8(self.mode.code())
            .u8(self.update_function.code())
            .u8(u8::from(self.reset))
            .pad(1)
            .u32(self.num_examples)
            .u32(self.num_epochs);
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = WireWriter::with_capacity(Self::SIZE);
        self.encode(&mut w);
        w.into_bytes()
    }
}

/// Why a stage did not run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum AbortReason {
    OversizedGroup { group: String, units: u32, max: u32 },
    NoWeightsFile,
    WeightsFile(String),
    NoExampleSet,
    ExamplesNotLoaded,
    ExampleCompile(String),
    NoExamples,
    Ended,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OversizedGroup { group, units, max } => {
                write!(f, "group '{}' has {} units (max {})", group, units, max)
            }
            Self::NoWeightsFile => write!(f, "weights file not given"),
            Self::WeightsFile(e) => write!(f, "error reading weights file: {}", e),
            Self::NoExampleSet => write!(f, "no example set"),
            Self::ExamplesNotLoaded => write!(f, "examples not loaded"),
            Self::ExampleCompile(e) => write!(f, "error compiling example set: {}", e),
            Self::NoExamples => write!(f, "example set compiled to zero examples"),
            Self::Ended => write!(f, "network has ended"),
        }
    }
}

/// Result of one train or test call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StageOutcome {
    Completed(StageReport),
    Aborted { reason: AbortReason },
}

impl StageOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    pub fn report(&self) -> Option<&StageReport> {
        match self {
            Self::Completed(report) => Some(report),
            Self::Aborted { .. } => None,
        }
    }

    pub fn abort_reason(&self) -> Option<&AbortReason> {
        match self {
            Self::Completed(_) => None,
            Self::Aborted { reason } => Some(reason),
        }
    }
}
