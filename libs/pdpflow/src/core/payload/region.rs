// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use serde::{Deserialize, Serialize};
use std::fmt;

/// Memory regions of a unit payload, by wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    System,
    Network,
    Core,
    ExampleSet,
    Examples,
    Events,
    Inputs,
    Targets,
    Weights,
    Routing,
    Stage,
    RecInfo,
}

impl Region {
    pub fn code(self) -> u32 {
        match self {
            Self::System => 0,
            Self::Network => 1,
            Self::Core => 2,
            Self::ExampleSet => 3,
            Self::Examples => 4,
            Self::Events => 5,
            Self::Inputs => 6,
            Self::Targets => 7,
            Self::Weights => 8,
            Self::Routing => 9,
            Self::Stage => 10,
            Self::RecInfo => 11,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.code())
    }
}
