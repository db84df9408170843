// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Function-pipeline selectors and their wire codes.
//!
//! The numeric kernels behind these codes run inside the units; the compiler
//! only selects them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of network, selecting the unit kernels' time handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkType {
    #[default]
    FeedForward,
    SimpleRecurrent,
    Rbptt,
    Continuous,
}

impl NetworkType {
    pub fn code(self) -> u8 {
        match self {
            Self::FeedForward => 0,
            Self::SimpleRecurrent => 1,
            Self::Rbptt => 2,
            Self::Continuous => 3,
        }
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FeedForward => write!(f, "feed_forward"),
            Self::SimpleRecurrent => write!(f, "simple_recurrent"),
            Self::Rbptt => write!(f, "rbptt"),
            Self::Continuous => write!(f, "continuous"),
        }
    }
}

/// Input-stage function of an Input unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputFunction {
    Integrator,
    SoftClamp,
    None,
}

impl InputFunction {
    pub fn code(self) -> u8 {
        match self {
            Self::Integrator => 0,
            Self::SoftClamp => 1,
            Self::None => 255,
        }
    }
}

/// Output-stage function of a Threshold unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFunction {
    Logistic,
    Integrator,
    HardClamp,
    WeakClamp,
    Bias,
    None,
}

impl OutputFunction {
    pub fn code(self) -> u8 {
        match self {
            Self::Logistic => 0,
            Self::Integrator => 1,
            Self::HardClamp => 2,
            Self::WeakClamp => 3,
            Self::Bias => 4,
            Self::None => 255,
        }
    }
}

/// Convergence test applied by output groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopCriterion {
    #[default]
    None,
    Standard,
    Max,
}

impl StopCriterion {
    pub fn code(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Standard => 1,
            Self::Max => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorFunction {
    #[default]
    None,
    CrossEntropy,
    Squared,
}

impl ErrorFunction {
    pub fn code(self) -> u8 {
        match self {
            Self::None => 0,
            Self::CrossEntropy => 1,
            Self::Squared => 2,
        }
    }
}

/// Weight-update rule run by the Weight units.
///
/// `DougsMomentum` is defined by the unit kernel alone and is only ever
/// selected here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateFunction {
    Steepest,
    Momentum,
    #[default]
    DougsMomentum,
}

impl UpdateFunction {
    pub fn code(self) -> u8 {
        match self {
            Self::Steepest => 0,
            Self::Momentum => 1,
            Self::DougsMomentum => 2,
        }
    }
}

impl fmt::Display for UpdateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Steepest => write!(f, "steepest"),
            Self::Momentum => write!(f, "momentum"),
            Self::DougsMomentum => write!(f, "dougs_momentum"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_codes() {
        assert_eq!(NetworkType::Continuous.code(), 3);
        assert_eq!(InputFunction::None.code(), 255);
        assert_eq!(OutputFunction::Bias.code(), 4);
        assert_eq!(StopCriterion::Standard.code(), 1);
        assert_eq!(ErrorFunction::CrossEntropy.code(), 1);
        assert_eq!(UpdateFunction::DougsMomentum.code(), 2);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(UpdateFunction::default(), UpdateFunction::DougsMomentum);
        assert_eq!(NetworkType::default(), NetworkType::FeedForward);
    }

    #[test]
    fn test_serde_names() {
        let f: OutputFunction = serde_yaml::from_str("hard_clamp").unwrap();
        assert_eq!(f, OutputFunction::HardClamp);
        let u: UpdateFunction = serde_yaml::from_str("dougs_momentum").unwrap();
        assert_eq!(u.to_string(), "dougs_momentum");
    }
}
