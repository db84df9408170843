// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use crate::core::topology::{
    NetworkType, UpdateFunction, DEF_LEARNING_RATE, DEF_MOMENTUM, DEF_NUM_UPDATES,
    DEF_WEIGHT_DECAY,
};
use serde::{Deserialize, Serialize};

/// Network-wide execution and learning parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkSettings {
    pub net_type: NetworkType,
    pub ticks_per_interval: u32,
    pub intervals: u32,
    pub learning_rate: f64,
    pub weight_decay: f64,
    pub momentum: f64,
    pub update_function: UpdateFunction,
    pub num_updates: u32,
    pub train_group_crit: Option<f64>,
    pub test_group_crit: Option<f64>,
}

impl NetworkSettings {
    pub fn new(net_type: NetworkType, intervals: u32, ticks_per_interval: u32) -> Self {
        Self {
            net_type,
            ticks_per_interval,
            intervals,
            ..Default::default()
        }
    }

    /// Longest example the units will run, in ticks.
    pub fn global_max_ticks(&self) -> u32 {
        self.intervals * self.ticks_per_interval + 1
    }

    /// Whether any value a unit holds in its Core region differs. The
    /// remaining fields only shape stage records or the graph itself.
    pub fn unit_params_differ(&self, other: &Self) -> bool {
        self.learning_rate != other.learning_rate
            || self.weight_decay != other.weight_decay
            || self.momentum != other.momentum
            || self.train_group_crit != other.train_group_crit
            || self.test_group_crit != other.test_group_crit
    }

    /// Overwrite every field `params` sets.
    pub fn apply(&mut self, params: &NetworkParams) {
        if let Some(v) = params.num_updates {
            self.num_updates = v;
        }
        if let Some(v) = params.train_group_crit {
            self.train_group_crit = Some(v);
        }
        if let Some(v) = params.test_group_crit {
            self.test_group_crit = Some(v);
        }
        if let Some(v) = params.learning_rate {
            self.learning_rate = v;
        }
        if let Some(v) = params.weight_decay {
            self.weight_decay = v;
        }
        if let Some(v) = params.momentum {
            self.momentum = v;
        }
    }
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            net_type: NetworkType::default(),
            ticks_per_interval: 1,
            intervals: 1,
            learning_rate: DEF_LEARNING_RATE,
            weight_decay: DEF_WEIGHT_DECAY,
            momentum: DEF_MOMENTUM,
            update_function: UpdateFunction::default(),
            num_updates: DEF_NUM_UPDATES,
            train_group_crit: None,
            test_group_crit: None,
        }
    }
}

/// Partial update for [`NetworkSettings`]; `None` keeps the current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkParams {
    pub num_updates: Option<u32>,
    pub train_group_crit: Option<f64>,
    pub test_group_crit: Option<f64>,
    pub learning_rate: Option<f64>,
    pub weight_decay: Option<f64>,
    pub momentum: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_max_ticks() {
        let s = NetworkSettings::new(NetworkType::Continuous, 4, 5);
        assert_eq!(s.global_max_ticks(), 21);
        assert_eq!(NetworkSettings::default().global_max_ticks(), 2);
    }

    #[test]
    fn test_apply_keeps_unset_fields() {
        let mut s = NetworkSettings::default();
        s.apply(&NetworkParams {
            learning_rate: Some(0.5),
            test_group_crit: Some(0.2),
            ..Default::default()
        });
        assert_eq!(s.learning_rate, 0.5);
        assert_eq!(s.momentum, DEF_MOMENTUM);
        assert_eq!(s.test_group_crit, Some(0.2));
        assert_eq!(s.train_group_crit, None);
    }

    #[test]
    fn test_num_updates_is_not_a_unit_param() {
        let before = NetworkSettings::default();
        let mut s = before;
        s.apply(&NetworkParams {
            num_updates: Some(7),
            ..Default::default()
        });
        assert!(!s.unit_params_differ(&before));

        s.apply(&NetworkParams {
            train_group_crit: Some(0.1),
            ..Default::default()
        });
        assert!(s.unit_params_differ(&before));
    }
}
