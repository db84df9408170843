// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Network-wide defaults.

/// Input-stage functions per group.
pub const MAX_IN_PROCS: usize = 2;
/// Output-stage functions per group.
pub const MAX_OUT_PROCS: usize = 5;

pub const DEF_LEARNING_RATE: f64 = 0.1;
pub const DEF_WEIGHT_DECAY: f64 = 0.0;
pub const DEF_MOMENTUM: f64 = 0.9;
pub const DEF_NUM_UPDATES: u32 = 1;

pub const DEF_INIT_NET: f64 = 0.0;
pub const DEF_INIT_OUTPUT: f64 = 0.5;
pub const BIAS_INIT_OUTPUT: f64 = 1.0;

pub const DEF_SOFT_CLAMP: f64 = 0.5;
pub const DEF_WEAK_CLAMP: f64 = 0.5;
pub const DEF_GROUP_CRITERION: f64 = 0.0;
pub const DEF_EXAMPLE_FREQ: f64 = 1.0;

/// Label of the always-present bias group.
pub const BIAS_LABEL: &str = "Bias";
