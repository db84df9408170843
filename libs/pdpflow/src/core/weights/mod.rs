// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

mod lens_weights;

pub use lens_weights::{
    load_lens_weights, read_lens_weights, WeightsFileInfo, LENS_WEIGHT_MAGIC_COOKIE,
};
