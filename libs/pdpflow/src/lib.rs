// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

#![allow(clippy::too_many_arguments)] // Group construction mirrors the declarative network API
#![allow(clippy::module_inception)] // network/network.rs, compiler/compiler.rs

//! Compiles a multi-layer perceptron into a distributed dataflow graph of
//! Weight, Sum, Input and Threshold units synchronized by receive-count
//! scoreboards, and drives train/test stages over the placed graph.

pub mod core;

pub use self::core::*;

/// Fixed-point wire formats.
pub use pdpflow_fixed as fixed;
