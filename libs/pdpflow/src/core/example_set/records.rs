// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Fixed-size summary records produced by example compilation.
//!
//! Every record is `<4I`: four little-endian 32-bit words.

use pdpflow_fixed::{FpReal, WireWriter};

/// Set-level summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetRecord {
    pub num_examples: u32,
    pub max_time: FpReal,
    pub min_time: FpReal,
    pub grace_time: FpReal,
}

/// Per-example summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExampleRecord {
    pub num: u32,
    pub num_events: u32,
    /// Index of the example's first event in the event table.
    pub ev_idx: u32,
    pub freq: FpReal,
}

/// Per-event summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventRecord {
    pub max_time: FpReal,
    pub min_time: FpReal,
    pub grace_time: FpReal,
    /// Index of the event's slice in every group's input/target arrays.
    pub it_idx: u32,
}

impl SetRecord {
    pub const SIZE: usize = 16;

    pub fn encode(&self, w: &mut WireWriter) {
        w.u32(self.num_examples)
            .fixed(self.max_time)
            .fixed(self.min_time)
            .fixed(self.grace_time);
    }
}

impl ExampleRecord {
    pub const SIZE: usize = 16;

    pub fn encode(&self, w: &mut WireWriter) {
        w.u32(self.num)
            .u32(self.num_events)
            .u32(self.ev_idx)
            .fixed(self.freq);
    }
}

impl EventRecord {
    pub const SIZE: usize = 16;

    pub fn encode(&self, w: &mut WireWriter) {
        w.fixed(self.max_time)
            .fixed(self.min_time)
            .fixed(self.grace_time)
            .u32(self.it_idx);
    }
}
