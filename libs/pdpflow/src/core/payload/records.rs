// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use crate::core::graph::LinkCategory;
use crate::core::topology::NetworkType;
use pdpflow_fixed::WireWriter;

/// Network-wide record shared by every unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkRecord {
    pub net_type: NetworkType,
    pub ticks_per_interval: u32,
    pub global_max_ticks: u32,
    pub output_chain_len: u32,
}

impl NetworkRecord {
    pub const SIZE: usize = 16;

    /// `<B3x3I`
    pub fn encode(&self, w: &mut WireWriter) {
        w.u8(self.net_type.code())
            .pad(3)
            .u32(self.ticks_per_interval)
            .u32(self.global_max_ticks)
            .u32(self.output_chain_len);
    }
}

/// A unit's outgoing routing key per category, 0 where it sends nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoutingKeys(pub [u32; 5]);

impl RoutingKeys {
    pub const SIZE: usize = 20;

    pub fn get(&self, category: LinkCategory) -> u32 {
        self.0[category.routing_slot()]
    }

    pub fn set(&mut self, category: LinkCategory, key: u32) {
        self.0[category.routing_slot()] = key;
    }

    /// Keys in [fwd, bkp, fsg, stp, lds] order.
    pub fn encode(&self, w: &mut WireWriter) {
        for key in self.0 {
            w.u32(key);
        }
    }
}
