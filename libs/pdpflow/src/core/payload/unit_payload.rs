// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use super::Region;
use crate::core::graph::{UnitId, UnitRole};
use std::collections::BTreeMap;

/// Configuration regions of one unit, ordered by region code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitPayload {
    pub unit: UnitId,
    pub role: UnitRole,
    regions: BTreeMap<Region, Vec<u8>>,
}

impl UnitPayload {
    pub fn new(unit: UnitId, role: UnitRole) -> Self {
        Self {
            unit,
            role,
            regions: BTreeMap::new(),
        }
    }

    pub fn set_region(&mut self, region: Region, data: Vec<u8>) {
        self.regions.insert(region, data);
    }

    pub fn region(&self, region: Region) -> Option<&[u8]> {
        self.regions.get(&region).map(Vec::as_slice)
    }

    pub fn has_region(&self, region: Region) -> bool {
        self.regions.contains_key(&region)
    }

    pub fn regions(&self) -> impl Iterator<Item = (Region, &[u8])> {
        self.regions.iter().map(|(r, d)| (*r, d.as_slice()))
    }

    pub fn region_list(&self) -> Vec<Region> {
        self.regions.keys().copied().collect()
    }

    /// Bytes across all regions.
    pub fn size(&self) -> usize {
        self.regions.values().map(Vec::len).sum()
    }
}
