// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use crate::core::graph::{LinkCategory, MachineGraph, UnitId};
use crate::core::payload::RoutingKeys;
use crate::core::{PdpError, Result};
use serde::Serialize;
use std::collections::BTreeMap;

/// Routing key allocated to each multicast partition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RoutingTable {
    keys: BTreeMap<String, u32>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, partition: impl Into<String>, key: u32) {
        self.keys.insert(partition.into(), key);
    }

    pub fn key(&self, partition: &str) -> Option<u32> {
        self.keys.get(partition).copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.keys.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Outgoing keys of one unit. A category the unit does not send in
    /// gets 0; a partition without a key is an error.
    pub fn keys_for(&self, graph: &MachineGraph, unit: &UnitId) -> Result<RoutingKeys> {
        let mut keys = RoutingKeys::default();
        for category in LinkCategory::ROUTING_ORDER {
            if let Some(partition) = graph.outgoing_partition(unit, category) {
                let key = self.key(&partition).ok_or_else(|| {
                    PdpError::Placement(format!("no routing key for partition {}", partition))
                })?;
                keys.set(category, key);
            }
        }
        Ok(keys)
    }
}
