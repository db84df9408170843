// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Byte-exact configuration payloads, one per unit.
//!
//! All regions are little-endian with explicit padding. The layouts are the
//! contract every unit runtime parses, so sizes are pinned by tests.

mod builder;
mod cores;
mod records;
mod region;
mod unit_payload;

pub use builder::PayloadBuilder;
pub use cores::{InputCore, SumCore, ThresholdCore, WeightCore};
pub use records::{NetworkRecord, RoutingKeys};
pub use region::Region;
pub use unit_payload::UnitPayload;
