// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

mod constants;
mod functions;
mod group;
mod ids;
mod link;
mod roles;
#[allow(clippy::module_inception)]
mod topology;

pub use constants::*;
pub use functions::{
    ErrorFunction, InputFunction, NetworkType, OutputFunction, StopCriterion, UpdateFunction,
};
pub use group::{Group, GroupParams};
pub use ids::{GroupId, LinkId};
pub use link::Link;
pub use roles::{GroupRole, GroupRoles};
pub use topology::Topology;
