// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

mod plan;
mod tree_layout;

pub use plan::{PartitionPlan, SubgroupRef};
pub use tree_layout::TreeLayout;
