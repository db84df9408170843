// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

mod compile_phase;
mod compile_result;
#[allow(clippy::module_inception)]
mod compiler;
mod unit_factory;
mod wiring;

pub use compile_phase::CompilePhase;
pub use compile_result::CompileResult;
pub use compiler::{CompiledGraph, GraphCompiler};
