// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

mod example_set;
mod lens_examples;
mod records;

pub use example_set::{CompiledExamples, Event, EventValues, Example, ExampleSet, ValueList};
pub use lens_examples::{parse_lens_examples, LensExamples, LensHeader, MAX_EVENTS_PER_EXAMPLE};
pub use records::{EventRecord, ExampleRecord, SetRecord};
