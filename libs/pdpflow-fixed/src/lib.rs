// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Fixed-point wire formats for every real quantity exchanged between the
//! compiler and a unit, or between two units.
//!
//! Each format is a signed integer with a fixed binary point. Conversions
//! round half away from zero and saturate instead of wrapping. Absent values
//! travel as the reserved `0x8000_0000` pattern in every 32-bit format.

mod format;
mod value;

pub mod error;
pub mod wire;

pub use format::{
    Encoded, FixedFormat, ACTIV_SHIFT, ERROR_SHIFT, FPREAL_SHIFT, NAN_PATTERN, SHORT_ACTIV_SHIFT,
    SHORT_FPREAL_SHIFT, WEIGHT_MAX_RAW, WEIGHT_SHIFT, WF_EPS, WF_MAX, WF_MIN,
};
pub use value::{Activation, ErrorValue, FixedValue, FpReal, ShortFpReal, WeightValue};

pub use error::{WireError, WireResult};
pub use wire::{WireReader, WireWriter};
