// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use thiserror::Error;

/// Errors raised while decoding a little-endian payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    /// The buffer ended before the requested field.
    #[error("payload truncated at offset {offset}: needed {needed} bytes, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A field held a value outside its declared code set.
    #[error("invalid code {code} for field '{field}'")]
    InvalidCode { field: &'static str, code: u32 },
}

/// Result type alias for wire operations.
pub type WireResult<T> = std::result::Result<T, WireError>;
