// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Little-endian payload packing with explicit padding.

use crate::error::{WireError, WireResult};
use crate::value::FixedValue;

/// Append-only little-endian buffer.
///
/// Every field is written at its natural width and padding is always
/// explicit, so a payload's layout reads directly off the call sequence.
#[derive(Debug, Default, Clone)]
pub struct WireWriter {
    buf: Vec<u8>,
}

impl WireWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn u8(&mut self, v: u8) -> &mut Self {
        self.buf.push(v);
        self
    }

    pub fn u16(&mut self, v: u16) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn u32(&mut self, v: u32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn i16(&mut self, v: i16) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn i32(&mut self, v: i32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    /// Write `count` zero bytes.
    pub fn pad(&mut self, count: usize) -> &mut Self {
        self.buf.resize(self.buf.len() + count, 0);
        self
    }

    /// Write a fixed-point value in its own format.
    pub fn fixed<V: FixedValue>(&mut self, v: V) -> &mut Self {
        v.write_to(self);
        self
    }

    pub fn bytes(&mut self, data: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(data);
        self
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Cursor over a little-endian payload.
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take<const N: usize>(&mut self) -> WireResult<[u8; N]> {
        let available = self.buf.len().saturating_sub(self.pos);
        if available < N {
            return Err(WireError::Truncated {
                offset: self.pos,
                needed: N,
                available,
            });
        }
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    pub fn u8(&mut self) -> WireResult<u8> {
        Ok(self.take::<1>()?[0])
    }

    pub fn u16(&mut self) -> WireResult<u16> {
        Ok(u16::from_le_bytes(self.take()?))
    }

    pub fn u32(&mut self) -> WireResult<u32> {
        Ok(u32::from_le_bytes(self.take()?))
    }

    pub fn i16(&mut self) -> WireResult<i16> {
        Ok(i16::from_le_bytes(self.take()?))
    }

    pub fn i32(&mut self) -> WireResult<i32> {
        Ok(i32::from_le_bytes(self.take()?))
    }

    /// Skip padding bytes.
    pub fn skip(&mut self, count: usize) -> WireResult<()> {
        let available = self.buf.len().saturating_sub(self.pos);
        if available < count {
            return Err(WireError::Truncated {
                offset: self.pos,
                needed: count,
                available,
            });
        }
        self.pos += count;
        Ok(())
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }
}
