//   Copyright (c) 2024-2026 Anton Kundenko <singaraiona@gmail.com>
//   All rights reserved.
//
//   Permission is hereby granted, free of charge, to any person obtaining a copy
//   of this software and associated documentation files (the "Software"), to deal
//   in the Software without restriction, including without limitation the rights
//   to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
//   copies of the Software, and to permit persons to whom the Software is
//   furnished to do so, subject to the following conditions:
//
//   The above copyright notice and this permission notice shall be included in all
//   copies or substantial portions of the Software.
//
//   THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
//   IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
//   FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
//   AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
//   LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
//   OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
//   SOFTWARE.

//! The host runtime's value model.
//!
//! The host is dynamically typed: every argument and every result is a
//! `HostValue`. Absence is always `Null` (or `Undefined` for a missing
//! argument) and is never confused with `0`, `""` or an empty buffer.

use crate::buffer::ByteBuffer;
use crate::handle::{OpaqueHandle, OutStringSlot};

/// A host value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum HostValue {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    BigInt(BigInt),
    String(String),
    Buffer(ByteBuffer),
    Array(Vec<HostValue>),
    External(OpaqueHandle),
    OutString(OutStringSlot),
}

impl HostValue {
    /// Host-facing name of the value's type, used in mismatch errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            HostValue::Undefined => "undefined",
            HostValue::Null => "null",
            HostValue::Bool(_) => "boolean",
            HostValue::Number(_) => "number",
            HostValue::BigInt(_) => "bigint",
            HostValue::String(_) => "string",
            HostValue::Buffer(_) => "buffer",
            HostValue::Array(_) => "array",
            HostValue::External(_) => "external",
            HostValue::OutString(_) => "out-string slot",
        }
    }

    /// True for `Null` and `Undefined`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, HostValue::Null | HostValue::Undefined)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            HostValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_buffer(&self) -> Option<&ByteBuffer> {
        match self {
            HostValue::Buffer(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[HostValue]> {
        match self {
            HostValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_handle(&self) -> Option<&OpaqueHandle> {
        match self {
            HostValue::External(h) => Some(h),
            _ => None,
        }
    }
}

/// Host bigint, wide enough for every native integer up to 128 bits
/// (signed and unsigned). Zero is never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BigInt {
    negative: bool,
    magnitude: u128,
}

impl BigInt {
    pub fn new(negative: bool, magnitude: u128) -> Self {
        BigInt {
            negative: negative && magnitude != 0,
            magnitude,
        }
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn magnitude(&self) -> u128 {
        self.magnitude
    }

    pub fn to_i128(self) -> Option<i128> {
        if self.negative {
            if self.magnitude == i128::MIN.unsigned_abs() {
                Some(i128::MIN)
            } else {
                i128::try_from(self.magnitude).ok().map(|m| -m)
            }
        } else {
            i128::try_from(self.magnitude).ok()
        }
    }

    pub fn to_u128(self) -> Option<u128> {
        (!self.negative).then_some(self.magnitude)
    }
}

impl From<i128> for BigInt {
    fn from(v: i128) -> Self {
        BigInt::new(v < 0, v.unsigned_abs())
    }
}

impl From<u128> for BigInt {
    fn from(v: u128) -> Self {
        BigInt::new(false, v)
    }
}

impl From<i64> for BigInt {
    fn from(v: i64) -> Self {
        BigInt::from(v as i128)
    }
}

impl From<u64> for BigInt {
    fn from(v: u64) -> Self {
        BigInt::from(v as u128)
    }
}
