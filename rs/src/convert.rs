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

//! Bidirectional conversion between native ABI types and host values.
//!
//! Decoding never truncates: a host value that does not fit the native type
//! fails with `Error::TypeMismatch` naming the argument position. Native
//! nulls encode to `HostValue::Null`, never to a live-looking handle.

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_void};

use crate::buffer::ByteBuffer;
use crate::error::{Error, Result};
use crate::ffi;
use crate::handle::{self, HandleKind, OutStringSlot};
use crate::value::{BigInt, HostValue};

/// Largest integer the host's number type holds exactly (2^53 - 1).
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Conversion from a host argument into a native value.
pub trait FromHost: Sized {
    /// `index` is the argument position, reported on mismatch.
    fn from_host(value: &HostValue, index: usize) -> Result<Self>;
}

/// Conversion from a native value into a host value.
pub trait ToHost {
    fn to_host(self) -> HostValue;
}

/// Decode argument `index`. A missing argument reads as `Undefined`.
pub fn decode<T: FromHost>(args: &[HostValue], index: usize) -> Result<T> {
    match args.get(index) {
        Some(value) => T::from_host(value, index),
        None => T::from_host(&HostValue::Undefined, index),
    }
}

/// Encode a native value for the host.
pub fn encode<T: ToHost>(value: T) -> HostValue {
    value.to_host()
}

/// Encode a NUL-terminated native string. Stops at the first zero byte, so
/// binary data must go through the buffer materializer instead.
///
/// # Safety
/// A non-null `ptr` must point to a NUL-terminated byte sequence.
pub unsafe fn encode_c_str(ptr: *const c_char) -> HostValue {
    if ptr.is_null() {
        return HostValue::Null;
    }
    let s = unsafe { CStr::from_ptr(ptr) };
    HostValue::String(s.to_string_lossy().into_owned())
}

fn mismatch(index: usize, expected: &'static str, found: &'static str) -> Error {
    Error::TypeMismatch {
        index,
        expected,
        found,
    }
}

/// Read an integral host value. `safe_only` limits numbers to the host's
/// exact-integer range, for native types wider than that range.
fn host_integer(
    value: &HostValue,
    index: usize,
    expected: &'static str,
    safe_only: bool,
) -> Result<i128> {
    match value {
        HostValue::Number(n) => {
            if !n.is_finite() || n.fract() != 0.0 {
                return Err(mismatch(index, expected, "non-integer number"));
            }
            if safe_only && n.abs() > MAX_SAFE_INTEGER {
                return Err(mismatch(index, expected, "unsafe integer number"));
            }
            // Saturating cast; the caller's width check rejects saturated values.
            Ok(*n as i128)
        }
        HostValue::BigInt(b) => b
            .to_i128()
            .ok_or_else(|| mismatch(index, expected, "out-of-range bigint")),
        other => Err(mismatch(index, expected, other.type_name())),
    }
}

macro_rules! int_conversions {
    ($($t:ty => $name:literal, $wide:literal);* $(;)?) => {$(
        impl FromHost for $t {
            fn from_host(value: &HostValue, index: usize) -> Result<Self> {
                let wide = host_integer(value, index, $name, $wide)?;
                <$t>::try_from(wide).map_err(|_| {
                    let found = match value {
                        HostValue::BigInt(_) => "out-of-range bigint",
                        _ => "out-of-range number",
                    };
                    mismatch(index, $name, found)
                })
            }
        }

        impl ToHost for $t {
            fn to_host(self) -> HostValue {
                if $wide {
                    HostValue::BigInt(BigInt::from(self as i128))
                } else {
                    HostValue::Number(self as f64)
                }
            }
        }
    )*};
}

int_conversions! {
    i8 => "int8_t", false;
    i16 => "int16_t", false;
    i32 => "int32_t", false;
    u8 => "uint8_t", false;
    u16 => "uint16_t", false;
    u32 => "uint32_t", false;
    i64 => "int64_t", true;
    u64 => "uint64_t", true;
}

impl FromHost for f64 {
    fn from_host(value: &HostValue, index: usize) -> Result<Self> {
        match value {
            HostValue::Number(n) => Ok(*n),
            other => Err(mismatch(index, "double", other.type_name())),
        }
    }
}

impl ToHost for f64 {
    fn to_host(self) -> HostValue {
        HostValue::Number(self)
    }
}

impl FromHost for f32 {
    fn from_host(value: &HostValue, index: usize) -> Result<Self> {
        match value {
            HostValue::Number(n) if n.is_finite() && n.abs() > f32::MAX as f64 => {
                Err(mismatch(index, "float", "out-of-range number"))
            }
            HostValue::Number(n) => Ok(*n as f32),
            other => Err(mismatch(index, "float", other.type_name())),
        }
    }
}

impl ToHost for f32 {
    fn to_host(self) -> HostValue {
        HostValue::Number(self as f64)
    }
}

impl FromHost for bool {
    fn from_host(value: &HostValue, index: usize) -> Result<Self> {
        match value {
            HostValue::Bool(b) => Ok(*b),
            other => Err(mismatch(index, "bool", other.type_name())),
        }
    }
}

impl ToHost for bool {
    fn to_host(self) -> HostValue {
        HostValue::Bool(self)
    }
}

// ---------------------------------------------------------------------------
// 128-bit integers
// ---------------------------------------------------------------------------

impl FromHost for ffi::duckdb_hugeint {
    fn from_host(value: &HostValue, index: usize) -> Result<Self> {
        let v = host_integer(value, index, "hugeint", true)?;
        Ok(ffi::duckdb_hugeint {
            lower: v as u64,
            upper: (v >> 64) as i64,
        })
    }
}

impl ToHost for ffi::duckdb_hugeint {
    fn to_host(self) -> HostValue {
        let v = ((self.upper as i128) << 64) | self.lower as i128;
        HostValue::BigInt(BigInt::from(v))
    }
}

impl FromHost for ffi::duckdb_uhugeint {
    fn from_host(value: &HostValue, index: usize) -> Result<Self> {
        let v = match value {
            HostValue::BigInt(b) => b
                .to_u128()
                .ok_or_else(|| mismatch(index, "uhugeint", "negative bigint"))?,
            other => u128::try_from(host_integer(other, index, "uhugeint", true)?)
                .map_err(|_| mismatch(index, "uhugeint", "negative number"))?,
        };
        Ok(ffi::duckdb_uhugeint {
            lower: v as u64,
            upper: (v >> 64) as u64,
        })
    }
}

impl ToHost for ffi::duckdb_uhugeint {
    fn to_host(self) -> HostValue {
        let v = ((self.upper as u128) << 64) | self.lower as u128;
        HostValue::BigInt(BigInt::from(v))
    }
}

// ---------------------------------------------------------------------------
// Strings
// ---------------------------------------------------------------------------

impl FromHost for String {
    fn from_host(value: &HostValue, index: usize) -> Result<Self> {
        match value {
            HostValue::String(s) => Ok(s.clone()),
            other => Err(mismatch(index, "string", other.type_name())),
        }
    }
}

impl FromHost for CString {
    fn from_host(value: &HostValue, index: usize) -> Result<Self> {
        let s = String::from_host(value, index)?;
        CString::new(s).map_err(|_| mismatch(index, "string", "string with NUL byte"))
    }
}

impl ToHost for String {
    fn to_host(self) -> HostValue {
        HostValue::String(self)
    }
}

impl ToHost for &str {
    fn to_host(self) -> HostValue {
        HostValue::String(self.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Pointers and handles
// ---------------------------------------------------------------------------

/// Untyped `void*`: any handle, or null.
impl FromHost for *mut c_void {
    fn from_host(value: &HostValue, index: usize) -> Result<Self> {
        match value {
            HostValue::Null | HostValue::Undefined => Ok(std::ptr::null_mut()),
            HostValue::External(h) => Ok(h.as_ptr()),
            other => Err(mismatch(index, "pointer", other.type_name())),
        }
    }
}

impl ToHost for *mut c_void {
    fn to_host(self) -> HostValue {
        handle::wrap(self, HandleKind::Pointer)
    }
}

macro_rules! native_handles {
    ($($ty:ty => $kind:expr),* $(,)?) => {$(
        impl FromHost for $ty {
            fn from_host(value: &HostValue, index: usize) -> Result<Self> {
                Ok(handle::unwrap(value, $kind, index)? as $ty)
            }
        }

        impl ToHost for $ty {
            fn to_host(self) -> HostValue {
                handle::wrap(self as *mut c_void, $kind)
            }
        }
    )*};
}

native_handles! {
    ffi::duckdb_database => HandleKind::Database,
    ffi::duckdb_connection => HandleKind::Connection,
    ffi::duckdb_prepared_statement => HandleKind::PreparedStatement,
    *mut ffi::duckdb_result => HandleKind::Result,
    ffi::duckdb_data_chunk => HandleKind::DataChunk,
    ffi::duckdb_vector => HandleKind::Vector,
    ffi::duckdb_logical_type => HandleKind::LogicalType,
    ffi::duckdb_value => HandleKind::Value,
    ffi::duckdb_appender => HandleKind::Appender,
    ffi::duckdb_config => HandleKind::Config,
}

/// `char**` out-parameter: an out-string slot, or null.
impl FromHost for *mut *const c_char {
    fn from_host(value: &HostValue, index: usize) -> Result<Self> {
        match value {
            HostValue::Null | HostValue::Undefined => Ok(std::ptr::null_mut()),
            HostValue::OutString(slot) => Ok(slot.as_out_ptr()),
            other => Err(mismatch(index, "out-string slot", other.type_name())),
        }
    }
}

impl ToHost for OutStringSlot {
    fn to_host(self) -> HostValue {
        HostValue::OutString(self)
    }
}

// ---------------------------------------------------------------------------
// Composite values
// ---------------------------------------------------------------------------

impl FromHost for HostValue {
    fn from_host(value: &HostValue, _index: usize) -> Result<Self> {
        Ok(value.clone())
    }
}

impl ToHost for HostValue {
    fn to_host(self) -> HostValue {
        self
    }
}

impl ToHost for ByteBuffer {
    fn to_host(self) -> HostValue {
        HostValue::Buffer(self)
    }
}

/// Nullable argument: `Null`/`Undefined` decode to `None`.
impl<T: FromHost> FromHost for Option<T> {
    fn from_host(value: &HostValue, index: usize) -> Result<Self> {
        if value.is_nullish() {
            Ok(None)
        } else {
            T::from_host(value, index).map(Some)
        }
    }
}

impl<T: ToHost> ToHost for Option<T> {
    fn to_host(self) -> HostValue {
        match self {
            Some(v) => v.to_host(),
            None => HostValue::Null,
        }
    }
}

impl<T: ToHost> ToHost for Vec<T> {
    fn to_host(self) -> HostValue {
        HostValue::Array(self.into_iter().map(ToHost::to_host).collect())
    }
}
