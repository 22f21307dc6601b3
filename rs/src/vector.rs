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

//! String and blob extraction from columnar vectors.
//!
//! A VARCHAR/BLOB vector is an array of 16-byte `duckdb_string_t` slots plus
//! a validity bitmap. Short values sit inside the slot; longer ones are a
//! length and a pointer into engine-owned storage.

use crate::api::NativeApi;
use crate::buffer::{ByteBuffer, Materializer};
use crate::error::{Error, Result};
use crate::ffi;
use crate::value::HostValue;

// ---------------------------------------------------------------------------
// Slot decoding
// ---------------------------------------------------------------------------

/// One decoded string slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringSlot<'a> {
    /// The bytes live inside the slot and die with it.
    Inlined(&'a [u8]),
    /// The bytes live in engine storage.
    Pointer { ptr: *const u8, len: usize },
}

impl StringSlot<'_> {
    pub fn len(&self) -> usize {
        match self {
            StringSlot::Inlined(bytes) => bytes.len(),
            StringSlot::Pointer { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Decode a slot into its inline or pointer form.
///
/// This is the only place that reads the `duckdb_string_t` union.
pub fn decode_slot(slot: &ffi::duckdb_string_t) -> StringSlot<'_> {
    let len = slot.length() as usize;
    if slot.is_inlined() {
        // SAFETY: the length selects the inlined variant and is at most 12,
        // so the slice stays inside the slot. `c_char` and `u8` share layout.
        let bytes = unsafe {
            let inlined = &slot.value.inlined.inlined;
            std::slice::from_raw_parts(inlined.as_ptr() as *const u8, len)
        };
        StringSlot::Inlined(bytes)
    } else {
        // SAFETY: the length selects the pointer variant.
        let ptr = unsafe { slot.value.pointer.ptr } as *const u8;
        StringSlot::Pointer { ptr, len }
    }
}

// ---------------------------------------------------------------------------
// Validity bitmap
// ---------------------------------------------------------------------------

/// Whether `row` is valid in a packed bitmap of 64-bit words, LSB first.
/// Rows past the end of the bitmap are invalid.
#[inline]
pub fn row_is_valid(words: &[u64], row: usize) -> bool {
    let word = row / ffi::VALIDITY_BITS_PER_ENTRY;
    let bit = row % ffi::VALIDITY_BITS_PER_ENTRY;
    words.get(word).is_some_and(|w| (w >> bit) & 1 == 1)
}

/// Validity of one vector. A vector without a bitmap has every row valid.
#[derive(Debug, Clone, Copy)]
pub struct Validity<'a> {
    words: Option<&'a [u64]>,
}

impl<'a> Validity<'a> {
    pub fn all_valid() -> Self {
        Validity { words: None }
    }

    pub fn from_words(words: &'a [u64]) -> Self {
        Validity { words: Some(words) }
    }

    /// View the engine's validity pointer for `row_count` rows.
    ///
    /// # Safety
    /// A non-null `ptr` must cover `row_count` rows (rounded up to whole
    /// words) and outlive `'a`.
    pub unsafe fn from_raw(ptr: *const u64, row_count: usize) -> Self {
        if ptr.is_null() {
            return Validity::all_valid();
        }
        let n_words = row_count.div_ceil(ffi::VALIDITY_BITS_PER_ENTRY);
        Validity::from_words(unsafe { std::slice::from_raw_parts(ptr, n_words) })
    }

    #[inline]
    pub fn is_valid(&self, row: usize) -> bool {
        match self.words {
            Some(words) => row_is_valid(words, row),
            None => true,
        }
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Convert the first `row_count` rows of a VARCHAR or BLOB vector into a host
/// array of buffers, with `Null` for invalid rows.
///
/// Returns `Null` for a null vector or a vector of any other type. Inline
/// values are always copied; pointer values follow the materializer's
/// policy. Row order is preserved exactly.
///
/// # Safety
/// `vector` must be a live vector handle for `api`, and it must outlive any
/// referenced buffers in the result.
pub unsafe fn extract_strings<A: NativeApi + ?Sized>(
    api: &A,
    vector: ffi::duckdb_vector,
    row_count: ffi::idx_t,
    materializer: &Materializer,
) -> Result<HostValue> {
    if vector.is_null() {
        return Ok(HostValue::Null);
    }

    let type_id = unsafe { api.vector_column_type(vector) };
    if !ffi::is_string_like(type_id) {
        tracing::debug!(
            type_id,
            type_name = ffi::type_name(type_id),
            "not a string column, skipping extraction"
        );
        return Ok(HostValue::Null);
    }

    let capacity = api.vector_capacity();
    if row_count > capacity {
        return Err(Error::RowCountOutOfBounds {
            row_count,
            capacity,
        });
    }
    let n = row_count as usize;
    if n == 0 {
        return Ok(HostValue::Array(Vec::new()));
    }

    let validity = unsafe { Validity::from_raw(api.vector_validity(vector), n) };
    let slots = unsafe { api.vector_data(vector) } as *const ffi::duckdb_string_t;
    if slots.is_null() {
        return Err(Error::NullPointer {
            what: "vector data",
        });
    }
    // SAFETY: the vector holds `capacity` slots and `n <= capacity`.
    let slots = unsafe { std::slice::from_raw_parts(slots, n) };

    let mut out = Vec::with_capacity(n);
    let mut nulls = 0usize;
    for (row, slot) in slots.iter().enumerate() {
        if !validity.is_valid(row) {
            nulls += 1;
            out.push(HostValue::Null);
            continue;
        }
        let value = match decode_slot(slot) {
            StringSlot::Inlined(bytes) => HostValue::Buffer(ByteBuffer::copy_from(bytes)),
            StringSlot::Pointer { ptr, len } => unsafe { materializer.materialize(ptr, len) },
        };
        out.push(value);
    }

    tracing::debug!(
        rows = n,
        nulls,
        type_name = ffi::type_name(type_id),
        "extracted string vector"
    );
    Ok(HostValue::Array(out))
}
