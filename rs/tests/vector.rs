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

//! String extraction from columnar vectors.

mod common;

use common::{bytes, inline_slot, pointer_slot, MemApi, MemVector};
use duckdb_marshal::ffi::{self, DUCKDB_TYPE_BLOB, DUCKDB_TYPE_INTEGER, DUCKDB_TYPE_VARCHAR};
use duckdb_marshal::{
    decode_slot, extract_strings, row_is_valid, BufferPolicy, Error, HostValue, Materializer,
    StringSlot, Validity,
};

fn extract(api: &MemApi, vector: &mut MemVector, rows: u64, policy: BufferPolicy) -> HostValue {
    let m = Materializer::new(policy);
    unsafe { extract_strings(api, vector.handle(), rows, &m) }.unwrap()
}

#[test]
fn mixed_rows_keep_order_and_nulls() {
    let long = [0xABu8; 40];
    let mut v = MemVector::strings(
        DUCKDB_TYPE_VARCHAR,
        &[None, Some(&b"ab"[..]), Some(&long[..]), None, Some(&b""[..])],
    );
    let api = MemApi::new();

    for policy in [BufferPolicy::Copy, BufferPolicy::Reference] {
        let out = extract(&api, &mut v, 5, policy);
        let rows = out.as_array().unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0], HostValue::Null);
        assert_eq!(bytes(&rows[1]), Some(&b"ab"[..]));
        assert_eq!(bytes(&rows[2]), Some(&long[..]));
        assert_eq!(rows[3], HostValue::Null);
        // Empty value is a zero-length buffer, not null.
        assert_eq!(bytes(&rows[4]), Some(&b""[..]));
    }
}

#[test]
fn pointer_rows_follow_policy_inline_rows_always_copy() {
    let long = b"this value is long enough to live outside the slot";
    let mut v =
        MemVector::strings(DUCKDB_TYPE_VARCHAR, &[Some(&b"short"[..]), Some(&long[..])]);
    let api = MemApi::new();

    let out = extract(&api, &mut v, 2, BufferPolicy::Reference);
    let rows = out.as_array().unwrap();
    assert!(!rows[0].as_buffer().unwrap().is_referenced());
    assert!(rows[1].as_buffer().unwrap().is_referenced());

    let out = extract(&api, &mut v, 2, BufferPolicy::Copy);
    let rows = out.as_array().unwrap();
    assert!(!rows[0].as_buffer().unwrap().is_referenced());
    assert!(!rows[1].as_buffer().unwrap().is_referenced());
}

#[test]
fn copied_buffers_survive_the_vector() {
    let long = vec![7u8; 100];
    let mut v = MemVector::strings(DUCKDB_TYPE_BLOB, &[Some(&long[..])]);
    let api = MemApi::new();
    let out = extract(&api, &mut v, 1, BufferPolicy::Copy);
    drop(v);
    let rows = out.as_array().unwrap();
    assert_eq!(bytes(&rows[0]), Some(&long[..]));
}

#[test]
fn extracted_length_matches_source() {
    let twelve = b"exactly12byt";
    let thirteen = b"thirteen byte";
    let mut v =
        MemVector::strings(DUCKDB_TYPE_VARCHAR, &[Some(&twelve[..]), Some(&thirteen[..])]);
    let api = MemApi::new();
    let out = extract(&api, &mut v, 2, BufferPolicy::Copy);
    let rows = out.as_array().unwrap();
    assert_eq!(rows[0].as_buffer().unwrap().len(), 12);
    assert_eq!(bytes(&rows[0]), Some(&twelve[..]));
    assert_eq!(rows[1].as_buffer().unwrap().len(), 13);
    assert_eq!(bytes(&rows[1]), Some(&thirteen[..]));
}

#[test]
fn blob_with_embedded_zero_bytes() {
    let blob = [0u8, 1, 0, 2, 0, 3, 0, 4, 0, 5, 0, 6, 0, 7, 0, 8];
    let mut v = MemVector::strings(DUCKDB_TYPE_BLOB, &[Some(&blob[..]), Some(&blob[..3])]);
    let api = MemApi::new();
    let out = extract(&api, &mut v, 2, BufferPolicy::Copy);
    let rows = out.as_array().unwrap();
    assert_eq!(bytes(&rows[0]), Some(&blob[..]));
    assert_eq!(bytes(&rows[1]), Some(&[0u8, 1, 0][..]));
}

#[test]
fn non_string_column_is_null() {
    let mut v = MemVector::typed(DUCKDB_TYPE_INTEGER);
    let api = MemApi::new();
    assert_eq!(extract(&api, &mut v, 3, BufferPolicy::Copy), HostValue::Null);
}

#[test]
fn zero_rows_is_empty_array() {
    let mut v = MemVector::strings(DUCKDB_TYPE_VARCHAR, &[]);
    let api = MemApi::new();
    assert_eq!(
        extract(&api, &mut v, 0, BufferPolicy::Copy),
        HostValue::Array(Vec::new())
    );
}

#[test]
fn missing_bitmap_means_all_valid() {
    let mut v = MemVector::strings(DUCKDB_TYPE_VARCHAR, &[Some(&b"a"[..]), Some(&b"b"[..])])
        .without_validity();
    let api = MemApi::new();
    let out = extract(&api, &mut v, 2, BufferPolicy::Copy);
    let rows = out.as_array().unwrap();
    assert_eq!(bytes(&rows[0]), Some(&b"a"[..]));
    assert_eq!(bytes(&rows[1]), Some(&b"b"[..]));
}

#[test]
fn fewer_rows_than_the_vector_holds() {
    let rows = [Some(&b"a"[..]), Some(&b"b"[..]), Some(&b"c"[..])];
    let mut v = MemVector::strings(DUCKDB_TYPE_VARCHAR, &rows);
    let api = MemApi::new();
    let out = extract(&api, &mut v, 2, BufferPolicy::Copy);
    assert_eq!(out.as_array().unwrap().len(), 2);
}

#[test]
fn row_count_above_capacity_is_rejected() {
    let mut v = MemVector::strings(DUCKDB_TYPE_VARCHAR, &[Some(&b"a"[..])]);
    let mut api = MemApi::new();
    api.capacity = 1;
    let m = Materializer::new(BufferPolicy::Copy);
    let err = unsafe { extract_strings(&api, v.handle(), 2, &m) }.unwrap_err();
    assert_eq!(
        err,
        Error::RowCountOutOfBounds {
            row_count: 2,
            capacity: 1
        }
    );
}

#[test]
fn null_vector_is_null() {
    let api = MemApi::new();
    let m = Materializer::new(BufferPolicy::Copy);
    let out = unsafe { extract_strings(&api, std::ptr::null_mut(), 3, &m) };
    assert_eq!(out, Ok(HostValue::Null));
}

#[test]
fn rows_across_validity_words() {
    let values: Vec<Option<&[u8]>> = (0..130)
        .map(|i| if i % 3 == 0 { None } else { Some(&b"x"[..]) })
        .collect();
    let mut v = MemVector::strings(DUCKDB_TYPE_VARCHAR, &values);
    let api = MemApi::new();
    let out = extract(&api, &mut v, 130, BufferPolicy::Copy);
    let rows = out.as_array().unwrap();
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row.is_nullish(), i % 3 == 0, "row {i}");
    }
}

// ---------------------------------------------------------------------------
// Slot and bitmap primitives
// ---------------------------------------------------------------------------

#[test]
fn decode_inline_and_pointer_slots() {
    let slot = inline_slot(b"hello");
    assert!(slot.is_inlined());
    assert_eq!(decode_slot(&slot), StringSlot::Inlined(b"hello"));

    let data = b"a string that does not fit inline".to_vec();
    let slot = pointer_slot(&data);
    assert!(!slot.is_inlined());
    match decode_slot(&slot) {
        StringSlot::Pointer { ptr, len } => {
            assert_eq!(ptr, data.as_ptr());
            assert_eq!(len, data.len());
        }
        other => panic!("expected pointer form, got {other:?}"),
    }
}

#[test]
fn inline_threshold_is_twelve_bytes() {
    assert!(inline_slot(&[1u8; 12]).is_inlined());
    let data = [1u8; 13];
    assert!(!pointer_slot(&data).is_inlined());
    assert_eq!(ffi::DUCKDB_STRING_INLINE_LENGTH, 12);
}

#[test]
fn bitmap_is_lsb_first() {
    let words = [0b1010u64, 1u64 << 63];
    assert!(!row_is_valid(&words, 0));
    assert!(row_is_valid(&words, 1));
    assert!(!row_is_valid(&words, 2));
    assert!(row_is_valid(&words, 3));
    assert!(row_is_valid(&words, 127));
    assert!(!row_is_valid(&words, 64));
    // Past the end of the bitmap.
    assert!(!row_is_valid(&words, 128));
}

#[test]
fn validity_accessor() {
    let words = [0b01u64];
    let v = Validity::from_words(&words);
    assert!(v.is_valid(0));
    assert!(!v.is_valid(1));
    assert!(Validity::all_valid().is_valid(5000));
    let v = unsafe { Validity::from_raw(std::ptr::null(), 10) };
    assert!(v.is_valid(9));
}
