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

//! In-memory stand-in for the engine: vectors laid out exactly like DuckDB's,
//! backed by Rust-owned memory.

#![allow(dead_code)]

use std::cell::RefCell;
use std::os::raw::{c_char, c_void};

use duckdb_marshal::ffi::{self, duckdb_string_t, duckdb_type, duckdb_vector};
use duckdb_marshal::{HandleKind, NativeApi};
use tracing_subscriber::EnvFilter;

/// Route crate logs to the test harness. `RUST_LOG` selects the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_test_writer()
        .try_init();
}

/// Build an inline slot. `bytes` must be at most 12 long.
pub fn inline_slot(bytes: &[u8]) -> duckdb_string_t {
    assert!(bytes.len() <= ffi::DUCKDB_STRING_INLINE_LENGTH as usize);
    let mut inlined = [0 as c_char; 12];
    for (dst, src) in inlined.iter_mut().zip(bytes) {
        *dst = *src as c_char;
    }
    duckdb_string_t {
        value: ffi::duckdb_string_value {
            inlined: ffi::duckdb_string_inlined {
                length: bytes.len() as u32,
                inlined,
            },
        },
    }
}

/// Build a pointer slot over `bytes`, which must outlive the slot.
pub fn pointer_slot(bytes: &[u8]) -> duckdb_string_t {
    let mut prefix = [0 as c_char; 4];
    for (dst, src) in prefix.iter_mut().zip(bytes) {
        *dst = *src as c_char;
    }
    duckdb_string_t {
        value: ffi::duckdb_string_value {
            pointer: ffi::duckdb_string_pointer {
                length: bytes.len() as u32,
                prefix,
                ptr: bytes.as_ptr() as *mut c_char,
            },
        },
    }
}

/// A string vector. Values longer than the inline limit point into
/// `storage`, whose heap buffers never move.
pub struct MemVector {
    pub type_id: duckdb_type,
    pub slots: Vec<duckdb_string_t>,
    pub validity: Option<Vec<u64>>,
    storage: Vec<Vec<u8>>,
}

impl MemVector {
    pub fn strings(type_id: duckdb_type, rows: &[Option<&[u8]>]) -> Self {
        let mut storage = Vec::new();
        let mut slots = Vec::with_capacity(rows.len());
        let mut validity = vec![0u64; rows.len().div_ceil(64).max(1)];
        for (row, value) in rows.iter().enumerate() {
            match value {
                Some(bytes) => {
                    validity[row / 64] |= 1 << (row % 64);
                    if bytes.len() <= ffi::DUCKDB_STRING_INLINE_LENGTH as usize {
                        slots.push(inline_slot(bytes));
                    } else {
                        storage.push(bytes.to_vec());
                        let owned = storage.last().unwrap();
                        slots.push(pointer_slot(owned));
                    }
                }
                // Invalid rows hold whatever the engine left there.
                None => slots.push(inline_slot(b"garbage")),
            }
        }
        MemVector {
            type_id,
            slots,
            validity: Some(validity),
            storage,
        }
    }

    /// A non-string vector; its data is never read.
    pub fn typed(type_id: duckdb_type) -> Self {
        MemVector {
            type_id,
            slots: Vec::new(),
            validity: None,
            storage: Vec::new(),
        }
    }

    pub fn without_validity(mut self) -> Self {
        self.validity = None;
        self
    }

    pub fn handle(&mut self) -> duckdb_vector {
        self as *mut MemVector as duckdb_vector
    }
}

/// Engine stand-in. Records every destroy call.
pub struct MemApi {
    pub capacity: u64,
    pub destroyed: RefCell<Vec<(HandleKind, usize)>>,
}

impl MemApi {
    pub fn new() -> Self {
        MemApi {
            capacity: 2048,
            destroyed: RefCell::new(Vec::new()),
        }
    }
}

impl NativeApi for MemApi {
    unsafe fn vector_column_type(&self, vector: duckdb_vector) -> duckdb_type {
        unsafe { (*(vector as *const MemVector)).type_id }
    }

    unsafe fn vector_data(&self, vector: duckdb_vector) -> *mut c_void {
        let v = unsafe { &mut *(vector as *mut MemVector) };
        v.slots.as_mut_ptr() as *mut c_void
    }

    unsafe fn vector_validity(&self, vector: duckdb_vector) -> *mut u64 {
        let v = unsafe { &mut *(vector as *mut MemVector) };
        match v.validity.as_mut() {
            Some(words) => words.as_mut_ptr(),
            None => std::ptr::null_mut(),
        }
    }

    fn vector_capacity(&self) -> ffi::idx_t {
        self.capacity
    }

    unsafe fn destroy(&self, kind: HandleKind, ptr: *mut c_void) {
        self.destroyed.borrow_mut().push((kind, ptr as usize));
    }
}

/// Bytes of a host buffer, or `None` for anything else.
pub fn bytes(value: &duckdb_marshal::HostValue) -> Option<&[u8]> {
    value.as_buffer().map(|b| b.as_bytes())
}
