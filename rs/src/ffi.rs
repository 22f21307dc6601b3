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

// Raw FFI bindings to the DuckDB C API
// Hand-written from duckdb.h (only what the marshalling layer touches)
#![allow(non_camel_case_types, non_upper_case_globals, dead_code)]

use std::os::raw::{c_char, c_void};

#[cfg(feature = "native")]
use crate::handle::HandleKind;
#[cfg(feature = "native")]
use crate::api::NativeApi;

// ===== Scalar Types =====

pub type idx_t = u64;
pub type duckdb_type = u32;

// ===== Type Ids =====

pub const DUCKDB_TYPE_INVALID: duckdb_type = 0;
pub const DUCKDB_TYPE_BOOLEAN: duckdb_type = 1;
pub const DUCKDB_TYPE_TINYINT: duckdb_type = 2;
pub const DUCKDB_TYPE_SMALLINT: duckdb_type = 3;
pub const DUCKDB_TYPE_INTEGER: duckdb_type = 4;
pub const DUCKDB_TYPE_BIGINT: duckdb_type = 5;
pub const DUCKDB_TYPE_UTINYINT: duckdb_type = 6;
pub const DUCKDB_TYPE_USMALLINT: duckdb_type = 7;
pub const DUCKDB_TYPE_UINTEGER: duckdb_type = 8;
pub const DUCKDB_TYPE_UBIGINT: duckdb_type = 9;
pub const DUCKDB_TYPE_FLOAT: duckdb_type = 10;
pub const DUCKDB_TYPE_DOUBLE: duckdb_type = 11;
pub const DUCKDB_TYPE_TIMESTAMP: duckdb_type = 12;
pub const DUCKDB_TYPE_DATE: duckdb_type = 13;
pub const DUCKDB_TYPE_TIME: duckdb_type = 14;
pub const DUCKDB_TYPE_INTERVAL: duckdb_type = 15;
pub const DUCKDB_TYPE_HUGEINT: duckdb_type = 16;
pub const DUCKDB_TYPE_VARCHAR: duckdb_type = 17;
pub const DUCKDB_TYPE_BLOB: duckdb_type = 18;
pub const DUCKDB_TYPE_DECIMAL: duckdb_type = 19;
pub const DUCKDB_TYPE_TIMESTAMP_S: duckdb_type = 20;
pub const DUCKDB_TYPE_TIMESTAMP_MS: duckdb_type = 21;
pub const DUCKDB_TYPE_TIMESTAMP_NS: duckdb_type = 22;
pub const DUCKDB_TYPE_ENUM: duckdb_type = 23;
pub const DUCKDB_TYPE_LIST: duckdb_type = 24;
pub const DUCKDB_TYPE_STRUCT: duckdb_type = 25;
pub const DUCKDB_TYPE_MAP: duckdb_type = 26;
pub const DUCKDB_TYPE_UUID: duckdb_type = 27;
pub const DUCKDB_TYPE_UNION: duckdb_type = 28;
pub const DUCKDB_TYPE_BIT: duckdb_type = 29;
pub const DUCKDB_TYPE_TIME_TZ: duckdb_type = 30;
pub const DUCKDB_TYPE_TIMESTAMP_TZ: duckdb_type = 31;
pub const DUCKDB_TYPE_UHUGEINT: duckdb_type = 32;
pub const DUCKDB_TYPE_ARRAY: duckdb_type = 33;
pub const DUCKDB_TYPE_ANY: duckdb_type = 34;
pub const DUCKDB_TYPE_VARINT: duckdb_type = 35;
pub const DUCKDB_TYPE_SQLNULL: duckdb_type = 36;

/// Name of a type id as it appears in SQL, for diagnostics.
pub fn type_name(t: duckdb_type) -> &'static str {
    match t {
        DUCKDB_TYPE_BOOLEAN => "BOOLEAN",
        DUCKDB_TYPE_TINYINT => "TINYINT",
        DUCKDB_TYPE_SMALLINT => "SMALLINT",
        DUCKDB_TYPE_INTEGER => "INTEGER",
        DUCKDB_TYPE_BIGINT => "BIGINT",
        DUCKDB_TYPE_UTINYINT => "UTINYINT",
        DUCKDB_TYPE_USMALLINT => "USMALLINT",
        DUCKDB_TYPE_UINTEGER => "UINTEGER",
        DUCKDB_TYPE_UBIGINT => "UBIGINT",
        DUCKDB_TYPE_FLOAT => "FLOAT",
        DUCKDB_TYPE_DOUBLE => "DOUBLE",
        DUCKDB_TYPE_TIMESTAMP => "TIMESTAMP",
        DUCKDB_TYPE_DATE => "DATE",
        DUCKDB_TYPE_TIME => "TIME",
        DUCKDB_TYPE_INTERVAL => "INTERVAL",
        DUCKDB_TYPE_HUGEINT => "HUGEINT",
        DUCKDB_TYPE_VARCHAR => "VARCHAR",
        DUCKDB_TYPE_BLOB => "BLOB",
        DUCKDB_TYPE_DECIMAL => "DECIMAL",
        DUCKDB_TYPE_TIMESTAMP_S => "TIMESTAMP_S",
        DUCKDB_TYPE_TIMESTAMP_MS => "TIMESTAMP_MS",
        DUCKDB_TYPE_TIMESTAMP_NS => "TIMESTAMP_NS",
        DUCKDB_TYPE_ENUM => "ENUM",
        DUCKDB_TYPE_LIST => "LIST",
        DUCKDB_TYPE_STRUCT => "STRUCT",
        DUCKDB_TYPE_MAP => "MAP",
        DUCKDB_TYPE_UUID => "UUID",
        DUCKDB_TYPE_UNION => "UNION",
        DUCKDB_TYPE_BIT => "BIT",
        DUCKDB_TYPE_TIME_TZ => "TIME WITH TIME ZONE",
        DUCKDB_TYPE_TIMESTAMP_TZ => "TIMESTAMP WITH TIME ZONE",
        DUCKDB_TYPE_UHUGEINT => "UHUGEINT",
        DUCKDB_TYPE_ARRAY => "ARRAY",
        DUCKDB_TYPE_ANY => "ANY",
        DUCKDB_TYPE_VARINT => "VARINT",
        DUCKDB_TYPE_SQLNULL => "NULL",
        _ => "INVALID",
    }
}

/// True for the column types whose slots are `duckdb_string_t`.
#[inline]
pub fn is_string_like(t: duckdb_type) -> bool {
    t == DUCKDB_TYPE_VARCHAR || t == DUCKDB_TYPE_BLOB
}

// ===== Opaque Handles =====
//
// Each handle is a pointer to a one-field struct owned by the engine. Rust
// never looks inside; the distinct pointee types keep handles from being
// mixed up at compile time.

#[repr(C)]
pub struct _duckdb_database {
    internal_ptr: *mut c_void,
}

#[repr(C)]
pub struct _duckdb_connection {
    internal_ptr: *mut c_void,
}

#[repr(C)]
pub struct _duckdb_prepared_statement {
    internal_ptr: *mut c_void,
}

#[repr(C)]
pub struct _duckdb_data_chunk {
    internal_ptr: *mut c_void,
}

#[repr(C)]
pub struct _duckdb_vector {
    internal_ptr: *mut c_void,
}

#[repr(C)]
pub struct _duckdb_logical_type {
    internal_ptr: *mut c_void,
}

#[repr(C)]
pub struct _duckdb_value {
    internal_ptr: *mut c_void,
}

#[repr(C)]
pub struct _duckdb_appender {
    internal_ptr: *mut c_void,
}

#[repr(C)]
pub struct _duckdb_config {
    internal_ptr: *mut c_void,
}

/// Only ever handled through a pointer owned by the binding surface.
#[repr(C)]
pub struct duckdb_result {
    _opaque: [u8; 0],
}

pub type duckdb_database = *mut _duckdb_database;
pub type duckdb_connection = *mut _duckdb_connection;
pub type duckdb_prepared_statement = *mut _duckdb_prepared_statement;
pub type duckdb_data_chunk = *mut _duckdb_data_chunk;
pub type duckdb_vector = *mut _duckdb_vector;
pub type duckdb_logical_type = *mut _duckdb_logical_type;
pub type duckdb_value = *mut _duckdb_value;
pub type duckdb_appender = *mut _duckdb_appender;
pub type duckdb_config = *mut _duckdb_config;

// ===== Wide Integers =====

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct duckdb_hugeint {
    pub lower: u64,
    pub upper: i64,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct duckdb_uhugeint {
    pub lower: u64,
    pub upper: u64,
}

// ===== String Slot: duckdb_string_t (16 bytes) =====

/// Strings up to this many bytes live inside the slot itself.
pub const DUCKDB_STRING_INLINE_LENGTH: u32 = 12;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct duckdb_string_pointer {
    pub length: u32,
    pub prefix: [c_char; 4],
    pub ptr: *mut c_char,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct duckdb_string_inlined {
    pub length: u32,
    pub inlined: [c_char; 12],
}

/// Both variants start with the `u32` length, which selects the variant.
#[repr(C)]
#[derive(Copy, Clone)]
pub union duckdb_string_value {
    pub pointer: duckdb_string_pointer,
    pub inlined: duckdb_string_inlined,
}

#[repr(C)]
#[derive(Copy, Clone)]
pub struct duckdb_string_t {
    pub value: duckdb_string_value,
}

impl duckdb_string_t {
    /// Length shared by both layouts.
    #[inline]
    pub fn length(&self) -> u32 {
        // SAFETY: `length` is the first field of both union variants, and any
        // bit pattern is a valid u32.
        unsafe { self.value.inlined.length }
    }

    /// Equivalent to `duckdb_string_is_inlined`.
    #[inline]
    pub fn is_inlined(&self) -> bool {
        self.length() <= DUCKDB_STRING_INLINE_LENGTH
    }
}

// ===== Validity =====

/// Rows per validity word.
pub const VALIDITY_BITS_PER_ENTRY: usize = 64;

// ===== Native Library =====

#[cfg(feature = "native")]
extern "C" {
    // --- Vector API ---
    pub fn duckdb_vector_size() -> idx_t;
    pub fn duckdb_vector_get_column_type(vector: duckdb_vector) -> duckdb_logical_type;
    pub fn duckdb_vector_get_data(vector: duckdb_vector) -> *mut c_void;
    pub fn duckdb_vector_get_validity(vector: duckdb_vector) -> *mut u64;

    // --- Logical Type API ---
    pub fn duckdb_get_type_id(ty: duckdb_logical_type) -> duckdb_type;

    // --- Destroy API ---
    pub fn duckdb_close(database: *mut duckdb_database);
    pub fn duckdb_disconnect(connection: *mut duckdb_connection);
    pub fn duckdb_destroy_prepare(prepared: *mut duckdb_prepared_statement);
    pub fn duckdb_destroy_result(result: *mut duckdb_result);
    pub fn duckdb_destroy_data_chunk(chunk: *mut duckdb_data_chunk);
    pub fn duckdb_destroy_logical_type(ty: *mut duckdb_logical_type);
    pub fn duckdb_destroy_value(value: *mut duckdb_value);
    pub fn duckdb_appender_destroy(appender: *mut duckdb_appender) -> u32;
    pub fn duckdb_destroy_config(config: *mut duckdb_config);
}

/// `NativeApi` backed by the linked `libduckdb`.
#[cfg(feature = "native")]
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeLibrary;

#[cfg(feature = "native")]
impl NativeApi for NativeLibrary {
    unsafe fn vector_column_type(&self, vector: duckdb_vector) -> duckdb_type {
        let mut ty = unsafe { duckdb_vector_get_column_type(vector) };
        if ty.is_null() {
            return DUCKDB_TYPE_INVALID;
        }
        let id = unsafe { duckdb_get_type_id(ty) };
        // The logical type is a fresh copy owned by the caller.
        unsafe { duckdb_destroy_logical_type(&mut ty) };
        id
    }

    unsafe fn vector_data(&self, vector: duckdb_vector) -> *mut c_void {
        unsafe { duckdb_vector_get_data(vector) }
    }

    unsafe fn vector_validity(&self, vector: duckdb_vector) -> *mut u64 {
        unsafe { duckdb_vector_get_validity(vector) }
    }

    fn vector_capacity(&self) -> idx_t {
        unsafe { duckdb_vector_size() }
    }

    unsafe fn destroy(&self, kind: HandleKind, ptr: *mut c_void) {
        // Destroy calls take a pointer to the handle and null it out. A result
        // handle already is that pointer.
        unsafe {
            match kind {
                HandleKind::Database => duckdb_close(&mut (ptr as duckdb_database)),
                HandleKind::Connection => duckdb_disconnect(&mut (ptr as duckdb_connection)),
                HandleKind::PreparedStatement => {
                    duckdb_destroy_prepare(&mut (ptr as duckdb_prepared_statement))
                }
                HandleKind::Result => duckdb_destroy_result(ptr as *mut duckdb_result),
                HandleKind::DataChunk => duckdb_destroy_data_chunk(&mut (ptr as duckdb_data_chunk)),
                HandleKind::LogicalType => {
                    duckdb_destroy_logical_type(&mut (ptr as duckdb_logical_type))
                }
                HandleKind::Value => duckdb_destroy_value(&mut (ptr as duckdb_value)),
                HandleKind::Appender => {
                    duckdb_appender_destroy(&mut (ptr as duckdb_appender));
                }
                HandleKind::Config => duckdb_destroy_config(&mut (ptr as duckdb_config)),
                HandleKind::Vector | HandleKind::Pointer => {}
            }
        }
    }
}

// ===== Compile-time layout assertions =====

const _: () = {
    assert!(std::mem::size_of::<duckdb_string_t>() == 16);
    assert!(std::mem::size_of::<duckdb_hugeint>() == 16);
    assert!(std::mem::size_of::<duckdb_uhugeint>() == 16);
};
