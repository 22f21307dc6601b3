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

//! The seam between the marshalling core and the engine.

use std::os::raw::c_void;

use crate::ffi;
use crate::handle::HandleKind;

/// The engine entry points the core calls directly.
///
/// `ffi::NativeLibrary` (feature `native`) forwards to `libduckdb`; tests and
/// embedders can supply their own.
pub trait NativeApi {
    /// Type id of the vector's column type.
    ///
    /// # Safety
    /// `vector` must be a live vector handle.
    unsafe fn vector_column_type(&self, vector: ffi::duckdb_vector) -> ffi::duckdb_type;

    /// Start of the vector's slot array.
    ///
    /// # Safety
    /// `vector` must be a live vector handle.
    unsafe fn vector_data(&self, vector: ffi::duckdb_vector) -> *mut c_void;

    /// The vector's validity words, or null when every row is valid.
    ///
    /// # Safety
    /// `vector` must be a live vector handle.
    unsafe fn vector_validity(&self, vector: ffi::duckdb_vector) -> *mut u64;

    /// Number of row slots every vector holds.
    fn vector_capacity(&self) -> ffi::idx_t;

    /// Release the resource `ptr` names. Only called for kinds where
    /// [`HandleKind::is_destroyable`] holds.
    ///
    /// # Safety
    /// `ptr` must be a live, non-null resource of type `kind`.
    unsafe fn destroy(&self, kind: HandleKind, ptr: *mut c_void);
}
