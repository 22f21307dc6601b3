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

//! duckdb-marshal: value, handle and buffer marshalling between the DuckDB C
//! API and a dynamically typed host runtime.
//!
//! The crate is the core under a generated binding surface: it converts host
//! arguments into native primitives ([`convert`]), wraps engine pointers into
//! tagged handles ([`handle`]), turns native memory into host buffers
//! ([`buffer`]) and pulls string/blob columns out of vectors ([`vector`]).
//! Everything runs synchronously on the calling thread.

#![deny(unsafe_op_in_unsafe_fn)]

pub mod api;
pub mod buffer;
pub mod config;
pub mod convert;
pub mod error;
pub mod exports;
pub mod ffi;
pub mod handle;
pub mod value;
pub mod vector;

pub use api::NativeApi;
pub use buffer::{BufferPolicy, ByteBuffer, Materializer};
pub use config::MarshalConfig;
pub use convert::{decode, encode, encode_c_str, FromHost, ToHost};
pub use error::{Error, Result};
pub use exports::{CallInfo, Exports, NativeFn};
pub use handle::{
    destroy_handle, unwrap, unwrap_required, wrap, HandleKind, OpaqueHandle, OutStringSlot,
};
pub use value::{BigInt, HostValue};
pub use vector::{decode_slot, extract_strings, row_is_valid, StringSlot, Validity};

#[cfg(feature = "native")]
pub use ffi::NativeLibrary;
