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

use crate::handle::HandleKind;

/// Errors reported back to the host caller. None of them are fatal: a bad
/// call fails, the process carries on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A host value does not fit the native argument type.
    #[error("argument {index}: expected {expected}, got {found}")]
    TypeMismatch {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },
    /// A pointer the calling convention requires to be non-null was null.
    #[error("null {what} where a non-null pointer is required")]
    NullPointer { what: &'static str },
    #[error("row count {row_count} exceeds vector capacity {capacity}")]
    RowCountOutOfBounds { row_count: u64, capacity: u64 },
    #[error("{0} handles have no standalone destroy call")]
    NotDestroyable(HandleKind),
    #[error("unknown function `{0}`")]
    UnknownFunction(String),
    #[error("invalid value for {key}: `{value}`")]
    InvalidConfig { key: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, Error>;
