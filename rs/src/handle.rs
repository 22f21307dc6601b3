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

//! Opaque handles around engine-owned pointers.
//!
//! A handle gives the host identity and safe pass-through, nothing more. The
//! engine keeps ownership of the resource: dropping a handle frees nothing,
//! and the resource goes away only through [`destroy_handle`]. Passing a
//! handle back after its resource was destroyed is a caller error this layer
//! cannot detect.

use std::cell::Cell;
use std::fmt;
use std::os::raw::{c_char, c_void};
use std::ptr::{self, NonNull};
use std::rc::Rc;

use crate::api::NativeApi;
use crate::error::{Error, Result};
use crate::value::HostValue;

/// Which native resource a handle names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    Database,
    Connection,
    PreparedStatement,
    Result,
    DataChunk,
    Vector,
    LogicalType,
    Value,
    Appender,
    Config,
    /// Untyped `void*`, e.g. the data pointer of a vector.
    Pointer,
}

impl HandleKind {
    pub fn name(self) -> &'static str {
        match self {
            HandleKind::Database => "database",
            HandleKind::Connection => "connection",
            HandleKind::PreparedStatement => "prepared statement",
            HandleKind::Result => "result",
            HandleKind::DataChunk => "data chunk",
            HandleKind::Vector => "vector",
            HandleKind::LogicalType => "logical type",
            HandleKind::Value => "value",
            HandleKind::Appender => "appender",
            HandleKind::Config => "config",
            HandleKind::Pointer => "pointer",
        }
    }

    /// False for resources owned by another resource (vectors belong to
    /// their chunk) and for untyped pointers.
    pub fn is_destroyable(self) -> bool {
        !matches!(self, HandleKind::Vector | HandleKind::Pointer)
    }
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A non-null engine pointer tagged with its resource kind.
///
/// Equality is identity: same address, same kind. The address is not part of
/// the `Debug` output.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpaqueHandle {
    addr: NonNull<c_void>,
    kind: HandleKind,
}

impl OpaqueHandle {
    /// `None` for a null pointer: there is no handle to nothing.
    pub fn new(ptr: *mut c_void, kind: HandleKind) -> Option<Self> {
        NonNull::new(ptr).map(|addr| OpaqueHandle { addr, kind })
    }

    pub fn kind(&self) -> HandleKind {
        self.kind
    }

    /// Recover the pointer, provided the handle names an `expected` resource.
    pub fn unwrap(&self, expected: HandleKind, index: usize) -> Result<NonNull<c_void>> {
        if self.kind != expected {
            return Err(Error::TypeMismatch {
                index,
                expected: expected.name(),
                found: self.kind.name(),
            });
        }
        Ok(self.addr)
    }

    /// The pointer regardless of kind, for untyped `void*` parameters.
    pub(crate) fn as_ptr(&self) -> *mut c_void {
        self.addr.as_ptr()
    }
}

impl fmt::Debug for OpaqueHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OpaqueHandle").field(&self.kind).finish()
    }
}

/// Wrap an engine pointer for the host. A null pointer becomes `Null`.
pub fn wrap(ptr: *mut c_void, kind: HandleKind) -> HostValue {
    match OpaqueHandle::new(ptr, kind) {
        Some(handle) => HostValue::External(handle),
        None => HostValue::Null,
    }
}

/// Unwrap argument `index` as an `expected` handle. `Null`/`Undefined` mean
/// "no handle" and yield a null pointer.
pub fn unwrap(value: &HostValue, expected: HandleKind, index: usize) -> Result<*mut c_void> {
    match value {
        HostValue::Null | HostValue::Undefined => Ok(ptr::null_mut()),
        HostValue::External(handle) => handle.unwrap(expected, index).map(NonNull::as_ptr),
        other => Err(Error::TypeMismatch {
            index,
            expected: expected.name(),
            found: other.type_name(),
        }),
    }
}

/// Like [`unwrap`], for parameters where null is a precondition violation.
pub fn unwrap_required(
    value: &HostValue,
    expected: HandleKind,
    index: usize,
) -> Result<NonNull<c_void>> {
    NonNull::new(unwrap(value, expected, index)?).ok_or(Error::NullPointer {
        what: expected.name(),
    })
}

/// Tear down the resource behind `value` through the engine.
///
/// `Null` is a no-op. The handle value itself stays as it was; the host must
/// not pass it to the engine again.
///
/// # Safety
/// The resource must still be alive and must not be reachable through
/// another live owner that will destroy it again.
pub unsafe fn destroy_handle<A: NativeApi + ?Sized>(
    api: &A,
    value: &HostValue,
    kind: HandleKind,
) -> Result<()> {
    if !kind.is_destroyable() {
        return Err(Error::NotDestroyable(kind));
    }
    let ptr = unwrap(value, kind, 0)?;
    if ptr.is_null() {
        return Ok(());
    }
    tracing::debug!(kind = kind.name(), "destroying native resource");
    unsafe { api.destroy(kind, ptr) };
    Ok(())
}

// ---------------------------------------------------------------------------
// OutStringSlot: host-owned `char*` cell for `char**` out-parameters
// ---------------------------------------------------------------------------

/// A host-owned cell the engine writes a `const char*` into.
///
/// Unlike [`OpaqueHandle`] the host owns this memory: the cell lives as long
/// as any clone of the slot. The string the engine stores is not freed here.
#[derive(Clone)]
pub struct OutStringSlot {
    cell: Rc<Cell<*const c_char>>,
}

impl OutStringSlot {
    pub fn new() -> Self {
        OutStringSlot {
            cell: Rc::new(Cell::new(ptr::null())),
        }
    }

    /// The `char**` to hand to the engine. Stable for the slot's lifetime.
    pub fn as_out_ptr(&self) -> *mut *const c_char {
        self.cell.as_ptr()
    }

    /// Current content of the cell.
    pub fn get(&self) -> *const c_char {
        self.cell.get()
    }
}

impl Default for OutStringSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for OutStringSlot {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

impl fmt::Debug for OutStringSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutStringSlot")
            .field("set", &!self.cell.get().is_null())
            .finish()
    }
}
