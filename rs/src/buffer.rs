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

//! Host byte buffers over native memory.
//!
//! A buffer either owns a copy of the bytes or aliases the engine's memory.
//! The choice is one [`BufferPolicy`] per process, injected into the
//! [`Materializer`]; individual calls never pick.

use std::fmt;
use std::ptr::NonNull;
use std::str::FromStr;

use crate::error::Error;
use crate::value::HostValue;

/// How the materializer turns native memory into host buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferPolicy {
    /// Copy into host-owned storage. Always safe to retain.
    Copy,
    /// Alias the native memory. Valid only while that memory is, typically
    /// until the owning result or chunk is destroyed.
    Reference,
}

impl BufferPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            BufferPolicy::Copy => "copy",
            BufferPolicy::Reference => "reference",
        }
    }
}

impl fmt::Display for BufferPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BufferPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "copy" => Ok(BufferPolicy::Copy),
            "reference" | "ref" => Ok(BufferPolicy::Reference),
            _ => Err(Error::InvalidConfig {
                key: "buffer policy",
                value: s.to_string(),
            }),
        }
    }
}

/// Native bytes aliased without ownership.
#[derive(Clone, Copy)]
pub struct ExternalBytes {
    ptr: NonNull<u8>,
    len: usize,
}

/// A host byte buffer.
#[derive(Clone)]
pub enum ByteBuffer {
    Copied(Vec<u8>),
    Referenced(ExternalBytes),
}

impl ByteBuffer {
    /// Copy `bytes` into a host-owned buffer.
    pub fn copy_from(bytes: &[u8]) -> Self {
        ByteBuffer::Copied(bytes.to_vec())
    }

    /// Alias `len` bytes at `ptr`.
    ///
    /// # Safety
    /// `[ptr, ptr + len)` must be readable and unmodified for as long as the
    /// returned buffer, or any clone of it, is used.
    pub unsafe fn reference(ptr: NonNull<u8>, len: usize) -> Self {
        ByteBuffer::Referenced(ExternalBytes { ptr, len })
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ByteBuffer::Copied(v) => v,
            // SAFETY: guaranteed by the contract of `ByteBuffer::reference`.
            ByteBuffer::Referenced(ext) => unsafe {
                std::slice::from_raw_parts(ext.ptr.as_ptr(), ext.len)
            },
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ByteBuffer::Copied(v) => v.len(),
            ByteBuffer::Referenced(ext) => ext.len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if the buffer aliases native memory.
    pub fn is_referenced(&self) -> bool {
        matches!(self, ByteBuffer::Referenced(_))
    }

    /// Detach from native memory, copying if needed.
    pub fn into_vec(self) -> Vec<u8> {
        match self {
            ByteBuffer::Copied(v) => v,
            ByteBuffer::Referenced(_) => self.as_bytes().to_vec(),
        }
    }
}

impl AsRef<[u8]> for ByteBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl PartialEq for ByteBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl fmt::Debug for ByteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_referenced() {
            "Referenced"
        } else {
            "Copied"
        };
        f.debug_struct(kind).field("len", &self.len()).finish()
    }
}

/// Produces host buffers from native pointers under a fixed policy.
#[derive(Debug, Clone, Copy)]
pub struct Materializer {
    policy: BufferPolicy,
}

impl Materializer {
    pub fn new(policy: BufferPolicy) -> Self {
        tracing::debug!(policy = policy.as_str(), "buffer materializer ready");
        Materializer { policy }
    }

    pub fn policy(&self) -> BufferPolicy {
        self.policy
    }

    /// `None` for a null pointer, otherwise a buffer of exactly `len` bytes.
    ///
    /// # Safety
    /// A non-null `ptr` must be valid for reads of `len` bytes. Under
    /// [`BufferPolicy::Reference`] it must stay valid for as long as the
    /// buffer is used.
    pub unsafe fn materialize_buffer(&self, ptr: *const u8, len: usize) -> Option<ByteBuffer> {
        let ptr = NonNull::new(ptr as *mut u8)?;
        Some(match self.policy {
            BufferPolicy::Copy => {
                let bytes = unsafe { std::slice::from_raw_parts(ptr.as_ptr(), len) };
                ByteBuffer::copy_from(bytes)
            }
            BufferPolicy::Reference => unsafe { ByteBuffer::reference(ptr, len) },
        })
    }

    /// Host value for `len` bytes at `ptr`: `Null` for a null pointer (no
    /// data), a possibly empty buffer otherwise.
    ///
    /// # Safety
    /// Same as [`Materializer::materialize_buffer`].
    pub unsafe fn materialize(&self, ptr: *const u8, len: usize) -> HostValue {
        match unsafe { self.materialize_buffer(ptr, len) } {
            Some(buf) => HostValue::Buffer(buf),
            None => HostValue::Null,
        }
    }
}
