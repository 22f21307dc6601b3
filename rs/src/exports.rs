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

//! The native call site and the functions this crate exports to the host.
//!
//! A host call arrives as a function name plus arguments. Each exported
//! function decodes its arguments through the type converter, does its work
//! and encodes the result. The generated per-function bindings register
//! themselves into the same table.

use std::collections::BTreeMap;
use std::os::raw::{c_char, c_void};

use crate::api::NativeApi;
use crate::buffer::Materializer;
use crate::config::MarshalConfig;
use crate::convert::{self, encode_c_str, FromHost, ToHost};
use crate::error::{Error, Result};
use crate::ffi;
use crate::handle::OutStringSlot;
use crate::value::HostValue;
use crate::vector::extract_strings;

/// Arguments of one host call.
#[derive(Debug, Clone, Default)]
pub struct CallInfo {
    args: Vec<HostValue>,
}

impl CallInfo {
    pub fn new(args: Vec<HostValue>) -> Self {
        CallInfo { args }
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn args(&self) -> &[HostValue] {
        &self.args
    }

    /// Decode argument `index` as `T`.
    pub fn arg<T: FromHost>(&self, index: usize) -> Result<T> {
        convert::decode(&self.args, index)
    }
}

/// An exported function.
pub type NativeFn<A> = fn(&Exports<A>, &CallInfo) -> Result<HostValue>;

/// The host-visible function table, bound to one engine API and one buffer
/// policy for the life of the process.
pub struct Exports<A> {
    api: A,
    materializer: Materializer,
    functions: BTreeMap<&'static str, NativeFn<A>>,
}

impl<A: NativeApi> Exports<A> {
    /// Build the table with the built-in functions installed.
    pub fn new(api: A, config: MarshalConfig) -> Self {
        let mut exports = Exports {
            api,
            materializer: Materializer::new(config.effective_policy()),
            functions: BTreeMap::new(),
        };
        exports.register("copy_buffer", copy_buffer::<A>);
        exports.register("out_string_wrapper", out_string_wrapper::<A>);
        exports.register("out_get_string", out_get_string::<A>);
        exports.register("convert_string_vector", convert_string_vector::<A>);
        exports
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn materializer(&self) -> &Materializer {
        &self.materializer
    }

    /// Install `f` under `name`, returning the function it replaced.
    pub fn register(&mut self, name: &'static str, f: NativeFn<A>) -> Option<NativeFn<A>> {
        self.functions.insert(name, f)
    }

    /// Exported names, sorted.
    pub fn functions(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.functions.keys().copied()
    }

    /// Invoke `name` with `args`.
    pub fn call(&self, name: &str, args: Vec<HostValue>) -> Result<HostValue> {
        let f = self
            .functions
            .get(name)
            .ok_or_else(|| Error::UnknownFunction(name.to_string()))?;
        tracing::trace!(function = name, argc = args.len(), "native call");
        f(self, &CallInfo::new(args))
    }
}

/// `copy_buffer(pointer, length)`: host buffer over `length` bytes at
/// `pointer`, or `Null` for a null pointer.
fn copy_buffer<A: NativeApi>(exports: &Exports<A>, info: &CallInfo) -> Result<HostValue> {
    let ptr: *mut c_void = info.arg(0)?;
    if ptr.is_null() {
        return Ok(HostValue::Null);
    }
    let len: ffi::idx_t = info.arg(1)?;
    let len = usize::try_from(len).map_err(|_| Error::TypeMismatch {
        index: 1,
        expected: "size_t",
        found: "out-of-range bigint",
    })?;
    // SAFETY: pointer and length come from the engine as a pair describing
    // one live allocation; the ABI contract guarantees the range.
    Ok(unsafe { exports.materializer.materialize(ptr as *const u8, len) })
}

/// `out_string_wrapper()`: a fresh slot for `char**` out-parameters.
fn out_string_wrapper<A: NativeApi>(_: &Exports<A>, _: &CallInfo) -> Result<HostValue> {
    Ok(OutStringSlot::new().to_host())
}

/// `out_get_string(slot)`: the string the engine stored in `slot`, or
/// `Null` if it stored nothing or there is no slot.
fn out_get_string<A: NativeApi>(_: &Exports<A>, info: &CallInfo) -> Result<HostValue> {
    let pp: *mut *const c_char = info.arg(0)?;
    if pp.is_null() {
        return Ok(HostValue::Null);
    }
    // SAFETY: a non-null `char**` only decodes from a live slot, and the
    // engine only stores NUL-terminated strings in it.
    Ok(unsafe { encode_c_str(*pp) })
}

/// `convert_string_vector(vector, row_count)`: see [`extract_strings`].
fn convert_string_vector<A: NativeApi>(exports: &Exports<A>, info: &CallInfo) -> Result<HostValue> {
    let vector: ffi::duckdb_vector = info.arg(0)?;
    let row_count: ffi::idx_t = info.arg(1)?;
    // SAFETY: vector handles are only issued for live engine vectors; the
    // caller keeps the owning chunk alive while it uses the result.
    unsafe { extract_strings(&exports.api, vector, row_count, &exports.materializer) }
}
