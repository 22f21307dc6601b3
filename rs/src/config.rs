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

//! Process-wide marshalling configuration.

use crate::buffer::BufferPolicy;
use crate::error::{Error, Result};

/// Environment variable selecting the buffer policy (`copy` or `reference`).
pub const BUFFER_POLICY_ENV: &str = "DUCKDB_MARSHAL_BUFFERS";

/// True when the host forbids buffers that alias foreign memory. Fixed at
/// build time through the `no-external-buffers` feature.
pub const EXTERNAL_BUFFERS_ALLOWED: bool = !cfg!(feature = "no-external-buffers");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarshalConfig {
    pub buffer_policy: BufferPolicy,
}

impl Default for MarshalConfig {
    fn default() -> Self {
        let buffer_policy = if EXTERNAL_BUFFERS_ALLOWED {
            BufferPolicy::Reference
        } else {
            BufferPolicy::Copy
        };
        MarshalConfig { buffer_policy }
    }
}

impl MarshalConfig {
    /// Defaults, overridden by `DUCKDB_MARSHAL_BUFFERS` when it is set.
    pub fn from_env() -> Result<Self> {
        let mut config = MarshalConfig::default();
        if let Ok(raw) = std::env::var(BUFFER_POLICY_ENV) {
            config.buffer_policy = raw.parse().map_err(|_| Error::InvalidConfig {
                key: BUFFER_POLICY_ENV,
                value: raw.clone(),
            })?;
        }
        Ok(config)
    }

    /// The policy actually used: reference mode is downgraded to copy mode
    /// when the build does not allow external buffers.
    pub fn effective_policy(&self) -> BufferPolicy {
        match self.buffer_policy {
            BufferPolicy::Reference if !EXTERNAL_BUFFERS_ALLOWED => {
                tracing::warn!(
                    "reference buffers requested but this build forbids external buffers; copying"
                );
                BufferPolicy::Copy
            }
            policy => policy,
        }
    }
}
