// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Defines data structures related to GPU buffer resources.

use super::{BindFlags, BufferSubType, CpuAccess, Usage};
use std::borrow::Cow;

/// A descriptor used to create a [`Buffer`](crate::renderer::rhi::Buffer).
#[derive(Debug, Clone, Default)]
pub struct BufferDesc<'a> {
    /// An optional debug label for the buffer.
    pub label: Option<Cow<'a, str>>,
    /// The size of one element in bytes. This is the stride of structured buffers.
    pub element_size: u32,
    /// The number of elements.
    pub element_count: u32,
    /// How the buffer will be read and written.
    pub usage: Usage,
    /// A bitmask of [`BindFlags`] describing how the buffer will be attached.
    pub bind_flags: BindFlags,
    /// The CPU access the buffer is created with.
    pub cpu_access: CpuAccess,
    /// What the buffer holds when viewed. Required for viewable bind flags.
    pub sub_type: BufferSubType,
    /// Data the buffer is initialized with. Must be `size_in_bytes()` long when present.
    pub initial_data: Option<&'a [u8]>,
}

impl BufferDesc<'_> {
    /// Returns the total size of the buffer in bytes.
    pub const fn size_in_bytes(&self) -> u64 {
        self.element_size as u64 * self.element_count as u64
    }

    /// Returns a copy that owns its label and drops the initial data.
    pub fn to_static(&self) -> BufferDesc<'static> {
        BufferDesc {
            label: self.label.as_ref().map(|l| Cow::Owned(l.to_string())),
            element_size: self.element_size,
            element_count: self.element_count,
            usage: self.usage,
            bind_flags: self.bind_flags,
            cpu_access: self.cpu_access,
            sub_type: self.sub_type,
            initial_data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_static_drops_initial_data() {
        let data = [0u8; 64];
        let desc = BufferDesc {
            label: Some(Cow::Borrowed("vertices")),
            element_size: 16,
            element_count: 4,
            bind_flags: BindFlags::VERTEX_BUFFER,
            initial_data: Some(&data),
            ..Default::default()
        };
        assert_eq!(desc.size_in_bytes(), 64);

        let owned = desc.to_static();
        assert_eq!(owned.label.as_deref(), Some("vertices"));
        assert!(owned.initial_data.is_none());
        assert_eq!(owned.size_in_bytes(), 64);
    }
}
