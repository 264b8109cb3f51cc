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

use super::{DeviceObject, DeviceShared, ObjectHeader};
use crate::renderer::api::*;
use crate::renderer::error::ResourceError;
use std::sync::Arc;

/// A linear GPU allocation: vertex, index, constant or viewable data.
#[derive(Debug)]
pub struct Buffer {
    header: ObjectHeader,
    desc: BufferDesc<'static>,
    handle: NativeHandle,
}

impl Buffer {
    pub(crate) fn create(shared: &Arc<DeviceShared>, desc: &BufferDesc<'_>) -> Result<Self, ResourceError> {
        validate_buffer_desc(desc)?;
        let handle = shared.backend.create_buffer(desc)?;
        Ok(Self {
            header: ObjectHeader::new(
                DeviceObjectType::Buffer,
                desc.label.as_ref().map(|l| l.to_string()),
                shared,
            ),
            desc: desc.to_static(),
            handle,
        })
    }

    /// Returns the descriptor the buffer was created with, without its initial data.
    pub fn desc(&self) -> &BufferDesc<'static> {
        &self.desc
    }

    /// Returns the native buffer.
    pub fn native_handle(&self) -> NativeHandle {
        self.handle
    }

    /// Returns the size of one element in bytes.
    pub fn element_size(&self) -> u32 {
        self.desc.element_size
    }

    /// Returns the number of elements.
    pub fn element_count(&self) -> u32 {
        self.desc.element_count
    }

    /// Returns the total size in bytes.
    pub fn size_in_bytes(&self) -> u64 {
        self.desc.size_in_bytes()
    }

    /// Returns the bind flags.
    pub fn bind_flags(&self) -> BindFlags {
        self.desc.bind_flags
    }

    /// Returns the buffer sub-type.
    pub fn sub_type(&self) -> BufferSubType {
        self.desc.sub_type
    }

    /// Returns the usage.
    pub fn usage(&self) -> Usage {
        self.desc.usage
    }

    /// Returns the CPU access.
    pub fn cpu_access(&self) -> CpuAccess {
        self.desc.cpu_access
    }
}

impl DeviceObject for Buffer {
    fn header(&self) -> &ObjectHeader {
        &self.header
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        self.header.release(self.handle);
    }
}

/// Checks a buffer descriptor against the creation rules.
pub fn validate_buffer_desc(desc: &BufferDesc<'_>) -> Result<(), ResourceError> {
    let invalid = |reason: String| Err(ResourceError::invalid(DeviceObjectType::Buffer, reason));

    if desc.bind_flags.is_empty() {
        return invalid("bind flags must not be empty".to_string());
    }
    if desc.bind_flags.contains(BindFlags::DEPTH_STENCIL) {
        return invalid("buffers cannot be bound as depth-stencil".to_string());
    }
    if desc.element_size == 0 || desc.element_count == 0 {
        return invalid(format!(
            "size must be non-zero (element size {}, element count {})",
            desc.element_size, desc.element_count
        ));
    }
    let size = desc.size_in_bytes();
    if desc.bind_flags.contains(BindFlags::CONSTANT_BUFFER) && size % 16 != 0 {
        return invalid(format!(
            "constant buffer size {size} is not a multiple of 16"
        ));
    }
    if desc.bind_flags.intersects(BindFlags::VIEWABLE) && desc.sub_type == BufferSubType::None {
        return invalid(format!(
            "{:?} requires a buffer sub-type",
            desc.bind_flags
        ));
    }
    if let Some(data) = desc.initial_data {
        if data.len() as u64 != size {
            return invalid(format!(
                "initial data is {} bytes but the buffer is {size} bytes",
                data.len()
            ));
        }
    }
    Ok(())
}

/// Checks that a buffer view's format suits the buffer's sub-type.
///
/// Raw buffers are viewed as `R32Typeless`, structured buffers as `Unknown`, and typed
/// buffers need a concrete format.
pub fn check_buffer_view_format(sub_type: BufferSubType, format: ResourceFormat) -> Result<(), String> {
    match sub_type {
        BufferSubType::Raw if format != ResourceFormat::R32Typeless => Err(format!(
            "raw buffer views must use R32Typeless, got {format:?}"
        )),
        BufferSubType::Structured if format != ResourceFormat::Unknown => Err(format!(
            "structured buffer views must use Unknown, got {format:?}"
        )),
        BufferSubType::Typed if format == ResourceFormat::Unknown => {
            Err("typed buffer views need a format".to_string())
        }
        BufferSubType::None => Err("the buffer has no sub-type and cannot be viewed".to_string()),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant_buffer(element_size: u32, element_count: u32) -> BufferDesc<'static> {
        BufferDesc {
            element_size,
            element_count,
            usage: Usage::Dynamic,
            bind_flags: BindFlags::CONSTANT_BUFFER,
            cpu_access: CpuAccess::Write,
            ..Default::default()
        }
    }

    #[test]
    fn constant_buffer_size_must_be_16_aligned() {
        for size in [16u32, 32, 64, 256] {
            assert!(validate_buffer_desc(&constant_buffer(size, 1)).is_ok(), "{size}");
        }
        for size in [4u32, 12, 20, 100] {
            assert!(validate_buffer_desc(&constant_buffer(size, 1)).is_err(), "{size}");
        }
        // The product is what counts.
        assert!(validate_buffer_desc(&constant_buffer(4, 4)).is_ok());
        assert!(validate_buffer_desc(&constant_buffer(4, 3)).is_err());
    }

    #[test]
    fn empty_bind_flags_are_rejected() {
        let desc = BufferDesc {
            element_size: 4,
            element_count: 4,
            ..Default::default()
        };
        assert!(matches!(
            validate_buffer_desc(&desc),
            Err(ResourceError::InvalidDescriptor { .. })
        ));
    }

    #[test]
    fn viewable_buffers_need_a_sub_type() {
        let mut desc = BufferDesc {
            element_size: 4,
            element_count: 256,
            bind_flags: BindFlags::SHADER_RESOURCE | BindFlags::SHADER_RW_RESOURCE,
            ..Default::default()
        };
        assert!(validate_buffer_desc(&desc).is_err());
        desc.sub_type = BufferSubType::Raw;
        assert!(validate_buffer_desc(&desc).is_ok());
    }

    #[test]
    fn initial_data_must_match_size() {
        let data = [0u8; 12];
        let desc = BufferDesc {
            element_size: 4,
            element_count: 4,
            bind_flags: BindFlags::VERTEX_BUFFER,
            initial_data: Some(&data),
            ..Default::default()
        };
        assert!(validate_buffer_desc(&desc).is_err());
    }

    #[test]
    fn view_format_rules() {
        assert!(check_buffer_view_format(BufferSubType::Raw, ResourceFormat::R32Typeless).is_ok());
        assert!(check_buffer_view_format(BufferSubType::Raw, ResourceFormat::R32Float).is_err());
        assert!(check_buffer_view_format(BufferSubType::Structured, ResourceFormat::Unknown).is_ok());
        assert!(check_buffer_view_format(BufferSubType::Structured, ResourceFormat::R32Uint).is_err());
        assert!(check_buffer_view_format(BufferSubType::Typed, ResourceFormat::R32G32B32A32Float).is_ok());
        assert!(check_buffer_view_format(BufferSubType::Typed, ResourceFormat::Unknown).is_err());
    }
}
