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
use crate::math::Extent3D;
use crate::renderer::api::*;
use crate::renderer::error::ResourceError;
use std::sync::Arc;

/// A 1D, 2D, 3D or cube image.
///
/// A texture either owns its native resource or wraps one adopted from elsewhere (a
/// swap-chain back buffer). Wrapped textures never release their handle.
#[derive(Debug)]
pub struct Texture {
    header: ObjectHeader,
    desc: TextureDesc<'static>,
    handle: NativeHandle,
    wrapped: bool,
}

impl Texture {
    pub(crate) fn create(shared: &Arc<DeviceShared>, desc: &TextureDesc<'_>) -> Result<Self, ResourceError> {
        validate_texture_desc(desc)?;

        let (handle, wrapped) = match desc.native {
            Some(native) => (native, true),
            None => {
                let subresources = match desc.initial_data {
                    Some(_) => subresource_layout(desc).0,
                    None => Vec::new(),
                };
                (shared.backend.create_texture(desc, &subresources)?, false)
            }
        };

        Ok(Self {
            header: ObjectHeader::new(
                DeviceObjectType::Texture,
                desc.label.as_ref().map(|l| l.to_string()),
                shared,
            ),
            desc: desc.to_static(),
            handle,
            wrapped,
        })
    }

    /// Returns the descriptor, with `mip_count` resolved and without initial data.
    pub fn desc(&self) -> &TextureDesc<'static> {
        &self.desc
    }

    /// Returns the native texture.
    pub fn native_handle(&self) -> NativeHandle {
        self.handle
    }

    /// Returns `true` if the texture adopted an existing native resource.
    pub fn is_wrapped(&self) -> bool {
        self.wrapped
    }

    /// Returns the texture type.
    pub fn texture_type(&self) -> TextureType {
        self.desc.texture_type
    }

    /// Returns the size of mip 0.
    pub fn extent(&self) -> Extent3D {
        self.desc.extent()
    }

    /// Returns the number of mips.
    pub fn mip_count(&self) -> u32 {
        self.desc.mip_count
    }

    /// Returns the number of array slices (faces for cubes).
    pub fn array_count(&self) -> u32 {
        self.desc.array_count
    }

    /// Returns the number of samples per texel.
    pub fn sample_count(&self) -> u32 {
        self.desc.sample_count
    }

    /// Returns the texel format.
    pub fn format(&self) -> ResourceFormat {
        self.desc.format
    }

    /// Returns the bind flags.
    pub fn bind_flags(&self) -> BindFlags {
        self.desc.bind_flags
    }
}

impl DeviceObject for Texture {
    fn header(&self) -> &ObjectHeader {
        &self.header
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        if !self.wrapped {
            self.header.release(self.handle);
        }
    }
}

/// Checks a texture descriptor against the creation rules.
///
/// Wrapped textures (with `native` set) only need a valid shape; their format and bind
/// flags describe the adopted resource.
pub fn validate_texture_desc(desc: &TextureDesc<'_>) -> Result<(), ResourceError> {
    let invalid = |reason: String| Err(ResourceError::invalid(DeviceObjectType::Texture, reason));

    if desc.array_count == 0 {
        return invalid("array count must be at least 1".to_string());
    }
    match desc.texture_type {
        TextureType::Unknown => return invalid("texture type is Unknown".to_string()),
        TextureType::TextureCube if desc.array_count % 6 != 0 => {
            return invalid(format!(
                "cube textures need a multiple of 6 faces, got {}",
                desc.array_count
            ));
        }
        TextureType::Texture3D if desc.array_count != 1 => {
            return invalid("3D textures cannot be arrays".to_string());
        }
        _ => {}
    }
    let extent = desc.extent();
    if extent.width == 0 || extent.height == 0 || extent.depth == 0 {
        return invalid(format!("size must be non-zero, got {extent:?}"));
    }
    if desc.sample_count == 0 {
        return invalid("sample count must be at least 1".to_string());
    }
    if desc.sample_count > 1 && (desc.texture_type != TextureType::Texture2D || desc.resolved_mip_count() != 1) {
        return invalid("only single-mip 2D textures can be multisampled".to_string());
    }
    if desc.native.is_some() {
        return Ok(());
    }

    if desc.bind_flags.is_empty() {
        return invalid("bind flags must not be empty".to_string());
    }
    let buffer_only = BindFlags::VERTEX_BUFFER
        | BindFlags::INDEX_BUFFER
        | BindFlags::CONSTANT_BUFFER
        | BindFlags::STREAM_OUTPUT;
    if desc.bind_flags.intersects(buffer_only) {
        return invalid(format!("{:?} only applies to buffers", desc.bind_flags));
    }
    if desc.format == ResourceFormat::Unknown {
        return invalid("format must not be Unknown".to_string());
    }
    if desc.bind_flags.contains(BindFlags::DEPTH_STENCIL) && !is_depth_capable(desc.format) {
        return invalid(format!("{:?} cannot back a depth-stencil target", desc.format));
    }
    let full_chain = full_mip_chain_length(extent);
    if desc.resolved_mip_count() > full_chain {
        return invalid(format!(
            "{} mips requested but the full chain is {full_chain}",
            desc.mip_count
        ));
    }
    if let Some(data) = desc.initial_data {
        let (_, required) = subresource_layout(desc);
        if data.len() < required {
            return invalid(format!(
                "initial data is {} bytes but the subresources need {required}",
                data.len()
            ));
        }
    }
    Ok(())
}

fn is_depth_capable(format: ResourceFormat) -> bool {
    format.is_depth()
        || matches!(
            format,
            ResourceFormat::R24G8Typeless | ResourceFormat::R32Typeless | ResourceFormat::R32G8X24Typeless
        )
}
