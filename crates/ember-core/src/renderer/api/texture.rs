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

//! Defines data structures related to GPU texture resources.

use super::{BindFlags, CpuAccess, NativeHandle, ResourceFormat, TextureSubTypeFlags, TextureType, Usage};
use crate::math::Extent3D;
use std::borrow::Cow;

/// A descriptor used to create a [`Texture`](crate::renderer::rhi::Texture).
#[derive(Debug, Clone)]
pub struct TextureDesc<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// The dimensionality of the texture.
    pub texture_type: TextureType,
    /// Width in texels of mip 0.
    pub width: u32,
    /// Height in texels of mip 0. Ignored (treated as 1) for 1D textures.
    pub height: u32,
    /// Depth in texels of mip 0. Only meaningful for 3D textures.
    pub depth: u32,
    /// The number of mip levels. `0` requests the full chain down to 1x1.
    pub mip_count: u32,
    /// The number of array slices. For cube textures this counts faces.
    pub array_count: u32,
    /// The number of samples per texel.
    pub sample_count: u32,
    /// The texel format.
    pub format: ResourceFormat,
    /// How the texture will be read and written.
    pub usage: Usage,
    /// A bitmask of [`BindFlags`] describing how the texture will be attached.
    pub bind_flags: BindFlags,
    /// The CPU access the texture is created with.
    pub cpu_access: CpuAccess,
    /// Tightly packed texel data for every subresource, array slice major, then mip.
    pub initial_data: Option<&'a [u8]>,
    /// An existing native texture to adopt instead of creating one.
    pub native: Option<NativeHandle>,
}

impl Default for TextureDesc<'_> {
    fn default() -> Self {
        Self {
            label: None,
            texture_type: TextureType::Texture2D,
            width: 1,
            height: 1,
            depth: 1,
            mip_count: 1,
            array_count: 1,
            sample_count: 1,
            format: ResourceFormat::R8G8B8A8Unorm,
            usage: Usage::Default,
            bind_flags: BindFlags::SHADER_RESOURCE,
            cpu_access: CpuAccess::None,
            initial_data: None,
            native: None,
        }
    }
}

impl TextureDesc<'_> {
    /// Returns the size of mip 0, with the unused axes of 1D and 2D textures forced to 1.
    pub fn extent(&self) -> Extent3D {
        match self.texture_type {
            TextureType::Texture1D => Extent3D::new(self.width, 1, 1),
            TextureType::Texture3D => Extent3D::new(self.width, self.height, self.depth),
            _ => Extent3D::new(self.width, self.height, 1),
        }
    }

    /// Returns the number of mip levels, resolving `0` to the full chain.
    pub fn resolved_mip_count(&self) -> u32 {
        if self.mip_count == 0 {
            full_mip_chain_length(self.extent())
        } else {
            self.mip_count
        }
    }

    /// Returns the sub-type flags implied by the array and sample counts.
    pub fn sub_type_flags(&self) -> TextureSubTypeFlags {
        let mut flags = TextureSubTypeFlags::empty();
        let arrayed = match self.texture_type {
            TextureType::TextureCube => self.array_count > 6,
            _ => self.array_count > 1,
        };
        if arrayed {
            flags.insert(TextureSubTypeFlags::ARRAY);
        }
        if self.sample_count > 1 {
            flags.insert(TextureSubTypeFlags::MULTISAMPLED);
        }
        flags
    }

    /// Returns a copy that owns its label and drops the initial data.
    pub fn to_static(&self) -> TextureDesc<'static> {
        TextureDesc {
            label: self.label.as_ref().map(|l| Cow::Owned(l.to_string())),
            texture_type: self.texture_type,
            width: self.width,
            height: self.height,
            depth: self.depth,
            mip_count: self.resolved_mip_count(),
            array_count: self.array_count,
            sample_count: self.sample_count,
            format: self.format,
            usage: self.usage,
            bind_flags: self.bind_flags,
            cpu_access: self.cpu_access,
            initial_data: None,
            native: self.native,
        }
    }
}

/// Returns the number of mips from `extent` down to 1x1x1.
pub fn full_mip_chain_length(extent: Extent3D) -> u32 {
    let largest = extent.width.max(extent.height).max(extent.depth).max(1);
    32 - largest.leading_zeros()
}

/// Where one subresource's texels live inside a texture's initial data blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubresourceData {
    /// The mip level.
    pub mip: u32,
    /// The array slice.
    pub array_slice: u32,
    /// Byte offset of the subresource inside the blob.
    pub offset: usize,
    /// Bytes per row of texels.
    pub row_pitch: u32,
    /// Bytes per 2D slice (`row_pitch * height`).
    pub slice_pitch: u32,
}

/// Computes the packed layout of every subresource of a texture.
///
/// Subresources are ordered array slice major, then mip, which is the native
/// subresource index order. Each mip's row pitch is the format size times the mip
/// width, its slice pitch is the row pitch times the mip height, and the next
/// subresource starts `slice_pitch * mip depth` bytes later. Returns the entries and
/// the total byte size.
pub fn subresource_layout(desc: &TextureDesc<'_>) -> (Vec<SubresourceData>, usize) {
    let extent = desc.extent();
    let mips = desc.resolved_mip_count();
    let element_size = desc.format.size();

    let mut entries = Vec::with_capacity((mips * desc.array_count) as usize);
    let mut offset = 0usize;
    for array_slice in 0..desc.array_count {
        for mip in 0..mips {
            let size = extent.mip_level(mip);
            let row_pitch = element_size * size.width;
            let slice_pitch = row_pitch * size.height;
            entries.push(SubresourceData {
                mip,
                array_slice,
                offset,
                row_pitch,
                slice_pitch,
            });
            offset += slice_pitch as usize * size.depth as usize;
        }
    }
    (entries, offset)
}
