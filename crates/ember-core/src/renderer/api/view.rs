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

//! View sub-ranges and the view-dimension derivation table.

use super::{BufferSubType, TextureType, ViewDimension, ViewKind};

/// The mip, array and depth window a texture view covers.
///
/// `None` counts mean "everything from the first index on".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextureRange {
    /// The most detailed mip the view exposes.
    pub first_mip: u32,
    /// The number of mips, or `None` for all remaining.
    pub mip_count: Option<u32>,
    /// The first array slice (or cube face).
    pub first_array: u32,
    /// The number of array slices, or `None` for all remaining.
    pub array_count: Option<u32>,
    /// The first depth slice of a 3D texture.
    pub first_depth: u32,
    /// The number of depth slices, or `None` for all remaining.
    pub depth_count: Option<u32>,
}

impl TextureRange {
    /// Resolves `mip_count` against a texture with `total` mips.
    pub fn resolved_mip_count(&self, total: u32) -> u32 {
        self.mip_count
            .unwrap_or_else(|| total.saturating_sub(self.first_mip))
    }

    /// Resolves `array_count` against a texture with `total` slices.
    pub fn resolved_array_count(&self, total: u32) -> u32 {
        self.array_count
            .unwrap_or_else(|| total.saturating_sub(self.first_array))
    }

    /// Resolves `depth_count` against a texture with `total` depth slices.
    pub fn resolved_depth_count(&self, total: u32) -> u32 {
        self.depth_count
            .unwrap_or_else(|| total.saturating_sub(self.first_depth))
    }
}

/// The element window a buffer view covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BufferRange {
    /// The first element.
    pub first_element: u32,
    /// The number of elements, or `None` for all remaining.
    pub element_count: Option<u32>,
}

impl BufferRange {
    /// Resolves `element_count` against a buffer with `total` elements.
    pub fn resolved_element_count(&self, total: u32) -> u32 {
        self.element_count
            .unwrap_or_else(|| total.saturating_sub(self.first_element))
    }
}

/// The shape of the resource a view looks at, as far as dimension derivation cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewedResource {
    /// A texture.
    Texture {
        /// The texture's declared type.
        texture_type: TextureType,
        /// The texture's array count (faces for cubes).
        array_count: u32,
        /// The texture's sample count.
        sample_count: u32,
    },
    /// A buffer.
    Buffer {
        /// The buffer's declared sub-type.
        sub_type: BufferSubType,
    },
}

/// Derives the dimension of a view of `kind` onto `resource`.
///
/// The rules are the same for every kind except that only shader-resource views see
/// cubes as cubes (other kinds see a 2D array of faces), depth-stencil views reject 3D
/// textures and buffers, and render-target views require typed buffers.
pub fn derive_view_dimension(
    kind: ViewKind,
    resource: ViewedResource,
) -> Result<ViewDimension, String> {
    match resource {
        ViewedResource::Texture {
            texture_type,
            array_count,
            sample_count,
        } => {
            let arrayed = array_count > 1;
            match texture_type {
                TextureType::Unknown => Err("the texture type is Unknown".to_string()),
                TextureType::Texture1D => Ok(if arrayed {
                    ViewDimension::Texture1DArray
                } else {
                    ViewDimension::Texture1D
                }),
                TextureType::Texture2D => Ok(match (sample_count > 1, arrayed) {
                    (true, true) => ViewDimension::Texture2DMSArray,
                    (true, false) => ViewDimension::Texture2DMS,
                    (false, true) => ViewDimension::Texture2DArray,
                    (false, false) => ViewDimension::Texture2D,
                }),
                TextureType::TextureCube => Ok(match kind {
                    ViewKind::ShaderResource if array_count > 6 => ViewDimension::TextureCubeArray,
                    ViewKind::ShaderResource => ViewDimension::TextureCube,
                    _ => ViewDimension::Texture2DArray,
                }),
                TextureType::Texture3D => match kind {
                    ViewKind::DepthStencil => {
                        Err("3D textures cannot be viewed as depth-stencil".to_string())
                    }
                    _ => Ok(ViewDimension::Texture3D),
                },
            }
        }
        ViewedResource::Buffer { sub_type } => match kind {
            ViewKind::DepthStencil => Err("buffers cannot be viewed as depth-stencil".to_string()),
            ViewKind::RenderTarget if sub_type != BufferSubType::Typed => Err(format!(
                "render-target views require a Typed buffer, found {sub_type:?}"
            )),
            _ => Ok(ViewDimension::Buffer),
        },
    }
}
