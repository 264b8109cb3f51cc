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

//! The resource format table.

/// The element format of a texture, a typed buffer or a view.
///
/// This is the subset of the DXGI format table the RHI deals with. `Unknown` is a
/// real value: structured-buffer views must use it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResourceFormat {
    /// No format. Required for structured-buffer views.
    #[default]
    Unknown,
    // 128-bit formats
    /// Four typeless 32-bit components.
    R32G32B32A32Typeless,
    /// Four 32-bit float components.
    R32G32B32A32Float,
    /// Four 32-bit unsigned integer components.
    R32G32B32A32Uint,
    // 96-bit formats
    /// Three 32-bit float components.
    R32G32B32Float,
    // 64-bit formats
    /// Four 16-bit float components.
    R16G16B16A16Float,
    /// Two 32-bit float components.
    R32G32Float,
    /// 32-bit float depth, 8-bit stencil and 24 unused bits, typeless.
    R32G8X24Typeless,
    /// 32-bit float depth with 8-bit stencil.
    D32FloatS8X24Uint,
    // 32-bit formats
    /// Four typeless 8-bit components.
    R8G8B8A8Typeless,
    /// Four 8-bit unsigned normalized components (RGBA).
    R8G8B8A8Unorm,
    /// Four 8-bit unsigned normalized components (RGBA) in the sRGB color space.
    R8G8B8A8UnormSrgb,
    /// Four 8-bit unsigned integer components.
    R8G8B8A8Uint,
    /// Four 8-bit unsigned normalized components (BGRA). This is a common swap-chain format.
    B8G8R8A8Unorm,
    /// Four 8-bit unsigned normalized components (BGRA) in the sRGB color space.
    B8G8R8A8UnormSrgb,
    /// Packed 10-bit RGB with 2-bit alpha.
    R10G10B10A2Unorm,
    /// Packed 11-bit RG with 10-bit B floats.
    R11G11B10Float,
    /// Two 16-bit float components.
    R16G16Float,
    /// One typeless 32-bit component. Required for raw-buffer views.
    R32Typeless,
    /// One 32-bit float component.
    R32Float,
    /// One 32-bit unsigned integer component.
    R32Uint,
    /// One 32-bit signed integer component.
    R32Sint,
    /// A 32-bit float depth format.
    D32Float,
    /// 24-bit depth and 8-bit stencil, typeless.
    R24G8Typeless,
    /// A 24-bit unsigned normalized depth format with an 8-bit stencil component.
    D24UnormS8Uint,
    /// The depth channel of `R24G8Typeless` as a shader-readable format.
    R24UnormX8Typeless,
    // 16-bit formats
    /// Two 8-bit unsigned normalized components.
    R8G8Unorm,
    /// One 16-bit float component.
    R16Float,
    /// One 16-bit unsigned normalized component.
    R16Unorm,
    /// One 16-bit unsigned integer component.
    R16Uint,
    /// A 16-bit unsigned normalized depth format.
    D16Unorm,
    // 8-bit formats
    /// One 8-bit unsigned normalized component.
    R8Unorm,
    /// One 8-bit unsigned integer component.
    R8Uint,
}

impl ResourceFormat {
    /// Returns the size in bytes of a single element (texel) of this format.
    ///
    /// `Unknown` has no size and returns 0.
    pub const fn size(&self) -> u32 {
        match self {
            ResourceFormat::Unknown => 0,
            ResourceFormat::R32G32B32A32Typeless
            | ResourceFormat::R32G32B32A32Float
            | ResourceFormat::R32G32B32A32Uint => 16,
            ResourceFormat::R32G32B32Float => 12,
            ResourceFormat::R16G16B16A16Float
            | ResourceFormat::R32G32Float
            | ResourceFormat::R32G8X24Typeless
            | ResourceFormat::D32FloatS8X24Uint => 8,
            ResourceFormat::R8G8B8A8Typeless
            | ResourceFormat::R8G8B8A8Unorm
            | ResourceFormat::R8G8B8A8UnormSrgb
            | ResourceFormat::R8G8B8A8Uint
            | ResourceFormat::B8G8R8A8Unorm
            | ResourceFormat::B8G8R8A8UnormSrgb
            | ResourceFormat::R10G10B10A2Unorm
            | ResourceFormat::R11G11B10Float
            | ResourceFormat::R16G16Float
            | ResourceFormat::R32Typeless
            | ResourceFormat::R32Float
            | ResourceFormat::R32Uint
            | ResourceFormat::R32Sint
            | ResourceFormat::D32Float
            | ResourceFormat::R24G8Typeless
            | ResourceFormat::D24UnormS8Uint
            | ResourceFormat::R24UnormX8Typeless => 4,
            ResourceFormat::R8G8Unorm
            | ResourceFormat::R16Float
            | ResourceFormat::R16Unorm
            | ResourceFormat::R16Uint
            | ResourceFormat::D16Unorm => 2,
            ResourceFormat::R8Unorm | ResourceFormat::R8Uint => 1,
        }
    }

    /// Returns `true` for formats usable by a depth-stencil view.
    pub const fn is_depth(&self) -> bool {
        matches!(
            self,
            ResourceFormat::D32Float
                | ResourceFormat::D24UnormS8Uint
                | ResourceFormat::D16Unorm
                | ResourceFormat::D32FloatS8X24Uint
        )
    }

    /// Returns `true` for formats with a stencil channel.
    pub const fn has_stencil(&self) -> bool {
        matches!(
            self,
            ResourceFormat::D24UnormS8Uint | ResourceFormat::D32FloatS8X24Uint
        )
    }

    /// Returns `true` for typeless formats.
    pub const fn is_typeless(&self) -> bool {
        matches!(
            self,
            ResourceFormat::R32G32B32A32Typeless
                | ResourceFormat::R32G8X24Typeless
                | ResourceFormat::R8G8B8A8Typeless
                | ResourceFormat::R32Typeless
                | ResourceFormat::R24G8Typeless
                | ResourceFormat::R24UnormX8Typeless
        )
    }

    /// Returns `true` for formats stored in the sRGB color space.
    pub const fn is_srgb(&self) -> bool {
        matches!(
            self,
            ResourceFormat::R8G8B8A8UnormSrgb | ResourceFormat::B8G8R8A8UnormSrgb
        )
    }
}
