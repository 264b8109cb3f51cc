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

//! Defines the sampler descriptor.

use super::pipeline::CompareFunction;
use std::borrow::Cow;

/// Defines how texture coordinates are handled when sampling outside the `[0, 1]` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AddressMode {
    /// Coordinates wrap around. `1.1` becomes `0.1`.
    #[default]
    Wrap,
    /// Coordinates wrap around, mirroring at each integer boundary.
    Mirror,
    /// Coordinates are clamped to the edge. `1.1` becomes `1.0`.
    Clamp,
    /// Coordinates outside the range are given a fixed border color.
    Border,
    /// Mirrors once around zero, then clamps.
    MirrorOnce,
}

/// Defines the filtering mode for one axis of texture sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterMode {
    /// Point sampling. Returns the value of the nearest texel.
    Point,
    /// Linear interpolation between the nearest texels.
    #[default]
    Linear,
}

/// A descriptor used to create a [`Sampler`](crate::renderer::rhi::Sampler).
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerDesc<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// The filter mode for minification.
    pub min_filter: FilterMode,
    /// The filter mode for magnification.
    pub mag_filter: FilterMode,
    /// The filter mode between mipmap levels.
    pub mip_filter: FilterMode,
    /// Anisotropic filtering level. Values above 1 enable anisotropic filtering.
    pub max_anisotropy: u32,
    /// The address mode for the U texture coordinate.
    pub address_u: AddressMode,
    /// The address mode for the V texture coordinate.
    pub address_v: AddressMode,
    /// The address mode for the W texture coordinate.
    pub address_w: AddressMode,
    /// Offset added to the computed mip level.
    pub mip_lod_bias: f32,
    /// If `Some`, creates a comparison sampler (shadow mapping).
    pub compare: Option<CompareFunction>,
    /// The border color used by [`AddressMode::Border`].
    pub border_color: [f32; 4],
    /// The lowest mip level that may be accessed.
    pub min_lod: f32,
    /// The highest mip level that may be accessed.
    pub max_lod: f32,
}

impl Default for SamplerDesc<'_> {
    fn default() -> Self {
        Self {
            label: None,
            min_filter: FilterMode::Linear,
            mag_filter: FilterMode::Linear,
            mip_filter: FilterMode::Linear,
            max_anisotropy: 1,
            address_u: AddressMode::Wrap,
            address_v: AddressMode::Wrap,
            address_w: AddressMode::Wrap,
            mip_lod_bias: 0.0,
            compare: None,
            border_color: [0.0; 4],
            min_lod: 0.0,
            max_lod: f32::MAX,
        }
    }
}

impl SamplerDesc<'_> {
    /// Returns a copy that owns its label.
    pub fn to_static(&self) -> SamplerDesc<'static> {
        SamplerDesc {
            label: self.label.as_ref().map(|l| Cow::Owned(l.to_string())),
            min_filter: self.min_filter,
            mag_filter: self.mag_filter,
            mip_filter: self.mip_filter,
            max_anisotropy: self.max_anisotropy,
            address_u: self.address_u,
            address_v: self.address_v,
            address_w: self.address_w,
            mip_lod_bias: self.mip_lod_bias,
            compare: self.compare,
            border_color: self.border_color,
            min_lod: self.min_lod,
            max_lod: self.max_lod,
        }
    }
}
