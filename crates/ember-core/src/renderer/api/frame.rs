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

//! Swap-chain, viewport and scissor descriptors.

use super::ResourceFormat;
use crate::math::Extent2D;
use std::borrow::Cow;

/// A viewport rectangle plus its depth range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Left edge in pixels.
    pub x: f32,
    /// Top edge in pixels.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
    /// Depth mapped to the near plane.
    pub min_depth: f32,
    /// Depth mapped to the far plane.
    pub max_depth: f32,
}

impl Viewport {
    /// A viewport covering `size` with the full `[0, 1]` depth range.
    pub fn from_extent(size: Extent2D) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: size.width as f32,
            height: size.height as f32,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }
}

/// A scissor rectangle in pixels. `right` and `bottom` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScissorRect {
    /// Left edge.
    pub left: i32,
    /// Top edge.
    pub top: i32,
    /// Right edge.
    pub right: i32,
    /// Bottom edge.
    pub bottom: i32,
}

/// A descriptor used to create a [`SwapChain`](crate::renderer::rhi::SwapChain).
#[derive(Debug, Clone)]
pub struct SwapChainDesc<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// Back buffer size. `None` uses the window's current size.
    pub size: Option<Extent2D>,
    /// Back buffer format.
    pub format: ResourceFormat,
    /// The number of back buffers.
    pub buffer_count: u32,
    /// Vertical blanks to wait per present. 0 presents immediately.
    pub sync_interval: u32,
}

impl Default for SwapChainDesc<'_> {
    fn default() -> Self {
        Self {
            label: None,
            size: None,
            format: ResourceFormat::R8G8B8A8Unorm,
            buffer_count: 2,
            sync_interval: 1,
        }
    }
}
