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

//! Rasterizer, blend and depth-stencil state descriptors.

use super::enums::*;
use crate::ember_bitflags;
use crate::renderer::api::MAX_RENDER_TARGETS;

/// Describes rasterization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterizerState {
    /// Solid or wireframe.
    pub fill_mode: FillMode,
    /// Which faces are culled.
    pub cull_mode: CullMode,
    /// If `true`, counter-clockwise triangles are front-facing.
    pub front_counter_clockwise: bool,
    /// A constant depth value added to each pixel.
    pub depth_bias: i32,
    /// The maximum depth bias.
    pub depth_bias_clamp: f32,
    /// A depth bias scaled by the slope of the primitive.
    pub slope_scaled_depth_bias: f32,
    /// Clip against the near and far planes.
    pub depth_clip: bool,
    /// Cull pixels outside the bound scissor rectangles.
    pub scissor: bool,
    /// Use the quadrilateral line anti-aliasing algorithm on MSAA targets.
    pub multisample: bool,
    /// Anti-alias lines.
    pub antialiased_lines: bool,
}

impl Default for RasterizerState {
    fn default() -> Self {
        Self {
            fill_mode: FillMode::Solid,
            cull_mode: CullMode::Back,
            front_counter_clockwise: false,
            depth_bias: 0,
            depth_bias_clamp: 0.0,
            slope_scaled_depth_bias: 0.0,
            depth_clip: true,
            scissor: false,
            multisample: false,
            antialiased_lines: false,
        }
    }
}

ember_bitflags! {
    /// A bitmask to enable or disable writes to individual color channels.
    pub struct ColorWrites: u8 {
        /// Enable writes to the Red channel.
        const RED = 1 << 0;
        /// Enable writes to the Green channel.
        const GREEN = 1 << 1;
        /// Enable writes to the Blue channel.
        const BLUE = 1 << 2;
        /// Enable writes to the Alpha channel.
        const ALPHA = 1 << 3;
    }
}

/// Blending for one render-target slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderTargetBlend {
    /// If `false`, the pixel shader output is written unchanged.
    pub enabled: bool,
    /// Source factor of the color equation.
    pub src_color: BlendFactor,
    /// Destination factor of the color equation.
    pub dst_color: BlendFactor,
    /// Operator of the color equation.
    pub color_op: BlendOperation,
    /// Source factor of the alpha equation.
    pub src_alpha: BlendFactor,
    /// Destination factor of the alpha equation.
    pub dst_alpha: BlendFactor,
    /// Operator of the alpha equation.
    pub alpha_op: BlendOperation,
    /// The channels written.
    pub write_mask: ColorWrites,
}

impl Default for RenderTargetBlend {
    fn default() -> Self {
        Self {
            enabled: false,
            src_color: BlendFactor::One,
            dst_color: BlendFactor::Zero,
            color_op: BlendOperation::Add,
            src_alpha: BlendFactor::One,
            dst_alpha: BlendFactor::Zero,
            alpha_op: BlendOperation::Add,
            write_mask: ColorWrites::all(),
        }
    }
}

impl RenderTargetBlend {
    /// Classic `src * a + dst * (1 - a)` alpha blending.
    pub fn alpha_blending() -> Self {
        Self {
            enabled: true,
            src_color: BlendFactor::SrcAlpha,
            dst_color: BlendFactor::InvSrcAlpha,
            src_alpha: BlendFactor::One,
            dst_alpha: BlendFactor::InvSrcAlpha,
            ..Default::default()
        }
    }
}

/// Describes output-merger blending.
///
/// When `independent` is `false` only `render_targets[0]` is used, for every slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlendState {
    /// Use alpha-to-coverage when writing to MSAA targets.
    pub alpha_to_coverage: bool,
    /// Blend each render-target slot with its own entry.
    pub independent: bool,
    /// Per-slot blending.
    pub render_targets: [RenderTargetBlend; MAX_RENDER_TARGETS],
}

impl BlendState {
    /// Returns the blend used for `slot`, honoring `independent`.
    pub fn for_slot(&self, slot: usize) -> &RenderTargetBlend {
        if self.independent {
            &self.render_targets[slot]
        } else {
            &self.render_targets[0]
        }
    }
}

/// Describes the stencil test and operations for one face.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StencilFaceState {
    /// The comparison function used for the stencil test.
    pub compare: CompareFunction,
    /// The operation if the stencil test fails.
    pub fail_op: StencilOperation,
    /// The operation if the stencil test passes but the depth test fails.
    pub depth_fail_op: StencilOperation,
    /// The operation if both tests pass.
    pub pass_op: StencilOperation,
}

/// Describes depth and stencil testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DepthStencilState {
    /// Enables the depth test.
    pub depth_test: bool,
    /// Writes passing depth values.
    pub depth_write: bool,
    /// The depth comparison.
    pub depth_compare: CompareFunction,
    /// Enables the stencil test.
    pub stencil_test: bool,
    /// Mask applied when reading stencil values.
    pub stencil_read_mask: u8,
    /// Mask applied when writing stencil values.
    pub stencil_write_mask: u8,
    /// Stencil state for front faces.
    pub front_face: StencilFaceState,
    /// Stencil state for back faces.
    pub back_face: StencilFaceState,
}

impl Default for DepthStencilState {
    fn default() -> Self {
        Self {
            depth_test: true,
            depth_write: true,
            depth_compare: CompareFunction::Less,
            stencil_test: false,
            stencil_read_mask: 0xFF,
            stencil_write_mask: 0xFF,
            front_face: StencilFaceState {
                compare: CompareFunction::Always,
                ..Default::default()
            },
            back_face: StencilFaceState {
                compare: CompareFunction::Always,
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_blend_uses_slot_zero() {
        let mut state = BlendState::default();
        state.render_targets[0] = RenderTargetBlend::alpha_blending();
        assert!(state.for_slot(5).enabled);

        state.independent = true;
        assert!(!state.for_slot(5).enabled);
        assert!(state.for_slot(0).enabled);
    }

    #[test]
    fn default_write_mask_is_all_channels() {
        let blend = RenderTargetBlend::default();
        assert!(blend.write_mask.contains(ColorWrites::RED | ColorWrites::ALPHA));
        assert_eq!(blend.write_mask.bits(), 0b1111);
    }
}
