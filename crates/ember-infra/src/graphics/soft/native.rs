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

//! Native D3D11/DXGI values and descriptor layouts modelled by the software backend.
//!
//! Values match the Windows SDK headers so that logs and inspection output read the same
//! as a real debug layer.

#![allow(missing_docs)]

/// `HRESULT` codes.
pub mod hresult {
    pub const S_OK: u32 = 0;
    pub const E_FAIL: u32 = 0x8000_4005;
    pub const E_INVALIDARG: u32 = 0x8007_0057;
    pub const E_OUTOFMEMORY: u32 = 0x8007_000E;
    pub const DXGI_ERROR_INVALID_CALL: u32 = 0x887A_0001;
    pub const DXGI_ERROR_NOT_FOUND: u32 = 0x887A_0002;
}

/// `DXGI_FORMAT`
pub mod dxgi_format {
    pub const UNKNOWN: u32 = 0;
    pub const R32G32B32A32_TYPELESS: u32 = 1;
    pub const R32G32B32A32_FLOAT: u32 = 2;
    pub const R32G32B32A32_UINT: u32 = 3;
    pub const R32G32B32A32_SINT: u32 = 4;
    pub const R32G32B32_FLOAT: u32 = 6;
    pub const R16G16B16A16_FLOAT: u32 = 10;
    pub const R32G32_FLOAT: u32 = 16;
    pub const R32G32_UINT: u32 = 17;
    pub const R32G8X24_TYPELESS: u32 = 19;
    pub const D32_FLOAT_S8X24_UINT: u32 = 20;
    pub const R10G10B10A2_UNORM: u32 = 24;
    pub const R11G11B10_FLOAT: u32 = 26;
    pub const R8G8B8A8_TYPELESS: u32 = 27;
    pub const R8G8B8A8_UNORM: u32 = 28;
    pub const R8G8B8A8_UNORM_SRGB: u32 = 29;
    pub const R8G8B8A8_UINT: u32 = 30;
    pub const R16G16_FLOAT: u32 = 34;
    pub const R16G16_SINT: u32 = 38;
    pub const R32_TYPELESS: u32 = 39;
    pub const D32_FLOAT: u32 = 40;
    pub const R32_FLOAT: u32 = 41;
    pub const R32_UINT: u32 = 42;
    pub const R32_SINT: u32 = 43;
    pub const R24G8_TYPELESS: u32 = 44;
    pub const D24_UNORM_S8_UINT: u32 = 45;
    pub const R24_UNORM_X8_TYPELESS: u32 = 46;
    pub const R8G8_UNORM: u32 = 49;
    pub const R16_FLOAT: u32 = 54;
    pub const D16_UNORM: u32 = 55;
    pub const R16_UNORM: u32 = 56;
    pub const R16_UINT: u32 = 57;
    pub const R8_UNORM: u32 = 61;
    pub const R8_UINT: u32 = 62;
    pub const B8G8R8A8_UNORM: u32 = 87;
    pub const B8G8R8A8_UNORM_SRGB: u32 = 91;
}

/// Returns the byte size of one element of a DXGI format, or 0 for `UNKNOWN`.
pub const fn format_size(format: u32) -> u32 {
    use dxgi_format::*;
    match format {
        R32G32B32A32_TYPELESS | R32G32B32A32_FLOAT | R32G32B32A32_UINT | R32G32B32A32_SINT => 16,
        R32G32B32_FLOAT => 12,
        R16G16B16A16_FLOAT | R32G32_FLOAT | R32G32_UINT | R32G8X24_TYPELESS
        | D32_FLOAT_S8X24_UINT => 8,
        R10G10B10A2_UNORM | R11G11B10_FLOAT | R8G8B8A8_TYPELESS | R8G8B8A8_UNORM
        | R8G8B8A8_UNORM_SRGB | R8G8B8A8_UINT | R16G16_FLOAT | R16G16_SINT | R32_TYPELESS
        | D32_FLOAT | R32_FLOAT | R32_UINT | R32_SINT | R24G8_TYPELESS | D24_UNORM_S8_UINT
        | R24_UNORM_X8_TYPELESS | B8G8R8A8_UNORM | B8G8R8A8_UNORM_SRGB => 4,
        R8G8_UNORM | R16_FLOAT | D16_UNORM | R16_UNORM | R16_UINT => 2,
        R8_UNORM | R8_UINT => 1,
        _ => 0,
    }
}

/// Returns `true` for the typeless DXGI formats.
pub const fn is_typeless(format: u32) -> bool {
    use dxgi_format::*;
    matches!(
        format,
        R32G32B32A32_TYPELESS
            | R32G8X24_TYPELESS
            | R8G8B8A8_TYPELESS
            | R32_TYPELESS
            | R24G8_TYPELESS
    )
}

/// Returns `true` for the depth-stencil DXGI formats.
pub const fn is_depth(format: u32) -> bool {
    use dxgi_format::*;
    matches!(format, D32_FLOAT | D24_UNORM_S8_UINT | D16_UNORM | D32_FLOAT_S8X24_UINT)
}

/// `D3D11_USAGE`
pub mod usage {
    pub const DEFAULT: u32 = 0;
    pub const IMMUTABLE: u32 = 1;
    pub const DYNAMIC: u32 = 2;
    pub const STAGING: u32 = 3;
}

/// `D3D11_BIND_FLAG`
pub mod bind {
    pub const VERTEX_BUFFER: u32 = 0x1;
    pub const INDEX_BUFFER: u32 = 0x2;
    pub const CONSTANT_BUFFER: u32 = 0x4;
    pub const SHADER_RESOURCE: u32 = 0x8;
    pub const STREAM_OUTPUT: u32 = 0x10;
    pub const RENDER_TARGET: u32 = 0x20;
    pub const DEPTH_STENCIL: u32 = 0x40;
    pub const UNORDERED_ACCESS: u32 = 0x80;
}

/// `D3D11_CPU_ACCESS_FLAG`
pub mod cpu_access {
    pub const WRITE: u32 = 0x1_0000;
    pub const READ: u32 = 0x2_0000;
}

/// `D3D11_RESOURCE_MISC_FLAG`
pub mod misc {
    pub const TEXTURECUBE: u32 = 0x4;
    pub const BUFFER_ALLOW_RAW_VIEWS: u32 = 0x20;
    pub const BUFFER_STRUCTURED: u32 = 0x40;
}

/// `D3D11_SRV_DIMENSION`
pub mod srv_dimension {
    pub const UNKNOWN: u32 = 0;
    pub const BUFFER: u32 = 1;
    pub const TEXTURE1D: u32 = 2;
    pub const TEXTURE1DARRAY: u32 = 3;
    pub const TEXTURE2D: u32 = 4;
    pub const TEXTURE2DARRAY: u32 = 5;
    pub const TEXTURE2DMS: u32 = 6;
    pub const TEXTURE2DMSARRAY: u32 = 7;
    pub const TEXTURE3D: u32 = 8;
    pub const TEXTURECUBE: u32 = 9;
    pub const TEXTURECUBEARRAY: u32 = 10;
    pub const BUFFEREX: u32 = 11;
}

/// `D3D11_UAV_DIMENSION`
pub mod uav_dimension {
    pub const UNKNOWN: u32 = 0;
    pub const BUFFER: u32 = 1;
    pub const TEXTURE1D: u32 = 2;
    pub const TEXTURE1DARRAY: u32 = 3;
    pub const TEXTURE2D: u32 = 4;
    pub const TEXTURE2DARRAY: u32 = 5;
    pub const TEXTURE3D: u32 = 8;
}

/// `D3D11_RTV_DIMENSION`
pub mod rtv_dimension {
    pub const UNKNOWN: u32 = 0;
    pub const BUFFER: u32 = 1;
    pub const TEXTURE1D: u32 = 2;
    pub const TEXTURE1DARRAY: u32 = 3;
    pub const TEXTURE2D: u32 = 4;
    pub const TEXTURE2DARRAY: u32 = 5;
    pub const TEXTURE2DMS: u32 = 6;
    pub const TEXTURE2DMSARRAY: u32 = 7;
    pub const TEXTURE3D: u32 = 8;
}

/// `D3D11_DSV_DIMENSION`
pub mod dsv_dimension {
    pub const UNKNOWN: u32 = 0;
    pub const TEXTURE1D: u32 = 1;
    pub const TEXTURE1DARRAY: u32 = 2;
    pub const TEXTURE2D: u32 = 3;
    pub const TEXTURE2DARRAY: u32 = 4;
    pub const TEXTURE2DMS: u32 = 5;
    pub const TEXTURE2DMSARRAY: u32 = 6;
}

/// `D3D11_BUFFEREX_SRV_FLAG` / `D3D11_BUFFER_UAV_FLAG`
pub mod buffer_view_flags {
    pub const RAW: u32 = 0x1;
}

/// `D3D11_FILTER`, built from its min/mag/mip bits.
pub mod filter {
    pub const MIP_LINEAR: u32 = 0x1;
    pub const MAG_LINEAR: u32 = 0x4;
    pub const MIN_LINEAR: u32 = 0x10;
    pub const ANISOTROPIC: u32 = 0x55;
    pub const COMPARISON: u32 = 0x80;
}

/// `D3D11_TEXTURE_ADDRESS_MODE`
pub mod address_mode {
    pub const WRAP: u32 = 1;
    pub const MIRROR: u32 = 2;
    pub const CLAMP: u32 = 3;
    pub const BORDER: u32 = 4;
    pub const MIRROR_ONCE: u32 = 5;
}

/// `D3D11_COMPARISON_FUNC`
pub mod comparison {
    pub const NEVER: u32 = 1;
    pub const LESS: u32 = 2;
    pub const EQUAL: u32 = 3;
    pub const LESS_EQUAL: u32 = 4;
    pub const GREATER: u32 = 5;
    pub const NOT_EQUAL: u32 = 6;
    pub const GREATER_EQUAL: u32 = 7;
    pub const ALWAYS: u32 = 8;
}

/// `D3D11_STENCIL_OP`
pub mod stencil_op {
    pub const KEEP: u32 = 1;
    pub const ZERO: u32 = 2;
    pub const REPLACE: u32 = 3;
    pub const INCR_SAT: u32 = 4;
    pub const DECR_SAT: u32 = 5;
    pub const INVERT: u32 = 6;
    pub const INCR: u32 = 7;
    pub const DECR: u32 = 8;
}

/// `D3D11_BLEND`
pub mod blend {
    pub const ZERO: u32 = 1;
    pub const ONE: u32 = 2;
    pub const SRC_COLOR: u32 = 3;
    pub const INV_SRC_COLOR: u32 = 4;
    pub const SRC_ALPHA: u32 = 5;
    pub const INV_SRC_ALPHA: u32 = 6;
    pub const DEST_ALPHA: u32 = 7;
    pub const INV_DEST_ALPHA: u32 = 8;
    pub const DEST_COLOR: u32 = 9;
    pub const INV_DEST_COLOR: u32 = 10;
    pub const SRC_ALPHA_SAT: u32 = 11;
    pub const BLEND_FACTOR: u32 = 14;
    pub const INV_BLEND_FACTOR: u32 = 15;
}

/// `D3D11_BLEND_OP`
pub mod blend_op {
    pub const ADD: u32 = 1;
    pub const SUBTRACT: u32 = 2;
    pub const REV_SUBTRACT: u32 = 3;
    pub const MIN: u32 = 4;
    pub const MAX: u32 = 5;
}

/// `D3D11_CULL_MODE`
pub mod cull_mode {
    pub const NONE: u32 = 1;
    pub const FRONT: u32 = 2;
    pub const BACK: u32 = 3;
}

/// `D3D11_FILL_MODE`
pub mod fill_mode {
    pub const WIREFRAME: u32 = 2;
    pub const SOLID: u32 = 3;
}

/// `D3D11_PRIMITIVE_TOPOLOGY`
pub mod topology {
    pub const POINTLIST: u32 = 1;
    pub const LINELIST: u32 = 2;
    pub const LINESTRIP: u32 = 3;
    pub const TRIANGLELIST: u32 = 4;
    pub const TRIANGLESTRIP: u32 = 5;
    /// `D3D11_PRIMITIVE_TOPOLOGY_1_CONTROL_POINT_PATCHLIST`; n control points is this + n - 1.
    pub const CONTROL_POINT_PATCHLIST_1: u32 = 33;
}

/// `D3D11_INPUT_CLASSIFICATION`
pub mod input_classification {
    pub const PER_VERTEX_DATA: u32 = 0;
    pub const PER_INSTANCE_DATA: u32 = 1;
}

/// `D3D11_CLEAR_FLAG`
pub mod clear {
    pub const DEPTH: u32 = 0x1;
    pub const STENCIL: u32 = 0x2;
}

/// Resource limits.
pub mod limits {
    pub const COMMONSHADER_CONSTANT_BUFFER_API_SLOT_COUNT: u32 = 14;
    pub const COMMONSHADER_INPUT_RESOURCE_SLOT_COUNT: u32 = 128;
    pub const COMMONSHADER_SAMPLER_SLOT_COUNT: u32 = 16;
    pub const PS_CS_UAV_REGISTER_COUNT: u32 = 8;
    pub const SIMULTANEOUS_RENDER_TARGET_COUNT: u32 = 8;
    pub const IA_VERTEX_INPUT_RESOURCE_SLOT_COUNT: u32 = 32;
    pub const REQ_TEXTURE2D_U_OR_V_DIMENSION: u32 = 16384;
    pub const REQ_TEXTURE3D_U_V_OR_W_DIMENSION: u32 = 2048;
    pub const REQ_TEXTURE2D_ARRAY_AXIS_DIMENSION: u32 = 2048;
    pub const REQ_CONSTANT_BUFFER_ELEMENT_COUNT: u32 = 4096;
}

/// `D3D11_BUFFER_DESC`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BufferDesc {
    pub byte_width: u32,
    pub usage: u32,
    pub bind_flags: u32,
    pub cpu_access_flags: u32,
    pub misc_flags: u32,
    pub structure_byte_stride: u32,
}

/// The texture dimension a native texture was created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureDimension {
    Texture1D,
    Texture2D,
    Texture3D,
}

/// `D3D11_TEXTURE{1D,2D,3D}_DESC` folded into one layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureDesc {
    pub dimension: TextureDimension,
    pub width: u32,
    pub height: u32,
    /// Depth for 3D textures, array size otherwise.
    pub depth_or_array_size: u32,
    pub mip_levels: u32,
    pub format: u32,
    pub sample_count: u32,
    pub usage: u32,
    pub bind_flags: u32,
    pub cpu_access_flags: u32,
    pub misc_flags: u32,
}

/// `D3D11_SAMPLER_DESC`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerDesc {
    pub filter: u32,
    pub address_u: u32,
    pub address_v: u32,
    pub address_w: u32,
    pub mip_lod_bias: f32,
    pub max_anisotropy: u32,
    pub comparison_func: u32,
    pub border_color: [f32; 4],
    pub min_lod: f32,
    pub max_lod: f32,
}

/// One `D3D11_INPUT_ELEMENT_DESC`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputElementDesc {
    pub semantic_name: String,
    pub semantic_index: u32,
    pub format: u32,
    pub input_slot: u32,
    pub aligned_byte_offset: u32,
    pub input_slot_class: u32,
    pub instance_data_step_rate: u32,
}

/// `D3D11_RASTERIZER_DESC`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterizerDesc {
    pub fill_mode: u32,
    pub cull_mode: u32,
    pub front_counter_clockwise: bool,
    pub depth_bias: i32,
    pub depth_bias_clamp: f32,
    pub slope_scaled_depth_bias: f32,
    pub depth_clip_enable: bool,
    pub scissor_enable: bool,
    pub multisample_enable: bool,
    pub antialiased_line_enable: bool,
}

/// `D3D11_RENDER_TARGET_BLEND_DESC`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTargetBlendDesc {
    pub blend_enable: bool,
    pub src_blend: u32,
    pub dest_blend: u32,
    pub blend_op: u32,
    pub src_blend_alpha: u32,
    pub dest_blend_alpha: u32,
    pub blend_op_alpha: u32,
    pub render_target_write_mask: u8,
}

/// `D3D11_BLEND_DESC`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlendDesc {
    pub alpha_to_coverage_enable: bool,
    pub independent_blend_enable: bool,
    pub render_target: [RenderTargetBlendDesc; 8],
}

/// `D3D11_DEPTH_STENCILOP_DESC`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthStencilOpDesc {
    pub stencil_fail_op: u32,
    pub stencil_depth_fail_op: u32,
    pub stencil_pass_op: u32,
    pub stencil_func: u32,
}

/// `D3D11_DEPTH_STENCIL_DESC`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthStencilDesc {
    pub depth_enable: bool,
    /// `D3D11_DEPTH_WRITE_MASK`: 0 (zero) or 1 (all).
    pub depth_write_mask: u32,
    pub depth_func: u32,
    pub stencil_enable: bool,
    pub stencil_read_mask: u8,
    pub stencil_write_mask: u8,
    pub front_face: DepthStencilOpDesc,
    pub back_face: DepthStencilOpDesc,
}

/// The native description of any of the four view kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewDesc {
    /// The view format.
    pub format: u32,
    /// The `D3D11_*_DIMENSION` value of the view kind.
    pub view_dimension: u32,
    /// Mip (or first element for buffers).
    pub first: u32,
    /// Mip count (SRV only; 1 otherwise) or element count for buffers.
    pub count: u32,
    pub first_array_slice: u32,
    pub array_size: u32,
    /// `D3D11_BUFFEREX_SRV_FLAG_RAW` / `D3D11_BUFFER_UAV_FLAG_RAW`.
    pub flags: u32,
}
