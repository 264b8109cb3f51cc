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

//! Translation tables from the backend-agnostic RHI enums to native D3D11/DXGI values.

use super::native::{self, *};
use ember_core::renderer::api::{
    AddressMode, BindFlags, BlendFactor, BlendOperation, BlendState, BufferDesc, BufferSubType,
    ClearFlags, CompareFunction, CpuAccess, CullMode, DepthStencilState, FillMode, FilterMode,
    IndexFormat, InputLayout, PrimitiveTopology, RasterizerState, RenderTargetBlend,
    ResourceFormat, SamplerDesc, StencilFaceState, StencilOperation, TextureDesc, TextureType,
    Usage, VertexFormat, VertexStepMode, ViewDimension, ViewKind,
};
use ember_core::renderer::traits::{NativeViewDesc, NativeViewRange};

/// A trait for converting RHI types into their native D3D11 counterpart.
pub trait IntoD3d11<T> {
    /// Consumes self and converts it into a D3D11-compatible value.
    fn into_d3d11(self) -> T;
}

// --- Formats ---

impl IntoD3d11<u32> for ResourceFormat {
    fn into_d3d11(self) -> u32 {
        use dxgi_format as f;
        match self {
            ResourceFormat::Unknown => f::UNKNOWN,
            ResourceFormat::R32G32B32A32Typeless => f::R32G32B32A32_TYPELESS,
            ResourceFormat::R32G32B32A32Float => f::R32G32B32A32_FLOAT,
            ResourceFormat::R32G32B32A32Uint => f::R32G32B32A32_UINT,
            ResourceFormat::R32G32B32Float => f::R32G32B32_FLOAT,
            ResourceFormat::R16G16B16A16Float => f::R16G16B16A16_FLOAT,
            ResourceFormat::R32G32Float => f::R32G32_FLOAT,
            ResourceFormat::R32G8X24Typeless => f::R32G8X24_TYPELESS,
            ResourceFormat::D32FloatS8X24Uint => f::D32_FLOAT_S8X24_UINT,
            ResourceFormat::R8G8B8A8Typeless => f::R8G8B8A8_TYPELESS,
            ResourceFormat::R8G8B8A8Unorm => f::R8G8B8A8_UNORM,
            ResourceFormat::R8G8B8A8UnormSrgb => f::R8G8B8A8_UNORM_SRGB,
            ResourceFormat::R8G8B8A8Uint => f::R8G8B8A8_UINT,
            ResourceFormat::B8G8R8A8Unorm => f::B8G8R8A8_UNORM,
            ResourceFormat::B8G8R8A8UnormSrgb => f::B8G8R8A8_UNORM_SRGB,
            ResourceFormat::R10G10B10A2Unorm => f::R10G10B10A2_UNORM,
            ResourceFormat::R11G11B10Float => f::R11G11B10_FLOAT,
            ResourceFormat::R16G16Float => f::R16G16_FLOAT,
            ResourceFormat::R32Typeless => f::R32_TYPELESS,
            ResourceFormat::R32Float => f::R32_FLOAT,
            ResourceFormat::R32Uint => f::R32_UINT,
            ResourceFormat::R32Sint => f::R32_SINT,
            ResourceFormat::D32Float => f::D32_FLOAT,
            ResourceFormat::R24G8Typeless => f::R24G8_TYPELESS,
            ResourceFormat::D24UnormS8Uint => f::D24_UNORM_S8_UINT,
            ResourceFormat::R24UnormX8Typeless => f::R24_UNORM_X8_TYPELESS,
            ResourceFormat::R8G8Unorm => f::R8G8_UNORM,
            ResourceFormat::R16Float => f::R16_FLOAT,
            ResourceFormat::R16Unorm => f::R16_UNORM,
            ResourceFormat::R16Uint => f::R16_UINT,
            ResourceFormat::D16Unorm => f::D16_UNORM,
            ResourceFormat::R8Unorm => f::R8_UNORM,
            ResourceFormat::R8Uint => f::R8_UINT,
        }
    }
}

impl IntoD3d11<u32> for VertexFormat {
    fn into_d3d11(self) -> u32 {
        use dxgi_format as f;
        match self {
            VertexFormat::Uint8x4 => f::R8G8B8A8_UINT,
            VertexFormat::Unorm8x4 => f::R8G8B8A8_UNORM,
            VertexFormat::Sint16x2 => f::R16G16_SINT,
            VertexFormat::Float16x2 => f::R16G16_FLOAT,
            VertexFormat::Float16x4 => f::R16G16B16A16_FLOAT,
            VertexFormat::Float32 => f::R32_FLOAT,
            VertexFormat::Float32x2 => f::R32G32_FLOAT,
            VertexFormat::Float32x3 => f::R32G32B32_FLOAT,
            VertexFormat::Float32x4 => f::R32G32B32A32_FLOAT,
            VertexFormat::Uint32 => f::R32_UINT,
            VertexFormat::Uint32x2 => f::R32G32_UINT,
            VertexFormat::Uint32x4 => f::R32G32B32A32_UINT,
            VertexFormat::Sint32 => f::R32_SINT,
            VertexFormat::Sint32x4 => f::R32G32B32A32_SINT,
        }
    }
}

impl IntoD3d11<u32> for IndexFormat {
    fn into_d3d11(self) -> u32 {
        match self {
            IndexFormat::Uint16 => dxgi_format::R16_UINT,
            IndexFormat::Uint32 => dxgi_format::R32_UINT,
        }
    }
}

// --- Resource flags ---

impl IntoD3d11<u32> for Usage {
    fn into_d3d11(self) -> u32 {
        match self {
            Usage::Default => usage::DEFAULT,
            Usage::Immutable => usage::IMMUTABLE,
            Usage::Dynamic => usage::DYNAMIC,
            Usage::Staging => usage::STAGING,
        }
    }
}

impl IntoD3d11<u32> for BindFlags {
    fn into_d3d11(self) -> u32 {
        let table = [
            (BindFlags::VERTEX_BUFFER, bind::VERTEX_BUFFER),
            (BindFlags::INDEX_BUFFER, bind::INDEX_BUFFER),
            (BindFlags::CONSTANT_BUFFER, bind::CONSTANT_BUFFER),
            (BindFlags::SHADER_RESOURCE, bind::SHADER_RESOURCE),
            (BindFlags::SHADER_RW_RESOURCE, bind::UNORDERED_ACCESS),
            (BindFlags::RENDER_TARGET, bind::RENDER_TARGET),
            (BindFlags::DEPTH_STENCIL, bind::DEPTH_STENCIL),
            (BindFlags::STREAM_OUTPUT, bind::STREAM_OUTPUT),
        ];
        table
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .fold(0, |acc, (_, native)| acc | native)
    }
}

impl IntoD3d11<u32> for CpuAccess {
    fn into_d3d11(self) -> u32 {
        match self {
            CpuAccess::None => 0,
            CpuAccess::Read => cpu_access::READ,
            CpuAccess::Write => cpu_access::WRITE,
            CpuAccess::ReadWrite => cpu_access::READ | cpu_access::WRITE,
        }
    }
}

impl IntoD3d11<u32> for BufferSubType {
    fn into_d3d11(self) -> u32 {
        match self {
            BufferSubType::Structured => misc::BUFFER_STRUCTURED,
            BufferSubType::Raw => misc::BUFFER_ALLOW_RAW_VIEWS,
            BufferSubType::None | BufferSubType::Typed => 0,
        }
    }
}

impl IntoD3d11<u32> for ClearFlags {
    fn into_d3d11(self) -> u32 {
        let mut flags = 0;
        if self.contains(ClearFlags::DEPTH) {
            flags |= clear::DEPTH;
        }
        if self.contains(ClearFlags::STENCIL) {
            flags |= clear::STENCIL;
        }
        flags
    }
}

// --- Resource descriptors ---

impl IntoD3d11<native::BufferDesc> for &BufferDesc<'_> {
    fn into_d3d11(self) -> native::BufferDesc {
        native::BufferDesc {
            byte_width: self.size_in_bytes().min(u32::MAX as u64) as u32,
            usage: self.usage.into_d3d11(),
            bind_flags: self.bind_flags.into_d3d11(),
            cpu_access_flags: self.cpu_access.into_d3d11(),
            misc_flags: self.sub_type.into_d3d11(),
            structure_byte_stride: if self.sub_type == BufferSubType::Structured {
                self.element_size
            } else {
                0
            },
        }
    }
}

impl IntoD3d11<native::TextureDesc> for &TextureDesc<'_> {
    fn into_d3d11(self) -> native::TextureDesc {
        let (dimension, depth_or_array_size, misc_flags) = match self.texture_type {
            TextureType::Texture1D => (TextureDimension::Texture1D, self.array_count, 0),
            TextureType::Texture3D => (TextureDimension::Texture3D, self.depth, 0),
            TextureType::TextureCube => (
                TextureDimension::Texture2D,
                self.array_count,
                misc::TEXTURECUBE,
            ),
            TextureType::Texture2D | TextureType::Unknown => {
                (TextureDimension::Texture2D, self.array_count, 0)
            }
        };
        native::TextureDesc {
            dimension,
            width: self.width,
            height: if dimension == TextureDimension::Texture1D {
                1
            } else {
                self.height
            },
            depth_or_array_size,
            mip_levels: self.resolved_mip_count(),
            format: self.format.into_d3d11(),
            sample_count: self.sample_count,
            usage: self.usage.into_d3d11(),
            bind_flags: self.bind_flags.into_d3d11(),
            cpu_access_flags: self.cpu_access.into_d3d11(),
            misc_flags,
        }
    }
}

// --- Samplers ---

impl IntoD3d11<u32> for AddressMode {
    fn into_d3d11(self) -> u32 {
        match self {
            AddressMode::Wrap => address_mode::WRAP,
            AddressMode::Mirror => address_mode::MIRROR,
            AddressMode::Clamp => address_mode::CLAMP,
            AddressMode::Border => address_mode::BORDER,
            AddressMode::MirrorOnce => address_mode::MIRROR_ONCE,
        }
    }
}

/// Builds a `D3D11_FILTER` from the three filter modes.
pub fn sampler_filter(desc: &SamplerDesc<'_>) -> u32 {
    let mut value = if desc.max_anisotropy > 1 {
        filter::ANISOTROPIC
    } else {
        let mut bits = 0;
        if desc.min_filter == FilterMode::Linear {
            bits |= filter::MIN_LINEAR;
        }
        if desc.mag_filter == FilterMode::Linear {
            bits |= filter::MAG_LINEAR;
        }
        if desc.mip_filter == FilterMode::Linear {
            bits |= filter::MIP_LINEAR;
        }
        bits
    };
    if desc.compare.is_some() {
        value |= filter::COMPARISON;
    }
    value
}

impl IntoD3d11<native::SamplerDesc> for &SamplerDesc<'_> {
    fn into_d3d11(self) -> native::SamplerDesc {
        native::SamplerDesc {
            filter: sampler_filter(self),
            address_u: self.address_u.into_d3d11(),
            address_v: self.address_v.into_d3d11(),
            address_w: self.address_w.into_d3d11(),
            mip_lod_bias: self.mip_lod_bias,
            max_anisotropy: self.max_anisotropy,
            comparison_func: self.compare.unwrap_or(CompareFunction::Never).into_d3d11(),
            border_color: self.border_color,
            min_lod: self.min_lod,
            max_lod: self.max_lod,
        }
    }
}

// --- Views ---

impl IntoD3d11<u32> for (ViewKind, ViewDimension) {
    fn into_d3d11(self) -> u32 {
        let (kind, dimension) = self;
        match kind {
            ViewKind::ShaderResource => match dimension {
                ViewDimension::Unknown => srv_dimension::UNKNOWN,
                ViewDimension::Buffer => srv_dimension::BUFFEREX,
                ViewDimension::Texture1D => srv_dimension::TEXTURE1D,
                ViewDimension::Texture1DArray => srv_dimension::TEXTURE1DARRAY,
                ViewDimension::Texture2D => srv_dimension::TEXTURE2D,
                ViewDimension::Texture2DArray => srv_dimension::TEXTURE2DARRAY,
                ViewDimension::Texture2DMS => srv_dimension::TEXTURE2DMS,
                ViewDimension::Texture2DMSArray => srv_dimension::TEXTURE2DMSARRAY,
                ViewDimension::Texture3D => srv_dimension::TEXTURE3D,
                ViewDimension::TextureCube => srv_dimension::TEXTURECUBE,
                ViewDimension::TextureCubeArray => srv_dimension::TEXTURECUBEARRAY,
            },
            ViewKind::ShaderRWResource => match dimension {
                ViewDimension::Buffer => uav_dimension::BUFFER,
                ViewDimension::Texture1D => uav_dimension::TEXTURE1D,
                ViewDimension::Texture1DArray => uav_dimension::TEXTURE1DARRAY,
                ViewDimension::Texture2D => uav_dimension::TEXTURE2D,
                ViewDimension::Texture2DArray => uav_dimension::TEXTURE2DARRAY,
                ViewDimension::Texture3D => uav_dimension::TEXTURE3D,
                _ => uav_dimension::UNKNOWN,
            },
            ViewKind::RenderTarget => match dimension {
                ViewDimension::Buffer => rtv_dimension::BUFFER,
                ViewDimension::Texture1D => rtv_dimension::TEXTURE1D,
                ViewDimension::Texture1DArray => rtv_dimension::TEXTURE1DARRAY,
                ViewDimension::Texture2D => rtv_dimension::TEXTURE2D,
                ViewDimension::Texture2DArray => rtv_dimension::TEXTURE2DARRAY,
                ViewDimension::Texture2DMS => rtv_dimension::TEXTURE2DMS,
                ViewDimension::Texture2DMSArray => rtv_dimension::TEXTURE2DMSARRAY,
                ViewDimension::Texture3D => rtv_dimension::TEXTURE3D,
                _ => rtv_dimension::UNKNOWN,
            },
            ViewKind::DepthStencil => match dimension {
                ViewDimension::Texture1D => dsv_dimension::TEXTURE1D,
                ViewDimension::Texture1DArray => dsv_dimension::TEXTURE1DARRAY,
                ViewDimension::Texture2D => dsv_dimension::TEXTURE2D,
                ViewDimension::Texture2DArray => dsv_dimension::TEXTURE2DARRAY,
                ViewDimension::Texture2DMS => dsv_dimension::TEXTURE2DMS,
                ViewDimension::Texture2DMSArray => dsv_dimension::TEXTURE2DMSARRAY,
                _ => dsv_dimension::UNKNOWN,
            },
        }
    }
}

impl IntoD3d11<native::ViewDesc> for &NativeViewDesc {
    fn into_d3d11(self) -> native::ViewDesc {
        let view_dimension = (self.kind, self.dimension).into_d3d11();
        let format = self.format.into_d3d11();
        match self.range {
            NativeViewRange::Texture {
                first_mip,
                mip_count,
                first_array,
                array_count,
                first_depth,
                depth_count,
            } => {
                // 3D views address depth slices where other views address array slices.
                let (first_array_slice, array_size) = if self.dimension == ViewDimension::Texture3D {
                    (first_depth, depth_count)
                } else {
                    (first_array, array_count)
                };
                native::ViewDesc {
                    format,
                    view_dimension,
                    first: first_mip,
                    count: mip_count,
                    first_array_slice,
                    array_size,
                    flags: 0,
                }
            }
            NativeViewRange::Buffer {
                first_element,
                element_count,
                sub_type,
            } => native::ViewDesc {
                format,
                view_dimension,
                first: first_element,
                count: element_count,
                first_array_slice: 0,
                array_size: 1,
                flags: if sub_type == BufferSubType::Raw {
                    buffer_view_flags::RAW
                } else {
                    0
                },
            },
        }
    }
}

// --- Pipeline states ---

impl IntoD3d11<u32> for PrimitiveTopology {
    fn into_d3d11(self) -> u32 {
        match self {
            PrimitiveTopology::PointList => topology::POINTLIST,
            PrimitiveTopology::LineList => topology::LINELIST,
            PrimitiveTopology::LineStrip => topology::LINESTRIP,
            PrimitiveTopology::TriangleList => topology::TRIANGLELIST,
            PrimitiveTopology::TriangleStrip => topology::TRIANGLESTRIP,
            PrimitiveTopology::PatchList(points) => {
                topology::CONTROL_POINT_PATCHLIST_1 + points.max(1) as u32 - 1
            }
        }
    }
}

impl IntoD3d11<u32> for CompareFunction {
    fn into_d3d11(self) -> u32 {
        match self {
            CompareFunction::Never => comparison::NEVER,
            CompareFunction::Less => comparison::LESS,
            CompareFunction::Equal => comparison::EQUAL,
            CompareFunction::LessEqual => comparison::LESS_EQUAL,
            CompareFunction::Greater => comparison::GREATER,
            CompareFunction::NotEqual => comparison::NOT_EQUAL,
            CompareFunction::GreaterEqual => comparison::GREATER_EQUAL,
            CompareFunction::Always => comparison::ALWAYS,
        }
    }
}

impl IntoD3d11<u32> for StencilOperation {
    fn into_d3d11(self) -> u32 {
        match self {
            StencilOperation::Keep => stencil_op::KEEP,
            StencilOperation::Zero => stencil_op::ZERO,
            StencilOperation::Replace => stencil_op::REPLACE,
            StencilOperation::IncrementClamp => stencil_op::INCR_SAT,
            StencilOperation::DecrementClamp => stencil_op::DECR_SAT,
            StencilOperation::Invert => stencil_op::INVERT,
            StencilOperation::IncrementWrap => stencil_op::INCR,
            StencilOperation::DecrementWrap => stencil_op::DECR,
        }
    }
}

impl IntoD3d11<u32> for BlendFactor {
    fn into_d3d11(self) -> u32 {
        match self {
            BlendFactor::Zero => blend::ZERO,
            BlendFactor::One => blend::ONE,
            BlendFactor::SrcColor => blend::SRC_COLOR,
            BlendFactor::InvSrcColor => blend::INV_SRC_COLOR,
            BlendFactor::SrcAlpha => blend::SRC_ALPHA,
            BlendFactor::InvSrcAlpha => blend::INV_SRC_ALPHA,
            BlendFactor::DestAlpha => blend::DEST_ALPHA,
            BlendFactor::InvDestAlpha => blend::INV_DEST_ALPHA,
            BlendFactor::DestColor => blend::DEST_COLOR,
            BlendFactor::InvDestColor => blend::INV_DEST_COLOR,
            BlendFactor::SrcAlphaSat => blend::SRC_ALPHA_SAT,
            BlendFactor::BlendFactor => blend::BLEND_FACTOR,
            BlendFactor::InvBlendFactor => blend::INV_BLEND_FACTOR,
        }
    }
}

impl IntoD3d11<u32> for BlendOperation {
    fn into_d3d11(self) -> u32 {
        match self {
            BlendOperation::Add => blend_op::ADD,
            BlendOperation::Subtract => blend_op::SUBTRACT,
            BlendOperation::ReverseSubtract => blend_op::REV_SUBTRACT,
            BlendOperation::Min => blend_op::MIN,
            BlendOperation::Max => blend_op::MAX,
        }
    }
}

impl IntoD3d11<u32> for CullMode {
    fn into_d3d11(self) -> u32 {
        match self {
            CullMode::None => cull_mode::NONE,
            CullMode::Front => cull_mode::FRONT,
            CullMode::Back => cull_mode::BACK,
        }
    }
}

impl IntoD3d11<u32> for FillMode {
    fn into_d3d11(self) -> u32 {
        match self {
            FillMode::Solid => fill_mode::SOLID,
            FillMode::Wireframe => fill_mode::WIREFRAME,
        }
    }
}

impl IntoD3d11<RasterizerDesc> for &RasterizerState {
    fn into_d3d11(self) -> RasterizerDesc {
        RasterizerDesc {
            fill_mode: self.fill_mode.into_d3d11(),
            cull_mode: self.cull_mode.into_d3d11(),
            front_counter_clockwise: self.front_counter_clockwise,
            depth_bias: self.depth_bias,
            depth_bias_clamp: self.depth_bias_clamp,
            slope_scaled_depth_bias: self.slope_scaled_depth_bias,
            depth_clip_enable: self.depth_clip,
            scissor_enable: self.scissor,
            multisample_enable: self.multisample,
            antialiased_line_enable: self.antialiased_lines,
        }
    }
}

impl IntoD3d11<RenderTargetBlendDesc> for &RenderTargetBlend {
    fn into_d3d11(self) -> RenderTargetBlendDesc {
        RenderTargetBlendDesc {
            blend_enable: self.enabled,
            src_blend: self.src_color.into_d3d11(),
            dest_blend: self.dst_color.into_d3d11(),
            blend_op: self.color_op.into_d3d11(),
            src_blend_alpha: self.src_alpha.into_d3d11(),
            dest_blend_alpha: self.dst_alpha.into_d3d11(),
            blend_op_alpha: self.alpha_op.into_d3d11(),
            render_target_write_mask: self.write_mask.bits(),
        }
    }
}

impl IntoD3d11<BlendDesc> for &BlendState {
    fn into_d3d11(self) -> BlendDesc {
        BlendDesc {
            alpha_to_coverage_enable: self.alpha_to_coverage,
            independent_blend_enable: self.independent,
            render_target: std::array::from_fn(|slot| self.render_targets[slot].into_d3d11()),
        }
    }
}

impl IntoD3d11<DepthStencilOpDesc> for &StencilFaceState {
    fn into_d3d11(self) -> DepthStencilOpDesc {
        DepthStencilOpDesc {
            stencil_fail_op: self.fail_op.into_d3d11(),
            stencil_depth_fail_op: self.depth_fail_op.into_d3d11(),
            stencil_pass_op: self.pass_op.into_d3d11(),
            stencil_func: self.compare.into_d3d11(),
        }
    }
}

impl IntoD3d11<DepthStencilDesc> for &DepthStencilState {
    fn into_d3d11(self) -> DepthStencilDesc {
        DepthStencilDesc {
            depth_enable: self.depth_test,
            depth_write_mask: u32::from(self.depth_write),
            depth_func: self.depth_compare.into_d3d11(),
            stencil_enable: self.stencil_test,
            stencil_read_mask: self.stencil_read_mask,
            stencil_write_mask: self.stencil_write_mask,
            front_face: (&self.front_face).into_d3d11(),
            back_face: (&self.back_face).into_d3d11(),
        }
    }
}

impl IntoD3d11<Vec<InputElementDesc>> for &InputLayout {
    fn into_d3d11(self) -> Vec<InputElementDesc> {
        self.elements
            .iter()
            .zip(self.resolved_offsets())
            .map(|(element, offset)| InputElementDesc {
                semantic_name: element.semantic.to_string(),
                semantic_index: element.semantic_index,
                format: element.format.into_d3d11(),
                input_slot: element.input_slot,
                aligned_byte_offset: offset,
                input_slot_class: match element.step_mode {
                    VertexStepMode::Vertex => input_classification::PER_VERTEX_DATA,
                    VertexStepMode::Instance => input_classification::PER_INSTANCE_DATA,
                },
                instance_data_step_rate: element.instance_step_rate,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::renderer::api::{InputElement, NativeHandle, ColorWrites};

    #[test]
    fn test_bind_flags_map_rw_to_unordered_access() {
        let flags = BindFlags::SHADER_RESOURCE | BindFlags::SHADER_RW_RESOURCE;
        let native: u32 = flags.into_d3d11();
        assert_eq!(native, bind::SHADER_RESOURCE | bind::UNORDERED_ACCESS);
        assert_eq!(BindFlags::empty().into_d3d11(), 0);
    }

    #[test]
    fn test_structured_buffer_desc_carries_stride_and_misc_flag() {
        let desc = BufferDesc {
            element_size: 12,
            element_count: 8,
            bind_flags: BindFlags::SHADER_RESOURCE,
            sub_type: BufferSubType::Structured,
            ..Default::default()
        };
        let native: native::BufferDesc = (&desc).into_d3d11();
        assert_eq!(native.byte_width, 96);
        assert_eq!(native.structure_byte_stride, 12);
        assert_eq!(native.misc_flags, misc::BUFFER_STRUCTURED);

        let raw = BufferDesc {
            sub_type: BufferSubType::Raw,
            element_size: 4,
            ..desc
        };
        let native: native::BufferDesc = (&raw).into_d3d11();
        assert_eq!(native.structure_byte_stride, 0);
        assert_eq!(native.misc_flags, misc::BUFFER_ALLOW_RAW_VIEWS);
    }

    #[test]
    fn test_cube_texture_is_a_flagged_2d_array() {
        let desc = TextureDesc {
            texture_type: TextureType::TextureCube,
            width: 64,
            height: 64,
            array_count: 12,
            mip_count: 0,
            ..Default::default()
        };
        let native: native::TextureDesc = (&desc).into_d3d11();
        assert_eq!(native.dimension, TextureDimension::Texture2D);
        assert_eq!(native.depth_or_array_size, 12);
        assert_eq!(native.misc_flags, misc::TEXTURECUBE);
        assert_eq!(native.mip_levels, 7);
    }

    #[test]
    fn test_sampler_filter_bits() {
        let linear = SamplerDesc::default();
        assert_eq!(sampler_filter(&linear), 0x15);

        let point = SamplerDesc {
            min_filter: FilterMode::Point,
            mag_filter: FilterMode::Point,
            mip_filter: FilterMode::Point,
            ..Default::default()
        };
        assert_eq!(sampler_filter(&point), 0);

        let shadow = SamplerDesc {
            compare: Some(CompareFunction::LessEqual),
            ..Default::default()
        };
        let native: native::SamplerDesc = (&shadow).into_d3d11();
        assert_eq!(native.filter, 0x95);
        assert_eq!(native.comparison_func, comparison::LESS_EQUAL);

        let aniso = SamplerDesc {
            max_anisotropy: 16,
            ..Default::default()
        };
        assert_eq!(sampler_filter(&aniso), filter::ANISOTROPIC);
    }

    #[test]
    fn test_view_dimensions_per_kind() {
        assert_eq!(
            (ViewKind::ShaderResource, ViewDimension::TextureCubeArray).into_d3d11(),
            srv_dimension::TEXTURECUBEARRAY
        );
        assert_eq!(
            (ViewKind::ShaderResource, ViewDimension::Buffer).into_d3d11(),
            srv_dimension::BUFFEREX
        );
        assert_eq!(
            (ViewKind::DepthStencil, ViewDimension::Texture2D).into_d3d11(),
            dsv_dimension::TEXTURE2D
        );
        assert_eq!(
            (ViewKind::DepthStencil, ViewDimension::Texture3D).into_d3d11(),
            dsv_dimension::UNKNOWN
        );
        assert_eq!(
            (ViewKind::ShaderRWResource, ViewDimension::Texture2DMS).into_d3d11(),
            uav_dimension::UNKNOWN
        );
    }

    #[test]
    fn test_raw_buffer_view_sets_raw_flag() {
        let desc = NativeViewDesc {
            kind: ViewKind::ShaderResource,
            resource: NativeHandle(7),
            format: ResourceFormat::R32Typeless,
            dimension: ViewDimension::Buffer,
            range: NativeViewRange::Buffer {
                first_element: 0,
                element_count: 256,
                sub_type: BufferSubType::Raw,
            },
        };
        let native: native::ViewDesc = (&desc).into_d3d11();
        assert_eq!(native.format, dxgi_format::R32_TYPELESS);
        assert_eq!(native.view_dimension, srv_dimension::BUFFEREX);
        assert_eq!(native.count, 256);
        assert_eq!(native.flags, buffer_view_flags::RAW);
    }

    #[test]
    fn test_patch_list_topology() {
        assert_eq!(PrimitiveTopology::PatchList(1).into_d3d11(), 33);
        assert_eq!(PrimitiveTopology::PatchList(3).into_d3d11(), 35);
        assert_eq!(PrimitiveTopology::TriangleList.into_d3d11(), topology::TRIANGLELIST);
    }

    #[test]
    fn test_input_layout_offsets_are_resolved() {
        let layout = InputLayout {
            elements: vec![
                InputElement::per_vertex("POSITION", 0, VertexFormat::Float32x3),
                InputElement::per_vertex("TEXCOORD", 0, VertexFormat::Float32x2),
            ],
            topology: PrimitiveTopology::TriangleList,
        };
        let native: Vec<InputElementDesc> = (&layout).into_d3d11();
        assert_eq!(native[0].aligned_byte_offset, 0);
        assert_eq!(native[0].format, dxgi_format::R32G32B32_FLOAT);
        assert_eq!(native[1].aligned_byte_offset, 12);
        assert_eq!(native[1].semantic_name, "TEXCOORD");
    }

    #[test]
    fn test_blend_state_write_mask() {
        let mut state = BlendState::default();
        state.render_targets[0] = RenderTargetBlend::alpha_blending();
        state.render_targets[1].write_mask = ColorWrites::RED;
        let native: BlendDesc = (&state).into_d3d11();
        assert!(native.render_target[0].blend_enable);
        assert_eq!(native.render_target[0].src_blend, blend::SRC_ALPHA);
        assert_eq!(native.render_target[0].render_target_write_mask, 0xF);
        assert_eq!(native.render_target[1].render_target_write_mask, 0x1);
    }
}
