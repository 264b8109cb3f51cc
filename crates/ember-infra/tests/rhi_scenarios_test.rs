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

mod common;

use anyhow::Result;
use common::{constant_buffer, device, textured_pipeline};
use ember_core::renderer::api::*;
use ember_core::renderer::rhi::{ValidationIssueKind, ViewDesc};
use ember_core::renderer::ResourceError;
use ember_infra::graphics::soft::native::{
    blend, blend_op, comparison, cull_mode, dxgi_format, fill_mode, srv_dimension, stencil_op, uav_dimension,
};

#[test]
fn test_texture_supports_every_view_kind() -> Result<()> {
    let (device, soft) = device();
    let texture = device.create_texture(&TextureDesc {
        label: Some("scene color".into()),
        width: 256,
        height: 256,
        format: ResourceFormat::R8G8B8A8Unorm,
        bind_flags: BindFlags::SHADER_RESOURCE | BindFlags::SHADER_RW_RESOURCE | BindFlags::RENDER_TARGET,
        ..Default::default()
    })?;

    let srv = device.create_shader_resource_view(&ViewDesc::texture(&texture))?;
    let uav = device.create_shader_rw_resource_view(&ViewDesc::texture(&texture))?;
    let rtv = device.create_render_target_view(&ViewDesc::texture(&texture))?;

    for handle in [srv.native_handle(), uav.native_handle(), rtv.native_handle()] {
        assert!(!handle.is_null());
    }
    let (_, srv_desc) = soft.view_desc(srv.native_handle()).unwrap();
    assert_eq!(srv_desc.view_dimension, srv_dimension::TEXTURE2D);
    assert_eq!(srv_desc.format, dxgi_format::R8G8B8A8_UNORM);
    let (_, uav_desc) = soft.view_desc(uav.native_handle()).unwrap();
    assert_eq!(uav_desc.view_dimension, uav_dimension::TEXTURE2D);
    assert_eq!(soft.object_kind(rtv.native_handle()), Some("RenderTargetView"));
    Ok(())
}

#[test]
fn test_raw_buffer_views_require_r32_typeless() -> Result<()> {
    let (device, soft) = device();
    let buffer = device.create_buffer(&BufferDesc {
        label: Some("raw".into()),
        element_size: 4,
        element_count: 256,
        bind_flags: BindFlags::SHADER_RESOURCE | BindFlags::SHADER_RW_RESOURCE,
        sub_type: BufferSubType::Raw,
        ..Default::default()
    })?;

    let raw = device.create_shader_resource_view(&ViewDesc::buffer(&buffer, ResourceFormat::R32Typeless))?;
    let (_, native) = soft.view_desc(raw.native_handle()).unwrap();
    assert_eq!(native.view_dimension, srv_dimension::BUFFEREX);
    assert_eq!(native.count, 256);

    let mismatched = device.create_shader_resource_view(&ViewDesc::buffer(&buffer, ResourceFormat::R32Float));
    assert!(matches!(mismatched, Err(ResourceError::Backend(_))));
    Ok(())
}

#[test]
fn test_pipeline_bindings_follow_reflection() {
    let (device, _soft) = device();
    let pipeline = textured_pipeline(&device);
    let bindings = pipeline.resource_bindings();

    for stage in ShaderStage::ALL {
        let tables = bindings.data().stage(stage);
        let expected: [usize; ResourceCategory::COUNT] = match stage {
            ShaderStage::Vertex => [1, 0, 0, 0],
            ShaderStage::Pixel => [0, 1, 0, 1],
            _ => [0, 0, 0, 0],
        };
        for category in ResourceCategory::ALL {
            assert_eq!(
                tables.slot_count(category),
                expected[category.index()],
                "{stage:?} {category:?}"
            );
        }
    }
}

#[test]
fn test_validation_reports_the_missing_sampler() -> Result<()> {
    let (device, _soft) = device();
    let pipeline = textured_pipeline(&device);
    let constants = constant_buffer(&device, 64);
    let texture = device.create_texture(&TextureDesc {
        width: 4,
        height: 4,
        ..Default::default()
    })?;
    let srv = device.create_shader_resource_view(&ViewDesc::texture(&texture))?;

    let mut bindings = pipeline.resource_bindings();
    bindings.set_constant_buffer(ShaderStage::Vertex, 0, &constants)?;
    bindings.set_shader_resource_by_name(ShaderStage::Pixel, "albedo", &srv)?;

    let report = pipeline.validate_bindings(&bindings);
    assert_eq!(report.len(), 1);
    let issue = &report.issues[0];
    assert_eq!(issue.stage, ShaderStage::Pixel);
    assert_eq!(issue.category, ResourceCategory::Sampler);
    assert_eq!(issue.slot, 0);
    assert_eq!(issue.kind, ValidationIssueKind::MissingBinding);
    assert_eq!(issue.variable, "albedo_sampler");

    let sampler = device.create_sampler(&SamplerDesc::default())?;
    bindings.set_sampler(ShaderStage::Pixel, 0, &sampler)?;
    assert!(pipeline.validate_bindings(&bindings).is_clean());
    Ok(())
}

#[test]
fn test_setting_an_unknown_name_leaves_bindings_untouched() -> Result<()> {
    let (device, _soft) = device();
    let pipeline = textured_pipeline(&device);
    let constants = constant_buffer(&device, 64);

    let mut bindings = pipeline.resource_bindings();
    bindings.set_constant_buffer(ShaderStage::Vertex, 0, &constants)?;
    let before = bindings.data().clone();

    assert!(bindings
        .set_constant_buffer_by_name(ShaderStage::Vertex, "DoesNotExist", &constants)
        .is_err());
    assert!(bindings
        .set_constant_buffer_by_name(ShaderStage::Geometry, "Transform", &constants)
        .is_err());
    assert_eq!(bindings.data(), &before);
    Ok(())
}

#[test]
fn test_pipeline_creates_native_states() {
    let (device, soft) = device();
    let pipeline = textured_pipeline(&device);
    let states = pipeline.native_states();
    assert_eq!(soft.object_kind(states.input_layout), Some("InputLayout"));
    assert_eq!(soft.object_kind(states.rasterizer), Some("RasterizerState"));
    assert_eq!(soft.object_kind(states.blend), Some("BlendState"));
    assert_eq!(soft.object_kind(states.depth_stencil), Some("DepthStencilState"));

    let elements = soft.input_layout(states.input_layout).unwrap();
    assert_eq!(elements[1].semantic_name, "TEXCOORD");
    assert_eq!(elements[1].aligned_byte_offset, 12);
}

#[test]
fn test_fixed_function_state_is_translated() -> Result<()> {
    let (device, soft) = device();
    let vs = common::inline_shader(&device, ShaderStage::Vertex, common::TEXTURED_VS, "vs_main");

    let mut desc = ember_core::renderer::rhi::PipelineDesc {
        label: Some("translucent".into()),
        input_layout: common::textured_input_layout(),
        rasterizer: RasterizerState {
            fill_mode: FillMode::Wireframe,
            cull_mode: CullMode::Front,
            depth_bias: -4,
            scissor: true,
            ..Default::default()
        },
        ..Default::default()
    }
    .with_shader(&vs);
    desc.blend.render_targets[0] = RenderTargetBlend {
        enabled: true,
        src_color: BlendFactor::SrcAlpha,
        dst_color: BlendFactor::InvSrcAlpha,
        color_op: BlendOperation::Add,
        src_alpha: BlendFactor::One,
        dst_alpha: BlendFactor::Zero,
        alpha_op: BlendOperation::Max,
        write_mask: ColorWrites::RED.union(ColorWrites::ALPHA),
    };
    desc.depth_stencil.depth_write = false;
    desc.depth_stencil.depth_compare = CompareFunction::GreaterEqual;
    desc.depth_stencil.stencil_test = true;
    desc.depth_stencil.stencil_read_mask = 0x0F;
    desc.depth_stencil.front_face.pass_op = StencilOperation::Replace;
    desc.depth_stencil.back_face.compare = CompareFunction::Never;

    let pipeline = device.create_pipeline(&desc)?;
    let states = pipeline.native_states();

    let rasterizer = soft.rasterizer_state(states.rasterizer).unwrap();
    assert_eq!(rasterizer.fill_mode, fill_mode::WIREFRAME);
    assert_eq!(rasterizer.cull_mode, cull_mode::FRONT);
    assert_eq!(rasterizer.depth_bias, -4);
    assert!(rasterizer.scissor_enable);

    let blend_desc = soft.blend_state(states.blend).unwrap();
    let target = blend_desc.render_target[0];
    assert!(target.blend_enable);
    assert_eq!(target.src_blend, blend::SRC_ALPHA);
    assert_eq!(target.dest_blend, blend::INV_SRC_ALPHA);
    assert_eq!(target.src_blend_alpha, blend::ONE);
    assert_eq!(target.dest_blend_alpha, blend::ZERO);
    assert_eq!(target.blend_op_alpha, blend_op::MAX);
    assert_eq!(target.render_target_write_mask, 0b1001);
    assert!(!blend_desc.render_target[1].blend_enable);

    let depth = soft.depth_stencil_state(states.depth_stencil).unwrap();
    assert!(depth.depth_enable);
    assert_eq!(depth.depth_write_mask, 0);
    assert_eq!(depth.depth_func, comparison::GREATER_EQUAL);
    assert!(depth.stencil_enable);
    assert_eq!(depth.stencil_read_mask, 0x0F);
    assert_eq!(depth.front_face.stencil_pass_op, stencil_op::REPLACE);
    assert_eq!(depth.back_face.stencil_func, comparison::NEVER);

    assert!(soft.rasterizer_state(states.blend).is_none());
    Ok(())
}

#[test]
fn test_input_layout_must_cover_the_vertex_signature() {
    let (device, _soft) = device();
    let vs = common::inline_shader(&device, ShaderStage::Vertex, common::TEXTURED_VS, "vs_main");
    let result = device.create_pipeline(
        &ember_core::renderer::rhi::PipelineDesc {
            input_layout: InputLayout {
                elements: vec![InputElement::per_vertex("POSITION", 0, VertexFormat::Float32x3)],
                topology: PrimitiveTopology::TriangleList,
            },
            ..Default::default()
        }
        .with_shader(&vs),
    );
    assert!(result.is_err());
}
