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
use common::{device, device_with_assets, inline_shader};
use ember_core::asset::{CpuImage, InMemoryAssets};
use ember_core::math::Extent2D;
use ember_core::renderer::api::*;
use ember_core::renderer::rhi::{DeviceObject, ViewDesc};
use ember_core::renderer::{ResourceError, ShaderError};
use ember_infra::graphics::soft::native::{misc, srv_dimension};
use ember_infra::platform::HeadlessWindow;
use std::sync::Arc;

#[test]
fn test_constant_buffer_size_must_be_aligned() {
    let (device, soft) = device();
    let result = device.create_buffer(&BufferDesc {
        element_size: 20,
        element_count: 1,
        bind_flags: BindFlags::CONSTANT_BUFFER,
        ..Default::default()
    });
    assert!(matches!(result, Err(ResourceError::InvalidDescriptor { .. })));
    assert_eq!(soft.live_object_count(), 0);
    assert_eq!(device.tracked_object_count(), 0);
}

#[test]
fn test_cube_texture_views() -> Result<()> {
    let (device, soft) = device();
    let cube = device.create_texture(&TextureDesc {
        texture_type: TextureType::TextureCube,
        width: 64,
        height: 64,
        mip_count: 0,
        array_count: 12,
        ..Default::default()
    })?;
    assert_eq!(cube.mip_count(), 7);

    let native = soft.texture_desc(cube.native_handle()).unwrap();
    assert_eq!(native.misc_flags & misc::TEXTURECUBE, misc::TEXTURECUBE);
    assert_eq!(native.depth_or_array_size, 12);

    let srv = device.create_shader_resource_view(&ViewDesc::texture(&cube))?;
    let (_, view) = soft.view_desc(srv.native_handle()).unwrap();
    assert_eq!(view.view_dimension, srv_dimension::TEXTURECUBEARRAY);
    assert_eq!(view.count, 7);
    Ok(())
}

#[test]
fn test_mip_chain_initial_data_lands_per_subresource() -> Result<()> {
    let (device, soft) = device();
    // 4x4 + 2x2 + 1x1 texels of RGBA8, each mip filled with its own index.
    let mut data = vec![0u8; 16 * 4];
    data.extend(vec![1u8; 4 * 4]);
    data.extend(vec![2u8; 4]);
    let texture = device.create_texture(&TextureDesc {
        width: 4,
        height: 4,
        mip_count: 3,
        usage: Usage::Immutable,
        initial_data: Some(&data),
        ..Default::default()
    })?;

    for mip in 0..3u32 {
        let texels = soft.texture_subresource(texture.native_handle(), mip, 0).unwrap();
        assert!(texels.iter().all(|b| u32::from(*b) == mip), "mip {mip}");
    }
    Ok(())
}

#[test]
fn test_structured_buffer_view_uses_the_stride() -> Result<()> {
    let (device, soft) = device();
    let buffer = device.create_buffer(&BufferDesc {
        element_size: 32,
        element_count: 10,
        bind_flags: BindFlags::SHADER_RESOURCE | BindFlags::SHADER_RW_RESOURCE,
        sub_type: BufferSubType::Structured,
        ..Default::default()
    })?;
    assert_eq!(soft.buffer_desc(buffer.native_handle()).unwrap().structure_byte_stride, 32);

    let view = device.create_shader_rw_resource_view(
        &ViewDesc::buffer(&buffer, ResourceFormat::Unknown).with_buffer_range(BufferRange {
            first_element: 2,
            element_count: Some(4),
        }),
    )?;
    let (_, native) = soft.view_desc(view.native_handle()).unwrap();
    assert_eq!((native.first, native.count), (2, 4));
    Ok(())
}

#[test]
fn test_view_without_bind_flag_is_rejected() -> Result<()> {
    let (device, soft) = device();
    let texture = device.create_texture(&TextureDesc {
        width: 8,
        height: 8,
        ..Default::default()
    })?;
    let before = soft.live_object_count();
    let result = device.create_render_target_view(&ViewDesc::texture(&texture));
    assert!(result.is_err());
    assert_eq!(soft.live_object_count(), before);
    Ok(())
}

#[test]
fn test_shader_compile_errors_carry_diagnostics() {
    let (device, _soft) = device();
    let result = device.create_shader(&ShaderInfo {
        label: Some("broken"),
        stage: ShaderStage::Pixel,
        source: ShaderSource::Code("float4 main() : SV_Target { return 1; ".into()),
        entry_point: "main",
    });
    match result {
        Err(ResourceError::Shader(ShaderError::CompilationError { label, details })) => {
            assert_eq!(label, "broken");
            assert!(details.contains("error"), "{details}");
        }
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn test_out_of_range_register_is_a_compile_error() {
    let (device, soft) = device();
    let result = device.create_shader(&ShaderInfo {
        label: Some("far_register"),
        stage: ShaderStage::Pixel,
        source: ShaderSource::Code(
            "Texture2D tex : register(t4294967295); \
             float4 main() : SV_Target { return tex.Load(int3(0, 0, 0)); }"
                .into(),
        ),
        entry_point: "main",
    });
    match result {
        Err(ResourceError::Shader(ShaderError::CompilationError { details, .. })) => {
            assert!(details.contains("only 128 are available"), "{details}");
        }
        other => panic!("unexpected result {other:?}"),
    }
    assert_eq!(soft.live_object_count(), 0);
}

#[test]
fn test_shaders_load_through_the_asset_layer() -> Result<()> {
    let assets = Arc::new(InMemoryAssets::new());
    assets.insert_text(
        "shaders/solid.hlsl",
        "cbuffer Color { float4 tint; }; float4 main() : SV_Target { return tint; }",
    );
    let (device, soft) = device_with_assets(assets);
    let shader = device.create_shader(&ShaderInfo {
        label: None,
        stage: ShaderStage::Pixel,
        source: ShaderSource::File("shaders/solid.hlsl".into()),
        entry_point: "main",
    })?;

    let layout = shader.resource_layout();
    assert_eq!(layout.slot_count(ResourceCategory::ConstantBuffer), 1);
    assert_eq!(
        soft.shader_info(shader.native_handle()),
        Some((ShaderStage::Pixel, "main".to_string()))
    );

    let missing = device.create_shader(&ShaderInfo {
        label: None,
        stage: ShaderStage::Pixel,
        source: ShaderSource::File("shaders/missing.hlsl".into()),
        entry_point: "main",
    });
    assert!(matches!(missing, Err(ResourceError::Shader(ShaderError::LoadError { .. }))));
    Ok(())
}

#[test]
fn test_texture_from_image() -> Result<()> {
    let assets = Arc::new(InMemoryAssets::new());
    assets.insert_image(
        "textures/checker.png",
        CpuImage {
            width: 2,
            height: 1,
            pixels: vec![255, 255, 255, 255, 0, 0, 0, 255],
        },
    );
    let (device, soft) = device_with_assets(assets);
    let texture = device.load_texture("textures/checker.png", BindFlags::SHADER_RESOURCE)?;
    assert_eq!(texture.label(), Some("textures/checker.png"));
    assert_eq!(
        soft.texture_subresource(texture.native_handle(), 0, 0).unwrap(),
        vec![255, 255, 255, 255, 0, 0, 0, 255]
    );
    assert!(device.load_texture("textures/missing.png", BindFlags::SHADER_RESOURCE).is_err());
    Ok(())
}

#[test]
fn test_swap_chain_presents_into_a_headless_window() -> Result<()> {
    let (device, soft) = device();
    let window = HeadlessWindow::new(320, 240);
    let swap_chain = device.create_swap_chain(&SwapChainDesc::default(), &window)?;
    assert_eq!(swap_chain.size(), Extent2D::new(320, 240));
    assert_eq!(
        soft.object_kind(swap_chain.back_buffer().native_handle()),
        Some("Texture")
    );

    let rtv = device.create_render_target_view(&ViewDesc::texture(swap_chain.back_buffer()))?;
    assert!(!rtv.native_handle().is_null());

    swap_chain.present()?;
    swap_chain.present()?;
    assert_eq!(soft.present_count(swap_chain.native_handle()), Some(2));
    Ok(())
}

#[test]
fn test_shutdown_reports_leaked_objects() -> Result<()> {
    let (device, soft) = device();
    let kept = device.create_buffer(&BufferDesc {
        label: Some("kept".into()),
        element_size: 16,
        element_count: 1,
        bind_flags: BindFlags::VERTEX_BUFFER,
        ..Default::default()
    })?;
    let texture = device.create_texture(&TextureDesc::default())?;
    let view = device.create_shader_resource_view(&ViewDesc::texture(&texture))?;
    drop(view);
    drop(texture);
    let _shader = inline_shader(
        &device,
        ShaderStage::Pixel,
        "float4 main() : SV_Target { return 0; }",
        "main",
    );
    drop(_shader);

    let report = device.shutdown();
    assert_eq!(report.leaks.len(), 1);
    assert_eq!(report.count_of(DeviceObjectType::Buffer), 1);
    assert_eq!(report.leaks[0].label.as_deref(), Some("kept"));
    assert_eq!(report.leaks[0].external_references, 1);
    assert_eq!(soft.live_object_count(), 1);

    drop(kept);
    assert_eq!(soft.live_object_count(), 0);
    assert!(device.shutdown().is_empty());
    Ok(())
}
