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
use ember_core::math::LinearRgba;
use ember_core::renderer::api::*;
use ember_core::renderer::rhi::{
    record_concurrently, FrameBuffer, FrameBufferDesc, RecordingPass, Texture, ViewDesc,
};
use ember_core::renderer::traits::NativeDevice;
use ember_core::renderer::{Device, RenderError, ResourceError};
use ember_infra::graphics::soft::Command;
use std::sync::Arc;

fn color_frame_buffer(device: &Device, size: u32) -> Result<(Arc<Texture>, Arc<FrameBuffer>)> {
    let texture = device.create_texture(&TextureDesc {
        label: Some("color".into()),
        width: size,
        height: size,
        bind_flags: BindFlags::RENDER_TARGET | BindFlags::SHADER_RESOURCE,
        ..Default::default()
    })?;
    let rtv = device.create_render_target_view(&ViewDesc::texture(&texture))?;
    let frame_buffer = device.create_frame_buffer(&FrameBufferDesc {
        label: Some("main".into()),
        render_targets: vec![rtv],
        depth_stencil: None,
    })?;
    Ok((texture, frame_buffer))
}

#[test]
fn test_immediate_clear_writes_texels() -> Result<()> {
    let (device, soft) = device();
    let (texture, frame_buffer) = color_frame_buffer(&device, 4)?;

    let context = device.immediate_context();
    context.bind_frame_buffer(&frame_buffer);
    context.clear_frame_buffer(&frame_buffer, Some(LinearRgba::new(1.0, 0.0, 0.0, 1.0)), None, None);

    let texels = soft.texture_subresource(texture.native_handle(), 0, 0).unwrap();
    assert_eq!(texels.len(), 4 * 4 * 4);
    assert!(texels.chunks_exact(4).all(|texel| texel == [255, 0, 0, 255]));
    Ok(())
}

#[test]
fn test_caller_allocated_deferred_context_records_a_list() -> Result<()> {
    let (device, soft) = device();
    let (texture, frame_buffer) = color_frame_buffer(&device, 2)?;

    let list = device.wrap_command_list(Some("external"), soft.create_deferred_context()?)?;
    assert!(list.is_deferred());
    list.bind_frame_buffer(&frame_buffer);
    list.clear_frame_buffer(&frame_buffer, Some(LinearRgba::new(0.0, 1.0, 0.0, 1.0)), None, None);
    list.finish_command_list()?;
    device.execute_command_lists(&[list.clone()])?;

    let texels = soft.texture_subresource(texture.native_handle(), 0, 0).unwrap();
    assert!(texels.chunks_exact(4).all(|texel| texel == [0, 255, 0, 255]));

    let immediate = device.wrap_command_list(Some("not deferred"), soft.immediate_context());
    assert!(matches!(immediate, Err(ResourceError::InvalidDescriptor { .. })));
    Ok(())
}

#[test]
fn test_depth_and_stencil_clear_independently() -> Result<()> {
    let (device, soft) = device();
    let depth = device.create_texture(&TextureDesc {
        label: Some("depth".into()),
        width: 2,
        height: 2,
        format: ResourceFormat::D24UnormS8Uint,
        bind_flags: BindFlags::DEPTH_STENCIL,
        ..Default::default()
    })?;
    let dsv = device.create_depth_stencil_view(&ViewDesc::texture(&depth))?;
    let frame_buffer = device.create_frame_buffer(&FrameBufferDesc {
        depth_stencil: Some(dsv),
        ..Default::default()
    })?;

    let context = device.immediate_context();
    context.clear_frame_buffer(&frame_buffer, None, None, Some(7));
    let texels = soft.texture_subresource(depth.native_handle(), 0, 0).unwrap();
    assert_eq!(u32::from_le_bytes([texels[0], texels[1], texels[2], texels[3]]), 0x0700_0000);

    context.clear_frame_buffer(&frame_buffer, None, Some(1.0), None);
    let texels = soft.texture_subresource(depth.native_handle(), 0, 0).unwrap();
    assert_eq!(u32::from_le_bytes([texels[0], texels[1], texels[2], texels[3]]), 0x07FF_FFFF);
    Ok(())
}

#[test]
fn test_command_list_executes_on_the_immediate_context() -> Result<()> {
    let (device, soft) = device();
    let (texture, frame_buffer) = color_frame_buffer(&device, 2)?;
    let pipeline = textured_pipeline(&device);
    let constants = constant_buffer(&device, 16);

    let list = device.create_command_list(Some("pass"))?;
    list.bind_frame_buffer(&frame_buffer);
    list.bind_pipeline(&pipeline);
    list.clear_frame_buffer(&frame_buffer, Some(LinearRgba::new(0.0, 0.0, 1.0, 1.0)), None, None);
    list.update_dynamic_buffer_pod(&constants, &[1.0f32, 2.0, 3.0, 4.0])?;
    list.draw(3, 0);

    // Nothing lands before execution.
    assert!(soft.texture_subresource(texture.native_handle(), 0, 0).unwrap().iter().all(|b| *b == 0));
    assert_eq!(soft.buffer_contents(constants.native_handle()).unwrap(), vec![0u8; 16]);

    list.finish_command_list()?;
    assert!(list.has_command_list());
    soft.take_executed_commands();
    device.execute_command_lists(&[list.clone()])?;

    assert!(!list.has_command_list());
    let texels = soft.texture_subresource(texture.native_handle(), 0, 0).unwrap();
    assert!(texels.chunks_exact(4).all(|texel| texel == [0, 0, 255, 255]));
    let bytes = soft.buffer_contents(constants.native_handle()).unwrap();
    assert_eq!(bytemuck::pod_collect_to_vec::<u8, f32>(&bytes), vec![1.0, 2.0, 3.0, 4.0]);

    let executed = soft.take_executed_commands();
    assert!(matches!(executed.first(), Some(Command::ExecuteCommandList(_))));
    assert_eq!(
        executed.last(),
        Some(&Command::Draw {
            vertex_count: 3,
            start_vertex: 0
        })
    );
    Ok(())
}

#[test]
fn test_unfinished_command_list_is_rejected_but_others_run() -> Result<()> {
    let (device, soft) = device();
    let (texture, frame_buffer) = color_frame_buffer(&device, 2)?;

    let open = device.create_command_list(Some("open"))?;
    open.draw(3, 0);

    let closed = device.create_command_list(Some("closed"))?;
    closed.clear_frame_buffer(&frame_buffer, Some(LinearRgba::new(0.0, 1.0, 0.0, 1.0)), None, None);
    closed.finish_command_list()?;

    let result = device.execute_command_lists(&[open, closed]);
    assert!(matches!(result, Err(RenderError::CommandListNotClosed { .. })));
    let texels = soft.texture_subresource(texture.native_handle(), 0, 0).unwrap();
    assert_eq!(&texels[..4], &[0, 255, 0, 255]);
    Ok(())
}

#[test]
fn test_immediate_context_cannot_finish_a_command_list() {
    let (device, _soft) = device();
    let result = device.immediate_context().finish_command_list();
    assert!(matches!(result, Err(RenderError::WrongContextKind(_))));
}

#[test]
fn test_write_discard_rejects_static_buffers() -> Result<()> {
    let (device, _soft) = device();
    let buffer = device.create_buffer(&BufferDesc {
        element_size: 16,
        element_count: 1,
        bind_flags: BindFlags::CONSTANT_BUFFER,
        ..Default::default()
    })?;
    let result = device.immediate_context().update_dynamic_buffer(&buffer, &[0u8; 16]);
    assert!(result.is_err());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_record_command_lists_concurrently() -> Result<()> {
    let (device, soft) = device();
    let mut targets = Vec::new();
    let mut passes = Vec::new();
    for i in 0..4u8 {
        let (texture, frame_buffer) = color_frame_buffer(&device, 2)?;
        let list = device.create_command_list(Some(format!("pass {i}").as_str()))?;
        let value = f32::from(i) / 3.0;
        passes.push(RecordingPass::new(list, move |ctx| {
            ctx.bind_frame_buffer(&frame_buffer);
            ctx.clear_frame_buffer(&frame_buffer, Some(LinearRgba::new(value, value, value, 1.0)), None, None);
            ctx.draw(6, 0);
        }));
        targets.push(texture);
    }

    let lists = record_concurrently(passes).await?;
    assert_eq!(lists.len(), 4);
    assert!(lists.iter().all(|list| list.has_command_list()));
    device.execute_command_lists(&lists)?;

    let draws = soft
        .executed_commands()
        .iter()
        .filter(|command| matches!(command, Command::Draw { .. }))
        .count();
    assert_eq!(draws, 4);
    for (i, texture) in targets.iter().enumerate() {
        let texels = soft.texture_subresource(texture.native_handle(), 0, 0).unwrap();
        let expected = (i as f32 / 3.0 * 255.0).round() as u8;
        assert_eq!(texels[0], expected, "target {i}");
    }
    Ok(())
}
