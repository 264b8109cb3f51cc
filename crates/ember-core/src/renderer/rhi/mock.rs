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

//! An in-memory backend for the unit tests of this crate.
//!
//! Native objects are plain counters. The compiler treats its source as a list of
//! `kind name slot [count]` lines and reflects exactly those.

use crate::asset::InMemoryAssets;
use crate::math::Extent2D;
use crate::renderer::api::*;
use crate::renderer::error::BackendError;
use crate::renderer::traits::{NativeContext, NativeDevice, NativeSwapChain, NativeViewDesc, ShaderCompilerBackend};
use crate::renderer::Device;
use raw_window_handle::RawWindowHandle;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

pub(crate) type CallLog = Arc<Mutex<Vec<String>>>;

#[derive(Debug, Default)]
pub(crate) struct MockDevice {
    next: AtomicU64,
    live: Mutex<HashSet<u64>>,
    pub(crate) calls: CallLog,
}

impl MockDevice {
    fn alloc(&self) -> NativeHandle {
        let id = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        self.live.lock().unwrap().insert(id);
        NativeHandle(id)
    }

    pub(crate) fn live_count(&self) -> usize {
        self.live.lock().unwrap().len()
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl NativeDevice for MockDevice {
    fn create_buffer(&self, _desc: &BufferDesc<'_>) -> Result<NativeHandle, BackendError> {
        Ok(self.alloc())
    }

    fn create_texture(&self, _desc: &TextureDesc<'_>, _subresources: &[SubresourceData]) -> Result<NativeHandle, BackendError> {
        Ok(self.alloc())
    }

    fn create_sampler(&self, _desc: &SamplerDesc<'_>) -> Result<NativeHandle, BackendError> {
        Ok(self.alloc())
    }

    fn create_shader(&self, _bytecode: &ShaderBytecode) -> Result<NativeHandle, BackendError> {
        Ok(self.alloc())
    }

    fn create_view(&self, _desc: &NativeViewDesc) -> Result<NativeHandle, BackendError> {
        Ok(self.alloc())
    }

    fn create_input_layout(&self, _layout: &InputLayout, _vs: &ShaderBytecode) -> Result<NativeHandle, BackendError> {
        Ok(self.alloc())
    }

    fn create_rasterizer_state(&self, _state: &RasterizerState) -> Result<NativeHandle, BackendError> {
        Ok(self.alloc())
    }

    fn create_blend_state(&self, _state: &BlendState) -> Result<NativeHandle, BackendError> {
        Ok(self.alloc())
    }

    fn create_depth_stencil_state(&self, state: &DepthStencilState) -> Result<NativeHandle, BackendError> {
        // Lets tests exercise a failure in the middle of a pipeline build.
        if state.stencil_test && state.stencil_read_mask == 0 {
            return Err(BackendError::new(0x8007_0057, "E_INVALIDARG"));
        }
        Ok(self.alloc())
    }

    fn create_swap_chain(&self, _desc: &SwapChainDesc<'_>, _window: RawWindowHandle, _size: Extent2D) -> Result<NativeSwapChain, BackendError> {
        let handle = self.alloc();
        Ok(NativeSwapChain {
            handle,
            back_buffer: NativeHandle(handle.0 | 1 << 63),
        })
    }

    fn present(&self, _swap_chain: NativeHandle, _sync_interval: u32) -> Result<(), BackendError> {
        Ok(())
    }

    fn immediate_context(&self) -> Box<dyn NativeContext> {
        Box::new(MockContext {
            deferred: false,
            calls: self.calls.clone(),
            next_list: 1 << 40,
        })
    }

    fn create_deferred_context(&self) -> Result<Box<dyn NativeContext>, BackendError> {
        Ok(Box::new(MockContext {
            deferred: true,
            calls: self.calls.clone(),
            next_list: 1 << 41,
        }))
    }

    fn release(&self, handle: NativeHandle) {
        self.live.lock().unwrap().remove(&handle.0);
    }
}

#[derive(Debug)]
pub(crate) struct MockContext {
    deferred: bool,
    calls: CallLog,
    next_list: u64,
}

impl MockContext {
    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl NativeContext for MockContext {
    fn is_deferred(&self) -> bool {
        self.deferred
    }

    fn set_render_targets(&mut self, render_targets: &[NativeHandle], depth_stencil: Option<NativeHandle>) {
        self.log(format!("set_render_targets {} {}", render_targets.len(), depth_stencil.is_some()));
    }

    fn set_shader(&mut self, stage: ShaderStage, shader: Option<NativeHandle>) {
        self.log(format!("set_shader {stage:?} {}", shader.is_some()));
    }

    fn set_input_layout(&mut self, _input_layout: Option<NativeHandle>) {
        self.log("set_input_layout".to_string());
    }

    fn set_primitive_topology(&mut self, topology: PrimitiveTopology) {
        self.log(format!("set_primitive_topology {topology:?}"));
    }

    fn set_rasterizer_state(&mut self, _state: NativeHandle) {
        self.log("set_rasterizer_state".to_string());
    }

    fn set_blend_state(&mut self, _state: NativeHandle, _blend_factor: [f32; 4], _sample_mask: u32) {
        self.log("set_blend_state".to_string());
    }

    fn set_depth_stencil_state(&mut self, _state: NativeHandle, _stencil_ref: u32) {
        self.log("set_depth_stencil_state".to_string());
    }

    fn set_viewports(&mut self, viewports: &[Viewport]) {
        self.log(format!("set_viewports {}", viewports.len()));
    }

    fn set_scissor_rects(&mut self, rects: &[ScissorRect]) {
        self.log(format!("set_scissor_rects {}", rects.len()));
    }

    fn set_vertex_buffers(&mut self, start_slot: u32, buffers: &[NativeHandle], strides: &[u32], _offsets: &[u32]) {
        self.log(format!("set_vertex_buffers {start_slot} {} {strides:?}", buffers.len()));
    }

    fn set_index_buffer(&mut self, _buffer: NativeHandle, format: IndexFormat, _offset: u32) {
        self.log(format!("set_index_buffer {format:?}"));
    }

    fn set_constant_buffers(&mut self, stage: ShaderStage, start_slot: u32, buffers: &[NativeHandle]) {
        self.log(format!("set_constant_buffers {stage:?} {start_slot} {}", buffers.len()));
    }

    fn set_shader_resources(&mut self, stage: ShaderStage, start_slot: u32, views: &[NativeHandle]) {
        self.log(format!("set_shader_resources {stage:?} {start_slot} {}", views.len()));
    }

    fn set_unordered_access_views(&mut self, stage: ShaderStage, start_slot: u32, views: &[NativeHandle], initial_counts: &[u32]) {
        self.log(format!(
            "set_unordered_access_views {stage:?} {start_slot} {} {initial_counts:?}",
            views.len()
        ));
    }

    fn set_samplers(&mut self, stage: ShaderStage, start_slot: u32, samplers: &[NativeHandle]) {
        self.log(format!("set_samplers {stage:?} {start_slot} {}", samplers.len()));
    }

    fn clear_render_target(&mut self, _view: NativeHandle, color: [f32; 4]) {
        self.log(format!("clear_render_target {color:?}"));
    }

    fn clear_depth_stencil(&mut self, _view: NativeHandle, flags: ClearFlags, depth: f32, stencil: u8) {
        self.log(format!("clear_depth_stencil {} {depth} {stencil}", flags.bits()));
    }

    fn draw(&mut self, vertex_count: u32, start_vertex: u32) {
        self.log(format!("draw {vertex_count} {start_vertex}"));
    }

    fn draw_indexed(&mut self, index_count: u32, start_index: u32, base_vertex: i32) {
        self.log(format!("draw_indexed {index_count} {start_index} {base_vertex}"));
    }

    fn write_discard(&mut self, _buffer: NativeHandle, data: &[u8]) -> Result<(), BackendError> {
        self.log(format!("write_discard {}", data.len()));
        Ok(())
    }

    fn finish_command_list(&mut self) -> Result<NativeHandle, BackendError> {
        self.next_list += 1;
        Ok(NativeHandle(self.next_list))
    }

    fn execute_command_list(&mut self, command_list: NativeHandle) -> Result<(), BackendError> {
        self.log(format!("execute_command_list {}", command_list.0));
        Ok(())
    }
}

#[derive(Debug, Default)]
pub(crate) struct MockCompiler;

impl ShaderCompilerBackend for MockCompiler {
    fn compile(&self, source: &str, source_name: &str, _entry_point: &str, _profile: &str) -> Result<Vec<u8>, BackendError> {
        if source.contains("error") {
            return Err(BackendError::new(0x8000_4005, format!("{source_name}(1): syntax error")));
        }
        Ok(source.as_bytes().to_vec())
    }

    fn reflect(&self, bytecode: &[u8]) -> Result<Vec<ReflectedBinding>, BackendError> {
        let text = std::str::from_utf8(bytecode).map_err(|e| BackendError::new(1, e.to_string()))?;
        text.lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                let parts: Vec<_> = line.split_whitespace().collect();
                let (input_type, dimension) = match parts[0] {
                    "cbuffer" => (ShaderInputType::ConstantBuffer, ViewDimension::Unknown),
                    "texture2d" => (ShaderInputType::Texture, ViewDimension::Texture2D),
                    "rwtexture2d" => (ShaderInputType::RwTyped, ViewDimension::Texture2D),
                    "structured" => (ShaderInputType::Structured, ViewDimension::Buffer),
                    "sampler" => (ShaderInputType::Sampler, ViewDimension::Unknown),
                    other => return Err(BackendError::new(1, format!("unknown kind {other}"))),
                };
                Ok(ReflectedBinding {
                    name: parts[1].to_string(),
                    input_type,
                    dimension,
                    bind_point: parts[2].parse().unwrap(),
                    bind_count: parts.get(3).map_or(1, |count| count.parse().unwrap()),
                })
            })
            .collect()
    }
}

/// Creates a device over a fresh [`MockDevice`] with leak checking and validation on.
pub(crate) fn mock_device() -> (Device, Arc<MockDevice>) {
    let native = Arc::new(MockDevice::default());
    let settings = DeviceSettings {
        leak_check: true,
        validate_bindings: true,
        ..Default::default()
    };
    let device = Device::new(
        native.clone(),
        Arc::new(MockCompiler),
        Arc::new(InMemoryAssets::new()),
        settings,
    );
    (device, native)
}

/// Compiles `source` for `stage` on `device`.
pub(crate) fn shader(device: &Device, stage: ShaderStage, source: &str) -> Arc<crate::renderer::rhi::Shader> {
    device
        .create_shader(&ShaderInfo {
            label: Some("mock"),
            stage,
            source: ShaderSource::Code(source.to_string().into()),
            entry_point: "main",
        })
        .unwrap()
}
