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

//! Immediate and deferred contexts of the software device.
//!
//! Every `NativeContext` call becomes a [`Command`]. The immediate context hands commands
//! straight to the device, which applies their effects; a deferred context buffers them
//! until `finish_command_list` turns the buffer into a command list object.

use super::conversions::IntoD3d11;
use super::device::SoftDevice;
use super::native::hresult;
use ember_core::renderer::api::{
    ClearFlags, IndexFormat, NativeHandle, PrimitiveTopology, ScissorRect, ShaderStage, Viewport,
};
use ember_core::renderer::error::BackendError;
use ember_core::renderer::traits::NativeContext;

/// One recorded or executed device context call, with native values.
///
/// Variants mirror the `ID3D11DeviceContext` method of the same name.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetRenderTargets {
        render_targets: Vec<NativeHandle>,
        depth_stencil: Option<NativeHandle>,
    },
    SetShader {
        stage: ShaderStage,
        shader: Option<NativeHandle>,
    },
    SetInputLayout(Option<NativeHandle>),
    /// A `D3D11_PRIMITIVE_TOPOLOGY` value.
    SetPrimitiveTopology(u32),
    SetRasterizerState(NativeHandle),
    SetBlendState {
        state: NativeHandle,
        blend_factor: [f32; 4],
        sample_mask: u32,
    },
    SetDepthStencilState {
        state: NativeHandle,
        stencil_ref: u32,
    },
    SetViewports(Vec<Viewport>),
    SetScissorRects(Vec<ScissorRect>),
    SetVertexBuffers {
        start_slot: u32,
        buffers: Vec<NativeHandle>,
        strides: Vec<u32>,
        offsets: Vec<u32>,
    },
    SetIndexBuffer {
        buffer: NativeHandle,
        /// A `DXGI_FORMAT` value.
        format: u32,
        offset: u32,
    },
    SetConstantBuffers {
        stage: ShaderStage,
        start_slot: u32,
        buffers: Vec<NativeHandle>,
    },
    SetShaderResources {
        stage: ShaderStage,
        start_slot: u32,
        views: Vec<NativeHandle>,
    },
    SetUnorderedAccessViews {
        stage: ShaderStage,
        start_slot: u32,
        views: Vec<NativeHandle>,
        initial_counts: Vec<u32>,
    },
    SetSamplers {
        stage: ShaderStage,
        start_slot: u32,
        samplers: Vec<NativeHandle>,
    },
    ClearRenderTarget {
        view: NativeHandle,
        color: [f32; 4],
    },
    ClearDepthStencil {
        view: NativeHandle,
        /// `D3D11_CLEAR_FLAG` bits.
        flags: u32,
        depth: f32,
        stencil: u8,
    },
    Draw {
        vertex_count: u32,
        start_vertex: u32,
    },
    DrawIndexed {
        index_count: u32,
        start_index: u32,
        base_vertex: i32,
    },
    /// A `Map(WRITE_DISCARD)`/copy/`Unmap` sequence.
    UpdateBuffer {
        buffer: NativeHandle,
        data: Vec<u8>,
    },
    /// Marks the replay of a command list on the immediate context.
    ExecuteCommandList(NativeHandle),
}

/// A device context of the software device.
#[derive(Debug)]
pub struct SoftContext {
    device: SoftDevice,
    deferred: bool,
    recorded: Vec<Command>,
}

impl SoftContext {
    pub(crate) fn new(device: SoftDevice, deferred: bool) -> Self {
        Self {
            device,
            deferred,
            recorded: Vec::new(),
        }
    }

    /// Returns the commands a deferred context has recorded since its last finish.
    pub fn recorded(&self) -> &[Command] {
        &self.recorded
    }

    fn submit(&mut self, command: Command) {
        if self.deferred {
            self.recorded.push(command);
        } else if let Err(e) = self.device.execute(command) {
            log::warn!("SoftContext: command failed: {e}");
        }
    }
}

impl NativeContext for SoftContext {
    fn is_deferred(&self) -> bool {
        self.deferred
    }

    fn set_render_targets(&mut self, render_targets: &[NativeHandle], depth_stencil: Option<NativeHandle>) {
        self.submit(Command::SetRenderTargets {
            render_targets: render_targets.to_vec(),
            depth_stencil,
        });
    }

    fn set_shader(&mut self, stage: ShaderStage, shader: Option<NativeHandle>) {
        self.submit(Command::SetShader { stage, shader });
    }

    fn set_input_layout(&mut self, input_layout: Option<NativeHandle>) {
        self.submit(Command::SetInputLayout(input_layout));
    }

    fn set_primitive_topology(&mut self, topology: PrimitiveTopology) {
        self.submit(Command::SetPrimitiveTopology(topology.into_d3d11()));
    }

    fn set_rasterizer_state(&mut self, state: NativeHandle) {
        self.submit(Command::SetRasterizerState(state));
    }

    fn set_blend_state(&mut self, state: NativeHandle, blend_factor: [f32; 4], sample_mask: u32) {
        self.submit(Command::SetBlendState {
            state,
            blend_factor,
            sample_mask,
        });
    }

    fn set_depth_stencil_state(&mut self, state: NativeHandle, stencil_ref: u32) {
        self.submit(Command::SetDepthStencilState { state, stencil_ref });
    }

    fn set_viewports(&mut self, viewports: &[Viewport]) {
        self.submit(Command::SetViewports(viewports.to_vec()));
    }

    fn set_scissor_rects(&mut self, rects: &[ScissorRect]) {
        self.submit(Command::SetScissorRects(rects.to_vec()));
    }

    fn set_vertex_buffers(&mut self, start_slot: u32, buffers: &[NativeHandle], strides: &[u32], offsets: &[u32]) {
        self.submit(Command::SetVertexBuffers {
            start_slot,
            buffers: buffers.to_vec(),
            strides: strides.to_vec(),
            offsets: offsets.to_vec(),
        });
    }

    fn set_index_buffer(&mut self, buffer: NativeHandle, format: IndexFormat, offset: u32) {
        self.submit(Command::SetIndexBuffer {
            buffer,
            format: format.into_d3d11(),
            offset,
        });
    }

    fn set_constant_buffers(&mut self, stage: ShaderStage, start_slot: u32, buffers: &[NativeHandle]) {
        self.submit(Command::SetConstantBuffers {
            stage,
            start_slot,
            buffers: buffers.to_vec(),
        });
    }

    fn set_shader_resources(&mut self, stage: ShaderStage, start_slot: u32, views: &[NativeHandle]) {
        self.submit(Command::SetShaderResources {
            stage,
            start_slot,
            views: views.to_vec(),
        });
    }

    fn set_unordered_access_views(
        &mut self,
        stage: ShaderStage,
        start_slot: u32,
        views: &[NativeHandle],
        initial_counts: &[u32],
    ) {
        self.submit(Command::SetUnorderedAccessViews {
            stage,
            start_slot,
            views: views.to_vec(),
            initial_counts: initial_counts.to_vec(),
        });
    }

    fn set_samplers(&mut self, stage: ShaderStage, start_slot: u32, samplers: &[NativeHandle]) {
        self.submit(Command::SetSamplers {
            stage,
            start_slot,
            samplers: samplers.to_vec(),
        });
    }

    fn clear_render_target(&mut self, view: NativeHandle, color: [f32; 4]) {
        self.submit(Command::ClearRenderTarget { view, color });
    }

    fn clear_depth_stencil(&mut self, view: NativeHandle, flags: ClearFlags, depth: f32, stencil: u8) {
        self.submit(Command::ClearDepthStencil {
            view,
            flags: flags.into_d3d11(),
            depth,
            stencil,
        });
    }

    fn draw(&mut self, vertex_count: u32, start_vertex: u32) {
        self.submit(Command::Draw {
            vertex_count,
            start_vertex,
        });
    }

    fn draw_indexed(&mut self, index_count: u32, start_index: u32, base_vertex: i32) {
        self.submit(Command::DrawIndexed {
            index_count,
            start_index,
            base_vertex,
        });
    }

    fn write_discard(&mut self, buffer: NativeHandle, data: &[u8]) -> Result<(), BackendError> {
        self.device.check_write_discard(buffer, data.len())?;
        self.submit(Command::UpdateBuffer {
            buffer,
            data: data.to_vec(),
        });
        Ok(())
    }

    fn finish_command_list(&mut self) -> Result<NativeHandle, BackendError> {
        if !self.deferred {
            return Err(self.device.reject(
                hresult::DXGI_ERROR_INVALID_CALL,
                "FinishCommandList called on the immediate context",
            ));
        }
        let commands = std::mem::take(&mut self.recorded);
        Ok(self.device.register_command_list(commands))
    }

    fn execute_command_list(&mut self, command_list: NativeHandle) -> Result<(), BackendError> {
        if self.deferred {
            return Err(self.device.reject(
                hresult::DXGI_ERROR_INVALID_CALL,
                "ExecuteCommandList called on a deferred context",
            ));
        }
        self.device.execute(Command::ExecuteCommandList(command_list))
    }
}
