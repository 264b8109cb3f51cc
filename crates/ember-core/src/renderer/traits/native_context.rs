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

use crate::renderer::api::*;
use crate::renderer::error::BackendError;
use std::fmt::Debug;

/// A native device context.
///
/// The immediate context applies every call directly. A deferred context records the
/// calls until [`finish_command_list`](NativeContext::finish_command_list) turns them
/// into a native command list the immediate context can execute.
pub trait NativeContext: Send + Debug {
    /// Returns `true` for a deferred (recording) context.
    fn is_deferred(&self) -> bool;

    /// Binds render targets and an optional depth-stencil target.
    fn set_render_targets(&mut self, render_targets: &[NativeHandle], depth_stencil: Option<NativeHandle>);

    /// Binds (or unbinds, with `None`) the shader of one stage.
    fn set_shader(&mut self, stage: ShaderStage, shader: Option<NativeHandle>);

    /// Binds the input layout.
    fn set_input_layout(&mut self, input_layout: Option<NativeHandle>);

    /// Sets the primitive topology.
    fn set_primitive_topology(&mut self, topology: PrimitiveTopology);

    /// Binds a rasterizer state object.
    fn set_rasterizer_state(&mut self, state: NativeHandle);

    /// Binds a blend state object with its constant blend factor and sample mask.
    fn set_blend_state(&mut self, state: NativeHandle, blend_factor: [f32; 4], sample_mask: u32);

    /// Binds a depth-stencil state object with its stencil reference.
    fn set_depth_stencil_state(&mut self, state: NativeHandle, stencil_ref: u32);

    /// Replaces the viewports.
    fn set_viewports(&mut self, viewports: &[Viewport]);

    /// Replaces the scissor rectangles.
    fn set_scissor_rects(&mut self, rects: &[ScissorRect]);

    /// Binds vertex buffers to consecutive slots starting at `start_slot`.
    fn set_vertex_buffers(&mut self, start_slot: u32, buffers: &[NativeHandle], strides: &[u32], offsets: &[u32]);

    /// Binds the index buffer.
    fn set_index_buffer(&mut self, buffer: NativeHandle, format: IndexFormat, offset: u32);

    /// Binds constant buffers to one stage.
    fn set_constant_buffers(&mut self, stage: ShaderStage, start_slot: u32, buffers: &[NativeHandle]);

    /// Binds read-only views to one stage.
    fn set_shader_resources(&mut self, stage: ShaderStage, start_slot: u32, views: &[NativeHandle]);

    /// Binds read-write views to one stage.
    ///
    /// `initial_counts` holds one append/consume counter value per view; `u32::MAX`
    /// keeps the current counter.
    fn set_unordered_access_views(
        &mut self,
        stage: ShaderStage,
        start_slot: u32,
        views: &[NativeHandle],
        initial_counts: &[u32],
    );

    /// Binds samplers to one stage.
    fn set_samplers(&mut self, stage: ShaderStage, start_slot: u32, samplers: &[NativeHandle]);

    /// Clears a render-target view to `color`.
    fn clear_render_target(&mut self, view: NativeHandle, color: [f32; 4]);

    /// Clears the selected channels of a depth-stencil view.
    fn clear_depth_stencil(&mut self, view: NativeHandle, flags: ClearFlags, depth: f32, stencil: u8);

    /// Draws non-indexed geometry.
    fn draw(&mut self, vertex_count: u32, start_vertex: u32);

    /// Draws indexed geometry.
    fn draw_indexed(&mut self, index_count: u32, start_index: u32, base_vertex: i32);

    /// Maps `buffer` with discard, copies `data` in and unmaps.
    fn write_discard(&mut self, buffer: NativeHandle, data: &[u8]) -> Result<(), BackendError>;

    /// Closes the recording into a native command list and resets the context.
    fn finish_command_list(&mut self) -> Result<NativeHandle, BackendError>;

    /// Executes a native command list. Immediate contexts only.
    fn execute_command_list(&mut self, command_list: NativeHandle) -> Result<(), BackendError>;
}
