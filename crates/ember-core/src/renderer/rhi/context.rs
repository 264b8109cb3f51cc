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

//! Device contexts: the immediate context and deferred command lists.
//!
//! Both flavors share [`DeviceContext`]; the wrapped native context decides which one
//! a value is. Every operation records straight into the native context, so a deferred
//! context accumulates commands until [`DeviceContext::finish_command_list`] closes
//! them into a native command list.

use super::validation::{validate_pipeline_resource_bindings, ValidationReport};
use super::{
    Buffer, DeviceObject, DeviceObjectRef, DeviceShared, FrameBuffer, ObjectHeader, Pipeline,
    PipelineResourceBindings,
};
use crate::math::LinearRgba;
use crate::renderer::api::*;
use crate::renderer::error::{BindingError, RenderError, ResourceError};
use crate::renderer::traits::NativeContext;
use std::sync::{Arc, Mutex, MutexGuard};

/// Keeps the current append/consume counter of a read-write view.
const KEEP_COUNTER: u32 = u32::MAX;

#[derive(Debug)]
struct ContextState {
    native: Box<dyn NativeContext>,
    frame_buffer: Option<Arc<FrameBuffer>>,
    pipeline: Option<Arc<Pipeline>>,
    command_list: Option<NativeHandle>,
}

/// An immediate context or a deferred command list.
#[derive(Debug)]
pub struct DeviceContext {
    header: ObjectHeader,
    deferred: bool,
    validate_bindings: bool,
    state: Mutex<ContextState>,
}

impl DeviceContext {
    pub(crate) fn new(
        shared: &Arc<DeviceShared>,
        label: Option<String>,
        native: Box<dyn NativeContext>,
    ) -> Self {
        let deferred = native.is_deferred();
        let object_type = if deferred {
            DeviceObjectType::CommandList
        } else {
            DeviceObjectType::DeviceContext
        };
        Self {
            header: ObjectHeader::new(object_type, label, shared),
            deferred,
            validate_bindings: shared.settings.validate_bindings,
            state: Mutex::new(ContextState {
                native,
                frame_buffer: None,
                pipeline: None,
                command_list: None,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ContextState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn name(&self) -> &str {
        self.label().unwrap_or("Unknown")
    }

    /// Returns `true` for a deferred command list.
    pub fn is_deferred(&self) -> bool {
        self.deferred
    }

    /// Returns `true` if a closed command list is waiting to be executed.
    pub fn has_command_list(&self) -> bool {
        self.state().command_list.is_some()
    }

    /// Returns the most recently bound pipeline.
    pub fn bound_pipeline(&self) -> Option<Arc<Pipeline>> {
        self.state().pipeline.clone()
    }

    /// Returns the most recently bound frame buffer.
    pub fn bound_frame_buffer(&self) -> Option<Arc<FrameBuffer>> {
        self.state().frame_buffer.clone()
    }

    /// Binds the frame buffer's render targets and depth-stencil target.
    pub fn bind_frame_buffer(&self, frame_buffer: &Arc<FrameBuffer>) {
        let render_targets = frame_buffer.native_render_targets();
        let depth_stencil = frame_buffer.depth_stencil().map(|view| view.native_handle());
        let mut state = self.state();
        state.native.set_render_targets(&render_targets, depth_stencil);
        state.frame_buffer = Some(frame_buffer.clone());
    }

    /// Binds every stage shader, the input layout, the topology and the three state
    /// objects of `pipeline`.
    pub fn bind_pipeline(&self, pipeline: &Arc<Pipeline>) {
        let states = pipeline.native_states();
        let mut state = self.state();
        for stage in ShaderStage::ALL {
            let shader = pipeline.shader(stage).map(|shader| shader.native_handle());
            state.native.set_shader(stage, shader);
        }
        state.native.set_input_layout(Some(states.input_layout));
        state.native.set_primitive_topology(pipeline.topology());
        state.native.set_rasterizer_state(states.rasterizer);
        state
            .native
            .set_blend_state(states.blend, pipeline.blend_factor(), pipeline.sample_mask());
        state
            .native
            .set_depth_stencil_state(states.depth_stencil, pipeline.stencil_ref());
        state.pipeline = Some(pipeline.clone());
    }

    /// Replaces the viewports.
    pub fn bind_viewports(&self, viewports: &[Viewport]) {
        self.state().native.set_viewports(viewports);
    }

    /// Replaces the scissor rectangles.
    pub fn bind_scissors(&self, rects: &[ScissorRect]) {
        self.state().native.set_scissor_rects(rects);
    }

    /// Binds vertex buffers to consecutive slots, using each buffer's element size as
    /// its stride.
    pub fn bind_vertex_buffers(&self, start_slot: u32, buffers: &[Arc<Buffer>]) {
        if start_slot as usize + buffers.len() > MAX_VERTEX_BUFFER_SLOTS as usize {
            log::warn!(
                "{}: vertex buffers {}..{} exceed the {} input slots; bind skipped",
                self.name(),
                start_slot,
                start_slot as usize + buffers.len(),
                MAX_VERTEX_BUFFER_SLOTS
            );
            return;
        }
        debug_assert!(buffers
            .iter()
            .all(|buffer| buffer.bind_flags().contains(BindFlags::VERTEX_BUFFER)));

        let handles: Vec<_> = buffers.iter().map(|buffer| buffer.native_handle()).collect();
        let strides: Vec<_> = buffers.iter().map(|buffer| buffer.element_size()).collect();
        let offsets = vec![0; buffers.len()];
        self.state()
            .native
            .set_vertex_buffers(start_slot, &handles, &strides, &offsets);
    }

    /// Binds the index buffer, deriving the index format from its element size.
    ///
    /// ## Errors
    /// * `RenderError::ResourceError` - If the element size is neither 2 nor 4 bytes. The
    ///   bind is skipped.
    pub fn bind_index_buffer(&self, buffer: &Arc<Buffer>) -> Result<(), RenderError> {
        let Some(format) = IndexFormat::from_element_size(buffer.element_size()) else {
            let err = ResourceError::invalid(
                DeviceObjectType::Buffer,
                format!(
                    "index buffer '{}' has a {}-byte element size; expected 2 or 4",
                    buffer.label().unwrap_or("Unknown"),
                    buffer.element_size()
                ),
            );
            log::error!("fatal: {}: {err}", self.name());
            return Err(err.into());
        };
        self.state()
            .native
            .set_index_buffer(buffer.native_handle(), format, 0);
        Ok(())
    }

    /// Binds resources of one kind to consecutive slots of one stage.
    ///
    /// Buffers go to constant-buffer slots, views to read-only or read-write slots and
    /// samplers to sampler slots. Read-write views keep their current counters.
    ///
    /// ## Errors
    /// * `BindingError` - For an empty list, a list mixing kinds, a kind that cannot be
    ///   bound or slots past the stage limit. Nothing is bound.
    pub fn bind_resources(
        &self,
        stage: ShaderStage,
        start_slot: u32,
        resources: &[DeviceObjectRef],
    ) -> Result<(), BindingError> {
        let result = self.try_bind_resources(stage, start_slot, resources);
        if let Err(err) = &result {
            log::warn!("{}: bind_resources on {stage:?}: {err}", self.name());
        }
        result
    }

    fn try_bind_resources(
        &self,
        stage: ShaderStage,
        start_slot: u32,
        resources: &[DeviceObjectRef],
    ) -> Result<(), BindingError> {
        let first = resources.first().ok_or(BindingError::EmptyResourceList)?;
        let object_type = first.object_type();
        if resources.iter().any(|resource| resource.object_type() != object_type) {
            return Err(BindingError::MixedResourceTypes);
        }
        let category = ResourceCategory::from_object_type(object_type)
            .ok_or(BindingError::UnbindableType(object_type))?;
        let end = start_slot as usize + resources.len();
        if end > category.max_slots() as usize {
            return Err(BindingError::SlotOutOfRange {
                stage,
                category,
                slot: end as u32 - 1,
                slot_count: category.max_slots(),
            });
        }

        let handles: Vec<_> = resources.iter().filter_map(native_handle).collect();
        let mut state = self.state();
        match category {
            ResourceCategory::ConstantBuffer => {
                debug_assert!(resources.iter().all(|resource| matches!(
                    resource,
                    DeviceObjectRef::Buffer(buffer) if buffer.bind_flags().contains(BindFlags::CONSTANT_BUFFER)
                )));
                state.native.set_constant_buffers(stage, start_slot, &handles);
            }
            ResourceCategory::ShaderResource => {
                state.native.set_shader_resources(stage, start_slot, &handles);
            }
            ResourceCategory::ShaderRWResource => {
                let counters = vec![KEEP_COUNTER; handles.len()];
                state
                    .native
                    .set_unordered_access_views(stage, start_slot, &handles, &counters);
            }
            ResourceCategory::Sampler => state.native.set_samplers(stage, start_slot, &handles),
        }
        Ok(())
    }

    /// Binds every table of `bindings`, starting at slot 0 of each stage and category.
    ///
    /// Empty slots are bound as null. When the device was created with
    /// `validate_bindings`, the tables are validated first and the report returned.
    pub fn bind_pipeline_resources(&self, bindings: &PipelineResourceBindings) -> Option<ValidationReport> {
        let report = self.validate_bindings.then(|| {
            validate_pipeline_resource_bindings(bindings.label(), bindings.layouts(), bindings.data())
        });

        let mut state = self.state();
        for stage in ShaderStage::ALL {
            if bindings.layouts()[stage.index()].is_none() {
                continue;
            }
            let tables = bindings.data().stage(stage);
            if !tables.constant_buffers.is_empty() {
                let handles = table_handles(&tables.constant_buffers, |b| b.native_handle());
                state.native.set_constant_buffers(stage, 0, &handles);
            }
            if !tables.shader_resources.is_empty() {
                let handles = table_handles(&tables.shader_resources, |v| v.native_handle());
                state.native.set_shader_resources(stage, 0, &handles);
            }
            if !tables.rw_resources.is_empty() {
                let handles = table_handles(&tables.rw_resources, |v| v.native_handle());
                let counters = vec![KEEP_COUNTER; handles.len()];
                state
                    .native
                    .set_unordered_access_views(stage, 0, &handles, &counters);
            }
            if !tables.samplers.is_empty() {
                let handles = table_handles(&tables.samplers, |s| s.native_handle());
                state.native.set_samplers(stage, 0, &handles);
            }
        }
        report
    }

    /// Clears the frame buffer's targets.
    ///
    /// Each channel is optional: color clears every render target when `color` is
    /// given; depth and stencil clear the depth-stencil target when either is given,
    /// with the missing one passed as depth 1.0 or stencil 0.
    pub fn clear_frame_buffer(
        &self,
        frame_buffer: &FrameBuffer,
        color: Option<LinearRgba>,
        depth: Option<f32>,
        stencil: Option<u8>,
    ) {
        let mut state = self.state();
        if let Some(color) = color {
            for view in frame_buffer.render_targets() {
                state
                    .native
                    .clear_render_target(view.native_handle(), color.to_array());
            }
        }

        let Some(depth_stencil) = frame_buffer.depth_stencil() else {
            return;
        };
        let mut flags = ClearFlags::empty();
        if depth.is_some() {
            flags.insert(ClearFlags::DEPTH);
        }
        if stencil.is_some() {
            flags.insert(ClearFlags::STENCIL);
        }
        if !flags.is_empty() {
            state.native.clear_depth_stencil(
                depth_stencil.native_handle(),
                flags,
                depth.unwrap_or(1.0),
                stencil.unwrap_or(0),
            );
        }
    }

    /// Draws `vertex_count` vertices starting at `vertex_offset`.
    pub fn draw(&self, vertex_count: u32, vertex_offset: u32) {
        self.state().native.draw(vertex_count, vertex_offset);
    }

    /// Draws `index_count` indices starting at `index_offset`, adding `vertex_offset`
    /// to each index.
    pub fn draw_indexed(&self, index_count: u32, index_offset: u32, vertex_offset: i32) {
        self.state()
            .native
            .draw_indexed(index_count, index_offset, vertex_offset);
    }

    /// Overwrites a dynamic buffer with `data` (map with discard, copy, unmap).
    ///
    /// The buffer should be created with [`Usage::Dynamic`] and write CPU access.
    pub fn update_dynamic_buffer(&self, buffer: &Buffer, data: &[u8]) -> Result<(), RenderError> {
        self.state()
            .native
            .write_discard(buffer.native_handle(), data)
            .map_err(|err| {
                log::error!(
                    "{}: updating buffer '{}' failed: {err}",
                    self.name(),
                    buffer.label().unwrap_or("Unknown")
                );
                err.into()
            })
    }

    /// Typed form of [`DeviceContext::update_dynamic_buffer`].
    pub fn update_dynamic_buffer_pod<T: bytemuck::Pod>(&self, buffer: &Buffer, data: &[T]) -> Result<(), RenderError> {
        self.update_dynamic_buffer(buffer, bytemuck::cast_slice(data))
    }

    /// Closes the recorded commands into a command list ready for execution.
    ///
    /// A list that was closed but never executed is released and replaced. Bound state
    /// is reset, as the native context starts the next recording from defaults.
    pub fn finish_command_list(&self) -> Result<(), RenderError> {
        if !self.deferred {
            return Err(RenderError::WrongContextKind(
                "the immediate context cannot record a command list".to_string(),
            ));
        }
        let mut state = self.state();
        let handle = state.native.finish_command_list().map_err(|err| {
            log::error!("{}: finishing the command list failed: {err}", self.name());
            RenderError::from(err)
        })?;
        if let Some(previous) = state.command_list.replace(handle) {
            log::debug!("{}: replacing a command list that was never executed", self.name());
            self.header.release(previous);
        }
        state.frame_buffer = None;
        state.pipeline = None;
        Ok(())
    }

    /// Releases the closed command list, if any, so the context can record anew.
    pub fn clear_command_list(&self) {
        if let Some(handle) = self.state().command_list.take() {
            self.header.release(handle);
        }
    }

    /// Executes a closed deferred command list on this immediate context, then
    /// releases it.
    pub(crate) fn execute(&self, list: &DeviceContext) -> Result<(), RenderError> {
        if self.deferred {
            return Err(RenderError::WrongContextKind(
                "command lists execute on the immediate context".to_string(),
            ));
        }
        if !list.deferred {
            return Err(RenderError::WrongContextKind(
                "the immediate context is not a command list".to_string(),
            ));
        }
        let handle = list
            .state()
            .command_list
            .take()
            .ok_or_else(|| RenderError::CommandListNotClosed {
                label: list.label().map(str::to_string),
            })?;
        let result = self.state().native.execute_command_list(handle);
        list.header.release(handle);
        result.map_err(RenderError::from)
    }
}

impl DeviceObject for DeviceContext {
    fn header(&self) -> &ObjectHeader {
        &self.header
    }
}

impl Drop for DeviceContext {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = state.command_list.take() {
            self.header.release(handle);
        }
    }
}

fn table_handles<T>(table: &[Option<Arc<T>>], handle: impl Fn(&T) -> NativeHandle) -> Vec<NativeHandle> {
    table
        .iter()
        .map(|slot| slot.as_deref().map_or(NativeHandle::NULL, &handle))
        .collect()
}

fn native_handle(resource: &DeviceObjectRef) -> Option<NativeHandle> {
    match resource {
        DeviceObjectRef::Buffer(buffer) => Some(buffer.native_handle()),
        DeviceObjectRef::ShaderResourceView(view) => Some(view.native_handle()),
        DeviceObjectRef::ShaderRWResourceView(view) => Some(view.native_handle()),
        DeviceObjectRef::Sampler(sampler) => Some(sampler.native_handle()),
        _ => None,
    }
}
