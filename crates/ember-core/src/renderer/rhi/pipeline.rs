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

//! Pipelines: shaders plus the fixed-function state objects they run with.

use super::bindings::StageLayouts;
use super::validation::{validate_pipeline_resource_bindings, ValidationReport};
use super::{DeviceObject, DeviceShared, ObjectHeader, PipelineResourceBindings, Shader};
use crate::renderer::api::*;
use crate::renderer::error::{BackendError, PipelineError, ResourceError};
use std::borrow::Cow;
use std::sync::Arc;

/// A descriptor used to create a [`Pipeline`].
#[derive(Debug, Clone)]
pub struct PipelineDesc<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// The shader of each stage, indexed by [`ShaderStage::index`].
    pub shaders: [Option<Arc<Shader>>; ShaderStage::COUNT],
    /// The vertex input elements and primitive topology.
    pub input_layout: InputLayout,
    /// Rasterizer state.
    pub rasterizer: RasterizerState,
    /// Output-merger blending.
    pub blend: BlendState,
    /// The constant blend factor used by [`BlendFactor::Constant`].
    pub blend_factor: [f32; 4],
    /// The multisample coverage mask.
    pub sample_mask: u32,
    /// Depth and stencil testing.
    pub depth_stencil: DepthStencilState,
    /// The stencil reference value.
    pub stencil_ref: u32,
}

impl Default for PipelineDesc<'_> {
    fn default() -> Self {
        Self {
            label: None,
            shaders: Default::default(),
            input_layout: InputLayout::default(),
            rasterizer: RasterizerState::default(),
            blend: BlendState::default(),
            blend_factor: [1.0; 4],
            sample_mask: u32::MAX,
            depth_stencil: DepthStencilState::default(),
            stencil_ref: 0,
        }
    }
}

impl<'a> PipelineDesc<'a> {
    /// Attaches `shader` to the stage it was compiled for.
    pub fn with_shader(mut self, shader: &Arc<Shader>) -> Self {
        self.shaders[shader.stage().index()] = Some(shader.clone());
        self
    }
}

/// The native state objects of a pipeline. Null until built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStates {
    /// The input layout.
    pub input_layout: NativeHandle,
    /// The rasterizer state.
    pub rasterizer: NativeHandle,
    /// The blend state.
    pub blend: NativeHandle,
    /// The depth-stencil state.
    pub depth_stencil: NativeHandle,
}

/// Shaders, fixed-function state and the binding shape their reflection implies.
///
/// A pipeline never tracks which resources are bound to it: callers fill the
/// [`PipelineResourceBindings`] returned by [`Pipeline::resource_bindings`].
#[derive(Debug)]
pub struct Pipeline {
    header: ObjectHeader,
    shaders: [Option<Arc<Shader>>; ShaderStage::COUNT],
    input_layout: InputLayout,
    rasterizer: RasterizerState,
    blend: BlendState,
    blend_factor: [f32; 4],
    sample_mask: u32,
    depth_stencil: DepthStencilState,
    stencil_ref: u32,
    states: PipelineStates,
    layouts: Arc<StageLayouts>,
}

impl Pipeline {
    /// Builds the input layout, the three state objects and the binding shape, in that
    /// order. The first failure stops the build; states built so far are released.
    pub(crate) fn create(shared: &Arc<DeviceShared>, desc: &PipelineDesc<'_>) -> Result<Self, ResourceError> {
        let mut pipeline = Self {
            header: ObjectHeader::new(
                DeviceObjectType::Pipeline,
                desc.label.as_ref().map(|l| l.to_string()),
                shared,
            ),
            shaders: desc.shaders.clone(),
            input_layout: desc.input_layout.clone(),
            rasterizer: desc.rasterizer,
            blend: desc.blend,
            blend_factor: desc.blend_factor,
            sample_mask: desc.sample_mask,
            depth_stencil: desc.depth_stencil,
            stencil_ref: desc.stencil_ref,
            states: PipelineStates::default(),
            layouts: Arc::default(),
        };

        pipeline.states.input_layout = pipeline.build_input_layout(shared)?;
        pipeline.states.rasterizer = shared
            .backend
            .create_rasterizer_state(&pipeline.rasterizer)
            .map_err(state_failed("rasterizer state"))?;
        pipeline.states.blend = shared
            .backend
            .create_blend_state(&pipeline.blend)
            .map_err(state_failed("blend state"))?;
        pipeline.states.depth_stencil = shared
            .backend
            .create_depth_stencil_state(&pipeline.depth_stencil)
            .map_err(state_failed("depth-stencil state"))?;
        pipeline.layouts = Arc::new(stage_layouts(&pipeline.shaders)?);

        Ok(pipeline)
    }

    fn build_input_layout(&self, shared: &DeviceShared) -> Result<NativeHandle, PipelineError> {
        let Some(vertex_shader) = self.shader(ShaderStage::Vertex) else {
            return Err(PipelineError::MissingVertexShader {
                label: self.label().map(str::to_string),
            });
        };
        self.input_layout
            .validate()
            .map_err(|details| PipelineError::StateCreationFailed {
                state: "input layout",
                details,
            })?;
        shared
            .backend
            .create_input_layout(&self.input_layout, vertex_shader.bytecode())
            .map_err(state_failed("input layout"))
    }

    /// Returns the shader attached to `stage`.
    pub fn shader(&self, stage: ShaderStage) -> Option<&Arc<Shader>> {
        self.shaders[stage.index()].as_ref()
    }

    /// Returns the vertex input layout.
    pub fn input_layout(&self) -> &InputLayout {
        &self.input_layout
    }

    /// Returns the primitive topology.
    pub fn topology(&self) -> PrimitiveTopology {
        self.input_layout.topology
    }

    /// Returns the rasterizer state.
    pub fn rasterizer(&self) -> &RasterizerState {
        &self.rasterizer
    }

    /// Returns the blend state.
    pub fn blend(&self) -> &BlendState {
        &self.blend
    }

    /// Returns the constant blend factor.
    pub fn blend_factor(&self) -> [f32; 4] {
        self.blend_factor
    }

    /// Returns the multisample coverage mask.
    pub fn sample_mask(&self) -> u32 {
        self.sample_mask
    }

    /// Returns the depth-stencil state.
    pub fn depth_stencil(&self) -> &DepthStencilState {
        &self.depth_stencil
    }

    /// Returns the stencil reference value.
    pub fn stencil_ref(&self) -> u32 {
        self.stencil_ref
    }

    /// Returns the native state objects.
    pub fn native_states(&self) -> PipelineStates {
        self.states
    }

    /// Returns the reflected layout of each stage.
    pub fn stage_layouts(&self) -> &StageLayouts {
        &self.layouts
    }

    /// Returns empty binding tables shaped for this pipeline.
    pub fn resource_bindings(&self) -> PipelineResourceBindings {
        PipelineResourceBindings::new(self.label().map(str::to_string), self.layouts.clone())
    }

    /// Cross-checks `bindings` against this pipeline's reflected layouts.
    pub fn validate_bindings(&self, bindings: &PipelineResourceBindings) -> ValidationReport {
        validate_pipeline_resource_bindings(self.label(), &self.layouts, bindings.data())
    }
}

impl DeviceObject for Pipeline {
    fn header(&self) -> &ObjectHeader {
        &self.header
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        let states = self.states;
        for handle in [
            states.input_layout,
            states.rasterizer,
            states.blend,
            states.depth_stencil,
        ] {
            self.header.release(handle);
        }
    }
}

fn state_failed(state: &'static str) -> impl Fn(BackendError) -> PipelineError {
    move |err| PipelineError::StateCreationFailed {
        state,
        details: err.to_string(),
    }
}

/// Collects the reflected layout of each attached shader, checking every shader sits
/// in the stage it was compiled for.
pub(crate) fn stage_layouts(
    shaders: &[Option<Arc<Shader>>; ShaderStage::COUNT],
) -> Result<StageLayouts, PipelineError> {
    let mut layouts = StageLayouts::default();
    for slot in ShaderStage::ALL {
        if let Some(shader) = &shaders[slot.index()] {
            if shader.stage() != slot {
                return Err(PipelineError::StageMismatch {
                    slot,
                    shader_stage: shader.stage(),
                });
            }
            layouts[slot.index()] = Some(shader.resource_layout().clone());
        }
    }
    Ok(layouts)
}
