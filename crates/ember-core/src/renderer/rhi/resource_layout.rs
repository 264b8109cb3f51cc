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

use super::bindings::StageLayouts;
use super::pipeline::stage_layouts;
use super::validation::{validate_pipeline_resource_bindings, ValidationReport};
use super::{DeviceObject, DeviceShared, ObjectHeader, PipelineResourceBindings, Shader};
use crate::renderer::api::{DeviceObjectType, ShaderStage};
use crate::renderer::error::ResourceError;
use std::borrow::Cow;
use std::sync::Arc;

/// A descriptor used to create a [`ResourceLayout`].
#[derive(Debug, Clone, Default)]
pub struct ResourceLayoutDesc<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// The shader of each stage, indexed by [`ShaderStage::index`].
    pub shaders: [Option<Arc<Shader>>; ShaderStage::COUNT],
}

impl<'a> ResourceLayoutDesc<'a> {
    /// Attaches `shader` to the stage it was compiled for.
    pub fn with_shader(mut self, shader: &Arc<Shader>) -> Self {
        self.shaders[shader.stage().index()] = Some(shader.clone());
        self
    }
}

/// The reflected layouts of a set of shaders, independent of any pipeline.
///
/// Lets independent recording passes each fill their own [`PipelineResourceBindings`]
/// (per scene, per material, per object) without sharing one table.
#[derive(Debug)]
pub struct ResourceLayout {
    header: ObjectHeader,
    layouts: Arc<StageLayouts>,
}

impl ResourceLayout {
    pub(crate) fn create(shared: &Arc<DeviceShared>, desc: &ResourceLayoutDesc<'_>) -> Result<Self, ResourceError> {
        if desc.shaders.iter().all(Option::is_none) {
            return Err(ResourceError::invalid(
                DeviceObjectType::ResourceLayout,
                "no shader was supplied",
            ));
        }
        let layouts = stage_layouts(&desc.shaders)?;
        Ok(Self {
            header: ObjectHeader::new(
                DeviceObjectType::ResourceLayout,
                desc.label.as_ref().map(|l| l.to_string()),
                shared,
            ),
            layouts: Arc::new(layouts),
        })
    }

    /// Returns the reflected layout of each stage.
    pub fn stage_layouts(&self) -> &StageLayouts {
        &self.layouts
    }

    /// Returns empty binding tables shaped for these layouts.
    pub fn resource_bindings(&self) -> PipelineResourceBindings {
        PipelineResourceBindings::new(self.label().map(str::to_string), self.layouts.clone())
    }

    /// Cross-checks `bindings` against these layouts.
    pub fn validate_bindings(&self, bindings: &PipelineResourceBindings) -> ValidationReport {
        validate_pipeline_resource_bindings(self.label(), &self.layouts, bindings.data())
    }
}

impl DeviceObject for ResourceLayout {
    fn header(&self) -> &ObjectHeader {
        &self.header
    }
}
