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

//! Resource binding tables shaped by shader reflection.
//!
//! A [`PipelineResourceBindingData`] holds one [`StageBindings`] per shader stage, each
//! made of four slot tables sized from the stage shader's reflected layout. Tables of
//! stages without a shader, and of categories a shader does not use, stay empty.

use super::{Buffer, DeviceObject, Sampler, ShaderRWResourceView, ShaderResourceView};
use crate::renderer::api::{ResourceCategory, ShaderResourceLayout, ShaderStage};
use crate::renderer::error::BindingError;
use std::sync::Arc;

/// The reflected layout of each stage, `None` for stages without a shader.
pub type StageLayouts = [Option<Arc<ShaderResourceLayout>>; ShaderStage::COUNT];

/// The four slot tables of one shader stage.
#[derive(Debug, Clone, Default)]
pub struct StageBindings {
    /// Constant buffers (`b#`).
    pub constant_buffers: Vec<Option<Arc<Buffer>>>,
    /// Read-only views (`t#`).
    pub shader_resources: Vec<Option<Arc<ShaderResourceView>>>,
    /// Read-write views (`u#`).
    pub rw_resources: Vec<Option<Arc<ShaderRWResourceView>>>,
    /// Samplers (`s#`).
    pub samplers: Vec<Option<Arc<Sampler>>>,
}

impl StageBindings {
    fn sized_for(layout: &ShaderResourceLayout) -> Self {
        let len = |category| layout.slot_count(category) as usize;
        Self {
            constant_buffers: vec![None; len(ResourceCategory::ConstantBuffer)],
            shader_resources: vec![None; len(ResourceCategory::ShaderResource)],
            rw_resources: vec![None; len(ResourceCategory::ShaderRWResource)],
            samplers: vec![None; len(ResourceCategory::Sampler)],
        }
    }

    /// Returns the size of one category's table.
    pub fn slot_count(&self, category: ResourceCategory) -> usize {
        match category {
            ResourceCategory::ConstantBuffer => self.constant_buffers.len(),
            ResourceCategory::ShaderResource => self.shader_resources.len(),
            ResourceCategory::ShaderRWResource => self.rw_resources.len(),
            ResourceCategory::Sampler => self.samplers.len(),
        }
    }

    /// Returns `true` if `slot` of `category` holds a resource.
    pub fn is_filled(&self, category: ResourceCategory, slot: usize) -> bool {
        match category {
            ResourceCategory::ConstantBuffer => matches!(self.constant_buffers.get(slot), Some(Some(_))),
            ResourceCategory::ShaderResource => matches!(self.shader_resources.get(slot), Some(Some(_))),
            ResourceCategory::ShaderRWResource => matches!(self.rw_resources.get(slot), Some(Some(_))),
            ResourceCategory::Sampler => matches!(self.samplers.get(slot), Some(Some(_))),
        }
    }

    /// Returns the number of filled slots across all categories.
    pub fn filled_count(&self) -> usize {
        self.constant_buffers.iter().flatten().count()
            + self.shader_resources.iter().flatten().count()
            + self.rw_resources.iter().flatten().count()
            + self.samplers.iter().flatten().count()
    }

    /// Returns `true` if every table has zero slots.
    pub fn is_unsized(&self) -> bool {
        ResourceCategory::ALL
            .iter()
            .all(|category| self.slot_count(*category) == 0)
    }
}

fn same_slots<T>(a: &[Option<Arc<T>>], b: &[Option<Arc<T>>]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|pair| match pair {
            (Some(x), Some(y)) => Arc::ptr_eq(x, y),
            (None, None) => true,
            _ => false,
        })
}

impl PartialEq for StageBindings {
    fn eq(&self, other: &Self) -> bool {
        same_slots(&self.constant_buffers, &other.constant_buffers)
            && same_slots(&self.shader_resources, &other.shader_resources)
            && same_slots(&self.rw_resources, &other.rw_resources)
            && same_slots(&self.samplers, &other.samplers)
    }
}

/// One [`StageBindings`] per shader stage.
///
/// Equality compares slot occupancy by object identity, which makes a clone usable as a
/// before/after snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineResourceBindingData {
    stages: [StageBindings; ShaderStage::COUNT],
}

impl PipelineResourceBindingData {
    /// Builds empty tables sized from each stage's layout.
    pub fn from_layouts(layouts: &StageLayouts) -> Self {
        let mut data = Self::default();
        for stage in ShaderStage::ALL {
            if let Some(layout) = &layouts[stage.index()] {
                data.stages[stage.index()] = StageBindings::sized_for(layout);
            }
        }
        data
    }

    /// Returns the tables of one stage.
    pub fn stage(&self, stage: ShaderStage) -> &StageBindings {
        &self.stages[stage.index()]
    }

    fn stage_mut(&mut self, stage: ShaderStage) -> &mut StageBindings {
        &mut self.stages[stage.index()]
    }
}

/// A pipeline's binding tables together with the layouts that shaped them.
///
/// Obtained from [`Pipeline::resource_bindings`](super::Pipeline::resource_bindings) or
/// [`ResourceLayout::resource_bindings`](super::ResourceLayout::resource_bindings), then
/// filled by slot or by shader variable name. Setters that cannot resolve their target
/// log a warning and leave the tables unchanged.
#[derive(Debug, Clone)]
pub struct PipelineResourceBindings {
    label: Option<String>,
    layouts: Arc<StageLayouts>,
    data: PipelineResourceBindingData,
}

impl PipelineResourceBindings {
    pub(crate) fn new(label: Option<String>, layouts: Arc<StageLayouts>) -> Self {
        let data = PipelineResourceBindingData::from_layouts(&layouts);
        Self { label, layouts, data }
    }

    /// Returns the label of the pipeline or layout these bindings belong to.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the stage layouts the tables were shaped from.
    pub fn layouts(&self) -> &StageLayouts {
        &self.layouts
    }

    /// Returns the binding tables.
    pub fn data(&self) -> &PipelineResourceBindingData {
        &self.data
    }

    /// Sets a constant buffer by slot.
    pub fn set_constant_buffer(&mut self, stage: ShaderStage, slot: u32, buffer: &Arc<Buffer>) -> Result<(), BindingError> {
        let table = &mut self.data.stage_mut(stage).constant_buffers;
        set_slot(table, stage, ResourceCategory::ConstantBuffer, slot, buffer)
    }

    /// Sets a constant buffer by its `cbuffer` name.
    pub fn set_constant_buffer_by_name(&mut self, stage: ShaderStage, name: &str, buffer: &Arc<Buffer>) -> Result<(), BindingError> {
        let slot = self.resolve(stage, ResourceCategory::ConstantBuffer, name)?;
        self.set_constant_buffer(stage, slot, buffer)
    }

    /// Sets a read-only view by slot.
    pub fn set_shader_resource(&mut self, stage: ShaderStage, slot: u32, view: &Arc<ShaderResourceView>) -> Result<(), BindingError> {
        let table = &mut self.data.stage_mut(stage).shader_resources;
        set_slot(table, stage, ResourceCategory::ShaderResource, slot, view)
    }

    /// Sets a read-only view by its variable name.
    pub fn set_shader_resource_by_name(&mut self, stage: ShaderStage, name: &str, view: &Arc<ShaderResourceView>) -> Result<(), BindingError> {
        let slot = self.resolve(stage, ResourceCategory::ShaderResource, name)?;
        self.set_shader_resource(stage, slot, view)
    }

    /// Sets a read-write view by slot.
    pub fn set_rw_resource(&mut self, stage: ShaderStage, slot: u32, view: &Arc<ShaderRWResourceView>) -> Result<(), BindingError> {
        let table = &mut self.data.stage_mut(stage).rw_resources;
        set_slot(table, stage, ResourceCategory::ShaderRWResource, slot, view)
    }

    /// Sets a read-write view by its variable name.
    pub fn set_rw_resource_by_name(&mut self, stage: ShaderStage, name: &str, view: &Arc<ShaderRWResourceView>) -> Result<(), BindingError> {
        let slot = self.resolve(stage, ResourceCategory::ShaderRWResource, name)?;
        self.set_rw_resource(stage, slot, view)
    }

    /// Sets a sampler by slot.
    pub fn set_sampler(&mut self, stage: ShaderStage, slot: u32, sampler: &Arc<Sampler>) -> Result<(), BindingError> {
        let table = &mut self.data.stage_mut(stage).samplers;
        set_slot(table, stage, ResourceCategory::Sampler, slot, sampler)
    }

    /// Sets a sampler by its variable name.
    pub fn set_sampler_by_name(&mut self, stage: ShaderStage, name: &str, sampler: &Arc<Sampler>) -> Result<(), BindingError> {
        let slot = self.resolve(stage, ResourceCategory::Sampler, name)?;
        self.set_sampler(stage, slot, sampler)
    }

    /// Empties every slot, keeping the table sizes.
    pub fn clear(&mut self) {
        self.data = PipelineResourceBindingData::from_layouts(&self.layouts);
    }

    fn resolve(&self, stage: ShaderStage, category: ResourceCategory, name: &str) -> Result<u32, BindingError> {
        let Some(layout) = &self.layouts[stage.index()] else {
            let err = BindingError::NoShaderForStage { stage };
            log::warn!("PipelineResourceBindings: {err}");
            return Err(err);
        };
        match layout.find(category, name) {
            Some(info) => Ok(info.start_slot),
            None => {
                let err = BindingError::UnknownName {
                    stage,
                    name: name.to_string(),
                };
                log::warn!("PipelineResourceBindings: {err}");
                Err(err)
            }
        }
    }
}

fn set_slot<T: DeviceObject>(
    table: &mut [Option<Arc<T>>],
    stage: ShaderStage,
    category: ResourceCategory,
    slot: u32,
    resource: &Arc<T>,
) -> Result<(), BindingError> {
    let slot_count = table.len() as u32;
    match table.get_mut(slot as usize) {
        Some(entry) => {
            *entry = Some(resource.clone());
            Ok(())
        }
        None => {
            let err = BindingError::SlotOutOfRange {
                stage,
                category,
                slot,
                slot_count,
            };
            log::warn!(
                "PipelineResourceBindings: {err} (binding '{}')",
                resource.label().unwrap_or("Unknown")
            );
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::api::{BufferDesc, BufferSubType, SamplerDesc};
    use crate::renderer::rhi::mock::{mock_device, shader};
    use crate::renderer::rhi::{PipelineDesc, ResourceLayoutDesc};

    #[test]
    fn tables_are_sized_from_each_stage_layout() {
        let (device, _) = mock_device();
        let vs = shader(&device, ShaderStage::Vertex, "cbuffer PerFrame 0\ncbuffer PerObject 2");
        let ps = shader(&device, ShaderStage::Pixel, "texture2d albedo 0\nsampler linear 0");
        let layout = device
            .create_resource_layout(&ResourceLayoutDesc::default().with_shader(&vs).with_shader(&ps))
            .unwrap();

        let bindings = layout.resource_bindings();
        let vertex = bindings.data().stage(ShaderStage::Vertex);
        assert_eq!(vertex.slot_count(ResourceCategory::ConstantBuffer), 3);
        assert_eq!(vertex.slot_count(ResourceCategory::ShaderResource), 0);
        let pixel = bindings.data().stage(ShaderStage::Pixel);
        assert_eq!(pixel.slot_count(ResourceCategory::ShaderResource), 1);
        assert_eq!(pixel.slot_count(ResourceCategory::Sampler), 1);
        assert!(bindings.data().stage(ShaderStage::Compute).is_unsized());
    }

    #[test]
    fn unknown_names_and_slots_leave_tables_untouched() {
        let (device, _) = mock_device();
        let vs = shader(&device, ShaderStage::Vertex, "cbuffer PerFrame 0");
        let pipeline = device.create_pipeline(&PipelineDesc::default().with_shader(&vs)).unwrap();
        let buffer = device
            .create_buffer(&BufferDesc {
                element_size: 64,
                element_count: 1,
                bind_flags: crate::renderer::api::BindFlags::CONSTANT_BUFFER,
                sub_type: BufferSubType::None,
                ..Default::default()
            })
            .unwrap();
        let sampler = device.create_sampler(&SamplerDesc::default()).unwrap();

        let mut bindings = pipeline.resource_bindings();
        let before = bindings.data().clone();

        assert_eq!(
            bindings.set_constant_buffer_by_name(ShaderStage::Vertex, "PerObject", &buffer),
            Err(BindingError::UnknownName {
                stage: ShaderStage::Vertex,
                name: "PerObject".to_string()
            })
        );
        assert!(bindings.set_constant_buffer(ShaderStage::Vertex, 1, &buffer).is_err());
        assert_eq!(
            bindings.set_sampler_by_name(ShaderStage::Pixel, "linear", &sampler),
            Err(BindingError::NoShaderForStage {
                stage: ShaderStage::Pixel
            })
        );
        assert_eq!(bindings.data(), &before);

        bindings
            .set_constant_buffer_by_name(ShaderStage::Vertex, "PerFrame", &buffer)
            .unwrap();
        assert_ne!(bindings.data(), &before);
        assert!(bindings
            .data()
            .stage(ShaderStage::Vertex)
            .is_filled(ResourceCategory::ConstantBuffer, 0));

        bindings.clear();
        assert_eq!(bindings.data(), &before);
    }
}
