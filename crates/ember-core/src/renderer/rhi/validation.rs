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

//! Cross-checks filled binding tables against the reflected shader layouts.
//!
//! The pass is diagnostic only: every finding is logged at error level and collected
//! in a [`ValidationReport`], but nothing stops the caller from submitting work.

use super::bindings::{PipelineResourceBindingData, StageBindings, StageLayouts};
use super::{Buffer, DeviceObject, ResourceRef, Sampler, ShaderRWResourceView, ShaderResourceView};
use crate::renderer::api::*;
use std::fmt;
use std::sync::Arc;

/// What is wrong with one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssueKind {
    /// A slot the shader declares holds nothing.
    MissingBinding,
    /// The bound resource is not what the shader was compiled against.
    TypeMismatch {
        /// What reflection says the shader expects.
        expected: ShaderResourceKind,
        /// What the bound resource provides.
        actual: ShaderResourceKind,
    },
    /// A buffer without the constant-buffer bind flag sits in a constant-buffer slot.
    NotAConstantBuffer,
    /// A slot no shader variable covers holds a resource.
    UnexpectedBinding,
}

/// One finding of [`validate_pipeline_resource_bindings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// The shader stage.
    pub stage: ShaderStage,
    /// The binding category.
    pub category: ResourceCategory,
    /// The slot index.
    pub slot: u32,
    /// The shader variable covering the slot, empty for unexpected bindings.
    pub variable: String,
    /// What is wrong.
    pub kind: ValidationIssueKind,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            stage,
            category,
            slot,
            variable,
            kind,
        } = self;
        match kind {
            ValidationIssueKind::MissingBinding => write!(
                f,
                "missing binding: {stage:?} {category:?} slot {slot} ('{variable}')"
            ),
            ValidationIssueKind::TypeMismatch { expected, actual } => write!(
                f,
                "type mismatch: {stage:?} {category:?} slot {slot} ('{variable}') expects {expected:?}, got {actual:?}"
            ),
            ValidationIssueKind::NotAConstantBuffer => write!(
                f,
                "{stage:?} {category:?} slot {slot} ('{variable}') holds a buffer without CONSTANT_BUFFER"
            ),
            ValidationIssueKind::UnexpectedBinding => write!(
                f,
                "{stage:?} {category:?} slot {slot} is bound but no shader variable uses it"
            ),
        }
    }
}

/// The findings of one validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Every finding, in stage, category and slot order.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Returns `true` if nothing was found.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns the number of findings.
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Returns `true` if nothing was found.
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Iterates over the unset slots.
    pub fn missing_bindings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|issue| issue.kind == ValidationIssueKind::MissingBinding)
    }
}

/// Walks every stage and category of `data` and checks it against `layouts`.
///
/// Each declared slot must be filled, and filled with the kind of resource the shader
/// was compiled against. Stages without a shader must have no bindings at all.
pub fn validate_pipeline_resource_bindings(
    label: Option<&str>,
    layouts: &StageLayouts,
    data: &PipelineResourceBindingData,
) -> ValidationReport {
    let mut report = ValidationReport::default();
    for stage in ShaderStage::ALL {
        let bindings = data.stage(stage);
        let Some(layout) = &layouts[stage.index()] else {
            debug_assert!(
                bindings.filled_count() == 0,
                "{stage:?} has bindings but no shader"
            );
            continue;
        };
        for category in ResourceCategory::ALL {
            check_category(&mut report, stage, category, layout, bindings);
        }
    }

    for issue in &report.issues {
        log::error!(
            "Pipeline '{}': {}",
            label.unwrap_or("Unknown"),
            issue
        );
    }
    report
}

fn check_category(
    report: &mut ValidationReport,
    stage: ShaderStage,
    category: ResourceCategory,
    layout: &ShaderResourceLayout,
    bindings: &StageBindings,
) {
    let entries = layout.entries(category);
    let mut push = |slot: u32, variable: &str, kind| {
        report.issues.push(ValidationIssue {
            stage,
            category,
            slot,
            variable: variable.to_string(),
            kind,
        });
    };

    for slot in 0..bindings.slot_count(category) as u32 {
        let entry = entries.iter().find(|entry| entry.covers(slot));
        let bound = bound_kind(bindings, category, slot as usize);
        match (entry, bound) {
            (Some(entry), None) => push(slot, &entry.name, ValidationIssueKind::MissingBinding),
            (Some(entry), Some(Bound::Kind(actual))) => {
                if entry.kind != actual {
                    push(
                        slot,
                        &entry.name,
                        ValidationIssueKind::TypeMismatch {
                            expected: entry.kind,
                            actual,
                        },
                    );
                }
            }
            (Some(entry), Some(Bound::NotAConstantBuffer)) => {
                push(slot, &entry.name, ValidationIssueKind::NotAConstantBuffer)
            }
            (None, Some(_)) => push(slot, "", ValidationIssueKind::UnexpectedBinding),
            (None, None) => {}
        }
    }
}

enum Bound {
    Kind(ShaderResourceKind),
    NotAConstantBuffer,
}

fn bound_kind(bindings: &StageBindings, category: ResourceCategory, slot: usize) -> Option<Bound> {
    fn filled<T>(table: &[Option<Arc<T>>], slot: usize) -> Option<&Arc<T>> {
        table.get(slot).and_then(Option::as_ref)
    }

    match category {
        ResourceCategory::ConstantBuffer => filled(&bindings.constant_buffers, slot).map(constant_buffer_kind),
        ResourceCategory::ShaderResource => filled(&bindings.shader_resources, slot)
            .map(|view: &Arc<ShaderResourceView>| Bound::Kind(view_kind(view.resource(), view.dimension()))),
        ResourceCategory::ShaderRWResource => filled(&bindings.rw_resources, slot)
            .map(|view: &Arc<ShaderRWResourceView>| Bound::Kind(view_kind(view.resource(), view.dimension()))),
        ResourceCategory::Sampler => {
            filled(&bindings.samplers, slot).map(|_: &Arc<Sampler>| Bound::Kind(ShaderResourceKind::Sampler))
        }
    }
}

fn constant_buffer_kind(buffer: &Arc<Buffer>) -> Bound {
    if buffer.bind_flags().contains(BindFlags::CONSTANT_BUFFER) {
        Bound::Kind(ShaderResourceKind::Buffer(BufferSubType::None))
    } else {
        log::debug!(
            "Buffer '{}' is bound as a constant buffer",
            buffer.label().unwrap_or("Unknown")
        );
        Bound::NotAConstantBuffer
    }
}

/// Returns what a view offers a shader: a buffer's sub-type, or the texture type and
/// qualifiers its dimension implies.
fn view_kind(resource: &ResourceRef, dimension: ViewDimension) -> ShaderResourceKind {
    match resource {
        ResourceRef::Buffer(buffer) => ShaderResourceKind::Buffer(buffer.sub_type()),
        ResourceRef::Texture(texture) => match texture_kind_for_dimension(dimension) {
            Some((texture_type, flags)) => ShaderResourceKind::Texture(texture_type, flags),
            None => ShaderResourceKind::Texture(texture.texture_type(), TextureSubTypeFlags::empty()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout_with(category: ResourceCategory, name: &str, start_slot: u32, slot_count: u32, kind: ShaderResourceKind) -> Arc<ShaderResourceLayout> {
        let mut layout = ShaderResourceLayout::new();
        layout.push(
            category,
            ShaderResourceInfo {
                name: name.to_string(),
                start_slot,
                slot_count,
                kind,
            },
        );
        Arc::new(layout)
    }

    #[test]
    fn every_unset_declared_slot_is_reported_once() {
        let mut layouts = StageLayouts::default();
        layouts[ShaderStage::Pixel.index()] = Some(layout_with(
            ResourceCategory::Sampler,
            "samplers",
            1,
            2,
            ShaderResourceKind::Sampler,
        ));
        let data = PipelineResourceBindingData::from_layouts(&layouts);

        let report = validate_pipeline_resource_bindings(Some("test"), &layouts, &data);
        assert_eq!(report.len(), 2);
        let slots: Vec<_> = report.missing_bindings().map(|issue| issue.slot).collect();
        assert_eq!(slots, vec![1, 2]);
        assert!(report
            .issues
            .iter()
            .all(|issue| issue.stage == ShaderStage::Pixel && issue.variable == "samplers"));
    }

    #[test]
    fn empty_layouts_validate_clean() {
        let layouts = StageLayouts::default();
        let data = PipelineResourceBindingData::from_layouts(&layouts);
        assert!(validate_pipeline_resource_bindings(None, &layouts, &data).is_clean());
    }

    #[test]
    fn issue_display_names_stage_category_and_slot() {
        let issue = ValidationIssue {
            stage: ShaderStage::Pixel,
            category: ResourceCategory::Sampler,
            slot: 0,
            variable: "linearSampler".to_string(),
            kind: ValidationIssueKind::MissingBinding,
        };
        assert_eq!(
            issue.to_string(),
            "missing binding: Pixel Sampler slot 0 ('linearSampler')"
        );
    }
}
