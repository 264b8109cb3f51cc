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

//! Vertex input layout descriptors.

use super::enums::{PrimitiveTopology, VertexFormat, VertexStepMode};
use std::borrow::Cow;
use std::collections::HashSet;

/// The number of vertex buffer slots of the input assembler.
pub const MAX_VERTEX_BUFFER_SLOTS: u32 = 32;

/// One element of a vertex, matched to the vertex shader input by semantic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InputElement {
    /// The HLSL semantic name (`POSITION`, `TEXCOORD`, ...).
    pub semantic: Cow<'static, str>,
    /// The semantic index (`TEXCOORD1` has index 1).
    pub semantic_index: u32,
    /// The element format.
    pub format: VertexFormat,
    /// The vertex buffer slot the element is read from.
    pub input_slot: u32,
    /// Byte offset inside the vertex, or `None` to follow the previous element of the slot.
    pub offset: Option<u32>,
    /// Per-vertex or per-instance data.
    pub step_mode: VertexStepMode,
    /// Instances drawn per element advance. Must be 0 for per-vertex data.
    pub instance_step_rate: u32,
}

impl InputElement {
    /// A per-vertex element in slot 0, appended after the previous element.
    pub fn per_vertex(semantic: &'static str, semantic_index: u32, format: VertexFormat) -> Self {
        Self {
            semantic: Cow::Borrowed(semantic),
            semantic_index,
            format,
            input_slot: 0,
            offset: None,
            step_mode: VertexStepMode::Vertex,
            instance_step_rate: 0,
        }
    }
}

/// The ordered vertex input elements plus the primitive topology they assemble into.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct InputLayout {
    /// The elements, in declaration order.
    pub elements: Vec<InputElement>,
    /// How vertices form primitives.
    pub topology: PrimitiveTopology,
}

impl InputLayout {
    /// Returns the byte offset of every element, resolving appended offsets per slot.
    pub fn resolved_offsets(&self) -> Vec<u32> {
        let mut cursors = [0u32; MAX_VERTEX_BUFFER_SLOTS as usize];
        self.elements
            .iter()
            .map(|element| {
                let cursor = &mut cursors[(element.input_slot % MAX_VERTEX_BUFFER_SLOTS) as usize];
                let offset = element.offset.unwrap_or(*cursor);
                *cursor = offset + element.format.size();
                offset
            })
            .collect()
    }

    /// Returns the vertex stride of `slot`: the end of its furthest element.
    pub fn stride(&self, slot: u32) -> u32 {
        self.elements
            .iter()
            .zip(self.resolved_offsets())
            .filter(|(element, _)| element.input_slot == slot)
            .map(|(element, offset)| offset + element.format.size())
            .max()
            .unwrap_or(0)
    }

    /// Checks the layout for slot, semantic and topology errors.
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for element in &self.elements {
            if element.input_slot >= MAX_VERTEX_BUFFER_SLOTS {
                return Err(format!(
                    "{}{} reads slot {} (max {})",
                    element.semantic,
                    element.semantic_index,
                    element.input_slot,
                    MAX_VERTEX_BUFFER_SLOTS - 1
                ));
            }
            if element.step_mode == VertexStepMode::Vertex && element.instance_step_rate != 0 {
                return Err(format!(
                    "{}{} is per-vertex but has an instance step rate",
                    element.semantic, element.semantic_index
                ));
            }
            let key = (element.semantic.to_ascii_uppercase(), element.semantic_index);
            if !seen.insert(key) {
                return Err(format!(
                    "{}{} is declared twice",
                    element.semantic, element.semantic_index
                ));
            }
        }
        if let PrimitiveTopology::PatchList(points) = self.topology {
            if !(1..=32).contains(&points) {
                return Err(format!("patch lists take 1 to 32 control points, got {points}"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position_uv() -> InputLayout {
        InputLayout {
            elements: vec![
                InputElement::per_vertex("POSITION", 0, VertexFormat::Float32x3),
                InputElement::per_vertex("TEXCOORD", 0, VertexFormat::Float32x2),
            ],
            topology: PrimitiveTopology::TriangleList,
        }
    }

    #[test]
    fn appended_offsets_follow_previous_element() {
        let layout = position_uv();
        assert_eq!(layout.resolved_offsets(), vec![0, 12]);
        assert_eq!(layout.stride(0), 20);
        assert_eq!(layout.stride(1), 0);
        assert!(layout.validate().is_ok());
    }

    #[test]
    fn duplicate_semantics_are_rejected() {
        let mut layout = position_uv();
        layout
            .elements
            .push(InputElement::per_vertex("position", 0, VertexFormat::Float32x4));
        assert!(layout.validate().is_err());
    }

    #[test]
    fn out_of_range_slot_is_rejected() {
        let mut layout = position_uv();
        layout.elements[1].input_slot = 40;
        assert!(layout.validate().is_err());
    }
}
