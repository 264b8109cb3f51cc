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

//! Shader reflection data and the per-shader resource layout derived from it.
//!
//! A backend compiler reports every resource a shader binds as a [`ReflectedBinding`].
//! [`ShaderResourceLayout::from_reflection`] sorts those into the four binding
//! categories and records, for each entry, what kind of resource the shader expects
//! at its slots.

use super::{BufferSubType, ResourceCategory, TextureSubTypeFlags, TextureType, ViewDimension};

/// The kind of a resource binding as reported by reflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderInputType {
    /// `cbuffer`
    ConstantBuffer,
    /// `tbuffer`
    TextureBuffer,
    /// `Texture*` and `Buffer<T>`
    Texture,
    /// `SamplerState` and `SamplerComparisonState`
    Sampler,
    /// `RWTexture*` and `RWBuffer<T>`
    RwTyped,
    /// `StructuredBuffer<T>`
    Structured,
    /// `RWStructuredBuffer<T>`
    RwStructured,
    /// `ByteAddressBuffer`
    ByteAddress,
    /// `RWByteAddressBuffer`
    RwByteAddress,
    /// `AppendStructuredBuffer<T>`
    AppendStructured,
    /// `ConsumeStructuredBuffer<T>`
    ConsumeStructured,
    /// `RWStructuredBuffer<T>` with a hidden counter.
    RwStructuredWithCounter,
}

/// One resource binding as reported by the backend compiler's reflection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectedBinding {
    /// The variable name in the shader source.
    pub name: String,
    /// The declared resource kind.
    pub input_type: ShaderInputType,
    /// The declared dimension for texture-like resources, `Unknown` otherwise.
    pub dimension: ViewDimension,
    /// The first register the binding occupies.
    pub bind_point: u32,
    /// The number of consecutive registers (array length).
    pub bind_count: u32,
}

/// What a shader expects to find at a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderResourceKind {
    /// A buffer of the given sub-type. Constant buffers use [`BufferSubType::None`].
    Buffer(BufferSubType),
    /// A texture of the given type and qualifiers.
    Texture(TextureType, TextureSubTypeFlags),
    /// A sampler.
    Sampler,
}

/// One entry of a [`ShaderResourceLayout`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderResourceInfo {
    /// The variable name in the shader source.
    pub name: String,
    /// The first slot.
    pub start_slot: u32,
    /// The number of consecutive slots.
    pub slot_count: u32,
    /// What the shader expects at these slots.
    pub kind: ShaderResourceKind,
}

impl ShaderResourceInfo {
    /// Returns the exclusive end of the slot range.
    pub const fn end_slot(&self) -> u32 {
        self.start_slot.saturating_add(self.slot_count)
    }

    /// Returns `true` if `slot` falls inside this entry.
    pub const fn covers(&self, slot: u32) -> bool {
        slot >= self.start_slot && slot < self.end_slot()
    }
}

/// Maps a texture view dimension to the texture type and qualifiers it implies.
///
/// Returns `None` for `Unknown` and `Buffer`.
pub const fn texture_kind_for_dimension(
    dimension: ViewDimension,
) -> Option<(TextureType, TextureSubTypeFlags)> {
    let empty = TextureSubTypeFlags::empty();
    let array = TextureSubTypeFlags::ARRAY;
    let ms = TextureSubTypeFlags::MULTISAMPLED;
    match dimension {
        ViewDimension::Texture1D => Some((TextureType::Texture1D, empty)),
        ViewDimension::Texture1DArray => Some((TextureType::Texture1D, array)),
        ViewDimension::Texture2D => Some((TextureType::Texture2D, empty)),
        ViewDimension::Texture2DArray => Some((TextureType::Texture2D, array)),
        ViewDimension::Texture2DMS => Some((TextureType::Texture2D, ms)),
        ViewDimension::Texture2DMSArray => Some((TextureType::Texture2D, ms.union(array))),
        ViewDimension::Texture3D => Some((TextureType::Texture3D, empty)),
        ViewDimension::TextureCube => Some((TextureType::TextureCube, empty)),
        ViewDimension::TextureCubeArray => Some((TextureType::TextureCube, array)),
        ViewDimension::Unknown | ViewDimension::Buffer => None,
    }
}

/// The resources a compiled shader binds, grouped by category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderResourceLayout {
    entries: [Vec<ShaderResourceInfo>; ResourceCategory::COUNT],
    slot_counts: [u32; ResourceCategory::COUNT],
}

impl ShaderResourceLayout {
    /// Creates an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a layout from reflected bindings.
    ///
    /// Fails on texture-like bindings with an unknown dimension and on bindings
    /// beyond the per-stage slot limits.
    pub fn from_reflection(bindings: &[ReflectedBinding]) -> Result<Self, String> {
        let mut layout = Self::new();
        for binding in bindings {
            let (category, kind) = classify(binding)?;
            let info = ShaderResourceInfo {
                name: binding.name.clone(),
                start_slot: binding.bind_point,
                slot_count: binding.bind_count.max(1),
                kind,
            };
            if info.end_slot() > category.max_slots() {
                return Err(format!(
                    "'{}' occupies slots {}..{} but a stage only has {} {:?} slots",
                    info.name,
                    info.start_slot,
                    info.end_slot(),
                    category.max_slots(),
                    category
                ));
            }
            layout.push(category, info);
        }
        Ok(layout)
    }

    /// Appends an entry and updates the category's slot count.
    pub fn push(&mut self, category: ResourceCategory, info: ShaderResourceInfo) {
        let count = &mut self.slot_counts[category.index()];
        *count = (*count).max(info.end_slot());
        self.entries[category.index()].push(info);
    }

    /// Returns the entries of one category, in reflection order.
    pub fn entries(&self, category: ResourceCategory) -> &[ShaderResourceInfo] {
        &self.entries[category.index()]
    }

    /// Returns the number of slots a category spans: the maximum `start_slot + slot_count`.
    pub fn slot_count(&self, category: ResourceCategory) -> u32 {
        self.slot_counts[category.index()]
    }

    /// Returns the constant-buffer entries.
    pub fn constant_buffers(&self) -> &[ShaderResourceInfo] {
        self.entries(ResourceCategory::ConstantBuffer)
    }

    /// Returns the read-only view entries.
    pub fn shader_resources(&self) -> &[ShaderResourceInfo] {
        self.entries(ResourceCategory::ShaderResource)
    }

    /// Returns the read-write view entries.
    pub fn rw_resources(&self) -> &[ShaderResourceInfo] {
        self.entries(ResourceCategory::ShaderRWResource)
    }

    /// Returns the sampler entries.
    pub fn samplers(&self) -> &[ShaderResourceInfo] {
        self.entries(ResourceCategory::Sampler)
    }

    /// Looks up an entry by variable name within one category.
    pub fn find(&self, category: ResourceCategory, name: &str) -> Option<&ShaderResourceInfo> {
        self.entries(category).iter().find(|info| info.name == name)
    }

    /// Returns `true` if the shader binds nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(Vec::is_empty)
    }
}

fn classify(
    binding: &ReflectedBinding,
) -> Result<(ResourceCategory, ShaderResourceKind), String> {
    use ShaderInputType as T;

    let texture_or_typed_buffer = |category| {
        if binding.dimension == ViewDimension::Buffer {
            return Ok((category, ShaderResourceKind::Buffer(BufferSubType::Typed)));
        }
        match texture_kind_for_dimension(binding.dimension) {
            Some((ty, flags)) => Ok((category, ShaderResourceKind::Texture(ty, flags))),
            None => Err(format!(
                "'{}' has an unsupported dimension {:?}",
                binding.name, binding.dimension
            )),
        }
    };

    match binding.input_type {
        T::ConstantBuffer => Ok((
            ResourceCategory::ConstantBuffer,
            ShaderResourceKind::Buffer(BufferSubType::None),
        )),
        T::TextureBuffer => Ok((
            ResourceCategory::ShaderResource,
            ShaderResourceKind::Buffer(BufferSubType::Typed),
        )),
        T::Sampler => Ok((ResourceCategory::Sampler, ShaderResourceKind::Sampler)),
        T::Texture => texture_or_typed_buffer(ResourceCategory::ShaderResource),
        T::RwTyped => texture_or_typed_buffer(ResourceCategory::ShaderRWResource),
        T::Structured => Ok((
            ResourceCategory::ShaderResource,
            ShaderResourceKind::Buffer(BufferSubType::Structured),
        )),
        T::ByteAddress => Ok((
            ResourceCategory::ShaderResource,
            ShaderResourceKind::Buffer(BufferSubType::Raw),
        )),
        T::RwStructured | T::AppendStructured | T::ConsumeStructured | T::RwStructuredWithCounter => {
            Ok((
                ResourceCategory::ShaderRWResource,
                ShaderResourceKind::Buffer(BufferSubType::Structured),
            ))
        }
        T::RwByteAddress => Ok((
            ResourceCategory::ShaderRWResource,
            ShaderResourceKind::Buffer(BufferSubType::Raw),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding(name: &str, input_type: ShaderInputType, dimension: ViewDimension, bind_point: u32, bind_count: u32) -> ReflectedBinding {
        ReflectedBinding {
            name: name.to_string(),
            input_type,
            dimension,
            bind_point,
            bind_count,
        }
    }

    #[test]
    fn end_slot_saturates_at_the_top_of_the_range() {
        let info = ShaderResourceInfo {
            name: "tail".to_string(),
            start_slot: u32::MAX,
            slot_count: 2,
            kind: ShaderResourceKind::Sampler,
        };
        assert_eq!(info.end_slot(), u32::MAX);
        assert!(!info.covers(0));
    }

    #[test]
    fn constant_buffer_slot_count_is_max_end() {
        let layout = ShaderResourceLayout::from_reflection(&[
            binding("PerFrame", ShaderInputType::ConstantBuffer, ViewDimension::Unknown, 0, 1),
            binding("Bones", ShaderInputType::ConstantBuffer, ViewDimension::Unknown, 5, 2),
            binding("PerObject", ShaderInputType::ConstantBuffer, ViewDimension::Unknown, 2, 1),
        ])
        .unwrap();

        assert_eq!(layout.constant_buffers().len(), 3);
        assert_eq!(layout.slot_count(ResourceCategory::ConstantBuffer), 7);
        assert_eq!(layout.slot_count(ResourceCategory::ShaderResource), 0);
        assert_eq!(
            layout.constant_buffers()[0].kind,
            ShaderResourceKind::Buffer(BufferSubType::None)
        );
    }

    #[test]
    fn textures_and_buffers_are_classified() {
        let layout = ShaderResourceLayout::from_reflection(&[
            binding("Albedo", ShaderInputType::Texture, ViewDimension::Texture2D, 0, 1),
            binding("Shadows", ShaderInputType::Texture, ViewDimension::Texture2DArray, 1, 1),
            binding("Sky", ShaderInputType::Texture, ViewDimension::TextureCubeArray, 2, 1),
            binding("Lights", ShaderInputType::Structured, ViewDimension::Buffer, 3, 1),
            binding("Palette", ShaderInputType::Texture, ViewDimension::Buffer, 4, 1),
            binding("Output", ShaderInputType::RwByteAddress, ViewDimension::Buffer, 0, 1),
            binding("Linear", ShaderInputType::Sampler, ViewDimension::Unknown, 0, 1),
        ])
        .unwrap();

        let kinds: Vec<_> = layout.shader_resources().iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ShaderResourceKind::Texture(TextureType::Texture2D, TextureSubTypeFlags::empty()),
                ShaderResourceKind::Texture(TextureType::Texture2D, TextureSubTypeFlags::ARRAY),
                ShaderResourceKind::Texture(TextureType::TextureCube, TextureSubTypeFlags::ARRAY),
                ShaderResourceKind::Buffer(BufferSubType::Structured),
                ShaderResourceKind::Buffer(BufferSubType::Typed),
            ]
        );
        assert_eq!(
            layout.rw_resources()[0].kind,
            ShaderResourceKind::Buffer(BufferSubType::Raw)
        );
        assert_eq!(layout.samplers()[0].kind, ShaderResourceKind::Sampler);
        assert_eq!(layout.find(ResourceCategory::ShaderResource, "Sky").unwrap().start_slot, 2);
        assert!(layout.find(ResourceCategory::Sampler, "Sky").is_none());
    }

    #[test]
    fn unknown_texture_dimension_fails() {
        let result = ShaderResourceLayout::from_reflection(&[binding(
            "Broken",
            ShaderInputType::Texture,
            ViewDimension::Unknown,
            0,
            1,
        )]);
        assert!(result.is_err());
    }

    #[test]
    fn slot_limits_are_enforced() {
        let result = ShaderResourceLayout::from_reflection(&[binding(
            "TooFar",
            ShaderInputType::ConstantBuffer,
            ViewDimension::Unknown,
            14,
            1,
        )]);
        assert!(result.is_err());
    }
}
