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

//! The bytecode container produced by [`HlslCompiler`](super::HlslCompiler).
//!
//! Layout: the four magic bytes `EMBC` followed by a JSON document describing the target
//! profile, the entry point, the bound resources and the input signature.

use crate::graphics::soft::native::limits;
use ember_core::renderer::api::{ShaderInputType, ShaderStage, ViewDimension};
use serde::{Deserialize, Serialize};

/// Magic bytes at the start of every container.
pub const CONTAINER_MAGIC: &[u8; 4] = b"EMBC";

/// One resource binding recorded in the container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerResource {
    /// The shader variable name (`$Globals` for the implicit constant buffer).
    pub name: String,
    /// The HLSL type (`Texture2D`, `RWStructuredBuffer`, `cbuffer`, ...).
    pub type_name: String,
    /// First register.
    pub bind_point: u32,
    /// Number of consecutive registers.
    pub bind_count: u32,
}

/// One element of the entry point's input signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignatureElement {
    /// The semantic name without its index, upper-cased.
    pub semantic: String,
    /// The semantic index.
    pub index: u32,
}

impl SignatureElement {
    /// Splits `TEXCOORD1` into `("TEXCOORD", 1)`.
    pub fn parse(semantic: &str) -> Self {
        let digits = semantic.len() - semantic.trim_end_matches(|c: char| c.is_ascii_digit()).len();
        let (name, index) = semantic.split_at(semantic.len() - digits);
        Self {
            semantic: name.to_ascii_uppercase(),
            index: index.parse().unwrap_or(0),
        }
    }

    /// Returns `true` for system-value semantics, which the input assembler does not feed.
    pub fn is_system_value(&self) -> bool {
        self.semantic.starts_with("SV_")
    }
}

/// The decoded content of compiled bytecode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderContainer {
    /// The target profile, e.g. `ps_5_0`.
    pub profile: String,
    /// The compiled entry point.
    pub entry_point: String,
    /// Every resource reachable from the entry point.
    pub resources: Vec<ContainerResource>,
    /// The entry point's input signature.
    #[serde(default)]
    pub inputs: Vec<SignatureElement>,
}

impl ShaderContainer {
    /// Serializes the container.
    pub fn encode(&self) -> Result<Vec<u8>, String> {
        let mut bytes = CONTAINER_MAGIC.to_vec();
        serde_json::to_writer(&mut bytes, self).map_err(|e| e.to_string())?;
        Ok(bytes)
    }

    /// Parses bytecode produced by [`ShaderContainer::encode`].
    pub fn decode(bytes: &[u8]) -> Result<Self, String> {
        match bytes.strip_prefix(CONTAINER_MAGIC.as_slice()) {
            Some(payload) => serde_json::from_slice(payload).map_err(|e| format!("corrupt shader container: {e}")),
            None => Err("bytecode is not a shader container".to_string()),
        }
    }

    /// The stage the container was compiled for.
    pub fn stage(&self) -> Option<ShaderStage> {
        stage_for_profile(&self.profile)
    }
}

/// Maps a `xs_5_0` profile to its stage.
pub fn stage_for_profile(profile: &str) -> Option<ShaderStage> {
    ShaderStage::ALL.into_iter().find(|stage| stage.profile() == profile)
}

/// How a resource type binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceClass {
    /// The reflected input type.
    pub input_type: ShaderInputType,
    /// The view dimension the resource expects.
    pub dimension: ViewDimension,
    /// The register letter: `b`, `t`, `s` or `u`.
    pub register: char,
}

impl ResourceClass {
    const fn new(input_type: ShaderInputType, dimension: ViewDimension, register: char) -> Self {
        Self {
            input_type,
            dimension,
            register,
        }
    }
}

/// Returns the number of registers a stage has for a register letter.
pub const fn register_count(register: char) -> u32 {
    match register {
        'b' => limits::COMMONSHADER_CONSTANT_BUFFER_API_SLOT_COUNT,
        't' => limits::COMMONSHADER_INPUT_RESOURCE_SLOT_COUNT,
        's' => limits::COMMONSHADER_SAMPLER_SLOT_COUNT,
        'u' => limits::PS_CS_UAV_REGISTER_COUNT,
        _ => 0,
    }
}

/// Classifies an HLSL resource type name.
pub fn classify(type_name: &str) -> Option<ResourceClass> {
    use ShaderInputType as T;
    use ViewDimension as D;

    let class = match type_name {
        "cbuffer" | "ConstantBuffer" => ResourceClass::new(T::ConstantBuffer, D::Unknown, 'b'),
        "tbuffer" => ResourceClass::new(T::TextureBuffer, D::Buffer, 't'),
        "Buffer" => ResourceClass::new(T::Texture, D::Buffer, 't'),
        "Texture1D" => ResourceClass::new(T::Texture, D::Texture1D, 't'),
        "Texture1DArray" => ResourceClass::new(T::Texture, D::Texture1DArray, 't'),
        "Texture2D" => ResourceClass::new(T::Texture, D::Texture2D, 't'),
        "Texture2DArray" => ResourceClass::new(T::Texture, D::Texture2DArray, 't'),
        "Texture2DMS" => ResourceClass::new(T::Texture, D::Texture2DMS, 't'),
        "Texture2DMSArray" => ResourceClass::new(T::Texture, D::Texture2DMSArray, 't'),
        "Texture3D" => ResourceClass::new(T::Texture, D::Texture3D, 't'),
        "TextureCube" => ResourceClass::new(T::Texture, D::TextureCube, 't'),
        "TextureCubeArray" => ResourceClass::new(T::Texture, D::TextureCubeArray, 't'),
        "StructuredBuffer" => ResourceClass::new(T::Structured, D::Buffer, 't'),
        "ByteAddressBuffer" => ResourceClass::new(T::ByteAddress, D::Buffer, 't'),
        "RWBuffer" => ResourceClass::new(T::RwTyped, D::Buffer, 'u'),
        "RWTexture1D" => ResourceClass::new(T::RwTyped, D::Texture1D, 'u'),
        "RWTexture1DArray" => ResourceClass::new(T::RwTyped, D::Texture1DArray, 'u'),
        "RWTexture2D" => ResourceClass::new(T::RwTyped, D::Texture2D, 'u'),
        "RWTexture2DArray" => ResourceClass::new(T::RwTyped, D::Texture2DArray, 'u'),
        "RWTexture3D" => ResourceClass::new(T::RwTyped, D::Texture3D, 'u'),
        "RWStructuredBuffer" => ResourceClass::new(T::RwStructured, D::Buffer, 'u'),
        "RWByteAddressBuffer" => ResourceClass::new(T::RwByteAddress, D::Buffer, 'u'),
        "AppendStructuredBuffer" => ResourceClass::new(T::AppendStructured, D::Buffer, 'u'),
        "ConsumeStructuredBuffer" => ResourceClass::new(T::ConsumeStructured, D::Buffer, 'u'),
        "SamplerState" | "SamplerComparisonState" | "sampler" => {
            ResourceClass::new(T::Sampler, D::Unknown, 's')
        }
        _ => return None,
    };
    Some(class)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_survives_encoding() {
        let container = ShaderContainer {
            profile: "ps_5_0".into(),
            entry_point: "main".into(),
            resources: vec![ContainerResource {
                name: "albedo".into(),
                type_name: "Texture2D".into(),
                bind_point: 0,
                bind_count: 1,
            }],
            inputs: vec![SignatureElement::parse("TEXCOORD0")],
        };
        let bytes = container.encode().unwrap();
        assert_eq!(&bytes[..4], b"EMBC");
        assert_eq!(ShaderContainer::decode(&bytes).unwrap(), container);
        assert_eq!(container.stage(), Some(ShaderStage::Pixel));
    }

    #[test]
    fn foreign_bytes_are_rejected() {
        assert!(ShaderContainer::decode(b"DXBC....").is_err());
        assert!(ShaderContainer::decode(b"EMBC{").unwrap_err().starts_with("corrupt"));
    }

    #[test]
    fn semantic_indices_are_split_off() {
        assert_eq!(
            SignatureElement::parse("texcoord12"),
            SignatureElement {
                semantic: "TEXCOORD".into(),
                index: 12
            }
        );
        let position = SignatureElement::parse("POSITION");
        assert_eq!(position.index, 0);
        assert!(SignatureElement::parse("SV_VertexID").is_system_value());
    }

    #[test]
    fn resource_types_map_to_register_classes() {
        assert_eq!(classify("RWTexture2D").map(|c| c.register), Some('u'));
        assert_eq!(classify("TextureCubeArray").map(|c| c.dimension), Some(ViewDimension::TextureCubeArray));
        assert_eq!(classify("SamplerComparisonState").map(|c| c.register), Some('s'));
        assert_eq!(classify("float4"), None);
        assert_eq!(register_count('u'), 8);
    }
}
