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

//! Shader creation descriptors.

use super::ShaderStage;
use std::borrow::Cow;

/// Where the HLSL text of a shader comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderSource<'a> {
    /// A path resolved through the device's [`AssetSource`](crate::asset::AssetSource),
    /// relative to the configured shader root.
    File(Cow<'a, str>),
    /// Inline source text.
    Code(Cow<'a, str>),
}

/// Describes a shader to be compiled by the [`ShaderCompiler`](crate::renderer::rhi::ShaderCompiler).
#[derive(Debug, Clone)]
pub struct ShaderInfo<'a> {
    /// An optional debug label. Defaults to the file path for file sources.
    pub label: Option<&'a str>,
    /// The stage the shader is compiled for.
    pub stage: ShaderStage,
    /// The HLSL source.
    pub source: ShaderSource<'a>,
    /// The name of the entry-point function.
    pub entry_point: &'a str,
}

impl ShaderInfo<'_> {
    /// Returns the label used in diagnostics.
    pub fn display_label(&self) -> String {
        match (self.label, &self.source) {
            (Some(label), _) => label.to_string(),
            (None, ShaderSource::File(path)) => path.to_string(),
            (None, ShaderSource::Code(_)) => format!("inline {:?} shader", self.stage),
        }
    }
}

/// The compiled form of a shader, ready to create a native shader object from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderBytecode {
    /// The stage the bytecode was compiled for.
    pub stage: ShaderStage,
    /// The entry point that was compiled.
    pub entry_point: String,
    /// The opaque compiled blob.
    pub bytes: Vec<u8>,
}
