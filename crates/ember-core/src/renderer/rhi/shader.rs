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

//! Shaders and the compiler front end that builds them.

use super::{DeviceObject, DeviceShared, ObjectHeader};
use crate::asset::AssetSource;
use crate::renderer::api::*;
use crate::renderer::error::{ResourceError, ShaderError};
use crate::renderer::traits::ShaderCompilerBackend;
use std::sync::Arc;

/// Compiles HLSL into [`ShaderBytecode`] and reflects it into a [`ShaderResourceLayout`].
///
/// Sources named by path are loaded through the asset layer, under `shader_root`.
#[derive(Debug, Clone)]
pub struct ShaderCompiler {
    backend: Arc<dyn ShaderCompilerBackend>,
    assets: Arc<dyn AssetSource>,
    shader_root: String,
}

impl ShaderCompiler {
    /// Creates a compiler over a backend and an asset source.
    pub fn new(
        backend: Arc<dyn ShaderCompilerBackend>,
        assets: Arc<dyn AssetSource>,
        shader_root: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            assets,
            shader_root: shader_root.into(),
        }
    }

    /// Compiles a shader for its stage's shader-model 5.0 profile.
    ///
    /// Failures are logged with the compiler diagnostics and returned.
    pub fn compile(&self, info: &ShaderInfo<'_>) -> Result<ShaderBytecode, ShaderError> {
        let label = info.display_label();
        let result = self.load_source(info).and_then(|source| {
            self.backend
                .compile(&source, &label, info.entry_point, info.stage.profile())
                .map_err(|err| ShaderError::CompilationError {
                    label: label.clone(),
                    details: err.message,
                })
        });

        match result {
            Ok(bytes) => {
                log::debug!(
                    "ShaderCompiler: compiled '{}' ({}, {} bytes)",
                    label,
                    info.stage.profile(),
                    bytes.len()
                );
                Ok(ShaderBytecode {
                    stage: info.stage,
                    entry_point: info.entry_point.to_string(),
                    bytes,
                })
            }
            Err(err) => {
                log::error!("ShaderCompiler: {err}");
                Err(err)
            }
        }
    }

    /// Reflects compiled bytecode into a resource layout.
    pub fn reflect(&self, label: &str, bytecode: &ShaderBytecode) -> Result<ShaderResourceLayout, ShaderError> {
        let result = self
            .backend
            .reflect(&bytecode.bytes)
            .map_err(|err| err.message)
            .and_then(|bindings| ShaderResourceLayout::from_reflection(&bindings));

        result.map_err(|details| {
            let err = ShaderError::ReflectionError {
                label: label.to_string(),
                details,
            };
            log::error!("ShaderCompiler: {err}");
            err
        })
    }

    fn load_source(&self, info: &ShaderInfo<'_>) -> Result<String, ShaderError> {
        match &info.source {
            ShaderSource::Code(code) => Ok(code.to_string()),
            ShaderSource::File(path) => {
                let full_path = join_shader_path(&self.shader_root, path);
                self.assets
                    .load_text(&full_path)
                    .ok_or(ShaderError::LoadError { path: full_path })
            }
        }
    }
}

/// A compiled shader for one stage, with its reflected resource layout.
#[derive(Debug)]
pub struct Shader {
    header: ObjectHeader,
    bytecode: ShaderBytecode,
    layout: Arc<ShaderResourceLayout>,
    handle: NativeHandle,
}

impl Shader {
    pub(crate) fn create(
        shared: &Arc<DeviceShared>,
        label: Option<String>,
        bytecode: ShaderBytecode,
        layout: ShaderResourceLayout,
    ) -> Result<Self, ResourceError> {
        let handle = shared.backend.create_shader(&bytecode)?;
        Ok(Self {
            header: ObjectHeader::new(DeviceObjectType::Shader, label, shared),
            bytecode,
            layout: Arc::new(layout),
            handle,
        })
    }

    /// Returns the stage the shader was compiled for.
    pub fn stage(&self) -> ShaderStage {
        self.bytecode.stage
    }

    /// Returns the compiled bytecode.
    pub fn bytecode(&self) -> &ShaderBytecode {
        &self.bytecode
    }

    /// Returns the reflected resource layout.
    pub fn resource_layout(&self) -> &Arc<ShaderResourceLayout> {
        &self.layout
    }

    /// Returns the native shader object.
    pub fn native_handle(&self) -> NativeHandle {
        self.handle
    }
}

impl DeviceObject for Shader {
    fn header(&self) -> &ObjectHeader {
        &self.header
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        self.header.release(self.handle);
    }
}
