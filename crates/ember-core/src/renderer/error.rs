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

//! Defines the hierarchy of error types for the rendering subsystem.
//!
//! None of these errors unwind a frame: every producer logs the failure before
//! returning it, and callers are free to ignore soft errors such as
//! [`BindingError`].

use crate::renderer::api::{BindFlags, DeviceObjectType, ResourceCategory, ShaderStage};
use std::fmt;

/// A failure reported by a native backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendError {
    /// A backend-specific result code (an `HRESULT` for D3D11-style backends).
    pub code: u32,
    /// Human readable diagnostics.
    pub message: String,
}

impl BackendError {
    /// Creates a new backend error.
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:08X})", self.message, self.code)
    }
}

impl std::error::Error for BackendError {}

/// An error related to the loading, compilation or reflection of a shader.
#[derive(Debug)]
pub enum ShaderError {
    /// The shader source could not be loaded from the asset layer.
    LoadError {
        /// The path that failed to load.
        path: String,
    },
    /// The backend compiler rejected the source.
    CompilationError {
        /// A descriptive label for the shader.
        label: String,
        /// Diagnostics produced by the compiler.
        details: String,
    },
    /// The compiled bytecode could not be reflected into a resource layout.
    ReflectionError {
        /// A descriptive label for the shader.
        label: String,
        /// What went wrong.
        details: String,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::LoadError { path } => {
                write!(f, "Failed to load shader source from '{path}'")
            }
            ShaderError::CompilationError { label, details } => {
                write!(f, "Shader compilation failed for '{label}': {details}")
            }
            ShaderError::ReflectionError { label, details } => {
                write!(f, "Shader reflection failed for '{label}': {details}")
            }
        }
    }
}

impl std::error::Error for ShaderError {}

/// An error raised while building a pipeline.
#[derive(Debug)]
pub enum PipelineError {
    /// An input layout cannot be built without a vertex shader.
    MissingVertexShader {
        /// The label of the pipeline being created.
        label: Option<String>,
    },
    /// A shader was attached to a stage it was not compiled for.
    StageMismatch {
        /// The stage slot the shader was attached to.
        slot: ShaderStage,
        /// The stage the shader was compiled for.
        shader_stage: ShaderStage,
    },
    /// A state object could not be created.
    StateCreationFailed {
        /// Which state object failed ("input layout", "rasterizer state", ...).
        state: &'static str,
        /// Details from the validation pass or the backend.
        details: String,
    },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::MissingVertexShader { label } => write!(
                f,
                "Pipeline '{}' has no vertex shader to build an input layout from",
                label.as_deref().unwrap_or("Unknown")
            ),
            PipelineError::StageMismatch { slot, shader_stage } => write!(
                f,
                "A {shader_stage:?} shader was attached to the {slot:?} stage"
            ),
            PipelineError::StateCreationFailed { state, details } => {
                write!(f, "Failed to create {state}: {details}")
            }
        }
    }
}

impl std::error::Error for PipelineError {}

/// An error related to the creation or use of a device object.
#[derive(Debug)]
pub enum ResourceError {
    /// The descriptor breaks one of the creation rules.
    InvalidDescriptor {
        /// The kind of object being created.
        object: DeviceObjectType,
        /// Why the descriptor was rejected.
        reason: String,
    },
    /// A view was requested on a resource lacking the matching bind flag.
    MissingBindFlag {
        /// The kind of view being created.
        view: DeviceObjectType,
        /// The bind flag the resource must carry.
        required: BindFlags,
    },
    /// The owning device has already been destroyed.
    DeviceLost,
    /// A shader-specific error occurred.
    Shader(ShaderError),
    /// A pipeline-specific error occurred.
    Pipeline(PipelineError),
    /// The native backend refused to create the object.
    Backend(BackendError),
}

impl ResourceError {
    /// Shorthand for [`ResourceError::InvalidDescriptor`].
    pub fn invalid(object: DeviceObjectType, reason: impl Into<String>) -> Self {
        ResourceError::InvalidDescriptor {
            object,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::InvalidDescriptor { object, reason } => {
                write!(f, "Invalid {object:?} descriptor: {reason}")
            }
            ResourceError::MissingBindFlag { view, required } => write!(
                f,
                "Cannot create a {view:?}: the resource is missing {required:?}"
            ),
            ResourceError::DeviceLost => write!(f, "The owning device no longer exists"),
            ResourceError::Shader(err) => write!(f, "Shader resource error: {err}"),
            ResourceError::Pipeline(err) => write!(f, "Pipeline resource error: {err}"),
            ResourceError::Backend(err) => write!(f, "Backend-specific resource error: {err}"),
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResourceError::Shader(err) => Some(err),
            ResourceError::Pipeline(err) => Some(err),
            ResourceError::Backend(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ShaderError> for ResourceError {
    fn from(err: ShaderError) -> Self {
        ResourceError::Shader(err)
    }
}

impl From<PipelineError> for ResourceError {
    fn from(err: PipelineError) -> Self {
        ResourceError::Pipeline(err)
    }
}

impl From<BackendError> for ResourceError {
    fn from(err: BackendError) -> Self {
        ResourceError::Backend(err)
    }
}

/// A soft error raised while filling or binding resource tables.
///
/// Producers log these at warning level and leave their state untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    /// No shader is attached to the stage.
    NoShaderForStage {
        /// The stage that was addressed.
        stage: ShaderStage,
    },
    /// The stage's shader does not declare a variable with this name.
    UnknownName {
        /// The stage that was searched.
        stage: ShaderStage,
        /// The requested shader variable name.
        name: String,
    },
    /// The slot lies outside the table the stage's shader declared.
    SlotOutOfRange {
        /// The stage that was addressed.
        stage: ShaderStage,
        /// The resource category of the table.
        category: ResourceCategory,
        /// The requested slot.
        slot: u32,
        /// The size of the table.
        slot_count: u32,
    },
    /// A resource list was empty.
    EmptyResourceList,
    /// A resource list mixed different device object kinds.
    MixedResourceTypes,
    /// The device object kind cannot be bound as a shader resource.
    UnbindableType(DeviceObjectType),
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingError::NoShaderForStage { stage } => {
                write!(f, "No shader is attached to the {stage:?} stage")
            }
            BindingError::UnknownName { stage, name } => {
                write!(f, "The {stage:?} shader declares no resource named '{name}'")
            }
            BindingError::SlotOutOfRange {
                stage,
                category,
                slot,
                slot_count,
            } => write!(
                f,
                "Slot {slot} is outside the {stage:?} {category:?} table ({slot_count} slots)"
            ),
            BindingError::EmptyResourceList => write!(f, "The resource list is empty"),
            BindingError::MixedResourceTypes => {
                write!(f, "All resources bound in one call must share a type")
            }
            BindingError::UnbindableType(ty) => {
                write!(f, "A {ty:?} cannot be bound as a shader resource")
            }
        }
    }
}

impl std::error::Error for BindingError {}

/// A high-level error raised while recording or submitting work.
#[derive(Debug)]
pub enum RenderError {
    /// A command list was submitted before it was closed.
    CommandListNotClosed {
        /// The label of the offending command list.
        label: Option<String>,
    },
    /// A command list recorded for another device was submitted.
    ForeignCommandList {
        /// The label of the offending command list.
        label: Option<String>,
    },
    /// The operation requires a context of the other kind.
    WrongContextKind(String),
    /// A recording task failed to complete.
    RecordingFailed(String),
    /// An error occurred while managing a GPU resource.
    ResourceError(ResourceError),
    /// A binding operation failed.
    Binding(BindingError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::CommandListNotClosed { label } => write!(
                f,
                "Command list '{}' was submitted without being closed",
                label.as_deref().unwrap_or("Unknown")
            ),
            RenderError::ForeignCommandList { label } => write!(
                f,
                "Command list '{}' belongs to another device",
                label.as_deref().unwrap_or("Unknown")
            ),
            RenderError::WrongContextKind(msg) => write!(f, "Wrong context kind: {msg}"),
            RenderError::RecordingFailed(msg) => write!(f, "Command recording failed: {msg}"),
            RenderError::ResourceError(err) => {
                write!(f, "Graphics resource operation failed: {err}")
            }
            RenderError::Binding(err) => write!(f, "Binding failed: {err}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::ResourceError(err) => Some(err),
            RenderError::Binding(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResourceError> for RenderError {
    fn from(err: ResourceError) -> Self {
        RenderError::ResourceError(err)
    }
}

impl From<BackendError> for RenderError {
    fn from(err: BackendError) -> Self {
        RenderError::ResourceError(err.into())
    }
}

impl From<BindingError> for RenderError {
    fn from(err: BindingError) -> Self {
        RenderError::Binding(err)
    }
}
