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

//! The device object layer.
//!
//! Everything here is created through a [`Device`] and handed out as an `Arc`. Objects
//! talk to the native backend through the traits in [`crate::renderer::traits`].

mod bindings;
mod buffer;
mod context;
mod device;
mod frame;
mod object;
mod pipeline;
mod recording;
mod resource_layout;
mod sampler;
mod shader;
mod texture;
mod validation;
mod view;

#[cfg(test)]
pub(crate) mod mock;

pub use self::bindings::{PipelineResourceBindingData, PipelineResourceBindings, StageBindings, StageLayouts};
pub use self::buffer::{check_buffer_view_format, validate_buffer_desc, Buffer};
pub use self::context::DeviceContext;
pub use self::device::{Device, DeviceShared, LeakReport, LeakedObject};
pub use self::frame::{FrameBuffer, FrameBufferDesc, SwapChain};
pub use self::object::{DeviceObject, DeviceObjectRef, ObjectHeader};
pub use self::pipeline::{Pipeline, PipelineDesc, PipelineStates};
pub use self::recording::{record_concurrently, RecordingPass};
pub use self::resource_layout::{ResourceLayout, ResourceLayoutDesc};
pub use self::sampler::Sampler;
pub use self::shader::{Shader, ShaderCompiler};
pub use self::texture::{validate_texture_desc, Texture};
pub use self::validation::{
    validate_pipeline_resource_bindings, ValidationIssue, ValidationIssueKind, ValidationReport,
};
pub use self::view::{
    required_bind_flag, DepthStencilView, RenderTargetView, ResourceRef, ShaderRWResourceView,
    ShaderResourceView, ViewDesc,
};
