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

//! Provides the backend-agnostic render hardware interface (RHI) of Ember.
//!
//! This module defines the "common language" for all GPU work. [`api`] holds the pure
//! data (enums, formats, descriptors, reflection layouts), [`traits`] holds the narrow
//! contracts a native backend implements, and [`rhi`] holds the device object model
//! built on top of them: the [`Device`] factory, resources, views, shaders, pipelines,
//! resource bindings and device contexts.
//!
//! The concrete native backend lives in the `ember-infra` crate.

pub mod api;
pub mod error;
pub mod rhi;
pub mod traits;

// Re-export the most important traits and types for easier use.
pub use self::api::*;
pub use self::error::{
    BackendError, BindingError, PipelineError, RenderError, ResourceError, ShaderError,
};
pub use self::rhi::Device;
pub use self::traits::{NativeContext, NativeDevice, ShaderCompilerBackend};
