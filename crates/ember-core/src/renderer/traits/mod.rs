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

//! Defines the contracts a native graphics backend implements.
//!
//! The RHI in [`rhi`](crate::renderer::rhi) validates descriptors, tracks objects and
//! derives view dimensions and binding shapes. Everything it cannot do by itself goes
//! through these three traits:
//!
//! - [`NativeDevice`]: creates and releases native objects.
//! - [`NativeContext`]: records or executes state changes and draws.
//! - [`ShaderCompilerBackend`]: turns HLSL into bytecode and reflects it.

mod native_context;
mod native_device;
mod shader_compiler;

pub use self::native_context::NativeContext;
pub use self::native_device::{NativeDevice, NativeSwapChain, NativeViewDesc, NativeViewRange};
pub use self::shader_compiler::ShaderCompilerBackend;
