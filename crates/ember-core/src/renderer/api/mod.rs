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

//! Backend-agnostic RHI data.
//!
//! Everything in here is plain data: formats, enumerations, bitmasks, creation
//! descriptors, fixed-function state and the reflection-derived resource layouts.
//! Nothing in this module talks to a backend.

pub mod buffer;
pub mod enums;
pub mod flags;
pub mod format;
pub mod handle;
pub mod frame;
pub mod pipeline;
pub mod reflection;
pub mod sampler;
pub mod settings;
pub mod shader;
pub mod texture;
pub mod view;

pub use self::buffer::*;
pub use self::enums::*;
pub use self::flags::*;
pub use self::format::*;
pub use self::handle::NativeHandle;
pub use self::frame::*;
pub use self::pipeline::*;
pub use self::reflection::*;
pub use self::sampler::*;
pub use self::settings::*;
pub use self::shader::*;
pub use self::texture::*;
pub use self::view::*;
