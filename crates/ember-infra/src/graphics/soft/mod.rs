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

//! A software model of a Direct3D 11 device.
//!
//! The model keeps native objects in a handle registry, applies the creation rules of
//! the D3D11 debug layer and executes the few commands with observable results
//! (clears, buffer updates, command list replays).

pub mod context;
pub mod conversions;
pub mod device;
pub mod native;

pub use self::context::{Command, SoftContext};
pub use self::conversions::IntoD3d11;
pub use self::device::SoftDevice;
