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

//! The window abstraction swap chains present into.

use crate::math::Extent2D;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle, RawWindowHandle};

/// A trait that abstracts the window a swap chain presents into.
///
/// Any windowing layer (GLFW, Winit, a headless test window, ...) can implement this
/// trait. The RHI only needs the native handle and the current pixel size; input
/// state stays with the windowing layer.
pub trait EmberWindow: HasWindowHandle + HasDisplayHandle + Send + Sync {
    /// Returns the physical dimensions of the window's client area.
    fn inner_size(&self) -> Extent2D;

    /// Returns the raw native handle, if the window currently has one.
    fn raw_handle(&self) -> Option<RawWindowHandle> {
        match self.window_handle() {
            Ok(handle) => Some(handle.as_raw()),
            Err(e) => {
                log::warn!("Window handle is unavailable: {e}");
                None
            }
        }
    }
}
