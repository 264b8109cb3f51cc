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

//! A window without a native surface, for tests and offscreen tools.

use ember_core::math::Extent2D;
use ember_core::platform::EmberWindow;
use raw_window_handle::{
    DisplayHandle, HandleError, HasDisplayHandle, HasWindowHandle, RawDisplayHandle,
    RawWindowHandle, WebDisplayHandle, WebWindowHandle, WindowHandle,
};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

static NEXT_WINDOW_ID: AtomicU32 = AtomicU32::new(1);

/// A window that only carries an id and a size.
///
/// Its handles use the web variants of `raw-window-handle`, which need no OS resources.
/// The size can be changed after creation to model a resize.
#[derive(Debug)]
pub struct HeadlessWindow {
    id: u32,
    size: AtomicU64,
}

impl HeadlessWindow {
    /// Creates a window with the given client size.
    pub fn new(width: u32, height: u32) -> Self {
        let id = NEXT_WINDOW_ID.fetch_add(1, Ordering::Relaxed);
        log::debug!("HeadlessWindow: Created window {id} ({width}x{height})");
        Self {
            id,
            size: AtomicU64::new(pack(width, height)),
        }
    }

    /// Returns the window id carried by its handle.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Changes the client size.
    pub fn resize(&self, width: u32, height: u32) {
        self.size.store(pack(width, height), Ordering::Release);
    }
}

fn pack(width: u32, height: u32) -> u64 {
    (width as u64) << 32 | height as u64
}

impl HasWindowHandle for HeadlessWindow {
    fn window_handle(&self) -> Result<WindowHandle<'_>, HandleError> {
        let raw = RawWindowHandle::Web(WebWindowHandle::new(self.id));
        // SAFETY: a web handle is a plain id and stays valid for as long as `self` lives.
        Ok(unsafe { WindowHandle::borrow_raw(raw) })
    }
}

impl HasDisplayHandle for HeadlessWindow {
    fn display_handle(&self) -> Result<DisplayHandle<'_>, HandleError> {
        let raw = RawDisplayHandle::Web(WebDisplayHandle::new());
        // SAFETY: the web display handle holds no pointers.
        Ok(unsafe { DisplayHandle::borrow_raw(raw) })
    }
}

impl EmberWindow for HeadlessWindow {
    fn inner_size(&self) -> Extent2D {
        let packed = self.size.load(Ordering::Acquire);
        Extent2D::new((packed >> 32) as u32, packed as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_carry_the_window_id() {
        let window = HeadlessWindow::new(640, 480);
        match window.raw_handle() {
            Some(RawWindowHandle::Web(handle)) => assert_eq!(handle.id, window.id()),
            other => panic!("unexpected handle {other:?}"),
        }
        assert!(window.display_handle().is_ok());
    }

    #[test]
    fn resize_updates_inner_size() {
        let window = HeadlessWindow::new(640, 480);
        assert_eq!(window.inner_size(), Extent2D::new(640, 480));
        window.resize(800, 600);
        assert_eq!(window.inner_size(), Extent2D::new(800, 600));
    }
}
