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

//! Presentation surfaces and the render-target sets drawn into.

use super::{DepthStencilView, DeviceObject, DeviceShared, ObjectHeader, RenderTargetView, Texture};
use crate::math::Extent2D;
use crate::platform::EmberWindow;
use crate::renderer::api::*;
use crate::renderer::error::{RenderError, ResourceError};
use std::borrow::Cow;
use std::sync::Arc;

/// A swap chain presenting into a window.
///
/// The back buffer is adopted as a [`Texture`] wrapping the swap chain's own native
/// buffer; it is released together with the swap chain.
#[derive(Debug)]
pub struct SwapChain {
    header: ObjectHeader,
    desc: SwapChainDesc<'static>,
    size: Extent2D,
    handle: NativeHandle,
    back_buffer: Arc<Texture>,
}

impl SwapChain {
    pub(crate) fn create(
        shared: &Arc<DeviceShared>,
        desc: &SwapChainDesc<'_>,
        window: &dyn EmberWindow,
    ) -> Result<Self, ResourceError> {
        let invalid = |reason: &str| ResourceError::invalid(DeviceObjectType::SwapChain, reason);

        let raw_window = window
            .raw_handle()
            .ok_or_else(|| invalid("the window has no native handle"))?;
        let size = desc.size.unwrap_or_else(|| window.inner_size());
        if size.width == 0 || size.height == 0 {
            return Err(invalid("the back buffer size is zero"));
        }
        if !(1..=16).contains(&desc.buffer_count) {
            return Err(ResourceError::invalid(
                DeviceObjectType::SwapChain,
                format!("buffer count {} is outside 1..=16", desc.buffer_count),
            ));
        }

        let native = shared.backend.create_swap_chain(desc, raw_window, size)?;
        let label = desc.label.as_ref().map(|l| l.to_string());
        let back_buffer_label = format!("{} back buffer", label.as_deref().unwrap_or("SwapChain"));
        let back_buffer = Texture::create(
            shared,
            &TextureDesc {
                label: Some(back_buffer_label.into()),
                width: size.width,
                height: size.height,
                format: desc.format,
                bind_flags: BindFlags::RENDER_TARGET,
                native: Some(native.back_buffer),
                ..Default::default()
            },
        );
        let back_buffer = match back_buffer {
            Ok(texture) => Arc::new(texture),
            Err(err) => {
                shared.backend.release(native.handle);
                return Err(err);
            }
        };

        Ok(Self {
            header: ObjectHeader::new(DeviceObjectType::SwapChain, label, shared),
            desc: SwapChainDesc {
                label: desc.label.as_ref().map(|l| Cow::Owned(l.to_string())),
                size: Some(size),
                format: desc.format,
                buffer_count: desc.buffer_count,
                sync_interval: desc.sync_interval,
            },
            size,
            handle: native.handle,
            back_buffer,
        })
    }

    /// Presents the current back buffer with the configured sync interval.
    pub fn present(&self) -> Result<(), RenderError> {
        let Some(shared) = self.header.owner() else {
            return Err(ResourceError::DeviceLost.into());
        };
        shared
            .backend
            .present(self.handle, self.desc.sync_interval)
            .map_err(|err| {
                log::error!(
                    "SwapChain '{}': present failed: {err}",
                    self.label().unwrap_or("Unknown")
                );
                err.into()
            })
    }

    /// Returns the back buffer texture.
    pub fn back_buffer(&self) -> &Arc<Texture> {
        &self.back_buffer
    }

    /// Returns the back buffer size.
    pub fn size(&self) -> Extent2D {
        self.size
    }

    /// Returns the descriptor the swap chain was created with.
    pub fn desc(&self) -> &SwapChainDesc<'static> {
        &self.desc
    }

    /// Returns the native swap chain.
    pub fn native_handle(&self) -> NativeHandle {
        self.handle
    }
}

impl DeviceObject for SwapChain {
    fn header(&self) -> &ObjectHeader {
        &self.header
    }
}

impl Drop for SwapChain {
    fn drop(&mut self) {
        self.header.release(self.handle);
    }
}

/// A descriptor used to create a [`FrameBuffer`].
#[derive(Debug, Clone, Default)]
pub struct FrameBufferDesc<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// Up to eight color targets, bound to consecutive slots.
    pub render_targets: Vec<Arc<RenderTargetView>>,
    /// An optional depth-stencil target.
    pub depth_stencil: Option<Arc<DepthStencilView>>,
}

/// The set of views a draw writes to.
#[derive(Debug)]
pub struct FrameBuffer {
    header: ObjectHeader,
    render_targets: Vec<Arc<RenderTargetView>>,
    depth_stencil: Option<Arc<DepthStencilView>>,
}

impl FrameBuffer {
    pub(crate) fn create(shared: &Arc<DeviceShared>, desc: &FrameBufferDesc<'_>) -> Result<Self, ResourceError> {
        if desc.render_targets.is_empty() && desc.depth_stencil.is_none() {
            return Err(ResourceError::invalid(
                DeviceObjectType::FrameBuffer,
                "a frame buffer needs at least one render target or a depth-stencil target",
            ));
        }
        if desc.render_targets.len() > MAX_RENDER_TARGETS {
            return Err(ResourceError::invalid(
                DeviceObjectType::FrameBuffer,
                format!(
                    "{} render targets exceed the limit of {}",
                    desc.render_targets.len(),
                    MAX_RENDER_TARGETS
                ),
            ));
        }
        Ok(Self {
            header: ObjectHeader::new(
                DeviceObjectType::FrameBuffer,
                desc.label.as_ref().map(|l| l.to_string()),
                shared,
            ),
            render_targets: desc.render_targets.clone(),
            depth_stencil: desc.depth_stencil.clone(),
        })
    }

    /// Returns the color targets.
    pub fn render_targets(&self) -> &[Arc<RenderTargetView>] {
        &self.render_targets
    }

    /// Returns the depth-stencil target.
    pub fn depth_stencil(&self) -> Option<&Arc<DepthStencilView>> {
        self.depth_stencil.as_ref()
    }

    pub(crate) fn native_render_targets(&self) -> Vec<NativeHandle> {
        self.render_targets.iter().map(|view| view.native_handle()).collect()
    }
}

impl DeviceObject for FrameBuffer {
    fn header(&self) -> &ObjectHeader {
        &self.header
    }
}
