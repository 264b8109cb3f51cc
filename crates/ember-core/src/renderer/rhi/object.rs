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

//! The device object model.
//!
//! Every GPU-backed object carries an [`ObjectHeader`] naming its kind, its debug label
//! and a non-owning reference to the device that created it. Objects are always handed
//! out as `Arc`s; the device keeps one reference of each in its tracked list so it can
//! report leaks at teardown.

use super::{
    Buffer, DepthStencilView, DeviceContext, DeviceShared, FrameBuffer, Pipeline,
    RenderTargetView, ResourceLayout, Sampler, Shader, ShaderRWResourceView,
    ShaderResourceView, SwapChain, Texture,
};
use crate::renderer::api::{DeviceObjectType, NativeHandle};
use std::fmt::Debug;
use std::sync::{Arc, Weak};

/// The data every device object carries.
#[derive(Debug)]
pub struct ObjectHeader {
    object_type: DeviceObjectType,
    label: Option<String>,
    owner: Weak<DeviceShared>,
}

impl ObjectHeader {
    pub(crate) fn new(
        object_type: DeviceObjectType,
        label: Option<String>,
        owner: &Arc<DeviceShared>,
    ) -> Self {
        Self {
            object_type,
            label,
            owner: Arc::downgrade(owner),
        }
    }

    /// Returns the kind of object.
    pub fn object_type(&self) -> DeviceObjectType {
        self.object_type
    }

    /// Returns the debug label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns `true` while the creating device is alive.
    pub fn owner_alive(&self) -> bool {
        self.owner.strong_count() > 0
    }

    pub(crate) fn owner(&self) -> Option<Arc<DeviceShared>> {
        self.owner.upgrade()
    }

    pub(crate) fn is_owned_by(&self, shared: &Arc<DeviceShared>) -> bool {
        Weak::ptr_eq(&self.owner, &Arc::downgrade(shared))
    }

    /// Releases a native handle through the owning device, if it is still alive.
    pub(crate) fn release(&self, handle: NativeHandle) {
        if handle.is_null() {
            return;
        }
        match self.owner.upgrade() {
            Some(shared) => shared.backend.release(handle),
            None => log::debug!(
                "{:?} '{}' dropped after its device; native handle {:?} was freed with it",
                self.object_type,
                self.label().unwrap_or("Unknown"),
                handle
            ),
        }
    }
}

/// Common behavior of every object a [`Device`](super::Device) creates.
pub trait DeviceObject: Send + Sync + Debug {
    /// Returns the object's header.
    fn header(&self) -> &ObjectHeader;

    /// Returns the kind of object.
    fn object_type(&self) -> DeviceObjectType {
        self.header().object_type()
    }

    /// Returns the debug label, if any.
    fn label(&self) -> Option<&str> {
        self.header().label()
    }
}

/// A shared reference to any device object.
///
/// This is the element type of the device's tracked list and of heterogeneous resource
/// lists such as [`DeviceContext::bind_resources`](super::DeviceContext::bind_resources).
#[derive(Debug, Clone)]
pub enum DeviceObjectRef {
    /// A swap chain.
    SwapChain(Arc<SwapChain>),
    /// A frame buffer.
    FrameBuffer(Arc<FrameBuffer>),
    /// A buffer.
    Buffer(Arc<Buffer>),
    /// A texture.
    Texture(Arc<Texture>),
    /// A render-target view.
    RenderTargetView(Arc<RenderTargetView>),
    /// A depth-stencil view.
    DepthStencilView(Arc<DepthStencilView>),
    /// A sampler.
    Sampler(Arc<Sampler>),
    /// A shader.
    Shader(Arc<Shader>),
    /// A read-only shader view.
    ShaderResourceView(Arc<ShaderResourceView>),
    /// A read-write shader view.
    ShaderRWResourceView(Arc<ShaderRWResourceView>),
    /// A pipeline.
    Pipeline(Arc<Pipeline>),
    /// A resource layout.
    ResourceLayout(Arc<ResourceLayout>),
    /// A deferred context.
    CommandList(Arc<DeviceContext>),
    /// The immediate context.
    DeviceContext(Arc<DeviceContext>),
}

macro_rules! for_each_object {
    ($value:expr, $obj:ident => $body:expr) => {
        match $value {
            DeviceObjectRef::SwapChain($obj) => $body,
            DeviceObjectRef::FrameBuffer($obj) => $body,
            DeviceObjectRef::Buffer($obj) => $body,
            DeviceObjectRef::Texture($obj) => $body,
            DeviceObjectRef::RenderTargetView($obj) => $body,
            DeviceObjectRef::DepthStencilView($obj) => $body,
            DeviceObjectRef::Sampler($obj) => $body,
            DeviceObjectRef::Shader($obj) => $body,
            DeviceObjectRef::ShaderResourceView($obj) => $body,
            DeviceObjectRef::ShaderRWResourceView($obj) => $body,
            DeviceObjectRef::Pipeline($obj) => $body,
            DeviceObjectRef::ResourceLayout($obj) => $body,
            DeviceObjectRef::CommandList($obj) => $body,
            DeviceObjectRef::DeviceContext($obj) => $body,
        }
    };
}

impl DeviceObjectRef {
    /// Returns the referenced object as a trait object.
    pub fn as_object(&self) -> &dyn DeviceObject {
        for_each_object!(self, obj => &**obj as &dyn DeviceObject)
    }

    /// Returns the kind of the referenced object.
    pub fn object_type(&self) -> DeviceObjectType {
        self.as_object().object_type()
    }

    /// Returns the number of strong references to the object, this one included.
    pub fn strong_count(&self) -> usize {
        for_each_object!(self, obj => Arc::strong_count(obj))
    }

    /// Returns `true` if both refer to the same object.
    pub fn ptr_eq(&self, other: &DeviceObjectRef) -> bool {
        std::ptr::eq(
            self.as_object() as *const dyn DeviceObject as *const u8,
            other.as_object() as *const dyn DeviceObject as *const u8,
        )
    }
}

macro_rules! impl_from_arc {
    ($($ty:ident),* $(,)?) => {
        $(
            impl From<Arc<$ty>> for DeviceObjectRef {
                fn from(value: Arc<$ty>) -> Self {
                    DeviceObjectRef::$ty(value)
                }
            }
        )*
    };
}

impl_from_arc!(
    SwapChain,
    FrameBuffer,
    Buffer,
    Texture,
    RenderTargetView,
    DepthStencilView,
    Sampler,
    Shader,
    ShaderResourceView,
    ShaderRWResourceView,
    Pipeline,
    ResourceLayout,
);

impl From<Arc<DeviceContext>> for DeviceObjectRef {
    fn from(value: Arc<DeviceContext>) -> Self {
        if value.is_deferred() {
            DeviceObjectRef::CommandList(value)
        } else {
            DeviceObjectRef::DeviceContext(value)
        }
    }
}
