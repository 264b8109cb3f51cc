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

//! The four view kinds.
//!
//! All views share one creation path: check the viewed resource's bind flag, derive the
//! view dimension from the resource's shape, settle the view format and the sub-range,
//! then create the native view.

use super::buffer::check_buffer_view_format;
use super::{Buffer, DeviceObject, DeviceShared, ObjectHeader, Texture};
use crate::renderer::api::*;
use crate::renderer::error::ResourceError;
use crate::renderer::traits::{NativeViewDesc, NativeViewRange};
use std::borrow::Cow;
use std::sync::Arc;

/// The resource a view looks at: a texture or a buffer, never both.
#[derive(Debug, Clone)]
pub enum ResourceRef {
    /// A texture.
    Texture(Arc<Texture>),
    /// A buffer.
    Buffer(Arc<Buffer>),
}

impl ResourceRef {
    /// Returns the resource's bind flags.
    pub fn bind_flags(&self) -> BindFlags {
        match self {
            ResourceRef::Texture(texture) => texture.bind_flags(),
            ResourceRef::Buffer(buffer) => buffer.bind_flags(),
        }
    }

    /// Returns the resource's native handle.
    pub fn native_handle(&self) -> NativeHandle {
        match self {
            ResourceRef::Texture(texture) => texture.native_handle(),
            ResourceRef::Buffer(buffer) => buffer.native_handle(),
        }
    }

    /// Returns the resource's debug label.
    pub fn label(&self) -> Option<&str> {
        match self {
            ResourceRef::Texture(texture) => texture.label(),
            ResourceRef::Buffer(buffer) => buffer.label(),
        }
    }

    /// Returns the shape used for view-dimension derivation.
    pub fn viewed(&self) -> ViewedResource {
        match self {
            ResourceRef::Texture(texture) => ViewedResource::Texture {
                texture_type: texture.texture_type(),
                array_count: texture.array_count(),
                sample_count: texture.sample_count(),
            },
            ResourceRef::Buffer(buffer) => ViewedResource::Buffer {
                sub_type: buffer.sub_type(),
            },
        }
    }

    /// Returns the texture, if this refers to one.
    pub fn as_texture(&self) -> Option<&Arc<Texture>> {
        match self {
            ResourceRef::Texture(texture) => Some(texture),
            ResourceRef::Buffer(_) => None,
        }
    }

    /// Returns the buffer, if this refers to one.
    pub fn as_buffer(&self) -> Option<&Arc<Buffer>> {
        match self {
            ResourceRef::Buffer(buffer) => Some(buffer),
            ResourceRef::Texture(_) => None,
        }
    }
}

/// A descriptor used to create any of the four view kinds.
#[derive(Debug, Clone)]
pub struct ViewDesc<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// The viewed resource.
    pub resource: ResourceRef,
    /// The view format. `Unknown` on a texture view inherits the texture's format.
    pub format: ResourceFormat,
    /// The window of a texture view. Ignored for buffers.
    pub texture_range: TextureRange,
    /// The window of a buffer view. Ignored for textures.
    pub buffer_range: BufferRange,
}

impl<'a> ViewDesc<'a> {
    /// A view of a whole texture in its own format.
    pub fn texture(texture: &Arc<Texture>) -> Self {
        Self {
            label: None,
            resource: ResourceRef::Texture(texture.clone()),
            format: ResourceFormat::Unknown,
            texture_range: TextureRange::default(),
            buffer_range: BufferRange::default(),
        }
    }

    /// A view of a whole buffer with an explicit format.
    pub fn buffer(buffer: &Arc<Buffer>, format: ResourceFormat) -> Self {
        Self {
            label: None,
            resource: ResourceRef::Buffer(buffer.clone()),
            format,
            texture_range: TextureRange::default(),
            buffer_range: BufferRange::default(),
        }
    }

    /// Sets the debug label.
    pub fn with_label(mut self, label: impl Into<Cow<'a, str>>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the view format.
    pub fn with_format(mut self, format: ResourceFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the texture window.
    pub fn with_texture_range(mut self, range: TextureRange) -> Self {
        self.texture_range = range;
        self
    }

    /// Sets the buffer window.
    pub fn with_buffer_range(mut self, range: BufferRange) -> Self {
        self.buffer_range = range;
        self
    }
}

/// Returns the bind flag a resource must carry to be viewed as `kind`.
pub const fn required_bind_flag(kind: ViewKind) -> BindFlags {
    match kind {
        ViewKind::ShaderResource => BindFlags::SHADER_RESOURCE,
        ViewKind::ShaderRWResource => BindFlags::SHADER_RW_RESOURCE,
        ViewKind::RenderTarget => BindFlags::RENDER_TARGET,
        ViewKind::DepthStencil => BindFlags::DEPTH_STENCIL,
    }
}

#[derive(Debug)]
struct ViewCore {
    header: ObjectHeader,
    resource: ResourceRef,
    format: ResourceFormat,
    dimension: ViewDimension,
    range: NativeViewRange,
    handle: NativeHandle,
}

impl ViewCore {
    fn create(shared: &Arc<DeviceShared>, kind: ViewKind, desc: &ViewDesc<'_>) -> Result<Self, ResourceError> {
        let object_type = kind.object_type();
        let required = required_bind_flag(kind);
        if !desc.resource.bind_flags().contains(required) {
            return Err(ResourceError::MissingBindFlag {
                view: object_type,
                required,
            });
        }

        let dimension = derive_view_dimension(kind, desc.resource.viewed())
            .map_err(|reason| ResourceError::invalid(object_type, reason))?;

        let (format, range) = match &desc.resource {
            ResourceRef::Texture(texture) => (
                texture_view_format(kind, texture, desc.format),
                resolve_texture_range(kind, texture, &desc.texture_range)
                    .map_err(|reason| ResourceError::invalid(object_type, reason))?,
            ),
            ResourceRef::Buffer(buffer) => {
                if let Err(reason) = check_buffer_view_format(buffer.sub_type(), desc.format) {
                    log::error!(
                        "{:?} '{}' on buffer '{}': {}",
                        object_type,
                        desc.label.as_deref().unwrap_or("Unknown"),
                        buffer.label().unwrap_or("Unknown"),
                        reason
                    );
                }
                (
                    desc.format,
                    resolve_buffer_range(buffer, &desc.buffer_range)
                        .map_err(|reason| ResourceError::invalid(object_type, reason))?,
                )
            }
        };

        let handle = shared.backend.create_view(&NativeViewDesc {
            kind,
            resource: desc.resource.native_handle(),
            format,
            dimension,
            range,
        })?;

        Ok(Self {
            header: ObjectHeader::new(object_type, desc.label.as_ref().map(|l| l.to_string()), shared),
            resource: desc.resource.clone(),
            format,
            dimension,
            range,
            handle,
        })
    }
}

impl Drop for ViewCore {
    fn drop(&mut self) {
        self.header.release(self.handle);
    }
}

fn texture_view_format(kind: ViewKind, texture: &Texture, requested: ResourceFormat) -> ResourceFormat {
    let format = if requested == ResourceFormat::Unknown {
        texture.format()
    } else {
        requested
    };
    if kind != ViewKind::DepthStencil || format.is_depth() {
        return format;
    }
    match format {
        ResourceFormat::R24G8Typeless => ResourceFormat::D24UnormS8Uint,
        ResourceFormat::R32Typeless => ResourceFormat::D32Float,
        ResourceFormat::R32G8X24Typeless => ResourceFormat::D32FloatS8X24Uint,
        other => {
            log::error!(
                "DepthStencilView on texture '{}': {:?} is not a depth format",
                texture.label().unwrap_or("Unknown"),
                other
            );
            other
        }
    }
}

/// Checks that `first..first + count` is a non-empty window inside `total`.
fn check_window(what: &str, first: u32, count: u32, total: u32) -> Result<(), String> {
    match first.checked_add(count) {
        Some(end) if count > 0 && end <= total => Ok(()),
        _ => Err(format!(
            "{what} {first}..{} are outside the {total} available",
            u64::from(first) + u64::from(count)
        )),
    }
}

fn resolve_texture_range(kind: ViewKind, texture: &Texture, range: &TextureRange) -> Result<NativeViewRange, String> {
    let total_mips = texture.mip_count();
    let mip_count = match kind {
        ViewKind::ShaderResource => range.resolved_mip_count(total_mips),
        _ => 1,
    };
    check_window("mips", range.first_mip, mip_count, total_mips)?;

    let total_arrays = texture.array_count();
    let array_count = range.resolved_array_count(total_arrays);
    check_window("array slices", range.first_array, array_count, total_arrays)?;

    let total_depth = texture.extent().mip_level(range.first_mip).depth;
    let depth_count = range.resolved_depth_count(total_depth);
    if texture.texture_type() == TextureType::Texture3D {
        check_window("depth slices", range.first_depth, depth_count, total_depth)?;
    }

    Ok(NativeViewRange::Texture {
        first_mip: range.first_mip,
        mip_count,
        first_array: range.first_array,
        array_count,
        first_depth: range.first_depth,
        depth_count,
    })
}

fn resolve_buffer_range(buffer: &Buffer, range: &BufferRange) -> Result<NativeViewRange, String> {
    let total = buffer.element_count();
    let element_count = range.resolved_element_count(total);
    check_window("elements", range.first_element, element_count, total)?;
    Ok(NativeViewRange::Buffer {
        first_element: range.first_element,
        element_count,
        sub_type: buffer.sub_type(),
    })
}

macro_rules! declare_view {
    ($(#[$doc:meta])* $name:ident, $kind:expr) => {
        $(#[$doc])*
        #[derive(Debug)]
        pub struct $name {
            core: ViewCore,
        }

        impl $name {
            pub(crate) fn create(shared: &Arc<DeviceShared>, desc: &ViewDesc<'_>) -> Result<Self, ResourceError> {
                Ok(Self {
                    core: ViewCore::create(shared, $kind, desc)?,
                })
            }

            /// Returns the viewed resource.
            pub fn resource(&self) -> &ResourceRef {
                &self.core.resource
            }

            /// Returns the resolved view format.
            pub fn format(&self) -> ResourceFormat {
                self.core.format
            }

            /// Returns the derived view dimension.
            pub fn dimension(&self) -> ViewDimension {
                self.core.dimension
            }

            /// Returns the resolved sub-range.
            pub fn range(&self) -> NativeViewRange {
                self.core.range
            }

            /// Returns the native view.
            pub fn native_handle(&self) -> NativeHandle {
                self.core.handle
            }
        }

        impl DeviceObject for $name {
            fn header(&self) -> &ObjectHeader {
                &self.core.header
            }
        }
    };
}

declare_view!(
    /// A read-only view, bound to `t#` registers.
    ShaderResourceView,
    ViewKind::ShaderResource
);
declare_view!(
    /// A read-write view, bound to `u#` registers.
    ShaderRWResourceView,
    ViewKind::ShaderRWResource
);
declare_view!(
    /// A view used as a color target.
    RenderTargetView,
    ViewKind::RenderTarget
);
declare_view!(
    /// A view used as the depth-stencil target.
    DepthStencilView,
    ViewKind::DepthStencil
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::rhi::mock::mock_device;

    fn assert_invalid<T: std::fmt::Debug>(result: Result<T, ResourceError>) {
        assert!(
            matches!(result, Err(ResourceError::InvalidDescriptor { .. })),
            "expected an invalid descriptor, got {result:?}"
        );
    }

    #[test]
    fn oversized_texture_ranges_are_rejected() {
        let (device, native) = mock_device();
        let texture = device
            .create_texture(&TextureDesc {
                width: 32,
                height: 32,
                array_count: 4,
                bind_flags: BindFlags::RENDER_TARGET.union(BindFlags::SHADER_RESOURCE),
                ..Default::default()
            })
            .unwrap();

        let mip = TextureRange {
            first_mip: u32::MAX,
            ..Default::default()
        };
        assert_invalid(device.create_render_target_view(&ViewDesc::texture(&texture).with_texture_range(mip)));

        let slices = TextureRange {
            first_array: u32::MAX,
            array_count: Some(2),
            ..Default::default()
        };
        assert_invalid(device.create_shader_resource_view(&ViewDesc::texture(&texture).with_texture_range(slices)));

        let mips = TextureRange {
            first_mip: 1,
            mip_count: Some(u32::MAX),
            ..Default::default()
        };
        assert_invalid(device.create_shader_resource_view(&ViewDesc::texture(&texture).with_texture_range(mips)));

        assert_eq!(native.live_count(), 1);
    }

    #[test]
    fn oversized_depth_range_is_rejected() {
        let (device, _native) = mock_device();
        let volume = device
            .create_texture(&TextureDesc {
                texture_type: TextureType::Texture3D,
                width: 16,
                height: 16,
                depth: 8,
                mip_count: 1,
                bind_flags: BindFlags::SHADER_RESOURCE,
                ..Default::default()
            })
            .unwrap();
        let range = TextureRange {
            first_depth: u32::MAX,
            depth_count: Some(2),
            ..Default::default()
        };
        assert_invalid(device.create_shader_resource_view(&ViewDesc::texture(&volume).with_texture_range(range)));
    }

    #[test]
    fn oversized_element_range_is_rejected() {
        let (device, _native) = mock_device();
        let buffer = device
            .create_buffer(&BufferDesc {
                element_size: 16,
                element_count: 8,
                bind_flags: BindFlags::SHADER_RESOURCE,
                sub_type: BufferSubType::Structured,
                ..Default::default()
            })
            .unwrap();
        let range = BufferRange {
            first_element: u32::MAX,
            element_count: Some(4),
        };
        assert_invalid(
            device.create_shader_resource_view(
                &ViewDesc::buffer(&buffer, ResourceFormat::Unknown).with_buffer_range(range),
            ),
        );

        let in_bounds = BufferRange {
            first_element: 4,
            element_count: Some(4),
        };
        let view = device
            .create_shader_resource_view(&ViewDesc::buffer(&buffer, ResourceFormat::Unknown).with_buffer_range(in_bounds))
            .unwrap();
        assert!(matches!(
            view.range(),
            NativeViewRange::Buffer {
                first_element: 4,
                element_count: 4,
                ..
            }
        ));
    }
}
