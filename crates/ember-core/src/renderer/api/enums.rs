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

//! Generic RHI enums.

use serde::{Deserialize, Serialize};

/// Specifies the data type of indices in an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexFormat {
    /// Indices are 16-bit unsigned integers.
    Uint16,
    /// Indices are 32-bit unsigned integers.
    Uint32,
}

impl IndexFormat {
    /// Derives the index format from an index buffer's element size in bytes.
    ///
    /// Only 2 and 4 byte indices exist; anything else returns `None`.
    pub const fn from_element_size(size: u32) -> Option<Self> {
        match size {
            2 => Some(IndexFormat::Uint16),
            4 => Some(IndexFormat::Uint32),
            _ => None,
        }
    }

    /// Returns the size in bytes of one index.
    pub const fn size(&self) -> u32 {
        match self {
            IndexFormat::Uint16 => 2,
            IndexFormat::Uint32 => 4,
        }
    }
}

/// How a resource is expected to be read and written by the GPU and the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Usage {
    /// GPU read/write. The common case.
    #[default]
    Default,
    /// GPU read-only, fully initialized at creation.
    Immutable,
    /// GPU read-only, rewritten by the CPU through map/discard.
    Dynamic,
    /// CPU-side copy target, never bound to the pipeline.
    Staging,
}

/// The CPU access a resource is created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CpuAccess {
    /// The CPU never maps the resource.
    #[default]
    None,
    /// The CPU reads the resource.
    Read,
    /// The CPU writes the resource.
    Write,
    /// The CPU reads and writes the resource.
    ReadWrite,
}

impl CpuAccess {
    /// Returns `true` if the CPU may write to the resource.
    pub const fn can_write(&self) -> bool {
        matches!(self, CpuAccess::Write | CpuAccess::ReadWrite)
    }

    /// Returns `true` if the CPU may read from the resource.
    pub const fn can_read(&self) -> bool {
        matches!(self, CpuAccess::Read | CpuAccess::ReadWrite)
    }
}

/// What a buffer holds when it is viewed by a shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BufferSubType {
    /// A plain buffer (vertex, index or constant). Cannot be viewed.
    #[default]
    None,
    /// Elements of a [`ResourceFormat`](super::ResourceFormat) (`Buffer<float4>`).
    Typed,
    /// Elements of a user struct (`StructuredBuffer<T>`).
    Structured,
    /// Untyped 32-bit words (`ByteAddressBuffer`).
    Raw,
}

/// The dimensionality of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureType {
    /// Not a valid texture type.
    #[default]
    Unknown,
    /// A one-dimensional texture.
    Texture1D,
    /// A two-dimensional texture.
    Texture2D,
    /// A three-dimensional (volumetric) texture.
    Texture3D,
    /// Six 2D faces per cube. The array count counts faces.
    TextureCube,
}

/// Defines the programmable stage in the graphics pipeline a shader is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShaderStage {
    /// The vertex shader stage.
    Vertex,
    /// The hull (tessellation control) stage.
    Hull,
    /// The domain (tessellation evaluation) stage.
    Domain,
    /// The geometry shader stage.
    Geometry,
    /// The pixel (fragment) shader stage.
    Pixel,
    /// The compute shader stage.
    Compute,
}

impl ShaderStage {
    /// The number of shader stages.
    pub const COUNT: usize = 6;

    /// Every stage, in pipeline order.
    pub const ALL: [ShaderStage; Self::COUNT] = [
        ShaderStage::Vertex,
        ShaderStage::Hull,
        ShaderStage::Domain,
        ShaderStage::Geometry,
        ShaderStage::Pixel,
        ShaderStage::Compute,
    ];

    /// Returns the index of this stage in per-stage arrays.
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Returns the shader-model 5.0 compile target for this stage.
    pub const fn profile(&self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vs_5_0",
            ShaderStage::Hull => "hs_5_0",
            ShaderStage::Domain => "ds_5_0",
            ShaderStage::Geometry => "gs_5_0",
            ShaderStage::Pixel => "ps_5_0",
            ShaderStage::Compute => "cs_5_0",
        }
    }
}

/// The closed set of objects a [`Device`](crate::renderer::Device) creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceObjectType {
    /// A presentation surface bound to a window.
    SwapChain,
    /// A set of render targets plus an optional depth-stencil target.
    FrameBuffer,
    /// A linear GPU allocation.
    Buffer,
    /// A 1D, 2D, 3D or cube image.
    Texture,
    /// A render-target view.
    RenderTargetView,
    /// A depth-stencil view.
    DepthStencilView,
    /// Texture sampling state.
    Sampler,
    /// A compiled shader for one stage.
    Shader,
    /// A read-only shader view.
    ShaderResourceView,
    /// A read-write (unordered access) shader view.
    ShaderRWResourceView,
    /// Shaders plus fixed-function state.
    Pipeline,
    /// A pipeline-independent set of reflected shader layouts.
    ResourceLayout,
    /// A deferred context recording a command list.
    CommandList,
    /// The immediate context.
    DeviceContext,
}

/// The four kinds of resource tables a shader stage binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceCategory {
    /// `cbuffer` slots (`b#` registers).
    ConstantBuffer,
    /// Read-only views (`t#` registers).
    ShaderResource,
    /// Read-write views (`u#` registers).
    ShaderRWResource,
    /// Samplers (`s#` registers).
    Sampler,
}

impl ResourceCategory {
    /// The number of categories.
    pub const COUNT: usize = 4;

    /// Every category.
    pub const ALL: [ResourceCategory; Self::COUNT] = [
        ResourceCategory::ConstantBuffer,
        ResourceCategory::ShaderResource,
        ResourceCategory::ShaderRWResource,
        ResourceCategory::Sampler,
    ];

    /// Returns the index of this category in per-category arrays.
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Returns the maximum number of slots a stage exposes for this category.
    pub const fn max_slots(&self) -> u32 {
        match self {
            ResourceCategory::ConstantBuffer => 14,
            ResourceCategory::ShaderResource => 128,
            ResourceCategory::ShaderRWResource => 8,
            ResourceCategory::Sampler => 16,
        }
    }

    /// Returns the device object type bound through this category.
    pub const fn object_type(&self) -> DeviceObjectType {
        match self {
            ResourceCategory::ConstantBuffer => DeviceObjectType::Buffer,
            ResourceCategory::ShaderResource => DeviceObjectType::ShaderResourceView,
            ResourceCategory::ShaderRWResource => DeviceObjectType::ShaderRWResourceView,
            ResourceCategory::Sampler => DeviceObjectType::Sampler,
        }
    }

    /// Returns the category a device object type binds through, if any.
    pub const fn from_object_type(ty: DeviceObjectType) -> Option<Self> {
        match ty {
            DeviceObjectType::Buffer => Some(ResourceCategory::ConstantBuffer),
            DeviceObjectType::ShaderResourceView => Some(ResourceCategory::ShaderResource),
            DeviceObjectType::ShaderRWResourceView => Some(ResourceCategory::ShaderRWResource),
            DeviceObjectType::Sampler => Some(ResourceCategory::Sampler),
            _ => None,
        }
    }
}

/// The maximum number of simultaneously bound render targets.
pub const MAX_RENDER_TARGETS: usize = 8;

/// The structural dimension of a view, derived from the viewed resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewDimension {
    /// The dimension could not be derived.
    #[default]
    Unknown,
    /// A view of a buffer.
    Buffer,
    /// A view of a 1D texture.
    Texture1D,
    /// A view of a 1D texture array.
    Texture1DArray,
    /// A view of a 2D texture.
    Texture2D,
    /// A view of a 2D texture array.
    Texture2DArray,
    /// A view of a multisampled 2D texture.
    Texture2DMS,
    /// A view of a multisampled 2D texture array.
    Texture2DMSArray,
    /// A view of a 3D texture.
    Texture3D,
    /// A view of a single cube.
    TextureCube,
    /// A view of several cubes.
    TextureCubeArray,
}

/// The four view kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// A read-only shader view.
    ShaderResource,
    /// A read-write shader view.
    ShaderRWResource,
    /// A render-target view.
    RenderTarget,
    /// A depth-stencil view.
    DepthStencil,
}

impl ViewKind {
    /// Returns the device object type of views of this kind.
    pub const fn object_type(&self) -> DeviceObjectType {
        match self {
            ViewKind::ShaderResource => DeviceObjectType::ShaderResourceView,
            ViewKind::ShaderRWResource => DeviceObjectType::ShaderRWResourceView,
            ViewKind::RenderTarget => DeviceObjectType::RenderTargetView,
            ViewKind::DepthStencil => DeviceObjectType::DepthStencilView,
        }
    }
}
