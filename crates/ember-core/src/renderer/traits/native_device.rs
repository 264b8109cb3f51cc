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

use crate::math::Extent2D;
use crate::renderer::api::*;
use crate::renderer::error::BackendError;
use crate::renderer::traits::NativeContext;
use raw_window_handle::RawWindowHandle;
use std::fmt::Debug;

/// The resolved sub-range of a native view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeViewRange {
    /// A texture window with every count resolved.
    Texture {
        /// First mip.
        first_mip: u32,
        /// Number of mips.
        mip_count: u32,
        /// First array slice.
        first_array: u32,
        /// Number of array slices.
        array_count: u32,
        /// First depth slice (3D only).
        first_depth: u32,
        /// Number of depth slices (3D only).
        depth_count: u32,
    },
    /// A buffer window with the count resolved.
    Buffer {
        /// First element.
        first_element: u32,
        /// Number of elements.
        element_count: u32,
        /// The viewed buffer's sub-type. Raw views need a native flag.
        sub_type: BufferSubType,
    },
}

/// Everything a backend needs to create a native view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeViewDesc {
    /// The kind of view.
    pub kind: ViewKind,
    /// The native resource being viewed.
    pub resource: NativeHandle,
    /// The view format.
    pub format: ResourceFormat,
    /// The derived view dimension.
    pub dimension: ViewDimension,
    /// The resolved window.
    pub range: NativeViewRange,
}

/// A native swap chain and the back buffer it exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeSwapChain {
    /// The swap chain itself.
    pub handle: NativeHandle,
    /// The back buffer texture. Owned by the swap chain.
    pub back_buffer: NativeHandle,
}

/// The native device: a factory for every native object kind.
///
/// Implementations own the native objects they hand out until [`release`] is called
/// with their handle.
///
/// [`release`]: NativeDevice::release
pub trait NativeDevice: Send + Sync + Debug + 'static {
    /// Creates a native buffer.
    /// ## Arguments
    /// * `desc` - The validated descriptor, including optional initial data.
    /// ## Errors
    /// * `BackendError` - If the backend rejects the descriptor or runs out of memory.
    fn create_buffer(&self, desc: &BufferDesc<'_>) -> Result<NativeHandle, BackendError>;

    /// Creates a native texture.
    /// ## Arguments
    /// * `desc` - The validated descriptor. `desc.initial_data` holds every subresource.
    /// * `subresources` - Where each subresource lives in the initial data. Empty when
    ///   there is no initial data.
    /// ## Errors
    /// * `BackendError` - If the backend rejects the descriptor.
    fn create_texture(
        &self,
        desc: &TextureDesc<'_>,
        subresources: &[SubresourceData],
    ) -> Result<NativeHandle, BackendError>;

    /// Creates a native sampler state.
    fn create_sampler(&self, desc: &SamplerDesc<'_>) -> Result<NativeHandle, BackendError>;

    /// Creates a native shader object from compiled bytecode.
    fn create_shader(&self, bytecode: &ShaderBytecode) -> Result<NativeHandle, BackendError>;

    /// Creates one of the four native view kinds.
    fn create_view(&self, desc: &NativeViewDesc) -> Result<NativeHandle, BackendError>;

    /// Creates an input layout, validated against the vertex shader's input signature.
    fn create_input_layout(
        &self,
        layout: &InputLayout,
        vertex_shader: &ShaderBytecode,
    ) -> Result<NativeHandle, BackendError>;

    /// Creates a rasterizer state object.
    fn create_rasterizer_state(&self, state: &RasterizerState) -> Result<NativeHandle, BackendError>;

    /// Creates a blend state object.
    fn create_blend_state(&self, state: &BlendState) -> Result<NativeHandle, BackendError>;

    /// Creates a depth-stencil state object.
    fn create_depth_stencil_state(
        &self,
        state: &DepthStencilState,
    ) -> Result<NativeHandle, BackendError>;

    /// Creates a swap chain presenting into `window`.
    /// ## Arguments
    /// * `desc` - Format, buffer count and sync interval.
    /// * `window` - The native window handle.
    /// * `size` - The resolved back buffer size.
    fn create_swap_chain(
        &self,
        desc: &SwapChainDesc<'_>,
        window: RawWindowHandle,
        size: Extent2D,
    ) -> Result<NativeSwapChain, BackendError>;

    /// Presents the current back buffer of `swap_chain`.
    fn present(&self, swap_chain: NativeHandle, sync_interval: u32) -> Result<(), BackendError>;

    /// Returns the immediate context. Called once, by the owning device.
    fn immediate_context(&self) -> Box<dyn NativeContext>;

    /// Allocates a new deferred context.
    fn create_deferred_context(&self) -> Result<Box<dyn NativeContext>, BackendError>;

    /// Releases a native object. Releasing an unknown handle is a no-op.
    fn release(&self, handle: NativeHandle);
}
