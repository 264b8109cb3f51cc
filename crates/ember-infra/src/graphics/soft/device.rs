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

//! A software model of a D3D11 device.
//!
//! Native objects live in one registry keyed by handle. Creation calls apply the
//! validation rules of the D3D11 debug layer and fail with the matching `HRESULT`;
//! contexts route their commands back here so clears and buffer updates touch real bytes.

use super::context::{Command, SoftContext};
use super::conversions::IntoD3d11;
use super::native::{
    self, bind, clear, cpu_access, dxgi_format, format_size, hresult, is_depth, is_typeless,
    limits, misc, usage, BlendDesc, DepthStencilDesc, InputElementDesc, RasterizerDesc,
    TextureDimension,
};
use crate::graphics::hlsl::{ShaderContainer, SignatureElement};
use ember_core::math::{Extent2D, LinearRgba};
use ember_core::renderer::api::{
    BlendState, BufferDesc, DepthStencilState, InputLayout, NativeHandle, RasterizerState,
    SamplerDesc, ShaderBytecode, ShaderStage, SubresourceData, SwapChainDesc, TextureDesc,
    ViewKind,
};
use ember_core::renderer::error::BackendError;
use ember_core::renderer::traits::{NativeContext, NativeDevice, NativeSwapChain, NativeViewDesc};
use raw_window_handle::RawWindowHandle;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Textures above this many bytes fail with `E_OUTOFMEMORY`.
const MAX_TEXTURE_BYTES: u64 = 256 << 20;

#[derive(Debug)]
pub(crate) struct SoftBufferEntry {
    pub(crate) desc: native::BufferDesc,
    pub(crate) data: Vec<u8>,
}

#[derive(Debug)]
pub(crate) struct SoftTextureEntry {
    pub(crate) desc: native::TextureDesc,
    /// One byte vector per subresource, indexed `slice * mip_levels + mip`.
    pub(crate) subresources: Vec<Vec<u8>>,
}

impl SoftTextureEntry {
    fn array_size(&self) -> u32 {
        match self.desc.dimension {
            TextureDimension::Texture3D => 1,
            _ => self.desc.depth_or_array_size,
        }
    }

    /// The `(width, height, depth)` of a mip level, clamped to 1.
    fn mip_extent(&self, mip: u32) -> (u32, u32, u32) {
        let depth = match self.desc.dimension {
            TextureDimension::Texture3D => self.desc.depth_or_array_size,
            _ => 1,
        };
        (
            (self.desc.width >> mip).max(1),
            (self.desc.height >> mip).max(1),
            (depth >> mip).max(1),
        )
    }

    fn subresource_index(&self, mip: u32, slice: u32) -> Option<usize> {
        (mip < self.desc.mip_levels && slice < self.array_size())
            .then(|| (slice * self.desc.mip_levels + mip) as usize)
    }

    /// Fills texels of a view's window with one encoded texel, or updates them in place.
    fn for_each_texel(&mut self, view: &native::ViewDesc, mut texel: impl FnMut(&mut [u8])) {
        let stride = format_size(self.desc.format) as usize;
        if stride == 0 {
            return;
        }
        let mip = view.first;
        let (width, height, _) = self.mip_extent(mip);
        let slice_bytes = stride * width as usize * height as usize;

        let (slices, depth_range) = if self.desc.dimension == TextureDimension::Texture3D {
            (0..1, Some(view.first_array_slice..view.first_array_slice + view.array_size))
        } else {
            (view.first_array_slice..view.first_array_slice + view.array_size, None)
        };
        for slice in slices {
            let Some(index) = self.subresource_index(mip, slice) else { continue };
            let bytes = &mut self.subresources[index];
            let window = match &depth_range {
                Some(range) => {
                    let start = (range.start as usize * slice_bytes).min(bytes.len());
                    let end = (range.end as usize * slice_bytes).min(bytes.len());
                    &mut bytes[start..end]
                }
                None => &mut bytes[..],
            };
            window.chunks_exact_mut(stride).for_each(&mut texel);
        }
    }
}

#[derive(Debug)]
pub(crate) struct SoftViewEntry {
    pub(crate) kind: ViewKind,
    pub(crate) resource: NativeHandle,
    pub(crate) desc: native::ViewDesc,
}

#[derive(Debug)]
pub(crate) struct SoftShaderEntry {
    pub(crate) stage: ShaderStage,
    pub(crate) entry_point: String,
}

#[derive(Debug)]
pub(crate) struct SoftSwapChainEntry {
    pub(crate) back_buffer: NativeHandle,
    pub(crate) buffer_count: u32,
    pub(crate) presents: u64,
}

/// Every kind of object the software device hands out handles for.
#[derive(Debug)]
pub(crate) enum NativeObject {
    Buffer(SoftBufferEntry),
    Texture(SoftTextureEntry),
    Sampler(native::SamplerDesc),
    Shader(SoftShaderEntry),
    View(SoftViewEntry),
    InputLayout(Vec<InputElementDesc>),
    RasterizerState(RasterizerDesc),
    BlendState(BlendDesc),
    DepthStencilState(DepthStencilDesc),
    SwapChain(SoftSwapChainEntry),
    CommandList(Vec<Command>),
}

impl NativeObject {
    fn kind_name(&self) -> &'static str {
        match self {
            NativeObject::Buffer(_) => "Buffer",
            NativeObject::Texture(_) => "Texture",
            NativeObject::Sampler(_) => "SamplerState",
            NativeObject::Shader(_) => "Shader",
            NativeObject::View(entry) => match entry.kind {
                ViewKind::ShaderResource => "ShaderResourceView",
                ViewKind::ShaderRWResource => "UnorderedAccessView",
                ViewKind::RenderTarget => "RenderTargetView",
                ViewKind::DepthStencil => "DepthStencilView",
            },
            NativeObject::InputLayout(_) => "InputLayout",
            NativeObject::RasterizerState(_) => "RasterizerState",
            NativeObject::BlendState(_) => "BlendState",
            NativeObject::DepthStencilState(_) => "DepthStencilState",
            NativeObject::SwapChain(_) => "SwapChain",
            NativeObject::CommandList(_) => "CommandList",
        }
    }
}

/// The internal, shared state of a [`SoftDevice`].
#[derive(Default)]
struct SoftDeviceInternal {
    objects: Mutex<HashMap<u64, NativeObject>>,
    executed: Mutex<Vec<Command>>,
    next_id: AtomicU64,
}

/// A software D3D11 device.
///
/// Cloning is cheap and every clone shares the same objects, so tests can keep a clone
/// for inspection after handing one to [`ember_core::Device`].
#[derive(Clone, Default)]
pub struct SoftDevice {
    internal: Arc<SoftDeviceInternal>,
}

impl fmt::Debug for SoftDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoftDevice")
            .field("live_objects", &self.live_object_count())
            .finish()
    }
}

impl SoftDevice {
    /// Creates an empty device.
    pub fn new() -> Self {
        Self::default()
    }

    fn objects(&self) -> MutexGuard<'_, HashMap<u64, NativeObject>> {
        self.internal.objects.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn insert(&self, object: NativeObject) -> NativeHandle {
        let id = self.internal.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        log::debug!("SoftDevice: Created {} with ID: {}", object.kind_name(), id);
        self.objects().insert(id, object);
        NativeHandle(id)
    }

    /// Logs a debug-layer message and builds the matching error.
    pub(crate) fn reject(&self, code: u32, message: impl Into<String>) -> BackendError {
        let message = message.into();
        log::warn!("D3D11 ERROR: {message}");
        BackendError::new(code, message)
    }

    // --- Inspection ---

    /// Returns the number of live native objects.
    pub fn live_object_count(&self) -> usize {
        self.objects().len()
    }

    /// Returns the kind of the object behind `handle` (`"Buffer"`, `"RenderTargetView"`, ...).
    pub fn object_kind(&self, handle: NativeHandle) -> Option<&'static str> {
        self.objects().get(&handle.0).map(NativeObject::kind_name)
    }

    /// Returns a copy of a buffer's contents.
    pub fn buffer_contents(&self, handle: NativeHandle) -> Option<Vec<u8>> {
        match self.objects().get(&handle.0) {
            Some(NativeObject::Buffer(entry)) => Some(entry.data.clone()),
            _ => None,
        }
    }

    /// Returns the native description of a buffer.
    pub fn buffer_desc(&self, handle: NativeHandle) -> Option<native::BufferDesc> {
        match self.objects().get(&handle.0) {
            Some(NativeObject::Buffer(entry)) => Some(entry.desc),
            _ => None,
        }
    }

    /// Returns the native description of a texture.
    pub fn texture_desc(&self, handle: NativeHandle) -> Option<native::TextureDesc> {
        match self.objects().get(&handle.0) {
            Some(NativeObject::Texture(entry)) => Some(entry.desc),
            _ => None,
        }
    }

    /// Returns a copy of one texture subresource.
    pub fn texture_subresource(&self, handle: NativeHandle, mip: u32, array_slice: u32) -> Option<Vec<u8>> {
        match self.objects().get(&handle.0) {
            Some(NativeObject::Texture(entry)) => entry
                .subresource_index(mip, array_slice)
                .map(|index| entry.subresources[index].clone()),
            _ => None,
        }
    }

    /// Returns the kind and native description of a view.
    pub fn view_desc(&self, handle: NativeHandle) -> Option<(ViewKind, native::ViewDesc)> {
        match self.objects().get(&handle.0) {
            Some(NativeObject::View(entry)) => Some((entry.kind, entry.desc)),
            _ => None,
        }
    }

    /// Returns the native description of a sampler.
    pub fn sampler_desc(&self, handle: NativeHandle) -> Option<native::SamplerDesc> {
        match self.objects().get(&handle.0) {
            Some(NativeObject::Sampler(desc)) => Some(*desc),
            _ => None,
        }
    }

    /// Returns the stage and entry point a shader object was created for.
    pub fn shader_info(&self, handle: NativeHandle) -> Option<(ShaderStage, String)> {
        match self.objects().get(&handle.0) {
            Some(NativeObject::Shader(entry)) => Some((entry.stage, entry.entry_point.clone())),
            _ => None,
        }
    }

    /// Returns the input elements of an input layout.
    pub fn input_layout(&self, handle: NativeHandle) -> Option<Vec<InputElementDesc>> {
        match self.objects().get(&handle.0) {
            Some(NativeObject::InputLayout(elements)) => Some(elements.clone()),
            _ => None,
        }
    }

    /// Returns the translated description of a rasterizer state.
    pub fn rasterizer_state(&self, handle: NativeHandle) -> Option<RasterizerDesc> {
        match self.objects().get(&handle.0) {
            Some(NativeObject::RasterizerState(desc)) => Some(*desc),
            _ => None,
        }
    }

    /// Returns the translated description of a blend state.
    pub fn blend_state(&self, handle: NativeHandle) -> Option<BlendDesc> {
        match self.objects().get(&handle.0) {
            Some(NativeObject::BlendState(desc)) => Some(*desc),
            _ => None,
        }
    }

    /// Returns the translated description of a depth-stencil state.
    pub fn depth_stencil_state(&self, handle: NativeHandle) -> Option<DepthStencilDesc> {
        match self.objects().get(&handle.0) {
            Some(NativeObject::DepthStencilState(desc)) => Some(*desc),
            _ => None,
        }
    }

    /// Returns the number of commands a command list holds.
    pub fn command_list_len(&self, handle: NativeHandle) -> Option<usize> {
        match self.objects().get(&handle.0) {
            Some(NativeObject::CommandList(commands)) => Some(commands.len()),
            _ => None,
        }
    }

    /// Returns how many times a swap chain was presented.
    pub fn present_count(&self, handle: NativeHandle) -> Option<u64> {
        match self.objects().get(&handle.0) {
            Some(NativeObject::SwapChain(entry)) => Some(entry.presents),
            _ => None,
        }
    }

    /// Returns every command the immediate context has executed, replays included.
    pub fn executed_commands(&self) -> Vec<Command> {
        self.internal.executed.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Drains the executed command log.
    pub fn take_executed_commands(&self) -> Vec<Command> {
        std::mem::take(&mut *self.internal.executed.lock().unwrap_or_else(|e| e.into_inner()))
    }

    // --- Context support ---

    pub(crate) fn check_write_discard(&self, buffer: NativeHandle, len: usize) -> Result<(), BackendError> {
        let desc = match self.objects().get(&buffer.0) {
            Some(NativeObject::Buffer(entry)) => entry.desc,
            _ => {
                return Err(self.reject(
                    hresult::E_INVALIDARG,
                    format!("Map: handle {} is not a buffer", buffer.0),
                ))
            }
        };
        if desc.usage != usage::DYNAMIC || desc.cpu_access_flags & cpu_access::WRITE == 0 {
            return Err(self.reject(
                hresult::E_INVALIDARG,
                "Map: WRITE_DISCARD requires a DYNAMIC buffer with CPU write access",
            ));
        }
        if len > desc.byte_width as usize {
            return Err(self.reject(
                hresult::E_INVALIDARG,
                format!("Map: {len} bytes do not fit a {} byte buffer", desc.byte_width),
            ));
        }
        Ok(())
    }

    pub(crate) fn register_command_list(&self, commands: Vec<Command>) -> NativeHandle {
        self.insert(NativeObject::CommandList(commands))
    }

    /// Applies a command on the immediate context and appends it to the executed log.
    pub(crate) fn execute(&self, command: Command) -> Result<(), BackendError> {
        if let Command::ExecuteCommandList(list) = command {
            let commands = match self.objects().get(&list.0) {
                Some(NativeObject::CommandList(commands)) => commands.clone(),
                _ => {
                    return Err(self.reject(
                        hresult::E_INVALIDARG,
                        format!("ExecuteCommandList: handle {} is not a command list", list.0),
                    ))
                }
            };
            log::trace!("SoftDevice: replaying {} commands of list {}", commands.len(), list.0);
            self.record(command);
            for replayed in commands {
                self.apply(&replayed);
                self.record(replayed);
            }
            return Ok(());
        }
        self.apply(&command);
        self.record(command);
        Ok(())
    }

    fn record(&self, command: Command) {
        self.internal
            .executed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(command);
    }

    fn apply(&self, command: &Command) {
        match command {
            Command::ClearRenderTarget { view, color } => self.clear_render_target(*view, *color),
            Command::ClearDepthStencil {
                view,
                flags,
                depth,
                stencil,
            } => self.clear_depth_stencil(*view, *flags, *depth, *stencil),
            Command::UpdateBuffer { buffer, data } => {
                if let Some(NativeObject::Buffer(entry)) = self.objects().get_mut(&buffer.0) {
                    let len = data.len().min(entry.data.len());
                    entry.data[..len].copy_from_slice(&data[..len]);
                }
            }
            other => log::trace!("SoftDevice: {other:?}"),
        }
    }

    fn clear_render_target(&self, view: NativeHandle, color: [f32; 4]) {
        let mut objects = self.objects();
        let (resource, desc) = match objects.get(&view.0) {
            Some(NativeObject::View(entry)) if entry.kind == ViewKind::RenderTarget => (entry.resource, entry.desc),
            _ => {
                log::warn!("D3D11 ERROR: ClearRenderTargetView: handle {} is not a render target view", view.0);
                return;
            }
        };
        let Some(encoded) = encode_color(desc.format, color) else {
            log::debug!("SoftDevice: clears of format {} are not modelled", desc.format);
            return;
        };
        match objects.get_mut(&resource.0) {
            Some(NativeObject::Texture(texture)) => {
                texture.for_each_texel(&desc, |texel| texel.copy_from_slice(&encoded));
            }
            Some(NativeObject::Buffer(buffer)) => {
                let stride = encoded.len();
                let start = (desc.first as usize * stride).min(buffer.data.len());
                let end = ((desc.first + desc.count) as usize * stride).min(buffer.data.len());
                buffer.data[start..end]
                    .chunks_exact_mut(stride)
                    .for_each(|texel| texel.copy_from_slice(&encoded));
            }
            _ => {}
        }
    }

    fn clear_depth_stencil(&self, view: NativeHandle, flags: u32, depth: f32, stencil: u8) {
        let mut objects = self.objects();
        let (resource, desc) = match objects.get(&view.0) {
            Some(NativeObject::View(entry)) if entry.kind == ViewKind::DepthStencil => (entry.resource, entry.desc),
            _ => {
                log::warn!("D3D11 ERROR: ClearDepthStencilView: handle {} is not a depth-stencil view", view.0);
                return;
            }
        };
        if let Some(NativeObject::Texture(texture)) = objects.get_mut(&resource.0) {
            texture.for_each_texel(&desc, |texel| write_depth_stencil(desc.format, texel, flags, depth, stencil));
        }
    }

    // --- Validation ---

    fn validate_buffer(&self, desc: &native::BufferDesc, initial_data: Option<&[u8]>) -> Result<(), BackendError> {
        let invalid = |message: String| Err(self.reject(hresult::E_INVALIDARG, format!("CreateBuffer: {message}")));

        if desc.byte_width == 0 {
            return invalid("ByteWidth must be non-zero".into());
        }
        if desc.bind_flags & bind::CONSTANT_BUFFER != 0 {
            if desc.bind_flags != bind::CONSTANT_BUFFER {
                return invalid("D3D11_BIND_CONSTANT_BUFFER cannot be combined with other bind flags".into());
            }
            if desc.byte_width % 16 != 0 || desc.byte_width > limits::REQ_CONSTANT_BUFFER_ELEMENT_COUNT * 16 {
                return invalid(format!(
                    "constant buffer ByteWidth {} must be a multiple of 16 and at most {}",
                    desc.byte_width,
                    limits::REQ_CONSTANT_BUFFER_ELEMENT_COUNT * 16
                ));
            }
        }
        let structured = desc.misc_flags & misc::BUFFER_STRUCTURED != 0;
        let raw = desc.misc_flags & misc::BUFFER_ALLOW_RAW_VIEWS != 0;
        if structured && raw {
            return invalid("a buffer cannot be both structured and raw".into());
        }
        if structured {
            let stride = desc.structure_byte_stride;
            if stride == 0 || stride % 4 != 0 || stride > 2048 || desc.byte_width % stride != 0 {
                return invalid(format!(
                    "StructureByteStride {stride} must be a non-zero multiple of 4, at most 2048, dividing ByteWidth {}",
                    desc.byte_width
                ));
            }
        }
        if raw && desc.bind_flags & (bind::SHADER_RESOURCE | bind::UNORDERED_ACCESS) == 0 {
            return invalid("raw buffers must be bindable as a shader resource or unordered access view".into());
        }
        validate_usage(desc.usage, desc.bind_flags, desc.cpu_access_flags, initial_data.is_some())
            .or_else(|message| invalid(message))?;
        if let Some(data) = initial_data {
            if data.len() < desc.byte_width as usize {
                return invalid(format!(
                    "initial data holds {} bytes but ByteWidth is {}",
                    data.len(),
                    desc.byte_width
                ));
            }
        }
        Ok(())
    }

    fn validate_texture(&self, desc: &native::TextureDesc, has_data: bool) -> Result<(), BackendError> {
        let invalid = |message: String| Err(self.reject(hresult::E_INVALIDARG, format!("CreateTexture: {message}")));

        if desc.width == 0 || desc.height == 0 || desc.depth_or_array_size == 0 || desc.mip_levels == 0 {
            return invalid("dimensions, array size and mip levels must be non-zero".into());
        }
        let (max_extent, max_array) = match desc.dimension {
            TextureDimension::Texture3D => (limits::REQ_TEXTURE3D_U_V_OR_W_DIMENSION, limits::REQ_TEXTURE3D_U_V_OR_W_DIMENSION),
            _ => (limits::REQ_TEXTURE2D_U_OR_V_DIMENSION, limits::REQ_TEXTURE2D_ARRAY_AXIS_DIMENSION),
        };
        if desc.width > max_extent || desc.height > max_extent || desc.depth_or_array_size > max_array {
            return invalid(format!("{}x{}x{} exceeds the device limits", desc.width, desc.height, desc.depth_or_array_size));
        }
        if format_size(desc.format) == 0 {
            return invalid(format!("format {} is not a supported texture format", desc.format));
        }
        let largest = desc.width.max(desc.height).max(match desc.dimension {
            TextureDimension::Texture3D => desc.depth_or_array_size,
            _ => 1,
        });
        if desc.mip_levels > 32 - largest.leading_zeros() {
            return invalid(format!("{} mip levels exceed the full chain of a {largest} texel texture", desc.mip_levels));
        }
        if !matches!(desc.sample_count, 1 | 2 | 4 | 8) {
            return invalid(format!("sample count {} is not supported", desc.sample_count));
        }
        if desc.sample_count > 1
            && (desc.dimension != TextureDimension::Texture2D
                || desc.mip_levels != 1
                || has_data
                || desc.bind_flags & bind::UNORDERED_ACCESS != 0)
        {
            return invalid("multisampled textures must be single-mip 2D textures without initial data or UAV binding".into());
        }
        if desc.misc_flags & misc::TEXTURECUBE != 0 && (desc.depth_or_array_size % 6 != 0 || desc.width != desc.height) {
            return invalid("cube textures need square faces and an array size that is a multiple of 6".into());
        }
        if desc.bind_flags & bind::DEPTH_STENCIL != 0 {
            if desc.bind_flags & bind::RENDER_TARGET != 0 {
                return invalid("D3D11_BIND_DEPTH_STENCIL cannot be combined with D3D11_BIND_RENDER_TARGET".into());
            }
            if !is_depth(desc.format) && !is_typeless(desc.format) {
                return invalid(format!("format {} cannot be bound as a depth-stencil", desc.format));
            }
            if desc.dimension == TextureDimension::Texture3D {
                return invalid("3D textures cannot be bound as a depth-stencil".into());
            }
        } else if is_depth(desc.format) {
            return invalid(format!("depth format {} requires D3D11_BIND_DEPTH_STENCIL", desc.format));
        }
        if desc.bind_flags & (bind::VERTEX_BUFFER | bind::INDEX_BUFFER | bind::CONSTANT_BUFFER | bind::STREAM_OUTPUT) != 0 {
            return invalid("buffer-only bind flags are set on a texture".into());
        }
        validate_usage(desc.usage, desc.bind_flags, desc.cpu_access_flags, has_data).or_else(|message| invalid(message))
    }

    fn validate_view(&self, objects: &HashMap<u64, NativeObject>, kind: ViewKind, resource: NativeHandle, desc: &mut native::ViewDesc) -> Result<(), BackendError> {
        let invalid = |message: String| Err(self.reject(hresult::E_INVALIDARG, format!("Create{kind:?}View: {message}")));

        let required = match kind {
            ViewKind::ShaderResource => bind::SHADER_RESOURCE,
            ViewKind::ShaderRWResource => bind::UNORDERED_ACCESS,
            ViewKind::RenderTarget => bind::RENDER_TARGET,
            ViewKind::DepthStencil => bind::DEPTH_STENCIL,
        };
        if desc.view_dimension == 0 {
            return invalid("the view dimension is unknown".into());
        }

        match objects.get(&resource.0) {
            Some(NativeObject::Buffer(buffer)) => {
                let buffer = &buffer.desc;
                if buffer.bind_flags & required == 0 {
                    return invalid(format!("the buffer lacks bind flag {required:#x}"));
                }
                let structured = buffer.misc_flags & misc::BUFFER_STRUCTURED != 0;
                let element_size = if desc.flags & native::buffer_view_flags::RAW != 0 {
                    if buffer.misc_flags & misc::BUFFER_ALLOW_RAW_VIEWS == 0 {
                        return invalid("raw views need a buffer created with D3D11_RESOURCE_MISC_BUFFER_ALLOW_RAW_VIEWS".into());
                    }
                    if desc.format != dxgi_format::R32_TYPELESS {
                        return invalid(format!("raw views must use DXGI_FORMAT_R32_TYPELESS, not {}", desc.format));
                    }
                    4
                } else if structured {
                    if desc.format != dxgi_format::UNKNOWN {
                        return invalid(format!("structured buffer views must use DXGI_FORMAT_UNKNOWN, not {}", desc.format));
                    }
                    buffer.structure_byte_stride
                } else {
                    if desc.format == dxgi_format::UNKNOWN || is_typeless(desc.format) {
                        return invalid(format!("typed buffer views need a typed format, not {}", desc.format));
                    }
                    format_size(desc.format)
                };
                let end = (desc.first as u64 + desc.count as u64) * element_size as u64;
                if desc.count == 0 || end > buffer.byte_width as u64 {
                    return invalid(format!(
                        "elements {}..{} exceed the {} byte buffer",
                        desc.first,
                        desc.first + desc.count,
                        buffer.byte_width
                    ));
                }
                Ok(())
            }
            Some(NativeObject::Texture(texture)) => {
                let texture = &texture.desc;
                if texture.bind_flags & required == 0 {
                    return invalid(format!("the texture lacks bind flag {required:#x}"));
                }
                if desc.format == dxgi_format::UNKNOWN {
                    desc.format = texture.format;
                }
                if is_typeless(desc.format) {
                    return invalid(format!("format {} is typeless", desc.format));
                }
                if format_size(desc.format) != format_size(texture.format) {
                    return invalid(format!("format {} is not compatible with the texture format {}", desc.format, texture.format));
                }
                if (kind == ViewKind::DepthStencil) != is_depth(desc.format) {
                    return invalid(format!("format {} does not suit a {kind:?} view", desc.format));
                }
                if desc.count == 0 || desc.first + desc.count > texture.mip_levels {
                    return invalid(format!("mips {}..{} exceed the texture's {}", desc.first, desc.first + desc.count, texture.mip_levels));
                }
                let slices = match texture.dimension {
                    TextureDimension::Texture3D => (texture.depth_or_array_size >> desc.first).max(1),
                    _ => texture.depth_or_array_size,
                };
                if desc.array_size == 0 || desc.first_array_slice + desc.array_size > slices {
                    return invalid(format!(
                        "slices {}..{} exceed the texture's {slices}",
                        desc.first_array_slice,
                        desc.first_array_slice + desc.array_size
                    ));
                }
                Ok(())
            }
            _ => invalid(format!("handle {} is not a buffer or texture", resource.0)),
        }
    }

    fn texture_storage(&self, desc: &native::TextureDesc, initial_data: Option<&[u8]>, subresources: &[SubresourceData]) -> Result<Vec<Vec<u8>>, BackendError> {
        let entry = SoftTextureEntry {
            desc: *desc,
            subresources: Vec::new(),
        };
        let stride = format_size(desc.format) as u64;
        let array_size = entry.array_size();
        let mut total = 0u64;
        let mut storage = Vec::with_capacity((array_size * desc.mip_levels) as usize);
        for _slice in 0..array_size {
            for mip in 0..desc.mip_levels {
                let (w, h, d) = entry.mip_extent(mip);
                let size = stride * w as u64 * h as u64 * d as u64;
                total += size;
                if total > MAX_TEXTURE_BYTES {
                    return Err(self.reject(hresult::E_OUTOFMEMORY, "CreateTexture: out of memory"));
                }
                storage.push(vec![0u8; size as usize]);
            }
        }

        if let Some(data) = initial_data {
            for sub in subresources {
                let Some(index) = entry.subresource_index(sub.mip, sub.array_slice) else {
                    return Err(self.reject(
                        hresult::E_INVALIDARG,
                        format!("CreateTexture: subresource (mip {}, slice {}) does not exist", sub.mip, sub.array_slice),
                    ));
                };
                let target = &mut storage[index];
                let Some(source) = data.get(sub.offset..sub.offset + target.len()) else {
                    return Err(self.reject(
                        hresult::E_INVALIDARG,
                        format!("CreateTexture: initial data ends before subresource (mip {}, slice {})", sub.mip, sub.array_slice),
                    ));
                };
                target.copy_from_slice(source);
            }
        }
        Ok(storage)
    }
}

/// The usage rules shared by buffers and textures.
fn validate_usage(usage_value: u32, bind_flags: u32, cpu_flags: u32, has_data: bool) -> Result<(), String> {
    match usage_value {
        usage::IMMUTABLE if !has_data => Err("IMMUTABLE resources need initial data".into()),
        usage::IMMUTABLE if cpu_flags != 0 => Err("IMMUTABLE resources cannot have CPU access".into()),
        usage::DYNAMIC if cpu_flags != cpu_access::WRITE => Err("DYNAMIC resources need exactly D3D11_CPU_ACCESS_WRITE".into()),
        usage::DYNAMIC if bind_flags & bind::UNORDERED_ACCESS != 0 => Err("DYNAMIC resources cannot be bound for unordered access".into()),
        usage::STAGING if bind_flags != 0 => Err("STAGING resources cannot have bind flags".into()),
        usage::DEFAULT if cpu_flags & cpu_access::WRITE != 0 => Err("DEFAULT resources cannot be CPU-writable".into()),
        _ => Ok(()),
    }
}

/// Encodes a clear color as one texel of `format`.
fn encode_color(format: u32, color: [f32; 4]) -> Option<Vec<u8>> {
    use dxgi_format as f;
    let unorm8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    let srgb = LinearRgba::from(color).to_srgb().to_array();
    let floats = |n: usize| bytemuck::cast_slice::<f32, u8>(&color[..n]).to_vec();

    let texel = match format {
        f::R8G8B8A8_UNORM => color.iter().map(|&c| unorm8(c)).collect(),
        f::R8G8B8A8_UNORM_SRGB => srgb.iter().map(|&c| unorm8(c)).collect(),
        f::B8G8R8A8_UNORM => [color[2], color[1], color[0], color[3]].iter().map(|&c| unorm8(c)).collect(),
        f::B8G8R8A8_UNORM_SRGB => [srgb[2], srgb[1], srgb[0], srgb[3]].iter().map(|&c| unorm8(c)).collect(),
        f::R8G8B8A8_UINT => color.iter().map(|&c| c.clamp(0.0, 255.0) as u8).collect(),
        f::R8G8_UNORM => color[..2].iter().map(|&c| unorm8(c)).collect(),
        f::R8_UNORM => vec![unorm8(color[0])],
        f::R16_UNORM => ((color[0].clamp(0.0, 1.0) * 65535.0).round() as u16).to_le_bytes().to_vec(),
        f::R32G32B32A32_FLOAT => floats(4),
        f::R32G32B32_FLOAT => floats(3),
        f::R32G32_FLOAT => floats(2),
        f::R32_FLOAT => floats(1),
        f::R32_UINT => (color[0].max(0.0) as u32).to_le_bytes().to_vec(),
        f::R10G10B10A2_UNORM => {
            let c10 = |v: f32| (v.clamp(0.0, 1.0) * 1023.0).round() as u32;
            let a2 = (color[3].clamp(0.0, 1.0) * 3.0).round() as u32;
            (c10(color[0]) | c10(color[1]) << 10 | c10(color[2]) << 20 | a2 << 30)
                .to_le_bytes()
                .to_vec()
        }
        _ => return None,
    };
    Some(texel)
}

/// Updates the selected channels of one depth-stencil texel.
fn write_depth_stencil(format: u32, texel: &mut [u8], flags: u32, depth: f32, stencil: u8) {
    let write_depth = flags & clear::DEPTH != 0;
    let write_stencil = flags & clear::STENCIL != 0;
    let depth = depth.clamp(0.0, 1.0);
    match format {
        dxgi_format::D32_FLOAT if write_depth => texel.copy_from_slice(bytemuck::bytes_of(&depth)),
        dxgi_format::D16_UNORM if write_depth => {
            texel.copy_from_slice(&((depth * 65535.0).round() as u16).to_le_bytes())
        }
        dxgi_format::D24_UNORM_S8_UINT => {
            let mut value = u32::from_le_bytes([texel[0], texel[1], texel[2], texel[3]]);
            if write_depth {
                value = (value & 0xFF00_0000) | (depth * 16_777_215.0).round() as u32;
            }
            if write_stencil {
                value = (value & 0x00FF_FFFF) | (stencil as u32) << 24;
            }
            texel.copy_from_slice(&value.to_le_bytes());
        }
        dxgi_format::D32_FLOAT_S8X24_UINT => {
            if write_depth {
                texel[..4].copy_from_slice(&depth.to_le_bytes());
            }
            if write_stencil {
                texel[4] = stencil;
            }
        }
        _ => {}
    }
}

impl NativeDevice for SoftDevice {
    fn create_buffer(&self, desc: &BufferDesc<'_>) -> Result<NativeHandle, BackendError> {
        let native: native::BufferDesc = desc.into_d3d11();
        self.validate_buffer(&native, desc.initial_data)?;
        let mut data = vec![0u8; native.byte_width as usize];
        if let Some(initial) = desc.initial_data {
            let len = data.len();
            data.copy_from_slice(&initial[..len]);
        }
        Ok(self.insert(NativeObject::Buffer(SoftBufferEntry { desc: native, data })))
    }

    fn create_texture(&self, desc: &TextureDesc<'_>, subresources: &[SubresourceData]) -> Result<NativeHandle, BackendError> {
        let native: native::TextureDesc = desc.into_d3d11();
        self.validate_texture(&native, desc.initial_data.is_some())?;
        let storage = self.texture_storage(&native, desc.initial_data, subresources)?;
        Ok(self.insert(NativeObject::Texture(SoftTextureEntry {
            desc: native,
            subresources: storage,
        })))
    }

    fn create_sampler(&self, desc: &SamplerDesc<'_>) -> Result<NativeHandle, BackendError> {
        let native: native::SamplerDesc = desc.into_d3d11();
        let anisotropic = native.filter & !native::filter::COMPARISON == native::filter::ANISOTROPIC;
        if anisotropic && !(1..=16).contains(&native.max_anisotropy) {
            return Err(self.reject(
                hresult::E_INVALIDARG,
                format!("CreateSamplerState: MaxAnisotropy {} must be in 1..=16", native.max_anisotropy),
            ));
        }
        if !(-16.0..=15.99).contains(&native.mip_lod_bias) {
            return Err(self.reject(
                hresult::E_INVALIDARG,
                format!("CreateSamplerState: MipLODBias {} is out of range", native.mip_lod_bias),
            ));
        }
        if native.min_lod.is_nan() || native.max_lod.is_nan() || native.min_lod > native.max_lod {
            return Err(self.reject(
                hresult::E_INVALIDARG,
                format!("CreateSamplerState: MinLOD {} exceeds MaxLOD {}", native.min_lod, native.max_lod),
            ));
        }
        Ok(self.insert(NativeObject::Sampler(native)))
    }

    fn create_shader(&self, bytecode: &ShaderBytecode) -> Result<NativeHandle, BackendError> {
        let container = ShaderContainer::decode(&bytecode.bytes)
            .map_err(|e| self.reject(hresult::E_INVALIDARG, format!("CreateShader: {e}")))?;
        if container.stage() != Some(bytecode.stage) {
            return Err(self.reject(
                hresult::E_INVALIDARG,
                format!(
                    "CreateShader: bytecode compiled for {} cannot create a {:?} shader",
                    container.profile, bytecode.stage
                ),
            ));
        }
        Ok(self.insert(NativeObject::Shader(SoftShaderEntry {
            stage: bytecode.stage,
            entry_point: container.entry_point,
        })))
    }

    fn create_view(&self, desc: &NativeViewDesc) -> Result<NativeHandle, BackendError> {
        let mut native: native::ViewDesc = desc.into_d3d11();
        {
            let objects = self.objects();
            self.validate_view(&objects, desc.kind, desc.resource, &mut native)?;
        }
        Ok(self.insert(NativeObject::View(SoftViewEntry {
            kind: desc.kind,
            resource: desc.resource,
            desc: native,
        })))
    }

    fn create_input_layout(&self, layout: &InputLayout, vertex_shader: &ShaderBytecode) -> Result<NativeHandle, BackendError> {
        let container = ShaderContainer::decode(&vertex_shader.bytes)
            .map_err(|e| self.reject(hresult::E_INVALIDARG, format!("CreateInputLayout: {e}")))?;
        if container.stage() != Some(ShaderStage::Vertex) {
            return Err(self.reject(
                hresult::E_INVALIDARG,
                format!("CreateInputLayout: the signature comes from a {} shader", container.profile),
            ));
        }
        let elements: Vec<InputElementDesc> = layout.into_d3d11();
        let provided: Vec<SignatureElement> = elements
            .iter()
            .map(|e| SignatureElement {
                semantic: e.semantic_name.to_ascii_uppercase(),
                index: e.semantic_index,
            })
            .collect();
        if let Some(missing) = container
            .inputs
            .iter()
            .find(|input| !input.is_system_value() && !provided.contains(input))
        {
            return Err(self.reject(
                hresult::E_INVALIDARG,
                format!(
                    "CreateInputLayout: the vertex shader reads {}{} but the layout does not provide it",
                    missing.semantic, missing.index
                ),
            ));
        }
        Ok(self.insert(NativeObject::InputLayout(elements)))
    }

    fn create_rasterizer_state(&self, state: &RasterizerState) -> Result<NativeHandle, BackendError> {
        let native: RasterizerDesc = state.into_d3d11();
        if !native.depth_bias_clamp.is_finite() || !native.slope_scaled_depth_bias.is_finite() {
            return Err(self.reject(
                hresult::E_INVALIDARG,
                "CreateRasterizerState: depth bias values must be finite",
            ));
        }
        Ok(self.insert(NativeObject::RasterizerState(native)))
    }

    fn create_blend_state(&self, state: &BlendState) -> Result<NativeHandle, BackendError> {
        let native: BlendDesc = state.into_d3d11();
        let color_factors = [
            native::blend::SRC_COLOR,
            native::blend::INV_SRC_COLOR,
            native::blend::DEST_COLOR,
            native::blend::INV_DEST_COLOR,
        ];
        for (slot, target) in native.render_target.iter().enumerate() {
            if target.blend_enable
                && (color_factors.contains(&target.src_blend_alpha) || color_factors.contains(&target.dest_blend_alpha))
            {
                return Err(self.reject(
                    hresult::E_INVALIDARG,
                    format!("CreateBlendState: render target {slot} uses a color factor for alpha blending"),
                ));
            }
        }
        Ok(self.insert(NativeObject::BlendState(native)))
    }

    fn create_depth_stencil_state(&self, state: &DepthStencilState) -> Result<NativeHandle, BackendError> {
        let native: DepthStencilDesc = state.into_d3d11();
        Ok(self.insert(NativeObject::DepthStencilState(native)))
    }

    fn create_swap_chain(&self, desc: &SwapChainDesc<'_>, window: RawWindowHandle, size: Extent2D) -> Result<NativeSwapChain, BackendError> {
        let format: u32 = desc.format.into_d3d11();
        let presentable = [
            dxgi_format::R8G8B8A8_UNORM,
            dxgi_format::R8G8B8A8_UNORM_SRGB,
            dxgi_format::B8G8R8A8_UNORM,
            dxgi_format::B8G8R8A8_UNORM_SRGB,
            dxgi_format::R16G16B16A16_FLOAT,
            dxgi_format::R10G10B10A2_UNORM,
        ];
        if !presentable.contains(&format) {
            return Err(self.reject(
                hresult::DXGI_ERROR_INVALID_CALL,
                format!("CreateSwapChain: format {format} cannot be presented"),
            ));
        }
        if !(1..=16).contains(&desc.buffer_count) || size.width == 0 || size.height == 0 {
            return Err(self.reject(
                hresult::DXGI_ERROR_INVALID_CALL,
                format!("CreateSwapChain: {} buffers of {}x{}", desc.buffer_count, size.width, size.height),
            ));
        }
        log::debug!("SoftDevice: Creating swap chain for window {window:?}");

        let back_buffer = native::TextureDesc {
            dimension: TextureDimension::Texture2D,
            width: size.width,
            height: size.height,
            depth_or_array_size: 1,
            mip_levels: 1,
            format,
            sample_count: 1,
            usage: usage::DEFAULT,
            bind_flags: bind::RENDER_TARGET | bind::SHADER_RESOURCE,
            cpu_access_flags: 0,
            misc_flags: 0,
        };
        let storage = self.texture_storage(&back_buffer, None, &[])?;
        let back_buffer = self.insert(NativeObject::Texture(SoftTextureEntry {
            desc: back_buffer,
            subresources: storage,
        }));
        let handle = self.insert(NativeObject::SwapChain(SoftSwapChainEntry {
            back_buffer,
            buffer_count: desc.buffer_count,
            presents: 0,
        }));
        Ok(NativeSwapChain { handle, back_buffer })
    }

    fn present(&self, swap_chain: NativeHandle, sync_interval: u32) -> Result<(), BackendError> {
        if sync_interval > 4 {
            return Err(self.reject(
                hresult::DXGI_ERROR_INVALID_CALL,
                format!("Present: sync interval {sync_interval} is above 4"),
            ));
        }
        match self.objects().get_mut(&swap_chain.0) {
            Some(NativeObject::SwapChain(entry)) => {
                entry.presents += 1;
                log::trace!(
                    "SoftDevice: present #{} of swap chain {} ({} buffers)",
                    entry.presents,
                    swap_chain.0,
                    entry.buffer_count
                );
                Ok(())
            }
            _ => Err(BackendError::new(
                hresult::DXGI_ERROR_INVALID_CALL,
                format!("Present: handle {} is not a swap chain", swap_chain.0),
            )),
        }
    }

    fn immediate_context(&self) -> Box<dyn NativeContext> {
        Box::new(SoftContext::new(self.clone(), false))
    }

    fn create_deferred_context(&self) -> Result<Box<dyn NativeContext>, BackendError> {
        Ok(Box::new(SoftContext::new(self.clone(), true)))
    }

    fn release(&self, handle: NativeHandle) {
        let removed = self.objects().remove(&handle.0);
        match removed {
            Some(NativeObject::SwapChain(entry)) => {
                self.objects().remove(&entry.back_buffer.0);
                log::debug!("SoftDevice: Destroyed swap chain with ID: {}", handle.0);
            }
            Some(object) => log::debug!("SoftDevice: Destroyed {} with ID: {}", object.kind_name(), handle.0),
            None => log::debug!("SoftDevice: release of unknown handle {}", handle.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::renderer::api::{BindFlags, BufferSubType, CpuAccess, ResourceFormat, Usage};

    fn dynamic_constant_buffer(device: &SoftDevice, size: u32) -> NativeHandle {
        device
            .create_buffer(&BufferDesc {
                element_size: size,
                element_count: 1,
                usage: Usage::Dynamic,
                cpu_access: CpuAccess::Write,
                bind_flags: BindFlags::CONSTANT_BUFFER,
                ..Default::default()
            })
            .unwrap()
    }

    #[test]
    fn constant_buffers_follow_debug_layer_rules() {
        let device = SoftDevice::new();
        assert!(device
            .create_buffer(&BufferDesc {
                element_size: 20,
                element_count: 1,
                bind_flags: BindFlags::CONSTANT_BUFFER,
                ..Default::default()
            })
            .is_err());
        let err = device
            .create_buffer(&BufferDesc {
                element_size: 16,
                element_count: 1,
                bind_flags: BindFlags::CONSTANT_BUFFER | BindFlags::VERTEX_BUFFER,
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(err.code, hresult::E_INVALIDARG);
        assert_eq!(device.live_object_count(), 0);
    }

    #[test]
    fn usage_rules_are_checked() {
        let device = SoftDevice::new();
        let immutable_without_data = BufferDesc {
            element_size: 4,
            element_count: 4,
            usage: Usage::Immutable,
            bind_flags: BindFlags::VERTEX_BUFFER,
            ..Default::default()
        };
        assert!(device.create_buffer(&immutable_without_data).is_err());

        let dynamic_without_write = BufferDesc {
            usage: Usage::Dynamic,
            ..immutable_without_data.clone()
        };
        assert!(device.create_buffer(&dynamic_without_write).is_err());

        let data = [1u8; 16];
        let immutable = BufferDesc {
            initial_data: Some(&data),
            ..immutable_without_data
        };
        let handle = device.create_buffer(&immutable).unwrap();
        assert_eq!(device.buffer_contents(handle).unwrap(), data.to_vec());
    }

    #[test]
    fn structured_stride_must_be_a_multiple_of_four() {
        let device = SoftDevice::new();
        let desc = BufferDesc {
            element_size: 6,
            element_count: 4,
            bind_flags: BindFlags::SHADER_RESOURCE,
            sub_type: BufferSubType::Structured,
            ..Default::default()
        };
        assert!(device.create_buffer(&desc).is_err());
        let desc = BufferDesc { element_size: 8, ..desc };
        let handle = device.create_buffer(&desc).unwrap();
        assert_eq!(device.buffer_desc(handle).unwrap().structure_byte_stride, 8);
    }

    #[test]
    fn write_discard_requires_dynamic_cpu_write() {
        let device = SoftDevice::new();
        let dynamic = dynamic_constant_buffer(&device, 16);
        let mut context = device.immediate_context();
        context.write_discard(dynamic, &[7u8; 16]).unwrap();
        assert_eq!(device.buffer_contents(dynamic).unwrap(), vec![7u8; 16]);
        assert!(context.write_discard(dynamic, &[0u8; 32]).is_err());

        let static_buffer = device
            .create_buffer(&BufferDesc {
                element_size: 16,
                element_count: 1,
                bind_flags: BindFlags::CONSTANT_BUFFER,
                ..Default::default()
            })
            .unwrap();
        assert!(context.write_discard(static_buffer, &[0u8; 16]).is_err());
    }

    #[test]
    fn deferred_updates_land_on_execution() {
        let device = SoftDevice::new();
        let buffer = dynamic_constant_buffer(&device, 16);
        let mut deferred = device.create_deferred_context().unwrap();
        deferred.write_discard(buffer, &[9u8; 16]).unwrap();
        deferred.draw(3, 0);
        assert_eq!(device.buffer_contents(buffer).unwrap(), vec![0u8; 16]);

        let list = deferred.finish_command_list().unwrap();
        assert_eq!(device.command_list_len(list), Some(2));
        assert!(deferred.execute_command_list(list).is_err());

        let mut immediate = device.immediate_context();
        assert!(immediate.finish_command_list().is_err());
        immediate.execute_command_list(list).unwrap();
        assert_eq!(device.buffer_contents(buffer).unwrap(), vec![9u8; 16]);
        assert_eq!(
            device.executed_commands().last(),
            Some(&Command::Draw {
                vertex_count: 3,
                start_vertex: 0
            })
        );
    }

    #[test]
    fn depth_stencil_clears_touch_only_selected_channels() {
        let mut texel = [0u8; 4];
        write_depth_stencil(dxgi_format::D24_UNORM_S8_UINT, &mut texel, clear::STENCIL, 1.0, 0xAB);
        assert_eq!(u32::from_le_bytes(texel), 0xAB00_0000);
        write_depth_stencil(dxgi_format::D24_UNORM_S8_UINT, &mut texel, clear::DEPTH, 1.0, 0);
        assert_eq!(u32::from_le_bytes(texel), 0xABFF_FFFF);
    }

    #[test]
    fn srgb_clears_are_encoded() {
        assert_eq!(encode_color(dxgi_format::R8G8B8A8_UNORM, [1.0, 0.5, 0.0, 1.0]), Some(vec![255, 128, 0, 255]));
        assert_eq!(encode_color(dxgi_format::B8G8R8A8_UNORM, [1.0, 0.0, 0.0, 1.0]), Some(vec![0, 0, 255, 255]));
        let srgb = encode_color(dxgi_format::R8G8B8A8_UNORM_SRGB, [0.5, 0.5, 0.5, 0.5]).unwrap();
        assert_eq!(srgb[0], 188);
        assert_eq!(srgb[3], 128);
        assert_eq!(encode_color(dxgi_format::R16G16B16A16_FLOAT, [0.0; 4]), None);
    }

    #[test]
    fn float_clears_keep_full_precision() {
        let texel = encode_color(dxgi_format::R32G32_FLOAT, [0.25, 0.1, 0.5, 1.0]).unwrap();
        assert_eq!(texel.len(), 8);
        let values: Vec<f32> = bytemuck::pod_collect_to_vec(&texel);
        approx::assert_relative_eq!(values[0], 0.25);
        approx::assert_relative_eq!(values[1], 0.1);
    }

    #[test]
    fn releasing_a_swap_chain_drops_its_back_buffer() {
        let device = SoftDevice::new();
        let window = RawWindowHandle::Web(raw_window_handle::WebWindowHandle::new(1));
        let desc = SwapChainDesc::default();
        let chain = device.create_swap_chain(&desc, window, Extent2D::new(8, 8)).unwrap();
        assert_eq!(device.object_kind(chain.back_buffer), Some("Texture"));
        device.present(chain.handle, 1).unwrap();
        assert_eq!(device.present_count(chain.handle), Some(1));
        assert!(device.present(chain.handle, 5).is_err());

        device.release(chain.handle);
        assert_eq!(device.live_object_count(), 0);
        device.release(chain.handle);

        let bad = SwapChainDesc {
            format: ResourceFormat::D32Float,
            ..Default::default()
        };
        assert_eq!(
            device.create_swap_chain(&bad, window, Extent2D::new(8, 8)).unwrap_err().code,
            hresult::DXGI_ERROR_INVALID_CALL
        );
    }
}
