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

//! The device: the single factory of every GPU object.

use super::{
    Buffer, DepthStencilView, DeviceContext, DeviceObject, DeviceObjectRef, FrameBuffer,
    FrameBufferDesc, Pipeline, PipelineDesc, RenderTargetView, ResourceLayout,
    ResourceLayoutDesc, Sampler, Shader, ShaderCompiler, ShaderRWResourceView,
    ShaderResourceView, SwapChain, Texture, ViewDesc,
};
use crate::asset::{AssetSource, CpuImage};
use crate::platform::EmberWindow;
use crate::renderer::api::*;
use crate::renderer::error::{RenderError, ResourceError};
use crate::renderer::traits::{NativeContext, NativeDevice, ShaderCompilerBackend};
use crate::utils::purge_unshared;
use std::borrow::Cow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// State shared between a [`Device`] and the objects it creates.
///
/// Objects hold it weakly, so they can release native handles while the device lives
/// without keeping it alive.
#[derive(Debug)]
pub struct DeviceShared {
    pub(crate) backend: Arc<dyn NativeDevice>,
    pub(crate) settings: DeviceSettings,
}

/// One object still referenced from outside the device at shutdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeakedObject {
    /// The kind of object.
    pub object_type: DeviceObjectType,
    /// Its debug label.
    pub label: Option<String>,
    /// The number of references held outside the device.
    pub external_references: usize,
}

/// The objects that outlived their device's teardown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeakReport {
    /// The leaked objects.
    pub leaks: Vec<LeakedObject>,
}

impl LeakReport {
    /// Returns `true` if nothing leaked.
    pub fn is_empty(&self) -> bool {
        self.leaks.is_empty()
    }

    /// Returns the number of leaked objects of one kind.
    pub fn count_of(&self, object_type: DeviceObjectType) -> usize {
        self.leaks
            .iter()
            .filter(|leak| leak.object_type == object_type)
            .count()
    }
}

/// Creates and tracks every device object.
///
/// Each factory validates its descriptor, creates the native object, keeps one
/// reference in the device's tracked list and hands the caller another. Failures are
/// logged as fatal and returned; nothing panics.
///
/// At [`Device::shutdown`] (or drop), objects only the device still references are
/// released and everything left is reported as a leak.
#[derive(Debug)]
pub struct Device {
    shared: Arc<DeviceShared>,
    objects: Mutex<Vec<DeviceObjectRef>>,
    immediate: Arc<DeviceContext>,
    compiler: ShaderCompiler,
    assets: Arc<dyn AssetSource>,
    shut_down: AtomicBool,
}

impl Device {
    /// Creates a device over a native backend.
    ///
    /// ## Arguments
    /// * `backend` - The native device.
    /// * `compiler` - The shader compiler backend.
    /// * `assets` - Where shader sources and images are loaded from.
    /// * `settings` - Validation, leak checking and the shader root.
    pub fn new(
        backend: Arc<dyn NativeDevice>,
        compiler: Arc<dyn ShaderCompilerBackend>,
        assets: Arc<dyn AssetSource>,
        settings: DeviceSettings,
    ) -> Self {
        let immediate_native = backend.immediate_context();
        let compiler = ShaderCompiler::new(compiler, assets.clone(), settings.shader_root.clone());
        let shared = Arc::new(DeviceShared { backend, settings });
        let immediate = Arc::new(DeviceContext::new(
            &shared,
            Some(format!("{} immediate context", shared.settings.label)),
            immediate_native,
        ));
        log::info!(
            "Device '{}' created (leak check: {}, binding validation: {})",
            shared.settings.label,
            shared.settings.leak_check,
            shared.settings.validate_bindings
        );
        Self {
            shared,
            objects: Mutex::new(Vec::new()),
            immediate,
            compiler,
            assets,
            shut_down: AtomicBool::new(false),
        }
    }

    fn objects(&self) -> MutexGuard<'_, Vec<DeviceObjectRef>> {
        self.objects.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Logs the outcome of a factory and tracks the new object on success.
    fn track<T>(
        &self,
        object_type: DeviceObjectType,
        label: Option<&str>,
        result: Result<T, ResourceError>,
    ) -> Result<Arc<T>, ResourceError>
    where
        Arc<T>: Into<DeviceObjectRef>,
    {
        match result {
            Ok(object) => {
                let object = Arc::new(object);
                log::debug!(
                    "Device '{}': created {:?} '{}'",
                    self.shared.settings.label,
                    object_type,
                    label.unwrap_or("Unknown")
                );
                self.objects().push(object.clone().into());
                Ok(object)
            }
            Err(err) => {
                log::error!(
                    "fatal: Device '{}' failed to create {:?} '{}': {}",
                    self.shared.settings.label,
                    object_type,
                    label.unwrap_or("Unknown"),
                    err
                );
                Err(err)
            }
        }
    }

    /// Returns the device settings.
    pub fn settings(&self) -> &DeviceSettings {
        &self.shared.settings
    }

    /// Returns the shader compiler front end.
    pub fn shader_compiler(&self) -> &ShaderCompiler {
        &self.compiler
    }

    /// Returns the immediate context.
    pub fn immediate_context(&self) -> &Arc<DeviceContext> {
        &self.immediate
    }

    /// Returns the number of objects in the tracked list.
    pub fn tracked_object_count(&self) -> usize {
        self.objects().len()
    }

    /// Creates a swap chain presenting into `window`.
    pub fn create_swap_chain(&self, desc: &SwapChainDesc<'_>, window: &dyn EmberWindow) -> Result<Arc<SwapChain>, ResourceError> {
        let result = SwapChain::create(&self.shared, desc, window);
        self.track(DeviceObjectType::SwapChain, desc.label.as_deref(), result)
    }

    /// Creates a frame buffer.
    pub fn create_frame_buffer(&self, desc: &FrameBufferDesc<'_>) -> Result<Arc<FrameBuffer>, ResourceError> {
        let result = FrameBuffer::create(&self.shared, desc);
        self.track(DeviceObjectType::FrameBuffer, desc.label.as_deref(), result)
    }

    /// Creates a buffer.
    pub fn create_buffer(&self, desc: &BufferDesc<'_>) -> Result<Arc<Buffer>, ResourceError> {
        let result = Buffer::create(&self.shared, desc);
        self.track(DeviceObjectType::Buffer, desc.label.as_deref(), result)
    }

    /// Creates a texture, or adopts `desc.native` when set.
    pub fn create_texture(&self, desc: &TextureDesc<'_>) -> Result<Arc<Texture>, ResourceError> {
        let result = Texture::create(&self.shared, desc);
        self.track(DeviceObjectType::Texture, desc.label.as_deref(), result)
    }

    /// Creates an immutable RGBA8 2D texture from a decoded image.
    pub fn create_texture_from_image(
        &self,
        label: Option<&str>,
        image: &CpuImage,
        bind_flags: BindFlags,
    ) -> Result<Arc<Texture>, ResourceError> {
        self.create_texture(&TextureDesc {
            label: label.map(Cow::Borrowed),
            width: image.width,
            height: image.height,
            format: ResourceFormat::R8G8B8A8Unorm,
            usage: Usage::Immutable,
            bind_flags,
            initial_data: Some(&image.pixels),
            ..Default::default()
        })
    }

    /// Loads an image through the asset layer and creates a texture from it.
    pub fn load_texture(&self, path: &str, bind_flags: BindFlags) -> Result<Arc<Texture>, ResourceError> {
        match self.assets.load_image(path) {
            Some(image) => self.create_texture_from_image(Some(path), &image, bind_flags),
            None => self.track::<Texture>(
                DeviceObjectType::Texture,
                Some(path),
                Err(ResourceError::invalid(
                    DeviceObjectType::Texture,
                    format!("the image '{path}' could not be loaded"),
                )),
            ),
        }
    }

    /// Creates a sampler.
    pub fn create_sampler(&self, desc: &SamplerDesc<'_>) -> Result<Arc<Sampler>, ResourceError> {
        let result = Sampler::create(&self.shared, desc);
        self.track(DeviceObjectType::Sampler, desc.label.as_deref(), result)
    }

    /// Compiles, reflects and creates a shader.
    pub fn create_shader(&self, info: &ShaderInfo<'_>) -> Result<Arc<Shader>, ResourceError> {
        let label = info.display_label();
        let result = self
            .compiler
            .compile(info)
            .and_then(|bytecode| {
                let layout = self.compiler.reflect(&label, &bytecode)?;
                Ok((bytecode, layout))
            })
            .map_err(ResourceError::from)
            .and_then(|(bytecode, layout)| {
                Shader::create(&self.shared, info.label.map(str::to_string), bytecode, layout)
            });
        self.track(DeviceObjectType::Shader, Some(label.as_str()), result)
    }

    /// Creates a read-only view.
    pub fn create_shader_resource_view(&self, desc: &ViewDesc<'_>) -> Result<Arc<ShaderResourceView>, ResourceError> {
        let result = ShaderResourceView::create(&self.shared, desc);
        self.track(DeviceObjectType::ShaderResourceView, desc.label.as_deref(), result)
    }

    /// Creates a read-write view.
    pub fn create_shader_rw_resource_view(&self, desc: &ViewDesc<'_>) -> Result<Arc<ShaderRWResourceView>, ResourceError> {
        let result = ShaderRWResourceView::create(&self.shared, desc);
        self.track(DeviceObjectType::ShaderRWResourceView, desc.label.as_deref(), result)
    }

    /// Creates a render-target view.
    pub fn create_render_target_view(&self, desc: &ViewDesc<'_>) -> Result<Arc<RenderTargetView>, ResourceError> {
        let result = RenderTargetView::create(&self.shared, desc);
        self.track(DeviceObjectType::RenderTargetView, desc.label.as_deref(), result)
    }

    /// Creates a depth-stencil view.
    pub fn create_depth_stencil_view(&self, desc: &ViewDesc<'_>) -> Result<Arc<DepthStencilView>, ResourceError> {
        let result = DepthStencilView::create(&self.shared, desc);
        self.track(DeviceObjectType::DepthStencilView, desc.label.as_deref(), result)
    }

    /// Creates a pipeline.
    pub fn create_pipeline(&self, desc: &PipelineDesc<'_>) -> Result<Arc<Pipeline>, ResourceError> {
        let result = Pipeline::create(&self.shared, desc);
        self.track(DeviceObjectType::Pipeline, desc.label.as_deref(), result)
    }

    /// Creates a pipeline-independent resource layout.
    pub fn create_resource_layout(&self, desc: &ResourceLayoutDesc<'_>) -> Result<Arc<ResourceLayout>, ResourceError> {
        let result = ResourceLayout::create(&self.shared, desc);
        self.track(DeviceObjectType::ResourceLayout, desc.label.as_deref(), result)
    }

    /// Creates a deferred command list.
    pub fn create_command_list(&self, label: Option<&str>) -> Result<Arc<DeviceContext>, ResourceError> {
        match self.shared.backend.create_deferred_context() {
            Ok(native) => self.wrap_command_list(label, native),
            Err(err) => self.track::<DeviceContext>(DeviceObjectType::CommandList, label, Err(err.into())),
        }
    }

    /// Wraps a deferred context the caller allocated from this device's backend.
    ///
    /// ## Errors
    /// * `ResourceError::InvalidDescriptor` if `native` is an immediate context.
    pub fn wrap_command_list(
        &self,
        label: Option<&str>,
        native: Box<dyn NativeContext>,
    ) -> Result<Arc<DeviceContext>, ResourceError> {
        let result = if native.is_deferred() {
            Ok(DeviceContext::new(&self.shared, label.map(str::to_string), native))
        } else {
            Err(ResourceError::invalid(
                DeviceObjectType::CommandList,
                "an immediate context cannot record a command list",
            ))
        };
        self.track(DeviceObjectType::CommandList, label, result)
    }

    /// Executes each closed command list on the immediate context, in order, and
    /// releases it so the list can record again.
    ///
    /// A list that fails is logged and skipped; the others still execute.
    ///
    /// ## Errors
    /// * The first failure, such as `RenderError::CommandListNotClosed` or
    ///   `RenderError::ForeignCommandList` for a list recorded on another device.
    pub fn execute_command_lists(&self, command_lists: &[Arc<DeviceContext>]) -> Result<(), RenderError> {
        let mut first_error = None;
        for list in command_lists {
            let result = if list.header().is_owned_by(&self.shared) {
                self.immediate.execute(list)
            } else {
                Err(RenderError::ForeignCommandList {
                    label: list.label().map(str::to_string),
                })
            };
            if let Err(err) = result {
                log::error!(
                    "Device '{}': executing '{}' failed: {err}",
                    self.shared.settings.label,
                    list.label().unwrap_or("Unknown")
                );
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Tears down the tracked list.
    ///
    /// With `leak_check` on, objects only the device references are released until
    /// none remain; whatever is left is logged as a warning and returned. With it off
    /// the list is simply cleared. Calling this twice returns an empty report.
    pub fn shutdown(&self) -> LeakReport {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return LeakReport::default();
        }

        let mut objects = std::mem::take(&mut *self.objects());
        if !self.shared.settings.leak_check {
            objects.clear();
            log::info!("Device '{}' shut down", self.shared.settings.label);
            return LeakReport::default();
        }

        let purged = purge_unshared(&mut objects, |object| object.strong_count() == 1);
        let report = LeakReport {
            leaks: objects
                .iter()
                .map(|object| LeakedObject {
                    object_type: object.object_type(),
                    label: object.as_object().label().map(str::to_string),
                    external_references: object.strong_count() - 1,
                })
                .collect(),
        };
        for leak in &report.leaks {
            log::warn!(
                "Device '{}': leaked {:?} '{}' ({} external references)",
                self.shared.settings.label,
                leak.object_type,
                leak.label.as_deref().unwrap_or("Unknown"),
                leak.external_references
            );
        }
        log::info!(
            "Device '{}' shut down: released {} objects, {} leaked",
            self.shared.settings.label,
            purged,
            report.leaks.len()
        );
        report
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::error::PipelineError;
    use crate::renderer::rhi::mock::{mock_device, shader};
    use crate::renderer::rhi::PipelineStates;

    fn color_target(device: &Device) -> Arc<Texture> {
        device
            .create_texture(&TextureDesc {
                label: Some("color".into()),
                width: 64,
                height: 64,
                bind_flags: BindFlags::RENDER_TARGET.union(BindFlags::SHADER_RESOURCE),
                ..Default::default()
            })
            .unwrap()
    }

    #[test]
    fn factories_track_what_they_create() {
        let (device, native) = mock_device();
        let texture = color_target(&device);
        let _view = device
            .create_render_target_view(&ViewDesc::texture(&texture))
            .unwrap();
        assert_eq!(device.tracked_object_count(), 2);
        assert_eq!(native.live_count(), 2);
    }

    #[test]
    fn failed_creation_is_not_tracked() {
        let (device, native) = mock_device();
        let result = device.create_buffer(&BufferDesc {
            element_size: 12,
            element_count: 1,
            bind_flags: BindFlags::CONSTANT_BUFFER,
            ..Default::default()
        });
        assert!(matches!(result, Err(ResourceError::InvalidDescriptor { .. })));
        assert_eq!(device.tracked_object_count(), 0);
        assert_eq!(native.live_count(), 0);
    }

    #[test]
    fn shutdown_releases_internal_chains_and_reports_external_references() {
        let (device, native) = mock_device();
        let kept = color_target(&device);
        let dropped = color_target(&device);
        let view = device
            .create_shader_resource_view(&ViewDesc::texture(&dropped))
            .unwrap();
        drop(view);
        drop(dropped);

        let report = device.shutdown();
        assert_eq!(report.leaks.len(), 1);
        assert_eq!(report.leaks[0].object_type, DeviceObjectType::Texture);
        assert_eq!(report.leaks[0].external_references, 1);
        assert_eq!(native.live_count(), 1);
        assert!(device.shutdown().is_empty());

        drop(kept);
        assert_eq!(native.live_count(), 0);
    }

    #[test]
    fn pipelines_need_a_vertex_shader() {
        let (device, native) = mock_device();
        let ps = shader(&device, ShaderStage::Pixel, "sampler linear 0");
        let result = device.create_pipeline(&PipelineDesc::default().with_shader(&ps));
        assert!(matches!(
            result,
            Err(ResourceError::Pipeline(PipelineError::MissingVertexShader { .. }))
        ));
        // Only the shader is alive.
        assert_eq!(native.live_count(), 1);
    }

    #[test]
    fn unbuilt_pipeline_states_are_null() {
        let states = PipelineStates::default();
        assert!([states.input_layout, states.rasterizer, states.blend, states.depth_stencil]
            .iter()
            .all(NativeHandle::is_null));
    }

    #[test]
    fn a_failing_state_releases_the_states_built_before_it() {
        let (device, native) = mock_device();
        let vs = shader(&device, ShaderStage::Vertex, "cbuffer PerFrame 0");
        let mut desc = PipelineDesc::default().with_shader(&vs);
        desc.depth_stencil.stencil_test = true;
        desc.depth_stencil.stencil_read_mask = 0;

        let result = device.create_pipeline(&desc);
        assert!(matches!(
            result,
            Err(ResourceError::Pipeline(PipelineError::StateCreationFailed {
                state: "depth-stencil state",
                ..
            }))
        ));
        assert_eq!(native.live_count(), 1);
    }

    #[test]
    fn shader_compile_errors_surface_as_shader_errors() {
        let (device, _) = mock_device();
        let result = device.create_shader(&ShaderInfo {
            label: Some("broken"),
            stage: ShaderStage::Vertex,
            source: ShaderSource::Code("syntax error".into()),
            entry_point: "main",
        });
        assert!(matches!(result, Err(ResourceError::Shader(_))));
    }

    #[test]
    fn missing_images_fail_texture_loading() {
        let (device, _) = mock_device();
        let result = device.load_texture("textures/missing.png", BindFlags::SHADER_RESOURCE);
        assert!(result.is_err());
    }

    #[test]
    fn images_become_immutable_rgba8_textures() {
        let (device, _) = mock_device();
        let image = CpuImage {
            width: 2,
            height: 2,
            pixels: vec![255; 16],
        };
        let texture = device
            .create_texture_from_image(Some("white"), &image, BindFlags::SHADER_RESOURCE)
            .unwrap();
        assert_eq!(texture.format(), ResourceFormat::R8G8B8A8Unorm);
        assert_eq!(texture.desc().usage, Usage::Immutable);
        assert_eq!(texture.mip_count(), 1);
    }
}
