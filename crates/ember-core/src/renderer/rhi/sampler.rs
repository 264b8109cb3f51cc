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

use super::{DeviceObject, DeviceShared, ObjectHeader};
use crate::renderer::api::*;
use crate::renderer::error::ResourceError;
use std::sync::Arc;

/// Texture sampling state.
#[derive(Debug)]
pub struct Sampler {
    header: ObjectHeader,
    desc: SamplerDesc<'static>,
    handle: NativeHandle,
}

impl Sampler {
    pub(crate) fn create(shared: &Arc<DeviceShared>, desc: &SamplerDesc<'_>) -> Result<Self, ResourceError> {
        if !(1..=16).contains(&desc.max_anisotropy) {
            return Err(ResourceError::invalid(
                DeviceObjectType::Sampler,
                format!("max anisotropy must be in 1..=16, got {}", desc.max_anisotropy),
            ));
        }
        if desc.min_lod > desc.max_lod {
            return Err(ResourceError::invalid(
                DeviceObjectType::Sampler,
                format!("min LOD {} is above max LOD {}", desc.min_lod, desc.max_lod),
            ));
        }
        let handle = shared.backend.create_sampler(desc)?;
        Ok(Self {
            header: ObjectHeader::new(
                DeviceObjectType::Sampler,
                desc.label.as_ref().map(|l| l.to_string()),
                shared,
            ),
            desc: desc.to_static(),
            handle,
        })
    }

    /// Returns the descriptor the sampler was created with.
    pub fn desc(&self) -> &SamplerDesc<'static> {
        &self.desc
    }

    /// Returns the native sampler state.
    pub fn native_handle(&self) -> NativeHandle {
        self.handle
    }
}

impl DeviceObject for Sampler {
    fn header(&self) -> &ObjectHeader {
        &self.header
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        self.header.release(self.handle);
    }
}
