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

//! Bitmask types shared by resources and views.

use crate::ember_bitflags;

ember_bitflags! {
    /// The ways a resource may be attached to the pipeline.
    ///
    /// A resource must carry at least one flag.
    pub struct BindFlags: u32 {
        /// The buffer can be bound as a vertex buffer.
        const VERTEX_BUFFER = 1 << 0;
        /// The buffer can be bound as an index buffer.
        const INDEX_BUFFER = 1 << 1;
        /// The buffer can be bound as a constant buffer.
        const CONSTANT_BUFFER = 1 << 2;
        /// The resource can be read through a shader-resource view.
        const SHADER_RESOURCE = 1 << 3;
        /// The resource can be read and written through a read-write view.
        const SHADER_RW_RESOURCE = 1 << 4;
        /// The resource can be rendered to.
        const RENDER_TARGET = 1 << 5;
        /// The texture can be used as a depth-stencil target.
        const DEPTH_STENCIL = 1 << 6;
        /// The buffer can be a stream-output target.
        const STREAM_OUTPUT = 1 << 7;
    }
}

impl BindFlags {
    /// The flags that require a buffer to declare a [`BufferSubType`](super::BufferSubType).
    pub const VIEWABLE: Self = Self::SHADER_RESOURCE
        .union(Self::SHADER_RW_RESOURCE)
        .union(Self::RENDER_TARGET);
}

ember_bitflags! {
    /// Qualifiers on a texture's [`TextureType`](super::TextureType).
    pub struct TextureSubTypeFlags: u32 {
        /// More than one array slice (or more than one cube).
        const ARRAY = 1 << 0;
        /// More than one sample per texel.
        const MULTISAMPLED = 1 << 1;
    }
}

ember_bitflags! {
    /// Which parts of a depth-stencil target a clear touches.
    pub struct ClearFlags: u32 {
        /// Clear the depth channel.
        const DEPTH = 1 << 0;
        /// Clear the stencil channel.
        const STENCIL = 1 << 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewable_flags() {
        assert!(BindFlags::VIEWABLE.contains(BindFlags::SHADER_RESOURCE));
        assert!(BindFlags::VIEWABLE.contains(BindFlags::RENDER_TARGET));
        assert!(!BindFlags::VIEWABLE.intersects(BindFlags::CONSTANT_BUFFER));
        let vb = BindFlags::VERTEX_BUFFER | BindFlags::SHADER_RESOURCE;
        assert!(vb.intersects(BindFlags::VIEWABLE));
    }
}
