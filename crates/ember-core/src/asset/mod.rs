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

//! Contracts for the file/asset layer the RHI consumes.
//!
//! The RHI never touches the filesystem itself. Shader sources and decoded images are
//! requested through an [`AssetSource`]; concrete implementations (filesystem,
//! packed archives, in-memory fixtures) live elsewhere.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::RwLock;

/// A decoded image in tightly packed RGBA8 layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes, row-major, top row first.
    pub pixels: Vec<u8>,
}

impl CpuImage {
    /// Returns the byte length of one row.
    pub fn row_pitch(&self) -> usize {
        self.width as usize * 4
    }
}

/// Loads text and images by relative path.
///
/// Both methods report failure as `None`; implementations are expected to log why.
pub trait AssetSource: Send + Sync + Debug {
    /// Returns the UTF-8 text at `path`, or `None` if it cannot be read.
    fn load_text(&self, path: &str) -> Option<String>;

    /// Decodes the image at `path` into RGBA8, or returns `None` on failure.
    fn load_image(&self, path: &str) -> Option<CpuImage>;
}

/// An [`AssetSource`] serving fixtures registered in memory.
#[derive(Debug, Default)]
pub struct InMemoryAssets {
    texts: RwLock<HashMap<String, String>>,
    images: RwLock<HashMap<String, CpuImage>>,
}

impl InMemoryAssets {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a text file.
    pub fn insert_text(&self, path: impl Into<String>, text: impl Into<String>) {
        self.texts
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.into(), text.into());
    }

    /// Registers an image.
    pub fn insert_image(&self, path: impl Into<String>, image: CpuImage) {
        self.images
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.into(), image);
    }
}

impl AssetSource for InMemoryAssets {
    fn load_text(&self, path: &str) -> Option<String> {
        let text = self
            .texts
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(path)
            .cloned();
        if text.is_none() {
            log::warn!("InMemoryAssets: no text registered for '{path}'");
        }
        text
    }

    fn load_image(&self, path: &str) -> Option<CpuImage> {
        let image = self
            .images
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(path)
            .cloned();
        if image.is_none() {
            log::warn!("InMemoryAssets: no image registered for '{path}'");
        }
        image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_assets_serve_registered_entries() {
        let assets = InMemoryAssets::new();
        assets.insert_text("shaders/a.hlsl", "float4 main() : SV_Target { return 0; }");
        assets.insert_image(
            "textures/white.png",
            CpuImage {
                width: 1,
                height: 1,
                pixels: vec![255; 4],
            },
        );

        assert!(assets.load_text("shaders/a.hlsl").is_some());
        assert!(assets.load_text("shaders/missing.hlsl").is_none());
        let image = assets.load_image("textures/white.png").unwrap();
        assert_eq!(image.row_pitch(), 4);
    }
}
