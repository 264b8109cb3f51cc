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

//! A filesystem-backed [`AssetSource`].

use anyhow::{Context, Result};
use ember_core::asset::{AssetSource, CpuImage};
use std::fs;
use std::path::{Path, PathBuf};

/// Serves shader sources and images from a directory on disk.
///
/// Paths are resolved relative to the root. Failures are logged and reported as `None`,
/// which is what the RHI expects from an asset source.
#[derive(Debug, Clone)]
pub struct FileSystemAssets {
    root: PathBuf,
}

impl FileSystemAssets {
    /// Creates a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }

    fn read_text(&self, path: &str) -> Result<String> {
        let full = self.resolve(path);
        fs::read_to_string(&full).with_context(|| format!("Failed to read '{}'", full.display()))
    }

    fn decode_image(&self, path: &str) -> Result<CpuImage> {
        let full = self.resolve(path);
        let bytes = fs::read(&full).with_context(|| format!("Failed to read '{}'", full.display()))?;
        let img = image::load_from_memory(&bytes)
            .with_context(|| format!("Failed to decode image '{}'", full.display()))?;

        // Always hand out tightly packed RGBA8.
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(CpuImage {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }
}

impl AssetSource for FileSystemAssets {
    fn load_text(&self, path: &str) -> Option<String> {
        match self.read_text(path) {
            Ok(text) => Some(text),
            Err(e) => {
                log::warn!("FileSystemAssets: {e:#}");
                None
            }
        }
    }

    fn load_image(&self, path: &str) -> Option<CpuImage> {
        match self.decode_image(path) {
            Ok(image) => {
                log::debug!(
                    "FileSystemAssets: Decoded '{path}' ({}x{})",
                    image.width,
                    image.height
                );
                Some(image)
            }
            Err(e) => {
                log::warn!("FileSystemAssets: {e:#}");
                None
            }
        }
    }
}
