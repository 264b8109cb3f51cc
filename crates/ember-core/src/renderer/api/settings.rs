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

//! Device-wide configuration.

use serde::{Deserialize, Serialize};

/// Settings a [`Device`](crate::renderer::Device) is created with.
///
/// Every field has a default, so partial JSON documents are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSettings {
    /// Run the leak check when the device shuts down.
    pub leak_check: bool,
    /// Validate bindings every time a context binds a full binding table.
    pub validate_bindings: bool,
    /// Prefix joined to every file shader path.
    pub shader_root: String,
    /// A debug name for the device, used in log messages.
    pub label: String,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            leak_check: cfg!(debug_assertions),
            validate_bindings: cfg!(debug_assertions),
            shader_root: String::new(),
            label: "Device".to_string(),
        }
    }
}

impl DeviceSettings {
    /// Parses settings from JSON. Missing keys take their default value.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the settings to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Joins a shader path onto the configured root.
    pub fn shader_path(&self, path: &str) -> String {
        join_shader_path(&self.shader_root, path)
    }
}

/// Joins `path` onto `root`. An empty root leaves the path unchanged.
pub fn join_shader_path(root: &str, path: &str) -> String {
    if root.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", root.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let settings = DeviceSettings::from_json_str(r#"{ "shader_root": "assets/shaders/" }"#).unwrap();
        assert_eq!(settings.shader_root, "assets/shaders/");
        assert_eq!(settings.leak_check, cfg!(debug_assertions));
        assert_eq!(settings.label, "Device");
        assert_eq!(settings.shader_path("basic.hlsl"), "assets/shaders/basic.hlsl");
    }

    #[test]
    fn json_round_trip() {
        let settings = DeviceSettings {
            leak_check: true,
            validate_bindings: false,
            shader_root: String::new(),
            label: "Editor".to_string(),
        };
        let json = settings.to_json_string().unwrap();
        assert_eq!(DeviceSettings::from_json_str(&json).unwrap(), settings);
        assert_eq!(settings.shader_path("a.hlsl"), "a.hlsl");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(DeviceSettings::from_json_str("{ leak_check: yes }").is_err());
    }
}
