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

use crate::renderer::api::ReflectedBinding;
use crate::renderer::error::BackendError;
use std::fmt::Debug;

/// Compiles HLSL and reflects the resources the result binds.
pub trait ShaderCompilerBackend: Send + Sync + Debug {
    /// Compiles `source` for `profile` (`"vs_5_0"`, `"ps_5_0"`, ...).
    /// ## Arguments
    /// * `source` - The HLSL text.
    /// * `source_name` - A name used in diagnostics.
    /// * `entry_point` - The function to compile.
    /// * `profile` - The target profile.
    /// ## Errors
    /// * `BackendError` - With the compiler diagnostics as its message.
    fn compile(
        &self,
        source: &str,
        source_name: &str,
        entry_point: &str,
        profile: &str,
    ) -> Result<Vec<u8>, BackendError>;

    /// Enumerates every resource binding of compiled bytecode.
    fn reflect(&self, bytecode: &[u8]) -> Result<Vec<ReflectedBinding>, BackendError>;
}
