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

//! Opaque handles to native backend objects.

/// An opaque handle to an object owned by the native backend.
///
/// The RHI never interprets the value; it only hands it back to the backend that
/// produced it. `0` is never a valid handle and is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeHandle(pub u64);

impl NativeHandle {
    /// The null handle.
    pub const NULL: Self = Self(0);

    /// Returns `true` for the null handle.
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_handle_is_null() {
        assert_eq!(NativeHandle::default(), NativeHandle::NULL);
        assert!(NativeHandle::default().is_null());
        assert!(!NativeHandle(7).is_null());
    }
}
