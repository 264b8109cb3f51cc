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

//! Fork/join recording of deferred command lists on worker tasks.

use super::{DeviceContext, DeviceObject};
use crate::renderer::error::RenderError;
use std::sync::Arc;

type RecordFn = Box<dyn FnOnce(&DeviceContext) + Send + 'static>;

/// One command list and the closure that records into it.
pub struct RecordingPass {
    command_list: Arc<DeviceContext>,
    record: RecordFn,
}

impl RecordingPass {
    /// Pairs a deferred command list with its recording closure.
    pub fn new(command_list: Arc<DeviceContext>, record: impl FnOnce(&DeviceContext) + Send + 'static) -> Self {
        Self {
            command_list,
            record: Box::new(record),
        }
    }
}

impl std::fmt::Debug for RecordingPass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingPass")
            .field("command_list", &self.command_list.label())
            .finish_non_exhaustive()
    }
}

/// Records every pass on its own blocking task, waits for all of them and closes each
/// command list.
///
/// The returned lists keep the order of `passes` and are ready for
/// [`Device::execute_command_lists`](super::Device::execute_command_lists). Each list
/// must be used by exactly one pass.
///
/// ## Errors
/// * `RenderError::WrongContextKind` - If a pass targets the immediate context. No task
///   is started.
/// * `RenderError::RecordingFailed` - If a recording closure panicked.
/// * Any error of [`DeviceContext::finish_command_list`].
pub async fn record_concurrently(passes: Vec<RecordingPass>) -> Result<Vec<Arc<DeviceContext>>, RenderError> {
    if let Some(pass) = passes.iter().find(|pass| !pass.command_list.is_deferred()) {
        let err = RenderError::WrongContextKind(format!(
            "'{}' is not a deferred context",
            pass.command_list.label().unwrap_or("Unknown")
        ));
        log::error!("record_concurrently: {err}");
        return Err(err);
    }

    let tasks: Vec<_> = passes
        .into_iter()
        .map(|RecordingPass { command_list, record }| {
            tokio::task::spawn_blocking(move || {
                record(&command_list);
                command_list.finish_command_list()?;
                Ok::<_, RenderError>(command_list)
            })
        })
        .collect();

    let mut lists = Vec::with_capacity(tasks.len());
    let mut first_error = None;
    for task in tasks {
        match task.await {
            Ok(Ok(list)) => lists.push(list),
            Ok(Err(err)) => {
                first_error.get_or_insert(err);
            }
            Err(join_err) => {
                log::error!("record_concurrently: a recording task failed: {join_err}");
                first_error.get_or_insert(RenderError::RecordingFailed(join_err.to_string()));
            }
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(lists),
    }
}
