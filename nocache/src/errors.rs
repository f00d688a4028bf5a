/*
 * Copyright 2024 Fluence Labs Limited
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use std::any::Any;

use thiserror::Error as ThisError;

use cpu_utils::CPUTopologyError;
use nocache_shared::types::LogicalCoreId;

/// Errors arisen while broadcasting an action to logical cores.
#[derive(ThisError, Debug)]
pub enum BroadcastError {
    #[error(transparent)]
    CPUTopologyError(#[from] CPUTopologyError),

    #[error("thread pinning to logical core {core_id} failed")]
    ThreadPinFailed { core_id: LogicalCoreId },

    #[error("spawning a worker thread for logical core {core_id} failed: {io_error}")]
    ThreadSpawnFailed {
        core_id: LogicalCoreId,
        io_error: std::io::Error,
    },

    #[error("worker thread for logical core {core_id} panicked: {message}")]
    WorkerPanicked {
        core_id: LogicalCoreId,
        message: String,
    },

    #[error("logical core {core_id} isn't present on this machine")]
    UnknownCore { core_id: LogicalCoreId },

    #[error("broadcast completed on cores {completed:?}, but it was started for {expected:?}")]
    IncompleteCoverage {
        expected: Vec<LogicalCoreId>,
        completed: Vec<LogicalCoreId>,
    },
}

/// Errors of the machine-wide switch, they tell which transition failed.
/// The machine is left in an unknown, possibly mixed, state after any of them.
#[derive(ThisError, Debug)]
pub enum CacheSwitchError {
    #[error("disabling caching failed")]
    Activation(#[source] BroadcastError),

    #[error("reenabling caching failed")]
    Deactivation(#[source] BroadcastError),
}

impl BroadcastError {
    pub fn pinning_failed(core_id: LogicalCoreId) -> Self {
        Self::ThreadPinFailed { core_id }
    }

    pub(crate) fn thread_spawn_failed(core_id: LogicalCoreId, io_error: std::io::Error) -> Self {
        Self::ThreadSpawnFailed { core_id, io_error }
    }

    pub(crate) fn worker_panicked(core_id: LogicalCoreId, payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(message) = payload.downcast_ref::<&str>() {
            message.to_string()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "unknown panic payload".to_string()
        };

        Self::WorkerPanicked { core_id, message }
    }

    pub fn unknown_core(core_id: LogicalCoreId) -> Self {
        Self::UnknownCore { core_id }
    }

    pub(crate) fn incomplete_coverage(
        expected: Vec<LogicalCoreId>,
        completed: Vec<LogicalCoreId>,
    ) -> Self {
        Self::IncompleteCoverage {
            expected,
            completed,
        }
    }
}

impl CacheSwitchError {
    pub(crate) fn activation(error: BroadcastError) -> Self {
        Self::Activation(error)
    }

    pub(crate) fn deactivation(error: BroadcastError) -> Self {
        Self::Deactivation(error)
    }
}
