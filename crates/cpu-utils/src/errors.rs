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

use thiserror::Error as ThisError;

use crate::LogicalCoreId;

#[derive(Debug, ThisError)]
pub enum CPUTopologyError {
    #[error("affinity mask of the current process can't be read")]
    AffinityMaskUnavailable,

    #[error("logical core id {core_id} is too big to be represented as a core id")]
    LogicalCoreIdTooBig { core_id: usize },

    #[error("no online logical cores found")]
    LogicalCoresNotFound,

    #[error("online logical cores {core_ids:?} are outside the affinity mask of the current process")]
    CoresNotReachable { core_ids: Vec<LogicalCoreId> },

    #[error("reading online logical cores from {path} failed: {io_error}")]
    OnlineCoresUnavailable {
        path: &'static str,
        io_error: std::io::Error,
    },

    #[error("malformed cpu list {cpu_list:?}")]
    MalformedCpuList { cpu_list: String },
}

impl CPUTopologyError {
    pub fn logical_core_too_big(core_id: usize) -> Self {
        Self::LogicalCoreIdTooBig { core_id }
    }

    pub fn cores_not_reachable(core_ids: Vec<LogicalCoreId>) -> Self {
        Self::CoresNotReachable { core_ids }
    }

    pub fn online_cores_unavailable(path: &'static str, io_error: std::io::Error) -> Self {
        Self::OnlineCoresUnavailable { path, io_error }
    }

    pub fn malformed_cpu_list(cpu_list: &str) -> Self {
        Self::MalformedCpuList {
            cpu_list: cpu_list.trim().to_string(),
        }
    }
}
