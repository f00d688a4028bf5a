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

use nocache_shared::types::LogicalCoreId;

#[derive(ThisError, Debug)]
pub enum RegisterError {
    #[error("opening MSR file '/dev/cpu/{core_id:}/msr' for read there is an error: {io_error:?}")]
    OpenForRead {
        core_id: LogicalCoreId,
        io_error: std::io::Error,
    },

    #[error(
        "reading from register_id {register_id:#x} and MSR file '/dev/cpu/{core_id:}/msr' there is an error: {io_error:?}"
    )]
    Read {
        register_id: u32,
        core_id: LogicalCoreId,
        io_error: std::io::Error,
    },

    #[error(
        "reading from register_id {register_id:#x} and MSR file '/dev/cpu/{core_id:}/msr' returned {bytes_read} bytes instead of 8"
    )]
    ShortRead {
        register_id: u32,
        core_id: LogicalCoreId,
        bytes_read: usize,
    },

    #[error("reading register_id {register_id:#x} of core {core_id} isn't supported on this platform")]
    Unsupported {
        register_id: u32,
        core_id: LogicalCoreId,
    },
}

#[cfg(all(target_arch = "x86_64", target_os = "linux"))]
impl RegisterError {
    pub(crate) fn open_for_read(core_id: LogicalCoreId, io_error: std::io::Error) -> Self {
        Self::OpenForRead { core_id, io_error }
    }

    pub(crate) fn read(register_id: u32, core_id: LogicalCoreId, errno: nix::errno::Errno) -> Self {
        Self::Read {
            register_id,
            core_id,
            io_error: errno.into(),
        }
    }

    pub(crate) fn short_read(register_id: u32, core_id: LogicalCoreId, bytes_read: usize) -> Self {
        Self::ShortRead {
            register_id,
            core_id,
            bytes_read,
        }
    }
}

#[cfg(not(all(target_arch = "x86_64", target_os = "linux")))]
impl RegisterError {
    pub(crate) fn unsupported(register_id: u32, core_id: LogicalCoreId) -> Self {
        Self::Unsupported {
            register_id,
            core_id,
        }
    }
}
