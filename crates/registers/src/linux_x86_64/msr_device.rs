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

use std::fs::File;
use std::io;

use nocache_shared::types::LogicalCoreId;

use crate::RegisterError;
use crate::RegisterResult;

/// Reads an MSR of the given core through the Linux msr driver.
///
/// Requires the `msr` kernel module and CAP_SYS_RAWIO, but not ring 0,
/// so it's usable to observe the result of a broadcast from user space.
pub fn read_msr(register_id: u32, core_id: LogicalCoreId) -> RegisterResult<u64> {
    use nix::sys::uio::pread;

    let file =
        open_msr(core_id).map_err(|error| RegisterError::open_for_read(core_id, error))?;

    let mut value = [0u8; 8];
    let bytes_read = pread(file, &mut value, register_id as i64)
        .map_err(|errno| RegisterError::read(register_id, core_id, errno))?;
    if bytes_read != value.len() {
        return Err(RegisterError::short_read(register_id, core_id, bytes_read));
    }
    let result = u64::from_le_bytes(value);

    tracing::debug!("Read MSR register_id {register_id:#x} value {result:#x} at core id {core_id}");

    Ok(result)
}

fn open_msr(core_id: LogicalCoreId) -> io::Result<File> {
    use std::fs::OpenOptions;

    let path = format!("/dev/cpu/{}/msr", core_id);
    OpenOptions::new().read(true).open(path)
}
