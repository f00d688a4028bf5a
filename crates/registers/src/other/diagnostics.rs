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

//! Diagnostics are only available on Linux x86_64.
use nocache_shared::types::LogicalCoreId;

use crate::RegisterError;
use crate::RegisterResult;

pub fn read_msr(register_id: u32, core_id: LogicalCoreId) -> RegisterResult<u64> {
    Err(RegisterError::unsupported(register_id, core_id))
}

pub fn range_registers_supported() -> bool {
    false
}
