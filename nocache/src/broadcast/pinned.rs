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

use nocache_registers::NativeRegisters;
use nocache_registers::RegisterAccess;
use nocache_shared::types::LogicalCoreId;

use super::fan_out;
use super::BroadcastResult;
use super::CoreJob;
use super::CpuBroadcast;
use crate::errors::BroadcastError;

/// Broadcast for a hosted OS: every core gets its own thread pinned to it,
/// the job runs there against registers that act on the executing core.
#[derive(Clone, Debug)]
pub struct PinnedThreadBroadcast<R> {
    registers: R,
}

pub type NativeBroadcast = PinnedThreadBroadcast<NativeRegisters>;

impl<R> PinnedThreadBroadcast<R> {
    pub fn new(registers: R) -> Self {
        Self { registers }
    }

    pub fn registers(&self) -> &R {
        &self.registers
    }
}

impl NativeBroadcast {
    /// # Safety
    ///
    /// Jobs run privileged instructions, see [`NativeRegisters::assume_privileged`].
    pub unsafe fn native() -> Self {
        Self::new(NativeRegisters::assume_privileged())
    }
}

impl<R: RegisterAccess + Sync> CpuBroadcast for PinnedThreadBroadcast<R> {
    type Registers = R;

    fn logical_cores(&self) -> BroadcastResult<Vec<LogicalCoreId>> {
        let cores = cpu_utils::logical_cores()?;
        Ok(cores.into())
    }

    fn on_cores(
        &self,
        cores: &[LogicalCoreId],
        job: &CoreJob<'_, R>,
    ) -> BroadcastResult<Vec<LogicalCoreId>> {
        fan_out(cores, |core_id| {
            // a job running on some other core would leave this one untouched
            if !cpu_utils::pinning::pin_current_thread_to(core_id) {
                return Err(BroadcastError::pinning_failed(core_id));
            }

            job(core_id, &self.registers);
            Ok(())
        })
    }
}
