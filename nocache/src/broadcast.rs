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

mod fan_out;
mod pinned;

#[cfg(test)]
mod tests;

use nocache_registers::CacheAction;
use nocache_registers::RegisterAccess;
use nocache_shared::types::LogicalCoreId;

use crate::errors::BroadcastError;

pub(crate) use fan_out::fan_out;
pub use pinned::NativeBroadcast;
pub use pinned::PinnedThreadBroadcast;

pub type BroadcastResult<T> = Result<T, BroadcastError>;

/// Job executed on one logical core, it gets the registers of that core.
pub type CoreJob<'job, R> = dyn Fn(LogicalCoreId, &R) + Sync + 'job;

/// Runs a function on a set of logical cores and waits for all of them.
pub trait CpuBroadcast {
    /// Registers as seen by a job running on one of the cores.
    type Registers: RegisterAccess;

    /// Logical cores present at the moment of the call.
    fn logical_cores(&self) -> BroadcastResult<Vec<LogicalCoreId>>;

    /// Executes `job` once on every core from `cores` and returns only after
    /// each of them has finished. Returns completion signals in the order
    /// they arrived.
    ///
    /// Cores aren't guaranteed to run the job at the same instant.
    fn on_cores(
        &self,
        cores: &[LogicalCoreId],
        job: &CoreJob<'_, Self::Registers>,
    ) -> BroadcastResult<Vec<LogicalCoreId>>;
}

/// Outcome of a completed broadcast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BroadcastReport {
    pub action: CacheAction,
    /// Cores in the order they signalled completion.
    pub completed: Vec<LogicalCoreId>,
}

impl BroadcastReport {
    pub fn cores_count(&self) -> usize {
        self.completed.len()
    }
}

/// Applies `action` on every logical core known at call time, blocking until
/// all of them have applied it.
///
/// Cores which come online after the call has started aren't covered.
pub fn broadcast_apply<B: CpuBroadcast + ?Sized>(
    broadcast: &B,
    action: CacheAction,
) -> BroadcastResult<BroadcastReport> {
    let mut expected = broadcast.logical_cores()?;
    expected.sort_unstable();
    expected.dedup();
    tracing::debug!("applying {action:?} on logical cores {expected:?}");

    let job = |core_id: LogicalCoreId, registers: &B::Registers| {
        action.apply(registers);
        tracing::trace!("{action:?} applied on core {core_id}");
    };
    let completed = broadcast.on_cores(&expected, &job)?;

    let mut covered = completed.clone();
    covered.sort_unstable();
    if covered != expected {
        return Err(BroadcastError::incomplete_coverage(expected, completed));
    }

    tracing::debug!("{action:?} completed on {} logical cores", completed.len());
    Ok(BroadcastReport { action, completed })
}
