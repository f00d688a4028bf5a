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

use nonempty::NonEmpty;

use crate::errors::CPUTopologyError;
use crate::CTResult;
use crate::LogicalCoreId;

/// Returns every online logical core of the machine, in ascending order.
///
/// Fails if the current process isn't allowed to run on some of them,
/// e.g. under `taskset` or a restricted cpuset cgroup.
/// The list is a snapshot, cores brought online afterwards aren't included.
pub fn logical_cores() -> CTResult<NonEmpty<LogicalCoreId>> {
    let reachable = reachable_cores()?;
    let online = online_cores(&reachable)?;
    tracing::trace!("online logical cores {online:?}, reachable {reachable:?}");

    ensure_reachable(online, &reachable)
}

/// Cores from the affinity mask of the current process.
fn reachable_cores() -> CTResult<Vec<LogicalCoreId>> {
    let mut logical_core_ids = core_affinity::get_core_ids()
        .ok_or(CPUTopologyError::AffinityMaskUnavailable)?
        .into_iter()
        .map(|core_id| {
            u32::try_from(core_id.id)
                .map(LogicalCoreId::from)
                .map_err(|_| CPUTopologyError::logical_core_too_big(core_id.id))
        })
        .collect::<Result<Vec<_>, _>>()?;

    logical_core_ids.sort_unstable();
    logical_core_ids.dedup();
    Ok(logical_core_ids)
}

#[cfg(target_os = "linux")]
fn online_cores(_reachable: &[LogicalCoreId]) -> CTResult<Vec<LogicalCoreId>> {
    crate::online::online_cores()
}

#[cfg(not(target_os = "linux"))]
fn online_cores(reachable: &[LogicalCoreId]) -> CTResult<Vec<LogicalCoreId>> {
    Ok(reachable.to_vec())
}

pub(crate) fn ensure_reachable(
    mut online: Vec<LogicalCoreId>,
    reachable: &[LogicalCoreId],
) -> CTResult<NonEmpty<LogicalCoreId>> {
    online.sort_unstable();
    online.dedup();

    let unreachable = online
        .iter()
        .filter(|core_id| !reachable.contains(core_id))
        .copied()
        .collect::<Vec<_>>();
    if !unreachable.is_empty() {
        return Err(CPUTopologyError::cores_not_reachable(unreachable));
    }

    NonEmpty::from_vec(online).ok_or(CPUTopologyError::LogicalCoresNotFound)
}
