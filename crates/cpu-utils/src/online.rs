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

use crate::errors::CPUTopologyError;
use crate::CTResult;
use crate::LogicalCoreId;

const ONLINE_CORES_PATH: &str = "/sys/devices/system/cpu/online";

/// Online logical cores as listed by the kernel, regardless of the affinity
/// mask of the current process.
pub(crate) fn online_cores() -> CTResult<Vec<LogicalCoreId>> {
    let cpu_list = std::fs::read_to_string(ONLINE_CORES_PATH).map_err(|io_error| {
        CPUTopologyError::online_cores_unavailable(ONLINE_CORES_PATH, io_error)
    })?;

    parse_cpu_list(&cpu_list)
}

/// Parses the kernel cpu list format, e.g. `0-3,6,8-11`.
pub(crate) fn parse_cpu_list(cpu_list: &str) -> CTResult<Vec<LogicalCoreId>> {
    let malformed = || CPUTopologyError::malformed_cpu_list(cpu_list);
    let parse_id = |id: &str| id.trim().parse::<u32>().map_err(|_| malformed());

    let mut core_ids = Vec::new();
    for chunk in cpu_list.trim().split(',').filter(|chunk| !chunk.is_empty()) {
        match chunk.split_once('-') {
            Some((first, last)) => {
                let (first, last) = (parse_id(first)?, parse_id(last)?);
                if first > last {
                    return Err(malformed());
                }
                core_ids.extend((first..=last).map(LogicalCoreId::from));
            }
            None => core_ids.push(LogicalCoreId::from(parse_id(chunk)?)),
        }
    }

    Ok(core_ids)
}
