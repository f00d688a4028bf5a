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

use std::sync::mpsc;
use std::thread;

use nocache_shared::types::LogicalCoreId;

use super::BroadcastResult;
use crate::errors::BroadcastError;

/// Spawns one scoped thread per core, runs `per_core` in it and collects
/// completion signals. Returns after every thread has been joined.
pub(crate) fn fan_out<F>(
    cores: &[LogicalCoreId],
    per_core: F,
) -> BroadcastResult<Vec<LogicalCoreId>>
where
    F: Fn(LogicalCoreId) -> BroadcastResult<()> + Sync,
{
    let per_core = &per_core;
    let (completion_inlet, completion_outlet) = mpsc::channel();

    thread::scope(|scope| -> BroadcastResult<Vec<LogicalCoreId>> {
        let mut workers = Vec::with_capacity(cores.len());
        for &core_id in cores {
            let completion_inlet = completion_inlet.clone();
            let worker = thread::Builder::new()
                .name(format!("nocache-core-{core_id}"))
                .spawn_scoped(scope, move || -> BroadcastResult<()> {
                    per_core(core_id)?;
                    // the receiver lives till every worker is joined
                    let _ = completion_inlet.send(core_id);
                    Ok(())
                })
                .map_err(|io_error| BroadcastError::thread_spawn_failed(core_id, io_error))?;
            workers.push((core_id, worker));
        }
        drop(completion_inlet);

        // ends once the last worker has dropped its inlet
        let completed = completion_outlet.iter().collect::<Vec<_>>();

        let mut first_error = None;
        for (core_id, worker) in workers {
            let result = worker
                .join()
                .map_err(|payload| BroadcastError::worker_panicked(core_id, payload))
                .and_then(|result| result);
            if let Err(error) = result {
                tracing::error!("broadcast failed on logical core {core_id}: {error}");
                if first_error.is_none() {
                    first_error = Some(error);
                }
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(completed),
        }
    })
}
