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

use crate::cpu_topology::ensure_reachable;
use crate::logical_cores;
use crate::pinning::pin_current_thread_to;
use crate::CPUTopologyError;
use crate::LogicalCoreId;

fn core_ids(ids: &[u32]) -> Vec<LogicalCoreId> {
    ids.iter().copied().map(LogicalCoreId::new).collect()
}

#[test]
fn logical_cores_are_sorted_and_unique() {
    let cores = logical_cores().unwrap();

    let cores = cores.into_iter().collect::<Vec<_>>();
    let mut expected = cores.clone();
    expected.sort();
    expected.dedup();

    assert_eq!(cores, expected);
}

#[test]
fn thread_can_be_pinned_to_every_logical_core() {
    let cores = logical_cores().unwrap();

    std::thread::scope(|scope| {
        for core_id in cores {
            let handle = scope.spawn(move || pin_current_thread_to(core_id));
            assert!(handle.join().unwrap(), "pinning to {core_id} failed");
        }
    });
}

#[test]
fn reachable_online_cores_are_returned_sorted() {
    let cores = ensure_reachable(core_ids(&[3, 1, 0, 1]), &core_ids(&[0, 1, 2, 3])).unwrap();

    assert_eq!(cores.into_iter().collect::<Vec<_>>(), core_ids(&[0, 1, 3]));
}

#[test]
fn online_cores_outside_affinity_mask_are_rejected() {
    let result = ensure_reachable(core_ids(&[0, 1, 2, 3]), &core_ids(&[0]));

    match result {
        Err(CPUTopologyError::CoresNotReachable { core_ids: missing }) => {
            assert_eq!(missing, core_ids(&[1, 2, 3]))
        }
        other => panic!("expected unreachable cores, got {other:?}"),
    }
}

#[test]
fn empty_online_set_is_an_error() {
    let result = ensure_reachable(Vec::new(), &core_ids(&[0]));

    assert!(matches!(result, Err(CPUTopologyError::LogicalCoresNotFound)));
}

#[cfg(target_os = "linux")]
mod cpu_list {
    use super::core_ids;
    use crate::online::parse_cpu_list;
    use crate::CPUTopologyError;

    #[test]
    fn ranges_and_single_cores() {
        let cores = parse_cpu_list("0-3,5,7-8\n").unwrap();

        assert_eq!(cores, core_ids(&[0, 1, 2, 3, 5, 7, 8]));
    }

    #[test]
    fn single_core_machine() {
        assert_eq!(parse_cpu_list("0\n").unwrap(), core_ids(&[0]));
    }

    #[test]
    fn garbage_is_rejected() {
        for cpu_list in ["0-", "a", "3-1", "0,,x"] {
            let result = parse_cpu_list(cpu_list);
            assert!(
                matches!(result, Err(CPUTopologyError::MalformedCpuList { .. })),
                "{cpu_list} was accepted"
            );
        }
    }
}
