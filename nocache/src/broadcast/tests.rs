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

use std::num::NonZeroUsize;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use nocache_registers::CacheAction;
use nocache_registers::RegisterAccess;
use nocache_shared::types::CacheEnableState;
use nocache_shared::types::LogicalCoreId;

use super::broadcast_apply;
use super::BroadcastResult;
use super::CoreJob;
use super::CpuBroadcast;
use super::PinnedThreadBroadcast;
use crate::errors::BroadcastError;
use crate::simulated::SimulatedCpu;
use crate::simulated::SimulatedMachine;

fn machine(cores_count: usize) -> SimulatedMachine {
    SimulatedMachine::new(NonZeroUsize::new(cores_count).unwrap())
}

fn core_ids(range: std::ops::Range<u32>) -> Vec<LogicalCoreId> {
    range.map(LogicalCoreId::new).collect()
}

/// Reports every core, but never reaches the first one.
struct SkippingBroadcast {
    machine: SimulatedMachine,
}

impl CpuBroadcast for SkippingBroadcast {
    type Registers = SimulatedCpu;

    fn logical_cores(&self) -> BroadcastResult<Vec<LogicalCoreId>> {
        self.machine.logical_cores()
    }

    fn on_cores(
        &self,
        cores: &[LogicalCoreId],
        job: &CoreJob<'_, SimulatedCpu>,
    ) -> BroadcastResult<Vec<LogicalCoreId>> {
        self.machine.on_cores(&cores[1..], job)
    }
}

/// Lists cores unordered and with repeats.
struct RepeatingBroadcast {
    machine: SimulatedMachine,
}

impl CpuBroadcast for RepeatingBroadcast {
    type Registers = SimulatedCpu;

    fn logical_cores(&self) -> BroadcastResult<Vec<LogicalCoreId>> {
        let mut cores = self.machine.logical_cores()?;
        cores.reverse();
        cores.extend(self.machine.logical_cores()?);
        Ok(cores)
    }

    fn on_cores(
        &self,
        cores: &[LogicalCoreId],
        job: &CoreJob<'_, SimulatedCpu>,
    ) -> BroadcastResult<Vec<LogicalCoreId>> {
        self.machine.on_cores(cores, job)
    }
}

#[derive(Debug, Default)]
struct CountingRegisters {
    writes: AtomicUsize,
}

impl RegisterAccess for CountingRegisters {
    fn read_control_register(&self) -> u64 {
        0
    }

    fn write_control_register(&self, _value: u64) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }

    fn read_range_register(&self) -> u64 {
        0
    }

    fn write_range_register(&self, _value: u64) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[test_log::test]
fn every_core_signals_completion_once() {
    let machine = machine(8);
    let calls = AtomicUsize::new(0);
    let cores = machine.logical_cores().unwrap();

    let job = |_: LogicalCoreId, _: &SimulatedCpu| {
        calls.fetch_add(1, Ordering::SeqCst);
    };
    let mut completed = machine.on_cores(&cores, &job).unwrap();
    completed.sort();

    assert_eq!(calls.load(Ordering::SeqCst), 8);
    assert_eq!(completed, core_ids(0..8));
}

#[test_log::test]
fn broadcast_apply_reaches_all_cores() {
    let machine = machine(4);

    let report = broadcast_apply(&machine, CacheAction::Disable).unwrap();

    assert_eq!(report.action, CacheAction::Disable);
    assert_eq!(report.cores_count(), 4);
    for (core_id, snapshot) in machine.snapshots() {
        assert_eq!(
            snapshot.cache_state(),
            Some(CacheEnableState::Disabled),
            "core {core_id} isn't disabled: {snapshot}"
        );
    }
}

#[test_log::test]
fn missed_core_is_reported() {
    let broadcast = SkippingBroadcast {
        machine: machine(3),
    };

    let result = broadcast_apply(&broadcast, CacheAction::Disable);

    match result {
        Err(BroadcastError::IncompleteCoverage {
            expected,
            mut completed,
        }) => {
            completed.sort();
            assert_eq!(expected, core_ids(0..3));
            assert_eq!(completed, core_ids(1..3));
        }
        other => panic!("expected incomplete coverage, got {other:?}"),
    }
}

#[test_log::test]
fn repeated_cores_are_visited_once() {
    let broadcast = RepeatingBroadcast {
        machine: machine(3),
    };

    let report = broadcast_apply(&broadcast, CacheAction::Disable).unwrap();

    assert_eq!(report.cores_count(), 3);
    for cpu in broadcast.machine.cpus() {
        // one control and one range write
        assert_eq!(cpu.journal().len(), 2, "core {}", cpu.core_id());
    }
}

#[test_log::test]
fn unknown_core_fails_broadcast_but_others_complete() {
    let machine = machine(2);
    let cores = core_ids(0..3);
    let calls = AtomicUsize::new(0);

    let job = |_: LogicalCoreId, _: &SimulatedCpu| {
        calls.fetch_add(1, Ordering::SeqCst);
    };
    let result = machine.on_cores(&cores, &job);

    assert!(matches!(
        result,
        Err(BroadcastError::UnknownCore { core_id }) if core_id == LogicalCoreId::new(2)
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test_log::test]
fn panicking_job_is_reported() {
    let machine = machine(3);
    let cores = machine.logical_cores().unwrap();

    let job = |core_id: LogicalCoreId, _: &SimulatedCpu| {
        if core_id == LogicalCoreId::new(1) {
            panic!("job failed on purpose");
        }
    };
    let result = machine.on_cores(&cores, &job);

    match result {
        Err(BroadcastError::WorkerPanicked { core_id, message }) => {
            assert_eq!(core_id, LogicalCoreId::new(1));
            assert_eq!(message, "job failed on purpose");
        }
        other => panic!("expected a worker panic, got {other:?}"),
    }
}

#[test_log::test]
fn pinned_threads_cover_every_host_core() {
    let broadcast = PinnedThreadBroadcast::new(CountingRegisters::default());
    let host_cores = cpu_utils::logical_cores().unwrap().len();

    let report = broadcast_apply(&broadcast, CacheAction::Enable).unwrap();

    assert_eq!(report.cores_count(), host_cores);
    // each core reads and writes both registers once
    let writes = broadcast.registers().writes.load(Ordering::SeqCst);
    assert_eq!(writes, 2 * host_cores);
}
