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
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use parking_lot::Mutex;

use nocache_registers::RegisterAccess;
use nocache_registers::RegisterSnapshot;
use nocache_shared::types::LogicalCoreId;

use crate::broadcast::fan_out;
use crate::broadcast::BroadcastResult;
use crate::broadcast::CoreJob;
use crate::broadcast::CpuBroadcast;
use crate::errors::BroadcastError;

/// CR0 after a typical boot: PG, AM, WP, NE, ET, MP and PE set, CD clear.
pub const BOOT_CONTROL_REGISTER: u64 = 0x8005_0033;
/// IA32_MTRR_DEF_TYPE after a typical boot: E and FE set, default type WB.
pub const BOOT_RANGE_REGISTER: u64 = 0xC06;

/// Registers of one simulated processor.
///
/// Every write is journaled with the content of both registers right after it,
/// so intermediate states of a transition can be inspected.
#[derive(Debug)]
pub struct SimulatedCpu {
    core_id: LogicalCoreId,
    control: AtomicU64,
    range: AtomicU64,
    journal: Mutex<Vec<RegisterSnapshot>>,
}

impl SimulatedCpu {
    pub fn new(core_id: LogicalCoreId, boot_registers: RegisterSnapshot) -> Self {
        Self {
            core_id,
            control: AtomicU64::new(boot_registers.control),
            range: AtomicU64::new(boot_registers.range),
            journal: Mutex::new(Vec::new()),
        }
    }

    pub fn core_id(&self) -> LogicalCoreId {
        self.core_id
    }

    pub fn journal(&self) -> Vec<RegisterSnapshot> {
        self.journal.lock().clone()
    }

    pub fn clear_journal(&self) {
        self.journal.lock().clear();
    }

    fn record(&self) {
        // registers of a simulated core are only written by the job running "on" it
        let snapshot = self.snapshot();
        self.journal.lock().push(snapshot);
    }
}

impl RegisterAccess for SimulatedCpu {
    fn read_control_register(&self) -> u64 {
        self.control.load(Ordering::SeqCst)
    }

    fn write_control_register(&self, value: u64) {
        self.control.store(value, Ordering::SeqCst);
        self.record();
    }

    fn read_range_register(&self) -> u64 {
        self.range.load(Ordering::SeqCst)
    }

    fn write_range_register(&self, value: u64) {
        self.range.store(value, Ordering::SeqCst);
        self.record();
    }
}

/// A machine of simulated processors with ids `0..cores_count`.
///
/// Broadcasts run on real threads, one per simulated processor, so jobs
/// on different processors do interleave.
#[derive(Debug)]
pub struct SimulatedMachine {
    cpus: Vec<SimulatedCpu>,
}

impl SimulatedMachine {
    pub fn new(cores_count: NonZeroUsize) -> Self {
        let boot_registers = RegisterSnapshot::new(BOOT_CONTROL_REGISTER, BOOT_RANGE_REGISTER);
        Self::with_boot_registers(cores_count, boot_registers)
    }

    pub fn with_boot_registers(
        cores_count: NonZeroUsize,
        boot_registers: RegisterSnapshot,
    ) -> Self {
        let cpus = (0..cores_count.get() as u32)
            .map(|core_id| SimulatedCpu::new(core_id.into(), boot_registers))
            .collect();

        Self { cpus }
    }

    pub fn cpus(&self) -> &[SimulatedCpu] {
        &self.cpus
    }

    pub fn cpu(&self, core_id: LogicalCoreId) -> Option<&SimulatedCpu> {
        self.cpus.get(usize::from(core_id))
    }

    pub fn snapshots(&self) -> Vec<(LogicalCoreId, RegisterSnapshot)> {
        self.cpus
            .iter()
            .map(|cpu| (cpu.core_id(), cpu.snapshot()))
            .collect()
    }
}

impl CpuBroadcast for SimulatedMachine {
    type Registers = SimulatedCpu;

    fn logical_cores(&self) -> BroadcastResult<Vec<LogicalCoreId>> {
        Ok(self.cpus.iter().map(SimulatedCpu::core_id).collect())
    }

    fn on_cores(
        &self,
        cores: &[LogicalCoreId],
        job: &CoreJob<'_, SimulatedCpu>,
    ) -> BroadcastResult<Vec<LogicalCoreId>> {
        fan_out(cores, |core_id| {
            let cpu = self
                .cpu(core_id)
                .ok_or_else(|| BroadcastError::unknown_core(core_id))?;
            job(core_id, cpu);
            Ok(())
        })
    }
}
