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

use std::io::Write;

use nocache::NativeBroadcast;
use nocache::RegisterAccess;
use nocache::SimulatedMachine;
use nocache_registers::RangeDefTypeFlags;
use nocache_registers::IA32_MTRR_DEF_TYPE;

/// Writes the cache control registers of every logical core, one line per core.
pub(crate) trait ReportStatus {
    fn report_status(&self, out: &mut dyn Write) -> eyre::Result<()>;
}

impl ReportStatus for NativeBroadcast {
    fn report_status(&self, out: &mut dyn Write) -> eyre::Result<()> {
        writeln!(
            out,
            "MTRRs supported: {}",
            nocache_registers::range_registers_supported()
        )?;
        // CR0 isn't readable through the msr driver
        writeln!(out, "CD can't be observed from user space, showing E only")?;

        for core_id in cpu_utils::logical_cores()? {
            match nocache_registers::read_msr(IA32_MTRR_DEF_TYPE, core_id) {
                Ok(value) => {
                    let flags = RangeDefTypeFlags::from_bits_retain(value);
                    writeln!(
                        out,
                        "core {core_id}: IA32_MTRR_DEF_TYPE {value:#x} E={}",
                        u8::from(flags.contains(RangeDefTypeFlags::ENABLE))
                    )?;
                }
                Err(error) => writeln!(out, "core {core_id}: {error}")?,
            }
        }

        Ok(())
    }
}

impl ReportStatus for SimulatedMachine {
    fn report_status(&self, out: &mut dyn Write) -> eyre::Result<()> {
        for cpu in self.cpus() {
            let snapshot = cpu.snapshot();
            let state = snapshot
                .cache_state()
                .map(|state| state.to_string())
                .unwrap_or_else(|| "mixed".to_string());
            writeln!(out, "core {}: caching {state}, {snapshot}", cpu.core_id())?;
        }

        Ok(())
    }
}
