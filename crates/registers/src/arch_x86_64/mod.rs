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

use x86_64::registers::control::Cr0;
use x86_64::registers::model_specific::Msr;

use crate::flags::IA32_MTRR_DEF_TYPE;
use crate::RegisterAccess;

/// Access to CR0 and IA32_MTRR_DEF_TYPE of the processor executing the call
/// through `mov cr0` and `rdmsr`/`wrmsr`.
#[derive(Copy, Clone, Debug)]
pub struct NativeRegisters(());

impl NativeRegisters {
    /// # Safety
    ///
    /// Every method of the returned value executes privileged instructions,
    /// so it must only be used from code running at CPL 0 on a processor
    /// that implements MTRRs. Otherwise the processor raises #GP, which is
    /// fatal for the caller.
    pub const unsafe fn assume_privileged() -> Self {
        Self(())
    }
}

impl RegisterAccess for NativeRegisters {
    fn read_control_register(&self) -> u64 {
        Cr0::read_raw()
    }

    fn write_control_register(&self, value: u64) {
        // SAFETY: CPL 0 is guaranteed by the constructor contract, callers only flip CD.
        unsafe { Cr0::write_raw(value) }
    }

    fn read_range_register(&self) -> u64 {
        let msr = Msr::new(IA32_MTRR_DEF_TYPE);
        // SAFETY: CPL 0 and MTRR support are guaranteed by the constructor contract.
        unsafe { msr.read() }
    }

    fn write_range_register(&self, value: u64) {
        let mut msr = Msr::new(IA32_MTRR_DEF_TYPE);
        // SAFETY: see `read_range_register`, callers only flip E.
        unsafe { msr.write(value) }
    }
}
