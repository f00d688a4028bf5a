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

use bitflags::bitflags;

/// Address of the IA32_MTRR_DEF_TYPE MSR, its E flag gates every declared MTRR range.
pub const IA32_MTRR_DEF_TYPE: u32 = 0x2FF;

bitflags! {
    /// Bits of the primary control register (CR0) this crate touches,
    /// every other bit is carried through unchanged.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ControlRegisterFlags: u64 {
        /// CD, when set the processor stops allocating new cache lines.
        /// Lines which are already cached aren't evicted.
        const CACHE_DISABLE = 1 << 30;

        const _ = !0;
    }
}

bitflags! {
    /// Bits of the IA32_MTRR_DEF_TYPE register.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct RangeDefTypeFlags: u64 {
        /// FE, fixed-range MTRRs enable.
        const FIXED_ENABLE = 1 << 10;
        /// E, when cleared all MTRRs are disabled and the UC memory type applies
        /// to the whole physical memory.
        const ENABLE = 1 << 11;

        const _ = !0;
    }
}
