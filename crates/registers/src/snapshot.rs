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

use std::fmt;

use nocache_shared::types::CacheEnableState;

use crate::flags::ControlRegisterFlags;
use crate::flags::RangeDefTypeFlags;

/// Raw content of both cache control registers of one processor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RegisterSnapshot {
    pub control: u64,
    pub range: u64,
}

impl RegisterSnapshot {
    pub fn new(control: u64, range: u64) -> Self {
        Self { control, range }
    }

    pub fn control_flags(&self) -> ControlRegisterFlags {
        ControlRegisterFlags::from_bits_retain(self.control)
    }

    pub fn range_flags(&self) -> RangeDefTypeFlags {
        RangeDefTypeFlags::from_bits_retain(self.range)
    }

    /// CD bit of the control register.
    pub fn cache_disabled(&self) -> bool {
        self.control_flags()
            .contains(ControlRegisterFlags::CACHE_DISABLE)
    }

    /// E bit of the range default type register.
    pub fn ranges_enabled(&self) -> bool {
        self.range_flags().contains(RangeDefTypeFlags::ENABLE)
    }

    /// Returns None if the processor is in a mixed state, e.g. it's been
    /// caught in the middle of a transition.
    pub fn cache_state(&self) -> Option<CacheEnableState> {
        match (self.cache_disabled(), self.ranges_enabled()) {
            (false, true) => Some(CacheEnableState::Enabled),
            (true, false) => Some(CacheEnableState::Disabled),
            _ => None,
        }
    }
}

impl fmt::Display for RegisterSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CD={} E={} (control {:#x}, range {:#x})",
            u8::from(self.cache_disabled()),
            u8::from(self.ranges_enabled()),
            self.control,
            self.range
        )
    }
}
