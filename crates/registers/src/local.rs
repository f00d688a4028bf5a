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

use nocache_shared::types::CacheEnableState;

use crate::flags::ControlRegisterFlags;
use crate::flags::RangeDefTypeFlags;
use crate::RegisterAccess;

/// Disables caching on the calling processor.
///
/// CD is set before E is cleared: the processor stops issuing new cacheable
/// fills first, which narrows the window where a line could still be
/// allocated under an active memory type range.
///
/// Caches aren't invalidated, lines cached before the call stay valid and may
/// diverge from memory after writes.
pub fn disable_local<R: RegisterAccess + ?Sized>(registers: &R) {
    let control = ControlRegisterFlags::from_bits_retain(registers.read_control_register());
    registers.write_control_register(control.union(ControlRegisterFlags::CACHE_DISABLE).bits());

    let range = RangeDefTypeFlags::from_bits_retain(registers.read_range_register());
    registers.write_range_register(range.difference(RangeDefTypeFlags::ENABLE).bits());
}

/// Re-enables caching on the calling processor, the inverse of [`disable_local`]
/// in reverse order: declared memory types are honored again before cache line
/// allocation resumes.
///
/// E is set unconditionally, its value before [`disable_local`] isn't tracked.
pub fn enable_local<R: RegisterAccess + ?Sized>(registers: &R) {
    let range = RangeDefTypeFlags::from_bits_retain(registers.read_range_register());
    registers.write_range_register(range.union(RangeDefTypeFlags::ENABLE).bits());

    let control = ControlRegisterFlags::from_bits_retain(registers.read_control_register());
    registers.write_control_register(
        control
            .difference(ControlRegisterFlags::CACHE_DISABLE)
            .bits(),
    );
}

/// One of the two per-processor register edits.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CacheAction {
    Disable,
    Enable,
}

impl CacheAction {
    pub fn apply<R: RegisterAccess + ?Sized>(self, registers: &R) {
        match self {
            CacheAction::Disable => disable_local(registers),
            CacheAction::Enable => enable_local(registers),
        }
    }

    /// State every processor ends up in once the action has been applied.
    pub fn target_state(self) -> CacheEnableState {
        match self {
            CacheAction::Disable => CacheEnableState::Disabled,
            CacheAction::Enable => CacheEnableState::Enabled,
        }
    }
}
