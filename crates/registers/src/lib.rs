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

#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![deny(
    dead_code,
    nonstandard_style,
    unused_imports,
    unused_mut,
    unused_variables,
    unused_unsafe,
    unreachable_patterns
)]

/// This crate controls CPU caching of the calling processor via two registers:
/// the CD flag of CR0 and the E flag of the IA32_MTRR_DEF_TYPE MSR.
/// Register access is privileged, on anything but x86_64 it's a no-op.
/// Linux x86_64 additionally gets read-only diagnostics through `/dev/cpu/*/msr`.

#[cfg(target_arch = "x86_64")]
#[path = "arch_x86_64/mod.rs"]
mod native_impl;
#[cfg(not(target_arch = "x86_64"))]
#[path = "other/native.rs"]
mod native_impl;

#[cfg(all(target_arch = "x86_64", target_os = "linux"))]
#[path = "linux_x86_64/mod.rs"]
mod diagnostics_impl;
#[cfg(not(all(target_arch = "x86_64", target_os = "linux")))]
#[path = "other/diagnostics.rs"]
mod diagnostics_impl;

mod errors;
mod flags;
mod local;
mod snapshot;

#[cfg(test)]
mod tests;

pub use diagnostics_impl::*;
pub use errors::RegisterError;
pub use flags::ControlRegisterFlags;
pub use flags::RangeDefTypeFlags;
pub use flags::IA32_MTRR_DEF_TYPE;
pub use local::disable_local;
pub use local::enable_local;
pub use local::CacheAction;
pub use native_impl::NativeRegisters;
pub use snapshot::RegisterSnapshot;

pub type RegisterResult<T> = Result<T, RegisterError>;

/// Access to the cache control registers of the processor executing the call.
///
/// Implementations never address another processor, broadcasting is
/// a concern of the caller.
pub trait RegisterAccess {
    fn read_control_register(&self) -> u64;

    fn write_control_register(&self, value: u64);

    fn read_range_register(&self) -> u64;

    fn write_range_register(&self, value: u64);

    fn snapshot(&self) -> RegisterSnapshot {
        RegisterSnapshot::new(self.read_control_register(), self.read_range_register())
    }
}
