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

pub mod broadcast;
mod errors;
pub mod simulated;
pub mod switch;

pub use broadcast::broadcast_apply;
pub use broadcast::BroadcastReport;
pub use broadcast::BroadcastResult;
pub use broadcast::CpuBroadcast;
pub use broadcast::NativeBroadcast;
pub use broadcast::PinnedThreadBroadcast;
pub use errors::BroadcastError;
pub use errors::CacheSwitchError;
pub use simulated::SimulatedMachine;
pub use switch::CSResult;
pub use switch::CachePhase;
pub use switch::CacheSwitch;
pub use switch::DisabledWindow;

pub use nocache_registers::CacheAction;
pub use nocache_registers::RegisterAccess;
pub use nocache_registers::RegisterSnapshot;
pub use nocache_shared::types::CacheEnableState;
pub use nocache_shared::types::LogicalCoreId;
