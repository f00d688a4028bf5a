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

use crate::unresolved_config::BackendKind;
use crate::unresolved_config::LogLevel;

pub(crate) fn default_backend() -> BackendKind {
    BackendKind::Simulated
}

pub(crate) fn default_simulated_cores() -> NonZeroUsize {
    NonZeroUsize::MIN.saturating_add(3)
}

pub(crate) fn default_log_level() -> LogLevel {
    LogLevel::Info
}

pub(crate) fn default_hold_secs() -> u64 {
    10
}
