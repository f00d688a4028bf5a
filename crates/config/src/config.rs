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
use std::time::Duration;

use crate::defaults::default_hold_secs;
use crate::defaults::default_log_level;
use crate::defaults::default_simulated_cores;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NocacheConfig {
    pub backend: Backend,
    pub logs: Logs,
    pub window: Window,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Backend {
    /// Privileged instructions on every host logical core, requires ring 0.
    Native,
    /// In-memory machine, nothing on the host is touched.
    Simulated { logical_cores: NonZeroUsize },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Logs {
    pub log_level: tracing_subscriber::filter::LevelFilter,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Window {
    /// How long the `window` command keeps caching disabled.
    pub hold: Duration,
}

impl Backend {
    pub fn simulated_default() -> Self {
        Self::Simulated {
            logical_cores: default_simulated_cores(),
        }
    }
}

impl Default for Backend {
    fn default() -> Self {
        Self::simulated_default()
    }
}

impl Default for Logs {
    fn default() -> Self {
        Self {
            log_level: default_log_level().to_tracing_filter(),
        }
    }
}

impl Default for Window {
    fn default() -> Self {
        Self {
            hold: Duration::from_secs(default_hold_secs()),
        }
    }
}
