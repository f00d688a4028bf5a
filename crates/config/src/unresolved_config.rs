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

use eyre::eyre;
use serde::Deserialize;
use serde::Serialize;

use super::defaults::default_backend;
use super::defaults::default_hold_secs;
use super::defaults::default_log_level;
use super::defaults::default_simulated_cores;
use crate::*;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnresolvedNocacheConfig {
    #[serde(default = "default_backend")]
    pub backend: BackendKind,
    #[serde(default)]
    pub simulation: UnresolvedSimulation,
    #[serde(default)]
    pub logs: UnresolvedLogs,
    #[serde(default)]
    pub window: UnresolvedWindow,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Native,
    Simulated,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnresolvedSimulation {
    #[serde(default = "default_simulated_cores_count")]
    pub logical_cores: usize,
}

impl Default for UnresolvedSimulation {
    fn default() -> Self {
        Self {
            logical_cores: default_simulated_cores_count(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnresolvedLogs {
    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,
}

impl Default for UnresolvedLogs {
    fn default() -> Self {
        UnresolvedLogs {
            log_level: default_log_level(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnresolvedWindow {
    #[serde(default = "default_hold_secs")]
    pub hold_secs: u64,
}

impl Default for UnresolvedWindow {
    fn default() -> Self {
        UnresolvedWindow {
            hold_secs: default_hold_secs(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

fn default_simulated_cores_count() -> usize {
    default_simulated_cores().get()
}

impl UnresolvedNocacheConfig {
    pub fn resolve(self) -> eyre::Result<NocacheConfig> {
        let backend = match self.backend {
            BackendKind::Native => Backend::Native,
            BackendKind::Simulated => self.simulation.resolve()?,
        };

        let config = NocacheConfig {
            backend,
            logs: self.logs.resolve(),
            window: self.window.resolve(),
        };
        Ok(config)
    }
}

impl UnresolvedSimulation {
    pub fn resolve(self) -> eyre::Result<Backend> {
        let logical_cores = NonZeroUsize::new(self.logical_cores)
            .ok_or_else(|| eyre!("simulation.logical_cores should be greater than zero"))?;

        Ok(Backend::Simulated { logical_cores })
    }
}

impl LogLevel {
    pub fn to_tracing_filter(&self) -> tracing_subscriber::filter::LevelFilter {
        use tracing_subscriber::filter::LevelFilter;

        match self {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

impl UnresolvedLogs {
    pub fn resolve(self) -> Logs {
        Logs {
            log_level: self.log_level.to_tracing_filter(),
        }
    }
}

impl UnresolvedWindow {
    pub fn resolve(self) -> Window {
        Window {
            hold: Duration::from_secs(self.hold_secs),
        }
    }
}
