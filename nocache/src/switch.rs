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

mod window;


use parking_lot::Mutex;

use nocache_registers::CacheAction;
use nocache_shared::types::CacheEnableState;

use crate::broadcast::broadcast_apply;
use crate::broadcast::BroadcastReport;
use crate::broadcast::BroadcastResult;
use crate::broadcast::CpuBroadcast;
use crate::errors::CacheSwitchError;

pub use window::DisabledWindow;

pub type CSResult<T> = Result<T, CacheSwitchError>;

/// Global caching phase of the machine as the switch last left it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CachePhase {
    /// Every processor caches normally, also assumed at creation.
    Enabled,
    /// Every processor has CD set and MTRRs disabled.
    Disabled,
    /// A broadcast failed midway, processors may disagree.
    Inconsistent,
}

impl From<CacheEnableState> for CachePhase {
    fn from(state: CacheEnableState) -> Self {
        match state {
            CacheEnableState::Enabled => Self::Enabled,
            CacheEnableState::Disabled => Self::Disabled,
        }
    }
}

/// Machine-wide cache switch.
///
/// Transitions are serialized: a second initiator waits until the running
/// transition has completed on every processor.
///
/// Caches are neither flushed nor invalidated on any transition. Data cached
/// before [`CacheSwitch::activate`] stays in the cache and may diverge from
/// memory, so callers must not rely on coherence during or across
/// the disabled window.
#[derive(Debug)]
pub struct CacheSwitch<B> {
    broadcast: B,
    phase: Mutex<CachePhase>,
}

impl<B: CpuBroadcast> CacheSwitch<B> {
    /// The machine is assumed to have booted with caching enabled.
    pub fn new(broadcast: B) -> Self {
        Self {
            broadcast,
            phase: Mutex::new(CachePhase::Enabled),
        }
    }

    pub fn phase(&self) -> CachePhase {
        *self.phase.lock()
    }

    pub fn broadcast(&self) -> &B {
        &self.broadcast
    }

    /// Disables caching on every logical processor.
    pub fn activate(&self) -> CSResult<()> {
        let mut phase = self.phase.lock();
        if *phase == CachePhase::Disabled {
            tracing::warn!("caching is already disabled, disabling it once more");
        }

        tracing::info!("disabling caching");
        let report = self
            .transition(&mut phase, CacheAction::Disable)
            .map_err(CacheSwitchError::activation)?;
        tracing::debug!("caching disabled on {} logical cores", report.cores_count());

        Ok(())
    }

    /// Re-enables caching on every logical processor.
    ///
    /// MTRRs are turned on unconditionally, which is only right if they were
    /// on before [`CacheSwitch::activate`], as they are after any usual boot.
    pub fn deactivate(&self) -> CSResult<()> {
        let mut phase = self.phase.lock();
        if *phase == CachePhase::Enabled {
            tracing::warn!("caching hasn't been disabled, forcing it on anyway");
        }

        let report = self
            .transition(&mut phase, CacheAction::Enable)
            .map_err(CacheSwitchError::deactivation)?;
        tracing::info!("reenabling caching");
        tracing::debug!("caching reenabled on {} logical cores", report.cores_count());

        Ok(())
    }

    /// Disables caching till the returned guard is closed or dropped.
    pub fn disabled_window(&self) -> CSResult<DisabledWindow<'_, B>> {
        self.activate()?;
        Ok(DisabledWindow::new(self))
    }

    fn transition(
        &self,
        phase: &mut CachePhase,
        action: CacheAction,
    ) -> BroadcastResult<BroadcastReport> {
        match broadcast_apply(&self.broadcast, action) {
            Ok(report) => {
                *phase = action.target_state().into();
                Ok(report)
            }
            Err(error) => {
                *phase = CachePhase::Inconsistent;
                Err(error)
            }
        }
    }
}
