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

use crate::broadcast::CpuBroadcast;
use crate::switch::CSResult;
use crate::switch::CacheSwitch;

/// Caching stays disabled while this guard is alive.
///
/// Dropping it re-enables caching on a best-effort basis, a failure is only
/// logged. Use [`DisabledWindow::close`] to get it.
#[derive(Debug)]
#[must_use = "caching is reenabled as soon as the window is dropped"]
pub struct DisabledWindow<'switch, B: CpuBroadcast> {
    switch: &'switch CacheSwitch<B>,
    closed: bool,
}

impl<'switch, B: CpuBroadcast> DisabledWindow<'switch, B> {
    pub(crate) fn new(switch: &'switch CacheSwitch<B>) -> Self {
        Self {
            switch,
            closed: false,
        }
    }

    pub fn close(mut self) -> CSResult<()> {
        self.closed = true;
        self.switch.deactivate()
    }
}

impl<B: CpuBroadcast> Drop for DisabledWindow<'_, B> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }

        if let Err(error) = self.switch.deactivate() {
            tracing::error!("reenabling caching on window drop failed: {error:?}");
        }
    }
}
