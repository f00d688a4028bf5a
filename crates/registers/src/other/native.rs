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

//! This module is no-op implementation to allow the code to compile on non-x86_64 archs.
use crate::RegisterAccess;

#[derive(Copy, Clone, Debug)]
pub struct NativeRegisters(());

impl NativeRegisters {
    /// # Safety
    ///
    /// Kept for signature parity with x86_64, nothing is touched here.
    pub const unsafe fn assume_privileged() -> Self {
        Self(())
    }
}

impl RegisterAccess for NativeRegisters {
    fn read_control_register(&self) -> u64 {
        0
    }

    fn write_control_register(&self, _value: u64) {}

    fn read_range_register(&self) -> u64 {
        0
    }

    fn write_range_register(&self, _value: u64) {}
}
