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

use raw_cpuid::CpuId;

use once_cell::sync::Lazy;

/// CPUID is asked only once per process.
static RANGE_REGISTERS_SUPPORTED: Lazy<bool> = Lazy::new(detect_range_registers);

/// Returns true if the processor implements MTRRs (CPUID.01H:EDX.MTRR).
///
/// It's informational only, enabling or disabling caching never consults it.
pub fn range_registers_supported() -> bool {
    *RANGE_REGISTERS_SUPPORTED
}

fn detect_range_registers() -> bool {
    let cpuid = CpuId::new();
    let supported = cpuid
        .get_feature_info()
        .map(|feature_info| feature_info.has_mtrr())
        .unwrap_or(false);

    tracing::debug!("MTRR support detected: {supported}");
    supported
}
