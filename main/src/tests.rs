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

use nocache::CacheSwitch;
use nocache::SimulatedMachine;
use nocache_config::Backend;

use crate::select_backend;
use crate::status::ReportStatus;
use crate::BackendArg;

fn simulated(logical_cores: usize) -> Backend {
    Backend::Simulated {
        logical_cores: NonZeroUsize::new(logical_cores).unwrap(),
    }
}

fn status_lines(machine: &SimulatedMachine) -> Vec<String> {
    let mut out = Vec::new();
    machine.report_status(&mut out).unwrap();
    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn configured_backend_is_kept_without_override() {
    assert_eq!(select_backend(Backend::Native, None), Backend::Native);
    assert_eq!(select_backend(simulated(2), None), simulated(2));
}

#[test]
fn native_override_replaces_simulated_config() {
    let backend = select_backend(simulated(2), Some(BackendArg::Native));

    assert_eq!(backend, Backend::Native);
}

#[test]
fn simulated_override_keeps_configured_size() {
    let backend = select_backend(simulated(2), Some(BackendArg::Simulated));

    assert_eq!(backend, simulated(2));
}

#[test]
fn simulated_override_of_native_uses_default_size() {
    let backend = select_backend(Backend::Native, Some(BackendArg::Simulated));

    assert_eq!(backend, Backend::simulated_default());
}

#[test]
fn simulated_status_has_a_line_per_core() {
    let machine = SimulatedMachine::new(NonZeroUsize::new(3).unwrap());

    let lines = status_lines(&machine);

    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "core 0: caching enabled, CD=0 E=1 (control 0x80050033, range 0xc06)"
    );
    assert!(lines[2].starts_with("core 2: caching enabled"));
}

#[test]
fn simulated_status_follows_activation() {
    let switch = CacheSwitch::new(SimulatedMachine::new(NonZeroUsize::new(2).unwrap()));
    switch.activate().unwrap();

    let lines = status_lines(switch.broadcast());

    assert_eq!(
        lines,
        vec![
            "core 0: caching disabled, CD=1 E=0 (control 0xc0050033, range 0x406)".to_string(),
            "core 1: caching disabled, CD=1 E=0 (control 0xc0050033, range 0x406)".to_string(),
        ]
    );
}
