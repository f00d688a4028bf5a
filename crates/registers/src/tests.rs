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

use std::cell::Cell;
use std::cell::RefCell;

use nocache_shared::types::CacheEnableState;

use crate::disable_local;
use crate::enable_local;
use crate::CacheAction;
use crate::RegisterAccess;
use crate::RegisterSnapshot;

// PG | AM | WP | NE | ET | MP | PE
const BOOT_CONTROL: u64 = 0x8005_0033;
// E | FE | default type WB
const BOOT_RANGE: u64 = 0xC06;

#[derive(Debug)]
struct RecordingRegisters {
    control: Cell<u64>,
    range: Cell<u64>,
    after_each_write: RefCell<Vec<RegisterSnapshot>>,
}

impl RecordingRegisters {
    fn new(control: u64, range: u64) -> Self {
        Self {
            control: Cell::new(control),
            range: Cell::new(range),
            after_each_write: RefCell::new(Vec::new()),
        }
    }

    fn record(&self) {
        let snapshot = RegisterSnapshot::new(self.control.get(), self.range.get());
        self.after_each_write.borrow_mut().push(snapshot);
    }
}

impl RegisterAccess for RecordingRegisters {
    fn read_control_register(&self) -> u64 {
        self.control.get()
    }

    fn write_control_register(&self, value: u64) {
        self.control.set(value);
        self.record();
    }

    fn read_range_register(&self) -> u64 {
        self.range.get()
    }

    fn write_range_register(&self, value: u64) {
        self.range.set(value);
        self.record();
    }
}

#[test]
fn disable_sets_cd_and_clears_e() {
    let registers = RecordingRegisters::new(BOOT_CONTROL, BOOT_RANGE);

    disable_local(&registers);

    let snapshot = registers.snapshot();
    assert!(snapshot.cache_disabled());
    assert!(!snapshot.ranges_enabled());
    assert_eq!(snapshot.control, BOOT_CONTROL | (1 << 30));
    assert_eq!(snapshot.range, BOOT_RANGE & !(1 << 11));
    assert_eq!(snapshot.cache_state(), Some(CacheEnableState::Disabled));
}

#[test]
fn disable_is_idempotent() {
    let once = RecordingRegisters::new(BOOT_CONTROL, BOOT_RANGE);
    disable_local(&once);

    let twice = RecordingRegisters::new(BOOT_CONTROL, BOOT_RANGE);
    disable_local(&twice);
    disable_local(&twice);

    assert_eq!(once.snapshot(), twice.snapshot());
}

#[test]
fn enable_restores_boot_state() {
    let registers = RecordingRegisters::new(BOOT_CONTROL, BOOT_RANGE);

    disable_local(&registers);
    enable_local(&registers);

    let snapshot = registers.snapshot();
    assert_eq!(snapshot, RegisterSnapshot::new(BOOT_CONTROL, BOOT_RANGE));
    assert_eq!(snapshot.cache_state(), Some(CacheEnableState::Enabled));
}

#[test]
fn enable_forces_e_even_if_it_was_clear_at_boot() {
    let registers = RecordingRegisters::new(BOOT_CONTROL, BOOT_RANGE & !(1 << 11));

    enable_local(&registers);

    let snapshot = registers.snapshot();
    assert!(snapshot.ranges_enabled());
    assert!(!snapshot.cache_disabled());
}

#[test]
fn cd_is_set_before_e_is_cleared() {
    let registers = RecordingRegisters::new(BOOT_CONTROL, BOOT_RANGE);

    disable_local(&registers);

    let history = registers.after_each_write.borrow();
    assert_eq!(history.len(), 2);
    assert!(history
        .iter()
        .all(|snapshot| snapshot.cache_disabled() || snapshot.ranges_enabled()));
    assert!(history[0].cache_disabled() && history[0].ranges_enabled());
}

#[test]
fn e_is_set_before_cd_is_cleared() {
    let registers = RecordingRegisters::new(BOOT_CONTROL, BOOT_RANGE);
    disable_local(&registers);
    registers.after_each_write.borrow_mut().clear();

    enable_local(&registers);

    let history = registers.after_each_write.borrow();
    assert_eq!(history.len(), 2);
    assert!(history
        .iter()
        .all(|snapshot| snapshot.cache_disabled() || snapshot.ranges_enabled()));
    assert!(history[0].cache_disabled() && history[0].ranges_enabled());
}

#[test]
fn actions_reach_their_target_state() {
    let registers = RecordingRegisters::new(BOOT_CONTROL, BOOT_RANGE);

    for action in [CacheAction::Disable, CacheAction::Enable, CacheAction::Disable] {
        action.apply(&registers);
        assert_eq!(registers.snapshot().cache_state(), Some(action.target_state()));
    }
}

#[test]
fn mixed_snapshot_has_no_cache_state() {
    let snapshot = RegisterSnapshot::new(BOOT_CONTROL | (1 << 30), BOOT_RANGE);
    assert_eq!(snapshot.cache_state(), None);

    let snapshot = RegisterSnapshot::new(BOOT_CONTROL, 0x6);
    assert_eq!(snapshot.cache_state(), None);
}
