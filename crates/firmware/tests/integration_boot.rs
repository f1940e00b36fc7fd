//! Boot wiring tests: start-up order, task table and fatal signalling, seen
//! from outside the firmware crate.
//!
//! Run with: cargo test -p firmware --test integration_boot
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation
)]

use embassy_time::Duration;
use firmware::boot::{BOOT_SEQUENCE_STEPS, PINS};
use firmware::supervisor::{blink_code, Core, Priority, TASKS};
use firmware::FatalError;
use platform::mocks::MockLed;

fn step_index(needle: &str) -> usize {
    BOOT_SEQUENCE_STEPS
        .iter()
        .position(|s| s.contains(needle))
        .unwrap_or_else(|| panic!("boot step mentioning {needle:?} missing"))
}

#[test]
fn stack_is_painted_before_core1_starts() {
    assert!(step_index("Paint core 1 stack") < step_index("Core 1"));
}

#[test]
fn encoder_is_enabled_before_edge_task_spawns() {
    assert!(step_index("Encoder") < step_index("encoder edge task"));
}

#[test]
fn every_task_is_spawned_after_the_context_exists() {
    let context = step_index("Shared context");
    for name in ["encoder edge task", "UI timer", "UI task", "player task"] {
        assert!(context < step_index(name), "{name} spawned before context");
    }
}

#[test]
fn every_spawn_site_names_its_blink_code() {
    let codes: Vec<u8> = BOOT_SEQUENCE_STEPS
        .iter()
        .flat_map(|s| s.split('[').skip(1))
        .filter_map(|rest| rest.chars().next()?.to_digit(10))
        .map(|d| d as u8)
        .collect();
    for fatal in [FatalError::SyncPrimitives, FatalError::Timer, FatalError::TaskSpawn] {
        assert!(codes.contains(&fatal.blink_count()), "{} missing", fatal.label());
    }
}

#[test]
fn task_table_matches_the_wiring() {
    assert_eq!(TASKS.len(), 5);
    let ui = TASKS.iter().find(|t| t.name == "ui").unwrap();
    assert_eq!(ui.core, Core::Core1);
    let edge = TASKS.iter().find(|t| t.name == "encoder-edge").unwrap();
    assert_eq!((edge.core, edge.priority), (Core::Core0, Priority::Interrupt));
}

#[test]
fn stack_headroom_blinks_seven_times() {
    let mut led = MockLed::new();
    let mut total = Duration::from_ticks(0);
    blink_code(&mut led, FatalError::StackHeadroom.blink_count(), |d| total += d);
    assert_eq!(led.switch_ons(), 7);
    assert_eq!(total, Duration::from_millis(9_000));
}

#[test]
fn status_led_is_the_pico_onboard_led() {
    assert_eq!(PINS.status_led, 25);
}
