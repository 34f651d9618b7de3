//! Integration tests: EffectService driven tick by tick against mocks.

use embedded_hal::digital::PinState;
use gpiod::adapters::hardware::HardwareAdapter;
use gpiod::adapters::sim_pins::SimulatedPins;
use gpiod::app::commands::{Action, Command};
use gpiod::app::events::DaemonEvent;
use gpiod::app::service::EffectService;
use gpiod::config::{DaemonConfig, PulseConfig};
use gpiod::drivers::Effect;
use gpiod::error::{CommandError, EntropyError, Error, HardwareError};
use gpiod::fsm::StateId;
use gpiod::shutdown::ShutdownFlag;

use crate::mock_hw::{HwCall, MockHardware, RecordingSink, ScriptedSource};

/// Default config with a 4-step linear pulse so cycles stay short.
fn small_config() -> DaemonConfig {
    DaemonConfig {
        pulse: PulseConfig {
            steps: 4,
            gamma: 1.0,
        },
        ..DaemonConfig::default()
    }
}

fn setup() -> (EffectService, MockHardware, RecordingSink) {
    (
        EffectService::new(&small_config()),
        MockHardware::new(),
        RecordingSink::default(),
    )
}

// ── On / Off ──────────────────────────────────────────────────

#[test]
fn init_then_on_drives_pin_high() {
    let (mut svc, mut hw, mut sink) = setup();
    let mut src = ScriptedSource::new(&["INIT 5", "ON 5"]);

    svc.tick(&mut src, &mut hw, &mut sink);
    svc.tick(&mut src, &mut hw, &mut sink);

    assert_eq!(
        hw.calls,
        vec![HwCall::Configure(5), HwCall::Level(5, PinState::High)]
    );
    assert_eq!(svc.state(), StateId::On);
    assert_eq!(svc.current_pin(), Some(5));
}

#[test]
fn on_then_off_changes_level_exactly_twice() {
    let (mut svc, mut hw, mut sink) = setup();
    let mut src = ScriptedSource::new(&["INIT 7", "ON 7", "OFF 7"]);

    for _ in 0..5 {
        svc.tick(&mut src, &mut hw, &mut sink);
    }

    assert_eq!(hw.levels(), vec![(7, PinState::High), (7, PinState::Low)]);
    assert_eq!(svc.state(), StateId::Off);
}

#[test]
fn idle_states_sleep_the_poll_interval() {
    let (mut svc, mut hw, mut sink) = setup();
    let mut src = ScriptedSource::new(&["INIT 1", "ON 1"]);

    svc.tick(&mut src, &mut hw, &mut sink);
    svc.tick(&mut src, &mut hw, &mut sink);
    hw.clear();

    let report = svc.tick(&mut src, &mut hw, &mut sink);
    assert_eq!(report.command, None);
    assert_eq!(report.effect, None);
    assert_eq!(hw.calls, vec![HwCall::Sleep(10_000)]);
}

// ── Blink ─────────────────────────────────────────────────────

#[test]
fn blink_repeats_every_tick_until_off() {
    let mut svc = EffectService::new(&small_config());
    let mut hw = MockHardware::with_entropy([0, 0, u32::MAX, u32::MAX]);
    let mut sink = RecordingSink::default();
    let mut src = ScriptedSource::new(&["INIT 5", "BLINK 5"]);

    svc.tick(&mut src, &mut hw, &mut sink);
    let report = svc.tick(&mut src, &mut hw, &mut sink);
    assert_eq!(report.effect, Some(Effect::Blink));
    svc.tick(&mut src, &mut hw, &mut sink);

    src.push("OFF 5");
    let report = svc.tick(&mut src, &mut hw, &mut sink);
    assert_eq!(report.effect, None);

    assert_eq!(hw.sleeps(), vec![50_000, 25_000, 199_999, 74_999]);
    assert_eq!(hw.level(5), Some(PinState::Low));
    assert_eq!(svc.state(), StateId::Off);
}

#[test]
fn queued_off_waits_for_the_running_blink() {
    let mut svc = EffectService::new(&small_config());
    let mut hw = MockHardware::with_entropy([0, 0]);
    let mut sink = RecordingSink::default();
    let mut src = ScriptedSource::new(&["INIT 2", "BLINK 2", "OFF 2"]);

    svc.tick(&mut src, &mut hw, &mut sink);
    hw.clear();
    svc.tick(&mut src, &mut hw, &mut sink);
    svc.tick(&mut src, &mut hw, &mut sink);

    assert_eq!(
        hw.calls,
        vec![
            HwCall::Level(2, PinState::High),
            HwCall::Sleep(50_000),
            HwCall::Level(2, PinState::Low),
            HwCall::Sleep(25_000),
            HwCall::Level(2, PinState::Low),
        ]
    );
}

#[test]
fn entropy_failure_blinks_with_midpoint_timing() {
    let (mut svc, mut hw, mut sink) = setup();
    let mut src = ScriptedSource::new(&["INIT 3", "BLINK 3"]);

    svc.tick(&mut src, &mut hw, &mut sink);
    svc.tick(&mut src, &mut hw, &mut sink);

    assert_eq!(hw.sleeps(), vec![125_000, 50_000]);
    assert_eq!(
        sink.count(|e| *e == DaemonEvent::EntropyFault(EntropyError::ShortRead)),
        1
    );
}

#[test]
fn blink_on_unconfigured_pin_still_spends_its_timing() {
    let mut svc = EffectService::new(&small_config());
    let mut hw = MockHardware::with_entropy([0, 0]);
    let mut sink = RecordingSink::default();
    let mut src = ScriptedSource::new(&["BLINK 9"]);

    svc.tick(&mut src, &mut hw, &mut sink);

    assert_eq!(hw.sleeps(), vec![50_000, 25_000]);
    assert!(sink.events.contains(&DaemonEvent::EffectFault {
        effect: Effect::Blink,
        error: HardwareError::NotConfigured(9),
    }));
}

// ── Pulse ─────────────────────────────────────────────────────

#[test]
fn pulse_renders_one_full_breath_per_tick() {
    let (mut svc, mut hw, mut sink) = setup();
    let mut src = ScriptedSource::new(&["INIT 4", "PULSE 4"]);

    svc.tick(&mut src, &mut hw, &mut sink);
    hw.clear();
    let report = svc.tick(&mut src, &mut hw, &mut sink);

    assert_eq!(report.effect, Some(Effect::Pulse));
    // duties 0,1,2,3 then 3,2,1,0; zero steps skipped; trailing pause of one period
    assert_eq!(hw.sleeps(), vec![1, 3, 2, 2, 3, 1, 3, 1, 2, 2, 1, 3, 4]);
    assert_eq!(hw.total_sleep_us(), 28);
    assert_eq!(hw.levels().len(), 12);
    assert_eq!(hw.level(4), Some(PinState::Low));
}

#[test]
fn switching_effect_takes_over_on_next_command() {
    let mut svc = EffectService::new(&small_config());
    let mut hw = MockHardware::with_entropy([0, 0]);
    let mut sink = RecordingSink::default();
    let mut src = ScriptedSource::new(&["INIT 4", "PULSE 4", "BLINK 6"]);

    svc.tick(&mut src, &mut hw, &mut sink);
    assert_eq!(svc.tick(&mut src, &mut hw, &mut sink).effect, Some(Effect::Pulse));
    assert_eq!(svc.tick(&mut src, &mut hw, &mut sink).effect, Some(Effect::Blink));
    assert_eq!(svc.current_pin(), Some(6));
}

// ── Rejected input ────────────────────────────────────────────

#[test]
fn malformed_lines_change_nothing() {
    let (mut svc, mut hw, mut sink) = setup();
    let mut src = ScriptedSource::new(&["FOO 1", "ON", "ON x", "ON 1 2", "on 1", ""]);

    let mut errors = Vec::new();
    for _ in 0..6 {
        if let Some(Err(e)) = svc.tick(&mut src, &mut hw, &mut sink).command {
            errors.push(e);
        }
    }

    assert_eq!(
        errors,
        vec![
            Error::Command(CommandError::UnknownAction),
            Error::Command(CommandError::TokenCount(1)),
            Error::Command(CommandError::InvalidPin),
            Error::Command(CommandError::TokenCount(3)),
            Error::Command(CommandError::UnknownAction),
            Error::Command(CommandError::TokenCount(0)),
        ]
    );
    assert!(hw.calls.is_empty());
    assert_eq!(svc.state(), StateId::Idle);
    assert_eq!(svc.current_pin(), None);
    assert_eq!(svc.commands_applied(), 0);
}

#[test]
fn failed_level_write_keeps_the_new_state() {
    let (mut svc, mut hw, mut sink) = setup();

    let res = svc.handle_command(Command::new(Action::On, 8), &mut hw, &mut sink);

    assert_eq!(res, Err(Error::Hardware(HardwareError::NotConfigured(8))));
    assert_eq!(svc.state(), StateId::On);
    assert!(sink
        .events
        .contains(&DaemonEvent::HardwareFault(HardwareError::NotConfigured(8))));
}

// ── Lifecycle ─────────────────────────────────────────────────

#[test]
fn shutdown_stops_after_current_tick() {
    let (mut svc, mut hw, mut sink) = setup();
    let flag = ShutdownFlag::new();
    let mut src = ScriptedSource::new(&["INIT 1", "ON 1"]).stop_after(3, &flag);

    svc.run(&flag, &mut src, &mut hw, &mut sink);

    assert_eq!(src.polls(), 3);
    assert_eq!(svc.tick_count(), 3);
    assert_eq!(sink.events.first(), Some(&DaemonEvent::Started));
    assert_eq!(
        sink.events.last(),
        Some(&DaemonEvent::Stopped {
            ticks: 3,
            commands: 2
        })
    );
    assert_eq!(
        sink.count(|e| matches!(e, DaemonEvent::Stopped { .. })),
        1
    );
}

#[test]
fn run_returns_immediately_when_already_stopped() {
    let (mut svc, mut hw, mut sink) = setup();
    let flag = ShutdownFlag::new();
    flag.request();
    let mut src = ScriptedSource::new(&["ON 1"]);

    svc.run(&flag, &mut src, &mut hw, &mut sink);

    assert_eq!(src.polls(), 0);
    assert_eq!(
        sink.events,
        vec![
            DaemonEvent::Started,
            DaemonEvent::Stopped {
                ticks: 0,
                commands: 0
            }
        ]
    );
}

#[test]
fn hardware_adapter_end_to_end() {
    let mut svc = EffectService::new(&small_config());
    let mut hw = HardwareAdapter::with_sleeper(
        SimulatedPins::new(),
        MockHardware::with_entropy([0, 0]),
        MockHardware::new(),
    );
    let mut sink = RecordingSink::default();
    let flag = ShutdownFlag::new();
    let mut src = ScriptedSource::new(&["INIT 12", "BLINK 12", "ON 12"]).stop_after(3, &flag);

    svc.run(&flag, &mut src, &mut hw, &mut sink);

    assert_eq!(hw.pins().level(12), Some(PinState::High));
    // high + low from the blink, then the ON
    assert_eq!(hw.pins().writes(), 3);

    let (pins, _rng) = hw.shutdown();
    assert_eq!(pins.level(12), None);
}
