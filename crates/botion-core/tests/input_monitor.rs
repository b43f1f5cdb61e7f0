mod common;

use botion_core::app::InputMonitor;
use botion_core::domain::entity::ButtonEvent;
use common::ScriptedPin;

fn events(script: &[bool]) -> Vec<ButtonEvent> {
    let mut monitor = InputMonitor::new(ScriptedPin::new(script, false));
    script.iter().map(|_| monitor.poll()).collect()
}

#[test]
fn released_line_is_idle() {
    assert_eq!(events(&[false, false]), vec![ButtonEvent::Idle, ButtonEvent::Idle]);
}

#[test]
fn held_line_reports_one_press() {
    assert_eq!(
        events(&[true, true, true]),
        vec![ButtonEvent::Pressed, ButtonEvent::Idle, ButtonEvent::Idle]
    );
}

#[test]
fn release_rearms_the_latch() {
    assert_eq!(
        events(&[true, false, true]),
        vec![ButtonEvent::Pressed, ButtonEvent::Idle, ButtonEvent::Pressed]
    );
}

#[test]
fn latch_follows_the_line() {
    let mut monitor = InputMonitor::new(ScriptedPin::new(&[true, false], false));

    monitor.poll();
    assert!(monitor.is_latched());
    monitor.poll();
    assert!(!monitor.is_latched());
}
