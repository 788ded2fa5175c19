use super::*;

#[test]
fn fake_clock_advances_deterministically() {
    let clock = FakeClock::new(1_000);
    assert_eq!(clock.now_ms(), 1_000);
    assert_eq!(clock.advance(500), 1_500);
    assert_eq!(clock.now_ms(), 1_500);
}

#[test]
fn fake_clock_set_overrides_current_value() {
    let clock = FakeClock::new(0);
    clock.set(42);
    assert_eq!(clock.now_ms(), 42);
}

#[test]
fn system_clock_returns_positive_epoch_millis() {
    let clock = SystemClock;
    assert!(clock.now_ms() > 0);
}
