use crate::sim::SimTime;

#[test]
fn sim_time_orders_by_value() {
    assert!(SimTime(1.0) < SimTime(2.5));
    assert_eq!(SimTime(3.0), SimTime(3.0));
    assert_eq!(SimTime(4.0).max(SimTime(2.0)), SimTime(4.0));
    assert_eq!(SimTime::default(), SimTime::ZERO);
}

#[test]
fn sim_time_after_adds_delay() {
    assert_eq!(SimTime(10.0).after(5.5), SimTime(15.5));
    assert_eq!(SimTime::ZERO.after(0.0), SimTime::ZERO);
}

#[test]
fn sim_time_display_uses_fixed_precision() {
    assert_eq!(SimTime(1.5).to_string(), "1.500000");
}
