use crate::net::EntityId;
use crate::sim::{Event, EventKind, SimTime, Simulator, TimerOutcome};

#[test]
fn start_schedules_timeout_after_duration() {
    let mut sim = Simulator::default();
    assert_eq!(sim.start_timer(EntityId::A, 500.0), TimerOutcome::Started);
    assert!(sim.timer_pending(EntityId::A));
    assert!(!sim.timer_pending(EntityId::B));

    let item = sim.pop_earliest().expect("timeout scheduled");
    assert_eq!(item.at(), SimTime(500.0));
    assert!(item.event().is(EventKind::Timeout, EntityId::A));
}

#[test]
fn starting_a_running_timer_is_rejected_without_change() {
    let mut sim = Simulator::default();
    sim.start_timer(EntityId::A, 10.0);
    assert_eq!(
        sim.start_timer(EntityId::A, 99.0),
        TimerOutcome::AlreadyRunning
    );
    assert_eq!(sim.pending(), 1);
    assert_eq!(
        sim.latest_matching(|ev| ev.kind == EventKind::Timeout),
        Some(SimTime(10.0))
    );
}

#[test]
fn timers_are_independent_per_entity() {
    let mut sim = Simulator::default();
    assert_eq!(sim.start_timer(EntityId::A, 10.0), TimerOutcome::Started);
    assert_eq!(sim.start_timer(EntityId::B, 20.0), TimerOutcome::Started);
    assert_eq!(sim.cancel_timer(EntityId::A), TimerOutcome::Cancelled);
    assert!(sim.timer_pending(EntityId::B));
}

#[test]
fn cancel_removes_pending_timeout_only() {
    let mut sim = Simulator::default();
    sim.schedule(SimTime(3.0), Event::message_arrival(EntityId::A));
    sim.start_timer(EntityId::A, 5.0);

    assert_eq!(sim.cancel_timer(EntityId::A), TimerOutcome::Cancelled);
    assert!(!sim.timer_pending(EntityId::A));
    assert_eq!(sim.pending(), 1);
}

#[test]
fn cancel_without_running_timer_warns_and_continues() {
    let mut sim = Simulator::default();
    assert_eq!(sim.cancel_timer(EntityId::B), TimerOutcome::NotRunning);
    assert!(sim.is_idle());

    // 取消失败后仍可正常启动
    assert_eq!(sim.start_timer(EntityId::B, 1.0), TimerOutcome::Started);
}

#[test]
fn fired_timer_can_be_started_again() {
    let mut sim = Simulator::default();
    sim.start_timer(EntityId::A, 1.0);
    sim.pop_earliest().expect("timeout");
    assert_eq!(sim.cancel_timer(EntityId::A), TimerOutcome::NotRunning);
    assert_eq!(sim.start_timer(EntityId::A, 1.0), TimerOutcome::Started);
}
