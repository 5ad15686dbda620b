use crate::app::AppSink;
use crate::config::SimConfig;
use crate::net::{CORRUPT_BYTE, EntityId, Message, Packet};
use crate::proto::{GbnConfig, SimBridge, WindowMode};
use crate::sim::{Event, EventKind, SimTime, Simulator};
use crate::testbed::{Testbed, run_simulation};

fn cfg(messages: u64, loss_prob: f64, corrupt_prob: f64) -> SimConfig {
    SimConfig {
        messages,
        loss_prob,
        corrupt_prob,
        mean_interarrival: 1000.0,
        ..SimConfig::default()
    }
}

fn run(cfg: &SimConfig) -> (Simulator, Testbed) {
    let mut sim = Simulator::with_seed(cfg.seed);
    let mut testbed = Testbed::new(cfg);
    testbed.app = AppSink::recording();
    testbed.start(&mut sim);
    sim.run(&mut testbed);
    (sim, testbed)
}

#[test]
fn clean_channel_delivers_messages_in_order() {
    let cfg = cfg(30, 0.0, 0.0);
    let (_sim, testbed) = run(&cfg);

    assert_eq!(testbed.arrivals.generated(), 30);
    let deliveries = testbed.app.deliveries();
    // 停止时最后一两个包可能还在途中
    assert!(deliveries.len() >= 25, "delivered {}", deliveries.len());
    for (i, d) in deliveries.iter().enumerate() {
        assert_eq!(d.entity, EntityId::B);
        assert_eq!(d.payload, Message::filled(b'a' + (i % 26) as u8).data);
    }
    assert!(deliveries.windows(2).all(|w| w[0].at <= w[1].at));

    let a = &testbed.entity(EntityId::A).stats;
    let b = &testbed.entity(EntityId::B).stats;
    assert_eq!(a.retransmitted, 0);
    assert_eq!(a.dropped_out_of_order + a.dropped_corrupt, 0);
    assert_eq!(b.dropped_out_of_order + b.dropped_corrupt, 0);
    assert_eq!(testbed.channel.stats.lost, 0);
}

#[test]
fn total_loss_never_schedules_arrivals_and_keeps_retransmitting() {
    let cfg = cfg(20, 1.0, 0.0);
    let (sim, testbed) = run(&cfg);

    assert_eq!(testbed.arrivals.generated(), 20);
    assert_eq!(testbed.app.total_delivered(), 0);
    assert_eq!(testbed.channel.stats.scheduled, 0);
    assert_eq!(testbed.channel.stats.lost, testbed.channel.stats.to_channel);
    assert!(!sim.any_pending(|ev| ev.kind == EventKind::PacketArrival));

    let a = &testbed.entity(EntityId::A).stats;
    assert!(a.timeouts > 0);
    assert!(a.retransmitted > 0);
    assert_eq!(testbed.entity(EntityId::A).window_len(), 20);
}

#[test]
fn corrupted_payload_is_recovered_by_sender_timeout() {
    let cfg = cfg(1, 0.0, 0.0);
    let mut sim = Simulator::with_seed(cfg.seed);
    let mut testbed = Testbed::new(&cfg);
    testbed.app = AppSink::recording();

    let original = Packet::data(0, &Message::filled(b'a'));
    {
        let Testbed {
            entities,
            channel,
            app,
            ..
        } = &mut testbed;
        let mut api = SimBridge {
            sim: &mut sim,
            channel,
            app,
        };
        entities[EntityId::A.index()].on_application_send(&Message::filled(b'a'), &mut api);
    }
    assert_eq!(
        sim.latest_matching(|ev| ev.is(EventKind::Timeout, EntityId::A)),
        Some(SimTime(500.0))
    );

    // 在途损坏载荷
    let arrive = sim
        .latest_matching(|ev| ev.is(EventKind::PacketArrival, EntityId::B))
        .expect("data in flight");
    let mut in_flight = sim
        .cancel_first_matching(|ev| ev.is(EventKind::PacketArrival, EntityId::B))
        .and_then(|ev| ev.packet)
        .expect("data packet");
    in_flight.payload[0] = CORRUPT_BYTE;
    sim.schedule(arrive, Event::packet_arrival(EntityId::B, in_flight));

    sim.run_until(SimTime(100.0), &mut testbed);
    assert_eq!(testbed.entity(EntityId::B).stats.dropped_corrupt, 1);
    assert_eq!(testbed.app.total_delivered(), 0);
    assert_eq!(testbed.entity(EntityId::A).window_len(), 1);

    // 超时后重传的是未损坏的原包
    sim.run_until(SimTime(500.0), &mut testbed);
    assert_eq!(testbed.entity(EntityId::A).stats.retransmitted, 1);
    let resent: Vec<&Packet> = sim
        .pending_in_order()
        .into_iter()
        .filter(|(_, ev)| ev.is(EventKind::PacketArrival, EntityId::B))
        .filter_map(|(_, ev)| ev.packet.as_ref())
        .collect();
    assert_eq!(resent, vec![&original]);

    sim.run_until(SimTime(600.0), &mut testbed);
    assert_eq!(testbed.app.total_delivered(), 1);
    assert_eq!(testbed.app.deliveries()[0].payload, original.payload);
    assert_eq!(testbed.entity(EntityId::A).window_len(), 0);
}

#[test]
fn stop_and_wait_mode_runs_to_completion_on_clean_channel() {
    let mut cfg = cfg(10, 0.0, 0.0);
    cfg.gbn = GbnConfig {
        mode: WindowMode::StopAndWait,
        ..GbnConfig::default()
    };
    let (_sim, testbed) = run(&cfg);

    assert_eq!(testbed.arrivals.generated(), 10);
    let deliveries = testbed.app.deliveries();
    assert!(!deliveries.is_empty());
    for (i, d) in deliveries.iter().enumerate() {
        assert_eq!(d.payload[0], b'a' + i as u8);
    }
}

#[test]
fn zero_messages_ends_immediately() {
    let (sim, testbed) = run(&cfg(0, 0.0, 0.0));
    assert_eq!(sim.now(), SimTime::ZERO);
    assert_eq!(testbed.arrivals.generated(), 0);
    assert!(sim.is_idle());
}

#[test]
fn run_simulation_is_deterministic_for_a_seed() {
    let cfg = cfg(50, 0.2, 0.2);
    let first = run_simulation(&cfg).expect("self-check passes");
    let second = run_simulation(&cfg).expect("self-check passes");

    assert_eq!(first.generated, 50);
    assert!(first.final_time > 0.0);
    assert!(first.delivered <= first.generated);
    assert_eq!(
        serde_json::to_string(&first).expect("serialize"),
        serde_json::to_string(&second).expect("serialize")
    );
}
