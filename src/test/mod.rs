mod sim_time;
mod testbed;
mod timer;

use crate::net::{EntityId, MSG_SIZE, Packet, SendOutcome};
use crate::sim::{SimTime, TimerOutcome};
use crate::proto::TransportApi;

/// 记录实体所有外部调用的 `TransportApi`
#[derive(Debug, Default)]
pub(crate) struct RecordingApi {
    pub now: SimTime,
    pub sent: Vec<(EntityId, Packet)>,
    pub delivered: Vec<(EntityId, [u8; MSG_SIZE])>,
    pub timers: [bool; 2],
    pub timer_calls: Vec<(EntityId, TimerOutcome)>,
}

impl RecordingApi {
    pub fn timer_running(&self, entity: EntityId) -> bool {
        self.timers[entity.index()]
    }
}

impl TransportApi for RecordingApi {
    fn now(&self) -> SimTime {
        self.now
    }

    fn send_to_channel(&mut self, from: EntityId, pkt: &Packet) -> SendOutcome {
        self.sent.push((from, pkt.clone()));
        SendOutcome::Scheduled {
            arrive: self.now.after(1.0),
            corrupted: None,
        }
    }

    fn start_timer(&mut self, entity: EntityId, _duration: f64) -> TimerOutcome {
        let running = &mut self.timers[entity.index()];
        let outcome = if *running {
            TimerOutcome::AlreadyRunning
        } else {
            *running = true;
            TimerOutcome::Started
        };
        self.timer_calls.push((entity, outcome));
        outcome
    }

    fn cancel_timer(&mut self, entity: EntityId) -> TimerOutcome {
        let running = &mut self.timers[entity.index()];
        let outcome = if *running {
            *running = false;
            TimerOutcome::Cancelled
        } else {
            TimerOutcome::NotRunning
        };
        self.timer_calls.push((entity, outcome));
        outcome
    }

    fn deliver_to_application(&mut self, entity: EntityId, payload: &[u8; MSG_SIZE]) {
        self.delivered.push((entity, *payload));
    }
}
