//! Binds the entity-facing API to the simulator, the channel and the application sink.

use crate::app::AppSink;
use crate::net::{Channel, EntityId, MSG_SIZE, Packet, SendOutcome};
use crate::sim::{SimTime, Simulator, TimerOutcome};

use super::TransportApi;

pub struct SimBridge<'a> {
    pub sim: &'a mut Simulator,
    pub channel: &'a mut Channel,
    pub app: &'a mut AppSink,
}

impl TransportApi for SimBridge<'_> {
    fn now(&self) -> SimTime {
        self.sim.now()
    }

    fn send_to_channel(&mut self, from: EntityId, pkt: &Packet) -> SendOutcome {
        self.channel.send(from, pkt, self.sim)
    }

    fn start_timer(&mut self, entity: EntityId, duration: f64) -> TimerOutcome {
        self.sim.start_timer(entity, duration)
    }

    fn cancel_timer(&mut self, entity: EntityId) -> TimerOutcome {
        self.sim.cancel_timer(entity)
    }

    fn deliver_to_application(&mut self, entity: EntityId, payload: &[u8; MSG_SIZE]) {
        self.app.deliver(self.sim.now(), entity, payload);
    }
}
