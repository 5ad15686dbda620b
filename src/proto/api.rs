//! Simulation-facing API used by transport entities.

use crate::net::{EntityId, MSG_SIZE, Packet, SendOutcome};
use crate::sim::{SimTime, TimerOutcome};

/// Everything a transport entity may ask of its environment.
///
/// The driver implements this on top of the simulator; tests substitute a
/// recording double.
pub trait TransportApi {
    fn now(&self) -> SimTime;
    fn send_to_channel(&mut self, from: EntityId, pkt: &Packet) -> SendOutcome;
    fn start_timer(&mut self, entity: EntityId, duration: f64) -> TimerOutcome;
    fn cancel_timer(&mut self, entity: EntityId) -> TimerOutcome;
    fn deliver_to_application(&mut self, entity: EntityId, payload: &[u8; MSG_SIZE]);
}
