//! 消息到达生成器
//!
//! 按给定平均间隔调度上层消息的到达，直到达到总消息数上限。

use crate::net::{EntityId, Message};
use crate::sim::{Event, SimTime, Simulator};
use tracing::trace;

/// 消息到达生成器
#[derive(Debug, Clone)]
pub struct ArrivalGenerator {
    /// 产生消息的实体（只有一端发起流量）
    pub origin: EntityId,
    /// 平均到达间隔；实际间隔在 [0, 2 * mean] 上均匀分布
    pub mean_interarrival: f64,
    /// 总消息数上限
    pub max_messages: u64,
    generated: u64,
}

impl ArrivalGenerator {
    pub fn new(origin: EntityId, mean_interarrival: f64, max_messages: u64) -> Self {
        Self {
            origin,
            mean_interarrival,
            max_messages,
            generated: 0,
        }
    }

    /// 已产生的消息数
    pub fn generated(&self) -> u64 {
        self.generated
    }

    pub fn exhausted(&self) -> bool {
        self.generated >= self.max_messages
    }

    /// 调度下一次到达；达到上限后不再调度，返回 `None`。
    pub fn schedule_next(&mut self, sim: &mut Simulator) -> Option<SimTime> {
        if self.exhausted() {
            return None;
        }
        let interval = self.mean_interarrival * sim.uniform() * 2.0;
        let at = sim.now().after(interval);
        trace!(at = %at, interval, "GENERATE NEXT ARRIVAL: creating new arrival");
        sim.schedule(at, Event::message_arrival(self.origin));
        Some(at)
    }

    /// 消费一次到达：生成第 n 条消息（20 个 `'a' + n % 26`）。
    pub fn next_message(&mut self) -> Message {
        let letter = b'a' + (self.generated % 26) as u8;
        self.generated += 1;
        Message::filled(letter)
    }
}
