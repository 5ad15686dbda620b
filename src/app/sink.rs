//! 应用层接收端
//!
//! 记录传输实体交付给上层的载荷。

use crate::net::{EntityId, MSG_SIZE};
use crate::sim::SimTime;
use tracing::trace;

/// 一次向上层的交付
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub at: SimTime,
    pub entity: EntityId,
    pub payload: [u8; MSG_SIZE],
}

/// 应用层接收端
#[derive(Debug, Default)]
pub struct AppSink {
    /// 为 false 时只计数不保存载荷
    pub record: bool,
    deliveries: Vec<Delivery>,
    delivered: [u64; 2],
}

impl AppSink {
    pub fn recording() -> Self {
        Self {
            record: true,
            ..Self::default()
        }
    }

    pub fn deliver(&mut self, at: SimTime, entity: EntityId, payload: &[u8; MSG_SIZE]) {
        trace!(%entity, data = %String::from_utf8_lossy(payload), "TOLAYER5: data received");
        self.delivered[entity.index()] += 1;
        if self.record {
            self.deliveries.push(Delivery {
                at,
                entity,
                payload: *payload,
            });
        }
    }

    /// 交付给 `entity` 上层的消息数
    pub fn delivered_to(&self, entity: EntityId) -> u64 {
        self.delivered[entity.index()]
    }

    pub fn total_delivered(&self) -> u64 {
        self.delivered.iter().sum()
    }

    pub fn deliveries(&self) -> &[Delivery] {
        &self.deliveries
    }
}
