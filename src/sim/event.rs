//! 仿真事件
//!
//! 定义时间轴上的事件：种类、目标实体以及（可选）携带的数据包。

use crate::net::{EntityId, Packet};

/// 事件种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// 重传定时器到期
    Timeout,
    /// 上层（应用）产生了一条新消息
    MessageArrival,
    /// 信道把数据包交付给目标实体
    PacketArrival,
}

/// 事件：只存在于时间轴中，被分发后即销毁。
#[derive(Debug, Clone)]
pub struct Event {
    pub kind: EventKind,
    pub entity: EntityId,
    pub packet: Option<Packet>,
}

impl Event {
    pub fn timeout(entity: EntityId) -> Self {
        Self {
            kind: EventKind::Timeout,
            entity,
            packet: None,
        }
    }

    pub fn message_arrival(entity: EntityId) -> Self {
        Self {
            kind: EventKind::MessageArrival,
            entity,
            packet: None,
        }
    }

    pub fn packet_arrival(entity: EntityId, packet: Packet) -> Self {
        Self {
            kind: EventKind::PacketArrival,
            entity,
            packet: Some(packet),
        }
    }

    /// 是否为指定种类、指定目标的事件
    pub fn is(&self, kind: EventKind, entity: EntityId) -> bool {
        self.kind == kind && self.entity == entity
    }
}
