//! 标识符类型
//!
//! 定义点到点链路两端的传输实体标识。

use serde::Serialize;
use std::fmt;

/// 传输实体标识：链路只有两端。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EntityId {
    A,
    B,
}

impl EntityId {
    pub const ALL: [EntityId; 2] = [EntityId::A, EntityId::B];

    /// 链路另一端
    pub fn peer(self) -> EntityId {
        match self {
            EntityId::A => EntityId::B,
            EntityId::B => EntityId::A,
        }
    }

    /// 用作下标
    pub fn index(self) -> usize {
        match self {
            EntityId::A => 0,
            EntityId::B => 1,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::A => f.write_str("A"),
            EntityId::B => f.write_str("B"),
        }
    }
}
