//! 统计信息
//!
//! 定义信道统计数据结构。

use serde::Serialize;

/// 信道统计信息
#[derive(Debug, Default, Clone, Serialize)]
pub struct Stats {
    /// 交给信道的包数（含丢失的）
    pub to_channel: u64,
    pub lost: u64,
    pub corrupted: u64,
    /// 实际被调度交付的包数
    pub scheduled: u64,
}
