//! 网络模拟模块
//!
//! 此模块包含点到点链路的组件：实体标识、数据包、信道模拟与统计。

// 子模块声明
mod channel;
mod id;
mod packet;
mod stats;

// 重新导出公共接口
pub use channel::{CORRUPT_BYTE, CORRUPT_FIELD, Channel, ChannelConfig, Corruption, SendOutcome};
pub use id::EntityId;
pub use packet::{ACK_MARKER, MSG_SIZE, Message, Packet, compute_checksum};
pub use stats::Stats;
