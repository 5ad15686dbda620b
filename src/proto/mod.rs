//! 传输层/协议模块
//!
//! 滑动窗口 ARQ 传输实体，以及实体与仿真环境之间的接口。

mod api;
mod bridge;
pub mod gbn;

pub use api::TransportApi;
pub use bridge::SimBridge;
pub use gbn::{EntityStats, GbnConfig, RecvOutcome, TransportEntity, WindowMode};
