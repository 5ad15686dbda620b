//! 世界 trait
//!
//! 定义仿真世界接口：接收分发循环交来的事件。

use super::event::Event;
use super::simulator::Simulator;

/// 仿真世界：由业务层实现（例如传输实体 + 信道 + 应用层）。
pub trait World {
    /// 处理一个已到期的事件
    fn dispatch(&mut self, ev: Event, sim: &mut Simulator);

    /// 为 true 时分发循环在下一次出队后停止
    fn finished(&self) -> bool {
        false
    }
}
