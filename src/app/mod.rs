//! 应用层（消息来源与去向）

mod arrival;
mod sink;

pub use arrival::ArrivalGenerator;
pub use sink::{AppSink, Delivery};
