//! 仿真核心模块
//!
//! 此模块包含事件驱动仿真的核心组件：仿真时间、事件、时间轴（仿真器）、定时器服务和世界。

// 子模块声明
mod error;
mod event;
mod scheduled_event;
mod simulator;
mod time;
mod timer;
mod world;

// 重新导出公共接口
pub use error::{SelfCheckError, TimelineError};
pub use event::{Event, EventKind};
pub use scheduled_event::ScheduledEvent;
pub use simulator::{DEFAULT_SEED, Simulator};
pub use time::SimTime;
pub use timer::TimerOutcome;
pub use world::World;
