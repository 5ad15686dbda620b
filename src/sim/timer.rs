//! 定时器服务
//!
//! 每个实体一个单次定时器，完全建立在时间轴之上：
//! 启动 = 插入一个 Timeout 事件，取消 = 移除该事件。

use super::event::{Event, EventKind};
use super::simulator::Simulator;
use crate::net::EntityId;
use tracing::{trace, warn};

/// 定时器操作结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOutcome {
    Started,
    /// 已有定时器在运行：本次启动被拒绝，状态不变
    AlreadyRunning,
    Cancelled,
    /// 没有运行中的定时器可取消
    NotRunning,
}

impl Simulator {
    /// 该实体是否有尚未触发的定时器
    pub fn timer_pending(&self, entity: EntityId) -> bool {
        self.any_pending(|ev| ev.is(EventKind::Timeout, entity))
    }

    /// 在 `now + duration` 为 `entity` 调度一次超时。定时器不会叠加或隐式重启。
    pub fn start_timer(&mut self, entity: EntityId, duration: f64) -> TimerOutcome {
        trace!(now = %self.now(), %entity, duration, "START TIMER");
        if self.timer_pending(entity) {
            warn!(%entity, "attempt to start a timer that is already started");
            return TimerOutcome::AlreadyRunning;
        }
        let at = self.now().after(duration);
        self.schedule(at, Event::timeout(entity));
        TimerOutcome::Started
    }

    /// 取消 `entity` 尚未触发的定时器
    pub fn cancel_timer(&mut self, entity: EntityId) -> TimerOutcome {
        trace!(now = %self.now(), %entity, "STOP TIMER");
        match self.cancel_first_matching(|ev| ev.is(EventKind::Timeout, entity)) {
            Some(_) => TimerOutcome::Cancelled,
            None => {
                warn!(%entity, "unable to cancel timer: it wasn't running");
                TimerOutcome::NotRunning
            }
        }
    }
}
