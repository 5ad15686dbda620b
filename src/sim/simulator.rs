//! 仿真器
//!
//! 定义事件驱动仿真器（仿真上下文）：维护当前时间、事件时间轴与随机源。

use super::error::{SelfCheckError, TimelineError};
use super::event::Event;
use super::scheduled_event::ScheduledEvent;
use super::time::SimTime;
use super::world::World;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::BinaryHeap;
use tracing::{debug, info, trace};

/// 默认随机种子
pub const DEFAULT_SEED: u64 = 9999;

/// 事件驱动仿真器：时间轴 + 当前时间 + 均匀随机源。
///
/// 这是进程内唯一的可变仿真状态，由启动代码创建并显式传给各组件。
pub struct Simulator {
    now: SimTime,
    next_seq: u64,
    q: BinaryHeap<ScheduledEvent>,
    rng: SmallRng,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }
}

impl Simulator {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            now: SimTime::ZERO,
            next_seq: 0,
            q: BinaryHeap::new(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// 获取当前仿真时间
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// [0, 1) 上的均匀随机数
    pub fn uniform(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }

    /// 抽取 `samples` 个样本检查随机源的均值，偏离 [0.25, 0.75] 即失败。
    pub fn check_uniformity(&mut self, samples: usize) -> Result<f64, SelfCheckError> {
        let sum: f64 = (0..samples).map(|_| self.uniform()).sum();
        let mean = if samples == 0 { 0.0 } else { sum / samples as f64 };
        debug!(samples, mean, "随机源自检");
        if !(0.25..=0.75).contains(&mean) {
            return Err(SelfCheckError::NonUniform { samples, mean });
        }
        Ok(mean)
    }

    /// 待处理事件数
    pub fn pending(&self) -> usize {
        self.q.len()
    }

    pub fn is_idle(&self) -> bool {
        self.q.is_empty()
    }

    /// 调度事件在指定时间执行
    #[tracing::instrument(skip(self, ev), fields(kind = ?ev.kind, entity = %ev.entity, schedule_at = %at))]
    pub fn schedule(&mut self, at: SimTime, ev: Event) {
        let seq = self.next_seq;
        trace!(now = %self.now, seq, "调度事件");

        self.next_seq = self.next_seq.wrapping_add(1);
        self.q.push(ScheduledEvent { at, seq, ev });

        trace!(queue_size = self.q.len(), "事件已加入队列");
    }

    /// 取出最早的事件（不推进时钟）。
    pub fn pop_earliest(&mut self) -> Result<ScheduledEvent, TimelineError> {
        self.q.pop().ok_or(TimelineError::Empty)
    }

    /// 按时间轴顺序移除第一个满足 `pred` 的事件；没有匹配时返回 `None`。
    pub fn cancel_first_matching<P>(&mut self, pred: P) -> Option<Event>
    where
        P: Fn(&Event) -> bool,
    {
        // 堆顶最先出队，所以“第一个”就是匹配项中的最大值。
        let first = self.q.iter().filter(|item| pred(&item.ev)).max()?;
        let (seq, removed) = (first.seq, first.ev.clone());
        self.q.retain(|item| item.seq != seq);
        Some(removed)
    }

    /// 满足 `pred` 的事件中最晚的调度时间
    pub fn latest_matching<P>(&self, pred: P) -> Option<SimTime>
    where
        P: Fn(&Event) -> bool,
    {
        self.q
            .iter()
            .filter(|item| pred(&item.ev))
            .map(|item| item.at)
            .max()
    }

    /// 是否存在满足 `pred` 的事件
    pub fn any_pending<P>(&self, pred: P) -> bool
    where
        P: Fn(&Event) -> bool,
    {
        self.q.iter().any(|item| pred(&item.ev))
    }

    /// 按出队顺序列出待处理事件（调试用）
    pub fn pending_in_order(&self) -> Vec<(SimTime, &Event)> {
        let mut items: Vec<&ScheduledEvent> = self.q.iter().collect();
        items.sort_by(|a, b| b.cmp(a));
        items.into_iter().map(|item| (item.at, &item.ev)).collect()
    }

    /// 在 trace 级别打印整个时间轴
    pub fn dump_pending(&self) {
        if !tracing::enabled!(tracing::Level::TRACE) {
            return;
        }
        trace!("---- 事件列表 ----");
        for (at, ev) in self.pending_in_order() {
            trace!(at = %at, kind = ?ev.kind, entity = %ev.entity, "待处理事件");
        }
        trace!("------------------");
    }

    /// 运行直到事件队列为空、world 声明结束，或到达 `until`。
    pub fn run_until(&mut self, until: SimTime, world: &mut dyn World) {
        while let Some(top) = self.q.peek() {
            if top.at > until {
                break;
            }
            let Ok(item) = self.pop_earliest() else {
                break;
            };
            self.now = item.at;
            if world.finished() {
                return;
            }
            world.dispatch(item.ev, self);
        }
        self.now = self.now.max(until);
    }

    /// 分发循环：每轮取最早的事件、推进时钟并交给 world 处理。
    ///
    /// 时钟先推进到事件时间再检查 `world.finished()`；已结束则不再分发。
    /// 返回分发的事件数。
    #[tracing::instrument(skip(self, world))]
    pub fn run(&mut self, world: &mut dyn World) -> u64 {
        info!("▶️  开始运行仿真");
        debug!(now = %self.now, queue_size = self.q.len(), "初始状态");

        let mut event_count = 0;
        loop {
            let item = match self.pop_earliest() {
                Ok(item) => item,
                Err(TimelineError::Empty) => {
                    debug!("时间轴已空");
                    break;
                }
            };
            self.now = item.at;
            if world.finished() {
                debug!(now = %self.now, "消息数已达上限，停止分发");
                break;
            }
            event_count += 1;

            debug!(
                event_num = event_count,
                now = %self.now,
                kind = ?item.ev.kind,
                entity = %item.ev.entity,
                remaining_queue = self.q.len(),
                "执行事件"
            );

            world.dispatch(item.ev, self);
            self.dump_pending();
        }

        info!(
            total_events = event_count,
            final_time = %self.now,
            "✅ 仿真完成"
        );
        event_count
    }
}
