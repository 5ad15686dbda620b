//! 滑动窗口传输实体
//!
//! 每个实体同时具备发送端和接收端能力：
//! - 发送端：给消息编号、放入窗口队列、超时重传整个窗口
//! - 接收端：只接受期望序号且校验和正确的包，数据包交付上层并回 ACK
//!
//! 注意：接收端对乱序包和损坏包一律静默丢弃，恢复完全依赖发送端的超时。

use std::collections::VecDeque;

use clap::ValueEnum;
use serde::Serialize;
use tracing::{debug, info};

use crate::net::{EntityId, Message, Packet};

use super::TransportApi;

/// 窗口发送策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowMode {
    /// 只要在途包少于窗口大小就发送；ACK 累计出队。
    ///
    /// ACK 只回显数据包序号，发送端同样按期望序号过滤：一旦某个 ACK 丢失，
    /// 之后的 ACK 和重传都会被两端当作乱序丢弃，连接就此停滞。
    #[default]
    Sliding,
    /// 只发送队首；队列非空时新消息只入队，ACK 后不会自动补发
    StopAndWait,
}

#[derive(Debug, Clone, Serialize)]
pub struct GbnConfig {
    /// 最多同时在途的包数
    pub window_size: usize,
    /// 重传超时（时间单位）
    pub timeout: f64,
    pub mode: WindowMode,
}

impl Default for GbnConfig {
    fn default() -> Self {
        Self {
            window_size: 20,
            timeout: 500.0,
            mode: WindowMode::default(),
        }
    }
}

/// 收到一个包后的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecvOutcome {
    /// 数据包已交付上层并回了 ACK
    Delivered,
    /// 有效 ACK，窗口前移了 `popped` 个包
    AckAccepted { popped: usize },
    /// ACK 超出窗口（或窗口为空），忽略
    AckIgnored,
    DroppedOutOfOrder,
    DroppedCorrupt,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct EntityStats {
    pub sent: u64,
    pub retransmitted: u64,
    pub timeouts: u64,
    pub acks_sent: u64,
    pub acks_accepted: u64,
    pub acks_ignored: u64,
    pub dropped_out_of_order: u64,
    pub dropped_corrupt: u64,
}

/// 传输实体（A、B 两端对称）
#[derive(Debug, Clone)]
pub struct TransportEntity {
    pub id: EntityId,
    pub cfg: GbnConfig,

    // receiver
    expected_seq: u32,

    // sender
    next_seq: u32,
    window: VecDeque<Packet>,
    last_ack: Option<Packet>,
    in_flight: usize,
    timer_running: bool,

    pub stats: EntityStats,
}

impl TransportEntity {
    pub fn new(id: EntityId, cfg: GbnConfig) -> Self {
        Self {
            id,
            cfg,
            expected_seq: 0,
            next_seq: 0,
            window: VecDeque::new(),
            last_ack: None,
            in_flight: 0,
            timer_running: false,
            stats: EntityStats::default(),
        }
    }

    /// 清空全部协议状态
    pub fn init(&mut self) {
        self.expected_seq = 0;
        self.next_seq = 0;
        self.window.clear();
        self.last_ack = None;
        self.in_flight = 0;
        self.timer_running = false;
    }

    pub fn expected_seq(&self) -> u32 {
        self.expected_seq
    }

    pub fn next_seq(&self) -> u32 {
        self.next_seq
    }

    /// 已发送（或待发送）但未确认的包，按发送顺序
    pub fn window(&self) -> impl Iterator<Item = &Packet> {
        self.window.iter()
    }

    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    /// 窗口前部已经发出去的包数
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn last_ack(&self) -> Option<&Packet> {
        self.last_ack.as_ref()
    }

    pub fn timer_running(&self) -> bool {
        self.timer_running
    }

    /// 上层交来一条消息
    #[tracing::instrument(skip_all, fields(entity = %self.id, seq = self.next_seq))]
    pub fn on_application_send(&mut self, msg: &Message, api: &mut dyn TransportApi) {
        let pkt = Packet::data(self.next_seq, msg);
        self.next_seq = self.next_seq.wrapping_add(1);
        let was_empty = self.window.is_empty();
        self.window.push_back(pkt);
        debug!(window = self.window.len(), "[{}] message received", self.id);

        match self.cfg.mode {
            WindowMode::StopAndWait => {
                if was_empty {
                    self.transmit(0, false, api);
                    self.in_flight = 1;
                    self.arm_timer(api);
                } else {
                    debug!("queued behind unacknowledged head");
                }
            }
            WindowMode::Sliding => self.fill_window(api),
        }
    }

    /// 信道交来一个包
    #[tracing::instrument(skip_all, fields(entity = %self.id, seq = pkt.seq, ack = pkt.ack))]
    pub fn on_packet_received(&mut self, pkt: Packet, api: &mut dyn TransportApi) -> RecvOutcome {
        if pkt.seq != self.expected_seq {
            self.stats.dropped_out_of_order += 1;
            debug!(expected = self.expected_seq, "[{}] packet received (discarded)", self.id);
            return RecvOutcome::DroppedOutOfOrder;
        }
        if !pkt.checksum_valid() {
            self.stats.dropped_corrupt += 1;
            debug!("[{}] packet received (checksum mismatch)", self.id);
            return RecvOutcome::DroppedCorrupt;
        }

        let outcome = if pkt.is_ack() {
            let Some(tail) = self.window.back().map(|p| p.seq) else {
                self.stats.acks_ignored += 1;
                debug!("[{}] ACK with empty window ignored", self.id);
                return RecvOutcome::AckIgnored;
            };
            if pkt.ack > tail {
                self.stats.acks_ignored += 1;
                debug!(tail, "[{}] ACK beyond window ignored", self.id);
                return RecvOutcome::AckIgnored;
            }

            let popped = match self.cfg.mode {
                WindowMode::StopAndWait => usize::from(self.window.pop_front().is_some()),
                WindowMode::Sliding => {
                    let mut n = 0;
                    while self.window.front().is_some_and(|p| p.seq <= pkt.ack) {
                        self.window.pop_front();
                        n += 1;
                    }
                    n
                }
            };
            self.in_flight = self.in_flight.saturating_sub(popped);
            self.stats.acks_accepted += 1;
            debug!(popped, window = self.window.len(), "[{}] packet received (ACK)", self.id);
            self.last_ack = Some(pkt.clone());
            self.disarm_timer(api);
            if self.cfg.mode == WindowMode::Sliding {
                self.fill_window(api);
            }
            RecvOutcome::AckAccepted { popped }
        } else {
            debug!("[{}] packet received (MSG)", self.id);
            api.deliver_to_application(self.id, &pkt.payload);
            let ack = Packet::ack_for(&pkt);
            api.send_to_channel(self.id, &ack);
            self.stats.acks_sent += 1;
            RecvOutcome::Delivered
        };

        self.expected_seq = pkt.seq.wrapping_add(1);
        outcome
    }

    /// 重传定时器到期。返回重传的包数。
    #[tracing::instrument(skip_all, fields(entity = %self.id))]
    pub fn on_timeout(&mut self, api: &mut dyn TransportApi) -> usize {
        self.timer_running = false;
        self.stats.timeouts += 1;

        let Some(tail) = self.window.back().map(|p| p.seq) else {
            debug!("[{}] timeout with empty window", self.id);
            return 0;
        };
        // 等于队尾序号的 ACK 不算覆盖，仍会重发
        if self.last_ack.as_ref().is_some_and(|a| a.ack > tail) {
            debug!("[{}] timeout, window already acknowledged", self.id);
            return 0;
        }

        // stop-and-wait 沿用“整队重发”，会把排队中从未发出的包一起发出
        let count = match self.cfg.mode {
            WindowMode::StopAndWait => self.window.len(),
            WindowMode::Sliding => self.in_flight.min(self.window.len()),
        };
        info!(count, "[{}] timeout, resending window", self.id);
        for idx in 0..count {
            self.transmit(idx, true, api);
        }
        self.in_flight = self.in_flight.max(count);
        self.arm_timer(api);
        count
    }

    fn transmit(&mut self, idx: usize, retrans: bool, api: &mut dyn TransportApi) {
        let Some(pkt) = self.window.get(idx) else {
            return;
        };
        debug!(seq = pkt.seq, retrans, "[{}] packet sent", self.id);
        api.send_to_channel(self.id, pkt);
        if retrans {
            self.stats.retransmitted += 1;
        } else {
            self.stats.sent += 1;
        }
    }

    /// 把窗口内尚未发出的包发出去
    fn fill_window(&mut self, api: &mut dyn TransportApi) {
        let limit = self.cfg.window_size.min(self.window.len());
        while self.in_flight < limit {
            self.transmit(self.in_flight, false, api);
            self.in_flight += 1;
        }
        if self.in_flight > 0 {
            self.arm_timer(api);
        }
    }

    fn arm_timer(&mut self, api: &mut dyn TransportApi) {
        if self.timer_running {
            return;
        }
        api.start_timer(self.id, self.cfg.timeout);
        self.timer_running = true;
    }

    fn disarm_timer(&mut self, api: &mut dyn TransportApi) {
        if !self.timer_running {
            return;
        }
        api.cancel_timer(self.id);
        self.timer_running = false;
    }
}
