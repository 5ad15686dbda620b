//! 信道模拟
//!
//! 不可靠的点到点信道：按概率丢包、损坏数据包，并加入随机时延；
//! 但同一目的端的包绝不乱序。

use super::id::EntityId;
use super::packet::Packet;
use super::stats::Stats;
use crate::sim::{Event, EventKind, SimTime, Simulator};
use tracing::{info, trace};

/// 损坏载荷时写入首字节的值
pub const CORRUPT_BYTE: u8 = b'Z';
/// 损坏 seq/ack 字段时写入的越界值
pub const CORRUPT_FIELD: u32 = 999_999;

/// 单程时延 = 1 + 9 * U(0,1)
const MIN_DELAY: f64 = 1.0;
const DELAY_SPREAD: f64 = 9.0;

/// 信道配置
#[derive(Debug, Clone, Copy)]
pub struct ChannelConfig {
    /// 丢包概率 [0, 1]
    pub loss_prob: f64,
    /// 损坏概率 [0, 1]
    pub corrupt_prob: f64,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            loss_prob: 0.0,
            corrupt_prob: 0.0,
        }
    }
}

/// 包在传输中被改动的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corruption {
    Payload,
    SeqNum,
    AckNum,
}

/// 一次发送的结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SendOutcome {
    /// 包被丢弃，没有留下任何事件
    Lost,
    Scheduled {
        arrive: SimTime,
        corrupted: Option<Corruption>,
    },
}

/// 信道模拟器
#[derive(Debug, Default)]
pub struct Channel {
    pub cfg: ChannelConfig,
    pub stats: Stats,
}

impl Channel {
    pub fn new(cfg: ChannelConfig) -> Self {
        Self {
            cfg,
            stats: Stats::default(),
        }
    }

    /// 从 `from` 发出 `pkt`。发送方保留原包，信道只搬运副本。
    #[tracing::instrument(skip(self, pkt, sim), fields(seq = pkt.seq, ack = pkt.ack))]
    pub fn send(&mut self, from: EntityId, pkt: &Packet, sim: &mut Simulator) -> SendOutcome {
        self.stats.to_channel += 1;

        if sim.uniform() < self.cfg.loss_prob {
            self.stats.lost += 1;
            info!("TOLAYER3: packet being lost");
            return SendOutcome::Lost;
        }

        let mut copy = pkt.clone();
        trace!(
            seq = copy.seq,
            ack = copy.ack,
            checksum = copy.checksum,
            payload = %String::from_utf8_lossy(&copy.payload),
            "TOLAYER3"
        );

        // 在同一目的端最后一个在途包之后到达，保证 FIFO
        let to = from.peer();
        let now = sim.now();
        let last = sim
            .latest_matching(|ev| ev.is(EventKind::PacketArrival, to))
            .map_or(now, |t| t.max(now));
        let arrive = last.after(MIN_DELAY + DELAY_SPREAD * sim.uniform());

        let corrupted = if sim.uniform() < self.cfg.corrupt_prob {
            self.stats.corrupted += 1;
            let x = sim.uniform();
            let how = if x < 0.75 {
                copy.payload[0] = CORRUPT_BYTE;
                Corruption::Payload
            } else if x < 0.875 {
                copy.seq = CORRUPT_FIELD;
                Corruption::SeqNum
            } else {
                copy.ack = CORRUPT_FIELD;
                Corruption::AckNum
            };
            info!(?how, "TOLAYER3: packet being corrupted");
            Some(how)
        } else {
            None
        };

        trace!(%to, arrive = %arrive, "TOLAYER3: scheduling arrival on other side");
        self.stats.scheduled += 1;
        sim.schedule(arrive, Event::packet_arrival(to, copy));
        SendOutcome::Scheduled { arrive, corrupted }
    }
}
