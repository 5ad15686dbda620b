//! 仿真世界
//!
//! 把两端传输实体、信道和应用层装配成一个 `World`，
//! 并负责把时间轴上的事件路由给对应组件。

use serde::Serialize;
use tracing::{debug, warn};

use crate::app::{AppSink, ArrivalGenerator};
use crate::config::SimConfig;
use crate::net::{Channel, EntityId, Stats};
use crate::proto::{EntityStats, SimBridge, TransportEntity};
use crate::sim::{Event, EventKind, SelfCheckError, Simulator, World};

/// 启动自检抽取的样本数
pub const SELF_CHECK_SAMPLES: usize = 1000;

/// 两个实体 + 信道 + 应用层
#[derive(Debug)]
pub struct Testbed {
    pub entities: [TransportEntity; 2],
    pub channel: Channel,
    pub arrivals: ArrivalGenerator,
    pub app: AppSink,
}

impl Testbed {
    pub fn new(cfg: &SimConfig) -> Self {
        Self {
            entities: EntityId::ALL.map(|id| TransportEntity::new(id, cfg.gbn.clone())),
            channel: Channel::new(cfg.channel()),
            arrivals: ArrivalGenerator::new(EntityId::A, cfg.mean_interarrival, cfg.messages),
            app: AppSink::default(),
        }
    }

    pub fn entity(&self, id: EntityId) -> &TransportEntity {
        &self.entities[id.index()]
    }

    /// 复位两端实体并调度第一条消息
    pub fn start(&mut self, sim: &mut Simulator) {
        for entity in &mut self.entities {
            entity.init();
        }
        self.arrivals.schedule_next(sim);
    }

    pub fn summary(&self, cfg: &SimConfig, sim: &Simulator, events: u64) -> RunSummary {
        RunSummary {
            final_time: sim.now().as_f64(),
            events,
            generated: self.arrivals.generated(),
            delivered: self.app.total_delivered(),
            channel: self.channel.stats.clone(),
            entity_a: self.entity(EntityId::A).stats.clone(),
            entity_b: self.entity(EntityId::B).stats.clone(),
            config: cfg.clone(),
        }
    }
}

impl World for Testbed {
    fn dispatch(&mut self, ev: Event, sim: &mut Simulator) {
        let Testbed {
            entities,
            channel,
            arrivals,
            app,
        } = self;
        let entity = &mut entities[ev.entity.index()];
        let mut api = SimBridge { sim, channel, app };

        match ev.kind {
            EventKind::MessageArrival => {
                let msg = arrivals.next_message();
                arrivals.schedule_next(api.sim);
                debug!(?msg, "MAINLOOP: data given to transport");
                entity.on_application_send(&msg, &mut api);
            }
            EventKind::PacketArrival => {
                let Some(pkt) = ev.packet else {
                    warn!(entity = %ev.entity, "packet arrival without a packet");
                    return;
                };
                let outcome = entity.on_packet_received(pkt, &mut api);
                debug!(?outcome, "packet handled");
            }
            EventKind::Timeout => {
                entity.on_timeout(&mut api);
            }
        }
    }

    fn finished(&self) -> bool {
        self.arrivals.exhausted()
    }
}

/// 一次仿真的汇总
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub final_time: f64,
    pub events: u64,
    /// 上层产生的消息数
    pub generated: u64,
    /// 交付给上层的消息数
    pub delivered: u64,
    pub channel: Stats,
    pub entity_a: EntityStats,
    pub entity_b: EntityStats,
    pub config: SimConfig,
}

/// 自检随机源、装配世界并运行到结束
pub fn run_simulation(cfg: &SimConfig) -> Result<RunSummary, SelfCheckError> {
    let mut sim = Simulator::with_seed(cfg.seed);
    sim.check_uniformity(SELF_CHECK_SAMPLES)?;

    let mut testbed = Testbed::new(cfg);
    testbed.start(&mut sim);
    let events = sim.run(&mut testbed);
    Ok(testbed.summary(cfg, &sim, events))
}
