//! 仿真世界：一对 SR 收发端加上它们之间的链路。

use serde::Serialize;
use std::any::Any;

use super::app::{AppConfig, AppSource, AppStats};
use super::channel::{Channel, ChannelConfig};
use super::id::EndpointId;
use super::link::Link;
use super::stats::ChannelStats;
use crate::error::ConfigError;
use crate::proto::{ReceiverStats, SenderStats, SrConfig, SrReceiver, SrSender};
use crate::sim::{Simulator, World};
use crate::trace::TraceLogger;

#[derive(Debug)]
pub struct SrWorld {
    pub sender: SrSender,
    pub receiver: SrReceiver,
    pub link: Link,
    pub app: AppSource,
}

impl SrWorld {
    /// 信道与应用层使用由 `seed` 派生的两个独立随机流。
    pub fn new(
        cfg: SrConfig,
        channel: ChannelConfig,
        app: AppConfig,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        let receiver = SrReceiver::new(EndpointId::B, &cfg)?;
        let sender = SrSender::new(EndpointId::A, cfg)?;
        let channel = Channel::new(channel, seed)?;
        Ok(Self {
            sender,
            receiver,
            link: Link::new(channel),
            app: AppSource::new(app, seed.wrapping_add(0x9e37_79b9_7f4a_7c15)),
        })
    }

    pub fn enable_trace(&mut self) {
        self.link.trace = Some(TraceLogger::default());
    }

    /// 调度应用层的第一条消息
    pub fn start(&mut self, sim: &mut Simulator) {
        self.app.start(sim);
    }

    /// B 端收到的载荷是否恰为 A 端被接受载荷的前缀（按序、无重复、无缺口）
    pub fn delivered_in_order(&self) -> bool {
        self.link.delivered.len() <= self.app.accepted.len()
            && self.app.accepted[..self.link.delivered.len()] == self.link.delivered[..]
    }

    pub fn summary(&self, sim: &Simulator) -> RunSummary {
        RunSummary {
            end_ms: sim.now().as_millis_f64(),
            events: sim.executed(),
            app: self.app.stats.clone(),
            delivered: self.link.delivered.len() as u64,
            in_order: self.delivered_in_order(),
            complete: self.link.delivered.len() == self.app.accepted.len(),
            sender: self.sender.stats().clone(),
            receiver: self.receiver.stats().clone(),
            channel: self.link.channel.stats.clone(),
        }
    }
}

impl World for SrWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// 一次运行的汇总（可序列化为 JSON）
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub end_ms: f64,
    pub events: u64,
    pub app: AppStats,
    pub delivered: u64,
    pub in_order: bool,
    /// 所有被接受的消息都已交付
    pub complete: bool,
    pub sender: SenderStats,
    pub receiver: ReceiverStats,
    pub channel: ChannelStats,
}
