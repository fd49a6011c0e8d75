//! A 端应用层：按随机间隔产生消息并提交给发送端。
//!
//! 第 `n` 条消息是 20 个 `b'a' + n % 26`。窗口已满时消息被丢弃（只计数），
//! 与课程实验的驱动程序行为一致。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::debug;

use super::link::LinkCtx;
use super::sr_world::SrWorld;
use crate::proto::{Message, PAYLOAD_SIZE, Payload, SendOutcome};
use crate::sim::{Event, SimTime, Simulator, World};

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 要产生的消息总数
    pub messages: u64,
    /// 平均消息间隔；实际间隔在 `[0, 2 * mean_interval]` 均匀分布
    pub mean_interval: SimTime,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            messages: 20,
            mean_interval: SimTime::from_millis(10),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct AppStats {
    pub generated: u64,
    pub accepted: u64,
    pub rejected: u64,
}

/// 第 `n` 条消息的内容
pub fn message_for(n: u64) -> Message {
    Message::new([b'a' + (n % 26) as u8; PAYLOAD_SIZE])
}

#[derive(Debug)]
pub struct AppSource {
    cfg: AppConfig,
    rng: StdRng,
    /// 被发送端接受的载荷（按提交顺序）
    pub accepted: Vec<Payload>,
    pub stats: AppStats,
}

impl AppSource {
    pub fn new(cfg: AppConfig, seed: u64) -> Self {
        Self {
            cfg,
            rng: StdRng::seed_from_u64(seed),
            accepted: Vec::new(),
            stats: AppStats::default(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.stats.generated >= self.cfg.messages
    }

    fn next_gap(&mut self) -> SimTime {
        let max = self.cfg.mean_interval.0.saturating_mul(2);
        SimTime(self.rng.gen_range(0..=max))
    }

    /// 调度第一条消息
    pub fn start(&mut self, sim: &mut Simulator) {
        if self.is_exhausted() {
            return;
        }
        let gap = self.next_gap();
        sim.schedule_in(gap, AppMessage);
    }
}

/// 事件：A 端应用层产生下一条消息。
#[derive(Debug)]
pub struct AppMessage;

impl Event for AppMessage {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let w = world
            .as_any_mut()
            .downcast_mut::<SrWorld>()
            .expect("world must be SrWorld");
        if w.app.is_exhausted() {
            return;
        }

        let n = w.app.stats.generated;
        w.app.stats.generated += 1;
        let msg = message_for(n);

        let mut ctx = LinkCtx::new(&mut w.link, sim);
        match w.sender.send(msg, &mut ctx) {
            SendOutcome::Sent { seq } => {
                w.app.stats.accepted += 1;
                w.app.accepted.push(msg.data);
                debug!(n, seq, "消息已提交");
            }
            SendOutcome::WindowFull => {
                w.app.stats.rejected += 1;
                debug!(n, "窗口已满，消息丢弃");
            }
        }

        if !w.app.is_exhausted() {
            let gap = w.app.next_gap();
            sim.schedule_in(gap, AppMessage);
        }
    }
}
