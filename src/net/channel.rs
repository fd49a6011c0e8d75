//! 不可靠信道仿真
//!
//! 故障模型：
//!
//! | 故障 | 说明 |
//! |------|------|
//! | 丢包 | 每个包以 `loss_prob` 独立丢弃 |
//! | 损坏 | 以 `corrupt_prob` 改写：75% 改载荷首字节为 `'Z'`，12.5% 改序号，其余改确认号 |
//! | 时延 | `[min_delay, max_delay]` 均匀分布 |
//!
//! 同一方向上的到达时间单调不减，因此信道只会丢/损/延迟，从不乱序。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::error::ConfigError;
use crate::proto::{Field, Packet};
use crate::sim::SimTime;

use super::id::EndpointId;
use super::stats::ChannelStats;

/// 损坏序号/确认号时写入的值
pub const CORRUPT_FIELD_VALUE: u32 = 999_999;

#[derive(Debug, Clone)]
pub struct ChannelConfig {
    pub loss_prob: f64,
    pub corrupt_prob: f64,
    pub min_delay: SimTime,
    pub max_delay: SimTime,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            loss_prob: 0.0,
            corrupt_prob: 0.0,
            min_delay: SimTime::from_millis(1),
            max_delay: SimTime::from_millis(10),
        }
    }
}

impl ChannelConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("loss", self.loss_prob), ("corrupt", self.corrupt_prob)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Probability { name, value });
            }
        }
        if self.min_delay > self.max_delay {
            return Err(ConfigError::DelayRange {
                min_ns: self.min_delay.0,
                max_ns: self.max_delay.0,
            });
        }
        Ok(())
    }
}

/// 一个包在信道中的结局
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fate {
    Lost,
    Arrive {
        at: SimTime,
        pkt: Packet,
        corrupted: bool,
    },
}

#[derive(Debug)]
pub struct Channel {
    cfg: ChannelConfig,
    rng: StdRng,
    /// 每个方向上最后一个包的到达时间（按发送端索引）
    last_arrival: [SimTime; 2],
    pub stats: ChannelStats,
}

impl Channel {
    pub fn new(cfg: ChannelConfig, seed: u64) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            rng: StdRng::seed_from_u64(seed),
            last_arrival: [SimTime::ZERO; 2],
            stats: ChannelStats::default(),
        })
    }

    /// 决定 `from` 在 `now` 发出的包的结局。
    pub fn offer(&mut self, from: EndpointId, mut pkt: Packet, now: SimTime) -> Fate {
        self.stats.offered += 1;

        if self.rng.gen_bool(self.cfg.loss_prob) {
            self.stats.lost += 1;
            trace!(%from, seq = ?pkt.seq, ack = ?pkt.ack, "信道丢包");
            return Fate::Lost;
        }

        let corrupted = self.rng.gen_bool(self.cfg.corrupt_prob);
        if corrupted {
            self.stats.corrupted += 1;
            self.corrupt(&mut pkt);
            trace!(%from, seq = ?pkt.seq, ack = ?pkt.ack, "信道损坏数据包");
        }

        let delay = SimTime(self.rng.gen_range(self.cfg.min_delay.0..=self.cfg.max_delay.0));
        let last = &mut self.last_arrival[from.index()];
        let at = now.max(*last).after(delay);
        *last = at;
        Fate::Arrive { at, pkt, corrupted }
    }

    fn corrupt(&mut self, pkt: &mut Packet) {
        let x: f64 = self.rng.r#gen();
        if x < 0.75 {
            pkt.payload[0] = b'Z';
        } else if x < 0.875 {
            pkt.seq = Field::Used(CORRUPT_FIELD_VALUE);
        } else {
            pkt.ack = Field::Used(CORRUPT_FIELD_VALUE);
        }
    }
}
