//! Selective Repeat 接收端
//!
//! 对每个包按序号分类：
//! - 当前窗口 `[base, base+W)`：新包缓存，然后把从 `base` 开始连续的已缓存包按序交付；
//! - 前一个窗口 `[base-W, base)`：已经交付过，说明原 ACK 可能丢失，只重新确认；
//! - 两者之外：丢弃，不确认。
//!
//! 确认总是单独的（`ack = seq`），从不累计。

use tracing::debug;

use crate::error::ConfigError;
use crate::net::{EndpointId, LinkApi};
use crate::trace::TraceEventKind;

use super::checksum::is_corrupted;
use super::config::SrConfig;
use super::packet::Packet;
use super::stats::ReceiverStats;
use super::window::SeqSpace;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum RecvSlot {
    #[default]
    Empty,
    Buffered(Packet),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecvOutcome {
    /// 新包已缓存；`delivered` 为本次连带交付给应用层的包数
    Accepted { seq: u32, delivered: u32 },
    /// 当前窗口内已缓存过，不覆盖但仍确认
    Duplicate { seq: u32 },
    /// 前一个窗口内，不重复交付但仍确认
    PreviousWindow { seq: u32 },
    OutOfWindow,
    Corrupted,
}

impl RecvOutcome {
    /// 是否为该包发出了 ACK
    pub fn acked(&self) -> bool {
        matches!(
            self,
            RecvOutcome::Accepted { .. }
                | RecvOutcome::Duplicate { .. }
                | RecvOutcome::PreviousWindow { .. }
        )
    }
}

#[derive(Debug)]
pub struct SrReceiver {
    id: EndpointId,
    space: SeqSpace,
    /// 下一个期望按序到达的序号
    base: u32,
    slots: Vec<RecvSlot>,
    stats: ReceiverStats,
}

impl SrReceiver {
    pub fn new(id: EndpointId, cfg: &SrConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let mut r = Self {
            id,
            space: cfg.seq_space()?,
            base: 0,
            slots: Vec::new(),
            stats: ReceiverStats::default(),
        };
        r.init();
        Ok(r)
    }

    /// 复位：`base = 0`，清空所有缓存标记与计数器。
    pub fn init(&mut self) {
        self.base = 0;
        self.slots = vec![RecvSlot::Empty; self.space.space() as usize];
        self.stats = ReceiverStats::default();
    }

    pub fn id(&self) -> EndpointId {
        self.id
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn stats(&self) -> &ReceiverStats {
        &self.stats
    }

    /// 序号 `seq` 是否已缓存、尚未交付
    pub fn is_buffered(&self, seq: u32) -> bool {
        matches!(self.slots.get(seq as usize), Some(RecvSlot::Buffered(_)))
    }

    #[tracing::instrument(skip_all, fields(endpoint = %self.id, seq = ?pkt.seq, base = self.base))]
    pub fn handle_incoming(&mut self, pkt: Packet, api: &mut dyn LinkApi) -> RecvOutcome {
        if is_corrupted(&pkt) {
            // 不发 ACK，恢复依赖发送端超时
            self.stats.corrupted += 1;
            debug!("数据包校验和不符，丢弃");
            api.record(self.id, TraceEventKind::Corrupted);
            return RecvOutcome::Corrupted;
        }

        let seq = match pkt.seq.used() {
            Some(seq) if self.space.contains(self.base, seq) => seq,
            Some(seq) if self.space.contains(self.space.previous_start(self.base), seq) => {
                self.stats.previous_window += 1;
                debug!(seq, "前一个窗口的包，重新确认");
                api.record(self.id, TraceEventKind::PreviousWindow { seq });
                self.send_ack(seq, api);
                return RecvOutcome::PreviousWindow { seq };
            }
            other => {
                self.stats.out_of_window += 1;
                debug!(seq = ?other, "窗口之外的包，丢弃");
                api.record(self.id, TraceEventKind::OutOfWindow { seq: other });
                return RecvOutcome::OutOfWindow;
            }
        };

        let outcome = match self.slots[seq as usize] {
            RecvSlot::Empty => {
                self.slots[seq as usize] = RecvSlot::Buffered(pkt);
                self.stats.packets_received += 1;
                debug!(seq, "缓存数据包");
                api.record(self.id, TraceEventKind::Buffered { seq });
                let delivered = self.deliver_in_order(api);
                RecvOutcome::Accepted { seq, delivered }
            }
            RecvSlot::Buffered(_) => {
                self.stats.duplicates += 1;
                debug!(seq, "重复数据包，不覆盖缓存");
                api.record(self.id, TraceEventKind::DuplicateData { seq });
                RecvOutcome::Duplicate { seq }
            }
        };
        self.send_ack(seq, api);
        outcome
    }

    /// 从 `base` 起交付连续的已缓存包。
    fn deliver_in_order(&mut self, api: &mut dyn LinkApi) -> u32 {
        let mut delivered = 0;
        while let RecvSlot::Buffered(pkt) = self.slots[self.base as usize] {
            self.slots[self.base as usize] = RecvSlot::Empty;
            api.record(self.id, TraceEventKind::Deliver { seq: self.base });
            api.deliver(self.id, pkt.payload);
            self.stats.delivered += 1;
            delivered += 1;
            self.base = self.space.next(self.base);
        }
        if delivered > 0 {
            debug!(delivered, base = self.base, "按序交付");
        }
        delivered
    }

    fn send_ack(&mut self, seq: u32, api: &mut dyn LinkApi) {
        self.stats.acks_sent += 1;
        api.record(self.id, TraceEventKind::AckSent { ack: seq });
        api.transmit(self.id, Packet::ack(seq));
    }
}
