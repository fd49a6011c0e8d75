//! Selective Repeat 发送端
//!
//! - 至多 W 个包在途；窗口满时 [`SrSender::send`] 返回 [`SendOutcome::WindowFull`]，
//!   这是正常的背压而不是错误。
//! - ACK 是**单独确认**：`ack = K` 只确认序号 K 本身。
//! - 整个发送端只有一个逻辑定时器，对应最早未确认的包；超时只重传这一个包
//!   （区别于 Go-Back-N 的整窗重传）。
//!
//! ```text
//!   base                 next
//!    │                    │
//! ───┼──┬──┬──┬──┬──┬─────┼───────▶ seq (mod 2W)
//!    │U │A │U │A │U │     │
//!    └── outstanding ─────┘
//! ```

use tracing::{debug, trace, warn};

use crate::error::ConfigError;
use crate::net::{EndpointId, LinkApi};
use crate::sim::SimTime;
use crate::trace::TraceEventKind;

use super::checksum::is_corrupted;
use super::config::SrConfig;
use super::packet::{Message, Packet};
use super::stats::SenderStats;
use super::window::SeqSpace;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum SendSlot {
    #[default]
    Empty,
    Unacked(Packet),
    Acked,
}

/// 唯一的重传截止时间，对应最早未确认的包
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetransmitDeadline {
    pub seq: u32,
    pub at: SimTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum SendOutcome {
    Sent { seq: u32 },
    WindowFull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckOutcome {
    /// 新确认；`base` 为滑动后的左沿
    New { ack: u32, base: u32 },
    /// 已确认过、窗口外或未使用的确认号
    Duplicate,
    Corrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutOutcome {
    Retransmitted { seq: u32 },
    /// 没有未确认的包（定时器与 ACK 竞争），什么都不做
    Idle,
}

#[derive(Debug)]
pub struct SrSender {
    id: EndpointId,
    cfg: SrConfig,
    space: SeqSpace,
    /// 最早未确认的序号（窗口左沿）
    base: u32,
    /// 下一个待分配的序号
    next: u32,
    slots: Vec<SendSlot>,
    timer: Option<RetransmitDeadline>,
    stats: SenderStats,
}

impl SrSender {
    pub fn new(id: EndpointId, cfg: SrConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let space = cfg.seq_space()?;
        let mut s = Self {
            id,
            cfg,
            space,
            base: 0,
            next: 0,
            slots: Vec::new(),
            timer: None,
            stats: SenderStats::default(),
        };
        s.init();
        Ok(s)
    }

    /// 复位为初始状态：`base = next = 0`，所有槽位清空，无定时器。
    pub fn init(&mut self) {
        self.base = 0;
        self.next = 0;
        self.slots = vec![SendSlot::Empty; self.space.space() as usize];
        self.timer = None;
        self.stats = SenderStats::default();
    }

    pub fn id(&self) -> EndpointId {
        self.id
    }

    pub fn config(&self) -> &SrConfig {
        &self.cfg
    }

    pub fn seq_space(&self) -> SeqSpace {
        self.space
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn next_seq(&self) -> u32 {
        self.next
    }

    /// 在途（已发送未滑出窗口）的包数 `(next - base) mod 2W`
    pub fn outstanding(&self) -> u32 {
        self.space.distance(self.base, self.next)
    }

    pub fn can_send(&self) -> bool {
        self.outstanding() < self.space.window()
    }

    pub fn timer(&self) -> Option<RetransmitDeadline> {
        self.timer
    }

    pub fn stats(&self) -> &SenderStats {
        &self.stats
    }

    /// 序号 `seq` 是否已发送且仍待确认
    pub fn is_unacked(&self, seq: u32) -> bool {
        matches!(self.slot(seq), Some(SendSlot::Unacked(_)))
    }

    /// 序号 `seq` 是否已确认但尚未滑出窗口
    pub fn is_acked(&self, seq: u32) -> bool {
        matches!(self.slot(seq), Some(SendSlot::Acked))
    }

    fn slot(&self, seq: u32) -> Option<&SendSlot> {
        self.slots.get(seq as usize)
    }

    fn arm_timer(&mut self, seq: u32, api: &mut dyn LinkApi) {
        let at = api.now().after(self.cfg.rtt);
        self.timer = Some(RetransmitDeadline { seq, at });
        api.start_timer(self.id, self.cfg.rtt);
        api.record(self.id, TraceEventKind::TimerStart { deadline_ns: at.0 });
        trace!(seq, deadline = %at, "重传定时器启动");
    }

    fn disarm_timer(&mut self, api: &mut dyn LinkApi) {
        if self.timer.take().is_some() {
            api.stop_timer(self.id);
            api.record(self.id, TraceEventKind::TimerStop);
            trace!("重传定时器停止");
        }
    }

    /// 应用层提交一条消息。
    #[tracing::instrument(skip_all, fields(endpoint = %self.id, base = self.base, next = self.next))]
    pub fn send(&mut self, msg: Message, api: &mut dyn LinkApi) -> SendOutcome {
        let outstanding = self.outstanding();
        if outstanding >= self.space.window() {
            self.stats.window_full += 1;
            debug!(outstanding, "窗口已满，拒绝消息");
            api.record(self.id, TraceEventKind::WindowFull { outstanding });
            return SendOutcome::WindowFull;
        }

        let seq = self.next;
        let pkt = Packet::data(seq, msg.data);
        self.slots[seq as usize] = SendSlot::Unacked(pkt);
        self.stats.messages_sent += 1;

        debug!(seq, "发送数据包");
        api.record(self.id, TraceEventKind::Send { seq });
        api.transmit(self.id, pkt);

        // 窗口此前为空：这是唯一的在途包，由它启动共享定时器
        if outstanding == 0 {
            self.arm_timer(seq, api);
        }
        self.next = self.space.next(seq);
        SendOutcome::Sent { seq }
    }

    /// 处理从网络到达的包（单向传输中总是 ACK）。
    #[tracing::instrument(skip_all, fields(endpoint = %self.id, ack = ?pkt.ack))]
    pub fn handle_incoming(&mut self, pkt: Packet, api: &mut dyn LinkApi) -> AckOutcome {
        if is_corrupted(&pkt) {
            self.stats.corrupted += 1;
            debug!("ACK 校验和不符，丢弃");
            api.record(self.id, TraceEventKind::Corrupted);
            return AckOutcome::Corrupted;
        }
        self.stats.acks_received += 1;

        let ack = pkt.ack.used();
        let fresh = ack.filter(|&a| self.space.contains(self.base, a) && self.is_unacked(a));
        let Some(ack) = fresh else {
            self.stats.duplicate_acks += 1;
            debug!(?ack, base = self.base, "重复或窗口外的 ACK，忽略");
            api.record(self.id, TraceEventKind::AckDuplicate { ack });
            return AckOutcome::Duplicate;
        };

        self.slots[ack as usize] = SendSlot::Acked;
        self.stats.new_acks += 1;

        let old_base = self.base;
        while self.base != self.next && self.slots[self.base as usize] == SendSlot::Acked {
            self.slots[self.base as usize] = SendSlot::Empty;
            self.base = self.space.next(self.base);
        }
        debug!(ack, old_base, base = self.base, next = self.next, "新 ACK");
        api.record(
            self.id,
            TraceEventKind::AckNew {
                ack,
                base: self.base,
            },
        );

        // 新确认总是重启定时器；滑动后 base 处必为未确认的包
        if self.base == self.next {
            self.disarm_timer(api);
        } else {
            self.arm_timer(self.base, api);
        }
        AckOutcome::New {
            ack,
            base: self.base,
        }
    }

    /// 定时器到期：只重传最早的一个未确认包。
    #[tracing::instrument(skip_all, fields(endpoint = %self.id, base = self.base, next = self.next))]
    pub fn handle_timeout(&mut self, api: &mut dyn LinkApi) -> TimeoutOutcome {
        self.stats.timeouts += 1;

        // 不信任旧状态：每次都重新找最早的未确认槽位
        let oldest = (0..self.outstanding())
            .map(|i| self.space.add(self.base, i))
            .find_map(|seq| match self.slots[seq as usize] {
                SendSlot::Unacked(pkt) => Some((seq, pkt)),
                _ => None,
            });

        let Some((seq, pkt)) = oldest else {
            self.timer = None;
            debug!("超时但没有未确认的包，忽略");
            api.record(self.id, TraceEventKind::Timeout { seq: None });
            return TimeoutOutcome::Idle;
        };

        if seq != self.base {
            warn!(seq, base = self.base, "最早未确认的包不在窗口左沿");
        }
        self.stats.retransmissions += 1;
        debug!(seq, "超时，选择重传");
        api.record(self.id, TraceEventKind::Timeout { seq: Some(seq) });
        api.record(self.id, TraceEventKind::Retransmit { seq });
        api.transmit(self.id, pkt);
        self.arm_timer(seq, api);
        TimeoutOutcome::Retransmitted { seq }
    }
}
