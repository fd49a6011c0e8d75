use serde::{Deserialize, Serialize};

use crate::net::EndpointId;

/// 协议事件类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceEventKind {
    /// 发送端接受一条消息并首次发出
    Send { seq: u32 },
    /// 窗口已满，消息被拒绝
    WindowFull { outstanding: u32 },
    /// 新的有效 ACK；`base` 为滑动后的窗口左沿
    AckNew { ack: u32, base: u32 },
    /// 重复或窗口外的 ACK
    AckDuplicate { ack: Option<u32> },
    /// 定时器到期；`seq` 为被重传的包，`None` 表示空操作
    Timeout { seq: Option<u32> },
    /// 选择重传单个包
    Retransmit { seq: u32 },
    /// 接收端缓存了当前窗口内的新包
    Buffered { seq: u32 },
    /// 当前窗口内已缓存过的重复包
    DuplicateData { seq: u32 },
    /// 前一个窗口内的包（已交付，其 ACK 可能丢失）
    PreviousWindow { seq: u32 },
    /// 两个窗口之外，直接丢弃
    OutOfWindow { seq: Option<u32> },
    /// 按序交付给应用层
    Deliver { seq: u32 },
    /// 接收端发出单独确认
    AckSent { ack: u32 },
    /// 校验和不符，丢弃
    Corrupted,
    TimerStart { deadline_ns: u64 },
    TimerStop,
    /// 信道丢包
    ChannelLoss,
    /// 信道损坏了一个包
    ChannelCorrupt,
}

/// 一条带时间戳的事件（JSON）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    /// 仿真时间（纳秒，和 `SimTime.0` 同口径）
    pub t_ns: u64,
    pub endpoint: EndpointId,
    #[serde(flatten)]
    pub kind: TraceEventKind,
}

/// 内存中的事件收集器，仿真结束后写 JSON 文件
#[derive(Debug, Default)]
pub struct TraceLogger {
    pub events: Vec<TraceEvent>,
}

impl TraceLogger {
    pub fn push(&mut self, ev: TraceEvent) {
        self.events.push(ev);
    }

    pub fn count(&self, pred: impl Fn(&TraceEventKind) -> bool) -> usize {
        self.events.iter().filter(|e| pred(&e.kind)).count()
    }
}
