//! 收发两端的计数器

use serde::Serialize;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SenderStats {
    /// 被接受并首次发出的消息数
    pub messages_sent: u64,
    /// 因窗口已满被拒绝的消息数
    pub window_full: u64,
    /// 收到的未损坏 ACK 总数（含重复）
    pub acks_received: u64,
    pub new_acks: u64,
    pub duplicate_acks: u64,
    pub corrupted: u64,
    pub timeouts: u64,
    pub retransmissions: u64,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiverStats {
    /// 当前窗口内首次到达、被缓存的包
    pub packets_received: u64,
    pub delivered: u64,
    /// 当前窗口内已缓存过的重复包
    pub duplicates: u64,
    pub previous_window: u64,
    pub out_of_window: u64,
    pub corrupted: u64,
    pub acks_sent: u64,
}
