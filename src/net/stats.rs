//! 信道统计

use serde::Serialize;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelStats {
    /// 交给信道的包数
    pub offered: u64,
    pub lost: u64,
    pub corrupted: u64,
    /// 实际到达对端的包数（含损坏的）
    pub arrived: u64,
}
