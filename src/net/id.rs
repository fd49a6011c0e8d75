//! 端点标识符

use serde::{Deserialize, Serialize};
use std::fmt;

/// 单向传输中的两个端点：A 为发送端，B 为接收端。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointId {
    A,
    B,
}

impl EndpointId {
    /// 对端
    pub fn peer(self) -> EndpointId {
        match self {
            EndpointId::A => EndpointId::B,
            EndpointId::B => EndpointId::A,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            EndpointId::A => 0,
            EndpointId::B => 1,
        }
    }
}

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointId::A => f.write_str("A"),
            EndpointId::B => f.write_str("B"),
        }
    }
}
