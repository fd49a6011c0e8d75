//! 数据包与消息
//!
//! 一个数据包恰好承载一条定长（20 字节）应用消息，不做分片/重组。

use serde::{Deserialize, Serialize};

use super::checksum::compute_checksum;

/// 应用消息/数据包载荷的固定长度（字节）
pub const PAYLOAD_SIZE: usize = 20;

/// 定长载荷
pub type Payload = [u8; PAYLOAD_SIZE];

/// 头部中的序号/确认号字段。
///
/// 用显式的 `Unused` 取代 “-1 表示未使用” 的哨兵值，真实序号不可能与之冲突。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Used(u32),
    Unused,
}

impl Field {
    /// 参与校验和计算的数值：`Unused` 按 -1 的补码（`u32::MAX`）计入。
    pub fn wire_value(self) -> u32 {
        match self {
            Field::Used(v) => v,
            Field::Unused => u32::MAX,
        }
    }

    pub fn used(self) -> Option<u32> {
        match self {
            Field::Used(v) => Some(v),
            Field::Unused => None,
        }
    }
}

/// 应用层交给发送端的一条消息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message {
    pub data: Payload,
}

impl Message {
    pub fn new(data: Payload) -> Self {
        Self { data }
    }

    /// 由字节串构造：不足 20 字节补零，超出部分截断。
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut data = [0u8; PAYLOAD_SIZE];
        let n = bytes.len().min(PAYLOAD_SIZE);
        data[..n].copy_from_slice(&bytes[..n]);
        Self { data }
    }
}

/// ACK 包使用的固定填充载荷
pub const ACK_FILLER: Payload = [0u8; PAYLOAD_SIZE];

/// 网络数据包。构造后不再修改（信道仿真的损坏除外），按值传递。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packet {
    pub seq: Field,
    pub ack: Field,
    pub checksum: u32,
    pub payload: Payload,
}

impl Packet {
    /// 构造并填写校验和
    pub fn new(seq: Field, ack: Field, payload: Payload) -> Self {
        let mut pkt = Packet {
            seq,
            ack,
            checksum: 0,
            payload,
        };
        pkt.checksum = compute_checksum(&pkt);
        pkt
    }

    /// 发送端数据包：序号 `seq`，确认号未使用
    pub fn data(seq: u32, payload: Payload) -> Self {
        Self::new(Field::Used(seq), Field::Unused, payload)
    }

    /// 接收端对 `seq` 的单独确认（非累计）
    pub fn ack(seq: u32) -> Self {
        Self::new(Field::Unused, Field::Used(seq), ACK_FILLER)
    }

    pub fn is_ack(&self) -> bool {
        matches!((self.seq, self.ack), (Field::Unused, Field::Used(_)))
    }
}
