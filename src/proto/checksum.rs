//! 校验和
//!
//! 序号、确认号与每个载荷字节（无符号）的回绕求和。

use super::packet::Packet;

pub fn compute_checksum(pkt: &Packet) -> u32 {
    pkt.payload.iter().fold(
        pkt.seq.wire_value().wrapping_add(pkt.ack.wire_value()),
        |sum, &b| sum.wrapping_add(u32::from(b)),
    )
}

/// 存储的校验和与重新计算的不一致即视为损坏。
pub fn is_corrupted(pkt: &Packet) -> bool {
    pkt.checksum != compute_checksum(pkt)
}
