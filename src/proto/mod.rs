//! 传输层/协议模块
//!
//! Selective Repeat ARQ 的收发引擎，以及它们共用的数据包、校验和与序号算术。
//! 引擎只通过 [`crate::net::LinkApi`] 与信道、定时器、应用层交互。

mod checksum;
mod config;
mod packet;
mod receiver;
mod sender;
mod stats;
mod window;

pub use checksum::{compute_checksum, is_corrupted};
pub use config::{DEFAULT_RTT_MS, DEFAULT_WINDOW_SIZE, SrConfig};
pub use packet::{ACK_FILLER, Field, Message, PAYLOAD_SIZE, Packet, Payload};
pub use receiver::{RecvOutcome, SrReceiver};
pub use sender::{AckOutcome, RetransmitDeadline, SendOutcome, SrSender, TimeoutOutcome};
pub use stats::{ReceiverStats, SenderStats};
pub use window::{SeqSpace, in_window};
