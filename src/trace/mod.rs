//! 结构化协议事件记录
//!
//! 协议引擎不直接打印，而是通过 [`crate::net::LinkApi::record`] 上报事件；
//! 仿真层把它们收集进 [`TraceLogger`]，运行结束后可整体写成 JSON。

mod types;

pub use types::{TraceEvent, TraceEventKind, TraceLogger};
