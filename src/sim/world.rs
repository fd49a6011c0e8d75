//! 世界 trait
//!
//! 事件执行时通过它访问协议引擎与信道状态。

use super::simulator::Simulator;
use std::any::Any;

/// 仿真世界：由上层实现（例如 `net::SrWorld` 持有收发两端与信道）。
pub trait World: Any {
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn on_tick(&mut self, _sim: &mut Simulator) {}
}
