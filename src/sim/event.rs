//! 事件 trait
//!
//! 应用层发送、数据包到达、定时器到期都实现为事件。

use super::simulator::Simulator;
use super::world::World;

/// 事件：可被调度执行。使用 `self: Box<Self>` 以便执行时取回所携带数据包的所有权。
pub trait Event: Send + 'static {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World);
}
