//! 仿真核心模块
//!
//! 离散事件仿真：仿真时间、事件、世界与仿真器。

mod event;
mod scheduled_event;
mod simulator;
mod time;
mod world;

pub use event::Event;
pub use scheduled_event::ScheduledEvent;
pub use simulator::Simulator;
pub use time::SimTime;
pub use world::World;
