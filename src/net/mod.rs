//! 信道与仿真驱动模块
//!
//! 协议引擎之外的一切：不可靠信道、每端点的重传定时器、A 端应用层、
//! 事件定义，以及把它们组装在一起的 [`SrWorld`]。

mod api;
mod app;
mod channel;
mod deliver_packet;
mod id;
mod link;
mod scenario;
mod sr_world;
mod stats;
mod timer_fire;

pub use api::LinkApi;
pub use app::{AppConfig, AppMessage, AppSource, AppStats, message_for};
pub use channel::{CORRUPT_FIELD_VALUE, Channel, ChannelConfig, Fate};
pub use deliver_packet::DeliverPacket;
pub use id::EndpointId;
pub use link::{Link, LinkCtx};
pub use scenario::Scenario;
pub use sr_world::{RunSummary, SrWorld};
pub use stats::ChannelStats;
pub use timer_fire::TimerFire;
