//! Network-facing API used by the protocol engines.
//!
//! 引擎只通过这个 trait 与外界交互：发包、向上交付、启停定时器、上报事件。
//! 仿真层（[`super::LinkCtx`]）和单元测试各自提供实现。

use crate::proto::{Packet, Payload};
use crate::sim::SimTime;
use crate::trace::TraceEventKind;

use super::EndpointId;

pub trait LinkApi {
    /// 当前仿真时间
    fn now(&self) -> SimTime;
    /// 把数据包交给信道
    fn transmit(&mut self, from: EndpointId, pkt: Packet);
    /// 把按序完成的载荷交给应用层
    fn deliver(&mut self, at: EndpointId, payload: Payload);
    /// 启动（或重启）该端点唯一的重传定时器，隐式取代之前的定时器
    fn start_timer(&mut self, at: EndpointId, after: SimTime);
    /// 停止定时器；对已停止的定时器是空操作
    fn stop_timer(&mut self, at: EndpointId);
    /// 结构化事件接收器
    fn record(&mut self, _at: EndpointId, _kind: TraceEventKind) {}
}
