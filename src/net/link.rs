//! 端点之间的链路：信道、每端点的定时器、B 端应用层与事件记录。
//!
//! [`LinkCtx`] 把 `Link` 与仿真器绑在一起，为协议引擎实现 [`LinkApi`]。

use tracing::{debug, trace};

use crate::proto::{Packet, Payload};
use crate::sim::{SimTime, Simulator};
use crate::trace::{TraceEvent, TraceEventKind, TraceLogger};

use super::api::LinkApi;
use super::channel::{Channel, Fate};
use super::deliver_packet::DeliverPacket;
use super::id::EndpointId;
use super::timer_fire::TimerFire;

/// 一个端点的定时器。每次启动/停止都换一代，过期的到期事件据此被忽略。
#[derive(Debug, Default, Clone, Copy)]
struct TimerSlot {
    generation: u64,
    armed: bool,
}

#[derive(Debug)]
pub struct Link {
    pub channel: Channel,
    timers: [TimerSlot; 2],
    /// B 端应用层按序收到的载荷
    pub delivered: Vec<Payload>,
    pub trace: Option<TraceLogger>,
}

impl Link {
    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            timers: [TimerSlot::default(); 2],
            delivered: Vec::new(),
            trace: None,
        }
    }

    pub fn timer_armed(&self, at: EndpointId) -> bool {
        self.timers[at.index()].armed
    }

    /// 到期事件是否仍代表当前定时器；是则将其标记为已触发。
    pub(crate) fn fire_timer(&mut self, at: EndpointId, generation: u64) -> bool {
        let slot = &mut self.timers[at.index()];
        if !slot.armed || slot.generation != generation {
            return false;
        }
        slot.armed = false;
        true
    }

    fn bump_timer(&mut self, at: EndpointId, armed: bool) -> u64 {
        let slot = &mut self.timers[at.index()];
        slot.generation = slot.generation.wrapping_add(1);
        slot.armed = armed;
        slot.generation
    }

    pub(crate) fn push_trace(&mut self, t: SimTime, endpoint: EndpointId, kind: TraceEventKind) {
        if let Some(log) = &mut self.trace {
            log.push(TraceEvent {
                t_ns: t.0,
                endpoint,
                kind,
            });
        }
    }
}

/// 事件执行期间引擎看到的外部世界
pub struct LinkCtx<'a> {
    pub link: &'a mut Link,
    pub sim: &'a mut Simulator,
}

impl<'a> LinkCtx<'a> {
    pub fn new(link: &'a mut Link, sim: &'a mut Simulator) -> Self {
        Self { link, sim }
    }
}

impl LinkApi for LinkCtx<'_> {
    fn now(&self) -> SimTime {
        self.sim.now()
    }

    fn transmit(&mut self, from: EndpointId, pkt: Packet) {
        let now = self.sim.now();
        match self.link.channel.offer(from, pkt, now) {
            Fate::Lost => {
                self.link.push_trace(now, from, TraceEventKind::ChannelLoss);
            }
            Fate::Arrive { at, pkt, corrupted } => {
                if corrupted {
                    self.link.push_trace(now, from, TraceEventKind::ChannelCorrupt);
                }
                trace!(%from, arrive = %at, "数据包进入信道");
                self.sim.schedule(
                    at,
                    DeliverPacket {
                        to: from.peer(),
                        pkt,
                    },
                );
            }
        }
    }

    fn deliver(&mut self, at: EndpointId, payload: Payload) {
        debug!(%at, payload = %String::from_utf8_lossy(&payload), "交付应用层");
        self.link.delivered.push(payload);
    }

    fn start_timer(&mut self, at: EndpointId, after: SimTime) {
        let generation = self.link.bump_timer(at, true);
        self.sim.schedule_in(after, TimerFire { at, generation });
    }

    fn stop_timer(&mut self, at: EndpointId) {
        self.link.bump_timer(at, false);
    }

    fn record(&mut self, at: EndpointId, kind: TraceEventKind) {
        let now = self.sim.now();
        self.link.push_trace(now, at, kind);
    }
}
