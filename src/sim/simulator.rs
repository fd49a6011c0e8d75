//! 仿真器
//!
//! 单线程、协作式：一次只执行一个事件，执行完毕才取下一个。
//! 协议引擎因此不需要任何加锁。

use super::event::Event;
use super::scheduled_event::ScheduledEvent;
use super::time::SimTime;
use super::world::World;
use std::collections::BinaryHeap;
use tracing::{debug, info, trace};

/// 事件驱动仿真器：维护当前时间与事件队列。
#[derive(Default)]
pub struct Simulator {
    now: SimTime,
    next_seq: u64,
    executed: u64,
    q: BinaryHeap<ScheduledEvent>,
}

impl Simulator {
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// 已执行的事件总数
    pub fn executed(&self) -> u64 {
        self.executed
    }

    /// 队列中尚未执行的事件数
    pub fn pending(&self) -> usize {
        self.q.len()
    }

    /// 调度事件在 `at` 执行；早于当前时间的请求按当前时间处理。
    pub fn schedule<E: Event>(&mut self, at: SimTime, ev: E) {
        let at = at.max(self.now);
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        trace!(
            now = %self.now,
            at = %at,
            seq,
            event_type = std::any::type_name::<E>(),
            "调度事件"
        );
        self.q.push(ScheduledEvent {
            at,
            seq,
            ev: Box::new(ev),
        });
    }

    /// 在当前时间之后 `delay` 执行。
    pub fn schedule_in<E: Event>(&mut self, delay: SimTime, ev: E) {
        self.schedule(self.now.after(delay), ev);
    }

    fn step(&mut self, item: ScheduledEvent, world: &mut dyn World) {
        self.now = item.at;
        self.executed = self.executed.saturating_add(1);
        trace!(now = %self.now, seq = item.seq, remaining = self.q.len(), "执行事件");
        item.ev.execute(self, world);
        world.on_tick(self);
    }

    /// 运行直到事件队列为空或下一个事件晚于 `until`；结束时时间推进到 `until`。
    #[tracing::instrument(skip(self, world))]
    pub fn run_until(&mut self, until: SimTime, world: &mut dyn World) {
        while self.q.peek().is_some_and(|top| top.at <= until) {
            let Some(item) = self.q.pop() else {
                break;
            };
            self.step(item, world);
        }
        self.now = self.now.max(until);
        debug!(
            now = %self.now,
            executed = self.executed,
            pending = self.q.len(),
            "run_until 结束"
        );
    }

    /// 运行所有事件直到队列为空。
    #[tracing::instrument(skip(self, world))]
    pub fn run(&mut self, world: &mut dyn World) {
        info!("开始运行仿真");
        while let Some(item) = self.q.pop() {
            self.step(item, world);
        }
        info!(total_events = self.executed, final_time = %self.now, "仿真完成");
    }
}
