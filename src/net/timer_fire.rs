//! 定时器到期事件

use tracing::trace;

use super::id::EndpointId;
use super::link::LinkCtx;
use super::sr_world::SrWorld;
use crate::sim::{Event, Simulator, World};

/// 事件：端点 `at` 的第 `generation` 代定时器到期。已被取代或停止的代直接忽略。
#[derive(Debug)]
pub struct TimerFire {
    pub at: EndpointId,
    pub generation: u64,
}

impl Event for TimerFire {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let TimerFire { at, generation } = *self;
        let w = world
            .as_any_mut()
            .downcast_mut::<SrWorld>()
            .expect("world must be SrWorld");

        if !w.link.fire_timer(at, generation) {
            trace!(%at, generation, "过期的定时器事件，忽略");
            return;
        }

        // 单向传输：只有发送端会启动定时器
        if at == w.sender.id() {
            let mut ctx = LinkCtx::new(&mut w.link, sim);
            let outcome = w.sender.handle_timeout(&mut ctx);
            trace!(?outcome, "A 超时处理");
        }
    }
}
