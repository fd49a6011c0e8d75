//! 数据包到达事件

use tracing::trace;

use super::id::EndpointId;
use super::link::LinkCtx;
use super::sr_world::SrWorld;
use crate::proto::Packet;
use crate::sim::{Event, Simulator, World};

/// 事件：信道把一个包交给端点 `to`。
#[derive(Debug)]
pub struct DeliverPacket {
    pub to: EndpointId,
    pub pkt: Packet,
}

impl Event for DeliverPacket {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let DeliverPacket { to, pkt } = *self;
        let w = world
            .as_any_mut()
            .downcast_mut::<SrWorld>()
            .expect("world must be SrWorld");
        w.link.channel.stats.arrived += 1;

        let mut ctx = LinkCtx::new(&mut w.link, sim);
        match to {
            EndpointId::A => {
                let outcome = w.sender.handle_incoming(pkt, &mut ctx);
                trace!(?outcome, "A 处理到达包");
            }
            EndpointId::B => {
                let outcome = w.receiver.handle_incoming(pkt, &mut ctx);
                trace!(?outcome, "B 处理到达包");
            }
        }
    }
}
