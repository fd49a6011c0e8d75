use crate::net::{EndpointId, LinkApi};
use crate::proto::{Packet, Payload};
use crate::sim::SimTime;
use crate::trace::TraceEventKind;

mod receiver;

/// 记录引擎所有外部调用的假链路
#[derive(Debug, Default)]
pub(crate) struct MockLink {
    pub now: SimTime,
    pub sent: Vec<(EndpointId, Packet)>,
    pub delivered: Vec<Payload>,
    pub timer_starts: Vec<SimTime>,
    pub timer_stops: usize,
    pub events: Vec<TraceEventKind>,
}

impl MockLink {
    pub fn sent_seqs(&self) -> Vec<u32> {
        self.sent.iter().filter_map(|(_, p)| p.seq.used()).collect()
    }

    pub fn sent_acks(&self) -> Vec<u32> {
        self.sent.iter().filter_map(|(_, p)| p.ack.used()).collect()
    }
}

impl LinkApi for MockLink {
    fn now(&self) -> SimTime {
        self.now
    }

    fn transmit(&mut self, from: EndpointId, pkt: Packet) {
        self.sent.push((from, pkt));
    }

    fn deliver(&mut self, _at: EndpointId, payload: Payload) {
        self.delivered.push(payload);
    }

    fn start_timer(&mut self, _at: EndpointId, after: SimTime) {
        self.timer_starts.push(after);
    }

    fn stop_timer(&mut self, _at: EndpointId) {
        self.timer_stops += 1;
    }

    fn record(&mut self, _at: EndpointId, kind: TraceEventKind) {
        self.events.push(kind);
    }
}

pub(crate) fn payload(b: u8) -> Payload {
    [b; crate::proto::PAYLOAD_SIZE]
}
