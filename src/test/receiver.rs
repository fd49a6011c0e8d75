use super::{MockLink, payload};
use crate::net::EndpointId;
use crate::proto::{
    ACK_FILLER, Field, Packet, RecvOutcome, SrConfig, SrReceiver, is_corrupted,
};
use crate::sim::SimTime;

fn receiver(window: u32) -> SrReceiver {
    let cfg = SrConfig {
        window_size: window,
        rtt: SimTime::from_millis(16),
    };
    SrReceiver::new(EndpointId::B, &cfg).expect("valid config")
}

fn data(seq: u32) -> Packet {
    Packet::data(seq, payload(b'a' + seq as u8))
}

#[test]
fn in_order_packet_is_delivered_and_acked() {
    let mut r = receiver(6);
    let mut link = MockLink::default();

    assert_eq!(
        r.handle_incoming(data(0), &mut link),
        RecvOutcome::Accepted {
            seq: 0,
            delivered: 1
        }
    );
    assert_eq!(link.delivered, vec![payload(b'a')]);
    assert_eq!(r.base(), 1);

    let (from, ack) = link.sent[0];
    assert_eq!(from, EndpointId::B);
    assert_eq!(ack.seq, Field::Unused);
    assert_eq!(ack.ack, Field::Used(0));
    assert_eq!(ack.payload, ACK_FILLER);
    assert!(ack.is_ack());
    assert!(!is_corrupted(&ack));
}

#[test]
fn out_of_order_arrivals_are_buffered_then_delivered_in_order() {
    let mut r = receiver(6);
    let mut link = MockLink::default();

    assert_eq!(
        r.handle_incoming(data(2), &mut link),
        RecvOutcome::Accepted {
            seq: 2,
            delivered: 0
        }
    );
    assert!(link.delivered.is_empty());
    assert!(r.is_buffered(2));

    assert_eq!(
        r.handle_incoming(data(0), &mut link),
        RecvOutcome::Accepted {
            seq: 0,
            delivered: 1
        }
    );
    assert_eq!(link.delivered, vec![payload(b'a')]);

    assert_eq!(
        r.handle_incoming(data(1), &mut link),
        RecvOutcome::Accepted {
            seq: 1,
            delivered: 2
        }
    );
    assert_eq!(
        link.delivered,
        vec![payload(b'a'), payload(b'b'), payload(b'c')]
    );
    assert_eq!(r.base(), 3);
    assert!(!r.is_buffered(2));
    // 每个包单独确认
    assert_eq!(link.sent_acks(), vec![2, 0, 1]);
}

#[test]
fn duplicate_in_current_window_is_acked_but_not_rebuffered() {
    let mut r = receiver(6);
    let mut link = MockLink::default();

    r.handle_incoming(data(1), &mut link);
    let imposter = Packet::data(1, payload(b'?'));
    assert_eq!(
        r.handle_incoming(imposter, &mut link),
        RecvOutcome::Duplicate { seq: 1 }
    );
    assert_eq!(link.sent_acks(), vec![1, 1]);

    r.handle_incoming(data(0), &mut link);
    assert_eq!(link.delivered, vec![payload(b'a'), payload(b'b')]);
    assert_eq!(r.stats().duplicates, 1);
}

#[test]
fn previous_window_packet_is_reacked_without_redelivery() {
    let mut r = receiver(6);
    let mut link = MockLink::default();

    r.handle_incoming(data(0), &mut link);
    let out = r.handle_incoming(data(0), &mut link);
    assert_eq!(out, RecvOutcome::PreviousWindow { seq: 0 });
    assert!(out.acked());
    assert_eq!(link.delivered.len(), 1);
    assert_eq!(link.sent_acks(), vec![0, 0]);
    assert_eq!(r.base(), 1);
    assert_eq!(r.stats().previous_window, 1);
}

#[test]
fn previous_window_wraps_below_zero() {
    let mut r = receiver(3);
    let mut link = MockLink::default();
    // base = 2，前一个窗口是 [5, 0, 1]
    r.handle_incoming(data(0), &mut link);
    r.handle_incoming(data(1), &mut link);
    assert_eq!(r.base(), 2);

    assert_eq!(
        r.handle_incoming(data(5), &mut link),
        RecvOutcome::PreviousWindow { seq: 5 }
    );
    assert_eq!(
        r.handle_incoming(data(4), &mut link),
        RecvOutcome::Accepted {
            seq: 4,
            delivered: 0
        }
    );
}

#[test]
fn packets_outside_both_windows_are_dropped_without_ack() {
    let mut r = receiver(6);
    let mut link = MockLink::default();

    let bogus = Packet::data(999_999, payload(b'a'));
    assert_eq!(r.handle_incoming(bogus, &mut link), RecvOutcome::OutOfWindow);
    let unnumbered = Packet::new(Field::Unused, Field::Unused, payload(b'a'));
    let out = r.handle_incoming(unnumbered, &mut link);
    assert_eq!(out, RecvOutcome::OutOfWindow);
    assert!(!out.acked());

    assert!(link.sent.is_empty());
    assert!(link.delivered.is_empty());
    assert_eq!(r.stats().out_of_window, 2);
}

#[test]
fn corrupted_packet_is_dropped_silently() {
    let mut r = receiver(6);
    let mut link = MockLink::default();

    let mut pkt = data(0);
    pkt.payload[0] = b'Z';
    assert_eq!(r.handle_incoming(pkt, &mut link), RecvOutcome::Corrupted);
    assert!(link.sent.is_empty());
    assert!(link.delivered.is_empty());
    assert_eq!(r.base(), 0);
    assert!(!r.is_buffered(0));
    assert_eq!(r.stats().corrupted, 1);

    // 之后的正确副本照常接收
    assert!(matches!(
        r.handle_incoming(data(0), &mut link),
        RecvOutcome::Accepted { .. }
    ));
}

#[test]
fn long_in_order_stream_wraps_sequence_space() {
    let mut r = receiver(3);
    let mut link = MockLink::default();

    for i in 0..14u32 {
        let seq = i % 6;
        let pkt = Packet::data(seq, payload(b'a' + i as u8));
        assert_eq!(
            r.handle_incoming(pkt, &mut link),
            RecvOutcome::Accepted { seq, delivered: 1 }
        );
    }
    let expected: Vec<_> = (0..14u8).map(|i| payload(b'a' + i)).collect();
    assert_eq!(link.delivered, expected);
    assert_eq!(r.base(), 14 % 6);
}

#[test]
fn any_arrival_order_within_window_delivers_in_order_exactly_once() {
    let orders: [[u32; 4]; 6] = [
        [0, 1, 2, 3],
        [3, 2, 1, 0],
        [1, 3, 0, 2],
        [2, 0, 3, 1],
        [3, 0, 2, 1],
        [1, 0, 3, 2],
    ];
    for order in orders {
        let mut r = receiver(4);
        let mut link = MockLink::default();
        for seq in order {
            r.handle_incoming(data(seq), &mut link);
            // 重复到达不影响结果
            r.handle_incoming(data(seq), &mut link);
        }
        let expected: Vec<_> = (0..4u8).map(|i| payload(b'a' + i)).collect();
        assert_eq!(link.delivered, expected, "order {order:?}");
        assert_eq!(r.base(), 4);
    }
}

#[test]
fn init_clears_buffer() {
    let mut r = receiver(4);
    let mut link = MockLink::default();
    r.handle_incoming(data(2), &mut link);
    r.handle_incoming(data(0), &mut link);

    r.init();
    assert_eq!(r.base(), 0);
    assert!(!r.is_buffered(2));
    assert_eq!(r.stats().packets_received, 0);
}
