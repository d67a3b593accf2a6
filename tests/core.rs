use crossbeam_channel::Receiver;
use staccato::prelude::*;
use staccato::{NopTransport, SpyTransport, StatsdClient, Transport};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

mod utils;
use utils::run_arc_threaded_test;

fn recv_str(rx: &Receiver<Vec<u8>>) -> String {
    String::from_utf8(rx.recv().unwrap()).unwrap()
}

#[test]
fn test_statsd_client_count() {
    let (rx, transport) = SpyTransport::new();
    let client = StatsdClient::from_transport("client.test", transport);

    client.count("counter.key", 42);

    assert_eq!("client.test.counter.key:42|c", recv_str(&rx));
}

#[test]
fn test_statsd_client_incr_and_decr() {
    let (rx, transport) = SpyTransport::new();
    let client = StatsdClient::from_transport("client.test", transport);

    client.incr("counter.key");
    client.decr("counter.key");

    assert_eq!("client.test.counter.key:1|c", recv_str(&rx));
    assert_eq!("client.test.counter.key:-1|c", recv_str(&rx));
}

#[test]
fn test_statsd_client_time() {
    let (rx, transport) = SpyTransport::new();
    let client = StatsdClient::from_transport("client.test", transport);

    client.time("timer.key", 25);

    assert_eq!("client.test.timer.key:25|ms", recv_str(&rx));
}

#[test]
fn test_statsd_client_time_duration() {
    let (rx, transport) = SpyTransport::new();
    let client = StatsdClient::from_transport("client.test", transport);

    client.time("timer.key", Duration::from_millis(35));

    assert_eq!("client.test.timer.key:35|ms", recv_str(&rx));
}

#[test]
fn test_statsd_client_empty_prefix() {
    let (rx, transport) = SpyTransport::new();
    let client = StatsdClient::from_transport("", transport);

    client.incr("counter.key");

    assert_eq!(".counter.key:1|c", recv_str(&rx));
}

#[test]
fn test_statsd_client_one_packet_per_call() {
    let (rx, transport) = SpyTransport::new();
    let handle = transport.clone();
    let client = StatsdClient::from_transport("client.test", transport);

    client.count("bytes.in", 3);

    let line = recv_str(&rx);
    assert_eq!("client.test.bytes.in:3|c", line);

    let stats = handle.stats();
    assert_eq!(1, stats.channels_opened);
    assert_eq!(1, stats.channels_closed);
    assert_eq!(1, stats.packets_sent);
    assert_eq!(line.len() as u64, stats.bytes_sent);
}

#[test]
fn test_statsd_client_opens_a_channel_per_call() {
    let (rx, transport) = SpyTransport::new();
    let handle = transport.clone();
    let client = StatsdClient::from_transport("client.test", transport);

    client.incr("counter.key");
    client.incr("counter.key");
    client.incr("counter.key");

    for _ in 0..3 {
        let _ = recv_str(&rx);
    }

    let stats = handle.stats();
    assert_eq!(3, stats.channels_opened);
    assert_eq!(3, stats.channels_closed);
}

#[test]
fn test_statsd_client_handler_sees_conversion_failures() {
    let (rx, transport) = SpyTransport::new();
    let count = Arc::new(AtomicUsize::new(0));
    let count_ref = count.clone();

    let client = StatsdClient::builder("client.test", transport)
        .with_error_handler(move |_err| {
            count_ref.fetch_add(1, Ordering::Release);
        })
        .build();

    client.time("timer.key", Duration::from_secs(u64::MAX));

    assert!(rx.try_recv().is_err());
    assert_eq!(1, count.load(Ordering::Acquire));
}

#[test]
fn test_statsd_client_nop_transport_single_threaded() {
    let client = StatsdClient::from_transport("staccato", NopTransport);
    run_arc_threaded_test(client, 1, 1);
}

#[test]
fn test_statsd_client_spy_transport_multi_threaded() {
    let (_rx, transport) = SpyTransport::new();
    let client = StatsdClient::from_transport("staccato", transport);
    run_arc_threaded_test(client, 4, 10);
}
