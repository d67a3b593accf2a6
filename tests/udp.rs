use staccato::prelude::*;
use staccato::{StatsdClient, UdpTransport, DEFAULT_PORT};
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

mod utils;
use utils::run_arc_threaded_test;

fn new_server() -> (UdpSocket, SocketAddr) {
    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    socket.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
    let addr = socket.local_addr().unwrap();

    (socket, addr)
}

fn recv_line(server: &UdpSocket) -> String {
    let mut buf = [0u8; 1024];
    let (n, _addr) = server.recv_from(&mut buf).unwrap();
    String::from_utf8(buf[..n].to_vec()).unwrap()
}

#[test]
fn test_statsd_client_sends_datagrams_over_udp() {
    let (server, addr) = new_server();
    let client = StatsdClient::from_udp_host("staccato.test", addr).unwrap();

    client.incr("udp.counter");
    client.time("udp.timer", 42);

    assert_eq!("staccato.test.udp.counter:1|c", recv_line(&server));
    assert_eq!("staccato.test.udp.timer:42|ms", recv_line(&server));
}

#[test]
fn test_each_metric_is_its_own_datagram() {
    let (server, addr) = new_server();
    let client = StatsdClient::from_udp_host("staccato.test", addr).unwrap();

    client.count("first", 3);
    client.count("second", 3);

    assert_eq!("staccato.test.first:3|c", recv_line(&server));
    assert_eq!("staccato.test.second:3|c", recv_line(&server));
}

#[test]
fn test_udp_transport_with_write_timeout() {
    let (server, addr) = new_server();
    let transport = UdpTransport::with_timeout(addr, Duration::from_millis(100)).unwrap();
    let client = StatsdClient::from_transport("staccato.test", transport);

    client.incr("udp.timeout.counter");

    assert_eq!("staccato.test.udp.timeout.counter:1|c", recv_line(&server));
}

#[test]
fn test_statsd_client_udp_transport_single_threaded() {
    let client = StatsdClient::from_udp_host("staccato", ("127.0.0.1", DEFAULT_PORT)).unwrap();
    run_arc_threaded_test(client, 1, 1);
}

#[test]
fn test_statsd_client_udp_transport_multi_threaded() {
    let client = StatsdClient::from_udp_host("staccato", ("127.0.0.1", DEFAULT_PORT)).unwrap();
    run_arc_threaded_test(client, 4, 10);
}
