//! UDP client behaviour against live peers.

mod harness;

use std::net::UdpSocket as StdUdpSocket;
use std::time::Duration;

use framesock::server::{EchoOptions, UdpEchoServer};
use framesock::{Config, UdpOptions, UdpSocket};
use harness::msg;

fn echo_server() -> UdpEchoServer {
    UdpEchoServer::bind("127.0.0.1:0", EchoOptions::new()).unwrap()
}

fn udp_socket(port: u16) -> UdpSocket {
    UdpSocket::udp(UdpOptions::new("127.0.0.1", port), Config::new())
}

#[test]
fn test_initialization() {
    let s = udp_socket(2500);
    assert_eq!(s.endpoint().to_string(), "udp://127.0.0.1:2500");
    assert!(!s.is_connected());
}

#[test]
fn test_connect_is_idempotent_and_never_times_out() {
    // Nothing listens; binding the default peer still succeeds.
    let scratch = StdUdpSocket::bind("127.0.0.1:0").unwrap();
    let port = scratch.local_addr().unwrap().port();
    drop(scratch);

    let mut s = UdpSocket::udp(
        UdpOptions::new("127.0.0.1", port),
        Config::new().with_timeout(Duration::from_micros(1)),
    );
    for _ in 0..10 {
        s.connect().unwrap();
        assert_eq!(s.connect_count(), 1);
    }
    s.disconnect();
    s.disconnect();
    assert_eq!(s.disconnect_count(), 1);
}

#[test]
fn test_send_msg_round_trip() {
    let server = echo_server();
    let mut s = udp_socket(server.port());

    for size in [0, 1, 100, 1024, 8 * 1024] {
        let m = msg(size);
        let response = s.send_msg(&m).unwrap();
        assert_eq!(response.len(), size + 2);
        assert_eq!(&response[..size], &m[..]);
    }
    assert_eq!(s.connect_count(), 1);
}

#[test]
fn test_empty_unframed_message_round_trip() {
    let server = UdpEchoServer::bind("127.0.0.1:0", EchoOptions::new().without_separator()).unwrap();
    let mut s = UdpSocket::udp(
        UdpOptions::new("127.0.0.1", server.port()),
        Config::new().without_separator().with_timeout(Duration::from_secs(2)),
    );

    let response = s.send_msg("").unwrap();
    assert!(response.is_empty());
    assert!(s.is_connected());
    assert_eq!(s.disconnect_count(), 0);
}

#[test]
fn test_message_spanning_datagrams() {
    let server = echo_server();
    let mut s = UdpSocket::udp(
        UdpOptions::new("127.0.0.1", server.port()),
        Config::new().with_chunk_size(1024),
    );

    // Goes out as four datagrams; the response is reassembled until the
    // separator arrives.
    let m = msg(4000);
    let response = s.send_msg(&m).unwrap();
    assert_eq!(response.len(), 4002);
    assert!(response.ends_with(b"\r\n"));
}

#[test]
fn test_no_peer_fails_and_disconnects() {
    let scratch = StdUdpSocket::bind("127.0.0.1:0").unwrap();
    let port = scratch.local_addr().unwrap().port();
    drop(scratch);

    let mut s = udp_socket(port);
    let err = s.send_msg("bla").unwrap_err();
    // Either the ICMP port-unreachable surfaces as a refusal, or nothing
    // comes back in time.
    assert!(err.is_peer_failure() || err.is_timeout(), "{err:?}");
    assert!(!s.is_connected());
    assert_eq!(s.disconnect_count(), 1);
}
