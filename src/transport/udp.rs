// Staccato - A fire-and-forget Statsd client for Rust
//
// Copyright 2024-2026 The Staccato Project Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::Duration;

use crate::transport::core::{Channel, ChannelStats, Transport, TransportStats};
use crate::types::{ErrorKind, MetricError, MetricResult};

/// Attempt to convert anything implementing the `ToSocketAddrs` trait
/// into a concrete `SocketAddr` instance, returning an `InvalidInput`
/// error if the address could not be parsed.
// Constructors take addresses by value so there's no point in changing
// this to be pass by reference.
#[allow(clippy::needless_pass_by_value)]
fn get_addr<A: ToSocketAddrs>(addr: A) -> MetricResult<SocketAddr> {
    match addr.to_socket_addrs()?.next() {
        Some(addr) => Ok(addr),
        None => Err(MetricError::from((
            ErrorKind::InvalidInput,
            "No socket addresses yielded",
        ))),
    }
}

/// Implementation of a `Transport` that sends each metric line as a UDP
/// datagram.
///
/// The destination address is resolved once, when the transport is
/// created, so a bad hostname surfaces as a constructor error rather
/// than failing every send. Each send then opens a fresh socket bound
/// to the wildcard address of the destination's family, connects it to
/// the destination, and closes it again when the send completes.
#[derive(Debug)]
pub struct UdpTransport {
    addr: SocketAddr,
    timeout: Option<Duration>,
    stats: ChannelStats,
}

impl UdpTransport {
    /// Construct a new `UdpTransport` for the given destination.
    ///
    /// # Example
    ///
    /// ```
    /// use staccato::{UdpTransport, DEFAULT_PORT};
    ///
    /// let transport = UdpTransport::new(("localhost", DEFAULT_PORT)).unwrap();
    /// ```
    ///
    /// # Failures
    ///
    /// This method may fail if:
    ///
    /// * It is unable to resolve the hostname of the metric server.
    /// * The host address is otherwise unable to be parsed
    pub fn new<A>(addr: A) -> MetricResult<UdpTransport>
    where
        A: ToSocketAddrs,
    {
        Ok(UdpTransport {
            addr: get_addr(addr)?,
            timeout: None,
            stats: ChannelStats::default(),
        })
    }

    /// Construct a new `UdpTransport` whose sockets use the given write
    /// timeout.
    ///
    /// Sends over UDP rarely block but they can, for example when the
    /// local socket buffer is full. A write timeout bounds how long a
    /// send may stall the calling thread.
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use staccato::{UdpTransport, DEFAULT_PORT};
    ///
    /// let timeout = Duration::from_millis(50);
    /// let transport = UdpTransport::with_timeout(("localhost", DEFAULT_PORT), timeout).unwrap();
    /// ```
    ///
    /// # Failures
    ///
    /// This method may fail if:
    ///
    /// * It is unable to resolve the hostname of the metric server.
    /// * The host address is otherwise unable to be parsed
    pub fn with_timeout<A>(addr: A, timeout: Duration) -> MetricResult<UdpTransport>
    where
        A: ToSocketAddrs,
    {
        Ok(UdpTransport {
            addr: get_addr(addr)?,
            timeout: Some(timeout),
            stats: ChannelStats::default(),
        })
    }
}

impl Transport for UdpTransport {
    fn open_channel(&self) -> io::Result<Box<dyn Channel>> {
        let local = if self.addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };

        let socket = UdpSocket::bind(local)?;
        socket.connect(self.addr)?;
        if let Some(timeout) = self.timeout {
            socket.set_write_timeout(Some(timeout))?;
        }

        self.stats.incr_channels_opened();
        Ok(Box::new(UdpChannel {
            socket,
            stats: self.stats.clone(),
        }))
    }

    fn stats(&self) -> TransportStats {
        (&self.stats).into()
    }
}

#[derive(Debug)]
struct UdpChannel {
    socket: UdpSocket,
    stats: ChannelStats,
}

impl Channel for UdpChannel {
    fn send(&mut self, payload: &[u8]) -> io::Result<usize> {
        self.stats.update(self.socket.send(payload), payload.len())
    }
}

impl Drop for UdpChannel {
    fn drop(&mut self) {
        self.stats.incr_channels_closed();
    }
}

#[cfg(test)]
mod tests {
    use super::{get_addr, UdpTransport};
    use crate::transport::core::Transport;
    use std::time::Duration;

    #[test]
    fn test_get_addr_bad_address() {
        let res = get_addr("asdf");
        assert!(res.is_err());
    }

    #[test]
    fn test_get_addr_valid_address() {
        let res = get_addr("127.0.0.1:8125");
        assert!(res.is_ok());
    }

    #[test]
    fn test_udp_transport_bad_address() {
        let res = UdpTransport::new("asdf");
        assert!(res.is_err());
    }

    #[test]
    fn test_udp_transport_send() {
        let transport = UdpTransport::new("127.0.0.1:8125").unwrap();
        let mut channel = transport.open_channel().unwrap();
        assert_eq!(7, channel.send(b"buz:1|c").unwrap());
    }

    #[test]
    fn test_udp_transport_send_with_timeout() {
        let transport = UdpTransport::with_timeout("127.0.0.1:8125", Duration::from_millis(100)).unwrap();
        let mut channel = transport.open_channel().unwrap();
        assert_eq!(7, channel.send(b"baz:1|c").unwrap());
    }

    #[test]
    fn test_udp_transport_channel_lifecycle_counted() {
        let transport = UdpTransport::new("127.0.0.1:8125").unwrap();

        {
            let mut channel = transport.open_channel().unwrap();
            channel.send(b"foo:54|c").unwrap();
        }

        let stats = transport.stats();
        assert_eq!(1, stats.channels_opened);
        assert_eq!(1, stats.channels_closed);
        assert_eq!(1, stats.packets_sent);
        assert_eq!(8, stats.bytes_sent);
    }
}
