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
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Telemetry snapshot of the I/O done by a transport.
///
/// Counters are cumulative over the lifetime of the transport. The
/// channel counters make the lifecycle observable: once all sends have
/// returned, a correctly behaving transport reports equal opened and
/// closed counts.
#[derive(Clone, Debug, Default)]
pub struct TransportStats {
    pub channels_opened: u64,
    pub channels_closed: u64,
    pub bytes_sent: u64,
    pub packets_sent: u64,
    pub bytes_dropped: u64,
    pub packets_dropped: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ChannelStats {
    channels_opened: Arc<AtomicU64>,
    channels_closed: Arc<AtomicU64>,
    bytes_sent: Arc<AtomicU64>,
    packets_sent: Arc<AtomicU64>,
    bytes_dropped: Arc<AtomicU64>,
    packets_dropped: Arc<AtomicU64>,
}

impl ChannelStats {
    pub fn incr_channels_opened(&self) {
        self.channels_opened.fetch_add(1, Ordering::Relaxed);
    }

    pub fn incr_channels_closed(&self) {
        self.channels_closed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn incr_bytes_sent(&self, n: u64) {
        self.bytes_sent.fetch_add(n, Ordering::Relaxed);
    }

    pub fn incr_packets_sent(&self) {
        self.packets_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn incr_bytes_dropped(&self, n: u64) {
        self.bytes_dropped.fetch_add(n, Ordering::Relaxed);
    }

    pub fn incr_packets_dropped(&self) {
        self.packets_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn update(&self, res: io::Result<usize>, len: usize) -> io::Result<usize> {
        match res {
            Ok(written) => {
                self.incr_bytes_sent(written as u64);
                self.incr_packets_sent();
                Ok(written)
            }
            Err(e) => {
                self.incr_bytes_dropped(len as u64);
                self.incr_packets_dropped();
                Err(e)
            }
        }
    }
}

impl From<&ChannelStats> for TransportStats {
    fn from(stats: &ChannelStats) -> Self {
        TransportStats {
            channels_opened: stats.channels_opened.load(Ordering::Relaxed),
            channels_closed: stats.channels_closed.load(Ordering::Relaxed),
            bytes_sent: stats.bytes_sent.load(Ordering::Relaxed),
            packets_sent: stats.packets_sent.load(Ordering::Relaxed),
            bytes_dropped: stats.bytes_dropped.load(Ordering::Relaxed),
            packets_dropped: stats.packets_dropped.load(Ordering::Relaxed),
        }
    }
}

/// Single-use handle for sending datagrams during one client call.
///
/// A channel is opened by a `Transport` at the start of a send, carries
/// every line of that send, and releases whatever resources it holds
/// when dropped. Channels are never reused across sends.
pub trait Channel {
    /// Send one payload as a single datagram and return the number of
    /// bytes written or an I/O error.
    fn send(&mut self, payload: &[u8]) -> io::Result<usize>;
}

/// Trait for transports that open per-send channels to a Statsd server.
///
/// A transport is a factory: every send asks it for a fresh `Channel`,
/// writes each metric line as its own datagram, and drops the channel
/// when the send finishes. Payloads are in the canonical text format
/// with no trailing newline. Examples of each supported metric type are
/// given below.
///
/// ## Counter
///
/// ``` text
/// some.counter:123|c
/// ```
///
/// ## Timer
///
/// ``` text
/// some.timer:456|ms
/// ```
///
/// When a sample rate is in effect, lines carry a trailer:
///
/// ``` text
/// some.counter:123|c|@0.100000
/// ```
///
/// See the [Statsd spec](https://github.com/b/statsd_spec) for more
/// information.
pub trait Transport {
    /// Open a channel for a single send.
    ///
    /// Implementations should acquire whatever resources a channel
    /// needs here and release them in the channel's `Drop` impl, so
    /// that a failed open leaves nothing behind.
    fn open_channel(&self) -> io::Result<Box<dyn Channel>>;

    /// Return I/O telemetry like bytes / packets sent or dropped.
    ///
    /// Note that not all transports implement this method and the default
    /// implementation returns zeros.
    fn stats(&self) -> TransportStats {
        TransportStats::default()
    }
}

/// Implementation of a `Transport` whose channels discard all payloads.
///
/// Useful for disabling metric collection or unit tests.
#[derive(Debug, Clone)]
pub struct NopTransport;

impl Transport for NopTransport {
    fn open_channel(&self) -> io::Result<Box<dyn Channel>> {
        Ok(Box::new(NopChannel))
    }
}

#[derive(Debug)]
struct NopChannel;

impl Channel for NopChannel {
    fn send(&mut self, _payload: &[u8]) -> io::Result<usize> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::{ChannelStats, NopTransport, Transport, TransportStats};
    use std::io;

    #[test]
    fn test_nop_transport() {
        let transport = NopTransport;
        let mut channel = transport.open_channel().unwrap();
        assert_eq!(0, channel.send(b"baz:4|c").unwrap());
    }

    #[test]
    fn test_nop_transport_stats_all_zero() {
        let transport = NopTransport;
        let _ = transport.open_channel().unwrap();
        let stats = transport.stats();

        assert_eq!(0, stats.channels_opened);
        assert_eq!(0, stats.packets_sent);
    }

    #[test]
    fn test_channel_stats_update_success() {
        let stats = ChannelStats::default();
        let res = stats.update(Ok(7), 7);
        assert_eq!(7, res.unwrap());

        let snapshot = TransportStats::from(&stats);
        assert_eq!(7, snapshot.bytes_sent);
        assert_eq!(1, snapshot.packets_sent);
        assert_eq!(0, snapshot.packets_dropped);
    }

    #[test]
    fn test_channel_stats_update_failure() {
        let stats = ChannelStats::default();
        let res = stats.update(Err(io::Error::from(io::ErrorKind::Other)), 7);
        assert!(res.is_err());

        let snapshot = TransportStats::from(&stats);
        assert_eq!(7, snapshot.bytes_dropped);
        assert_eq!(1, snapshot.packets_dropped);
        assert_eq!(0, snapshot.packets_sent);
    }
}
