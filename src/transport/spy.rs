// Staccato - A fire-and-forget Statsd client for Rust
//
// Copyright 2024-2026 The Staccato Project Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::transport::core::{Channel, ChannelStats, Transport, TransportStats};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TrySendError};
use std::io::{self, ErrorKind};

/// `Transport` implementation that forwards all payloads to the `Sender`
/// half of a queue while callers are given ownership of the `Receiver`
/// half.
///
/// This is not a general purpose transport, rather it's a transport
/// meant for verifying payloads written during the course of
/// integration tests. By default, the queue used is unbounded. The
/// queue size can be limited using the `with_capacity` method.
///
/// Cloning a `SpyTransport` shares the queue and telemetry counters of
/// the original, which lets a test keep one handle for assertions while
/// a client owns the other.
#[derive(Debug, Clone)]
pub struct SpyTransport {
    sender: Sender<Vec<u8>>,
    stats: ChannelStats,
}

impl SpyTransport {
    pub fn new() -> (Receiver<Vec<u8>>, Self) {
        Self::with_queue_capacity(None)
    }

    pub fn with_capacity(queue: usize) -> (Receiver<Vec<u8>>, Self) {
        Self::with_queue_capacity(Some(queue))
    }

    fn with_queue_capacity(queue: Option<usize>) -> (Receiver<Vec<u8>>, Self) {
        let (tx, rx) = new_queue(queue);
        let transport = SpyTransport {
            sender: tx,
            stats: ChannelStats::default(),
        };
        (rx, transport)
    }
}

impl Transport for SpyTransport {
    fn open_channel(&self) -> io::Result<Box<dyn Channel>> {
        self.stats.incr_channels_opened();
        Ok(Box::new(SpyChannel {
            sender: self.sender.clone(),
            stats: self.stats.clone(),
        }))
    }

    fn stats(&self) -> TransportStats {
        (&self.stats).into()
    }
}

#[derive(Debug)]
struct SpyChannel {
    sender: Sender<Vec<u8>>,
    stats: ChannelStats,
}

impl Channel for SpyChannel {
    fn send(&mut self, payload: &[u8]) -> io::Result<usize> {
        self.stats.update(forward_payload(&self.sender, payload), payload.len())
    }
}

impl Drop for SpyChannel {
    fn drop(&mut self) {
        self.stats.incr_channels_closed();
    }
}

fn new_queue(cap: Option<usize>) -> (Sender<Vec<u8>>, Receiver<Vec<u8>>) {
    if let Some(sz) = cap {
        bounded(sz)
    } else {
        unbounded()
    }
}

fn forward_payload(sender: &Sender<Vec<u8>>, payload: &[u8]) -> io::Result<usize> {
    match sender.try_send(payload.to_vec()) {
        Err(TrySendError::Disconnected(_)) => Err(io::Error::new(ErrorKind::Other, "queue disconnected")),
        Err(TrySendError::Full(_)) => Err(io::Error::new(ErrorKind::Other, "queue full")),
        Ok(_) => Ok(payload.len()),
    }
}
