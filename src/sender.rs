// Staccato - A fire-and-forget Statsd client for Rust
//
// Copyright 2024-2026 The Staccato Project Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::encode::{Metric, MetricFormatter};
use crate::sampler::Sampler;
use crate::transport::Transport;
use crate::types::MetricError;
use std::panic::RefUnwindSafe;

/// Dispatch pipeline shared by every metric emitting method of the
/// client.
///
/// Each send makes a single admission decision for the whole batch and
/// opens a single channel for the whole batch, writing each metric as
/// its own datagram. Failures are routed to the error handler instead
/// of being returned: a failed channel open abandons the send before
/// any writes, a failed write only costs that one line.
pub(crate) struct Sender {
    transport: Box<dyn Transport + Sync + Send + RefUnwindSafe>,
    sampler: Sampler,
    errors: Box<dyn Fn(MetricError) + Sync + Send + RefUnwindSafe>,
}

impl Sender {
    pub(crate) fn new(
        transport: Box<dyn Transport + Sync + Send + RefUnwindSafe>,
        sampler: Sampler,
        errors: Box<dyn Fn(MetricError) + Sync + Send + RefUnwindSafe>,
    ) -> Sender {
        Sender {
            transport,
            sampler,
            errors,
        }
    }

    /// Emit a batch of metrics at the given sample rate.
    ///
    /// Rates of 1.0 or more send unconditionally and leave the trailer
    /// off the wire format. Anything else is subject to one random
    /// draw covering the entire batch, and admitted lines carry the
    /// rate so the server can scale the values back up.
    pub(crate) fn send(&self, prefix: &str, metrics: &[Metric<'_>], rate: f32) {
        if !self.sampler.admit(rate) {
            return;
        }

        let applied = if rate < 1.0 { Some(rate) } else { None };
        let formatter = MetricFormatter::new(prefix, applied);

        let mut channel = match self.transport.open_channel() {
            Ok(channel) => channel,
            Err(e) => {
                self.consume_error(e.into());
                return;
            }
        };

        for metric in metrics {
            let line = formatter.format(metric);
            if let Err(e) = channel.send(line.as_bytes()) {
                self.consume_error(e.into());
            }
        }
    }

    /// Hand an error that could not be returned to the caller to the
    /// configured handler.
    pub(crate) fn consume_error(&self, err: MetricError) {
        (self.errors)(err);
    }
}
