// Staccato - A fire-and-forget Statsd client for Rust
//
// Copyright 2024-2026 The Staccato Project Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt::{self, Write};

/// Type of metric that knows how to display itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetricType {
    Counter,
    Timer,
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MetricType::Counter => "c".fmt(f),
            MetricType::Timer => "ms".fmt(f),
        }
    }
}

/// Holder for primitive metric values that knows how to display itself
///
/// This enum is how the various types that are valid for a metric (e.g.
/// types for which `ToTimerValue` is implemented) are represented once
/// converted. Typical use of this library shouldn't require interacting
/// with this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricValue {
    Signed(i64),
    Unsigned(u64),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MetricValue::Signed(v) => v.fmt(f),
            MetricValue::Unsigned(v) => v.fmt(f),
        }
    }
}

/// Single observation to be rendered and sent, borrowing its key from
/// the caller. Instances only live for the duration of one send call.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Metric<'a> {
    key: &'a str,
    val: MetricValue,
    type_: MetricType,
}

impl<'a> Metric<'a> {
    pub(crate) fn counter(key: &'a str, val: MetricValue) -> Metric<'a> {
        Metric {
            key,
            val,
            type_: MetricType::Counter,
        }
    }

    pub(crate) fn timer(key: &'a str, val: MetricValue) -> Metric<'a> {
        Metric {
            key,
            val,
            type_: MetricType::Timer,
        }
    }
}

/// Renderer for the text lines sent to a Statsd server.
///
/// Lines take the form `{prefix}.{key}:{value}|{type}` with an optional
/// `|@{rate}` trailer when a sample rate below 1.0 is in effect. The
/// prefix is joined to the key with a literal `.` unconditionally, so an
/// empty prefix produces a leading dot. Servers reading these lines key
/// on the full string and existing deployments depend on that exact
/// form, so the joining is not normalized here.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MetricFormatter<'a> {
    prefix: &'a str,
    sample_rate: Option<f32>,
}

impl<'a> MetricFormatter<'a> {
    pub(crate) fn new(prefix: &'a str, sample_rate: Option<f32>) -> Self {
        MetricFormatter { prefix, sample_rate }
    }

    #[rustfmt::skip]
    fn size_hint(&self, metric: &Metric<'_>) -> usize {
        // value and rate sizes are estimates, everything else is exact
        let base = self.prefix.len() + 1 /* . */ + metric.key.len() + 1 /* : */
            + 10 /* value */ + 1 /* | */ + 2; /* type */

        if self.sample_rate.is_some() {
            base + 2 /* |@ */ + 8 /* rate */
        } else {
            base
        }
    }

    pub(crate) fn format(&self, metric: &Metric<'_>) -> String {
        let mut out = String::with_capacity(self.size_hint(metric));
        let _ = write!(out, "{}.{}:{}|{}", self.prefix, metric.key, metric.val, metric.type_);
        if let Some(rate) = self.sample_rate {
            // fixed six decimal places, the form servers already parse
            let _ = write!(out, "|@{:.6}", rate);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{Metric, MetricFormatter, MetricType, MetricValue};

    #[test]
    fn test_metric_type_counter_display() {
        assert_eq!("c", MetricType::Counter.to_string());
    }

    #[test]
    fn test_metric_type_timer_display() {
        assert_eq!("ms", MetricType::Timer.to_string());
    }

    #[test]
    fn test_format_counter() {
        let fmt = MetricFormatter::new("app", None);
        let metric = Metric::counter("logins", MetricValue::Signed(1));
        assert_eq!("app.logins:1|c", fmt.format(&metric));
    }

    #[test]
    fn test_format_counter_negative_value() {
        let fmt = MetricFormatter::new("app", None);
        let metric = Metric::counter("sessions", MetricValue::Signed(-1));
        assert_eq!("app.sessions:-1|c", fmt.format(&metric));
    }

    #[test]
    fn test_format_timer() {
        let fmt = MetricFormatter::new("app", None);
        let metric = Metric::timer("req.latency", MetricValue::Unsigned(42));
        assert_eq!("app.req.latency:42|ms", fmt.format(&metric));
    }

    #[test]
    fn test_format_empty_prefix_keeps_dot() {
        let fmt = MetricFormatter::new("", None);
        let metric = Metric::counter("logins", MetricValue::Signed(1));
        assert_eq!(".logins:1|c", fmt.format(&metric));
    }

    #[test]
    fn test_format_with_sample_rate() {
        let fmt = MetricFormatter::new("app", Some(0.5));
        let metric = Metric::counter("logins", MetricValue::Signed(1));
        assert_eq!("app.logins:1|c|@0.500000", fmt.format(&metric));
    }

    #[test]
    fn test_format_timer_with_sample_rate() {
        let fmt = MetricFormatter::new("app", Some(0.1));
        let metric = Metric::timer("req.latency", MetricValue::Unsigned(42));
        assert_eq!("app.req.latency:42|ms|@0.100000", fmt.format(&metric));
    }

    #[test]
    fn test_format_large_unsigned_value() {
        let fmt = MetricFormatter::new("app", None);
        let metric = Metric::timer("req.latency", MetricValue::Unsigned(u64::MAX));
        assert_eq!(format!("app.req.latency:{}|ms", u64::MAX), fmt.format(&metric));
    }
}
