// Staccato - A fire-and-forget Statsd client for Rust
//
// Copyright 2024-2026 The Staccato Project Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::encode::{Metric, MetricValue};
use crate::sampler::Sampler;
use crate::sender::Sender;
use crate::transport::{Transport, UdpTransport};
use crate::types::{ErrorKind, MetricError, MetricResult};
use log::warn;
use std::fmt;
use std::net::ToSocketAddrs;
use std::panic::RefUnwindSafe;
use std::time::Duration;

/// Conversion trait for valid values for timings
///
/// This trait must be implemented for any types that are used as timing
/// values (currently `u64` and `Duration`). This trait is exposed to
/// allow consumers of the library to implement it for their own types.
pub trait ToTimerValue {
    fn try_to_value(self) -> MetricResult<MetricValue>;
}

impl ToTimerValue for u64 {
    fn try_to_value(self) -> MetricResult<MetricValue> {
        Ok(MetricValue::Unsigned(self))
    }
}

impl ToTimerValue for Duration {
    fn try_to_value(self) -> MetricResult<MetricValue> {
        let as_millis = self.as_millis();
        if as_millis > u64::MAX as u128 {
            Err(MetricError::from((ErrorKind::InvalidInput, "u64 overflow")))
        } else {
            Ok(MetricValue::Unsigned(as_millis as u64))
        }
    }
}

/// Trait for incrementing and decrementing counters.
///
/// Counters are simple values incremented or decremented by the client,
/// flushed by the server at each interval. Rates, sums, and averages over
/// each interval are computed server side.
///
/// The default implementations delegate down to `count_sampled` with a
/// sample rate of 1.0, meaning every call results in a datagram being
/// emitted.
///
/// See the [Statsd spec](https://github.com/b/statsd_spec) for more
/// information.
///
/// # Example
///
/// ```
/// use staccato::prelude::*;
/// use staccato::{NopTransport, StatsdClient};
///
/// let client = StatsdClient::from_transport("my.app", NopTransport);
///
/// client.incr("user.logins");
/// client.count("user.sessions", 4);
/// ```
pub trait Counted {
    /// Increment the counter by `1`
    fn incr(&self, key: &str) {
        self.count(key, 1);
    }

    /// Increment the counter by `1`, subject to the given sample rate
    fn incr_sampled(&self, key: &str, rate: f32) {
        self.count_sampled(key, 1, rate);
    }

    /// Decrement the counter by `1`
    fn decr(&self, key: &str) {
        self.count(key, -1);
    }

    /// Decrement the counter by `1`, subject to the given sample rate
    fn decr_sampled(&self, key: &str, rate: f32) {
        self.count_sampled(key, -1, rate);
    }

    /// Adjust the counter by the given delta
    fn count(&self, key: &str, count: i64) {
        self.count_sampled(key, count, 1.0);
    }

    /// Adjust the counter by the given delta, subject to the given
    /// sample rate
    fn count_sampled(&self, key: &str, count: i64, rate: f32);
}

/// Trait for recording timings in milliseconds.
///
/// Timings are a positive number of milliseconds between a start and end
/// time. Examples include time taken to render a web page or time taken
/// for a database call to return.
///
/// The default implementation of `time` delegates down to `time_sampled`
/// with a sample rate of 1.0, meaning every call results in a datagram
/// being emitted.
///
/// Both `u64` and `Duration` are valid types for timings. `Duration`
/// values are truncated to milliseconds and must fit a `u64` after
/// conversion. Values that do not fit are handed to the error handler
/// and nothing is emitted.
///
/// See the [Statsd spec](https://github.com/b/statsd_spec) for more
/// information.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use staccato::prelude::*;
/// use staccato::{NopTransport, StatsdClient};
///
/// let client = StatsdClient::from_transport("my.app", NopTransport);
///
/// client.time("page.render", 42);
/// client.time("page.render", Duration::from_millis(42));
/// ```
pub trait Timed<T>
where
    T: ToTimerValue,
{
    /// Record a timing in milliseconds
    fn time(&self, key: &str, time: T) {
        self.time_sampled(key, time, 1.0);
    }

    /// Record a timing in milliseconds, subject to the given sample rate
    fn time_sampled(&self, key: &str, time: T, rate: f32);
}

/// Trait that encompasses all other traits for sending metrics.
///
/// If you wish to use the `StatsdClient` with a generic type or place a
/// `StatsdClient` instance behind a pointer (such as a `Box`) this will
/// allow you to reference all the implemented methods for recording
/// metrics, while using a single trait. An example of this is shown
/// below.
///
/// ```
/// use std::time::Duration;
/// use staccato::prelude::*;
/// use staccato::{NopTransport, StatsdClient};
///
/// let client: Box<dyn MetricClient> = Box::new(StatsdClient::from_transport(
///     "prefix", NopTransport));
///
/// client.incr("some.counter");
/// client.time("some.timer", 42);
/// client.time("some.timer", Duration::from_millis(42));
/// ```
pub trait MetricClient: Counted + Timed<u64> + Timed<Duration> {}

/// Client for Statsd that implements various traits to record metrics.
///
/// # Traits
///
/// The client is the main entry point for users of this library. It
/// supports several traits for recording different types of metrics.
/// The traits are exposed so that the rest of your application can be
/// typed against them (rather than the concrete client) if desired.
///
/// * `Counted` for emitting counters.
/// * `Timed` for emitting timings.
/// * `MetricClient` for a combination of all of the above.
///
/// Emitting methods do not return results. The client is
/// fire-and-forget: metrics that cannot be sent invoke the configured
/// error handler and your application carries on.
///
/// # Transports
///
/// The client uses some implementation of the `Transport` trait to open
/// a channel to a Statsd server for each call, write one datagram per
/// metric, and close the channel again. In production this is typically
/// `UdpTransport`. Test oriented implementations (`NopTransport` and
/// `SpyTransport`) are also available.
///
/// # Threading
///
/// The client is designed to work in a multithreaded application. All
/// parts of the client can be shared between threads (i.e. it is `Send`
/// and `Sync`). An example of how to use the client in a multithreaded
/// environment is given below.
///
/// In this example we put the client in an `Arc` so that it can be
/// shared by as many threads as needed.
///
/// ```no_run
/// use std::sync::Arc;
/// use std::thread;
/// use staccato::prelude::*;
/// use staccato::{StatsdClient, DEFAULT_PORT};
///
/// let client = Arc::new(
///     StatsdClient::from_udp_host("my.app", ("localhost", DEFAULT_PORT)).unwrap(),
/// );
/// let client_ref = client.clone();
///
/// let t = thread::spawn(move || {
///     client_ref.incr("request.handled");
/// });
///
/// client.time("request.duration", 42);
/// t.join().unwrap();
/// ```
pub struct StatsdClient {
    prefix: String,
    sender: Sender,
}

impl StatsdClient {
    /// Create a new client instance that will use the given prefix for
    /// all metrics emitted to the given transport.
    ///
    /// The prefix is joined to each metric key with a `.` separator.
    /// An empty prefix is allowed and results in keys that begin with
    /// the separator.
    ///
    /// # Example
    ///
    /// ```
    /// use staccato::{NopTransport, StatsdClient};
    ///
    /// let client = StatsdClient::from_transport("my.app", NopTransport);
    /// ```
    pub fn from_transport<T>(prefix: &str, transport: T) -> Self
    where
        T: Transport + Sync + Send + RefUnwindSafe + 'static,
    {
        Self::builder(prefix, transport).build()
    }

    /// Create a new client instance that will use the given prefix to
    /// send metrics to the given host over UDP.
    ///
    /// The host address is resolved once, when the client is created.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use staccato::{StatsdClient, DEFAULT_PORT};
    ///
    /// let client = StatsdClient::from_udp_host("my.app", ("localhost", DEFAULT_PORT));
    /// ```
    ///
    /// # Failures
    ///
    /// This method may fail if:
    ///
    /// * It is unable to resolve the hostname of the metric server.
    /// * The host address is otherwise unable to be parsed.
    pub fn from_udp_host<A>(prefix: &str, host: A) -> MetricResult<Self>
    where
        A: ToSocketAddrs,
    {
        let transport = UdpTransport::new(host)?;
        Ok(Self::from_transport(prefix, transport))
    }

    /// Create a new builder with the provided prefix and transport.
    ///
    /// A prefix and a transport are required to create a new client
    /// instance. All other optional customizations can be set by
    /// calling methods on the returned builder. Any customizations that
    /// aren't set by the caller will use defaults.
    ///
    /// General defaults:
    ///
    /// * Sample rate draws are made with a generator seeded from system
    ///   entropy once, when the client is created.
    /// * Errors encountered when sending metrics are logged at `WARN`
    ///   level and otherwise discarded.
    ///
    /// # Example
    ///
    /// ```
    /// use staccato::prelude::*;
    /// use staccato::{MetricError, NopTransport, StatsdClient};
    ///
    /// fn my_error_handler(err: MetricError) {
    ///     eprintln!("metric error: {}", err);
    /// }
    ///
    /// let client = StatsdClient::builder("my.app", NopTransport)
    ///     .with_error_handler(my_error_handler)
    ///     .build();
    ///
    /// client.incr("some.counter");
    /// ```
    pub fn builder<T>(prefix: &str, transport: T) -> StatsdClientBuilder
    where
        T: Transport + Sync + Send + RefUnwindSafe + 'static,
    {
        StatsdClientBuilder::new(prefix, transport)
    }
}

impl Counted for StatsdClient {
    fn count_sampled(&self, key: &str, count: i64, rate: f32) {
        let metric = Metric::counter(key, MetricValue::Signed(count));
        self.sender.send(&self.prefix, &[metric], rate);
    }
}

impl<T> Timed<T> for StatsdClient
where
    T: ToTimerValue,
{
    fn time_sampled(&self, key: &str, time: T, rate: f32) {
        match time.try_to_value() {
            Ok(value) => {
                let metric = Metric::timer(key, value);
                self.sender.send(&self.prefix, &[metric], rate);
            }
            Err(e) => self.sender.consume_error(e),
        }
    }
}

impl MetricClient for StatsdClient {}

impl fmt::Debug for StatsdClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StatsdClient {{ prefix: {:?}, transport: ..., sampler: ..., errors: ... }}",
            self.prefix
        )
    }
}

/// Builder for creating and customizing `StatsdClient` instances.
///
/// Instances of the builder should be created by calling the `builder`
/// method on the `StatsdClient` struct.
///
/// # Example
///
/// ```
/// use staccato::prelude::*;
/// use staccato::{MetricError, NopTransport, Sampler, StatsdClient};
///
/// fn my_error_handler(err: MetricError) {
///     eprintln!("metric error: {}", err);
/// }
///
/// let client = StatsdClient::builder("my.app", NopTransport)
///     .with_error_handler(my_error_handler)
///     .with_sampler(Sampler::new())
///     .build();
///
/// client.incr("some.counter");
/// client.time("some.timer", 42);
/// ```
pub struct StatsdClientBuilder {
    // required
    prefix: String,
    transport: Box<dyn Transport + Sync + Send + RefUnwindSafe>,

    // optional with defaults
    errors: Box<dyn Fn(MetricError) + Sync + Send + RefUnwindSafe>,
    sampler: Sampler,
}

impl StatsdClientBuilder {
    fn new<T>(prefix: &str, transport: T) -> Self
    where
        T: Transport + Sync + Send + RefUnwindSafe + 'static,
    {
        StatsdClientBuilder {
            // required
            prefix: prefix.to_string(),
            transport: Box::new(transport),

            // optional with defaults
            errors: Box::new(default_error_handler),
            sampler: Sampler::new(),
        }
    }

    /// Set an error handler to use for metrics that could not be sent.
    ///
    /// The emitting methods of the client do not return results, so the
    /// handler is the only place send failures are observable. The
    /// handler is run in the thread that tried to emit the metric.
    pub fn with_error_handler<F>(mut self, errors: F) -> Self
    where
        F: Fn(MetricError) + Sync + Send + RefUnwindSafe + 'static,
    {
        self.errors = Box::new(errors);
        self
    }

    /// Set the sampler consulted by sends with a rate below 1.0.
    ///
    /// Passing a sampler built from a seeded generator makes sampling
    /// decisions deterministic, which is useful for tests.
    pub fn with_sampler(mut self, sampler: Sampler) -> Self {
        self.sampler = sampler;
        self
    }

    /// Construct a new `StatsdClient` instance based on current settings.
    pub fn build(self) -> StatsdClient {
        StatsdClient {
            prefix: self.prefix,
            sender: Sender::new(self.transport, self.sampler, self.errors),
        }
    }
}

#[allow(clippy::needless_pass_by_value)]
fn default_error_handler(err: MetricError) {
    warn!("error sending metric: {}", err);
}
