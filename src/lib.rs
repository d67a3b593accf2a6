// Staccato - A fire-and-forget Statsd client for Rust
//
// Copyright 2024-2026 The Staccato Project Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A fire-and-forget Statsd client for Rust!
//!
//! Staccato is a small, predictable way to emit Statsd metrics from your
//! application. Emitting methods never return errors and never block on
//! anything slower than a UDP send.
//!
//! ## Features
//!
//! * Support for emitting counters and timings to Statsd over UDP.
//! * Support for alternate backends via the `Transport` trait.
//! * Support for probabilistic sampling, decided once per call and
//!   applied to every metric in the call.
//! * A simple yet flexible API for sending metrics.
//!
//! ## Install
//!
//! To make use of `staccato` in your project, add it as a dependency in
//! your `Cargo.toml` file.
//!
//! ```toml
//! [dependencies]
//! staccato = "x.y.z"
//! ```
//!
//! That's all you need!
//!
//! ## Usage
//!
//! Some examples of how to use Staccato are shown below. The examples
//! start simple and work up to customizing the client for production use.
//!
//! ### Simple Use
//!
//! Simple usage of Staccato is shown below. In this example, we just
//! import the client, create an instance that will write to some
//! imaginary metrics server, and send a few metrics.
//!
//! ```rust,no_run
//! use staccato::prelude::*;
//! use staccato::{StatsdClient, DEFAULT_PORT};
//!
//! // Create client that will write to the given host over UDP.
//! //
//! // Note that you'll probably want to actually handle any errors creating
//! // the client when you use it for real in your application. We're just
//! // using .unwrap() here since this is an example!
//! let host = ("metrics.example.com", DEFAULT_PORT);
//! let client = StatsdClient::from_udp_host("my.metrics", host).unwrap();
//!
//! // Emit metrics!
//! client.incr("some.counter");
//! client.time("some.methodCall", 42);
//! client.count("some.value", 5);
//! ```
//!
//! ### How Metrics Are Sent
//!
//! Every emitting call is self contained: the client opens a fresh
//! channel to the server, writes one datagram per metric in the call,
//! and closes the channel again. There is no connection state held
//! between calls, no buffering, and no background thread. A process
//! that emits a metric and exits immediately afterwards loses nothing.
//!
//! The flip side is that each call costs a socket. If you are emitting
//! metrics in an extremely hot loop, use the sampled variants of the
//! emitting methods to thin the traffic out.
//!
//! ### Sampled Metrics
//!
//! High traffic paths can emit a fraction of their metrics and let the
//! server scale the values back up. Each sampled call makes a single
//! random draw: either the metric is sent, with the rate attached so
//! the server can compensate, or it is silently skipped. Rates of 1.0
//! or more always send (and leave the rate off the wire format), rates
//! of 0.0 or less never send.
//!
//! ```rust,no_run
//! use staccato::prelude::*;
//! use staccato::{StatsdClient, DEFAULT_PORT};
//!
//! let host = ("metrics.example.com", DEFAULT_PORT);
//! let client = StatsdClient::from_udp_host("my.app", host).unwrap();
//!
//! // Sent roughly every tenth call, as "my.app.request.handled:1|c|@0.100000"
//! client.incr_sampled("request.handled", 0.1);
//! client.time_sampled("request.duration", 35, 0.1);
//! ```
//!
//! ### Implemented Traits
//!
//! Each of the methods that the Staccato `StatsdClient` struct uses to
//! send metrics are implemented as a trait. There is also a trait that
//! combines all of these other traits. If we want, we can just use one
//! of the trait types to refer to the client instance. This might be
//! useful to you if you'd like to swap out the actual Staccato client
//! with a dummy version when you are unit testing your code or want to
//! abstract away all the implementation details of the client being
//! used behind a trait and pointer.
//!
//! Each of these traits are exported in the prelude module. They are
//! also available in the main module but aren't typically used like
//! that.
//!
//! ```rust,no_run
//! use staccato::prelude::*;
//! use staccato::{StatsdClient, DEFAULT_PORT};
//!
//! pub struct User {
//!     id: u64,
//!     username: String,
//!     email: String
//! }
//!
//!
//! // Here's a simple data store that doesn't do anything except use a
//! // metric client to count the lookups made against it.
//! pub struct UserStore {
//!     metrics: Box<dyn MetricClient>
//! }
//!
//!
//! impl UserStore {
//!     // Create a new instance that will use the StatsdClient
//!     pub fn new<T: MetricClient + 'static>(metrics: T) -> UserStore {
//!         UserStore { metrics: Box::new(metrics) }
//!     }
//!
//!     /// Get a user by their ID
//!     pub fn user_by_id(&self, id: u64) -> Option<User> {
//!         self.metrics.incr("user.lookup");
//!         None
//!     }
//! }
//!
//!
//! // Create a new Statsd client that writes to "metrics.example.com"
//! let host = ("metrics.example.com", DEFAULT_PORT);
//! let metrics = StatsdClient::from_udp_host("store.example", host).unwrap();
//!
//! // Create a new instance of the store that will use the client
//! let store = UserStore::new(metrics);
//!
//! // Try to look a user up by ID!
//! match store.user_by_id(123) {
//!     Some(u) => println!("Found a user!"),
//!     None => println!("No user!")
//! };
//! ```
//!
//! ### Error Handling
//!
//! The emitting methods of the client don't return a `Result`: metrics
//! are fire-and-forget, and your application shouldn't have to deal
//! with an unreachable metrics server inline with the rest of your
//! code. In order to handle this, Staccato allows you to set a default
//! error handler. This handler is invoked when there are errors sending
//! metrics so that the calling code doesn't have to deal with them.
//!
//! If you don't set a handler, errors are logged at `WARN` level via
//! the [`log`](https://docs.rs/log) crate facade and then discarded.
//!
//! ```rust,no_run
//! use staccato::prelude::*;
//! use staccato::{MetricError, StatsdClient, NopTransport};
//!
//! fn my_error_handler(err: MetricError) {
//!     println!("Metric error! {}", err);
//! }
//!
//! let client = StatsdClient::builder("prefix", NopTransport)
//!     .with_error_handler(my_error_handler)
//!     .build();
//!
//! client.count("some.counter", 42);
//! ```
//!
//! ### Custom Transports
//!
//! The Staccato `StatsdClient` uses implementations of the `Transport`
//! trait to reach a metric server. Most users of the Staccato library
//! will want `UdpTransport`, which the convenience constructors use.
//!
//! However, maybe you want to do something not covered by an existing
//! transport. An example of creating a custom transport is below.
//!
//! ```rust,no_run
//! use std::io;
//! use staccato::prelude::*;
//! use staccato::{Channel, StatsdClient, Transport};
//!
//! pub struct MyTransport;
//!
//! pub struct MyChannel;
//!
//! impl Channel for MyChannel {
//!     fn send(&mut self, payload: &[u8]) -> io::Result<usize> {
//!         // Your custom payload handling goes here!
//!         Ok(payload.len())
//!     }
//! }
//!
//! impl Transport for MyTransport {
//!     fn open_channel(&self) -> io::Result<Box<dyn Channel>> {
//!         Ok(Box::new(MyChannel))
//!     }
//! }
//!
//! let client = StatsdClient::from_transport("my.prefix", MyTransport);
//!
//! client.count("my.counter.thing", 42);
//! client.time("my.method.time", 25);
//! ```
//!
//! ### UDP Write Timeouts
//!
//! UDP sends to a local buffer rarely block, but when they do you may
//! not want the emitting thread stuck behind them. The UDP transport
//! can set a write timeout on each channel it opens, as demonstrated
//! below.
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use staccato::prelude::*;
//! use staccato::{StatsdClient, UdpTransport, DEFAULT_PORT};
//!
//! let host = ("metrics.example.com", DEFAULT_PORT);
//! let transport = UdpTransport::with_timeout(host, Duration::from_millis(1)).unwrap();
//! let client = StatsdClient::from_transport("my.prefix", transport);
//!
//! client.count("my.counter.thing", 29);
//! client.time("my.service.call", 214);
//! client.incr("some.event");
//! ```

#![forbid(unsafe_code)]

pub const DEFAULT_PORT: u16 = 8125;

pub use self::client::{
    Counted, MetricClient, StatsdClient, StatsdClientBuilder, Timed, ToTimerValue,
};

pub use self::encode::MetricValue;

pub use self::sampler::Sampler;

pub use self::transport::{Channel, NopTransport, SpyTransport, Transport, TransportStats, UdpTransport};

pub use self::types::{ErrorKind, MetricError, MetricResult};

mod client;
mod encode;
pub mod prelude;
mod sampler;
mod sender;
mod transport;
mod types;
