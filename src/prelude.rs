// Staccato - A fire-and-forget Statsd client for Rust
//
// Copyright 2024-2026 The Staccato Project Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Export commonly used parts of Staccato for easy glob imports
//!
//! # Example
//!
//! ```
//! use staccato::prelude::*;
//! use staccato::{NopTransport, StatsdClient};
//!
//! let client = StatsdClient::from_transport("some.prefix", NopTransport);
//!
//! client.incr("some.counter");
//! client.count("some.counter", 9);
//! client.time("some.timer", 23);
//! ```

pub use crate::client::{Counted, MetricClient, Timed};
