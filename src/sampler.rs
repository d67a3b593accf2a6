// Staccato - A fire-and-forget Statsd client for Rust
//
// Copyright 2024-2026 The Staccato Project Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::fmt;
use std::sync::Mutex;

/// Source of admission decisions for sampled sends.
///
/// A sampler owns one generator for its entire lifetime, shared by every
/// send that consults it. Each sampled send draws a single value no
/// matter how many metrics it carries, so a batch is either recorded
/// whole or dropped whole.
///
/// The default generator is seeded once from OS entropy. Tests that need
/// reproducible admission sequences can supply their own seeded
/// generator via `with_rng`.
///
/// # Examples
///
/// ```
/// use staccato::Sampler;
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let default = Sampler::new();
/// let seeded = Sampler::with_rng(StdRng::seed_from_u64(42));
/// ```
pub struct Sampler {
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl Sampler {
    /// Create a sampler drawing from an OS-seeded generator.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create a sampler drawing from the given generator.
    pub fn with_rng<R>(rng: R) -> Self
    where
        R: RngCore + Send + 'static,
    {
        Sampler {
            rng: Mutex::new(Box::new(rng)),
        }
    }

    /// Decide whether a send at the given rate goes out.
    ///
    /// Rates of 1.0 or more always pass without a draw and rates of 0.0
    /// or less never pass. Anything in between draws one value in
    /// `[0, 1)` and passes when the draw does not exceed the rate.
    pub(crate) fn admit(&self, rate: f32) -> bool {
        if rate >= 1.0 {
            return true;
        }

        if rate <= 0.0 {
            return false;
        }

        let mut rng = self.rng.lock().unwrap();
        rng.gen::<f32>() <= rate
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Sampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sampler {{ rng: ... }}")
    }
}
