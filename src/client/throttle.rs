// Copyright (c) 2025 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

//! Outbound API call spacing.

use actix_web::rt::time::sleep;
use std::time::{Duration, Instant};

/// Enforces a minimum spacing between consecutive outbound API calls to
/// respect the vendor's request-rate ceiling.
///
/// This is a cooperative wait, not a token bucket: only the gap to the
/// previous call matters, burst counts over a longer window are not capped.
/// The state is owned by one client instance; client operations take
/// `&mut self`, which serializes access at compile time.
#[derive(Debug)]
pub struct Throttle {
    min_interval: Duration,
    last_call: Option<Instant>,
}

impl Throttle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: None,
        }
    }

    /// Wait until at least the minimum interval has elapsed since the
    /// previous `acquire` returned, then record the current time as the new
    /// last-call time.
    ///
    /// The first call never blocks.
    pub async fn acquire(&mut self) {
        if let Some(last_call) = self.last_call {
            let elapsed = last_call.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }
        self.last_call = Some(Instant::now());
    }
}
