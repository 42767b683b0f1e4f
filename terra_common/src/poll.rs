/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */


//! bounded polling for predicates that become true asynchronously (e.g. file visibility)

use std::time::Duration;
use async_trait::async_trait;
use serde::{Deserialize,Serialize};

use crate::datetime::{deserialize_duration, serialize_duration, secs};

/// wait for a predicate to hold within `max_attempts` checks that are `interval` apart
#[derive(Deserialize,Serialize,Debug,Clone,PartialEq)]
pub struct PollPolicy {
    pub max_attempts: u32,

    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub interval: Duration,
}

impl PollPolicy {
    pub fn new (max_attempts: u32, interval: Duration)->Self {
        PollPolicy { max_attempts, interval }
    }

    /// upper bound for how long a poll can take
    pub fn max_wait (&self)->Duration {
        self.interval * self.max_attempts.saturating_sub(1)
    }
}

impl Default for PollPolicy {
    fn default()->Self {
        PollPolicy { max_attempts: 10, interval: secs(1) }
    }
}

/// the time source used while polling. Tests use a fake clock that does not suspend
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep (&self, dur: Duration);
}

#[derive(Debug,Clone,Copy,Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep (&self, dur: Duration) {
        tokio::time::sleep(dur).await
    }
}

/// check `pred` up to `policy.max_attempts` times, sleeping `policy.interval` between checks.
/// Returns the number of the attempt that succeeded (starting at 1), or None if the predicate never held
pub async fn poll_until<F> (policy: &PollPolicy, clock: &dyn Clock, mut pred: F)->Option<u32> where F: FnMut()->bool {
    for attempt in 1..=policy.max_attempts {
        if pred() { return Some(attempt) }
        if attempt < policy.max_attempts {
            clock.sleep( policy.interval).await;
        }
    }
    None
}
