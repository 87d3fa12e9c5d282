/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “GEOGET” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use std::time::Duration;
use async_trait::async_trait;
use chrono::{DateTime,Utc};

#[inline] pub fn millis (n: u64)->Duration { Duration::from_millis(n) }
#[inline] pub fn secs (n: u64)->Duration { Duration::from_secs(n) }
#[inline] pub fn minutes (n: u64)->Duration { Duration::from_secs(n * 60) }
#[inline] pub fn hours (n: u64)->Duration { Duration::from_secs(n * 3600) }
#[inline] pub fn days (n: u64)->Duration { Duration::from_secs(n * 86400) }

#[inline]
pub fn utc_now()->DateTime<Utc> {
    Utc::now()
}

/// return minutes since given given DateTime<Utc> (negative if in future)
pub fn elapsed_minutes_since (dt: &DateTime<Utc>) -> i64 {
    let now = chrono::offset::Utc::now();
    (now - *dt).num_minutes()
}

pub fn duration_since (dt_later: &DateTime<Utc>, dt_earlier: &DateTime<Utc>)->Duration {
    if dt_later >= dt_earlier {
        (*dt_later - *dt_earlier).to_std().unwrap() // checked to not be negative
    } else {
        Duration::ZERO
    }
}

/// abstraction of current time and timed waits so that time dependent control flow does not
/// have to be driven by the wall clock (e.g. from tests)
#[async_trait]
pub trait Scheduler: Send + Sync {
    fn now (&self) -> DateTime<Utc>;
    async fn sleep (&self, dur: Duration);
}

/// the Scheduler to use outside of tests
#[derive(Clone)]
pub struct WallClock;

#[async_trait]
impl Scheduler for WallClock {
    fn now (&self) -> DateTime<Utc> { utc_now() }
    async fn sleep (&self, dur: Duration) { tokio::time::sleep(dur).await }
}
