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
#![allow(unused)]

use std::time::Duration;
use chrono::{TimeZone,Utc};
use geoget_common::datetime::*;

#[test]
fn test_duration_ctors() {
    assert_eq!( secs(20), Duration::from_secs(20));
    assert_eq!( minutes(10), Duration::from_secs(600));
    assert_eq!( hours(2), Duration::from_secs(7200));
    assert_eq!( days(1), Duration::from_secs(86400));
}

#[test]
fn test_duration_since() {
    let t0 = Utc.with_ymd_and_hms( 2026, 8, 20, 12, 0, 0).unwrap();
    let t1 = Utc.with_ymd_and_hms( 2026, 8, 20, 12, 10, 30).unwrap();

    assert_eq!( duration_since( &t1, &t0), Duration::from_secs(630));
    assert_eq!( duration_since( &t0, &t1), Duration::ZERO); // clamped, never negative
}

#[test]
fn test_elapsed_minutes() {
    let past = utc_now() - chrono::Duration::minutes(90);
    let elapsed = elapsed_minutes_since( &past);
    assert!( elapsed >= 90 && elapsed <= 91);
}
