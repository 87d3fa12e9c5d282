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
use chrono::{DateTime,TimeZone,Utc};
use geoget_laads::{OrderLog,OrderStatus};

// run with "cargo test test_order_log -- --nocapture"

fn t0 () -> DateTime<Utc> {
    Utc.with_ymd_and_hms( 2025, 8, 1, 12, 0, 0).unwrap()
}

#[test]
fn test_update_idempotence () {
    let dir = tempfile::tempdir().unwrap();
    let mut log = OrderLog::new( dir.path().join("order_log.json"));

    let t0 = t0();
    assert!( log.update( "50123", OrderStatus::Other("Processing".to_string()), t0));

    // same status again must not touch the recorded transition time
    let t1 = t0 + chrono::Duration::seconds(120);
    assert!( !log.update( "50123", OrderStatus::Other("Processing".to_string()), t1));
    assert_eq!( log.entry("50123").unwrap().time, t0);

    // a status change moves it
    let t2 = t0 + chrono::Duration::seconds(300);
    assert!( log.update( "50123", OrderStatus::Available, t2));
    assert_eq!( log.entry("50123").unwrap().time, t2);
    assert_eq!( log.len(), 1);
}

#[test]
fn test_save_read_roundtrip () {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("order_log.json");

    let mut log = OrderLog::new( &path);
    log.update( "50128753", OrderStatus::Available, t0());
    log.update( "50128754", OrderStatus::VerificationFailed, t0());
    log.save().unwrap();

    let read_back = OrderLog::read( &path).unwrap();
    assert_eq!( read_back.len(), 2);
    assert_eq!( read_back.status("50128753"), Some(&OrderStatus::Available));
    assert_eq!( read_back.status("50128754"), Some(&OrderStatus::VerificationFailed));

    // the stored form uses the human readable status strings and the log time format
    let contents = std::fs::read_to_string( &path).unwrap();
    println!("{contents}");
    assert!( contents.contains( "\"One or more files not verified\""));
    assert!( contents.contains( "2025-08-01_12:00:00"));
}

#[test]
fn test_read_missing () {
    let dir = tempfile::tempdir().unwrap();
    assert!( OrderLog::read( dir.path().join("no_such_log.json")).is_err());

    // read_or_new treats a missing file as the empty log
    let log = OrderLog::read_or_new( dir.path().join("no_such_log.json")).unwrap();
    assert!( log.is_empty());
    assert!( log.all_terminal());
}

#[test]
fn test_terminal_queries () {
    let dir = tempfile::tempdir().unwrap();
    let mut log = OrderLog::new( dir.path().join("order_log.json"));
    let now = t0();

    log.update( "1", OrderStatus::Complete, now);
    log.update( "2", OrderStatus::Canceled, now);
    log.update( "3", OrderStatus::Removed, now);
    log.update( "4", OrderStatus::VerificationFailed, now);
    assert!( log.all_terminal());

    log.update( "5", OrderStatus::Other("Processing".to_string()), now);
    assert!( !log.all_terminal());
    assert_eq!( log.non_terminal_ids(), vec!["5".to_string()]);

    log.update( "6", OrderStatus::Available, now);
    assert_eq!( log.ids_with_status( &OrderStatus::Available), vec!["6".to_string()]);
    assert_eq!( log.non_terminal_ids(), vec!["5".to_string(), "6".to_string()]);
}

#[test]
fn test_elapsed_since_transition () {
    let dir = tempfile::tempdir().unwrap();
    let mut log = OrderLog::new( dir.path().join("order_log.json"));

    let t0 = t0();
    log.update( "1", OrderStatus::Available, t0);

    let now = t0 + chrono::Duration::seconds(630);
    assert_eq!( log.elapsed_since_transition( "1", now), Some(Duration::from_secs(630)));
    assert_eq!( log.elapsed_since_transition( "no-such-order", now), None);
}

#[test]
fn test_status_strings () {
    assert_eq!( OrderStatus::from("Available"), OrderStatus::Available);
    assert_eq!( OrderStatus::from("One or more files not verified"), OrderStatus::VerificationFailed);
    assert_eq!( OrderStatus::from("Processing"), OrderStatus::Other("Processing".to_string()));

    assert_eq!( OrderStatus::VerificationFailed.to_string(), "One or more files not verified");
    assert_eq!( OrderStatus::Other("Processing".to_string()).to_string(), "Processing");

    assert!( OrderStatus::Complete.is_terminal());
    assert!( OrderStatus::VerificationFailed.is_terminal());
    assert!( OrderStatus::Canceled.is_terminal());
    assert!( OrderStatus::Removed.is_terminal());
    assert!( !OrderStatus::Submitted.is_terminal());
    assert!( !OrderStatus::Available.is_terminal());
    assert!( !OrderStatus::Other("Processing".to_string()).is_terminal());
}
