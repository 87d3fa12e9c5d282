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

use std::fs;
use geoget_laads::checksum;

// run with "cargo test test_checksum -- --nocapture"

#[test]
fn test_compute_is_pure () {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.bin");
    fs::write( &path, b"some file contents worth checking").unwrap();

    let c1 = checksum::compute( &path).unwrap();
    let c2 = checksum::compute( &path).unwrap();
    println!("checksum: {c1}");
    assert_eq!( c1, c2);

    assert!( checksum::verify( &path, c1).unwrap());
    assert!( !checksum::verify( &path, c1 ^ 0xffff_ffff).unwrap());
}

#[test]
fn test_known_value () {
    // the standard CRC-32C check input
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("check.bin");
    fs::write( &path, b"123456789").unwrap();

    assert_eq!( checksum::compute( &path).unwrap(), 0xe3069283);
}

#[test]
fn test_compute_detects_change () {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.bin");

    fs::write( &path, b"original contents").unwrap();
    let c1 = checksum::compute( &path).unwrap();

    fs::write( &path, b"originaL contents").unwrap();
    let c2 = checksum::compute( &path).unwrap();

    assert_ne!( c1, c2);
}

#[test]
fn test_compute_missing_file () {
    assert!( checksum::compute( "/no/such/dir/no_such_file.bin").is_err());
}
