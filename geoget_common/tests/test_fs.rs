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

use geoget_common::fs::*;
use regex::Regex;
use std::fs;
use std::path::Path;

// run with "cargo test test_xx -- --nocapture"

#[test]
fn test_matching_files() {
    let re = Regex::new( r".*\.rs").unwrap();
    let dir = Path::new("src");
    let res = matching_files_in_dir( &dir, &re);

    assert!(res.is_ok());

    if let Ok(files) = res {
        assert!( !files.is_empty());
        for f in files {
            println!("{f:?}");
        }
    } else {
        panic!("no matching files in src/ ?")
    }
}

#[test]
fn test_replace_file_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.json");

    replace_file_contents( &path, b"first version").unwrap();
    assert_eq!( filepath_contents_as_string(&path).unwrap(), "first version");

    replace_file_contents( &path, b"second version").unwrap();
    assert_eq!( filepath_contents_as_string(&path).unwrap(), "second version");

    // no temp file left behind
    let entries: Vec<_> = fs::read_dir( dir.path()).unwrap().collect();
    assert_eq!( entries.len(), 1);

    assert_eq!( file_length(&path), Some("second version".len() as u64));
}

#[test]
fn test_append_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.csv");

    append_line_to_file( &path, "date,run").unwrap();
    append_line_to_file( &path, "20260820,06").unwrap();

    let contents = filepath_contents_as_string( &path).unwrap();
    assert_eq!( contents, "date,run\n20260820,06\n");
}

#[test]
fn test_filename_parts() {
    let path = Path::new("somewhere/GFS06z_f012.nc");
    assert_eq!( filename(&path), Some("GFS06z_f012.nc"));
    assert_eq!( extension(&path), Some("nc"));
}

#[test]
fn test_ensure_dir() {
    let dir = tempfile::tempdir().unwrap();
    let sub = dir.path().join("a").join("b");

    assert!( !sub.is_dir());
    ensure_dir( &sub).unwrap();
    assert!( sub.is_dir());

    ensure_writable_dir( &sub).unwrap();
}
