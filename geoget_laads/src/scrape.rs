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

//! extraction of payload values from MODAPS web service responses.
//! The service answers are XML/HTML wrappers around simple scalar values so we pull
//! them out with regexes instead of a full XML parser

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RETURN_RE: Regex = Regex::new( r"<return>(.*?)</return>").unwrap();
    static ref FILE_NAME_RE: Regex = Regex::new( r"<td>File Name</td><td>(.*?)</td>").unwrap();
    static ref ACQUISITION_RE: Regex = Regex::new( r"^\w+\.A(20[0-9][0-9])([0-3][0-9][0-9])\.").unwrap();
}

/// all `<return>` payloads of a MODAPS service response, in document order
pub fn return_values (text: &str) -> Vec<String> {
    RETURN_RE.captures_iter(text).map( |cap| cap[1].to_string()).collect()
}

/// the first `<return>` payload of a MODAPS service response
pub fn first_return_value (text: &str) -> Option<String> {
    RETURN_RE.captures(text).map( |cap| cap[1].to_string())
}

/// the product file name from a LAADS file details page
pub fn file_detail_name (html: &str) -> Option<String> {
    FILE_NAME_RE.captures(html).map( |cap| cap[1].to_string())
}

/// the acquisition date encoded in a LAADS product file name, e.g. `VNP09.A2026123.0142...`
/// holds year 2026, day-of-year 123
pub fn acquisition_date (filename: &str) -> Option<NaiveDate> {
    ACQUISITION_RE.captures(filename).and_then( |cap| {
        let year: i32 = cap[1].parse().ok()?;
        let doy: u32 = cap[2].parse().ok()?;
        NaiveDate::from_yo_opt( year, doy)
    })
}

/// one line of an order checksum manifest
#[derive(Debug,Clone,PartialEq)]
pub struct ManifestEntry {
    /// the server side CRC of the file. None if the manifest does not provide one, in which
    /// case the checksum of the first successful download is adopted as the reference
    pub checksum: Option<u32>,
    pub name: String,
}

/// parse an order checksum manifest. Each well formed line holds whitespace separated
/// checksum, size and file name fields. The size is of no use to us since we verify
/// with checksums. Lines that do not have exactly three fields are ignored, checksum
/// fields that do not parse as numbers (e.g. "nan") map to None
pub fn parse_checksum_manifest (text: &str) -> Vec<ManifestEntry> {
    let mut entries: Vec<ManifestEntry> = Vec::new();

    for line in text.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() == 3 {
            let checksum: Option<u32> = fields[0].parse().ok();
            entries.push( ManifestEntry { checksum, name: fields[2].to_string() })
        }
    }

    entries
}
