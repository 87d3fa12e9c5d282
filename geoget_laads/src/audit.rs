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

use std::path::{Path,PathBuf};
use serde::{Deserialize,Serialize};
use crate::errors::Result;

/// the verification outcome for one file of a downloaded order
#[derive(Debug,Clone,Serialize,Deserialize,PartialEq)]
pub struct FileRecord {
    /// the reference checksum. This is the manifest value or, if the manifest did not
    /// provide one, the checksum adopted from the first successful download
    pub checksum: Option<u32>,
    pub name: String,
    pub verified: bool,
}

pub fn audit_path (dir: &Path, order_id: &str) -> PathBuf {
    dir.join( format!("download_log_{}.csv", order_id))
}

/// write the per-order audit file that records what was downloaded and if it verified
pub fn write_audit (dir: &Path, order_id: &str, records: &[FileRecord]) -> Result<PathBuf> {
    let path = audit_path( dir, order_id);
    let mut writer = csv::Writer::from_path( &path)?;
    for rec in records {
        writer.serialize( rec)?;
    }
    writer.flush()?;
    Ok(path)
}

pub fn read_audit (path: impl AsRef<Path>) -> Result<Vec<FileRecord>> {
    let mut reader = csv::Reader::from_path( path.as_ref())?;
    let mut records: Vec<FileRecord> = Vec::new();
    for rec in reader.deserialize() {
        records.push( rec?);
    }
    Ok(records)
}
