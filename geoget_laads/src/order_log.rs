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

use std::collections::HashMap;
use std::path::{Path,PathBuf};
use std::time::Duration;
use chrono::{DateTime,Utc};
use serde::{Deserialize,Serialize};

use geoget_common::datetime::duration_since;
use geoget_common::fs::{ensure_dir,filepath_contents_as_string,replace_file_contents};
use crate::errors::{GeogetLaadsError,Result};
use crate::OrderStatus;

const TIME_FORMAT: &str = "%Y-%m-%d_%H:%M:%S";

/// serde adapter for the "YYYY-MM-DD_HH:MM:SS" (UTC) timestamps of the order log
mod order_time {
    use super::TIME_FORMAT;
    use chrono::{DateTime,NaiveDateTime,Utc};
    use serde::{de,Deserialize,Deserializer,Serializer};

    pub fn serialize<S: Serializer> (dt: &DateTime<Utc>, serializer: S) -> std::result::Result<S::Ok,S::Error> {
        serializer.serialize_str( &dt.format(TIME_FORMAT).to_string())
    }

    pub fn deserialize<'de,D: Deserializer<'de>> (deserializer: D) -> std::result::Result<DateTime<Utc>,D::Error> {
        let s = String::deserialize(deserializer)?;
        let ndt = NaiveDateTime::parse_from_str( s.as_str(), TIME_FORMAT).map_err(de::Error::custom)?;
        Ok( ndt.and_utc())
    }
}

/// the tracked state of one order
#[derive(Debug,Clone,Serialize,Deserialize,PartialEq)]
pub struct OrderEntry {
    pub status: OrderStatus,

    /// when `status` last changed
    #[serde(with="order_time")]
    pub time: DateTime<Utc>,
}

/// persistent record of all submitted orders and their last known status, keyed by order id.
/// The log file is a JSON object of the form
/// ```json
/// { "50128753": {"status": "Available", "time": "2026-08-20_14:03:11"} }
/// ```
/// and is replaced atomically on every save so that a crash can not leave a torn file behind.
/// This is what makes order processing resumable across program runs
#[derive(Debug)]
pub struct OrderLog {
    path: PathBuf,
    entries: HashMap<String,OrderEntry>,
}

impl OrderLog {

    /// an empty log that will be stored at `path`
    pub fn new (path: impl AsRef<Path>) -> Self {
        OrderLog { path: path.as_ref().to_path_buf(), entries: HashMap::new() }
    }

    /// read an existing log file. It is an error if there is none
    pub fn read (path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err( GeogetLaadsError::NotFoundError( format!("order log {:?}", path)))
        }

        let contents = filepath_contents_as_string( &path)?;
        let entries: HashMap<String,OrderEntry> = serde_json::from_str( contents.as_str())?;
        Ok( OrderLog { path: path.to_path_buf(), entries })
    }

    /// read an existing log file or start a new empty one at `path`
    pub fn read_or_new (path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.is_file() {
            Self::read( path)
        } else {
            if let Some(dir) = path.parent() { ensure_dir(dir)?; }
            Ok( Self::new( path))
        }
    }

    /// record `status` for `order_id`, creating the entry if this is a new order.
    /// The timestamp is only set when the status actually changes, so that
    /// elapsed_since_transition() measures how long the order has been in its
    /// current status. Returns true if the entry changed
    pub fn update (&mut self, order_id: &str, status: OrderStatus, now: DateTime<Utc>) -> bool {
        if let Some(entry) = self.entries.get_mut( order_id) {
            if entry.status == status { return false }
            entry.status = status;
            entry.time = now;
        } else {
            self.entries.insert( order_id.to_string(), OrderEntry { status, time: now });
        }
        true
    }

    /// write the whole log to its file in one atomic step
    pub fn save (&self) -> Result<()> {
        let contents = serde_json::to_string_pretty( &self.entries)?;
        replace_file_contents( &self.path, contents.as_bytes())?;
        Ok(())
    }

    pub fn path (&self) -> &Path { self.path.as_path() }

    pub fn entry (&self, order_id: &str) -> Option<&OrderEntry> {
        self.entries.get( order_id)
    }

    pub fn status (&self, order_id: &str) -> Option<&OrderStatus> {
        self.entries.get( order_id).map( |e| &e.status)
    }

    pub fn len (&self) -> usize { self.entries.len() }

    pub fn is_empty (&self) -> bool { self.entries.is_empty() }

    /// all order ids in deterministic (sorted) order
    pub fn order_ids (&self) -> Vec<String> {
        let mut ids: Vec<String> = self.entries.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// ids of all orders that still need processing, in deterministic (sorted) order
    pub fn non_terminal_ids (&self) -> Vec<String> {
        let mut ids: Vec<String> = self.entries.iter()
            .filter( |(_,e)| !e.status.is_terminal())
            .map( |(id,_)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// ids of all orders with the given status, in deterministic (sorted) order
    pub fn ids_with_status (&self, status: &OrderStatus) -> Vec<String> {
        let mut ids: Vec<String> = self.entries.iter()
            .filter( |(_,e)| &e.status == status)
            .map( |(id,_)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// true if there is nothing left to do. Note this holds for an empty log
    pub fn all_terminal (&self) -> bool {
        self.entries.values().all( |e| e.status.is_terminal())
    }

    /// how long the order has been in its current status
    pub fn elapsed_since_transition (&self, order_id: &str, now: DateTime<Utc>) -> Option<Duration> {
        self.entries.get( order_id).map( |e| duration_since( &now, &e.time))
    }
}
