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

#[doc = include_str!("../doc/geoget_laads.md")]

use std::{
    fmt, path::{Path,PathBuf}, time::Duration, hash::{Hash,Hasher}
};
use serde::{Deserialize,Serialize,Serializer,Deserializer};
use chrono::{Datelike,NaiveDate};
use strum::EnumString;

use geoget_common::{
    datetime::{secs,minutes,Scheduler},
    fs::ensure_writable_dir,
    geo::BoundingBox,
    strings::mk_string,
    info, warn,
};
use geoget_build::define_load_config;

pub mod scrape;
pub mod checksum;

mod order_log;
pub use order_log::*;

mod audit;
pub use audit::*;

mod client;
pub use client::*;

mod manager;
pub use manager::*;

mod errors;
pub use errors::*;

pub const ORDER_LOG_NAME: &'static str = "order_log.json";

define_load_config!{}

/* #region order status ***************************************************************************/

/// provider side lifecycle status of an order. `Complete` and `VerificationFailed` are
/// assigned locally once order processing finished, everything else is reported by the
/// status service. Unknown provider statuses are preserved verbatim as `Other`
#[derive(Debug,Clone,PartialEq,Eq,Hash,EnumString)]
pub enum OrderStatus {
    Submitted,
    Available,
    Canceled,
    Removed,
    Complete,

    /// at least one file failed checksum verification or the release was not acknowledged
    #[strum(serialize = "One or more files not verified")]
    VerificationFailed,

    /// catch-all for provider statuses we don't act on (e.g. "Processing")
    #[strum(default)]
    Other(String),
}

impl OrderStatus {
    /// orders in a terminal status are never polled or downloaded again
    pub fn is_terminal (&self) -> bool {
        matches!( self, OrderStatus::Complete | OrderStatus::VerificationFailed | OrderStatus::Canceled | OrderStatus::Removed)
    }
}

impl From<&str> for OrderStatus {
    fn from (s: &str) -> Self {
        s.parse().unwrap_or_else( |_| OrderStatus::Other( s.to_string()))
    }
}

/// note this has to round trip with `From<&str>` since the log file stores the display form
impl fmt::Display for OrderStatus {
    fn fmt (&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Submitted => write!( f, "Submitted"),
            OrderStatus::Available => write!( f, "Available"),
            OrderStatus::Canceled => write!( f, "Canceled"),
            OrderStatus::Removed => write!( f, "Removed"),
            OrderStatus::Complete => write!( f, "Complete"),
            OrderStatus::VerificationFailed => write!( f, "One or more files not verified"),
            OrderStatus::Other(s) => write!( f, "{}", s),
        }
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer> (&self, serializer: S) -> std::result::Result<S::Ok,S::Error> {
        serializer.serialize_str( &self.to_string())
    }
}

impl <'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>> (deserializer: D) -> std::result::Result<Self,D::Error> {
        let s = String::deserialize( deserializer)?;
        Ok( OrderStatus::from( s.as_str()))
    }
}

/* #endregion order status */

/* #region config *********************************************************************************/

/// general LAADS DAAC server / order processing parameters
#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct LaadsConfig {
    /// base URL of the MODAPS web services (search, order, status, release)
    pub service_url: String,

    /// base URL of the archive server that holds staged orders and raw data files
    pub archive_url: String,

    /// max number of files (ids x bands) the provider accepts in a single order
    pub max_order_size: usize,

    /// grace delay between consecutive order submissions
    pub submit_delay: Duration,

    /// interval between status poll cycles
    pub check_interval: Duration,

    /// wait after an order became available before downloading it (files can show up on the
    /// download server some time after the status flips)
    pub cooldown: Duration,

    /// delay between transient fetch retry attempts
    pub retry_delay: Duration,

    /// max attempts for status queries and archive downloads
    pub max_fetch_retry: u8,

    /// max download attempts per file whose checksum does not verify
    pub max_download_retry: u8,
}

impl Default for LaadsConfig {
    fn default() -> Self {
        LaadsConfig {
            service_url: "https://modwebsrv.modaps.eosdis.nasa.gov/axis2/services/MODAPSservices".to_string(),
            archive_url: "https://ladsweb.modaps.eosdis.nasa.gov".to_string(),
            max_order_size: 1800,
            submit_delay: secs(5),
            check_interval: secs(20),
            cooldown: minutes(10),
            retry_delay: secs(10),
            max_fetch_retry: 10,
            max_download_retry: 5,
        }
    }
}

impl LaadsConfig {
    pub fn status_url (&self, order_id: &str) -> String {
        format!("{}/getOrderStatus?orderId={}", self.service_url, order_id)
    }

    pub fn release_url (&self, order_id: &str, email: &str) -> String {
        format!("{}/releaseOrder?orderId={}&email={}", self.service_url, order_id, email)
    }

    pub fn manifest_url (&self, order_id: &str) -> String {
        format!("{}/archive/orders/{}/checksums_{}", self.archive_url, order_id, order_id)
    }

    pub fn order_file_url (&self, order_id: &str, filename: &str) -> String {
        format!("{}/archive/orders/{}/{}", self.archive_url, order_id, filename)
    }

    pub fn file_details_url (&self, collection: &str, file_id: &str) -> String {
        format!("{}/details/file/{}/{}", self.archive_url, collection, file_id)
    }

    pub fn archive_file_url (&self, collection: &str, product: &str, date: &NaiveDate, filename: &str) -> String {
        format!("{}/archive/allData/{}/{}/{}/{:03}/{}",
                self.archive_url, collection, product, date.year(), date.ordinal(), filename)
    }
}

/// the user supplied email / app key pair the order services require. This lives in its own
/// config file so that shareable request configs don't carry credentials
#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct LaadsCredentials {
    pub email: String,
    pub key: String,
}

impl LaadsCredentials {
    pub fn check (&self) -> Result<()> {
        if self.email.is_empty() || !self.email.contains('@') {
            return Err( op_failed( format!("not a valid order email: '{}'", self.email)))
        }
        if self.key.is_empty() {
            return Err( op_failed( "empty app key"))
        }
        Ok(())
    }
}

fn default_coords_or_tiles () -> String { "coords".to_string() }
fn default_day_night_both () -> String { "DNB".to_string() }
fn default_reprojection_name () -> String { "GEO".to_string() }
fn default_reprojection_pixel_size () -> f64 { 0.01 }
fn default_reprojection_resample () -> String { "bilinear".to_string() }

/// parameters of one data product request: what product to search, for which region and
/// time span, and how the provider should post-process it (band subsetting, reprojection)
#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct LaadsRequestConfig {
    /// the product to search (e.g. "VNP02IMG")
    pub product: String,
    /// the collection the product belongs to (e.g. "5200")
    pub collection: String,

    /// begin of the acquisition time range ("YYYY-MM-DD" or "YYYY-MM-DD HH:MM:SS")
    pub tstart: String,
    /// end of the acquisition time range
    pub tend: String,

    /// region of interest
    pub bbox: BoundingBox<f64>,
    /// the product bands to order
    pub bands: Vec<String>,

    #[serde(default = "default_coords_or_tiles")]
    pub coords_or_tiles: String,
    #[serde(default = "default_day_night_both")]
    pub day_night_both: String,
    #[serde(default = "default_reprojection_name")]
    pub reprojection_name: String,
    #[serde(default = "default_reprojection_pixel_size")]
    pub reprojection_pixel_size: f64,
    #[serde(default = "default_reprojection_resample")]
    pub reprojection_resample: String,
    #[serde(default)]
    pub do_mosaic: bool,
}

/* #endregion config */

/* #region order request **************************************************************************/

/// a wrapper for a LaadsRequestConfig we want to submit to the provider.
/// note we consider two requests as equal if they have the same (canonical) search query
#[derive(Debug,Clone)]
pub struct LaadsOrderRequest {
    pub req: LaadsRequestConfig,

    /// canonical search query computed from `req`
    pub query: String,
}

impl LaadsOrderRequest {
    pub fn new (mut req_cfg: LaadsRequestConfig) -> Self {
        req_cfg.bands.sort();

        let bbox = &req_cfg.bbox;
        let query = format!("product={}&collection={}&start={}&stop={}&north={}&south={}&west={}&east={}&coordsOrTiles={}&dayNightBoth={}",
                            req_cfg.product, req_cfg.collection, req_cfg.tstart, req_cfg.tend,
                            bbox.north, bbox.south, bbox.west, bbox.east,
                            req_cfg.coords_or_tiles, req_cfg.day_night_both);

        LaadsOrderRequest { req: req_cfg, query }
    }

    pub fn search_url (&self, config: &LaadsConfig) -> String {
        format!("{}/searchForFiles?{}", config.service_url, self.query)
    }

    pub fn order_url (&self, config: &LaadsConfig, file_ids: &[String], email: &str) -> String {
        let req = &self.req;
        let bbox = &req.bbox;
        let layers: Vec<String> = req.bands.iter().map( |b| format!("{}___{}", req.product, b)).collect();

        format!("{}/orderFiles?fileIds={}&subsetDataLayer={}\
                 &geoSubsetNorth={}&geoSubsetSouth={}&geoSubsetEast={}&geoSubsetWest={}\
                 &reprojectionName={}&reprojectionOutputPixelSize={}&reprojectionResampleType={}\
                 &doMosaic={}&email={}",
                config.service_url, mk_string( file_ids, ","), mk_string( &layers, ","),
                bbox.north, bbox.south, bbox.east, bbox.west,
                req.reprojection_name, req.reprojection_pixel_size, req.reprojection_resample,
                if req.do_mosaic {"True"} else {"False"}, email)
    }

    /// number of files the provider counts against its order size limit
    pub fn order_size (&self, n_ids: usize) -> usize {
        n_ids * self.req.bands.len()
    }

    /// split a request whose order size exceeds `max_order_size` into requests for
    /// consecutive sub-ranges of the time span. Chunks cover whole days and are of equal
    /// length except for the last one, which gets the remainder days
    pub fn split (&self, n_ids: usize, max_order_size: usize) -> Result<Vec<LaadsOrderRequest>> {
        let order_size = self.order_size( n_ids);
        if order_size <= max_order_size {
            return Ok( vec![ self.clone() ])
        }

        let n_splits = order_size / max_order_size + 1;
        let days = self.day_range()?;
        if days.len() < n_splits {
            return Err( op_failed( format!("cannot split {} days into {} orders", days.len(), n_splits)))
        }

        let chunk_len = days.len() / n_splits;
        let mut subs: Vec<LaadsOrderRequest> = Vec::with_capacity( n_splits);
        for i in 0..n_splits {
            let first = days[i * chunk_len];
            let last = if i == n_splits-1 { days[days.len()-1] } else { days[(i+1)*chunk_len - 1] };

            let mut req_cfg = self.req.clone();
            req_cfg.tstart = format!("{} 00:00:00", first.format("%Y-%m-%d"));
            req_cfg.tend = format!("{} 23:59:59", last.format("%Y-%m-%d"));
            subs.push( LaadsOrderRequest::new( req_cfg));
        }
        Ok(subs)
    }

    /// the whole days covered by the request time span
    fn day_range (&self) -> Result<Vec<NaiveDate>> {
        let start = parse_day( &self.req.tstart)?;
        let end = parse_day( &self.req.tend)?;
        if end < start {
            return Err( op_failed( format!("invalid time range {} .. {}", self.req.tstart, self.req.tend)))
        }

        let mut days: Vec<NaiveDate> = Vec::new();
        let mut day = start;
        while day <= end {
            days.push( day);
            day = day + chrono::Duration::days(1);
        }
        Ok(days)
    }
}

impl Hash for LaadsOrderRequest {
    fn hash<H: Hasher> (&self, state: &mut H) {
        self.query.hash( state);
    }
}

impl PartialEq for LaadsOrderRequest {
    fn eq (&self, other: &Self) -> bool {
        self.query == other.query
    }
}
impl Eq for LaadsOrderRequest {}

fn parse_day (s: &str) -> Result<NaiveDate> {
    let ds = s.split_whitespace().next().unwrap_or(s);
    NaiveDate::parse_from_str( ds, "%Y-%m-%d").map_err( |_| op_failed( format!("not a valid date: '{}'", s)))
}

/* #endregion order request */

/* #region order submission ***********************************************************************/

/// submit a list of requests, one after the other with a grace delay in between, recording
/// every created order in the log. A failing request does not keep the remaining ones from
/// being submitted. Returns the total number of orders created
pub async fn submit_requests (client: &LaadsClient, requests: &[LaadsOrderRequest],
                              log: &mut OrderLog, scheduler: &dyn Scheduler) -> usize {
    let mut n_orders = 0;
    for request in requests {
        match submit_one( client, request, log, scheduler).await {
            Ok(n) => n_orders += n,
            Err(e) => warn!("request for {} [{} .. {}] failed: {}",
                            request.req.product, request.req.tstart, request.req.tend, e)
        }
    }
    n_orders
}

/// submit one (possibly split) request. Returns the number of orders created
pub async fn submit_one (client: &LaadsClient, request: &LaadsOrderRequest,
                         log: &mut OrderLog, scheduler: &dyn Scheduler) -> Result<usize> {
    let config = client.config();

    let ids = client.search( request).await?;
    if ids.is_empty() {
        warn!("no files found for {} [{} .. {}]", request.req.product, request.req.tstart, request.req.tend);
        return Ok(0)
    }

    let order_size = request.order_size( ids.len());
    if order_size <= config.max_order_size {
        submit_order_for( client, request, &ids, log, scheduler).await?;
        Ok(1)

    } else {
        let subs = request.split( ids.len(), config.max_order_size)?;
        info!("order size {} exceeds limit {}, splitting into {} requests", order_size, config.max_order_size, subs.len());

        let mut n = 0;
        for sub in &subs {
            let sub_ids = client.search( sub).await?;
            if sub_ids.is_empty() { continue }
            submit_order_for( client, sub, &sub_ids, log, scheduler).await?;
            n += 1;
        }
        Ok(n)
    }
}

/// submit one order and record it in the log. The initial status is queried back from the
/// provider, if that query fails the order is recorded as Submitted and picked up by the
/// next status poll
async fn submit_order_for (client: &LaadsClient, request: &LaadsOrderRequest, ids: &[String],
                           log: &mut OrderLog, scheduler: &dyn Scheduler) -> Result<()> {
    let order_id = client.submit_order( request, ids).await?;

    let status = match client.get_status( &order_id).await {
        Ok(status) => status,
        Err(e) => {
            warn!("status query for new order {} failed ({}), assuming Submitted", order_id, e);
            OrderStatus::Submitted
        }
    };
    log.update( &order_id, status.clone(), scheduler.now());
    log.save()?;
    info!("new order {} submitted with status '{}'", order_id, status);

    scheduler.sleep( client.config().submit_delay).await;
    Ok(())
}

/* #endregion order submission */

/* #region raw archive files **********************************************************************/

/// retrieve unprocessed archive files matching the request directly from the archive, no
/// order processing involved. Files already present are kept unless `replace` is set.
/// Returns the local paths of all files present after the pass
pub async fn download_archive_files (client: &LaadsClient, request: &LaadsOrderRequest,
                                     dir: impl AsRef<Path>, replace: bool) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    ensure_writable_dir( dir)?;

    let file_ids = client.search( request).await?;
    info!("retrieving {} archive files for {}", file_ids.len(), request.req.product);

    let mut paths: Vec<PathBuf> = Vec::with_capacity( file_ids.len());
    for file_id in &file_ids {
        let filename = match client.fetch_file_name( &request.req.collection, file_id).await {
            Ok(filename) => filename,
            Err(e) => { warn!("no file name for archive file {} ({}), skipped", file_id, e); continue }
        };
        let date = match scrape::acquisition_date( &filename) {
            Some(date) => date,
            None => { warn!("no acquisition date in file name {}, skipped", filename); continue }
        };

        let path = dir.join( &filename);
        if path.is_file() && !replace {
            info!("{} already retrieved", filename);
            paths.push( path);
            continue
        }

        match client.fetch_archive_file( &request.req.collection, &request.req.product, &date, &filename, dir).await {
            Ok(path) => paths.push( path),
            Err(e) => warn!("retrieval of {} failed: {}", filename, e)
        }
    }
    Ok(paths)
}

/* #endregion raw archive files */

/// where downloaded order files and the order log go (created on first use)
pub fn laads_data_dir () -> PathBuf {
    geoget_build::ensure_dir( geoget_build::data_dir().join("geoget_laads"))
}
