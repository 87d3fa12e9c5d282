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

#[doc = include_str!("../doc/geoget_gfs.md")]

use std::{
    fs, path::{Path,PathBuf}, time::Duration
};
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::{Client,StatusCode};
use serde::{Deserialize,Serialize};

use geoget_common::{
    datetime::secs,
    fs::{append_line_to_file,ensure_writable_dir,matching_files_in_dir},
    geo::BoundingBox,
    net::download_url_atomic,
    debug, info, warn,
};
use geoget_build::define_load_config;

mod convert;
pub use convert::*;

mod errors;
pub use errors::*;

pub const RUN_LOG_NAME: &'static str = "run_log.csv";

define_load_config!{}

/* #region config *********************************************************************************/

/// general GFS server / download parameters configuration
#[derive(Clone,Serialize,Deserialize,Debug)]
pub struct GfsConfig {
    /// subset filter endpoint for the 0.25 degree hourly product
    /// (e.g. https://nomads.ncep.noaa.gov/cgi-bin/filter_gfs_0p25_1hr.pl)
    pub url: String,

    /// geographic region to subset
    pub bbox: BoundingBox<f64>,

    /// variables to retrieve for the surface/mean sea level/2m/10m levels (no surface file if unset)
    pub bands_sf: Option<Vec<String>>,

    /// variables to retrieve for the pressure levels 1000mb up to 1mb (no pressure level file if unset)
    pub bands_pl: Option<Vec<String>>,

    /// last hourly forecast step to retrieve (e.g. "f120")
    pub last_forecast: String,

    pub retry_delay: Duration,
    pub max_retry: usize,
}

impl Default for GfsConfig {
    fn default()->Self {
        GfsConfig {
            url: "https://nomads.ncep.noaa.gov/cgi-bin/filter_gfs_0p25_1hr.pl".to_string(),
            bbox: BoundingBox::new( -180.0, -90.0, 180.0, 90.0),
            bands_sf: None,
            bands_pl: Some( vec!["DPT".to_string(), "TMP".to_string(), "UGRD".to_string(), "VGRD".to_string()]),
            last_forecast: "f120".to_string(),
            retry_delay: secs(30),
            max_retry: 3,
        }
    }
}

// level selectors of the filter endpoint. These are fixed for our two file kinds, only the
// variables within them are configurable
const SURFACE_LEVELS: &'static str =
    "&lev_10_m_above_ground=on&lev_2_m_above_ground=on&lev_mean_sea_level=on&lev_surface=on";

const PRESSURE_LEVELS: &'static str = concat!(
    "&lev_1000_mb=on&lev_100_mb=on&lev_10_mb=on&lev_150_mb=on&lev_15_mb=on&lev_1_mb=on",
    "&lev_200_mb=on&lev_20_mb=on&lev_250_mb=on&lev_2_mb=on&lev_300_mb=on&lev_30_mb=on",
    "&lev_350_mb=on&lev_3_mb=on&lev_400_mb=on&lev_40_mb=on&lev_450_mb=on&lev_500_mb=on",
    "&lev_50_mb=on&lev_550_mb=on&lev_5_mb=on&lev_600_mb=on&lev_650_mb=on&lev_700_mb=on",
    "&lev_70_mb=on&lev_750_mb=on&lev_7_mb=on&lev_800_mb=on&lev_850_mb=on&lev_900_mb=on",
    "&lev_925_mb=on&lev_950_mb=on&lev_975_mb=on"
);

impl GfsConfig {
    /// directory listing URL for the available model run dates
    pub fn dates_url (&self) -> String {
        self.url.clone()
    }

    /// directory listing URL for the run hours of a given date
    pub fn runs_url (&self, date: &str) -> String {
        format!("{}?dir=%2Fgfs.{}", self.url, date)
    }

    /// directory listing URL for the forecast step files of a given run
    pub fn steps_url (&self, date: &str, run: &str) -> String {
        format!("{}?dir=%2Fgfs.{}%2F{}%2Fatmos", self.url, date, run)
    }

    /// subset URLs for one forecast step, in fixed order: surface level file first (if
    /// configured), pressure level file second (if configured)
    pub fn subset_urls (&self, date: &str, run: &str, step: &str) -> Vec<String> {
        let mut urls: Vec<String> = Vec::new();
        if let Some(bands) = &self.bands_sf {
            urls.push( self.filter_url( SURFACE_LEVELS, bands, date, run, step));
        }
        if let Some(bands) = &self.bands_pl {
            urls.push( self.filter_url( PRESSURE_LEVELS, bands, date, run, step));
        }
        urls
    }

    fn filter_url (&self, levels: &str, bands: &[String], date: &str, run: &str, step: &str) -> String {
        let vars: String = bands.iter().map( |v| format!("&var_{}=on", v)).collect();
        let bbox = &self.bbox;

        format!("{}?file=gfs.t{}z.pgrb2.0p25.{}{}{}\
                 &subregion=&leftlon={}&rightlon={}&toplat={}&bottomlat={}\
                 &dir=%2Fgfs.{}%2F{}%2Fatmos",
            self.url, run, step, levels, vars,
            bbox.west, bbox.east, bbox.north, bbox.south,
            date, run
        )
    }
}

/* #endregion config */

/* #region server listings ************************************************************************/

lazy_static! {
    static ref DATE_RE: Regex = Regex::new( r#"dir=%2Fgfs\.(.*?)">"#).unwrap();
    static ref RUN_RE: Regex = Regex::new( r#"">(.*?)</a>"#).unwrap();
    static ref STEP_RE: Regex = Regex::new( r#"pgrb2\.0p25\.(.*?)">"#).unwrap();
    static ref DATA_SET_RE: Regex = Regex::new( r#"^GFS\d+z_.*\.nc$"#).unwrap();
}

fn captures_in (re: &Regex, text: &str) -> Vec<String> {
    re.captures_iter( text).filter_map( |c| c.get(1).map( |m| m.as_str().to_string())).collect()
}

/// model run dates ("yyyymmdd") linked in a dates listing page, in ascending order
pub fn scrape_dates (text: &str) -> Vec<String> {
    let mut dates = captures_in( &DATE_RE, text);
    dates.sort();
    dates
}

/// run hours ("00".."18") linked in a date listing page, in ascending order
pub fn scrape_runs (text: &str) -> Vec<String> {
    let mut runs = captures_in( &RUN_RE, text);
    runs.sort();
    runs
}

/// forecast steps ("f000"..) of the subset files linked in a run listing page
pub fn scrape_steps (text: &str) -> Vec<String> {
    captures_in( &STEP_RE, text)
}

/// pick the (date, run) to download. This is the latest run if it already covers our full
/// forecast range, otherwise the run before it, otherwise the last run of the previous day
pub fn select_run (dates: &[String], runs: &[String], steps: &[String], last_forecast: &str) -> Result<(String,String)> {
    let date = dates.last().ok_or_else( || remote_error("no GFS dates in listing"))?;
    let run = runs.last().ok_or_else( || remote_error("no GFS runs in listing"))?;

    if steps.iter().any( |s| s == last_forecast) {
        Ok( (date.clone(), run.clone()))

    } else if runs.len() > 1 {
        Ok( (date.clone(), runs[runs.len()-2].clone()))

    } else {
        if dates.len() < 2 { return Err( remote_error("no previous GFS date in listing")) }
        Ok( (dates[dates.len()-2].clone(), "18".to_string()))
    }
}

/// scrape the server directory listings for the most recent run that covers our forecast range
pub async fn find_latest_run (client: &Client, config: &GfsConfig) -> Result<(String,String)> {
    let dates = scrape_dates( &fetch_text( client, &config.dates_url()).await?);
    let date = dates.last().ok_or_else( || remote_error("no GFS dates in listing"))?;

    let runs = scrape_runs( &fetch_text( client, &config.runs_url( date)).await?);
    let run = runs.last().ok_or_else( || remote_error("no GFS runs in listing"))?;

    let steps = scrape_steps( &fetch_text( client, &config.steps_url( date, run)).await?);

    select_run( &dates, &runs, &steps, &config.last_forecast)
}

async fn fetch_text (client: &Client, url: &str) -> Result<String> {
    let response = client.get( url).send().await?;
    if response.status() == StatusCode::OK {
        Ok( response.text().await?)
    } else {
        Err( op_failed( format!("request for {} failed with {}", url, response.status())))
    }
}

/* #endregion server listings */

/* #region run log ********************************************************************************/

#[derive(Serialize,Deserialize,Debug)]
struct RunRecord {
    date: String,
    run: String,
}

/// last (date, run) recorded in the run log, None if there is no log yet
pub fn read_last_run (dir: &Path) -> Result<Option<(String,String)>> {
    let path = dir.join( RUN_LOG_NAME);
    if !path.is_file() { return Ok(None) }

    let mut reader = csv::Reader::from_path( &path)?;
    let mut last: Option<(String,String)> = None;
    for record in reader.deserialize() {
        let record: RunRecord = record?;
        last = Some( (record.date, record.run));
    }
    Ok(last)
}

/// append a (date, run) entry, creating the log with its header line on first use
pub fn append_run (dir: &Path, date: &str, run: &str) -> Result<()> {
    let path = dir.join( RUN_LOG_NAME);
    if !path.is_file() {
        append_line_to_file( &path, "date,run")?;
    }
    append_line_to_file( &path, &format!("{},{}", date, run))?;
    Ok(())
}

/* #endregion run log */

/* #region download *******************************************************************************/

/// hourly forecast steps "f001".."fNNN" up to and including `last_forecast`
pub fn forecast_steps (last_forecast: &str) -> Result<Vec<String>> {
    let last: usize = last_forecast.strip_prefix('f')
        .and_then( |s| s.parse().ok())
        .ok_or_else( || op_failed( format!("not a forecast step: {:?}", last_forecast)))?;

    Ok( (1..=last).map( |i| format!("f{:03}", i)).collect())
}

/// local name for a downloaded GRIB2 subset file (e.g. "GFS06z_f012"), with a part index if
/// surface and pressure level files are retrieved separately
pub fn raw_filename (run: &str, step: &str, part: Option<usize>) -> String {
    match part {
        Some(i) => format!("GFS{}z_{}_{}", run, i, step),
        None => format!("GFS{}z_{}", run, step),
    }
}

/// check the server for a new GFS run and download the subset files for all hourly forecast
/// steps into `dir`. Returns false if the latest available run was already retrieved.
/// If a converter is given each step ends up as a single netCDF data set and the raw GRIB2
/// input files are removed, otherwise the raw files are kept as they are
pub async fn download_latest_run (client: &Client, config: &GfsConfig, dir: &Path,
                                  converter: Option<&dyn GribConverter>, replace: bool, delete_old: bool) -> Result<bool>
{
    ensure_writable_dir( dir)?;

    let (date, run) = find_latest_run( client, config).await?;

    if !replace {
        if let Some((logged_date, logged_run)) = read_last_run( dir)? {
            if logged_date == date && logged_run == run {
                info!("no new GFS run available ({} {}z)", date, run);
                return Ok(false)
            }
        }
        // record the run up front so an interrupted download is not re-ordered as "new"
        append_run( dir, &date, &run)?;
    }

    if delete_old {
        remove_old_sets( dir)?;
    }

    for step in forecast_steps( &config.last_forecast)? {
        download_step( client, config, dir, converter, &date, &run, &step).await?;
    }
    Ok(true)
}

/// retrieve the subset file(s) for one forecast step and turn them into a single data set
async fn download_step (client: &Client, config: &GfsConfig, dir: &Path, converter: Option<&dyn GribConverter>,
                        date: &str, run: &str, step: &str) -> Result<()>
{
    let urls = config.subset_urls( date, run, step);
    if urls.is_empty() { return Err( op_failed("neither surface nor pressure level bands configured")) }

    info!("downloading GFS data for {} {}z {}", date, run, step);

    let multi = urls.len() > 1;
    let mut raw_paths: Vec<PathBuf> = Vec::new();

    for (i, url) in urls.iter().enumerate() {
        let part = if multi { Some(i) } else { None };
        let path = dir.join( raw_filename( run, step, part));

        download_with_retry( client, config, url, &path).await?;
        raw_paths.push( path);
    }

    if let Some(converter) = converter {
        let mut nc_paths: Vec<PathBuf> = Vec::new();
        for raw_path in &raw_paths {
            nc_paths.push( converter.convert( raw_path).await?);
        }

        if multi {
            let merged_path = dir.join( format!("{}.nc", raw_filename( run, step, None)));
            converter.merge( &nc_paths, &merged_path).await?;

            for path in &nc_paths { fs::remove_file( path)?; }
        }
        for path in &raw_paths { fs::remove_file( path)?; }
    }

    Ok(())
}

/// account for transient server errors and slightly lagging file availability
async fn download_with_retry (client: &Client, config: &GfsConfig, url: &str, path: &Path) -> Result<()> {
    let mut retry = 0;
    loop {
        match download_url_atomic( client, url, &None, path).await {
            Ok(_len) => return Ok(()),
            Err(e) => {
                if retry < config.max_retry {
                    info!("download retry {}/{} in {} sec", retry, config.max_retry, config.retry_delay.as_secs());
                    tokio::time::sleep( config.retry_delay).await;
                    retry += 1;
                } else {
                    return Err( GeogetGfsError::TransientFetchError( format!("{} after {} attempts: {}", url, retry+1, e)))
                }
            }
        }
    }
}

/// remove the netCDF data sets of previous runs
fn remove_old_sets (dir: &Path) -> Result<()> {
    for path in matching_files_in_dir( &dir, &DATA_SET_RE)? {
        debug!("removing old data set {:?}", path);
        fs::remove_file( &path)?;
    }
    Ok(())
}

/* #endregion download */

/// the directory where we keep retrieved GFS data sets
pub fn gfs_cache_dir () -> PathBuf {
    geoget_build::ensure_dir( geoget_build::cache_dir().join("geoget_gfs"))
}
