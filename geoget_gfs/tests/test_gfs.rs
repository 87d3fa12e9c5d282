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

use geoget_common::geo::BoundingBox;
use geoget_gfs::{
    append_run, forecast_steps, raw_filename, read_last_run, scrape_dates, scrape_runs,
    scrape_steps, select_run, GfsConfig, RUN_LOG_NAME,
};

// run with "cargo test test_gfs -- --nocapture"

fn test_config () -> GfsConfig {
    GfsConfig {
        bbox: BoundingBox::new( -124.4, 32.5, -114.1, 42.0),
        bands_sf: Some( vec!["TMP".to_string(), "UGRD".to_string()]),
        bands_pl: Some( vec!["DPT".to_string(), "TMP".to_string(), "UGRD".to_string(), "VGRD".to_string()]),
        last_forecast: "f003".to_string(),
        ..GfsConfig::default()
    }
}

#[test]
fn test_surface_url () {
    let config = test_config();
    let urls = config.subset_urls( "20250801", "06", "f002");
    assert_eq!( urls.len(), 2);

    println!("surface subset url: {}", urls[0]);
    assert_eq!( urls[0],
        "https://nomads.ncep.noaa.gov/cgi-bin/filter_gfs_0p25_1hr.pl?file=gfs.t06z.pgrb2.0p25.f002\
         &lev_10_m_above_ground=on&lev_2_m_above_ground=on&lev_mean_sea_level=on&lev_surface=on\
         &var_TMP=on&var_UGRD=on\
         &subregion=&leftlon=-124.4&rightlon=-114.1&toplat=42&bottomlat=32.5\
         &dir=%2Fgfs.20250801%2F06%2Fatmos"
    );
}

#[test]
fn test_pressure_url () {
    let config = test_config();
    let urls = config.subset_urls( "20250801", "06", "f002");
    let url = &urls[1];
    println!("pressure level subset url: {}", url);

    assert!( url.starts_with(
        "https://nomads.ncep.noaa.gov/cgi-bin/filter_gfs_0p25_1hr.pl?file=gfs.t06z.pgrb2.0p25.f002&lev_1000_mb=on"));
    assert_eq!( url.matches("&lev_").count(), 33); // all pressure levels from 1000mb up to 1mb
    assert!( url.contains("&lev_975_mb=on"));
    assert!( url.contains("&lev_1_mb=on"));
    assert!( url.contains("&var_DPT=on&var_TMP=on&var_UGRD=on&var_VGRD=on"));
    assert!( url.contains("&subregion=&leftlon=-124.4&rightlon=-114.1&toplat=42&bottomlat=32.5"));
    assert!( url.ends_with("&dir=%2Fgfs.20250801%2F06%2Fatmos"));
}

#[test]
fn test_optional_file_kinds () {
    let mut config = test_config();
    config.bands_sf = None;
    let urls = config.subset_urls( "20250801", "06", "f001");
    assert_eq!( urls.len(), 1);
    assert!( urls[0].contains("&lev_1000_mb=on")); // only the pressure level file left

    config.bands_pl = None;
    assert!( config.subset_urls( "20250801", "06", "f001").is_empty());
}

#[test]
fn test_scrape_listings () {
    let dates_page = concat!(
        "<a href=\"/cgi-bin/filter_gfs_0p25_1hr.pl?dir=%2Fgfs.20250801\">gfs.20250801</a>\n",
        "<a href=\"/cgi-bin/filter_gfs_0p25_1hr.pl?dir=%2Fgfs.20250731\">gfs.20250731</a>\n",
    );
    assert_eq!( scrape_dates( dates_page), vec!["20250731".to_string(), "20250801".to_string()]);

    let runs_page = concat!(
        "<a href=\"/cgi-bin/filter_gfs_0p25_1hr.pl?dir=%2Fgfs.20250801%2F06\">06</a>\n",
        "<a href=\"/cgi-bin/filter_gfs_0p25_1hr.pl?dir=%2Fgfs.20250801%2F00\">00</a>\n",
    );
    assert_eq!( scrape_runs( runs_page), vec!["00".to_string(), "06".to_string()]);

    let steps_page = concat!(
        "<a href=\"/cgi-bin/filter_gfs_0p25_1hr.pl?dir=%2Fgfs.20250801%2F06%2Fatmos&file=gfs.t06z.pgrb2.0p25.f000\">gfs.t06z.pgrb2.0p25.f000</a>\n",
        "<a href=\"/cgi-bin/filter_gfs_0p25_1hr.pl?dir=%2Fgfs.20250801%2F06%2Fatmos&file=gfs.t06z.pgrb2.0p25.f001\">gfs.t06z.pgrb2.0p25.f001</a>\n",
    );
    assert_eq!( scrape_steps( steps_page), vec!["f000".to_string(), "f001".to_string()]);

    assert!( scrape_dates("<html><body>404 - not found</body></html>").is_empty());
}

#[test]
fn test_select_run () {
    let dates = vec!["20250731".to_string(), "20250801".to_string()];
    let runs = vec!["00".to_string(), "06".to_string(), "12".to_string()];
    let steps = vec!["f000".to_string(), "f001".to_string(), "f002".to_string(), "f003".to_string()];

    // the latest run covers the full forecast range
    let selected = select_run( &dates, &runs, &steps, "f003").unwrap();
    assert_eq!( selected, ("20250801".to_string(), "12".to_string()));

    // latest run incomplete, fall back to the run before it
    let selected = select_run( &dates, &runs, &steps, "f120").unwrap();
    assert_eq!( selected, ("20250801".to_string(), "06".to_string()));

    // only one incomplete run today, fall back to the last run of the previous day
    let runs = vec!["00".to_string()];
    let selected = select_run( &dates, &runs, &steps, "f120").unwrap();
    assert_eq!( selected, ("20250731".to_string(), "18".to_string()));

    // nothing to fall back to
    let dates = vec!["20250801".to_string()];
    assert!( select_run( &dates, &runs, &steps, "f120").is_err());
    assert!( select_run( &[], &[], &[], "f120").is_err());
}

#[test]
fn test_run_log () {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!( read_last_run( dir.path()).unwrap(), None);

    append_run( dir.path(), "20250801", "06").unwrap();
    assert_eq!( read_last_run( dir.path()).unwrap(), Some(("20250801".to_string(), "06".to_string())));

    append_run( dir.path(), "20250801", "12").unwrap();
    assert_eq!( read_last_run( dir.path()).unwrap(), Some(("20250801".to_string(), "12".to_string())));

    // single header line, entries in append order, run hours keep their leading zero
    let contents = std::fs::read_to_string( dir.path().join( RUN_LOG_NAME)).unwrap();
    assert_eq!( contents, "date,run\n20250801,06\n20250801,12\n");
}

#[test]
fn test_forecast_steps () {
    let steps = forecast_steps("f003").unwrap();
    assert_eq!( steps, vec!["f001".to_string(), "f002".to_string(), "f003".to_string()]);

    let steps = forecast_steps("f120").unwrap();
    assert_eq!( steps.len(), 120);
    assert_eq!( steps[0], "f001");
    assert_eq!( steps[119], "f120");

    assert!( forecast_steps("120").is_err());
    assert!( forecast_steps("fxx").is_err());
}

#[test]
fn test_raw_filenames () {
    assert_eq!( raw_filename( "06", "f012", None), "GFS06z_f012");
    assert_eq!( raw_filename( "06", "f012", Some(0)), "GFS06z_0_f012");
    assert_eq!( raw_filename( "18", "f120", Some(1)), "GFS18z_1_f120");
}
