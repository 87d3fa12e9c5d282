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

use std::collections::HashSet;
use geoget_common::geo::BoundingBox;
use geoget_laads::{LaadsConfig,LaadsOrderRequest,LaadsRequestConfig};

// run with "cargo test test_request -- --nocapture"

fn test_request_config () -> LaadsRequestConfig {
    LaadsRequestConfig {
        product: "VNP02IMG".to_string(),
        collection: "5200".to_string(),
        tstart: "2025-08-01 00:00:00".to_string(),
        tend: "2025-08-04 23:59:59".to_string(),
        bbox: BoundingBox::new( -124.4, 32.5, -114.1, 42.0),
        bands: vec!["I05".to_string(), "I04".to_string()],
        coords_or_tiles: "coords".to_string(),
        day_night_both: "DNB".to_string(),
        reprojection_name: "GEO".to_string(),
        reprojection_pixel_size: 0.01,
        reprojection_resample: "bilinear".to_string(),
        do_mosaic: false,
    }
}

#[test]
fn test_canonical_query () {
    let r1 = LaadsOrderRequest::new( test_request_config());
    println!("query: {}", r1.query);

    // bands get normalized on construction
    assert_eq!( r1.req.bands, vec!["I04".to_string(), "I05".to_string()]);

    let r2 = LaadsOrderRequest::new( test_request_config());
    assert_eq!( r1, r2);

    let mut other_span = test_request_config();
    other_span.tend = "2025-08-09 23:59:59".to_string();
    let r3 = LaadsOrderRequest::new( other_span);
    assert_ne!( r1, r3);

    let mut set = HashSet::new();
    set.insert( r1);
    assert!( set.contains( &r2));
    assert!( !set.contains( &r3));
}

#[test]
fn test_search_url () {
    let config = LaadsConfig::default();
    let request = LaadsOrderRequest::new( test_request_config());

    assert_eq!( request.search_url( &config),
        "https://modwebsrv.modaps.eosdis.nasa.gov/axis2/services/MODAPSservices/searchForFiles?\
         product=VNP02IMG&collection=5200&start=2025-08-01 00:00:00&stop=2025-08-04 23:59:59\
         &north=42&south=32.5&west=-124.4&east=-114.1&coordsOrTiles=coords&dayNightBoth=DNB");
}

#[test]
fn test_order_url () {
    let config = LaadsConfig::default();
    let request = LaadsOrderRequest::new( test_request_config());
    let ids = vec!["111".to_string(), "222".to_string()];

    let url = request.order_url( &config, &ids, "user@example.com");
    println!("{url}");

    assert_eq!( url,
        "https://modwebsrv.modaps.eosdis.nasa.gov/axis2/services/MODAPSservices/orderFiles?\
         fileIds=111,222&subsetDataLayer=VNP02IMG___I04,VNP02IMG___I05\
         &geoSubsetNorth=42&geoSubsetSouth=32.5&geoSubsetEast=-114.1&geoSubsetWest=-124.4\
         &reprojectionName=GEO&reprojectionOutputPixelSize=0.01&reprojectionResampleType=bilinear\
         &doMosaic=False&email=user@example.com");
}

#[test]
fn test_order_size () {
    let request = LaadsOrderRequest::new( test_request_config());
    assert_eq!( request.order_size( 5), 10); // 2 bands
    assert_eq!( request.order_size( 0), 0);
}

#[test]
fn test_split_not_needed () {
    let request = LaadsOrderRequest::new( test_request_config());

    let subs = request.split( 10, 1800).unwrap(); // order size 20
    assert_eq!( subs.len(), 1);
    assert_eq!( subs[0], request);
}

#[test]
fn test_split_with_remainder () {
    let mut cfg = test_request_config();
    cfg.tstart = "2025-08-01 00:00:00".to_string();
    cfg.tend = "2025-08-10 23:59:59".to_string(); // 10 days
    let request = LaadsOrderRequest::new( cfg);

    // order size 18 over limit 5 -> 4 splits over 10 days -> 2+2+2+4 days
    let subs = request.split( 9, 5).unwrap();
    for s in &subs { println!("{} .. {}", s.req.tstart, s.req.tend) }

    assert_eq!( subs.len(), 4);
    assert_eq!( subs[0].req.tstart, "2025-08-01 00:00:00");
    assert_eq!( subs[0].req.tend,   "2025-08-02 23:59:59");
    assert_eq!( subs[1].req.tstart, "2025-08-03 00:00:00");
    assert_eq!( subs[1].req.tend,   "2025-08-04 23:59:59");
    assert_eq!( subs[2].req.tstart, "2025-08-05 00:00:00");
    assert_eq!( subs[2].req.tend,   "2025-08-06 23:59:59");

    // the last chunk gets the remainder days
    assert_eq!( subs[3].req.tstart, "2025-08-07 00:00:00");
    assert_eq!( subs[3].req.tend,   "2025-08-10 23:59:59");

    // sub requests keep everything besides the time span
    assert_eq!( subs[0].req.product, "VNP02IMG");
    assert_eq!( subs[0].req.bands, vec!["I04".to_string(), "I05".to_string()]);
}

#[test]
fn test_split_even () {
    let mut cfg = test_request_config();
    cfg.tstart = "2025-08-01".to_string(); // day-only time specs are fine
    cfg.tend = "2025-08-10".to_string();
    let request = LaadsOrderRequest::new( cfg);

    // order size 18 over limit 4 -> 5 splits over 10 days -> 2 days each
    let subs = request.split( 9, 4).unwrap();

    assert_eq!( subs.len(), 5);
    assert_eq!( subs[0].req.tstart, "2025-08-01 00:00:00");
    assert_eq!( subs[4].req.tstart, "2025-08-09 00:00:00");
    assert_eq!( subs[4].req.tend,   "2025-08-10 23:59:59");

    // contiguous, gap-free day coverage
    for w in subs.windows(2) {
        let tend_day = &w[0].req.tend[..10];
        let tstart_day = &w[1].req.tstart[..10];
        let next = chrono::NaiveDate::parse_from_str( tend_day, "%Y-%m-%d").unwrap()
                     .succ_opt().unwrap();
        assert_eq!( next, chrono::NaiveDate::parse_from_str( tstart_day, "%Y-%m-%d").unwrap());
    }
}

#[test]
fn test_split_too_small () {
    let mut cfg = test_request_config();
    cfg.tstart = "2025-08-01".to_string();
    cfg.tend = "2025-08-02".to_string(); // 2 days can not cover 11 splits
    let request = LaadsOrderRequest::new( cfg);

    assert!( request.split( 21, 4).is_err());
}
