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

use reqwest::Client;
use tracing_subscriber::EnvFilter;

use geoget_common::{define_cli,check_cli};
use geoget_build;
use geoget_gfs::{
    load_config, gfs_cache_dir, download_latest_run,
    CdoConverter, GfsConfig, GribConverter, Result,
};

define_cli! { ARGS [about="GFS weather model download tool"] =
    gfs_config: String [help="filename of GFS config file", short,long,default_value="gfs.ron"],
    keep_raw: bool [help="keep raw GRIB2 files instead of converting to netCDF", long],
    replace: bool [help="re-download the latest run even if it is already logged", long],
    delete_old: bool [help="remove data sets of previous runs before downloading", long]
}

#[tokio::main]
async fn main () -> Result<()> {
    geoget_build::set_bin_context!();
    check_cli!(ARGS);

    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::from_default_env())  // use RUST_LOG to set max level
        .init();

    let config: GfsConfig = load_config( &ARGS.gfs_config)?;
    let cache_dir = gfs_cache_dir();
    let client = Client::new();

    let cdo = CdoConverter::default();
    let converter: Option<&dyn GribConverter> = if ARGS.keep_raw { None } else { Some(&cdo) };

    if download_latest_run( &client, &config, &cache_dir, converter, ARGS.replace, ARGS.delete_old).await? {
        println!("new GFS run retrieved into {:?}", cache_dir);
    } else {
        println!("no new GFS run available");
    }

    Ok(())
}
