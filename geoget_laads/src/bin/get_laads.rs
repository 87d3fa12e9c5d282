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

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use geoget_common::{define_cli,check_cli};
use geoget_common::datetime::WallClock;
use geoget_common::process::set_ctrlc_handler;
use geoget_build;
use geoget_laads::{
    load_config, laads_data_dir, submit_requests, download_archive_files,
    LaadsClient, LaadsConfig, LaadsCredentials, LaadsOrderRequest, LaadsRequestConfig,
    OrderLog, OrderManager, Result, ORDER_LOG_NAME,
};

define_cli! { ARGS [about="LAADS DAAC search/order/download tool"] =
    laads_config: String [help="filename of LAADS config file", short,long,default_value="laads.ron"],
    credentials: String [help="filename of LAADS credentials file", long,default_value="laads_credentials.ron"],
    raw: bool [help="download unprocessed archive files directly, without ordering", long],
    submit_only: bool [help="submit orders but don't run the order manager", long],
    manage_only: bool [help="only process orders already in the log, don't submit new ones", long],
    replace: bool [help="re-download files that already exist locally", long],
    request_configs: Vec<String> [help="filenames of LaadsRequestConfig files"]
}

#[tokio::main]
async fn main () -> Result<()> {
    geoget_build::set_bin_context!();
    check_cli!(ARGS);

    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::from_default_env())  // use RUST_LOG to set max level
        .init();

    let config: LaadsConfig = load_config( &ARGS.laads_config)?;
    let credentials: LaadsCredentials = load_config( &ARGS.credentials)?;
    let requests = load_requests( &ARGS.request_configs)?;

    let client = LaadsClient::new( Arc::new( config.clone()), credentials)?;
    let data_dir = laads_data_dir();

    if ARGS.raw {
        for request in &requests {
            let paths = download_archive_files( &client, request, &data_dir, ARGS.replace).await?;
            println!("retrieved {} archive files into {:?}", paths.len(), data_dir);
        }
        return Ok(())
    }

    let mut log = OrderLog::read_or_new( data_dir.join( ORDER_LOG_NAME))?;

    if !ARGS.manage_only {
        let n = submit_requests( &client, &requests, &mut log, &WallClock).await;
        println!("{} orders submitted", n);
    }

    if !ARGS.submit_only {
        let cancel = CancellationToken::new();
        let tok = cancel.clone();
        set_ctrlc_handler( move || tok.cancel());

        let mut manager = OrderManager::new( client, WallClock, log, data_dir, &config);
        manager.run( &cancel).await?;
        println!("order manager done, log at {:?}", manager.log().path());
    }

    Ok(())
}

fn load_requests (filenames: &[String]) -> Result<Vec<LaadsOrderRequest>> {
    let mut requests: Vec<LaadsOrderRequest> = Vec::with_capacity( filenames.len());
    for filename in filenames {
        let req_cfg: LaadsRequestConfig = load_config( filename)?;
        requests.push( LaadsOrderRequest::new( req_cfg));
    }
    Ok(requests)
}
