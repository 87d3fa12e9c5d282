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

use thiserror::Error;
use reqwest;

pub type Result<T> = std::result::Result<T, GeogetGfsError>;

#[derive(Error,Debug)]
pub enum GeogetGfsError {
    #[error("IO error {0}")]
    IOError( #[from] std::io::Error),

    #[error("config error {0}")]
    ConfigError( #[from] geoget_build::GeogetBuildError),

    #[error("http error {0}")]
    HttpError( #[from] reqwest::Error),

    #[error("download error {0}")]
    NetError( #[from] geoget_common::net::GeogetNetError),

    #[error("run log CSV error {0}")]
    CsvError( #[from] csv::Error),

    /// the server answered but the listing did not contain what we need
    #[error("unexpected server response {0}")]
    RemoteError(String),

    /// repeated attempts to fetch the same resource all failed
    #[error("fetch retry limit exceeded {0}")]
    TransientFetchError(String),

    /// an external converter process could not be run or reported failure
    #[error("command execution failed {0}")]
    ExecError(String),

    /// a generic error
    #[error("operation failed {0}")]
    OpFailed(String)
}

pub fn op_failed (msg: impl ToString)->GeogetGfsError {
    GeogetGfsError::OpFailed(msg.to_string())
}

pub fn remote_error (msg: impl ToString)->GeogetGfsError {
    GeogetGfsError::RemoteError(msg.to_string())
}

pub fn exec_error (msg: impl ToString)->GeogetGfsError {
    GeogetGfsError::ExecError(msg.to_string())
}
