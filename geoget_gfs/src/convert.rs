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

//! external conversion of raw GRIB2 subset files into netCDF data sets

use std::path::{Path,PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use geoget_common::{debug,info};
use crate::errors::{exec_error,Result};

/// turns raw GRIB2 files into netCDF. Implementations wrap whatever external tool does the
/// work so that the download loop does not depend on a specific conversion command
#[async_trait]
pub trait GribConverter: Send + Sync {

    /// convert a single raw GRIB2 file, returning the path of the netCDF result
    async fn convert (&self, raw: &Path) -> Result<PathBuf>;

    /// merge several netCDF files into one
    async fn merge (&self, parts: &[PathBuf], output: &Path) -> Result<()>;
}

/// converter using the `cdo` climate data operators, which have to be installed on this machine
pub struct CdoConverter {
    pub cmd: String
}

impl Default for CdoConverter {
    fn default()->Self {
        CdoConverter{ cmd: "cdo".to_string() }
    }
}

#[async_trait]
impl GribConverter for CdoConverter {
    async fn convert (&self, raw: &Path) -> Result<PathBuf> {
        let nc_path = raw.with_extension("nc");

        let mut cmd = Command::new( self.cmd.as_str());
        cmd.arg("-f").arg("nc").arg("copy")
            .arg( raw.as_os_str())
            .arg( nc_path.as_os_str());

        execute_cmd( &mut cmd).await?;
        Ok(nc_path)
    }

    async fn merge (&self, parts: &[PathBuf], output: &Path) -> Result<()> {
        let mut cmd = Command::new( self.cmd.as_str());
        cmd.arg("-O").arg("merge");
        for part in parts {
            cmd.arg( part.as_os_str());
        }
        cmd.arg( output.as_os_str());

        execute_cmd( &mut cmd).await
    }
}

async fn execute_cmd (cmd: &mut Command) -> Result<()> {
    debug!("executing {cmd:?}");

    match cmd.spawn() {
        Ok(mut child) => {
            match child.wait().await {
                Ok(status) => {
                    if status.success() {
                        Ok(())
                    } else {
                        Err( exec_error( format!("{:?} failed with {}", cmd.as_std().get_program(), status)))
                    }
                }
                Err(e) => Err( exec_error( e.to_string()))
            }
        }
        Err(e) => Err( exec_error( e.to_string()))
    }
}
