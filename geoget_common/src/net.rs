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

use std::{fs::File, io::Write, path::Path};
use reqwest::{Client, StatusCode, header::HeaderMap};

use crate::define_error;

define_error! { pub GeogetNetError =
    IOError( #[from] std::io::Error ) : "IO error: {0}",
    NotFoundError(String) : "not found {0}",
    HttpError( #[from] reqwest::Error ) : "http error: {0}",
    OpFailed(String) : "operation failed: {0}"
}

pub type Result<T> = std::result::Result<T,GeogetNetError>;

/// stream the given url into the file at `path`, returning the number of bytes written.
/// Respective server errors are mapped into our own error variants so that callers can
/// tell a permanent 404 from other failures
pub async fn download_url (client: &Client, url: &str, opt_headers: &Option<HeaderMap>, path: impl AsRef<Path>) -> Result<u64> {
    let mut file = File::create( path.as_ref())?;

    let mut request = client.get(url);
    if let Some(headers) = opt_headers {
        request = request.headers( headers.clone());
    }

    let mut response = request.send().await?;
    match response.status() {
        StatusCode::OK => {
            let mut len: u64 = 0;
            while let Some(chunk) = response.chunk().await? {
                file.write_all(&chunk)?;
                len += chunk.len() as u64;
            }
            file.flush()?;
            Ok(len)
        }
        StatusCode::NOT_FOUND => Err( GeogetNetError::NotFoundError(url.to_string())),
        other => Err( GeogetNetError::OpFailed( format!("download of {} failed with response status {}", url, other.as_str())))
    }
}

/// variant of [`download_url`] that downloads into a temp file in the target directory and only
/// renames it to `path` once the download is complete, so that a partial download is never
/// visible under the final name. Zero length responses are treated as failures
pub async fn download_url_atomic (client: &Client, url: &str, opt_headers: &Option<HeaderMap>, path: impl AsRef<Path>) -> Result<u64> {
    let path = path.as_ref();
    let dir = path.parent().ok_or( GeogetNetError::OpFailed( format!("no parent dir for {:?}", path)))?;

    let tmp_file = tempfile::NamedTempFile::new_in(dir)?;
    let len = download_url( client, url, opt_headers, tmp_file.path()).await?;
    if len == 0 {
        return Err( GeogetNetError::OpFailed( format!("empty response for {}", url)))
    }

    tmp_file.persist(path).map_err(|e| GeogetNetError::IOError(e.error))?;
    Ok(len)
}
