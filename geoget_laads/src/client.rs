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

//! http client for the MODAPS web services and the LAADS archive server. The service
//! endpoints (search, order, status, release) are plain GET requests answered with small
//! XML-ish payloads, the archive endpoints (manifest, order files, allData files) require
//! an authorization token and can time out under load, hence the bounded retries

use std::path::{Path,PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client,StatusCode};
use reqwest::header::{HeaderMap,HeaderValue,AUTHORIZATION};

use geoget_common::net::download_url_atomic;
use geoget_common::{debug,warn};

use crate::errors::{op_failed,remote_error,GeogetLaadsError,Result};
use crate::manager::OrderService;
use crate::scrape::{self,ManifestEntry};
use crate::{LaadsConfig,LaadsCredentials,LaadsOrderRequest,OrderStatus};

pub struct LaadsClient {
    client: Client,
    config: Arc<LaadsConfig>,
    credentials: LaadsCredentials,
    auth_headers: Option<HeaderMap>,
}

impl LaadsClient {

    /// credentials are checked and turned into request headers here so that a bad
    /// configuration surfaces before the first request goes out
    pub fn new (config: Arc<LaadsConfig>, credentials: LaadsCredentials) -> Result<Self> {
        credentials.check()?;

        let mut auth = HeaderMap::new();
        let value = HeaderValue::from_str( &format!("Bearer {}", credentials.key))
            .map_err( |_| op_failed( "app key not usable as http header value"))?;
        auth.insert( AUTHORIZATION, value);

        Ok( LaadsClient{ client: Client::new(), config, credentials, auth_headers: Some(auth) })
    }

    pub fn config (&self) -> &LaadsConfig { &self.config }

    pub fn email (&self) -> &str { &self.credentials.email }

    /// ids of all archive files matching the search parameters of the request.
    /// An empty result is valid and means there is nothing to order
    pub async fn search (&self, request: &LaadsOrderRequest) -> Result<Vec<String>> {
        let url = request.search_url( &self.config);
        let text = self.fetch_text( &url, &None).await?;
        Ok( scrape::return_values( &text))
    }

    /// submit an order for previously searched file ids. Returns the provider assigned order id
    pub async fn submit_order (&self, request: &LaadsOrderRequest, file_ids: &[String]) -> Result<String> {
        let url = request.order_url( &self.config, file_ids, &self.credentials.email);
        let text = self.fetch_text( &url, &None).await?;
        scrape::first_return_value( &text)
            .ok_or_else( || remote_error( format!("order submission response without order id: {}", text)))
    }

    /// the archive file name behind a file id, scraped from its details page
    pub async fn fetch_file_name (&self, collection: &str, file_id: &str) -> Result<String> {
        let url = self.config.file_details_url( collection, file_id);
        let text = self.fetch_text_with_retry( &url, &None).await?;
        scrape::file_detail_name( &text)
            .ok_or_else( || remote_error( format!("no file name in details page for {}", file_id)))
    }

    /// direct download of an unprocessed archive file (no order involved)
    pub async fn fetch_archive_file (&self, collection: &str, product: &str, date: &NaiveDate,
                                     filename: &str, dir: &Path) -> Result<PathBuf> {
        let url = self.config.archive_file_url( collection, product, date, filename);
        let path = dir.join( filename);
        self.download_with_retry( &url, &path).await?;
        Ok(path)
    }

    async fn fetch_text (&self, url: &str, opt_headers: &Option<HeaderMap>) -> Result<String> {
        let mut request = self.client.get(url);
        if let Some(headers) = opt_headers { request = request.headers( headers.clone()) }

        let response = request.send().await?;
        match response.status() {
            StatusCode::OK => Ok( response.text().await?),
            status => Err( op_failed( format!("GET {} returned status {}", url, status)))
        }
    }

    async fn fetch_text_with_retry (&self, url: &str, opt_headers: &Option<HeaderMap>) -> Result<String> {
        let mut attempt: u8 = 0;
        loop {
            match self.fetch_text( url, opt_headers).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    attempt += 1;
                    if attempt >= self.config.max_fetch_retry {
                        return Err( GeogetLaadsError::TransientFetchError( format!("{} after {} attempts: {}", url, attempt, e)))
                    }
                    warn!("attempt {} of {} failed for {} ({}), retrying in {} sec",
                          attempt, self.config.max_fetch_retry, url, e, self.config.retry_delay.as_secs());
                    tokio::time::sleep( self.config.retry_delay).await;
                }
            }
        }
    }

    async fn download_with_retry (&self, url: &str, path: &Path) -> Result<u64> {
        let mut attempt: u8 = 0;
        loop {
            match download_url_atomic( &self.client, url, &self.auth_headers, path).await {
                Ok(len) => {
                    debug!("retrieved {} ({} bytes)", url, len);
                    return Ok(len)
                }
                Err(e) => {
                    attempt += 1;
                    if attempt >= self.config.max_fetch_retry {
                        return Err( GeogetLaadsError::TransientFetchError( format!("{} after {} attempts: {}", url, attempt, e)))
                    }
                    warn!("attempt {} of {} failed for {} ({}), retrying in {} sec",
                          attempt, self.config.max_fetch_retry, url, e, self.config.retry_delay.as_secs());
                    tokio::time::sleep( self.config.retry_delay).await;
                }
            }
        }
    }
}

#[async_trait]
impl OrderService for LaadsClient {

    /// status queries get the retry treatment since the whole order processing hinges on them
    async fn get_status (&self, order_id: &str) -> Result<OrderStatus> {
        let url = self.config.status_url( order_id);
        let text = self.fetch_text_with_retry( &url, &None).await?;
        let value = scrape::first_return_value( &text)
            .ok_or_else( || remote_error( format!("status response for order {} without payload", order_id)))?;
        Ok( OrderStatus::from( value.as_str()))
    }

    async fn fetch_manifest (&self, order_id: &str) -> Result<Vec<ManifestEntry>> {
        let url = self.config.manifest_url( order_id);
        let text = self.fetch_text_with_retry( &url, &self.auth_headers).await?;
        Ok( scrape::parse_checksum_manifest( &text))
    }

    async fn fetch_order_file (&self, order_id: &str, filename: &str, dir: &Path) -> Result<PathBuf> {
        let url = self.config.order_file_url( order_id, filename);
        let path = dir.join( filename);
        self.download_with_retry( &url, &path).await?;
        Ok(path)
    }

    /// release is a single shot, a failed release just leaves the order for the next cycle
    async fn release (&self, order_id: &str) -> Result<bool> {
        let url = self.config.release_url( order_id, &self.credentials.email);
        let text = self.fetch_text( &url, &None).await?;
        let value = scrape::first_return_value( &text)
            .ok_or_else( || remote_error( format!("release response for order {} without payload", order_id)))?;
        Ok( value == "1")
    }
}
