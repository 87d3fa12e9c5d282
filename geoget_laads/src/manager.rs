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

//! the order lifecycle state machine. [`OrderManager`] drives every order of an [`OrderLog`]
//! to a terminal status: it polls the provider for status changes, downloads and verifies
//! staged files once an order becomes available, releases fully verified orders and records
//! each transition in the log so that an interrupted run resumes where it left off

use std::path::{Path,PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use geoget_common::datetime::Scheduler;
use geoget_common::fs::ensure_writable_dir;
use geoget_common::{debug,info,warn};

use crate::audit::{write_audit,FileRecord};
use crate::checksum;
use crate::errors::Result;
use crate::order_log::OrderLog;
use crate::scrape::ManifestEntry;
use crate::{LaadsConfig,OrderStatus};

/// the provider operations [`OrderManager`] depends on. Factored out of [`crate::LaadsClient`]
/// so that the control loop can be exercised without network access. Implementations own the
/// transient failure handling, i.e. an `Err` means bounded retries were already exhausted
#[async_trait]
pub trait OrderService: Send + Sync {

    /// current provider side status of the given order
    async fn get_status (&self, order_id: &str) -> Result<OrderStatus>;

    /// the parsed checksum manifest of a staged order
    async fn fetch_manifest (&self, order_id: &str) -> Result<Vec<ManifestEntry>>;

    /// download one file of a staged order into `dir`, returning the local path
    async fn fetch_order_file (&self, order_id: &str, filename: &str, dir: &Path) -> Result<PathBuf>;

    /// notify the provider that local processing of the order is finished so it can clean up
    /// its staging area. Returns whether the provider acknowledged
    async fn release (&self, order_id: &str) -> Result<bool>;
}

/// the polling control loop over all orders of an [`OrderLog`].
/// Orders in a terminal status are never touched again. Per-order failures are logged and
/// retried on the next cycle, only conditions that make the loop itself unusable (config,
/// local IO on the log) abort the run
pub struct OrderManager<S,C> where S: OrderService, C: Scheduler {
    service: S,
    scheduler: C,
    log: OrderLog,
    download_dir: PathBuf,

    check_interval: Duration,
    cooldown: Duration,
    max_download_retry: u8,
}

impl <S,C> OrderManager<S,C> where S: OrderService, C: Scheduler {

    pub fn new (service: S, scheduler: C, log: OrderLog, download_dir: PathBuf, config: &LaadsConfig) -> Self {
        OrderManager {
            service, scheduler, log, download_dir,
            check_interval: config.check_interval,
            cooldown: config.cooldown,
            max_download_retry: config.max_download_retry,
        }
    }

    pub fn log (&self) -> &OrderLog { &self.log }

    pub fn into_log (self) -> OrderLog { self.log }

    /// run until every logged order is terminal or `cancel` fires. A log with no pending
    /// orders returns right away, without contacting the provider
    pub async fn run (&mut self, cancel: &CancellationToken) -> Result<()> {
        ensure_writable_dir( &self.download_dir)?;

        loop {
            if cancel.is_cancelled() {
                info!("order manager cancelled with {} orders pending", self.log.non_terminal_ids().len());
                return Ok(())
            }
            if self.log.all_terminal() {
                info!("all orders in terminal status, order manager done");
                return Ok(())
            }

            self.poll_orders().await?;
            self.download_available_orders().await?;

            if self.log.all_terminal() {
                info!("all orders in terminal status, order manager done");
                return Ok(())
            }
            self.scheduler.sleep( self.check_interval).await;
        }
    }

    /// one status poll pass over all non-terminal orders. Status changes are persisted
    /// right away, unchanged statuses leave the recorded transition time untouched
    async fn poll_orders (&mut self) -> Result<()> {
        for order_id in self.log.non_terminal_ids() {
            match self.service.get_status( &order_id).await {
                Ok(status) => {
                    if self.log.update( &order_id, status.clone(), self.scheduler.now()) {
                        info!("order {} changed to status '{}'", order_id, status);
                        self.log.save()?;
                    }
                }
                Err(e) => warn!("status query for order {} failed: {}", order_id, e)
            }
        }
        Ok(())
    }

    /// one download pass over all orders that are available and have been for longer than
    /// the cooldown period (the provider can flag orders available slightly before the files
    /// are actually staged on the download server)
    async fn download_available_orders (&mut self) -> Result<()> {
        for order_id in self.log.ids_with_status( &OrderStatus::Available) {
            let now = self.scheduler.now();
            if let Some(elapsed) = self.log.elapsed_since_transition( &order_id, now) {
                if elapsed > self.cooldown {
                    match self.process_order( &order_id).await {
                        Ok(status) => {
                            if self.log.update( &order_id, status.clone(), self.scheduler.now()) {
                                info!("order {} finalized with status '{}'", order_id, status);
                                self.log.save()?;
                            }
                        }
                        Err(e) => warn!("processing of order {} failed: {}", order_id, e) // stays available, retried next cycle
                    }
                } else {
                    debug!("order {} available since {} sec, waiting for cooldown", order_id, elapsed.as_secs());
                }
            }
        }
        Ok(())
    }

    /// download and verify all files of a staged order, write the per-order audit record and
    /// release the order if everything verified. Returns the terminal status for the order.
    /// Note this deliberately finalizes orders with unverified files instead of retrying them
    /// on the next cycle, the per-file retry ceiling is the bound on repeated downloads
    async fn process_order (&self, order_id: &str) -> Result<OrderStatus> {
        let entries = self.service.fetch_manifest( order_id).await?;
        info!("order {} staged with {} files", order_id, entries.len());

        let mut records: Vec<FileRecord> = Vec::with_capacity( entries.len());
        for entry in &entries {
            records.push( self.acquire_file( order_id, entry).await?);
        }

        let audit = write_audit( &self.download_dir, order_id, &records)?;
        debug!("per-file record for order {} written to {:?}", order_id, audit);

        if records.iter().all( |r| r.verified) {
            if self.service.release( order_id).await? {
                info!("order {} released", order_id);
                Ok(OrderStatus::Complete)
            } else {
                warn!("release of order {} not acknowledged", order_id);
                Ok(OrderStatus::VerificationFailed)
            }
        } else {
            let n = records.iter().filter( |r| !r.verified).count();
            warn!("order {} has {} unverified files, not released (check {:?})", order_id, n, audit);
            Ok(OrderStatus::VerificationFailed)
        }
    }

    /// obtain one verified file of a staged order. An existing local copy that matches the
    /// expected checksum is accepted without re-download. Otherwise the file is downloaded
    /// up to `max_download_retry` times, re-computing the checksum after each attempt.
    /// A manifest entry without expected checksum accepts the first download and records the
    /// computed checksum (trust-on-first-use, there is nothing to compare against)
    async fn acquire_file (&self, order_id: &str, entry: &ManifestEntry) -> Result<FileRecord> {
        let path = self.download_dir.join( &entry.name);

        if path.is_file() {
            if let Some(expected) = entry.checksum {
                if checksum::verify( &path, expected)? {
                    debug!("existing file {} verified", entry.name);
                    return Ok( FileRecord{ checksum: Some(expected), name: entry.name.clone(), verified: true })
                }
            }
        }

        let mut attempt: u8 = 0;
        while attempt < self.max_download_retry {
            attempt += 1;
            let path = self.service.fetch_order_file( order_id, &entry.name, &self.download_dir).await?;
            let computed = checksum::compute( &path)?;

            match entry.checksum {
                Some(expected) => {
                    if computed == expected {
                        debug!("{} of order {} verified", entry.name, order_id);
                        return Ok( FileRecord{ checksum: Some(expected), name: entry.name.clone(), verified: true })
                    }
                    warn!("checksum mismatch for {} of order {} (attempt {} of {})",
                          entry.name, order_id, attempt, self.max_download_retry);
                }
                None => {
                    info!("no expected checksum for {} of order {}, accepting computed {}", entry.name, order_id, computed);
                    return Ok( FileRecord{ checksum: Some(computed), name: entry.name.clone(), verified: true })
                }
            }
        }

        warn!("{} of order {} not verified after {} attempts", entry.name, order_id, self.max_download_retry);
        Ok( FileRecord{ checksum: entry.checksum, name: entry.name.clone(), verified: false })
    }
}
