// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Remote Data Cache
//!
//! In-memory snapshot of the server-side data the transfer screens read:
//! fee schedule, banks, recent activity and saved beneficiaries.
//!
//! ## Refresh Strategy
//!
//! [`RemoteDataCache::refresh`] spawns one task per [`Slice`]:
//!
//! 1. `GET /bank-transfer` - fees, banks, recent bank transfers
//! 2. `GET /swiftpay-transfer` - recent peer transfers
//! 3. `GET /bank-transfer/beneficiaries` - saved bank beneficiaries
//! 4. `GET /swiftpay-transfer/beneficiaries` - saved peers
//!
//! Each task yields a [`SnapshotUpdate`] that is applied as soon as it
//! arrives, in whatever order the tasks finish. A failed fetch is logged and
//! leaves its slice at the previous value; it never affects the other three
//! and never fails the refresh.
//!
//! ## Overlapping Refreshes
//!
//! Every refresh takes a new generation number. A result is applied only if
//! no newer refresh has started since its own, so a slow response from an
//! older refresh can never overwrite data or a `Pending` status owned by a
//! newer one. Stale results are reported as superseded.
//!
//! ## Disposal
//!
//! [`RemoteDataCache::dispose`] cancels the cache's `CancellationToken`.
//! In-flight fetches are aborted and any result that has not been applied
//! yet is dropped.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::providers::TransferApi;

pub mod snapshot;

pub use snapshot::{RemoteSnapshot, Slice, SnapshotUpdate};

/// Lifecycle of one slice's most recent fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FetchStatus {
    Idle,
    Pending,
    Succeeded { at: DateTime<Utc> },
    Failed { at: DateTime<Utc>, error: String },
}

/// Outcome of one [`RemoteDataCache::refresh`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    /// Slices applied to the snapshot, in completion order.
    pub succeeded: Vec<Slice>,
    /// Slices whose fetch failed, in completion order.
    pub failed: Vec<(Slice, ApiError)>,
    /// Slices whose result was dropped because a newer refresh started.
    pub superseded: Vec<Slice>,
    /// The cache was disposed before every result was applied.
    pub discarded: bool,
}

impl RefreshReport {
    /// Every slice was fetched and applied.
    pub fn is_complete(&self) -> bool {
        !self.discarded && self.failed.is_empty() && self.succeeded.len() == Slice::ALL.len()
    }
}

struct CacheState {
    snapshot: RemoteSnapshot,
    statuses: BTreeMap<Slice, FetchStatus>,
    /// Generation of the most recently started refresh.
    generation: u64,
}

impl Default for CacheState {
    fn default() -> Self {
        Self {
            snapshot: RemoteSnapshot::default(),
            statuses: Slice::ALL
                .into_iter()
                .map(|slice| (slice, FetchStatus::Idle))
                .collect(),
            generation: 0,
        }
    }
}

pub struct RemoteDataCache<A> {
    api: Arc<A>,
    state: Arc<RwLock<CacheState>>,
    shutdown: CancellationToken,
}

impl<A> Clone for RemoteDataCache<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            state: Arc::clone(&self.state),
            shutdown: self.shutdown.clone(),
        }
    }
}

impl<A: TransferApi> RemoteDataCache<A> {
    pub fn new(api: A) -> Self {
        Self::from_arc(Arc::new(api))
    }

    /// Create a cache sharing an API client with other components.
    pub fn from_arc(api: Arc<A>) -> Self {
        Self {
            api,
            state: Arc::new(RwLock::new(CacheState::default())),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    /// Copy of the current snapshot.
    pub async fn snapshot(&self) -> RemoteSnapshot {
        self.state.read().await.snapshot.clone()
    }

    pub async fn status(&self, slice: Slice) -> FetchStatus {
        self.state
            .read()
            .await
            .statuses
            .get(&slice)
            .cloned()
            .unwrap_or(FetchStatus::Idle)
    }

    pub async fn statuses(&self) -> BTreeMap<Slice, FetchStatus> {
        self.state.read().await.statuses.clone()
    }

    pub fn is_disposed(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Stop applying fetch results. Shared by every clone of this cache.
    pub fn dispose(&self) {
        if !self.shutdown.is_cancelled() {
            info!("Remote data cache disposed");
        }
        self.shutdown.cancel();
    }

    /// Run [`refresh`](Self::refresh) as a background task.
    pub fn spawn_refresh(&self) -> JoinHandle<RefreshReport> {
        let cache = self.clone();
        tokio::spawn(async move { cache.refresh().await })
    }

    /// Fetch all four slices concurrently and merge each success.
    pub async fn refresh(&self) -> RefreshReport {
        let mut report = RefreshReport::default();
        if self.is_disposed() {
            debug!("Remote data cache disposed, skipping refresh");
            report.discarded = true;
            return report;
        }

        let generation = {
            let mut state = self.state.write().await;
            state.generation += 1;
            for slice in Slice::ALL {
                state.statuses.insert(slice, FetchStatus::Pending);
            }
            state.generation
        };

        let mut outstanding: BTreeSet<Slice> = Slice::ALL.into_iter().collect();
        let mut tasks = JoinSet::new();
        for slice in Slice::ALL {
            let api = Arc::clone(&self.api);
            tasks.spawn(async move { (slice, fetch_slice(api.as_ref(), slice).await) });
        }

        loop {
            let next = tokio::select! {
                _ = self.shutdown.cancelled() => None,
                joined = tasks.join_next() => Some(joined),
            };

            let Some(joined) = next else {
                tasks.abort_all();
                info!(
                    outstanding = outstanding.len(),
                    "Remote data cache disposed during refresh, discarding in-flight results"
                );
                report.discarded = true;
                return report;
            };

            let Some(joined) = joined else {
                break;
            };

            match joined {
                Ok((slice, result)) => {
                    outstanding.remove(&slice);
                    self.settle(generation, slice, result, &mut report).await;
                }
                Err(e) => {
                    warn!(error = %e, "Transfer data fetch task did not complete");
                }
            }
        }

        // Tasks that panicked never reported their slice.
        for slice in outstanding {
            self.settle(
                generation,
                slice,
                Err(ApiError::Request("fetch task aborted".to_string())),
                &mut report,
            )
            .await;
        }

        info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            superseded = report.superseded.len(),
            "Transfer data refresh finished"
        );
        report
    }

    async fn settle(
        &self,
        generation: u64,
        slice: Slice,
        result: Result<SnapshotUpdate, ApiError>,
        report: &mut RefreshReport,
    ) {
        let mut state = self.state.write().await;
        if self.is_disposed() {
            debug!(slice = %slice, "Discarding fetch result after disposal");
            report.discarded = true;
            return;
        }
        if state.generation != generation {
            debug!(
                slice = %slice,
                generation,
                latest = state.generation,
                "Dropping result of superseded refresh"
            );
            report.superseded.push(slice);
            return;
        }

        match result {
            Ok(update) => {
                state.snapshot.apply(update);
                state
                    .statuses
                    .insert(slice, FetchStatus::Succeeded { at: Utc::now() });
                debug!(slice = %slice, "Transfer data slice refreshed");
                report.succeeded.push(slice);
            }
            Err(e) => {
                warn!(
                    slice = %slice,
                    error = %e,
                    "Failed to fetch transfer data, keeping previous values"
                );
                state.statuses.insert(
                    slice,
                    FetchStatus::Failed {
                        at: Utc::now(),
                        error: e.to_string(),
                    },
                );
                report.failed.push((slice, e));
            }
        }
    }
}

async fn fetch_slice<A: TransferApi>(api: &A, slice: Slice) -> Result<SnapshotUpdate, ApiError> {
    Ok(match slice {
        Slice::FeesAndActivity => SnapshotUpdate::from(api.bank_transfer_page().await?),
        Slice::PeerActivity => SnapshotUpdate::from(api.swiftpay_transfer_page().await?),
        Slice::BankFavorites => SnapshotUpdate::from(api.bank_beneficiaries().await?),
        Slice::PeerFavorites => SnapshotUpdate::from(api.swiftpay_beneficiaries().await?),
    })
}
