// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session-scoped state shared by the transfer screens.
//!
//! A [`SessionState`] owns one [`TransferAccumulator`] and one
//! [`RemoteDataCache`]. Clones share both, so every screen of a session sees
//! the same pending recipients and the same snapshot.

use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cache::{RefreshReport, RemoteDataCache};
use crate::error::BatchError;
use crate::models::MultipleTransferResponse;
use crate::providers::{BatchTransferApi, TransferApi};
use crate::store::{SourceSwitchPolicy, TransferAccumulator};

pub struct SessionState<A> {
    pub transfers: Arc<RwLock<TransferAccumulator>>,
    pub data: RemoteDataCache<A>,
}

impl<A> Clone for SessionState<A> {
    fn clone(&self) -> Self {
        Self {
            transfers: Arc::clone(&self.transfers),
            data: self.data.clone(),
        }
    }
}

impl<A: TransferApi> SessionState<A> {
    pub fn new(api: A, policy: SourceSwitchPolicy) -> Self {
        Self {
            transfers: Arc::new(RwLock::new(TransferAccumulator::with_switch_policy(policy))),
            data: RemoteDataCache::new(api),
        }
    }

    /// Start a session: clear any leftover recipients and fetch the
    /// snapshot in the background.
    pub async fn mount(&self) -> JoinHandle<RefreshReport> {
        self.transfers.write().await.reset();
        info!("transfer session mounted");
        self.data.spawn_refresh()
    }

    /// Drop all pending recipients and return to the normal source.
    pub async fn reset(&self) {
        self.transfers.write().await.reset();
    }

    /// End the session. Fetches still in flight are discarded.
    pub fn dispose(&self) {
        info!("transfer session disposed");
        self.data.dispose();
    }
}

impl<A: TransferApi + BatchTransferApi> SessionState<A> {
    /// Submit the pending SwiftPay peers as one batch.
    ///
    /// The peer list is cleared only when the server reports success.
    pub async fn submit_swiftpay_batch(
        &self,
        pin: &str,
    ) -> Result<MultipleTransferResponse, BatchError> {
        let request = self.transfers.read().await.swiftpay_batch(pin)?;
        let count = request.swiftpay_accounts.len();

        let response = self
            .data
            .api()
            .multiple_swiftpay_transfer(&request)
            .await?;

        if response.is_success() {
            self.transfers.write().await.clear_recipients();
            info!(recipients = count, total = %request.total_amount, "swiftpay batch submitted");
        } else {
            warn!(status = %response.status, message = %response.message, "swiftpay batch not accepted");
        }
        Ok(response)
    }

    /// Submit the pending bank accounts as one batch.
    ///
    /// The bank list is cleared only when the server reports success.
    pub async fn submit_bank_batch(
        &self,
        pin: &str,
    ) -> Result<MultipleTransferResponse, BatchError> {
        let request = self.transfers.read().await.bank_batch(pin)?;
        let count = request.bank_accounts.len();

        let response = self.data.api().multiple_bank_transfer(&request).await?;

        if response.is_success() {
            self.transfers.write().await.clear_bank_recipients();
            info!(recipients = count, total = %request.total_amount, "bank batch submitted");
        } else {
            warn!(status = %response.status, message = %response.message, "bank batch not accepted");
        }
        Ok(response)
    }
}
