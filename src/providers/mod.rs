// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Providers
//!
//! The SwiftPay HTTP API is the only external collaborator of this crate.
//! Its calls are split into two traits so the stores can be driven by a fake
//! in tests:
//!
//! - [`TransferApi`] - the four reads that feed the remote data cache
//! - [`BatchTransferApi`] - multi-recipient batch submission

use std::future::Future;

use crate::error::ApiError;
use crate::models::{
    BankTransferPage, Beneficiaries, Favorite, MultipleBankTransferRequest,
    MultipleSwiftpayTransferRequest, MultipleTransferResponse, SwiftpayFavorite,
    SwiftpayTransferPage,
};

pub mod swiftpay;
pub mod token;

pub use swiftpay::SwiftpayClient;
pub use token::{InMemoryTokenStore, TokenStore};

/// Read side of the transfer API.
///
/// Each method returns the unwrapped `data` payload of its endpoint.
pub trait TransferApi: Send + Sync + 'static {
    /// Fee schedule, bank list and recent bank transfers.
    fn bank_transfer_page(
        &self,
    ) -> impl Future<Output = Result<BankTransferPage, ApiError>> + Send;

    /// Recent SwiftPay peer transfers.
    fn swiftpay_transfer_page(
        &self,
    ) -> impl Future<Output = Result<SwiftpayTransferPage, ApiError>> + Send;

    /// Saved bank beneficiaries.
    fn bank_beneficiaries(
        &self,
    ) -> impl Future<Output = Result<Beneficiaries<Favorite>, ApiError>> + Send;

    /// Saved SwiftPay peers.
    fn swiftpay_beneficiaries(
        &self,
    ) -> impl Future<Output = Result<Beneficiaries<SwiftpayFavorite>, ApiError>> + Send;
}

/// Write side of the transfer API.
pub trait BatchTransferApi: Send + Sync + 'static {
    fn multiple_swiftpay_transfer(
        &self,
        request: &MultipleSwiftpayTransferRequest,
    ) -> impl Future<Output = Result<MultipleTransferResponse, ApiError>> + Send;

    fn multiple_bank_transfer(
        &self,
        request: &MultipleBankTransferRequest,
    ) -> impl Future<Output = Result<MultipleTransferResponse, ApiError>> + Send;
}
