// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response schemas exchanged with the SwiftPay API, plus the
//! recipient records held by the transfer store.
//!
//! The backend is lenient about types (amounts may arrive as numbers or
//! numeric strings, optional text may be `null`), so response types default
//! missing fields, read `null` text as empty and accept either numeric
//! encoding. The core never sees an untyped JSON value.
//!
//! ## Model Categories
//!
//! - **Envelope**: the `{ status, message, data }` wrapper on every response
//! - **Transfer pages**: fee schedule, banks and recent activity
//! - **Beneficiaries**: saved bank and peer favorites
//! - **Recipients**: pending transfer targets accumulated before a batch
//! - **Batch transfers**: multi-recipient submission payloads and receipts

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::amount::parse_amount;

// =============================================================================
// Response Envelope
// =============================================================================

/// Wrapper the API puts around every JSON payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T> {
    /// `"success"` on accepted requests.
    #[serde(default, deserialize_with = "nullable_string")]
    pub status: String,
    /// Human-readable server message.
    #[serde(default, deserialize_with = "nullable_string")]
    pub message: String,
    pub data: T,
}

impl<T> Envelope<T> {
    /// Whether the server reported the request as successful.
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }
}

// =============================================================================
// Transfer Source
// =============================================================================

/// Which transfer flow the pending recipients belong to.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TransferSource {
    /// Domestic transfer flow.
    #[default]
    Normal,
    /// Cross-border flow entered from the "send to Africa" screen.
    SendToAfrica,
}

impl TransferSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferSource::Normal => "normal",
            TransferSource::SendToAfrica => "send_to_africa",
        }
    }
}

impl std::fmt::Display for TransferSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Transfer Pages
// =============================================================================

/// A completed bank transfer as listed in recent activity.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Transfer {
    pub id: u64,
    pub user_id: u64,
    #[serde(deserialize_with = "nullable_string")]
    pub reference: String,
    #[serde(deserialize_with = "nullable_string")]
    pub status: String,
    #[serde(deserialize_with = "number_or_string")]
    pub amount: f64,
    #[serde(deserialize_with = "number_or_string")]
    pub fee: f64,
    #[serde(deserialize_with = "nullable_string")]
    pub description: String,
    #[serde(rename = "type")]
    #[serde(deserialize_with = "nullable_string")]
    pub kind: String,
    #[serde(deserialize_with = "nullable_string")]
    pub account_name: String,
    #[serde(deserialize_with = "nullable_string")]
    pub account_number: String,
    #[serde(deserialize_with = "nullable_string")]
    pub bank_name: String,
    #[serde(deserialize_with = "nullable_string")]
    pub bank_code: String,
    #[serde(deserialize_with = "nullable_string")]
    pub created_at: String,
    #[serde(deserialize_with = "nullable_string")]
    pub updated_at: String,
    pub transfer_id: Option<String>,
    pub bulk_transfer_id: Option<String>,
    pub source_link: Option<String>,
    #[serde(deserialize_with = "nullable_string")]
    pub hash_id: String,
}

/// A bank that can receive transfers.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Bank {
    pub id: u64,
    #[serde(deserialize_with = "nullable_string")]
    pub code: String,
    #[serde(deserialize_with = "nullable_string")]
    pub name: String,
    #[serde(deserialize_with = "nullable_string")]
    pub category: String,
    #[serde(rename = "cbnCode")]
    #[serde(deserialize_with = "nullable_string")]
    pub cbn_code: String,
    #[serde(deserialize_with = "nullable_string")]
    pub logo: String,
    #[serde(rename = "batchNumber")]
    #[serde(deserialize_with = "nullable_string")]
    pub batch_number: String,
}

/// Recent bank transfers, which the API sends either as a JSON array or as
/// an object keyed by position.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RecentTransfers {
    List(Vec<Transfer>),
    Keyed(HashMap<String, Transfer>),
}

impl Default for RecentTransfers {
    fn default() -> Self {
        RecentTransfers::List(Vec::new())
    }
}

impl RecentTransfers {
    /// Flatten into a list. Keyed entries are ordered by numeric key first,
    /// then any non-numeric keys lexicographically.
    pub fn into_ordered(self) -> Vec<Transfer> {
        match self {
            RecentTransfers::List(list) => list,
            RecentTransfers::Keyed(map) => {
                let mut entries: Vec<(String, Transfer)> = map.into_iter().collect();
                entries.sort_by(|(a, _), (b, _)| {
                    match (a.parse::<u64>(), b.parse::<u64>()) {
                        (Ok(x), Ok(y)) => x.cmp(&y),
                        (Ok(_), Err(_)) => std::cmp::Ordering::Less,
                        (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
                        (Err(_), Err(_)) => a.cmp(b),
                    }
                });
                entries.into_iter().map(|(_, transfer)| transfer).collect()
            }
        }
    }
}

/// `data` payload of `GET /bank-transfer`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct BankTransferPage {
    #[serde(deserialize_with = "number_or_string")]
    pub fixed_transfer_fee: f64,
    #[serde(deserialize_with = "number_or_string")]
    pub percentage_transfer_fee: f64,
    /// Field name is misspelled by the API.
    pub recent_tranfers: RecentTransfers,
    pub banks: Vec<Bank>,
}

/// A SwiftPay account holder, used as a peer transfer target.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SwiftpayUser {
    pub id: u64,
    #[serde(deserialize_with = "nullable_string")]
    pub username: String,
    #[serde(deserialize_with = "nullable_string")]
    pub email: String,
    #[serde(deserialize_with = "nullable_string")]
    pub name: String,
    pub profile_photo: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// `data` payload of `GET /swiftpay-transfer`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct SwiftpayTransferPage {
    pub recent_transfers: Vec<SwiftpayUser>,
}

// =============================================================================
// Beneficiaries
// =============================================================================

/// A saved bank beneficiary.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Favorite {
    pub id: u64,
    pub user_id: u64,
    #[serde(deserialize_with = "nullable_string")]
    pub acct_name: String,
    #[serde(deserialize_with = "nullable_string")]
    pub bank_name: String,
    #[serde(deserialize_with = "nullable_string")]
    pub acct_number: String,
    #[serde(deserialize_with = "nullable_string")]
    pub bank_code: String,
    #[serde(rename = "type")]
    #[serde(deserialize_with = "nullable_string")]
    pub kind: String,
    pub swiftpay_username: Option<String>,
    #[serde(deserialize_with = "nullable_string")]
    pub created_at: String,
    #[serde(deserialize_with = "nullable_string")]
    pub updated_at: String,
}

/// A saved SwiftPay peer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SwiftpayFavorite {
    pub id: u64,
    #[serde(deserialize_with = "nullable_string")]
    pub first_name: String,
    #[serde(deserialize_with = "nullable_string")]
    pub last_name: String,
    #[serde(deserialize_with = "nullable_string")]
    pub email: String,
    #[serde(deserialize_with = "nullable_string")]
    pub username: String,
    #[serde(deserialize_with = "nullable_string")]
    pub name: String,
    pub profile_photo: Option<String>,
    #[serde(deserialize_with = "nullable_string")]
    pub hash_id: String,
}

/// `data` payload of both beneficiary endpoints.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Beneficiaries<T> {
    #[serde(default = "Vec::new")]
    pub favorites: Vec<T>,
}

// =============================================================================
// Recipients
// =============================================================================

/// A pending peer transfer, keyed by the recipient's SwiftPay tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransferRecipient {
    /// SwiftPay tag (username) of the recipient.
    pub tag: String,
    /// Name shown on the summary screen.
    pub display_name: String,
    /// Amount as typed by the user.
    pub amount: String,
    pub description: String,
    /// The account the tag resolved to.
    pub user: SwiftpayUser,
}

/// A pending bank transfer, keyed by account number.
///
/// Serialized as-is into the `bank_accounts` list of a batch request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BankRecipient {
    pub account_name: String,
    pub bank_name: String,
    pub bank_code: String,
    pub account_number: String,
    /// Amount as typed by the user.
    pub amount: String,
    pub fee: f64,
    pub description: String,
}

// =============================================================================
// Batch Transfers
// =============================================================================

/// One entry of a multi-recipient SwiftPay transfer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SwiftpayTransferAccount {
    /// Recipient user id, stringified.
    pub id: String,
    pub name: String,
    pub amount: String,
    pub description: String,
    pub source_link: Option<TransferSource>,
}

/// Body of `POST /multiple-swiftpay-transfer`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MultipleSwiftpayTransferRequest {
    pub total_amount: String,
    pub pin: String,
    pub swiftpay_accounts: Vec<SwiftpayTransferAccount>,
}

/// Body of `POST /multiple-bank-transfer`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MultipleBankTransferRequest {
    pub total_amount: String,
    pub pin: String,
    pub bank_accounts: Vec<BankRecipient>,
    pub source_link: Option<TransferSource>,
}

/// Receipt returned for an accepted batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MultipleTransferReceipt {
    pub id: u64,
    pub user_id: u64,
    pub reference: String,
    pub status: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub total_amount: String,
    pub accounts: String,
    pub source_link: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

pub type MultipleTransferResponse = Envelope<MultipleTransferReceipt>;

/// Body of `POST /bank-transfer/beneficiaries/toggle-favorite`.
#[derive(Debug, Clone, Serialize)]
pub struct ToggleBankFavoriteRequest {
    pub transfer_id: u64,
}

/// Body of `POST /swiftpay-transfer/beneficiaries/toggle-favorite`.
#[derive(Debug, Clone, Serialize)]
pub struct ToggleSwiftpayFavoriteRequest {
    pub user_id: u64,
}

// =============================================================================
// Helpers
// =============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

/// Explicit `null` on a text field reads as an empty string.
fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumberOrString>::deserialize(deserializer)? {
        Some(NumberOrString::Number(value)) => value,
        Some(NumberOrString::Text(text)) => parse_amount(&text),
        None => 0.0,
    })
}
