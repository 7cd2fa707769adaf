// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Snapshot of server-side transfer data and the partial updates that
//! build it.
//!
//! Every [`SnapshotUpdate`] belongs to exactly one [`Slice`] and
//! [`RemoteSnapshot::apply`] writes only the fields that slice owns:
//!
//! | Slice | Fields |
//! |-------|--------|
//! | `fees_and_activity` | `fixed_fee`, `percentage_fee`, `recent_transfers`, `banks` |
//! | `peer_activity` | `peer_recent_transfers` |
//! | `bank_favorites` | `bank_favorites` |
//! | `peer_favorites` | `peer_favorites` |
//!
//! Updates therefore commute: applying the same set in any order yields the
//! same snapshot.

use serde::Serialize;

use crate::models::{
    Bank, BankTransferPage, Beneficiaries, Favorite, SwiftpayFavorite, SwiftpayTransferPage,
    SwiftpayUser, Transfer,
};

/// One independently fetched part of the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Slice {
    FeesAndActivity,
    PeerActivity,
    BankFavorites,
    PeerFavorites,
}

impl Slice {
    pub const ALL: [Slice; 4] = [
        Slice::FeesAndActivity,
        Slice::PeerActivity,
        Slice::BankFavorites,
        Slice::PeerFavorites,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Slice::FeesAndActivity => "fees_and_activity",
            Slice::PeerActivity => "peer_activity",
            Slice::BankFavorites => "bank_favorites",
            Slice::PeerFavorites => "peer_favorites",
        }
    }
}

impl std::fmt::Display for Slice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one successful fetch, carrying only the fields its slice owns.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotUpdate {
    FeesAndActivity {
        fixed_fee: f64,
        percentage_fee: f64,
        recent_transfers: Vec<Transfer>,
        banks: Vec<Bank>,
    },
    PeerActivity(Vec<SwiftpayUser>),
    BankFavorites(Vec<Favorite>),
    PeerFavorites(Vec<SwiftpayFavorite>),
}

impl SnapshotUpdate {
    pub fn slice(&self) -> Slice {
        match self {
            SnapshotUpdate::FeesAndActivity { .. } => Slice::FeesAndActivity,
            SnapshotUpdate::PeerActivity(_) => Slice::PeerActivity,
            SnapshotUpdate::BankFavorites(_) => Slice::BankFavorites,
            SnapshotUpdate::PeerFavorites(_) => Slice::PeerFavorites,
        }
    }
}

impl From<BankTransferPage> for SnapshotUpdate {
    fn from(page: BankTransferPage) -> Self {
        SnapshotUpdate::FeesAndActivity {
            fixed_fee: page.fixed_transfer_fee,
            percentage_fee: page.percentage_transfer_fee,
            recent_transfers: page.recent_tranfers.into_ordered(),
            banks: page.banks,
        }
    }
}

impl From<SwiftpayTransferPage> for SnapshotUpdate {
    fn from(page: SwiftpayTransferPage) -> Self {
        SnapshotUpdate::PeerActivity(page.recent_transfers)
    }
}

impl From<Beneficiaries<Favorite>> for SnapshotUpdate {
    fn from(beneficiaries: Beneficiaries<Favorite>) -> Self {
        SnapshotUpdate::BankFavorites(beneficiaries.favorites)
    }
}

impl From<Beneficiaries<SwiftpayFavorite>> for SnapshotUpdate {
    fn from(beneficiaries: Beneficiaries<SwiftpayFavorite>) -> Self {
        SnapshotUpdate::PeerFavorites(beneficiaries.favorites)
    }
}

/// Merged view of the four transfer-data fetches.
///
/// Every field starts empty or zero and is replaced wholesale by the fetch
/// that owns it. A partially filled snapshot is normal.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RemoteSnapshot {
    pub fixed_fee: f64,
    pub percentage_fee: f64,
    pub recent_transfers: Vec<Transfer>,
    pub bank_favorites: Vec<Favorite>,
    pub peer_favorites: Vec<SwiftpayFavorite>,
    pub peer_recent_transfers: Vec<SwiftpayUser>,
    pub banks: Vec<Bank>,
}

impl RemoteSnapshot {
    /// Merge one fetch result, touching only the fields of its slice.
    pub fn apply(&mut self, update: SnapshotUpdate) {
        match update {
            SnapshotUpdate::FeesAndActivity {
                fixed_fee,
                percentage_fee,
                recent_transfers,
                banks,
            } => {
                self.fixed_fee = fixed_fee;
                self.percentage_fee = percentage_fee;
                self.recent_transfers = recent_transfers;
                self.banks = banks;
            }
            SnapshotUpdate::PeerActivity(users) => self.peer_recent_transfers = users,
            SnapshotUpdate::BankFavorites(favorites) => self.bank_favorites = favorites,
            SnapshotUpdate::PeerFavorites(favorites) => self.peer_favorites = favorites,
        }
    }

    /// Fee for a single bank transfer of `amount`.
    pub fn transfer_fee(&self, amount: f64) -> f64 {
        amount * self.percentage_fee / 100.0 + self.fixed_fee
    }

    /// Fee for a multi-recipient bank transfer: the fixed fee per recipient.
    pub fn multiple_transfer_fee(&self, recipients: usize) -> f64 {
        self.fixed_fee * recipients as f64
    }

    /// Look up a bank by its code.
    pub fn bank_by_code(&self, code: &str) -> Option<&Bank> {
        self.banks.iter().find(|bank| bank.code == code)
    }
}
