// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! SwiftPay Transfer Client - client-side core of the SwiftPay transfer flow
//!
//! This crate keeps the state a mobile banking session needs while the user
//! assembles and sends multi-recipient transfers, and a cached view of the
//! server data those screens read.
//!
//! ## Modules
//!
//! - `store` - pending peer and bank recipients, totals, batch building
//! - `cache` - concurrently refreshed snapshot of fees, banks and favorites
//! - `providers` - SwiftPay HTTP client and the traits it implements
//! - `state` - session wiring of the two stores
//! - `config` - environment driven client configuration

pub mod amount;
pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod providers;
pub mod state;
pub mod store;

pub use cache::{RemoteDataCache, RemoteSnapshot, Slice};
pub use config::ClientConfig;
pub use error::{ApiError, BatchError};
pub use state::SessionState;
pub use store::{SourceSwitchPolicy, TransferAccumulator};
