// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Fetch the transfer snapshot once and print it as JSON.

use std::process::ExitCode;
use std::sync::Arc;

use serde_json::json;
use tracing::{error, info, warn};

use swiftpay_transfer_client::config::ClientConfig;
use swiftpay_transfer_client::logging;
use swiftpay_transfer_client::providers::{InMemoryTokenStore, SwiftpayClient};
use swiftpay_transfer_client::{SessionState, SourceSwitchPolicy};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            return ExitCode::from(2);
        }
    };
    logging::init(config.log_format);

    let tokens = Arc::new(InMemoryTokenStore::new(config.api_token.clone()));
    if config.api_token.is_none() {
        warn!("no API token configured, requests will be unauthenticated");
    }

    let client = match SwiftpayClient::new(&config, tokens) {
        Ok(client) => client,
        Err(err) => {
            error!(error = %err, "failed to build SwiftPay client");
            return ExitCode::FAILURE;
        }
    };
    info!(base_url = %client.api_base_url(), "refreshing transfer data");

    let session = SessionState::new(client, SourceSwitchPolicy::default());
    let report = match session.mount().await.await {
        Ok(report) => report,
        Err(err) => {
            error!(error = %err, "refresh task failed");
            return ExitCode::FAILURE;
        }
    };

    let failed: Vec<_> = report
        .failed
        .iter()
        .map(|(slice, err)| json!({ "slice": slice, "error": err.to_string() }))
        .collect();
    let output = json!({
        "snapshot": session.data.snapshot().await,
        "statuses": session.data.statuses().await,
        "failed": failed,
    });

    match serde_json::to_string_pretty(&output) {
        Ok(text) => println!("{text}"),
        Err(err) => {
            error!(error = %err, "failed to encode snapshot");
            return ExitCode::FAILURE;
        }
    }

    if report.succeeded.is_empty() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
