// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Error types for the API boundary and batch submission.

/// Failure of a single SwiftPay API call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("SwiftPay client configuration invalid: {0}")]
    Config(String),

    #[error("SwiftPay request failed: {0}")]
    Request(String),

    #[error("SwiftPay request timed out: {0}")]
    Timeout(String),

    /// 401/403 from the API. The stored token has been discarded.
    #[error("SwiftPay rejected credentials ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("SwiftPay returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("SwiftPay response was invalid: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn unauthorized(status: u16, message: impl Into<String>) -> Self {
        Self::Unauthorized {
            status,
            message: message.into(),
        }
    }

    /// HTTP status code, when the server answered at all.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { status, .. } | ApiError::Status { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

/// Rejection of a multi-recipient batch before or during submission.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BatchError {
    #[error("No recipients have been added")]
    Empty,

    #[error("A minimum of {required} recipients are required for multiple transfers, found {found}")]
    TooFewRecipients { required: usize, found: usize },

    #[error(transparent)]
    Api(#[from] ApiError),
}
