// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! SwiftPay REST API client.

use std::sync::Arc;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{BatchTransferApi, TokenStore, TransferApi};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::models::{
    BankTransferPage, Beneficiaries, Envelope, Favorite, MultipleBankTransferRequest,
    MultipleSwiftpayTransferRequest, MultipleTransferResponse, SwiftpayFavorite,
    SwiftpayTransferPage, ToggleBankFavoriteRequest, ToggleSwiftpayFavoriteRequest,
};

const BANK_TRANSFER_PAGE_PATH: &str = "/bank-transfer";
const SWIFTPAY_TRANSFER_PAGE_PATH: &str = "/swiftpay-transfer";
const BANK_BENEFICIARIES_PATH: &str = "/bank-transfer/beneficiaries";
const SWIFTPAY_BENEFICIARIES_PATH: &str = "/swiftpay-transfer/beneficiaries";
const TOGGLE_BANK_FAVORITE_PATH: &str = "/bank-transfer/beneficiaries/toggle-favorite";
const TOGGLE_SWIFTPAY_FAVORITE_PATH: &str = "/swiftpay-transfer/beneficiaries/toggle-favorite";
const MULTIPLE_BANK_TRANSFER_PATH: &str = "/multiple-bank-transfer";
const MULTIPLE_SWIFTPAY_TRANSFER_PATH: &str = "/multiple-swiftpay-transfer";

#[derive(Clone)]
pub struct SwiftpayClient {
    api_base_url: String,
    tokens: Arc<dyn TokenStore>,
    http: Client,
}

impl std::fmt::Debug for SwiftpayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwiftpayClient")
            .field("api_base_url", &self.api_base_url)
            .finish_non_exhaustive()
    }
}

impl SwiftpayClient {
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            tokens,
            http,
        })
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Add or remove a past bank transfer from the saved beneficiaries.
    pub async fn toggle_bank_favorite(&self, transfer_id: u64) -> Result<Envelope<Value>, ApiError> {
        self.post_json(
            TOGGLE_BANK_FAVORITE_PATH,
            &ToggleBankFavoriteRequest { transfer_id },
            None,
        )
        .await
    }

    /// Add or remove a SwiftPay user from the saved peers.
    pub async fn toggle_swiftpay_favorite(&self, user_id: u64) -> Result<Envelope<Value>, ApiError> {
        self.post_json(
            TOGGLE_SWIFTPAY_FAVORITE_PATH,
            &ToggleSwiftpayFavoriteRequest { user_id },
            None,
        )
        .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.tokens.token() {
            Some(token) => request.header("Authorization", format!("Bearer {token}")),
            None => request,
        }
    }

    async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let envelope: Envelope<T> = self.get_json(path).await?;
        Ok(envelope.data)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!(path, "SwiftPay GET");
        let response = self
            .authorize(self.http.get(self.url(path)))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| transport_error("GET", path, e))?;

        self.read_json("GET", path, response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        idempotency_key: Option<&str>,
    ) -> Result<T, ApiError> {
        debug!(path, "SwiftPay POST");
        let mut request = self
            .authorize(self.http.post(self.url(path)))
            .header("Accept", "application/json")
            .json(body);
        if let Some(key) = idempotency_key {
            request = request.header("Idempotency-Key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| transport_error("POST", path, e))?;

        self.read_json("POST", path, response).await
    }

    async fn read_json<T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        response: Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(status, &body);

            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                warn!(
                    method,
                    path,
                    status = status.as_u16(),
                    "SwiftPay rejected credentials, clearing stored token"
                );
                self.tokens.clear();
                return Err(ApiError::unauthorized(status.as_u16(), message));
            }

            return Err(ApiError::status(status.as_u16(), message));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("{method} {path} invalid JSON: {e}")))
    }
}

impl TransferApi for SwiftpayClient {
    async fn bank_transfer_page(&self) -> Result<BankTransferPage, ApiError> {
        self.get_data(BANK_TRANSFER_PAGE_PATH).await
    }

    async fn swiftpay_transfer_page(&self) -> Result<SwiftpayTransferPage, ApiError> {
        self.get_data(SWIFTPAY_TRANSFER_PAGE_PATH).await
    }

    async fn bank_beneficiaries(&self) -> Result<Beneficiaries<Favorite>, ApiError> {
        self.get_data(BANK_BENEFICIARIES_PATH).await
    }

    async fn swiftpay_beneficiaries(&self) -> Result<Beneficiaries<SwiftpayFavorite>, ApiError> {
        self.get_data(SWIFTPAY_BENEFICIARIES_PATH).await
    }
}

impl BatchTransferApi for SwiftpayClient {
    async fn multiple_swiftpay_transfer(
        &self,
        request: &MultipleSwiftpayTransferRequest,
    ) -> Result<MultipleTransferResponse, ApiError> {
        let key = Uuid::new_v4().to_string();
        self.post_json(MULTIPLE_SWIFTPAY_TRANSFER_PATH, request, Some(&key))
            .await
    }

    async fn multiple_bank_transfer(
        &self,
        request: &MultipleBankTransferRequest,
    ) -> Result<MultipleTransferResponse, ApiError> {
        let key = Uuid::new_v4().to_string();
        self.post_json(MULTIPLE_BANK_TRANSFER_PATH, request, Some(&key))
            .await
    }
}

fn transport_error(method: &str, path: &str, error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout(format!("{method} {path}: {error}"))
    } else {
        ApiError::Request(format!("{method} {path} failed: {error}"))
    }
}

/// Prefer the server's `message` field, then the first validation error,
/// then a generic description of the status.
fn error_message(status: StatusCode, body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    let message = parsed.as_ref().and_then(|value| {
        value
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.trim().is_empty())
            .map(str::to_string)
    });

    let first_validation_error = || {
        parsed
            .as_ref()?
            .get("errors")?
            .as_object()?
            .values()
            .next()?
            .as_array()?
            .first()?
            .as_str()
            .map(str::to_string)
    };

    message
        .or_else(first_validation_error)
        .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::InMemoryTokenStore;
    use axum::{
        http::{HeaderMap, StatusCode as AxumStatus},
        routing::{get, post},
        Json, Router,
    };
    use serde_json::json;
    use std::time::Duration;

    const TOKEN: &str = "test-token";

    fn authorized(headers: &HeaderMap) -> bool {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == format!("Bearer {TOKEN}"))
    }

    fn unauthenticated() -> (AxumStatus, Json<Value>) {
        (
            AxumStatus::UNAUTHORIZED,
            Json(json!({ "message": "Unauthenticated." })),
        )
    }

    async fn bank_transfer_page(headers: HeaderMap) -> (AxumStatus, Json<Value>) {
        if !authorized(&headers) {
            return unauthenticated();
        }
        (
            AxumStatus::OK,
            Json(json!({
                "status": "success",
                "message": "ok",
                "data": {
                    "fixed_transfer_fee": 10,
                    "percentage_transfer_fee": 1.5,
                    "recent_tranfers": { "0": { "id": 9, "amount": 500 } },
                    "banks": [{ "id": 1, "code": "058", "name": "GTBank" }]
                }
            })),
        )
    }

    async fn swiftpay_transfer_page() -> (AxumStatus, Json<Value>) {
        (
            AxumStatus::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "Server Error" })),
        )
    }

    async fn bank_beneficiaries() -> (AxumStatus, Json<Value>) {
        (
            AxumStatus::UNPROCESSABLE_ENTITY,
            Json(json!({ "errors": { "pin": ["The pin field is required."] } })),
        )
    }

    async fn swiftpay_beneficiaries() -> (AxumStatus, &'static str) {
        (AxumStatus::OK, "<html>maintenance</html>")
    }

    async fn multiple_swiftpay_transfer(
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (AxumStatus, Json<Value>) {
        let reference = if headers.contains_key("idempotency-key") {
            "with-key"
        } else {
            "no-key"
        };
        let total_amount = body["total_amount"].clone();
        let accounts = body["swiftpay_accounts"].to_string();
        (
            AxumStatus::OK,
            Json(json!({
                "status": "success",
                "message": "Transfer successful",
                "data": {
                    "id": 77,
                    "reference": reference,
                    "total_amount": total_amount,
                    "accounts": accounts
                }
            })),
        )
    }

    async fn toggle_favorite(Json(body): Json<Value>) -> (AxumStatus, Json<Value>) {
        (
            AxumStatus::OK,
            Json(json!({ "status": "success", "message": "toggled", "data": body })),
        )
    }

    async fn spawn_mock_api() -> String {
        let app = Router::new()
            .route("/bank-transfer", get(bank_transfer_page))
            .route("/swiftpay-transfer", get(swiftpay_transfer_page))
            .route("/bank-transfer/beneficiaries", get(bank_beneficiaries))
            .route("/swiftpay-transfer/beneficiaries", get(swiftpay_beneficiaries))
            .route(
                "/multiple-swiftpay-transfer",
                post(multiple_swiftpay_transfer),
            )
            .route(
                "/bank-transfer/beneficiaries/toggle-favorite",
                post(toggle_favorite),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/")
    }

    fn client(base_url: &str, tokens: Arc<InMemoryTokenStore>) -> SwiftpayClient {
        let config = ClientConfig::new(base_url)
            .unwrap()
            .with_timeout(Duration::from_secs(5));
        SwiftpayClient::new(&config, tokens).unwrap()
    }

    #[tokio::test]
    async fn fetches_bank_transfer_page_with_bearer_token() {
        let base = spawn_mock_api().await;
        let tokens = Arc::new(InMemoryTokenStore::new(Some(TOKEN.to_string())));
        let client = client(&base, tokens);

        assert!(!client.api_base_url().ends_with('/'));

        let page = client.bank_transfer_page().await.unwrap();
        assert_eq!(page.fixed_transfer_fee, 10.0);
        assert_eq!(page.percentage_transfer_fee, 1.5);
        assert_eq!(page.banks[0].name, "GTBank");
        assert_eq!(page.recent_tranfers.into_ordered()[0].amount, 500.0);
    }

    #[tokio::test]
    async fn unauthorized_response_clears_token() {
        let base = spawn_mock_api().await;
        let tokens = Arc::new(InMemoryTokenStore::new(Some("stale".to_string())));
        let client = client(&base, tokens.clone());

        let err = client.bank_transfer_page().await.unwrap_err();
        assert_eq!(err, ApiError::unauthorized(401, "Unauthenticated."));
        assert!(tokens.token().is_none());
    }

    #[tokio::test]
    async fn missing_token_sends_unauthenticated_request() {
        let base = spawn_mock_api().await;
        let client = client(&base, Arc::new(InMemoryTokenStore::default()));

        let err = client.bank_transfer_page().await.unwrap_err();
        assert_eq!(err.http_status(), Some(401));
    }

    #[tokio::test]
    async fn server_error_carries_body_message() {
        let base = spawn_mock_api().await;
        let client = client(&base, Arc::new(InMemoryTokenStore::default()));

        let err = client.swiftpay_transfer_page().await.unwrap_err();
        assert_eq!(err, ApiError::status(500, "Server Error"));

        let err = client.bank_beneficiaries().await.unwrap_err();
        assert_eq!(err, ApiError::status(422, "The pin field is required."));
    }

    #[tokio::test]
    async fn non_json_body_is_invalid_response() {
        let base = spawn_mock_api().await;
        let client = client(&base, Arc::new(InMemoryTokenStore::default()));

        let err = client.swiftpay_beneficiaries().await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn connection_refused_is_request_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client(
            &format!("http://{addr}"),
            Arc::new(InMemoryTokenStore::default()),
        );
        let err = client.bank_transfer_page().await.unwrap_err();
        assert!(matches!(err, ApiError::Request(_)));
    }

    #[tokio::test]
    async fn batch_submission_sends_idempotency_key() {
        let base = spawn_mock_api().await;
        let client = client(&base, Arc::new(InMemoryTokenStore::default()));

        let request = MultipleSwiftpayTransferRequest {
            total_amount: "150.5".to_string(),
            pin: "1234".to_string(),
            swiftpay_accounts: vec![],
        };
        let response = client.multiple_swiftpay_transfer(&request).await.unwrap();
        assert!(response.is_success());
        assert_eq!(response.data.id, 77);
        assert_eq!(response.data.reference, "with-key");
        assert_eq!(response.data.total_amount, "150.5");
    }

    #[tokio::test]
    async fn toggle_bank_favorite_posts_transfer_id() {
        let base = spawn_mock_api().await;
        let client = client(&base, Arc::new(InMemoryTokenStore::default()));

        let response = client.toggle_bank_favorite(42).await.unwrap();
        assert_eq!(response.message, "toggled");
        assert_eq!(response.data["transfer_id"], 42);
    }

    #[test]
    fn error_message_falls_back_to_status_code() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, ""),
            "Request failed with status code 502"
        );
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"message":"   "}"#),
            "Request failed with status code 400"
        );
    }
}
