//! Remote document store over HTTP.
//!
//! One JSON document per user at
//! `{base_url}/artifacts/{app_id}/users/{user}/quizData/userSettings`.
//! `GET` reads it, `PATCH` merges fields into it and `PUT` replaces it.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use quizdeck_core::error::StoreError;
use quizdeck_core::traits::{StateField, Store, StoredState};

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// HTTP document store client.
pub struct RemoteStore {
    base_url: reqwest::Url,
    api_key: String,
    app_id: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct RemoteError {
    error: RemoteErrorBody,
}

#[derive(Deserialize)]
struct RemoteErrorBody {
    message: String,
}

impl RemoteStore {
    pub fn new(base_url: &str, api_key: &str, app_id: &str) -> Result<Self, StoreError> {
        Self::with_timeout(base_url, api_key, app_id, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(
        base_url: &str,
        api_key: &str,
        app_id: &str,
        timeout_secs: u64,
    ) -> Result<Self, StoreError> {
        let base_url = reqwest::Url::parse(base_url)
            .map_err(|e| StoreError::Config(format!("bad base URL {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::Config(format!(
                "base URL {base_url} cannot have a path"
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| StoreError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            api_key: api_key.to_string(),
            app_id: app_id.to_string(),
            timeout_secs,
            client,
        })
    }

    /// Document URL for `user`. Path segments are percent-encoded.
    fn document_url(&self, user: &str) -> reqwest::Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend([
                "artifacts",
                self.app_id.as_str(),
                "users",
                user,
                "quizData",
                "userSettings",
            ]);
        }
        url
    }

    fn request(&self, method: reqwest::Method, user: &str) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, self.document_url(user));
        if self.api_key.is_empty() {
            builder
        } else {
            builder.bearer_auth(&self.api_key)
        }
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, StoreError> {
        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                StoreError::Timeout(self.timeout_secs)
            } else {
                StoreError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Unauthorized(body));
        }
        if status >= 400 && status != 404 {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<RemoteError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(StoreError::Http { status, message });
        }
        Ok(response)
    }

    async fn write(&self, method: reqwest::Method, user: &str, body: &serde_json::Value) -> Result<(), StoreError> {
        let response = self.send(self.request(method, user).json(body)).await?;
        if response.status().as_u16() == 404 {
            return Err(StoreError::Http {
                status: 404,
                message: "document path not found".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Store for RemoteStore {
    fn name(&self) -> &str {
        "remote"
    }

    #[instrument(skip(self))]
    async fn load(&self, user: &str) -> Result<Option<StoredState>, StoreError> {
        let response = self.send(self.request(reqwest::Method::GET, user)).await?;
        if response.status().as_u16() == 404 {
            return Ok(None);
        }
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        let state: StoredState =
            serde_json::from_str(&body).map_err(|e| StoreError::Malformed(e.to_string()))?;
        Ok(Some(state))
    }

    #[instrument(skip(self, record))]
    async fn save(&self, user: &str, record: &StoredState, merge: bool) -> Result<(), StoreError> {
        let body =
            serde_json::to_value(record).map_err(|e| StoreError::Malformed(e.to_string()))?;
        let method = if merge {
            reqwest::Method::PATCH
        } else {
            reqwest::Method::PUT
        };
        self.write(method, user, &body).await
    }

    #[instrument(skip(self))]
    async fn clear(&self, user: &str, field: StateField) -> Result<(), StoreError> {
        let empty = match field {
            StateField::Settings => serde_json::Value::Null,
            StateField::SessionAnswers => serde_json::json!({}),
            StateField::WronglyAnswered => serde_json::json!([]),
        };
        let mut body = serde_json::Map::new();
        body.insert(field.as_str().to_string(), empty);
        self.write(reqwest::Method::PATCH, user, &serde_json::Value::Object(body))
            .await
    }
}
