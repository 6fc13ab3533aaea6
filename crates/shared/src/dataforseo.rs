use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::error::{DataForSeoError, Result};

pub const DATAFORSEO_API_URL: &str = "https://api.dataforseo.com";

/// Status code DataForSEO reports for a successful call.
pub(crate) const STATUS_OK: i64 = 20000;

/// Thin client for the DataForSEO "live" endpoints. Every call posts a
/// single-task array and gets the whole response document back.
#[derive(Clone)]
pub struct DataForSeoClient {
    client: Client,
    base_url: String,
    encoded_credentials: String,
}

impl DataForSeoClient {
    pub fn new(login: &str, password: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: DATAFORSEO_API_URL.to_string(),
            encoded_credentials: Self::encode_credentials(login, password),
        })
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn encode_credentials(login: &str, password: &str) -> String {
        STANDARD.encode(format!("{}:{}", login, password))
    }

    /// Base64 `login:password`. Also part of every cache key, so two
    /// accounts never share cached responses.
    pub fn encoded_credentials(&self) -> &str {
        &self.encoded_credentials
    }

    /// POST `[task]` to `path` and return the response once both the HTTP
    /// status and the API status code report success.
    pub(crate) async fn post_task(&self, path: &str, task: Value) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);

        debug!(%url, "DataForSEO request");

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("Basic {}", self.encoded_credentials))
            .header(CONTENT_TYPE, "application/json")
            .json(&[task])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let message = response.text().await.unwrap_or_default();
            return Err(DataForSeoError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let data: Value = response.json().await?;

        let status_code = data
            .get("status_code")
            .and_then(Value::as_i64)
            .ok_or(DataForSeoError::MissingField("status_code"))?;

        if status_code != STATUS_OK {
            let message = data
                .get("status_message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            return Err(DataForSeoError::Api {
                status_code,
                message,
            });
        }

        Ok(data)
    }
}

/// `tasks[0].result[0]` of a live endpoint response.
pub(crate) fn first_result(data: &Value) -> Result<&Value> {
    data.get("tasks")
        .and_then(|tasks| tasks.get(0))
        .ok_or(DataForSeoError::MissingField("tasks[0]"))?
        .get("result")
        .and_then(|result| result.get(0))
        .ok_or(DataForSeoError::MissingField("tasks[0].result[0]"))
}
