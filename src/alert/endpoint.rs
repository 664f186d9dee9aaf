// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! Remote alert endpoint

use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ReportingConfig;
use crate::core::AlertEvent;
use crate::error::ReportError;
use crate::security::CsrfToken;

/// JSON body posted for each alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertReport {
    /// ISO-8601, UTC, millisecond precision
    pub timestamp: String,
    pub alert_count: u64,
}

impl From<&AlertEvent> for AlertReport {
    fn from(event: &AlertEvent) -> Self {
        Self {
            timestamp: event.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            alert_count: event.sequence_number,
        }
    }
}

/// Endpoint reply. Both fields are optional; the body is otherwise ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AlertAck {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub alert_count: Option<u64>,
}

impl AlertAck {
    /// The server answered but did not record the alert
    pub fn is_rejected(&self) -> bool {
        self.status.as_deref() == Some("error")
    }
}

/// Destination for alert reports
#[async_trait]
pub trait AlertEndpoint: Send + Sync {
    async fn submit(&self, report: &AlertReport) -> Result<AlertAck, ReportError>;
}

/// `POST`s reports as JSON with the anti-forgery header attached
pub struct HttpAlertEndpoint {
    client: reqwest::Client,
    url: String,
    csrf_header: String,
    token: CsrfToken,
}

impl HttpAlertEndpoint {
    pub fn new(config: &ReportingConfig) -> Result<Self, ReportError> {
        let mut builder = reqwest::Client::builder().timeout(config.timeout());
        if is_loopback(&config.base_url) {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;
        let token = config
            .cookies
            .as_deref()
            .map(|cookies| CsrfToken::from_cookie_header(cookies, &config.csrf_cookie))
            .unwrap_or_default();
        if token.is_empty() {
            debug!("No '{}' cookie supplied; sending empty token", config.csrf_cookie);
        }

        Ok(Self {
            client,
            url: config.alert_url(),
            csrf_header: config.csrf_header.clone(),
            token,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Local development servers are reached directly, never through a proxy
fn is_loopback(base_url: &str) -> bool {
    reqwest::Url::parse(base_url)
        .ok()
        .and_then(|url| {
            url.host_str()
                .map(|host| matches!(host, "localhost" | "127.0.0.1" | "[::1]" | "::1"))
        })
        .unwrap_or(false)
}

#[async_trait]
impl AlertEndpoint for HttpAlertEndpoint {
    async fn submit(&self, report: &AlertReport) -> Result<AlertAck, ReportError> {
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .header(self.csrf_header.as_str(), self.token.as_str())
            .json(report)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReportError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ReportError::Decode(e.to_string()))
    }
}
