// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the attribution service's raw-data export API.
//!
//! Provides [`AttributionClient`], which fetches raw CSV report bytes for
//! installs, in-app events, and post-attribution fraud reports. A request
//! either succeeds within the configured timeout or fails with
//! [`TraffikaError::Upstream`]; it is never retried -- the caller aborts
//! the current flow instead.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use tracing::{debug, error};

use traffika_config::model::AttributionConfig;
use traffika_core::{DateRange, TraffikaError};

/// Raw report endpoints, selected by report kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawReportKind {
    Installs,
    InAppEvents,
    PostAttribution,
}

impl RawReportKind {
    /// Endpoint path segment under `{base_url}/{app_id}/`.
    pub fn path(self) -> &'static str {
        match self {
            RawReportKind::Installs => "installs_report/v5",
            RawReportKind::InAppEvents => "in_app_events_report/v5",
            RawReportKind::PostAttribution => "fraud-post-inapps/v5",
        }
    }
}

/// Parameters of one raw report fetch.
#[derive(Debug, Clone)]
pub struct ReportQuery {
    /// Attribution app identifier of the offer.
    pub app_id: String,
    pub range: DateRange,
    /// Event filter; required for in-app-event reports.
    pub event_name: Option<String>,
    /// Media source filter; `None` aggregates all sources.
    pub media_source: Option<String>,
    /// Comma-separated additional columns to include.
    pub additional_fields: Option<String>,
}

/// The extra columns attached to post-attribution fraud reports, beyond
/// the service's default set.
pub fn post_attribution_extra_fields() -> &'static [&'static str] {
    &[
        "blocked_reason_rule",
        "store_reinstall",
        "impressions",
        "contributor3_match_type",
        "custom_dimension",
        "conversion_type",
        "gp_click_time",
        "match_type",
        "mediation_network",
        "oaid",
        "deeplink_url",
        "blocked_reason",
        "blocked_sub_reason",
        "gp_broadcast_referrer",
        "gp_install_begin",
        "campaign_type",
        "custom_data",
        "rejected_reason",
        "device_download_time",
        "keyword_match_type",
        "contributor1_match_type",
        "contributor2_match_type",
        "device_model",
        "monetization_network",
        "segment",
        "is_lat",
        "gp_referrer",
        "blocked_reason_value",
        "store_product_page",
        "device_category",
        "app_type",
        "rejected_reason_value",
        "ad_unit",
        "keyword_id",
        "placement",
        "network_account_id",
        "install_app_store",
        "amazon_aid",
        "att",
        "engagement_type",
        "gdpr_applies",
        "ad_user_data_enabled",
        "ad_personalization_enabled",
    ]
}

/// HTTP client for the attribution raw-data API.
///
/// Carries the bearer token and CSV accept header on every request.
#[derive(Debug, Clone)]
pub struct AttributionClient {
    http: reqwest::Client,
    base_url: String,
    timezone: String,
}

impl AttributionClient {
    /// Creates a new client from configuration.
    ///
    /// Requires `attribution.api_key` to be set.
    pub fn new(config: &AttributionConfig) -> Result<Self, TraffikaError> {
        let api_key = config.api_key.as_deref().ok_or_else(|| {
            TraffikaError::Config("attribution.api_key is required for report fetching".into())
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
                TraffikaError::Config(format!("invalid API key header value: {e}"))
            })?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("text/csv"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TraffikaError::Upstream {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timezone: config.timezone.clone(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Fetch one raw CSV report.
    ///
    /// Blocks the current conversation event for up to the configured
    /// timeout. Non-2xx responses and transport failures map to
    /// [`TraffikaError::Upstream`].
    pub async fn fetch_raw(
        &self,
        kind: RawReportKind,
        query: &ReportQuery,
    ) -> Result<Vec<u8>, TraffikaError> {
        let url = format!("{}/{}/{}", self.base_url, query.app_id, kind.path());

        let mut params: Vec<(&str, String)> = vec![
            ("from", query.range.from.to_string()),
            ("to", query.range.to.to_string()),
            ("timezone", self.timezone.clone()),
        ];
        if let Some(event_name) = &query.event_name {
            params.push(("event_name", event_name.clone()));
        }
        if let Some(media_source) = &query.media_source {
            params.push(("media_source", media_source.clone()));
        }
        if let Some(additional_fields) = &query.additional_fields {
            params.push(("additional_fields", additional_fields.clone()));
        }

        debug!(url = %url, kind = ?kind, "fetching raw report");

        let response = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, url = %url, "raw report request failed");
                TraffikaError::Upstream {
                    message: format!("report request failed: {e}"),
                    source: Some(Box::new(e)),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "raw report request rejected");
            return Err(TraffikaError::Upstream {
                message: format!("attribution service returned {status}"),
                source: None,
            });
        }

        let bytes = response.bytes().await.map_err(|e| TraffikaError::Upstream {
            message: format!("failed to read report body: {e}"),
            source: Some(Box::new(e)),
        })?;

        debug!(len = bytes.len(), "raw report received");
        Ok(bytes.to_vec())
    }
}
