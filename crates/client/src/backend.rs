// Copyright (C) 2026 Rollcall Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use reqwest::{Client, StatusCode, Url};
use rollcall_domain::{HierarchyNode, ReportingPeriod, StatRecord};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const STATISTICS_PATH: &str = "api/attendance/statistics";
const HIERARCHY_PATH: &str = "api/attendance/hierarchy";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors from the attendance backend client.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Backend error: status={status}, message={message}")]
    Backend {
        status: StatusCode,
        message: String,
    },
}

/// Configuration for the attendance backend client.
#[derive(Clone, Debug)]
pub struct BackendConfig {
    /// Base URL of the backend, e.g. `http://localhost:8080/`.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl BackendConfig {
    /// Creates a config with the default timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// The result of fetching both attendance endpoints for one refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceFetch {
    /// Per-employee statistics for the requested period.
    pub stats: Vec<StatRecord>,
    /// The org hierarchy forest.
    pub hierarchy: Vec<HierarchyNode>,
}

/// Client for the attendance backend's statistics and hierarchy endpoints.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: Url,
    http: Client,
}

impl BackendClient {
    /// Creates a new `BackendClient`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or the underlying
    /// HTTP client cannot be constructed.
    pub fn new(config: &BackendConfig) -> Result<Self, ClientError> {
        let http: Client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let base_url: Url = Url::parse(&config.base_url)?;

        Ok(Self { base_url, http })
    }

    /// Fetches the per-employee statistics list for a reporting period.
    ///
    /// # Arguments
    ///
    /// * `period` - The reporting year and month
    /// * `department` - Optional department filter
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or a
    /// malformed response body.
    pub async fn fetch_statistics(
        &self,
        period: ReportingPeriod,
        department: Option<&str>,
    ) -> Result<Vec<StatRecord>, ClientError> {
        let url: Url = self.statistics_url(period, department)?;
        self.get_json(url).await
    }

    /// Fetches the org hierarchy forest.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or a
    /// malformed response body.
    pub async fn fetch_hierarchy(&self) -> Result<Vec<HierarchyNode>, ClientError> {
        let url: Url = self.hierarchy_url()?;
        self.get_json(url).await
    }

    /// Fetches statistics and hierarchy concurrently.
    ///
    /// The two requests are independent; both must succeed for the fetch
    /// to succeed, so a caller never applies a half-fetched snapshot.
    ///
    /// # Errors
    ///
    /// Returns the first error if either request fails.
    pub async fn fetch_attendance(
        &self,
        period: ReportingPeriod,
        department: Option<&str>,
    ) -> Result<AttendanceFetch, ClientError> {
        let (stats, hierarchy) = tokio::join!(
            self.fetch_statistics(period, department),
            self.fetch_hierarchy()
        );

        Ok(AttendanceFetch {
            stats: stats?,
            hierarchy: hierarchy?,
        })
    }

    pub(crate) fn statistics_url(
        &self,
        period: ReportingPeriod,
        department: Option<&str>,
    ) -> Result<Url, ClientError> {
        let mut url: Url = self.base_url.join(STATISTICS_PATH)?;
        url.query_pairs_mut()
            .append_pair("year", &period.year().to_string())
            .append_pair("month", &period.month().to_string());
        if let Some(department) = department {
            url.query_pairs_mut().append_pair("department", department);
        }
        Ok(url)
    }

    pub(crate) fn hierarchy_url(&self) -> Result<Url, ClientError> {
        Ok(self.base_url.join(HIERARCHY_PATH)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        debug!(%url, "fetching from attendance backend");
        let response = self.http.get(url).send().await?;
        let status: StatusCode = response.status();

        if !status.is_success() {
            let message: String = response.text().await.unwrap_or_default();
            return Err(ClientError::Backend { status, message });
        }

        Ok(response.json::<T>().await?)
    }
}
