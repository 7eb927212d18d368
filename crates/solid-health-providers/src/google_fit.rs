// ABOUTME: Google Fit REST provider implementing the FitnessDataSource trait
// ABOUTME: Daily step/distance aggregates and raw merged heart-rate samples
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Google Fit `FitnessDataSource` implementation
//!
//! Steps and distance come from the `dataset:aggregate` endpoint bucketed by
//! day over the merged platform data sources. Heart rate is read point by
//! point from the merged BPM dataset so individual readings keep their
//! timestamp.
//!
//! Google answers a window without data with empty buckets (or 404 for a
//! dataset that never existed); both become an empty sample list.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::from_str;
use tokio::sync::RwLock;
use tracing::{debug, error, instrument};

use crate::core::FitnessDataSource;
use crate::http_client::shared_client;
use solid_health_core::errors::provider::{ProviderError, ProviderResult};
use solid_health_core::models::{DataPoint, MetricCategory};

/// Provider name used in logs and errors
pub const PROVIDER_NAME: &str = "google_fit";

/// Default REST base URL
pub const GOOGLE_FIT_API_BASE_URL: &str = "https://www.googleapis.com/fitness/v1/users/me";

/// Merged step deltas across all device sources
const STEPS_SOURCE: &str =
    "derived:com.google.step_count.delta:com.google.android.gms:merge_step_deltas";
/// Merged distance deltas
const DISTANCE_SOURCE: &str =
    "derived:com.google.distance.delta:com.google.android.gms:merge_distance_delta";
/// Merged heart-rate readings
const HEART_RATE_SOURCE: &str =
    "derived:com.google.heart_rate.bpm:com.google.android.gms:merge_heart_rate_bpm";

const DAY_MILLIS: i64 = 86_400_000;
/// Seconds to wait when Google does not send `Retry-After`
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Google Fit endpoint configuration
#[derive(Debug, Clone)]
pub struct GoogleFitConfig {
    /// Base URL ending in `/users/me`
    pub api_base_url: String,
}

impl Default for GoogleFitConfig {
    fn default() -> Self {
        Self {
            api_base_url: GOOGLE_FIT_API_BASE_URL.to_owned(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AggregateRequest<'a> {
    aggregate_by: [AggregateBy<'a>; 1],
    bucket_by_time: BucketByTime,
    start_time_millis: i64,
    end_time_millis: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AggregateBy<'a> {
    data_source_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BucketByTime {
    duration_millis: i64,
}

#[derive(Debug, Deserialize)]
struct AggregateResponse {
    #[serde(default)]
    bucket: Vec<Bucket>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Bucket {
    start_time_millis: String,
    #[serde(default)]
    dataset: Vec<Dataset>,
}

#[derive(Debug, Deserialize)]
struct Dataset {
    #[serde(default)]
    point: Vec<FitPoint>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FitPoint {
    start_time_nanos: String,
    #[serde(default)]
    value: Vec<FitValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FitValue {
    int_val: Option<i64>,
    fp_val: Option<f64>,
}

impl FitValue {
    fn as_f64(&self) -> Option<f64> {
        self.fp_val.or_else(|| self.int_val.map(|v| v as f64))
    }
}

#[derive(Debug, Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    message: Option<String>,
}

/// Google Fit REST client
pub struct GoogleFitProvider {
    config: GoogleFitConfig,
    access_token: RwLock<Option<String>>,
    client: Client,
}

impl GoogleFitProvider {
    /// Provider against the public Google endpoint
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(GoogleFitConfig::default())
    }

    /// Provider against a custom endpoint
    #[must_use]
    pub fn with_config(config: GoogleFitConfig) -> Self {
        Self {
            config,
            access_token: RwLock::new(None),
            client: shared_client().clone(),
        }
    }

    /// Endpoint configuration
    #[must_use]
    pub const fn config(&self) -> &GoogleFitConfig {
        &self.config
    }

    /// Install the OAuth access token obtained by the identity layer
    pub async fn set_access_token(&self, token: impl Into<String>) {
        *self.access_token.write().await = Some(token.into());
    }

    async fn access_token(&self) -> ProviderResult<String> {
        self.access_token
            .read()
            .await
            .clone()
            .ok_or_else(|| ProviderError::AuthenticationFailed {
                provider: PROVIDER_NAME.to_owned(),
                reason: "no access token configured".to_owned(),
            })
    }

    fn network_error(err: &reqwest::Error) -> ProviderError {
        ProviderError::NetworkError {
            provider: PROVIDER_NAME.to_owned(),
            message: err.to_string(),
            timed_out: err.is_timeout(),
        }
    }

    /// Map a non-success response onto the provider error taxonomy
    fn handle_api_error(status: StatusCode, text: &str, url: &str) -> ProviderError {
        error!(
            "Google Fit API request failed - status: {status}, url: {url}, body_length: {} bytes",
            text.len()
        );

        let message = from_str::<GoogleErrorEnvelope>(text)
            .ok()
            .and_then(|envelope| envelope.error.message)
            .unwrap_or_else(|| text.to_owned());

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ProviderError::AuthenticationFailed {
                    provider: PROVIDER_NAME.to_owned(),
                    reason: message,
                }
            }
            StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded {
                provider: PROVIDER_NAME.to_owned(),
                retry_after_secs: DEFAULT_RETRY_AFTER_SECS,
            },
            _ => ProviderError::ApiError {
                provider: PROVIDER_NAME.to_owned(),
                status_code: status.as_u16(),
                message,
                retryable: status.is_server_error(),
            },
        }
    }

    /// Decode a response body, treating 404 as "no data"
    async fn read_json<T>(response: reqwest::Response, url: &str) -> ProviderResult<Option<T>>
    where
        T: for<'de> Deserialize<'de>,
    {
        let status = response.status();
        debug!("Received HTTP response with status: {status}");

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let text = response.text().await.map_err(|e| Self::network_error(&e))?;
        if !status.is_success() {
            return Err(Self::handle_api_error(status, &text, url));
        }

        from_str(&text)
            .map(Some)
            .map_err(|e| ProviderError::ParseError {
                provider: PROVIDER_NAME.to_owned(),
                message: e.to_string(),
            })
    }

    #[instrument(skip(self), fields(provider = PROVIDER_NAME, api_call = "aggregate"))]
    async fn daily_aggregate(
        &self,
        data_source_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ProviderResult<Vec<DataPoint>> {
        let token = self.access_token().await?;
        let url = format!("{}/dataset:aggregate", self.config.api_base_url);
        let body = AggregateRequest {
            aggregate_by: [AggregateBy { data_source_id }],
            bucket_by_time: BucketByTime {
                duration_millis: DAY_MILLIS,
            },
            start_time_millis: start.timestamp_millis(),
            end_time_millis: end.timestamp_millis(),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| Self::network_error(&e))?;

        let Some(aggregate) = Self::read_json::<AggregateResponse>(response, &url).await? else {
            return Ok(Vec::new());
        };

        Ok(daily_points(aggregate))
    }

    #[instrument(skip(self), fields(provider = PROVIDER_NAME, api_call = "heart_rate_dataset"))]
    async fn heart_rate_points(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ProviderResult<Vec<DataPoint>> {
        let token = self.access_token().await?;
        let start_ns = i128::from(start.timestamp_millis()) * 1_000_000;
        let end_ns = i128::from(end.timestamp_millis()) * 1_000_000;
        let url = format!(
            "{}/dataSources/{HEART_RATE_SOURCE}/datasets/{start_ns}-{end_ns}",
            self.config.api_base_url
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| Self::network_error(&e))?;

        let Some(dataset) = Self::read_json::<Dataset>(response, &url).await? else {
            return Ok(Vec::new());
        };

        Ok(instant_points(dataset))
    }
}

impl Default for GoogleFitProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// One sample per non-empty day bucket, summing every point in it
fn daily_points(aggregate: AggregateResponse) -> Vec<DataPoint> {
    aggregate
        .bucket
        .into_iter()
        .filter_map(|bucket| {
            let values: Vec<f64> = bucket
                .dataset
                .iter()
                .flat_map(|dataset| &dataset.point)
                .flat_map(|point| &point.value)
                .filter_map(FitValue::as_f64)
                .collect();
            if values.is_empty() {
                return None;
            }
            let start_millis = bucket.start_time_millis.parse::<i64>().ok()?;
            let day = Utc.timestamp_millis_opt(start_millis).single()?;
            Some(DataPoint::new(
                day.format("%Y-%m-%d").to_string(),
                values.iter().sum(),
            ))
        })
        .collect()
}

/// One sample per raw point, dated at millisecond precision
fn instant_points(dataset: Dataset) -> Vec<DataPoint> {
    dataset
        .point
        .into_iter()
        .filter_map(|point| {
            let nanos = point.start_time_nanos.parse::<i64>().ok()?;
            let value = point.value.first().and_then(FitValue::as_f64)?;
            let at = Utc.timestamp_millis_opt(nanos / 1_000_000).single()?;
            Some(DataPoint::new(
                at.to_rfc3339_opts(SecondsFormat::Millis, true),
                value,
            ))
        })
        .collect()
}

#[async_trait]
impl FitnessDataSource for GoogleFitProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn get_samples(
        &self,
        category: MetricCategory,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ProviderResult<Vec<DataPoint>> {
        match category {
            MetricCategory::Steps => self.daily_aggregate(STEPS_SOURCE, start, end).await,
            MetricCategory::Distance => self.daily_aggregate(DISTANCE_SOURCE, start, end).await,
            MetricCategory::HeartRate => self.heart_rate_points(start, end).await,
        }
    }
}
