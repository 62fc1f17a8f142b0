//! Backend REST client
//!
//! Thin boundary to the hosted API. Every failure here is non-fatal to the
//! dashboard: callers fall back to local state and surface degraded mode,
//! they never crash on a dead backend.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::model::{Goal, Observation};
use crate::{Error, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the observation backend
pub struct ApiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the full observation collection
    pub async fn fetch_observations(&self) -> Result<Vec<Observation>> {
        self.get_json("observations").await
    }

    /// Fetch the full goal collection
    pub async fn fetch_goals(&self) -> Result<Vec<Goal>> {
        self.get_json("goals").await
    }

    /// Create a goal on the backend
    pub async fn create_goal(&self, goal: &Goal) -> Result<Goal> {
        let url = format!("{}/goals", self.base_url);
        tracing::debug!(url = %url, "POST goal");

        let response = self
            .http_client
            .post(&url)
            .json(goal)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        decode(response).await
    }

    /// Replace an observation on the backend
    pub async fn update_observation(
        &self,
        id: &str,
        observation: &Observation,
    ) -> Result<Observation> {
        let url = format!("{}/observations/{}", self.base_url, id);
        tracing::debug!(url = %url, "PATCH observation");

        let response = self
            .http_client
            .patch(&url)
            .json(observation)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        decode(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!(url = %url, "GET collection");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();

    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(Error::Api(status.as_u16(), error_text));
    }

    let body = response
        .text()
        .await
        .map_err(|e| Error::Network(e.to_string()))?;
    let value = serde_json::from_str(&body)?;

    Ok(value)
}
