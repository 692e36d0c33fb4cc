//! Profile directory REST API
//!
//! Bulk profile lookups and per-profile activity feeds. Per-profile
//! fetches are issued in small concurrent batches with a fixed delay
//! between batches — enough to stay polite toward the public API, nothing
//! more. Failures degrade to empty results with a warning; no retries.

use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::model::{
    ActivityFeeds, ProfileActivitiesRequest, ProfileActivitiesResponse, ProfileRecord,
    ProfilesEnvelope, ProfilesRequest, RawActivity,
};
use crate::types::Result;

/// Configuration for the profile API client.
#[derive(Debug, Clone)]
pub struct ProfileApiConfig {
    /// API origin, e.g. `https://api.ethos.network`.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Concurrent per-profile fetches per batch.
    pub batch_size: usize,
    /// Fixed delay between batches.
    pub batch_delay: Duration,
    /// Records requested per activity feed.
    pub max_items: usize,
}

impl Default for ProfileApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.ethos.network".to_string(),
            timeout: Duration::from_secs(30),
            batch_size: 5,
            batch_delay: Duration::from_secs(1),
            max_items: 20,
        }
    }
}

/// Client for the profile directory API.
pub struct ProfileApiClient {
    config: ProfileApiConfig,
    http: reqwest::Client,
}

impl ProfileApiClient {
    pub fn new(config: ProfileApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        info!(
            base_url = %config.base_url,
            batch_size = config.batch_size,
            "profile API client created"
        );
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ProfileApiConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn unwrap_envelope(&self, url: &str, envelope: ProfilesEnvelope) -> Vec<ProfileRecord> {
        if !envelope.ok {
            warn!(%url, "profiles envelope marked not ok");
            return Vec::new();
        }
        match envelope.data {
            Some(values) => values.values,
            None => {
                warn!(%url, "profiles envelope missing data");
                Vec::new()
            }
        }
    }

    /// Bulk profile lookup by id. Empty on any failure.
    pub async fn fetch_profiles(&self, ids: &[u64]) -> Vec<ProfileRecord> {
        if ids.is_empty() {
            return Vec::new();
        }

        let url = self.url("/api/v1/profiles");
        let body = ProfilesRequest {
            ids: ids.to_vec(),
            limit: ids.len(),
            offset: 0,
            use_cache: true,
        };

        let response = match self.http.post(&url).json(&body).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(%url, error = %e, "profiles fetch failed");
                return Vec::new();
            }
        };

        if !response.status().is_success() {
            warn!(%url, status = %response.status(), "profiles fetch returned non-success");
            return Vec::new();
        }

        match response.json::<ProfilesEnvelope>().await {
            Ok(envelope) => self.unwrap_envelope(&url, envelope),
            Err(e) => {
                warn!(%url, error = %e, "profiles parse failed");
                Vec::new()
            }
        }
    }

    /// Page through the public profile directory. Empty on any failure.
    pub async fn fetch_directory(&self, limit: usize, offset: usize) -> Vec<ProfileRecord> {
        let url = self.url(&format!(
            "/api/v1/profiles/directory?limit={limit}&offset={offset}"
        ));

        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(%url, error = %e, "directory fetch failed");
                return Vec::new();
            }
        };

        if !response.status().is_success() {
            warn!(%url, status = %response.status(), "directory fetch returned non-success");
            return Vec::new();
        }

        match response.json::<ProfilesEnvelope>().await {
            Ok(envelope) => self.unwrap_envelope(&url, envelope),
            Err(e) => {
                warn!(%url, error = %e, "directory parse failed");
                Vec::new()
            }
        }
    }

    /// One user's vouch/review feed. Empty on any failure.
    pub async fn fetch_profile_activities(&self, userkey: &str) -> Vec<RawActivity> {
        let url = self.url("/api/v2/activities/profile/all");
        let body = ProfileActivitiesRequest {
            userkey: userkey.to_string(),
            filter: vec!["vouch".to_string(), "review".to_string()],
            limit: self.config.max_items,
        };

        let response = match self.http.post(&url).json(&body).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(%url, userkey, error = %e, "profile activities fetch failed");
                return Vec::new();
            }
        };

        if !response.status().is_success() {
            warn!(
                %url,
                userkey,
                status = %response.status(),
                "profile activities fetch returned non-success"
            );
            return Vec::new();
        }

        match response.json::<ProfileActivitiesResponse>().await {
            Ok(records) => records.into_values(),
            Err(e) => {
                warn!(%url, userkey, error = %e, "profile activities parse failed");
                Vec::new()
            }
        }
    }

    /// Fetch activity feeds for many users in batches, splitting the
    /// records into vouch and review feeds by their reported type.
    pub async fn fetch_activity_feeds_for(&self, userkeys: &[String]) -> ActivityFeeds {
        let mut feeds = ActivityFeeds::default();

        for (index, batch) in userkeys.chunks(self.config.batch_size).enumerate() {
            if index > 0 {
                tokio::time::sleep(self.config.batch_delay).await;
            }

            debug!(batch = index, users = batch.len(), "fetching activity batch");
            let fetches = batch.iter().map(|key| self.fetch_profile_activities(key));
            for records in join_all(fetches).await {
                for record in records {
                    match record.activity_type.as_deref() {
                        Some("vouch") => feeds.vouches.push(record),
                        Some("review") => feeds.reviews.push(record),
                        other => {
                            debug!(kind = ?other, "dropping activity of unhandled type");
                        }
                    }
                }
            }
        }

        feeds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let client = ProfileApiClient::new(ProfileApiConfig {
            base_url: "https://api.example.com/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            client.url("/api/v1/profiles"),
            "https://api.example.com/api/v1/profiles"
        );
    }

    #[test]
    fn test_unwrap_envelope_rejects_not_ok() {
        let client = ProfileApiClient::new(ProfileApiConfig::default()).unwrap();
        let envelope: ProfilesEnvelope =
            serde_json::from_str(r#"{"ok": false, "data": {"values": [{"id": 1}]}}"#).unwrap();
        assert!(client.unwrap_envelope("test", envelope).is_empty());
    }

    #[tokio::test]
    async fn test_fetch_profiles_empty_ids_short_circuits() {
        let client = ProfileApiClient::new(ProfileApiConfig {
            // Would fail if contacted; must not be
            base_url: "http://192.0.2.1:9".to_string(),
            timeout: Duration::from_millis(100),
            ..Default::default()
        })
        .unwrap();
        assert!(client.fetch_profiles(&[]).await.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_api_yields_empty() {
        let client = ProfileApiClient::new(ProfileApiConfig {
            base_url: "http://192.0.2.1:9".to_string(),
            timeout: Duration::from_millis(200),
            ..Default::default()
        })
        .unwrap();
        assert!(client.fetch_profiles(&[1, 2]).await.is_empty());
        assert!(client.fetch_profile_activities("profileId:1").await.is_empty());
    }
}
