//! Static snapshot retrieval
//!
//! The recap data lives in flat JSON files on a raw-content host,
//! regenerated out-of-band. Every fetch degrades to the document's default
//! value on failure — non-2xx status, transport error, or a parse failure —
//! with a logged warning. Callers never see a network error.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::model::{
    ActivitiesSnapshot, ActivityFeeds, InvitationsSnapshot, RankChangesSnapshot, RankingSnapshot,
    RosterSnapshot,
};
use crate::types::Result;

/// Snapshot file names, relative to the base URL.
const RANKING_FILE: &str = "gigachads-ranking.json";
const ACTIVITIES_FILE: &str = "activities-data.json";
const ROSTER_FILE: &str = "gigachads-data.json";
const INVITATIONS_FILE: &str = "invitations-data.json";
const RANK_CHANGES_FILE: &str = "rank-changes-data.json";

/// Client for the static JSON snapshots.
pub struct SnapshotClient {
    http: reqwest::Client,
    base_url: String,
}

impl SnapshotClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    fn url(&self, file: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), file)
    }

    /// Fetch and parse one snapshot document. Any failure yields `None`
    /// after a warning; the caller substitutes the default value.
    async fn fetch_json<T: DeserializeOwned>(&self, file: &str) -> Option<T> {
        let url = self.url(file);

        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(%url, error = %e, "snapshot fetch failed");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(%url, status = %response.status(), "snapshot fetch returned non-success");
            return None;
        }

        match response.json::<T>().await {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(%url, error = %e, "snapshot parse failed");
                None
            }
        }
    }

    /// The leaderboard snapshot; empty ranking on failure.
    pub async fn fetch_ranking(&self) -> RankingSnapshot {
        let snapshot: RankingSnapshot = self.fetch_json(RANKING_FILE).await.unwrap_or_default();
        debug!(entries = snapshot.ranking.len(), "ranking snapshot loaded");
        snapshot
    }

    /// The combined vouch/review feed; empty feeds on failure or when the
    /// envelope reports `success: false`.
    pub async fn fetch_activity_feeds(&self) -> ActivityFeeds {
        let snapshot: ActivitiesSnapshot = self.fetch_json(ACTIVITIES_FILE).await.unwrap_or_default();

        if !snapshot.success {
            if snapshot.data.is_some() {
                warn!("activities snapshot marked unsuccessful, ignoring payload");
            }
            return ActivityFeeds::default();
        }

        let feeds = snapshot.data.unwrap_or_default();
        debug!(
            vouches = feeds.vouches.len(),
            reviews = feeds.reviews.len(),
            "activities snapshot loaded"
        );
        feeds
    }

    /// The raw membership roster; empty on failure.
    pub async fn fetch_roster(&self) -> RosterSnapshot {
        self.fetch_json(ROSTER_FILE).await.unwrap_or_default()
    }

    /// Invitation counts; empty on failure.
    pub async fn fetch_invitations(&self) -> InvitationsSnapshot {
        self.fetch_json(INVITATIONS_FILE).await.unwrap_or_default()
    }

    /// Today's point gains; empty on failure.
    pub async fn fetch_rank_changes(&self) -> RankChangesSnapshot {
        self.fetch_json(RANK_CHANGES_FILE).await.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client =
            SnapshotClient::new("https://example.com/data/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.url("gigachads-ranking.json"),
            "https://example.com/data/gigachads-ranking.json"
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_yields_default_ranking() {
        // Reserved TEST-NET address: connection fails fast, no DNS involved
        let client =
            SnapshotClient::new("http://192.0.2.1:9", Duration::from_millis(200)).unwrap();
        let snapshot = client.fetch_ranking().await;
        assert!(snapshot.ranking.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_host_yields_empty_feeds() {
        let client =
            SnapshotClient::new("http://192.0.2.1:9", Duration::from_millis(200)).unwrap();
        let feeds = client.fetch_activity_feeds().await;
        assert!(feeds.is_empty());
    }
}
