//! Snapshot document shapes
//!
//! One struct per remote JSON document. Everything is `#[serde(default)]`:
//! a snapshot missing a field parses to the empty value instead of failing
//! the whole fetch.

use serde::{Deserialize, Serialize};

use super::activity::RawActivity;
use super::user::{AvatarRef, RankEntry};

/// `gigachads-ranking.json` — the full leaderboard plus the avatar indexes
/// used to resolve avatars for users that only appear as activity parties.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RankingSnapshot {
    pub ranking: Vec<RankEntry>,
    pub vouch_received_avatars: Vec<AvatarRef>,
    pub review_received_avatars: Vec<AvatarRef>,
    pub last_updated: Option<String>,
}

/// The `data` object of `activities-data.json`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityFeeds {
    pub vouches: Vec<RawActivity>,
    pub reviews: Vec<RawActivity>,
}

impl ActivityFeeds {
    pub fn is_empty(&self) -> bool {
        self.vouches.is_empty() && self.reviews.is_empty()
    }
}

/// `activities-data.json` envelope.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivitiesSnapshot {
    pub success: bool,
    pub data: Option<ActivityFeeds>,
    pub last_updated: Option<String>,
}

/// A roster member from `gigachads-data.json`. Members predating the
/// profile migration have no `profileId`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RosterMember {
    pub profile_id: Option<u64>,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub avatar: Option<String>,
}

impl RosterMember {
    pub fn name(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or("Unknown")
    }
}

/// `gigachads-data.json` — the raw roster.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RosterSnapshot {
    pub users: Vec<RosterMember>,
    pub last_updated: Option<String>,
}

/// One row of `invitations-data.json`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvitationEntry {
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub invite_text: Option<String>,
    pub x_url: Option<String>,
}

/// `invitations-data.json` envelope.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvitationsSnapshot {
    pub data: Vec<InvitationEntry>,
    pub gigachads_with_invites: Option<u64>,
    pub total_invites: Option<u64>,
    pub last_updated: Option<String>,
}

/// One row of `rank-changes-data.json`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RankGain {
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub points: Option<i64>,
}

/// `rank-changes-data.json` envelope.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RankChangesSnapshot {
    pub data: Vec<RankGain>,
    pub last_updated: Option<String>,
}

/// A profile record from the directory API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileRecord {
    pub id: Option<u64>,
    /// Epoch seconds.
    pub created_at: Option<i64>,
    pub invites_available: Option<u64>,
}

/// `data` object of the profiles API envelope.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileValues {
    pub values: Vec<ProfileRecord>,
    pub total: Option<u64>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Envelope returned by `POST /api/v1/profiles` and
/// `GET /api/v1/profiles/directory`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfilesEnvelope {
    pub ok: bool,
    pub data: Option<ProfileValues>,
}

/// Request body for `POST /api/v1/profiles`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilesRequest {
    pub ids: Vec<u64>,
    pub limit: usize,
    pub offset: usize,
    pub use_cache: bool,
}

/// Request body for `POST /api/v2/activities/profile/all`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileActivitiesRequest {
    pub userkey: String,
    pub filter: Vec<String>,
    pub limit: usize,
}

/// Response of `POST /api/v2/activities/profile/all`. Producers have
/// emitted both an enveloped `{ values: [...] }` and a bare array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ProfileActivitiesResponse {
    Enveloped { values: Vec<RawActivity> },
    Bare(Vec<RawActivity>),
}

impl ProfileActivitiesResponse {
    pub fn into_values(self) -> Vec<RawActivity> {
        match self {
            ProfileActivitiesResponse::Enveloped { values } => values,
            ProfileActivitiesResponse::Bare(values) => values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activities_snapshot_parses() {
        let json = r#"{
            "success": true,
            "data": {
                "vouches": [{"authorUser": {"displayName": "A"}}],
                "reviews": []
            },
            "lastUpdated": "2026-08-01T00:00:00Z"
        }"#;
        let snapshot: ActivitiesSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.success);
        let feeds = snapshot.data.unwrap();
        assert_eq!(feeds.vouches.len(), 1);
        assert!(feeds.reviews.is_empty());
    }

    #[test]
    fn test_profiles_envelope_parses() {
        let json = r#"{
            "ok": true,
            "data": {"values": [{"id": 12, "createdAt": 1700000000}], "total": 1}
        }"#;
        let envelope: ProfilesEnvelope = serde_json::from_str(json).unwrap();
        assert!(envelope.ok);
        let values = envelope.data.unwrap().values;
        assert_eq!(values[0].id, Some(12));
        assert_eq!(values[0].created_at, Some(1_700_000_000));
    }

    #[test]
    fn test_profiles_request_serializes_camel_case() {
        let request = ProfilesRequest {
            ids: vec![1, 2],
            limit: 10,
            offset: 0,
            use_cache: true,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["useCache"], serde_json::Value::Bool(true));
        assert_eq!(json["ids"][1], serde_json::json!(2));
    }

    #[test]
    fn test_profile_activities_response_both_shapes() {
        let enveloped: ProfileActivitiesResponse =
            serde_json::from_str(r#"{"values": [{"id": 1}]}"#).unwrap();
        assert_eq!(enveloped.into_values().len(), 1);

        let bare: ProfileActivitiesResponse = serde_json::from_str(r#"[{"id": 1}, {"id": 2}]"#).unwrap();
        assert_eq!(bare.into_values().len(), 2);
    }

    #[test]
    fn test_missing_fields_default() {
        let snapshot: RankingSnapshot = serde_json::from_str("{}").unwrap();
        assert!(snapshot.ranking.is_empty());

        let invitations: InvitationsSnapshot = serde_json::from_str("{}").unwrap();
        assert!(invitations.data.is_empty());
    }
}
