//! Ranked user wire types
//!
//! These mirror the `gigachads-ranking.json` snapshot: a `ranking` array of
//! entries, each with a `user` object and a `stats` object. Every field is
//! optional on the wire; readers go through the accessor methods, which
//! apply the documented defaults.

use serde::{Deserialize, Serialize};

/// A user as it appears inside a ranking entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub profile_id: Option<u64>,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    /// Stable identity key. May be absent in older snapshots.
    pub userkey: Option<String>,
    pub profile_url: Option<String>,
    pub twitter_url: Option<String>,
}

impl User {
    /// Display name with the `'Unknown'` default: displayName, then
    /// username, then `"Unknown"`.
    pub fn name(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or("Unknown")
    }

    /// Identity key for self/interaction comparisons: `userkey` when
    /// present, otherwise the display name. The fallback can collide when
    /// two users share a display name; that matches the snapshot producer
    /// and is deliberately left as-is.
    pub fn identity(&self) -> &str {
        self.userkey.as_deref().unwrap_or_else(|| self.name())
    }
}

/// Avatar reference carried in the `*GivenAvatars` / `*ReceivedAvatars`
/// stat lists. Snapshots have produced both bare and user-wrapped shapes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AvatarRef {
    pub avatar: Option<String>,
    pub profile_id: Option<u64>,
    pub name: Option<String>,
    pub user: Option<User>,
}

impl AvatarRef {
    /// Profile id, looking through the wrapped user when present.
    pub fn profile_id(&self) -> Option<u64> {
        self.profile_id
            .or_else(|| self.user.as_ref().and_then(|u| u.profile_id))
    }
}

/// Per-user interaction counters and the avatar lists backing the
/// missing-interaction computation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RankStats {
    pub total_score: i64,
    pub vouches_given: i64,
    pub reviews_given: i64,
    pub vouches_received: i64,
    pub reviews_received: i64,
    pub vouches_given_avatars: Vec<AvatarRef>,
    pub reviews_given_avatars: Vec<AvatarRef>,
    pub vouches_received_avatars: Vec<AvatarRef>,
    pub reviews_received_avatars: Vec<AvatarRef>,
}

/// One row of the ranking snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RankEntry {
    pub rank: u32,
    pub user: User,
    pub stats: RankStats,
}
