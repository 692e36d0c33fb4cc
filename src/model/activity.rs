//! Activity records and their normalization
//!
//! Activity feeds have gone through several producer revisions, so the same
//! logical field shows up under different names depending on the snapshot
//! age (`authorUser` vs `author`, `timestamp` vs `createdAt`, stake amounts
//! in five different places). All of that is resolved here, once, at
//! ingestion; the rest of the crate only ever sees [`Activity`].
//!
//! Field precedence, in order:
//!
//! - name: `authorUser.displayName`, `authorUser.username`, `author.name`,
//!   `author.username`, `"Unknown"` (same for the subject side)
//! - avatar: `authorUser.avatarUrl`, `author.avatar`, placeholder
//! - timestamp: `timestamp`, then `createdAt`; values below 1e12 are
//!   seconds and get scaled to milliseconds
//! - stake: `stakedAmount`, `data.stakedAmount`, `data.staked`, `stake`,
//!   `data.stake`
//! - review score: `data.score`, defaulting to neutral
//! - id: `data.id`, then the top-level `id`

use serde::{Deserialize, Serialize};

/// Placeholder avatar used when a record carries none.
pub const PLACEHOLDER_AVATAR: &str = "https://via.placeholder.com/32";

/// Milliseconds-vs-seconds cutoff for wire timestamps.
const MS_EPOCH_CUTOFF: i64 = 1_000_000_000_000;

/// Kind of social activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Vouch,
    Review,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Vouch => "vouch",
            ActivityKind::Review => "review",
        }
    }

    /// Verb used in rendered fragments.
    pub fn verb(&self) -> &'static str {
        match self {
            ActivityKind::Vouch => "vouched for",
            ActivityKind::Review => "reviewed",
        }
    }
}

/// Review sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// Parse a wire score string; anything unrecognized is neutral.
    pub fn parse(score: &str) -> Self {
        match score {
            "positive" => Sentiment::Positive,
            "negative" => Sentiment::Negative,
            _ => Sentiment::Neutral,
        }
    }

    /// CSS class used in review fragments.
    pub fn css_class(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }

    /// Capitalized badge label.
    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        }
    }
}

/// A wire value that may arrive as a number or a string.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum NumOrString {
    Num(f64),
    Str(String),
}

impl NumOrString {
    /// The value as an amount string (numbers are formatted as-is).
    pub fn as_amount(&self) -> String {
        match self {
            NumOrString::Num(n) => format!("{}", n),
            NumOrString::Str(s) => s.clone(),
        }
    }

    /// The value as an integer millisecond timestamp, scaling second
    /// resolution values. Unparseable strings yield zero.
    pub fn as_timestamp_ms(&self) -> i64 {
        let raw = match self {
            NumOrString::Num(n) => *n as i64,
            NumOrString::Str(s) => s.trim().parse::<i64>().unwrap_or(0),
        };
        if raw > 0 && raw < MS_EPOCH_CUTOFF {
            raw * 1000
        } else {
            raw
        }
    }
}

/// One side of a raw activity record (author or subject), in any of the
/// shapes producers have emitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawParty {
    pub profile_id: Option<u64>,
    pub userkey: Option<String>,
    pub name: Option<String>,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub avatar: Option<String>,
    pub avatar_url: Option<String>,
}

/// The nested `data` object of a raw activity record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawActivityData {
    pub id: Option<u64>,
    pub score: Option<String>,
    pub staked_amount: Option<NumOrString>,
    pub staked: Option<NumOrString>,
    pub stake: Option<NumOrString>,
    pub deposited: Option<NumOrString>,
}

/// A raw activity record as fetched, before normalization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawActivity {
    /// Record kind as reported by the per-profile API (`"vouch"` /
    /// `"review"`); absent in the snapshot feed, where the kind is implied
    /// by the containing array.
    #[serde(alias = "type")]
    pub activity_type: Option<String>,
    pub author_user: Option<RawParty>,
    pub author: Option<RawParty>,
    pub subject_user: Option<RawParty>,
    pub subject: Option<RawParty>,
    pub timestamp: Option<NumOrString>,
    pub created_at: Option<NumOrString>,
    pub staked_amount: Option<NumOrString>,
    pub stake: Option<NumOrString>,
    pub id: Option<u64>,
    pub data: Option<RawActivityData>,
}

/// A normalized activity participant.
#[derive(Debug, Clone, PartialEq)]
pub struct Party {
    pub profile_id: Option<u64>,
    pub userkey: Option<String>,
    pub name: String,
    pub username: Option<String>,
    pub avatar_url: String,
}

impl Party {
    /// Identity key used in dedup keys and self-interaction checks:
    /// profile id, then userkey, then the (defaulted) name.
    pub fn key_id(&self) -> String {
        if let Some(id) = self.profile_id {
            return id.to_string();
        }
        if let Some(ref key) = self.userkey {
            return key.clone();
        }
        self.name.clone()
    }

    fn from_raw(preferred: Option<&RawParty>, legacy: Option<&RawParty>) -> Self {
        let name = preferred
            .and_then(|p| p.display_name.as_deref())
            .or_else(|| preferred.and_then(|p| p.username.as_deref()))
            .or_else(|| legacy.and_then(|p| p.name.as_deref()))
            .or_else(|| legacy.and_then(|p| p.username.as_deref()))
            .unwrap_or("Unknown")
            .to_string();

        let avatar_url = preferred
            .and_then(|p| p.avatar_url.as_deref())
            .or_else(|| legacy.and_then(|p| p.avatar.as_deref()))
            .unwrap_or(PLACEHOLDER_AVATAR)
            .to_string();

        Party {
            profile_id: preferred
                .and_then(|p| p.profile_id)
                .or_else(|| legacy.and_then(|p| p.profile_id)),
            userkey: preferred
                .and_then(|p| p.userkey.clone())
                .or_else(|| legacy.and_then(|p| p.userkey.clone())),
            name,
            username: preferred
                .and_then(|p| p.username.clone())
                .or_else(|| legacy.and_then(|p| p.username.clone())),
            avatar_url,
        }
    }
}

/// A normalized vouch or review event between two users.
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub kind: ActivityKind,
    pub author: Party,
    pub subject: Party,
    pub timestamp_ms: i64,
    /// Activity id, used for click-through links.
    pub id: Option<u64>,
    /// Review sentiment; meaningless for vouches.
    pub score: Sentiment,
    /// Stake converted to a 3-decimal ETH string; vouches only.
    pub stake_eth: Option<String>,
}

impl Activity {
    /// Composite identity key. Two records with the same key describe the
    /// same event and must not be counted twice within one fetch session.
    pub fn key(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.kind.as_str(),
            self.author.key_id(),
            self.subject.key_id(),
            self.timestamp_ms
        )
    }
}

impl RawActivity {
    /// Normalize a raw record into an [`Activity`], applying the module's
    /// documented field precedence. Missing fields default rather than
    /// fail; a record is never rejected here.
    pub fn normalize(&self, kind: ActivityKind) -> Activity {
        let author = Party::from_raw(self.author_user.as_ref(), self.author.as_ref());
        let subject = Party::from_raw(self.subject_user.as_ref(), self.subject.as_ref());

        let timestamp_ms = self
            .timestamp
            .as_ref()
            .or(self.created_at.as_ref())
            .map(NumOrString::as_timestamp_ms)
            .unwrap_or(0);

        let data = self.data.as_ref();

        let stake_eth = match kind {
            ActivityKind::Vouch => {
                let raw_stake = self
                    .staked_amount
                    .as_ref()
                    .or_else(|| data.and_then(|d| d.staked_amount.as_ref()))
                    .or_else(|| data.and_then(|d| d.staked.as_ref()))
                    .or_else(|| data.and_then(|d| d.deposited.as_ref()))
                    .or(self.stake.as_ref())
                    .or_else(|| data.and_then(|d| d.stake.as_ref()));
                Some(format_eth_amount(
                    &raw_stake.map(NumOrString::as_amount).unwrap_or_default(),
                ))
            }
            ActivityKind::Review => None,
        };

        let score = data
            .and_then(|d| d.score.as_deref())
            .map(Sentiment::parse)
            .unwrap_or(Sentiment::Neutral);

        Activity {
            kind,
            author,
            subject,
            timestamp_ms,
            id: data.and_then(|d| d.id).or(self.id),
            score,
            stake_eth,
        }
    }
}

/// Convert a stake amount to a 3-decimal ETH string.
///
/// Amounts arrive either already formatted (`"0.5"`), as small integral
/// strings, or as wei (18-decimal fixed point). Anything longer than ten
/// digits is treated as wei and rounded to the nearest 0.001 ETH;
/// unparseable values collapse to `"0.000"`.
pub fn format_eth_amount(amount: &str) -> String {
    let trimmed = amount.trim();
    if trimmed.is_empty() || trimmed == "0" {
        return "0.000".to_string();
    }

    if trimmed.contains('.') || trimmed.len() < 10 {
        return trimmed.to_string();
    }

    if trimmed.len() > 10 {
        return match trimmed.parse::<u128>() {
            Ok(wei) => {
                let milli = (wei + 500_000_000_000_000) / 1_000_000_000_000_000;
                format!("{}.{:03}", milli / 1000, milli % 1000)
            }
            Err(_) => "0.000".to_string(),
        };
    }

    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_from_json(json: &str) -> RawActivity {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_wei_conversion() {
        assert_eq!(format_eth_amount("1000000000000000000"), "1.000");
        assert_eq!(format_eth_amount("500000000000000000"), "0.500");
        assert_eq!(format_eth_amount("1234500000000000000"), "1.235");
    }

    #[test]
    fn test_formatted_amount_passes_through() {
        assert_eq!(format_eth_amount("0.5"), "0.5");
        assert_eq!(format_eth_amount("1.250"), "1.250");
        assert_eq!(format_eth_amount("42"), "42");
    }

    #[test]
    fn test_bad_amounts_default() {
        assert_eq!(format_eth_amount(""), "0.000");
        assert_eq!(format_eth_amount("0"), "0.000");
        assert_eq!(format_eth_amount("not-a-number-xx"), "0.000");
    }

    #[test]
    fn test_timestamp_seconds_scaled_to_ms() {
        let secs = NumOrString::Num(1_700_000_000.0);
        assert_eq!(secs.as_timestamp_ms(), 1_700_000_000_000);

        let ms = NumOrString::Num(1_700_000_000_000.0);
        assert_eq!(ms.as_timestamp_ms(), 1_700_000_000_000);

        let from_str = NumOrString::Str("1700000000".to_string());
        assert_eq!(from_str.as_timestamp_ms(), 1_700_000_000_000);

        let junk = NumOrString::Str("soon".to_string());
        assert_eq!(junk.as_timestamp_ms(), 0);
    }

    #[test]
    fn test_normalize_prefers_author_user_fields() {
        let raw = raw_from_json(
            r#"{
                "authorUser": {"displayName": "Alice Wonder", "avatarUrl": "https://a/1.png", "profileId": 1},
                "author": {"name": "legacy-alice", "avatar": "https://a/old.png"},
                "subjectUser": {"username": "bob", "profileId": 2},
                "timestamp": 1700000000,
                "data": {"id": 77, "stakedAmount": "1000000000000000000"}
            }"#,
        );

        let activity = raw.normalize(ActivityKind::Vouch);
        assert_eq!(activity.author.name, "Alice Wonder");
        assert_eq!(activity.author.avatar_url, "https://a/1.png");
        assert_eq!(activity.subject.name, "bob");
        assert_eq!(activity.timestamp_ms, 1_700_000_000_000);
        assert_eq!(activity.id, Some(77));
        assert_eq!(activity.stake_eth.as_deref(), Some("1.000"));
    }

    #[test]
    fn test_normalize_falls_back_to_legacy_fields() {
        let raw = raw_from_json(
            r#"{
                "author": {"name": "Old Author", "avatar": "https://a/old.png"},
                "subject": {"username": "target"},
                "createdAt": "1700000000",
                "data": {"score": "negative"}
            }"#,
        );

        let activity = raw.normalize(ActivityKind::Review);
        assert_eq!(activity.author.name, "Old Author");
        assert_eq!(activity.author.avatar_url, "https://a/old.png");
        assert_eq!(activity.subject.name, "target");
        assert_eq!(activity.timestamp_ms, 1_700_000_000_000);
        assert_eq!(activity.score, Sentiment::Negative);
        assert_eq!(activity.stake_eth, None);
    }

    #[test]
    fn test_normalize_defaults_on_empty_record() {
        let activity = RawActivity::default().normalize(ActivityKind::Review);
        assert_eq!(activity.author.name, "Unknown");
        assert_eq!(activity.subject.name, "Unknown");
        assert_eq!(activity.author.avatar_url, PLACEHOLDER_AVATAR);
        assert_eq!(activity.timestamp_ms, 0);
        assert_eq!(activity.score, Sentiment::Neutral);
    }

    #[test]
    fn test_key_is_stable_across_duplicate_records() {
        let raw = raw_from_json(
            r#"{
                "authorUser": {"profileId": 1, "displayName": "A"},
                "subjectUser": {"profileId": 2, "displayName": "B"},
                "timestamp": 1700000000
            }"#,
        );
        let a = raw.normalize(ActivityKind::Vouch);
        let b = raw.normalize(ActivityKind::Vouch);
        assert_eq!(a.key(), b.key());
        assert_eq!(a.key(), "vouch|1|2|1700000000000");
    }

    #[test]
    fn test_sentiment_parse() {
        assert_eq!(Sentiment::parse("positive"), Sentiment::Positive);
        assert_eq!(Sentiment::parse("negative"), Sentiment::Negative);
        assert_eq!(Sentiment::parse("weird"), Sentiment::Neutral);
    }
}
