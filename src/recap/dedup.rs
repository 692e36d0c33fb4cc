//! Activity deduplication
//!
//! Paginated and batched fetches overlap, so the same event routinely shows
//! up more than once within a fetch session. [`Deduper`] collapses repeats
//! by composite key and keeps only events strictly between two known users.

use std::collections::HashSet;

use tracing::debug;

use crate::model::{Activity, ActivityKind, Party, RankEntry, RawActivity};

/// Index of users appearing in the ranking, for cross-referencing activity
/// parties. Matches by profile id, userkey, display name, or username.
#[derive(Debug, Default)]
pub struct KnownUsers {
    profile_ids: HashSet<u64>,
    identities: HashSet<String>,
}

impl KnownUsers {
    pub fn from_ranking(entries: &[RankEntry]) -> Self {
        let mut known = KnownUsers::default();
        for entry in entries {
            if let Some(id) = entry.user.profile_id {
                known.profile_ids.insert(id);
            }
            if let Some(ref userkey) = entry.user.userkey {
                known.identities.insert(userkey.clone());
            }
            if let Some(ref username) = entry.user.username {
                known.identities.insert(username.clone());
            }
            known.identities.insert(entry.user.name().to_string());
        }
        known
    }

    /// Whether an activity party resolves to a ranked user.
    pub fn contains(&self, party: &Party) -> bool {
        if let Some(id) = party.profile_id {
            if self.profile_ids.contains(&id) {
                return true;
            }
        }
        if let Some(ref userkey) = party.userkey {
            if self.identities.contains(userkey) {
                return true;
            }
        }
        if let Some(ref username) = party.username {
            if self.identities.contains(username) {
                return true;
            }
        }
        self.identities.contains(&party.name)
    }

    pub fn len(&self) -> usize {
        self.profile_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profile_ids.is_empty() && self.identities.is_empty()
    }
}

/// Collapses duplicate activity records within one fetch session.
///
/// The seen-key set lives for the session: feeding the deduper records from
/// several sources (snapshot feed plus per-profile API pages) still yields
/// each event at most once.
#[derive(Debug, Default)]
pub struct Deduper {
    seen: HashSet<String>,
}

impl Deduper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize and filter a batch of raw records. Drops repeats,
    /// self-interactions, and events touching users outside the ranking.
    pub fn dedup(
        &mut self,
        kind: ActivityKind,
        raw: &[RawActivity],
        known: &KnownUsers,
    ) -> Vec<Activity> {
        let mut out = Vec::new();

        for record in raw {
            let activity = record.normalize(kind);

            if activity.author.key_id() == activity.subject.key_id() {
                debug!(author = %activity.author.name, "skipping self-{}", kind.as_str());
                continue;
            }

            if !known.contains(&activity.author) || !known.contains(&activity.subject) {
                debug!(
                    author = %activity.author.name,
                    subject = %activity.subject.name,
                    "skipping {} outside the ranking",
                    kind.as_str()
                );
                continue;
            }

            if !self.seen.insert(activity.key()) {
                continue;
            }

            out.push(activity);
        }

        out
    }

    /// Number of distinct events seen so far this session.
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RankStats, User};

    fn ranked(profile_id: u64, name: &str) -> RankEntry {
        RankEntry {
            rank: profile_id as u32,
            user: User {
                profile_id: Some(profile_id),
                display_name: Some(name.to_string()),
                ..Default::default()
            },
            stats: RankStats::default(),
        }
    }

    fn raw_vouch(author_id: u64, subject_id: u64, timestamp: i64) -> RawActivity {
        serde_json::from_str(&format!(
            r#"{{
                "authorUser": {{"profileId": {author_id}, "displayName": "user-{author_id}"}},
                "subjectUser": {{"profileId": {subject_id}, "displayName": "user-{subject_id}"}},
                "timestamp": {timestamp}
            }}"#
        ))
        .unwrap()
    }

    fn known_pair() -> KnownUsers {
        KnownUsers::from_ranking(&[ranked(1, "user-1"), ranked(2, "user-2")])
    }

    #[test]
    fn test_duplicate_records_collapse_to_one() {
        let known = known_pair();
        let mut deduper = Deduper::new();

        let raw = vec![
            raw_vouch(1, 2, 1_700_000_000),
            raw_vouch(1, 2, 1_700_000_000),
            raw_vouch(1, 2, 1_700_000_000),
        ];
        let out = deduper.dedup(ActivityKind::Vouch, &raw, &known);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_dedup_spans_batches() {
        let known = known_pair();
        let mut deduper = Deduper::new();

        let first = deduper.dedup(ActivityKind::Vouch, &[raw_vouch(1, 2, 1_700_000_000)], &known);
        assert_eq!(first.len(), 1);

        // Same event arriving from a later page of the same session
        let second = deduper.dedup(ActivityKind::Vouch, &[raw_vouch(1, 2, 1_700_000_000)], &known);
        assert!(second.is_empty());
        assert_eq!(deduper.seen_count(), 1);
    }

    #[test]
    fn test_distinct_timestamps_survive() {
        let known = known_pair();
        let mut deduper = Deduper::new();

        let raw = vec![raw_vouch(1, 2, 1_700_000_000), raw_vouch(1, 2, 1_700_000_060)];
        let out = deduper.dedup(ActivityKind::Vouch, &raw, &known);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_same_key_different_kind_is_distinct() {
        let known = known_pair();
        let mut deduper = Deduper::new();

        let raw = vec![raw_vouch(1, 2, 1_700_000_000)];
        let vouches = deduper.dedup(ActivityKind::Vouch, &raw, &known);
        let reviews = deduper.dedup(ActivityKind::Review, &raw, &known);
        assert_eq!(vouches.len(), 1);
        assert_eq!(reviews.len(), 1);
    }

    #[test]
    fn test_self_interaction_excluded() {
        let known = known_pair();
        let mut deduper = Deduper::new();

        let out = deduper.dedup(ActivityKind::Vouch, &[raw_vouch(1, 1, 1_700_000_000)], &known);
        assert!(out.is_empty());
    }

    #[test]
    fn test_unknown_party_excluded() {
        let known = known_pair();
        let mut deduper = Deduper::new();

        // Subject 99 is not in the ranking
        let out = deduper.dedup(ActivityKind::Vouch, &[raw_vouch(1, 99, 1_700_000_000)], &known);
        assert!(out.is_empty());
    }

    #[test]
    fn test_known_users_matches_by_display_name() {
        let entries = [RankEntry {
            rank: 1,
            user: User {
                display_name: Some("No Key".to_string()),
                ..Default::default()
            },
            stats: RankStats::default(),
        }];
        let known = KnownUsers::from_ranking(&entries);

        let party = Party {
            profile_id: None,
            userkey: None,
            name: "No Key".to_string(),
            username: None,
            avatar_url: String::new(),
        };
        assert!(known.contains(&party));
    }

    #[test]
    fn test_malformed_record_defaults_and_drops() {
        let known = known_pair();
        let mut deduper = Deduper::new();

        // Both parties default to "Unknown": same identity, dropped as a
        // self-interaction rather than erroring.
        let out = deduper.dedup(ActivityKind::Review, &[RawActivity::default()], &known);
        assert!(out.is_empty());
    }
}
