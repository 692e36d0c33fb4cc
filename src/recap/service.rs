//! Recap orchestration
//!
//! One service owns the whole fetch → normalize → dedup → render → cache
//! pipeline. All state flows through it explicitly; there are no module
//! globals. A cache miss on any section triggers a full rebuild — the
//! sections share their source fetches, so rebuilding one costs the same
//! as rebuilding all.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::FragmentCache;
use crate::model::{ActivityKind, RankEntry, RosterMember, RosterSnapshot};
use crate::render::{
    self, current_date_line, now_ms, render_invitations, render_leaderboard, render_missing_ids,
    render_missing_list, render_new_gigachads, render_rank_changes, render_reviews, render_vouches,
    render_table, NewGigachad, SortDir, SortKey, SortState,
};
use crate::sources::{ProfileApiClient, SnapshotClient};
use crate::types::{GazetteError, Result};

use super::dedup::{Deduper, KnownUsers};
use super::missing::missing_interactions;

/// The cached recap sections, in page order.
pub const SECTIONS: [&str; 6] = [
    "vouches",
    "reviews",
    "leaderboard",
    "new-gigachads",
    "rank-changes",
    "invitations",
];

/// How many newest roster members to resolve against the profiles API.
const NEW_MEMBER_CANDIDATES: usize = 10;

/// Builds and caches recap fragments.
pub struct RecapService {
    snapshots: SnapshotClient,
    profiles: ProfileApiClient,
    cache: Arc<FragmentCache>,
    section_items: usize,
}

impl RecapService {
    pub fn new(
        snapshots: SnapshotClient,
        profiles: ProfileApiClient,
        cache: Arc<FragmentCache>,
        section_items: usize,
    ) -> Self {
        Self {
            snapshots,
            profiles,
            cache,
            section_items,
        }
    }

    /// Serve one section fragment, cache-first. A miss rebuilds and caches
    /// every section in one fetch session.
    pub async fn section_fragment(&self, section: &str) -> Result<String> {
        if !SECTIONS.contains(&section) {
            return Err(GazetteError::UnknownSection(section.to_string()));
        }

        if let Some(html) = self.cache.get(section) {
            debug!(section, "serving fragment from cache");
            return Ok(html);
        }

        let fragments = self.build_all().await;
        fragments
            .get(section)
            .cloned()
            .ok_or_else(|| GazetteError::UnknownSection(section.to_string()))
    }

    /// All section fragments, cache-first: only rebuilds when at least one
    /// section has gone stale.
    pub async fn all_fragments(&self) -> BTreeMap<String, String> {
        let mut cached = BTreeMap::new();
        for section in SECTIONS {
            match self.cache.get(section) {
                Some(html) => {
                    cached.insert(section.to_string(), html);
                }
                None => return self.build_all().await,
            }
        }
        cached
    }

    /// Rebuild every section from fresh source data and cache the results.
    pub async fn build_all(&self) -> BTreeMap<String, String> {
        info!("rebuilding recap fragments");
        let now = now_ms();

        let (ranking, feeds, roster, invitations, rank_changes) = tokio::join!(
            self.snapshots.fetch_ranking(),
            self.snapshots.fetch_activity_feeds(),
            self.snapshots.fetch_roster(),
            self.snapshots.fetch_invitations(),
            self.snapshots.fetch_rank_changes(),
        );

        // Fall back to the per-profile API when the snapshot feed is
        // unavailable; the deduper collapses the overlap across pages.
        let feeds = if feeds.is_empty() && !ranking.ranking.is_empty() {
            warn!("activities snapshot empty, falling back to per-profile feeds");
            let userkeys: Vec<String> = ranking
                .ranking
                .iter()
                .filter_map(|entry| entry.user.userkey.clone())
                .collect();
            self.profiles.fetch_activity_feeds_for(&userkeys).await
        } else {
            feeds
        };

        let known = KnownUsers::from_ranking(&ranking.ranking);
        let mut deduper = Deduper::new();
        let vouches = deduper.dedup(ActivityKind::Vouch, &feeds.vouches, &known);
        let reviews = deduper.dedup(ActivityKind::Review, &feeds.reviews, &known);
        debug!(
            vouches = vouches.len(),
            reviews = reviews.len(),
            distinct = deduper.seen_count(),
            "activity feeds deduplicated"
        );

        let new_members = self.newest_members(&roster).await;

        let mut fragments = BTreeMap::new();
        fragments.insert(
            "vouches".to_string(),
            render_vouches(&vouches, self.section_items, now),
        );
        fragments.insert(
            "reviews".to_string(),
            render_reviews(&reviews, self.section_items, now),
        );
        fragments.insert(
            "leaderboard".to_string(),
            render_leaderboard(&ranking.ranking, self.section_items),
        );
        fragments.insert(
            "new-gigachads".to_string(),
            render_new_gigachads(&new_members, self.section_items, now),
        );
        fragments.insert(
            "rank-changes".to_string(),
            render_rank_changes(&rank_changes.data, self.section_items),
        );
        fragments.insert(
            "invitations".to_string(),
            render_invitations(&invitations),
        );

        for (section, html) in &fragments {
            self.cache.insert(section, html.clone());
        }
        info!(sections = fragments.len(), "recap fragments rebuilt");

        fragments
    }

    /// Newest roster members: take the highest profile ids as candidates,
    /// resolve real creation times via the profiles API, keep the newest.
    /// Candidates the API does not know are dropped.
    async fn newest_members(&self, roster: &RosterSnapshot) -> Vec<NewGigachad> {
        let mut candidates: Vec<&RosterMember> = roster
            .users
            .iter()
            .filter(|user| user.profile_id.is_some())
            .collect();
        candidates.sort_by(|a, b| b.profile_id.cmp(&a.profile_id));
        candidates.truncate(NEW_MEMBER_CANDIDATES);

        let ids: Vec<u64> = candidates.iter().filter_map(|u| u.profile_id).collect();
        if ids.is_empty() {
            return Vec::new();
        }

        let mut records = self.profiles.fetch_profiles(&ids).await;
        if records.is_empty() {
            // The bulk endpoint 500s under load; the public directory
            // carries the same records
            records = self.profiles.fetch_directory(100, 0).await;
        }

        let mut members: Vec<NewGigachad> = candidates
            .into_iter()
            .filter_map(|member| {
                let record = records.iter().find(|r| r.id == member.profile_id)?;
                let created_at = record.created_at?;
                Some(NewGigachad {
                    member: member.clone(),
                    created_at_ms: created_at * 1000,
                })
            })
            .collect();

        members.sort_by(|a, b| b.created_at_ms.cmp(&a.created_at_ms));
        members.truncate(self.section_items);
        members
    }

    /// The sortable ranking table, rebuilt per request.
    pub async fn table_fragment(&self, sort: Option<&str>, dir: Option<&str>) -> String {
        let ranking = self.snapshots.fetch_ranking().await;
        let mut entries = ranking.ranking;

        let state = match sort.and_then(SortKey::parse) {
            Some(column) => SortState::new(
                column,
                dir.and_then(SortDir::parse)
                    .unwrap_or_else(|| column.default_direction()),
            ),
            None => SortState::default(),
        };

        render::sort_entries(&mut entries, state);
        render_table(&entries)
    }

    /// The missing-interaction list for the user at a given rank.
    pub async fn missing_fragment(&self, rank: u32) -> Result<String> {
        let ranking = self.snapshots.fetch_ranking().await;
        let current = ranking
            .ranking
            .iter()
            .find(|entry| entry.rank == rank)
            .ok_or_else(|| GazetteError::NotFound(format!("rank {rank}")))?;

        let missing = missing_interactions(current, &ranking.ranking);
        Ok(render_missing_list(current, &missing))
    }

    /// Roster members without a profile id.
    pub async fn missing_ids_fragment(&self) -> String {
        let roster = self.snapshots.fetch_roster().await;
        let missing: Vec<RosterMember> = roster
            .users
            .into_iter()
            .filter(|user| user.profile_id.is_none())
            .collect();
        render_missing_ids(&missing)
    }

    /// Name search over the ranking, for the table's search box.
    pub async fn search_entries(&self, query: &str) -> Vec<RankEntry> {
        let ranking = self.snapshots.fetch_ranking().await;
        render::search(&ranking.ranking, query)
            .into_iter()
            .cloned()
            .collect()
    }

    /// The recap page's date line.
    pub fn date_line(&self) -> String {
        current_date_line()
    }
}
