//! Ranking table: sorting, search, row markup

use serde::{Deserialize, Serialize};

use crate::model::{AvatarRef, RankEntry};
use crate::recap::missing_interactions;

use super::format::escape_html;

/// Sortable table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Rank,
    VouchesGiven,
    ReviewsGiven,
    VouchesReceived,
    ReviewsReceived,
    TotalScore,
}

impl SortKey {
    /// Parse a query-string column name.
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "rank" => Some(SortKey::Rank),
            "vouchesGiven" => Some(SortKey::VouchesGiven),
            "reviewsGiven" => Some(SortKey::ReviewsGiven),
            "vouchesReceived" => Some(SortKey::VouchesReceived),
            "reviewsReceived" => Some(SortKey::ReviewsReceived),
            "totalScore" => Some(SortKey::TotalScore),
            _ => None,
        }
    }

    fn value(&self, entry: &RankEntry) -> i64 {
        match self {
            SortKey::Rank => entry.rank as i64,
            SortKey::VouchesGiven => entry.stats.vouches_given,
            SortKey::ReviewsGiven => entry.stats.reviews_given,
            SortKey::VouchesReceived => entry.stats.vouches_received,
            SortKey::ReviewsReceived => entry.stats.reviews_received,
            SortKey::TotalScore => entry.stats.total_score,
        }
    }

    /// Rank reads best ascending; every stat column defaults descending.
    pub fn default_direction(&self) -> SortDir {
        match self {
            SortKey::Rank => SortDir::Asc,
            _ => SortDir::Desc,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn parse(dir: &str) -> Option<Self> {
        match dir {
            "asc" => Some(SortDir::Asc),
            "desc" => Some(SortDir::Desc),
            _ => None,
        }
    }

    fn flipped(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }
}

/// Current sort column and direction.
///
/// Re-sorting the same column toggles the direction; switching columns
/// resets to that column's default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: SortKey,
    pub direction: SortDir,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            column: SortKey::Rank,
            direction: SortDir::Asc,
        }
    }
}

impl SortState {
    pub fn new(column: SortKey, direction: SortDir) -> Self {
        Self { column, direction }
    }

    /// Apply a header click.
    pub fn toggle(self, column: SortKey) -> Self {
        if self.column == column {
            Self {
                column,
                direction: self.direction.flipped(),
            }
        } else {
            Self {
                column,
                direction: column.default_direction(),
            }
        }
    }
}

/// Sort ranking entries in place per the sort state. Ties keep their
/// snapshot order.
pub fn sort_entries(entries: &mut [RankEntry], state: SortState) {
    entries.sort_by(|a, b| {
        let (va, vb) = (state.column.value(a), state.column.value(b));
        match state.direction {
            SortDir::Asc => va.cmp(&vb),
            SortDir::Desc => vb.cmp(&va),
        }
    });
}

/// Case-insensitive display-name search, capped at five matches.
pub fn search<'a>(entries: &'a [RankEntry], query: &str) -> Vec<&'a RankEntry> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    entries
        .iter()
        .filter(|entry| entry.user.name().to_lowercase().contains(&needle))
        .take(5)
        .collect()
}

fn rank_cell(rank: u32) -> String {
    match rank {
        1 => r#"<span class="rank-gold">#1</span>"#.to_string(),
        2 => r#"<span class="rank-silver">#2</span>"#.to_string(),
        3 => r#"<span class="rank-bronze">#3</span>"#.to_string(),
        r => format!("#{r}"),
    }
}

/// Avatar payload embedded as a data attribute, escaped for single-quoted
/// HTML attribute context.
fn avatar_payload(avatars: &[AvatarRef]) -> String {
    serde_json::to_string(avatars)
        .unwrap_or_else(|_| "[]".to_string())
        .replace('\'', "&#39;")
        .replace('"', "&quot;")
}

/// Render the full ranking table body.
pub fn render_table(entries: &[RankEntry]) -> String {
    if entries.is_empty() {
        return r#"<tr><td colspan="10" class="empty-state">No data available</td></tr>"#.to_string();
    }

    entries
        .iter()
        .map(|entry| {
            let name = escape_html(entry.user.name());
            let avatar = escape_html(entry.user.avatar_url.as_deref().unwrap_or(""));
            let profile_url = escape_html(entry.user.profile_url.as_deref().unwrap_or("#"));
            let twitter_url = escape_html(entry.user.twitter_url.as_deref().unwrap_or("#"));
            let missing_count = missing_interactions(entry, entries).len();
            let stats = &entry.stats;

            format!(
                r#"<tr>
    <td data-label="Rank">{rank_cell}</td>
    <td data-label="User" class="user-cell">
        <img src="{avatar}" alt="{name}" class="img-avatar">
        <span class="user-name">{name}</span>
    </td>
    <td data-label="Vouches Given" data-vouches-given-avatars='{vouches_given_avatars}'>{vouches_given}</td>
    <td data-label="Reviews Given" data-reviews-given-avatars='{reviews_given_avatars}'>{reviews_given}</td>
    <td data-label="Vouches Received" data-vouches-received-avatars='{vouches_received_avatars}'>{vouches_received}</td>
    <td data-label="Reviews Received" data-reviews-received-avatars='{reviews_received_avatars}'>{reviews_received}</td>
    <td data-label="Total Score">{total_score}</td>
    <td data-label="Ethos"><div class="action-buttons"><a href="{profile_url}" target="_blank" class="ethos-link">ETHOS</a></div></td>
    <td data-label="X Profile"><div class="action-buttons"><a href="{twitter_url}" target="_blank" class="twitter-link">X PROFILE</a></div></td>
    <td data-label="Review Me Please" class="review-me-please">
        <div class="action-buttons"><button class="btn-review-me" data-rank="{rank}">{missing_count} MISSING</button></div>
    </td>
</tr>"#,
                rank_cell = rank_cell(entry.rank),
                rank = entry.rank,
                vouches_given = stats.vouches_given,
                reviews_given = stats.reviews_given,
                vouches_received = stats.vouches_received,
                reviews_received = stats.reviews_received,
                total_score = stats.total_score,
                vouches_given_avatars = avatar_payload(&stats.vouches_given_avatars),
                reviews_given_avatars = avatar_payload(&stats.reviews_given_avatars),
                vouches_received_avatars = avatar_payload(&stats.vouches_received_avatars),
                reviews_received_avatars = avatar_payload(&stats.reviews_received_avatars),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RankStats, User};

    fn entry(rank: u32, name: &str, score: i64) -> RankEntry {
        RankEntry {
            rank,
            user: User {
                display_name: Some(name.to_string()),
                avatar_url: Some(format!("https://a/{rank}.png")),
                ..Default::default()
            },
            stats: RankStats {
                total_score: score,
                vouches_given: score / 10,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_toggle_same_column_flips_direction() {
        let state = SortState::default();
        assert_eq!(state.direction, SortDir::Asc);

        let state = state.toggle(SortKey::Rank);
        assert_eq!(state.column, SortKey::Rank);
        assert_eq!(state.direction, SortDir::Desc);

        let state = state.toggle(SortKey::Rank);
        assert_eq!(state.direction, SortDir::Asc);
    }

    #[test]
    fn test_toggle_new_column_uses_default_direction() {
        let state = SortState::default().toggle(SortKey::TotalScore);
        assert_eq!(state.column, SortKey::TotalScore);
        assert_eq!(state.direction, SortDir::Desc);

        let state = state.toggle(SortKey::Rank);
        assert_eq!(state.direction, SortDir::Asc);
    }

    #[test]
    fn test_sort_entries_by_score() {
        let mut entries = vec![entry(1, "a", 50), entry(2, "b", 90), entry(3, "c", 70)];
        sort_entries(
            &mut entries,
            SortState::new(SortKey::TotalScore, SortDir::Desc),
        );
        let scores: Vec<_> = entries.iter().map(|e| e.stats.total_score).collect();
        assert_eq!(scores, vec![90, 70, 50]);

        sort_entries(
            &mut entries,
            SortState::new(SortKey::TotalScore, SortDir::Asc),
        );
        let scores: Vec<_> = entries.iter().map(|e| e.stats.total_score).collect();
        assert_eq!(scores, vec![50, 70, 90]);
    }

    #[test]
    fn test_search_caps_at_five_case_insensitive() {
        let entries: Vec<_> = (1..=8).map(|i| entry(i, &format!("Chad {i}"), 0)).collect();
        let results = search(&entries, "chad");
        assert_eq!(results.len(), 5);

        let results = search(&entries, "CHAD 7");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].user.name(), "Chad 7");

        assert!(search(&entries, "").is_empty());
        assert!(search(&entries, "nobody").is_empty());
    }

    #[test]
    fn test_render_table_rows_and_badges() {
        let entries = vec![entry(1, "First", 100), entry(4, "Fourth", 10)];
        let html = render_table(&entries);
        assert!(html.contains(r#"<span class="rank-gold">#1</span>"#));
        assert!(html.contains("#4"));
        assert!(html.contains("First"));
        assert!(html.contains("MISSING"));
        assert_eq!(html.matches("<tr>").count(), 2);
    }

    #[test]
    fn test_render_table_empty() {
        assert!(render_table(&[]).contains("No data available"));
    }

    #[test]
    fn test_avatar_payload_is_attribute_safe() {
        let avatars = vec![AvatarRef {
            avatar: Some("https://a/it's.png".to_string()),
            ..Default::default()
        }];
        let payload = avatar_payload(&avatars);
        assert!(!payload.contains('"'));
        assert!(!payload.contains('\''));
        assert!(payload.contains("&quot;"));
        assert!(payload.contains("&#39;"));
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!(SortKey::parse("totalScore"), Some(SortKey::TotalScore));
        assert_eq!(SortKey::parse("rank"), Some(SortKey::Rank));
        assert_eq!(SortKey::parse("bogus"), None);
    }
}
