//! Recap section fragments
//!
//! Markup mirrors the legacy daily-recap page: same class names, same
//! placeholder strings, same click-through URLs, so existing stylesheets
//! keep working against the served fragments.

use crate::model::{Activity, ActivityKind, InvitationsSnapshot, RankEntry, RankGain, RosterMember};

use super::format::{escape_html, first_name, format_time_ago};

/// Profile/activity link base.
const APP_BASE: &str = "https://app.ethos.network";

/// A roster member joined with their API-sourced creation time.
#[derive(Debug, Clone)]
pub struct NewGigachad {
    pub member: RosterMember,
    pub created_at_ms: i64,
}

fn empty_state(message: &str) -> String {
    format!(r#"<div class="empty-state">{message}</div>"#)
}

/// Click-through target for an activity: the activity page when an id is
/// known, otherwise the subject's profile.
fn activity_url(activity: &Activity) -> String {
    match activity.id {
        Some(id) => format!("{APP_BASE}/activity/{}/{id}", activity.kind.as_str()),
        None => {
            let handle = activity
                .subject
                .username
                .as_deref()
                .unwrap_or(&activity.subject.name);
            format!("{APP_BASE}/profile/x/{handle}")
        }
    }
}

fn activity_row(activity: &Activity, badge: &str, now_ms: i64) -> String {
    let author = escape_html(first_name(&activity.author.name));
    let subject = escape_html(first_name(&activity.subject.name));
    let author_avatar = escape_html(&activity.author.avatar_url);
    let subject_avatar = escape_html(&activity.subject.avatar_url);
    let time_ago = format_time_ago(activity.timestamp_ms, now_ms);
    let url = escape_html(&activity_url(activity));
    let kind = activity.kind.as_str();
    let verb = activity.kind.verb();
    let action = match activity.kind {
        ActivityKind::Vouch => "vouched",
        ActivityKind::Review => "reviewed",
    };

    format!(
        r#"<div class="activity-item clickable" data-type="{kind}" data-url="{url}">
    <div class="activity-avatars">
        <img src="{author_avatar}" alt="{author}" class="avatar">
        <span class="activity-arrow"></span>
        <img src="{subject_avatar}" alt="{subject}" class="avatar">
    </div>
    <div class="activity-content">
        <div class="activity-header">
            <div class="activity-main">
                <strong class="author">{author}</strong>
                <span class="action" data-action="{action}">{verb}</span>
                <strong class="subject">{subject}</strong>
            </div>
            <div class="activity-time-container">
                <div class="activity-time">{time_ago}</div>
                {badge}
            </div>
        </div>
    </div>
</div>"#
    )
}

/// The five most recent vouches, with stake amounts in ETH.
pub fn render_vouches(vouches: &[Activity], limit: usize, now_ms: i64) -> String {
    if vouches.is_empty() {
        return empty_state("No recent vouches");
    }

    vouches
        .iter()
        .take(limit)
        .map(|vouch| {
            let stake = vouch.stake_eth.as_deref().unwrap_or("0.000");
            let badge = format!(r#"<div class="review-type-inline vouch-amount">{stake} ETH</div>"#);
            activity_row(vouch, &badge, now_ms)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The five most recent reviews, with sentiment badges.
pub fn render_reviews(reviews: &[Activity], limit: usize, now_ms: i64) -> String {
    if reviews.is_empty() {
        return empty_state("No recent reviews");
    }

    reviews
        .iter()
        .take(limit)
        .map(|review| {
            let badge = format!(
                r#"<div class="review-type-inline {}">{}</div>"#,
                review.score.css_class(),
                review.score.label()
            );
            activity_row(review, &badge, now_ms)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn rank_badge_class(rank: u32) -> &'static str {
    match rank {
        1 => "gold",
        2 => "silver",
        3 => "bronze",
        4 => "rank-4",
        5 => "rank-5",
        _ => "default",
    }
}

/// Top-5 leaderboard rows.
pub fn render_leaderboard(entries: &[RankEntry], limit: usize) -> String {
    if entries.is_empty() {
        return empty_state("No leaderboard data available");
    }

    entries
        .iter()
        .take(limit)
        .map(|entry| {
            let name = escape_html(entry.user.name());
            let avatar = escape_html(
                entry
                    .user
                    .avatar_url
                    .as_deref()
                    .unwrap_or("https://via.placeholder.com/35"),
            );
            let badge = rank_badge_class(entry.rank);
            let score = entry.stats.total_score;

            format!(
                r#"<div class="leaderboard-item {badge}">
    <div class="rank">#{rank}</div>
    <img src="{avatar}" alt="{name}" class="avatar">
    <div class="user-info">
        <div class="user-name" title="{name}">{name}</div>
        <div class="user-score">{score} points</div>
    </div>
</div>"#,
                rank = entry.rank,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Newest roster members, by profile creation time.
pub fn render_new_gigachads(members: &[NewGigachad], limit: usize, now_ms: i64) -> String {
    if members.is_empty() {
        return empty_state("No Gigachads data available");
    }

    members
        .iter()
        .take(limit)
        .map(|new| {
            let name = escape_html(new.member.name());
            let avatar = escape_html(
                new.member
                    .avatar_url
                    .as_deref()
                    .unwrap_or("https://via.placeholder.com/35"),
            );
            let handle = new.member.username.as_deref().unwrap_or_else(|| new.member.name());
            let profile_url = escape_html(&format!("{APP_BASE}/profile/x/{handle}"));
            let age = format_time_ago(new.created_at_ms, now_ms);

            format!(
                r#"<div class="leaderboard-item clickable" data-url="{profile_url}">
    <div class="rank">🔥</div>
    <img src="{avatar}" alt="{name}" class="avatar">
    <div class="user-info">
        <div class="user-name">{name}</div>
        <div class="user-score">{age}</div>
    </div>
</div>"#
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Today's top point gainers.
pub fn render_rank_changes(gains: &[RankGain], limit: usize) -> String {
    if gains.is_empty() {
        return empty_state("No points gained today");
    }

    gains
        .iter()
        .take(limit)
        .enumerate()
        .map(|(index, gain)| {
            let name = escape_html(gain.display_name.as_deref().unwrap_or("Unknown"));
            let avatar = escape_html(
                gain.avatar_url
                    .as_deref()
                    .unwrap_or("https://via.placeholder.com/35"),
            );
            let points = gain.points.unwrap_or(0);
            let icon = match index {
                0 => "🚀",
                1 => "⬆️",
                _ => "📈",
            };

            format!(
                r#"<div class="leaderboard-item">
    <div class="rank">{icon}</div>
    <img src="{avatar}" alt="{name}" class="avatar">
    <div class="user-info">
        <div class="user-name">{name}</div>
        <div class="user-score">+{points} pts today</div>
    </div>
</div>"#
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Members holding unused invitations.
pub fn render_invitations(snapshot: &InvitationsSnapshot) -> String {
    if snapshot.data.is_empty() {
        return empty_state("No invitation data available");
    }

    snapshot
        .data
        .iter()
        .map(|entry| {
            let name = escape_html(entry.display_name.as_deref().unwrap_or("Unknown"));
            let avatar = escape_html(
                entry
                    .avatar_url
                    .as_deref()
                    .unwrap_or("https://via.placeholder.com/35"),
            );
            let invite_text = escape_html(entry.invite_text.as_deref().unwrap_or(""));
            let url = escape_html(entry.x_url.as_deref().unwrap_or("#"));

            format!(
                r#"<div class="leaderboard-item clickable" data-url="{url}">
    <div class="rank">🎫</div>
    <img src="{avatar}" alt="{name}" class="avatar">
    <div class="user-info">
        <div class="user-name">{name}</div>
        <div class="user-score">{invite_text}</div>
    </div>
</div>"#
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Roster members that still have no profile id, as table rows with the
/// avatar fallback chain embedded for the client to walk on error.
pub fn render_missing_ids(users: &[RosterMember]) -> String {
    if users.is_empty() {
        return r#"<div class="empty-state"><p>✅ All Gigachads have profile IDs!</p></div>"#
            .to_string();
    }

    let rows = users
        .iter()
        .map(|user| {
            let name = escape_html(user.name());
            let handle = user.username.as_deref().unwrap_or("no-username");
            let explicit = user.avatar_url.as_deref().or(user.avatar.as_deref());
            let sources = super::format::avatar_sources(handle, user.name(), explicit);
            let sources_attr = serde_json::to_string(&sources)
                .unwrap_or_else(|_| "[]".to_string())
                .replace('\'', "&#39;")
                .replace('"', "&quot;");
            let first = escape_html(sources.first().map(String::as_str).unwrap_or(""));
            let x_url = escape_html(&format!("https://x.com/{handle}"));

            format!(
                r#"<tr>
    <td class="simple-user-cell">
        <div class="simple-user-profile">
            <img src="{first}" alt="{name}" class="simple-user-avatar" data-sources='{sources_attr}'>
            <div class="simple-user-info"><div class="simple-user-name">{name}</div></div>
        </div>
    </td>
    <td class="simple-action-cell">
        <a href="{x_url}" target="_blank" rel="noopener noreferrer" class="simple-x-profile-link">X Profile</a>
    </td>
</tr>"#
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<div class="simple-missing-alert"><strong>⚠️ Found {count} users without profile ID</strong></div>
<table class="simple-missing-table">
    <thead><tr><th>User</th><th>X Profile</th></tr></thead>
    <tbody>
{rows}
    </tbody>
</table>"#,
        count = users.len(),
    )
}

/// The "should review these" list shown for a ranked user.
pub fn render_missing_list(current: &RankEntry, missing: &[&RankEntry]) -> String {
    let name = escape_html(current.user.name());

    if missing.is_empty() {
        return format!(
            r#"<div class="no-missing-reviews"><p>🎉 {name} has reviewed all Gigachads!</p></div>"#
        );
    }

    let rows = missing
        .iter()
        .map(|entry| {
            let missing_name = escape_html(entry.user.name());
            let avatar = escape_html(entry.user.avatar_url.as_deref().unwrap_or(""));
            let profile_url = escape_html(entry.user.profile_url.as_deref().unwrap_or("#"));

            format!(
                r#"<div class="missing-review-item">
    <img src="{avatar}" alt="{missing_name}" class="avatar-small">
    <div class="user-info">
        <span class="user-name">{missing_name}</span>
        <span class="user-rank">Rank #{rank}</span>
    </div>
    <div class="user-actions">
        <a href="{profile_url}" target="_blank" class="btn-ethos">📝 Review on Ethos</a>
    </div>
</div>"#,
                rank = entry.rank,
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<div class="missing-reviews-header"><p>Missing reviews: <strong>{count}</strong> Gigachads</p></div>
<div class="missing-reviews-list">
{rows}
</div>"#,
        count = missing.len(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Party, RankStats, Sentiment, User};

    const NOW_MS: i64 = 1_700_000_000_000;

    fn party(name: &str, profile_id: u64) -> Party {
        Party {
            profile_id: Some(profile_id),
            userkey: None,
            name: name.to_string(),
            username: Some(name.to_lowercase()),
            avatar_url: format!("https://a/{profile_id}.png"),
        }
    }

    fn vouch(author: &str, subject: &str, stake: &str) -> Activity {
        Activity {
            kind: ActivityKind::Vouch,
            author: party(author, 1),
            subject: party(subject, 2),
            timestamp_ms: NOW_MS - 60_000,
            id: Some(9),
            score: Sentiment::Neutral,
            stake_eth: Some(stake.to_string()),
        }
    }

    #[test]
    fn test_empty_vouches_placeholder() {
        assert_eq!(
            render_vouches(&[], 5, NOW_MS),
            r#"<div class="empty-state">No recent vouches</div>"#
        );
    }

    #[test]
    fn test_vouch_row_contains_stake_and_names() {
        let html = render_vouches(&[vouch("Alice Wonder", "Bob", "1.000")], 5, NOW_MS);
        assert!(html.contains("1.000 ETH"));
        assert!(html.contains(r#"<strong class="author">Alice</strong>"#));
        assert!(html.contains(r#"<strong class="subject">Bob</strong>"#));
        assert!(html.contains("1m ago"));
        assert!(html.contains("/activity/vouch/9"));
    }

    #[test]
    fn test_vouches_truncate_to_limit() {
        let vouches: Vec<_> = (0..8).map(|_| vouch("A", "B", "0.100")).collect();
        let html = render_vouches(&vouches, 5, NOW_MS);
        assert_eq!(html.matches("activity-item").count(), 5);
    }

    #[test]
    fn test_review_sentiment_badge() {
        let mut review = vouch("Alice", "Bob", "0");
        review.kind = ActivityKind::Review;
        review.stake_eth = None;
        review.score = Sentiment::Negative;

        let html = render_reviews(&[review], 5, NOW_MS);
        assert!(html.contains(r#"review-type-inline negative"#));
        assert!(html.contains("Negative"));
        assert!(html.contains("/activity/review/9"));
    }

    #[test]
    fn test_names_are_escaped() {
        let html = render_vouches(&[vouch("<script>", "Bob", "0.100")], 5, NOW_MS);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    fn rank_entry(rank: u32, name: &str, score: i64) -> RankEntry {
        RankEntry {
            rank,
            user: User {
                display_name: Some(name.to_string()),
                avatar_url: Some(format!("https://a/{rank}.png")),
                ..Default::default()
            },
            stats: RankStats {
                total_score: score,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_leaderboard_badges_and_limit() {
        let entries: Vec<_> = (1..=7).map(|i| rank_entry(i, "user", 100 - i as i64)).collect();
        let html = render_leaderboard(&entries, 5);
        assert!(html.contains("leaderboard-item gold"));
        assert!(html.contains("leaderboard-item silver"));
        assert!(html.contains("leaderboard-item bronze"));
        assert!(html.contains("leaderboard-item rank-5"));
        assert!(!html.contains("leaderboard-item default"));
        assert!(html.contains("99 points"));
    }

    #[test]
    fn test_empty_leaderboard_placeholder() {
        assert!(render_leaderboard(&[], 5).contains("No leaderboard data available"));
    }

    #[test]
    fn test_rank_changes_icons() {
        let gains: Vec<RankGain> = (0..3)
            .map(|i| RankGain {
                display_name: Some(format!("user-{i}")),
                avatar_url: None,
                points: Some(10 - i),
            })
            .collect();
        let html = render_rank_changes(&gains, 5);
        assert!(html.contains("🚀"));
        assert!(html.contains("⬆️"));
        assert!(html.contains("📈"));
        assert!(html.contains("+10 pts today"));
    }

    #[test]
    fn test_missing_list_complete_user() {
        let chad = rank_entry(1, "Chad", 100);
        let html = render_missing_list(&chad, &[]);
        assert!(html.contains("has reviewed all Gigachads"));
    }

    #[test]
    fn test_missing_ids_fragment() {
        let users = vec![RosterMember {
            username: Some("lost".to_string()),
            display_name: Some("Lost User".to_string()),
            ..Default::default()
        }];
        let html = render_missing_ids(&users);
        assert!(html.contains("Found 1 users without profile ID"));
        assert!(html.contains("unavatar.io/x/lost"));
        assert!(html.contains("https://x.com/lost"));

        let html = render_missing_ids(&[]);
        assert!(html.contains("All Gigachads have profile IDs"));
    }

    #[test]
    fn test_missing_list_rows() {
        let chad = rank_entry(1, "Chad", 100);
        let other = rank_entry(4, "Dave", 50);
        let html = render_missing_list(&chad, &[&other]);
        assert!(html.contains("Missing reviews: <strong>1</strong>"));
        assert!(html.contains("Rank #4"));
        assert!(html.contains("Dave"));
    }
}
