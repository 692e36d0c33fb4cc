//! Missing-interaction computation
//!
//! For a ranked user, the set of other ranked users they have neither
//! vouched for nor reviewed. Interaction targets are tracked by avatar URL,
//! which is how the ranking snapshot encodes the `*GivenAvatars` lists.

use std::collections::HashSet;

use crate::model::RankEntry;

/// Users the acting entry still has to vouch for or review.
///
/// Self is excluded by identity key (userkey, falling back to display
/// name); a user already present in either the vouched or the reviewed
/// avatar set is excluded too. Order follows the input ranking.
pub fn missing_interactions<'a>(current: &RankEntry, all: &'a [RankEntry]) -> Vec<&'a RankEntry> {
    let reviewed: HashSet<&str> = current
        .stats
        .reviews_given_avatars
        .iter()
        .filter_map(|a| a.avatar.as_deref())
        .collect();

    let vouched: HashSet<&str> = current
        .stats
        .vouches_given_avatars
        .iter()
        .filter_map(|a| a.avatar.as_deref())
        .collect();

    let current_id = current.user.identity();

    all.iter()
        .filter(|candidate| {
            if candidate.user.identity() == current_id {
                return false;
            }
            match candidate.user.avatar_url.as_deref() {
                Some(avatar) => !reviewed.contains(avatar) && !vouched.contains(avatar),
                // No avatar to match against: cannot have been counted
                None => true,
            }
        })
        .collect()
}
