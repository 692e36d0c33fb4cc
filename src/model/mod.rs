//! Data model: ranked users, activities, snapshot documents

pub mod activity;
pub mod snapshot;
pub mod user;

pub use activity::{
    format_eth_amount, Activity, ActivityKind, Party, RawActivity, Sentiment, PLACEHOLDER_AVATAR,
};
pub use snapshot::{
    ActivitiesSnapshot, ActivityFeeds, InvitationEntry, InvitationsSnapshot, ProfileActivitiesRequest,
    ProfileActivitiesResponse, ProfileRecord, ProfilesEnvelope, ProfilesRequest, RankChangesSnapshot,
    RankGain, RankingSnapshot, RosterMember, RosterSnapshot,
};
pub use user::{AvatarRef, RankEntry, RankStats, User};
