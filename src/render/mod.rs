//! HTML fragment rendering

pub mod format;
pub mod sections;
pub mod table;

pub use format::{current_date_line, escape_html, format_time_ago, now_ms};
pub use sections::{
    render_invitations, render_leaderboard, render_missing_ids, render_missing_list,
    render_new_gigachads, render_rank_changes, render_reviews, render_vouches, NewGigachad,
};
pub use table::{render_table, search, sort_entries, SortDir, SortKey, SortState};
