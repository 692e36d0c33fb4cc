//! Text formatting helpers shared by the fragment renderers

use chrono::Utc;

/// Escape text for interpolation into HTML fragments.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// First word of a display name; empty names read as `"Unknown"`.
pub fn first_name(name: &str) -> &str {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return "Unknown";
    }
    trimmed.split(' ').next().unwrap_or(trimmed)
}

/// Relative-time label: `42s ago`, `7m ago`, `3h ago`, `2d ago`, `1mo ago`.
///
/// Future or zero timestamps clamp to `0s ago`.
pub fn format_time_ago(timestamp_ms: i64, now_ms: i64) -> String {
    let diff_secs = ((now_ms - timestamp_ms) / 1000).max(0);

    if diff_secs < 60 {
        format!("{diff_secs}s ago")
    } else if diff_secs < 3600 {
        format!("{}m ago", diff_secs / 60)
    } else if diff_secs < 86_400 {
        format!("{}h ago", diff_secs / 3600)
    } else if diff_secs < 2_592_000 {
        format!("{}d ago", diff_secs / 86_400)
    } else {
        format!("{}mo ago", diff_secs / 2_592_000)
    }
}

/// Current epoch milliseconds.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// The recap page's date line, e.g. `Friday, August 7, 2026`.
pub fn current_date_line() -> String {
    let now = Utc::now();
    // %-d would be nicer but is platform-dependent; trim the zero manually
    let day = now.format("%d").to_string();
    let day = day.trim_start_matches('0');
    format!("{}, {} {}, {}", now.format("%A"), now.format("%B"), day, now.format("%Y"))
}

/// Placeholder avatar URL showing the first letter of a name.
pub fn placeholder_avatar(name: &str) -> String {
    let initial = name
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_else(|| "?".to_string());
    format!("https://via.placeholder.com/40/cccccc/666666?text={initial}")
}

/// Avatar source fallback chain for a user without a resolvable avatar:
/// unavatar lookups by handle, then any explicit URL, then a generated
/// initial avatar.
pub fn avatar_sources(username: &str, display_name: &str, explicit: Option<&str>) -> Vec<String> {
    let mut sources = vec![
        format!("https://unavatar.io/x/{username}"),
        format!("https://unavatar.io/twitter/{username}"),
    ];
    if let Some(url) = explicit {
        if !url.is_empty() {
            sources.push(url.to_string());
        }
    }
    sources.push(format!(
        "https://ui-avatars.com/api/?name={}&background=667eea&color=fff&size=40",
        urlencoding::encode(display_name)
    ));
    sources
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"A & B's"</b>"#),
            "&lt;b&gt;&quot;A &amp; B&#39;s&quot;&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_first_name() {
        assert_eq!(first_name("Alice Wonder"), "Alice");
        assert_eq!(first_name("Bob"), "Bob");
        assert_eq!(first_name(""), "Unknown");
        assert_eq!(first_name("   "), "Unknown");
    }

    #[test]
    fn test_format_time_ago_buckets() {
        let now = 1_700_000_000_000;
        assert_eq!(format_time_ago(now - 42_000, now), "42s ago");
        assert_eq!(format_time_ago(now - 7 * 60_000, now), "7m ago");
        assert_eq!(format_time_ago(now - 3 * 3_600_000, now), "3h ago");
        assert_eq!(format_time_ago(now - 2 * 86_400_000, now), "2d ago");
        assert_eq!(format_time_ago(now - 40 * 86_400_000, now), "1mo ago");
    }

    #[test]
    fn test_format_time_ago_clamps_future() {
        let now = 1_700_000_000_000;
        assert_eq!(format_time_ago(now + 60_000, now), "0s ago");
    }

    #[test]
    fn test_placeholder_avatar_uses_initial() {
        assert_eq!(
            placeholder_avatar("chad"),
            "https://via.placeholder.com/40/cccccc/666666?text=C"
        );
    }

    #[test]
    fn test_avatar_sources_chain() {
        let sources = avatar_sources("chad", "Chad T", Some("https://a/x.png"));
        assert_eq!(sources.len(), 4);
        assert_eq!(sources[0], "https://unavatar.io/x/chad");
        assert_eq!(sources[2], "https://a/x.png");
        assert!(sources[3].contains("Chad%20T"));
    }
}
