//! Terminal rendering of listings, moderation queues, and user tables.
//!
//! Transport failures and empty results are rendered differently on
//! purpose: an unreachable board gets an error banner, a valid search
//! with no matches gets a neutral message.

use jobdeck_core::error::AppError;
use jobdeck_core::listing::{Listing, UserAccount};
use jobdeck_core::search::SearchPhase;

const DESCRIPTION_WIDTH: usize = 120;

/// One summary card per listing.
pub fn listing_cards(listings: &[Listing]) -> String {
    let mut out = String::new();
    for listing in listings {
        out.push_str(&format!(
            "{} — {}\n  {}, {} | {} | Posted on {}\n  {}\n  {}\n  Apply: {}\n\n",
            listing.title,
            listing.company_name,
            listing.city,
            listing.country,
            listing.employment_type,
            listing.date_posted,
            truncate(&listing.description, DESCRIPTION_WIDTH),
            listing.salary_range,
            listing.apply_link,
        ));
    }
    out.push_str(&format!("Total: {} listings", listings.len()));
    out
}

pub fn empty_state() -> &'static str {
    "No jobs found."
}

pub fn loading_line() -> &'static str {
    "Loading jobs..."
}

/// Error banner for a failed fetch, distinct from the empty state.
pub fn error_banner(message: &str, retryable: bool) -> String {
    let mut banner = format!("!! Could not load jobs: {message}");
    if retryable {
        banner.push_str("\n   This looks transient — re-run the search to retry.");
    }
    banner
}

/// Render a search outcome: loading, empty, error, or cards.
pub fn search_phase(phase: &SearchPhase) -> String {
    match phase {
        SearchPhase::Idle => String::new(),
        SearchPhase::Loading => loading_line().to_string(),
        SearchPhase::Ready(listings) if listings.is_empty() => empty_state().to_string(),
        SearchPhase::Ready(listings) => listing_cards(listings),
        SearchPhase::Failed { message, retryable } => error_banner(message, *retryable),
    }
}

/// Compact status-tagged rows for moderation and employer views.
pub fn listing_rows(listings: &[Listing]) -> String {
    if listings.is_empty() {
        return "No listings.".to_string();
    }
    let mut out = String::new();
    for listing in listings {
        out.push_str(&format!(
            "  [{}] {} — {} — {}, {} (id: {})\n",
            listing.status,
            listing.title,
            listing.company_name,
            listing.city,
            listing.country,
            listing.id,
        ));
    }
    out.push_str(&format!("Total: {} listings", listings.len()));
    out
}

/// User table for the admin view.
pub fn user_rows(users: &[UserAccount]) -> String {
    if users.is_empty() {
        return "No users found.".to_string();
    }
    let mut out = String::new();
    for user in users {
        out.push_str(&format!(
            "  [{}] {} <{}> — role: {} (id: {})\n",
            user.status, user.name, user.email, user.role, user.id,
        ));
    }
    out.push_str(&format!("Total: {} users", users.len()));
    out
}

/// CSV export of search results for scripting.
pub fn listings_csv(listings: &[Listing]) -> Result<String, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for listing in listings {
        writer
            .serialize(listing)
            .map_err(|e| AppError::Generic(format!("CSV encoding failed: {e}")))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Generic(format!("CSV encoding failed: {e}")))?;
    String::from_utf8(bytes).map_err(|e| AppError::Generic(format!("CSV is not UTF-8: {e}")))
}

/// Cut a description down to one card line, on a character boundary.
fn truncate(text: &str, max_chars: usize) -> String {
    let mut truncated: String = text.chars().take(max_chars).collect();
    if truncated.len() < text.len() {
        truncated.push('…');
    }
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobdeck_core::testutil::make_test_listing;

    #[test]
    fn cards_show_every_summary_field() {
        let out = listing_cards(&[make_test_listing("7")]);
        assert!(out.contains("Backend Developer — Acme"));
        assert!(out.contains("Lagos, Nigeria"));
        assert!(out.contains("Full-Time"));
        assert!(out.contains("Posted on 2025-01-20"));
        assert!(out.contains("$150000 - $200000"));
        assert!(out.contains("Apply: https://example.com/apply"));
        assert!(out.contains("Total: 1 listings"));
    }

    #[test]
    fn long_descriptions_are_truncated() {
        let mut listing = make_test_listing("7");
        listing.description = "x".repeat(500);
        let out = listing_cards(&[listing]);
        assert!(out.contains(&format!("{}…", "x".repeat(120))));
        assert!(!out.contains(&"x".repeat(121)));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo wörld", 5), "héllo…");
        assert_eq!(truncate("short", 120), "short");
    }

    #[test]
    fn empty_result_renders_empty_state_not_cards() {
        let rendered = search_phase(&SearchPhase::Ready(vec![]));
        assert_eq!(rendered, "No jobs found.");
        assert_ne!(rendered, loading_line());
    }

    #[test]
    fn failure_renders_banner_not_empty_state() {
        let rendered = search_phase(&SearchPhase::Failed {
            message: "Network error: refused".into(),
            retryable: true,
        });
        assert!(rendered.contains("Could not load jobs"));
        assert!(rendered.contains("refused"));
        assert!(rendered.contains("re-run the search"));
        assert!(!rendered.contains(empty_state()));
    }

    #[test]
    fn non_retryable_failure_has_no_retry_hint() {
        let rendered = search_phase(&SearchPhase::Failed {
            message: "API error (HTTP 400): bad request".into(),
            retryable: false,
        });
        assert!(!rendered.contains("re-run the search"));
    }

    #[test]
    fn csv_export_has_wire_headers() {
        let csv = listings_csv(&[make_test_listing("7")]).unwrap();
        let mut lines = csv.lines();
        let header = lines.next().unwrap();
        assert!(header.contains("applyLink"));
        assert!(header.contains("salaryRange"));
        let row = lines.next().unwrap();
        assert!(row.contains("Backend Developer"));
        assert!(row.contains("APPROVED"));
    }

    #[test]
    fn rows_include_status_tag() {
        let out = listing_rows(&[make_test_listing("7")]);
        assert!(out.contains("[APPROVED]"));
        assert!(out.contains("(id: 7)"));
        assert_eq!(listing_rows(&[]), "No listings.");
    }
}
