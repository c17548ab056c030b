use chrono::{DateTime, SecondsFormat, Utc};
use url::Url;
use url::form_urlencoded;

use crate::filter::{ALL_CITIES, ALL_COUNTRIES, ALL_STATES, ALL_TITLES, FilterSelection};

/// Query parameters for the listing endpoint.
///
/// Built fresh on every recomputation and never mutated afterwards by
/// callers; preserves insertion order so serialized queries are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a parameter (last write wins).
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Key/value pairs in insertion order, as expected by
    /// `reqwest::RequestBuilder::query`.
    pub fn as_pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Percent-encoded query string (no leading `?`).
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}

/// Translate the search box and filter panel into listing-endpoint
/// parameters.
///
/// Each rule is applied independently; a field at its sentinel value is
/// omitted entirely:
///
/// - `keyword`: the trimmed free-text keyword, when non-empty.
/// - `country`/`state`/`city`: verbatim when non-sentinel. `state` is a
///   pass-through; the endpoint may not consume it.
/// - title-category: folded into `keyword`, **replacing** any free-text
///   keyword (last write wins — the category acts as a keyword synonym).
/// - date-window: resolved against `now` to a `datePosted` cutoff,
///   serialized as an ISO-8601 instant meaning "posted at or after".
pub fn build_query(keyword: &str, selection: &FilterSelection, now: DateTime<Utc>) -> QueryParams {
    let mut params = QueryParams::new();

    let keyword = keyword.trim();
    if !keyword.is_empty() {
        params.set("keyword", keyword);
    }

    if selection.country != ALL_COUNTRIES {
        params.set("country", selection.country.as_str());
    }
    if selection.state != ALL_STATES {
        params.set("state", selection.state.as_str());
    }
    if selection.city != ALL_CITIES {
        params.set("city", selection.city.as_str());
    }

    if selection.title != ALL_TITLES {
        params.set("keyword", selection.title.as_str());
    }

    if let Some(cutoff) = selection.date.cutoff_from(now) {
        params.set(
            "datePosted",
            cutoff.to_rfc3339_opts(SecondsFormat::Secs, true),
        );
    }

    params
}

/// Seed the search keyword from a listing-page URL, e.g.
/// `https://board.example/jobs?keyword=developer`.
pub fn keyword_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .query_pairs()
        .find(|(k, _)| k == "keyword")
        .map(|(_, v)| v.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::DateWindow;

    fn now() -> DateTime<Utc> {
        "2025-01-25T00:00:00Z".parse().unwrap()
    }

    #[test]
    fn unconstrained_selection_yields_empty_map() {
        let params = build_query("", &FilterSelection::default(), now());
        assert!(params.is_empty());

        let params = build_query("   ", &FilterSelection::default(), now());
        assert!(params.is_empty(), "whitespace-only keyword is omitted");
    }

    #[test]
    fn keyword_is_trimmed() {
        let params = build_query("  developer  ", &FilterSelection::default(), now());
        assert_eq!(params.get("keyword"), Some("developer"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn non_sentinel_country_is_emitted_verbatim() {
        let selection = FilterSelection::default()
            .set_field("country", "Nigeria")
            .unwrap();
        let params = build_query("", &selection, now());
        assert_eq!(params.get("country"), Some("Nigeria"));
    }

    #[test]
    fn sentinels_never_appear_as_parameters() {
        let params = build_query("rust", &FilterSelection::default(), now());
        assert_eq!(params.get("country"), None);
        assert_eq!(params.get("state"), None);
        assert_eq!(params.get("city"), None);
        assert_eq!(params.get("datePosted"), None);
        for (_, v) in params.as_pairs() {
            assert!(!v.starts_with("all-"));
        }
    }

    #[test]
    fn state_is_passed_through() {
        let selection = FilterSelection::default()
            .set_field("state", "Lagos")
            .unwrap();
        let params = build_query("", &selection, now());
        assert_eq!(params.get("state"), Some("Lagos"));
    }

    #[test]
    fn category_overrides_keyword() {
        // Last-write-wins: the category replaces the free-text keyword
        // whenever both are set.
        let selection = FilterSelection::default()
            .set_field("title", "designer")
            .unwrap();

        let params = build_query("developer", &selection, now());
        assert_eq!(params.get("keyword"), Some("designer"));

        // Category alone still produces the keyword parameter.
        let params = build_query("", &selection, now());
        assert_eq!(params.get("keyword"), Some("designer"));
    }

    #[test]
    fn date_windows_resolve_to_absolute_cutoffs() {
        for (window, expected) in [
            ("last-24-hours", "2025-01-24T00:00:00Z"),
            ("last-7-days", "2025-01-18T00:00:00Z"),
            ("last-30-days", "2024-12-26T00:00:00Z"),
        ] {
            let selection = FilterSelection::default().set_field("date", window).unwrap();
            let params = build_query("", &selection, now());
            assert_eq!(params.get("datePosted"), Some(expected), "window {window}");
        }

        let selection = FilterSelection {
            date: DateWindow::AnyTime,
            ..FilterSelection::default()
        };
        assert_eq!(build_query("", &selection, now()).get("datePosted"), None);
    }

    #[test]
    fn country_and_keyword_end_to_end() {
        let selection = FilterSelection::default()
            .set_field("country", "Nigeria")
            .unwrap()
            .set_field("city", ALL_CITIES)
            .unwrap();

        let params = build_query("developer", &selection, now());
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("keyword"), Some("developer"));
        assert_eq!(params.get("country"), Some("Nigeria"));
    }

    #[test]
    fn set_replaces_in_place() {
        let mut params = QueryParams::new();
        params.set("keyword", "a");
        params.set("country", "Kenya");
        params.set("keyword", "b");
        assert_eq!(params.get("keyword"), Some("b"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn query_string_is_percent_encoded() {
        let selection = FilterSelection::default()
            .set_field("city", "New York")
            .unwrap();
        let params = build_query("", &selection, now());
        assert_eq!(params.to_query_string(), "city=New+York");
    }

    #[test]
    fn keyword_seeding_from_url() {
        assert_eq!(
            keyword_from_url("https://board.example/jobs?keyword=developer"),
            Some("developer".to_string())
        );
        assert_eq!(
            keyword_from_url("https://board.example/jobs?keyword=data%20engineer"),
            Some("data engineer".to_string())
        );
        assert_eq!(keyword_from_url("https://board.example/jobs"), None);
        assert_eq!(keyword_from_url("not a url"), None);
    }
}
