use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Sentinel meaning "no country constraint".
pub const ALL_COUNTRIES: &str = "all-countries";
/// Sentinel meaning "no state/region constraint".
pub const ALL_STATES: &str = "all-states";
/// Sentinel meaning "no city constraint".
pub const ALL_CITIES: &str = "all-cities";
/// Sentinel meaning "no title-category constraint".
pub const ALL_TITLES: &str = "all-titles";

/// Relative posting-date constraint, resolved to an absolute cutoff at
/// query-build time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateWindow {
    #[default]
    #[serde(rename = "any-time")]
    AnyTime,
    #[serde(rename = "last-24-hours")]
    Last24Hours,
    #[serde(rename = "last-7-days")]
    Last7Days,
    #[serde(rename = "last-30-days")]
    Last30Days,
}

impl DateWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateWindow::AnyTime => "any-time",
            DateWindow::Last24Hours => "last-24-hours",
            DateWindow::Last7Days => "last-7-days",
            DateWindow::Last30Days => "last-30-days",
        }
    }

    /// Resolve the window to an absolute "posted at or after" cutoff.
    ///
    /// `AnyTime` is the sentinel and yields no cutoff.
    pub fn cutoff_from(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let delta = match self {
            DateWindow::AnyTime => return None,
            DateWindow::Last24Hours => TimeDelta::hours(24),
            DateWindow::Last7Days => TimeDelta::days(7),
            DateWindow::Last30Days => TimeDelta::days(30),
        };
        Some(now - delta)
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DateWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any-time" => Ok(DateWindow::AnyTime),
            "last-24-hours" => Ok(DateWindow::Last24Hours),
            "last-7-days" => Ok(DateWindow::Last7Days),
            "last-30-days" => Ok(DateWindow::Last30Days),
            _ => Err(format!("Unknown date window: {}", s)),
        }
    }
}

/// The current filter selection on the search page.
///
/// An immutable value: [`set_field`](Self::set_field) returns a new
/// selection with one field replaced, leaving the receiver untouched.
/// Every field defaults to its sentinel ("no constraint"); the empty
/// string is never used to mean "unset".
///
/// String field values are accepted verbatim without validation —
/// sentinel interpretation happens downstream in the query builder. The
/// one exception is `date`, whose value must name a known window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub country: String,
    pub state: String,
    pub city: String,
    /// Title-category, folded into the keyword at query-build time.
    pub title: String,
    pub date: DateWindow,
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self {
            country: ALL_COUNTRIES.to_string(),
            state: ALL_STATES.to_string(),
            city: ALL_CITIES.to_string(),
            title: ALL_TITLES.to_string(),
            date: DateWindow::AnyTime,
        }
    }
}

impl FilterSelection {
    /// Replace a single field by name, returning the updated selection.
    ///
    /// Field names match the search form controls: `country`, `state`,
    /// `city`, `title`, `date`.
    pub fn set_field(&self, field: &str, value: &str) -> Result<FilterSelection, AppError> {
        let mut next = self.clone();
        match field {
            "country" => next.country = value.to_string(),
            "state" => next.state = value.to_string(),
            "city" => next.city = value.to_string(),
            "title" => next.title = value.to_string(),
            "date" => {
                next.date = value.parse().map_err(AppError::ConfigError)?;
            }
            other => {
                return Err(AppError::ConfigError(format!(
                    "Unknown filter field: {}",
                    other
                )));
            }
        }
        Ok(next)
    }

    /// True when every field is at its sentinel value.
    pub fn is_unconstrained(&self) -> bool {
        self.country == ALL_COUNTRIES
            && self.state == ALL_STATES
            && self.city == ALL_CITIES
            && self.title == ALL_TITLES
            && self.date == DateWindow::AnyTime
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_all_sentinels() {
        let selection = FilterSelection::default();
        assert_eq!(selection.country, ALL_COUNTRIES);
        assert_eq!(selection.state, ALL_STATES);
        assert_eq!(selection.city, ALL_CITIES);
        assert_eq!(selection.title, ALL_TITLES);
        assert_eq!(selection.date, DateWindow::AnyTime);
        assert!(selection.is_unconstrained());
    }

    #[test]
    fn set_field_replaces_one_field_only() {
        let base = FilterSelection::default();
        let updated = base.set_field("country", "Nigeria").unwrap();

        assert_eq!(updated.country, "Nigeria");
        assert_eq!(updated.city, ALL_CITIES);
        assert_eq!(updated.title, ALL_TITLES);
        // The original value is untouched.
        assert_eq!(base.country, ALL_COUNTRIES);
    }

    #[test]
    fn set_field_accepts_any_string_value() {
        let selection = FilterSelection::default()
            .set_field("city", "  definitely not a city  ")
            .unwrap();
        assert_eq!(selection.city, "  definitely not a city  ");
    }

    #[test]
    fn set_field_rejects_unknown_field() {
        let err = FilterSelection::default()
            .set_field("salary", "100k")
            .unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn set_field_parses_date_window() {
        let selection = FilterSelection::default()
            .set_field("date", "last-7-days")
            .unwrap();
        assert_eq!(selection.date, DateWindow::Last7Days);

        let err = FilterSelection::default()
            .set_field("date", "yesterday")
            .unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn date_window_roundtrip() {
        for window in [
            DateWindow::AnyTime,
            DateWindow::Last24Hours,
            DateWindow::Last7Days,
            DateWindow::Last30Days,
        ] {
            let parsed: DateWindow = window.as_str().parse().unwrap();
            assert_eq!(parsed, window);
        }
    }

    #[test]
    fn date_window_cutoffs() {
        let now: DateTime<Utc> = "2025-01-25T00:00:00Z".parse().unwrap();

        assert_eq!(DateWindow::AnyTime.cutoff_from(now), None);
        assert_eq!(
            DateWindow::Last24Hours.cutoff_from(now).unwrap(),
            "2025-01-24T00:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
        assert_eq!(
            DateWindow::Last7Days.cutoff_from(now).unwrap(),
            "2025-01-18T00:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
        assert_eq!(
            DateWindow::Last30Days.cutoff_from(now).unwrap(),
            "2024-12-26T00:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }
}
