use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Moderation state of a listing on the board.
///
/// Only approved listings are visible in the public search; pending ones
/// sit in the admin moderation queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ModerationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ModerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationStatus::Pending => "PENDING",
            ModerationStatus::Approved => "APPROVED",
            ModerationStatus::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ModerationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(ModerationStatus::Pending),
            "APPROVED" => Ok(ModerationStatus::Approved),
            "REJECTED" => Ok(ModerationStatus::Rejected),
            _ => Err(format!("Unknown moderation status: {}", s)),
        }
    }
}

/// A job listing as returned by the board API.
///
/// Listings are opaque to this crate: fields are displayed as-is, never
/// validated or rewritten. `salary_range` and `date_posted` are
/// pre-formatted display strings owned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub description: String,
    pub city: String,
    pub country: String,
    pub apply_link: String,
    pub employment_type: String,
    pub salary_range: String,
    pub date_posted: String,
    pub company_name: String,
    pub status: ModerationStatus,
}

/// Payload for creating or updating a listing (employer side).
///
/// Same shape as [`Listing`] minus the server-owned `id` and `status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDraft {
    pub title: String,
    pub description: String,
    pub city: String,
    pub country: String,
    pub apply_link: String,
    pub employment_type: String,
    pub salary_range: String,
    pub date_posted: String,
    pub company_name: String,
}

/// Format a salary range for display, e.g. `format_salary_range("$", "150000", "200000")`
/// yields `"$150000 - $200000"`. The board stores the formatted string verbatim.
pub fn format_salary_range(currency: &str, from: &str, to: &str) -> String {
    format!("{currency}{from} - {currency}{to}")
}

// ---------------------------------------------------------------------------
// User accounts (admin surface)
// ---------------------------------------------------------------------------

/// Role attached to a board account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Admin,
    Employer,
    Seeker,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Employer => "EMPLOYER",
            UserRole::Seeker => "SEEKER",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Ok(UserRole::Admin),
            "EMPLOYER" => Ok(UserRole::Employer),
            "SEEKER" => Ok(UserRole::Seeker),
            _ => Err(format!("Unknown user role: {}", s)),
        }
    }
}

/// Account standing, managed by admins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserStatus {
    Pending,
    Approved,
    Suspended,
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UserStatus::Pending => "PENDING",
            UserStatus::Approved => "APPROVED",
            UserStatus::Suspended => "SUSPENDED",
        };
        write!(f, "{}", s)
    }
}

/// A board user account as returned by the admin API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moderation_status_roundtrip() {
        for status in [
            ModerationStatus::Pending,
            ModerationStatus::Approved,
            ModerationStatus::Rejected,
        ] {
            let s = status.as_str();
            let parsed: ModerationStatus = s.parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_moderation_status_parse_is_case_insensitive() {
        assert_eq!(
            "pending".parse::<ModerationStatus>().unwrap(),
            ModerationStatus::Pending
        );
        assert!("archived".parse::<ModerationStatus>().is_err());
    }

    #[test]
    fn test_listing_wire_shape() {
        let json = serde_json::json!({
            "id": "42",
            "title": "Backend Developer",
            "description": "Build APIs",
            "city": "Lagos",
            "country": "Nigeria",
            "applyLink": "https://example.com/apply",
            "employmentType": "Full-Time",
            "salaryRange": "$150000 - $200000",
            "datePosted": "2025-01-20",
            "companyName": "Acme",
            "status": "APPROVED"
        });
        let listing: Listing = serde_json::from_value(json).unwrap();
        assert_eq!(listing.apply_link, "https://example.com/apply");
        assert_eq!(listing.status, ModerationStatus::Approved);

        let back = serde_json::to_value(&listing).unwrap();
        assert_eq!(back["employmentType"], "Full-Time");
        assert_eq!(back["status"], "APPROVED");
    }

    #[test]
    fn test_salary_range_formatting() {
        assert_eq!(
            format_salary_range("$", "150000", "200000"),
            "$150000 - $200000"
        );
        assert_eq!(format_salary_range("₦", "1", "2"), "₦1 - ₦2");
    }

    #[test]
    fn test_user_role_roundtrip() {
        for role in [UserRole::Admin, UserRole::Employer, UserRole::Seeker] {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), role);
        }
    }
}
