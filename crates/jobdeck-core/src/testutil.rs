//! Test utilities: mock listing source and record factories.
//!
//! Handwritten mocks for dependency injection in unit tests. Mocks use
//! `Arc<Mutex<_>>` for interior mutability, allowing test assertions on
//! recorded calls.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::AppError;
use crate::listing::{Listing, ModerationStatus};
use crate::query::QueryParams;
use crate::traits::ListingSource;

/// Queued response: optional delay before resolution, then the result.
type QueuedResponse = (Duration, Result<Vec<Listing>, AppError>);

/// Mock listing source that returns queued responses and records the
/// queries it was asked to run.
///
/// Each call pops the first queued response; when the queue is empty it
/// returns an empty listing vector.
#[derive(Clone)]
pub struct MockListingSource {
    responses: Arc<Mutex<Vec<QueuedResponse>>>,
    queries: Arc<Mutex<Vec<QueryParams>>>,
}

impl MockListingSource {
    /// Source that always answers with the given listings.
    pub fn with_listings(listings: Vec<Listing>) -> Self {
        Self::with_responses(vec![Ok(listings)])
    }

    /// Source whose first call fails with the given error.
    pub fn with_error(error: AppError) -> Self {
        Self::with_responses(vec![Err(error)])
    }

    pub fn with_responses(responses: Vec<Result<Vec<Listing>, AppError>>) -> Self {
        Self::with_delayed_responses(
            responses.into_iter().map(|r| (Duration::ZERO, r)).collect(),
        )
    }

    /// Responses that each sleep for their delay before resolving, for
    /// exercising out-of-order completion.
    pub fn with_delayed_responses(responses: Vec<QueuedResponse>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queries recorded so far, in call order.
    pub fn queries(&self) -> Vec<QueryParams> {
        self.queries.lock().unwrap().clone()
    }
}

impl ListingSource for MockListingSource {
    async fn search(&self, params: &QueryParams) -> Result<Vec<Listing>, AppError> {
        self.queries.lock().unwrap().push(params.clone());

        let next = {
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                None
            } else {
                Some(responses.remove(0))
            }
        };

        match next {
            Some((delay, result)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                result
            }
            None => Ok(vec![]),
        }
    }
}

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Create a dummy approved listing with the given id.
pub fn make_test_listing(id: &str) -> Listing {
    Listing {
        id: id.to_string(),
        title: "Backend Developer".to_string(),
        description: "Design and build the listing API.".to_string(),
        city: "Lagos".to_string(),
        country: "Nigeria".to_string(),
        apply_link: "https://example.com/apply".to_string(),
        employment_type: "Full-Time".to_string(),
        salary_range: "$150000 - $200000".to_string(),
        date_posted: "2025-01-20".to_string(),
        company_name: "Acme".to_string(),
        status: ModerationStatus::Approved,
    }
}
