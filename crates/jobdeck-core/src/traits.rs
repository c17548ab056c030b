use std::future::Future;

use crate::error::AppError;
use crate::listing::Listing;
use crate::query::QueryParams;

/// Fetches listings matching a query from the board.
///
/// Implemented by the HTTP client in `jobdeck-client` and by mocks in
/// [`crate::testutil`]. An empty result vector is a successful search
/// with no matches, never an error.
pub trait ListingSource: Send + Sync + Clone {
    fn search(
        &self,
        params: &QueryParams,
    ) -> impl Future<Output = Result<Vec<Listing>, AppError>> + Send;
}
