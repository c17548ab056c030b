pub mod error;
pub mod filter;
pub mod listing;
pub mod query;
pub mod search;
pub mod testutil;
pub mod traits;

pub use error::AppError;
pub use filter::{DateWindow, FilterSelection};
pub use listing::{Listing, ListingDraft, ModerationStatus, UserAccount, UserRole, UserStatus};
pub use query::{QueryParams, build_query, keyword_from_url};
pub use search::{SearchPhase, SearchSession, SearchState};
pub use traits::ListingSource;
