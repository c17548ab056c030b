//! Search state and the fetch-sequencing session.
//!
//! Every filter or keyword change issues one fetch. Responses can arrive
//! out of order, so each fetch is tagged with a monotonically increasing
//! sequence number and a completion is applied only when its sequence is
//! the newest issued: last-request-wins-by-sequence, never
//! last-response-wins-by-arrival. On top of that, submitting a new search
//! cancels the previous in-flight request to stop wasting the socket.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::error::AppError;
use crate::filter::FilterSelection;
use crate::listing::Listing;
use crate::query::{QueryParams, build_query};
use crate::traits::ListingSource;

/// What the results area should show.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPhase {
    /// Nothing fetched yet.
    Idle,
    /// A fetch is in flight.
    Loading,
    /// Last applied fetch succeeded. May be empty.
    Ready(Vec<Listing>),
    /// Last applied fetch failed in transport or at the server.
    Failed { message: String, retryable: bool },
}

impl SearchPhase {
    pub fn is_loading(&self) -> bool {
        matches!(self, SearchPhase::Loading)
    }
}

/// The search page's state: keyword, filter selection, and the single
/// "last jobs list" slot guarded by sequence discipline.
///
/// Pure and synchronous; the async side lives in [`SearchSession`].
#[derive(Debug, Clone)]
pub struct SearchState {
    keyword: String,
    selection: FilterSelection,
    /// Newest sequence number handed out by [`begin`](Self::begin).
    issued: u64,
    phase: SearchPhase,
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchState {
    pub fn new() -> Self {
        Self {
            keyword: String::new(),
            selection: FilterSelection::default(),
            issued: 0,
            phase: SearchPhase::Idle,
        }
    }

    /// Seed the keyword (e.g. from a page URL) without issuing a fetch.
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = keyword.into();
        self
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn phase(&self) -> &SearchPhase {
        &self.phase
    }

    pub fn set_keyword(&mut self, keyword: impl Into<String>) {
        self.keyword = keyword.into();
    }

    /// Replace one filter field, swapping in a whole new selection value.
    pub fn set_filter(&mut self, field: &str, value: &str) -> Result<(), AppError> {
        self.selection = self.selection.set_field(field, value)?;
        Ok(())
    }

    /// Start a new fetch: bump the sequence, mark the results loading,
    /// and return the tag plus the parameters to send.
    pub fn begin(&mut self, now: chrono::DateTime<Utc>) -> (u64, QueryParams) {
        self.issued += 1;
        self.phase = SearchPhase::Loading;
        (self.issued, build_query(&self.keyword, &self.selection, now))
    }

    /// Apply a fetch completion. Returns `false` (and changes nothing)
    /// when `seq` is not the newest issued fetch — a stale response must
    /// never overwrite a newer one.
    pub fn resolve(&mut self, seq: u64, result: Result<Vec<Listing>, AppError>) -> bool {
        if seq != self.issued {
            tracing::debug!(seq, latest = self.issued, "Discarding stale search result");
            return false;
        }
        self.phase = match result {
            Ok(listings) => SearchPhase::Ready(listings),
            Err(e) => SearchPhase::Failed {
                retryable: e.is_retryable(),
                message: e.to_string(),
            },
        };
        true
    }
}

/// Drives [`SearchState`] against a [`ListingSource`].
///
/// Cloneable and cheap to share: clones operate on the same state, so
/// concurrent [`submit`](Self::submit) calls from different tasks race
/// safely — the sequence check decides which result lands.
#[derive(Clone)]
pub struct SearchSession<S: ListingSource> {
    source: S,
    state: Arc<Mutex<SearchState>>,
    in_flight: Arc<Mutex<CancellationToken>>,
}

impl<S: ListingSource> SearchSession<S> {
    pub fn new(source: S) -> Self {
        Self::with_state(source, SearchState::new())
    }

    pub fn with_state(source: S, state: SearchState) -> Self {
        Self {
            source,
            state: Arc::new(Mutex::new(state)),
            in_flight: Arc::new(Mutex::new(CancellationToken::new())),
        }
    }

    /// Acquires the state lock, recovering from poison if necessary.
    fn lock_state(&self) -> MutexGuard<'_, SearchState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("Recovered from poisoned search state mutex");
            poisoned.into_inner()
        })
    }

    pub fn set_keyword(&self, keyword: impl Into<String>) {
        self.lock_state().set_keyword(keyword);
    }

    pub fn set_filter(&self, field: &str, value: &str) -> Result<(), AppError> {
        self.lock_state().set_filter(field, value)
    }

    /// Current phase, cloned out of the state.
    pub fn snapshot(&self) -> SearchPhase {
        self.lock_state().phase().clone()
    }

    pub fn keyword(&self) -> String {
        self.lock_state().keyword().to_string()
    }

    pub fn selection(&self) -> FilterSelection {
        self.lock_state().selection().clone()
    }

    /// Run one search against the current keyword and selection.
    ///
    /// Cancels whatever fetch was previously in flight, tags this one,
    /// and applies the outcome only if no newer search was submitted
    /// while it ran. Returns the applied phase, or `None` when the
    /// result was stale and dropped.
    pub async fn submit(&self) -> Option<SearchPhase> {
        // The token swap happens under the state lock so that sequence
        // bump and cancellation stay atomic: a fetch can only ever be
        // cancelled by a submission carrying a newer sequence.
        let (seq, params, token) = {
            let mut state = self.lock_state();
            let (seq, params) = state.begin(Utc::now());

            let mut in_flight = self.in_flight.lock().unwrap_or_else(|p| p.into_inner());
            in_flight.cancel();
            *in_flight = CancellationToken::new();
            let token = in_flight.clone();
            (seq, params, token)
        };

        tracing::debug!(seq, query = %params.to_query_string(), "Submitting search");

        let result = tokio::select! {
            result = self.source.search(&params) => result,
            () = token.cancelled() => {
                tracing::debug!(seq, "Search cancelled by a newer submission");
                return None;
            }
        };

        let mut state = self.lock_state();
        if state.resolve(seq, result) {
            Some(state.phase().clone())
        } else {
            None
        }
    }
}
