//! Suggestion engine - orchestrates the suggestion flow
//!
//! The engine sits between the input line and the provider:
//! - Gates queries below the minimum length (no request, dropdown cleared)
//! - Tags every dispatched request with a monotonically increasing sequence
//!   number and cancels the superseded in-flight request
//! - Discards outcomes that arrive for an out-of-date sequence number, so a
//!   slow response can never overwrite the dropdown of a newer query
//! - Builds the [`Dropdown`] for an accepted, non-empty response

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::dropdown::Dropdown;
use super::provider::SuggestionProvider;
use crate::error::{KatafindError, Result};
use crate::server::SuggestionResponse;

/// A dispatched suggestion request
#[derive(Debug)]
pub struct SuggestRequest {
    /// Sequence number, increasing per request
    pub seq: u64,

    /// Query text the request was issued for
    pub query: String,

    /// Token cancelled when a newer request supersedes this one
    pub cancel: CancellationToken,
}

/// Completed suggestion request, stamped with its sequence number
#[derive(Debug)]
pub struct SuggestOutcome {
    /// Sequence number of the originating request
    pub seq: u64,

    /// Query text the request was issued for
    pub query: String,

    /// Fetch result
    pub result: Result<SuggestionResponse>,
}

/// What the widget should do after a keystroke
#[derive(Debug)]
pub enum QueryAction {
    /// Query too short: remove any dropdown, issue nothing
    Clear,

    /// Dispatch this request and await its outcome
    Fetch(SuggestRequest),
}

/// What the widget should do with a completed request
#[derive(Debug)]
pub enum Acceptance {
    /// Outcome belongs to a superseded request; ignore it
    Stale,

    /// The request failed; clear the dropdown and report
    Failed(KatafindError),

    /// The response carried no suggestions; clear the dropdown
    Empty,

    /// Fresh suggestions; replace the dropdown
    Fresh(Dropdown),
}

/// Suggestion engine
pub struct SuggestEngine {
    /// Candidate provider for fetching suggestions
    provider: Arc<dyn SuggestionProvider>,

    /// Minimum query length before a request is issued
    min_query_len: usize,

    /// Sequence number of the newest dispatched request
    latest_seq: u64,

    /// Cancellation token of the in-flight request, if any
    inflight: Option<CancellationToken>,
}

impl SuggestEngine {
    /// Create a new suggestion engine
    ///
    /// # Arguments
    /// * `provider` - Candidate provider for fetching suggestions
    /// * `min_query_len` - Minimum query length before a request is issued
    ///
    /// # Returns
    /// * `Self` - New engine
    pub fn new(provider: Arc<dyn SuggestionProvider>, min_query_len: usize) -> Self {
        Self {
            provider,
            min_query_len,
            latest_seq: 0,
            inflight: None,
        }
    }

    /// Check whether a query is long enough to be sent to the server
    ///
    /// # Arguments
    /// * `query` - Raw query text
    ///
    /// # Returns
    /// * `bool` - True when the query meets the minimum length
    pub fn should_query(&self, query: &str) -> bool {
        query.chars().count() >= self.min_query_len
    }

    /// React to a changed query
    ///
    /// Any in-flight request is superseded: its token is cancelled and its
    /// eventual outcome will be rejected as stale.
    ///
    /// # Arguments
    /// * `query` - New query text
    ///
    /// # Returns
    /// * `QueryAction` - Clear the dropdown, or fetch with a fresh request
    pub fn begin(&mut self, query: &str) -> QueryAction {
        if let Some(token) = self.inflight.take() {
            token.cancel();
        }

        if !self.should_query(query) {
            return QueryAction::Clear;
        }

        self.latest_seq += 1;
        let cancel = CancellationToken::new();
        self.inflight = Some(cancel.clone());

        debug!(seq = self.latest_seq, query = %query, "Dispatching suggestion request");
        QueryAction::Fetch(SuggestRequest {
            seq: self.latest_seq,
            query: query.to_string(),
            cancel,
        })
    }

    /// Run a request in the background
    ///
    /// The outcome is delivered on `outcomes` unless the request is
    /// cancelled first.
    ///
    /// # Arguments
    /// * `request` - Request produced by [`SuggestEngine::begin`]
    /// * `outcomes` - Channel the outcome is sent on
    pub fn dispatch(&self, request: SuggestRequest, outcomes: mpsc::Sender<SuggestOutcome>) {
        let provider = Arc::clone(&self.provider);
        tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                _ = request.cancel.cancelled() => return,
                result = provider.suggest(&request.query) => result,
            };
            let _ = outcomes
                .send(SuggestOutcome {
                    seq: request.seq,
                    query: request.query,
                    result,
                })
                .await;
        });
    }

    /// Judge a completed request
    ///
    /// # Arguments
    /// * `outcome` - Outcome received from a dispatched request
    ///
    /// # Returns
    /// * `Acceptance` - Stale, failed, empty, or a fresh dropdown
    pub fn accept(&mut self, outcome: SuggestOutcome) -> Acceptance {
        if outcome.seq < self.latest_seq {
            debug!(
                seq = outcome.seq,
                latest = self.latest_seq,
                "Dropping stale suggestion outcome"
            );
            return Acceptance::Stale;
        }

        self.inflight = None;

        match outcome.result {
            Err(e) => Acceptance::Failed(e),
            Ok(response) => match Dropdown::from_response(&outcome.query, &response) {
                Some(dropdown) => Acceptance::Fresh(dropdown),
                None => Acceptance::Empty,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServerError;
    use crate::server::TitleHit;

    /// Provider answering every query with a fixed response
    struct StaticProvider {
        response: SuggestionResponse,
    }

    #[async_trait::async_trait]
    impl SuggestionProvider for StaticProvider {
        async fn suggest(&self, _query: &str) -> Result<SuggestionResponse> {
            Ok(self.response.clone())
        }
    }

    fn sample_response() -> SuggestionResponse {
        SuggestionResponse {
            titles: vec![TitleHit {
                id: "1".to_string(),
                title: "Foo".to_string(),
            }],
            topics: vec!["Bar".to_string()],
        }
    }

    fn test_engine(response: SuggestionResponse) -> SuggestEngine {
        SuggestEngine::new(Arc::new(StaticProvider { response }), 2)
    }

    #[test]
    fn test_short_query_clears() {
        let mut engine = test_engine(sample_response());

        assert!(matches!(engine.begin(""), QueryAction::Clear));
        assert!(matches!(engine.begin("f"), QueryAction::Clear));
    }

    #[test]
    fn test_min_length_counts_chars_not_bytes() {
        let engine = test_engine(sample_response());

        // Two non-ASCII chars are four bytes but still a qualifying query
        assert!(engine.should_query("éé"));
        assert!(!engine.should_query("é"));
    }

    #[test]
    fn test_begin_increments_sequence() {
        let mut engine = test_engine(sample_response());

        let QueryAction::Fetch(first) = engine.begin("fo") else {
            panic!("expected fetch");
        };
        let QueryAction::Fetch(second) = engine.begin("foo") else {
            panic!("expected fetch");
        };

        assert!(second.seq > first.seq);
    }

    #[test]
    fn test_begin_cancels_superseded_request() {
        let mut engine = test_engine(sample_response());

        let QueryAction::Fetch(first) = engine.begin("fo") else {
            panic!("expected fetch");
        };
        let _ = engine.begin("foo");

        assert!(first.cancel.is_cancelled());
    }

    #[test]
    fn test_short_query_cancels_in_flight_request() {
        let mut engine = test_engine(sample_response());

        let QueryAction::Fetch(request) = engine.begin("fo") else {
            panic!("expected fetch");
        };
        assert!(matches!(engine.begin("f"), QueryAction::Clear));
        assert!(request.cancel.is_cancelled());
    }

    #[test]
    fn test_accept_drops_stale_outcome() {
        let mut engine = test_engine(sample_response());

        let QueryAction::Fetch(old) = engine.begin("fo") else {
            panic!("expected fetch");
        };
        let _ = engine.begin("foo");

        let acceptance = engine.accept(SuggestOutcome {
            seq: old.seq,
            query: old.query,
            result: Ok(sample_response()),
        });
        assert!(matches!(acceptance, Acceptance::Stale));
    }

    #[test]
    fn test_accept_fresh_outcome_builds_dropdown() {
        let mut engine = test_engine(sample_response());

        let QueryAction::Fetch(request) = engine.begin("fo") else {
            panic!("expected fetch");
        };
        let acceptance = engine.accept(SuggestOutcome {
            seq: request.seq,
            query: request.query,
            result: Ok(sample_response()),
        });

        let Acceptance::Fresh(dropdown) = acceptance else {
            panic!("expected fresh dropdown");
        };
        assert_eq!(dropdown.item_count(), 3);
        assert_eq!(dropdown.query(), "fo");
    }

    #[test]
    fn test_accept_empty_response() {
        let mut engine = test_engine(SuggestionResponse::default());

        let QueryAction::Fetch(request) = engine.begin("fo") else {
            panic!("expected fetch");
        };
        let acceptance = engine.accept(SuggestOutcome {
            seq: request.seq,
            query: request.query,
            result: Ok(SuggestionResponse::default()),
        });
        assert!(matches!(acceptance, Acceptance::Empty));
    }

    #[test]
    fn test_accept_failed_request() {
        let mut engine = test_engine(sample_response());

        let QueryAction::Fetch(request) = engine.begin("fo") else {
            panic!("expected fetch");
        };
        let acceptance = engine.accept(SuggestOutcome {
            seq: request.seq,
            query: request.query,
            result: Err(ServerError::BadStatus(500).into()),
        });
        assert!(matches!(acceptance, Acceptance::Failed(_)));
    }

    #[tokio::test]
    async fn test_dispatch_delivers_outcome() {
        let mut engine = test_engine(sample_response());
        let (tx, mut rx) = mpsc::channel(4);

        let QueryAction::Fetch(request) = engine.begin("fo") else {
            panic!("expected fetch");
        };
        engine.dispatch(request, tx);

        let outcome = rx.recv().await.expect("outcome delivered");
        assert_eq!(outcome.seq, 1);
        assert!(matches!(engine.accept(outcome), Acceptance::Fresh(_)));
    }

    #[tokio::test]
    async fn test_dispatch_cancelled_request_stays_silent() {
        let mut engine = test_engine(sample_response());
        let (tx, mut rx) = mpsc::channel(4);

        let QueryAction::Fetch(request) = engine.begin("fo") else {
            panic!("expected fetch");
        };
        request.cancel.cancel();
        engine.dispatch(request, tx);

        // Sender side is dropped by the cancelled task without sending
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn test_stale_then_current_outcome() {
        // A slow response for an earlier query must not overwrite the
        // dropdown built for a later one
        let mut engine = test_engine(sample_response());

        let QueryAction::Fetch(old) = engine.begin("fo") else {
            panic!("expected fetch");
        };
        let QueryAction::Fetch(new) = engine.begin("foo") else {
            panic!("expected fetch");
        };

        // Newer outcome lands first
        let acceptance = engine.accept(SuggestOutcome {
            seq: new.seq,
            query: new.query,
            result: Ok(sample_response()),
        });
        assert!(matches!(acceptance, Acceptance::Fresh(_)));

        // Slow, superseded outcome arrives afterwards and is ignored
        let acceptance = engine.accept(SuggestOutcome {
            seq: old.seq,
            query: old.query,
            result: Ok(SuggestionResponse::default()),
        });
        assert!(matches!(acceptance, Acceptance::Stale));
    }
}
