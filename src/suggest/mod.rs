//! Suggestion subsystem for katafind
//!
//! Ties together the pieces behind the as-you-type dropdown:
//! - `provider`: where suggestions come from (the catalog server, or any
//!   other [`SuggestionProvider`] implementation)
//! - `engine`: query gating, request sequencing and stale-response discard
//! - `dropdown`: the rendered item list and its keyboard cursor

pub mod dropdown;
pub mod engine;
pub mod provider;

// Re-export commonly used types
pub use dropdown::{Dropdown, Row, Target};
pub use engine::{Acceptance, QueryAction, SuggestEngine, SuggestOutcome, SuggestRequest};
pub use provider::{RemoteSuggestionProvider, SuggestionProvider};
