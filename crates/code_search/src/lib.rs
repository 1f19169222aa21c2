//! Client for the repository code-search service.
//!
//! Fetches snippets relevant to a free-text query (fixed caps: 75 results,
//! 3 lines of context above and below each matched block), rewrites absolute
//! result paths relative to the repository root, and renders the snippets
//! into the deterministic context block consumed by prompt augmentation.
//!
//! Any transport or decode failure surfaces as [`SearchError`]; callers are
//! expected to degrade to an empty context block rather than abort the turn.

pub mod client;
pub mod config;
pub mod error;
pub mod snippet;

pub use client::{SearchClient, CONTEXT_ABOVE, CONTEXT_BELOW, MAX_RESULTS};
pub use config::SearchConfig;
pub use error::SearchError;
pub use snippet::{render_context, ContextSnippet};
