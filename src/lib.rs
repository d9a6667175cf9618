//! Live search-result pipeline.
//!
//! `scout` turns the categorised matches streamed in by independent
//! result providers into a single ranked, deduplicated, flattened list
//! suitable for direct display. The heart of the crate is
//! [`ResultsModel`], a chain of view transformations over a live tree of
//! matches: sort by type/relevance, distribute a global item limit across
//! categories, flatten, filter out leftover category rows, and annotate
//! duplicate display texts.
//!
//! Provider-facing interfaces live in the `scout-provider-api` crate and
//! are re-exported here for convenience.

pub mod model;
pub mod source;

pub use model::{ModelEvent, ResultsModel};
pub use source::{ResultBatch, ResultsSource};

pub use scout_provider_api as provider_api;
pub use scout_provider_api::{
    MatchAction, MatchPayload, MatchType, ProviderDescriptor, ProviderRegistry,
    ProviderRegistryError, SearchMatch, SearchProvider,
};
