//! Provider-facing interfaces and data types for the `scout` results
//! pipeline.
//!
//! Result providers implement [`SearchProvider`] and advertise themselves
//! through a static [`ProviderDescriptor`]. The pipeline resolves
//! providers through a [`ProviderRegistry`] and only ever observes the
//! [`SearchMatch`] values a provider produced; it never creates or
//! destroys them.

pub mod error;
pub mod payload;
pub mod provider;
pub mod registry;
pub mod types;

pub use error::ProviderRegistryError;
pub use payload::MatchPayload;
pub use provider::{ProviderDescriptor, SearchProvider};
pub use registry::{ProviderRegistry, RegisteredProvider};
pub use types::{MatchAction, MatchType, SearchMatch};
