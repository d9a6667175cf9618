use anyhow::{Result, bail};

use crate::payload::MatchPayload;
use crate::types::SearchMatch;

/// Static metadata advertising a result provider.
pub struct ProviderDescriptor {
    /// Stable identifier used to route invocations back to the provider.
    pub id: &'static str,
    /// Human readable name shown when the provider is selected.
    pub name: &'static str,
    /// Icon name shown when the provider is selected.
    pub icon: &'static str,
}

/// A source of search results.
///
/// Providers produce [`SearchMatch`] values through whatever query
/// mechanism the embedding application uses; the pipeline only calls back
/// into the provider to invoke a match or one of its secondary actions.
pub trait SearchProvider: Send + Sync {
    /// Static descriptor advertising provider metadata.
    fn descriptor(&self) -> &'static ProviderDescriptor;

    /// Invoke the primary action of `matched`.
    ///
    /// # Errors
    ///
    /// Returns an error when the match can no longer be invoked, e.g. the
    /// resource behind it disappeared since the query ran.
    fn run(&self, matched: &SearchMatch) -> Result<()>;

    /// Invoke the `action`-th secondary action of `matched`.
    ///
    /// The pipeline validates the index against the match's action list
    /// before calling; providers without secondary actions can keep the
    /// default.
    ///
    /// # Errors
    ///
    /// Returns an error when the action cannot be invoked.
    fn run_action(&self, matched: &SearchMatch, action: usize) -> Result<()> {
        let _ = action;
        bail!(
            "provider '{}' offers no secondary actions for '{}'",
            self.descriptor().id,
            matched.id
        );
    }

    /// Transferable representation of `matched`, if the provider offers
    /// one. Defaults to a JSON encoding of the match.
    fn payload(&self, matched: &SearchMatch) -> Option<MatchPayload> {
        MatchPayload::from_match(matched).ok()
    }
}
