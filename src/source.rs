//! Provider aggregation adapter.
//!
//! [`ResultsSource`] is the pipeline's view of the outside world: a live
//! two-level tree of categories and matches, the current query string, and
//! a `querying` flag. The external query mechanism feeds it full snapshots
//! of the aggregate result set as [`ResultBatch`]es tagged with a query
//! generation; batches for superseded generations are discarded here so no
//! downstream stage ever sees stale rows.

use indexmap::IndexMap;
use scout_provider_api::{MatchType, ProviderRegistry, SearchMatch};

/// Snapshot of the aggregate result set for one query generation.
///
/// `complete` is `true` exactly once per query and signals that no further
/// batches will arrive for this generation.
#[derive(Debug, Clone)]
pub struct ResultBatch {
    pub generation: u64,
    pub matches: Vec<SearchMatch>,
    pub complete: bool,
}

struct CategoryNode {
    label: String,
    matches: Vec<SearchMatch>,
}

/// Live category/match tree fed by the registered providers.
pub struct ResultsSource {
    registry: ProviderRegistry,
    query: String,
    provider_filter: Option<String>,
    querying: bool,
    generation: u64,
    categories: Vec<CategoryNode>,
}

impl ResultsSource {
    #[must_use]
    pub fn new(registry: ProviderRegistry) -> Self {
        Self {
            registry,
            query: String::new(),
            provider_filter: None,
            querying: false,
            generation: 0,
            categories: Vec::new(),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    #[must_use]
    pub fn query_string(&self) -> &str {
        &self.query
    }

    /// Whether a query is in flight, i.e. results may still arrive.
    #[must_use]
    pub fn querying(&self) -> bool {
        self.querying
    }

    /// Generation tag expected on the next [`ResultBatch`].
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Identifier of the single provider results are restricted to, if any.
    #[must_use]
    pub fn provider_filter(&self) -> Option<&str> {
        self.provider_filter.as_deref()
    }

    /// Replace the query string. A changed, non-empty query supersedes any
    /// in-flight one and raises `querying`; an empty query drops all
    /// results. Returns `false` when the text did not change.
    pub fn set_query(&mut self, text: &str) -> bool {
        if self.query == text {
            return false;
        }
        text.clone_into(&mut self.query);
        self.generation += 1;
        if self.query.is_empty() {
            self.categories.clear();
            self.querying = false;
        } else {
            self.querying = true;
        }
        true
    }

    /// Restrict results to a single provider, or lift the restriction with
    /// `None`. Changing the filter supersedes any in-flight query.
    pub fn set_provider_filter(&mut self, filter: Option<String>) -> bool {
        if self.provider_filter == filter {
            return false;
        }
        self.provider_filter = filter;
        self.generation += 1;
        if !self.query.is_empty() {
            self.querying = true;
        }
        true
    }

    /// Drop all current results, independent of the query string, and
    /// supersede anything still in flight. Returns `false` when there was
    /// nothing to drop.
    pub fn clear(&mut self) -> bool {
        self.generation += 1;
        if self.categories.is_empty() && !self.querying {
            return false;
        }
        self.categories.clear();
        self.querying = false;
        true
    }

    /// Merge a result snapshot into the tree. Returns `false` when the
    /// batch was discarded because its generation is no longer current.
    pub fn apply(&mut self, batch: ResultBatch) -> bool {
        if batch.generation != self.generation {
            log::debug!(
                "discarding result batch for superseded generation {} (current {})",
                batch.generation,
                self.generation
            );
            return false;
        }

        self.merge(batch.matches);
        if batch.complete {
            self.querying = false;
        }
        true
    }

    fn merge(&mut self, matches: Vec<SearchMatch>) {
        let mut buckets: IndexMap<String, Vec<SearchMatch>> = IndexMap::new();
        for matched in matches {
            if let Some(filter) = self.provider_filter.as_deref()
                && matched.provider_id != filter
            {
                log::trace!(
                    "dropping match '{}' from filtered-out provider '{}'",
                    matched.id,
                    matched.provider_id
                );
                continue;
            }
            buckets
                .entry(matched.category.clone())
                .or_default()
                .push(matched);
        }

        // Surviving categories keep their relative order, new ones append
        // in arrival order.
        let mut next = Vec::with_capacity(buckets.len());
        for category in self.categories.drain(..) {
            if let Some(matches) = buckets.shift_remove(&category.label) {
                next.push(CategoryNode {
                    label: category.label,
                    matches,
                });
            }
        }
        for (label, matches) in buckets {
            next.push(CategoryNode { label, matches });
        }
        self.categories = next;
    }

    #[must_use]
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn category_label(&self, category: usize) -> Option<&str> {
        self.categories.get(category).map(|c| c.label.as_str())
    }

    #[must_use]
    pub fn match_count(&self, category: usize) -> usize {
        self.categories.get(category).map_or(0, |c| c.matches.len())
    }

    #[must_use]
    pub fn match_at(&self, category: usize, row: usize) -> Option<&SearchMatch> {
        self.categories.get(category)?.matches.get(row)
    }

    /// Effective type of a category: the highest type among its matches.
    #[must_use]
    pub fn category_type(&self, category: usize) -> MatchType {
        self.categories.get(category).map_or(MatchType::None, |c| {
            c.matches
                .iter()
                .map(|m| m.match_type)
                .max()
                .unwrap_or(MatchType::None)
        })
    }

    /// Effective relevance of a category: the highest among its matches.
    #[must_use]
    pub fn category_relevance(&self, category: usize) -> f64 {
        self.categories.get(category).map_or(0.0, |c| {
            c.matches.iter().fold(0.0, |best, m| m.relevance.max(best))
        })
    }
}
