//! The result transformation pipeline.
//!
//! [`ResultsModel`] wires the six stages in their fixed order:
//!
//! - [`ResultsSource`] — live category/match tree fed by the providers
//!   - sort — categories and matches ordered by descending priority
//!     - budget — per-category visible counts under the global limit
//!       - flatten — tree collapsed into a flat sequence
//!         - root filter — leftover category rows removed
//!           - duplicates — repeated display texts annotated
//!
//! Every stage re-derives its output synchronously from the current
//! upstream state after each change; nothing holds computed state past
//! the next notification.

mod budget;
mod duplicates;
mod events;
mod flatten;
mod hide_root;
mod sort;

pub use events::ModelEvent;

use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::mpsc::Receiver;

use scout_provider_api::{MatchAction, MatchPayload, MatchType, ProviderRegistry, SearchMatch};

use crate::source::{ResultBatch, ResultsSource};

use budget::BudgetStage;
use events::EventFanout;
use flatten::FlattenStage;
use hide_root::RootFilterStage;
use sort::SortStage;

/// Position of a node in a two-level results tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NodePos {
    Category(usize),
    Match { category: usize, row: usize },
}

/// One row of the flat projection, captured for change diffing.
#[derive(Clone)]
struct SnapshotRow {
    id: String,
    fingerprint: u64,
}

/// Facade over the pipeline: ranked, deduplicated, flattened list of
/// matches plus the observable query state, ready for direct display.
pub struct ResultsModel {
    source: ResultsSource,
    sort: SortStage,
    budget: BudgetStage,
    flatten: FlattenStage,
    hide_root: RootFilterStage,
    events: EventFanout,
    snapshot: Vec<SnapshotRow>,
}

impl ResultsModel {
    #[must_use]
    pub fn new(registry: ProviderRegistry) -> Self {
        Self {
            source: ResultsSource::new(registry),
            sort: SortStage::default(),
            budget: BudgetStage::default(),
            flatten: FlattenStage::default(),
            hide_root: RootFilterStage::default(),
            events: EventFanout::default(),
            snapshot: Vec::new(),
        }
    }

    /// Receive change notifications for rows and observable properties.
    pub fn subscribe(&mut self) -> Receiver<ModelEvent> {
        self.events.subscribe()
    }

    #[must_use]
    pub fn registry(&self) -> &ProviderRegistry {
        self.source.registry()
    }

    #[must_use]
    pub fn query_string(&self) -> &str {
        self.source.query_string()
    }

    pub fn set_query_string(&mut self, text: &str) {
        let was_querying = self.source.querying();
        if !self.source.set_query(text) {
            return;
        }
        self.sort.set_query(text);
        self.events.emit(ModelEvent::QueryStringChanged(text.to_owned()));
        if self.source.querying() != was_querying {
            self.events
                .emit(ModelEvent::QueryingChanged(self.source.querying()));
        }
        self.refresh_and_notify();
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.budget.limit()
    }

    pub fn set_limit(&mut self, limit: usize) {
        if !self.budget.set_limit(limit) {
            return;
        }
        self.events.emit(ModelEvent::LimitChanged(limit));
        self.refresh_and_notify();
    }

    pub fn reset_limit(&mut self) {
        self.set_limit(0);
    }

    /// Whether a query is in flight.
    #[must_use]
    pub fn querying(&self) -> bool {
        self.source.querying()
    }

    /// Identifier of the active provider, if results are restricted to one.
    #[must_use]
    pub fn active_provider(&self) -> Option<&str> {
        self.source.provider_filter()
    }

    /// Restrict results to the provider registered under `id`. An empty or
    /// unknown identifier falls back to all-provider behaviour.
    pub fn set_active_provider(&mut self, id: &str) {
        let filter = if id.is_empty() {
            None
        } else if self.source.registry().provider_by_id(id).is_some() {
            Some(id.to_owned())
        } else {
            log::debug!("unknown provider id '{id}', falling back to all providers");
            None
        };

        let was_querying = self.source.querying();
        if !self.source.set_provider_filter(filter.clone()) {
            return;
        }
        self.events.emit(ModelEvent::ProviderChanged(filter));
        if self.source.querying() != was_querying {
            self.events
                .emit(ModelEvent::QueryingChanged(self.source.querying()));
        }
    }

    #[must_use]
    pub fn active_provider_name(&self) -> Option<&str> {
        let id = self.source.provider_filter()?;
        Some(self.source.registry().descriptor_by_id(id)?.name)
    }

    #[must_use]
    pub fn active_provider_icon(&self) -> Option<&str> {
        let id = self.source.provider_filter()?;
        Some(self.source.registry().descriptor_by_id(id)?.icon)
    }

    /// Generation tag expected on the next [`ResultBatch`].
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.source.generation()
    }

    /// Feed a result snapshot from the external query mechanism. Batches
    /// for superseded generations are discarded by the adapter.
    pub fn apply(&mut self, batch: ResultBatch) {
        let was_querying = self.source.querying();
        if !self.source.apply(batch) {
            return;
        }
        self.refresh_and_notify();
        if self.source.querying() != was_querying {
            self.events
                .emit(ModelEvent::QueryingChanged(self.source.querying()));
        }
    }

    /// Discard all current results, independent of the query string.
    pub fn clear(&mut self) {
        let was_querying = self.source.querying();
        if !self.source.clear() {
            return;
        }
        self.refresh();
        let had_rows = !self.snapshot.is_empty();
        self.snapshot.clear();
        if had_rows {
            self.events.emit(ModelEvent::Reset);
        }
        if self.source.querying() != was_querying {
            self.events.emit(ModelEvent::QueryingChanged(false));
        }
    }

    /// Number of rows in the final list.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.hide_root.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// The match displayed at `row`, if the row maps to one.
    #[must_use]
    pub fn match_at(&self, row: usize) -> Option<&SearchMatch> {
        match self.map_to_source(row)? {
            NodePos::Match { category, row } => self.source.match_at(category, row),
            NodePos::Category(_) => None,
        }
    }

    #[must_use]
    pub fn id_at(&self, row: usize) -> Option<&str> {
        self.match_at(row).map(|m| m.id.as_str())
    }

    #[must_use]
    pub fn text_at(&self, row: usize) -> Option<&str> {
        self.match_at(row).map(|m| m.text.as_str())
    }

    #[must_use]
    pub fn subtext_at(&self, row: usize) -> Option<&str> {
        self.match_at(row).map(|m| m.subtext.as_str())
    }

    #[must_use]
    pub fn icon_at(&self, row: usize) -> Option<&str> {
        self.match_at(row).map(|m| m.icon.as_str())
    }

    #[must_use]
    pub fn category_at(&self, row: usize) -> Option<&str> {
        self.match_at(row).map(|m| m.category.as_str())
    }

    #[must_use]
    pub fn match_type_at(&self, row: usize) -> Option<MatchType> {
        self.match_at(row).map(|m| m.match_type)
    }

    #[must_use]
    pub fn relevance_at(&self, row: usize) -> Option<f64> {
        self.match_at(row).map(|m| m.relevance)
    }

    #[must_use]
    pub fn enabled_at(&self, row: usize) -> Option<bool> {
        self.match_at(row).map(|m| m.enabled)
    }

    #[must_use]
    pub fn multi_line_at(&self, row: usize) -> Option<bool> {
        self.match_at(row).map(|m| m.multi_line)
    }

    #[must_use]
    pub fn actions_at(&self, row: usize) -> Option<&[MatchAction]> {
        self.match_at(row).map(|m| m.actions.as_slice())
    }

    /// `true` when the display text at `row` occurs more than once in the
    /// final list.
    #[must_use]
    pub fn is_duplicate(&self, row: usize) -> bool {
        duplicates::is_duplicate(self.row_count(), row, |other| self.text_at(other))
    }

    /// Invoke the primary action of the match at `row`. Returns `false`
    /// when the row no longer maps to a match, e.g. because an update
    /// raced with the interaction, or when the provider rejects the run.
    pub fn run(&self, row: usize) -> bool {
        let Some(matched) = self.match_at(row) else {
            return false;
        };
        let Some(provider) = self.source.registry().provider_by_id(&matched.provider_id) else {
            log::debug!(
                "match '{}' references unknown provider '{}'",
                matched.id,
                matched.provider_id
            );
            return false;
        };
        match provider.run(matched) {
            Ok(()) => true,
            Err(error) => {
                log::warn!("running match '{}' failed: {error:#}", matched.id);
                false
            }
        }
    }

    /// Invoke the `action`-th secondary action of the match at `row`.
    /// Fails like [`Self::run`], and also when `action` is out of range
    /// for the match's action list.
    pub fn run_action(&self, row: usize, action: usize) -> bool {
        let Some(matched) = self.match_at(row) else {
            return false;
        };
        if action >= matched.actions.len() {
            return false;
        }
        let Some(provider) = self.source.registry().provider_by_id(&matched.provider_id) else {
            return false;
        };
        match provider.run_action(matched, action) {
            Ok(()) => true,
            Err(error) => {
                log::warn!(
                    "running action {action} of match '{}' failed: {error:#}",
                    matched.id
                );
                false
            }
        }
    }

    /// Transferable representation of the match at `row`, or `None` when
    /// the row is unmapped or the provider offers none.
    #[must_use]
    pub fn payload(&self, row: usize) -> Option<MatchPayload> {
        let matched = self.match_at(row)?;
        let provider = self.source.registry().provider_by_id(&matched.provider_id)?;
        provider.payload(matched)
    }

    /// Translate a final-list row back into source-tree coordinates by
    /// composing the per-stage index maps.
    fn map_to_source(&self, row: usize) -> Option<NodePos> {
        let flat = self.hide_root.map_to_flat(row)?;
        let node = self.flatten.node(flat)?;
        self.map_node_to_source(node)
    }

    fn map_node_to_source(&self, node: NodePos) -> Option<NodePos> {
        match node {
            NodePos::Category(category) => {
                self.sort.source_category(category).map(NodePos::Category)
            }
            NodePos::Match { category, row } => {
                let source_category = self.sort.source_category(category)?;
                let source_row = self.sort.source_row(category, row)?;
                Some(NodePos::Match {
                    category: source_category,
                    row: source_row,
                })
            }
        }
    }

    /// Re-derive every stage from the current source tree, in data-flow
    /// order.
    fn refresh(&mut self) {
        self.sort.refresh(&self.source);

        let counts: Vec<usize> = (0..self.sort.category_count())
            .map(|category| self.sort.match_count(category))
            .collect();
        self.budget.refresh(&counts);

        let visible: Vec<usize> = (0..counts.len())
            .map(|category| self.budget.visible_count(category))
            .collect();
        self.flatten.refresh(&visible);

        let Self {
            source,
            sort,
            flatten,
            hide_root,
            ..
        } = self;
        hide_root.refresh(flatten, |node| match node {
            NodePos::Category(_) => false,
            NodePos::Match { category, row } => sort
                .source_category(category)
                .zip(sort.source_row(category, row))
                .is_some_and(|(c, r)| source.match_at(c, r).is_some()),
        });
    }

    fn refresh_and_notify(&mut self) {
        self.refresh();
        let new = self.capture_snapshot();
        let old = std::mem::replace(&mut self.snapshot, new);
        self.emit_row_diff(&old);
    }

    fn capture_snapshot(&self) -> Vec<SnapshotRow> {
        (0..self.row_count())
            .filter_map(|row| self.match_at(row))
            .map(|matched| SnapshotRow {
                id: matched.id.clone(),
                fingerprint: fingerprint(matched),
            })
            .collect()
    }

    /// Derive row events from the previous and current flat projection:
    /// trim the common prefix and suffix by match identity, report the
    /// middle as one removal plus one insertion, then report fingerprint
    /// changes on the surviving rows.
    fn emit_row_diff(&mut self, old: &[SnapshotRow]) {
        let Self {
            snapshot, events, ..
        } = self;
        let new = snapshot.as_slice();

        let mut prefix = 0;
        while prefix < old.len() && prefix < new.len() && old[prefix].id == new[prefix].id {
            prefix += 1;
        }
        let mut suffix = 0;
        while suffix < old.len() - prefix
            && suffix < new.len() - prefix
            && old[old.len() - 1 - suffix].id == new[new.len() - 1 - suffix].id
        {
            suffix += 1;
        }

        let removed = old.len() - prefix - suffix;
        if removed > 0 {
            events.emit(ModelEvent::RowsAboutToBeRemoved {
                first: prefix,
                last: prefix + removed - 1,
            });
            events.emit(ModelEvent::RowsRemoved {
                first: prefix,
                last: prefix + removed - 1,
            });
        }

        let inserted = new.len() - prefix - suffix;
        if inserted > 0 {
            events.emit(ModelEvent::RowsAboutToBeInserted {
                first: prefix,
                last: prefix + inserted - 1,
            });
            events.emit(ModelEvent::RowsInserted {
                first: prefix,
                last: prefix + inserted - 1,
            });
        }

        let mut changed: Option<(usize, usize)> = None;
        let mut note = |row: usize| {
            changed = Some(match changed {
                Some((first, last)) => (first.min(row), last.max(row)),
                None => (row, row),
            });
        };
        for row in 0..prefix {
            if old[row].fingerprint != new[row].fingerprint {
                note(row);
            }
        }
        for offset in 0..suffix {
            let old_row = old.len() - 1 - offset;
            let new_row = new.len() - 1 - offset;
            if old[old_row].fingerprint != new[new_row].fingerprint {
                note(new_row);
            }
        }
        if let Some((first, last)) = changed {
            events.emit(ModelEvent::DataChanged { first, last });
        }
    }
}

fn fingerprint(matched: &SearchMatch) -> u64 {
    let mut hasher = DefaultHasher::new();
    matched.text.hash(&mut hasher);
    matched.subtext.hash(&mut hasher);
    matched.icon.hash(&mut hasher);
    matched.category.hash(&mut hasher);
    matched.match_type.hash(&mut hasher);
    matched.relevance.to_bits().hash(&mut hasher);
    matched.enabled.hash(&mut hasher);
    matched.multi_line.hash(&mut hasher);
    for action in &matched.actions {
        action.id.hash(&mut hasher);
        action.label.hash(&mut hasher);
        action.icon.hash(&mut hasher);
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_provider_api::ProviderRegistry;

    fn model_with(matches: Vec<SearchMatch>) -> ResultsModel {
        let mut model = ResultsModel::new(ProviderRegistry::empty());
        model.set_query_string("x");
        let generation = model.generation();
        model.apply(ResultBatch {
            generation,
            matches,
            complete: true,
        });
        model
    }

    fn matched(id: &str, category: &str, text: &str) -> SearchMatch {
        SearchMatch::new(id, "test", text)
            .with_category(category)
            .with_relevance(0.5)
    }

    #[test]
    fn rows_map_back_to_matches_and_never_to_categories() {
        let model = model_with(vec![
            matched("a", "Apps", "alpha"),
            matched("b", "Apps", "beta"),
            matched("c", "Files", "gamma"),
        ]);

        assert_eq!(model.row_count(), 3);
        for row in 0..model.row_count() {
            let m = model.match_at(row).expect("row maps to a match");
            assert!(!m.category.is_empty());
        }
        assert!(model.match_at(3).is_none());
    }

    #[test]
    fn unmapped_rows_answer_with_failure_not_panic() {
        let model = model_with(vec![matched("a", "Apps", "alpha")]);
        assert!(!model.run(99));
        assert!(!model.run_action(99, 0));
        assert!(model.payload(99).is_none());
        assert!(!model.is_duplicate(99));
    }

    #[test]
    fn run_without_a_registered_provider_fails_gracefully() {
        let model = model_with(vec![matched("a", "Apps", "alpha")]);
        assert!(!model.run(0));
    }

    #[test]
    fn out_of_range_action_index_fails() {
        let model = model_with(vec![matched("a", "Apps", "alpha")]);
        assert!(!model.run_action(0, 0), "match has no actions");
    }

    #[test]
    fn growing_batch_emits_insert_events() {
        let mut model = ResultsModel::new(ProviderRegistry::empty());
        let rx = model.subscribe();
        model.set_query_string("x");
        let generation = model.generation();
        model.apply(ResultBatch {
            generation,
            matches: vec![matched("a", "Apps", "alpha"), matched("b", "Apps", "beta")],
            complete: true,
        });

        let events: Vec<ModelEvent> = rx.try_iter().collect();
        assert!(events.contains(&ModelEvent::QueryStringChanged("x".to_owned())));
        assert!(events.contains(&ModelEvent::QueryingChanged(true)));
        assert!(events.contains(&ModelEvent::RowsAboutToBeInserted { first: 0, last: 1 }));
        assert!(events.contains(&ModelEvent::RowsInserted { first: 0, last: 1 }));
        assert!(events.contains(&ModelEvent::QueryingChanged(false)));
    }

    #[test]
    fn shrinking_batch_emits_remove_events() {
        let mut model = model_with(vec![
            matched("a", "Apps", "alpha").with_relevance(0.9),
            matched("b", "Apps", "beta").with_relevance(0.4),
        ]);
        let rx = model.subscribe();
        let generation = model.generation();
        model.apply(ResultBatch {
            generation,
            matches: vec![matched("a", "Apps", "alpha").with_relevance(0.9)],
            complete: true,
        });

        let events: Vec<ModelEvent> = rx.try_iter().collect();
        assert!(events.contains(&ModelEvent::RowsAboutToBeRemoved { first: 1, last: 1 }));
        assert!(events.contains(&ModelEvent::RowsRemoved { first: 1, last: 1 }));
        assert_eq!(model.row_count(), 1);
    }

    #[test]
    fn in_place_change_emits_data_changed() {
        let mut model = model_with(vec![
            matched("a", "Apps", "alpha").with_relevance(0.9),
            matched("b", "Apps", "beta").with_relevance(0.4),
        ]);
        let rx = model.subscribe();
        let generation = model.generation();
        model.apply(ResultBatch {
            generation,
            matches: vec![
                matched("a", "Apps", "alpha").with_relevance(0.9),
                matched("b", "Apps", "beta")
                    .with_relevance(0.4)
                    .with_subtext("updated"),
            ],
            complete: true,
        });

        let events: Vec<ModelEvent> = rx.try_iter().collect();
        assert!(events.contains(&ModelEvent::DataChanged { first: 1, last: 1 }));
        assert!(!events
            .iter()
            .any(|e| matches!(e, ModelEvent::RowsInserted { .. })));
    }

    #[test]
    fn clear_resets_the_model() {
        let mut model = model_with(vec![matched("a", "Apps", "alpha")]);
        let rx = model.subscribe();
        model.clear();

        assert_eq!(model.row_count(), 0);
        assert!(!model.querying());
        let events: Vec<ModelEvent> = rx.try_iter().collect();
        assert!(events.contains(&ModelEvent::Reset));
    }

    #[test]
    fn unknown_active_provider_falls_back_to_all() {
        let mut model = ResultsModel::new(ProviderRegistry::empty());
        model.set_active_provider("does-not-exist");
        assert_eq!(model.active_provider(), None);
        assert_eq!(model.active_provider_name(), None);
        assert_eq!(model.active_provider_icon(), None);
    }

    #[test]
    fn limit_change_is_observable_and_applied() {
        let mut model = model_with(
            (0..10)
                .map(|i| matched(&format!("a{i}"), "Apps", &format!("alpha {i}")))
                .collect(),
        );
        let rx = model.subscribe();
        model.set_limit(4);

        assert_eq!(model.limit(), 4);
        assert_eq!(model.row_count(), 4);
        let events: Vec<ModelEvent> = rx.try_iter().collect();
        assert!(events.contains(&ModelEvent::LimitChanged(4)));

        model.reset_limit();
        assert_eq!(model.limit(), 0);
        assert_eq!(model.row_count(), 10);
    }
}
