use std::cmp::Ordering;

use crate::source::ResultsSource;

/// Approximate float equality tolerant of accumulated rounding noise in
/// provider-supplied relevance scores.
pub(crate) fn fuzzy_eq(a: f64, b: f64) -> bool {
    (a - b).abs() * 1e12 <= a.abs().min(b.abs())
}

/// Relevance/type sort stage.
///
/// Produces a view over the source tree where categories are ordered among
/// themselves and matches within each category are ordered among
/// themselves, by descending priority. The view is a pair of index
/// vectors; the underlying matches are never moved.
#[derive(Default)]
pub(crate) struct SortStage {
    words: Vec<String>,
    categories: Vec<usize>,
    matches: Vec<Vec<usize>>,
}

impl SortStage {
    /// Update the query words the category boost is computed from.
    /// Returns `true` when the words changed, which invalidates the order.
    pub(crate) fn set_query(&mut self, query: &str) -> bool {
        let words: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        if words == self.words {
            return false;
        }
        self.words = words;
        true
    }

    /// Re-derive the category and match orders from the current tree.
    pub(crate) fn refresh(&mut self, source: &ResultsSource) {
        let mut order: Vec<usize> = (0..source.category_count()).collect();
        order.sort_by(|&a, &b| self.compare_categories(source, a, b));

        self.matches = order
            .iter()
            .map(|&category| {
                let mut rows: Vec<usize> = (0..source.match_count(category)).collect();
                rows.sort_by(|&a, &b| Self::compare_matches(source, category, a, b));
                rows
            })
            .collect();
        self.categories = order;
    }

    #[must_use]
    pub(crate) fn category_count(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub(crate) fn match_count(&self, category: usize) -> usize {
        self.matches.get(category).map_or(0, Vec::len)
    }

    /// Map a sorted category position to its source position.
    #[must_use]
    pub(crate) fn source_category(&self, category: usize) -> Option<usize> {
        self.categories.get(category).copied()
    }

    /// Map a sorted match position to its source row within the category.
    #[must_use]
    pub(crate) fn source_row(&self, category: usize, row: usize) -> Option<usize> {
        self.matches.get(category)?.get(row).copied()
    }

    /// `true` when the category contains at least one match whose display
    /// text contains every word of the current query.
    fn category_has_match_with_all_words(&self, source: &ResultsSource, category: usize) -> bool {
        (0..source.match_count(category)).any(|row| {
            let Some(matched) = source.match_at(category, row) else {
                return false;
            };
            let display = matched.text.to_lowercase();
            self.words.iter().all(|word| display.contains(word.as_str()))
        })
    }

    /// Descending composite order for sibling categories: query-word boost
    /// first, then type, then relevance under [`fuzzy_eq`], then the
    /// default descending lexical fallback. `Less` means `a` ranks above.
    fn compare_categories(&self, source: &ResultsSource, a: usize, b: usize) -> Ordering {
        let boost_a = self.category_has_match_with_all_words(source, a);
        let boost_b = self.category_has_match_with_all_words(source, b);
        if boost_a != boost_b {
            return if boost_a {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }

        let by_type = source.category_type(b).cmp(&source.category_type(a));
        if by_type != Ordering::Equal {
            return by_type;
        }

        let relevance_a = source.category_relevance(a);
        let relevance_b = source.category_relevance(b);
        if !fuzzy_eq(relevance_a, relevance_b) {
            return relevance_b
                .partial_cmp(&relevance_a)
                .unwrap_or(Ordering::Equal);
        }

        let label_a = source.category_label(a).unwrap_or_default();
        let label_b = source.category_label(b).unwrap_or_default();
        label_b.cmp(label_a)
    }

    /// Same composite as [`Self::compare_categories`] minus the boost,
    /// which only applies to top-level siblings.
    fn compare_matches(source: &ResultsSource, category: usize, a: usize, b: usize) -> Ordering {
        let (Some(match_a), Some(match_b)) = (
            source.match_at(category, a),
            source.match_at(category, b),
        ) else {
            return Ordering::Equal;
        };

        let by_type = match_b.match_type.cmp(&match_a.match_type);
        if by_type != Ordering::Equal {
            return by_type;
        }

        if !fuzzy_eq(match_a.relevance, match_b.relevance) {
            return match_b
                .relevance
                .partial_cmp(&match_a.relevance)
                .unwrap_or(Ordering::Equal);
        }

        match_b.text.cmp(&match_a.text)
    }
}
