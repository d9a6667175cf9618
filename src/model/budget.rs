/// Category budget stage.
///
/// Distributes a global `limit` across sibling categories that are already
/// sorted best-first. Each category may claim a progressively smaller
/// share the further down it sits (the first at most half the limit, the
/// second a third, and so on), with at least one match shown per
/// non-empty category. A limit of 0 means unlimited.
///
/// The decision is global: shifting one category's count changes every
/// later category's budget, so the whole vector is recomputed on any
/// structural change upstream.
#[derive(Default)]
pub(crate) struct BudgetStage {
    limit: usize,
    visible: Vec<usize>,
}

impl BudgetStage {
    #[must_use]
    pub(crate) fn limit(&self) -> usize {
        self.limit
    }

    /// Returns `true` when the limit changed and visibility must be
    /// recomputed.
    pub(crate) fn set_limit(&mut self, limit: usize) -> bool {
        if self.limit == limit {
            return false;
        }
        self.limit = limit;
        true
    }

    /// Recompute visible counts for categories holding `counts` matches,
    /// in their current sorted order.
    pub(crate) fn refresh(&mut self, counts: &[usize]) {
        self.visible = distribute(self.limit, counts);
    }

    /// Number of matches the category at sorted position `category` may
    /// show.
    #[must_use]
    pub(crate) fn visible_count(&self, category: usize) -> usize {
        self.visible.get(category).copied().unwrap_or(0)
    }
}

/// The distribution arithmetic. The rounding choices decide which
/// borderline matches are shown, so keep the `f64` ceils and the signed
/// intermediate space intact.
fn distribute(limit: usize, counts: &[usize]) -> Vec<usize> {
    if limit == 0 {
        return counts.to_vec();
    }
    if counts.len() <= 1 {
        return counts.iter().map(|&count| count.min(limit)).collect();
    }

    let category_count = counts.len();
    // Every category gets at least one item, so keep that much space
    // reserved for the ones not processed yet.
    let reserved = ceil_div(limit, category_count);
    let mut visible = Vec::with_capacity(category_count);
    let mut items_before: i64 = 0;

    for (position, &count) in counts.iter().enumerate() {
        let available_space = limit as i64 - items_before - reserved;
        let share = ceil_div(limit, position + 2);
        let max_items = available_space.min(share).max(1);
        let shown = (count as i64).min(max_items).max(0);
        visible.push(shown as usize);
        items_before += shown;
    }

    visible
}

fn ceil_div(limit: usize, divisor: usize) -> i64 {
    (limit as f64 / divisor as f64).ceil() as i64
}
