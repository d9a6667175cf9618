use super::NodePos;
use super::flatten::FlattenStage;

/// Root-level filter stage.
///
/// A structural safety net over the flattened sequence: each row is mapped
/// back through the transformation chain to the source tree and kept only
/// if the node it lands on has a valid parent, i.e. it is a match and not
/// a leftover category. Maintains the filtered-row to flat-row index
/// correspondence used for all downstream coordinate translation.
#[derive(Default)]
pub(crate) struct RootFilterStage {
    rows: Vec<usize>,
}

impl RootFilterStage {
    /// Rebuild the kept-row set. `has_parent` resolves a flat node against
    /// the source tree and reports whether it sits below a category.
    pub(crate) fn refresh<F>(&mut self, flatten: &FlattenStage, has_parent: F)
    where
        F: Fn(NodePos) -> bool,
    {
        self.rows.clear();
        for row in 0..flatten.len() {
            if flatten.node(row).is_some_and(&has_parent) {
                self.rows.push(row);
            }
        }
    }

    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    /// Map a filtered row to its row in the flattened sequence.
    #[must_use]
    pub(crate) fn map_to_flat(&self, row: usize) -> Option<usize> {
        self.rows.get(row).copied()
    }
}
