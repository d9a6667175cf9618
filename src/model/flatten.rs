use super::NodePos;

/// Flattening stage.
///
/// Collapses the two-level visible tree into a single sequence, each
/// category followed by its visible matches, preserving the order
/// established upstream. Purely structural: category nodes are kept here
/// and removed by the root-level filter that follows.
#[derive(Default)]
pub(crate) struct FlattenStage {
    nodes: Vec<NodePos>,
}

impl FlattenStage {
    /// Rebuild the flat sequence from the sorted categories and their
    /// per-category visible counts.
    pub(crate) fn refresh(&mut self, visible: &[usize]) {
        self.nodes.clear();
        for (category, &count) in visible.iter().enumerate() {
            self.nodes.push(NodePos::Category(category));
            for row in 0..count {
                self.nodes.push(NodePos::Match { category, row });
            }
        }
    }

    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Map a flat row to its position in the upstream tree.
    #[must_use]
    pub(crate) fn node(&self, row: usize) -> Option<NodePos> {
        self.nodes.get(row).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_precede_their_matches_in_upstream_order() {
        let mut stage = FlattenStage::default();
        stage.refresh(&[2, 0, 1]);

        let nodes: Vec<NodePos> = (0..stage.len()).filter_map(|r| stage.node(r)).collect();
        assert_eq!(
            nodes,
            vec![
                NodePos::Category(0),
                NodePos::Match {
                    category: 0,
                    row: 0
                },
                NodePos::Match {
                    category: 0,
                    row: 1
                },
                NodePos::Category(1),
                NodePos::Category(2),
                NodePos::Match {
                    category: 2,
                    row: 0
                },
            ]
        );
        assert!(stage.node(6).is_none());
    }

    #[test]
    fn empty_tree_flattens_to_nothing() {
        let mut stage = FlattenStage::default();
        stage.refresh(&[]);
        assert_eq!(stage.len(), 0);
    }
}
