//! Display coordinates for drawing a built tree.
//!
//! Leaves take consecutive columns from left (front) to right (back) and
//! every node sits halfway between its two children. `y` is the depth, so the
//! root is at the top. Each recursive call returns its own positions and
//! width; the parent shifts the back subtree right by the front width. The
//! tree itself is only read.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::bsp::{BspNode, BspTree, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutPos {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TreeLayout {
    pub positions: BTreeMap<NodeId, LayoutPos>,
    /// Number of leaf columns.
    pub width: usize,
}

impl TreeLayout {
    pub fn get(&self, id: NodeId) -> Option<LayoutPos> {
        self.positions.get(&id).copied()
    }
}

// Positions relative to the subtree's own left edge.
struct SubtreeLayout {
    width: usize,
    x: f64,
    positions: Vec<(NodeId, LayoutPos)>,
}

fn layout_subtree(node: &BspNode) -> SubtreeLayout {
    let y = node.depth() as f64;
    match node {
        BspNode::Leaf(leaf) => SubtreeLayout {
            width: 1,
            x: 0.0,
            positions: vec![(leaf.id, LayoutPos { x: 0.0, y })],
        },
        BspNode::Node(inner) => {
            let front = layout_subtree(&inner.front);
            let back = layout_subtree(&inner.back);

            let shift = front.width as f64;
            let x = (front.x + back.x + shift) / 2.0;

            let mut positions = Vec::with_capacity(front.positions.len() + back.positions.len() + 1);
            positions.push((inner.id, LayoutPos { x, y }));
            positions.extend(front.positions);
            positions.extend(
                back.positions
                    .into_iter()
                    .map(|(id, p)| (id, LayoutPos { x: p.x + shift, y: p.y })),
            );

            SubtreeLayout {
                width: front.width + back.width,
                x,
                positions,
            }
        }
    }
}

/// Map every node and leaf of `tree` to a display position.
pub fn layout_tree(tree: &BspTree) -> TreeLayout {
    let subtree = layout_subtree(tree.root());
    TreeLayout {
        positions: subtree.positions.into_iter().collect(),
        width: subtree.width,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsp::{build, Point2D, Seg};

    fn wall(x1: f64, y1: f64, x2: f64, y2: f64, i: usize) -> Seg {
        Seg::normalized(Point2D::new(x1, y1), Point2D::new(x2, y2), i.to_string(), i)
    }

    #[test]
    fn test_single_leaf() {
        let tree = build(vec![wall(0.0, 0.0, 1.0, 0.0, 0)], 20, 5, "score").unwrap();
        let layout = layout_tree(&tree);
        assert_eq!(layout.width, 1);
        assert_eq!(layout.get(NodeId(0)), Some(LayoutPos { x: 0.0, y: 0.0 }));
    }

    #[test]
    fn test_node_centered_over_children() {
        let segs = vec![
            wall(10.0, 0.0, 10.0, 10.0, 0),
            wall(0.0, 0.0, 0.0, 10.0, 1),
            wall(20.0, 0.0, 20.0, 10.0, 2),
        ];
        let tree = build(segs, 20, 1, "simple").unwrap();
        let layout = layout_tree(&tree);

        assert_eq!(layout.width, 2);
        assert_eq!(layout.positions.len(), 3);
        assert_eq!(layout.get(NodeId(1)), Some(LayoutPos { x: 0.0, y: 1.0 }));
        assert_eq!(layout.get(NodeId(2)), Some(LayoutPos { x: 1.0, y: 1.0 }));
        assert_eq!(layout.get(NodeId(0)), Some(LayoutPos { x: 0.5, y: 0.0 }));
    }

    #[test]
    fn test_every_node_positioned_once() {
        let segs: Vec<Seg> = (0..12)
            .map(|i| {
                let a = i as f64 * 0.5;
                wall(a.cos() * 10.0, a.sin() * 10.0, (a + 1.0).cos() * 10.0, (a + 1.0).sin() * 10.0, i)
            })
            .collect();
        let tree = build(segs, 20, 1, "score").unwrap();
        let layout = layout_tree(&tree);
        let stats = tree.stats();

        assert_eq!(layout.positions.len(), stats.nodes + stats.leaves);
        assert_eq!(layout.width, stats.leaves);

        let mut leaf_columns: Vec<f64> = tree
            .leaves()
            .iter()
            .filter_map(|leaf| layout.get(leaf.id).map(|p| p.x))
            .collect();
        let expected: Vec<f64> = (0..stats.leaves).map(|i| i as f64).collect();
        assert_eq!(leaf_columns, expected);
        leaf_columns.dedup();
        assert_eq!(leaf_columns.len(), stats.leaves);
    }
}
