// src/bsp/bsp_tree.rs

use rayon::prelude::*;
use serde::Serialize;

use crate::bsp::{side_of, BoundingBox, BspNode, Leaf, NodeId, Point2D, Seg, SegArena, SegHandle};

/// A finished BSP tree together with the arena its handles point into.
///
/// The tree is never mutated after [`BspBuilder::build`](crate::bsp::BspBuilder::build)
/// returns, so it can be shared across threads behind an `Arc`.
#[derive(Debug, Clone)]
pub struct BspTree {
    arena: SegArena,
    root: BspNode,
    trace: Vec<SegHandle>,
    input_count: usize,
    splits: usize,
}

/// Summary numbers for logging and reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    pub input_segments: usize,
    pub total_segments: usize,
    pub splits: usize,
    pub nodes: usize,
    pub leaves: usize,
    pub empty_leaves: usize,
    pub leaf_segments: usize,
    pub max_depth: usize,
}

impl BspTree {
    pub(crate) fn new(arena: SegArena, root: BspNode, trace: Vec<SegHandle>, input_count: usize, splits: usize) -> Self {
        BspTree {
            arena,
            root,
            trace,
            input_count,
            splits,
        }
    }

    pub fn root(&self) -> &BspNode {
        &self.root
    }

    pub fn seg(&self, handle: SegHandle) -> &Seg {
        &self.arena[handle]
    }

    pub fn arena(&self) -> &SegArena {
        &self.arena
    }

    pub fn input_count(&self) -> usize {
        self.input_count
    }

    /// Input segments, in their original order.
    pub fn inputs(&self) -> impl Iterator<Item = &Seg> {
        self.arena.iter().take(self.input_count).map(|(_, seg)| seg)
    }

    pub fn split_count(&self) -> usize {
        self.splits
    }

    /// Partitions in the order they were chosen (pre-order over the tree).
    pub fn trace(&self) -> &[SegHandle] {
        &self.trace
    }

    pub fn trace_segs(&self) -> impl Iterator<Item = &Seg> {
        self.trace.iter().map(|&h| &self.arena[h])
    }

    pub fn leaves(&self) -> Vec<&Leaf> {
        self.root.leaves()
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_segs(self.inputs())
    }

    /// Find the leaf whose region contains `point`.
    ///
    /// Points exactly on a partition line descend into the front side.
    pub fn locate(&self, point: &Point2D) -> &Leaf {
        let mut node = &self.root;
        loop {
            match node {
                BspNode::Leaf(leaf) => return leaf,
                BspNode::Node(inner) => {
                    node = if side_of(point, &self.arena[inner.partition]) >= 0.0 {
                        &inner.front
                    } else {
                        &inner.back
                    };
                }
            }
        }
    }

    /// [`locate`](Self::locate) for many points at once.
    pub fn locate_many(&self, points: &[Point2D]) -> Vec<NodeId> {
        points.par_iter().map(|p| self.locate(p).id).collect()
    }

    /// Leaves ordered nearest-first as seen from `view`: at every node the
    /// side containing the viewpoint is visited before the other side.
    pub fn front_to_back(&self, view: &Point2D) -> Vec<&Leaf> {
        let mut out = Vec::new();
        self.walk_front_to_back(&self.root, view, &mut out);
        out
    }

    fn walk_front_to_back<'a>(&'a self, node: &'a BspNode, view: &Point2D, out: &mut Vec<&'a Leaf>) {
        match node {
            BspNode::Leaf(leaf) => out.push(leaf),
            BspNode::Node(inner) => {
                let (near, far) = if side_of(view, &self.arena[inner.partition]) >= 0.0 {
                    (&inner.front, &inner.back)
                } else {
                    (&inner.back, &inner.front)
                };
                self.walk_front_to_back(near, view, out);
                self.walk_front_to_back(far, view, out);
            }
        }
    }

    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            input_segments: self.input_count,
            total_segments: self.arena.len(),
            splits: self.splits,
            ..TreeStats::default()
        };
        self.root.visit(&mut |node| {
            stats.max_depth = stats.max_depth.max(node.depth());
            match node {
                BspNode::Node(_) => stats.nodes += 1,
                BspNode::Leaf(leaf) => {
                    stats.leaves += 1;
                    stats.leaf_segments += leaf.segs.len();
                    if leaf.segs.is_empty() {
                        stats.empty_leaves += 1;
                    }
                }
            }
        });
        stats
    }
}
