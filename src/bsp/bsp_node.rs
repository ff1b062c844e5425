//! src/bsp/bsp_node.rs

use serde::Serialize;

use crate::bsp::SegHandle;

/// Pre-order index of a node or leaf, assigned during the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

/// Which side of its parent a leaf occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LeafSide {
    Root,
    Front,
    Back,
}

/// A terminal node with the segments that were not subdivided further.
#[derive(Debug, Clone)]
pub struct Leaf {
    pub id: NodeId,
    pub side: LeafSide,
    pub depth: usize,
    pub segs: Vec<SegHandle>,
}

/// An internal node. `front_segs` and `back_segs` are the lists this node
/// computed before recursing, kept for diagnostics.
#[derive(Debug, Clone)]
pub struct InnerNode {
    pub id: NodeId,
    pub depth: usize,
    pub partition: SegHandle,
    pub front_segs: Vec<SegHandle>,
    pub back_segs: Vec<SegHandle>,
    pub front: Box<BspNode>,
    pub back: Box<BspNode>,
}

/// A node in the BSP tree: either a partition with two children or a leaf.
#[derive(Debug, Clone)]
pub enum BspNode {
    Node(InnerNode),
    Leaf(Leaf),
}

impl BspNode {
    pub fn id(&self) -> NodeId {
        match self {
            BspNode::Node(node) => node.id,
            BspNode::Leaf(leaf) => leaf.id,
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            BspNode::Node(node) => node.depth,
            BspNode::Leaf(leaf) => leaf.depth,
        }
    }

    /// Returns `true` if `self` is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, BspNode::Leaf(_))
    }

    /// Visit every node and leaf in pre-order (node, front, back).
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a BspNode)) {
        f(self);
        if let BspNode::Node(node) = self {
            node.front.visit(f);
            node.back.visit(f);
        }
    }

    /// All leaves, front subtree before back subtree.
    pub fn leaves(&self) -> Vec<&Leaf> {
        let mut leaves = Vec::new();
        self.visit(&mut |n| {
            if let BspNode::Leaf(leaf) = n {
                leaves.push(leaf);
            }
        });
        leaves
    }
}
