// src/bsp/mod.rs
pub mod bsp_level;
pub mod bsp_node;
pub mod bsp_select;
pub mod bsp_tree;
pub mod bsp_util;
pub mod layout;

pub use bsp_level::{build, BspBuilder, BspLevel, CancelToken};
pub use bsp_node::{BspNode, InnerNode, Leaf, LeafSide, NodeId};
pub use bsp_select::{choose_partition, PartitionChoice, PartitionCost, SplitMethod};
pub use bsp_tree::{BspTree, TreeStats};
pub use bsp_util::{classify, side_of, split_seg, BoundingBox, Point2D, Seg, SegArena, SegHandle, SplitResult};
pub use layout::{layout_tree, LayoutPos, TreeLayout};

pub const DEFAULT_MAX_DEPTH: usize = 20;
pub const DEFAULT_MIN_SEGMENTS: usize = 10;
pub const BSP_DEPTH_LIMIT: usize = 256; // Keeps recursion well inside the default stack
pub const EPSILON: f64 = 1e-6; // For floating-point comparisons

/// Where a segment lies relative to a partition line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegPosition {
    Front,
    Back,
    Split,
}
