// src/bsp/bsp_level.rs

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info, trace, warn};
use parking_lot::RwLock;

use crate::bsp::{
    choose_partition, classify, side_of, split_seg, BspNode, BspTree, InnerNode, Leaf, LeafSide, NodeId, Seg,
    SegArena, SegHandle, SegPosition, SplitMethod, SplitResult,
};
use crate::config::BuildConfig;
use crate::errors::{BuildError, ConfigError};

/// Cooperative cancellation flag, checked once per tree level.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Builds one [`BspTree`] by a single top-down recursive pass.
///
/// The builder owns the segment arena while it recurses. Segments live in
/// the arena once; levels pass lists of handles, and split pieces are
/// appended to the arena as they are made.
pub struct BspBuilder {
    config: BuildConfig,
    arena: SegArena,
    trace: Vec<SegHandle>,
    next_id: usize,
    splits: usize,
    cancel: Option<CancelToken>,
}

impl BspBuilder {
    pub fn new(config: BuildConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(BspBuilder {
            config,
            arena: SegArena::new(),
            trace: Vec::new(),
            next_id: 0,
            splits: 0,
            cancel: None,
        })
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn build(mut self, segs: Vec<Seg>) -> Result<BspTree, BuildError> {
        let input_count = segs.len();
        let mut unnormalized = 0;

        self.arena = SegArena::with_capacity(input_count * 2);
        let mut handles = Vec::with_capacity(input_count);
        for seg in segs {
            if !seg.is_finite() {
                return Err(BuildError::InvalidCoordinate { id: seg.id });
            }
            if !seg.is_normalized() {
                unnormalized += 1;
            }
            handles.push(self.arena.push(seg));
        }
        if unnormalized > 0 {
            warn!(
                "{} of {} input segments have start > end; sidedness follows their given direction",
                unnormalized, input_count
            );
        }

        info!(
            "Building BSP over {} segments (max_depth={}, min_segments={}, method={})",
            input_count, self.config.max_depth, self.config.min_segments, self.config.method
        );

        let root = self.build_node(handles, 0, LeafSide::Root)?;
        let tree = BspTree::new(self.arena, root, self.trace, input_count, self.splits);

        let stats = tree.stats();
        info!(
            "BSP built: {} nodes, {} leaves, depth {}, {} splits ({} segments total)",
            stats.nodes, stats.leaves, stats.max_depth, stats.splits, stats.total_segments
        );
        Ok(tree)
    }

    fn build_node(&mut self, mut segs: Vec<SegHandle>, depth: usize, side: LeafSide) -> Result<BspNode, BuildError> {
        if self.cancel.as_ref().is_some_and(|t| t.is_cancelled()) {
            return Err(BuildError::Cancelled { depth });
        }

        let id = NodeId(self.next_id);
        self.next_id += 1;

        if segs.len() <= self.config.min_segments || depth >= self.config.max_depth {
            return Ok(BspNode::Leaf(Leaf { id, side, depth, segs }));
        }

        let Some(choice) = choose_partition(self.config.method, &self.arena, &segs) else {
            return Ok(BspNode::Leaf(Leaf { id, side, depth, segs }));
        };
        let partition = segs.remove(choice.index);
        self.trace.push(partition);
        debug!(
            "depth {}: partition `{}` chosen from {} candidates (cost {:?})",
            depth,
            self.arena[partition].id,
            segs.len() + 1,
            choice.cost.map(|c| c.score())
        );

        let (front_segs, back_segs) = self.partition_segs(partition, segs);

        let front = self.build_node(front_segs.clone(), depth + 1, LeafSide::Front)?;
        let back = self.build_node(back_segs.clone(), depth + 1, LeafSide::Back)?;

        Ok(BspNode::Node(InnerNode {
            id,
            depth,
            partition,
            front_segs,
            back_segs,
            front: Box::new(front),
            back: Box::new(back),
        }))
    }

    /// Distribute `segs` (the partition already removed) to the two sides,
    /// splitting the ones that cross the partition line.
    fn partition_segs(&mut self, partition: SegHandle, segs: Vec<SegHandle>) -> (Vec<SegHandle>, Vec<SegHandle>) {
        let mut front = Vec::with_capacity(segs.len());
        let mut back = Vec::with_capacity(segs.len());

        for handle in segs {
            match classify(&self.arena[handle], &self.arena[partition]) {
                SegPosition::Front => front.push(handle),
                SegPosition::Back => back.push(handle),
                SegPosition::Split => match split_seg(&self.arena[handle], &self.arena[partition]) {
                    SplitResult::Pieces { front: f, back: b } => {
                        trace!("split `{}` into `{}` and `{}`", self.arena[handle].id, f.id, b.id);
                        self.splits += 1;
                        front.push(self.arena.push(f));
                        back.push(self.arena.push(b));
                    }
                    SplitResult::Unsplit => {
                        let routed = route_unsplit(&self.arena[handle], &self.arena[partition]);
                        warn!(
                            "split of `{}` by `{}` degenerated; kept whole on the {:?} side",
                            self.arena[handle].id, self.arena[partition].id, routed
                        );
                        match routed {
                            SegPosition::Back => back.push(handle),
                            _ => front.push(handle),
                        }
                    }
                },
            }
        }
        (front, back)
    }
}

/// Side for a segment whose split degenerated (parallel or touching an
/// endpoint). Never returns `Split`: a segment the classifier still reports
/// as crossing goes to the side holding the larger share of its endpoints'
/// signed distance.
pub fn route_unsplit(seg: &Seg, partition: &Seg) -> SegPosition {
    match classify(seg, partition) {
        SegPosition::Split => {
            let net = side_of(&seg.start, partition) + side_of(&seg.end, partition);
            if net >= 0.0 {
                SegPosition::Front
            } else {
                SegPosition::Back
            }
        }
        settled => settled,
    }
}

/// Build a tree in one call. The method name is checked before anything
/// else runs.
pub fn build(segs: Vec<Seg>, max_depth: usize, min_segments: usize, method: &str) -> Result<BspTree, BuildError> {
    let method: SplitMethod = method.parse()?;
    BspBuilder::new(BuildConfig::new(max_depth, min_segments, method))?.build(segs)
}

/// Holds a level's segments and the most recently built tree.
///
/// Readers take an `Arc` to the current tree and keep using it even while
/// another build replaces it.
pub struct BspLevel {
    segs: Arc<Vec<Seg>>,
    config: BuildConfig,
    root: Arc<RwLock<Option<Arc<BspTree>>>>,
    cancel: CancelToken,
}

impl BspLevel {
    pub fn new(segs: Vec<Seg>, config: BuildConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(BspLevel {
            segs: Arc::new(segs),
            config,
            root: Arc::new(RwLock::new(None)),
            cancel: CancelToken::new(),
        })
    }

    pub fn build(&self) -> Result<Arc<BspTree>, BuildError> {
        let builder = BspBuilder::new(self.config)?.with_cancel(self.cancel.clone());
        let tree = Arc::new(builder.build(self.segs.as_ref().clone())?);
        *self.root.write() = Some(Arc::clone(&tree));
        Ok(tree)
    }

    pub fn tree(&self) -> Option<Arc<BspTree>> {
        self.root.read().clone()
    }

    pub fn segs(&self) -> &[Seg] {
        &self.segs
    }

    pub fn config(&self) -> BuildConfig {
        self.config
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }
}
