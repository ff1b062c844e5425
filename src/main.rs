//! # rust_bsp command line
//!
//! Loads wall segments from a text file, optionally merges collinear walls,
//! builds a BSP tree and prints a summary: tree statistics, the partitions in
//! the order they were chosen, and (with `--locate`) the leaf containing a
//! point. `RUST_LOG=debug` shows each partition as it is picked.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use log::{error, info};
use serde::Serialize;

use rust_bsp::bsp::{layout_tree, BspTree, LeafSide, NodeId, TreeLayout, TreeStats};
use rust_bsp::map::{load_segments, merge::DEFAULT_MERGE_EPSILON, merge_collinear, save_segments};
use rust_bsp::{BspBuilder, BuildConfig, Point2D, Seg};

#[derive(Parser, Debug)]
#[command(name = "rust_bsp", about = "Build a 2D BSP tree from wall segments")]
struct Cli {
    /// Segment file, one `x1 y1 x2 y2 [label]` per line.
    input: PathBuf,
    /// JSON build config; the flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    max_depth: Option<usize>,
    #[arg(long)]
    min_segments: Option<usize>,
    /// Partition method: `simple` or `score`.
    #[arg(long)]
    method: Option<String>,
    /// Merge overlapping collinear walls before building.
    #[arg(long)]
    merge: bool,
    /// Write the (merged) input segments to this file.
    #[arg(long)]
    write_segments: Option<PathBuf>,
    /// Report the leaf containing this point, given as `X,Y`.
    #[arg(long, value_parser = parse_point)]
    locate: Option<Point2D>,
    /// Include node display positions in the report.
    #[arg(long)]
    layout: bool,
    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
}

fn parse_point(s: &str) -> Result<Point2D, String> {
    let (x, y) = s.split_once(',').ok_or_else(|| format!("expected X,Y, got `{}`", s))?;
    let x = x.trim().parse::<f64>().map_err(|e| e.to_string())?;
    let y = y.trim().parse::<f64>().map_err(|e| e.to_string())?;
    Ok(Point2D::new(x, y))
}

#[derive(Serialize)]
struct LocatedLeaf<'a> {
    point: Point2D,
    leaf: NodeId,
    side: LeafSide,
    depth: usize,
    segments: Vec<&'a Seg>,
}

#[derive(Serialize)]
struct Report<'a> {
    config: BuildConfig,
    stats: TreeStats,
    trace: Vec<&'a Seg>,
    #[serde(skip_serializing_if = "Option::is_none")]
    located: Option<LocatedLeaf<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    layout: Option<TreeLayout>,
}

fn resolve_config(cli: &Cli) -> Result<BuildConfig, Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => BuildConfig::load(path)?,
        None => BuildConfig::default(),
    };
    if let Some(max_depth) = cli.max_depth {
        config.max_depth = max_depth;
    }
    if let Some(min_segments) = cli.min_segments {
        config.min_segments = min_segments;
    }
    if let Some(method) = &cli.method {
        config = config.with_method_name(method)?;
    }
    config.validate()?;
    Ok(config)
}

fn make_report<'a>(tree: &'a BspTree, config: BuildConfig, cli: &Cli) -> Report<'a> {
    let located = cli.locate.map(|point| {
        let leaf = tree.locate(&point);
        LocatedLeaf {
            point,
            leaf: leaf.id,
            side: leaf.side,
            depth: leaf.depth,
            segments: leaf.segs.iter().map(|&h| tree.seg(h)).collect(),
        }
    });

    Report {
        config,
        stats: tree.stats(),
        trace: tree.trace_segs().collect(),
        located,
        layout: cli.layout.then(|| layout_tree(tree)),
    }
}

fn print_text(report: &Report) {
    let s = &report.stats;
    println!(
        "method={} max_depth={} min_segments={}",
        report.config.method, report.config.max_depth, report.config.min_segments
    );
    println!(
        "{} input segments, {} splits, {} nodes, {} leaves ({} empty), depth {}",
        s.input_segments, s.splits, s.nodes, s.leaves, s.empty_leaves, s.max_depth
    );
    println!("partitions:");
    for (i, seg) in report.trace.iter().enumerate() {
        println!(
            "  {:>4}  #{}  ({:.1}, {:.1}) -> ({:.1}, {:.1})",
            i, seg.id, seg.start.x, seg.start.y, seg.end.x, seg.end.y
        );
    }
    if let Some(located) = &report.located {
        println!(
            "({}, {}) is in leaf {} ({:?}, depth {}) with {} segments:",
            located.point.x,
            located.point.y,
            located.leaf.0,
            located.side,
            located.depth,
            located.segments.len()
        );
        for seg in &located.segments {
            println!("  #{}: ({}, {}) -> ({}, {})", seg.id, seg.start.x, seg.start.y, seg.end.x, seg.end.y);
        }
    }
    if let Some(layout) = &report.layout {
        println!("layout ({} columns):", layout.width);
        for (id, pos) in &layout.positions {
            println!("  node {:>4}: x={:.1} y={:.0}", id.0, pos.x, pos.y);
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    // Fail on a bad method before reading any geometry.
    let config = resolve_config(&cli)?;

    let mut segs = load_segments(&cli.input)?;
    if cli.merge {
        segs = merge_collinear(&segs, DEFAULT_MERGE_EPSILON);
    }
    if let Some(path) = &cli.write_segments {
        save_segments(path, &segs)?;
        info!("Wrote {} segments to {}", segs.len(), path.display());
    }

    let tree = BspBuilder::new(config)?.build(segs)?;
    let report = make_report(&tree, config, &cli);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_text(&report);
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging.
    env_logger::init();
    info!("rust_bsp starting...");

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{}", e);
        return Err(e);
    }
    Ok(())
}
