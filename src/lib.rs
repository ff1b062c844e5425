// src/lib.rs

pub mod bsp;
pub mod config;
pub mod errors;
pub mod map;
pub mod utils;

pub use bsp::{build, BspBuilder, BspLevel, BspNode, BspTree, Point2D, Seg, SplitMethod};
pub use config::BuildConfig;
pub use errors::{BuildError, ConfigError, SourceError};
