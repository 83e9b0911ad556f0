//! Exhaustive rectangle packing into a fixed container.
//!
//! - Occupancy: one bit per cell in a padded grid (`mask`), with region test/toggle/scan
//! - Catalog: inserted sizes deduplicated into entries carrying their insertion indices
//! - Search: depth-indexed backtracking over raster positions with a waste budget as the bound
//! - Reports: every full solution and every partial one that improves the packed area goes to a
//!   caller-supplied callback, which can stop the search
//!
//! Quick example:
//! ```
//! use box_packer_core::{BoxPacker, Placement, Size};
//! # fn main() -> box_packer_core::Result<()> {
//! let mut packer = BoxPacker::new(4, 4, false)?;
//! packer.insert_all([Size::new(2, 2); 4]);
//! let mut best: Vec<Placement> = Vec::new();
//! let stats = packer.pack(|placements: &[Placement]| {
//!     best = placements.to_vec();
//!     false
//! });
//! assert_eq!(stats.best_area, 16);
//! assert_eq!(best.len(), 4);
//! # Ok(()) }
//! ```

pub mod candidates;
pub mod catalog;
pub mod config;
pub mod error;
pub mod mask;
pub mod model;
pub mod packer;
pub mod report;
pub mod search;

pub use config::*;
pub use error::*;
pub use model::*;
pub use packer::*;
pub use report::{ContinueSearch, SolutionCallback};

/// Convenience prelude for common types and functions.
/// Importing `box_packer_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{PackerConfig, PackerConfigBuilder};
    pub use crate::model::{PackStats, Placement, Rect, Size};
    pub use crate::packer::BoxPacker;
    pub use crate::report::{ContinueSearch, SolutionCallback};
}
