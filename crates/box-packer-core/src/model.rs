use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::BoxPackerError;

/// Width/height pair of an item or container, in grid cells.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
    /// Same size turned by 90°.
    pub fn rotated(&self) -> Self {
        Self::new(self.height, self.width)
    }
    /// True if either side is zero; such sizes can never be placed.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
    pub fn fits_within(&self, container: Size) -> bool {
        self.width <= container.width && self.height <= container.height
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

/// Parses `"WxH"` (the separator is case-insensitive).
impl FromStr for Size {
    type Err = BoxPackerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let (w, h) = lower
            .split_once('x')
            .ok_or_else(|| BoxPackerError::InvalidSize(format!("expected WxH, got '{s}'")))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|e| BoxPackerError::InvalidSize(format!("'{s}': {e}")))
        };
        Ok(Self::new(parse(w)?, parse(h)?))
    }
}

/// Axis-aligned rectangle (cells). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Exclusive right edge (`x + w`).
    pub fn right(&self) -> u32 {
        self.x + self.w
    }
    /// Exclusive bottom edge (`y + h`).
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }
    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }
    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }
    /// True if the interiors of `self` and `other` intersect.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
    /// Returns true if `r` is fully inside `self`.
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.right() <= self.right() && r.bottom() <= self.bottom()
    }
}

/// One placed item of a reported solution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Placement {
    /// Insertion index of the item, as returned by `BoxPacker::insert`.
    pub index: usize,
    /// Placed rectangle within the container (post-rotation width/height).
    pub rect: Rect,
}

/// Statistics about one `pack` run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct PackStats {
    /// Container area (width * height).
    pub container_area: u64,
    /// Sum of the areas of every placeable item.
    pub item_area: u64,
    /// Number of placeable item instances.
    pub item_count: usize,
    /// Number of times the solution callback was invoked.
    pub solutions_reported: usize,
    /// Number of reported solutions that placed every item.
    pub full_solutions: usize,
    /// Largest packed area reached.
    pub best_area: u64,
    /// Iterations of the search loop.
    pub iterations: u64,
    /// True if the callback asked the search to stop.
    pub stopped_early: bool,
}

impl PackStats {
    /// best_area / container_area (0.0 to 1.0).
    pub fn occupancy(&self) -> f64 {
        if self.container_area > 0 {
            self.best_area as f64 / self.container_area as f64
        } else {
            0.0
        }
    }

    /// Cells of the container left empty by the best packing.
    pub fn wasted_area(&self) -> u64 {
        self.container_area.saturating_sub(self.best_area)
    }

    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Items: {}, Solutions: {} ({} full), Best Area: {} / {} ({:.2}%), Iterations: {}{}",
            self.item_count,
            self.solutions_reported,
            self.full_solutions,
            self.best_area,
            self.container_area,
            self.occupancy() * 100.0,
            self.iterations,
            if self.stopped_early { ", stopped early" } else { "" },
        )
    }
}
