//! Depth-indexed backtracking over grid positions and candidates.
//!
//! Frame `d` holds the `d`-th placement. Positions are visited in raster order and candidates in
//! search order, so identical input always yields the same sequence of reports. The only pruning
//! bound is the waste budget: a frame whose scan skipped at least that many free cells is
//! abandoned. Every report tightens the budget.

use tracing::{debug, trace};

use crate::candidates::{CandidatePool, SENTINEL};
use crate::catalog::CatalogEntry;
use crate::mask::{Cursor, FreeMask};
use crate::model::{PackStats, Size};
use crate::report::{Reporter, SolutionCallback};

/// One level of the search stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Scan position; the anchor of the placement once one is made.
    pub cursor: Cursor,
    /// Free cells skipped to reach `cursor`.
    pub waste: u64,
    /// Candidate slot last tried here; [`SENTINEL`] before the first try.
    pub candidate: usize,
    /// Insertion index of the placed item.
    pub index: usize,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            cursor: Cursor::default(),
            waste: 0,
            candidate: SENTINEL,
            index: 0,
        }
    }
}

/// State of one search over a normalized catalog.
pub struct Search<'a> {
    entries: &'a [CatalogEntry],
    container: Size,
    mask: FreeMask,
    pool: CandidatePool,
    frames: Vec<Frame>,
    area: u64,
    reporter: Reporter,
}

impl<'a> Search<'a> {
    /// Prepares the grid and the candidates. `entries` must be normalized.
    pub fn new(entries: &'a [CatalogEntry], container: Size, allow_rotation: bool) -> Self {
        let pool = CandidatePool::build(entries, container, allow_rotation);
        let n = pool.item_count();
        Self {
            entries,
            container,
            mask: FreeMask::new(container.width, container.height),
            pool,
            frames: vec![Frame::default(); n],
            area: 0,
            reporter: Reporter::with_capacity(n),
        }
    }

    pub fn mask(&self) -> &FreeMask {
        &self.mask
    }

    pub fn pool(&self) -> &CandidatePool {
        &self.pool
    }

    /// Area covered by the placements currently committed.
    pub fn packed_area(&self) -> u64 {
        self.area
    }

    /// Runs the search to completion, reporting each full solution and each partial solution
    /// that beats the best area seen so far. `waste_limit` is the initial budget.
    ///
    /// Once `callback` returns `true` the budget drops to zero: the search unwinds to the root
    /// undoing its placements, without further reports.
    pub fn run<C>(&mut self, callback: &mut C, waste_limit: u64) -> PackStats
    where
        C: SolutionCallback + ?Sized,
    {
        let mut stats = PackStats {
            container_area: self.container.area(),
            item_area: self.pool.item_area(),
            item_count: self.pool.item_count(),
            ..Default::default()
        };
        let total = self.frames.len();
        if total == 0 {
            debug!("no placeable items");
            return stats;
        }
        debug!(
            container_area = stats.container_area,
            item_area = stats.item_area,
            items = total,
            min_width = self.pool.min_remaining_width(),
            min_height = self.pool.min_remaining_height(),
            "starting search"
        );

        let bed_area = self.container.area();
        let mut min_waste = waste_limit;
        let mut max_area = 0u64;
        let mut stopped = false;
        let mut depth = 0usize;
        self.frames[0] = Frame::default();

        loop {
            stats.iterations += 1;

            if self.frames[depth].candidate != SENTINEL {
                self.undo(depth);
            } else if !self.scan(depth) || self.frames[depth].waste >= min_waste {
                if self.area > max_area && !stopped {
                    stats.solutions_reported += 1;
                    if self.report(depth, callback) {
                        debug!(area = self.area, "stop requested");
                        stopped = true;
                        min_waste = 0;
                    }
                }
                max_area = max_area.max(self.area);
                min_waste = min_waste.min(bed_area - self.area);
                match depth.checked_sub(1) {
                    Some(d) => depth = d,
                    None => break,
                }
                continue;
            }

            // next linked candidate that fits here
            loop {
                let slot = self.pool.next(self.frames[depth].candidate);
                self.frames[depth].candidate = slot;
                if slot == SENTINEL || self.try_place(depth) {
                    break;
                }
            }

            let frame = self.frames[depth];
            if frame.candidate == SENTINEL {
                let f = &mut self.frames[depth];
                f.cursor.advance(1);
                f.waste += 1;
            } else if depth + 1 < total {
                let width = self.pool.get(frame.candidate).size.width;
                depth += 1;
                self.frames[depth] = Frame {
                    cursor: frame.cursor.advanced(width),
                    waste: frame.waste,
                    candidate: SENTINEL,
                    index: 0,
                };
            } else {
                trace!(
                    area = self.area,
                    waste = frame.waste,
                    total = self.area + frame.waste,
                    "full solution"
                );
                stats.full_solutions += 1;
                if !stopped {
                    stats.solutions_reported += 1;
                    if self.report(depth + 1, callback) {
                        debug!(area = self.area, "stop requested");
                        stopped = true;
                        min_waste = 0;
                    }
                }
                min_waste = min_waste.min(frame.waste);
                max_area = self.area;
                self.undo(depth);
                match depth.checked_sub(1) {
                    Some(d) => depth = d,
                    None => break,
                }
            }
        }

        stats.best_area = max_area;
        stats.stopped_early = stopped;
        debug!(summary = %stats.summary(), "search finished");
        stats
    }

    /// Moves the frame's cursor to the next position the smallest remaining candidate fits.
    fn scan(&mut self, depth: usize) -> bool {
        let (Some(w), Some(h)) = (
            self.pool.min_remaining_width(),
            self.pool.min_remaining_height(),
        ) else {
            return false;
        };
        let f = &mut self.frames[depth];
        self.mask.scan(w, h, &mut f.cursor, &mut f.waste)
    }

    fn try_place(&mut self, depth: usize) -> bool {
        let frame = self.frames[depth];
        let cand = self.pool.get(frame.candidate);
        let (size, Some(entry)) = (cand.size, cand.entry) else {
            return false;
        };
        if !self.mask.is_free(size.width, size.height, frame.cursor) {
            return false;
        }
        self.mask.toggle(size.width, size.height, frame.cursor);
        self.area += size.area();
        self.pool.take(frame.candidate);
        // instances are handed out from the back of the index list
        let remaining = self.pool.get(frame.candidate).count;
        self.frames[depth].index = self.entries[entry].indices[remaining];
        true
    }

    fn undo(&mut self, depth: usize) {
        let frame = self.frames[depth];
        let size = self.pool.get(frame.candidate).size;
        self.mask.toggle(size.width, size.height, frame.cursor);
        self.area -= size.area();
        self.pool.put_back(frame.candidate);
    }

    /// Reports frames `[0, end)`.
    fn report<C>(&mut self, end: usize, callback: &mut C) -> bool
    where
        C: SolutionCallback + ?Sized,
    {
        let pool = &self.pool;
        debug_assert_eq!(
            self.frames[..end]
                .iter()
                .map(|f| pool.get(f.candidate).size.area())
                .sum::<u64>(),
            self.area,
            "reported area differs from the packed area"
        );
        let placed = self.frames[..end]
            .iter()
            .map(|f| (f.index, f.cursor, pool.get(f.candidate).size));
        self.reporter.report(&self.mask, placed, callback)
    }
}
