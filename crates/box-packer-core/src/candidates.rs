//! Orientations of catalog entries available to the search.
//!
//! Candidates live in one arena. Slot [`SENTINEL`] anchors a circular doubly linked list of the
//! candidates that still have items left; the rest are kept in search order. A candidate whose
//! count drops to zero is unlinked but keeps its own links, so it can be relinked in place when
//! placements are undone in reverse order.

use crate::catalog::{CatalogEntry, size_order};
use crate::model::Size;

/// Arena slot of the list head.
pub const SENTINEL: usize = 0;

/// One orientation of one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Size in this orientation.
    pub size: Size,
    /// Catalog entry this orientation belongs to; `None` only for the sentinel.
    pub entry: Option<usize>,
    /// The other orientation of the same items, sharing the count.
    pub partner: Option<usize>,
    /// Items of the entry not currently placed.
    pub count: usize,
    next: usize,
    prev: usize,
}

impl Candidate {
    fn new(size: Size, entry: usize, count: usize) -> Self {
        Self {
            size,
            entry: Some(entry),
            partner: None,
            count,
            next: SENTINEL,
            prev: SENTINEL,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CandidatePool {
    items: Vec<Candidate>,
    item_count: usize,
    item_area: u64,
    min_width: Option<u32>,
}

impl CandidatePool {
    /// Builds the candidates for normalized `entries`: the stored orientation if it fits into
    /// `container`, and with `allow_rotation` the turned one if it differs and fits. Entries with
    /// a zero side are skipped.
    pub fn build(entries: &[CatalogEntry], container: Size, allow_rotation: bool) -> Self {
        let per_entry = if allow_rotation { 2 } else { 1 };
        let mut cands: Vec<Candidate> = Vec::with_capacity(entries.len() * per_entry);
        for (e, entry) in entries.iter().enumerate() {
            let size = entry.size;
            if size.is_empty() {
                continue;
            }
            let count = entry.indices.len();
            if size.fits_within(container) {
                cands.push(Candidate::new(size, e, count));
            }
            if allow_rotation && size.width != size.height && size.rotated().fits_within(container)
            {
                cands.push(Candidate::new(size.rotated(), e, count));
            }
        }
        cands.sort_by(|a, b| size_order(&a.size, &b.size));

        if allow_rotation {
            for i in 0..cands.len() {
                let size = cands[i].size;
                if size.width >= size.height {
                    continue;
                }
                let turned = size.rotated();
                let Ok(j) = cands.binary_search_by(|c| size_order(&c.size, &turned)) else {
                    continue;
                };
                assert!(
                    (j == 0 || cands[j - 1].size != turned)
                        && cands.get(j + 1).is_none_or(|c| c.size != turned),
                    "duplicate candidate size {turned:?}; catalog not normalized"
                );
                debug_assert_eq!(cands[i].entry, cands[j].entry);
                // arena slots are shifted by one for the sentinel
                cands[i].partner = Some(j + 1);
                cands[j].partner = Some(i + 1);
            }
        }

        let mut items = Vec::with_capacity(cands.len() + 1);
        items.push(Candidate {
            size: Size::default(),
            entry: None,
            partner: None,
            count: 0,
            next: SENTINEL,
            prev: SENTINEL,
        });
        items.extend(cands);

        let n = items.len();
        let mut item_count = 0;
        let mut item_area = 0u64;
        for i in 0..n {
            items[i].next = (i + 1) % n;
            items[i].prev = (i + n - 1) % n;
            let c = &items[i];
            if i == SENTINEL || (c.partner.is_some() && c.size.width <= c.size.height) {
                continue;
            }
            item_count += c.count;
            item_area += c.size.area() * c.count as u64;
        }

        let mut pool = Self {
            items,
            item_count,
            item_area,
            min_width: None,
        };
        pool.refresh_min_width();
        pool
    }

    /// Physical items the search can place, each pair of orientations counted once.
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Total area of the placeable items.
    pub fn item_area(&self) -> u64 {
        self.item_area
    }

    /// Number of candidates, sentinel excluded.
    pub fn len(&self) -> usize {
        self.items.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, slot: usize) -> &Candidate {
        &self.items[slot]
    }

    /// Every candidate in search order, linked or not.
    pub fn candidates(&self) -> &[Candidate] {
        &self.items[1..]
    }

    /// Next linked slot after `slot`; [`SENTINEL`] once the list wraps.
    #[inline]
    pub fn next(&self, slot: usize) -> usize {
        self.items[slot].next
    }

    /// True when no candidate has items left.
    pub fn is_exhausted(&self) -> bool {
        self.items[SENTINEL].next == SENTINEL
    }

    /// Slots of the linked candidates in search order.
    pub fn remaining(&self) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(Some(self.next(SENTINEL)), |&s| Some(self.next(s)))
            .take_while(|&s| s != SENTINEL)
    }

    /// Smallest height among the linked candidates: the last one in search order.
    pub fn min_remaining_height(&self) -> Option<u32> {
        let last = self.items[SENTINEL].prev;
        (last != SENTINEL).then(|| self.items[last].size.height)
    }

    /// Smallest width among the linked candidates. Refreshed only when a candidate is unlinked
    /// or relinked.
    pub fn min_remaining_width(&self) -> Option<u32> {
        self.min_width
    }

    fn refresh_min_width(&mut self) {
        self.min_width = self.remaining().map(|s| self.items[s].size.width).min();
    }

    /// Consumes one item of `slot` and of its partner, unlinking whichever runs out.
    pub fn take(&mut self, slot: usize) {
        debug_assert_ne!(slot, SENTINEL);
        self.decrement(slot);
        if let Some(p) = self.items[slot].partner {
            self.decrement(p);
        }
    }

    /// Reverses [`take`](Self::take).
    pub fn put_back(&mut self, slot: usize) {
        debug_assert_ne!(slot, SENTINEL);
        if let Some(p) = self.items[slot].partner {
            self.increment(p);
        }
        self.increment(slot);
    }

    fn decrement(&mut self, slot: usize) {
        let c = &mut self.items[slot];
        debug_assert!(c.count > 0);
        c.count -= 1;
        if c.count == 0 {
            let (prev, next) = (c.prev, c.next);
            self.items[next].prev = prev;
            self.items[prev].next = next;
            self.refresh_min_width();
        }
    }

    fn increment(&mut self, slot: usize) {
        let c = &mut self.items[slot];
        c.count += 1;
        if c.count == 1 {
            let (prev, next) = (c.prev, c.next);
            self.items[next].prev = slot;
            self.items[prev].next = slot;
            self.refresh_min_width();
        }
    }
}
