use std::cmp::Ordering;

use crate::model::Size;

/// Search order of sizes: taller first, wider first among equal heights.
pub fn size_order(a: &Size, b: &Size) -> Ordering {
    b.height.cmp(&a.height).then(b.width.cmp(&a.width))
}

/// A unique item size and the insertion indices of every item of that size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub size: Size,
    pub indices: Vec<usize>,
}

/// Items inserted into a packer, keyed by insertion index.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    entries: Vec<CatalogEntry>,
    next_index: usize,
    allow_rotation: bool,
}

impl ItemCatalog {
    pub fn new(allow_rotation: bool) -> Self {
        Self {
            entries: Vec::new(),
            next_index: 0,
            allow_rotation,
        }
    }

    /// Adds one item and returns its insertion index.
    ///
    /// With rotation allowed the size is stored landscape (`width >= height`); both orientations
    /// are derived again when the search is prepared.
    pub fn insert(&mut self, size: Size) -> usize {
        let size = if self.allow_rotation && size.width < size.height {
            size.rotated()
        } else {
            size
        };
        let index = self.next_index;
        self.next_index += 1;
        self.entries.push(CatalogEntry {
            size,
            indices: vec![index],
        });
        index
    }

    /// Adds every item in order; returns the index range they were assigned.
    pub fn insert_all<I>(&mut self, sizes: I) -> std::ops::Range<usize>
    where
        I: IntoIterator,
        I::Item: Into<Size>,
    {
        let sizes = sizes.into_iter();
        self.entries.reserve(sizes.size_hint().0);
        let start = self.next_index;
        for size in sizes {
            self.insert(size.into());
        }
        start..self.next_index
    }

    /// Sorts entries into search order and merges entries of equal size, concatenating their
    /// index lists. Running it again without new inserts leaves the entries unchanged.
    pub fn normalize(&mut self) {
        self.entries.sort_by(|a, b| size_order(&a.size, &b.size));
        let mut merged: Vec<CatalogEntry> = Vec::with_capacity(self.entries.len());
        for entry in self.entries.drain(..) {
            match merged.last_mut() {
                Some(last) if last.size == entry.size => last.indices.extend(entry.indices),
                _ => merged.push(entry),
            }
        }
        self.entries = merged;
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Number of items inserted so far.
    pub fn item_count(&self) -> usize {
        self.next_index
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of items the search can place into `container`: items with a zero side or that
    /// fit in no allowed orientation are left out.
    pub fn placeable_count(&self, container: Size) -> usize {
        self.entries
            .iter()
            .filter(|e| {
                !e.size.is_empty()
                    && (e.size.fits_within(container)
                        || (self.allow_rotation && e.size.rotated().fits_within(container)))
            })
            .map(|e| e.indices.len())
            .sum()
    }
}
