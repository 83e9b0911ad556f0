//! Occupancy grid of the container, one bit per cell.
//!
//! Rows are `stride` words wide. Every row carries at least one padding bit past the real width
//! and one sentinel row follows the last real row; both are permanently occupied, so any region
//! that crosses the right or bottom edge of the container tests as not free.

/// Storage word of the grid.
pub type Word = u64;

/// Bits per storage word.
pub const WORD_BITS: u32 = Word::BITS;

/// Position in the grid: flat word index (`row * stride + column word`) plus bit offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub word: usize,
    pub bit: u32,
}

impl Cursor {
    pub fn new(word: usize, bit: u32) -> Self {
        debug_assert!(bit < WORD_BITS);
        Self { word, bit }
    }

    /// Moves forward `cells` cells in raster order, carrying into the next word.
    #[inline]
    pub fn advance(&mut self, cells: u32) {
        let bit = self.bit as usize + cells as usize;
        self.word += bit / WORD_BITS as usize;
        self.bit = (bit % WORD_BITS as usize) as u32;
    }

    /// Returns a copy moved forward by `cells`.
    #[inline]
    pub fn advanced(mut self, cells: u32) -> Self {
        self.advance(cells);
        self
    }
}

/// Bit masks covering `width` bits starting at `bit`: the first word, the last word and the
/// offset of the last word. Words in between are covered entirely.
#[inline]
fn span(width: u32, bit: u32) -> (Word, Word, usize) {
    debug_assert!(width > 0);
    let end = bit as usize + width as usize;
    let last = (end - 1) / WORD_BITS as usize;
    let tail = (end % WORD_BITS as usize) as u32;
    let mut lo = Word::MAX << bit;
    let mut hi = if tail == 0 {
        Word::MAX
    } else {
        Word::MAX >> (WORD_BITS - tail)
    };
    if last == 0 {
        lo &= hi;
        hi = 0;
    }
    (lo, hi, last)
}

#[derive(Debug, Clone)]
pub struct FreeMask {
    width: u32,
    height: u32,
    stride: usize,
    words: Vec<Word>,
}

impl FreeMask {
    /// Allocates `height + 1` rows of `width / WORD_BITS + 1` words and marks the padding and the
    /// sentinel row as occupied.
    pub fn new(width: u32, height: u32) -> Self {
        let stride = width as usize / WORD_BITS as usize + 1;
        let mut mask = Self {
            width,
            height,
            stride,
            words: vec![0; (height as usize + 1) * stride],
        };
        let padded = (stride * WORD_BITS as usize) as u32;
        let pad = Cursor::new(
            width as usize / WORD_BITS as usize,
            width % WORD_BITS,
        );
        mask.toggle(padded - width, height, pad);
        mask.toggle(padded, 1, Cursor::new(stride * height as usize, 0));
        mask
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Words per row.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Grid position of container cell `(x, y)`.
    pub fn cursor_at(&self, x: u32, y: u32) -> Cursor {
        Cursor::new(
            y as usize * self.stride + x as usize / WORD_BITS as usize,
            x % WORD_BITS,
        )
    }

    /// Container coordinates `(x, y)` of a grid position.
    pub fn position(&self, cursor: Cursor) -> (u32, u32) {
        let y = cursor.word / self.stride;
        let x = (cursor.word % self.stride) * WORD_BITS as usize + cursor.bit as usize;
        (x as u32, y as u32)
    }

    /// True if the cell at `cursor` is occupied (padding and sentinel cells included).
    pub fn is_occupied(&self, cursor: Cursor) -> bool {
        self.words
            .get(cursor.word)
            .is_none_or(|&w| w & (1 << cursor.bit) != 0)
    }

    /// Number of occupied cells inside the real container area.
    pub fn occupied_cells(&self) -> u64 {
        let mut count = 0u64;
        for y in 0..self.height {
            for x in 0..self.width {
                if self.is_occupied(self.cursor_at(x, y)) {
                    count += 1;
                }
            }
        }
        count
    }

    /// True iff no occupied cell lies in the `width`×`height` region anchored at `cursor`.
    pub fn is_free(&self, width: u32, height: u32, cursor: Cursor) -> bool {
        if cursor.word + self.stride * height as usize >= self.words.len() {
            return false;
        }
        let (lo, hi, last) = span(width, cursor.bit);
        for r in 0..height as usize {
            let row = cursor.word + r * self.stride;
            let Some(m) = self.words.get(row..=row + last) else {
                return false;
            };
            if m[0] & lo != 0 || m[last] & hi != 0 {
                return false;
            }
            if last > 1 && m[1..last].iter().any(|&w| w != 0) {
                return false;
            }
        }
        true
    }

    /// Flips every cell of the region. Marks a free region and clears a marked one.
    pub fn toggle(&mut self, width: u32, height: u32, cursor: Cursor) {
        let (lo, hi, last) = span(width, cursor.bit);
        for r in 0..height as usize {
            let row = cursor.word + r * self.stride;
            self.words[row] ^= lo;
            for w in &mut self.words[row + 1..row + last.max(1)] {
                *w ^= Word::MAX;
            }
            self.words[row + last] ^= hi;
        }
    }

    /// Advances `cursor` in raster order to the first position where a `width`×`height` region is
    /// free, adding every free cell passed over to `waste`. Returns false once the last row that
    /// can hold `height` rows is exhausted.
    ///
    /// Runs of free cells are skipped up to the next occupied cell. That is exact for grids
    /// filled in raster order, where any occupied cell below the cursor row is also occupied in
    /// the cursor row.
    pub fn scan(&self, width: u32, height: u32, cursor: &mut Cursor, waste: &mut u64) -> bool {
        if height > self.height {
            return false;
        }
        let end = (self.height - height + 1) as usize * self.stride;
        while cursor.word < end {
            if self.is_free(width, height, *cursor) {
                return true;
            }

            // up to the next obstacle
            while cursor.word < end {
                let m = self.words[cursor.word];
                while cursor.bit < WORD_BITS && m & (1 << cursor.bit) == 0 {
                    cursor.bit += 1;
                    *waste += 1;
                }
                if cursor.bit < WORD_BITS {
                    break;
                }
                cursor.bit = 0;
                cursor.word += 1;
                while cursor.word < end && self.words[cursor.word] == 0 {
                    cursor.word += 1;
                    *waste += WORD_BITS as u64;
                }
            }

            // one past the obstacle
            while cursor.word < end {
                let m = self.words[cursor.word];
                while cursor.bit < WORD_BITS && m & (1 << cursor.bit) != 0 {
                    cursor.bit += 1;
                }
                if cursor.bit < WORD_BITS {
                    break;
                }
                cursor.bit = 0;
                cursor.word += 1;
                while cursor.word < end && self.words[cursor.word] == Word::MAX {
                    cursor.word += 1;
                }
            }
        }
        false
    }
}
