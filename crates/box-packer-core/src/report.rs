use crate::mask::{Cursor, FreeMask};
use crate::model::{Placement, Rect, Size};

/// Receives every solution the search accepts.
///
/// Returning `true` asks the search to stop. The slice is only valid for the duration of the call.
pub trait SolutionCallback {
    fn on_solution(&mut self, placements: &[Placement]) -> bool;
}

impl<F> SolutionCallback for F
where
    F: FnMut(&[Placement]) -> bool,
{
    fn on_solution(&mut self, placements: &[Placement]) -> bool {
        self(placements)
    }
}

/// Callback that never stops the search.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContinueSearch;

impl SolutionCallback for ContinueSearch {
    fn on_solution(&mut self, _placements: &[Placement]) -> bool {
        false
    }
}

/// Translates committed frames into placements and hands them to the callback.
///
/// The placement buffer is reused between reports.
#[derive(Debug, Default)]
pub struct Reporter {
    placements: Vec<Placement>,
}

impl Reporter {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            placements: Vec::with_capacity(n),
        }
    }

    /// Reports `placed` as `(insertion index, rect)` pairs, where each element carries the
    /// index, grid position and placed size of one frame. Returns the callback's stop request.
    pub fn report<C, I>(&mut self, mask: &FreeMask, placed: I, callback: &mut C) -> bool
    where
        C: SolutionCallback + ?Sized,
        I: IntoIterator<Item = (usize, Cursor, Size)>,
    {
        self.placements.clear();
        self.placements.extend(placed.into_iter().map(|(index, cursor, size)| {
            let (x, y) = mask.position(cursor);
            Placement {
                index,
                rect: Rect::new(x, y, size.width, size.height),
            }
        }));
        callback.on_solution(&self.placements)
    }
}
