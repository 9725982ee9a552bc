//! Step navigation cursor.
//!
//! The cursor is ephemeral UI state: it is never persisted and starts at the
//! first step on every load. Moving past either end is a no-op.

use intake_types::catalog::Catalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    index: usize,
    step_count: usize,
}

impl Cursor {
    /// Cursor at step 0 over `step_count` steps (at least one).
    pub fn new(step_count: usize) -> Self {
        Self {
            index: 0,
            step_count: step_count.max(1),
        }
    }

    pub fn for_catalog(catalog: &Catalog) -> Self {
        Self::new(catalog.step_count())
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.step_count
    }

    /// Move one step back, staying at 0. Returns the new index.
    pub fn back(&mut self) -> usize {
        self.index = self.index.saturating_sub(1);
        self.index
    }

    /// Move one step forward, staying on the last step. Returns the new index.
    pub fn next(&mut self) -> usize {
        self.index = (self.index + 1).min(self.step_count - 1);
        self.index
    }

    /// Jump to `index`, clamped to the catalog bounds.
    pub fn jump(&mut self, index: usize) -> usize {
        self.index = index.min(self.step_count - 1);
        self.index
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// One-based label, e.g. "Step 2 of 3".
    pub fn position_label(&self) -> String {
        format!("Step {} of {}", self.index + 1, self.step_count)
    }

    /// Fraction of steps reached, counting the current one: `(index + 1) / step_count`.
    pub fn step_fraction(&self) -> f64 {
        (self.index + 1) as f64 / self.step_count as f64
    }
}
