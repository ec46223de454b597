//! Undo/redo over whole-surface snapshots.
//!
//! A snapshot is taken when a stroke starts and when the canvas is cleared.
//! The undo stack is capped at [`HISTORY_LIMIT`]; past that the oldest entry
//! is dropped in push order. Every `snapshot()` empties the redo stack.
//!
//! Surface failures (encode or decode) are logged and swallowed. The failing
//! operation leaves both stacks and the surface exactly as they were.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::surface::RasterSurface;

pub const HISTORY_LIMIT: usize = 40;

pub struct History<T> {
    undo: VecDeque<T>,
    redo: Vec<T>,
    limit: usize,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> History<T> {
    pub fn new() -> Self {
        Self::with_limit(HISTORY_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self { undo: VecDeque::with_capacity(limit + 1), redo: Vec::new(), limit }
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Oldest snapshot still held, if any.
    pub fn oldest(&self) -> Option<&T> {
        self.undo.front()
    }

    /// Newest snapshot on the undo side, if any.
    pub fn newest(&self) -> Option<&T> {
        self.undo.back()
    }

    fn push_undo(&mut self, snap: T) {
        self.undo.push_back(snap);
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
    }

    /// Record the current surface. Empties the redo stack.
    pub fn snapshot<S>(&mut self, surface: &S)
    where
        S: RasterSurface<Snapshot = T>,
    {
        match surface.serialize() {
            Ok(snap) => {
                self.push_undo(snap);
                self.redo.clear();
                debug!(undo = self.undo.len(), "history snapshot");
            }
            Err(e) => warn!(error = %e, "snapshot skipped"),
        }
    }

    /// Step back one snapshot; the present state moves to the redo stack.
    pub fn undo<S>(&mut self, surface: &mut S)
    where
        S: RasterSurface<Snapshot = T>,
    {
        if self.undo.is_empty() {
            return;
        }
        let current = match surface.serialize() {
            Ok(snap) => snap,
            Err(e) => {
                warn!(error = %e, "undo skipped");
                return;
            }
        };
        let Some(previous) = self.undo.pop_back() else { return };
        match surface.restore(&previous) {
            Ok(()) => self.redo.push(current),
            Err(e) => {
                warn!(error = %e, "undo restore failed");
                self.undo.push_back(previous);
            }
        }
    }

    /// Re-apply the last undone snapshot; the present state goes back on the
    /// undo stack (subject to the cap). The redo stack is not cleared here.
    pub fn redo<S>(&mut self, surface: &mut S)
    where
        S: RasterSurface<Snapshot = T>,
    {
        if self.redo.is_empty() {
            return;
        }
        let current = match surface.serialize() {
            Ok(snap) => snap,
            Err(e) => {
                warn!(error = %e, "redo skipped");
                return;
            }
        };
        let Some(next) = self.redo.pop() else { return };
        match surface.restore(&next) {
            Ok(()) => self.push_undo(current),
            Err(e) => {
                warn!(error = %e, "redo restore failed");
                self.redo.push(next);
            }
        }
    }

    /// Blank the surface, then snapshot the blank state.
    pub fn clear<S>(&mut self, surface: &mut S)
    where
        S: RasterSurface<Snapshot = T>,
    {
        surface.clear();
        self.snapshot(surface);
    }
}
