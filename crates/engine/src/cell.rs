//! `Cell`: content plus the set of dependents (spec §4.4).
//!
//! Dependents are stored as `Position`s, never direct handles — the arena
//! (the sheet) is the only owner, positions are the stable identity, and
//! edges are re-resolved through the sheet on every traversal. Container
//! resizes never invalidate an edge.

use rustc_hash::FxHashSet;

use crate::content::{CellContent, SheetLookup};
use crate::position::Position;
use crate::value::CellValue;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    content: CellContent,
    dependents: FxHashSet<Position>,
}

impl Cell {
    pub fn new(content: CellContent) -> Self {
        Self {
            content,
            dependents: FxHashSet::default(),
        }
    }

    /// Replace content; does not touch `dependents` — edge maintenance is
    /// the sheet's responsibility.
    pub fn set_content(&mut self, content: CellContent) {
        self.content = content;
    }

    pub fn content(&self) -> &CellContent {
        &self.content
    }

    pub fn add_dependent(&mut self, pos: Position) {
        self.dependents.insert(pos);
    }

    pub fn remove_dependent(&mut self, pos: Position) {
        self.dependents.remove(&pos);
    }

    pub fn dependents(&self) -> impl Iterator<Item = Position> + '_ {
        self.dependents.iter().copied()
    }

    pub fn has_dependents(&self) -> bool {
        !self.dependents.is_empty()
    }

    pub fn references(&self) -> Vec<Position> {
        self.content.references()
    }

    pub fn recompute(&mut self, lookup: impl SheetLookup) {
        self.content.recompute(lookup);
    }

    pub fn get_value(&self) -> CellValue {
        self.content.displayed()
    }

    pub fn get_raw(&self) -> String {
        self.content.raw()
    }

    /// True iff this cell holds no content and nothing depends on it — a
    /// candidate for pruning from the sheet to shrink the envelope.
    pub fn is_prunable_empty(&self) -> bool {
        matches!(self.content, CellContent::Empty) && self.dependents.is_empty()
    }
}
