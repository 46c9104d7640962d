//! The sparse 2-D container, edit protocol, dependency maintenance, and
//! reactive recomputation (spec §4.5–§4.7).

use std::io::{self, Write};

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::cell::Cell;
use crate::content::CellContent;
use crate::error::SheetError;
use crate::position::Position;
use crate::value::{CellValue, ErrorKind};

/// A non-owning read handle into a cell. Invalidated by any subsequent
/// `set_cell`/`clear_cell` — callers must not hold one across an edit.
pub struct CellHandle<'a> {
    cell: &'a Cell,
}

impl<'a> CellHandle<'a> {
    pub fn get_value(&self) -> CellValue {
        self.cell.get_value()
    }

    pub fn get_text(&self) -> String {
        self.cell.get_raw()
    }

    pub fn get_referenced_cells(&self) -> Vec<Position> {
        self.cell.references()
    }
}

/// A sparse 2-D spreadsheet: `Position -> Cell`, plus the printable
/// envelope — the smallest rectangle anchored at (0,0) containing every
/// non-empty cell.
#[derive(Default)]
pub struct Sheet {
    cells: FxHashMap<Position, Cell>,
    height: usize,
    width: usize,
}

impl Sheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a position to a number-or-error per spec §4.6: invalid
    /// positions error as `Ref`; absent/Empty cells read as 0.0; numbers
    /// pass through; text is parsed as a fully-consumed decimal or errors
    /// as `Value`; errors propagate unchanged.
    fn lookup(&self, pos: Position) -> Result<f64, ErrorKind> {
        if !pos.is_valid() {
            return Err(ErrorKind::Ref);
        }
        match self.cells.get(&pos).map(|c| c.get_value()) {
            None | Some(CellValue::Empty) => Ok(0.0),
            Some(CellValue::Number(n)) => Ok(n),
            Some(CellValue::Error(e)) => Err(e),
            Some(CellValue::Text(s)) => {
                if s.is_empty() {
                    Ok(0.0)
                } else if s.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
                    s.parse::<f64>().map_err(|_| ErrorKind::Value)
                } else {
                    Err(ErrorKind::Value)
                }
            }
        }
    }

    /// Depth-first search from `start` following each visited cell's
    /// *current* outgoing references. Returns true if `target` is reached.
    /// Invalid positions encountered during the walk simply have no
    /// outgoing edges and do not short-circuit the search.
    fn reaches(&self, start: &[Position], target: Position) -> bool {
        let mut stack: Vec<Position> = start.to_vec();
        let mut visited: FxHashSet<Position> = FxHashSet::default();
        while let Some(pos) = stack.pop() {
            if pos == target {
                return true;
            }
            if !visited.insert(pos) {
                continue;
            }
            if let Some(cell) = self.cells.get(&pos) {
                stack.extend(cell.references());
            }
        }
        false
    }

    /// The core edit operation (spec §4.5). Validates, parses, checks for
    /// cycles, and only then mutates — a failure at any step leaves the
    /// sheet bit-for-bit unchanged.
    pub fn set_cell(&mut self, pos: Position, text: &str) -> Result<(), SheetError> {
        if !pos.is_valid() {
            return Err(SheetError::InvalidPosition);
        }

        let prospective = CellContent::make(text)?;
        let refs = prospective.references();

        if refs.contains(&pos) || self.reaches(&refs, pos) {
            debug!(pos = %pos, "set_cell rejected: would introduce a cycle");
            return Err(SheetError::CircularDependency);
        }

        self.grow_envelope(pos);
        self.cells.entry(pos).or_insert_with(|| Cell::new(CellContent::Empty));

        // Detach edges for the content this cell held *before* this edit.
        let old_refs = self.cells[&pos].references();
        for q in old_refs {
            if let Some(c) = self.cells.get_mut(&q) {
                c.remove_dependent(pos);
            }
        }

        self.cells.get_mut(&pos).unwrap().set_content(prospective);

        for &q in &refs {
            self.cells.entry(q).or_insert_with(|| Cell::new(CellContent::Empty));
            self.cells.get_mut(&q).unwrap().add_dependent(pos);
        }

        self.recompute_cell(pos);

        debug!(pos = %pos, dependents = self.cells[&pos].dependents().count(), "propagating recompute");
        let dependents: Vec<Position> = self.cells[&pos].dependents().collect();
        self.propagate(&dependents);

        Ok(())
    }

    fn recompute_cell(&mut self, pos: Position) {
        // Safety against borrow conflicts: take the cell out, recompute
        // against the rest of the sheet, put it back.
        if let Some(mut cell) = self.cells.remove(&pos) {
            cell.recompute(|p: Position| self.lookup(p));
            self.cells.insert(pos, cell);
        }
    }

    /// Recompute every transitively dependent cell exactly once, in an
    /// order consistent with reverse topological order of the reference
    /// graph (dependents recompute after their inputs). The graph is
    /// acyclic post-edit so this terminates.
    ///
    /// A plain DFS that recomputes on first visit gets diamond topologies
    /// wrong (a shared dependent can be reached — and recomputed — through
    /// one parent before its other parent has been refreshed). So this
    /// first discovers the whole affected set, topologically sorts it via
    /// DFS postorder over the dependents graph, then recomputes in that
    /// order — each cell exactly once, after all of its precedents.
    fn propagate(&mut self, start: &[Position]) {
        let mut affected: FxHashSet<Position> = FxHashSet::default();
        let mut stack: Vec<Position> = start.to_vec();
        while let Some(pos) = stack.pop() {
            if affected.insert(pos) {
                if let Some(cell) = self.cells.get(&pos) {
                    stack.extend(cell.dependents());
                }
            }
        }

        let mut order = Vec::with_capacity(affected.len());
        let mut done: FxHashSet<Position> = FxHashSet::default();
        let affected_list: Vec<Position> = affected.iter().copied().collect();
        for pos in affected_list {
            self.topo_visit(pos, &affected, &mut done, &mut order);
        }
        order.reverse();

        debug!(count = order.len(), "recompute walk order settled");
        for pos in order {
            self.recompute_cell(pos);
        }
    }

    /// Postorder DFS over the dependents graph, restricted to `affected`:
    /// a cell is pushed only after every affected dependent reachable from
    /// it has already been pushed.
    fn topo_visit(
        &self,
        pos: Position,
        affected: &FxHashSet<Position>,
        done: &mut FxHashSet<Position>,
        order: &mut Vec<Position>,
    ) {
        if !done.insert(pos) {
            return;
        }
        if let Some(cell) = self.cells.get(&pos) {
            for d in cell.dependents() {
                if affected.contains(&d) {
                    self.topo_visit(d, affected, done, order);
                }
            }
        }
        order.push(pos);
    }

    fn grow_envelope(&mut self, pos: Position) {
        self.height = self.height.max(pos.row + 1);
        self.width = self.width.max(pos.col + 1);
    }

    pub fn get_cell(&self, pos: Position) -> Result<Option<CellHandle<'_>>, SheetError> {
        if !pos.is_valid() {
            return Err(SheetError::InvalidPosition);
        }
        Ok(self.cells.get(&pos).map(|cell| CellHandle { cell }))
    }

    pub fn clear_cell(&mut self, pos: Position) -> Result<(), SheetError> {
        if !pos.is_valid() {
            return Err(SheetError::InvalidPosition);
        }
        if !self.cells.contains_key(&pos) {
            return Ok(());
        }

        let old_refs = self.cells[&pos].references();
        for q in old_refs {
            if let Some(c) = self.cells.get_mut(&q) {
                c.remove_dependent(pos);
            }
        }

        self.cells.get_mut(&pos).unwrap().set_content(CellContent::Empty);
        if self.cells[&pos].is_prunable_empty() {
            self.cells.remove(&pos);
        }

        let dependents: Vec<Position> = self
            .cells
            .get(&pos)
            .map(|c| c.dependents().collect())
            .unwrap_or_default();
        self.propagate(&dependents);

        self.shrink_envelope();
        Ok(())
    }

    /// Rescan all stored cells to recompute the envelope exactly, per
    /// invariant 5: the smallest (h, w) such that every position at or
    /// beyond it holds an Empty cell or no cell. O(total non-empty cells).
    fn shrink_envelope(&mut self) {
        let mut height = 0usize;
        let mut width = 0usize;
        for (pos, cell) in &self.cells {
            if !matches!(cell.content(), CellContent::Empty) {
                height = height.max(pos.row + 1);
                width = width.max(pos.col + 1);
            }
        }
        self.height = height;
        self.width = width;
    }

    pub fn printable_size(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn print_values<W: Write>(&self, mut out: W) -> io::Result<()> {
        self.print_with(&mut out, |cell| cell.get_value().display_string())
    }

    pub fn print_texts<W: Write>(&self, mut out: W) -> io::Result<()> {
        self.print_with(&mut out, |cell| cell.get_raw())
    }

    fn print_with<W: Write>(
        &self,
        out: &mut W,
        render: impl Fn(&Cell) -> String,
    ) -> io::Result<()> {
        for row in 0..self.height {
            let mut fields = Vec::with_capacity(self.width);
            for col in 0..self.width {
                let field = self
                    .cells
                    .get(&Position::new(row, col))
                    .map(&render)
                    .unwrap_or_default();
                fields.push(field);
            }
            writeln!(out, "{}", fields.join("\t"))?;
        }
        Ok(())
    }
}
