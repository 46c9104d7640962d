//! `CellContent`: the Empty / Text / Formula sum type (spec §4.3).
//!
//! Re-architected from the teacher's virtual-dispatch `Impl` hierarchy into
//! a tagged enum dispatched by `match`, so variant handling is exhaustive at
//! compile time rather than relying on downcasts.

use crate::formula::parser::FormulaParseError;
use crate::formula::Formula;
use crate::position::Position;
use crate::value::{CellValue, ErrorKind};

/// A closure the caller supplies to resolve a referenced position to a
/// number-or-error, per spec §4.6's coercion rules.
pub trait SheetLookup {
    fn lookup(&self, pos: Position) -> Result<f64, ErrorKind>;
}

impl<F: Fn(Position) -> Result<f64, ErrorKind>> SheetLookup for F {
    fn lookup(&self, pos: Position) -> Result<f64, ErrorKind> {
        self(pos)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    Empty,
    Text(String),
    Formula {
        formula: Formula,
        /// Last evaluated value; kept in sync with the sheet by invariant 4.
        cached: CellValue,
    },
}

impl Default for CellContent {
    fn default() -> Self {
        CellContent::Empty
    }
}

impl CellContent {
    /// Build prospective content from raw input text (spec §4.3 factory).
    /// Does not touch any sheet state; on formula-parse failure, returns the
    /// error with no content constructed, so the caller can abort the edit
    /// before any mutation.
    pub fn make(text: &str) -> Result<Self, FormulaParseError> {
        if text.is_empty() {
            return Ok(CellContent::Empty);
        }
        if text == "=" {
            return Ok(CellContent::Text(text.to_string()));
        }
        if let Some(rest) = text.strip_prefix('=') {
            let formula = Formula::parse(rest)?;
            let cached = CellValue::Number(0.0); // placeholder until first recompute
            return Ok(CellContent::Formula { formula, cached });
        }
        Ok(CellContent::Text(text.to_string()))
    }

    /// The raw text this content was built from: `=`-prefixed canonical
    /// source for formulas, the original text (apostrophe preserved) for
    /// text content, `""` for empty.
    pub fn raw(&self) -> String {
        match self {
            CellContent::Empty => String::new(),
            CellContent::Text(raw) => raw.clone(),
            CellContent::Formula { formula, .. } => format!("={}", formula.print_canonical()),
        }
    }

    /// The displayed `CellValue`: apostrophe stripped for text, cached
    /// value for formulas, `Empty` otherwise.
    pub fn displayed(&self) -> CellValue {
        match self {
            CellContent::Empty => CellValue::Empty,
            CellContent::Text(raw) => {
                CellValue::Text(raw.strip_prefix('\'').unwrap_or(raw).to_string())
            }
            CellContent::Formula { cached, .. } => cached.clone(),
        }
    }

    /// Positions this content's formula directly reads; empty for
    /// non-formula content.
    pub fn references(&self) -> Vec<Position> {
        match self {
            CellContent::Formula { formula, .. } => formula.referenced_cells(),
            _ => Vec::new(),
        }
    }

    /// Re-run evaluation against `lookup`, storing the result in `cached`.
    /// No-op for Empty/Text.
    pub fn recompute(&mut self, lookup: impl SheetLookup) {
        if let CellContent::Formula { formula, cached } = self {
            *cached = match formula.evaluate(|pos| lookup.lookup(pos)) {
                Ok(n) => CellValue::Number(n),
                Err(e) => CellValue::Error(e),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_empty_content() {
        assert_eq!(CellContent::make("").unwrap(), CellContent::Empty);
    }

    #[test]
    fn lone_equals_is_text() {
        let c = CellContent::make("=").unwrap();
        assert_eq!(c.raw(), "=");
        assert_eq!(c.displayed(), CellValue::Text("=".to_string()));
    }

    #[test]
    fn apostrophe_escapes_formula_look_alike() {
        let c = CellContent::make("'=hello").unwrap();
        assert_eq!(c.raw(), "'=hello");
        assert_eq!(c.displayed(), CellValue::Text("=hello".to_string()));
    }

    #[test]
    fn plain_text_passes_through() {
        let c = CellContent::make("hello").unwrap();
        assert_eq!(c.displayed(), CellValue::Text("hello".to_string()));
    }

    #[test]
    fn formula_parse_failure_does_not_construct_content() {
        assert!(CellContent::make("=+").is_err());
    }

    #[test]
    fn formula_recomputes_into_cache() {
        let mut c = CellContent::make("=A1+3").unwrap();
        assert_eq!(c.references(), vec![Position::new(0, 0)]);
        c.recompute(|_: Position| Ok(2.0));
        assert_eq!(c.displayed(), CellValue::Number(5.0));
    }
}
