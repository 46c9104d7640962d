//! Error types that cross the `Sheet` boundary as failures.
//!
//! These are distinct from [`crate::value::ErrorKind`], which lives *inside*
//! `CellValue` and flows through formula evaluation as ordinary data.

use crate::formula::parser::FormulaParseError;
use crate::position::PositionParseError;

/// Failure modes of `Sheet::set_cell` / `Sheet::clear_cell` / `Sheet::get_cell`.
///
/// Every variant leaves the sheet bit-for-bit unchanged (spec invariant 6).
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum SheetError {
    #[error("position out of valid range")]
    InvalidPosition,

    #[error("formula failed to parse: {0}")]
    FormulaParseError(#[from] FormulaParseError),

    #[error("edit would introduce a circular dependency")]
    CircularDependency,
}

impl From<PositionParseError> for SheetError {
    fn from(_: PositionParseError) -> Self {
        SheetError::InvalidPosition
    }
}
