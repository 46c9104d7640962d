//! Reference extraction from a formula AST, for dependency graph
//! construction (spec §4.2 `ReferencedCells`).

use rustc_hash::FxHashSet;

use crate::position::Position;

use super::parser::Expr;

/// Deduplicated positions the expression directly reads, in first-seen
/// order.
pub fn referenced_cells(expr: &Expr) -> Vec<Position> {
    let mut seen = FxHashSet::default();
    let mut out = Vec::new();
    collect(expr, &mut seen, &mut out);
    out
}

fn collect(expr: &Expr, seen: &mut FxHashSet<Position>, out: &mut Vec<Position>) {
    match expr {
        Expr::Number(_) => {}
        Expr::CellRef(p) => {
            if seen.insert(*p) {
                out.push(*p);
            }
        }
        Expr::Neg(inner) => collect(inner, seen, out),
        Expr::BinaryOp { left, right, .. } => {
            collect(left, seen, out);
            collect(right, seen, out);
        }
    }
}
