//! Expression evaluation. Errors are ordinary data: the first error
//! encountered in left-to-right evaluation order wins and short-circuits
//! the remainder of that subtree.

use crate::value::ErrorKind;

use super::parser::{Expr, Op};

/// Evaluate `expr`, calling `lookup` for each referenced position.
/// `lookup` itself is expected to apply spec §4.6's coercion rules and
/// return `Err(ErrorKind::Ref)` for invalid positions.
pub fn evaluate<F>(expr: &Expr, mut lookup: F) -> Result<f64, ErrorKind>
where
    F: FnMut(crate::position::Position) -> Result<f64, ErrorKind>,
{
    eval_inner(expr, &mut lookup)
}

fn eval_inner<F>(expr: &Expr, lookup: &mut F) -> Result<f64, ErrorKind>
where
    F: FnMut(crate::position::Position) -> Result<f64, ErrorKind>,
{
    match expr {
        Expr::Number(n) => Ok(*n),
        Expr::CellRef(pos) => lookup(*pos),
        Expr::Neg(inner) => Ok(-eval_inner(inner, lookup)?),
        Expr::BinaryOp { op, left, right } => {
            // Left-to-right: evaluate the left operand and propagate its
            // error before even evaluating the right one.
            let l = eval_inner(left, lookup)?;
            let r = eval_inner(right, lookup)?;
            let result = match op {
                Op::Add => l + r,
                Op::Sub => l - r,
                Op::Mul => l * r,
                Op::Div => {
                    if r == 0.0 {
                        return Err(ErrorKind::Arithmetic);
                    }
                    l / r
                }
            };
            if result.is_finite() {
                Ok(result)
            } else {
                Err(ErrorKind::Arithmetic)
            }
        }
    }
}
