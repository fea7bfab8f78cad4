//! Formula evaluation.

use super::{BinaryOp, Expr, FormulaError, Function, Scope};

/// Evaluate an expression tree against `scope`.
///
/// Every intermediate value must be finite; division by zero and unknown names
/// are errors rather than NaN or zero.
pub fn evaluate(expr: &Expr, scope: &impl Scope) -> Result<f64, FormulaError> {
    let value = match expr {
        Expr::Number(value) => *value,

        Expr::Variable(name) => scope
            .lookup(name)
            .ok_or_else(|| FormulaError::UnknownVariable(name.clone()))?,

        Expr::Neg(inner) => -evaluate(inner, scope)?,

        Expr::Binary { op, lhs, rhs } => {
            let lhs = evaluate(lhs, scope)?;
            let rhs = evaluate(rhs, scope)?;
            match op {
                BinaryOp::Add => lhs + rhs,
                BinaryOp::Sub => lhs - rhs,
                BinaryOp::Mul => lhs * rhs,
                BinaryOp::Div if rhs == 0.0 => return Err(FormulaError::DivisionByZero),
                BinaryOp::Div => lhs / rhs,
            }
        }

        Expr::Call { function, args } => call(*function, args, scope)?,
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(FormulaError::NonFinite)
    }
}

fn call(function: Function, args: &[Expr], scope: &impl Scope) -> Result<f64, FormulaError> {
    let values = args
        .iter()
        .map(|arg| evaluate(arg, scope))
        .collect::<Result<Vec<_>, _>>()?;

    match function {
        Function::Min | Function::Max => {
            let fold = if function == Function::Min { f64::min } else { f64::max };
            values
                .iter()
                .copied()
                .reduce(fold)
                .ok_or(FormulaError::Arity {
                    function,
                    expected: "at least one argument",
                    found: 0,
                })
        }
        Function::Floor | Function::Ceil | Function::Round => {
            let [value] = values.as_slice() else {
                return Err(FormulaError::Arity {
                    function,
                    expected: "exactly one argument",
                    found: values.len(),
                });
            };
            Ok(match function {
                Function::Floor => value.floor(),
                Function::Ceil => value.ceil(),
                _ => value.round(),
            })
        }
    }
}
