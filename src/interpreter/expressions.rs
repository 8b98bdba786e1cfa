//! Expression evaluation implementation
//!
//! - Arithmetic on numbers is plain `f64` arithmetic; dividing by zero is a
//!   runtime error rather than an infinity.
//! - `+` with a string on either side concatenates through the runtime's
//!   `concat` primitive, formatting a number operand the way `Print` does.
//! - Comparisons produce booleans. Strings order by their bytes.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::Value;
use crate::parser::ast::*;
use std::cmp::Ordering;
use std::io::Write;

impl<W: Write> Interpreter<W> {
    /// Evaluate an expression and return its value
    pub(crate) fn evaluate_expr(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::StringLiteral(s, _) => Ok(Value::Str(s.clone())),

            Expr::NumberLiteral(n, _) => Ok(Value::Number(*n)),

            Expr::Variable(name, loc) => {
                self.environment
                    .get(name)
                    .cloned()
                    .ok_or_else(|| RuntimeError::UndefinedVariable {
                        name: name.clone(),
                        location: *loc,
                    })
            }

            Expr::Property { path, location } => self.builtin_property(path, *location),

            Expr::Call {
                path,
                args,
                location,
            } => self.builtin_call(path, args, *location),

            Expr::Negate { operand, location } => {
                let value = self.evaluate_expr(operand)?;
                let n = value
                    .expect_number()
                    .map_err(|got| RuntimeError::TypeError {
                        expected: "Number".to_string(),
                        got,
                        location: *location,
                    })?;
                Ok(Value::Number(-n))
            }

            Expr::BinaryOp {
                op,
                left,
                right,
                location,
            } => {
                let left = self.evaluate_expr(left)?;
                let right = self.evaluate_expr(right)?;
                self.evaluate_binary_op(*op, left, right, *location)
            }
        }
    }

    fn evaluate_binary_op(
        &self,
        op: BinOp,
        left: Value,
        right: Value,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match (op, &left, &right) {
            (BinOp::Add, Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (BinOp::Sub, Value::Number(a), Value::Number(b)) => Ok(Value::Number(a - b)),
            (BinOp::Mul, Value::Number(a), Value::Number(b)) => Ok(Value::Number(a * b)),
            (BinOp::Div, Value::Number(a), Value::Number(b)) => {
                if *b == 0.0 {
                    Err(RuntimeError::DivisionByZero { location })
                } else {
                    Ok(Value::Number(a / b))
                }
            }

            (BinOp::Add, Value::Str(_), Value::Str(_) | Value::Number(_))
            | (BinOp::Add, Value::Number(_), Value::Str(_)) => {
                let joined = self
                    .runtime
                    .concat(&left.to_string(), &right.to_string())
                    .map_err(|source| Self::primitive(source, location))?;
                Ok(Value::Str(joined))
            }

            (BinOp::Eq, _, _) | (BinOp::Ne, _, _) => {
                if left.value_type() != right.value_type() {
                    return Err(Self::operand_mismatch(&left, &right, location));
                }
                let equal = left == right;
                Ok(Value::Boolean(if op == BinOp::Eq { equal } else { !equal }))
            }

            (BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge, _, _) => {
                let ordering = match (&left, &right) {
                    (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
                    (Value::Str(a), Value::Str(b)) => Some(a.as_bytes().cmp(b.as_bytes())),
                    _ => return Err(Self::operand_mismatch(&left, &right, location)),
                };
                // NaN compares false under every ordering operator
                let result = ordering.is_some_and(|ord| match op {
                    BinOp::Lt => ord == Ordering::Less,
                    BinOp::Le => ord != Ordering::Greater,
                    BinOp::Gt => ord == Ordering::Greater,
                    _ => ord != Ordering::Less,
                });
                Ok(Value::Boolean(result))
            }

            _ => Err(Self::operand_mismatch(&left, &right, location)),
        }
    }

    fn operand_mismatch(left: &Value, right: &Value, location: SourceLocation) -> RuntimeError {
        RuntimeError::TypeError {
            expected: format!("operands compatible with {}", left.value_type()),
            got: right.value_type().to_string(),
            location,
        }
    }
}
