//! Statement execution implementation
//!
//! Trica statements are straight-line: `Print`, assignment and bare
//! expressions. Each one is executed completely before the engine takes the
//! next snapshot.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::*;
use std::io::Write;

impl<W: Write> Interpreter<W> {
    /// Execute a single statement
    pub(crate) fn execute_statement(&mut self, stmt: &Stmt) -> Result<(), RuntimeError> {
        match stmt {
            Stmt::Print { expr, location } => {
                let value = self.evaluate_expr(expr)?;
                self.builtin_print(&value, *location)
            }

            Stmt::Assignment {
                name,
                value,
                location,
            } => {
                let value = self.evaluate_expr(value)?;
                if self.environment.assign(name, value, *location) {
                    tracing::trace!(name = %name, "declared variable");
                }
                Ok(())
            }

            Stmt::Expression { expr, .. } => {
                // Evaluate the expression and discard the result
                self.evaluate_expr(expr)?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::checker::TypeChecker;
    use crate::interpreter::{Interpreter, RuntimeError};
    use crate::memory::Value;
    use crate::parser::Parser;
    use crate::runtime::Runtime;

    fn run(source: &str) -> (Interpreter<Vec<u8>>, Result<(), RuntimeError>) {
        let program = Parser::new(source).unwrap().parse_program().unwrap();
        let checked = TypeChecker::new().check(program).unwrap();
        let mut interp = Interpreter::new(checked, Runtime::new(Vec::new()), usize::MAX);
        let result = interp.run();
        (interp, result)
    }

    #[test]
    fn test_reassignment_replaces_value() {
        let (interp, result) = run("x = \"a\"\nx = x + \"b\"\nPrint x\n");
        result.unwrap();

        assert_eq!(interp.environment().get("x"), Some(&Value::Str("ab".into())));
        assert_eq!(interp.environment().len(), 1);
        assert_eq!(interp.into_writer(), b"ab");
    }

    #[test]
    fn test_expression_statement_has_no_output() {
        let (interp, result) = run("Print \"x\"\nPrint.output\n1 + 2\n");
        result.unwrap();

        assert_eq!(interp.transcript().len(), 1);
        assert_eq!(interp.into_writer(), b"x");
    }

    #[test]
    fn test_print_numbers() {
        let (interp, result) = run("Print 1 + 2\nPrint \" \"\nPrint 5 / 2\n");
        result.unwrap();

        assert_eq!(interp.last_output(), "2.5");
        assert_eq!(interp.into_writer(), b"3 2.5");
    }
}
