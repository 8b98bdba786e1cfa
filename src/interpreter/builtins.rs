//! Built-in operation implementations
//!
//! This module connects language constructs to the string runtime:
//!
//! - `Print <expr>`: [`Runtime::print`](crate::runtime::Runtime::print),
//!   recorded in the transcript as a print segment
//! - `Print.output`: a copy of the last output cache
//! - `<alias>.input(prompt)` (from `import user.input as <alias>`):
//!   [`Runtime::read_line`](crate::runtime::Runtime::read_line), with the
//!   prompt recorded as a prompt segment
//!
//! All built-ins are implemented as methods on the [`Interpreter`] struct.

use crate::checker::{Builtin, PRINT_OUTPUT};
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::Value;
use crate::parser::ast::{Expr, SourceLocation};
use crate::runtime::PrimitiveError;
use crate::snapshot::SegmentKind;
use std::io::Write;

impl<W: Write> Interpreter<W> {
    pub(crate) fn builtin_print(
        &mut self,
        value: &Value,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        let text = match value {
            Value::Str(s) => s.clone(),
            Value::Number(n) => Value::Number(*n).to_string(),
            Value::Boolean(_) => {
                return Err(RuntimeError::TypeError {
                    expected: "String or Number".to_string(),
                    got: value.value_type().to_string(),
                    location,
                });
            }
        };

        self.runtime
            .print(&text)
            .map_err(|source| Self::primitive(source, location))?;
        self.record_output(text, SegmentKind::Print, location);
        Ok(())
    }

    pub(crate) fn builtin_property(
        &self,
        path: &[String],
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        if !path.iter().map(String::as_str).eq(PRINT_OUTPUT) {
            return Err(RuntimeError::UnknownProperty {
                path: path.join("."),
                location,
            });
        }

        self.runtime
            .dup_last_output()
            .map(Value::Str)
            .map_err(|source| Self::primitive(source, location))
    }

    pub(crate) fn builtin_call(
        &mut self,
        path: &[String],
        args: &[Expr],
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let name = path.join(".");
        let builtin = self
            .program
            .function(&name)
            .map(|signature| signature.builtin)
            .ok_or_else(|| RuntimeError::UndefinedFunction {
                name: name.clone(),
                location,
            })?;

        match builtin {
            Builtin::ReadLine => {
                let prompt = match args {
                    [arg] => self.evaluate_expr(arg)?,
                    _ => {
                        return Err(RuntimeError::TypeError {
                            expected: "1 argument".to_string(),
                            got: format!("{} arguments", args.len()),
                            location,
                        });
                    }
                };
                let prompt = match prompt {
                    Value::Str(prompt) => prompt,
                    other => {
                        return Err(RuntimeError::TypeError {
                            expected: "String".to_string(),
                            got: other.value_type().to_string(),
                            location,
                        });
                    }
                };

                let line = self
                    .runtime
                    .read_line(&prompt)
                    .map_err(|source| Self::primitive(source, location))?;
                if !prompt.is_empty() {
                    self.record_output(prompt, SegmentKind::Prompt, location);
                }
                tracing::debug!(function = %name, bytes = line.len(), "read input line");
                Ok(Value::Str(line))
            }
        }
    }

    pub(crate) fn primitive(source: PrimitiveError, location: SourceLocation) -> RuntimeError {
        RuntimeError::Primitive { source, location }
    }
}

#[cfg(test)]
mod tests {
    use crate::checker::TypeChecker;
    use crate::interpreter::{Interpreter, RuntimeError};
    use crate::parser::Parser;
    use crate::runtime::{PrimitiveError, Runtime};
    use crate::snapshot::SegmentKind;
    use std::io::Cursor;

    fn interpreter(source: &str, input: &str) -> Interpreter<Vec<u8>> {
        let program = Parser::new(source).unwrap().parse_program().unwrap();
        let checked = TypeChecker::new().check(program).unwrap();
        let runtime = Runtime::new(Vec::new())
            .with_input(Box::new(Cursor::new(input.as_bytes().to_vec())));
        Interpreter::new(checked, runtime, usize::MAX)
    }

    #[test]
    fn test_input_prompt_is_a_prompt_segment() {
        let source = "import user.input as ask\nname = ask.input(\"Name? \")\nPrint \"Hi \" + name\n";
        let mut interp = interpreter(source, "Ada\n");
        interp.run().unwrap();

        let kinds: Vec<SegmentKind> = interp.transcript().segments().iter().map(|s| s.kind).collect();
        assert_eq!(kinds, [SegmentKind::Prompt, SegmentKind::Print]);
        assert_eq!(interp.last_output(), "Hi Ada");
        assert_eq!(interp.into_writer(), b"Name? Hi Ada");
    }

    #[test]
    fn test_print_output_before_any_print_is_empty() {
        let mut interp = interpreter("x = Print.output\nPrint \"[\" + x + \"]\"\n", "");
        interp.run().unwrap();

        assert_eq!(interp.into_writer(), b"[]");
    }

    #[test]
    fn test_print_over_limit_is_fatal() {
        let program = Parser::new("Print \"abc\"\nPrint \"abcdef\"\n")
            .unwrap()
            .parse_program()
            .unwrap();
        let checked = TypeChecker::new().check(program).unwrap();
        let runtime = Runtime::new(Vec::new()).with_max_string_bytes(4);
        let mut interp = Interpreter::new(checked, runtime, usize::MAX);

        let err = interp.run().unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::Primitive {
                source: PrimitiveError::Allocation { requested: 6, limit: 4 },
                ..
            }
        ));
        assert_eq!(err.location().map(|l| l.line), Some(2));
        assert_eq!(interp.last_output(), "abc");
    }
}
