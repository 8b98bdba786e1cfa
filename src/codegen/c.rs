// C back end: lowers a checked program to a single self-contained C file

use crate::checker::{Builtin, CheckedProgram, TypeError, PRINT_OUTPUT};
use crate::codegen::runtime_c;
use crate::codegen::CodegenError;
use crate::parser::ast::*;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt::Write;

/// Headers every emitted file includes
const STANDARD_HEADERS: [&str; 3] = ["stdio.h", "stdlib.h", "string.h"];

/// Optional runtime helpers a program pulled in
#[derive(Debug, Default)]
struct RuntimeUses {
    format_number: bool,
    div: bool,
    input: bool,
}

/// C source emitter
pub struct CEmitter<'a> {
    checked: &'a CheckedProgram,
    /// String literal pool in first-appearance order
    literals: Vec<String>,
    literal_index: FxHashMap<String, usize>,
    /// Body of `main`, one statement per line
    body: String,
    temps: usize,
    declared: FxHashSet<String>,
    uses: RuntimeUses,
}

impl<'a> CEmitter<'a> {
    /// Emit the C translation of `checked`
    pub fn emit(checked: &'a CheckedProgram) -> Result<String, CodegenError> {
        let mut emitter = CEmitter {
            checked,
            literals: Vec::new(),
            literal_index: FxHashMap::default(),
            body: String::new(),
            temps: 0,
            declared: FxHashSet::default(),
            uses: RuntimeUses::default(),
        };

        for stmt in &checked.program.statements {
            emitter.statement(stmt)?;
        }

        let output = emitter.assemble()?;
        tracing::debug!(
            literals = emitter.literals.len(),
            temps = emitter.temps,
            bytes = output.len(),
            "emitted C"
        );
        Ok(output)
    }

    fn assemble(&self) -> Result<String, CodegenError> {
        let mut out = String::with_capacity(2048 + self.body.len());

        out.push_str("/*\n * Generated by the Trica compiler. Do not edit.\n */\n\n");

        for header in STANDARD_HEADERS {
            writeln!(out, "#include <{}>", header)?;
        }
        let mut seen: Vec<(&str, bool)> = Vec::new();
        for include in &self.checked.program.includes {
            let path = include.path.as_str();
            if include.is_system && STANDARD_HEADERS.contains(&path) {
                continue;
            }
            if seen.contains(&(path, include.is_system)) {
                continue;
            }
            if path.contains(['"', '\n', '>']) {
                return Err(CodegenError::InvalidInclude {
                    path: include.path.clone(),
                    location: include.location,
                });
            }
            seen.push((path, include.is_system));
            if include.is_system {
                writeln!(out, "#include <{}>", path)?;
            } else {
                writeln!(out, "#include \"{}\"", path)?;
            }
        }
        out.push('\n');

        out.push_str(runtime_c::GLOBALS);
        out.push('\n');

        if !self.literals.is_empty() {
            out.push_str("/* String literals */\n");
            for (i, literal) in self.literals.iter().enumerate() {
                writeln!(
                    out,
                    "static const char trica_str_{}[] = \"{}\";",
                    i,
                    escape_c_string(literal)
                )?;
            }
            out.push('\n');
        }

        let mut helpers = vec![
            runtime_c::ALLOC,
            runtime_c::DUP,
            runtime_c::PRINT,
            runtime_c::CONCAT,
            runtime_c::GET_LAST_OUTPUT,
        ];
        if self.uses.format_number {
            helpers.push(runtime_c::FORMAT_NUMBER);
        }
        if self.uses.div {
            helpers.push(runtime_c::DIV);
        }
        if self.uses.input {
            helpers.push(runtime_c::INPUT);
        }
        for helper in helpers {
            out.push_str(helper);
            out.push('\n');
        }

        out.push_str("int main(void) {\n");
        out.push_str(&self.body);
        for i in 0..self.temps {
            writeln!(out, "    free(trica_tmp_{});", i)?;
        }
        out.push_str("    free(trica_last_output);\n");
        out.push_str("    return 0;\n}\n");

        Ok(out)
    }

    fn statement(&mut self, stmt: &Stmt) -> Result<(), CodegenError> {
        match stmt {
            Stmt::Print { expr, .. } => {
                let text = self.string_expr(expr)?;
                self.line(format!("trica_print({});", text))
            }

            Stmt::Assignment { name, value, .. } => {
                let value = self.expr(value)?;
                let var = c_identifier(name);
                if !self.declared.insert(name.clone()) {
                    return self.line(format!("{} = {};", var, value));
                }

                let ty = self.checked.variable_type(name).ok_or_else(|| {
                    TypeError::UndefinedVariable {
                        name: name.clone(),
                        location: stmt.location(),
                    }
                })?;
                self.line(format!("{} {} = {};", c_type(ty), var, value))
            }

            Stmt::Expression { expr, .. } => {
                let value = self.expr(expr)?;
                self.line(format!("(void){};", value))
            }
        }
    }

    /// Lower an expression to a C expression, hoisting heap-producing calls
    fn expr(&mut self, expr: &Expr) -> Result<String, CodegenError> {
        match expr {
            Expr::StringLiteral(s, _) => Ok(self.literal(s)),

            Expr::NumberLiteral(n, location) => {
                if !n.is_finite() {
                    return Err(CodegenError::NonFiniteNumber {
                        location: *location,
                    });
                }
                Ok(format!("{:?}", n))
            }

            Expr::Variable(name, _) => Ok(c_identifier(name)),

            Expr::Property { path, location } => {
                if !path.iter().map(String::as_str).eq(PRINT_OUTPUT) {
                    return Err(TypeError::UnknownProperty {
                        path: path.join("."),
                        location: *location,
                    }
                    .into());
                }
                // Copy so later prints cannot free what this expression holds
                self.hoist("trica_dup(trica_get_last_output())".to_string())
            }

            Expr::Call {
                path,
                args,
                location,
            } => {
                let name = path.join(".");
                let builtin = self
                    .checked
                    .function(&name)
                    .map(|signature| signature.builtin)
                    .ok_or_else(|| TypeError::UndefinedFunction {
                        name: name.clone(),
                        location: *location,
                    })?;

                match builtin {
                    Builtin::ReadLine => {
                        let [prompt] = args.as_slice() else {
                            return Err(TypeError::ArgumentCountMismatch {
                                function: name,
                                expected: 1,
                                got: args.len(),
                                location: *location,
                            }
                            .into());
                        };
                        let prompt = self.expr(prompt)?;
                        self.uses.input = true;
                        self.hoist(format!("trica_input({})", prompt))
                    }
                }
            }

            Expr::Negate { operand, .. } => {
                let operand = self.expr(operand)?;
                Ok(format!("(-{})", operand))
            }

            Expr::BinaryOp {
                op, left, right, ..
            } => {
                let lt = self.checked.type_of(left)?;
                let rt = self.checked.type_of(right)?;

                match op {
                    BinOp::Add if lt == Type::String || rt == Type::String => {
                        let l = self.string_expr(left)?;
                        let r = self.string_expr(right)?;
                        self.hoist(format!("trica_concat({}, {})", l, r))
                    }
                    BinOp::Div => {
                        let l = self.expr(left)?;
                        let r = self.expr(right)?;
                        self.uses.div = true;
                        Ok(format!("trica_div({}, {})", l, r))
                    }
                    _ => {
                        let l = self.expr(left)?;
                        let r = self.expr(right)?;
                        if lt == Type::String && op.is_comparison() {
                            Ok(format!("(strcmp({}, {}) {} 0)", l, r, op.symbol()))
                        } else {
                            Ok(format!("({} {} {})", l, op.symbol(), r))
                        }
                    }
                }
            }
        }
    }

    /// Lower an expression that must produce a C string
    fn string_expr(&mut self, expr: &Expr) -> Result<String, CodegenError> {
        let ty = self.checked.type_of(expr)?;
        let value = self.expr(expr)?;
        match ty {
            Type::String => Ok(value),
            Type::Number => {
                self.uses.format_number = true;
                self.hoist(format!("trica_format_number({})", value))
            }
            Type::Boolean => Err(TypeError::Mismatch {
                expected: "String or Number".to_string(),
                found: ty.to_string(),
                location: expr.location(),
            }
            .into()),
        }
    }

    /// Store a heap-producing C expression in a fresh temporary
    fn hoist(&mut self, value: String) -> Result<String, CodegenError> {
        let name = format!("trica_tmp_{}", self.temps);
        self.temps += 1;
        self.line(format!("char* {} = {};", name, value))?;
        Ok(name)
    }

    fn literal(&mut self, text: &str) -> String {
        let index = match self.literal_index.get(text) {
            Some(&index) => index,
            None => {
                let index = self.literals.len();
                self.literals.push(text.to_string());
                self.literal_index.insert(text.to_string(), index);
                index
            }
        };
        format!("trica_str_{}", index)
    }

    fn line(&mut self, line: String) -> Result<(), CodegenError> {
        writeln!(self.body, "    {}", line)?;
        Ok(())
    }
}

fn c_type(ty: Type) -> &'static str {
    match ty {
        Type::String => "const char*",
        Type::Number => "double",
        Type::Boolean => "int",
    }
}

/// Map a Trica identifier to a C identifier.
///
/// `_` is doubled and any other non-alphanumeric character becomes
/// `_u<hex>_`, so a single `_` always starts an escape and distinct names
/// never map to the same C name.
pub(crate) fn c_identifier(name: &str) -> String {
    let mut out = String::from("trica_var_");
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
        } else if ch == '_' {
            out.push_str("__");
        } else {
            // Infallible for String
            let _ = write!(out, "_u{:x}_", ch as u32);
        }
    }
    out
}

/// Escape a string for a C string literal.
///
/// Bytes outside printable ASCII are written as three-digit octal escapes:
/// a `\x` escape would swallow any hex digit that follows it.
pub(crate) fn escape_c_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous = 0u8;
    for &byte in text.as_bytes() {
        match byte {
            // `??x` would be read as a trigraph
            b'?' if previous == b'?' => out.push_str("\\?"),
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\t' => out.push_str("\\t"),
            b'\r' => out.push_str("\\r"),
            0x20..=0x7e => out.push(byte as char),
            _ => {
                let _ = write!(out, "\\{:03o}", byte);
            }
        }
        previous = byte;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::TypeChecker;
    use crate::parser::Parser;

    fn emit(source: &str) -> String {
        let program = Parser::new(source).unwrap().parse_program().unwrap();
        let checked = TypeChecker::new().check(program).unwrap();
        CEmitter::emit(&checked).unwrap()
    }

    fn main_body(c: &str) -> &str {
        let start = c.find("int main(void) {\n").unwrap();
        &c[start..]
    }

    #[test]
    fn test_escape_c_string() {
        assert_eq!(escape_c_string("plain"), "plain");
        assert_eq!(escape_c_string("a\"b\\c\n\t\r"), "a\\\"b\\\\c\\n\\t\\r");
        // U+00E9 then a hex digit must not merge into one escape
        assert_eq!(escape_c_string("\u{e9}a"), "\\303\\251a");
        assert_eq!(escape_c_string("\u{1f30c}"), "\\360\\237\\214\\214");
        assert_eq!(escape_c_string("\u{7f}"), "\\177");
        assert_eq!(escape_c_string("What??!"), "What?\\?!");
        assert_eq!(escape_c_string("???"), "?\\?\\?");
        assert_eq!(escape_c_string("? ?"), "? ?");
    }

    #[test]
    fn test_c_identifier() {
        assert_eq!(c_identifier("greeting"), "trica_var_greeting");
        assert_eq!(c_identifier("gr\u{f6}\u{df}e"), "trica_var_gr_uf6__udf_e");
        assert_eq!(c_identifier("first_name"), "trica_var_first__name");
        // An ASCII name spelled like an escape stays distinct
        assert_eq!(c_identifier("\u{e9}"), "trica_var__ue9_");
        assert_eq!(c_identifier("_ue9_"), "trica_var___ue9__");
    }

    #[test]
    fn test_hello_universe_shape() {
        let c = emit(
            "Main {\n    Print \"a\"\n    greeting = \"Hello\" + \" \" + \"Universe!\"\n    Print greeting\n    Print \"a\"\n}\n",
        );

        assert!(c.contains("#include <stdio.h>\n#include <stdlib.h>\n#include <string.h>\n"));
        assert!(c.contains("static const char trica_str_0[] = \"a\";"));
        assert!(c.contains("static const char trica_str_1[] = \"Hello\";"));
        assert!(c.contains("static const char trica_str_2[] = \" \";"));
        assert!(c.contains("static const char trica_str_3[] = \"Universe!\";"));
        assert!(!c.contains("trica_str_4"));
        assert!(!c.contains("__forceinline"));

        let body = main_body(&c);
        let expected = "\
int main(void) {
    trica_print(trica_str_0);
    char* trica_tmp_0 = trica_concat(trica_str_1, trica_str_2);
    char* trica_tmp_1 = trica_concat(trica_tmp_0, trica_str_3);
    const char* trica_var_greeting = trica_tmp_1;
    trica_print(trica_var_greeting);
    trica_print(trica_str_0);
    free(trica_tmp_0);
    free(trica_tmp_1);
    free(trica_last_output);
    return 0;
}
";
        assert_eq!(body, expected);
    }

    #[test]
    fn test_print_output_is_duplicated() {
        let c = emit("Print \"x\"\nlast = Print.output\nPrint \"y\"\nPrint last\n");
        let body = main_body(&c);

        assert!(body.contains("char* trica_tmp_0 = trica_dup(trica_get_last_output());"));
        assert!(body.contains("const char* trica_var_last = trica_tmp_0;"));
        assert!(body.contains("free(trica_tmp_0);"));
    }

    #[test]
    fn test_optional_helpers_only_when_used() {
        let c = emit("Print \"x\"\n");
        assert!(!c.contains("trica_format_number"));
        assert!(!c.contains("trica_div"));
        assert!(!c.contains("trica_input"));
        assert!(c.contains("trica: out of memory"));

        let c = emit("import user.input as ask\nn = 6 / 4\nname = ask.input(\"? \")\nPrint name + n\n");
        assert!(c.contains("static char* trica_format_number(double value)"));
        assert!(c.contains("static double trica_div(double a, double b)"));
        assert!(c.contains("static char* trica_input(const char* prompt)"));
        // Fixed notation only, matching the interpreter's number display
        assert!(c.contains("snprintf(buffer, sizeof buffer, \"%.0f\", value);"));
        assert!(c.contains("\"%.*f\", precision, value"));
        assert!(!c.contains("%.*g"));

        let body = main_body(&c);
        assert!(body.contains("double trica_var_n = trica_div(6.0, 4.0);"));
        assert!(body.contains("char* trica_tmp_0 = trica_input(trica_str_0);"));
        assert!(body.contains("char* trica_tmp_1 = trica_format_number(trica_var_n);"));
        assert!(body.contains("char* trica_tmp_2 = trica_concat(trica_var_name, trica_tmp_1);"));
    }

    #[test]
    fn test_reassignment_and_comparisons() {
        let c = emit("x = 1\nx = x + 1\nb = \"a\" < \"b\"\nb = x == 2\n");
        let body = main_body(&c);

        assert!(body.contains("double trica_var_x = 1.0;"));
        assert!(body.contains("trica_var_x = (trica_var_x + 1.0);"));
        assert!(body.contains("int trica_var_b = (strcmp(trica_str_0, trica_str_1) < 0);"));
        assert!(body.contains("trica_var_b = (trica_var_x == 2.0);"));
    }

    #[test]
    fn test_includes_are_merged() {
        let c = emit("include <stdio.h>\ninclude <math.h>\ninclude <math.h>\ninclude \"local.h\"\nPrint \"x\"\n");

        assert_eq!(c.matches("#include <stdio.h>").count(), 1);
        assert_eq!(c.matches("#include <math.h>").count(), 1);
        assert!(c.contains("#include \"local.h\""));
    }
}
