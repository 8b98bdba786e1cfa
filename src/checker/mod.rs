//! Static type checking for Trica programs
//!
//! The checker runs between the parser and both back ends (interpreter and C
//! emitter). It resolves `import` lines into callable functions, assigns a
//! [`Type`] to every variable on first assignment and rejects programs whose
//! operands do not fit their operators.
//!
//! # Type rules
//!
//! | expression            | operands             | result    |
//! |-----------------------|----------------------|-----------|
//! | `a + b`               | N,N                  | Number    |
//! | `a + b`               | S,S / S,N / N,S      | String    |
//! | `a - b` `a * b` `a / b` | N,N                | Number    |
//! | `-a`                  | N                    | Number    |
//! | `a == b` `a != b`     | same type            | Boolean   |
//! | `a < b` (and friends) | N,N or S,S           | Boolean   |
//! | `Print.output`        |                      | String    |
//!
//! `Print e` accepts strings and numbers only.

pub mod errors;

pub use errors::TypeError;

use crate::parser::ast::*;
use rustc_hash::FxHashMap;

/// Module that provides line input: `import user.input as ask` → `ask.input(prompt)`
pub const INPUT_MODULE: &str = "user.input";

/// The only property path the language defines
pub const PRINT_OUTPUT: [&str; 2] = ["Print", "output"];

/// Operations a call can resolve to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// Prompt and read one line of input
    ReadLine,
}

/// Signature of a callable registered by an `import`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub params: Vec<Type>,
    pub return_type: Type,
    pub builtin: Builtin,
}

/// A program that passed type checking, together with its symbol tables
#[derive(Debug, Clone)]
pub struct CheckedProgram {
    pub program: Program,
    /// Variables in order of first assignment
    variables: Vec<(String, Type)>,
    variable_index: FxHashMap<String, usize>,
    functions: FxHashMap<String, FunctionSignature>,
}

impl CheckedProgram {
    pub fn variables(&self) -> &[(String, Type)] {
        &self.variables
    }

    pub fn variable_type(&self, name: &str) -> Option<Type> {
        self.variable_index
            .get(name)
            .map(|&index| self.variables[index].1)
    }

    /// Look up a function by its dotted call path (`ask.input`)
    pub fn function(&self, name: &str) -> Option<&FunctionSignature> {
        self.functions.get(name)
    }

    /// Type of an expression under the final symbol tables.
    ///
    /// A variable keeps one type for its whole life, so the final table is
    /// valid at every point in the program.
    pub fn type_of(&self, expr: &Expr) -> Result<Type, TypeError> {
        infer(expr, &|name| self.variable_type(name), &self.functions)
    }
}

/// Type checker state
pub struct TypeChecker {
    variables: Vec<(String, Type)>,
    variable_index: FxHashMap<String, usize>,
    functions: FxHashMap<String, FunctionSignature>,
}

impl TypeChecker {
    pub fn new() -> Self {
        TypeChecker {
            variables: Vec::new(),
            variable_index: FxHashMap::default(),
            functions: FxHashMap::default(),
        }
    }

    /// Check a whole program, consuming it into a [`CheckedProgram`]
    pub fn check(mut self, program: Program) -> Result<CheckedProgram, TypeError> {
        for include in &program.includes {
            if include.path.trim().is_empty() {
                return Err(TypeError::InvalidInclude {
                    message: "empty header path".to_string(),
                    location: include.location,
                });
            }
        }

        for import in &program.imports {
            self.register_import(import);
        }

        for stmt in &program.statements {
            self.check_statement(stmt)?;
        }

        tracing::debug!(
            variables = self.variables.len(),
            functions = self.functions.len(),
            "type check passed"
        );

        Ok(CheckedProgram {
            program,
            variables: self.variables,
            variable_index: self.variable_index,
            functions: self.functions,
        })
    }

    fn register_import(&mut self, import: &Import) {
        let module = import.module_name();
        if module == INPUT_MODULE {
            self.functions.insert(
                format!("{}.input", import.alias),
                FunctionSignature {
                    params: vec![Type::String],
                    return_type: Type::String,
                    builtin: Builtin::ReadLine,
                },
            );
        } else {
            tracing::warn!(
                module = %module,
                alias = %import.alias,
                line = import.location.line,
                "unknown module imported, nothing registered"
            );
        }
    }

    fn check_statement(&mut self, stmt: &Stmt) -> Result<(), TypeError> {
        match stmt {
            Stmt::Print { expr, .. } => {
                let ty = self.expr_type(expr)?;
                if ty == Type::Boolean {
                    return Err(TypeError::Mismatch {
                        expected: "String or Number".to_string(),
                        found: ty.to_string(),
                        location: expr.location(),
                    });
                }
                Ok(())
            }

            Stmt::Assignment {
                name,
                value,
                location,
            } => {
                let ty = self.expr_type(value)?;
                match self.variable_index.get(name) {
                    Some(&index) => {
                        let declared = self.variables[index].1;
                        if declared != ty {
                            return Err(TypeError::Mismatch {
                                expected: declared.to_string(),
                                found: ty.to_string(),
                                location: *location,
                            });
                        }
                    }
                    None => {
                        self.variable_index
                            .insert(name.clone(), self.variables.len());
                        self.variables.push((name.clone(), ty));
                    }
                }
                Ok(())
            }

            Stmt::Expression { expr, .. } => self.expr_type(expr).map(|_| ()),
        }
    }

    fn expr_type(&self, expr: &Expr) -> Result<Type, TypeError> {
        let lookup = |name: &str| {
            self.variable_index
                .get(name)
                .map(|&index| self.variables[index].1)
        };
        infer(expr, &lookup, &self.functions)
    }
}

impl Default for TypeChecker {
    fn default() -> Self {
        Self::new()
    }
}

fn infer(
    expr: &Expr,
    variables: &dyn Fn(&str) -> Option<Type>,
    functions: &FxHashMap<String, FunctionSignature>,
) -> Result<Type, TypeError> {
    match expr {
        Expr::StringLiteral(..) => Ok(Type::String),
        Expr::NumberLiteral(..) => Ok(Type::Number),

        Expr::Variable(name, location) => {
            variables(name).ok_or_else(|| TypeError::UndefinedVariable {
                name: name.clone(),
                location: *location,
            })
        }

        Expr::Property { path, location } => {
            if path.iter().map(String::as_str).eq(PRINT_OUTPUT) {
                Ok(Type::String)
            } else {
                Err(TypeError::UnknownProperty {
                    path: path.join("."),
                    location: *location,
                })
            }
        }

        Expr::Call {
            path,
            args,
            location,
        } => {
            let name = path.join(".");
            let signature = functions
                .get(&name)
                .ok_or_else(|| TypeError::UndefinedFunction {
                    name: name.clone(),
                    location: *location,
                })?;

            if args.len() != signature.params.len() {
                return Err(TypeError::ArgumentCountMismatch {
                    function: name,
                    expected: signature.params.len(),
                    got: args.len(),
                    location: *location,
                });
            }

            for (arg, &param) in args.iter().zip(&signature.params) {
                let ty = infer(arg, variables, functions)?;
                if ty != param {
                    return Err(TypeError::Mismatch {
                        expected: param.to_string(),
                        found: ty.to_string(),
                        location: arg.location(),
                    });
                }
            }

            Ok(signature.return_type)
        }

        Expr::Negate { operand, .. } => {
            let ty = infer(operand, variables, functions)?;
            expect_number(ty, operand.location())?;
            Ok(Type::Number)
        }

        Expr::BinaryOp {
            op,
            left,
            right,
            location,
        } => {
            let lt = infer(left, variables, functions)?;
            let rt = infer(right, variables, functions)?;
            binary_result(*op, lt, rt, left.location(), right.location(), *location)
        }
    }
}

fn binary_result(
    op: BinOp,
    lt: Type,
    rt: Type,
    left_loc: SourceLocation,
    right_loc: SourceLocation,
    location: SourceLocation,
) -> Result<Type, TypeError> {
    use Type::*;

    match op {
        BinOp::Add => match (lt, rt) {
            (Number, Number) => Ok(Number),
            (String, String) | (String, Number) | (Number, String) => Ok(String),
            (Boolean, _) => Err(mismatch("String or Number", lt, left_loc)),
            (_, _) => Err(mismatch("String or Number", rt, right_loc)),
        },

        BinOp::Sub | BinOp::Mul | BinOp::Div => {
            expect_number(lt, left_loc)?;
            expect_number(rt, right_loc)?;
            Ok(Number)
        }

        BinOp::Eq | BinOp::Ne => {
            if lt == rt {
                Ok(Boolean)
            } else {
                Err(mismatch(&lt.to_string(), rt, right_loc))
            }
        }

        BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => match (lt, rt) {
            (Number, Number) | (String, String) => Ok(Boolean),
            (Boolean, _) => Err(TypeError::Mismatch {
                expected: "String or Number".to_string(),
                found: lt.to_string(),
                location,
            }),
            (_, _) => Err(mismatch(&lt.to_string(), rt, right_loc)),
        },
    }
}

fn expect_number(ty: Type, location: SourceLocation) -> Result<(), TypeError> {
    if ty == Type::Number {
        Ok(())
    } else {
        Err(mismatch("Number", ty, location))
    }
}

fn mismatch(expected: &str, found: Type, location: SourceLocation) -> TypeError {
    TypeError::Mismatch {
        expected: expected.to_string(),
        found: found.to_string(),
        location,
    }
}
