// AST (Abstract Syntax Tree) definitions for Trica programs

use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Value types known to the checker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    String,
    Number,
    Boolean,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Type::String => "String",
            Type::Number => "Number",
            Type::Boolean => "Boolean",
        })
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic (Add doubles as string concatenation)
    Add,
    Sub,
    Mul,
    Div,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge
        )
    }
}

/// `include <stdio.h>` or `include "local.h"`
#[derive(Debug, Clone, PartialEq)]
pub struct Include {
    pub path: String,
    /// true for `<...>`, false for `"..."`
    pub is_system: bool,
    pub location: SourceLocation,
}

/// `import user.input as ask`
#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub module_path: Vec<String>,
    pub alias: String,
    pub location: SourceLocation,
}

impl Import {
    /// Dotted module name, e.g. `user.input`
    pub fn module_name(&self) -> String {
        self.module_path.join(".")
    }
}

/// Expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    StringLiteral(String, SourceLocation),
    NumberLiteral(f64, SourceLocation),
    Variable(String, SourceLocation),

    /// Dotted property path such as `Print.output`
    Property {
        path: Vec<String>,
        location: SourceLocation,
    },

    /// Call through a (possibly dotted) name: `ask.input("name? ")`
    Call {
        path: Vec<String>,
        args: Vec<Expr>,
        location: SourceLocation,
    },

    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        location: SourceLocation,
    },

    Negate {
        operand: Box<Expr>,
        location: SourceLocation,
    },
}

impl Expr {
    pub fn location(&self) -> SourceLocation {
        match self {
            Expr::StringLiteral(_, loc) | Expr::NumberLiteral(_, loc) | Expr::Variable(_, loc) => {
                *loc
            }
            Expr::Property { location, .. }
            | Expr::Call { location, .. }
            | Expr::BinaryOp { location, .. }
            | Expr::Negate { location, .. } => *location,
        }
    }
}

/// Statements
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Print {
        expr: Expr,
        location: SourceLocation,
    },
    Assignment {
        name: String,
        value: Expr,
        location: SourceLocation,
    },
    Expression {
        expr: Expr,
        location: SourceLocation,
    },
}

impl Stmt {
    pub fn location(&self) -> SourceLocation {
        match self {
            Stmt::Print { location, .. }
            | Stmt::Assignment { location, .. }
            | Stmt::Expression { location, .. } => *location,
        }
    }
}

/// A parsed program: header lines followed by the statement body.
///
/// The body comes either from a `Main { ... }` block or from bare top-level
/// statements; `main_location` is set only in the first case.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub includes: Vec<Include>,
    pub imports: Vec<Import>,
    pub statements: Vec<Stmt>,
    pub main_location: Option<SourceLocation>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }
}
