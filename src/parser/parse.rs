//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, helper methods, and the main parse entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, program header (`include`/`import`), `Main` block
//! - `statements`: Parsing `Print`, assignments and expression statements
//! - `expressions`: Parsing expressions by precedence level
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token};
use thiserror::Error;

/// Parser error type
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Parse error at {location}: {message}")]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            message: err.message,
            location: err.location,
        }
    }
}

/// Recursive descent parser for Trica
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self {
            tokens,
            position: 0,
        })
    }

    /// Parse the entire program: header lines, then a `Main` block or bare statements
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut program = Program::new();

        loop {
            self.skip_newlines();
            if self.check(&Token::Include(self.current_location())) {
                program.includes.push(self.parse_include()?);
            } else if self.check(&Token::Import(self.current_location())) {
                program.imports.push(self.parse_import()?);
            } else {
                break;
            }
        }

        if self.check(&Token::Main(self.current_location())) {
            let loc = self.current_location();
            self.advance();
            program.statements = self.parse_main_block()?;
            program.main_location = Some(loc);

            self.skip_newlines();
            if !self.is_at_end() {
                return Err(ParseError {
                    message: format!("Unexpected {} after Main block", self.peek()),
                    location: self.current_location(),
                });
            }
        } else {
            while !self.is_at_end() {
                program.statements.push(self.parse_statement()?);
                self.skip_newlines();
            }
        }

        tracing::debug!(
            includes = program.includes.len(),
            imports = program.imports.len(),
            statements = program.statements.len(),
            "parsed program"
        );
        Ok(program)
    }

    /// Parse `include <a/b.h>` or `include "local.h"`
    fn parse_include(&mut self) -> Result<Include, ParseError> {
        let loc = self.current_location();
        self.advance(); // consume 'include'

        match self.peek_token() {
            Token::StringLiteral(path, _) => {
                self.advance();
                self.expect_line_end("after include path")?;
                Ok(Include {
                    path,
                    is_system: false,
                    location: loc,
                })
            }
            Token::Lt(_) => {
                self.advance();
                let mut path = self.expect_identifier()?;
                loop {
                    if self.match_token(&Token::Dot(self.current_location())) {
                        path.push('.');
                    } else if self.match_token(&Token::Slash(self.current_location())) {
                        path.push('/');
                    } else {
                        break;
                    }
                    path.push_str(&self.expect_identifier()?);
                }
                self.expect_token(
                    &Token::Gt(self.current_location()),
                    "Expected '>' after header name",
                )?;
                self.expect_line_end("after include")?;
                Ok(Include {
                    path,
                    is_system: true,
                    location: loc,
                })
            }
            other => Err(ParseError {
                message: format!("Expected '<' or string literal after 'include', found {}", other),
                location: self.current_location(),
            }),
        }
    }

    /// Parse `import a.b as alias`
    fn parse_import(&mut self) -> Result<Import, ParseError> {
        let loc = self.current_location();
        self.advance(); // consume 'import'

        let mut module_path = vec![self.expect_identifier()?];
        while self.match_token(&Token::Dot(self.current_location())) {
            module_path.push(self.expect_identifier()?);
        }

        self.expect_token(
            &Token::As(self.current_location()),
            "Expected 'as' after module path",
        )?;
        let alias = self.expect_identifier()?;
        self.expect_line_end("after import")?;

        Ok(Import {
            module_path,
            alias,
            location: loc,
        })
    }

    /// Parse `{ statements }` after the `Main` keyword
    fn parse_main_block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.expect_lbrace("after 'Main'")?;
        self.skip_newlines();

        let mut statements = Vec::new();
        while !self.check(&Token::RBrace(self.current_location())) && !self.is_at_end() {
            statements.push(self.parse_statement()?);
            self.skip_newlines();
        }

        self.expect_rbrace("to close Main block")?;
        Ok(statements)
    }

    // ===== Helper methods =====

    pub(crate) fn match_token(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek(), Token::Eof(_))
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    pub(crate) fn peek_token(&self) -> Token {
        self.tokens[self.position].clone()
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location()
    }

    pub(crate) fn skip_newlines(&mut self) {
        while self.match_token(&Token::Newline(self.current_location())) {}
    }

    pub(crate) fn expect_token(&mut self, token: &Token, message: &str) -> Result<(), ParseError> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError {
                message: format!("{}, found {}", message, self.peek()),
                location: self.current_location(),
            })
        }
    }

    pub(crate) fn expect_rparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::RParen(self.current_location()),
            &format!("Expected ')' {ctx}"),
        )
    }

    pub(crate) fn expect_lbrace(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::LBrace(self.current_location()),
            &format!("Expected '{{' {ctx}"),
        )
    }

    pub(crate) fn expect_rbrace(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::RBrace(self.current_location()),
            &format!("Expected '}}' {ctx}"),
        )
    }

    /// Header lines must end at a newline (or the end of the file)
    fn expect_line_end(&mut self, ctx: &str) -> Result<(), ParseError> {
        if self.is_at_end() || self.match_token(&Token::Newline(self.current_location())) {
            Ok(())
        } else {
            Err(ParseError {
                message: format!("Expected end of line {ctx}, found {}", self.peek()),
                location: self.current_location(),
            })
        }
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if let Token::Ident(name, _) = self.peek_token() {
            self.advance();
            Ok(name)
        } else {
            Err(ParseError {
                message: format!("Expected identifier, found {}", self.peek()),
                location: self.current_location(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_main_block() {
        let source = "Main {\n    Print \"Hello, World!\"\n}\n";
        let mut parser = Parser::new(source).unwrap();
        let program = parser.parse_program().unwrap();

        assert_eq!(program.statements.len(), 1);
        assert_eq!(program.main_location, Some(SourceLocation::new(1, 1)));
        match &program.statements[0] {
            Stmt::Print { expr, location } => {
                assert_eq!(*location, SourceLocation::new(2, 5));
                assert!(matches!(expr, Expr::StringLiteral(s, _) if s == "Hello, World!"));
            }
            other => panic!("Expected print statement, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_bare_statements() {
        let source = "Print \"a\"\nx = \"b\"\nPrint x\n";
        let mut parser = Parser::new(source).unwrap();
        let program = parser.parse_program().unwrap();

        assert_eq!(program.statements.len(), 3);
        assert!(program.main_location.is_none());
    }

    #[test]
    fn test_parse_header() {
        let source = "include <stdio.h>\ninclude <sys/types.h>\ninclude \"local.h\"\nimport user.input as ask\n\nMain {\n}\n";
        let mut parser = Parser::new(source).unwrap();
        let program = parser.parse_program().unwrap();

        assert_eq!(program.includes.len(), 3);
        assert_eq!(program.includes[0].path, "stdio.h");
        assert!(program.includes[0].is_system);
        assert_eq!(program.includes[1].path, "sys/types.h");
        assert_eq!(program.includes[2].path, "local.h");
        assert!(!program.includes[2].is_system);

        assert_eq!(program.imports.len(), 1);
        assert_eq!(program.imports[0].module_name(), "user.input");
        assert_eq!(program.imports[0].alias, "ask");
        assert!(program.statements.is_empty());
    }

    #[test]
    fn test_empty_program() {
        let mut parser = Parser::new("\n// nothing here\n").unwrap();
        let program = parser.parse_program().unwrap();

        assert!(program.statements.is_empty());
        assert!(program.includes.is_empty());
    }

    #[test]
    fn test_trailing_tokens_after_main_are_rejected() {
        let mut parser = Parser::new("Main {\n}\nPrint \"late\"\n").unwrap();
        let err = parser.parse_program().unwrap_err();

        assert_eq!(err.location, SourceLocation::new(3, 1));
        assert!(err.message.contains("after Main block"));
    }

    #[test]
    fn test_unclosed_main_block() {
        let mut parser = Parser::new("Main {\n    Print \"x\"\n").unwrap();
        let err = parser.parse_program().unwrap_err();

        assert!(err.message.contains("Expected '}'"));
    }

    #[test]
    fn test_lex_errors_surface_as_parse_errors() {
        let err = Parser::new("Print \"open").err().unwrap();
        assert!(err.message.contains("Unterminated"));
        assert_eq!(err.location, SourceLocation::new(1, 7));
    }
}
