//! Statement parsing implementation
//!
//! Trica has three statement forms, each terminated by a newline, the closing
//! `}` of the `Main` block, or the end of the file:
//!
//! - `Print <expr>`
//! - `<name> = <expr>`
//! - a bare expression (e.g. `Print.output` or a call)

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.current_location();

        let stmt = match self.peek() {
            // `Print.output` starts an expression, not a print
            Token::Print(_) if !matches!(self.peek_ahead(1), Some(Token::Dot(_))) => {
                self.advance();
                let expr = self.parse_expression()?;
                Stmt::Print {
                    expr,
                    location: loc,
                }
            }
            Token::Ident(_, _) if matches!(self.peek_ahead(1), Some(Token::Eq(_))) => {
                let name = self.expect_identifier()?;
                self.advance(); // consume '='
                let value = self.parse_expression()?;
                Stmt::Assignment {
                    name,
                    value,
                    location: loc,
                }
            }
            _ => {
                let expr = self.parse_expression()?;
                Stmt::Expression {
                    expr,
                    location: loc,
                }
            }
        };

        self.expect_statement_end()?;
        Ok(stmt)
    }

    fn expect_statement_end(&mut self) -> Result<(), ParseError> {
        match self.peek() {
            Token::Newline(_) | Token::RBrace(_) | Token::Eof(_) => Ok(()),
            other => Err(ParseError {
                message: format!("Expected end of statement, found {}", other),
                location: self.current_location(),
            }),
        }
    }
}
