//! Expression parsing implementation
//!
//! One method per precedence level, lowest first:
//!
//! | level      | operators              |
//! |------------|------------------------|
//! | equality   | `==` `!=`              |
//! | comparison | `<` `<=` `>` `>=`      |
//! | term       | `+` `-`                |
//! | factor     | `*` `/`                |
//! | unary      | prefix `-`             |
//!
//! All binary operators are left-associative. Primaries are literals,
//! parenthesized expressions, variables, dotted property paths (`Print.output`)
//! and calls (`ask.input("name? ")`).

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_equality()
    }

    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_comparison()?;

        loop {
            let op = match self.peek() {
                Token::EqEq(_) => BinOp::Eq,
                Token::NotEq(_) => BinOp::Ne,
                _ => break,
            };
            self.advance();
            let right = self.parse_comparison()?;
            left = Self::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_term()?;

        loop {
            let op = match self.peek() {
                Token::Lt(_) => BinOp::Lt,
                Token::Le(_) => BinOp::Le,
                Token::Gt(_) => BinOp::Gt,
                Token::Ge(_) => BinOp::Ge,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            left = Self::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_factor()?;

        loop {
            let op = match self.peek() {
                Token::Plus(_) => BinOp::Add,
                Token::Minus(_) => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_factor()?;
            left = Self::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.peek() {
                Token::Star(_) => BinOp::Mul,
                Token::Slash(_) => BinOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Self::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let loc = self.current_location();
        if self.match_token(&Token::Minus(loc)) {
            let operand = Box::new(self.parse_unary()?);
            return Ok(Expr::Negate {
                operand,
                location: loc,
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let loc = self.current_location();

        match self.peek_token() {
            Token::StringLiteral(value, _) => {
                self.advance();
                Ok(Expr::StringLiteral(value, loc))
            }
            Token::NumberLiteral(value, _) => {
                self.advance();
                Ok(Expr::NumberLiteral(value, loc))
            }
            Token::LParen(_) => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_rparen("after parenthesized expression")?;
                Ok(expr)
            }
            Token::Print(_) => {
                self.advance();
                self.expect_token(
                    &Token::Dot(self.current_location()),
                    "Expected '.' after 'Print' in expression",
                )?;
                let property = self.expect_identifier()?;
                Ok(Expr::Property {
                    path: vec!["Print".to_string(), property],
                    location: loc,
                })
            }
            Token::Ident(name, _) => {
                self.advance();
                let mut path = vec![name];
                while self.match_token(&Token::Dot(self.current_location())) {
                    path.push(self.expect_identifier()?);
                }

                if self.match_token(&Token::LParen(self.current_location())) {
                    let args = self.parse_arguments()?;
                    return Ok(Expr::Call {
                        path,
                        args,
                        location: loc,
                    });
                }

                if path.len() == 1 {
                    let name = path.remove(0);
                    Ok(Expr::Variable(name, loc))
                } else {
                    Ok(Expr::Property {
                        path,
                        location: loc,
                    })
                }
            }
            other => Err(ParseError {
                message: format!("Expected expression, found {}", other),
                location: loc,
            }),
        }
    }

    /// Parse call arguments after the opening '(' up to and including ')'
    fn parse_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();

        if self.match_token(&Token::RParen(self.current_location())) {
            return Ok(args);
        }

        loop {
            args.push(self.parse_expression()?);
            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        self.expect_rparen("after call arguments")?;
        Ok(args)
    }

    fn binary(op: BinOp, left: Expr, right: Expr) -> Expr {
        let location = left.location();
        Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
            location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(source: &str) -> Expr {
        let mut parser = Parser::new(source).unwrap();
        parser.parse_expression().unwrap()
    }

    #[test]
    fn test_precedence() {
        // 1 + 2 * 3 == 7 parses as (1 + (2 * 3)) == 7
        match expr("1 + 2 * 3 == 7") {
            Expr::BinaryOp {
                op: BinOp::Eq,
                left,
                ..
            } => match *left {
                Expr::BinaryOp {
                    op: BinOp::Add,
                    right,
                    ..
                } => assert!(matches!(*right, Expr::BinaryOp { op: BinOp::Mul, .. })),
                other => panic!("Expected addition, got {:?}", other),
            },
            other => panic!("Expected equality, got {:?}", other),
        }
    }

    #[test]
    fn test_parentheses_and_negation() {
        match expr("-(1 - 2)") {
            Expr::Negate { operand, location } => {
                assert_eq!(location, SourceLocation::new(1, 1));
                assert!(matches!(*operand, Expr::BinaryOp { op: BinOp::Sub, .. }));
            }
            other => panic!("Expected negation, got {:?}", other),
        }
    }

    #[test]
    fn test_call_with_dotted_path() {
        match expr("ask.input(\"name? \", 2)") {
            Expr::Call { path, args, .. } => {
                assert_eq!(path, vec!["ask".to_string(), "input".to_string()]);
                assert_eq!(args.len(), 2);
            }
            other => panic!("Expected call, got {:?}", other),
        }

        assert!(matches!(expr("now()"), Expr::Call { ref args, .. } if args.is_empty()));
    }

    #[test]
    fn test_binary_location_is_left_operand() {
        let parsed = expr("  a < b");
        assert_eq!(parsed.location(), SourceLocation::new(1, 3));
    }

    #[test]
    fn test_missing_operand() {
        let mut parser = Parser::new("1 +").unwrap();
        let err = parser.parse_expression().unwrap_err();
        assert!(err.message.contains("Expected expression, found end of file"));
    }
}
