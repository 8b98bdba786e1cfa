//! Lexer (tokenizer) for Trica source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! Newlines are significant in Trica (they separate statements), so unlike
//! spaces and tabs they are emitted as [`Token::Newline`].

use super::ast::SourceLocation;
use std::fmt;
use thiserror::Error;

/// All token variants produced by the lexer.
///
/// Every variant carries a [`SourceLocation`] so that parse errors can report
/// an accurate line and column without a separate token→location table.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    StringLiteral(String, SourceLocation),
    NumberLiteral(f64, SourceLocation),

    // Identifiers
    Ident(String, SourceLocation),

    // Keywords
    Include(SourceLocation),
    Import(SourceLocation),
    As(SourceLocation),
    Main(SourceLocation),
    Print(SourceLocation),

    // Arithmetic
    Plus(SourceLocation),  // +
    Minus(SourceLocation), // -
    Star(SourceLocation),  // *
    Slash(SourceLocation), // /

    // Comparison
    EqEq(SourceLocation),  // ==
    NotEq(SourceLocation), // !=
    Lt(SourceLocation),    // <
    Le(SourceLocation),    // <=
    Gt(SourceLocation),    // >
    Ge(SourceLocation),    // >=

    // Assignment
    Eq(SourceLocation), // =

    // Punctuation
    Dot(SourceLocation),    // .
    Comma(SourceLocation),  // ,
    LParen(SourceLocation), // (
    RParen(SourceLocation), // )
    LBrace(SourceLocation), // {
    RBrace(SourceLocation), // }

    // Statement separator
    Newline(SourceLocation),

    // End of file
    Eof(SourceLocation),
}

impl Token {
    /// Returns the source location where this token appears.
    pub fn location(&self) -> SourceLocation {
        match self {
            Token::StringLiteral(_, loc)
            | Token::NumberLiteral(_, loc)
            | Token::Ident(_, loc)
            | Token::Include(loc)
            | Token::Import(loc)
            | Token::As(loc)
            | Token::Main(loc)
            | Token::Print(loc)
            | Token::Plus(loc)
            | Token::Minus(loc)
            | Token::Star(loc)
            | Token::Slash(loc)
            | Token::EqEq(loc)
            | Token::NotEq(loc)
            | Token::Lt(loc)
            | Token::Le(loc)
            | Token::Gt(loc)
            | Token::Ge(loc)
            | Token::Eq(loc)
            | Token::Dot(loc)
            | Token::Comma(loc)
            | Token::LParen(loc)
            | Token::RParen(loc)
            | Token::LBrace(loc)
            | Token::RBrace(loc)
            | Token::Newline(loc)
            | Token::Eof(loc) => *loc,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::StringLiteral(s, _) => write!(f, "string literal \"{}\"", s.escape_debug()),
            Token::NumberLiteral(n, _) => write!(f, "number literal {}", n),
            Token::Ident(s, _) => write!(f, "identifier '{}'", s),
            Token::Include(_) => write!(f, "'include'"),
            Token::Import(_) => write!(f, "'import'"),
            Token::As(_) => write!(f, "'as'"),
            Token::Main(_) => write!(f, "'Main'"),
            Token::Print(_) => write!(f, "'Print'"),
            Token::Plus(_) => write!(f, "'+'"),
            Token::Minus(_) => write!(f, "'-'"),
            Token::Star(_) => write!(f, "'*'"),
            Token::Slash(_) => write!(f, "'/'"),
            Token::EqEq(_) => write!(f, "'=='"),
            Token::NotEq(_) => write!(f, "'!='"),
            Token::Lt(_) => write!(f, "'<'"),
            Token::Le(_) => write!(f, "'<='"),
            Token::Gt(_) => write!(f, "'>'"),
            Token::Ge(_) => write!(f, "'>='"),
            Token::Eq(_) => write!(f, "'='"),
            Token::Dot(_) => write!(f, "'.'"),
            Token::Comma(_) => write!(f, "','"),
            Token::LParen(_) => write!(f, "'('"),
            Token::RParen(_) => write!(f, "')'"),
            Token::LBrace(_) => write!(f, "'{{'"),
            Token::RBrace(_) => write!(f, "'}}'"),
            Token::Newline(_) => write!(f, "newline"),
            Token::Eof(_) => write!(f, "end of file"),
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Lexer error at {location}: {message}")]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

/// Lexer for Trica source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_blanks_and_comments();

            if self.is_at_end() {
                tokens.push(Token::Eof(self.current_location()));
                break;
            }

            tokens.push(self.next_token()?);
        }

        tracing::trace!(count = tokens.len(), "tokenized source");
        Ok(tokens)
    }

    /// Get next token
    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let ch = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of file".to_string(),
            location: loc,
        })?;

        match ch {
            '\n' => Ok(Token::Newline(loc)),

            '"' => self.string_literal(loc),

            '0'..='9' => self.number_literal(ch, loc),

            c if c.is_alphabetic() || c == '_' => Ok(self.identifier_or_keyword(c, loc)),

            '+' => Ok(Token::Plus(loc)),
            '-' => Ok(Token::Minus(loc)),
            '*' => Ok(Token::Star(loc)),
            '/' => Ok(Token::Slash(loc)),
            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::EqEq(loc))
                } else {
                    Ok(Token::Eq(loc))
                }
            }
            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::NotEq(loc))
                } else {
                    Err(LexError {
                        message: "Unexpected character: '!' (did you mean '!='?)".to_string(),
                        location: loc,
                    })
                }
            }
            '<' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::Le(loc))
                } else {
                    Ok(Token::Lt(loc))
                }
            }
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::Ge(loc))
                } else {
                    Ok(Token::Gt(loc))
                }
            }
            '.' => Ok(Token::Dot(loc)),
            ',' => Ok(Token::Comma(loc)),
            '(' => Ok(Token::LParen(loc)),
            ')' => Ok(Token::RParen(loc)),
            '{' => Ok(Token::LBrace(loc)),
            '}' => Ok(Token::RBrace(loc)),

            _ => Err(LexError {
                message: format!("Unexpected character: '{}'", ch),
                location: loc,
            }),
        }
    }

    /// Parse string literal. Strings may not span lines.
    fn string_literal(&mut self, loc: SourceLocation) -> Result<Token, LexError> {
        let mut string = String::new();

        while let Some(ch) = self.peek() {
            match ch {
                '"' => {
                    self.advance(); // consume closing quote
                    return Ok(Token::StringLiteral(string, loc));
                }
                '\n' => break,
                '\\' => {
                    self.advance();
                    match self.peek() {
                        Some('n') => string.push('\n'),
                        Some('t') => string.push('\t'),
                        Some('r') => string.push('\r'),
                        Some('\\') => string.push('\\'),
                        Some('"') => string.push('"'),
                        // Unknown escapes are kept as written
                        Some(other) if other != '\n' => {
                            string.push('\\');
                            string.push(other);
                        }
                        _ => break,
                    }
                    self.advance();
                }
                _ => {
                    string.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError {
            message: "Unterminated string literal".to_string(),
            location: loc,
        })
    }

    /// Parse number literal: digits with optional '.' parts, read as f64
    fn number_literal(&mut self, first: char, loc: SourceLocation) -> Result<Token, LexError> {
        let mut text = String::from(first);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() || ch == '.' {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        text.parse::<f64>()
            .map(|value| Token::NumberLiteral(value, loc))
            .map_err(|_| LexError {
                message: format!("Invalid number '{}'", text),
                location: loc,
            })
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, first: char, loc: SourceLocation) -> Token {
        let mut ident = String::from(first);

        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        match ident.as_str() {
            "include" => Token::Include(loc),
            "import" => Token::Import(loc),
            "as" => Token::As(loc),
            "Main" => Token::Main(loc),
            "Print" => Token::Print(loc),
            _ => Token::Ident(ident, loc),
        }
    }

    /// Skip spaces, tabs, carriage returns and `//` comments (newlines are kept)
    fn skip_blanks_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') => {
                    self.advance();
                }
                Some('/') if self.peek_ahead(1) == Some('/') => {
                    while let Some(ch) = self.peek() {
                        if ch == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = *self.input.get(self.position)?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    /// Check if at end of input
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Get current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_tokens() {
        let mut lexer = Lexer::new("Main {\n    Print \"Hello\"\n}");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::Main(_)));
        assert!(matches!(tokens[1], Token::LBrace(_)));
        assert!(matches!(tokens[2], Token::Newline(_)));
        assert!(matches!(tokens[3], Token::Print(_)));
        assert!(matches!(tokens[4], Token::StringLiteral(ref s, _) if s == "Hello"));
        assert!(matches!(tokens[5], Token::Newline(_)));
        assert!(matches!(tokens[6], Token::RBrace(_)));
        assert!(matches!(tokens[7], Token::Eof(_)));
    }

    #[test]
    fn test_operators() {
        let mut lexer = Lexer::new("== != <= >= < > = + - * /");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::EqEq(_)));
        assert!(matches!(tokens[1], Token::NotEq(_)));
        assert!(matches!(tokens[2], Token::Le(_)));
        assert!(matches!(tokens[3], Token::Ge(_)));
        assert!(matches!(tokens[4], Token::Lt(_)));
        assert!(matches!(tokens[5], Token::Gt(_)));
        assert!(matches!(tokens[6], Token::Eq(_)));
        assert!(matches!(tokens[7], Token::Plus(_)));
        assert!(matches!(tokens[8], Token::Minus(_)));
        assert!(matches!(tokens[9], Token::Star(_)));
        assert!(matches!(tokens[10], Token::Slash(_)));
    }

    #[test]
    fn test_comments() {
        let mut lexer = Lexer::new("x = 1 // set x\ny = 2");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::Ident(ref s, _) if s == "x"));
        assert!(matches!(tokens[1], Token::Eq(_)));
        assert!(matches!(tokens[2], Token::NumberLiteral(n, _) if n == 1.0));
        assert!(matches!(tokens[3], Token::Newline(_)));
        assert!(matches!(tokens[4], Token::Ident(ref s, _) if s == "y"));
    }

    #[test]
    fn test_string_escapes() {
        let mut lexer = Lexer::new(r#""tab\there \"quoted\" back\\slash \q""#);
        let tokens = lexer.tokenize().unwrap();

        match &tokens[0] {
            Token::StringLiteral(s, _) => {
                assert_eq!(s, "tab\there \"quoted\" back\\slash \\q");
            }
            other => panic!("Expected string literal, got {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_string_reports_opening_quote() {
        let mut lexer = Lexer::new("Print \"oops\nPrint \"fine\"");
        let err = lexer.tokenize().unwrap_err();

        assert_eq!(err.location, SourceLocation::new(1, 7));
        assert!(err.message.contains("Unterminated"));
    }

    #[test]
    fn test_numbers() {
        let mut lexer = Lexer::new("42 2.5");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::NumberLiteral(n, _) if n == 42.0));
        assert!(matches!(tokens[1], Token::NumberLiteral(n, _) if n == 2.5));

        let err = Lexer::new("1.2.3").tokenize().unwrap_err();
        assert!(err.message.contains("Invalid number '1.2.3'"));
    }

    #[test]
    fn test_lone_bang_is_rejected() {
        let err = Lexer::new("x = !y").tokenize().unwrap_err();
        assert_eq!(err.location, SourceLocation::new(1, 5));
    }

    #[test]
    fn test_unicode_in_strings_and_locations() {
        let mut lexer = Lexer::new("Print \"🔥 hot\"\nx");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[1], Token::StringLiteral(ref s, _) if s == "🔥 hot"));
        assert_eq!(tokens[3].location(), SourceLocation::new(2, 1));
    }
}
