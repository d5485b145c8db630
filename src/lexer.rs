use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use crate::span::Position;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    /// `'single'` or `'''triple'''` quoted string.
    Str(String),
    /// `"double quoted"` name or type.
    Quoted(String),
    /// `` `backtick` `` expression.
    Expr(String),
    Num(String),
    /// `#rrggbb` colour literal, kept with its leading `#`.
    Color(String),

    LBrace,   // {
    RBrace,   // }
    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]
    Comma,    // ,
    Colon,    // :
    Dot,      // .
    Gt,       // >
    Lt,       // <
    Dash,     // -
    LtGt,     // <>

    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(s) => write!(f, "identifier `{}`", s),
            Token::Str(s) => write!(f, "string '{}'", s),
            Token::Quoted(s) => write!(f, "quoted name \"{}\"", s),
            Token::Expr(s) => write!(f, "expression `{}`", s),
            Token::Num(s) => write!(f, "number {}", s),
            Token::Color(s) => write!(f, "colour {}", s),
            Token::LBrace => f.write_str("'{'"),
            Token::RBrace => f.write_str("'}'"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
            Token::LBracket => f.write_str("'['"),
            Token::RBracket => f.write_str("']'"),
            Token::Comma => f.write_str("','"),
            Token::Colon => f.write_str("':'"),
            Token::Dot => f.write_str("'.'"),
            Token::Gt => f.write_str("'>'"),
            Token::Lt => f.write_str("'<'"),
            Token::Dash => f.write_str("'-'"),
            Token::LtGt => f.write_str("'<>'"),
            Token::Eof => f.write_str("end of input"),
        }
    }
}

/// A token together with the position of its first character.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub pos: Position,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexError {
    #[error("Unexpected character: {ch:?}")]
    UnexpectedChar { ch: char, pos: Position },
    #[error("Unterminated string")]
    UnterminatedString { pos: Position },
    #[error("Unterminated comment")]
    UnterminatedComment { pos: Position },
}

impl LexError {
    pub fn position(&self) -> Position {
        match self {
            LexError::UnexpectedChar { pos, .. }
            | LexError::UnterminatedString { pos }
            | LexError::UnterminatedComment { pos } => *pos,
        }
    }
}

pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Look one character past the peeked one.
    fn peek_second(&self) -> Option<char> {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next()
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.chars.peek().copied() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') if self.peek_second() == Some('/') => {
                    while let Some(&c) = self.chars.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                Some('/') if self.peek_second() == Some('*') => {
                    let start = self.position();
                    self.bump();
                    self.bump();
                    loop {
                        match self.bump() {
                            Some('*') if self.chars.peek() == Some(&'/') => {
                                self.bump();
                                break;
                            }
                            Some(_) => {}
                            None => return Err(LexError::UnterminatedComment { pos: start }),
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn read_ident(&mut self, first: char) -> String {
        self.continue_ident(String::from(first))
    }

    fn continue_ident(&mut self, mut s: String) -> String {
        while let Some(&c) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                s.push(c);
                self.bump();
            } else {
                break;
            }
        }
        s
    }

    fn read_quoted(&mut self, quote: char, start: Position) -> Result<String, LexError> {
        let mut s = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(s),
                Some('\\') => match self.bump() {
                    Some('n') => s.push('\n'),
                    Some('t') => s.push('\t'),
                    Some('r') => s.push('\r'),
                    Some(c) => s.push(c),
                    None => return Err(LexError::UnterminatedString { pos: start }),
                },
                Some('\n') if quote != '`' => {
                    return Err(LexError::UnterminatedString { pos: start });
                }
                Some(c) => s.push(c),
                None => return Err(LexError::UnterminatedString { pos: start }),
            }
        }
    }

    fn read_triple_quoted(&mut self, start: Position) -> Result<String, LexError> {
        let mut s = String::new();
        loop {
            match self.bump() {
                Some('\'') if self.chars.peek() == Some(&'\'') && self.peek_second() == Some('\'') => {
                    self.bump();
                    self.bump();
                    return Ok(s);
                }
                Some('\\') => {
                    if let Some(c) = self.bump() {
                        s.push(c);
                    }
                }
                Some(c) => s.push(c),
                None => return Err(LexError::UnterminatedString { pos: start }),
            }
        }
    }

    fn read_number(&mut self, first: char) -> String {
        let mut s = String::from(first);
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() || (c == '.' && !s.contains('.')) {
                s.push(c);
                self.bump();
            } else {
                break;
            }
        }
        s
    }

    fn read_color(&mut self) -> String {
        let mut s = String::from('#');
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_hexdigit() {
                s.push(c);
                self.bump();
            } else {
                break;
            }
        }
        s
    }

    pub fn next_token(&mut self) -> Result<Spanned, LexError> {
        self.skip_whitespace_and_comments()?;

        let pos = self.position();
        let c = match self.bump() {
            Some(c) => c,
            None => {
                return Ok(Spanned {
                    token: Token::Eof,
                    pos,
                });
            }
        };

        let token = match c {
            '{' => Token::LBrace,
            '}' => Token::RBrace,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            ',' => Token::Comma,
            ':' => Token::Colon,
            '.' => Token::Dot,
            '>' => Token::Gt,
            '-' => Token::Dash,
            '<' => {
                if self.chars.peek() == Some(&'>') {
                    self.bump();
                    Token::LtGt
                } else {
                    Token::Lt
                }
            }
            '\'' => {
                if self.chars.peek() == Some(&'\'') && self.peek_second() == Some('\'') {
                    self.bump();
                    self.bump();
                    Token::Str(self.read_triple_quoted(pos)?)
                } else {
                    Token::Str(self.read_quoted('\'', pos)?)
                }
            }
            '"' => Token::Quoted(self.read_quoted('"', pos)?),
            '`' => Token::Expr(self.read_quoted('`', pos)?),
            '#' if self.chars.peek().is_some_and(|c| c.is_ascii_hexdigit()) => {
                Token::Color(self.read_color())
            }
            c if c.is_ascii_digit() => {
                let digits = self.read_number(c);
                let ident_follows = self.chars.peek().is_some_and(|&n| n.is_alphabetic() || n == '_');
                if ident_follows && !digits.contains('.') {
                    // Names such as `2fa_enabled`.
                    Token::Ident(self.continue_ident(digits))
                } else {
                    Token::Num(digits)
                }
            }
            c if c.is_alphabetic() || c == '_' => Token::Ident(self.read_ident(c)),
            _ => return Err(LexError::UnexpectedChar { ch: c, pos }),
        };

        Ok(Spanned { token, pos })
    }

    pub fn tokenize(mut self) -> Result<Vec<Spanned>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            let done = tok.token == Token::Eof;
            tokens.push(tok);
            if done {
                break;
            }
        }
        Ok(tokens)
    }
}
