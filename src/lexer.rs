use crate::ast::Position;

/// Token types for the MML language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Note,        // a-g, A-G
    Rest,        // r R
    Tempo,       // t T
    Length,      // l L
    Octave,      // o O
    OctaveUp,    // >
    OctaveDown,  // <
    Volume,      // v V
    Extend,      // &
    Dot,         // .
    Modifier,    // # + -
    Numeric,     // run of digits
    EndOfInput,
    Illegal,
}

/// A token with its matched text and its position in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub position: Position,
}

fn is_whitespace(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\n'
}

/// Lexer for tokenizing MML source code.
///
/// Tokens are produced on demand by [`Lexer::next_token`]. Each token is positioned
/// at its first character; `EndOfInput` sits one column past the last character.
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
    reached_end: bool,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            column: 0,
            reached_end: false,
            finished: false,
        }
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn peek(&mut self) -> Option<&char> {
        self.chars.peek()
    }

    fn current_position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn skip_whitespace(&mut self) {
        while let Some(&c) = self.peek() {
            if !is_whitespace(c) {
                break;
            }
            self.advance();
        }
    }

    fn end_of_input(&mut self) -> Token {
        if !self.reached_end {
            self.reached_end = true;
            self.column += 1;
        }
        Token {
            kind: TokenKind::EndOfInput,
            lexeme: String::new(),
            position: self.current_position(),
        }
    }

    fn scan_numeric(&mut self, first: char, position: Position) -> Token {
        let mut lexeme = String::from(first);
        while let Some(&c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            lexeme.push(c);
            self.advance();
        }
        Token {
            kind: TokenKind::Numeric,
            lexeme,
            position,
        }
    }

    /// Scan the next token. Once the input is exhausted every call returns `EndOfInput`.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let Some(c) = self.advance() else {
            return self.end_of_input();
        };
        let position = self.current_position();

        if c.is_ascii_digit() {
            return self.scan_numeric(c, position);
        }

        let kind = match c {
            'r' | 'R' => TokenKind::Rest,
            't' | 'T' => TokenKind::Tempo,
            'l' | 'L' => TokenKind::Length,
            'o' | 'O' => TokenKind::Octave,
            'v' | 'V' => TokenKind::Volume,
            '>' => TokenKind::OctaveUp,
            '<' => TokenKind::OctaveDown,
            '#' | '+' | '-' => TokenKind::Modifier,
            '&' => TokenKind::Extend,
            '.' => TokenKind::Dot,
            'a'..='g' | 'A'..='G' => TokenKind::Note,
            _ => TokenKind::Illegal,
        };

        Token {
            kind,
            lexeme: c.to_string(),
            position,
        }
    }

    /// Scan the whole input, `EndOfInput` included.
    pub fn tokenize(&mut self) -> Vec<Token> {
        self.by_ref().collect()
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::EndOfInput {
            self.finished = true;
        }
        Some(token)
    }
}
