use crate::ast::*;
use crate::error::MmlError;
use crate::lexer::{Lexer, Token, TokenKind};

/// Parser for MML source code.
///
/// Recursive descent over the lexer's token stream with a single token of
/// lookahead. Tokens are pulled from the lexer as they are needed.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    pub fn new(mut lexer: Lexer<'a>) -> Self {
        let current = lexer.next_token();
        Self { lexer, current }
    }

    fn current(&self) -> &Token {
        &self.current
    }

    /// Consume the lookahead token and return it.
    fn advance(&mut self) -> Token {
        let next = self.lexer.next_token();
        std::mem::replace(&mut self.current, next)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    /// Parse every command up to the end of input.
    pub fn parse_program(&mut self) -> Result<Program, MmlError> {
        let mut program = Program::new();

        loop {
            let token = self.advance();
            let command = match token.kind {
                TokenKind::EndOfInput => break,
                TokenKind::Note => self.parse_note(&token)?,
                TokenKind::Rest => self.parse_rest(&token)?,
                TokenKind::Tempo => Command::Tempo {
                    value: self.parse_argument(CommandName::Tempo, &token)?,
                },
                TokenKind::Length => {
                    let value = self.parse_argument(CommandName::Length, &token)?;
                    let dotted = self.parse_dot();
                    Command::DefaultLength { value, dotted }
                }
                TokenKind::Octave => Command::Octave {
                    value: self.parse_argument(CommandName::Octave, &token)?,
                },
                TokenKind::OctaveUp => Command::OctaveUp,
                TokenKind::OctaveDown => Command::OctaveDown,
                TokenKind::Volume => {
                    self.parse_argument(CommandName::Volume, &token)?;
                    Command::NoOp
                }
                TokenKind::Illegal => return Err(invalid_token(&token)),
                TokenKind::Modifier | TokenKind::Numeric | TokenKind::Dot | TokenKind::Extend => {
                    return Err(MmlError::UnexpectedToken {
                        lexeme: token.lexeme,
                        position: token.position,
                    })
                }
            };
            program.push(command, token.position);
        }

        Ok(program)
    }

    /// NoteCmd := NoteToken Modifier? Numeric? Dot?
    fn parse_note(&mut self, note: &Token) -> Result<Command, MmlError> {
        let letter = note.lexeme.chars().next().unwrap_or_default();

        let modifier = if self.check(TokenKind::Modifier) {
            let token = self.advance();
            token.lexeme.chars().next().and_then(Modifier::from_char)
        } else {
            None
        };

        let length = self.parse_optional_numeric(CommandName::Note, note)?;
        let dotted = self.parse_dot();

        Ok(Command::Note {
            letter,
            modifier,
            length,
            dotted,
        })
    }

    /// RestCmd := RestToken Numeric? Dot?
    fn parse_rest(&mut self, rest: &Token) -> Result<Command, MmlError> {
        let length = self.parse_optional_numeric(CommandName::Rest, rest)?;
        let dotted = self.parse_dot();
        Ok(Command::Rest { length, dotted })
    }

    fn parse_dot(&mut self) -> bool {
        if self.check(TokenKind::Dot) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn parse_optional_numeric(
        &mut self,
        command: CommandName,
        start: &Token,
    ) -> Result<Option<i64>, MmlError> {
        if !self.check(TokenKind::Numeric) {
            return Ok(None);
        }
        let token = self.advance();
        numeric_value(&token.lexeme)
            .map(Some)
            .ok_or_else(|| MmlError::NumericOverflow {
                command,
                literal: token.lexeme,
                position: start.position,
            })
    }

    /// Parse the mandatory numeric argument of `start`.
    fn parse_argument(&mut self, command: CommandName, start: &Token) -> Result<i64, MmlError> {
        match self.current().kind {
            TokenKind::Numeric => {}
            TokenKind::Illegal => return Err(invalid_token(self.current())),
            _ => {
                return Err(MmlError::MissingArgument {
                    command,
                    position: start.position,
                })
            }
        }
        self.parse_optional_numeric(command, start)?
            .ok_or(MmlError::MissingArgument {
                command,
                position: start.position,
            })
    }
}

fn invalid_token(token: &Token) -> MmlError {
    MmlError::InvalidToken {
        lexeme: token.lexeme.clone(),
        position: token.position,
    }
}

/// Base-10 value of a run of ASCII digits, or `None` if it exceeds `i64::MAX`.
fn numeric_value(digits: &str) -> Option<i64> {
    digits.bytes().try_fold(0i64, |acc, b| {
        acc.checked_mul(10)?.checked_add(i64::from(b - b'0'))
    })
}

/// Main parsing function
pub fn parse(source: &str) -> Result<Program, MmlError> {
    let mut parser = Parser::new(Lexer::new(source));
    parser.parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn note(letter: char, modifier: Option<Modifier>, length: Option<i64>) -> Command {
        Command::Note {
            letter,
            modifier,
            length,
            dotted: false,
        }
    }

    #[test]
    fn test_valid_program() {
        let program = parse("T120 L4 O0 > < Aa1 B# B3 C#4 C+4 C-4 D0d0 Rr5").unwrap();
        assert_eq!(
            program.commands(),
            &[
                Command::Tempo { value: 120 },
                Command::DefaultLength {
                    value: 4,
                    dotted: false
                },
                Command::Octave { value: 0 },
                Command::OctaveUp,
                Command::OctaveDown,
                note('A', None, None),
                note('a', None, Some(1)),
                note('B', Some(Modifier::Sharp), None),
                note('B', None, Some(3)),
                note('C', Some(Modifier::Sharp), Some(4)),
                note('C', Some(Modifier::Plus), Some(4)),
                note('C', Some(Modifier::Flat), Some(4)),
                note('D', None, Some(0)),
                note('d', None, Some(0)),
                Command::Rest {
                    length: None,
                    dotted: false
                },
                Command::Rest {
                    length: Some(5),
                    dotted: false
                },
            ]
        );
        assert_eq!(program.commands().len(), program.positions().len());
    }

    #[test]
    fn test_command_positions() {
        let program = parse("t88 b2\n  al2b+.").unwrap();
        assert_eq!(
            program.positions(),
            &[
                Position::new(1, 1),
                Position::new(1, 5),
                Position::new(2, 3),
                Position::new(2, 4),
                Position::new(2, 6),
            ]
        );
    }

    #[test]
    fn test_dots() {
        let program = parse("l8. c. r4. e").unwrap();
        assert_eq!(
            program.commands(),
            &[
                Command::DefaultLength {
                    value: 8,
                    dotted: true
                },
                Command::Note {
                    letter: 'c',
                    modifier: None,
                    length: None,
                    dotted: true
                },
                Command::Rest {
                    length: Some(4),
                    dotted: true
                },
                note('e', None, None),
            ]
        );
    }

    #[test]
    fn test_volume_is_discarded() {
        let program = parse("v15 c").unwrap();
        assert_eq!(program.commands(), &[Command::NoOp, note('c', None, None)]);
        assert_eq!(program.positions()[0], Position::new(1, 1));
    }

    #[test]
    fn test_missing_numeric_arguments() {
        for (source, name) in [
            ("    T a", "Tempo"),
            ("    L a", "Length"),
            ("    O a", "Octave"),
            ("    V a", "Volume"),
        ] {
            let err = parse(source).unwrap_err();
            assert_eq!(
                err.to_string(),
                format!("{} command at line 1, column 5: expected numeric argument", name)
            );
            assert_eq!(err.kind(), ErrorKind::Syntax);
        }
    }

    #[test]
    fn test_missing_argument_at_end_of_input() {
        let err = parse("c t").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Tempo command at line 1, column 3: expected numeric argument"
        );
    }

    #[test]
    fn test_invalid_token_at_start() {
        let err = parse("    HAaBbCcDd").unwrap_err();
        assert_eq!(err.to_string(), "invalid token 'H' at line 1, column 5");
        assert_eq!(err.kind(), ErrorKind::Lexical);
    }

    #[test]
    fn test_invalid_token_in_middle() {
        let err = parse("    AaBbHCcDd").unwrap_err();
        assert_eq!(err.to_string(), "invalid token 'H' at line 1, column 9");
    }

    #[test]
    fn test_invalid_token_after_modifier() {
        let err = parse("    AaBb+HCcDd").unwrap_err();
        assert_eq!(err.to_string(), "invalid token 'H' at line 1, column 10");
    }

    #[test]
    fn test_invalid_token_instead_of_argument() {
        let err = parse("t!").unwrap_err();
        assert_eq!(err.to_string(), "invalid token '!' at line 1, column 2");
    }

    #[test]
    fn test_non_command_after_complete_command() {
        let err = parse("    O4+").unwrap_err();
        assert_eq!(err.to_string(), "expected command, got '+' at line 1, column 7");
        assert_eq!(err.kind(), ErrorKind::Syntax);
    }

    #[test]
    fn test_extend_is_not_a_command() {
        let err = parse("c&d").unwrap_err();
        assert_eq!(err.to_string(), "expected command, got '&' at line 1, column 2");
    }

    #[test]
    fn test_double_dot_is_rejected() {
        let err = parse("c..").unwrap_err();
        assert_eq!(err.to_string(), "expected command, got '.' at line 1, column 3");
    }

    #[test]
    fn test_numeric_overflow() {
        for (source, name) in [
            ("    A9223372036854775808", "Note"),
            ("    R9223372036854775808", "Rest"),
            ("    T9223372036854775808", "Tempo"),
            ("    L9223372036854775808", "Length"),
            ("    O9223372036854775808", "Octave"),
            ("    V9223372036854775808", "Volume"),
        ] {
            let err = parse(source).unwrap_err();
            let message = err.to_string();
            assert!(message.contains("value out of range"), "{}", message);
            assert!(message.starts_with(name), "{}", message);
            assert_eq!(err.kind(), ErrorKind::Range);
        }
    }

    #[test]
    fn test_largest_numeric_is_accepted() {
        let program = parse("t9223372036854775807").unwrap();
        assert_eq!(program.commands(), &[Command::Tempo { value: i64::MAX }]);
    }

    #[test]
    fn test_empty_program() {
        let program = parse(" \n\t ").unwrap();
        assert!(program.is_empty());
    }
}
