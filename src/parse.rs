use std::collections::HashMap;
use std::str::Chars;

use thiserror::Error;
use tracing::{debug, warn};

use crate::options::{EscapePolicy, ParseOptions};
use crate::tokenize::{Lexer, Token, TokenKind};
use crate::Value;

pub fn parse(input: &str) -> Result<Value, ParseError> {
    parse_with_options(input, ParseOptions::default())
}

pub fn parse_with_options(input: &str, options: ParseOptions) -> Result<Value, ParseError> {
    Parser::with_options(input, options).parse()
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("invalid token `{character}` at position {position}")]
    Lexical { character: char, position: usize },

    #[error("unexpected {kind} token `{text}` at position {position}")]
    UnexpectedToken {
        kind: TokenKind,
        text: String,
        position: usize,
    },

    #[error("unexpected end of input")]
    UnexpectedEndOfInput,

    #[error("malformed {kind} literal `{text}` at position {position}")]
    MalformedLiteral {
        kind: TokenKind,
        text: String,
        position: usize,
    },

    #[error("malformed string {text} at position {position}: {source}")]
    MalformedString {
        text: String,
        position: usize,
        source: EscapeError,
    },

    #[error("nesting deeper than {limit} levels at position {position}")]
    NestingTooDeep { limit: usize, position: usize },

    #[error("trailing {kind} token `{text}` at position {position} after a complete value")]
    TrailingData {
        kind: TokenKind,
        text: String,
        position: usize,
    },
}

impl ParseError {
    fn unexpected(token: &Token<'_>) -> Self {
        Self::UnexpectedToken {
            kind: token.kind,
            text: token.text.to_string(),
            position: token.position,
        }
    }

    fn malformed(token: &Token<'_>) -> Self {
        Self::MalformedLiteral {
            kind: token.kind,
            text: token.text.to_string(),
            position: token.position,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EscapeError {
    #[error("missing opening quote")]
    MissingQuote,
    #[error("missing closing quote")]
    Unterminated,
    /// A `\` or `\u` ran out of input before the escape was complete
    #[error("unfinished escape sequence")]
    UnfinishedEscape,
    #[error("unknown escape `\\{0}`")]
    UnknownEscape(char),
    /// A character in a `\u` escape was not valid hexadecimal
    #[error("invalid hex digit `{0}` in unicode escape")]
    InvalidHexValue(char),
    #[error("unpaired surrogate {0:#06x}")]
    UnpairedSurrogate(u32),
    #[error("invalid code point {0:#x}")]
    InvalidCodePointValue(u32),
    #[error("unescaped control character {0:?}")]
    ControlCharacter(char),
    #[error("characters after closing quote")]
    TrailingCharacters,
}

/// Recursive-descent parser pulling tokens from a [`Lexer`] one at a time.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    options: ParseOptions,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_options(input, ParseOptions::default())
    }

    pub fn with_options(input: &'a str, options: ParseOptions) -> Self {
        Self {
            lexer: Lexer::new(input),
            options,
            depth: 0,
        }
    }

    /// Parses exactly one value; the input must end right after it.
    pub fn parse(&mut self) -> Result<Value, ParseError> {
        let value = self.parse_value()?;

        let token = self.lexer.next_token();
        if token.kind != TokenKind::Eof {
            debug!(position = token.position, "rejecting trailing data");
            return Err(ParseError::TrailingData {
                kind: token.kind,
                text: token.text.to_string(),
                position: token.position,
            });
        }

        Ok(value)
    }

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        let token = self.lexer.next_token();
        self.value_from(token)
    }

    fn value_from(&mut self, token: Token<'a>) -> Result<Value, ParseError> {
        match token.kind {
            TokenKind::Eof => Err(ParseError::UnexpectedEndOfInput),
            TokenKind::Invalid => Err(ParseError::Lexical {
                character: token.text.chars().next().unwrap_or_default(),
                position: token.position,
            }),
            // any word starting with `n` reads as null
            TokenKind::Null => Ok(Value::Null),
            TokenKind::Boolean => match token.text {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(ParseError::malformed(&token)),
            },
            TokenKind::Number => parse_number(&token),
            TokenKind::String => self.parse_string(&token).map(Value::String),
            TokenKind::BraceOpen => {
                self.enter(&token)?;
                let object = self.parse_object();
                self.depth -= 1;
                object
            }
            TokenKind::BracketOpen => {
                self.enter(&token)?;
                let array = self.parse_array();
                self.depth -= 1;
                array
            }
            TokenKind::Colon
            | TokenKind::Comma
            | TokenKind::BraceClose
            | TokenKind::BracketClose => Err(ParseError::unexpected(&token)),
        }
    }

    fn enter(&mut self, token: &Token<'a>) -> Result<(), ParseError> {
        if self.depth >= self.options.max_depth {
            debug!(limit = self.options.max_depth, "rejecting nested container");
            return Err(ParseError::NestingTooDeep {
                limit: self.options.max_depth,
                position: token.position,
            });
        }
        self.depth += 1;
        Ok(())
    }

    /// Pulls the token that starts the next entry of a container, or `None`
    /// once the container's closing delimiter is reached.
    ///
    /// An immediate close is always an empty container. A close after a
    /// comma is only accepted when trailing commas are enabled.
    fn next_entry(
        &mut self,
        close: TokenKind,
        entries: usize,
    ) -> Result<Option<Token<'a>>, ParseError> {
        let token = self.lexer.next_token();
        if token.kind != close {
            return Ok(Some(token));
        }
        if entries == 0 || self.options.trailing_commas {
            Ok(None)
        } else {
            Err(ParseError::unexpected(&token))
        }
    }

    fn parse_array(&mut self) -> Result<Value, ParseError> {
        let mut array = Vec::new();

        while let Some(token) = self.next_entry(TokenKind::BracketClose, array.len())? {
            array.push(self.value_from(token)?);

            let token = self.lexer.next_token();
            match token.kind {
                TokenKind::BracketClose => break,
                TokenKind::Comma => {}
                _ => return Err(ParseError::unexpected(&token)),
            }
        }

        Ok(Value::Array(array))
    }

    fn parse_object(&mut self) -> Result<Value, ParseError> {
        let mut map = HashMap::new();
        let mut entries = 0;

        while let Some(token) = self.next_entry(TokenKind::BraceClose, entries)? {
            if token.kind != TokenKind::String {
                return Err(ParseError::unexpected(&token));
            }
            let key = self.parse_string(&token)?;

            let colon = self.lexer.next_token();
            if colon.kind != TokenKind::Colon {
                return Err(ParseError::unexpected(&colon));
            }

            // last occurrence of a duplicate key wins
            let value = self.parse_value()?;
            map.insert(key, value);
            entries += 1;

            let token = self.lexer.next_token();
            match token.kind {
                TokenKind::BraceClose => break,
                TokenKind::Comma => {}
                _ => return Err(ParseError::unexpected(&token)),
            }
        }

        Ok(Value::Object(map))
    }

    fn parse_string(&self, token: &Token<'a>) -> Result<String, ParseError> {
        match unescape(token.text) {
            Ok(string) => Ok(string),
            Err(source) => match self.options.escapes {
                EscapePolicy::Strict => Err(ParseError::MalformedString {
                    text: token.text.to_string(),
                    position: token.position,
                    source,
                }),
                EscapePolicy::Lenient => {
                    warn!(
                        position = token.position,
                        error = %source,
                        "failed to unescape string, keeping raw lexeme"
                    );
                    Ok(token.text.to_string())
                }
            },
        }
    }
}

fn parse_number(token: &Token<'_>) -> Result<Value, ParseError> {
    match token.text.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(Value::Number(number)),
        _ => Err(ParseError::malformed(token)),
    }
}

/// Decodes a quoted string lexeme into its contents.
pub(crate) fn unescape(lexeme: &str) -> Result<String, EscapeError> {
    let body = lexeme.strip_prefix('"').ok_or(EscapeError::MissingQuote)?;
    let mut output = String::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(next_char) = chars.next() {
        match next_char {
            '"' if chars.as_str().is_empty() => return Ok(output),
            '"' => return Err(EscapeError::TrailingCharacters),
            '\\' => output.push(unescape_sequence(&mut chars)?),
            c if c < '\u{20}' => return Err(EscapeError::ControlCharacter(c)),
            c => output.push(c),
        }
    }

    Err(EscapeError::Unterminated)
}

fn unescape_sequence(chars: &mut Chars<'_>) -> Result<char, EscapeError> {
    let escaped = chars.next().ok_or(EscapeError::UnfinishedEscape)?;
    let unescaped = match escaped {
        '"' => '"',
        '\\' => '\\',
        '/' => '/',
        'b' => '\u{8}',
        'f' => '\u{C}',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'u' => return unescape_unicode(chars),
        other => return Err(EscapeError::UnknownEscape(other)),
    };
    Ok(unescaped)
}

fn unescape_unicode(chars: &mut Chars<'_>) -> Result<char, EscapeError> {
    let unit = read_hex4(chars)?;
    let code_point = match unit {
        0xD800..=0xDBFF => {
            if chars.next() != Some('\\') || chars.next() != Some('u') {
                return Err(EscapeError::UnpairedSurrogate(unit));
            }
            let low = read_hex4(chars)?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return Err(EscapeError::UnpairedSurrogate(unit));
            }
            0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00)
        }
        0xDC00..=0xDFFF => return Err(EscapeError::UnpairedSurrogate(unit)),
        _ => unit,
    };
    char::from_u32(code_point).ok_or(EscapeError::InvalidCodePointValue(code_point))
}

fn read_hex4(chars: &mut Chars<'_>) -> Result<u32, EscapeError> {
    let mut sum = 0;
    for _ in 0..4 {
        let next_char = chars.next().ok_or(EscapeError::UnfinishedEscape)?;
        let digit = next_char
            .to_digit(16)
            .ok_or(EscapeError::InvalidHexValue(next_char))?;
        sum = sum * 16 + digit;
    }
    Ok(sum)
}
