use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A character that cannot start any token
    Invalid,
    /// A bare word starting with `n`, expected to be `null`
    Null,
    /// A bare word starting with `t` or `f`, expected to be `true` or `false`
    Boolean,
    /// Any run of digits, `.`, `e`, `E` and `-` starting with a digit or `-`
    Number,
    /// A quoted string, quotes included
    String,
    /// `{`
    BraceOpen,
    /// `}`
    BraceClose,
    /// `[`
    BracketOpen,
    /// `]`
    BracketClose,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// End of input
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Invalid => "invalid",
            TokenKind::Null => "null",
            TokenKind::Boolean => "boolean",
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::BraceOpen => "`{`",
            TokenKind::BraceClose => "`}`",
            TokenKind::BracketOpen => "`[`",
            TokenKind::BracketClose => "`]`",
            TokenKind::Colon => "`:`",
            TokenKind::Comma => "`,`",
            TokenKind::Eof => "EOF",
        };
        f.write_str(name)
    }
}

/// A classified lexeme.
///
/// `text` always borrows the exact slice of the input the token was read
/// from: quotes stay on strings, signs and exponents stay on numbers, and an
/// `Invalid` token holds the single character that could not be lexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Code point index of the first character of `text`.
    pub position: usize,
}

/// Whitespace that terminates a bare word. Deliberately narrower than the
/// set skipped between tokens.
fn is_word_break(ch: char) -> bool {
    matches!(
        ch,
        '\t' | '\n' | '\u{0B}' | '\u{0C}' | '\r' | ' ' | '\u{85}' | '\u{A0}'
    )
}

fn is_number_char(ch: char) -> bool {
    ch.is_ascii_digit() || matches!(ch, '.' | 'e' | 'E' | '-')
}

/// Pull-based tokenizer over a borrowed input.
///
/// The cursor counts code points, not bytes, so a token boundary never falls
/// inside a multi-byte character.
pub struct Lexer<'a> {
    input: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
    current: Option<char>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let chars: Vec<(usize, char)> = input.char_indices().collect();
        let current = chars.first().map(|&(_, ch)| ch);
        Self {
            input,
            chars,
            pos: 0,
            current,
        }
    }

    /// Code point index of the cursor.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn advance(&mut self) {
        if self.pos < self.chars.len() {
            self.pos += 1;
        }
        self.current = self.chars.get(self.pos).map(|&(_, ch)| ch);
    }

    fn byte_offset(&self, pos: usize) -> usize {
        self.chars
            .get(pos)
            .map_or(self.input.len(), |&(offset, _)| offset)
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token<'a> {
        let text = &self.input[self.byte_offset(start)..self.byte_offset(self.pos)];
        Token {
            kind,
            text,
            position: start,
        }
    }

    /// Produces the next token. Never fails: unrecognised input comes back as
    /// an `Invalid` token, and once the input is exhausted every call returns
    /// `Eof`.
    pub fn next_token(&mut self) -> Token<'a> {
        self.skip_whitespace();

        let start = self.pos;
        let Some(ch) = self.current else {
            return self.token(TokenKind::Eof, start);
        };

        let kind = match ch {
            '{' => self.single(TokenKind::BraceOpen),
            '}' => self.single(TokenKind::BraceClose),
            '[' => self.single(TokenKind::BracketOpen),
            ']' => self.single(TokenKind::BracketClose),
            ':' => self.single(TokenKind::Colon),
            ',' => self.single(TokenKind::Comma),
            '"' => {
                self.read_string();
                TokenKind::String
            }
            'f' | 't' => {
                self.read_word();
                TokenKind::Boolean
            }
            'n' => {
                self.read_word();
                TokenKind::Null
            }
            c if c == '-' || c.is_ascii_digit() => {
                self.read_number();
                TokenKind::Number
            }
            _ => self.single(TokenKind::Invalid),
        };

        self.token(kind, start)
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    fn skip_whitespace(&mut self) {
        while self.current.is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    /// Consumes through the closing quote. An unterminated string runs to the
    /// end of input; rejecting it is left to the parser.
    fn read_string(&mut self) {
        self.advance();

        let mut escaped = false;
        while let Some(ch) = self.current {
            if ch == '"' && !escaped {
                self.advance();
                return;
            }
            escaped = ch == '\\' && !escaped;
            self.advance();
        }
    }

    fn read_word(&mut self) {
        while let Some(ch) = self.current {
            if is_word_break(ch) || matches!(ch, ',' | '{' | '}' | '[' | ']') {
                break;
            }
            self.advance();
        }
    }

    fn read_number(&mut self) {
        while self.current.is_some_and(is_number_char) {
            self.advance();
        }
    }
}

/// Collects the token stream of `input` up to and including the first `Eof`.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();

    loop {
        let token = lexer.next_token();
        tokens.push(token);
        if token.kind == TokenKind::Eof {
            break;
        }
    }

    tokens
}
