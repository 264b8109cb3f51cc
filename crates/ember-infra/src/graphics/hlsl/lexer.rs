// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Tokenizer for the subset of HLSL the reflection front end reads.
//!
//! Comments are dropped and preprocessor lines are skipped whole, continuation lines included.

/// The kind of a token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Number(String),
    Str(String),
    Punct(char),
}

/// A token with its 1-based source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: u32,
    pub column: u32,
}

impl Token {
    pub fn ident(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punct(c)
    }

    pub fn is_ident(&self, name: &str) -> bool {
        self.ident() == Some(name)
    }

    /// Renders the token the way a diagnostic quotes it.
    pub fn text(&self) -> String {
        match &self.kind {
            TokenKind::Ident(s) | TokenKind::Number(s) => s.clone(),
            TokenKind::Str(s) => format!("\"{s}\""),
            TokenKind::Punct(c) => c.to_string(),
        }
    }
}

/// A tokenizer failure with its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub line: u32,
    pub column: u32,
    pub message: String,
}

struct Cursor<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: u32,
    column: u32,
    at_line_start: bool,
}

impl Cursor<'_> {
    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
            self.at_line_start = true;
        } else {
            self.column += 1;
            if !c.is_whitespace() {
                self.at_line_start = false;
            }
        }
        Some(c)
    }

    fn bump_while(&mut self, mut pred: impl FnMut(char) -> bool, out: &mut String) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            out.push(c);
            self.bump();
        }
    }

    fn skip_line(&mut self) {
        let mut previous = '\0';
        while let Some(c) = self.peek() {
            if c == '\n' && previous != '\\' {
                break;
            }
            if !c.is_whitespace() || c == '\n' {
                previous = c;
            }
            self.bump();
        }
    }
}

/// Splits `source` into tokens.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut cursor = Cursor {
        chars: source.chars().peekable(),
        line: 1,
        column: 1,
        at_line_start: true,
    };
    let mut tokens = Vec::new();

    while let Some(c) = cursor.peek() {
        let (line, column) = (cursor.line, cursor.column);

        if c.is_whitespace() {
            cursor.bump();
            continue;
        }
        if c == '#' && cursor.at_line_start {
            cursor.skip_line();
            continue;
        }
        if c == '/' {
            cursor.bump();
            match cursor.peek() {
                Some('/') => {
                    while cursor.peek().is_some_and(|c| c != '\n') {
                        cursor.bump();
                    }
                }
                Some('*') => {
                    cursor.bump();
                    let mut previous = '\0';
                    loop {
                        match cursor.bump() {
                            Some('/') if previous == '*' => break,
                            Some(c) => previous = c,
                            None => {
                                return Err(LexError {
                                    line,
                                    column,
                                    message: "unterminated comment".to_string(),
                                })
                            }
                        }
                    }
                }
                _ => tokens.push(Token {
                    kind: TokenKind::Punct('/'),
                    line,
                    column,
                }),
            }
            continue;
        }

        let kind = if c.is_ascii_alphabetic() || c == '_' {
            let mut ident = String::new();
            cursor.bump_while(|c| c.is_ascii_alphanumeric() || c == '_', &mut ident);
            TokenKind::Ident(ident)
        } else if c.is_ascii_digit() {
            let mut number = String::new();
            loop {
                cursor.bump_while(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_', &mut number);
                let exponent = number.ends_with(['e', 'E']) && !number.starts_with("0x");
                match cursor.peek() {
                    Some(sign @ ('+' | '-')) if exponent => {
                        number.push(sign);
                        cursor.bump();
                    }
                    _ => break,
                }
            }
            TokenKind::Number(number)
        } else if c == '"' {
            cursor.bump();
            let mut text = String::new();
            cursor.bump_while(|c| c != '"' && c != '\n', &mut text);
            if cursor.bump() != Some('"') {
                return Err(LexError {
                    line,
                    column,
                    message: "unterminated string".to_string(),
                });
            }
            TokenKind::Str(text)
        } else {
            cursor.bump();
            TokenKind::Punct(c)
        };
        tokens.push(Token { kind, line, column });
    }
    Ok(tokens)
}
