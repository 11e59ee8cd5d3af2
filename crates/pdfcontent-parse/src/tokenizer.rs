//! Content stream tokenizer.
//!
//! Parses raw PDF content stream bytes into a sequence of
//! [`ContentOperation`]s, each carrying the [`Operand`]s that preceded it.
//! This is the reference lexer for the token shapes written by the operators'
//! `serialize` methods.

use smol_str::SmolStr;

use crate::error::{ContentError, Result};
use crate::operand::{ContentOperation, Dictionary, Operand};

/// Parse PDF content stream bytes into a sequence of operations.
///
/// Comments (`%` to end of line) are stripped. Inline images
/// (`BI ... ID ... EI`) become a single `BI` operation whose operands are the
/// image dictionary and the raw image data as a [`Operand::String`].
///
/// # Errors
///
/// Returns [`ContentError::Syntax`] for malformed content streams.
pub fn tokenize(input: &[u8]) -> Result<Vec<ContentOperation>> {
    Lexer::new(input).run()
}

/// Returns `true` if `b` is a PDF whitespace character.
fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | 0x0C | 0x00)
}

/// Returns `true` if `b` is a PDF delimiter character.
fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

fn is_regular(b: u8) -> bool {
    !is_whitespace(b) && !is_delimiter(b)
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Deepest array/dictionary nesting accepted before the stream is rejected.
const MAX_NESTING: usize = 64;

/// What the lexer found at the current position.
enum Token {
    Object(Operand),
    Keyword(SmolStr),
}

struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
    /// Arrays and dictionaries currently open.
    depth: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn error(&self, message: impl Into<String>) -> ContentError {
        ContentError::syntax(self.pos, message)
    }

    fn run(mut self) -> Result<Vec<ContentOperation>> {
        let mut ops = Vec::new();
        let mut operands = Vec::new();

        while let Some(token) = self.next_token()? {
            match token {
                Token::Object(operand) => operands.push(operand),
                Token::Keyword(name) if name == "BI" => {
                    let (dict, data) = self.read_inline_image()?;
                    operands.clear();
                    ops.push(ContentOperation::new(
                        name,
                        vec![Operand::Dictionary(dict), Operand::String(data)],
                    ));
                }
                Token::Keyword(name) => {
                    ops.push(ContentOperation::new(name, std::mem::take(&mut operands)));
                }
            }
        }

        Ok(ops)
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(b) = self.peek() {
            if is_whitespace(b) {
                self.pos += 1;
            } else if b == b'%' {
                while self.peek().is_some_and(|b| b != b'\n' && b != b'\r') {
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        self.skip_whitespace_and_comments();
        let Some(b) = self.peek() else {
            return Ok(None);
        };

        let token = match b {
            b'(' => Token::Object(Operand::String(self.read_literal_string()?)),
            b'<' if self.peek_at(1) == Some(b'<') => {
                Token::Object(Operand::Dictionary(self.nested(Self::read_dictionary)?))
            }
            b'<' => Token::Object(Operand::HexString(self.read_hex_string()?)),
            b'[' => Token::Object(Operand::Array(self.nested(Self::read_array)?)),
            b'/' => Token::Object(Operand::Name(self.read_name()?)),
            b'0'..=b'9' | b'+' | b'-' | b'.' => Token::Object(self.read_number()?),
            b')' | b'>' | b']' | b'{' | b'}' => {
                return Err(self.error(format!("unexpected '{}'", b as char)));
            }
            _ => {
                let keyword = self.read_keyword();
                match keyword.as_str() {
                    "true" => Token::Object(Operand::Boolean(true)),
                    "false" => Token::Object(Operand::Boolean(false)),
                    "null" => Token::Object(Operand::Null),
                    _ => Token::Keyword(keyword),
                }
            }
        };
        Ok(Some(token))
    }

    /// Run `read` one nesting level deeper, failing past [`MAX_NESTING`].
    fn nested<T>(&mut self, read: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_NESTING {
            return Err(self.error(format!("nesting deeper than {MAX_NESTING} levels")));
        }
        self.depth += 1;
        let result = read(self);
        self.depth -= 1;
        result
    }

    /// Read one object inside an array or dictionary; keywords are not
    /// allowed there.
    fn read_object(&mut self, context: &str) -> Result<Operand> {
        let start = self.pos;
        match self.next_token()? {
            Some(Token::Object(operand)) => Ok(operand),
            Some(Token::Keyword(keyword)) => Err(ContentError::syntax(
                start,
                format!("unexpected keyword '{keyword}' in {context}"),
            )),
            None => Err(self.error(format!("unterminated {context}"))),
        }
    }

    /// Parse a literal string `(...)` with balanced parentheses and escape sequences.
    fn read_literal_string(&mut self) -> Result<Vec<u8>> {
        let start = self.pos;
        self.pos += 1;

        let mut result = Vec::new();
        let mut depth = 1u32;

        while let Some(b) = self.peek() {
            self.pos += 1;
            match b {
                b'(' => {
                    depth += 1;
                    result.push(b);
                }
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(result);
                    }
                    result.push(b);
                }
                b'\\' => self.read_escape(&mut result)?,
                _ => result.push(b),
            }
        }

        Err(ContentError::syntax(start, "unterminated literal string"))
    }

    /// Decode the escape following a backslash inside a literal string.
    fn read_escape(&mut self, result: &mut Vec<u8>) -> Result<()> {
        let Some(escaped) = self.peek() else {
            return Err(self.error("unterminated escape in literal string"));
        };
        self.pos += 1;
        match escaped {
            b'n' => result.push(b'\n'),
            b'r' => result.push(b'\r'),
            b't' => result.push(b'\t'),
            b'b' => result.push(0x08),
            b'f' => result.push(0x0C),
            // Line continuation: backslash + EOL is dropped.
            b'\r' => {
                if self.peek() == Some(b'\n') {
                    self.pos += 1;
                }
            }
            b'\n' => {}
            b'0'..=b'7' => {
                let mut value = u32::from(escaped - b'0');
                for _ in 0..2 {
                    match self.peek() {
                        Some(d @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(d - b'0');
                            self.pos += 1;
                        }
                        _ => break,
                    }
                }
                // High-order overflow is ignored.
                result.push((value & 0xFF) as u8);
            }
            other => result.push(other),
        }
        Ok(())
    }

    /// Parse a hex string `<...>`. A trailing odd digit is padded with `0`.
    fn read_hex_string(&mut self) -> Result<Vec<u8>> {
        let start = self.pos;
        self.pos += 1;

        let mut digits = Vec::new();
        loop {
            let Some(b) = self.peek() else {
                return Err(ContentError::syntax(start, "unterminated hex string"));
            };
            self.pos += 1;
            if b == b'>' {
                break;
            }
            if is_whitespace(b) {
                continue;
            }
            let digit = hex_value(b)
                .ok_or_else(|| self.error(format!("invalid hex digit {:?}", b as char)))?;
            digits.push(digit);
        }

        if digits.len() % 2 != 0 {
            digits.push(0);
        }
        Ok(digits.chunks(2).map(|pair| (pair[0] << 4) | pair[1]).collect())
    }

    /// Parse an array `[...]`.
    fn read_array(&mut self) -> Result<Vec<Operand>> {
        self.pos += 1;
        let mut items = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            match self.peek() {
                Some(b']') => {
                    self.pos += 1;
                    return Ok(items);
                }
                Some(_) => items.push(self.read_object("array")?),
                None => return Err(self.error("unterminated array")),
            }
        }
    }

    /// Parse a dictionary `<< /Key value ... >>`.
    fn read_dictionary(&mut self) -> Result<Dictionary> {
        self.pos += 2;
        let mut dict = Dictionary::new();
        loop {
            self.skip_whitespace_and_comments();
            match self.peek() {
                Some(b'>') if self.peek_at(1) == Some(b'>') => {
                    self.pos += 2;
                    return Ok(dict);
                }
                Some(b'/') => {
                    let key = self.read_name()?;
                    let value = self.read_object("dictionary")?;
                    dict.insert(key, value);
                }
                Some(_) => return Err(self.error("expected name key in dictionary")),
                None => return Err(self.error("unterminated dictionary")),
            }
        }
    }

    /// Parse a `/Name` token, decoding `#XX` escapes. Names whose decoded
    /// bytes are not UTF-8 are rejected.
    fn read_name(&mut self) -> Result<SmolStr> {
        let token_start = self.pos;
        self.pos += 1;
        let start = self.pos;
        while self.peek().is_some_and(is_regular) {
            self.pos += 1;
        }

        let raw = &self.input[start..self.pos];
        let mut name = Vec::with_capacity(raw.len());
        let mut i = 0;
        while i < raw.len() {
            if raw[i] == b'#' && i + 2 < raw.len() {
                if let (Some(hi), Some(lo)) = (hex_value(raw[i + 1]), hex_value(raw[i + 2])) {
                    name.push((hi << 4) | lo);
                    i += 3;
                    continue;
                }
            }
            name.push(raw[i]);
            i += 1;
        }

        match String::from_utf8(name) {
            Ok(name) => Ok(SmolStr::new(name)),
            Err(_) => Err(ContentError::syntax(token_start, "name is not valid UTF-8")),
        }
    }

    /// Parse an integer or real number.
    fn read_number(&mut self) -> Result<Operand> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }

        let mut has_dot = false;
        while let Some(b) = self.peek() {
            match b {
                b'.' if !has_dot => has_dot = true,
                b'0'..=b'9' => {}
                _ => break,
            }
            self.pos += 1;
        }

        // Token text is ASCII by construction.
        let text = String::from_utf8_lossy(&self.input[start..self.pos]);
        let invalid = || ContentError::syntax(start, format!("invalid number '{text}'"));
        if has_dot {
            let text = match text.as_ref() {
                "." | "+." | "-." => return Err(invalid()),
                t if t.ends_with('.') => format!("{t}0"),
                t => t.to_string(),
            };
            text.parse::<f64>()
                .map(Operand::Real)
                .map_err(|_| ContentError::syntax(start, format!("invalid number '{text}'")))
        } else {
            text.parse::<i64>().map(Operand::Integer).map_err(|_| invalid())
        }
    }

    /// Parse a keyword: a run of regular characters.
    fn read_keyword(&mut self) -> SmolStr {
        let start = self.pos;
        while self.peek().is_some_and(is_regular) {
            self.pos += 1;
        }
        SmolStr::new(String::from_utf8_lossy(&self.input[start..self.pos]))
    }

    /// Parse inline image data after the `BI` keyword: dictionary entries up
    /// to `ID`, then raw bytes up to an `EI` that follows whitespace.
    fn read_inline_image(&mut self) -> Result<(Dictionary, Vec<u8>)> {
        let start = self.pos;
        let mut dict = Dictionary::new();

        loop {
            self.skip_whitespace_and_comments();
            match self.peek() {
                Some(b'I')
                    if self.peek_at(1) == Some(b'D')
                        && self.peek_at(2).is_none_or(is_whitespace) =>
                {
                    self.pos += 2;
                    // A single whitespace byte separates ID from the data.
                    if self.peek().is_some_and(is_whitespace) {
                        self.pos += 1;
                    }
                    break;
                }
                Some(b'/') => {
                    let key = self.read_name()?;
                    let value = self.read_object("inline image dictionary")?;
                    dict.insert(key, value);
                }
                Some(_) => return Err(self.error("expected name key in inline image dictionary")),
                None => {
                    return Err(ContentError::syntax(
                        start,
                        "unterminated inline image (missing ID)",
                    ));
                }
            }
        }

        let data_start = self.pos;
        let mut i = data_start;
        while i + 1 < self.input.len() {
            let at_boundary = i > data_start && is_whitespace(self.input[i - 1]);
            let terminated = self.input.get(i + 2).is_none_or(|&b| !is_regular(b));
            if at_boundary && self.input[i] == b'E' && self.input[i + 1] == b'I' && terminated {
                let data = self.input[data_start..i].to_vec();
                self.pos = i + 2;
                return Ok((dict, data));
            }
            i += 1;
        }

        Err(ContentError::syntax(
            start,
            "unterminated inline image (missing EI)",
        ))
    }
}
