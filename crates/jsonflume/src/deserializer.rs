//! Token-level JSON pull parser.
//!
//! [`Deserializer`] wraps a [`Stream`] with one slot of lookahead and
//! exposes the token operations every consumer in this crate is built on:
//! the DOM parser, the view builder, and the streaming reader. Escape
//! decoding (including UTF-16 surrogate reassembly), number classification,
//! and byte-position tracking all live here.

use alloc::format;
use alloc::string::String;

use crate::error::Error;
use crate::stream::{CodePolicy, Stream};
use crate::value::Kind;

/// The three-way classification produced by [`Deserializer::read_number`].
///
/// A number with neither sign, fraction, nor exponent parses as `Uint`; a
/// leading `-` without fraction or exponent parses as `Int`; everything
/// else, and any integer that overflows its type, parses as `Real`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Unsigned integer in `u64` range.
    Uint(u64),
    /// Negative integer in `i64` range.
    Int(i64),
    /// Everything else represented as `f64`.
    Real(f64),
}

/// States of the JSON number grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumState {
    PreSign,
    PreDigits,
    InDigits,
    /// After a leading zero; no further integer digits may follow.
    PostDigits,
    PreFraction,
    InFraction,
    PreExpSign,
    PreExponent,
    InExponent,
}

/// Result of decoding one escape sequence.
enum Escape {
    /// A directly mapped character (`\n`, `\"`, `\/`, ...).
    Char(char),
    /// A `\uHHHH` UTF-16 code unit, possibly half of a surrogate pair.
    Unit(u16),
}

/// Pull parser producing JSON tokens from a codepoint stream.
#[derive(Debug)]
pub struct Deserializer<R: Stream> {
    stream: R,
    peeked: Option<char>,
    pos: usize,
    policy: CodePolicy,
    scratch: String,
}

impl<R: Stream> Deserializer<R> {
    /// Creates a deserializer with the default malformed-escape policy
    /// ([`CodePolicy::Replace`]).
    pub fn new(stream: R) -> Self {
        Self::with_policy(stream, CodePolicy::default())
    }

    /// Creates a deserializer with an explicit policy for lone surrogates
    /// in `\u` escapes.
    pub fn with_policy(stream: R, policy: CodePolicy) -> Self {
        Self {
            stream,
            peeked: None,
            pos: 0,
            policy,
            scratch: String::new(),
        }
    }

    /// Byte offset of the next unconsumed codepoint, for diagnostics.
    pub fn pos(&self) -> usize {
        self.pos
    }

    fn unexpected(&self, token: char, expected: &str) -> Error {
        Error::Deserialize {
            at: self.pos,
            reason: format!("unexpected token '{token}' where {expected} was expected"),
        }
    }

    fn fail(&self, what: &str) -> Error {
        Error::Deserialize {
            at: self.pos,
            reason: String::from(what),
        }
    }

    fn end_of_input(&self) -> Error {
        Error::Deserialize {
            at: self.pos,
            reason: String::from("unexpected end of input"),
        }
    }

    /// Peeks the next codepoint without consuming it.
    fn peek(&mut self) -> Result<Option<char>, Error> {
        if self.peeked.is_none() {
            self.peeked = self.stream.next_codepoint()?;
        }
        Ok(self.peeked)
    }

    /// Consumes the peeked codepoint, advancing the byte position.
    fn consume(&mut self) {
        if let Some(c) = self.peeked.take() {
            self.pos += c.len_utf8();
        }
    }

    /// Peeks the next token, optionally skipping JSON whitespace first.
    /// End of input is reported as `None`.
    fn token_opt(&mut self, skip_ws: bool) -> Result<Option<char>, Error> {
        loop {
            match self.peek()? {
                Some(c) if skip_ws && matches!(c, ' ' | '\n' | '\r' | '\t') => self.consume(),
                other => return Ok(other),
            }
        }
    }

    /// Like [`Self::token_opt`], but end of input is an error.
    fn token(&mut self, skip_ws: bool) -> Result<char, Error> {
        self.token_opt(skip_ws)?.ok_or_else(|| self.end_of_input())
    }

    /// Skips whitespace and classifies the upcoming value by its first
    /// codepoint. Opening brackets of composites are consumed; every other
    /// classification leaves the stream untouched. Numbers report as
    /// [`Kind::Int`]; the real classification happens in
    /// [`Self::read_number`].
    pub fn peek_or_open_next(&mut self) -> Result<Kind, Error> {
        let c = self.token(true)?;
        match c {
            '{' => {
                self.consume();
                Ok(Kind::Object)
            }
            '[' => {
                self.consume();
                Ok(Kind::Array)
            }
            '"' => Ok(Kind::String),
            '-' | '0'..='9' => Ok(Kind::Int),
            'n' => Ok(Kind::Null),
            't' | 'f' => Ok(Kind::Boolean),
            c => Err(self.unexpected(c, "a json value")),
        }
    }

    /// If the upcoming token is the matching closing bracket, consumes it
    /// and reports `true`.
    pub fn check_is_empty(&mut self, object: bool) -> Result<bool, Error> {
        let close = if object { '}' } else { ']' };
        if self.token(true)? == close {
            self.consume();
            return Ok(true);
        }
        Ok(false)
    }

    /// At a position where either `,` or the matching closing bracket is
    /// expected, consumes one of them. Returns `true` iff the closing
    /// bracket was consumed.
    pub fn close_else_separator(&mut self, object: bool) -> Result<bool, Error> {
        let close = if object { '}' } else { ']' };
        let c = self.token(true)?;
        if c == close || c == ',' {
            self.consume();
            return Ok(c != ',');
        }
        Err(self.unexpected(
            c,
            if object {
                "',' or closing object bracket"
            } else {
                "',' or closing array bracket"
            },
        ))
    }

    /// Verifies the remainder of a keyword whose first letter the caller
    /// already classified.
    fn check_word(&mut self, word: &'static str) -> Result<(), Error> {
        for expected in word.chars().skip(1) {
            self.consume();
            let c = self.token(false)?;
            if c != expected {
                return Err(self.unexpected(c, word));
            }
        }
        self.consume();
        Ok(())
    }

    /// Consumes a `null` keyword.
    pub fn read_null(&mut self) -> Result<(), Error> {
        self.check_word("null")
    }

    /// Consumes a `true` or `false` keyword.
    pub fn read_boolean(&mut self) -> Result<bool, Error> {
        if self.token(false)? == 't' {
            self.check_word("true")?;
            return Ok(true);
        }
        self.check_word("false")?;
        Ok(false)
    }

    /// Runs the JSON number grammar and classifies the result.
    pub fn read_number(&mut self) -> Result<Number, Error> {
        use NumState::{
            InDigits, InExponent, InFraction, PostDigits, PreDigits, PreExpSign, PreExponent,
            PreFraction, PreSign,
        };

        let mut state = PreSign;
        let mut negative = false;
        self.scratch.clear();

        loop {
            let Some(c) = self.token_opt(false)? else {
                break;
            };
            match c {
                '-' if state == PreSign => {
                    negative = true;
                    state = PreDigits;
                }
                '-' | '+' if state == PreExpSign => state = PreExponent,
                '.' if matches!(state, InDigits | PostDigits) => state = PreFraction,
                'e' | 'E' if matches!(state, InDigits | PostDigits | InFraction) => {
                    state = PreExpSign;
                }
                '0'..='9' if state != PostDigits => {
                    state = match state {
                        PreSign | PreDigits => {
                            if c == '0' {
                                PostDigits
                            } else {
                                InDigits
                            }
                        }
                        PreFraction => InFraction,
                        PreExpSign | PreExponent => InExponent,
                        other => other,
                    };
                }
                _ => break,
            }
            self.scratch.push(c);
            self.consume();
        }

        if matches!(state, PreSign | PreDigits | PreFraction | PreExpSign | PreExponent) {
            return Err(self.fail("malformed json number"));
        }

        // Integer first; overflow falls back to a float parse of the same
        // buffer.
        if matches!(state, InDigits | PostDigits) {
            if negative {
                if let Ok(v) = self.scratch.parse::<i64>() {
                    return Ok(Number::Int(v));
                }
            } else if let Ok(v) = self.scratch.parse::<u64>() {
                return Ok(Number::Uint(v));
            }
        }
        match self.scratch.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Number::Real(v)),
            // A grammatically valid number whose float parse overflows is a
            // parse fault, never a silent infinity.
            _ => Err(self.fail("json number out of representable range")),
        }
    }

    /// Decodes one escape sequence; the peek slot holds the backslash.
    fn parse_escape(&mut self) -> Result<Escape, Error> {
        self.consume();
        let c = self.token(false)?;
        let decoded = match c {
            '"' | '\\' | '/' => c,
            'b' => '\u{0008}',
            'f' => '\u{000c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'u' => {
                self.consume();
                let mut unit: u16 = 0;
                for _ in 0..4 {
                    let c = self.token(false)?;
                    let Some(digit) = c.to_digit(16) else {
                        return Err(self.fail("invalid unicode escape sequence in string"));
                    };
                    #[allow(clippy::cast_possible_truncation)]
                    {
                        unit = (unit << 4) | digit as u16;
                    }
                    self.consume();
                }
                return Ok(Escape::Unit(unit));
            }
            _ => return Err(self.fail("unknown escape sequence in string")),
        };
        self.consume();
        Ok(Escape::Char(decoded))
    }

    /// Emits a single UTF-16 code unit that did not pair up. BMP units map
    /// directly; a lone surrogate resolves per the configured policy.
    fn push_unit(&mut self, out: &mut String, unit: u16) -> Result<(), Error> {
        match char::from_u32(u32::from(unit)) {
            Some(c) => out.push(c),
            None => match self.policy {
                CodePolicy::Replace => out.push('\u{fffd}'),
                CodePolicy::Skip => {}
                CodePolicy::Fail => {
                    return Err(self.fail("lone surrogate in unicode escape sequence"))
                }
            },
        }
        Ok(())
    }

    fn is_high_surrogate(unit: u16) -> bool {
        (0xd800..=0xdbff).contains(&unit)
    }

    fn is_low_surrogate(unit: u16) -> bool {
        (0xdc00..=0xdfff).contains(&unit)
    }

    fn combine_surrogates(high: u16, low: u16) -> char {
        let c = 0x10000 + ((u32::from(high) - 0xd800) << 10) + (u32::from(low) - 0xdc00);
        char::from_u32(c).expect("valid surrogate pair")
    }

    /// Consumes a string value, appending decoded content to `out`. With
    /// `key` set, the following `:` separator is consumed as well.
    ///
    /// `\u` escapes are treated as UTF-16: consecutive units reassemble
    /// into surrogate pairs as long as the previous unit was a high
    /// surrogate and another escape follows.
    pub fn read_string(&mut self, out: &mut String, key: bool) -> Result<(), Error> {
        let c = self.token(true)?;
        if c != '"' {
            return Err(self.unexpected(c, "'\"' as start of a string"));
        }
        self.consume();

        loop {
            let c = self.token(false)?;
            if c == '"' {
                self.consume();
                if key {
                    let c = self.token(true)?;
                    if c != ':' {
                        return Err(self.unexpected(c, "':' object separator"));
                    }
                    self.consume();
                }
                return Ok(());
            }
            if c.is_control() {
                return Err(self.fail("control character in string"));
            }
            if c != '\\' {
                out.push(c);
                self.consume();
                continue;
            }

            match self.parse_escape()? {
                Escape::Char(c) => out.push(c),
                Escape::Unit(mut unit) => loop {
                    if !Self::is_high_surrogate(unit) || self.peek()? != Some('\\') {
                        self.push_unit(out, unit)?;
                        break;
                    }
                    match self.parse_escape()? {
                        Escape::Unit(next) if Self::is_low_surrogate(next) => {
                            out.push(Self::combine_surrogates(unit, next));
                            break;
                        }
                        Escape::Unit(next) => {
                            self.push_unit(out, unit)?;
                            unit = next;
                        }
                        Escape::Char(c) => {
                            self.push_unit(out, unit)?;
                            out.push(c);
                            break;
                        }
                    }
                },
            }
        }
    }

    /// Verifies that nothing but whitespace remains in the input.
    pub fn check_done(&mut self) -> Result<(), Error> {
        match self.token_opt(true)? {
            None => Ok(()),
            Some(c) => Err(self.unexpected(c, "end of input")),
        }
    }
}
