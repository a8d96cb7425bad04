//! Pull sources of decoded codepoints for the read path.
//!
//! The deserializer consumes a [`Stream`] one scalar value at a time and
//! keeps its own one-slot lookahead on top. `&str` input decodes infallibly;
//! `&[u8]` input runs an incremental UTF-8 decode whose handling of
//! malformed sequences is chosen by [`CodePolicy`].

use alloc::boxed::Box;
use alloc::string::ToString;
use core::str::Chars;

use crate::error::Error;

/// How the byte-level decoder treats malformed input sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodePolicy {
    /// Substitute U+FFFD for each malformed sequence.
    #[default]
    Replace,
    /// Drop malformed sequences silently.
    Skip,
    /// Fail with a deserialize error.
    Fail,
}

/// A pull source of decoded codepoints.
pub trait Stream {
    /// Produces the next codepoint, or `None` at end of input.
    fn next_codepoint(&mut self) -> Result<Option<char>, Error>;
}

/// A stream hidden behind a trait object, for the `*_any` facade variants.
pub type AnyStream<'a> = Box<dyn Stream + 'a>;

impl<T: Stream + ?Sized> Stream for &mut T {
    fn next_codepoint(&mut self) -> Result<Option<char>, Error> {
        (**self).next_codepoint()
    }
}

impl<T: Stream + ?Sized> Stream for Box<T> {
    fn next_codepoint(&mut self) -> Result<Option<char>, Error> {
        (**self).next_codepoint()
    }
}

/// Codepoint stream over an in-memory string slice.
#[derive(Debug, Clone)]
pub struct StrStream<'a> {
    chars: Chars<'a>,
}

impl<'a> StrStream<'a> {
    /// Creates a stream over `text`.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars(),
        }
    }
}

impl Stream for StrStream<'_> {
    fn next_codepoint(&mut self) -> Result<Option<char>, Error> {
        Ok(self.chars.next())
    }
}

/// Incremental UTF-8 decoder over a byte slice, applying a [`CodePolicy`]
/// to malformed sequences.
#[derive(Debug, Clone)]
pub struct ByteStream<'a> {
    bytes: &'a [u8],
    at: usize,
    policy: CodePolicy,
}

impl<'a> ByteStream<'a> {
    /// Creates a stream over `bytes` with the given malformed-input policy.
    #[must_use]
    pub fn new(bytes: &'a [u8], policy: CodePolicy) -> Self {
        Self {
            bytes,
            at: 0,
            policy,
        }
    }

    /// Decodes one UTF-8 sequence starting at `self.at`, advancing past it.
    /// Returns `None` for a malformed sequence (after advancing one byte).
    fn decode_one(&mut self) -> Option<char> {
        let rest = &self.bytes[self.at..];
        let first = rest[0];
        let len = match first {
            0x00..=0x7f => 1,
            0xc2..=0xdf => 2,
            0xe0..=0xef => 3,
            0xf0..=0xf4 => 4,
            _ => {
                self.at += 1;
                return None;
            }
        };
        if rest.len() < len || !rest[1..len].iter().all(|b| (0x80..=0xbf).contains(b)) {
            self.at += 1;
            return None;
        }
        match core::str::from_utf8(&rest[..len]) {
            Ok(s) => {
                self.at += len;
                s.chars().next()
            }
            // Overlong or surrogate-range sequence with well-formed
            // continuation bytes.
            Err(_) => {
                self.at += 1;
                None
            }
        }
    }
}

impl Stream for ByteStream<'_> {
    fn next_codepoint(&mut self) -> Result<Option<char>, Error> {
        while self.at < self.bytes.len() {
            let at = self.at;
            match self.decode_one() {
                Some(c) => return Ok(Some(c)),
                None => match self.policy {
                    CodePolicy::Replace => return Ok(Some('\u{fffd}')),
                    CodePolicy::Skip => {}
                    CodePolicy::Fail => {
                        return Err(Error::Deserialize {
                            at,
                            reason: "malformed utf-8 sequence".to_string(),
                        })
                    }
                },
            }
        }
        Ok(None)
    }
}
