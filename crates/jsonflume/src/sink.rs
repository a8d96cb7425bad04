//! Append-only text destinations for the write path.
//!
//! The serializer pushes finished token text into a [`Sink`]. In-memory
//! sinks (`String`, `Vec<u8>`) never fail; a custom sink signals a rejected
//! write with [`Error::Sink`], which propagates out of whatever builder or
//! serialize call triggered it.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::Error;

/// A push destination for serialized JSON text.
pub trait Sink {
    /// Appends a string slice to the sink.
    fn write_str(&mut self, s: &str) -> Result<(), Error>;

    /// Appends a single character to the sink.
    fn write_char(&mut self, c: char) -> Result<(), Error> {
        self.write_str(c.encode_utf8(&mut [0u8; 4]))
    }
}

/// A sink hidden behind a trait object, for the `*_any` facade variants.
pub type AnySink<'a> = Box<dyn Sink + 'a>;

impl Sink for String {
    fn write_str(&mut self, s: &str) -> Result<(), Error> {
        self.push_str(s);
        Ok(())
    }

    fn write_char(&mut self, c: char) -> Result<(), Error> {
        self.push(c);
        Ok(())
    }
}

impl Sink for Vec<u8> {
    fn write_str(&mut self, s: &str) -> Result<(), Error> {
        self.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

impl<T: Sink + ?Sized> Sink for &mut T {
    fn write_str(&mut self, s: &str) -> Result<(), Error> {
        (**self).write_str(s)
    }

    fn write_char(&mut self, c: char) -> Result<(), Error> {
        (**self).write_char(c)
    }
}

impl<T: Sink + ?Sized> Sink for Box<T> {
    fn write_str(&mut self, s: &str) -> Result<(), Error> {
        (**self).write_str(s)
    }

    fn write_char(&mut self, c: char) -> Result<(), Error> {
        (**self).write_char(c)
    }
}

/// Adapter that lets the serializer write into a `core::fmt` formatter, used
/// by the `Display` impl on [`crate::Value`].
pub(crate) struct FmtSink<'a, 'b>(pub &'a mut core::fmt::Formatter<'b>);

impl Sink for FmtSink<'_, '_> {
    fn write_str(&mut self, s: &str) -> Result<(), Error> {
        self.0.write_str(s).map_err(|_| Error::Sink)
    }

    fn write_char(&mut self, c: char) -> Result<(), Error> {
        core::fmt::Write::write_char(self.0, c).map_err(|_| Error::Sink)
    }
}
