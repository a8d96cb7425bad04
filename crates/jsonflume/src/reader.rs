//! The handle-based streaming reader.
//!
//! Reading starts from a single [`ReadValue`] for the document root.
//! Primitives are captured into the handle when they are parsed; composites
//! are *not* — they are placeholders into the shared parsing cursor, opened
//! into an [`ArrReader`] or [`ObjReader`] on demand. All handles share one
//! cursor: advancing any composite first drains every deeper composite that
//! is still open, so skipping part of a document is a no-op from the
//! caller's point of view while the byte stream stays synchronized.
//! Dropping a composite reader likewise consumes through its closing
//! bracket.
//!
//! ```
//! use jsonflume::{read, StrStream};
//!
//! let root = read(StrStream::new(r#"{"a": 1, "b": [10, 20]}"#))?;
//! let mut obj = root.obj()?;
//! while let Some(entry) = obj.next() {
//!     let (key, value) = entry?;
//!     if key == "a" {
//!         assert_eq!(value.unum()?, 1);
//!     }
//! }
//! # Ok::<(), jsonflume::Error>(())
//! ```

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::deserializer::{Deserializer, Number};
use crate::error::Error;
use crate::stream::Stream;
use crate::value::{Kind, Map, Value};

/// One composite being streamed, root-most first on the stack.
#[derive(Debug)]
struct Frame {
    id: u64,
    object: bool,
    /// Whether the first child has been consumed.
    opened: bool,
    /// Whether a composite reader handle has claimed this frame.
    taken: bool,
}

/// A parsed value before it is bound to the shared state: primitives carry
/// their payload, composites carry the stamp of the frame just pushed.
enum Parsed {
    Null,
    Boolean(bool),
    Uint(u64),
    Int(i64),
    Real(f64),
    Str(String),
    Arr(u64),
    Obj(u64),
}

/// State shared by every handle issued from one read.
#[derive(Debug)]
struct ReadShared<R: Stream> {
    de: Deserializer<R>,
    active: Vec<Frame>,
    /// Bumped when a composite is parsed and when a frame pops; a composite
    /// reference opens only while its stamp is still current.
    next_stamp: u64,
}

impl<R: Stream> ReadShared<R> {
    /// Parses the next value at the cursor. A composite only pushes a
    /// frame; its content stays in the stream until the frame advances.
    fn parse_value(&mut self) -> Result<Parsed, Error> {
        match self.de.peek_or_open_next()? {
            Kind::Uint | Kind::Int | Kind::Real => Ok(match self.de.read_number()? {
                Number::Uint(v) => Parsed::Uint(v),
                Number::Int(v) => Parsed::Int(v),
                Number::Real(v) => Parsed::Real(v),
            }),
            Kind::Boolean => Ok(Parsed::Boolean(self.de.read_boolean()?)),
            Kind::String => {
                let mut s = String::new();
                self.de.read_string(&mut s, false)?;
                Ok(Parsed::Str(s))
            }
            Kind::Array => Ok(Parsed::Arr(self.push_frame(false))),
            Kind::Object => Ok(Parsed::Obj(self.push_frame(true))),
            Kind::Null => {
                self.de.read_null()?;
                Ok(Parsed::Null)
            }
        }
    }

    fn push_frame(&mut self, object: bool) -> u64 {
        self.next_stamp += 1;
        self.active.push(Frame {
            id: self.next_stamp,
            object,
            opened: false,
            taken: false,
        });
        self.next_stamp
    }

    /// Advances the top frame by one entry. `None` means the frame reached
    /// its closing bracket and was popped; reaching the bottom of the stack
    /// verifies end of document.
    fn step_top(&mut self) -> Result<Option<(String, Parsed)>, Error> {
        let top = self.active.len() - 1;
        let (object, opened) = {
            let frame = &self.active[top];
            (frame.object, frame.opened)
        };

        let closed = if opened {
            self.de.close_else_separator(object)?
        } else {
            self.de.check_is_empty(object)?
        };
        if closed {
            self.active.pop();
            self.next_stamp += 1;
            if self.active.is_empty() {
                self.de.check_done()?;
            }
            return Ok(None);
        }

        self.active[top].opened = true;
        let mut key = String::new();
        if object {
            self.de.read_string(&mut key, true)?;
        }
        let value = self.parse_value()?;
        Ok(Some((key, value)))
    }

    /// Advances the frame `id`, draining every deeper frame first.
    fn next_entry(&mut self, id: u64) -> Result<Option<(String, Parsed)>, Error> {
        let Some(index) = self.active.iter().rposition(|f| f.id == id) else {
            return Err(Error::Reader("composite is no longer on the active stack"));
        };
        while self.active.len() > index + 1 {
            self.step_top()?;
        }
        self.step_top()
    }

    /// Claims the top frame for a composite reader. Only the most recently
    /// parsed, not-yet-claimed composite may open.
    fn open(&mut self, stamp: u64, object: bool) -> Result<u64, Error> {
        let stale = if object {
            "object has already been opened or skipped"
        } else {
            "array has already been opened or skipped"
        };
        if stamp != self.next_stamp {
            return Err(Error::Reader(stale));
        }
        let top = self.active.last_mut().ok_or(Error::Reader(stale))?;
        if top.taken {
            return Err(Error::Reader(stale));
        }
        top.taken = true;
        Ok(top.id)
    }
}

impl<R: Stream> Drop for ReadShared<R> {
    /// Losing the last handle still drains the remaining document, keeping
    /// the underlying stream positioned after the value.
    fn drop(&mut self) {
        while !self.active.is_empty() {
            if self.step_top().is_err() {
                break;
            }
        }
    }
}

/// Starts a read over `stream`, parsing the first value.
pub(crate) fn root<R: Stream>(de: Deserializer<R>) -> Result<ReadValue<R>, Error> {
    let shared = Rc::new(RefCell::new(ReadShared {
        de,
        active: Vec::new(),
        next_stamp: 0,
    }));
    let parsed = {
        let mut st = shared.borrow_mut();
        let parsed = st.parse_value()?;
        // A primitive root must already be the entire document.
        if st.active.is_empty() {
            st.de.check_done()?;
        }
        parsed
    };
    Ok(ReadValue::bind(&shared, parsed))
}

/// Reference to a not-yet-opened composite in the shared cursor.
struct CompositeRef<R: Stream> {
    shared: Rc<RefCell<ReadShared<R>>>,
    stamp: u64,
}

enum ReadInner<R: Stream> {
    Null,
    Boolean(bool),
    Uint(u64),
    Int(i64),
    Real(f64),
    Str(String),
    Arr(CompositeRef<R>),
    Obj(CompositeRef<R>),
}

/// Handle to one value of the document being read.
///
/// Primitive payloads were captured when the value was parsed and stay
/// readable for as long as the handle lives. Composite handles stream on
/// demand: [`arr`](Self::arr) / [`obj`](Self::obj) succeed only while this
/// value is still the cursor's most recently parsed composite.
pub struct ReadValue<R: Stream> {
    inner: ReadInner<R>,
}

impl<R: Stream> ReadValue<R> {
    fn bind(shared: &Rc<RefCell<ReadShared<R>>>, parsed: Parsed) -> Self {
        let inner = match parsed {
            Parsed::Null => ReadInner::Null,
            Parsed::Boolean(b) => ReadInner::Boolean(b),
            Parsed::Uint(v) => ReadInner::Uint(v),
            Parsed::Int(v) => ReadInner::Int(v),
            Parsed::Real(v) => ReadInner::Real(v),
            Parsed::Str(s) => ReadInner::Str(s),
            Parsed::Arr(stamp) => ReadInner::Arr(CompositeRef {
                shared: Rc::clone(shared),
                stamp,
            }),
            Parsed::Obj(stamp) => ReadInner::Obj(CompositeRef {
                shared: Rc::clone(shared),
                stamp,
            }),
        };
        ReadValue { inner }
    }

    /// The exact kind of this value.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match &self.inner {
            ReadInner::Null => Kind::Null,
            ReadInner::Boolean(_) => Kind::Boolean,
            ReadInner::Uint(_) => Kind::Uint,
            ReadInner::Int(_) => Kind::Int,
            ReadInner::Real(_) => Kind::Real,
            ReadInner::Str(_) => Kind::String,
            ReadInner::Arr(_) => Kind::Array,
            ReadInner::Obj(_) => Kind::Object,
        }
    }

    /// Returns `true` if the value is `null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self.inner, ReadInner::Null)
    }

    /// Returns `true` if the value is a boolean.
    #[must_use]
    pub fn is_boolean(&self) -> bool {
        matches!(self.inner, ReadInner::Boolean(_))
    }

    /// Returns `true` if the value is a string.
    #[must_use]
    pub fn is_str(&self) -> bool {
        matches!(self.inner, ReadInner::Str(_))
    }

    /// Returns `true` if the value reads as an unsigned integer.
    #[must_use]
    pub fn is_unum(&self) -> bool {
        match self.inner {
            ReadInner::Uint(_) => true,
            ReadInner::Int(v) => v >= 0,
            _ => false,
        }
    }

    /// Returns `true` if the value reads as a signed integer.
    #[must_use]
    pub fn is_inum(&self) -> bool {
        matches!(self.inner, ReadInner::Uint(_) | ReadInner::Int(_))
    }

    /// Returns `true` if the value reads as a real.
    #[must_use]
    pub fn is_real(&self) -> bool {
        matches!(
            self.inner,
            ReadInner::Uint(_) | ReadInner::Int(_) | ReadInner::Real(_)
        )
    }

    /// Returns `true` if the value is an array.
    #[must_use]
    pub fn is_arr(&self) -> bool {
        matches!(self.inner, ReadInner::Arr(_))
    }

    /// Returns `true` if the value is an object.
    #[must_use]
    pub fn is_obj(&self) -> bool {
        matches!(self.inner, ReadInner::Obj(_))
    }

    /// Returns `true` if the value reads as `kind` under the leniency
    /// rules.
    #[must_use]
    pub fn is(&self, kind: Kind) -> bool {
        match kind {
            Kind::Null => self.is_null(),
            Kind::Boolean => self.is_boolean(),
            Kind::Uint => self.is_unum(),
            Kind::Int => self.is_inum(),
            Kind::Real => self.is_real(),
            Kind::String => self.is_str(),
            Kind::Array => self.is_arr(),
            Kind::Object => self.is_obj(),
        }
    }

    /// Reads the boolean value.
    pub fn boolean(&self) -> Result<bool, Error> {
        match self.inner {
            ReadInner::Boolean(b) => Ok(b),
            _ => Err(Error::mismatch(Kind::Boolean, self.kind())),
        }
    }

    /// Reads the captured string content.
    pub fn str(&self) -> Result<&str, Error> {
        match &self.inner {
            ReadInner::Str(s) => Ok(s),
            _ => Err(Error::mismatch(Kind::String, self.kind())),
        }
    }

    /// Reads the value as an unsigned integer, converting a non-negative
    /// signed integer or real.
    pub fn unum(&self) -> Result<u64, Error> {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        match self.inner {
            ReadInner::Uint(v) => Ok(v),
            ReadInner::Int(v) if v >= 0 => Ok(v as u64),
            ReadInner::Real(v) if v >= 0.0 => Ok(v as u64),
            _ => Err(Error::mismatch(Kind::Uint, self.kind())),
        }
    }

    /// Reads the value as a signed integer, converting an unsigned integer
    /// or a real.
    pub fn inum(&self) -> Result<i64, Error> {
        #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
        match self.inner {
            ReadInner::Int(v) => Ok(v),
            ReadInner::Uint(v) => Ok(v as i64),
            ReadInner::Real(v) => Ok(v as i64),
            _ => Err(Error::mismatch(Kind::Int, self.kind())),
        }
    }

    /// Reads the value as a real, converting either integer kind.
    pub fn real(&self) -> Result<f64, Error> {
        #[allow(clippy::cast_precision_loss)]
        match self.inner {
            ReadInner::Real(v) => Ok(v),
            ReadInner::Uint(v) => Ok(v as f64),
            ReadInner::Int(v) => Ok(v as f64),
            _ => Err(Error::mismatch(Kind::Real, self.kind())),
        }
    }

    /// Opens the array for streaming iteration. Fails with a reader error
    /// if this value has gone stale or was already opened.
    pub fn arr(&self) -> Result<ArrReader<R>, Error> {
        match &self.inner {
            ReadInner::Arr(r) => {
                let id = r.shared.borrow_mut().open(r.stamp, false)?;
                Ok(ArrReader {
                    shared: Rc::clone(&r.shared),
                    id,
                    finished: false,
                })
            }
            _ => Err(Error::mismatch(Kind::Array, self.kind())),
        }
    }

    /// Opens the object for streaming iteration. Fails with a reader error
    /// if this value has gone stale or was already opened.
    pub fn obj(&self) -> Result<ObjReader<R>, Error> {
        match &self.inner {
            ReadInner::Obj(r) => {
                let id = r.shared.borrow_mut().open(r.stamp, true)?;
                Ok(ObjReader {
                    shared: Rc::clone(&r.shared),
                    id,
                    finished: false,
                })
            }
            _ => Err(Error::mismatch(Kind::Object, self.kind())),
        }
    }

    /// Materializes this value and everything below it into an owning
    /// [`Value`]. Duplicate object keys keep the last occurrence, like the
    /// one-shot document parser.
    pub fn into_value(self) -> Result<Value, Error> {
        if self.is_arr() {
            let mut items = Vec::new();
            for item in self.arr()? {
                items.push(item?.into_value()?);
            }
            return Ok(Value::Array(items));
        }
        if self.is_obj() {
            let mut map = Map::new();
            let mut obj = self.obj()?;
            while let Some(entry) = obj.next() {
                let (key, value) = entry?;
                map.insert(key, value.into_value()?);
            }
            return Ok(Value::Object(map));
        }
        Ok(match self.inner {
            ReadInner::Null => Value::Null,
            ReadInner::Boolean(b) => Value::Boolean(b),
            ReadInner::Uint(v) => Value::Uint(v),
            ReadInner::Int(v) => Value::Int(v),
            ReadInner::Real(v) => Value::Real(v),
            ReadInner::Str(s) => Value::String(s),
            ReadInner::Arr(_) | ReadInner::Obj(_) => unreachable!("handled above"),
        })
    }
}

/// Streaming iterator over the elements of an array being read.
///
/// Dropping the reader mid-way consumes the unread remainder of the array.
#[derive(Debug)]
pub struct ArrReader<R: Stream> {
    shared: Rc<RefCell<ReadShared<R>>>,
    id: u64,
    finished: bool,
}

impl<R: Stream> Iterator for ArrReader<R> {
    type Item = Result<ReadValue<R>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let step = self.shared.borrow_mut().next_entry(self.id);
        match step {
            Ok(Some((_, parsed))) => Some(Ok(ReadValue::bind(&self.shared, parsed))),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: Stream> Drop for ArrReader<R> {
    fn drop(&mut self) {
        drain(&self.shared, self.id, self.finished);
    }
}

/// Streaming iterator over the members of an object being read. Every
/// occurrence of a duplicate key is yielded.
///
/// Dropping the reader mid-way consumes the unread remainder of the object.
#[derive(Debug)]
pub struct ObjReader<R: Stream> {
    shared: Rc<RefCell<ReadShared<R>>>,
    id: u64,
    finished: bool,
}

impl<R: Stream> Iterator for ObjReader<R> {
    type Item = Result<(String, ReadValue<R>), Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let step = self.shared.borrow_mut().next_entry(self.id);
        match step {
            Ok(Some((key, parsed))) => Some(Ok((key, ReadValue::bind(&self.shared, parsed)))),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: Stream> Drop for ObjReader<R> {
    fn drop(&mut self) {
        drain(&self.shared, self.id, self.finished);
    }
}

/// Consumes the unread remainder of frame `id`, including everything
/// deeper. Errors cannot surface from a drop, so the stream is simply
/// abandoned on failure.
fn drain<R: Stream>(shared: &Rc<RefCell<ReadShared<R>>>, id: u64, finished: bool) {
    if finished {
        return;
    }
    let mut st = shared.borrow_mut();
    loop {
        if !st.active.iter().any(|f| f.id == id) {
            return;
        }
        match st.next_entry(id) {
            Ok(Some(_)) => {}
            Ok(None) | Err(_) => return,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::StrStream;
    use alloc::rc::Rc;
    use alloc::string::ToString;
    use core::cell::Cell;

    fn read(text: &str) -> ReadValue<StrStream<'_>> {
        root(Deserializer::new(StrStream::new(text))).unwrap()
    }

    /// Stream wrapper that reports how many codepoints were pulled.
    struct CountingStream<'a> {
        inner: StrStream<'a>,
        pulled: Rc<Cell<usize>>,
    }

    impl Stream for CountingStream<'_> {
        fn next_codepoint(&mut self) -> Result<Option<char>, Error> {
            let c = self.inner.next_codepoint()?;
            if c.is_some() {
                self.pulled.set(self.pulled.get() + 1);
            }
            Ok(c)
        }
    }

    #[test]
    fn primitive_roots() {
        assert!(read("null").is_null());
        assert_eq!(read("true").boolean().unwrap(), true);
        assert_eq!(read("3").unum().unwrap(), 3);
        assert_eq!(read("-3").inum().unwrap(), -3);
        assert_eq!(read("0.5").real().unwrap(), 0.5);
        assert_eq!(read(r#""hi""#).str().unwrap(), "hi");
        assert!(root(Deserializer::new(StrStream::new("1 2"))).is_err());
    }

    #[test]
    fn lenient_numeric_reads() {
        assert!(read("3").is_inum());
        assert!(read("3").is_real());
        assert!(read("-3").is(Kind::Real));
        assert!(!read("-3").is_unum());
        assert_eq!(read("3").real().unwrap(), 3.0);
    }

    #[test]
    fn array_iteration() {
        let root = read("[1, \"two\", null]");
        assert!(root.is_arr());
        let mut arr = root.arr().unwrap();
        assert_eq!(arr.next().unwrap().unwrap().unum().unwrap(), 1);
        assert_eq!(arr.next().unwrap().unwrap().str().unwrap(), "two");
        assert!(arr.next().unwrap().unwrap().is_null());
        assert!(arr.next().is_none());
        assert!(arr.next().is_none());
    }

    #[test]
    fn object_iteration_in_document_order() {
        let root = read(r#"{"z": 1, "a": 2}"#);
        let mut obj = root.obj().unwrap();
        let (k1, v1) = obj.next().unwrap().unwrap();
        assert_eq!((k1.as_str(), v1.unum().unwrap()), ("z", 1));
        let (k2, v2) = obj.next().unwrap().unwrap();
        assert_eq!((k2.as_str(), v2.unum().unwrap()), ("a", 2));
        assert!(obj.next().is_none());
    }

    #[test]
    fn duplicate_keys_all_emitted() {
        let root = read(r#"{"k": 1, "k": 2}"#);
        let keys: alloc::vec::Vec<String> = root
            .obj()
            .unwrap()
            .map(|e| e.unwrap().0)
            .collect();
        assert_eq!(keys, ["k", "k"]);
    }

    #[test]
    fn skipped_subtrees_are_discarded() {
        let root = read(r#"{"a": 1, "b": [10, 20, 30], "c": 2}"#);
        let mut obj = root.obj().unwrap();
        let (_, a) = obj.next().unwrap().unwrap();
        assert_eq!(a.unum().unwrap(), 1);
        // "b" yields an unopened array value; advancing past it drains the
        // whole array from the stream.
        let (kb, _b) = obj.next().unwrap().unwrap();
        assert_eq!(kb, "b");
        let (kc, c) = obj.next().unwrap().unwrap();
        assert_eq!((kc.as_str(), c.unum().unwrap()), ("c", 2));
        assert!(obj.next().is_none());
    }

    #[test]
    fn drop_drains_to_end_of_document() {
        let text = r#"{"a": 1, "b": [10, 20, 30], "c": 2}"#;
        let pulled = Rc::new(Cell::new(0));
        let stream = CountingStream {
            inner: StrStream::new(text),
            pulled: Rc::clone(&pulled),
        };
        {
            let root = root(Deserializer::new(stream)).unwrap();
            let mut obj = root.obj().unwrap();
            let (key, value) = obj.next().unwrap().unwrap();
            assert_eq!((key.as_str(), value.unum().unwrap()), ("a", 1));
            // Everything from "b" onwards is consumed by the drops.
        }
        assert_eq!(pulled.get(), text.chars().count());
    }

    #[test]
    fn unopened_root_composite_drains_on_last_drop() {
        let text = "[[1, 2], {\"k\": [3]}]";
        let pulled = Rc::new(Cell::new(0));
        let stream = CountingStream {
            inner: StrStream::new(text),
            pulled: Rc::clone(&pulled),
        };
        drop(root(Deserializer::new(stream)).unwrap());
        assert_eq!(pulled.get(), text.chars().count());
    }

    #[test]
    fn stale_composite_cannot_open() {
        let root = read(r#"{"a": [1], "b": [2]}"#);
        let mut obj = root.obj().unwrap();
        let (_, a) = obj.next().unwrap().unwrap();
        let (_, b) = obj.next().unwrap().unwrap();
        // Advancing to "b" drained the unopened "a" array.
        assert!(matches!(a.arr().unwrap_err(), Error::Reader(_)));
        assert_eq!(
            b.arr()
                .unwrap()
                .next()
                .unwrap()
                .unwrap()
                .unum()
                .unwrap(),
            2
        );
    }

    #[test]
    fn composite_opens_only_once() {
        let root = read("[1]");
        let _first = root.arr().unwrap();
        assert!(matches!(root.arr().unwrap_err(), Error::Reader(_)));
    }

    #[test]
    fn stale_primitives_stay_readable() {
        let root = read(r#"{"a": 7, "b": "text", "c": 1}"#);
        let mut obj = root.obj().unwrap();
        let (_, a) = obj.next().unwrap().unwrap();
        let (_, b) = obj.next().unwrap().unwrap();
        let (_, c) = obj.next().unwrap().unwrap();
        assert!(obj.next().is_none());
        // Captured primitives outlive any amount of cursor movement.
        assert_eq!(a.unum().unwrap(), 7);
        assert_eq!(b.str().unwrap(), "text");
        assert_eq!(c.unum().unwrap(), 1);
    }

    #[test]
    fn advancing_a_closed_reader_frame_errors() {
        let root = read(r#"[[1], 2]"#);
        let mut outer = root.arr().unwrap();
        let inner_value = outer.next().unwrap().unwrap();
        let mut inner = inner_value.arr().unwrap();
        // Advance the outer array: the inner frame is drained and popped.
        assert_eq!(outer.next().unwrap().unwrap().unum().unwrap(), 2);
        assert!(matches!(inner.next().unwrap(), Err(Error::Reader(_))));
    }

    #[test]
    fn into_value_materializes_subtrees() {
        let root = read(r#"{"a": [1, {"b": null}], "k": 1, "k": 2}"#);
        let v = root.into_value().unwrap();
        assert_eq!(v.to_string(), r#"{"a":[1,{"b":null}],"k":2}"#);
    }

    #[test]
    fn deep_nesting_reads_iteratively() {
        let mut text = String::new();
        for _ in 0..1200 {
            text.push('[');
        }
        text.push('7');
        for _ in 0..1200 {
            text.push(']');
        }

        let mut readers = alloc::vec::Vec::new();
        let mut value = read(&text);
        for _ in 0..1200 {
            let mut arr = value.arr().unwrap();
            value = arr.next().unwrap().unwrap();
            readers.push(arr);
        }
        assert_eq!(value.unum().unwrap(), 7);
        // Dropping the stack of readers front-to-back drains iteratively.
        drop(readers);
    }

    #[test]
    fn malformed_input_surfaces_mid_iteration() {
        let root = read("[1,, 2]");
        let mut arr = root.arr().unwrap();
        assert_eq!(arr.next().unwrap().unwrap().unum().unwrap(), 1);
        assert!(matches!(
            arr.next().unwrap(),
            Err(Error::Deserialize { .. })
        ));
        assert!(arr.next().is_none());
    }

    #[test]
    fn empty_composites() {
        assert!(read("[]").arr().unwrap().next().is_none());
        let root = read("{}");
        let mut obj = root.obj().unwrap();
        assert!(obj.next().is_none());
    }

    #[test]
    fn type_errors_name_kinds() {
        let err = read("[]").obj().unwrap_err();
        assert_eq!(err.to_string(), "value is array, not object");
        let root = read("1");
        assert!(root.arr().is_err());
        assert!(root.str().is_err());
    }
}
