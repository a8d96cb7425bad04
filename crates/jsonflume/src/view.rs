//! The arena-backed immutable document view.
//!
//! A view is built in one pass from the token stream into two buffers: a
//! flat entry array (composites reference a contiguous run of child entries
//! by offset and count) and a single string blob holding every decoded key
//! and string value. Navigation hands out light [`Viewer`] handles that
//! share the arena through a reference count; nothing is ever copied out of
//! the arena until [`Viewer::to_value`] is asked to.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::Cell;

use crate::deserializer::{Deserializer, Number};
use crate::error::Error;
use crate::stream::Stream;
use crate::value::{Kind, Map, Value};

/// One slot in the entry array. Composite entries reference a run of
/// entries in the same array; string entries reference a slice of the
/// shared blob. Object runs interleave keys and values, so `count` is twice
/// the pair count.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ViewEntry {
    Null,
    Boolean(bool),
    Uint(u64),
    Int(i64),
    Real(f64),
    Str { offset: usize, len: usize },
    Arr { offset: usize, count: usize },
    Obj { offset: usize, count: usize },
}

/// The shared arena: immutable once construction finishes.
#[derive(Debug)]
struct ViewState {
    entries: Vec<ViewEntry>,
    strings: String,
}

impl ViewState {
    /// The blob slice behind the string entry at `i`.
    fn str_at(&self, i: usize) -> &str {
        match self.entries[i] {
            ViewEntry::Str { offset, len } => &self.strings[offset..offset + len],
            _ => "",
        }
    }
}

fn parse_object<R: Stream>(
    de: &mut Deserializer<R>,
    state: &mut ViewState,
) -> Result<ViewEntry, Error> {
    if de.check_is_empty(true)? {
        return Ok(ViewEntry::Obj {
            offset: 0,
            count: 0,
        });
    }

    // Children land in a scratch list first so the run stays contiguous
    // even while grandchildren are appended to the arena.
    let mut list = Vec::new();
    loop {
        let offset = state.strings.len();
        de.read_string(&mut state.strings, true)?;
        list.push(ViewEntry::Str {
            offset,
            len: state.strings.len() - offset,
        });
        list.push(parse_value(de, state)?);
        if de.close_else_separator(true)? {
            break;
        }
    }

    let offset = state.entries.len();
    let count = list.len();
    state.entries.extend(list);
    Ok(ViewEntry::Obj { offset, count })
}

fn parse_array<R: Stream>(
    de: &mut Deserializer<R>,
    state: &mut ViewState,
) -> Result<ViewEntry, Error> {
    if de.check_is_empty(false)? {
        return Ok(ViewEntry::Arr {
            offset: 0,
            count: 0,
        });
    }

    let mut list = Vec::new();
    loop {
        list.push(parse_value(de, state)?);
        if de.close_else_separator(false)? {
            break;
        }
    }

    let offset = state.entries.len();
    let count = list.len();
    state.entries.extend(list);
    Ok(ViewEntry::Arr { offset, count })
}

fn parse_value<R: Stream>(
    de: &mut Deserializer<R>,
    state: &mut ViewState,
) -> Result<ViewEntry, Error> {
    match de.peek_or_open_next()? {
        Kind::String => {
            let offset = state.strings.len();
            de.read_string(&mut state.strings, false)?;
            Ok(ViewEntry::Str {
                offset,
                len: state.strings.len() - offset,
            })
        }
        Kind::Object => parse_object(de, state),
        Kind::Array => parse_array(de, state),
        Kind::Boolean => Ok(ViewEntry::Boolean(de.read_boolean()?)),
        Kind::Uint | Kind::Int | Kind::Real => Ok(match de.read_number()? {
            Number::Uint(v) => ViewEntry::Uint(v),
            Number::Int(v) => ViewEntry::Int(v),
            Number::Real(v) => ViewEntry::Real(v),
        }),
        Kind::Null => {
            de.read_null()?;
            Ok(ViewEntry::Null)
        }
    }
}

/// Builds a view from a token stream, consuming it entirely.
pub(crate) fn build<R: Stream>(mut de: Deserializer<R>) -> Result<Viewer, Error> {
    let mut state = ViewState {
        entries: vec![ViewEntry::Null],
        strings: String::new(),
    };
    let root = parse_value(&mut de, &mut state)?;
    state.entries[0] = root;
    de.check_done()?;
    Ok(Viewer::new(Rc::new(state), 0))
}

/// Read-only handle onto one value of a view.
///
/// Light-weight and freely clonable: a viewer is an entry copied out of the
/// arena plus a shared reference to it. Repeated key lookups on the same
/// object short-circuit through a per-handle cache of the last matched key
/// index.
#[derive(Debug, Clone)]
pub struct Viewer {
    state: Rc<ViewState>,
    entry: ViewEntry,
    last_key: Cell<usize>,
}

impl PartialEq for Viewer {
    /// Two viewers are equal when they view the same entry of the same
    /// arena (or both are primitives with equal payloads).
    fn eq(&self, other: &Viewer) -> bool {
        Rc::ptr_eq(&self.state, &other.state) && self.entry == other.entry
    }
}

impl Viewer {
    fn new(state: Rc<ViewState>, index: usize) -> Self {
        let entry = state.entries[index];
        Viewer {
            state,
            entry,
            last_key: Cell::new(usize::MAX),
        }
    }

    fn null_of(state: &Rc<ViewState>) -> Self {
        Viewer {
            state: Rc::clone(state),
            entry: ViewEntry::Null,
            last_key: Cell::new(usize::MAX),
        }
    }

    /// The exact kind of the viewed value.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self.entry {
            ViewEntry::Null => Kind::Null,
            ViewEntry::Boolean(_) => Kind::Boolean,
            ViewEntry::Uint(_) => Kind::Uint,
            ViewEntry::Int(_) => Kind::Int,
            ViewEntry::Real(_) => Kind::Real,
            ViewEntry::Str { .. } => Kind::String,
            ViewEntry::Arr { .. } => Kind::Array,
            ViewEntry::Obj { .. } => Kind::Object,
        }
    }

    /// Returns `true` if the viewed value is `null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self.entry, ViewEntry::Null)
    }

    /// Returns `true` if the viewed value is a boolean.
    #[must_use]
    pub fn is_boolean(&self) -> bool {
        matches!(self.entry, ViewEntry::Boolean(_))
    }

    /// Returns `true` if the viewed value is a string.
    #[must_use]
    pub fn is_str(&self) -> bool {
        matches!(self.entry, ViewEntry::Str { .. })
    }

    /// Returns `true` if the viewed value reads as an unsigned integer.
    #[must_use]
    pub fn is_unum(&self) -> bool {
        match self.entry {
            ViewEntry::Uint(_) => true,
            ViewEntry::Int(v) => v >= 0,
            _ => false,
        }
    }

    /// Returns `true` if the viewed value reads as a signed integer.
    #[must_use]
    pub fn is_inum(&self) -> bool {
        matches!(self.entry, ViewEntry::Uint(_) | ViewEntry::Int(_))
    }

    /// Returns `true` if the viewed value reads as a real.
    #[must_use]
    pub fn is_real(&self) -> bool {
        matches!(
            self.entry,
            ViewEntry::Uint(_) | ViewEntry::Int(_) | ViewEntry::Real(_)
        )
    }

    /// Returns `true` if the viewed value is an array.
    #[must_use]
    pub fn is_arr(&self) -> bool {
        matches!(self.entry, ViewEntry::Arr { .. })
    }

    /// Returns `true` if the viewed value is an object.
    #[must_use]
    pub fn is_obj(&self) -> bool {
        matches!(self.entry, ViewEntry::Obj { .. })
    }

    /// Returns `true` if the viewed value reads as `kind` under the
    /// leniency rules.
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
        match self.entry {
            ViewEntry::Boolean(b) => Ok(b),
            _ => Err(Error::mismatch(Kind::Boolean, self.kind())),
        }
    }

    /// Reads the string content out of the shared blob.
    pub fn str(&self) -> Result<&str, Error> {
        match self.entry {
            ViewEntry::Str { offset, len } => Ok(&self.state.strings[offset..offset + len]),
            _ => Err(Error::mismatch(Kind::String, self.kind())),
        }
    }

    /// Reads the value as an unsigned integer, converting a non-negative
    /// signed integer or real.
    pub fn unum(&self) -> Result<u64, Error> {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        match self.entry {
            ViewEntry::Uint(v) => Ok(v),
            ViewEntry::Int(v) if v >= 0 => Ok(v as u64),
            ViewEntry::Real(v) if v >= 0.0 => Ok(v as u64),
            _ => Err(Error::mismatch(Kind::Uint, self.kind())),
        }
    }

    /// Reads the value as a signed integer, converting an unsigned integer
    /// or a real.
    pub fn inum(&self) -> Result<i64, Error> {
        #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
        match self.entry {
            ViewEntry::Int(v) => Ok(v),
            ViewEntry::Uint(v) => Ok(v as i64),
            ViewEntry::Real(v) => Ok(v as i64),
            _ => Err(Error::mismatch(Kind::Int, self.kind())),
        }
    }

    /// Reads the value as a real, converting either integer kind.
    pub fn real(&self) -> Result<f64, Error> {
        #[allow(clippy::cast_precision_loss)]
        match self.entry {
            ViewEntry::Real(v) => Ok(v),
            ViewEntry::Uint(v) => Ok(v as f64),
            ViewEntry::Int(v) => Ok(v as f64),
            _ => Err(Error::mismatch(Kind::Real, self.kind())),
        }
    }

    /// Opens the array for iteration and indexing.
    pub fn arr(&self) -> Result<ArrViewer, Error> {
        match self.entry {
            ViewEntry::Arr { offset, count } => Ok(ArrViewer {
                state: Rc::clone(&self.state),
                offset,
                count,
            }),
            _ => Err(Error::mismatch(Kind::Array, self.kind())),
        }
    }

    /// Opens the object for iteration and lookup.
    pub fn obj(&self) -> Result<ObjViewer, Error> {
        match self.entry {
            ViewEntry::Obj { offset, count } => Ok(ObjViewer {
                state: Rc::clone(&self.state),
                offset,
                count,
                last_key: Cell::new(usize::MAX),
            }),
            _ => Err(Error::mismatch(Kind::Object, self.kind())),
        }
    }

    /// Element, member, or byte count; zero for non-container kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        match self.entry {
            ViewEntry::Arr { count, .. } => count,
            ViewEntry::Obj { count, .. } => count / 2,
            ViewEntry::Str { len, .. } => len,
            _ => 0,
        }
    }

    /// Like [`Self::len`], but only for the given container kind.
    #[must_use]
    pub fn len_of(&self, kind: Kind) -> usize {
        match (kind, self.entry) {
            (Kind::Array, ViewEntry::Arr { count, .. }) => count,
            (Kind::Object, ViewEntry::Obj { count, .. }) => count / 2,
            (Kind::String, ViewEntry::Str { len, .. }) => len,
            _ => 0,
        }
    }

    /// Whether the container is empty; `true` for non-container kinds.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Like [`Self::is_empty`], but only for the given container kind.
    #[must_use]
    pub fn is_empty_of(&self, kind: Kind) -> bool {
        self.len_of(kind) == 0
    }

    /// Scans the object run for `key`, going through the per-handle cache
    /// first. Returns the entry index of the paired value.
    fn lookup(&self, offset: usize, count: usize, key: &str) -> Option<usize> {
        let cached = self.last_key.get();
        if cached >= offset
            && cached < offset + count
            && (cached - offset) % 2 == 0
            && self.state.str_at(cached) == key
        {
            return Some(cached + 1);
        }
        let mut i = offset;
        while i < offset + count {
            if self.state.str_at(i) == key {
                self.last_key.set(i);
                return Some(i + 1);
            }
            i += 2;
        }
        None
    }

    /// Reads the member at `key`. A missing key yields a null viewer; with
    /// duplicate keys the first occurrence wins. A non-object is a type
    /// error.
    pub fn get(&self, key: &str) -> Result<Viewer, Error> {
        match self.entry {
            ViewEntry::Obj { offset, count } => Ok(self
                .lookup(offset, count, key)
                .map_or_else(|| Viewer::null_of(&self.state), |i| {
                    Viewer::new(Rc::clone(&self.state), i)
                })),
            _ => Err(Error::mismatch(Kind::Object, self.kind())),
        }
    }

    /// Whether this is an object containing `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        match self.entry {
            ViewEntry::Obj { offset, count } => self.lookup(offset, count, key).is_some(),
            _ => false,
        }
    }

    /// Whether this is an object containing `key` with a value readable as
    /// `kind`.
    #[must_use]
    pub fn contains_kind(&self, key: &str, kind: Kind) -> bool {
        match self.entry {
            ViewEntry::Obj { offset, count } => self
                .lookup(offset, count, key)
                .is_some_and(|i| Viewer::new(Rc::clone(&self.state), i).is(kind)),
            _ => false,
        }
    }

    /// Whether this is an object whose members all read as `kind`.
    #[must_use]
    pub fn typed_object(&self, kind: Kind) -> bool {
        match self.entry {
            ViewEntry::Obj { offset, count } => (0..count / 2)
                .all(|p| Viewer::new(Rc::clone(&self.state), offset + 2 * p + 1).is(kind)),
            _ => false,
        }
    }

    /// Reads the element at `i`; out of bounds is a range error.
    pub fn at(&self, i: usize) -> Result<Viewer, Error> {
        match self.entry {
            ViewEntry::Arr { offset, count } => {
                if i >= count {
                    return Err(Error::Range {
                        index: i,
                        len: count,
                    });
                }
                Ok(Viewer::new(Rc::clone(&self.state), offset + i))
            }
            _ => Err(Error::mismatch(Kind::Array, self.kind())),
        }
    }

    /// Whether this is an array with an element at `i`.
    #[must_use]
    pub fn has(&self, i: usize) -> bool {
        matches!(self.entry, ViewEntry::Arr { count, .. } if i < count)
    }

    /// Whether this is an array whose element at `i` reads as `kind`.
    #[must_use]
    pub fn has_kind(&self, i: usize, kind: Kind) -> bool {
        match self.entry {
            ViewEntry::Arr { offset, count } if i < count => {
                Viewer::new(Rc::clone(&self.state), offset + i).is(kind)
            }
            _ => false,
        }
    }

    /// Whether this is an array whose elements all read as `kind`.
    #[must_use]
    pub fn typed_array(&self, kind: Kind) -> bool {
        match self.entry {
            ViewEntry::Arr { offset, count } => {
                (0..count).all(|i| Viewer::new(Rc::clone(&self.state), offset + i).is(kind))
            }
            _ => false,
        }
    }

    /// Materializes the viewed subtree into an owning [`Value`]. Duplicate
    /// object keys collapse to the last occurrence, matching the DOM
    /// parser.
    #[must_use]
    pub fn to_value(&self) -> Value {
        fn convert(state: &Rc<ViewState>, entry: ViewEntry) -> Value {
            match entry {
                ViewEntry::Null => Value::Null,
                ViewEntry::Boolean(b) => Value::Boolean(b),
                ViewEntry::Uint(v) => Value::Uint(v),
                ViewEntry::Int(v) => Value::Int(v),
                ViewEntry::Real(v) => Value::Real(v),
                ViewEntry::Str { offset, len } => {
                    Value::String(String::from(&state.strings[offset..offset + len]))
                }
                ViewEntry::Arr { offset, count } => Value::Array(
                    (0..count)
                        .map(|i| convert(state, state.entries[offset + i]))
                        .collect(),
                ),
                ViewEntry::Obj { offset, count } => {
                    let mut map = Map::new();
                    for p in 0..count / 2 {
                        let key = state.str_at(offset + 2 * p);
                        map.insert(
                            String::from(key),
                            convert(state, state.entries[offset + 2 * p + 1]),
                        );
                    }
                    Value::Object(map)
                }
            }
        }
        convert(&self.state, self.entry)
    }
}

/// Read-only handle onto an array of a view.
#[derive(Debug, Clone)]
pub struct ArrViewer {
    state: Rc<ViewState>,
    offset: usize,
    count: usize,
}

impl ArrViewer {
    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether the array has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The element at `i`; out of bounds is a range error.
    pub fn at(&self, i: usize) -> Result<Viewer, Error> {
        if i >= self.count {
            return Err(Error::Range {
                index: i,
                len: self.count,
            });
        }
        Ok(Viewer::new(Rc::clone(&self.state), self.offset + i))
    }

    /// Iterates the elements in document order.
    #[must_use]
    pub fn iter(&self) -> ArrViewerIter<'_> {
        ArrViewerIter { view: self, at: 0 }
    }
}

/// Iterator over the elements of an [`ArrViewer`].
#[derive(Debug)]
pub struct ArrViewerIter<'a> {
    view: &'a ArrViewer,
    at: usize,
}

impl Iterator for ArrViewerIter<'_> {
    type Item = Viewer;

    fn next(&mut self) -> Option<Viewer> {
        if self.at >= self.view.count {
            return None;
        }
        let i = self.view.offset + self.at;
        self.at += 1;
        Some(Viewer::new(Rc::clone(&self.view.state), i))
    }
}

impl<'a> IntoIterator for &'a ArrViewer {
    type Item = Viewer;
    type IntoIter = ArrViewerIter<'a>;

    fn into_iter(self) -> ArrViewerIter<'a> {
        self.iter()
    }
}

/// Read-only handle onto an object of a view.
#[derive(Debug, Clone)]
pub struct ObjViewer {
    state: Rc<ViewState>,
    offset: usize,
    count: usize,
    last_key: Cell<usize>,
}

impl ObjViewer {
    /// Number of key/value pairs (duplicates included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.count / 2
    }

    /// Whether the object has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn lookup(&self, key: &str) -> Option<usize> {
        let cached = self.last_key.get();
        if cached >= self.offset
            && cached < self.offset + self.count
            && (cached - self.offset) % 2 == 0
            && self.state.str_at(cached) == key
        {
            return Some(cached + 1);
        }
        let mut i = self.offset;
        while i < self.offset + self.count {
            if self.state.str_at(i) == key {
                self.last_key.set(i);
                return Some(i + 1);
            }
            i += 2;
        }
        None
    }

    /// Whether the object contains `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// The value at `key`; the first occurrence wins for duplicate keys,
    /// and a missing key yields a null viewer.
    #[must_use]
    pub fn get(&self, key: &str) -> Viewer {
        self.lookup(key).map_or_else(
            || Viewer::null_of(&self.state),
            |i| Viewer::new(Rc::clone(&self.state), i),
        )
    }

    /// Iterates the members in document order, duplicates included.
    #[must_use]
    pub fn iter(&self) -> ObjViewerIter<'_> {
        ObjViewerIter { view: self, at: 0 }
    }
}

/// Iterator over the members of an [`ObjViewer`].
#[derive(Debug)]
pub struct ObjViewerIter<'a> {
    view: &'a ObjViewer,
    at: usize,
}

impl<'a> Iterator for ObjViewerIter<'a> {
    type Item = (&'a str, Viewer);

    fn next(&mut self) -> Option<(&'a str, Viewer)> {
        if self.at >= self.view.count {
            return None;
        }
        let i = self.view.offset + self.at;
        self.at += 2;
        Some((
            self.view.state.str_at(i),
            Viewer::new(Rc::clone(&self.view.state), i + 1),
        ))
    }
}

impl<'a> IntoIterator for &'a ObjViewer {
    type Item = (&'a str, Viewer);
    type IntoIter = ObjViewerIter<'a>;

    fn into_iter(self) -> ObjViewerIter<'a> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::StrStream;
    use alloc::string::ToString;
    use alloc::vec::Vec;

    fn view(text: &str) -> Viewer {
        build(Deserializer::new(StrStream::new(text))).unwrap()
    }

    #[test]
    fn primitives_read_through() {
        assert!(view("null").is_null());
        assert_eq!(view("true").boolean().unwrap(), true);
        assert_eq!(view("42").unum().unwrap(), 42);
        assert_eq!(view("-42").inum().unwrap(), -42);
        assert_eq!(view("1.25").real().unwrap(), 1.25);
        assert_eq!(view(r#""hi""#).str().unwrap(), "hi");
        assert_eq!(view("7").kind(), Kind::Uint);
    }

    #[test]
    fn lenient_numeric_reads() {
        assert_eq!(view("-1").kind(), Kind::Int);
        assert!(view("3").is_inum());
        assert!(view("3").is_real());
        assert!(view("-3").is(Kind::Real));
        assert_eq!(view("3").real().unwrap(), 3.0);
        assert!(view("3.5").unum().is_ok());
        assert!(view(r#""x""#).unum().is_err());
    }

    #[test]
    fn array_navigation() {
        let v = view(r#"[1, "two", [3], {}]"#);
        assert!(v.is_arr());
        assert_eq!(v.len(), 4);
        assert!(v.has(3));
        assert!(!v.has(4));
        assert!(v.has_kind(0, Kind::Uint));
        assert!(!v.has_kind(1, Kind::Uint));

        let arr = v.arr().unwrap();
        let kinds: Vec<Kind> = arr.iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            [Kind::Uint, Kind::String, Kind::Array, Kind::Object]
        );
        assert_eq!(arr.at(1).unwrap().str().unwrap(), "two");
        assert_eq!(arr.at(2).unwrap().at(0).unwrap().unum().unwrap(), 3);
        assert_eq!(
            arr.at(9).unwrap_err(),
            Error::Range { index: 9, len: 4 }
        );
        assert_eq!(
            v.at(9).unwrap_err(),
            Error::Range { index: 9, len: 4 }
        );
    }

    #[test]
    fn object_navigation_preserves_order() {
        let v = view(r#"{"z": 1, "a": 2, "m": {"inner": true}}"#);
        assert!(v.is_obj());
        assert_eq!(v.len(), 3);
        let obj = v.obj().unwrap();
        let keys: Vec<&str> = obj.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["z", "a", "m"]);
        assert_eq!(obj.get("a").unum().unwrap(), 2);
        assert!(obj.get("m").contains("inner"));
        assert!(obj.get("nope").is_null());
        assert!(v.contains("z"));
        assert!(v.contains_kind("z", Kind::Real));
        assert!(!v.contains_kind("m", Kind::Real));
    }

    #[test]
    fn duplicate_keys_iterate_all_first_match_wins() {
        let v = view(r#"{"k": 1, "k": 2, "x": 3}"#);
        assert_eq!(v.len(), 3);
        let obj = v.obj().unwrap();
        let hits: Vec<u64> = obj
            .iter()
            .filter(|(k, _)| *k == "k")
            .map(|(_, v)| v.unum().unwrap())
            .collect();
        assert_eq!(hits, [1, 2]);
        assert_eq!(obj.get("k").unum().unwrap(), 1);
        assert_eq!(v.get("k").unwrap().unum().unwrap(), 1);
    }

    #[test]
    fn key_cache_stays_correct() {
        let v = view(r#"{"a": 1, "b": 2, "c": 3}"#);
        // Prime the cache, hit it, then miss through it.
        assert_eq!(v.get("b").unwrap().unum().unwrap(), 2);
        assert_eq!(v.get("b").unwrap().unum().unwrap(), 2);
        assert_eq!(v.get("a").unwrap().unum().unwrap(), 1);
        assert_eq!(v.get("c").unwrap().unum().unwrap(), 3);
        assert_eq!(v.get("b").unwrap(), v.get("b").unwrap());
        assert!(!v.contains("d"));
    }

    #[test]
    fn typed_queries() {
        assert!(view("[1, 2, 3]").typed_array(Kind::Uint));
        assert!(!view(r#"[1, "x"]"#).typed_array(Kind::Uint));
        assert!(view(r#"{"a": 1, "b": 2}"#).typed_object(Kind::Real));
        assert!(!view(r#"{"a": 1, "b": null}"#).typed_object(Kind::Real));
    }

    #[test]
    fn strings_share_one_blob() {
        let v = view(r#"{"key": "value", "other": "text"}"#);
        let obj = v.obj().unwrap();
        // All string content lands contiguously in document order.
        assert_eq!(obj.get("key").str().unwrap(), "value");
        assert_eq!(obj.get("other").str().unwrap(), "text");
        assert_eq!(v.len_of(Kind::Object), 2);
        assert_eq!(obj.get("key").len_of(Kind::String), 5);
    }

    #[test]
    fn to_value_materializes() {
        let v = view(r#"{"a": [1, null], "s": "x", "k": 1, "k": 2}"#);
        let value = v.to_value();
        assert_eq!(value.get("s").unwrap(), &Value::from("x"));
        assert_eq!(value.at(0).is_err(), true);
        assert_eq!(value.get("a").unwrap().len(), 2);
        // Duplicate keys collapse to the last occurrence, like the DOM
        // parser.
        assert_eq!(value.get("k").unwrap(), &Value::Uint(2));
    }

    #[test]
    fn rejects_trailing_garbage_and_bad_input() {
        assert!(build(Deserializer::new(StrStream::new("1 2"))).is_err());
        assert!(build(Deserializer::new(StrStream::new("[1,]"))).is_err());
        assert!(build(Deserializer::new(StrStream::new(""))).is_err());
        assert!(build(Deserializer::new(StrStream::new("{\"a\" 1}"))).is_err());
    }

    #[test]
    fn empty_composites() {
        assert!(view("{}").is_empty());
        assert!(view("[]").is_empty());
        assert_eq!(view("{}").len(), 0);
        assert!(view("{}").obj().unwrap().get("x").is_null());
        assert_eq!(view("[]").to_value().to_string(), "[]");
    }
}
