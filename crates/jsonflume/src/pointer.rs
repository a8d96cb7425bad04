//! RFC 6901 JSON pointers: emit from steps, resolve against the DOM or the
//! view.
//!
//! Resolution is deliberately forgiving in outcome but strict in syntax: a
//! malformed pointer (missing leading `/`, unpaired `~`), a step through a
//! non-container, a missing key, or an unparsable index all yield "not
//! resolved" rather than an error.

use alloc::string::{String, ToString};

use crate::value::Value;
use crate::view::Viewer;

/// One step of a pointer: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Matches an object member by key equality.
    Key(String),
    /// Indexes an array.
    Index(usize),
}

impl From<&str> for Step {
    fn from(key: &str) -> Self {
        Step::Key(String::from(key))
    }
}

impl From<String> for Step {
    fn from(key: String) -> Self {
        Step::Key(key)
    }
}

impl From<usize> for Step {
    fn from(index: usize) -> Self {
        Step::Index(index)
    }
}

/// Decodes one reference token: `~0` becomes `~`, `~1` becomes `/`. An
/// unpaired or mis-paired `~` fails the whole pointer.
fn decode_token(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '~' {
            match chars.next() {
                Some('0') => out.push('~'),
                Some('1') => out.push('/'),
                _ => return None,
            }
        } else {
            out.push(c);
        }
    }
    Some(out)
}

/// Resolves `pointer` against a DOM value. The empty pointer denotes the
/// root; any mismatch yields `None`.
#[must_use]
pub fn resolve<'a>(value: &'a Value, pointer: &str) -> Option<&'a Value> {
    if pointer.is_empty() {
        return Some(value);
    }
    let rest = pointer.strip_prefix('/')?;
    let mut current = value;
    for raw in rest.split('/') {
        let token = decode_token(raw)?;
        current = match current {
            Value::Object(map) => map.get(&token)?,
            Value::Array(items) => items.get(token.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Resolves `pointer` against a view. The empty pointer denotes the root;
/// any mismatch yields `None`.
#[must_use]
pub fn resolve_view(view: &Viewer, pointer: &str) -> Option<Viewer> {
    if pointer.is_empty() {
        return Some(view.clone());
    }
    let rest = pointer.strip_prefix('/')?;
    let mut current = view.clone();
    for raw in rest.split('/') {
        let token = decode_token(raw)?;
        current = if current.is_obj() {
            if !current.contains(&token) {
                return None;
            }
            current.get(&token).ok()?
        } else if current.is_arr() {
            current.at(token.parse::<usize>().ok()?).ok()?
        } else {
            return None;
        };
    }
    Some(current)
}

/// Appends one step to an already valid (or empty) pointer, applying the
/// reverse escape (`~` to `~0`, `/` to `~1`).
pub fn append_pointer(out: &mut String, step: &Step) {
    out.push('/');
    match step {
        Step::Key(key) => {
            for c in key.chars() {
                match c {
                    '~' => out.push_str("~0"),
                    '/' => out.push_str("~1"),
                    c => out.push(c),
                }
            }
        }
        Step::Index(index) => out.push_str(&index.to_string()),
    }
}

/// Builds a pointer from a sequence of steps.
pub fn pointer<I>(steps: I) -> String
where
    I: IntoIterator,
    I::Item: Into<Step>,
{
    let mut out = String::new();
    for step in steps {
        append_pointer(&mut out, &step.into());
    }
    out
}
