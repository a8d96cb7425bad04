//! The handle-based streaming builder.
//!
//! A build starts from a single [`BuildValue`] representing the one
//! not-yet-written root. Writing a primitive consumes the handle; opening a
//! composite trades it for a [`BuildObject`] or [`BuildArray`] whose
//! lifetime decides when the matching bracket closes. The shared state
//! tracks which composites are open and whether a pending value is
//! outstanding, so any out-of-order operation first *force-closes*
//! everything deeper: an abandoned pending value becomes `null`, and every
//! deeper composite emits its closing bracket. Whatever order handles are
//! used or dropped in, the sink ends up holding exactly one well-formed
//! document.
//!
//! ```
//! use jsonflume::build;
//!
//! let mut out = String::new();
//! let root = build(&mut out, "");
//! let mut obj = root.obj()?;
//! obj.add("a", 1u64)?;
//! obj.add_arr("b")?.push(true)?.push(())?;
//! obj.close()?;
//! assert_eq!(out, r#"{"a":1,"b":[true,null]}"#);
//! # Ok::<(), jsonflume::Error>(())
//! ```

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::error::Error;
use crate::serializer::Serializer;
use crate::sink::Sink;
use crate::value::Value;

/// One open composite on the active stack.
#[derive(Debug, Clone, Copy)]
struct Frame {
    id: u64,
    object: bool,
}

/// State shared by every handle issued from one build.
#[derive(Debug)]
struct BuildShared<S: Sink> {
    ser: Serializer<S>,
    active: Vec<Frame>,
    next_id: u64,
    value_stamp: u64,
    awaiting_value: bool,
    done: bool,
}

impl<S: Sink> BuildShared<S> {
    /// Emits the closing bracket of the top frame and pops it. Popping the
    /// last frame finishes the document.
    fn close_top(&mut self) -> Result<(), Error> {
        let frame = self.active.pop().expect("active stack is non-empty");
        let result = self.ser.end(frame.object);
        if self.active.is_empty() {
            self.done = true;
        }
        result
    }

    /// Makes the composite `id` the deepest open position: emits `null`
    /// for an abandoned pending value, then closes every deeper composite.
    fn capture(&mut self, id: u64) -> Result<(), Error> {
        if self.done {
            return Err(Error::Builder("document already complete"));
        }
        if !self.active.iter().any(|f| f.id == id) {
            return Err(Error::Builder("composite handle already closed"));
        }
        let mut result = Ok(());
        if self.awaiting_value {
            self.awaiting_value = false;
            result = self.ser.primitive(&Value::Null);
        }
        while self.active.last().expect("frame located above").id != id {
            let closed = self.close_top();
            result = result.and(closed);
        }
        result
    }

    /// Checks that a value handle with `stamp` is the current pending
    /// value.
    fn ensure_current(&self, stamp: u64) -> Result<(), Error> {
        if self.done {
            return Err(Error::Builder("document already complete"));
        }
        if !self.awaiting_value || stamp != self.value_stamp {
            return Err(Error::Builder("stale value handle"));
        }
        Ok(())
    }

    /// Opens a composite at the current write position.
    fn open(&mut self, object: bool) -> Result<u64, Error> {
        self.next_id += 1;
        let id = self.next_id;
        self.active.push(Frame { id, object });
        self.ser.begin(object)?;
        Ok(id)
    }

    /// Issues a fresh pending-value stamp.
    fn next_value(&mut self) -> u64 {
        self.value_stamp += 1;
        self.awaiting_value = true;
        self.value_stamp
    }
}

/// Starts a build over `sink`, returning the root value handle.
pub(crate) fn root<S: Sink>(sink: S, indent: &str) -> BuildValue<S> {
    BuildValue {
        shared: Rc::new(RefCell::new(BuildShared {
            ser: Serializer::new(sink, indent),
            active: Vec::new(),
            next_id: 0,
            value_stamp: 0,
            awaiting_value: true,
            done: false,
        })),
        stamp: 0,
    }
}

/// Handle to exactly one not-yet-written JSON value.
///
/// Consumed by writing a primitive ([`set`](Self::set)), inserting raw text
/// ([`set_json`](Self::set_json)), or opening a composite
/// ([`obj`](Self::obj) / [`arr`](Self::arr)). Dropping the handle instead
/// writes `null` into its position the next time the builder advances (or
/// immediately, if it is the current pending value).
pub struct BuildValue<S: Sink> {
    shared: Rc<RefCell<BuildShared<S>>>,
    stamp: u64,
}

impl<S: Sink> BuildValue<S> {
    /// Whether the document has been completed.
    #[must_use]
    pub fn done(&self) -> bool {
        self.shared.borrow().done
    }

    /// Whether this handle is no longer the current pending value.
    #[must_use]
    pub fn closed(&self) -> bool {
        let shared = self.shared.borrow();
        !shared.awaiting_value || shared.value_stamp != self.stamp
    }

    /// Writes `v` into this position. Composites embedded in `v` are
    /// emitted recursively.
    pub fn set(self, v: impl Into<Value>) -> Result<(), Error> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_current(self.stamp)?;
        let result = shared.ser.write_value(&v.into());
        shared.awaiting_value = false;
        if shared.active.is_empty() {
            shared.done = true;
        }
        result
    }

    /// Writes an already-formed JSON fragment into this position, verbatim.
    /// The caller is trusted to supply a single well-formed value.
    pub fn set_json(self, raw: &str) -> Result<(), Error> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_current(self.stamp)?;
        let result = shared.ser.insert(raw);
        shared.awaiting_value = false;
        if shared.active.is_empty() {
            shared.done = true;
        }
        result
    }

    /// Turns this position into an object and returns its handle.
    pub fn obj(self) -> Result<BuildObject<S>, Error> {
        let id = {
            let mut shared = self.shared.borrow_mut();
            shared.ensure_current(self.stamp)?;
            shared.awaiting_value = false;
            shared.open(true)?
        };
        Ok(BuildObject {
            shared: Rc::clone(&self.shared),
            id,
            closed: false,
        })
    }

    /// Turns this position into an array and returns its handle.
    pub fn arr(self) -> Result<BuildArray<S>, Error> {
        let id = {
            let mut shared = self.shared.borrow_mut();
            shared.ensure_current(self.stamp)?;
            shared.awaiting_value = false;
            shared.open(false)?
        };
        Ok(BuildArray {
            shared: Rc::clone(&self.shared),
            id,
            closed: false,
        })
    }
}

impl<S: Sink> Drop for BuildValue<S> {
    fn drop(&mut self) {
        // Only the current pending value writes on drop; consumed and stale
        // handles leave the stream alone.
        let mut shared = self.shared.borrow_mut();
        if shared.done || !shared.awaiting_value || shared.value_stamp != self.stamp {
            return;
        }
        shared.awaiting_value = false;
        let _ = shared.ser.primitive(&Value::Null);
        if shared.active.is_empty() {
            shared.done = true;
        }
    }
}

macro_rules! composite_common {
    ($name:ident) => {
        impl<S: Sink> $name<S> {
            /// Whether the document has been completed.
            #[must_use]
            pub fn done(&self) -> bool {
                self.shared.borrow().done
            }

            /// Whether this composite has been closed, explicitly or by an
            /// operation on one of its ancestors.
            #[must_use]
            pub fn closed(&self) -> bool {
                self.closed || !self.shared.borrow().active.iter().any(|f| f.id == self.id)
            }

            /// Closes this composite, force-closing anything deeper first.
            pub fn close(mut self) -> Result<(), Error> {
                self.closed = true;
                let mut shared = self.shared.borrow_mut();
                shared.capture(self.id)?;
                shared.close_top()
            }
        }

        impl<S: Sink> Drop for $name<S> {
            fn drop(&mut self) {
                if self.closed {
                    return;
                }
                let mut shared = self.shared.borrow_mut();
                if shared.done || !shared.active.iter().any(|f| f.id == self.id) {
                    return;
                }
                if shared.awaiting_value {
                    shared.awaiting_value = false;
                    let _ = shared.ser.primitive(&Value::Null);
                }
                while shared.active.last().map(|f| f.id) != Some(self.id) {
                    let _ = shared.close_top();
                }
                let _ = shared.close_top();
            }
        }
    };
}

/// Handle to an open object.
///
/// Adding a member while a deeper composite or pending value is still
/// outstanding force-closes the deeper state first.
#[derive(Debug)]
pub struct BuildObject<S: Sink> {
    shared: Rc<RefCell<BuildShared<S>>>,
    id: u64,
    closed: bool,
}

composite_common!(BuildObject);

impl<S: Sink> BuildObject<S> {
    /// Adds a member and returns a handle to its not-yet-written value.
    pub fn add_val(&mut self, key: &str) -> Result<BuildValue<S>, Error> {
        let stamp = {
            let mut shared = self.shared.borrow_mut();
            shared.capture(self.id)?;
            shared.ser.object_key(key)?;
            shared.next_value()
        };
        Ok(BuildValue {
            shared: Rc::clone(&self.shared),
            stamp,
        })
    }

    /// Adds a member holding a new object and returns its handle.
    pub fn add_obj(&mut self, key: &str) -> Result<BuildObject<S>, Error> {
        let id = {
            let mut shared = self.shared.borrow_mut();
            shared.capture(self.id)?;
            shared.ser.object_key(key)?;
            shared.open(true)?
        };
        Ok(BuildObject {
            shared: Rc::clone(&self.shared),
            id,
            closed: false,
        })
    }

    /// Adds a member holding a new array and returns its handle.
    pub fn add_arr(&mut self, key: &str) -> Result<BuildArray<S>, Error> {
        let id = {
            let mut shared = self.shared.borrow_mut();
            shared.capture(self.id)?;
            shared.ser.object_key(key)?;
            shared.open(false)?
        };
        Ok(BuildArray {
            shared: Rc::clone(&self.shared),
            id,
            closed: false,
        })
    }

    /// Adds a member and writes its value in one step.
    pub fn add(&mut self, key: &str, v: impl Into<Value>) -> Result<&mut Self, Error> {
        {
            let mut shared = self.shared.borrow_mut();
            shared.capture(self.id)?;
            shared.ser.object_key(key)?;
            shared.ser.write_value(&v.into())?;
        }
        Ok(self)
    }

    /// Adds a member whose value is an already-formed JSON fragment,
    /// emitted verbatim.
    pub fn add_json(&mut self, key: &str, raw: &str) -> Result<&mut Self, Error> {
        {
            let mut shared = self.shared.borrow_mut();
            shared.capture(self.id)?;
            shared.ser.object_key(key)?;
            shared.ser.insert(raw)?;
        }
        Ok(self)
    }
}

/// Handle to an open array.
pub struct BuildArray<S: Sink> {
    shared: Rc<RefCell<BuildShared<S>>>,
    id: u64,
    closed: bool,
}

composite_common!(BuildArray);

impl<S: Sink> BuildArray<S> {
    /// Appends an element and returns a handle to its not-yet-written
    /// value.
    pub fn push_val(&mut self) -> Result<BuildValue<S>, Error> {
        let stamp = {
            let mut shared = self.shared.borrow_mut();
            shared.capture(self.id)?;
            shared.ser.array_value()?;
            shared.next_value()
        };
        Ok(BuildValue {
            shared: Rc::clone(&self.shared),
            stamp,
        })
    }

    /// Appends a new object element and returns its handle.
    pub fn push_obj(&mut self) -> Result<BuildObject<S>, Error> {
        let id = {
            let mut shared = self.shared.borrow_mut();
            shared.capture(self.id)?;
            shared.ser.array_value()?;
            shared.open(true)?
        };
        Ok(BuildObject {
            shared: Rc::clone(&self.shared),
            id,
            closed: false,
        })
    }

    /// Appends a new array element and returns its handle.
    pub fn push_arr(&mut self) -> Result<BuildArray<S>, Error> {
        let id = {
            let mut shared = self.shared.borrow_mut();
            shared.capture(self.id)?;
            shared.ser.array_value()?;
            shared.open(false)?
        };
        Ok(BuildArray {
            shared: Rc::clone(&self.shared),
            id,
            closed: false,
        })
    }

    /// Appends an element and writes its value in one step.
    pub fn push(&mut self, v: impl Into<Value>) -> Result<&mut Self, Error> {
        {
            let mut shared = self.shared.borrow_mut();
            shared.capture(self.id)?;
            shared.ser.array_value()?;
            shared.ser.write_value(&v.into())?;
        }
        Ok(self)
    }

    /// Appends an element whose value is an already-formed JSON fragment,
    /// emitted verbatim.
    pub fn push_json(&mut self, raw: &str) -> Result<&mut Self, Error> {
        {
            let mut shared = self.shared.borrow_mut();
            shared.capture(self.id)?;
            shared.ser.array_value()?;
            shared.ser.insert(raw)?;
        }
        Ok(self)
    }
}
