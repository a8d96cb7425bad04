//! A streaming JSON codec built around two stateful interaction models: a
//! [`builder`](crate::build) that emits a document through short-lived write
//! handles, and a [`reader`](crate::read) that consumes a document through
//! short-lived parse handles sharing a single cursor. Both sit on a common
//! token-level [`Serializer`]/[`Deserializer`] substrate, alongside an owning
//! DOM [`Value`], an arena-backed immutable [`Viewer`], and RFC 6901
//! [`pointer`] resolution.

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod api;
mod builder;
mod deserializer;
mod error;
mod pointer;
mod reader;
mod serializer;
mod sink;
mod stream;
mod value;
mod view;

pub use api::{
    build, build_any, deserialize, deserialize_bytes, deserialize_stream, read, read_any,
    read_bytes, serialize, serialize_to, view, view_bytes, view_str, AnyBuildValue, AnyReadValue,
};
pub use builder::{BuildArray, BuildObject, BuildValue};
pub use deserializer::{Deserializer, Number};
pub use error::Error;
pub use pointer::{append_pointer, pointer, resolve, resolve_view, Step};
pub use reader::{ArrReader, ObjReader, ReadValue};
pub use serializer::Serializer;
pub use sink::{AnySink, Sink};
pub use stream::{AnyStream, ByteStream, CodePolicy, StrStream, Stream};
pub use value::{Array, Kind, Map, Value};
pub use view::{ArrViewer, ArrViewerIter, ObjViewer, ObjViewerIter, Viewer};
