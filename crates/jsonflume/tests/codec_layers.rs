#![allow(missing_docs)]

//! Cross-layer pipelines: documents produced by the builder flow through
//! the reader, the view, the DOM, and pointer resolution.

use jsonflume::{
    build, deserialize, pointer, read, resolve, resolve_view, serialize, view_str, Error, Kind,
    Step, StrStream, Value,
};

fn sample_document() -> Result<String, Error> {
    let mut out = String::new();
    let mut obj = build(&mut out, "").obj()?;
    obj.add("name", "fixture")?;
    let mut xs = obj.add_arr("xs")?;
    xs.push(10u64)?.push(-20)?.push(2.5)?;
    drop(xs);
    let mut nested = obj.add_obj("nested")?;
    nested.add("b/c", vec![Value::from(true), Value::Null].into_iter().collect::<Value>())?;
    drop(nested);
    obj.close()?;
    Ok(out)
}

#[test]
fn built_documents_read_back_through_the_reader() -> Result<(), Error> {
    let text = sample_document()?;
    let root = read(StrStream::new(&text))?;
    let mut obj = root.obj()?;

    let (key, name) = obj.next().unwrap()?;
    assert_eq!(key, "name");
    assert_eq!(name.str()?, "fixture");

    let (key, xs) = obj.next().unwrap()?;
    assert_eq!(key, "xs");
    let kinds: Vec<Kind> = xs
        .arr()?
        .map(|item| item.map(|v| v.kind()))
        .collect::<Result<_, _>>()?;
    assert_eq!(kinds, [Kind::Uint, Kind::Int, Kind::Real]);

    // Dropping the remaining handles drains "nested" silently.
    Ok(())
}

#[test]
fn built_documents_view_back() -> Result<(), Error> {
    let text = sample_document()?;
    let v = view_str(&text)?;
    assert_eq!(v.get("name")?.str()?, "fixture");
    assert_eq!(v.get("xs")?.at(0)?.unum()?, 10);
    assert_eq!(v.get("xs")?.at(1)?.inum()?, -20);
    assert_eq!(v.get("xs")?.at(2)?.real()?, 2.5);
    assert!(v.get("nested")?.contains("b/c"));
    Ok(())
}

#[test]
fn pointers_resolve_across_dom_and_view() -> Result<(), Error> {
    let text = sample_document()?;
    let path = pointer(vec![Step::from("nested"), Step::from("b/c"), Step::from(0usize)]);
    assert_eq!(path, "/nested/b~1c/0");

    let dom = deserialize(&text)?;
    assert_eq!(resolve(&dom, &path), Some(&Value::Boolean(true)));

    let v = view_str(&text)?;
    assert!(resolve_view(&v, &path).unwrap().boolean()?);
    assert!(resolve_view(&v, "/nested/missing").is_none());
    Ok(())
}

#[test]
fn dom_edits_serialize_back() -> Result<(), Error> {
    let mut dom = deserialize(&sample_document()?)?;
    *dom.get_mut("name") = Value::from("edited");
    dom.get_mut("xs").push(99u64);
    dom.erase("nested");

    let text = serialize(&dom, "")?;
    let reparsed = deserialize(&text)?;
    assert_eq!(reparsed.get("name")?.str()?, "edited");
    assert_eq!(reparsed.get("xs")?.len(), 4);
    assert!(!reparsed.contains("nested"));
    Ok(())
}

#[test]
fn reader_view_and_dom_agree_on_escapes() -> Result<(), Error> {
    let text = r#"{"s": "aA𐍈\n\t\""}"#;
    let expected = "aA\u{10348}\n\t\"";

    assert_eq!(deserialize(text)?.get("s")?.str()?, expected);
    assert_eq!(view_str(text)?.get("s")?.str()?, expected);

    let root = read(StrStream::new(text))?;
    let mut obj = root.obj()?;
    let (_, s) = obj.next().unwrap()?;
    assert_eq!(s.str()?, expected);
    Ok(())
}

#[test]
fn deep_documents_flow_through_every_layer() -> Result<(), Error> {
    let depth = 1000;
    let mut text = String::new();
    for _ in 0..depth {
        text.push('[');
    }
    text.push_str("\"leaf\"");
    for _ in 0..depth {
        text.push(']');
    }

    // Reader: iterative stepping, no recursion in the protocol itself.
    let mut readers = Vec::new();
    let mut value = read(StrStream::new(&text))?;
    for _ in 0..depth {
        let mut arr = value.arr()?;
        value = arr.next().unwrap()?;
        readers.push(arr);
    }
    assert_eq!(value.str()?, "leaf");
    drop(readers);
    Ok(())
}
