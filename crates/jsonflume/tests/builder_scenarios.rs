#![allow(missing_docs)]

use jsonflume::{build, deserialize, Error};

#[test]
fn pretty_builder_output() -> Result<(), Error> {
    let mut out = String::new();
    {
        let mut obj = build(&mut out, "  ").obj()?;
        obj.add("a", 1u64)?;
        obj.add_arr("b")?.push(true)?.push(())?;
    }
    insta::assert_snapshot!(out, @r#"
    {
      "a": 1,
      "b": [
        true,
        null
      ]
    }
    "#);
    Ok(())
}

#[test]
fn compact_builder_output() -> Result<(), Error> {
    let mut out = String::new();
    {
        let mut obj = build(&mut out, "").obj()?;
        obj.add("a", 1u64)?;
        obj.add_arr("b")?.push(true)?.push(())?;
    }
    insta::assert_snapshot!(out, @r#"{"a":1,"b":[true,null]}"#);
    Ok(())
}

#[test]
fn abandoned_member_becomes_null() -> Result<(), Error> {
    let mut out = String::new();
    let mut obj = build(&mut out, "").obj()?;
    drop(obj.add_val("x")?);
    obj.close()?;
    insta::assert_snapshot!(out, @r#"{"x":null}"#);
    Ok(())
}

#[test]
fn out_of_order_close_finishes_inner_first() -> Result<(), Error> {
    let mut out = String::new();
    {
        let mut obj = build(&mut out, "").obj()?;
        let inner = obj.add_obj("p")?;
        obj.add("q", 1u64)?;
        drop(inner);
        obj.close()?;
    }
    insta::assert_snapshot!(out, @r#"{"p":{},"q":1}"#);
    Ok(())
}

#[test]
fn tab_indent_pretty_output() -> Result<(), Error> {
    let mut out = String::new();
    {
        let mut arr = build(&mut out, "\t").arr()?;
        arr.push(1u64)?;
        let mut obj = arr.push_obj()?;
        obj.add("empty_arr", jsonflume::Value::Array(Vec::new()))?;
    }
    assert_eq!(out, "[\n\t1,\n\t{\n\t\t\"empty_arr\": []\n\t}\n]");
    Ok(())
}

#[test]
fn empty_composites_have_no_inner_whitespace_in_pretty_mode() -> Result<(), Error> {
    let mut out = String::new();
    {
        let mut obj = build(&mut out, "    ").obj()?;
        obj.add_obj("o")?.close()?;
        obj.add_arr("a")?.close()?;
    }
    assert!(out.contains("{}"));
    assert!(out.contains("[]"));
    deserialize(&out)?;
    Ok(())
}

#[test]
fn builder_output_always_parses_back() -> Result<(), Error> {
    let mut out = String::new();
    {
        let mut obj = build(&mut out, " ").obj()?;
        let pending = obj.add_val("dangling")?;
        let mut nested = obj.add_arr("xs")?;
        nested.push_obj()?.add("deep", -1)?;
        drop(nested);
        drop(pending);
        obj.add("tail", "end")?;
    }
    // Both our parser and serde_json must accept whatever the trace
    // produced.
    let ours = deserialize(&out)?;
    let theirs: serde_json::Value = serde_json::from_str(&out).expect("serde_json accepts");
    assert_eq!(ours.get("dangling")?.is_null(), theirs["dangling"].is_null());
    assert!(ours.get("xs")?.is_arr());
    Ok(())
}
