#![no_main]

use jsonflume::{deserialize_bytes, serialize, CodePolicy};
use libfuzzer_sys::fuzz_target;

fn run(data: &[u8]) {
    if data.is_empty() {
        return;
    }

    // Split one policy byte off the front; the rest is document bytes.
    let policy = match data[0] % 3 {
        0 => CodePolicy::Replace,
        1 => CodePolicy::Skip,
        _ => CodePolicy::Fail,
    };
    let doc = &data[1..];

    // Parsing must never panic; a successful parse must re-serialize into
    // something both we and serde_json accept.
    let Ok(value) = deserialize_bytes(doc, policy) else {
        return;
    };
    let text = serialize(&value, "").expect("string sink cannot fail");
    let reparsed = deserialize_bytes(text.as_bytes(), CodePolicy::Fail)
        .expect("own output must parse");
    assert_eq!(reparsed, value);
    serde_json::from_str::<serde_json::Value>(&text).expect("serde_json accepts our output");
}

fuzz_target!(|data: &[u8]| run(data));
