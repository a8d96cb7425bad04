#![no_main]

use jsonflume::{read, ByteStream, CodePolicy, Error, ReadValue, Stream};
use libfuzzer_sys::fuzz_target;

const MAX_WALK_DEPTH: usize = 64;

/// Walk a value with a byte-driven mix of opening, partial iteration, and
/// abandonment, so the drain-on-drop paths get exercised as hard as the
/// happy path. Depth is capped; abandoned subtrees drain through drop.
fn walk<R: Stream>(
    value: ReadValue<R>,
    fuel: &mut impl Iterator<Item = u8>,
    depth: usize,
) -> Result<(), Error> {
    let step = fuel.next().unwrap_or(0);
    if value.is_arr() {
        if depth >= MAX_WALK_DEPTH || step % 4 == 0 {
            return Ok(()); // abandon unopened
        }
        let mut arr = value.arr()?;
        while let Some(item) = arr.next() {
            let item = item?;
            if fuel.next().unwrap_or(0) % 5 == 0 {
                break; // abandon mid-iteration
            }
            walk(item, fuel, depth + 1)?;
        }
    } else if value.is_obj() {
        if depth >= MAX_WALK_DEPTH || step % 4 == 0 {
            return Ok(());
        }
        let mut obj = value.obj()?;
        while let Some(entry) = obj.next() {
            let (_, item) = entry?;
            if fuel.next().unwrap_or(0) % 5 == 0 {
                break;
            }
            walk(item, fuel, depth + 1)?;
        }
    } else if value.is_str() {
        let _ = value.str()?;
    } else if value.is_real() {
        let _ = value.real()?;
    }
    Ok(())
}

fn run(data: &[u8]) {
    let Some(split) = data.first().map(|b| usize::from(*b)) else {
        return;
    };
    let rest = &data[1..];
    let split = split.min(rest.len());
    let (doc, fuel) = rest.split_at(split);

    let mut fuel = fuel.iter().copied();
    let stream = ByteStream::new(doc, CodePolicy::Replace);
    let Ok(root) = read(stream) else {
        return;
    };
    // Errors are fine; panics and desynchronized cursors are not.
    let _ = walk(root, &mut fuel, 0);
}

fuzz_target!(|data: &[u8]| run(data));
