//! OBJECT IDENTIFIER contents in dotted-decimal form.

use crate::{Error, ErrorKind, Result, Tag};
use alloc::{string::String, vec::Vec};
use core::fmt::Write;

const CONTINUATION: u8 = 0x80;

fn malformed() -> Error {
    ErrorKind::Value { tag: Tag::OBJECT_IDENTIFIER }.into()
}

/// Decode OBJECT IDENTIFIER contents to dotted-decimal text, e.g. `"1.2.840.113554.1.2.2"`.
pub fn decode_oid(contents: &[u8]) -> Result<String> {
    if contents.is_empty() || contents[contents.len() - 1] & CONTINUATION != 0 {
        return Err(malformed());
    }

    let mut text = String::new();
    let mut component: u64 = 0;
    let mut first = true;
    for byte in contents {
        if component > (u64::MAX >> 7) {
            return Err(ErrorKind::Overflow.into());
        }
        component = (component << 7) | u64::from(byte & !CONTINUATION);
        if byte & CONTINUATION != 0 {
            continue;
        }

        if first {
            // the first subidentifier packs the two leading arcs as arc1 * 40 + arc2
            let (arc1, arc2) = match component {
                0..=39 => (0, component),
                40..=79 => (1, component - 40),
                _ => (2, component - 80),
            };
            write!(text, "{}.{}", arc1, arc2).map_err(|_| malformed())?;
            first = false;
        } else {
            write!(text, ".{}", component).map_err(|_| malformed())?;
        }
        component = 0;
    }
    Ok(text)
}

/// Encode dotted-decimal text as OBJECT IDENTIFIER contents.
pub fn encode_oid(text: &str) -> Result<Vec<u8>> {
    let mut arcs = text.split('.').map(|arc| {
        if arc.is_empty() || !arc.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        arc.parse::<u64>().map_err(|_| Error::from(ErrorKind::Overflow))
    });

    let arc1 = arcs.next().ok_or_else(malformed)??;
    let arc2 = arcs.next().ok_or_else(malformed)??;
    if arc1 > 2 || (arc1 < 2 && arc2 > 39) {
        return Err(malformed());
    }
    let first = (arc1 * 40)
        .checked_add(arc2)
        .ok_or_else(|| Error::from(ErrorKind::Overflow))?;

    let mut contents = Vec::new();
    push_base128(&mut contents, first);
    for arc in arcs {
        push_base128(&mut contents, arc?);
    }
    Ok(contents)
}

fn push_base128(out: &mut Vec<u8>, value: u64) {
    let digits = (1..10).take_while(|i| value >> (7 * i) != 0).count() + 1;
    for i in (0..digits).rev() {
        let digit = ((value >> (7 * i)) & 0x7F) as u8;
        out.push(if i == 0 { digit } else { digit | CONTINUATION });
    }
}
