use crate::{cursor::armor::encode_armor, value::Value};
use chrono::Datelike;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;

/// Fingerprint format version byte fed ahead of the argument entries.
const FINGERPRINT_VERSION: u8 = 1;

/// Stable digest of a call's named arguments.
///
/// Entries are hashed in name order with length-prefixed names and canonical
/// tag+payload value encoding, so the digest is independent of declaration
/// order and free of concatenation ambiguity. Arguments named in `transient`
/// are excluded: they are declared non-semantic and must not invalidate
/// cursors.
#[must_use]
pub fn args_fingerprint(args: &[(String, Value)], transient: &BTreeSet<String>) -> String {
    let mut ordered: Vec<&(String, Value)> = args
        .iter()
        .filter(|(name, _)| !transient.contains(name))
        .collect();
    ordered.sort_by(|left, right| left.0.cmp(&right.0));

    let mut hasher = Sha256::new();
    feed_u8(&mut hasher, FINGERPRINT_VERSION);
    feed_len(&mut hasher, ordered.len());

    for (name, value) in ordered {
        feed_len(&mut hasher, name.len());
        feed_bytes(&mut hasher, name.as_bytes());
        feed_value(&mut hasher, value);
    }

    encode_armor(&hasher.finalize())
}

fn feed_u8(h: &mut Sha256, x: u8) {
    h.update([x]);
}

fn feed_i32(h: &mut Sha256, x: i32) {
    h.update(x.to_be_bytes());
}

fn feed_i64(h: &mut Sha256, x: i64) {
    h.update(x.to_be_bytes());
}

fn feed_bytes(h: &mut Sha256, bytes: &[u8]) {
    h.update(bytes);
}

// Length prefixes are bounded by request sizes in practice.
#[expect(clippy::cast_possible_truncation)]
fn feed_len(h: &mut Sha256, len: usize) {
    h.update((len as u32).to_be_bytes());
}

fn feed_value(h: &mut Sha256, value: &Value) {
    feed_u8(h, value.canonical_tag());

    match value {
        Value::Bool(b) => feed_u8(h, u8::from(*b)),
        Value::Date(d) => feed_i32(h, d.num_days_from_ce()),
        Value::Float(f) => feed_bytes(h, &f.get().to_bits().to_be_bytes()),
        Value::Int(i) => feed_i64(h, *i),
        Value::Null => {}
        Value::Text(s) => {
            feed_len(h, s.len());
            feed_bytes(h, s.as_bytes());
        }
    }
}

///
/// TESTS
///
