//! Generic recursive structural merge over JSON values.
//!
//! This is the leaf operation every higher-level merger builds on. The rules
//! are deliberately small:
//!
//! - a key present only in `source` is added
//! - a key present in both, where both values are objects, is merged
//!   recursively
//! - any other conflict is resolved by `source` overwriting `target`
//!
//! Arrays are atomic values: `source` replaces `target` wholesale, never
//! concatenated. That is a deliberate simplification, not a general merge
//! algebra.

use serde_json::Value;

/// Merge `source` into `target`, producing a new value.
///
/// Pure (neither input is mutated) and total (no error path) over any pair
/// of JSON values. Non-object targets are simply replaced by `source`.
pub fn deep_merge(target: &Value, source: &Value) -> Value {
    match (target, source) {
        (Value::Object(t), Value::Object(s)) => {
            let mut out = t.clone();
            for (key, src_val) in s {
                let merged = match t.get(key) {
                    Some(existing) if existing.is_object() && src_val.is_object() => {
                        deep_merge(existing, src_val)
                    }
                    _ => src_val.clone(),
                };
                out.insert(key.clone(), merged);
            }
            Value::Object(out)
        }
        _ => source.clone(),
    }
}
