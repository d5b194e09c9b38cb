//! Deep merge of nested mappings.

use serde_yaml::{Mapping, Value};

/// Merge `overlay` into `base`, returning the combined mapping.
///
/// Keys present in both sides merge recursively when both values are
/// mappings; otherwise the overlay value wins, sequences included (no
/// element-wise merge). Existing keys keep their position, new keys are
/// appended in overlay order.
pub fn deep_merge(mut base: Mapping, overlay: Mapping) -> Mapping {
    for (key, incoming) in overlay {
        let merged = match (base.get_mut(&key), incoming) {
            (Some(Value::Mapping(existing)), Value::Mapping(incoming)) => {
                Value::Mapping(deep_merge(std::mem::take(existing), incoming))
            }
            (_, incoming) => incoming,
        };
        base.insert(key, merged);
    }
    base
}
