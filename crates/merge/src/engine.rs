//! Recursive merge engine
//!
//! [`apply`] patches a target field mapping with a sparse patch mapping.
//! Patch values are one of three things:
//!
//! - **Literals** — primitives and arrays replace the target value outright;
//!   a plain object merges recursively into an existing object.
//! - **Operation markers** — a single-key object whose key starts with the
//!   sigil (`{"$push": 3}`) resolves against the operator registry and is
//!   applied to the current value at the same key.
//! - Anything else inserts as a literal.
//!
//! Keys present in the target but absent from the patch are untouched.
//!
//! ## Merge result policy
//!
//! Applying an operator yields the operator's nominal return value. When that
//! value is array-shaped it becomes the merged value; otherwise the operator
//! mutated its container and the container stands. This is what keeps
//! `{"tags": {"$pop": []}}` from replacing a tag list with the popped
//! element. The rule is shape-based: popping an element that is itself an
//! array replaces the slot with that element.

use crate::operator::{Operator, SIGIL};
use docop_core::{Error, Fields, Result, MAX_NESTING_DEPTH};
use serde_json::Value;

/// Apply a patch to a target field mapping, mutating the target
///
/// # Errors
///
/// Unknown operator names, operators aimed at absent keys or non-array
/// values, bad operator arguments, and patches nested beyond
/// [`MAX_NESTING_DEPTH`] are all rejected; the target may have been partially
/// mutated when an error is returned mid-patch.
pub fn apply(target: &mut Fields, patch: &Fields) -> Result<()> {
    apply_at_depth(target, patch, 0)
}

fn apply_at_depth(target: &mut Fields, patch: &Fields, depth: usize) -> Result<()> {
    if depth >= MAX_NESTING_DEPTH {
        return Err(Error::PatchTooDeep {
            depth,
            max: MAX_NESTING_DEPTH,
        });
    }

    for (key, value) in patch {
        match value {
            Value::Object(map) => {
                if let Some(marker) = marker_key(map) {
                    apply_marker(target, key, marker, &map[marker])?;
                    continue;
                }
                // Existing object: recurse. Anything else: literal replacement.
                if let Some(Value::Object(existing)) = target.get_mut(key) {
                    apply_at_depth(existing, map, depth + 1)?;
                    continue;
                }
                target.insert(key.clone(), value.clone());
            }
            // Arrays and primitives are direct replacements
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }

    Ok(())
}

/// Recognize an operation marker: the sole key of its object, starting with
/// the sigil. A sigil key sharing the object with other keys is not a marker.
fn marker_key(map: &Fields) -> Option<&str> {
    if map.len() != 1 {
        return None;
    }
    let key = map.keys().next()?;
    key.starts_with(SIGIL).then_some(key.as_str())
}

fn apply_marker(target: &mut Fields, key: &str, marker: &str, payload: &Value) -> Result<()> {
    let name = &marker[SIGIL.len_utf8()..];
    let op = Operator::parse(name).ok_or_else(|| Error::UnknownOperator(name.to_string()))?;

    // Array payload spreads as positional arguments; anything else is one
    let args: Vec<Value> = match payload {
        Value::Array(items) => items.clone(),
        other => vec![other.clone()],
    };

    let ret = match target.get_mut(key) {
        Some(Value::Array(items)) => op.apply(items, &args)?,
        Some(other) => {
            return Err(Error::OperatorTargetMismatch {
                operator: op.name(),
                key: key.to_string(),
                actual: type_name(other),
            })
        }
        None => {
            return Err(Error::OperatorTargetMissing {
                operator: op.name(),
                key: key.to_string(),
            })
        }
    };

    if ret.is_array() {
        target.insert(key.to_string(), ret);
    }
    Ok(())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    fn merged(target: serde_json::Value, patch: serde_json::Value) -> Fields {
        let mut target = fields(target);
        apply(&mut target, &fields(patch)).unwrap();
        target
    }

    // === Literal Merges ===

    #[test]
    fn test_primitive_replacement() {
        let result = merged(json!({"a": 1, "b": 2}), json!({"a": 9}));
        assert_eq!(result, fields(json!({"a": 9, "b": 2})));
    }

    #[test]
    fn test_absent_key_is_inserted() {
        let result = merged(json!({"a": 1}), json!({"b": true, "c": null}));
        assert_eq!(result, fields(json!({"a": 1, "b": true, "c": null})));
    }

    #[test]
    fn test_array_patch_value_replaces_outright() {
        let result = merged(json!({"tags": [1, 2, 3]}), json!({"tags": [9]}));
        assert_eq!(result, fields(json!({"tags": [9]})));
    }

    #[test]
    fn test_nested_object_merges_recursively() {
        let result = merged(json!({"a": {"b": 1, "c": 2}}), json!({"a": {"b": 5}}));
        assert_eq!(result, fields(json!({"a": {"b": 5, "c": 2}})));
    }

    #[test]
    fn test_object_replaces_scalar() {
        let result = merged(json!({"a": 1}), json!({"a": {"b": 2}}));
        assert_eq!(result, fields(json!({"a": {"b": 2}})));
    }

    #[test]
    fn test_object_replaces_null() {
        // null is not an object; no recursion into it
        let result = merged(json!({"a": null}), json!({"a": {"b": 2}}));
        assert_eq!(result, fields(json!({"a": {"b": 2}})));
    }

    #[test]
    fn test_untouched_keys_survive() {
        let result = merged(
            json!({"keep": {"x": 1}, "change": 1}),
            json!({"change": 2}),
        );
        assert_eq!(result, fields(json!({"keep": {"x": 1}, "change": 2})));
    }

    #[test]
    fn test_empty_patch_is_a_no_op() {
        let result = merged(json!({"a": 1}), json!({}));
        assert_eq!(result, fields(json!({"a": 1})));
    }

    // === Operator Merges ===

    #[test]
    fn test_push_operator() {
        let result = merged(json!({"tags": [1, 2]}), json!({"tags": {"$push": 3}}));
        assert_eq!(result, fields(json!({"tags": [1, 2, 3]})));
    }

    #[test]
    fn test_pop_keeps_the_container() {
        // pop returns the removed scalar; the mutated container sticks
        let result = merged(json!({"tags": [1, 2, 3]}), json!({"tags": {"$pop": []}}));
        assert_eq!(result, fields(json!({"tags": [1, 2]})));
    }

    #[test]
    fn test_concat_replaces_with_result() {
        let result = merged(
            json!({"arr": [1, 2, 3]}),
            json!({"arr": {"$concat": [4, 5]}}),
        );
        assert_eq!(result, fields(json!({"arr": [1, 2, 3, 4, 5]})));
    }

    #[test]
    fn test_operator_in_nested_object() {
        let result = merged(
            json!({"a": {"tags": ["x"]}}),
            json!({"a": {"tags": {"$push": "y"}}}),
        );
        assert_eq!(result, fields(json!({"a": {"tags": ["x", "y"]}})));
    }

    #[test]
    fn test_popped_array_element_replaces_the_slot() {
        // Shape-based policy: the removed element is itself an array
        let result = merged(json!({"rows": [[1], [2]]}), json!({"rows": {"$pop": []}}));
        assert_eq!(result, fields(json!({"rows": [2]})));
    }

    // === Marker Recognition ===

    #[test]
    fn test_sigil_key_among_others_is_not_a_marker() {
        // Two keys: literal object, replaces the scalar target
        let result = merged(json!({"a": 1}), json!({"a": {"$push": 3, "x": 1}}));
        assert_eq!(result, fields(json!({"a": {"$push": 3, "x": 1}})));
    }

    #[test]
    fn test_sigil_key_among_others_merges_into_object() {
        let result = merged(json!({"a": {"x": 0}}), json!({"a": {"$lit": 1, "x": 2}}));
        assert_eq!(result, fields(json!({"a": {"$lit": 1, "x": 2}})));
    }

    #[test]
    fn test_empty_object_patch_value() {
        // No sole key, no marker: merges into an object, replaces a scalar
        assert_eq!(
            merged(json!({"a": {"x": 1}}), json!({"a": {}})),
            fields(json!({"a": {"x": 1}}))
        );
        assert_eq!(merged(json!({"a": 5}), json!({"a": {}})), fields(json!({"a": {}})));
    }

    // === Rejections ===

    #[test]
    fn test_unknown_operator_is_rejected() {
        let mut target = fields(json!({"tags": [1]}));
        let err = apply(&mut target, &fields(json!({"tags": {"$frobnicate": 1}}))).unwrap_err();
        assert!(matches!(err, Error::UnknownOperator(name) if name == "frobnicate"));
    }

    #[test]
    fn test_operator_on_scalar_is_rejected() {
        let mut target = fields(json!({"tags": "not-an-array"}));
        let err = apply(&mut target, &fields(json!({"tags": {"$push": 3}}))).unwrap_err();
        assert!(matches!(
            err,
            Error::OperatorTargetMismatch {
                operator: "push",
                actual: "string",
                ..
            }
        ));
    }

    #[test]
    fn test_operator_on_absent_key_is_rejected() {
        let mut target = fields(json!({}));
        let err = apply(&mut target, &fields(json!({"tags": {"$push": 3}}))).unwrap_err();
        assert!(matches!(
            err,
            Error::OperatorTargetMissing { operator: "push", .. }
        ));
    }

    #[test]
    fn test_patch_nested_beyond_limit_is_rejected() {
        // Patch and target both nested past the limit, so recursion runs
        // until the depth guard fires
        let mut patch = json!({"leaf": 1});
        let mut deep_target = json!({"leaf": 0});
        for _ in 0..MAX_NESTING_DEPTH + 1 {
            patch = json!({"inner": patch});
            deep_target = json!({"inner": deep_target});
        }
        let mut target = fields(deep_target);
        let err = apply(&mut target, &fields(patch)).unwrap_err();
        assert!(matches!(err, Error::PatchTooDeep { .. }));
    }

    // === Idempotence ===

    #[test]
    fn test_literal_merge_is_idempotent() {
        let patch = fields(json!({"a": {"b": 5}, "c": [1, 2], "d": "x"}));
        let mut once = fields(json!({"a": {"b": 1, "keep": true}, "c": [9]}));
        apply(&mut once, &patch).unwrap();
        let mut twice = once.clone();
        apply(&mut twice, &patch).unwrap();
        assert_eq!(once, twice);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn literal_value() -> impl Strategy<Value = Value> {
            prop_oneof![
                Just(Value::Null),
                any::<bool>().prop_map(Value::from),
                any::<i64>().prop_map(Value::from),
                "[a-z]{0,12}".prop_map(Value::from),
                prop::collection::vec(any::<i64>(), 0..4).prop_map(Value::from),
            ]
        }

        fn literal_fields() -> impl Strategy<Value = Fields> {
            prop::collection::btree_map("[a-z]{1,6}", literal_value(), 0..6)
                .prop_map(|map| map.into_iter().collect())
        }

        fn literal_patch() -> impl Strategy<Value = Fields> {
            prop::collection::btree_map(
                "[a-z]{1,6}",
                prop_oneof![
                    literal_value(),
                    prop::collection::btree_map("[a-z]{1,6}", literal_value(), 0..4)
                        .prop_map(|map| Value::Object(map.into_iter().collect())),
                ],
                0..6,
            )
            .prop_map(|map| map.into_iter().collect())
        }

        proptest! {
            /// Merging a literal-only patch twice produces the same result
            /// as merging it once.
            #[test]
            fn merge_of_literal_patch_is_idempotent(
                target in literal_fields(),
                patch in literal_patch(),
            ) {
                let mut once = target.clone();
                apply(&mut once, &patch).unwrap();
                let mut twice = once.clone();
                apply(&mut twice, &patch).unwrap();
                prop_assert_eq!(once, twice);
            }

            /// Keys absent from the patch are never touched.
            #[test]
            fn merge_preserves_unpatched_keys(
                target in literal_fields(),
                patch in literal_patch(),
            ) {
                let mut merged = target.clone();
                apply(&mut merged, &patch).unwrap();
                for (key, value) in &target {
                    if !patch.contains_key(key) {
                        prop_assert_eq!(merged.get(key), Some(value));
                    }
                }
            }
        }
    }
}
