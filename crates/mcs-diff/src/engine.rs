//! The comparison engine.
//!
//! Each document is scanned against the other, then the two one-directional
//! listings are merged so that every mismatch is reported once. Nested
//! documents produce a [`SubDifference`] during the scan even when they turn
//! out identical; those empty entries are pruned while merging.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::diff::{DiffEntry, DiffResult, Difference, SubDifference};
use crate::document::{Document, Value};
use crate::error::Result;

/// Compare two documents and return every key where they disagree.
///
/// `left` values in the result come from `a`, `right` values from `b`.
pub fn compare(a: &Document, b: &Document) -> DiffResult {
    if a == b {
        return DiffResult::new();
    }

    let forward = scan(a, b, Direction::Forward);
    let reverse = scan(b, a, Direction::Reverse);
    trace!(
        forward = forward.len(),
        reverse = reverse.len(),
        "scanned both directions"
    );

    let entries = merge(forward, reverse);
    debug!(entries = entries.len(), "documents differ");
    DiffResult::from(entries)
}

/// Compare two JSON values, both of which must be objects.
pub fn compare_json(a: &serde_json::Value, b: &serde_json::Value) -> Result<DiffResult> {
    let a = Document::from_json(a.clone())?;
    let b = Document::from_json(b.clone())?;
    Ok(compare(&a, &b))
}

/// Which document a scan walks over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    /// Walking `a`, looking values up in `b`.
    Forward,
    /// Walking `b`, looking values up in `a`.
    Reverse,
}

impl Direction {
    /// Build a difference from the walked (`primary`) and looked-up
    /// (`other`) values, placing each on its document's side.
    fn difference(self, key: &str, primary: Option<&Value>, other: Option<&Value>) -> Difference {
        match self {
            Direction::Forward => Difference {
                key: key.to_string(),
                left: primary.cloned(),
                right: other.cloned(),
            },
            Direction::Reverse => Difference {
                key: key.to_string(),
                left: other.cloned(),
                right: primary.cloned(),
            },
        }
    }
}

fn scan(primary: &Document, other: &Document, direction: Direction) -> Vec<DiffEntry> {
    let mut entries = Vec::new();

    for (key, value) in primary.iter() {
        let Some(other_value) = other.get(key) else {
            entries.push(direction.difference(key, Some(value), None).into());
            continue;
        };

        match (value, other_value) {
            (Value::Document(nested), Value::Document(other_nested)) => {
                entries.push(
                    SubDifference {
                        key: key.clone(),
                        children: scan(nested, other_nested, direction),
                    }
                    .into(),
                );
            }
            _ if value != other_value => {
                entries.push(direction.difference(key, Some(value), Some(other_value)).into());
            }
            _ => {}
        }
    }

    entries
}

/// Fold the reverse listing into the forward one.
///
/// A key reported by both directions is kept once, from the forward side,
/// except that two sub-differences for the same key are merged child-wise.
/// Reverse entries with no forward counterpart are appended in order.
fn merge(forward: Vec<DiffEntry>, mut reverse: Vec<DiffEntry>) -> Vec<DiffEntry> {
    let index: HashMap<String, usize> = reverse
        .iter()
        .enumerate()
        .map(|(i, e)| (e.key().to_string(), i))
        .collect();
    let mut consumed = HashSet::new();
    let mut merged = Vec::with_capacity(forward.len());

    for entry in forward {
        let Some(&ri) = index.get(entry.key()) else {
            merged.extend(prune(entry));
            continue;
        };
        consumed.insert(ri);

        match (entry, &mut reverse[ri]) {
            (DiffEntry::SubDifference(fwd), DiffEntry::SubDifference(rev)) => {
                let children = merge(fwd.children, std::mem::take(&mut rev.children));
                if children.is_empty() {
                    trace!(key = %fwd.key, "nested documents identical");
                    continue;
                }
                merged.push(SubDifference { key: fwd.key, children }.into());
            }
            (entry, _) => merged.extend(prune(entry)),
        }
    }

    for (i, entry) in reverse.into_iter().enumerate() {
        if !consumed.contains(&i) {
            merged.extend(prune(entry));
        }
    }

    merged
}

/// Drop sub-differences that carry no leaf mismatch.
fn prune(entry: DiffEntry) -> Option<DiffEntry> {
    match entry {
        DiffEntry::Difference(_) => Some(entry),
        DiffEntry::SubDifference(sub) => {
            let children: Vec<DiffEntry> = sub.children.into_iter().filter_map(prune).collect();
            if children.is_empty() {
                None
            } else {
                Some(SubDifference { key: sub.key, children }.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        Document::from_json(value).unwrap()
    }

    fn diff(a: serde_json::Value, b: serde_json::Value) -> DiffResult {
        compare(&doc(a), &doc(b))
    }

    fn leaf(key: &str, left: Option<serde_json::Value>, right: Option<serde_json::Value>) -> DiffEntry {
        Difference {
            key: key.into(),
            left: left.map(Value::from),
            right: right.map(Value::from),
        }
        .into()
    }

    fn sub(key: &str, children: Vec<DiffEntry>) -> DiffEntry {
        SubDifference {
            key: key.into(),
            children,
        }
        .into()
    }

    #[test]
    fn identical_documents_no_diff() {
        assert!(diff(json!({}), json!({})).is_empty());

        let status = json!({
            "players": {"online": 5, "max": 20, "sample": [{"name": "Notch"}]},
            "version": {"name": "1.20", "protocol": 763},
            "motd": "A Minecraft Server",
        });
        assert!(diff(status.clone(), status).is_empty());
    }

    #[test]
    fn deeply_nested_identical_documents_no_diff() {
        let deep = json!({"a": {"b": {"c": {"d": {"e": 1}}}}});
        assert!(diff(deep.clone(), deep).is_empty());
    }

    #[test]
    fn single_scalar_mismatch_reported_once() {
        let result = diff(json!({"motd": "hello", "online": 1}), json!({"motd": "bye", "online": 1}));
        assert_eq!(result.entries, vec![leaf("motd", Some(json!("hello")), Some(json!("bye")))]);
    }

    #[test]
    fn key_missing_from_right() {
        let result = diff(json!({"motd": "hello", "online": 1}), json!({"online": 1}));
        assert_eq!(result.entries, vec![leaf("motd", Some(json!("hello")), None)]);
    }

    #[test]
    fn key_missing_from_left() {
        let result = diff(json!({"online": 1}), json!({"online": 1, "forge_data": null}));
        assert_eq!(result.entries, vec![leaf("forge_data", None, Some(json!(null)))]);
    }

    #[test]
    fn null_value_differs_from_absent_key() {
        let result = diff(json!({"sample": null}), json!({}));
        let d = result.get("sample").and_then(DiffEntry::as_difference).unwrap();
        assert_eq!(d.left, Some(Value::Null));
        assert_eq!(d.right, None);
    }

    #[test]
    fn nested_recursion() {
        let result = diff(json!({"a": {"x": 1, "y": 2}}), json!({"a": {"x": 1, "y": 3}}));
        assert_eq!(
            result.entries,
            vec![sub("a", vec![leaf("y", Some(json!(2)), Some(json!(3)))])]
        );
    }

    #[test]
    fn identical_nested_documents_produce_no_sub_difference() {
        assert!(diff(json!({"a": {"x": 1}}), json!({"a": {"x": 1}})).is_empty());

        // Only the sibling differs; the identical nested pair must not show up.
        let result = diff(json!({"a": {"x": 1}, "b": 1}), json!({"a": {"x": 1}, "b": 2}));
        assert_eq!(result.entries, vec![leaf("b", Some(json!(1)), Some(json!(2)))]);
    }

    #[test]
    fn empty_nested_documents_are_identical() {
        assert!(diff(json!({"a": {}}), json!({"a": {}})).is_empty());
        let result = diff(json!({"a": {}, "b": 1}), json!({"a": {}, "b": 2}));
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn nested_keys_found_only_in_reverse_direction_are_merged() {
        let result = diff(
            json!({"players": {"online": 5}}),
            json!({"players": {"online": 5, "max": 20}}),
        );
        assert_eq!(
            result.entries,
            vec![sub("players", vec![leaf("max", None, Some(json!(20)))])]
        );
    }

    #[test]
    fn nested_asymmetric_keys_from_both_directions() {
        let result = diff(
            json!({"raw": {"a": 1, "shared": {"x": 1, "only_left": true}}}),
            json!({"raw": {"b": 2, "shared": {"x": 2, "only_right": false}}}),
        );
        assert_eq!(
            result.entries,
            vec![sub(
                "raw",
                vec![
                    leaf("a", Some(json!(1)), None),
                    sub(
                        "shared",
                        vec![
                            leaf("only_left", Some(json!(true)), None),
                            leaf("x", Some(json!(1)), Some(json!(2))),
                            leaf("only_right", None, Some(json!(false))),
                        ]
                    ),
                    leaf("b", None, Some(json!(2))),
                ]
            )]
        );
    }

    #[test]
    fn nested_document_present_only_on_one_side() {
        let result = diff(json!({"online": 1}), json!({"online": 1, "forge": {"mods": []}}));
        assert_eq!(
            result.entries,
            vec![leaf("forge", None, Some(json!({"mods": []})))]
        );
    }

    #[test]
    fn document_versus_scalar_is_a_leaf_difference() {
        let result = diff(json!({"motd": {"text": "hi"}}), json!({"motd": "hi"}));
        assert_eq!(
            result.entries,
            vec![leaf("motd", Some(json!({"text": "hi"})), Some(json!("hi")))]
        );
    }

    #[test]
    fn integer_beyond_float_precision_is_reported() {
        let result = diff(json!({"n": 9007199254740993_u64}), json!({"n": 9007199254740992.0}));
        assert_eq!(
            result.entries,
            vec![leaf("n", Some(json!(9007199254740993_u64)), Some(json!(9007199254740992.0)))]
        );
        assert!(diff(json!({"n": 25565}), json!({"n": 25565.0})).is_empty());
    }

    #[test]
    fn lists_are_compared_whole() {
        let result = diff(
            json!({"sample": [{"name": "a"}, {"name": "b"}]}),
            json!({"sample": [{"name": "a"}, {"name": "c"}]}),
        );
        assert_eq!(result.len(), 1);
        assert!(result.get("sample").unwrap().as_difference().is_some());
    }

    #[test]
    fn swapping_inputs_swaps_sides() {
        let a = json!({"online": 1, "motd": "x", "version": {"protocol": 763}});
        let b = json!({"online": 2, "version": {"protocol": 765, "name": "1.20"}});

        let ab = diff(a.clone(), b.clone());
        let ba = diff(b, a);

        let online_ab = ab.get("online").and_then(DiffEntry::as_difference).unwrap();
        let online_ba = ba.get("online").and_then(DiffEntry::as_difference).unwrap();
        assert_eq!(online_ab.left, online_ba.right);
        assert_eq!(online_ab.right, online_ba.left);

        assert_eq!(ab.leaf_count(), ba.leaf_count());
    }

    #[test]
    fn key_order_does_not_affect_detection() {
        let a: serde_json::Value =
            serde_json::from_str(r#"{"b": 1, "a": {"y": 2, "x": 1}}"#).unwrap();
        let b: serde_json::Value =
            serde_json::from_str(r#"{"a": {"x": 1, "y": 2}, "b": 1}"#).unwrap();
        assert!(compare_json(&a, &b).unwrap().is_empty());

        let c: serde_json::Value =
            serde_json::from_str(r#"{"a": {"x": 1, "y": 3}, "b": 1}"#).unwrap();
        assert_eq!(compare_json(&a, &c).unwrap().leaf_count(), 1);
    }

    #[test]
    fn end_to_end_status_comparison() {
        let expected = json!({
            "version": {"name": "1.20", "protocol": 763},
            "players": {"online": 5, "max": 20},
        });
        let actual = json!({
            "version": {"name": "1.20", "protocol": 765},
            "players": {"online": 5, "max": 20},
        });

        let result = compare_json(&expected, &actual).unwrap();
        assert_eq!(
            result.entries,
            vec![sub(
                "version",
                vec![leaf("protocol", Some(json!(763)), Some(json!(765)))]
            )]
        );
    }

    #[test]
    fn compare_json_rejects_non_objects() {
        assert!(compare_json(&json!([]), &json!({})).is_err());
        assert!(compare_json(&json!({}), &json!("status")).is_err());
    }

    fn arb_json() -> impl Strategy<Value = serde_json::Value> {
        let leaf = prop_oneof![
            Just(serde_json::Value::Null),
            any::<bool>().prop_map(serde_json::Value::from),
            (-3i64..3).prop_map(serde_json::Value::from),
            "[a-c]{0,2}".prop_map(serde_json::Value::from),
        ];
        leaf.prop_recursive(3, 32, 4, |inner| {
            prop::collection::btree_map("[a-d]", inner, 0..4)
                .prop_map(|m| serde_json::Value::Object(m.into_iter().collect()))
        })
    }

    fn arb_document() -> impl Strategy<Value = Document> {
        prop::collection::btree_map("[a-d]", arb_json(), 0..5)
            .prop_map(|m| doc(serde_json::Value::Object(m.into_iter().collect())))
    }

    type Leaf = (String, Option<serde_json::Value>, Option<serde_json::Value>);

    fn leaves(result: &DiffResult, swap: bool) -> Vec<Leaf> {
        let mut out: Vec<Leaf> = result
            .flatten()
            .into_iter()
            .map(|(path, d)| {
                let left = d.left.as_ref().map(Value::to_json);
                let right = d.right.as_ref().map(Value::to_json);
                if swap {
                    (path, right, left)
                } else {
                    (path, left, right)
                }
            })
            .collect();
        out.sort_by(|x, y| x.0.cmp(&y.0));
        out
    }

    proptest! {
        #[test]
        fn comparing_a_document_with_itself_is_empty(x in arb_document()) {
            prop_assert!(compare(&x, &x).is_empty());
        }

        #[test]
        fn differing_documents_report_mirrored_leaves(x in arb_document(), y in arb_document()) {
            prop_assume!(x != y);
            let xy = compare(&x, &y);
            let yx = compare(&y, &x);

            prop_assert!(!xy.is_empty());
            prop_assert!(!yx.is_empty());
            prop_assert_eq!(leaves(&xy, false), leaves(&yx, true));
        }

        #[test]
        fn every_path_is_reported_once(x in arb_document(), y in arb_document()) {
            let result = compare(&x, &y);
            let mut paths: Vec<String> = result.flatten().into_iter().map(|(p, _)| p).collect();
            let total = paths.len();
            paths.sort();
            paths.dedup();
            prop_assert_eq!(paths.len(), total);
        }
    }
}
