//! Array and object traversal helpers.
//!
//! Records are `serde_json::Value` graphs addressed by deep paths: `.`
//! separated keys, where a segment applied to an array is read as a decimal
//! index. There is no escaping, so keys containing `.` are unreachable.

use std::cmp::Ordering;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::PathError;
use crate::value::{loose_eq, strict_eq, to_display_string, to_number};

// =============================================================================
// Deep Paths
// =============================================================================

fn child<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn child_mut<'a>(value: &'a mut Value, key: &str) -> Option<&'a mut Value> {
    match value {
        Value::Object(map) => map.get_mut(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get_mut(i)),
        _ => None,
    }
}

/// Resolve a deep path.
///
/// Returns `None` as soon as any segment is missing; depth is unbounded.
pub fn deep_get<'a>(obj: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(obj, child)
}

/// Mutable counterpart of [`deep_get`].
pub fn deep_get_mut<'a>(obj: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    let mut current = obj;
    for key in path.split('.') {
        current = child_mut(current, key)?;
    }
    Some(current)
}

/// Write `value` at a deep path, in place.
///
/// Every intermediate segment must already exist; only the last one is
/// created. On arrays the last segment may address an existing slot or
/// the slot right past the end.
pub fn deep_set(obj: &mut Value, path: &str, value: Value) -> Result<(), PathError> {
    let (parents, last) = match path.rsplit_once('.') {
        Some((parents, last)) => (Some(parents), last),
        None => (None, path),
    };

    let mut target = obj;
    if let Some(parents) = parents {
        for segment in parents.split('.') {
            target = child_mut(target, segment).ok_or_else(|| PathError::MissingSegment {
                path: path.to_string(),
                segment: segment.to_string(),
            })?;
        }
    }

    match target {
        Value::Object(map) => {
            map.insert(last.to_string(), value);
            Ok(())
        }
        Value::Array(items) => {
            let len = items.len();
            match last.parse::<usize>() {
                Ok(index) if index < len => {
                    items[index] = value;
                    Ok(())
                }
                Ok(index) if index == len => {
                    items.push(value);
                    Ok(())
                }
                _ => Err(PathError::InvalidIndex {
                    path: path.to_string(),
                    segment: last.to_string(),
                    len,
                }),
            }
        }
        _ => Err(PathError::NotAContainer {
            path: path.to_string(),
            segment: last.to_string(),
        }),
    }
}

// =============================================================================
// Sorting
// =============================================================================

/// Sort position of a single key value.
///
/// Numbers sort before strings; values with no usable ordering go last and
/// keep their relative order.
#[derive(Debug)]
enum SortKey {
    Number(f64),
    Text(String),
    Unordered,
}

impl SortKey {
    fn of(value: Option<&Value>, numeric: bool) -> Self {
        let Some(value) = value else {
            return Self::Unordered;
        };

        if numeric {
            let n = to_number(value);
            return if n.is_nan() {
                Self::Unordered
            } else {
                Self::Number(n)
            };
        }

        match value {
            Value::String(s) => Self::Text(s.to_lowercase()),
            Value::Number(_) | Value::Bool(_) => Self::Number(to_number(value)),
            _ => Self::Unordered,
        }
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Number(_), _) | (Self::Text(_), Self::Unordered) => Ordering::Less,
            (Self::Unordered, Self::Unordered) => Ordering::Equal,
            _ => Ordering::Greater,
        }
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey {}

/// Sort records in place by the value at `path`, ascending.
///
/// Strings compare case-insensitively. With `numeric`, both sides are
/// coerced to numbers first. The sort is stable.
pub fn sort_by_key(items: &mut [Value], path: &str, numeric: bool) {
    items.sort_by_cached_key(|item| SortKey::of(deep_get(item, path), numeric));
}

// =============================================================================
// Lookups
// =============================================================================

fn value_at_is(item: &Value, path: &str, expected: &Value) -> bool {
    deep_get(item, path).is_some_and(|v| strict_eq(v, expected))
}

/// Whether any record holds `compare` at `path`.
pub fn deep_includes(items: &[Value], path: &str, compare: &Value) -> bool {
    items.iter().any(|item| value_at_is(item, path, compare))
}

/// Alias of [`deep_includes`].
#[inline]
pub fn includes_deep(items: &[Value], path: &str, compare: &Value) -> bool {
    deep_includes(items, path, compare)
}

/// Index of the first record holding `value` at `prop`.
pub fn index_by_prop(items: &[Value], prop: &str, value: &Value) -> Option<usize> {
    items.iter().position(|item| value_at_is(item, prop, value))
}

/// First record holding `value` at `prop`.
pub fn item_by_prop<'a>(items: &'a [Value], prop: &str, value: &Value) -> Option<&'a Value> {
    items.iter().find(|item| value_at_is(item, prop, value))
}

/// Indices of every record holding `value` at `prop`.
pub fn all_idx_by_prop(items: &[Value], prop: &str, value: &Value) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| value_at_is(item, prop, value))
        .map(|(i, _)| i)
        .collect()
}

/// Index records by the string form of the value at `key`.
///
/// Duplicate keys are reported and the later record wins. Records without
/// the key land under `"undefined"`.
pub fn array_to_object(items: &[Value], key: &str) -> Map<String, Value> {
    let mut out = Map::new();
    for item in items {
        let name = deep_get(item, key).map_or_else(|| "undefined".to_string(), to_display_string);
        if out.contains_key(&name) {
            tracing::warn!(key = %name, "key already exists, value will be overwritten");
        }
        out.insert(name, item.clone());
    }
    out
}

/// First key whose value loosely equals `val`.
pub fn key_by_value<'a>(obj: &'a Map<String, Value>, val: &Value) -> Option<&'a str> {
    obj.iter()
        .find(|(_, v)| loose_eq(v, val))
        .map(|(k, _)| k.as_str())
}

/// Last key whose value holds `val` at `path`.
pub fn key_by_deep_value<'a>(
    obj: &'a Map<String, Value>,
    path: &str,
    val: &Value,
) -> Option<&'a str> {
    obj.iter()
        .filter(|(_, v)| value_at_is(v, path, val))
        .map(|(k, _)| k.as_str())
        .last()
}

// =============================================================================
// Shuffling & Statistics
// =============================================================================

/// Shuffle in place (Fisher-Yates).
pub fn shuffle_array<T>(items: &mut [T]) {
    items.shuffle(&mut rand::thread_rng());
}

/// Shuffled copy, leaving the input untouched.
pub fn shuffled<T: Clone>(items: &[T]) -> Vec<T> {
    let mut copy = items.to_vec();
    shuffle_array(&mut copy);
    copy
}

/// The numbers `0..max` in random order.
pub fn random_numbers(max: usize) -> Vec<usize> {
    let mut numbers: Vec<usize> = (0..max).collect();
    shuffle_array(&mut numbers);
    numbers
}

/// Random index in `0..max`, `0` when `max` is zero.
pub fn random_index(max: usize) -> usize {
    if max == 0 {
        0
    } else {
        rand::thread_rng().gen_range(0..max)
    }
}

/// Arithmetic mean. `NaN` for an empty slice.
pub fn average(samples: &[f64]) -> f64 {
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Mean after dropping the smallest and largest sample.
///
/// Needs more than three samples; returns `0.0` otherwise.
pub fn median_average(samples: &[f64]) -> f64 {
    if samples.len() <= 3 {
        return 0.0;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    average(&sorted[1..sorted.len() - 1])
}

// =============================================================================
// Cloning & Comparison
// =============================================================================

/// Clone through a JSON round trip.
///
/// Anything JSON cannot represent is dropped or rejected, matching how the
/// value would look after being stored and read back.
pub fn clone_json<T: Serialize + DeserializeOwned>(value: &T) -> Result<T, serde_json::Error> {
    serde_json::to_value(value).and_then(serde_json::from_value)
}

/// Whether two values serialize to different JSON.
///
/// Values that fail to serialize count as different.
pub fn json_differs<A: Serialize, B: Serialize>(a: &A, b: &B) -> bool {
    match (serde_json::to_string(a), serde_json::to_string(b)) {
        (Ok(a), Ok(b)) => a != b,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nested(depth: usize) -> (Value, String) {
        let mut value = json!("leaf");
        let mut keys = Vec::new();
        for i in (0..depth).rev() {
            let key = format!("k{}", i);
            let mut map = Map::new();
            map.insert(key.clone(), value);
            value = Value::Object(map);
            keys.push(key);
        }
        keys.reverse();
        (value, keys.join("."))
    }

    #[test]
    fn test_deep_get_all_depths() {
        for depth in 1..=12 {
            let (obj, path) = nested(depth);
            assert_eq!(deep_get(&obj, &path), Some(&json!("leaf")), "depth {}", depth);
        }
    }

    #[test]
    fn test_deep_get_missing() {
        let obj = json!({"a": {"b": {"c": 1}}});
        assert_eq!(deep_get(&obj, "a.b.c"), Some(&json!(1)));
        assert_eq!(deep_get(&obj, "a.x.c"), None);
        assert_eq!(deep_get(&obj, "a.b.c.d"), None);
        assert_eq!(deep_get(&obj, "z"), None);
    }

    #[test]
    fn test_deep_get_array_index() {
        let obj = json!({"list": [{"name": "a"}, {"name": "b"}]});
        assert_eq!(deep_get(&obj, "list.1.name"), Some(&json!("b")));
        assert_eq!(deep_get(&obj, "list.5.name"), None);
    }

    #[test]
    fn test_deep_set() {
        let mut obj = json!({"a": {"b": {}}});
        deep_set(&mut obj, "a.b.c", json!(3)).unwrap();
        assert_eq!(obj, json!({"a": {"b": {"c": 3}}}));

        deep_set(&mut obj, "top", json!(true)).unwrap();
        assert_eq!(obj["top"], json!(true));
    }

    #[test]
    fn test_deep_set_missing_intermediate() {
        let mut obj = json!({"a": {}});
        let err = deep_set(&mut obj, "a.b.c", json!(1)).unwrap_err();
        assert_eq!(
            err,
            PathError::MissingSegment {
                path: "a.b.c".to_string(),
                segment: "b".to_string()
            }
        );
    }

    #[test]
    fn test_deep_set_array() {
        let mut obj = json!({"list": [1, 2]});
        deep_set(&mut obj, "list.0", json!(9)).unwrap();
        deep_set(&mut obj, "list.2", json!(3)).unwrap();
        assert_eq!(obj["list"], json!([9, 2, 3]));
        assert!(deep_set(&mut obj, "list.7", json!(0)).is_err());
    }

    #[test]
    fn test_deep_set_non_container() {
        let mut obj = json!({"a": 5});
        assert!(matches!(
            deep_set(&mut obj, "a.b", json!(1)),
            Err(PathError::NotAContainer { .. })
        ));
    }

    #[test]
    fn test_sort_by_key() {
        let mut items = vec![json!({"v": 3}), json!({"v": 1}), json!({"v": 2})];
        sort_by_key(&mut items, "v", false);
        let values: Vec<_> = items.iter().map(|i| i["v"].clone()).collect();
        assert_eq!(values, vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn test_sort_by_key_stable() {
        let mut items = vec![
            json!({"v": 1, "id": "a"}),
            json!({"v": 0, "id": "b"}),
            json!({"v": 1, "id": "c"}),
            json!({"v": 0, "id": "d"}),
        ];
        sort_by_key(&mut items, "v", false);
        let ids: Vec<_> = items.iter().map(|i| i["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_sort_by_key_case_insensitive_nested() {
        let mut items = vec![
            json!({"p": {"name": "beta"}}),
            json!({"p": {"name": "Alpha"}}),
            json!({"p": {}}),
            json!({"p": {"name": "gamma"}}),
        ];
        sort_by_key(&mut items, "p.name", false);
        let names: Vec<_> = items.iter().map(|i| i["p"]["name"].clone()).collect();
        assert_eq!(
            names,
            vec![json!("Alpha"), json!("beta"), json!("gamma"), Value::Null]
        );
    }

    #[test]
    fn test_sort_by_key_numeric() {
        let mut items = vec![json!({"v": "10"}), json!({"v": "9"}), json!({"v": "100"})];
        sort_by_key(&mut items, "v", true);
        let values: Vec<_> = items.iter().map(|i| i["v"].as_str().unwrap()).collect();
        assert_eq!(values, vec!["9", "10", "100"]);
    }

    #[test]
    fn test_lookups() {
        let items = vec![
            json!({"id": 1, "tag": "x"}),
            json!({"id": 2, "tag": "y"}),
            json!({"id": 3, "tag": "x"}),
        ];
        assert!(deep_includes(&items, "tag", &json!("y")));
        assert!(!includes_deep(&items, "tag", &json!("z")));
        assert_eq!(index_by_prop(&items, "id", &json!(2)), Some(1));
        assert_eq!(index_by_prop(&items, "id", &json!("2")), None);
        assert_eq!(item_by_prop(&items, "id", &json!(3)), Some(&items[2]));
        assert_eq!(all_idx_by_prop(&items, "tag", &json!("x")), vec![0, 2]);
    }

    #[test]
    fn test_array_to_object() {
        let items = vec![
            json!({"id": "a", "n": 1}),
            json!({"id": "b", "n": 2}),
            json!({"id": "a", "n": 3}),
        ];
        let obj = array_to_object(&items, "id");
        assert_eq!(obj.len(), 2);
        assert_eq!(obj["a"]["n"], json!(3));
    }

    #[test]
    fn test_key_lookups() {
        let obj = json!({
            "first": {"meta": {"v": 1}},
            "second": {"meta": {"v": 2}},
            "third": {"meta": {"v": 1}}
        });
        let map = obj.as_object().unwrap();
        assert_eq!(key_by_deep_value(map, "meta.v", &json!(1)), Some("third"));
        assert_eq!(key_by_deep_value(map, "meta.v", &json!(5)), None);

        let flat = json!({"a": 1, "b": "2"});
        assert_eq!(key_by_value(flat.as_object().unwrap(), &json!(2)), Some("b"));
    }

    #[test]
    fn test_shuffle_keeps_elements() {
        let original: Vec<u32> = (0..50).collect();
        let mut copy = shuffled(&original);
        assert_eq!(copy.len(), original.len());
        copy.sort();
        assert_eq!(copy, original);

        let mut numbers = random_numbers(20);
        numbers.sort();
        assert_eq!(numbers, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_averages() {
        assert_eq!(average(&[1.0, 2.0, 3.0]), 2.0);
        assert!(average(&[]).is_nan());
        assert_eq!(median_average(&[100.0, 2.0, 4.0, 0.0]), 3.0);
        assert_eq!(median_average(&[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn test_json_helpers() {
        let value = json!({"a": [1, 2, {"b": null}]});
        assert_eq!(clone_json(&value).unwrap(), value);
        assert!(!json_differs(&value, &value.clone()));
        assert!(json_differs(&json!({"a": 1}), &json!({"a": 2})));
    }
}
