//! Extension traits for records held in slices.
//!
//! Import [`PathSliceExt`] to call the deep-path helpers as methods.

use serde_json::Value;

use crate::data;

/// Deep-path helpers on `[Value]`.
pub trait PathSliceExt {
    /// Stable in-place sort by the value at `path`.
    fn sort_by_path(&mut self, path: &str, numeric: bool) -> &mut Self;

    /// Whether any record has `compare` at `path`.
    fn includes_deep(&self, path: &str, compare: &Value) -> bool;
}

impl PathSliceExt for [Value] {
    fn sort_by_path(&mut self, path: &str, numeric: bool) -> &mut Self {
        data::sort_by_key(self, path, numeric);
        self
    }

    fn includes_deep(&self, path: &str, compare: &Value) -> bool {
        data::includes_deep(self, path, compare)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sort_by_path_chains() {
        let mut items = vec![json!({"a": {"v": 2}}), json!({"a": {"v": 1}})];
        let first = items.sort_by_path("a.v", false)[0].clone();
        assert_eq!(first, json!({"a": {"v": 1}}));
    }

    #[test]
    fn test_includes_deep() {
        let items = [json!({"id": 1}), json!({"id": 2})];
        assert!(items.includes_deep("id", &json!(2)));
        assert!(!items.includes_deep("id", &json!("2")));
    }
}
