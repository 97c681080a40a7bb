//! Declarative record filtering.
//!
//! A [`Conditions`] set maps deep paths to [`ConditionSpec`]s. A record
//! passes [`turbo_filter`] when every condition matches the value at its
//! path. Bad conditions are reported through `tracing` and count as a
//! non-match; they never abort the filter.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::data::deep_get;
use crate::error::UnknownCondition;
use crate::value::{loose_eq, strict_eq, to_display_string, to_number};

// =============================================================================
// Condition Table
// =============================================================================

/// Binary operators available to filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    Eq,
    NotEq,
    Gt,
    Lt,
    Gte,
    Lte,
    Contains,
    NotContains,
    Includes,
    ContainsAny,
    ContainsAll,
    Is,
    IsNot,
}

impl Condition {
    /// Every condition, in table order.
    pub const ALL: [Condition; 13] = [
        Self::Eq,
        Self::NotEq,
        Self::Gt,
        Self::Lt,
        Self::Gte,
        Self::Lte,
        Self::Contains,
        Self::NotContains,
        Self::Includes,
        Self::ContainsAny,
        Self::ContainsAll,
        Self::Is,
        Self::IsNot,
    ];

    /// Operator name as written in condition specs.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Gte => ">=",
            Self::Lte => "<=",
            Self::Contains => "contains",
            Self::NotContains => "!contains",
            Self::Includes => "includes",
            Self::ContainsAny => "contains_any",
            Self::ContainsAll => "contains_all",
            Self::Is => "is",
            Self::IsNot => "!is",
        }
    }

    /// Human-readable label for pickers.
    pub fn label(self) -> &'static str {
        match self {
            Self::Eq => "Equals",
            Self::NotEq => "Not Equals",
            Self::Gt => "Greater Than",
            Self::Lt => "Less Than",
            Self::Gte => "Greater Than or Equal",
            Self::Lte => "Less Than or Equal",
            Self::Contains => "Contains",
            Self::NotContains => "Does Not Contain",
            Self::Includes => "Includes",
            Self::ContainsAny => "Contains Any",
            Self::ContainsAll => "Contains All",
            Self::Is => "Is Strictly Equal",
            Self::IsNot => "Is Not Strictly Equal",
        }
    }

    /// Whether both operands are coerced to numbers before comparing.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Gt | Self::Lt | Self::Gte | Self::Lte)
    }

    fn compare_numbers(self, a: f64, b: f64) -> bool {
        match self {
            Self::Gt => a > b,
            Self::Lt => a < b,
            Self::Gte => a >= b,
            Self::Lte => a <= b,
            _ => false,
        }
    }

    fn compare_values(self, a: &Value, b: &Value) -> bool {
        match self {
            Self::Eq => loose_eq(a, b),
            Self::NotEq => !loose_eq(a, b),
            Self::Contains => to_display_string(a).contains(&to_display_string(b)),
            Self::NotContains => !to_display_string(a).contains(&to_display_string(b)),
            Self::Includes => a
                .as_array()
                .is_some_and(|items| items.iter().any(|item| strict_eq(item, b))),
            Self::ContainsAny => term_membership(a, b, Membership::Any),
            Self::ContainsAll => term_membership(a, b, Membership::All),
            Self::Is => strict_eq(a, b),
            Self::IsNot => !strict_eq(a, b),
            Self::Gt | Self::Lt | Self::Gte | Self::Lte => {
                self.compare_numbers(to_number(a), to_number(b))
            }
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Condition {
    type Err = UnknownCondition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.symbol() == s)
            .ok_or_else(|| UnknownCondition(s.to_string()))
    }
}

#[derive(Clone, Copy)]
enum Membership {
    Any,
    All,
}

/// `contains_any` / `contains_all`: `a` is a comma-separated term list,
/// `b` an array of candidates. Always case-insensitive.
fn term_membership(a: &Value, b: &Value, mode: Membership) -> bool {
    let Some(candidates) = b.as_array() else {
        return false;
    };
    let Some(list) = a.as_str() else {
        tracing::warn!(value = %a, "term list must be a string");
        return false;
    };

    let lowered = list.to_lowercase();
    let terms: Vec<&str> = lowered.split(',').map(str::trim).collect();

    let mut lowered_candidates = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let Some(candidate) = candidate.as_str() else {
            tracing::warn!(value = %candidate, "term candidates must be strings");
            return false;
        };
        lowered_candidates.push(candidate.to_lowercase());
    }

    let is_term = |c: &String| terms.contains(&c.as_str());
    match mode {
        Membership::Any => lowered_candidates.iter().any(is_term),
        Membership::All => lowered_candidates.iter().all(is_term),
    }
}

// =============================================================================
// Condition Specs
// =============================================================================

/// Rule applied to the value at one path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionSpec {
    /// Operator name, see [`Condition::symbol`].
    pub condition: String,
    /// Right-hand operand.
    #[serde(default)]
    pub value: Value,
    /// Per-condition case folding; falls back to the filter-wide flag.
    #[serde(rename = "ignoreCase", default, skip_serializing_if = "Option::is_none")]
    pub ignore_case: Option<bool>,
}

impl ConditionSpec {
    pub fn new(condition: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            condition: condition.into(),
            value: value.into(),
            ignore_case: None,
        }
    }

    pub fn ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = Some(ignore_case);
        self
    }
}

/// Ordered set of `(path, spec)` pairs.
///
/// Deserializes from a JSON object keyed by path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conditions(Vec<(String, ConditionSpec)>);

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Conditions::insert`].
    pub fn with(mut self, path: impl Into<String>, spec: ConditionSpec) -> Self {
        self.insert(path, spec);
        self
    }

    /// Add a condition, replacing any earlier one on the same path.
    pub fn insert(&mut self, path: impl Into<String>, spec: ConditionSpec) {
        let path = path.into();
        match self.0.iter_mut().find(|(p, _)| *p == path) {
            Some((_, existing)) => *existing = spec,
            None => self.0.push((path, spec)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConditionSpec)> {
        self.0.iter().map(|(p, s)| (p.as_str(), s))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for Conditions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ConditionsVisitor;

        impl<'de> Visitor<'de> for ConditionsVisitor {
            type Value = Conditions;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field paths to condition specs")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Conditions, A::Error> {
                let mut out = Conditions::new();
                while let Some((path, spec)) = map.next_entry::<String, ConditionSpec>()? {
                    out.insert(path, spec);
                }
                Ok(out)
            }
        }

        deserializer.deserialize_map(ConditionsVisitor)
    }
}

// =============================================================================
// Matching
// =============================================================================

/// Apply one condition to a value.
///
/// Absent and null values never match. Unknown condition names and
/// operands without a numeric reading are reported and do not match.
pub fn match_value(item: Option<&Value>, condition: &str, value: &Value) -> bool {
    match condition.parse::<Condition>() {
        Ok(condition) => match_parsed(item, condition, value),
        Err(e) => {
            tracing::warn!("{}", e);
            false
        }
    }
}

fn match_parsed(item: Option<&Value>, condition: Condition, value: &Value) -> bool {
    let Some(item) = item.filter(|v| !v.is_null()) else {
        return false;
    };

    if condition.is_numeric() {
        let (a, b) = (to_number(item), to_number(value));
        if a.is_nan() || b.is_nan() {
            tracing::warn!(
                "invalid numeric comparison: {} {} {}",
                to_display_string(item),
                condition,
                to_display_string(value)
            );
            return false;
        }
        return condition.compare_numbers(a, b);
    }

    condition.compare_values(item, value)
}

struct CompiledCondition<'c> {
    path: &'c str,
    condition: Condition,
    value: &'c Value,
    ignore_case: bool,
}

impl CompiledCondition<'_> {
    fn matches(&self, record: &Value) -> bool {
        let item = deep_get(record, self.path);

        if self.ignore_case
            && let (Some(Value::String(a)), Value::String(b)) = (item, self.value)
        {
            let a = Value::String(a.to_lowercase());
            return match_parsed(Some(&a), self.condition, &Value::String(b.to_lowercase()));
        }

        match_parsed(item, self.condition, self.value)
    }
}

/// Keep the records that satisfy every condition, in input order.
///
/// `ignore_case` is the default for conditions that do not set their own
/// flag; it only affects string-to-string comparisons. An unknown
/// condition name is reported once and matches nothing.
pub fn turbo_filter<'a>(
    data: &'a [Value],
    conditions: &Conditions,
    ignore_case: bool,
) -> Vec<&'a Value> {
    let mut compiled = Vec::with_capacity(conditions.len());
    for (path, spec) in conditions.iter() {
        match spec.condition.parse::<Condition>() {
            Ok(condition) => compiled.push(CompiledCondition {
                path,
                condition,
                value: &spec.value,
                ignore_case: spec.ignore_case.unwrap_or(ignore_case),
            }),
            Err(e) => {
                tracing::warn!(path, "{}", e);
                return Vec::new();
            }
        }
    }

    data.iter()
        .filter(|record| compiled.iter().all(|c| c.matches(record)))
        .collect()
}

// =============================================================================
// Multi-field Search
// =============================================================================

/// Substring search across several fields.
#[derive(Debug, Clone)]
pub struct SearchParams<'a> {
    pub data: &'a [Value],
    /// Paths to search; a record matches if any of them contains the term.
    pub props: Vec<String>,
    pub search: Value,
    pub ignore_case: bool,
    pub return_index_only: bool,
}

/// Outcome of [`search`].
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResult<'a> {
    Items(Vec<&'a Value>),
    Indices(Vec<usize>),
}

/// `contains` search OR-ed across `props`.
///
/// Results are grouped by the first prop that matched and de-duplicated.
/// No props means no results.
pub fn search<'a>(params: &SearchParams<'a>) -> SearchResult<'a> {
    let data = params.data;
    let mut seen = HashSet::new();
    let mut indices = Vec::new();

    for prop in &params.props {
        let condition = CompiledCondition {
            path: prop,
            condition: Condition::Contains,
            value: &params.search,
            ignore_case: params.ignore_case,
        };
        for (i, record) in data.iter().enumerate() {
            if condition.matches(record) && seen.insert(i) {
                indices.push(i);
            }
        }
    }

    if params.return_index_only {
        SearchResult::Indices(indices)
    } else {
        SearchResult::Items(indices.into_iter().map(|i| &data[i]).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn people() -> Vec<Value> {
        vec![
            json!({"name": "Ada", "age": 25, "tags": ["math", "code"], "skills": "Rust, Go"}),
            json!({"name": "bob", "age": 30, "tags": ["music"], "skills": "python"}),
            json!({"name": "Cy", "age": 35, "tags": [], "meta": {"city": "Oslo"}}),
        ]
    }

    fn names(records: &[&Value]) -> Vec<String> {
        records
            .iter()
            .map(|r| r["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_condition_table() {
        for condition in Condition::ALL {
            assert_eq!(condition.symbol().parse::<Condition>(), Ok(condition));
        }
        assert_eq!(Condition::Gte.label(), "Greater Than or Equal");
        assert!(Condition::Lt.is_numeric());
        assert!(!Condition::Contains.is_numeric());
        assert!("~=".parse::<Condition>().is_err());
    }

    #[test]
    fn test_turbo_filter_numeric() {
        let data = vec![json!({"age": 25}), json!({"age": 30}), json!({"age": 35})];
        let conditions = Conditions::new().with("age", ConditionSpec::new(">=", 30));
        let result = turbo_filter(&data, &conditions, false);
        assert_eq!(result, vec![&data[1], &data[2]]);
    }

    #[test]
    fn test_turbo_filter_and_semantics() {
        let data = people();
        let conditions = Conditions::new()
            .with("age", ConditionSpec::new(">", 20))
            .with("name", ConditionSpec::new("contains", "b"));
        assert_eq!(names(&turbo_filter(&data, &conditions, false)), vec!["bob"]);
    }

    #[test]
    fn test_turbo_filter_ignore_case() {
        let data = people();
        let conditions = Conditions::new().with("name", ConditionSpec::new("==", "BOB"));
        assert!(turbo_filter(&data, &conditions, false).is_empty());
        assert_eq!(names(&turbo_filter(&data, &conditions, true)), vec!["bob"]);

        let per_condition = Conditions::new()
            .with("name", ConditionSpec::new("==", "BOB").ignore_case(false));
        assert!(turbo_filter(&data, &per_condition, true).is_empty());
    }

    #[test]
    fn test_turbo_filter_deep_path() {
        let data = people();
        let conditions = Conditions::new().with("meta.city", ConditionSpec::new("is", "Oslo"));
        assert_eq!(names(&turbo_filter(&data, &conditions, false)), vec!["Cy"]);
    }

    #[test]
    fn test_turbo_filter_unknown_condition() {
        let data = people();
        let conditions = Conditions::new().with("age", ConditionSpec::new("~", 1));
        assert!(turbo_filter(&data, &conditions, false).is_empty());
    }

    #[test]
    fn test_turbo_filter_non_numeric_is_non_match() {
        let data = vec![json!({"age": "old"}), json!({"age": "40"})];
        let conditions = Conditions::new().with("age", ConditionSpec::new(">", 18));
        assert_eq!(turbo_filter(&data, &conditions, false), vec![&data[1]]);
    }

    #[test]
    fn test_includes_and_term_lists() {
        let data = people();
        let includes = Conditions::new().with("tags", ConditionSpec::new("includes", "music"));
        assert_eq!(names(&turbo_filter(&data, &includes, false)), vec!["bob"]);

        let any = Conditions::new().with(
            "skills",
            ConditionSpec::new("contains_any", json!(["GO", "java"])),
        );
        assert_eq!(names(&turbo_filter(&data, &any, false)), vec!["Ada"]);

        let all = Conditions::new().with(
            "skills",
            ConditionSpec::new("contains_all", json!(["rust", "go"])),
        );
        assert_eq!(names(&turbo_filter(&data, &all, false)), vec!["Ada"]);

        let not_array = Conditions::new()
            .with("skills", ConditionSpec::new("contains_any", "rust"));
        assert!(turbo_filter(&data, &not_array, false).is_empty());
    }

    #[test]
    fn test_match_value() {
        assert!(match_value(Some(&json!(5)), "==", &json!("5")));
        assert!(!match_value(Some(&json!(5)), "is", &json!("5")));
        assert!(match_value(Some(&json!(5)), "!is", &json!("5")));
        assert!(match_value(Some(&json!("hello")), "!contains", &json!("z")));
        assert!(!match_value(None, "!=", &json!(1)));
        assert!(!match_value(Some(&Value::Null), "!=", &json!(1)));
        assert!(!match_value(Some(&json!(1)), "bogus", &json!(1)));
    }

    #[test]
    fn test_conditions_deserialize() {
        let conditions: Conditions = serde_json::from_value(json!({
            "age": {"condition": ">=", "value": 30},
            "name": {"condition": "contains", "value": "A", "ignoreCase": true}
        }))
        .unwrap();
        assert_eq!(conditions.len(), 2);
        let (path, spec) = conditions.iter().nth(1).unwrap();
        assert_eq!(path, "name");
        assert_eq!(spec.ignore_case, Some(true));
    }

    #[test]
    fn test_search() {
        let data = people();
        let params = SearchParams {
            data: &data,
            props: vec!["name".to_string(), "skills".to_string()],
            search: json!("o"),
            ignore_case: true,
            return_index_only: false,
        };
        let SearchResult::Items(items) = search(&params) else {
            panic!("expected items");
        };
        assert_eq!(names(&items), vec!["bob", "Ada"]);

        let indices = search(&SearchParams {
            return_index_only: true,
            ..params
        });
        assert_eq!(indices, SearchResult::Indices(vec![1, 0]));
    }
}
