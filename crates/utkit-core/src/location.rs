//! Parsing of `location.hash` and `location.search` style strings.

use std::collections::BTreeMap;

/// Parameters keyed by name; `None` for a bare `key` without `=`.
pub type Params = BTreeMap<String, Option<String>>;

fn parse_params(part: &str) -> Params {
    let mut out = Params::new();
    for item in part.split('&') {
        let mut pieces = item.split('=');
        let key = pieces.next().unwrap_or_default();
        if !key.is_empty() {
            out.insert(key.to_string(), pieces.next().map(str::to_string));
        }
    }
    out
}

/// Parameters in the fragment after the first `#`.
///
/// Values are returned exactly as written (no percent decoding). Input
/// without `#` yields no parameters.
pub fn parse_hash(hash: &str) -> Params {
    match hash.split('#').nth(1) {
        Some(part) => parse_params(part),
        None => Params::new(),
    }
}

/// Parameters in the query after the first `?`.
pub fn parse_search(search: &str) -> Params {
    match search.split('?').nth(1) {
        Some(part) => parse_params(part),
        None => Params::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hash() {
        let params = parse_hash("#tab=2&open&q=a=b");
        assert_eq!(params.get("tab"), Some(&Some("2".to_string())));
        assert_eq!(params.get("open"), Some(&None));
        assert_eq!(params.get("q"), Some(&Some("a".to_string())));
    }

    #[test]
    fn test_parse_search() {
        let params = parse_search("https://x.test/page?x=1&y=&&=skip");
        assert_eq!(params.len(), 2);
        assert_eq!(params["x"], Some("1".to_string()));
        assert_eq!(params["y"], Some(String::new()));
    }

    #[test]
    fn test_missing_marker() {
        assert!(parse_hash("tab=2").is_empty());
        assert!(parse_search("").is_empty());
    }
}
