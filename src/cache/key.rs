use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Builds the cache key for `endpoint` called with `params`.
///
/// Parameters are sorted by name before encoding, so insertion order never
/// matters. Values are NOT normalized: `"1"` and `1` give different keys.
pub fn build_key<I, K>(endpoint: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    let sorted: BTreeMap<String, Value> = params
        .into_iter()
        .map(|(name, value)| (name.into(), value))
        .collect();

    let mut encoded = Map::new();
    for (name, value) in sorted {
        encoded.insert(name, value);
    }
    format!("{endpoint}_{}", Value::Object(encoded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn param_order_does_not_matter() {
        let a = build_key("standings", [("season", json!(2024)), ("league", json!(8))]);
        let b = build_key("standings", [("league", json!(8)), ("season", json!(2024))]);
        assert_eq!(a, b);
        assert_eq!(a, r#"standings_{"league":8,"season":2024}"#);
    }

    #[test]
    fn string_and_number_values_are_distinct() {
        let number = build_key("team", [("id", json!(1))]);
        let text = build_key("team", [("id", json!("1"))]);
        assert_ne!(number, text);
    }

    #[test]
    fn endpoints_do_not_collide() {
        let a = build_key("team", [("id", json!(17))]);
        let b = build_key("squad", [("id", json!(17))]);
        assert_ne!(a, b);
        assert!(a.starts_with("team_{"));
        assert!(b.starts_with("squad_{"));
    }

    #[test]
    fn empty_params_still_encode() {
        let key = build_key::<_, String>("seasons", Vec::new());
        assert_eq!(key, "seasons_{}");
    }
}
