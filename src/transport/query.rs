use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::Value;

use crate::domain::Params;

/// Bytes escaped in a URI component; everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Flatten parameters into a query string using bracket notation.
///
/// Scalars become `name=value`, arrays `name[i]=value`, objects
/// `name[key]=value`, recursively at any depth. `null` values are omitted.
/// Names, object keys and values are percent-encoded as URI components; the
/// brackets themselves are kept literal.
pub fn encode_query(params: &Params) -> String {
    let mut pairs = Vec::<String>::new();
    for (name, value) in params {
        push_encoded(&encode_component(name), value, &mut pairs);
    }
    pairs.join("&")
}

fn push_encoded(name: &str, value: &Value, pairs: &mut Vec<String>) {
    match value {
        Value::Null => {}
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                push_encoded(&format!("{name}[{idx}]"), item, pairs);
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                push_encoded(&format!("{name}[{}]", encode_component(key)), item, pairs);
            }
        }
        Value::String(text) => pairs.push(format!("{name}={}", encode_component(text))),
        Value::Bool(flag) => pairs.push(format!("{name}={flag}")),
        Value::Number(number) => pairs.push(format!("{name}={number}")),
    }
}

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, json};

    use super::*;

    fn params(value: Value) -> Params {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other:?}"),
        }
    }

    /// Rebuild a nested value from bracket notation; numeric segments become array indexes.
    fn parse_brackets(query: &str) -> Value {
        let mut root = Value::Object(Map::new());
        for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let name: &str = &name;
            let mut segments = Vec::<String>::new();
            let (head, rest) = name.split_once('[').unwrap_or((name, ""));
            segments.push(head.to_owned());
            for part in rest.split('[').filter(|it| !it.is_empty()) {
                segments.push(part.trim_end_matches(']').to_owned());
            }

            let mut cursor = &mut root;
            for (idx, segment) in segments.iter().enumerate() {
                let last = idx + 1 == segments.len();
                let next_is_index = segments
                    .get(idx + 1)
                    .is_some_and(|it| it.parse::<usize>().is_ok());
                let fresh = if last {
                    Value::String(value.to_string())
                } else if next_is_index {
                    Value::Array(Vec::new())
                } else {
                    Value::Object(Map::new())
                };

                cursor = match cursor {
                    Value::Array(items) => {
                        let pos = segment.parse::<usize>().unwrap();
                        if items.len() <= pos {
                            items.push(fresh);
                        }
                        &mut items[pos]
                    }
                    Value::Object(map) => map.entry(segment.clone()).or_insert(fresh),
                    other => panic!("cannot descend into {other:?}"),
                };
            }
        }
        root
    }

    #[test]
    fn scalars_are_encoded_as_name_value_pairs() {
        let query = encode_query(&params(json!({
            "name": "Jane Doe",
            "page_size": 50,
            "starred": true,
        })));
        assert_eq!(query, "name=Jane%20Doe&page_size=50&starred=true");
    }

    #[test]
    fn values_are_percent_encoded() {
        let query = encode_query(&params(json!({ "content": "a&b=c/d?" })));
        assert_eq!(query, "content=a%26b%3Dc%2Fd%3F");
    }

    #[test]
    fn unreserved_marks_are_kept_and_spaces_become_percent_20() {
        let query = encode_query(&params(json!({ "content": "it's (fine) ~ok* -_.!" })));
        assert_eq!(query, "content=it's%20(fine)%20~ok*%20-_.!");
    }

    #[test]
    fn names_and_bracket_keys_are_escaped() {
        let query = encode_query(&params(json!({
            "vars": { "a#b&c": "x y", "plain": 1 },
            "odd name": "v",
        })));
        assert_eq!(query, "vars[a%23b%26c]=x%20y&vars[plain]=1&odd%20name=v");
    }

    #[test]
    fn nested_arrays_and_objects_use_bracket_notation() {
        let query = encode_query(&params(json!({ "a": [1, { "b": 2 }] })));
        assert_eq!(query, "a[0]=1&a[1][b]=2");
    }

    #[test]
    fn deeply_nested_values_keep_every_level() {
        let query = encode_query(&params(json!({
            "vars": { "q1": { "answers": ["yes", "no"] } },
            "name": { "prefix": "Jo" },
        })));
        assert_eq!(
            query,
            "vars[q1][answers][0]=yes&vars[q1][answers][1]=no&name[prefix]=Jo"
        );
    }

    #[test]
    fn null_values_are_omitted_at_any_depth() {
        let query = encode_query(&params(json!({
            "marker": null,
            "filter": { "keep": "x", "drop": null },
            "list": [null, "y"],
        })));
        assert_eq!(query, "filter[keep]=x&list[1]=y");
    }

    #[test]
    fn empty_params_encode_to_empty_string() {
        assert_eq!(encode_query(&Params::new()), "");
    }

    #[test]
    fn bracket_encoding_round_trips_nested_structure() {
        let original = json!({
            "a": ["1", { "b": "2" }],
            "vars": { "city": "Nairobi", "tags": ["x", "y z"] },
        });
        let query = encode_query(&params(original.clone()));
        assert_eq!(parse_brackets(&query), original);
    }
}
