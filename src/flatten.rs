//! Flatten parsed documents into dotted field paths.
//!
//! The YAML, TOML and JSON parsers each hand back their own tree type. All
//! three are viewed through [`DocumentNode`] and walked the same way:
//!
//! - a non-empty mapping is recursed into, its keys joined with `.`
//! - an empty mapping is a leaf holding an empty [`Value::Map`]
//! - a sequence stays whole, as one [`Value::List`] leaf
//! - null becomes a pair with no value, so the field still gets an entry
//!
//! Nulls nested inside a leaf list or map have nowhere to go and are dropped.

use indexmap::IndexMap;

use crate::value::Value;

/// One step of a parsed document, borrowed from the parser's own tree.
enum Node<'a, N> {
    Null,
    Scalar(Value),
    List(&'a [N]),
    Map(Vec<(String, &'a N)>),
}

trait DocumentNode: Sized {
    fn node(&self) -> Node<'_, Self>;
}

pub fn flatten_yaml(doc: &serde_yaml::Mapping) -> Vec<(String, Option<Value>)> {
    flatten_entries(yaml_entries(doc))
}

pub fn flatten_toml(doc: &toml::Table) -> Vec<(String, Option<Value>)> {
    flatten_entries(doc.iter().map(|(k, v)| (k.clone(), v)).collect())
}

pub fn flatten_json(
    doc: &serde_json::Map<String, serde_json::Value>,
) -> Vec<(String, Option<Value>)> {
    flatten_entries(doc.iter().map(|(k, v)| (k.clone(), v)).collect())
}

fn flatten_entries<N: DocumentNode>(entries: Vec<(String, &N)>) -> Vec<(String, Option<Value>)> {
    let mut out = Vec::new();
    for (key, node) in entries {
        walk(key, node, &mut out);
    }
    out
}

fn walk<N: DocumentNode>(path: String, node: &N, out: &mut Vec<(String, Option<Value>)>) {
    match node.node() {
        Node::Map(entries) if !entries.is_empty() => {
            for (key, child) in entries {
                walk(format!("{path}.{key}"), child, out);
            }
        }
        leaf => out.push((path, into_value(leaf))),
    }
}

fn into_value<N: DocumentNode>(node: Node<'_, N>) -> Option<Value> {
    match node {
        Node::Null => None,
        Node::Scalar(value) => Some(value),
        Node::List(items) => Some(Value::List(
            items.iter().filter_map(|item| into_value(item.node())).collect(),
        )),
        Node::Map(entries) => Some(Value::Map(
            entries
                .into_iter()
                .filter_map(|(key, child)| into_value(child.node()).map(|v| (key, v)))
                .collect::<IndexMap<_, _>>(),
        )),
    }
}

// --- YAML ---

fn yaml_entries(map: &serde_yaml::Mapping) -> Vec<(String, &serde_yaml::Value)> {
    map.iter()
        .filter_map(|(key, value)| match yaml_key(key) {
            Some(key) => Some((key, value)),
            None => {
                tracing::debug!(?key, "skipping YAML entry with a non-scalar key");
                None
            }
        })
        .collect()
}

/// YAML allows scalar keys of any kind (`404: missing`, `true: yes`); they
/// become path segments in their string form.
fn yaml_key(key: &serde_yaml::Value) -> Option<String> {
    match key {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Tagged(tagged) => yaml_key(&tagged.value),
        _ => None,
    }
}

impl DocumentNode for serde_yaml::Value {
    fn node(&self) -> Node<'_, Self> {
        match self {
            serde_yaml::Value::Null => Node::Null,
            serde_yaml::Value::Bool(b) => Node::Scalar(Value::Bool(*b)),
            serde_yaml::Value::Number(n) => Node::Scalar(match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            }),
            serde_yaml::Value::String(s) => Node::Scalar(Value::String(s.clone())),
            serde_yaml::Value::Sequence(items) => Node::List(items),
            serde_yaml::Value::Mapping(map) => Node::Map(yaml_entries(map)),
            serde_yaml::Value::Tagged(tagged) => tagged.value.node(),
        }
    }
}

// --- TOML ---

impl DocumentNode for toml::Value {
    fn node(&self) -> Node<'_, Self> {
        match self {
            toml::Value::String(s) => Node::Scalar(Value::String(s.clone())),
            toml::Value::Integer(i) => Node::Scalar(Value::Integer(*i)),
            toml::Value::Float(f) => Node::Scalar(Value::Float(*f)),
            toml::Value::Boolean(b) => Node::Scalar(Value::Bool(*b)),
            toml::Value::Datetime(dt) => Node::Scalar(Value::String(dt.to_string())),
            toml::Value::Array(items) => Node::List(items),
            toml::Value::Table(table) => {
                Node::Map(table.iter().map(|(k, v)| (k.clone(), v)).collect())
            }
        }
    }
}

// --- JSON ---

impl DocumentNode for serde_json::Value {
    fn node(&self) -> Node<'_, Self> {
        match self {
            serde_json::Value::Null => Node::Null,
            serde_json::Value::Bool(b) => Node::Scalar(Value::Bool(*b)),
            // Integers beyond i64 fall back to the nearest float.
            serde_json::Value::Number(n) => Node::Scalar(match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            }),
            serde_json::Value::String(s) => Node::Scalar(Value::String(s.clone())),
            serde_json::Value::Array(items) => Node::List(items),
            serde_json::Value::Object(map) => {
                Node::Map(map.iter().map(|(k, v)| (k.clone(), v)).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn yaml(text: &str) -> Vec<(String, Option<Value>)> {
        let doc: serde_yaml::Mapping = serde_yaml::from_str(text).unwrap();
        flatten_yaml(&doc)
    }

    fn json(doc: serde_json::Value) -> Vec<(String, Option<Value>)> {
        match doc {
            serde_json::Value::Object(map) => flatten_json(&map),
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn yaml_nested_mapping() {
        assert_eq!(
            yaml("nested:\n  value: true\n  another: 10\nint: 3\n"),
            vec![
                ("nested.value".into(), Some(Value::Bool(true))),
                ("nested.another".into(), Some(Value::Integer(10))),
                ("int".into(), Some(Value::Integer(3))),
            ]
        );
    }

    #[test]
    fn yaml_null_emits_none() {
        assert_eq!(
            yaml("a: ~\nb: null\nc:\n"),
            vec![("a".into(), None), ("b".into(), None), ("c".into(), None)]
        );
    }

    #[test]
    fn yaml_empty_mapping_is_a_leaf() {
        assert_eq!(
            yaml("section: {}\nother: 1\n"),
            vec![
                ("section".into(), Some(Value::Map(IndexMap::new()))),
                ("other".into(), Some(Value::Integer(1))),
            ]
        );
    }

    #[test]
    fn yaml_non_string_keys() {
        assert_eq!(
            yaml("codes:\n  404: missing\n  true: yes\n"),
            vec![
                ("codes.404".into(), Some(Value::from("missing"))),
                ("codes.true".into(), Some(Value::from("yes"))),
            ]
        );
    }

    #[test]
    fn yaml_tags_are_transparent() {
        assert_eq!(
            yaml("port: !port 8080\n"),
            vec![("port".into(), Some(Value::Integer(8080)))]
        );
    }

    #[test]
    fn yaml_lists_stay_whole_and_drop_nulls() {
        assert_eq!(
            yaml("list:\n  - 1\n  - ~\n  - name: a\n"),
            vec![(
                "list".into(),
                Some(Value::List(vec![
                    Value::Integer(1),
                    Value::Map(IndexMap::from([("name".to_string(), Value::from("a"))])),
                ]))
            )]
        );
    }

    #[test]
    fn toml_tables_and_datetime() {
        let doc: toml::Table = toml::from_str(
            "title = \"x\"\nwhen = 1979-05-27T07:32:00Z\nlimit = 2.5\n[database]\nport = 5432\n[empty]\n",
        )
        .unwrap();
        let pairs = flatten_toml(&doc);
        assert!(pairs.contains(&("title".into(), Some(Value::from("x")))));
        assert!(pairs.contains(&("when".into(), Some(Value::from("1979-05-27T07:32:00Z")))));
        assert!(pairs.contains(&("limit".into(), Some(Value::Float(2.5)))));
        assert!(pairs.contains(&("database.port".into(), Some(Value::Integer(5432)))));
        assert!(pairs.contains(&("empty".into(), Some(Value::Map(IndexMap::new())))));
    }

    #[test]
    fn json_nulls_and_empty_objects() {
        assert_eq!(
            json(json!({"a": null, "b": {}, "c": {"d": 1}})),
            vec![
                ("a".into(), None),
                ("b".into(), Some(Value::Map(IndexMap::new()))),
                ("c.d".into(), Some(Value::Integer(1))),
            ]
        );
    }

    #[test]
    fn json_falsy_values_are_present() {
        assert_eq!(
            json(json!({"f": false, "z": 0, "s": ""})),
            vec![
                ("f".into(), Some(Value::Bool(false))),
                ("z".into(), Some(Value::Integer(0))),
                ("s".into(), Some(Value::String(String::new()))),
            ]
        );
    }

    #[test]
    fn json_large_unsigned_becomes_float() {
        let pairs = json(json!({"big": u64::MAX}));
        assert!(matches!(pairs[0].1, Some(Value::Float(_))));
    }

    #[test]
    fn json_list_of_objects_drops_nested_nulls() {
        let pairs = json(json!({"list": [1, null, {"a": null, "b": 2}]}));
        let items = pairs[0].1.as_ref().unwrap().as_list().unwrap();
        assert_eq!(items.len(), 2);
        let map = items[1].as_map().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["b"], Value::Integer(2));
    }

    #[test]
    fn empty_document() {
        assert!(flatten_json(&serde_json::Map::new()).is_empty());
        assert!(flatten_toml(&toml::Table::new()).is_empty());
    }
}
