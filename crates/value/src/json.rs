//! Conversion between JSON documents and value trees.
//!
//! Objects become fields, arrays become multi-element sequences under their
//! field name, `null` becomes an undefined scalar. An object key `$` carries the
//! node's own scalar, and an array nested directly inside an array is stored
//! under the `_` field of its element.

use crate::scalar::Scalar;
use crate::value::Value;
use serde_json::{Map, Number, Value as Json};
use std::collections::HashSet;

/// Key holding a node's scalar when the node also has fields.
pub const SCALAR_KEY: &str = "$";
/// Field holding the elements of an array nested inside another array.
pub const NESTED_ARRAY_KEY: &str = "_";

impl Value {
    pub fn from_json(json: &Json) -> Value {
        let value = Value::new();
        match json {
            Json::Object(map) => {
                for (key, child) in map {
                    if key == SCALAR_KEY {
                        value.set_scalar(scalar_from_json(child));
                    } else {
                        add_json_field(&value, key, child);
                    }
                }
            }
            Json::Array(items) => {
                for item in items {
                    value.add_child(NESTED_ARRAY_KEY, element_from_json(item));
                }
            }
            other => value.set_scalar(scalar_from_json(other)),
        }
        value
    }

    /// Renders the subtree as JSON. A node that contains itself is rendered
    /// as `null` where it recurs.
    pub fn to_json(&self) -> Json {
        self.json_with(&mut HashSet::new())
    }

    fn json_with(&self, ancestors: &mut HashSet<usize>) -> Json {
        if !ancestors.insert(self.id()) {
            return Json::Null;
        }
        let json = self.json_node(ancestors);
        ancestors.remove(&self.id());
        json
    }

    fn json_node(&self, ancestors: &mut HashSet<usize>) -> Json {
        let entries = self.field_entries();
        let scalar = scalar_to_json(&self.scalar());
        if entries.is_empty() {
            return scalar;
        }

        let mut map = Map::new();
        if !scalar.is_null() {
            map.insert(SCALAR_KEY.to_string(), scalar);
        }
        for (name, vector) in entries {
            let mut items: Vec<Json> = vector
                .snapshot()
                .iter()
                .map(|value| value.json_with(ancestors))
                .collect();
            let json = if items.len() == 1 {
                items.remove(0)
            } else {
                Json::Array(items)
            };
            map.insert(name, json);
        }
        Json::Object(map)
    }
}

fn add_json_field(parent: &Value, key: &str, json: &Json) {
    match json {
        Json::Array(items) => {
            for item in items {
                parent.add_child(key, element_from_json(item));
            }
        }
        other => parent.add_child(key, Value::from_json(other)),
    }
}

fn element_from_json(json: &Json) -> Value {
    match json {
        Json::Array(inner) => {
            let element = Value::new();
            for item in inner {
                element.add_child(NESTED_ARRAY_KEY, element_from_json(item));
            }
            element
        }
        other => Value::from_json(other),
    }
}

fn scalar_from_json(json: &Json) -> Scalar {
    match json {
        Json::Null | Json::Array(_) | Json::Object(_) => Scalar::Undefined,
        Json::Bool(b) => Scalar::Bool(*b),
        Json::Number(n) => number_to_scalar(n),
        Json::String(s) => Scalar::Str(s.clone()),
    }
}

fn number_to_scalar(n: &Number) -> Scalar {
    if let Some(i) = n.as_i64() {
        match i32::try_from(i) {
            Ok(small) => Scalar::Int(small),
            Err(_) => Scalar::Long(i),
        }
    } else {
        Scalar::Double(n.as_f64().unwrap_or(f64::NAN))
    }
}

fn scalar_to_json(scalar: &Scalar) -> Json {
    match scalar {
        Scalar::Undefined => Json::Null,
        Scalar::Bool(b) => Json::Bool(*b),
        Scalar::Int(i) => Json::from(*i),
        Scalar::Long(l) => Json::from(*l),
        Scalar::Double(d) => Number::from_f64(*d).map(Json::Number).unwrap_or(Json::Null),
        Scalar::Str(s) | Scalar::Path(s) => Json::String(s.clone()),
        Scalar::Bytes(bytes) => Json::Array(bytes.iter().map(|b| Json::from(*b)).collect()),
    }
}
