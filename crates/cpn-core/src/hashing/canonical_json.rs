//! JSON canónico: claves de objetos ordenadas, sin espacios.
//!
//! Dos `Value` iguales salvo por el orden de inserción de sus claves producen
//! exactamente la misma cadena, así que su hash es estable.

use serde_json::Value;

pub fn to_canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                // Display de Value::String ya escapa como JSON
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(&map[key], out);
            }
            out.push('}');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_keys_are_sorted_recursively() {
        let v = json!({"b": {"y": 1, "x": [3, {"k": null, "a": true}]}, "a": "s"});
        assert_eq!(to_canonical_json(&v), r#"{"a":"s","b":{"x":[3,{"a":true,"k":null}],"y":1}}"#);
    }

    #[test]
    fn strings_are_escaped() {
        let v = json!({"q\"uote": "line\nbreak"});
        assert_eq!(to_canonical_json(&v), r#"{"q\"uote":"line\nbreak"}"#);
    }
}
