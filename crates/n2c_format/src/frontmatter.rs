use n2c_core::Props;
use serde_json::Value;
use yaml_rust2::yaml::Hash;
use yaml_rust2::{Yaml, YamlEmitter};

use crate::FormatError;

const FENCE: &str = "---\n";

/// Renders record props as a YAML front-matter block, fences included.
///
/// Absent and empty props both give an empty block.
pub fn to_frontmatter(props: Option<&Props>) -> Result<String, FormatError> {
    let props = match props {
        Some(props) if !props.is_empty() => props,
        _ => return Ok(format!("{FENCE}{FENCE}")),
    };

    let mut out = String::new();
    let mut emitter = YamlEmitter::new(&mut out);
    emitter.dump(&to_yaml_hash(props))?;

    // The emitter opens the document with its own `---` line.
    let body = out.strip_prefix(FENCE).unwrap_or(&out);
    Ok(format!("{FENCE}{body}\n{FENCE}"))
}

fn to_yaml_hash(props: &Props) -> Yaml {
    let mut hash = Hash::new();
    for (key, value) in props {
        hash.insert(Yaml::String(key.clone()), to_yaml(value));
    }
    Yaml::Hash(hash)
}

fn to_yaml(value: &Value) -> Yaml {
    match value {
        Value::Null => Yaml::Null,
        Value::Bool(b) => Yaml::Boolean(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Yaml::Integer(i),
            None => Yaml::Real(n.to_string()),
        },
        Value::String(s) => Yaml::String(s.clone()),
        Value::Array(items) => Yaml::Array(items.iter().map(to_yaml).collect()),
        Value::Object(map) => to_yaml_hash(map),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Props {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn empty_and_absent_props_give_empty_block() {
        assert_eq!(to_frontmatter(None).unwrap(), "---\n---\n");
        assert_eq!(to_frontmatter(Some(&Props::new())).unwrap(), "---\n---\n");
    }

    #[test]
    fn keys_keep_insertion_order() {
        let props = props(json!({ "title": "Kale", "count": 3, "done": false }));
        assert_eq!(
            to_frontmatter(Some(&props)).unwrap(),
            "---\ntitle: Kale\ncount: 3\ndone: false\n---\n"
        );
    }

    #[test]
    fn ambiguous_strings_are_quoted() {
        let props = props(json!({ "flag": "true", "n": "12", "note": "a: b" }));
        let yaml = to_frontmatter(Some(&props)).unwrap();
        // `n` is a YAML 1.1 boolean, so the key is quoted too.
        assert_eq!(
            yaml,
            "---\nflag: \"true\"\n\"n\": \"12\"\nnote: \"a: b\"\n---\n"
        );
    }

    #[test]
    fn nested_values_are_indented() {
        let props = props(json!({ "tags": ["a", "b"], "meta": { "k": null } }));
        assert_eq!(
            to_frontmatter(Some(&props)).unwrap(),
            "---\ntags:\n  - a\n  - b\nmeta:\n  k: ~\n---\n"
        );
    }
}
