use n2c_core::{Node, Properties, PropertyValue};
use n2c_logging::n2c_trace;

use crate::Schema;

/// Cleans a hypertext tree according to a [`Schema`].
pub trait Sanitizer: Send + Sync {
    fn sanitize(&self, node: &Node, schema: &Schema) -> Node;
}

/// Allow-list sanitizer compatible with `hast-util-sanitize` schemas.
#[derive(Debug, Default, Clone, Copy)]
pub struct HastSanitizer;

impl Sanitizer for HastSanitizer {
    fn sanitize(&self, node: &Node, schema: &Schema) -> Node {
        sanitize(node, schema)
    }
}

/// Sanitizes `node`. A result of zero or several nodes is wrapped in a root.
pub fn sanitize(node: &Node, schema: &Schema) -> Node {
    let mut ancestors = Vec::new();
    let mut nodes = one(node, schema, &mut ancestors);
    if nodes.len() == 1 {
        if let Some(node) = nodes.pop() {
            return node;
        }
    }
    Node::root(nodes)
}

fn one(node: &Node, schema: &Schema, ancestors: &mut Vec<String>) -> Vec<Node> {
    match node {
        Node::Root { children } => vec![Node::root(all(children, schema, ancestors))],
        Node::Text { value } => vec![Node::text(value.clone())],
        Node::Comment { value } if schema.allow_comments => {
            vec![Node::comment(sanitize_comment(value))]
        }
        Node::Comment { .. } => Vec::new(),
        Node::Element {
            tag_name,
            properties,
            children,
        } => {
            let tag = tag_name.to_ascii_lowercase();
            if schema.strips(&tag) {
                n2c_trace!("stripped <{}>", tag);
                return Vec::new();
            }

            ancestors.push(tag.clone());
            let children = all(children, schema, ancestors);
            ancestors.pop();

            if !schema.allows_tag(&tag) || !has_allowed_ancestor(&tag, schema, ancestors) {
                n2c_trace!("unwrapped <{}>", tag);
                return children;
            }
            vec![Node::Element {
                properties: sanitize_properties(&tag, properties, schema),
                tag_name: tag,
                children,
            }]
        }
    }
}

fn all(children: &[Node], schema: &Schema, ancestors: &mut Vec<String>) -> Vec<Node> {
    children
        .iter()
        .flat_map(|child| one(child, schema, ancestors))
        .collect()
}

fn has_allowed_ancestor(tag: &str, schema: &Schema, ancestors: &[String]) -> bool {
    match schema.ancestors.get(tag) {
        Some(required) => ancestors.iter().any(|a| required.contains(a)),
        None => true,
    }
}

fn sanitize_properties(tag: &str, properties: &Properties, schema: &Schema) -> Properties {
    let mut clean = Properties::new();
    for (name, value) in properties {
        let Some(rule) = schema.rule_for(tag, name) else {
            continue;
        };
        let allowed = |v: &PropertyValue| rule.allows(v) && safe_protocol(name, v, schema);
        let kept = match value {
            PropertyValue::List(items) => {
                let items: Vec<String> = items
                    .iter()
                    .filter(|item| allowed(&PropertyValue::String((*item).clone())))
                    .map(|item| clobber(name, item, schema))
                    .collect();
                (!items.is_empty()).then_some(PropertyValue::List(items))
            }
            PropertyValue::String(s) => {
                allowed(value).then(|| PropertyValue::String(clobber(name, s, schema)))
            }
            other => allowed(other).then(|| other.clone()),
        };
        if let Some(kept) = kept {
            clean.insert(name.clone(), kept);
        }
    }

    if let Some(required) = schema.required.get(tag) {
        for (name, value) in required {
            clean.entry(name.clone()).or_insert_with(|| value.clone());
        }
    }
    clean
}

fn clobber(name: &str, value: &str, schema: &Schema) -> String {
    if schema.clobbers(name) && !value.starts_with(&schema.clobber_prefix) {
        format!("{}{}", schema.clobber_prefix, value)
    } else {
        value.to_string()
    }
}

fn safe_protocol(name: &str, value: &PropertyValue, schema: &Schema) -> bool {
    let Some(protocols) = schema.protocols.get(name) else {
        return true;
    };
    match value {
        PropertyValue::String(url) => allowed_scheme(url, protocols),
        _ => true,
    }
}

/// Relative URLs (no colon, or a colon after `/`, `?` or `#`) always pass.
fn allowed_scheme(url: &str, protocols: &[String]) -> bool {
    let url = url.trim();
    let Some(colon) = url.find(':') else {
        return true;
    };
    let before = |c: char| url.find(c).is_some_and(|i| i < colon);
    if before('/') || before('?') || before('#') {
        return true;
    }
    let scheme = &url[..colon];
    protocols.iter().any(|p| p.eq_ignore_ascii_case(scheme))
}

// A comment must not be able to close itself early.
fn sanitize_comment(value: &str) -> String {
    value.replace("-->", "--&gt;").replace("--!>", "--!&gt;")
}
