use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Element properties keyed by hast property name (`className`, `href`, ...).
///
/// Sorted by name, so every serializer sees attributes in the same order.
pub type Properties = BTreeMap<String, PropertyValue>;

/// A node of the hypertext tree, serialized in the hast JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Root {
        #[serde(default)]
        children: Vec<Node>,
    },
    Element {
        #[serde(rename = "tagName")]
        tag_name: String,
        #[serde(default)]
        properties: Properties,
        #[serde(default)]
        children: Vec<Node>,
    },
    Text {
        value: String,
    },
    Comment {
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<String>),
}

impl Node {
    pub fn root(children: Vec<Node>) -> Self {
        Node::Root { children }
    }

    pub fn element(tag_name: impl Into<String>, properties: Properties, children: Vec<Node>) -> Self {
        Node::Element {
            tag_name: tag_name.into(),
            properties,
            children,
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Node::Text {
            value: value.into(),
        }
    }

    pub fn comment(value: impl Into<String>) -> Self {
        Node::Comment {
            value: value.into(),
        }
    }

    /// Tag name of element nodes, as stored.
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Node::Element { tag_name, .. } => Some(tag_name),
            _ => None,
        }
    }

    pub fn is_element(&self, name: &str) -> bool {
        self.tag_name()
            .is_some_and(|tag| tag.eq_ignore_ascii_case(name))
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Root { children } | Node::Element { children, .. } => children,
            Node::Text { .. } | Node::Comment { .. } => &[],
        }
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        match self {
            Node::Element { properties, .. } => properties.get(name),
            _ => None,
        }
    }

    /// Concatenated text of all descendant text nodes, comments excluded.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(node: &Node, out: &mut String) {
    match node {
        Node::Text { value } => out.push_str(value),
        Node::Comment { .. } => {}
        Node::Root { children } | Node::Element { children, .. } => {
            for child in children {
                collect_text(child, out);
            }
        }
    }
}

impl PropertyValue {
    /// Attribute text: lists are space separated, whole numbers lose the fraction.
    pub fn to_attribute_string(&self) -> String {
        match self {
            PropertyValue::Bool(b) => b.to_string(),
            PropertyValue::Number(n) => format_number(*n),
            PropertyValue::String(s) => s.clone(),
            PropertyValue::List(items) => items.join(" "),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(value: Vec<String>) -> Self {
        PropertyValue::List(value)
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
