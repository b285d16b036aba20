use std::collections::BTreeMap;

use n2c_core::{Properties, PropertyValue};
use serde::{Deserialize, Serialize};

/// Sanitization ruleset: which elements, properties and URL schemes survive.
///
/// Reads the JSON shape used by `hast-util-sanitize` schemas, keyed by hast
/// property names. A custom schema replaces the default one entirely.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Schema {
    /// Elements kept as elements. Others are replaced by their children.
    pub tag_names: Vec<String>,
    /// Allowed properties per tag name; `*` applies to every element.
    pub attributes: BTreeMap<String, Vec<AttributeRule>>,
    /// Properties that must be present on an element, added when missing.
    pub required: BTreeMap<String, Properties>,
    /// Elements only allowed somewhere below one of the listed ancestors.
    pub ancestors: BTreeMap<String, Vec<String>>,
    /// Allowed URL schemes per property. Values without a scheme always pass.
    pub protocols: BTreeMap<String, Vec<String>>,
    /// Elements dropped together with their content.
    pub strip: Vec<String>,
    /// Properties whose values get `clobber_prefix` prepended.
    pub clobber: Vec<String>,
    pub clobber_prefix: String,
    pub allow_comments: bool,
}

/// A property allowed on an element, optionally limited to some values.
///
/// Written as `"name"` or `["name", value, ...]` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRule", into = "RawRule")]
pub struct AttributeRule {
    pub name: String,
    pub values: Option<Vec<AllowedValue>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AllowedValue {
    Bool(bool),
    Number(f64),
    String(String),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawRule {
    Name(String),
    Constrained(Vec<AllowedValue>),
}

impl TryFrom<RawRule> for AttributeRule {
    type Error = String;

    fn try_from(raw: RawRule) -> Result<Self, Self::Error> {
        match raw {
            RawRule::Name(name) => Ok(AttributeRule::any(name)),
            RawRule::Constrained(mut items) => {
                if items.is_empty() {
                    return Err("attribute rule needs a property name".to_string());
                }
                match items.remove(0) {
                    AllowedValue::String(name) => Ok(AttributeRule {
                        name,
                        values: Some(items),
                    }),
                    other => Err(format!("attribute rule must start with a name, got {other:?}")),
                }
            }
        }
    }
}

impl From<AttributeRule> for RawRule {
    fn from(rule: AttributeRule) -> Self {
        match rule.values {
            None => RawRule::Name(rule.name),
            Some(values) => {
                let mut items = Vec::with_capacity(values.len() + 1);
                items.push(AllowedValue::String(rule.name));
                items.extend(values);
                RawRule::Constrained(items)
            }
        }
    }
}

impl AttributeRule {
    pub fn any(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: None,
        }
    }

    pub fn only(name: impl Into<String>, values: Vec<AllowedValue>) -> Self {
        Self {
            name: name.into(),
            values: Some(values),
        }
    }

    /// `data*` stands for every `dataFoo` property.
    pub fn matches(&self, property: &str) -> bool {
        if self.name == "data*" {
            return property
                .strip_prefix("data")
                .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_uppercase()));
        }
        self.name == property
    }

    pub fn allows(&self, value: &PropertyValue) -> bool {
        let Some(values) = &self.values else {
            return true;
        };
        values.iter().any(|allowed| allowed.matches(value))
    }
}

impl AllowedValue {
    pub fn matches(&self, value: &PropertyValue) -> bool {
        match (self, value) {
            (AllowedValue::Bool(a), PropertyValue::Bool(b)) => a == b,
            (AllowedValue::Number(a), PropertyValue::Number(b)) => a == b,
            (AllowedValue::String(a), PropertyValue::String(b)) => a == b,
            (AllowedValue::Number(a), PropertyValue::String(b)) => b.parse::<f64>() == Ok(*a),
            _ => false,
        }
    }
}

impl Schema {
    /// Rules for `property` on `tag_name`: tag specific rules first, then `*`.
    pub fn rule_for(&self, tag_name: &str, property: &str) -> Option<&AttributeRule> {
        let specific = self.attributes.get(tag_name).into_iter().flatten();
        let global = self.attributes.get("*").into_iter().flatten();
        specific.chain(global).find(|rule| rule.matches(property))
    }

    pub fn allows_tag(&self, tag_name: &str) -> bool {
        self.tag_names.iter().any(|t| t == tag_name)
    }

    pub fn strips(&self, tag_name: &str) -> bool {
        self.strip.iter().any(|t| t == tag_name)
    }

    pub fn clobbers(&self, property: &str) -> bool {
        self.clobber.iter().any(|p| p == property)
    }

    /// GitHub-style ruleset used when sanitization is simply switched on.
    pub fn github() -> Self {
        let mut attributes: BTreeMap<String, Vec<AttributeRule>> = BTreeMap::new();
        let names = |list: &[&str]| -> Vec<AttributeRule> {
            list.iter().map(|n| AttributeRule::any(*n)).collect()
        };
        let text = |s: &str| AllowedValue::String(s.to_string());

        attributes.insert(
            "a".into(),
            names(&["ariaDescribedBy", "ariaLabel", "ariaLabelledBy"]),
        );
        attributes.insert("blockquote".into(), names(&["cite"]));
        attributes.insert("code".into(), names(&["className"]));
        attributes.insert("del".into(), names(&["cite"]));
        attributes.insert("div".into(), names(&["itemScope", "itemType"]));
        attributes.insert(
            "h2".into(),
            vec![AttributeRule::only("className", vec![text("sr-only")])],
        );
        attributes.insert("img".into(), names(&["longDesc"]));
        attributes.insert(
            "input".into(),
            vec![
                AttributeRule::only("disabled", vec![AllowedValue::Bool(true)]),
                AttributeRule::only("type", vec![text("checkbox")]),
            ],
        );
        attributes.insert("ins".into(), names(&["cite"]));
        attributes.insert(
            "li".into(),
            vec![AttributeRule::only("className", vec![text("task-list-item")])],
        );
        attributes.insert(
            "ol".into(),
            vec![AttributeRule::only("className", vec![text("contains-task-list")])],
        );
        attributes.insert("q".into(), names(&["cite"]));
        attributes.insert("section".into(), names(&["dataFootnotes"]));
        attributes.insert("source".into(), names(&["srcSet"]));
        attributes.insert(
            "ul".into(),
            vec![AttributeRule::only("className", vec![text("contains-task-list")])],
        );
        attributes.insert("*".into(), names(GLOBAL_ATTRIBUTES));

        let mut required = BTreeMap::new();
        let mut input = Properties::new();
        input.insert("disabled".into(), PropertyValue::Bool(true));
        input.insert("type".into(), "checkbox".into());
        required.insert("input".to_string(), input);

        let mut ancestors = BTreeMap::new();
        for tag in ["tbody", "td", "tfoot", "th", "thead", "tr"] {
            ancestors.insert(tag.to_string(), vec!["table".to_string()]);
        }
        ancestors.insert("li".to_string(), vec!["ol".to_string(), "ul".to_string()]);

        let mut protocols = BTreeMap::new();
        let strings = |list: &[&str]| -> Vec<String> { list.iter().map(|s| s.to_string()).collect() };
        protocols.insert("cite".to_string(), strings(&["http", "https"]));
        protocols.insert(
            "href".to_string(),
            strings(&["http", "https", "irc", "ircs", "mailto", "xmpp"]),
        );
        protocols.insert("longDesc".to_string(), strings(&["http", "https"]));
        protocols.insert("src".to_string(), strings(&["http", "https"]));

        Schema {
            tag_names: TAG_NAMES.iter().map(|t| t.to_string()).collect(),
            attributes,
            required,
            ancestors,
            protocols,
            strip: vec!["script".to_string()],
            clobber: strings(&["ariaDescribedBy", "ariaLabelledBy", "id", "name"]),
            clobber_prefix: "user-content-".to_string(),
            allow_comments: false,
        }
    }
}

const TAG_NAMES: &[&str] = &[
    "a", "b", "blockquote", "br", "code", "dd", "del", "details", "div", "dl", "dt", "em", "h1",
    "h2", "h3", "h4", "h5", "h6", "hr", "i", "img", "input", "ins", "kbd", "li", "ol", "p",
    "picture", "pre", "q", "rp", "rt", "ruby", "s", "samp", "section", "source", "span", "strike",
    "strong", "sub", "summary", "sup", "table", "tbody", "td", "tfoot", "th", "thead", "tr", "tt",
    "ul", "var",
];

const GLOBAL_ATTRIBUTES: &[&str] = &[
    "abbr", "accept", "acceptCharset", "accessKey", "action", "align", "alt", "axis", "border",
    "cellPadding", "cellSpacing", "char", "charOff", "charSet", "checked", "clear", "colSpan",
    "color", "cols", "compact", "coords", "dateTime", "dir", "encType", "frame", "hSpace",
    "headers", "height", "href", "hrefLang", "htmlFor", "id", "isMap", "itemProp", "label",
    "lang", "maxLength", "media", "method", "multiple", "name", "noHref", "noShade", "noWrap",
    "open", "prompt", "readOnly", "rev", "rowSpan", "rows", "rules", "scope", "selected",
    "shape", "size", "span", "src", "start", "summary", "tabIndex", "title", "useMap", "vAlign",
    "value", "width",
];

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rules_read_plain_and_constrained_forms() {
        let schema: Schema = serde_json::from_value(json!({
            "tagNames": ["a", "input"],
            "attributes": {
                "a": ["href"],
                "input": [["type", "checkbox"], ["disabled", true]]
            }
        }))
        .unwrap();
        assert_eq!(schema.attributes["a"], vec![AttributeRule::any("href")]);
        assert_eq!(
            schema.attributes["input"],
            vec![
                AttributeRule::only("type", vec![AllowedValue::String("checkbox".into())]),
                AttributeRule::only("disabled", vec![AllowedValue::Bool(true)]),
            ]
        );
        assert!(!schema.allow_comments);
        assert!(schema.strip.is_empty());
    }

    #[test]
    fn constrained_rule_without_name_is_rejected() {
        let err = serde_json::from_value::<Schema>(json!({ "attributes": { "a": [[true]] } }));
        assert!(err.is_err());
    }

    #[test]
    fn data_wildcard_matches_data_properties() {
        let rule = AttributeRule::any("data*");
        assert!(rule.matches("dataFoo"));
        assert!(!rule.matches("database"));
    }

    #[test]
    fn tag_rules_take_precedence_over_global() {
        let schema = Schema::github();
        let rule = schema.rule_for("li", "className").unwrap();
        assert!(rule.allows(&"task-list-item".into()));
        assert!(!rule.allows(&"other".into()));
        assert!(schema.rule_for("span", "href").is_some());
        assert!(schema.rule_for("span", "onclick").is_none());
    }
}
