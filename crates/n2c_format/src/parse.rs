use ego_tree::NodeRef;
use n2c_core::{Node, Properties, PropertyValue};
use scraper::node::Node as HtmlNode;
use scraper::Html;

use crate::names::{is_boolean_attribute, is_token_list_attribute, property_name};

/// Parses an HTML fragment into a root node.
///
/// Attribute names become hast property names; token lists such as `class`
/// become string lists and boolean attributes become `true`.
pub fn parse_html_fragment(html: &str) -> Node {
    let fragment = Html::parse_fragment(html);
    let children = fragment
        .root_element()
        .children()
        .filter_map(convert)
        .collect();
    Node::root(children)
}

fn convert(node: NodeRef<'_, HtmlNode>) -> Option<Node> {
    match node.value() {
        HtmlNode::Text(text) => Some(Node::text(&**text)),
        HtmlNode::Comment(comment) => Some(Node::comment(&**comment)),
        HtmlNode::Element(element) => {
            let mut properties = Properties::new();
            for (name, value) in element.attrs() {
                properties.insert(property_name(name), attribute_value(name, value));
            }
            let children = node.children().filter_map(convert).collect();
            Some(Node::element(element.name(), properties, children))
        }
        _ => None,
    }
}

fn attribute_value(name: &str, value: &str) -> PropertyValue {
    let name = name.to_ascii_lowercase();
    if is_boolean_attribute(&name) {
        return PropertyValue::Bool(true);
    }
    if is_token_list_attribute(&name) {
        return PropertyValue::List(value.split_whitespace().map(str::to_string).collect());
    }
    PropertyValue::String(value.to_string())
}
