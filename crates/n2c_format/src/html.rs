use std::fmt::Write;

use n2c_core::{Node, Properties, PropertyValue};

use crate::names::attribute_name;
use crate::{FormatError, RenderOptions};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "image", "img",
    "input", "keygen", "link", "meta", "param", "source", "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Serializes a hypertext tree to an HTML fragment.
pub fn to_html(node: &Node, options: &RenderOptions) -> Result<String, FormatError> {
    let mut out = String::new();
    write_node(&mut out, node, options, false)?;
    Ok(out)
}

fn write_node(
    out: &mut String,
    node: &Node,
    options: &RenderOptions,
    raw_text: bool,
) -> Result<(), FormatError> {
    match node {
        Node::Root { children } => {
            for child in children {
                write_node(out, child, options, raw_text)?;
            }
        }
        Node::Text { value } if raw_text => out.push_str(value),
        Node::Text { value } => escape_text(out, value),
        Node::Comment { value } => write!(out, "<!--{value}-->")?,
        Node::Element {
            tag_name,
            properties,
            children,
        } => {
            let tag = tag_name.to_ascii_lowercase();
            write!(out, "<{tag}")?;
            write_attributes(out, properties)?;

            if VOID_ELEMENTS.contains(&tag.as_str()) {
                out.push_str(if options.close_self_closing { " />" } else { ">" });
                return Ok(());
            }
            out.push('>');
            let raw = RAW_TEXT_ELEMENTS.contains(&tag.as_str());
            for child in children {
                write_node(out, child, options, raw)?;
            }
            write!(out, "</{tag}>")?;
        }
    }
    Ok(())
}

fn write_attributes(out: &mut String, properties: &Properties) -> Result<(), FormatError> {
    for (name, value) in properties {
        let attribute = attribute_name(name);
        match value {
            PropertyValue::Bool(false) => {}
            PropertyValue::Bool(true) => write!(out, " {attribute}")?,
            other => {
                write!(out, " {attribute}=\"")?;
                escape_attribute(out, &other.to_attribute_string());
                out.push('"');
            }
        }
    }
    Ok(())
}

fn escape_text(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attribute(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
