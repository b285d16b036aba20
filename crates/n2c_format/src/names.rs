//! Mapping between HTML attribute names and hast property names.

// (attribute, property) pairs that do not follow the data/aria rules.
const CAMEL_CASED: &[(&str, &str)] = &[
    ("accept-charset", "acceptCharset"),
    ("accesskey", "accessKey"),
    ("cellpadding", "cellPadding"),
    ("cellspacing", "cellSpacing"),
    ("charoff", "charOff"),
    ("charset", "charSet"),
    ("class", "className"),
    ("colspan", "colSpan"),
    ("datetime", "dateTime"),
    ("enctype", "encType"),
    ("for", "htmlFor"),
    ("hreflang", "hrefLang"),
    ("hspace", "hSpace"),
    ("http-equiv", "httpEquiv"),
    ("ismap", "isMap"),
    ("itemprop", "itemProp"),
    ("itemscope", "itemScope"),
    ("itemtype", "itemType"),
    ("longdesc", "longDesc"),
    ("maxlength", "maxLength"),
    ("nohref", "noHref"),
    ("noshade", "noShade"),
    ("nowrap", "noWrap"),
    ("readonly", "readOnly"),
    ("rowspan", "rowSpan"),
    ("srcset", "srcSet"),
    ("tabindex", "tabIndex"),
    ("usemap", "useMap"),
    ("valign", "vAlign"),
];

const ARIA_CAMEL_CASED: &[(&str, &str)] = &[
    ("activedescendant", "ActiveDescendant"),
    ("describedby", "DescribedBy"),
    ("labelledby", "LabelledBy"),
    ("valuemax", "ValueMax"),
    ("valuemin", "ValueMin"),
    ("valuenow", "ValueNow"),
    ("valuetext", "ValueText"),
];

/// Attributes whose mere presence means `true`.
const BOOLEAN_ATTRIBUTES: &[&str] = &[
    "allowfullscreen",
    "async",
    "autofocus",
    "autoplay",
    "checked",
    "controls",
    "default",
    "defer",
    "disabled",
    "hidden",
    "ismap",
    "itemscope",
    "loop",
    "multiple",
    "muted",
    "nohref",
    "noshade",
    "novalidate",
    "nowrap",
    "open",
    "readonly",
    "required",
    "reversed",
    "selected",
];

/// Attributes holding whitespace separated tokens.
const TOKEN_LIST_ATTRIBUTES: &[&str] = &[
    "aria-describedby",
    "aria-labelledby",
    "class",
    "headers",
    "rel",
];

/// `data-foo-bar` -> `dataFooBar`, `class` -> `className`, `aria-label` -> `ariaLabel`.
pub fn property_name(attribute: &str) -> String {
    let attribute = attribute.to_ascii_lowercase();
    if let Some((_, property)) = CAMEL_CASED.iter().find(|(a, _)| *a == attribute) {
        return (*property).to_string();
    }
    if let Some(rest) = attribute.strip_prefix("data-") {
        return format!("data{}", camel_segments(rest));
    }
    if let Some(rest) = attribute.strip_prefix("aria-") {
        let tail = ARIA_CAMEL_CASED
            .iter()
            .find(|(a, _)| *a == rest)
            .map(|(_, p)| (*p).to_string())
            .unwrap_or_else(|| capitalize(rest));
        return format!("aria{tail}");
    }
    attribute
}

/// Inverse of [`property_name`].
pub fn attribute_name(property: &str) -> String {
    if let Some((attribute, _)) = CAMEL_CASED.iter().find(|(_, p)| *p == property) {
        return (*attribute).to_string();
    }
    if let Some(rest) = prefixed(property, "data") {
        return format!("data{}", kebab(rest));
    }
    if let Some(rest) = prefixed(property, "aria") {
        return format!("aria-{}", rest.to_ascii_lowercase());
    }
    property.to_ascii_lowercase()
}

pub fn is_boolean_attribute(attribute: &str) -> bool {
    BOOLEAN_ATTRIBUTES.contains(&attribute)
}

pub fn is_token_list_attribute(attribute: &str) -> bool {
    TOKEN_LIST_ATTRIBUTES.contains(&attribute)
}

// `prefix` followed by an uppercase letter, as in `dataFoo`.
fn prefixed<'a>(property: &'a str, prefix: &str) -> Option<&'a str> {
    property
        .strip_prefix(prefix)
        .filter(|rest| rest.starts_with(|c: char| c.is_ascii_uppercase()))
}

fn camel_segments(kebab: &str) -> String {
    kebab.split('-').map(capitalize).collect()
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

fn kebab(camel: &str) -> String {
    let mut out = String::with_capacity(camel.len() + 4);
    for ch in camel.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
