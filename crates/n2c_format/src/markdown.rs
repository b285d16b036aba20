use n2c_core::{Node, PropertyValue};

use crate::RenderOptions;

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "center", "dd", "details", "dialog",
    "dir", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2",
    "h3", "h4", "h5", "h6", "header", "hgroup", "hr", "html", "li", "main", "menu", "nav", "ol",
    "p", "pre", "section", "summary", "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

// Never rendered.
const SKIPPED_TAGS: &[&str] = &[
    "base", "head", "link", "meta", "noscript", "script", "style", "template", "title",
];

// Always phrasing, whatever they contain.
const ATOMIC_INLINE_TAGS: &[&str] = &["a", "br", "code", "img", "input", "kbd", "samp", "tt"];

/// Serializes a hypertext tree to a Markdown document.
///
/// Blocks are separated by a blank line and the document ends with a single
/// newline. A tree without visible content gives an empty string.
pub fn to_markdown(node: &Node, options: &RenderOptions) -> String {
    let writer = MarkdownWriter { options };
    let blocks = writer.flow(std::slice::from_ref(node));
    if blocks.is_empty() {
        return String::new();
    }
    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}

struct MarkdownWriter<'o> {
    options: &'o RenderOptions,
}

impl MarkdownWriter<'_> {
    /// Renders a run of siblings as blocks. Consecutive phrasing content
    /// becomes one paragraph.
    fn flow(&self, nodes: &[Node]) -> Vec<String> {
        let mut blocks = Vec::new();
        let mut pending: Vec<&Node> = Vec::new();
        for node in nodes {
            if is_flow(node) {
                self.flush_paragraph(&mut pending, &mut blocks);
                self.block(node, &mut blocks);
            } else {
                pending.push(node);
            }
        }
        self.flush_paragraph(&mut pending, &mut blocks);
        blocks
    }

    fn flush_paragraph(&self, pending: &mut Vec<&Node>, blocks: &mut Vec<String>) {
        if pending.is_empty() {
            return;
        }
        let mut inline = Inline::default();
        for node in pending.drain(..) {
            self.phrasing(node, &mut inline);
        }
        let paragraph = escape_line_starts(&inline.finish());
        if !paragraph.is_empty() {
            blocks.push(paragraph);
        }
    }

    fn block(&self, node: &Node, blocks: &mut Vec<String>) {
        let Node::Element {
            tag_name, children, ..
        } = node
        else {
            blocks.extend(self.flow(node.children()));
            return;
        };
        let tag = tag_name.to_ascii_lowercase();
        match tag.as_str() {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = usize::from(tag.as_bytes()[1] - b'0');
                let text = self.phrasing_text(children).replace("\\\n", " ");
                let hashes = "#".repeat(level);
                if text.is_empty() {
                    blocks.push(hashes);
                } else {
                    blocks.push(format!("{hashes} {text}"));
                }
            }
            "blockquote" => {
                let inner = self.flow(children).join("\n\n");
                blocks.push(prefix_lines(&inner, "> ", ">"));
            }
            "ul" => blocks.extend(self.list(node, false)),
            "ol" => blocks.extend(self.list(node, true)),
            "pre" => blocks.push(self.code_block(node)),
            "hr" => blocks.push(self.options.rule.as_char().to_string().repeat(3)),
            "table" => blocks.extend(self.table(node)),
            _ if SKIPPED_TAGS.contains(&tag.as_str()) => {}
            _ => blocks.extend(self.flow(children)),
        }
    }

    fn list(&self, list: &Node, ordered: bool) -> Option<String> {
        let items: Vec<&Node> = list.children().iter().filter(|n| n.is_element("li")).collect();
        if items.is_empty() {
            return None;
        }
        let start = list
            .property("start")
            .and_then(|v| v.to_attribute_string().parse::<u64>().ok())
            .unwrap_or(1);
        let spread = items.iter().any(|item| is_spread(item));
        let separator = if spread { "\n\n" } else { "\n" };

        let rendered: Vec<String> = items
            .iter()
            .zip(0u64..)
            .map(|(item, offset)| {
                let marker = if ordered {
                    format!("{}.", start.saturating_add(offset))
                } else {
                    self.options.bullet.as_char().to_string()
                };
                let (check, rest) = task_check(item.children());
                let mut content = self.flow(rest).join(separator);
                if let Some(checked) = check {
                    let mark = if checked { "[x]" } else { "[ ]" };
                    content = if content.is_empty() {
                        mark.to_string()
                    } else {
                        format!("{mark} {content}")
                    };
                }
                indent_item(&marker, &content)
            })
            .collect();
        Some(rendered.join(separator))
    }

    fn code_block(&self, pre: &Node) -> String {
        let language = pre
            .children()
            .iter()
            .find(|n| n.is_element("code"))
            .and_then(code_language)
            .unwrap_or_default();
        let text = pre.text_content();
        let content = text.strip_suffix('\n').unwrap_or(&text);

        let fence_char = self.options.fence.as_char();
        let fence = fence_char
            .to_string()
            .repeat(longest_run(content, fence_char).max(2) + 1);
        if content.is_empty() {
            format!("{fence}{language}\n{fence}")
        } else {
            format!("{fence}{language}\n{content}\n{fence}")
        }
    }

    fn table(&self, table: &Node) -> Option<String> {
        let mut rows: Vec<&Node> = Vec::new();
        collect_rows(table, &mut rows);
        let cells: Vec<Vec<(String, Option<String>)>> = rows
            .iter()
            .map(|row| {
                row.children()
                    .iter()
                    .filter(|c| c.is_element("td") || c.is_element("th"))
                    .map(|cell| {
                        let text = self.phrasing_text(cell.children()).replace("\\\n", " ");
                        let align = cell.property("align").map(PropertyValue::to_attribute_string);
                        (text.replace('|', "\\|"), align)
                    })
                    .collect()
            })
            .collect();
        let columns = cells.iter().map(Vec::len).max().unwrap_or(0);
        if columns == 0 {
            return None;
        }

        let align: Vec<Option<String>> = (0..columns)
            .map(|i| cells[0].get(i).and_then(|(_, a)| a.clone()))
            .collect();
        let widths: Vec<usize> = (0..columns)
            .map(|i| {
                cells
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|(text, _)| text.chars().count())
                    .max()
                    .unwrap_or(0)
                    .max(3)
            })
            .collect();

        let line = |row: &[(String, Option<String>)]| {
            let padded: Vec<String> = (0..columns)
                .map(|i| {
                    let text = row.get(i).map(|(t, _)| t.as_str()).unwrap_or("");
                    pad_cell(text, widths[i], align[i].as_deref())
                })
                .collect();
            format!("| {} |", padded.join(" | "))
        };
        let delimiter: Vec<String> = (0..columns)
            .map(|i| delimiter_cell(widths[i], align[i].as_deref()))
            .collect();

        let mut lines = vec![
            line(cells[0].as_slice()),
            format!("| {} |", delimiter.join(" | ")),
        ];
        lines.extend(cells[1..].iter().map(|row| line(row.as_slice())));
        Some(lines.join("\n"))
    }

    fn phrasing_text(&self, children: &[Node]) -> String {
        let mut inline = Inline::default();
        for child in children {
            self.phrasing(child, &mut inline);
        }
        inline.finish()
    }

    fn phrasing(&self, node: &Node, inline: &mut Inline) {
        let (tag_name, children) = match node {
            Node::Text { value } => return inline.text(value),
            Node::Comment { .. } => return,
            Node::Root { children } => {
                for child in children {
                    self.phrasing(child, inline);
                }
                return;
            }
            Node::Element {
                tag_name, children, ..
            } => (tag_name.to_ascii_lowercase(), children),
        };

        match tag_name.as_str() {
            "br" => inline.hard_break(),
            "a" => self.link(node, children, inline),
            "img" => {
                let alt = node.property("alt").map(PropertyValue::to_attribute_string);
                let src = node.property("src").map(PropertyValue::to_attribute_string);
                let title = node.property("title").map(PropertyValue::to_attribute_string);
                inline.raw(&format!(
                    "![{}]({})",
                    escape_plain(&alt.unwrap_or_default()),
                    destination(&src.unwrap_or_default(), title.as_deref())
                ));
            }
            "em" | "i" => {
                let marker = self.options.emphasis.as_char().to_string();
                self.wrap(children, &marker, inline);
            }
            "strong" | "b" => {
                let marker = self.options.strong.as_char().to_string().repeat(2);
                self.wrap(children, &marker, inline);
            }
            "del" | "s" | "strike" => self.wrap(children, "~~", inline),
            "q" => self.wrap(children, "\"", inline),
            "code" | "kbd" | "samp" | "tt" => inline.raw(&inline_code(&node.text_content())),
            "input" => {}
            _ if SKIPPED_TAGS.contains(&tag_name.as_str()) => {}
            _ => {
                for child in children {
                    self.phrasing(child, inline);
                }
            }
        }
    }

    fn link(&self, node: &Node, children: &[Node], inline: &mut Inline) {
        let href = node
            .property("href")
            .map(PropertyValue::to_attribute_string)
            .unwrap_or_default();
        let title = node.property("title").map(PropertyValue::to_attribute_string);
        if title.is_none() {
            if let Some(autolink) = autolink(&href, &node.text_content()) {
                inline.raw(&autolink);
                return;
            }
        }
        let inner = self.inner(children);
        if inner.leading_space {
            inline.text(" ");
        }
        inline.raw(&format!(
            "[{}]({})",
            inner.text,
            destination(&href, title.as_deref())
        ));
        if inner.trailing_space {
            inline.text(" ");
        }
    }

    /// Emits `marker content marker`, keeping outer whitespace outside the markers.
    fn wrap(&self, children: &[Node], marker: &str, inline: &mut Inline) {
        let inner = self.inner(children);
        if inner.leading_space {
            inline.text(" ");
        }
        if !inner.text.is_empty() {
            inline.raw(&format!("{marker}{}{marker}", inner.text));
        }
        if inner.trailing_space {
            inline.text(" ");
        }
    }

    fn inner(&self, children: &[Node]) -> InnerText {
        let mut nested = Inline::keeping_leading_space();
        for child in children {
            self.phrasing(child, &mut nested);
        }
        let raw = nested.out;
        InnerText {
            leading_space: raw.starts_with(' '),
            trailing_space: raw.ends_with(' '),
            text: raw.trim_matches(' ').to_string(),
        }
    }
}

struct InnerText {
    text: String,
    leading_space: bool,
    trailing_space: bool,
}

/// Phrasing buffer: collapses whitespace and escapes text as it is appended.
#[derive(Default)]
struct Inline {
    out: String,
    last: Option<char>,
    keep_leading_space: bool,
}

impl Inline {
    fn keeping_leading_space() -> Self {
        Self {
            keep_leading_space: true,
            ..Self::default()
        }
    }

    fn text(&mut self, text: &str) {
        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            if ch.is_ascii_whitespace() {
                let at_start = self.last.is_none() && !self.keep_leading_space;
                if at_start || matches!(self.last, Some(' ') | Some('\n')) {
                    continue;
                }
                self.push(' ');
                continue;
            }
            let escape = match ch {
                '\\' | '*' | '`' | '[' | ']' | '<' => true,
                '&' => chars.peek().is_some_and(|c| *c == '#' || c.is_ascii_alphabetic()),
                '_' => {
                    let word_before = self.last.is_some_and(char::is_alphanumeric);
                    let word_after = chars.peek().is_some_and(|c| c.is_alphanumeric());
                    !(word_before && word_after)
                }
                _ => false,
            };
            if escape {
                self.out.push('\\');
            }
            self.push(ch);
        }
    }

    fn raw(&mut self, markup: &str) {
        self.out.push_str(markup);
        if let Some(last) = markup.chars().last() {
            self.last = Some(last);
        }
    }

    fn hard_break(&mut self) {
        let trimmed = self.out.trim_end_matches(' ').len();
        self.out.truncate(trimmed);
        if self.out.is_empty() {
            return;
        }
        self.out.push_str("\\\n");
        self.last = Some('\n');
    }

    fn push(&mut self, ch: char) {
        self.out.push(ch);
        self.last = Some(ch);
    }

    fn finish(self) -> String {
        let mut text = self.out.trim_matches(' ');
        while let Some(rest) = text.strip_suffix("\\\n") {
            text = rest.trim_end_matches(' ');
        }
        text.trim().to_string()
    }
}

fn is_flow(node: &Node) -> bool {
    match node {
        Node::Root { .. } => true,
        Node::Text { .. } | Node::Comment { .. } => false,
        Node::Element { tag_name, children, .. } => {
            let tag = tag_name.to_ascii_lowercase();
            if BLOCK_TAGS.contains(&tag.as_str()) {
                return true;
            }
            if SKIPPED_TAGS.contains(&tag.as_str()) || ATOMIC_INLINE_TAGS.contains(&tag.as_str()) {
                return false;
            }
            children.iter().any(is_flow)
        }
    }
}

// A list item is spread when it holds a paragraph next to other blocks.
fn is_spread(item: &Node) -> bool {
    let blocks = item.children().iter().filter(|c| is_flow(c)).count();
    blocks > 1 && item.children().iter().any(|c| c.is_element("p"))
}

/// Splits a leading checkbox off a list item's children.
fn task_check(children: &[Node]) -> (Option<bool>, &[Node]) {
    let first = children
        .iter()
        .position(|c| !matches!(c, Node::Text { value } if value.trim().is_empty()));
    let Some(index) = first else {
        return (None, children);
    };
    let node = &children[index];
    let is_checkbox = node.is_element("input")
        && node.property("type").and_then(PropertyValue::as_str) == Some("checkbox");
    if !is_checkbox {
        return (None, children);
    }
    let checked = matches!(node.property("checked"), Some(PropertyValue::Bool(true)));
    (Some(checked), &children[index + 1..])
}

fn indent_item(marker: &str, content: &str) -> String {
    if content.is_empty() {
        return marker.to_string();
    }
    let indent = " ".repeat(marker.chars().count() + 1);
    let mut out = String::new();
    for (i, line) in content.split('\n').enumerate() {
        if i == 0 {
            out.push_str(marker);
            out.push(' ');
            out.push_str(line);
        } else {
            out.push('\n');
            if !line.is_empty() {
                out.push_str(&indent);
                out.push_str(line);
            }
        }
    }
    out
}

fn prefix_lines(text: &str, prefix: &str, empty: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.is_empty() {
                empty.to_string()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn code_language(code: &Node) -> Option<String> {
    let tokens: Vec<String> = match code.property("className")? {
        PropertyValue::List(items) => items.clone(),
        other => other
            .to_attribute_string()
            .split_whitespace()
            .map(str::to_string)
            .collect(),
    };
    tokens.iter().find_map(|token| {
        token
            .strip_prefix("language-")
            .or_else(|| token.strip_prefix("lang-"))
            .filter(|lang| !lang.is_empty())
            .map(str::to_string)
    })
}

fn longest_run(text: &str, target: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for ch in text.chars() {
        if ch == target {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

fn inline_code(text: &str) -> String {
    let text = text.replace(['\n', '\r'], " ");
    let fence = "`".repeat(longest_run(&text, '`') + 1);
    let needs_padding = text.starts_with('`')
        || text.ends_with('`')
        || (text.starts_with(' ') && text.ends_with(' ') && !text.trim().is_empty());
    if needs_padding {
        format!("{fence} {text} {fence}")
    } else {
        format!("{fence}{text}{fence}")
    }
}

fn collect_rows<'a>(node: &'a Node, rows: &mut Vec<&'a Node>) {
    for child in node.children() {
        if child.is_element("tr") {
            rows.push(child);
        } else if child.is_element("thead") || child.is_element("tbody") || child.is_element("tfoot")
        {
            collect_rows(child, rows);
        }
    }
}

fn pad_cell(text: &str, width: usize, align: Option<&str>) -> String {
    let gap = width.saturating_sub(text.chars().count());
    match align {
        Some("right") => format!("{}{text}", " ".repeat(gap)),
        Some("center") => {
            let left = gap / 2;
            format!("{}{text}{}", " ".repeat(left), " ".repeat(gap - left))
        }
        _ => format!("{text}{}", " ".repeat(gap)),
    }
}

fn delimiter_cell(width: usize, align: Option<&str>) -> String {
    match align {
        Some("left") => format!(":{}", "-".repeat(width - 1)),
        Some("right") => format!("{}:", "-".repeat(width - 1)),
        Some("center") => format!(":{}:", "-".repeat(width - 2)),
        _ => "-".repeat(width),
    }
}

/// `<url>` when the link text is the URL itself and the URL has a scheme.
fn autolink(href: &str, text: &str) -> Option<String> {
    let colon = href.find(':')?;
    let scheme = &href[..colon];
    let valid_scheme = scheme.len() >= 2
        && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'));
    let plain = !href.contains(|c: char| c.is_whitespace() || c.is_control() || c == '<' || c == '>');
    if !valid_scheme || !plain {
        return None;
    }
    if text == href {
        return Some(format!("<{href}>"));
    }
    match href.strip_prefix("mailto:") {
        Some(address) if address == text => Some(format!("<{address}>")),
        _ => None,
    }
}

fn destination(url: &str, title: Option<&str>) -> String {
    let mut out = if url.is_empty() {
        if title.is_some() {
            "<>".to_string()
        } else {
            String::new()
        }
    } else if url.contains(|c: char| c.is_whitespace() || c.is_control() || c == '<' || c == '>') {
        format!("<{}>", url.replace('<', "\\<").replace('>', "\\>"))
    } else {
        url.replace('(', "\\(").replace(')', "\\)")
    };
    if let Some(title) = title {
        out.push_str(&format!(" \"{}\"", title.replace('"', "\\\"")));
    }
    out
}

fn escape_plain(text: &str) -> String {
    let mut inline = Inline::default();
    inline.text(text);
    inline.out
}

/// Escapes characters that would turn a paragraph line into another block.
fn escape_line_starts(paragraph: &str) -> String {
    paragraph
        .split('\n')
        .map(|line| {
            let digits = line.chars().take_while(char::is_ascii_digit).count();
            if line.starts_with(['#', '>', '+', '-', '=']) {
                format!("\\{line}")
            } else if digits > 0 && line[digits..].starts_with(['.', ')']) {
                format!("{}\\{}", &line[..digits], &line[digits..])
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
