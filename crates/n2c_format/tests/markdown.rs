use n2c_format::{parse_html_fragment, to_markdown, RenderOptions};
use pretty_assertions::assert_eq;

fn md(html: &str) -> String {
    to_markdown(&parse_html_fragment(html), &RenderOptions::default())
}

#[test]
fn headings_and_inline_markup() {
    assert_eq!(
        md("<h1>Title</h1><p>Some <strong>bold</strong> and <code>code</code>.</p>"),
        "# Title\n\nSome **bold** and `code`.\n"
    );
    assert_eq!(md("<p><del>gone</del></p>"), "~~gone~~\n");
    assert_eq!(md("<p>a<br>b</p>"), "a\\\nb\n");
}

#[test]
fn tight_and_nested_lists() {
    assert_eq!(
        md("<ul><li>one</li><li>two<ul><li>nested</li></ul></li></ul>"),
        "* one\n* two\n  * nested\n"
    );
    assert_eq!(md(r#"<ol start="3"><li>a</li><li>b</li></ol>"#), "3. a\n4. b\n");
}

#[test]
fn loose_list_items_are_separated_by_blank_lines() {
    assert_eq!(
        md("<ul><li><p>a</p><p>b</p></li><li><p>c</p></li></ul>"),
        "* a\n\n  b\n\n* c\n"
    );
}

#[test]
fn task_list_items() {
    assert_eq!(
        md(r#"<ul><li><input type="checkbox" checked> done</li><li><input type="checkbox"> todo</li></ul>"#),
        "* [x] done\n* [ ] todo\n"
    );
}

#[test]
fn fenced_code_keeps_language() {
    assert_eq!(
        md("<pre><code class=\"language-rust\">fn main() {}\n</code></pre>"),
        "```rust\nfn main() {}\n```\n"
    );
    assert_eq!(
        md("<pre><code>a\n```\nb</code></pre>"),
        "````\na\n```\nb\n````\n"
    );
}

#[test]
fn tables_are_padded_and_aligned() {
    let html = concat!(
        "<table><thead><tr><th>Name</th><th align=\"right\">Qty</th></tr></thead>",
        "<tbody><tr><td>Kale</td><td>3</td></tr></tbody></table>"
    );
    assert_eq!(
        md(html),
        "| Name | Qty |\n| ---- | --: |\n| Kale |   3 |\n"
    );
}

#[test]
fn blockquotes_prefix_every_line() {
    assert_eq!(
        md("<blockquote><p>a</p><p>b</p></blockquote>"),
        "> a\n>\n> b\n"
    );
}

#[test]
fn links_and_images() {
    assert_eq!(
        md(r#"<p><a href="https://example.com">https://example.com</a> and <a href="/x" title="T">x</a></p>"#),
        "<https://example.com> and [x](/x \"T\")\n"
    );
    assert_eq!(md(r#"<img src="a.png" alt="A">"#), "![A](a.png)\n");
}

#[test]
fn whitespace_only_content_renders_empty() {
    assert_eq!(md("  \n  "), "");
    assert_eq!(md("<div> </div>"), "");
}
