use n2c_core::Node;
use n2c_format::{parse_html_fragment, sanitize, to_html, RenderOptions, Schema};
use pretty_assertions::assert_eq;
use serde_json::json;

fn clean_html(html: &str, schema: &Schema) -> String {
    let tree = sanitize(&parse_html_fragment(html), schema);
    to_html(&tree, &RenderOptions::default()).unwrap()
}

#[test]
fn raw_html_goes_through_the_default_ruleset() {
    assert_eq!(
        clean_html(
            r#"<p onclick="x()">Hi<script>bad()</script><img src="javascript:alert(1)" alt="i"></p>"#,
            &Schema::github()
        ),
        r#"<p>Hi<img alt="i"></p>"#
    );
}

#[test]
fn disallowed_elements_are_unwrapped() {
    assert_eq!(
        clean_html("<p><font color=\"red\">warm</font> <blink>up</blink></p>", &Schema::github()),
        "<p>warm up</p>"
    );
}

#[test]
fn table_cells_need_a_table_ancestor() {
    assert_eq!(
        clean_html("<div><span>a</span></div>", &Schema::github()),
        "<div><span>a</span></div>"
    );
    let orphan = Node::element("td", Default::default(), vec![Node::text("cell")]);
    assert_eq!(sanitize(&orphan, &Schema::github()), Node::text("cell"));
}

#[test]
fn task_list_classes_and_checkboxes() {
    assert_eq!(
        clean_html(
            r#"<ul class="contains-task-list evil"><li class="task-list-item"><input type="checkbox" checked> done</li></ul>"#,
            &Schema::github()
        ),
        r#"<ul class="contains-task-list"><li class="task-list-item"><input checked disabled type="checkbox"> done</li></ul>"#
    );
}

#[test]
fn allowed_protocols_survive() {
    assert_eq!(
        clean_html(
            r##"<a href="mailto:a@example.com">m</a><a href="#top">t</a><a href="ftp://x">f</a>"##,
            &Schema::github()
        ),
        r##"<a href="mailto:a@example.com">m</a><a href="#top">t</a><a>f</a>"##
    );
}

#[test]
fn comments_only_with_allow_comments() {
    let schema: Schema =
        serde_json::from_value(json!({ "tagNames": ["p"], "allowComments": true })).unwrap();
    assert_eq!(clean_html("<p>a<!--note--></p>", &schema), "<p>a<!--note--></p>");
    assert_eq!(clean_html("<p>a<!--note--></p>", &Schema::github()), "<p>a</p>");
}

#[test]
fn clobbering_does_not_double_prefix() {
    assert_eq!(
        clean_html(r#"<h3 id="user-content-x">x</h3>"#, &Schema::github()),
        r#"<h3 id="user-content-x">x</h3>"#
    );
}
