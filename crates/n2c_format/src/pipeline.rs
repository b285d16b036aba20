use std::borrow::Cow;

use n2c_core::{ContentRecord, Node, Props};
use n2c_logging::n2c_debug;

use crate::sanitize::{HastSanitizer, Sanitizer};
use crate::{
    frontmatter, html, markdown, normalize_format_options, FormatError, FormatOptions,
    FormatOptionsInput, RenderOptions,
};

/// Renders trees and props to text.
pub trait Serializer: Send + Sync {
    fn to_html(&self, node: &Node, options: &RenderOptions) -> Result<String, FormatError>;
    fn to_markdown(&self, node: &Node, options: &RenderOptions) -> Result<String, FormatError>;
    fn to_frontmatter(&self, props: Option<&Props>) -> Result<String, FormatError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HastSerializer;

impl Serializer for HastSerializer {
    fn to_html(&self, node: &Node, options: &RenderOptions) -> Result<String, FormatError> {
        html::to_html(node, options)
    }

    fn to_markdown(&self, node: &Node, options: &RenderOptions) -> Result<String, FormatError> {
        Ok(markdown::to_markdown(node, options))
    }

    fn to_frontmatter(&self, props: Option<&Props>) -> Result<String, FormatError> {
        frontmatter::to_frontmatter(props)
    }
}

/// Optional sanitization followed by serialization.
#[derive(Debug, Default, Clone)]
pub struct FormatPipeline<S = HastSanitizer, R = HastSerializer> {
    sanitizer: S,
    serializer: R,
}

impl FormatPipeline {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: Sanitizer, R: Serializer> FormatPipeline<S, R> {
    pub fn with_parts(sanitizer: S, serializer: R) -> Self {
        Self {
            sanitizer,
            serializer,
        }
    }

    /// Front-matter for the record's props. Content and sanitize policy are ignored.
    pub fn to_frontmatter_string(
        &self,
        record: &ContentRecord,
        _options: Option<FormatOptionsInput>,
    ) -> Result<String, FormatError> {
        self.serializer.to_frontmatter(record.props.as_ref())
    }

    pub fn to_html_string(
        &self,
        record: &ContentRecord,
        options: Option<FormatOptionsInput>,
    ) -> Result<String, FormatError> {
        let options = normalize_format_options(options);
        match self.prepared_content(record, &options, "html") {
            Some(content) => self.serializer.to_html(&content, &options.render),
            None => Ok(String::new()),
        }
    }

    pub fn to_markdown_string(
        &self,
        record: &ContentRecord,
        options: Option<FormatOptionsInput>,
    ) -> Result<String, FormatError> {
        let options = normalize_format_options(options);
        match self.prepared_content(record, &options, "markdown") {
            Some(content) => self.serializer.to_markdown(&content, &options.render),
            None => Ok(String::new()),
        }
    }

    fn prepared_content<'r>(
        &self,
        record: &'r ContentRecord,
        options: &FormatOptions,
        target: &str,
    ) -> Option<Cow<'r, Node>> {
        let content = record.content.as_ref()?;
        let ruleset = options.sanitize_schema.ruleset();
        n2c_debug!(
            "rendering {} for record {} sanitized={}",
            target,
            record.id,
            ruleset.is_some()
        );
        Some(match ruleset {
            Some(schema) => Cow::Owned(self.sanitizer.sanitize(content, &schema)),
            None => Cow::Borrowed(content),
        })
    }
}

pub fn to_frontmatter_string(
    record: &ContentRecord,
    options: Option<FormatOptionsInput>,
) -> Result<String, FormatError> {
    FormatPipeline::new().to_frontmatter_string(record, options)
}

pub fn to_html_string(
    record: &ContentRecord,
    options: Option<FormatOptionsInput>,
) -> Result<String, FormatError> {
    FormatPipeline::new().to_html_string(record, options)
}

pub fn to_markdown_string(
    record: &ContentRecord,
    options: Option<FormatOptionsInput>,
) -> Result<String, FormatError> {
    FormatPipeline::new().to_markdown_string(record, options)
}
