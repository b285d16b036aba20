//! notion2content format: sanitizing serializers for content records.
mod error;
mod frontmatter;
mod html;
mod markdown;
mod names;
mod options;
mod parse;
mod pipeline;
mod sanitize;
mod schema;

pub use error::FormatError;
pub use frontmatter::to_frontmatter;
pub use html::to_html;
pub use markdown::to_markdown;
pub use options::{
    normalize_format_options, EmphasisMarker, FenceMarker, FormatOptions, FormatOptionsInput,
    ListBullet, RenderOptions, RuleMarker, SanitizeSchema,
};
pub use parse::parse_html_fragment;
pub use pipeline::{
    to_frontmatter_string, to_html_string, to_markdown_string, FormatPipeline, HastSerializer,
    Serializer,
};
pub use sanitize::{sanitize, HastSanitizer, Sanitizer};
pub use schema::{AllowedValue, AttributeRule, Schema};
