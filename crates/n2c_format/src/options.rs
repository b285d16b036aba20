use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::Schema;

/// Sanitization policy: on/off, or a custom ruleset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SanitizeSchema {
    Flag(bool),
    Custom(Box<Schema>),
}

impl SanitizeSchema {
    /// Ruleset to apply, `None` when sanitization is off.
    pub fn ruleset(&self) -> Option<Cow<'_, Schema>> {
        match self {
            SanitizeSchema::Flag(true) => Some(Cow::Owned(Schema::github())),
            SanitizeSchema::Flag(false) => None,
            SanitizeSchema::Custom(schema) => Some(Cow::Borrowed(schema.as_ref())),
        }
    }
}

impl Default for SanitizeSchema {
    fn default() -> Self {
        SanitizeSchema::Flag(true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ListBullet {
    #[default]
    #[serde(rename = "*")]
    Asterisk,
    #[serde(rename = "-")]
    Dash,
    #[serde(rename = "+")]
    Plus,
}

/// Marker for emphasis and strong emphasis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EmphasisMarker {
    #[default]
    #[serde(rename = "*")]
    Asterisk,
    #[serde(rename = "_")]
    Underscore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RuleMarker {
    #[default]
    #[serde(rename = "*")]
    Asterisk,
    #[serde(rename = "-")]
    Dash,
    #[serde(rename = "_")]
    Underscore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FenceMarker {
    #[default]
    #[serde(rename = "`")]
    Backtick,
    #[serde(rename = "~")]
    Tilde,
}

impl ListBullet {
    pub fn as_char(self) -> char {
        match self {
            ListBullet::Asterisk => '*',
            ListBullet::Dash => '-',
            ListBullet::Plus => '+',
        }
    }
}

impl EmphasisMarker {
    pub fn as_char(self) -> char {
        match self {
            EmphasisMarker::Asterisk => '*',
            EmphasisMarker::Underscore => '_',
        }
    }
}

impl RuleMarker {
    pub fn as_char(self) -> char {
        match self {
            RuleMarker::Asterisk => '*',
            RuleMarker::Dash => '-',
            RuleMarker::Underscore => '_',
        }
    }
}

impl FenceMarker {
    pub fn as_char(self) -> char {
        match self {
            FenceMarker::Backtick => '`',
            FenceMarker::Tilde => '~',
        }
    }
}

/// Options forwarded to the serializers. Never carries the sanitize policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Emit `<br />` instead of `<br>`.
    pub close_self_closing: bool,
    pub bullet: ListBullet,
    pub emphasis: EmphasisMarker,
    pub strong: EmphasisMarker,
    pub rule: RuleMarker,
    pub fence: FenceMarker,
}

/// Fully resolved format options.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatOptions {
    pub sanitize_schema: SanitizeSchema,
    #[serde(flatten)]
    pub render: RenderOptions,
}

/// Caller supplied options; every absent field takes its default.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormatOptionsInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sanitize_schema: Option<SanitizeSchema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_self_closing: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bullet: Option<ListBullet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emphasis: Option<EmphasisMarker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strong: Option<EmphasisMarker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<RuleMarker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fence: Option<FenceMarker>,
}

impl FormatOptionsInput {
    pub fn sanitize(schema: SanitizeSchema) -> Self {
        Self {
            sanitize_schema: Some(schema),
            ..Self::default()
        }
    }
}

impl From<FormatOptions> for FormatOptionsInput {
    fn from(options: FormatOptions) -> Self {
        let render = options.render;
        Self {
            sanitize_schema: Some(options.sanitize_schema),
            close_self_closing: Some(render.close_self_closing),
            bullet: Some(render.bullet),
            emphasis: Some(render.emphasis),
            strong: Some(render.strong),
            rule: Some(render.rule),
            fence: Some(render.fence),
        }
    }
}

/// Fills absent fields with defaults; `None` gives the defaults exactly.
pub fn normalize_format_options(input: Option<FormatOptionsInput>) -> FormatOptions {
    let Some(input) = input else {
        return FormatOptions::default();
    };
    let defaults = RenderOptions::default();
    FormatOptions {
        sanitize_schema: input.sanitize_schema.unwrap_or_default(),
        render: RenderOptions {
            close_self_closing: input.close_self_closing.unwrap_or(defaults.close_self_closing),
            bullet: input.bullet.unwrap_or(defaults.bullet),
            emphasis: input.emphasis.unwrap_or(defaults.emphasis),
            strong: input.strong.unwrap_or(defaults.strong),
            rule: input.rule.unwrap_or(defaults.rule),
            fence: input.fence.unwrap_or(defaults.fence),
        },
    }
}
