use serde::{Deserialize, Serialize};

use crate::Node;

/// Flat key/value metadata of a record, in insertion order.
pub type Props = serde_json::Map<String, serde_json::Value>;

/// One item yielded by the content engine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<Props>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Node>,
}

impl ContentRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_props(mut self, props: Props) -> Self {
        self.props = Some(props);
        self
    }

    pub fn with_content(mut self, content: Node) -> Self {
        self.content = Some(content);
        self
    }
}
