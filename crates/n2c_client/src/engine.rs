use std::sync::Arc;

use futures_util::stream::BoxStream;
use n2c_core::ContentRecord;
use n2c_logging::n2c_info;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Client, ClientError, ClientOpts, ContentClient, QueryRequest};

/// Lazy sequence of records produced by a content engine.
pub type ContentStream<E> = BoxStream<'static, Result<ContentRecord, E>>;

/// Parts of a record the engine should fill in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Props,
    Content,
}

/// Content selection handed to the engine. Item and tree options belong to
/// the engine and are passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentOptions {
    pub target: Vec<Target>,
    pub query: QueryRequest,
    #[serde(default)]
    pub to_items_opts: Value,
    #[serde(default)]
    pub to_hast_opts: Value,
}

impl ContentOptions {
    pub fn new(query: QueryRequest) -> Self {
        Self {
            target: vec![Target::Props, Target::Content],
            query,
            to_items_opts: Value::Object(Default::default()),
            to_hast_opts: Value::Object(Default::default()),
        }
    }
}

/// Engine that drives pagination and turns remote blocks into records.
///
/// It depends only on [`ContentClient`], never on a concrete client.
pub trait ContentEngine {
    type Error;

    fn to_content(
        &self,
        client: Arc<dyn ContentClient>,
        options: ContentOptions,
    ) -> ContentStream<Self::Error>;
}

/// Builds a [`Client`] for `client_opts` and hands it to `engine`.
pub fn to_content<E: ContentEngine>(
    engine: &E,
    client_opts: ClientOpts,
    options: ContentOptions,
) -> Result<ContentStream<E::Error>, ClientError> {
    let client = Client::new(client_opts)?;
    Ok(to_content_with(engine, Arc::new(client), options))
}

/// Runs `engine` against an already constructed client.
pub fn to_content_with<E: ContentEngine>(
    engine: &E,
    client: Arc<dyn ContentClient>,
    options: ContentOptions,
) -> ContentStream<E::Error> {
    n2c_info!(
        "to_content database_id={} targets={:?}",
        options.query.database_id,
        options.target
    );
    engine.to_content(client, options)
}
