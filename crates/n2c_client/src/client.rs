use std::fmt;
use std::future::{self, Ready};
use std::sync::Arc;

use n2c_logging::{n2c_debug, n2c_warn};
use serde_json::Value;

use crate::classify::{classify, ResponseClass};
use crate::query::{block_children_url, database_query_url, query_body, request_headers};
use crate::transport::{BlockingTransport, ReqwestTransport};
use crate::{
    ClientError, ClientOpts, ClientSettings, HttpRequest, HttpResponse, ListingRequest, Method,
    Operation, QueryRequest, RemoteRequestError,
};

/// An asynchronous result that is already resolved when it is returned.
///
/// Awaiting it never suspends; synchronous callers can take the value with
/// [`Ready::into_inner`].
pub type Settled<T> = Ready<Result<T, ClientError>>;

/// Capability the content engine needs from a client: the two remote operations.
pub trait ContentClient: Send + Sync {
    fn query_collection(&self, request: QueryRequest) -> Settled<Value>;
    fn list_container_children(&self, request: ListingRequest) -> Settled<Value>;
}

/// Bearer token owned by a single client. Never printed.
struct Credential(String);

impl Credential {
    fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Client adapter running each remote call as one blocking transport call.
pub struct Client {
    auth: Credential,
    settings: ClientSettings,
    transport: Arc<dyn BlockingTransport>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("auth", &self.auth)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Client talking to the public API through the reqwest transport.
    pub fn new(opts: ClientOpts) -> Result<Self, ClientError> {
        Self::with_settings(opts, ClientSettings::default())
    }

    pub fn with_settings(opts: ClientOpts, settings: ClientSettings) -> Result<Self, ClientError> {
        let transport = ReqwestTransport::new(&settings)?;
        Ok(Self::with_transport(opts, settings, Arc::new(transport)))
    }

    pub fn with_transport(
        opts: ClientOpts,
        settings: ClientSettings,
        transport: Arc<dyn BlockingTransport>,
    ) -> Self {
        Self {
            auth: Credential(opts.auth),
            settings,
            transport,
        }
    }

    /// Blocking form of [`ContentClient::query_collection`].
    pub fn query_collection_blocking(&self, request: &QueryRequest) -> Result<Value, ClientError> {
        let url = database_query_url(self.settings.base(), &request.database_id);
        let body = query_body(request).map_err(ClientError::Encode)?;
        self.execute(
            Operation::QueryCollection,
            HttpRequest {
                method: Method::Post,
                url,
                headers: request_headers(self.auth.token()),
                body: Some(body),
                mute_http_exceptions: true,
            },
        )
    }

    /// Blocking form of [`ContentClient::list_container_children`].
    pub fn list_container_children_blocking(
        &self,
        request: &ListingRequest,
    ) -> Result<Value, ClientError> {
        let url = block_children_url(self.settings.base(), request);
        self.execute(
            Operation::ListContainerChildren,
            HttpRequest {
                method: Method::Get,
                url,
                headers: request_headers(self.auth.token()),
                body: None,
                mute_http_exceptions: true,
            },
        )
    }

    fn execute(&self, operation: Operation, request: HttpRequest) -> Result<Value, ClientError> {
        n2c_debug!("{} {} {}", operation, request.method, request.url);
        let response = self.transport.fetch(&request)?;

        if classify(response.status) == ResponseClass::Failure {
            let body = error_text(&response);
            n2c_warn!("{} failed with status {}", operation, response.status);
            return Err(RemoteRequestError {
                operation,
                status: response.status,
                body,
            }
            .into());
        }

        let text = response.content_text()?;
        serde_json::from_str(&text).map_err(|source| ClientError::InvalidJson { operation, source })
    }
}

impl ContentClient for Client {
    fn query_collection(&self, request: QueryRequest) -> Settled<Value> {
        future::ready(self.query_collection_blocking(&request))
    }

    fn list_container_children(&self, request: ListingRequest) -> Settled<Value> {
        future::ready(self.list_container_children_blocking(&request))
    }
}

// Error bodies are reported even when they are not valid in their charset.
fn error_text(response: &HttpResponse) -> String {
    response
        .content_text()
        .unwrap_or_else(|_| String::from_utf8_lossy(&response.body).into_owned())
}
