//! notion2content client: a blocking-transport client adapter for the content engine.
mod classify;
mod client;
mod decode;
mod engine;
mod error;
pub mod query;
mod settings;
mod transport;
mod types;

pub use classify::{classify, ResponseClass};
pub use client::{Client, ContentClient, Settled};
pub use decode::{decode_body, DecodeError};
pub use engine::{
    to_content, to_content_with, ContentEngine, ContentOptions, ContentStream, Target,
};
pub use error::{ClientError, Operation, RemoteRequestError, TransportError};
pub use n2c_core::{ContentRecord, Node};
pub use settings::{ClientOpts, ClientSettings, DEFAULT_BASE_URL};
pub use transport::{BlockingTransport, ReqwestTransport};
pub use types::{HttpRequest, HttpResponse, ListingRequest, Method, QueryRequest};
