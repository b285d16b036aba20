use std::fmt;

use crate::decode::DecodeError;

/// Remote operations exposed by the client, named as they appear in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    QueryCollection,
    ListContainerChildren,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::QueryCollection => "queryDatabases",
            Operation::ListContainerChildren => "listContainerChildren",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The remote service answered with a 4xx or 5xx status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{operation} {status}, text: {body}")]
pub struct RemoteRequestError {
    pub operation: Operation,
    pub status: u16,
    pub body: String,
}

/// Failure of the blocking network primitive itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("failed to build http client: {0}")]
    Build(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("http status {0}")]
    Status(u16),
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    RemoteRequest(#[from] RemoteRequestError),
    #[error("{0}")]
    Transport(#[from] TransportError),
    #[error("{0}")]
    Decode(#[from] DecodeError),
    #[error("{operation}: response is not valid json: {source}")]
    InvalidJson {
        operation: Operation,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Status code of a remote failure, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::RemoteRequest(err) => Some(err.status),
            ClientError::Transport(TransportError::Status(status)) => Some(*status),
            _ => None,
        }
    }
}
