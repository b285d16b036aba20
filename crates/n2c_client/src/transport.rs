use reqwest::header::CONTENT_TYPE;

use crate::classify::{classify, ResponseClass};
use crate::{ClientSettings, HttpRequest, HttpResponse, Method, TransportError};

/// The host's only network primitive: one request in, one response out,
/// blocking the caller until the exchange completes.
pub trait BlockingTransport: Send + Sync {
    fn fetch(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Blocking transport backed by `reqwest::blocking`.
///
/// Must not be called from inside an async runtime worker; use a blocking
/// thread (e.g. `spawn_blocking`) there.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new(settings: &ClientSettings) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|err| TransportError::Build(err.to_string()))?;
        Ok(Self { client })
    }
}

impl BlockingTransport for ReqwestTransport {
    fn fetch(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };
        let mut builder = self.client.request(method, request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        if !request.mute_http_exceptions && classify(status) == ResponseClass::Failure {
            return Err(TransportError::Status(status));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let body = response.bytes().map_err(map_reqwest_error)?.to_vec();

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::Timeout(err.to_string());
    }
    if err.is_builder() {
        return TransportError::Build(err.to_string());
    }
    TransportError::Network(err.to_string())
}
