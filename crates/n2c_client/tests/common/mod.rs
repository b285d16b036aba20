#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use n2c_client::{
    BlockingTransport, Client, ClientOpts, ClientSettings, HttpRequest, HttpResponse,
    TransportError,
};

/// In-memory transport replaying canned responses and recording every request.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, status: u16, body: &str) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, body.as_bytes())));
        self
    }

    pub fn fail(&self, err: TransportError) -> &Self {
        self.responses.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl BlockingTransport for ScriptedTransport {
    fn fetch(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("no scripted response".into())))
    }
}

pub fn client_with(transport: Arc<ScriptedTransport>, auth: &str) -> Client {
    Client::with_transport(
        ClientOpts {
            auth: auth.to_string(),
        },
        ClientSettings::default(),
        transport,
    )
}
