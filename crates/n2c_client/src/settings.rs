use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::ClientError;

pub const DEFAULT_BASE_URL: &str = "https://api.notion.com";

/// Options identifying the caller to the remote service.
#[derive(Clone, Deserialize)]
pub struct ClientOpts {
    /// The auth token for the Notion API.
    pub auth: String,
}

impl fmt::Debug for ClientOpts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOpts")
            .field("auth", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: Url,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ClientSettings {
    /// Settings pointing at another host, e.g. a local mock server.
    pub fn with_base_url(base_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url).map_err(|err| ClientError::Config(err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Config(format!("{base_url} cannot be a base url")));
        }
        Ok(Self {
            base_url,
            ..Self::default()
        })
    }

    /// Base url without trailing slash, used as the prefix of every request url.
    pub(crate) fn base(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }
}
