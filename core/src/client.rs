//! Blocking client for the organisation accounts resource.
//!
//! # Design
//! `AccountClient` holds only a `base_url` and a `Transport`, and carries no
//! mutable state between calls. Each operation is split into a `build_*`
//! method that produces an `HttpRequest` and a `parse_*` method that consumes
//! an `HttpResponse`; `create`, `fetch` and `delete` run the transport in
//! between. Callers that do their own I/O can use the build/parse halves
//! directly.
//!
//! Status handling differs per operation: `create` and `delete` fail on any
//! status >= 400, while `fetch` only fails on >= 500 so that a missing
//! account comes back as an ordinary 404 response.

use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::{Account, AccountRequest, AccountResponse};

/// Path segments of the accounts collection, relative to the base URL.
const ACCOUNTS_PATH: [&str; 3] = ["v1", "organisation", "accounts"];

/// Lowest status `create` and `delete` report as `ApiError::ApiCall`.
const CLIENT_ERROR_FROM: u16 = 400;

/// Lowest status `fetch` reports as `ApiError::ApiCall`.
const SERVER_ERROR_FROM: u16 = 500;

/// Synchronous, stateless client for organisation accounts.
#[derive(Debug, Clone)]
pub struct AccountClient<T = UreqTransport> {
    base_url: String,
    transport: T,
}

impl AccountClient<UreqTransport> {
    /// Client using a fresh blocking `ureq` agent per call.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_transport(base_url, UreqTransport)
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::new(&config.base_url)
    }
}

impl<T: Transport> AccountClient<T> {
    /// Fails with `ApiError::EmptyBaseUrl` when `base_url` is blank. Any other
    /// problem with the URL surfaces when an operation builds its request.
    pub fn with_transport(base_url: &str, transport: T) -> Result<Self, ApiError> {
        if base_url.trim().is_empty() {
            return Err(ApiError::EmptyBaseUrl);
        }
        Ok(Self {
            base_url: base_url.to_string(),
            transport,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Register `account`. Returns `ApiError::ApiCall` for any status >= 400.
    pub fn create(&self, account: &Account) -> Result<AccountResponse, ApiError> {
        let request = self.build_create(account)?;
        let response = self.send(request)?;
        self.parse_create(response)
    }

    /// Look up an account. A 4xx status is returned as a normal response.
    pub fn fetch(&self, id: &str) -> Result<AccountResponse, ApiError> {
        let request = self.build_fetch(id)?;
        let response = self.send(request)?;
        self.parse_fetch(response)
    }

    /// Delete an account at `version`. Returns `ApiError::ApiCall` for any
    /// status >= 400.
    pub fn delete(&self, id: &str, version: i64) -> Result<AccountResponse, ApiError> {
        let request = self.build_delete(id, version)?;
        let response = self.send(request)?;
        self.parse_delete(response)
    }

    pub fn build_create(&self, account: &Account) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(&AccountRequest { data: account })
            .map_err(ApiError::Serialization)?;
        let url = self.resource_url(HttpMethod::Post, None)?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: url.into(),
            headers: vec![
                ("accept".to_string(), "application/json".to_string()),
                ("content-type".to_string(), "application/json".to_string()),
            ],
            body: Some(body),
        })
    }

    pub fn build_fetch(&self, id: &str) -> Result<HttpRequest, ApiError> {
        let url = self.resource_url(HttpMethod::Get, Some(id))?;
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: url.into(),
            headers: vec![("accept".to_string(), "application/json".to_string())],
            body: None,
        })
    }

    pub fn build_delete(&self, id: &str, version: i64) -> Result<HttpRequest, ApiError> {
        let mut url = self.resource_url(HttpMethod::Delete, Some(id))?;
        url.query_pairs_mut()
            .clear()
            .append_pair("version", &version.to_string());
        Ok(HttpRequest {
            method: HttpMethod::Delete,
            url: url.into(),
            headers: vec![("accept".to_string(), "application/json".to_string())],
            body: None,
        })
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<AccountResponse, ApiError> {
        let envelope = decode_envelope(&response)?;
        check_status(envelope, CLIENT_ERROR_FROM)
    }

    pub fn parse_fetch(&self, response: HttpResponse) -> Result<AccountResponse, ApiError> {
        let envelope = decode_envelope(&response)?;
        check_status(envelope, SERVER_ERROR_FROM)
    }

    /// A successful delete usually has no body, so one is only decoded when
    /// present.
    pub fn parse_delete(&self, response: HttpResponse) -> Result<AccountResponse, ApiError> {
        let envelope = if response.body.trim().is_empty() {
            AccountResponse {
                status_code: response.status,
                ..AccountResponse::default()
            }
        } else {
            decode_envelope(&response)?
        };
        check_status(envelope, CLIENT_ERROR_FROM)
    }

    /// `{base_url}/v1/organisation/accounts[/{id}]`, with `id` encoded as a
    /// single path segment.
    fn resource_url(&self, method: HttpMethod, id: Option<&str>) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::UrlConstruction(format!("{}: {e}", self.base_url)))?;
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                ApiError::UrlConstruction(format!("{} cannot be a base URL", self.base_url))
            })?;
            segments.pop_if_empty().extend(ACCOUNTS_PATH);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(ApiError::RequestConstruction {
                method,
                reason: format!("unsupported scheme {scheme:?}"),
            }),
        }
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = request.method;
        let url = request.url.clone();
        debug!(%method, %url, "sending request");
        match self.transport.execute(request) {
            Ok(response) => {
                debug!(%method, %url, status = response.status, "received response");
                Ok(response)
            }
            Err(source) => {
                warn!(%method, %url, error = %source, "transport failure");
                Err(ApiError::Transport {
                    method,
                    url,
                    source,
                })
            }
        }
    }
}

fn decode_envelope(response: &HttpResponse) -> Result<AccountResponse, ApiError> {
    let mut envelope: AccountResponse =
        serde_json::from_str(&response.body).map_err(|source| ApiError::Deserialization {
            status: response.status,
            source,
        })?;
    envelope.status_code = response.status;
    Ok(envelope)
}

/// Turn the envelope into `ApiError::ApiCall` when its status is at or above
/// `error_from`.
fn check_status(envelope: AccountResponse, error_from: u16) -> Result<AccountResponse, ApiError> {
    if envelope.status_code < error_from {
        return Ok(envelope);
    }
    warn!(
        status = envelope.status_code,
        error_message = envelope.error_message.as_deref().unwrap_or_default(),
        "account API returned an error status"
    );
    Err(ApiError::ApiCall(Box::new(envelope)))
}
