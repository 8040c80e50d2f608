//! HTTP transport seam for XRPC calls.
//!
//! [`Transport`] is the injection point: the session manager and fetcher
//! only ever see [`XrpcRequest`]/[`XrpcResponse`], so tests swap in a mock
//! without touching the network.

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use http::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use furl_api::xrpc::XrpcErrorResponse;

use crate::error::Error;

/// A single XRPC call: a query (GET with parameters) or a procedure
/// (POST with an optional JSON body).
#[derive(Debug, Clone)]
pub enum XrpcRequest {
    Query {
        nsid: &'static str,
        params: Vec<(&'static str, String)>,
    },
    Procedure {
        nsid: &'static str,
        body: Option<serde_json::Value>,
    },
}

impl XrpcRequest {
    pub fn query(nsid: &'static str, params: Vec<(&'static str, String)>) -> Self {
        Self::Query { nsid, params }
    }

    pub fn procedure(nsid: &'static str) -> Self {
        Self::Procedure { nsid, body: None }
    }

    pub fn procedure_with(nsid: &'static str, body: serde_json::Value) -> Self {
        Self::Procedure {
            nsid,
            body: Some(body),
        }
    }

    pub fn nsid(&self) -> &'static str {
        match self {
            Self::Query { nsid, .. } | Self::Procedure { nsid, .. } => nsid,
        }
    }
}

/// Raw result of an XRPC call, prior to classification.
#[derive(Debug, Clone)]
pub struct XrpcResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl XrpcResponse {
    /// Decode a success body into its typed response.
    pub fn parse<T: DeserializeOwned>(&self, context: &'static str) -> Result<T, Error> {
        serde_json::from_slice(&self.body).map_err(|source| Error::MalformedResponse {
            context,
            source,
        })
    }

    /// The error envelope of a non-success body, when it parses as one.
    pub fn error_envelope(&self) -> Option<XrpcErrorResponse> {
        serde_json::from_slice(&self.body).ok()
    }

    /// Human-readable description of a failure response for error messages.
    pub fn failure_message(&self) -> String {
        match self.error_envelope() {
            Some(envelope) => match envelope.message {
                Some(message) => format!("{}: {}", envelope.error, message),
                None => envelope.error,
            },
            None => format!("status {}", self.status),
        }
    }
}

/// Sends XRPC requests to a service, attaching a bearer credential when
/// one is supplied.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        service: &Url,
        request: &XrpcRequest,
        bearer: Option<&str>,
    ) -> impl Future<Output = Result<XrpcResponse, Error>> + Send;
}

/// Upstream calls that outlive this are reported as `Error::Upstream`
/// instead of hanging the unfurl task.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Production transport over a pooled reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(Error::transport)?;
        Ok(Self { client })
    }

    fn endpoint(service: &Url, nsid: &str) -> Result<Url, Error> {
        let raw = format!("{}/xrpc/{}", service.as_str().trim_end_matches('/'), nsid);
        Url::parse(&raw).map_err(|err| Error::Upstream {
            status: None,
            message: format!("invalid endpoint {raw}: {err}"),
        })
    }
}

impl Transport for ReqwestTransport {
    async fn send(
        &self,
        service: &Url,
        request: &XrpcRequest,
        bearer: Option<&str>,
    ) -> Result<XrpcResponse, Error> {
        let url = Self::endpoint(service, request.nsid())?;

        let mut builder = match request {
            XrpcRequest::Query { params, .. } => self.client.get(url).query(params),
            XrpcRequest::Procedure { body, .. } => {
                let post = self.client.post(url);
                match body {
                    Some(body) => post.json(body),
                    None => post,
                }
            }
        };
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(Error::transport)?;
        let status = response.status();
        let body = response.bytes().await.map_err(Error::transport)?;

        Ok(XrpcResponse { status, body })
    }
}
