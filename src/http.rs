//! Transport primitives for API calls.
//!
//! The module exposes [`ApiHttpClient`] alongside the crate-owned [`ApiRequest`] and
//! [`ApiResponse`] types so downstream crates can integrate custom HTTP clients
//! without pulling their transport stack into the client core. Responses are raw
//! status + body pairs; [`ApiResponse::require_ok`] enforces the registry's strict
//! `200 OK` success contract and [`ApiResponse::decode_json`] parses payloads with
//! path-aware error reporting.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// self
use crate::{
	_prelude::*,
	api::Endpoint,
	error::{SerializationError, TransportError},
};
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// Boxed future returned by [`ApiHttpClient::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<ApiResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing API calls.
///
/// The trait acts as the client's only dependency on an HTTP stack. Callers provide
/// an implementation (typically behind `Arc<T>` where `T: ApiHttpClient`) and the
/// client hands it fully prepared requests. Implementations must be
/// `Send + Sync + 'static` so they can be shared across client clones, and the
/// futures they return must be `Send` so the facade's boxed orchestration futures
/// inherit the same guarantee.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Executes a prepared request and resolves with the raw response.
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_>;
}

/// HTTP verbs used by the API surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
	/// `GET` request.
	Get,
	/// `POST` request.
	Post,
}

/// Prepared outbound request handed to an [`ApiHttpClient`].
#[derive(Clone)]
pub struct ApiRequest {
	/// HTTP verb.
	pub method: Method,
	/// Fully resolved endpoint URL.
	pub url: Url,
	/// Header name/value pairs attached to the request.
	pub headers: Vec<(&'static str, String)>,
	/// Optional request body bytes.
	pub body: Option<Vec<u8>>,
}
impl ApiRequest {
	/// Creates a `GET` request for the provided URL.
	pub fn get(url: Url) -> Self {
		Self { method: Method::Get, url, headers: Vec::new(), body: None }
	}

	/// Creates a `POST` request carrying the provided body bytes.
	pub fn post(url: Url, body: Vec<u8>) -> Self {
		Self { method: Method::Post, url, headers: Vec::new(), body: Some(body) }
	}

	/// Appends a header pair.
	pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
		self.headers.push((name, value.into()));

		self
	}
}
impl Debug for ApiRequest {
	// Header values can carry bearer tokens; only names are rendered.
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiRequest")
			.field("method", &self.method)
			.field("url", &self.url.as_str())
			.field("headers", &self.headers.iter().map(|(name, _)| *name).collect::<Vec<_>>())
			.field("body_len", &self.body.as_ref().map(Vec::len))
			.finish()
	}
}

/// Raw response captured from the transport.
#[derive(Clone, Debug)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body bytes.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Returns the body interpreted as UTF-8, replacing invalid sequences.
	pub fn body_text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	/// Enforces the strict success contract: any status other than `200 OK` is an
	/// error carrying the endpoint label, the status code, and the raw body.
	pub fn require_ok(self, endpoint: Endpoint) -> Result<Self, TransportError> {
		if self.status != 200 {
			return Err(TransportError::Status {
				endpoint,
				status: self.status,
				body: self.body_text(),
			});
		}

		Ok(self)
	}

	/// Parses the body as JSON, reporting the failing path on malformed payloads.
	pub fn decode_json<T>(&self, endpoint: Endpoint) -> Result<T, SerializationError>
	where
		T: for<'de> Deserialize<'de>,
	{
		let mut deserializer = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|e| SerializationError::Decode { endpoint, source: e })
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
/// [`ReqwestHttpClient::new`] provisions the crate's default transport with a bounded
/// connect timeout; pass a preconfigured [`ReqwestClient`] through
/// [`ReqwestHttpClient::with_client`] when proxies, TLS pinning, or other policies
/// are required.
#[cfg(feature = "reqwest")]
#[derive(Clone)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Connect timeout applied by [`ReqwestHttpClient::new`].
	pub const CONNECT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

	/// Builds the default transport with a 10-second connect timeout.
	pub fn new() -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder().connect_timeout(Self::CONNECT_TIMEOUT).build()?;

		Ok(Self(client))
	}

	/// Wraps an existing [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let mut builder = match request.method {
				Method::Get => client.get(request.url),
				Method::Post => client.post(request.url),
			};

			for (name, value) in request.headers {
				builder = builder.header(name, value);
			}
			if let Some(body) = request.body {
				builder = builder.body(body);
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let body = response.bytes().await?.to_vec();

			Ok(ApiResponse { status, body })
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::Challenge;

	#[test]
	fn require_ok_accepts_only_status_200() {
		let ok = ApiResponse { status: 200, body: b"{}".to_vec() };

		assert!(ok.require_ok(Endpoint::CreateDocument).is_ok());

		for status in [201, 204, 301, 400, 401, 500] {
			let response = ApiResponse { status, body: b"denied".to_vec() };
			let err = response
				.require_ok(Endpoint::CreateDocument)
				.expect_err("Statuses other than 200 should be rejected.");

			match err {
				TransportError::Status { endpoint, status: got, body } => {
					assert_eq!(endpoint, Endpoint::CreateDocument);
					assert_eq!(got, status);
					assert_eq!(body, "denied");
				}
				other => panic!("Unexpected transport error: {other:?}."),
			}
		}
	}

	#[test]
	fn decode_json_reports_the_failing_path() {
		let response = ApiResponse { status: 200, body: b"{\"uuid\":42}".to_vec() };
		let err = response
			.decode_json::<Challenge>(Endpoint::AuthChallenge)
			.expect_err("Malformed payload should fail to decode.");

		match err {
			SerializationError::Decode { endpoint, source } => {
				assert_eq!(endpoint, Endpoint::AuthChallenge);
				assert_eq!(source.path().to_string(), "uuid");
			}
			other => panic!("Unexpected serialization error: {other:?}."),
		}
	}

	#[test]
	fn api_request_debug_redacts_header_values() {
		let url = Url::parse("https://api.example/create").expect("URL fixture should parse.");
		let request =
			ApiRequest::post(url, vec![1]).header("authorization", "Bearer secret-token");
		let rendered = format!("{request:?}");

		assert!(rendered.contains("authorization"));
		assert!(!rendered.contains("secret-token"));
	}
}
