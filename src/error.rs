//! Client-level error types shared across configuration, auth, and submission paths.

// self
use crate::{_prelude::*, api::Endpoint, auth::SignerError};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure or an unexpected HTTP status.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Payload serialization or response parsing failure.
	#[error(transparent)]
	Serialization(#[from] SerializationError),
	/// Challenge signing failure reported by the signer collaborator.
	#[error(transparent)]
	Signing(#[from] SignerError),
}

/// Configuration and validation failures raised at client construction time.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL (or an endpoint joined onto it) cannot be parsed.
	#[error("API base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL is not hierarchical, so endpoint paths cannot be resolved against it.
	#[error("API base URL `{url}` cannot serve as a base.")]
	UnusableBaseUrl {
		/// Offending URL rendered as a string.
		url: String,
	},

	/// Request budget was configured with a zero limit.
	#[error("Rate quota limit must be greater than zero.")]
	ZeroRequestLimit,
	/// Request budget was configured with an empty window.
	#[error("Rate quota window must be greater than zero.")]
	ZeroRateWindow,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures and status contract violations.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Endpoint answered with a status other than `200 OK`.
	#[error("The {endpoint} endpoint returned status {status}.")]
	Status {
		/// Endpoint label for the failed call.
		endpoint: Endpoint,
		/// HTTP status code returned by the endpoint.
		status: u16,
		/// Raw response body kept for diagnosing rejections.
		body: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Serialization and response parsing failures.
#[derive(Debug, ThisError)]
pub enum SerializationError {
	/// A request payload could not be serialized to JSON.
	#[error("Unable to serialize the {what} payload.")]
	Encode {
		/// Payload label.
		what: &'static str,
		/// Structured serialization failure.
		#[source]
		source: serde_json::Error,
	},
	/// An endpoint answered with malformed JSON that could not be parsed.
	#[error("The {endpoint} endpoint returned malformed JSON.")]
	Decode {
		/// Endpoint label for the failed call.
		endpoint: Endpoint,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::error::Error>,
	},
}
