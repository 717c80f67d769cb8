//! Wire types for the challenge/response token exchange.

// self
use crate::_prelude::*;

/// Challenge issued by the auth endpoint; its `data` payload must be signed to
/// obtain a token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
	/// Server-issued challenge identifier echoed back during the grant.
	pub uuid: String,
	/// Opaque payload the caller must sign.
	pub data: String,
}

/// Grant request pairing the challenge identifier with its detached signature.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct TokenGrantRequest {
	pub uuid: String,
	pub data: String,
}

/// Grant response carrying the issued bearer token.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenGrantResponse {
	pub token: String,
}
