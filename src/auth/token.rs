//! Bearer token material and issuance metadata.

// self
use crate::_prelude::*;

/// Redacted token secret wrapper keeping sensitive material out of logs.
///
/// Backed by a shared string so clones handed out by the cache stay cheap.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenSecret(Arc<str>);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into().into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Issued bearer token paired with its issuance instant.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken {
	/// Token secret; callers must avoid logging it.
	pub secret: TokenSecret,
	/// Instant the token was obtained from the grant endpoint.
	pub obtained_at: OffsetDateTime,
}
impl AuthToken {
	/// Creates a token stamped with the current clock.
	pub fn new(secret: impl Into<String>) -> Self {
		Self { secret: TokenSecret::new(secret), obtained_at: OffsetDateTime::now_utc() }
	}

	/// Overrides the issuance instant.
	pub fn with_obtained_at(mut self, instant: OffsetDateTime) -> Self {
		self.obtained_at = instant;

		self
	}

	/// Returns the token age relative to the provided instant.
	pub fn age_at(&self, instant: OffsetDateTime) -> Duration {
		instant - self.obtained_at
	}

	/// Returns the token age relative to the current clock.
	pub fn age(&self) -> Duration {
		self.age_at(OffsetDateTime::now_utc())
	}

	/// Renders the `Authorization` header value for this token.
	pub fn bearer(&self) -> String {
		format!("Bearer {}", self.secret.expose())
	}
}
impl Debug for AuthToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthToken")
			.field("secret", &"<redacted>")
			.field("obtained_at", &self.obtained_at)
			.finish()
	}
}
