//! Challenge signing seam.
//!
//! Production deployments sign the authentication challenge with a qualified
//! certificate through external CMS tooling. This module only defines the
//! contract plus a placeholder implementation, so the real cryptography stays
//! outside the client.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
// self
use crate::{_prelude::*, auth::challenge::Challenge};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Boxed future returned by [`ChallengeSigner::sign`].
pub type SignFuture<'a> =
	Pin<Box<dyn Future<Output = Result<DetachedSignature, SignerError>> + 'a + Send>>;

/// Produces a detached signature over the authentication challenge payload.
///
/// Implementations typically shell out to certificate tooling or an HSM, which
/// is why the contract is async and failable even though the bundled
/// [`EchoSigner`] is neither.
pub trait ChallengeSigner
where
	Self: Send + Sync,
{
	/// Signs the challenge's `data` field.
	fn sign(&self, challenge: &Challenge) -> SignFuture<'_>;
}

/// Detached signature in its transport encoding.
///
/// The value is forwarded verbatim to the API; the client never inspects it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetachedSignature(String);
impl DetachedSignature {
	/// Wraps an already-encoded signature value.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Borrows the encoded signature.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Consumes the wrapper and returns the encoded signature.
	pub fn into_inner(self) -> String {
		self.0
	}
}
impl AsRef<str> for DetachedSignature {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<&str> for DetachedSignature {
	fn from(value: &str) -> Self {
		Self(value.into())
	}
}
impl From<String> for DetachedSignature {
	fn from(value: String) -> Self {
		Self(value)
	}
}

/// Error raised by a [`ChallengeSigner`] implementation.
#[derive(Debug, ThisError)]
pub enum SignerError {
	/// The signing backend rejected or failed to process the challenge.
	#[error("Challenge signing failed.")]
	Backend {
		/// Backend-specific failure.
		#[source]
		source: BoxError,
	},
}
impl SignerError {
	/// Wraps a backend-specific signing failure.
	pub fn backend(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Backend { source: Box::new(src) }
	}
}

/// Placeholder signer that base64-encodes the challenge payload instead of
/// signing it.
///
/// Useful for sandboxes and tests where the API does not verify signatures.
#[derive(Clone, Copy, Debug, Default)]
pub struct EchoSigner;
impl ChallengeSigner for EchoSigner {
	fn sign(&self, challenge: &Challenge) -> SignFuture<'_> {
		let encoded = STANDARD.encode(&challenge.data);

		Box::pin(async move { Ok(DetachedSignature::new(encoded)) })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn echo_signer_encodes_the_challenge_data() {
		let challenge =
			Challenge { uuid: "uuid-1".into(), data: "sign me".into() };
		let signature = EchoSigner
			.sign(&challenge)
			.await
			.expect("Echo signing should never fail.");

		assert_eq!(signature.expose(), STANDARD.encode("sign me"));
	}
}
