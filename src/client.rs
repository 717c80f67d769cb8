//! High-level client facade that coordinates auth, throttling, and submission.

// self
use crate::{
	_prelude::*,
	api::{ApiDescriptor, Endpoint},
	auth::{
		AuthToken, Challenge, ChallengeSigner, DetachedSignature, TokenCache, TokenGrantRequest,
		TokenGrantResponse,
	},
	document::{Document, DocumentEnvelope},
	error::SerializationError,
	http::{ApiHttpClient, ApiRequest},
	limit::{RateLimiter, RateQuota},
	obs::{self, CallKind, CallOutcome, CallSpan},
};
#[cfg(feature = "reqwest")]
use crate::{error::ConfigError, http::ReqwestHttpClient};

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestIsmpClient = IsmpClient<ReqwestHttpClient>;

/// Coordinates token exchange, throttling, and document submission against a
/// single API host.
///
/// The client owns the HTTP transport, the token cache, the challenge signer,
/// and the rate limiter so callers only deal with documents and signatures.
/// Clones share the same token cache and rate budget, which makes the client
/// safe to hand out across tasks.
#[derive(Clone)]
pub struct IsmpClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// HTTP client wrapper used for every outbound API request.
	pub http_client: Arc<C>,
	/// Endpoint set and product group this client submits to.
	pub descriptor: ApiDescriptor,
	signer: Arc<dyn ChallengeSigner>,
	tokens: Arc<TokenCache>,
	limiter: Arc<RateLimiter>,
}
impl<C> IsmpClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(
		descriptor: ApiDescriptor,
		quota: RateQuota,
		signer: Arc<dyn ChallengeSigner>,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			descriptor,
			signer,
			tokens: Arc::new(TokenCache::new()),
			limiter: Arc::new(RateLimiter::new(quota)),
		}
	}

	/// Replaces the token cache with one that refetches tokens older than `ttl`.
	///
	/// Meant to be chained right after construction; the swap discards any
	/// token the previous cache held.
	pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
		self.tokens = Arc::new(TokenCache::with_ttl(ttl));

		self
	}

	/// Returns the bearer token, performing the challenge/response exchange on
	/// first use.
	///
	/// Concurrent callers share a single in-flight exchange. A failed exchange
	/// is not cached; the next caller retries from the challenge step.
	pub async fn token(&self) -> Result<AuthToken> {
		self.tokens.get_or_fetch(|| self.exchange_token()).await
	}

	/// Drops the cached token so the next call performs a fresh exchange.
	///
	/// Call this after an authorization rejection to force re-authentication.
	pub fn invalidate_token(&self) {
		self.tokens.invalidate();
	}

	/// Submits a goods-commissioning document for the configured product group.
	///
	/// The document is serialized to JSON, base64-encoded into the submission
	/// envelope next to the caller-provided detached signature, and posted once
	/// the rate limiter grants a slot. Only a `200 OK` answer counts as
	/// success; any other status surfaces as
	/// [`TransportError::Status`](crate::error::TransportError::Status) with
	/// the response body preserved for diagnostics.
	pub async fn create_document(
		&self,
		document: &Document,
		signature: impl Into<DetachedSignature>,
	) -> Result<()> {
		const KIND: CallKind = CallKind::CreateDocument;

		let span = CallSpan::new(KIND, "create_document");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let signature = signature.into();
		let result = span
			.instrument(async move {
				let token = self.token().await?;
				let envelope = DocumentEnvelope::seal(document, &signature)?;
				let body = serde_json::to_vec(&envelope).map_err(|e| {
					SerializationError::Encode { what: "document envelope", source: e }
				})?;

				// The slot is claimed as late as possible so a slow token
				// exchange never burns window time.
				self.limiter.acquire().await;

				self.http_client
					.execute(
						ApiRequest::post(self.descriptor.create_document_url(), body)
							.header("content-type", "application/json")
							.header("authorization", token.bearer()),
					)
					.await?
					.require_ok(Endpoint::CreateDocument)?;

				Ok(())
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(KIND, CallOutcome::Failure),
		}

		result
	}

	async fn exchange_token(&self) -> Result<AuthToken> {
		const KIND: CallKind = CallKind::TokenExchange;

		let span = CallSpan::new(KIND, "token");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let challenge = self
					.http_client
					.execute(ApiRequest::get(self.descriptor.endpoints.challenge.clone()))
					.await?
					.require_ok(Endpoint::AuthChallenge)?
					.decode_json::<Challenge>(Endpoint::AuthChallenge)?;
				let signature = self.signer.sign(&challenge).await?;
				let grant =
					TokenGrantRequest { uuid: challenge.uuid, data: signature.into_inner() };
				let body = serde_json::to_vec(&grant).map_err(|e| SerializationError::Encode {
					what: "token grant",
					source: e,
				})?;
				let granted = self
					.http_client
					.execute(
						ApiRequest::post(self.descriptor.endpoints.token.clone(), body)
							.header("content-type", "application/json"),
					)
					.await?
					.require_ok(Endpoint::AuthToken)?
					.decode_json::<TokenGrantResponse>(Endpoint::AuthToken)?;

				Ok(AuthToken::new(granted.token))
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(KIND, CallOutcome::Failure),
		}

		result
	}
}
#[cfg(feature = "reqwest")]
impl IsmpClient<ReqwestHttpClient> {
	/// Creates a client with the crate's default reqwest transport.
	///
	/// The transport applies [`ReqwestHttpClient::CONNECT_TIMEOUT`]; use
	/// [`IsmpClient::with_http_client`] to supply a preconfigured transport
	/// when proxies or custom TLS policies are required.
	pub fn new(
		descriptor: ApiDescriptor,
		quota: RateQuota,
		signer: Arc<dyn ChallengeSigner>,
	) -> Result<Self, ConfigError> {
		Ok(Self::with_http_client(descriptor, quota, signer, ReqwestHttpClient::new()?))
	}
}
impl<C> Debug for IsmpClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("IsmpClient")
			.field("descriptor", &self.descriptor)
			.field("limiter", &self.limiter)
			.field("token_cached", &self.tokens.cached().is_some())
			.finish()
	}
}
