//! Compute-once token cache with generation-swap invalidation.

// self
use crate::{_prelude::*, auth::token::AuthToken};

type Slot = Arc<AsyncOnceCell<AuthToken>>;

/// Caches the bearer token so at most one fetch runs per cache generation.
///
/// Concurrent callers piggy-back on the same in-flight fetch instead of stampeding
/// the auth endpoints. A failed fetch leaves the generation empty, so the next
/// caller attempts a fresh fetch and surfaces its own error.
/// [`TokenCache::invalidate`] swaps in a new generation without disturbing waiters
/// on the old one.
pub struct TokenCache {
	slot: RwLock<Slot>,
	ttl: Option<Duration>,
}
impl TokenCache {
	/// Creates a cache whose tokens never expire locally.
	pub fn new() -> Self {
		Self { slot: RwLock::new(Slot::default()), ttl: None }
	}

	/// Creates a cache that refetches once a cached token grows older than `ttl`.
	pub fn with_ttl(ttl: Duration) -> Self {
		Self { slot: RwLock::new(Slot::default()), ttl: Some(ttl) }
	}

	/// Returns the cached token, or runs `fetch` to obtain one.
	///
	/// `fetch` executes at most once per generation; callers arriving while it is in
	/// flight wait for its outcome instead of issuing their own fetch.
	pub async fn get_or_fetch<F, Fut, E>(&self, fetch: F) -> Result<AuthToken, E>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<AuthToken, E>>,
	{
		let slot = self.current_slot();
		let token = slot.get_or_try_init(fetch).await?;

		Ok(token.clone())
	}

	/// Returns the cached token without triggering a fetch.
	pub fn cached(&self) -> Option<AuthToken> {
		self.slot.read().get().cloned()
	}

	/// Drops the cached token so the next lookup fetches a fresh one.
	///
	/// Fetches already in flight complete against the old generation; their waiters
	/// receive that token once, and later lookups go through the new generation.
	pub fn invalidate(&self) {
		*self.slot.write() = Slot::default();
	}

	fn current_slot(&self) -> Slot {
		{
			let slot = self.slot.read();

			if !self.is_stale(slot.get()) {
				return slot.clone();
			}
		}

		let mut slot = self.slot.write();

		// Recheck under the write lock; a concurrent caller may have rotated already.
		if self.is_stale(slot.get()) {
			*slot = Slot::default();
		}

		slot.clone()
	}

	fn is_stale(&self, token: Option<&AuthToken>) -> bool {
		match (token, self.ttl) {
			(Some(token), Some(ttl)) => token.age() >= ttl,
			_ => false,
		}
	}
}
impl Default for TokenCache {
	fn default() -> Self {
		Self::new()
	}
}
impl Debug for TokenCache {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenCache")
			.field("cached", &self.cached().is_some())
			.field("ttl", &self.ttl)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use super::*;

	#[tokio::test]
	async fn fetch_runs_once_per_generation() {
		let cache = TokenCache::new();
		let calls = AtomicUsize::new(0);
		let calls = &calls;
		let first = cache
			.get_or_fetch(|| async move {
				calls.fetch_add(1, Ordering::SeqCst);

				Ok::<_, &str>(AuthToken::new("token-1"))
			})
			.await
			.expect("First lookup should fetch the token.");
		let second = cache
			.get_or_fetch(|| async move {
				calls.fetch_add(1, Ordering::SeqCst);

				Ok::<_, &str>(AuthToken::new("token-2"))
			})
			.await
			.expect("Second lookup should reuse the cached token.");

		assert_eq!(first.secret.expose(), "token-1");
		assert_eq!(second.secret.expose(), "token-1");
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn concurrent_lookups_share_one_fetch() {
		let cache = TokenCache::new();
		let calls = AtomicUsize::new(0);
		let calls = &calls;
		let fetch = || async move {
			calls.fetch_add(1, Ordering::SeqCst);
			tokio::task::yield_now().await;

			Ok::<_, &str>(AuthToken::new("token-shared"))
		};
		let (first, second) =
			tokio::join!(cache.get_or_fetch(fetch), cache.get_or_fetch(fetch));
		let first = first.expect("First concurrent lookup should succeed.");
		let second = second.expect("Second concurrent lookup should succeed.");

		assert_eq!(first.secret.expose(), "token-shared");
		assert_eq!(second.secret.expose(), "token-shared");
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn invalidate_discards_the_cached_token() {
		let cache = TokenCache::new();
		let seeded = cache
			.get_or_fetch(|| async { Ok::<_, &str>(AuthToken::new("token-1")) })
			.await
			.expect("Seeding lookup should succeed.");

		assert_eq!(seeded.secret.expose(), "token-1");
		assert!(cache.cached().is_some());

		cache.invalidate();

		assert!(cache.cached().is_none());

		let replacement = cache
			.get_or_fetch(|| async { Ok::<_, &str>(AuthToken::new("token-2")) })
			.await
			.expect("Lookup after invalidation should fetch again.");

		assert_eq!(replacement.secret.expose(), "token-2");
	}

	#[tokio::test]
	async fn failed_fetch_leaves_the_generation_empty() {
		let cache = TokenCache::new();
		let err = cache
			.get_or_fetch(|| async { Err::<AuthToken, _>("fetch exploded") })
			.await
			.expect_err("Failed fetch should surface its error.");

		assert_eq!(err, "fetch exploded");
		assert!(cache.cached().is_none());

		let token = cache
			.get_or_fetch(|| async { Ok::<_, &str>(AuthToken::new("token-after-failure")) })
			.await
			.expect("Lookup after a failure should retry the fetch.");

		assert_eq!(token.secret.expose(), "token-after-failure");
	}

	#[tokio::test]
	async fn stale_tokens_are_refetched() {
		let cache = TokenCache::with_ttl(Duration::hours(1));
		let stale = AuthToken::new("stale-token")
			.with_obtained_at(OffsetDateTime::now_utc() - Duration::hours(2));
		let seeded = cache
			.get_or_fetch(|| async move { Ok::<_, &str>(stale) })
			.await
			.expect("Seeding lookup should succeed.");

		assert_eq!(seeded.secret.expose(), "stale-token");

		let fresh = cache
			.get_or_fetch(|| async { Ok::<_, &str>(AuthToken::new("fresh-token")) })
			.await
			.expect("Stale token should be replaced by a fresh fetch.");

		assert_eq!(fresh.secret.expose(), "fresh-token");
		assert_eq!(
			cache.cached().expect("Fresh token should be cached.").secret.expose(),
			"fresh-token"
		);
	}
}
