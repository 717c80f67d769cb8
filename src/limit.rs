//! Fixed-window rate limiting for document submissions.
//!
//! The limiter backs [`IsmpClient::create_document`](crate::client::IsmpClient::create_document):
//! every submission consumes one grant, and callers that arrive after the
//! window's budget is spent are parked on the runtime timer until the window
//! rolls over.

// std
use std::time::Duration;
// crates.io
use tokio::time::{Instant, sleep};
// self
use crate::{_prelude::*, error::ConfigError, obs};

/// Request budget: at most `limit` grants per fixed `window`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateQuota {
	limit: u32,
	window: Duration,
}
impl RateQuota {
	/// Creates a quota after validating both bounds.
	///
	/// A zero `limit` or an empty `window` would make every
	/// [`RateLimiter::acquire`] wait forever, so both are rejected here.
	pub fn new(limit: u32, window: Duration) -> Result<Self, ConfigError> {
		if limit == 0 {
			return Err(ConfigError::ZeroRequestLimit);
		}
		if window.is_zero() {
			return Err(ConfigError::ZeroRateWindow);
		}

		Ok(Self { limit, window })
	}

	/// Quota of `limit` grants per second.
	pub fn per_second(limit: u32) -> Result<Self, ConfigError> {
		Self::new(limit, Duration::from_secs(1))
	}

	/// Quota of `limit` grants per minute.
	pub fn per_minute(limit: u32) -> Result<Self, ConfigError> {
		Self::new(limit, Duration::from_secs(60))
	}

	/// Quota of `limit` grants per hour.
	pub fn per_hour(limit: u32) -> Result<Self, ConfigError> {
		Self::new(limit, Duration::from_secs(3_600))
	}

	/// Maximum number of grants per window.
	pub fn limit(&self) -> u32 {
		self.limit
	}

	/// Window length.
	pub fn window(&self) -> Duration {
		self.window
	}
}

/// Fixed-window limiter that delays callers once the budget is spent.
///
/// [`Self::acquire`] never rejects a caller; excess callers sleep until the
/// window rolls over and then retry. The window lock is only held for
/// bookkeeping and is always released before sleeping.
pub struct RateLimiter {
	quota: RateQuota,
	window: Mutex<WindowState>,
}
impl RateLimiter {
	/// Creates a limiter whose first window opens immediately.
	pub fn new(quota: RateQuota) -> Self {
		Self { quota, window: Mutex::new(WindowState { opened_at: Instant::now(), granted: 0 }) }
	}

	/// Quota this limiter enforces.
	pub fn quota(&self) -> RateQuota {
		self.quota
	}

	/// Waits until the current window has budget left, then consumes one grant.
	///
	/// The grant is taken synchronously in the same lock scope that observed
	/// free budget, so dropping the returned future mid-wait never consumes a
	/// slot.
	pub async fn acquire(&self) {
		loop {
			let wait = {
				let mut window = self.window.lock();
				let elapsed = window.opened_at.elapsed();

				if elapsed >= self.quota.window {
					window.opened_at = Instant::now();
					window.granted = 0;
				}
				if window.granted < self.quota.limit {
					window.granted += 1;

					return;
				}

				self.quota.window.saturating_sub(elapsed)
			};

			obs::record_throttle_wait(wait);
			sleep(wait).await;
		}
	}
}
impl Debug for RateLimiter {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RateLimiter").field("quota", &self.quota).finish()
	}
}

struct WindowState {
	opened_at: Instant,
	granted: u32,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn quota(limit: u32, window: Duration) -> RateQuota {
		RateQuota::new(limit, window).expect("Test quotas should validate.")
	}

	#[test]
	fn quota_rejects_degenerate_bounds() {
		assert!(matches!(
			RateQuota::new(0, Duration::from_secs(1)),
			Err(ConfigError::ZeroRequestLimit)
		));
		assert!(matches!(RateQuota::new(3, Duration::ZERO), Err(ConfigError::ZeroRateWindow)));
		assert_eq!(
			quota(3, Duration::from_secs(1)),
			RateQuota::per_second(3).expect("Per-second quota should validate.")
		);
	}

	#[tokio::test(start_paused = true)]
	async fn acquire_grants_within_budget_without_waiting() {
		let limiter = RateLimiter::new(quota(3, Duration::from_secs(1)));
		let started = Instant::now();

		for _ in 0..3 {
			limiter.acquire().await;
		}

		assert_eq!(Instant::now(), started);
	}

	#[tokio::test(start_paused = true)]
	async fn acquire_defers_calls_beyond_the_limit() {
		let limiter = RateLimiter::new(quota(2, Duration::from_secs(1)));
		let started = Instant::now();

		for _ in 0..3 {
			limiter.acquire().await;
		}

		assert!(started.elapsed() >= Duration::from_secs(1));
	}

	#[tokio::test(start_paused = true)]
	async fn window_rolls_over_after_idle_time() {
		let limiter = RateLimiter::new(quota(1, Duration::from_secs(1)));

		limiter.acquire().await;
		sleep(Duration::from_millis(1_500)).await;

		let resumed = Instant::now();

		limiter.acquire().await;

		assert_eq!(Instant::now(), resumed);
	}

	#[tokio::test(start_paused = true)]
	async fn concurrent_acquires_share_the_budget() {
		let limiter = Arc::new(RateLimiter::new(quota(2, Duration::from_secs(1))));
		let started = Instant::now();
		let mut grants = Vec::new();

		for _ in 0..5 {
			let limiter = limiter.clone();

			grants.push(tokio::spawn(async move { limiter.acquire().await }));
		}
		for grant in grants {
			grant.await.expect("Acquire task should not panic.");
		}

		assert!(started.elapsed() >= Duration::from_secs(2));
	}
}
