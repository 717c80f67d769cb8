// std
use std::time::Duration;
// self
use crate::obs::{CallKind, CallOutcome};

/// Records a call outcome via the global metrics recorder (when enabled).
pub fn record_call_outcome(kind: CallKind, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"ismp_client_call_total",
			"call" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records how long a submission was parked by the rate limiter (when enabled).
pub fn record_throttle_wait(delay: Duration) {
	#[cfg(feature = "metrics")]
	{
		metrics::histogram!("ismp_client_throttle_wait_seconds").record(delay.as_secs_f64());
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = delay;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_call_outcome_noop_without_metrics() {
		record_call_outcome(CallKind::TokenExchange, CallOutcome::Failure);
	}

	#[test]
	fn record_throttle_wait_noop_without_metrics() {
		record_throttle_wait(Duration::from_millis(250));
	}
}
