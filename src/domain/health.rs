use serde::Deserialize;

use crate::domain::processor::Processor;

/// Body of `GET /payments/service-health` on a processor.
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceHealth {
	pub failing: bool,
	#[serde(rename = "minResponseTime")]
	pub min_response_time: u64,
}

/// Picks the processor the routing cache should point at. A probe that
/// failed outright arrives here as `None` and counts as failing. Returns
/// `None` when both sides are failing; the caller then publishes nothing
/// and lets the cached value expire.
pub fn select_preferred(
	default: Option<&ServiceHealth>,
	fallback: Option<&ServiceHealth>,
) -> Option<Processor> {
	let default_failing = default.is_none_or(|health| health.failing);
	let fallback_failing = fallback.is_none_or(|health| health.failing);

	match (default_failing, fallback_failing) {
		(true, true) => None,
		(false, true) => Some(Processor::Default),
		(true, false) => Some(Processor::Fallback),
		(false, false) => {
			let default_time =
				default.map_or(u64::MAX, |health| health.min_response_time);
			let fallback_time =
				fallback.map_or(u64::MAX, |health| health.min_response_time);
			if default_time <= fallback_time {
				Some(Processor::Default)
			} else {
				Some(Processor::Fallback)
			}
		}
	}
}
