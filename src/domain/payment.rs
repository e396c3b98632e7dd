use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

fn attempt_count_is_zero(count: &u32) -> bool {
	*count == 0
}

/// The unit of work flowing through the pipeline. `requested_at` is stamped
/// once at intake and never changes afterwards, so a payment dispatched late
/// still lands in the summary window of its original acceptance.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Payment {
	#[serde(rename = "correlationId")]
	pub correlation_id: Uuid,
	pub amount:         f64,
	#[serde(rename = "requestedAt", with = "time::serde::rfc3339")]
	pub requested_at:   OffsetDateTime,
	#[serde(
		rename = "counterDLQ",
		default,
		skip_serializing_if = "attempt_count_is_zero"
	)]
	pub attempt_count:  u32,
}

impl Payment {
	pub fn new(
		correlation_id: Uuid,
		amount: f64,
		requested_at: OffsetDateTime,
	) -> Self {
		Self {
			correlation_id,
			amount,
			requested_at,
			attempt_count: 0,
		}
	}

	/// Sorted-set score for every key holding this payment.
	pub fn requested_at_unix(&self) -> i64 {
		self.requested_at.unix_timestamp()
	}
}
