use std::time::Duration;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::payment::Payment;
use crate::domain::processor::Processor;

/// A due retry popped from the schedule. `payment` is `None` when the
/// payload hash no longer holds an entry for the correlation id; the
/// caller drops the job instead of re-entering it.
#[derive(Debug, Clone)]
pub struct RetryJob {
	pub correlation_id: Uuid,
	pub payment:        Option<Payment>,
}

/// Typed operations over the shared broker. Every error is surfaced to the
/// caller; the gateway never retries on its own.
#[async_trait]
pub trait BrokerGateway: Send + Sync + 'static {
	/// O(1) append onto the intake queue.
	async fn push_intake(
		&self,
		payment: &Payment,
	) -> Result<(), Box<dyn std::error::Error + Send>>;

	/// Waits up to `timeout` for an intake element.
	async fn blocking_pop_intake(
		&self,
		timeout: Duration,
	) -> Result<Option<Payment>, Box<dyn std::error::Error + Send>>;

	/// Pops the earliest-due retry. Re-inserts and returns `None` when the
	/// minimum score is still in the future.
	async fn pop_due_retry(
		&self,
		now: OffsetDateTime,
	) -> Result<Option<RetryJob>, Box<dyn std::error::Error + Send>>;

	/// Records a terminal success under the processor's outcome set,
	/// scored by the payment's original `requested_at`.
	async fn add_result(
		&self,
		processor: Processor,
		payment: &Payment,
	) -> Result<(), Box<dyn std::error::Error + Send>>;

	/// Stores the payload and schedules the correlation id at `due_at`.
	/// The schedule entry is add-if-absent so a concurrent worker cannot
	/// rewrite an earlier due time.
	async fn schedule_retry(
		&self,
		payment: &Payment,
		due_at: i64,
	) -> Result<(), Box<dyn std::error::Error + Send>>;

	/// Removes the stored retry payload. Queue membership was already
	/// consumed by the pop that delivered the job.
	async fn drop_retry(
		&self,
		correlation_id: Uuid,
	) -> Result<(), Box<dyn std::error::Error + Send>>;

	/// Records a terminal failure in the dead-letter set.
	async fn add_dlq(
		&self,
		payment: &Payment,
	) -> Result<(), Box<dyn std::error::Error + Send>>;

	async fn get_best_url(
		&self,
	) -> Result<Option<String>, Box<dyn std::error::Error + Send>>;

	/// Publishes the preferred processor URL with the given TTL, serialized
	/// across replicas by the routing lock.
	async fn try_publish_best(
		&self,
		url: &str,
		ttl: Duration,
	) -> Result<(), Box<dyn std::error::Error + Send>>;

	/// Inclusive score-range read over one outcome set. Order of the
	/// returned payments is unspecified.
	async fn range_outcomes(
		&self,
		processor: Processor,
		score_min: i64,
		score_max: i64,
	) -> Result<Vec<Payment>, Box<dyn std::error::Error + Send>>;
}
