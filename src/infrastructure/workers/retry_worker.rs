use std::time::Duration;

use log::{debug, error, warn};
use time::OffsetDateTime;
use tokio::time::sleep;

use crate::domain::broker::BrokerGateway;
use crate::use_cases::dispatch_payment::{
	DispatchOrigin, DispatchPaymentUseCase,
};

const IDLE_BACKOFF: Duration = Duration::from_millis(100);
const ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Re-dispatches scheduled retries, oldest original arrival first.
pub async fn retry_worker<G>(broker: G, dispatch: DispatchPaymentUseCase<G>)
where
	G: BrokerGateway + Clone,
{
	loop {
		let job = match broker.pop_due_retry(OffsetDateTime::now_utc()).await {
			Ok(Some(job)) => job,
			Ok(None) => {
				sleep(IDLE_BACKOFF).await;
				continue;
			}
			Err(e) => {
				error!("Failed to pop from retry schedule: {e}");
				sleep(ERROR_BACKOFF).await;
				continue;
			}
		};

		let Some(payment) = job.payment else {
			// Payload was reaped; dropping here prevents infinite re-entry.
			warn!(
				"Retry payload for {} is gone, dropping the job",
				job.correlation_id
			);
			continue;
		};

		debug!(
			"Dispatching retry payment {} (attempt {})",
			payment.correlation_id, payment.attempt_count
		);

		match dispatch.execute(payment, DispatchOrigin::Retry).await {
			Ok(outcome) => {
				debug!("Retry dispatch finished: {outcome:?}");
			}
			Err(e) => {
				error!("Retry dispatch hit a broker error: {e}");
			}
		}
	}
}
