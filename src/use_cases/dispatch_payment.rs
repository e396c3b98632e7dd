use log::{error, warn};
use reqwest::Client;

use crate::domain::broker::BrokerGateway;
use crate::domain::payment::Payment;
use crate::domain::processor::{Processor, ProcessorEndpoints};

/// Which queue handed the payment to the worker. Retry-borne payments own
/// a payload-hash entry that must be dropped on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOrigin {
	Intake,
	Retry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
	/// Terminal success, recorded under the processor's outcome set.
	Recorded(Processor),
	/// Transient failure, rescheduled with an incremented attempt count.
	RetryScheduled,
	/// Retry budget exhausted, parked in the dead-letter set.
	DeadLettered,
	/// No routable processor; rescheduled without touching the budget.
	NoRoute,
}

/// One dispatch attempt, shared by the intake and retry worker pools.
#[derive(Clone)]
pub struct DispatchPaymentUseCase<G: BrokerGateway> {
	broker:       G,
	http_client:  Client,
	endpoints:    ProcessorEndpoints,
	max_attempts: u32,
}

impl<G: BrokerGateway> DispatchPaymentUseCase<G> {
	pub fn new(
		broker: G,
		http_client: Client,
		endpoints: ProcessorEndpoints,
		max_attempts: u32,
	) -> Self {
		Self {
			broker,
			http_client,
			endpoints,
			max_attempts,
		}
	}

	pub async fn execute(
		&self,
		payment: Payment,
		origin: DispatchOrigin,
	) -> Result<DispatchOutcome, Box<dyn std::error::Error + Send>> {
		let best_url = match self.broker.get_best_url().await? {
			Some(url) => url,
			None => return self.reschedule_unrouted(payment).await,
		};

		let Some(processor) = self.endpoints.identify(&best_url) else {
			warn!(
				"Published best instance '{best_url}' matches no configured \
				 processor"
			);
			return self.reschedule_unrouted(payment).await;
		};

		match self
			.http_client
			.post(format!("{best_url}/payments"))
			.json(&payment)
			.send()
			.await
		{
			Ok(resp) if resp.status().is_success() => {
				self.broker.add_result(processor, &payment).await?;
				if origin == DispatchOrigin::Retry {
					self.broker.drop_retry(payment.correlation_id).await?;
				}
				Ok(DispatchOutcome::Recorded(processor))
			}
			Ok(resp) => {
				warn!(
					"Processor {} returned {} for payment {}",
					processor.name(),
					resp.status(),
					payment.correlation_id
				);
				self.handle_failure(payment).await
			}
			Err(e) => {
				error!(
					"Failed to reach processor {} for payment {}: {e}",
					processor.name(),
					payment.correlation_id
				);
				self.handle_failure(payment).await
			}
		}
	}

	/// Routing is unavailable; the attempt does not count against the
	/// retry budget.
	async fn reschedule_unrouted(
		&self,
		payment: Payment,
	) -> Result<DispatchOutcome, Box<dyn std::error::Error + Send>> {
		let due_at = payment.requested_at_unix();
		self.broker.schedule_retry(&payment, due_at).await?;
		Ok(DispatchOutcome::NoRoute)
	}

	async fn handle_failure(
		&self,
		mut payment: Payment,
	) -> Result<DispatchOutcome, Box<dyn std::error::Error + Send>> {
		if payment.attempt_count >= self.max_attempts {
			// DLQ admission is best-effort: if the write fails the payment
			// stays in retry storage and will be dead-lettered on the next
			// failing attempt.
			self.broker.add_dlq(&payment).await?;
			self.broker.drop_retry(payment.correlation_id).await?;
			return Ok(DispatchOutcome::DeadLettered);
		}

		payment.attempt_count += 1;
		let due_at = payment.requested_at_unix();
		self.broker.schedule_retry(&payment, due_at).await?;
		Ok(DispatchOutcome::RetryScheduled)
	}
}
