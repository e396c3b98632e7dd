use std::time::Duration;

use log::{debug, error};
use tokio::time::sleep;

use crate::domain::broker::BrokerGateway;
use crate::use_cases::dispatch_payment::{
	DispatchOrigin, DispatchPaymentUseCase,
};

const POP_TIMEOUT: Duration = Duration::from_secs(1);
const ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Drains the intake queue. Stateless beyond the per-iteration payment;
/// all coordination happens through the broker.
pub async fn intake_worker<G>(broker: G, dispatch: DispatchPaymentUseCase<G>)
where
	G: BrokerGateway + Clone,
{
	loop {
		let payment = match broker.blocking_pop_intake(POP_TIMEOUT).await {
			Ok(Some(payment)) => payment,
			Ok(None) => continue,
			Err(e) => {
				// Covers broker failures and malformed payloads alike; a
				// malformed element was already consumed and stays dropped.
				error!("Failed to pop from intake queue: {e}");
				sleep(ERROR_BACKOFF).await;
				continue;
			}
		};

		debug!("Dispatching intake payment {}", payment.correlation_id);

		match dispatch.execute(payment, DispatchOrigin::Intake).await {
			Ok(outcome) => {
				debug!("Intake dispatch finished: {outcome:?}");
			}
			Err(e) => {
				error!("Intake dispatch hit a broker error: {e}");
			}
		}
	}
}
