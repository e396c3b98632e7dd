use time::OffsetDateTime;

use crate::domain::broker::BrokerGateway;
use crate::domain::payment::Payment;
use crate::use_cases::dto::CreatePaymentCommand;

#[derive(Clone)]
pub struct CreatePaymentUseCase<G: BrokerGateway> {
	broker: G,
}

impl<G: BrokerGateway> CreatePaymentUseCase<G> {
	pub fn new(broker: G) -> Self {
		Self { broker }
	}

	pub async fn execute(
		&self,
		command: CreatePaymentCommand,
	) -> Result<(), Box<dyn std::error::Error + Send>> {
		// Acceptance time, second resolution. Immutable from here on.
		let now = OffsetDateTime::now_utc();
		let requested_at = now.replace_nanosecond(0).unwrap_or(now);

		let payment =
			Payment::new(command.correlation_id, command.amount, requested_at);

		self.broker.push_intake(&payment).await
	}
}
