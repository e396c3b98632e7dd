use crate::domain::broker::BrokerGateway;
use crate::domain::processor::Processor;
use crate::use_cases::dto::{
	GetPaymentSummaryQuery, PaymentSummaryResult, PaymentsSummaryResponse,
};

fn round_cents(amount: f64) -> f64 {
	(amount * 100.0).round() / 100.0
}

#[derive(Clone)]
pub struct GetPaymentSummaryUseCase<G: BrokerGateway> {
	broker: G,
}

impl<G: BrokerGateway> GetPaymentSummaryUseCase<G> {
	pub fn new(broker: G) -> Self {
		Self { broker }
	}

	pub async fn execute(
		&self,
		query: GetPaymentSummaryQuery,
	) -> Result<PaymentsSummaryResponse, Box<dyn std::error::Error + Send>> {
		Ok(PaymentsSummaryResponse {
			default:  self.summarize(Processor::Default, &query).await?,
			fallback: self.summarize(Processor::Fallback, &query).await?,
		})
	}

	async fn summarize(
		&self,
		processor: Processor,
		query: &GetPaymentSummaryQuery,
	) -> Result<PaymentSummaryResult, Box<dyn std::error::Error + Send>> {
		let outcomes = self
			.broker
			.range_outcomes(processor, query.from, query.to)
			.await?;

		let total_amount =
			outcomes.iter().map(|payment| payment.amount).sum::<f64>();

		Ok(PaymentSummaryResult {
			total_requests: outcomes.len(),
			total_amount:   round_cents(total_amount),
		})
	}
}
