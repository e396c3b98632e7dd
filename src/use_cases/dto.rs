use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CreatePaymentCommand {
	pub correlation_id: Uuid,
	pub amount:         f64,
}

/// Window bounds in unix-seconds, inclusive. Handlers pin missing or
/// unparseable bounds to zero before building the query.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GetPaymentSummaryQuery {
	pub from: i64,
	pub to:   i64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PaymentSummaryResult {
	#[serde(rename = "totalRequests")]
	pub total_requests: usize,
	#[serde(rename = "totalAmount")]
	pub total_amount:   f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PaymentsSummaryResponse {
	pub default:  PaymentSummaryResult,
	pub fallback: PaymentSummaryResult,
}
