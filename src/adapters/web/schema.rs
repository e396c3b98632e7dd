use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PaymentRequest {
	#[serde(rename = "correlationId")]
	pub correlation_id: Uuid,
	pub amount:         f64,
}

/// Raw query-string bounds. Kept as strings so an unparseable timestamp
/// degrades to the zero instant instead of rejecting the request.
#[derive(Debug, Deserialize, Serialize)]
pub struct PaymentsSummaryFilter {
	pub from: Option<String>,
	pub to:   Option<String>,
}
