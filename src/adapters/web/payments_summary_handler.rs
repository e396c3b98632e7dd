use actix_web::{HttpResponse, Responder, ResponseError, get, web};
use log::warn;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::adapters::web::errors::ApiError;
use crate::adapters::web::schema::PaymentsSummaryFilter;
use crate::infrastructure::persistence::redis_broker_gateway::RedisBrokerGateway;
use crate::use_cases::dto::GetPaymentSummaryQuery;
use crate::use_cases::get_payment_summary::GetPaymentSummaryUseCase;

/// Missing or unparseable bounds pin to the zero instant; an absent window
/// therefore selects `[0, 0]`.
fn parse_bound(raw: Option<&String>) -> i64 {
	raw.and_then(|value| OffsetDateTime::parse(value, &Rfc3339).ok())
		.map_or(0, |timestamp| timestamp.unix_timestamp())
}

#[get("/payments-summary")]
pub async fn payments_summary(
	filter: web::Query<PaymentsSummaryFilter>,
	get_payment_summary_use_case: web::Data<
		GetPaymentSummaryUseCase<RedisBrokerGateway>,
	>,
) -> impl Responder {
	let query = GetPaymentSummaryQuery {
		from: parse_bound(filter.from.as_ref()),
		to:   parse_bound(filter.to.as_ref()),
	};

	match get_payment_summary_use_case.execute(query).await {
		Ok(summary) => HttpResponse::Ok().json(summary),
		Err(e) => {
			warn!("Failed to read payment summary: {e:?}");
			ApiError::InternalServerError.error_response()
		}
	}
}
