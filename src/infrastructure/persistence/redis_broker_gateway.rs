use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client};
use time::OffsetDateTime;
use tokio::time::sleep;
use uuid::Uuid;

use crate::domain::broker::{BrokerGateway, RetryJob};
use crate::domain::payment::Payment;
use crate::domain::processor::Processor;
use crate::infrastructure::config::redis::{
	BEST_INSTANCE_KEY, BEST_INSTANCE_LOCK_KEY, DLQ_KEY, PAYMENT_QUEUE_KEY,
	PAYMENT_RESULT_DEFAULT_KEY, PAYMENT_RESULT_FALLBACK_KEY,
	PAYMENT_RETRY_PAYLOADS_KEY, PAYMENT_RETRY_QUEUE_KEY,
};

const LOCK_BACKOFF: Duration = Duration::from_millis(50);

fn result_key(processor: Processor) -> &'static str {
	match processor {
		Processor::Default => PAYMENT_RESULT_DEFAULT_KEY,
		Processor::Fallback => PAYMENT_RESULT_FALLBACK_KEY,
	}
}

#[derive(Clone)]
pub struct RedisBrokerGateway {
	client: Client,
}

impl RedisBrokerGateway {
	pub fn new(client: Client) -> Self {
		Self { client }
	}

	async fn connection(
		&self,
	) -> Result<
		redis::aio::MultiplexedConnection,
		Box<dyn std::error::Error + Send>,
	> {
		self.client
			.get_multiplexed_async_connection()
			.await
			.map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send>)
	}
}

#[async_trait]
impl BrokerGateway for RedisBrokerGateway {
	async fn push_intake(
		&self,
		payment: &Payment,
	) -> Result<(), Box<dyn std::error::Error + Send>> {
		let mut con = self.connection().await?;

		let serialized = serde_json::to_string(payment)
			.map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send>)?;

		let _: () = con
			.lpush(PAYMENT_QUEUE_KEY, serialized)
			.await
			.map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send>)?;
		Ok(())
	}

	async fn blocking_pop_intake(
		&self,
		timeout: Duration,
	) -> Result<Option<Payment>, Box<dyn std::error::Error + Send>> {
		let mut con = self.connection().await?;

		let popped_value: Option<(String, String)> = con
			.brpop(PAYMENT_QUEUE_KEY, timeout.as_secs_f64())
			.await
			.map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send>)?;

		let Some((_queue_name, serialized)) = popped_value else {
			return Ok(None);
		};

		let payment: Payment = serde_json::from_str(&serialized)
			.map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send>)?;

		Ok(Some(payment))
	}

	async fn pop_due_retry(
		&self,
		now: OffsetDateTime,
	) -> Result<Option<RetryJob>, Box<dyn std::error::Error + Send>> {
		let mut con = self.connection().await?;

		let popped: Vec<(String, f64)> = con
			.zpopmin(PAYMENT_RETRY_QUEUE_KEY, 1)
			.await
			.map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send>)?;

		let Some((member, score)) = popped.into_iter().next() else {
			return Ok(None);
		};

		if score > now.unix_timestamp() as f64 {
			let _: () = con
				.zadd(PAYMENT_RETRY_QUEUE_KEY, &member, score)
				.await
				.map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send>)?;
			return Ok(None);
		}

		let correlation_id = Uuid::parse_str(&member)
			.map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send>)?;

		let payload: Option<String> = con
			.hget(PAYMENT_RETRY_PAYLOADS_KEY, &member)
			.await
			.map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send>)?;

		let payment = match payload {
			None => None,
			Some(raw) => match serde_json::from_str(&raw) {
				Ok(payment) => Some(payment),
				Err(e) => {
					// Reap the poisoned payload so the id cannot be
					// rescheduled against it.
					let _: () = con
						.hdel(PAYMENT_RETRY_PAYLOADS_KEY, &member)
						.await
						.map_err(|e| {
							Box::new(e) as Box<dyn std::error::Error + Send>
						})?;
					return Err(
						Box::new(e) as Box<dyn std::error::Error + Send>
					);
				}
			},
		};

		Ok(Some(RetryJob {
			correlation_id,
			payment,
		}))
	}

	async fn add_result(
		&self,
		processor: Processor,
		payment: &Payment,
	) -> Result<(), Box<dyn std::error::Error + Send>> {
		let mut con = self.connection().await?;

		let serialized = serde_json::to_string(payment)
			.map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send>)?;

		let _: () = con
			.zadd(
				result_key(processor),
				serialized,
				payment.requested_at_unix(),
			)
			.await
			.map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send>)?;
		Ok(())
	}

	async fn schedule_retry(
		&self,
		payment: &Payment,
		due_at: i64,
	) -> Result<(), Box<dyn std::error::Error + Send>> {
		let mut con = self.connection().await?;

		let member = payment.correlation_id.to_string();
		let serialized = serde_json::to_string(payment)
			.map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send>)?;

		// The payload always reflects the latest attempt count; the
		// schedule entry is NX so an earlier due time survives concurrent
		// writers.
		redis::pipe()
			.atomic()
			.hset(PAYMENT_RETRY_PAYLOADS_KEY, &member, serialized)
			.ignore()
			.cmd("ZADD")
			.arg(PAYMENT_RETRY_QUEUE_KEY)
			.arg("NX")
			.arg(due_at)
			.arg(&member)
			.ignore()
			.query_async::<()>(&mut con)
			.await
			.map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send>)?;

		Ok(())
	}

	async fn drop_retry(
		&self,
		correlation_id: Uuid,
	) -> Result<(), Box<dyn std::error::Error + Send>> {
		let mut con = self.connection().await?;

		let _: () = con
			.hdel(PAYMENT_RETRY_PAYLOADS_KEY, correlation_id.to_string())
			.await
			.map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send>)?;
		Ok(())
	}

	async fn add_dlq(
		&self,
		payment: &Payment,
	) -> Result<(), Box<dyn std::error::Error + Send>> {
		let mut con = self.connection().await?;

		let serialized = serde_json::to_string(payment)
			.map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send>)?;

		let _: () = con
			.zadd(DLQ_KEY, serialized, payment.requested_at_unix())
			.await
			.map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send>)?;
		Ok(())
	}

	async fn get_best_url(
		&self,
	) -> Result<Option<String>, Box<dyn std::error::Error + Send>> {
		let mut con = self.connection().await?;

		let url: Option<String> = con
			.get(BEST_INSTANCE_KEY)
			.await
			.map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send>)?;
		Ok(url)
	}

	async fn try_publish_best(
		&self,
		url: &str,
		ttl: Duration,
	) -> Result<(), Box<dyn std::error::Error + Send>> {
		let mut con = self.connection().await?;
		let ttl_secs = ttl.as_secs().max(1);

		// Coarse serializer across replicas. A holder that dies leaves the
		// lock to expire with its TTL, so waiting here is bounded.
		loop {
			let acquired: Option<String> = redis::cmd("SET")
				.arg(BEST_INSTANCE_LOCK_KEY)
				.arg("1")
				.arg("NX")
				.arg("EX")
				.arg(ttl_secs)
				.query_async(&mut con)
				.await
				.map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send>)?;

			if acquired.is_some() {
				break;
			}
			sleep(LOCK_BACKOFF).await;
		}

		let publish_result: Result<(), redis::RedisError> =
			con.set_ex(BEST_INSTANCE_KEY, url, ttl_secs).await;

		let _: () = con
			.del(BEST_INSTANCE_LOCK_KEY)
			.await
			.map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send>)?;

		publish_result
			.map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send>)
	}

	async fn range_outcomes(
		&self,
		processor: Processor,
		score_min: i64,
		score_max: i64,
	) -> Result<Vec<Payment>, Box<dyn std::error::Error + Send>> {
		let mut con = self.connection().await?;

		let members: Vec<String> = con
			.zrangebyscore(result_key(processor), score_min, score_max)
			.await
			.map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send>)?;

		members
			.iter()
			.map(|raw| {
				serde_json::from_str(raw).map_err(|e| {
					Box::new(e) as Box<dyn std::error::Error + Send>
				})
			})
			.collect()
	}
}
