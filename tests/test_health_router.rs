use std::time::Duration;

use payment_relay::domain::broker::BrokerGateway;
use payment_relay::domain::processor::ProcessorEndpoints;
use payment_relay::infrastructure::persistence::redis_broker_gateway::RedisBrokerGateway;
use payment_relay::infrastructure::workers::health_router_worker::health_router_worker;
use reqwest::Client;
use tokio::time::sleep;

mod support;

use crate::support::processor_stub::start_processor_stub;
use crate::support::redis_container::get_test_redis_client;

const UPDATE_FREQ: Duration = Duration::from_secs(1);
const TTL: Duration = Duration::from_secs(2);
const PROBE_TIMEOUT: Duration = Duration::from_millis(500);
const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[actix_web::test]
async fn test_publishes_default_when_both_healthy_and_default_faster() {
	let redis_container = get_test_redis_client().await;
	let gateway = RedisBrokerGateway::new(redis_container.client.clone());
	let default_stub = start_processor_stub().await;
	let fallback_stub = start_processor_stub().await;
	default_stub.state.set_min_response_time(10);
	fallback_stub.state.set_min_response_time(50);

	let worker_handle = tokio::spawn(health_router_worker(
		gateway.clone(),
		Client::new(),
		ProcessorEndpoints::new(
			default_stub.url.clone(),
			fallback_stub.url.clone(),
		),
		UPDATE_FREQ,
		TTL,
		PROBE_TIMEOUT,
	));

	let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
	loop {
		if gateway.get_best_url().await.unwrap()
			== Some(default_stub.url.clone())
		{
			break;
		}
		assert!(
			tokio::time::Instant::now() < deadline,
			"router never published the default processor"
		);
		sleep(POLL_INTERVAL).await;
	}

	worker_handle.abort();
}

#[actix_web::test]
async fn test_publishes_fallback_when_default_failing() {
	let redis_container = get_test_redis_client().await;
	let gateway = RedisBrokerGateway::new(redis_container.client.clone());
	let default_stub = start_processor_stub().await;
	let fallback_stub = start_processor_stub().await;
	default_stub.state.set_failing(true);
	default_stub.state.set_min_response_time(1);
	fallback_stub.state.set_min_response_time(500);

	let worker_handle = tokio::spawn(health_router_worker(
		gateway.clone(),
		Client::new(),
		ProcessorEndpoints::new(
			default_stub.url.clone(),
			fallback_stub.url.clone(),
		),
		UPDATE_FREQ,
		TTL,
		PROBE_TIMEOUT,
	));

	let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
	loop {
		if gateway.get_best_url().await.unwrap()
			== Some(fallback_stub.url.clone())
		{
			break;
		}
		assert!(
			tokio::time::Instant::now() < deadline,
			"router never failed over to the fallback processor"
		);
		sleep(POLL_INTERVAL).await;
	}

	worker_handle.abort();
}

#[actix_web::test]
async fn test_unreachable_default_counts_as_failing() {
	let redis_container = get_test_redis_client().await;
	let gateway = RedisBrokerGateway::new(redis_container.client.clone());
	let fallback_stub = start_processor_stub().await;

	let worker_handle = tokio::spawn(health_router_worker(
		gateway.clone(),
		Client::new(),
		ProcessorEndpoints::new(
			"http://127.0.0.1:9".to_string(),
			fallback_stub.url.clone(),
		),
		UPDATE_FREQ,
		TTL,
		PROBE_TIMEOUT,
	));

	let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
	loop {
		if gateway.get_best_url().await.unwrap()
			== Some(fallback_stub.url.clone())
		{
			break;
		}
		assert!(
			tokio::time::Instant::now() < deadline,
			"router never published the reachable fallback"
		);
		sleep(POLL_INTERVAL).await;
	}

	worker_handle.abort();
}

#[actix_web::test]
async fn test_both_failing_lets_best_instance_expire() {
	let redis_container = get_test_redis_client().await;
	let gateway = RedisBrokerGateway::new(redis_container.client.clone());
	let default_stub = start_processor_stub().await;
	let fallback_stub = start_processor_stub().await;
	default_stub.state.set_failing(true);
	fallback_stub.state.set_failing(true);

	// Stale value from a previous cycle, about to expire.
	gateway
		.try_publish_best(&default_stub.url, Duration::from_secs(1))
		.await
		.unwrap();

	let worker_handle = tokio::spawn(health_router_worker(
		gateway.clone(),
		Client::new(),
		ProcessorEndpoints::new(
			default_stub.url.clone(),
			fallback_stub.url.clone(),
		),
		UPDATE_FREQ,
		TTL,
		PROBE_TIMEOUT,
	));

	sleep(Duration::from_millis(2500)).await;

	assert!(gateway.get_best_url().await.unwrap().is_none());

	worker_handle.abort();
}
