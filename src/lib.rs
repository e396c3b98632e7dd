use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, HttpServer, web};
use log::info;
use reqwest::Client;

pub mod adapters;
pub mod domain;
pub mod infrastructure;
pub mod use_cases;

use crate::adapters::web::handlers::{payments, payments_summary};
use crate::domain::processor::ProcessorEndpoints;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::persistence::redis_broker_gateway::RedisBrokerGateway;
use crate::infrastructure::workers::health_router_worker::health_router_worker;
use crate::infrastructure::workers::intake_worker::intake_worker;
use crate::infrastructure::workers::retry_worker::retry_worker;
use crate::use_cases::create_payment::CreatePaymentUseCase;
use crate::use_cases::dispatch_payment::DispatchPaymentUseCase;
use crate::use_cases::get_payment_summary::GetPaymentSummaryUseCase;

const MAX_BODY_BYTES: usize = 10 << 20;

pub async fn run(config: Arc<Config>) -> std::io::Result<()> {
	env_logger::init();

	let redis_client =
		redis::Client::open(config.redis_url.clone()).expect("Invalid Redis URL");

	let http_client = Client::builder()
		.timeout(Duration::from_millis(config.processor_timeout_ms))
		.build()
		.expect("Failed to build HTTP client");

	let broker = RedisBrokerGateway::new(redis_client.clone());
	let endpoints = ProcessorEndpoints::new(
		config.default_processor_url.clone(),
		config.fallback_processor_url.clone(),
	);

	info!("Starting health router...");

	tokio::spawn(health_router_worker(
		broker.clone(),
		http_client.clone(),
		endpoints.clone(),
		Duration::from_secs(config.health_update_freq_secs),
		Duration::from_secs(config.best_instance_ttl_secs),
		Duration::from_millis(config.health_probe_timeout_ms),
	));

	let dispatch_payment_use_case = DispatchPaymentUseCase::new(
		broker.clone(),
		http_client.clone(),
		endpoints.clone(),
		config.max_attempts,
	);

	info!(
		"Starting {} intake and {} retry workers...",
		config.intake_workers, config.retry_workers
	);

	for _ in 0..config.intake_workers {
		tokio::spawn(intake_worker(
			broker.clone(),
			dispatch_payment_use_case.clone(),
		));
	}

	for _ in 0..config.retry_workers {
		tokio::spawn(retry_worker(
			broker.clone(),
			dispatch_payment_use_case.clone(),
		));
	}

	info!("Starting Actix-Web server on 0.0.0.0:{}...", config.port);

	let create_payment_use_case = CreatePaymentUseCase::new(broker.clone());
	let get_payment_summary_use_case =
		GetPaymentSummaryUseCase::new(broker.clone());

	HttpServer::new(move || {
		App::new()
			.app_data(web::JsonConfig::default().limit(MAX_BODY_BYTES))
			.app_data(web::Data::new(create_payment_use_case.clone()))
			.app_data(web::Data::new(get_payment_summary_use_case.clone()))
			.service(payments)
			.service(payments_summary)
	})
	.keep_alive(Duration::from_secs(config.server_keepalive))
	.bind(("0.0.0.0", config.port))?
	.run()
	.await
}
